use std::fmt;

use serde::{Deserialize, Serialize};

use crate::geometry::Point;
use crate::reticle::style::Color;

/// Identifier of a fixed marker. Never reused within a session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MarkerId(pub u64);

impl fmt::Display for MarkerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "M{}", self.0)
    }
}

/// Live markers follow the pointer; fixed ones stay where they were pinned.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MarkerKind {
    Live,
    Fixed(MarkerId),
}

impl MarkerKind {
    pub fn id(&self) -> Option<MarkerId> {
        match self {
            MarkerKind::Live => None,
            MarkerKind::Fixed(id) => Some(*id),
        }
    }
}

impl fmt::Display for MarkerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MarkerKind::Live => write!(f, "live"),
            MarkerKind::Fixed(id) => write!(f, "{id}"),
        }
    }
}

/// A reticule in shared logical space.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    pub kind: MarkerKind,
    pub position: Point,
    pub color: Color,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

/// A marker projected into one viewport's screen space.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProjectedMarker {
    pub kind: MarkerKind,
    pub screen: Point,
    /// Whether `screen` falls inside the viewport. Off-screen markers are
    /// still reported so the user can pan to them.
    pub on_screen: bool,
}
