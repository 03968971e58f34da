use serde::Serialize;

use crate::geometry::{Point, Rect, Size};
use crate::reticle::{Color, Marker, ProjectedMarker};
use crate::sync::SyncPolicy;
use crate::viewport::ViewportId;

/// Read-only picture of a whole session, for renderers and reports.
#[derive(Clone, Debug, Serialize)]
pub struct SessionSnapshot {
    pub policy: SyncPolicy,
    pub reticle: ReticleSnapshot,
    pub viewports: Vec<ViewportSnapshot>,
    pub markers: Vec<Marker>,
}

#[derive(Clone, Debug, Serialize)]
pub struct ReticleSnapshot {
    pub color: Color,
    pub opacity: f64,
    pub visible: bool,
}

#[derive(Clone, Debug, Serialize)]
pub struct ViewportSnapshot {
    pub id: ViewportId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub pixel_width: usize,
    pub pixel_height: usize,
    pub scale: f64,
    pub offset: Point,
    pub screen_size: Size,
    pub zoom: f64,
    pub pan: Point,
    pub synced: bool,
    pub visible_logical_rect: Rect,
    pub image_screen_rect: Rect,
    pub projected: Vec<ProjectedMarker>,
}
