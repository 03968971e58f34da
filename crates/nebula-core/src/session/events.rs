use serde::{Deserialize, Serialize};

use crate::geometry::{Point, Vector};
use crate::reticle::MarkerId;
use crate::viewport::ViewportId;

/// Normalized input delivered by the host's input layer.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InputEvent {
    /// Pointer moved to a screen position inside a viewport.
    PointerMove { viewport: ViewportId, position: Point },
    /// Wheel/pinch at a screen position. Positive `delta` zooms in.
    Scroll {
        viewport: ViewportId,
        position: Point,
        delta: f64,
    },
    /// Click pins a reticule at the clicked position.
    Click { viewport: ViewportId, position: Point },
    /// Pointer drag by a screen-space delta; the content follows the pointer.
    Drag { viewport: ViewportId, delta: Vector },
}

impl InputEvent {
    pub fn viewport(&self) -> ViewportId {
        match self {
            InputEvent::PointerMove { viewport, .. }
            | InputEvent::Scroll { viewport, .. }
            | InputEvent::Click { viewport, .. }
            | InputEvent::Drag { viewport, .. } => *viewport,
        }
    }
}

/// What an event changed. `synced` counts the sibling viewports that followed.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum EventOutcome {
    LiveMoved(Point),
    Zoomed { zoom: f64, synced: usize },
    Panned { pan: Point, synced: usize },
    MarkerFixed(MarkerId),
}
