use thiserror::Error;

use crate::reticle::MarkerId;
use crate::viewport::ViewportId;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum NebulaError {
    #[error("Unknown viewport: {0}")]
    UnknownViewport(ViewportId),

    #[error("Unknown marker: {0}")]
    UnknownMarker(MarkerId),

    #[error("Degenerate transform: {0}")]
    DegenerateTransform(String),

    #[error("Invalid image dimensions: {width}x{height}")]
    InvalidImage { width: usize, height: usize },

    #[error("Invalid physical scale: {0} (must be finite and > 0)")]
    InvalidScale(f64),

    #[error("Invalid zoom limits: min={min}, max={max}")]
    InvalidZoomLimits { min: f64, max: f64 },

    #[error("Config error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, NebulaError>;
