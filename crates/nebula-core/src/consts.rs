/// Default lower bound of the zoom factor (logical units per screen pixel).
pub const DEFAULT_MIN_ZOOM: f64 = 0.01;

/// Default upper bound of the zoom factor (logical units per screen pixel).
pub const DEFAULT_MAX_ZOOM: f64 = 100.0;

/// Magnification applied by a single "zoom in" step on all viewports.
pub const ZOOM_IN_STEP: f64 = 1.2;

/// Magnification applied by a single "zoom out" step on all viewports.
pub const ZOOM_OUT_STEP: f64 = 0.8;

/// Scroll delta to zoom exponent ratio: one wheel unit scales by `exp(0.005)`.
pub const DEFAULT_SCROLL_SENSITIVITY: f64 = 0.005;

/// Starting reticule opacity.
pub const DEFAULT_RETICLE_OPACITY: f64 = 0.4;

/// Opacity added by each `cycle_opacity` call, wrapping at 1.0.
pub const DEFAULT_RETICLE_OPACITY_STEP: f64 = 0.1;
