use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::consts::{DEFAULT_MAX_ZOOM, DEFAULT_MIN_ZOOM};
use crate::error::{NebulaError, Result};
use crate::geometry::{Point, Vector};

/// Allowed range of the zoom factor, in logical units per screen pixel.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZoomLimits {
    pub min: f64,
    pub max: f64,
}

impl Default for ZoomLimits {
    fn default() -> Self {
        Self {
            min: DEFAULT_MIN_ZOOM,
            max: DEFAULT_MAX_ZOOM,
        }
    }
}

impl ZoomLimits {
    pub fn new(min: f64, max: f64) -> Result<Self> {
        let limits = Self { min, max };
        limits.validate()?;
        Ok(limits)
    }

    pub fn validate(&self) -> Result<()> {
        let usable = self.min.is_finite()
            && self.max.is_finite()
            && self.min > 0.0
            && self.min <= self.max;
        if usable {
            Ok(())
        } else {
            Err(NebulaError::InvalidZoomLimits {
                min: self.min,
                max: self.max,
            })
        }
    }

    pub fn clamp(&self, zoom: f64) -> f64 {
        zoom.clamp(self.min, self.max)
    }
}

/// Maps logical coordinates to screen pixels and back.
///
/// `screen = (logical - pan) / zoom` and `logical = screen * zoom + pan`,
/// where `zoom` is the number of logical units covered by one screen pixel
/// and `pan` is the logical point shown at the screen origin.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CoordinateTransform {
    zoom: f64,
    pan: Point,
    limits: ZoomLimits,
}

impl CoordinateTransform {
    /// Build a transform, clamping `zoom` into `limits`.
    pub fn new(zoom: f64, pan: Point, limits: ZoomLimits) -> Result<Self> {
        limits.validate()?;
        check_zoom(zoom)?;
        check_point("pan offset", pan)?;
        Ok(Self {
            zoom: clamp_logged(&limits, zoom),
            pan,
            limits,
        })
    }

    /// Unit zoom with the logical origin at the screen origin.
    pub fn identity(limits: ZoomLimits) -> Result<Self> {
        Self::new(1.0, Point::ORIGIN, limits)
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    pub fn pan(&self) -> Point {
        self.pan
    }

    pub fn limits(&self) -> ZoomLimits {
        self.limits
    }

    pub fn to_screen(&self, logical: Point) -> Point {
        (logical - self.pan.to_vector()) / self.zoom
    }

    pub fn to_image(&self, screen: Point) -> Point {
        screen * self.zoom + self.pan.to_vector()
    }

    /// Set an absolute zoom factor, keeping the pan offset.
    /// Returns the zoom actually applied after clamping.
    pub fn set_zoom(&mut self, zoom: f64) -> Result<f64> {
        check_zoom(zoom)?;
        self.zoom = clamp_logged(&self.limits, zoom);
        Ok(self.zoom)
    }

    pub fn set_pan(&mut self, pan: Point) -> Result<()> {
        check_point("pan offset", pan)?;
        self.pan = pan;
        Ok(())
    }

    /// Multiply the zoom factor by `factor_delta` while the logical point
    /// under `screen_anchor` stays under it.
    pub fn zoom_at(&mut self, screen_anchor: Point, factor_delta: f64) -> Result<()> {
        check_point("zoom anchor", screen_anchor)?;
        if !factor_delta.is_finite() || factor_delta <= 0.0 {
            return Err(NebulaError::DegenerateTransform(format!(
                "zoom factor delta must be finite and > 0, got {factor_delta}"
            )));
        }
        let logical_anchor = self.to_image(screen_anchor);
        // A finite factor can still overflow to inf or underflow to 0; both clamp.
        self.zoom = clamp_logged(&self.limits, self.zoom * factor_delta);
        // Pan is rederived from the anchor each time so repeated zooms do not drift.
        self.pan = logical_anchor - screen_anchor.to_vector() * self.zoom;
        Ok(())
    }

    /// Set an absolute zoom while `logical_anchor` keeps its current screen position.
    pub fn zoom_about_logical(&mut self, logical_anchor: Point, zoom: f64) -> Result<()> {
        check_point("logical anchor", logical_anchor)?;
        check_zoom(zoom)?;
        let screen_anchor = self.to_screen(logical_anchor);
        self.zoom = clamp_logged(&self.limits, zoom);
        self.pan = logical_anchor - screen_anchor.to_vector() * self.zoom;
        Ok(())
    }

    /// Shift the pan offset by a screen-space delta.
    pub fn pan_by(&mut self, screen_delta: Vector) -> Result<()> {
        if !screen_delta.is_finite() {
            return Err(NebulaError::DegenerateTransform(format!(
                "pan delta must be finite, got {screen_delta:?}"
            )));
        }
        let pan = self.pan + screen_delta * self.zoom;
        check_point("pan offset", pan)?;
        self.pan = pan;
        Ok(())
    }
}

fn check_zoom(zoom: f64) -> Result<()> {
    if zoom.is_finite() && zoom > 0.0 {
        Ok(())
    } else {
        Err(NebulaError::DegenerateTransform(format!(
            "zoom factor must be finite and > 0, got {zoom}"
        )))
    }
}

fn check_point(what: &str, p: Point) -> Result<()> {
    if p.is_finite() {
        Ok(())
    } else {
        Err(NebulaError::DegenerateTransform(format!(
            "{what} must be finite, got ({}, {})",
            p.x, p.y
        )))
    }
}

fn clamp_logged(limits: &ZoomLimits, zoom: f64) -> f64 {
    let clamped = limits.clamp(zoom);
    if clamped != zoom {
        debug!(requested = zoom, applied = clamped, "Zoom clamped to limits");
    }
    clamped
}
