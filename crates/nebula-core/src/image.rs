use ndarray::Array2;

use crate::error::{NebulaError, Result};
use crate::geometry::{size, Point, Rect, Size};

/// A decoded grayscale raster handed over by the image source.
/// Pixel values are f32 in [0.0, 1.0].
///
/// The optional physical scale (pixels per logical unit) places images of
/// different resolutions onto one shared logical frame: an 800x600 capture
/// at scale 2.0 covers the same logical area as a 400x300 capture at 1.0.
/// The offset places the image's top-left corner in that frame, so captures
/// shifted relative to each other can be brought into register.
#[derive(Clone, Debug)]
pub struct Image {
    /// Pixel data, row-major, shape = (height, width)
    data: Array2<f32>,
    physical_scale: Option<f64>,
    offset: Point,
    name: Option<String>,
}

impl Image {
    pub fn new(data: Array2<f32>) -> Result<Self> {
        let (height, width) = data.dim();
        if width == 0 || height == 0 {
            return Err(NebulaError::InvalidImage { width, height });
        }
        Ok(Self {
            data,
            physical_scale: None,
            offset: Point::ORIGIN,
            name: None,
        })
    }

    /// Blank image of the given size, for hosts that only know dimensions.
    pub fn blank(width: usize, height: usize) -> Result<Self> {
        Self::new(Array2::zeros((height, width)))
    }

    pub fn with_physical_scale(mut self, pixels_per_unit: f64) -> Result<Self> {
        if !pixels_per_unit.is_finite() || pixels_per_unit <= 0.0 {
            return Err(NebulaError::InvalidScale(pixels_per_unit));
        }
        self.physical_scale = Some(pixels_per_unit);
        Ok(self)
    }

    pub fn with_offset(mut self, offset: Point) -> Result<Self> {
        self.set_offset(offset)?;
        Ok(self)
    }

    /// Move the image's top-left corner to `offset` in logical space.
    pub fn set_offset(&mut self, offset: Point) -> Result<()> {
        if !offset.is_finite() {
            return Err(NebulaError::DegenerateTransform(format!(
                "image offset must be finite, got ({}, {})",
                offset.x, offset.y
            )));
        }
        self.offset = offset;
        Ok(())
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn data(&self) -> &Array2<f32> {
        &self.data
    }

    pub fn width(&self) -> usize {
        self.data.ncols()
    }

    pub fn height(&self) -> usize {
        self.data.nrows()
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn offset(&self) -> Point {
        self.offset
    }

    pub fn physical_scale(&self) -> Option<f64> {
        self.physical_scale
    }

    /// Pixels per logical unit, 1.0 when no hint was given.
    pub fn scale(&self) -> f64 {
        self.physical_scale.unwrap_or(1.0)
    }

    /// Size of the image in logical units.
    pub fn logical_size(&self) -> Size {
        let s = self.scale();
        size(self.width() as f64 / s, self.height() as f64 / s)
    }

    /// Logical rectangle covered by the image; its top-left is the offset.
    pub fn logical_rect(&self) -> Rect {
        Rect::from_min_size(self.offset, self.logical_size())
    }

    pub fn pixel_to_logical(&self, pixel: Point) -> Point {
        pixel / self.scale() + self.offset.to_vector()
    }

    pub fn logical_to_pixel(&self, logical: Point) -> Point {
        (logical - self.offset.to_vector()) * self.scale()
    }

    /// Pixel value under a logical point, `None` outside the buffer.
    pub fn sample(&self, logical: Point) -> Option<f32> {
        let p = self.logical_to_pixel(logical);
        if p.x < 0.0 || p.y < 0.0 {
            return None;
        }
        let col = p.x.floor() as usize;
        let row = p.y.floor() as usize;
        self.data.get([row, col]).copied()
    }
}
