use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{NebulaError, Result};
use crate::geometry::{Point, Rect, Size, Vector};
use crate::image::Image;
use crate::transform::{CoordinateTransform, ZoomLimits};

/// Handle of a viewport inside a session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ViewportId(pub u32);

impl fmt::Display for ViewportId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One image on screen: the bound image, its transform and the on-screen size.
#[derive(Clone, Debug)]
pub struct ViewportState {
    id: ViewportId,
    image: Arc<Image>,
    transform: CoordinateTransform,
    screen_size: Size,
}

impl ViewportState {
    /// Create a viewport showing the image at native resolution, top-left aligned.
    pub fn new(
        id: ViewportId,
        image: Arc<Image>,
        screen_size: Size,
        limits: ZoomLimits,
    ) -> Result<Self> {
        check_screen_size(screen_size)?;
        let transform = CoordinateTransform::new(1.0 / image.scale(), Point::ORIGIN, limits)?;
        Ok(Self {
            id,
            image,
            transform,
            screen_size,
        })
    }

    pub fn id(&self) -> ViewportId {
        self.id
    }

    pub fn image(&self) -> &Arc<Image> {
        &self.image
    }

    pub fn transform(&self) -> &CoordinateTransform {
        &self.transform
    }

    pub fn zoom(&self) -> f64 {
        self.transform.zoom()
    }

    pub fn pan(&self) -> Point {
        self.transform.pan()
    }

    pub fn screen_size(&self) -> Size {
        self.screen_size
    }

    pub fn to_screen(&self, logical: Point) -> Point {
        self.transform.to_screen(logical)
    }

    pub fn to_image(&self, screen: Point) -> Point {
        self.transform.to_image(screen)
    }

    /// Zoom at which one image pixel covers one screen pixel.
    pub fn native_zoom(&self) -> f64 {
        1.0 / self.image.scale()
    }

    pub fn screen_rect(&self) -> Rect {
        Rect::from_min_size(Point::ORIGIN, self.screen_size)
    }

    /// Logical-space rectangle currently on screen.
    pub fn visible_logical_rect(&self) -> Rect {
        Rect {
            min: self.transform.to_image(Point::ORIGIN),
            max: self
                .transform
                .to_image(Point::ORIGIN + self.screen_size.to_vector()),
        }
    }

    pub fn image_logical_rect(&self) -> Rect {
        self.image.logical_rect()
    }

    /// Where the image bounds land on screen.
    pub fn image_screen_rect(&self) -> Rect {
        let r = self.image_logical_rect();
        Rect {
            min: self.transform.to_screen(r.min),
            max: self.transform.to_screen(r.max),
        }
    }

    /// False when the image lies entirely outside the visible area.
    pub fn shows_image(&self) -> bool {
        self.visible_logical_rect()
            .intersects(&self.image_logical_rect())
    }

    pub fn logical_to_pixel(&self, logical: Point) -> Point {
        self.image.logical_to_pixel(logical)
    }

    pub fn pixel_to_logical(&self, pixel: Point) -> Point {
        self.image.pixel_to_logical(pixel)
    }

    pub fn resize(&mut self, screen_size: Size) -> Result<()> {
        check_screen_size(screen_size)?;
        self.screen_size = screen_size;
        Ok(())
    }

    pub fn set_zoom(&mut self, zoom: f64) -> Result<f64> {
        self.transform.set_zoom(zoom)
    }

    pub fn set_pan(&mut self, pan: Point) -> Result<()> {
        self.transform.set_pan(pan)
    }

    pub fn zoom_at(&mut self, screen_anchor: Point, factor_delta: f64) -> Result<()> {
        self.transform.zoom_at(screen_anchor, factor_delta)
    }

    pub fn zoom_about_logical(&mut self, logical_anchor: Point, zoom: f64) -> Result<()> {
        self.transform.zoom_about_logical(logical_anchor, zoom)
    }

    pub fn pan_by(&mut self, screen_delta: Vector) -> Result<()> {
        self.transform.pan_by(screen_delta)
    }

    /// Place the image at a new logical offset. The transform is unchanged,
    /// so the image moves on screen while markers stay put.
    pub fn set_image_offset(&mut self, offset: Point) -> Result<()> {
        Arc::make_mut(&mut self.image).set_offset(offset)
    }

    /// Zoom so the whole image fits the screen, centred.
    pub fn fit_to_view(&mut self) -> Result<()> {
        let logical = self.image.logical_size();
        let fit_x = logical.width / self.screen_size.width;
        let fit_y = logical.height / self.screen_size.height;
        let zoom = self.transform.set_zoom(fit_x.max(fit_y))?;
        let screen_center = self.screen_rect().center();
        let pan = self.image_logical_rect().center() - screen_center.to_vector() * zoom;
        self.transform.set_pan(pan)
    }
}

fn check_screen_size(screen_size: Size) -> Result<()> {
    if screen_size.is_positive() {
        Ok(())
    } else {
        Err(NebulaError::DegenerateTransform(format!(
            "viewport screen size must be positive, got {}x{}",
            screen_size.width, screen_size.height
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{point, size, vector};

    fn viewport(w: usize, h: usize, scale: f64, screen: Size) -> ViewportState {
        let image = Image::blank(w, h).unwrap().with_physical_scale(scale).unwrap();
        ViewportState::new(ViewportId(0), Arc::new(image), screen, ZoomLimits::default()).unwrap()
    }

    #[test]
    fn test_new_viewport_starts_at_native_zoom() {
        let vp = viewport(800, 600, 2.0, size(400.0, 300.0));
        assert_eq!(vp.zoom(), 0.5);
        assert_eq!(vp.pan(), Point::ORIGIN);
    }

    #[test]
    fn test_visible_logical_rect() {
        let mut vp = viewport(100, 100, 1.0, size(200.0, 100.0));
        vp.set_zoom(0.5).unwrap();
        vp.set_pan(point(10.0, 20.0)).unwrap();
        let r = vp.visible_logical_rect();
        assert_eq!(r.min, point(10.0, 20.0));
        assert_eq!(r.max, point(110.0, 70.0));
    }

    #[test]
    fn test_image_screen_rect_follows_transform() {
        let mut vp = viewport(400, 300, 2.0, size(640.0, 480.0));
        vp.set_zoom(0.25).unwrap();
        let r = vp.image_screen_rect();
        assert_eq!(r.min, point(0.0, 0.0));
        assert_eq!(r.max, point(800.0, 600.0));
    }

    #[test]
    fn test_shows_image_false_when_panned_away() {
        let mut vp = viewport(100, 100, 1.0, size(50.0, 50.0));
        assert!(vp.shows_image());
        vp.pan_by(vector(1000.0, 0.0)).unwrap();
        assert!(!vp.shows_image());
    }

    #[test]
    fn test_fit_to_view_centres_image() {
        let mut vp = viewport(400, 100, 1.0, size(200.0, 200.0));
        vp.fit_to_view().unwrap();
        assert_eq!(vp.zoom(), 2.0);
        let r = vp.image_screen_rect();
        assert!(r.min.approx_eq(point(0.0, 75.0), 1e-9));
        assert!(r.max.approx_eq(point(200.0, 125.0), 1e-9));
    }

    #[test]
    fn test_resize_rejects_empty_size() {
        let mut vp = viewport(10, 10, 1.0, size(10.0, 10.0));
        assert!(vp.resize(size(0.0, 10.0)).is_err());
        vp.resize(size(20.0, 30.0)).unwrap();
        assert_eq!(vp.screen_size(), size(20.0, 30.0));
    }

    #[test]
    fn test_image_offset_moves_image_not_view() {
        let mut vp = viewport(100, 50, 2.0, size(100.0, 100.0));
        vp.set_image_offset(point(10.0, 5.0)).unwrap();
        assert_eq!(vp.pan(), Point::ORIGIN);
        assert_eq!(vp.image_logical_rect().min, point(10.0, 5.0));
        assert_eq!(vp.image_screen_rect().min, point(20.0, 10.0));
        assert_eq!(vp.logical_to_pixel(point(10.0, 5.0)), Point::ORIGIN);
    }
}
