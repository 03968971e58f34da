use std::sync::Arc;

use nebula_core::geometry::{size, Size};
use nebula_core::image::Image;
use nebula_core::session::Session;
use nebula_core::viewport::ViewportId;

#[allow(dead_code)]
pub const SCREEN: Size = Size {
    width: 640.0,
    height: 480.0,
};

/// Blank image with an optional physical scale hint.
pub fn image(width: usize, height: usize, scale: Option<f64>) -> Arc<Image> {
    let img = Image::blank(width, height).unwrap();
    let img = match scale {
        Some(s) => img.with_physical_scale(s).unwrap(),
        None => img,
    };
    Arc::new(img)
}

/// Default session with one viewport per `(width, height, scale)` entry.
#[allow(dead_code)]
pub fn session_with(specs: &[(usize, usize, Option<f64>)]) -> (Session, Vec<ViewportId>) {
    let mut session = Session::default();
    let ids = specs
        .iter()
        .map(|&(w, h, scale)| session.add_image(image(w, h, scale), SCREEN).unwrap())
        .collect();
    (session, ids)
}

/// Screen sizes differ on purpose so sync cannot rely on equal viewports.
#[allow(dead_code)]
pub fn uneven_session(count: usize) -> (Session, Vec<ViewportId>) {
    let mut session = Session::default();
    let ids = (0..count)
        .map(|i| {
            let screen = size(320.0 + 80.0 * i as f64, 240.0 + 40.0 * i as f64);
            session
                .add_image(image(800 - 100 * i, 600 - 50 * i, None), screen)
                .unwrap()
        })
        .collect();
    (session, ids)
}
