use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use nebula_core::geometry::{size, Point, Size};
use nebula_core::image::Image;
use nebula_core::session::InputEvent;
use serde::Deserialize;

use crate::loader;

const DEFAULT_SCREEN: (f64, f64) = (640.0, 480.0);

/// A scripted interaction: the viewports to open and the events to feed them.
#[derive(Debug, Deserialize)]
pub struct Script {
    #[serde(default, rename = "viewport")]
    pub viewports: Vec<ViewportSpec>,
    #[serde(default, rename = "event")]
    pub events: Vec<InputEvent>,
}

#[derive(Debug, Deserialize)]
pub struct ViewportSpec {
    /// Image file, resolved relative to the script.
    pub image: Option<PathBuf>,
    pub width: Option<usize>,
    pub height: Option<usize>,
    /// Pixels per logical unit.
    pub scale: Option<f64>,
    /// Logical position of the image's top-left corner.
    pub offset: Option<Point>,
    pub screen_width: Option<f64>,
    pub screen_height: Option<f64>,
}

impl ViewportSpec {
    pub fn screen_size(&self) -> Size {
        size(
            self.screen_width.unwrap_or(DEFAULT_SCREEN.0),
            self.screen_height.unwrap_or(DEFAULT_SCREEN.1),
        )
    }

    pub fn load(&self, base: &Path) -> Result<Arc<Image>> {
        let mut image = match (&self.image, self.width, self.height) {
            (Some(path), None, None) => loader::load_image(&base.join(path), self.scale)?,
            (None, Some(w), Some(h)) => loader::blank_image(w, h, self.scale)?,
            _ => bail!("viewport needs either `image` or both `width` and `height`"),
        };
        if let Some(offset) = self.offset {
            image = image.with_offset(offset)?;
        }
        Ok(Arc::new(image))
    }
}

impl Script {
    pub fn parse(text: &str) -> Result<Self> {
        toml::from_str(text).context("Invalid replay script")
    }

    pub fn read(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read script {}", path.display()))?;
        Self::parse(&contents).with_context(|| format!("In {}", path.display()))
    }
}
