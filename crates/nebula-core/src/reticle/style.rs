use std::fmt;

use serde::{Deserialize, Serialize};

use crate::consts::{DEFAULT_RETICLE_OPACITY, DEFAULT_RETICLE_OPACITY_STEP};

/// 8-bit RGB colour.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const RED: Color = Color::rgb(255, 0, 0);
    pub const GREEN: Color = Color::rgb(0, 255, 0);
    pub const BLUE: Color = Color::rgb(0, 0, 255);
    pub const YELLOW: Color = Color::rgb(255, 255, 0);
    pub const CYAN: Color = Color::rgb(0, 255, 255);
    pub const MAGENTA: Color = Color::rgb(255, 0, 255);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

pub const DEFAULT_PALETTE: [Color; 6] = [
    Color::RED,
    Color::GREEN,
    Color::BLUE,
    Color::YELLOW,
    Color::CYAN,
    Color::MAGENTA,
];

/// Reticule appearance settings loaded from config.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReticleConfig {
    pub palette: Vec<Color>,
    /// Starting opacity in [0, 1).
    pub opacity: f64,
    pub opacity_step: f64,
    pub visible: bool,
}

impl Default for ReticleConfig {
    fn default() -> Self {
        Self {
            palette: DEFAULT_PALETTE.to_vec(),
            opacity: DEFAULT_RETICLE_OPACITY,
            opacity_step: DEFAULT_RETICLE_OPACITY_STEP,
            visible: true,
        }
    }
}

/// Renderer hints shared by every reticule. None of this affects projection.
#[derive(Clone, Debug, PartialEq)]
pub struct ReticleStyle {
    palette: Vec<Color>,
    color_index: usize,
    opacity: f64,
    opacity_step: f64,
    visible: bool,
}

impl Default for ReticleStyle {
    fn default() -> Self {
        Self::from_config(&ReticleConfig::default())
    }
}

impl ReticleStyle {
    /// An empty palette falls back to the default one.
    pub fn from_config(config: &ReticleConfig) -> Self {
        let palette = if config.palette.is_empty() {
            DEFAULT_PALETTE.to_vec()
        } else {
            config.palette.clone()
        };
        Self {
            palette,
            color_index: 0,
            opacity: config.opacity.clamp(0.0, 1.0),
            opacity_step: config.opacity_step,
            visible: config.visible,
        }
    }

    pub fn color(&self) -> Color {
        self.palette[self.color_index]
    }

    pub fn palette(&self) -> &[Color] {
        &self.palette
    }

    pub fn opacity(&self) -> f64 {
        self.opacity
    }

    /// Renderer hint only. Hidden markers keep tracking the pointer, so they
    /// reappear at the current position when shown again.
    pub fn visible(&self) -> bool {
        self.visible
    }

    /// Advance to the next palette colour, wrapping around.
    pub fn cycle_color(&mut self) -> Color {
        self.color_index = (self.color_index + 1) % self.palette.len();
        self.color()
    }

    /// Raise the opacity by one step, wrapping to zero past 1.0.
    pub fn cycle_opacity(&mut self) -> f64 {
        self.opacity = (self.opacity + self.opacity_step).rem_euclid(1.0);
        self.opacity
    }

    pub fn toggle_visibility(&mut self) -> bool {
        self.visible = !self.visible;
        self.visible
    }
}
