use std::path::Path;

use anyhow::{Context, Result};
use ndarray::Array2;
use nebula_core::image::Image;

/// Decode an image file to normalized luminance.
///
/// The file stem becomes the image name. `scale` is the physical scale in
/// pixels per logical unit; `None` leaves the image at one pixel per unit.
pub fn load_image(path: &Path, scale: Option<f64>) -> Result<Image> {
    let img = image::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    let gray = img.to_luma16();
    let (w, h) = gray.dimensions();

    let data = Array2::from_shape_fn((h as usize, w as usize), |(row, col)| {
        gray.get_pixel(col as u32, row as u32).0[0] as f32 / 65535.0
    });

    let mut image = Image::new(data)?;
    if let Some(scale) = scale {
        image = image.with_physical_scale(scale)?;
    }
    if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
        image = image.with_name(stem);
    }
    Ok(image)
}

/// Blank image for scripts that only describe dimensions.
pub fn blank_image(width: usize, height: usize, scale: Option<f64>) -> Result<Image> {
    let mut image = Image::blank(width, height)?;
    if let Some(scale) = scale {
        image = image.with_physical_scale(scale)?;
    }
    Ok(image)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, Luma};

    #[test]
    fn test_load_png_keeps_dimensions_and_name() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("capture_a.png");
        let mut img = GrayImage::new(6, 4);
        img.put_pixel(5, 3, Luma([255]));
        img.save(&path).unwrap();

        let loaded = load_image(&path, Some(2.0)).unwrap();
        assert_eq!(loaded.width(), 6);
        assert_eq!(loaded.height(), 4);
        assert_eq!(loaded.name(), Some("capture_a"));
        assert_eq!(loaded.physical_scale(), Some(2.0));
        assert_eq!(loaded.data()[[3, 5]], 1.0);
        assert_eq!(loaded.data()[[0, 0]], 0.0);
    }

    #[test]
    fn test_bad_scale_is_rejected() {
        assert!(blank_image(4, 4, Some(0.0)).is_err());
        assert!(blank_image(0, 4, None).is_err());
    }
}
