//! Fixed 10%-per-edge border trim, stretched back to the source size.

use crate::error::{GenerationError, Result};
use image::imageops::FilterType;
use image::DynamicImage;

pub const CROP_INSET: f64 = 0.1;
pub const CROP_SPAN: f64 = 0.8;

/// Source rectangle in (possibly fractional) pixel units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CropRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl CropRect {
    pub fn for_dimensions(width: u32, height: u32) -> Self {
        let (w, h) = (width as f64, height as f64);
        Self {
            x: w * CROP_INSET,
            y: h * CROP_INSET,
            width: w * CROP_SPAN,
            height: h * CROP_SPAN,
        }
    }

    /// Snap to whole pixels, keeping at least one pixel inside the source bounds.
    pub fn to_pixels(&self, source_width: u32, source_height: u32) -> (u32, u32, u32, u32) {
        let x = (self.x.round() as u32).min(source_width.saturating_sub(1));
        let y = (self.y.round() as u32).min(source_height.saturating_sub(1));
        let width = (self.width.round() as u32).clamp(1, (source_width - x).max(1));
        let height = (self.height.round() as u32).clamp(1, (source_height - y).max(1));
        (x, y, width, height)
    }
}

/// Crop the centred 80% of `source` and stretch it to fill the original dimensions.
pub fn crop_and_stretch(source: &DynamicImage) -> Result<DynamicImage> {
    let (width, height) = (source.width(), source.height());
    if width == 0 || height == 0 {
        return Err(GenerationError::Decode("bitmap has no pixels".into()));
    }

    let rect = CropRect::for_dimensions(width, height);
    let (x, y, crop_width, crop_height) = rect.to_pixels(width, height);
    log::debug!(
        "Cropping {}x{} at ({:.1}, {:.1}) size {:.1}x{:.1} -> {}x{}",
        width,
        height,
        rect.x,
        rect.y,
        rect.width,
        rect.height,
        width,
        height
    );

    let cropped = source.crop_imm(x, y, crop_width, crop_height);
    Ok(cropped.resize_exact(width, height, FilterType::Triangle))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    #[test]
    fn test_crop_rect_portrait() {
        let rect = CropRect::for_dimensions(768, 1024);
        assert!((rect.x - 76.8).abs() < 1e-9);
        assert!((rect.y - 102.4).abs() < 1e-9);
        assert!((rect.width - 614.4).abs() < 1e-9);
        assert!((rect.height - 819.2).abs() < 1e-9);
    }

    #[test]
    fn test_crop_rect_is_ten_percent_inset() {
        for (w, h) in [(1024, 1024), (1280, 720), (1920, 823), (3, 7)] {
            let rect = CropRect::for_dimensions(w, h);
            assert!((rect.x - 0.1 * w as f64).abs() < 1e-9);
            assert!((rect.y - 0.1 * h as f64).abs() < 1e-9);
            assert!((rect.width - 0.8 * w as f64).abs() < 1e-9);
            assert!((rect.height - 0.8 * h as f64).abs() < 1e-9);
        }
    }

    #[test]
    fn test_to_pixels_stays_in_bounds() {
        assert_eq!(CropRect::for_dimensions(1, 1).to_pixels(1, 1), (0, 0, 1, 1));
        assert_eq!(
            CropRect::for_dimensions(1920, 823).to_pixels(1920, 823),
            (192, 82, 1536, 658)
        );
    }

    #[test]
    fn test_output_matches_source_size_and_drops_border() {
        let mut source = RgbaImage::from_pixel(20, 10, Rgba([255, 0, 0, 255]));
        for y in 1..9 {
            for x in 2..18 {
                source.put_pixel(x, y, Rgba([0, 0, 255, 255]));
            }
        }

        let out = crop_and_stretch(&DynamicImage::ImageRgba8(source)).unwrap();
        assert_eq!((out.width(), out.height()), (20, 10));

        for pixel in out.to_rgba8().pixels() {
            assert!(pixel[0] <= 5, "border leaked into crop: {:?}", pixel);
            assert!(pixel[2] >= 250);
        }
    }

    #[test]
    fn test_empty_bitmap_rejected() {
        let empty = DynamicImage::ImageRgba8(RgbaImage::new(0, 0));
        assert!(crop_and_stretch(&empty).is_err());
    }
}
