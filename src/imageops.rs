mod distance;
pub mod key_background;

pub use distance::{color_distance, MAX_COLOR_DISTANCE};
pub use key_background::{is_background, KeyBackground, KeyStats};

use image::{DynamicImage, RgbaImage};

/// Normalizes any decoded image to 8-bit RGBA.
///
/// Formats without an alpha channel come out fully opaque; formats that
/// already carry alpha keep it.
pub fn into_keyable(image: DynamicImage) -> RgbaImage {
    match image {
        DynamicImage::ImageRgba8(buffer) => buffer,
        other => other.into_rgba8(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, Luma, Rgb, RgbImage, Rgba};

    #[test]
    fn test_rgb_input_becomes_opaque_rgba() {
        let image = DynamicImage::ImageRgb8(RgbImage::from_pixel(3, 2, Rgb([10, 20, 30])));
        let rgba = into_keyable(image);

        assert_eq!(rgba.dimensions(), (3, 2));
        assert!(rgba.pixels().all(|p| *p == Rgba([10, 20, 30, 255])));
    }

    #[test]
    fn test_existing_alpha_is_kept() {
        let mut buffer = RgbaImage::from_pixel(2, 2, Rgba([1, 2, 3, 255]));
        buffer.put_pixel(1, 1, Rgba([1, 2, 3, 77]));
        let rgba = into_keyable(DynamicImage::ImageRgba8(buffer));

        assert_eq!(*rgba.get_pixel(1, 1), Rgba([1, 2, 3, 77]));
    }

    #[test]
    fn test_grayscale_expands_to_rgb_channels() {
        let image = DynamicImage::ImageLuma8(GrayImage::from_pixel(1, 1, Luma([128])));
        let rgba = into_keyable(image);

        assert_eq!(*rgba.get_pixel(0, 0), Rgba([128, 128, 128, 255]));
    }
}
