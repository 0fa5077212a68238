use image::{Pixel, Rgb, RgbaImage};

use crate::imageops::color_distance;

/// Summary of one keying pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyStats {
    /// RGB of pixel (0,0) before the pass.
    pub reference: [u8; 3],
    /// Pixels classified as background (alpha forced to 0).
    pub keyed: u64,
    pub total: u64,
}

/// Background classification for a pixel at `distance` from the reference.
///
/// Exact matches are always background, so a threshold of 0 keys only
/// pixels identical to the reference.
pub const fn is_background(distance: u32, threshold: u32) -> bool {
    distance < threshold || distance == 0
}

pub trait KeyBackground {
    /// RGB of the top-left pixel, alpha ignored. `None` for an empty image.
    fn reference_color(&self) -> Option<Rgb<u8>>;

    /// Zeroes the alpha of every pixel close enough to the reference color.
    ///
    /// RGB channels are never touched and non-background pixels keep their
    /// alpha. Returns `None` when the image has no pixel (0,0).
    fn key_background(&mut self, threshold: u32) -> Option<KeyStats>;
}

impl KeyBackground for RgbaImage {
    fn reference_color(&self) -> Option<Rgb<u8>> {
        self.get_pixel_checked(0, 0).map(|pixel| pixel.to_rgb())
    }

    fn key_background(&mut self, threshold: u32) -> Option<KeyStats> {
        // sampled once, before any pixel is rewritten
        let reference = self.reference_color()?;

        let mut keyed = 0;
        for pixel in self.pixels_mut() {
            let distance = color_distance(&pixel.to_rgb(), &reference);
            if is_background(distance, threshold) {
                pixel.0[3] = 0;
                keyed += 1;
            }
        }

        Some(KeyStats {
            reference: reference.0,
            keyed,
            total: u64::from(self.width()) * u64::from(self.height()),
        })
    }
}
