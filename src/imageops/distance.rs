use image::Rgb;

/// Largest possible distance between two 8-bit RGB colors (3 * 255).
pub const MAX_COLOR_DISTANCE: u32 = 765;

/// Sum of absolute per-channel differences between two RGB colors.
pub fn color_distance(a: &Rgb<u8>, b: &Rgb<u8>) -> u32 {
    a.0.iter()
        .zip(b.0.iter())
        .map(|(&x, &y)| u32::from(x.abs_diff(y)))
        .sum()
}
