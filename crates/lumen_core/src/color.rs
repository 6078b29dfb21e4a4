//! RGB color helpers.
//!
//! Colors are plain `Vec3`s in linear space, one float per channel.

use lumen_math::Vec3;

/// Color type alias (RGB values typically 0-1)
pub type Color = Vec3;

/// Named colors used by the demo scenes.
pub mod colors {
    use super::Color;

    pub const RED: Color = Color::new(1.0, 0.0, 0.0);
    pub const GREEN: Color = Color::new(0.0, 1.0, 0.0);
    pub const BLUE: Color = Color::new(0.0, 0.0, 1.0);
    pub const YELLOW: Color = Color::new(1.0, 1.0, 0.0);
    pub const CYAN: Color = Color::new(0.0, 1.0, 1.0);
    pub const MAGENTA: Color = Color::new(1.0, 0.0, 1.0);
    pub const WHITE: Color = Color::new(1.0, 1.0, 1.0);
    pub const BLACK: Color = Color::new(0.0, 0.0, 0.0);
    pub const GRAY: Color = Color::new(0.5, 0.5, 0.5);
}

/// Scale a color down so its brightest channel is at most one.
///
/// Keeps the hue of over-exposed pixels instead of clipping each channel.
#[inline]
pub fn max_to_one(color: Color) -> Color {
    let max = color.max_element();
    if max > 1.0 {
        color / max
    } else {
        color
    }
}

/// Pack a color into `0x00RRGGBB`, clamping each channel to [0, 1].
#[inline]
pub fn pack_rgb(color: Color) -> u32 {
    let c = color.clamp(Vec3::ZERO, Vec3::ONE) * 255.0;
    ((c.x as u32) << 16) | ((c.y as u32) << 8) | (c.z as u32)
}

/// Unpack a `0x00RRGGBB` pixel into its 8-bit channels.
#[inline]
pub fn unpack_rgb(pixel: u32) -> [u8; 3] {
    [(pixel >> 16) as u8, (pixel >> 8) as u8, pixel as u8]
}
