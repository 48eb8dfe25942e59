//! Grayscale conversion filter.
//!
//! Uses ITU-R BT.601 luma coefficients. Per-pixel and neighbor-independent,
//! so it rewrites the buffer in place.

use crate::buffer::{Color, PixelBuffer, CHANNEL_MAX};

/// ITU-R BT.601 luma coefficients
const LUMA_R: f32 = 0.299;
const LUMA_G: f32 = 0.587;
const LUMA_B: f32 = 0.114;

/// Weighted luma of one color, not clamped.
#[inline]
pub fn luma(c: Color) -> f32 {
    LUMA_R * c.r + LUMA_G * c.g + LUMA_B * c.b
}

/// Replace every pixel with its luma on all three channels.
///
/// Each channel becomes `min(255, 0.299 R + 0.587 G + 0.114 B)`.
pub fn greyscale(buffer: &mut PixelBuffer) {
    buffer.map_in_place(|c| Color::grey(luma(c).min(CHANNEL_MAX)));
}
