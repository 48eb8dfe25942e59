//! Sharpen filter.
//!
//! Kernel:
//! ```text
//!  0 -1  0
//! -1  5 -1
//!  0 -1  0
//! ```
//! applied per channel with clamp-to-edge neighbors.

use crate::buffer::PixelBuffer;

use super::core::cross_stencil;

const SHARP_CENTER: f32 = 5.0;

/// Apply the 5-point sharpening kernel, clamping results to `[0, 255]`.
pub fn sharpen(input: &PixelBuffer) -> PixelBuffer {
    let (width, height) = input.dimensions();
    PixelBuffer::from_fn(width, height, |row, col| {
        cross_stencil(input, row, col, SHARP_CENTER).clamped()
    })
}
