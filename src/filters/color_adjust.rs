//! Color adjustment filters: Negative.

use crate::buffer::{PixelBuffer, CHANNEL_MAX};

/// Invert image colors in place: each channel becomes `255 - channel`.
pub fn negative(buffer: &mut PixelBuffer) {
    buffer.map_in_place(|c| c.map(|v| CHANNEL_MAX - v));
}
