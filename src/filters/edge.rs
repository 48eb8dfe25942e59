//! Edge detection filter.
//!
//! Converts to greyscale, runs the 4-neighbor Laplacian
//! (`4 * center - up - down - left - right`, clamp-to-edge), clamps it to
//! `[0, 255]` and thresholds the result. Output is strictly black or white.

use crate::buffer::{Color, PixelBuffer, CHANNEL_MAX, CHANNEL_MIN};

use super::core::cross_stencil;
use super::grayscale::greyscale;

const EDGE_CENTER: f32 = 4.0;

/// Apply Laplacian edge detection.
///
/// # Arguments
/// * `buffer` - Input image; converted to greyscale in place before the stencil runs
/// * `threshold` - Fraction of 255. Pixels whose response is strictly greater
///   than `threshold * 255` become white, all others black.
///
/// # Returns
/// Binary image with the same dimensions
pub fn edge_detection(mut buffer: PixelBuffer, threshold: f64) -> PixelBuffer {
    greyscale(&mut buffer);

    let cutoff = threshold * CHANNEL_MAX as f64;
    let (width, height) = buffer.dimensions();
    PixelBuffer::from_fn(width, height, |row, col| {
        // Greyscale input: all channels carry the same response.
        let response = cross_stencil(&buffer, row, col, EDGE_CENTER)
            .r
            .clamp(CHANNEL_MIN, CHANNEL_MAX);
        if response as f64 > cutoff {
            Color::WHITE
        } else {
            Color::BLACK
        }
    })
}
