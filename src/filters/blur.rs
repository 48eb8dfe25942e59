//! Gaussian blur.
//!
//! Separable 2-pass convolution: first along each column (vertical
//! neighbors), then along each row. Both passes use clamp-to-edge addressing
//! and write to fresh buffers; only the final result is clamped to `[0, 255]`.

use crate::buffer::{Color, PixelBuffer};

use super::core::gaussian_kernel_folded;

/// Apply Gaussian blur.
///
/// # Arguments
/// * `input` - Source image
/// * `sigma` - Standard deviation of the Gaussian; must be non-zero
///
/// # Returns
/// Blurred image with same dimensions
pub fn gaussian_blur(input: &PixelBuffer, sigma: f64) -> PixelBuffer {
    let (width, height) = input.dimensions();
    if input.is_empty() {
        return input.clone();
    }

    // Taps past the image extent all clamp onto the edge pixel.
    let kernel_v = gaussian_kernel_folded(sigma, height - 1);
    let kernel_h = gaussian_kernel_folded(sigma, width - 1);

    // Vertical pass
    let half = (kernel_v.len() / 2) as isize;
    let columns = PixelBuffer::from_fn(width, height, |row, col| {
        let mut sum = Color::BLACK;
        for (ki, &kv) in kernel_v.iter().enumerate() {
            let sy = input.clamp_row(row as isize + ki as isize - half);
            sum += input.get(sy, col) * kv;
        }
        sum
    });

    // Horizontal pass
    let half = (kernel_h.len() / 2) as isize;
    PixelBuffer::from_fn(width, height, |row, col| {
        let mut sum = Color::BLACK;
        for (ki, &kv) in kernel_h.iter().enumerate() {
            let sx = columns.clamp_col(col as isize + ki as isize - half);
            sum += columns.get(row, sx) * kv;
        }
        sum.clamped()
    })
}
