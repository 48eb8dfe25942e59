//! Distortion filters: Sinus, Glass.
//!
//! Both are gather remaps: every output pixel pulls its color from a
//! displaced source coordinate in the input. Source coordinates wrap around
//! the image with Euclidean modulo, so negative displacements land on the
//! opposite edge instead of producing negative indices.

use rand::Rng;

use crate::buffer::PixelBuffer;

use super::core::wrap_index;

/// Apply a sinusoidal ripple.
///
/// For target `(i, j)` the shift is `d = wave * sin(i / wave) * sin(j / wave)`
/// and the pixel is read from `(trunc(i + d) mod height, trunc(j + d) mod width)`.
///
/// # Arguments
/// * `input` - Source image
/// * `wave` - Ripple period and amplitude; sign is ignored, must be non-zero
pub fn sinus_distortion(input: &PixelBuffer, wave: f64) -> PixelBuffer {
    let wave = wave.abs();
    let (width, height) = input.dimensions();

    PixelBuffer::from_fn(width, height, |row, col| {
        let (i, j) = (row as f64, col as f64);
        let shift = wave * (i / wave).sin() * (j / wave).sin();
        let src_row = wrap_index((i + shift) as i64, height);
        let src_col = wrap_index((j + shift) as i64, width);
        input.get(src_row, src_col)
    })
}

/// Apply a frosted-glass scatter.
///
/// Each target pixel draws two independent integers in `[0, trunc(|radius|)]`
/// from `rng`, first the column offset, then the row offset, and reads from
/// the wrapped displaced coordinate. Draws happen in row-major order, so a
/// seeded `rng` reproduces the same output.
///
/// # Arguments
/// * `input` - Source image
/// * `radius` - Maximum displacement in pixels; sign is ignored
/// * `rng` - Random source
pub fn glass_distortion<R: Rng>(input: &PixelBuffer, radius: f64, rng: &mut R) -> PixelBuffer {
    let reach = radius.abs() as i64;
    let (width, height) = input.dimensions();
    let mut output = PixelBuffer::new(width, height);

    for row in 0..height {
        for col in 0..width {
            let dx = rng.random_range(0..=reach);
            let dy = rng.random_range(0..=reach);
            let src_col = wrap_index(col as i64 + dx % width as i64, width);
            let src_row = wrap_index(row as i64 + dy % height as i64, height);
            output.set(row, col, input.get(src_row, src_col));
        }
    }

    output
}
