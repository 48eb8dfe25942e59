//! Core utilities shared by several filters.
//!
//! This module provides:
//! - Gaussian kernel generation
//! - The 5-point cross (Laplacian-style) stencil used by sharpen and edge detection
//! - Wrap-around index arithmetic for the distortion filters

use crate::buffer::{Color, PixelBuffer};

/// Largest sigma GaussianBlur accepts; its kernel has 60001 taps.
pub const MAX_SIGMA: f64 = 10_000.0;

/// Generate the 1D Gaussian kernel used by [`super::blur::gaussian_blur`].
///
/// Kernel length is `floor(6 * |sigma|) + 1`, bumped to the next odd number,
/// so the kernel spans about three standard deviations on each side. Weights
/// follow the normal density `exp(-k^2 / 2s^2) / sqrt(2 pi s^2)` and are then
/// normalized so they sum to one; a uniform image stays uniform for every
/// sigma, including tiny ones where the sampled density is far from 1.
///
/// # Arguments
/// * `sigma` - Standard deviation of the Gaussian, limited to [`MAX_SIGMA`]
///
/// # Returns
/// Normalized, symmetric kernel of odd length. `sigma == 0` yields `[1.0]`.
pub fn gaussian_kernel_1d(sigma: f64) -> Vec<f32> {
    kernel_weights(sigma).into_iter().map(|w| w as f32).collect()
}

/// Gaussian kernel whose half-width is at most `max_half`.
///
/// Under clamp-to-edge addressing along an axis of `max_half + 1` pixels,
/// every offset beyond `±max_half` reads the same edge pixel as the
/// outermost tap, so the tail weights are added onto those taps. The result
/// gives the same blur as the full kernel.
pub fn gaussian_kernel_folded(sigma: f64, max_half: usize) -> Vec<f32> {
    let mut weights = kernel_weights(sigma);
    let half = weights.len() / 2;
    if half > max_half {
        let cut = half - max_half;
        let low: f64 = weights[..cut].iter().sum();
        let high: f64 = weights[weights.len() - cut..].iter().sum();
        weights.truncate(weights.len() - cut);
        weights.drain(..cut);
        let last = weights.len() - 1;
        weights[0] += low;
        weights[last] += high;
    }
    weights.into_iter().map(|w| w as f32).collect()
}

/// Normalized kernel weights in f64.
fn kernel_weights(sigma: f64) -> Vec<f64> {
    let sigma = sigma.abs().min(MAX_SIGMA);
    if sigma == 0.0 || !sigma.is_finite() {
        return vec![1.0];
    }

    // sigma <= MAX_SIGMA keeps this far below usize::MAX
    let mut len = (6.0 * sigma).floor() as usize + 1;
    if len % 2 == 0 {
        len += 1;
    }
    let half = (len / 2) as f64;

    let variance = sigma * sigma;
    let denom = (2.0 * std::f64::consts::PI * variance).sqrt();
    let weights: Vec<f64> = (0..len)
        .map(|i| {
            let k = i as f64 - half;
            (-k * k / (2.0 * variance)).exp() / denom
        })
        .collect();

    // Normalize
    let sum: f64 = weights.iter().sum();
    weights.into_iter().map(|w| w / sum).collect()
}

/// `center_weight * c - up - down - left - right` at `(row, col)` with
/// clamp-to-edge neighbors. The result is not clamped.
#[inline]
pub fn cross_stencil(input: &PixelBuffer, row: usize, col: usize, center_weight: f32) -> Color {
    let (r, c) = (row as isize, col as isize);
    input.get(row, col) * center_weight
        - input.get_clamped(r - 1, c)
        - input.get_clamped(r + 1, c)
        - input.get_clamped(r, c - 1)
        - input.get_clamped(r, c + 1)
}

/// Euclidean `value mod len`, always in `[0, len)`. `len` must be non-zero.
#[inline]
pub fn wrap_index(value: i64, len: usize) -> usize {
    value.rem_euclid(len as i64) as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kernel_length_is_odd() {
        // 6 * 0.5 = 3 -> 4 -> 5
        assert_eq!(gaussian_kernel_1d(0.5).len(), 5);
        // 6 * 1.0 = 6 -> 7
        assert_eq!(gaussian_kernel_1d(1.0).len(), 7);
        // 6 * 0.1 = 0.6 -> 1
        assert_eq!(gaussian_kernel_1d(0.1).len(), 1);
        assert_eq!(gaussian_kernel_1d(2.3).len(), 15);
    }

    #[test]
    fn test_kernel_sums_to_one() {
        for sigma in [0.05, 0.3, 0.5, 1.0, 1.7, 4.0, 10.0] {
            let sum: f32 = gaussian_kernel_1d(sigma).iter().sum();
            assert!((sum - 1.0).abs() < 1e-5, "sigma={sigma} sum={sum}");
        }
    }

    #[test]
    fn test_kernel_values_sigma_half() {
        let k = gaussian_kernel_1d(0.5);
        let expected = [0.000_263_87, 0.106_450_77, 0.786_570_7, 0.106_450_77, 0.000_263_87];
        for (got, want) in k.iter().zip(expected) {
            assert!((got - want).abs() < 1e-6, "got {got}, want {want}");
        }
    }

    #[test]
    fn test_kernel_negative_sigma_matches_positive() {
        assert_eq!(gaussian_kernel_1d(-1.5), gaussian_kernel_1d(1.5));
    }

    #[test]
    fn test_kernel_huge_sigma_is_bounded() {
        let k = gaussian_kernel_1d(1e20);
        assert_eq!(k.len(), gaussian_kernel_1d(MAX_SIGMA).len());
        assert_eq!(k.len(), 60_001);
        assert_eq!(gaussian_kernel_1d(f64::INFINITY), vec![1.0]);
    }

    #[test]
    fn test_kernel_folded_keeps_mass() {
        let full = gaussian_kernel_1d(1.0);
        let folded = gaussian_kernel_folded(1.0, 1);
        assert_eq!(folded.len(), 3);
        let sum: f32 = folded.iter().sum();
        assert!((sum - 1.0).abs() < 1e-5);
        // centre untouched, edges absorb the tails
        assert_eq!(folded[1], full[3]);
        assert!((folded[0] - full[..3].iter().sum::<f32>()).abs() < 1e-6);
        assert!((folded[2] - full[4..].iter().sum::<f32>()).abs() < 1e-6);

        // no folding needed
        assert_eq!(gaussian_kernel_folded(1.0, 10), full);
        assert_eq!(gaussian_kernel_folded(2.0, 0), vec![1.0]);
    }

    #[test]
    fn test_cross_stencil_clamps_at_corner() {
        let mut buf = PixelBuffer::new(2, 2);
        buf.set(0, 0, Color::grey(10.0));
        buf.set(0, 1, Color::grey(1.0));
        buf.set(1, 0, Color::grey(2.0));
        // up and left clamp onto the center itself
        let v = cross_stencil(&buf, 0, 0, 5.0);
        assert_eq!(v, Color::grey(50.0 - 10.0 - 2.0 - 10.0 - 1.0));
    }

    #[test]
    fn test_wrap_index_negative() {
        assert_eq!(wrap_index(-1, 5), 4);
        assert_eq!(wrap_index(-5, 5), 0);
        assert_eq!(wrap_index(7, 5), 2);
        assert_eq!(wrap_index(3, 5), 3);
    }
}
