//! Floating-point pixel storage for one image.
//!
//! ## Layout
//!
//! Pixels live in an `Array3<f32>` of shape `(height, width, 3)` with the
//! channels in B, G, R order, the order they have on disk. Row 0 is the
//! *bottom* scanline of the picture (BMP bottom-up storage); every filter
//! keeps that convention.
//!
//! Filters talk to the buffer through a narrow interface: [`PixelBuffer::get`],
//! [`PixelBuffer::set`], the dimensions, and the clamp-to-edge helpers.
//! Neighbor-reading filters build a fresh buffer with [`PixelBuffer::from_fn`],
//! which evaluates rows in parallel against the untouched input.

use std::ops::{Add, AddAssign, Mul, Sub};

use ndarray::{s, Array3, ArrayView3, Axis};
use rayon::prelude::*;

use crate::error::{Error, Result};

/// Largest channel value.
pub const CHANNEL_MAX: f32 = 255.0;
/// Smallest channel value.
pub const CHANNEL_MIN: f32 = 0.0;
/// Samples per pixel.
pub const CHANNELS: usize = 3;

const B: usize = 0;
const G: usize = 1;
const R: usize = 2;

/// One color sample with three independent channels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub const BLACK: Color = Color::grey(CHANNEL_MIN);
    pub const WHITE: Color = Color::grey(CHANNEL_MAX);

    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Color { r, g, b }
    }

    /// Same value on all three channels.
    pub const fn grey(v: f32) -> Self {
        Color { r: v, g: v, b: v }
    }

    /// Apply `f` to every channel.
    #[inline]
    pub fn map(self, f: impl Fn(f32) -> f32) -> Self {
        Color {
            r: f(self.r),
            g: f(self.g),
            b: f(self.b),
        }
    }

    /// Clamp every channel to `[0, 255]`.
    #[inline]
    pub fn clamped(self) -> Self {
        self.map(|v| v.clamp(CHANNEL_MIN, CHANNEL_MAX))
    }
}

impl Add for Color {
    type Output = Color;

    #[inline]
    fn add(self, rhs: Color) -> Color {
        Color::new(self.r + rhs.r, self.g + rhs.g, self.b + rhs.b)
    }
}

impl AddAssign for Color {
    #[inline]
    fn add_assign(&mut self, rhs: Color) {
        *self = *self + rhs;
    }
}

impl Sub for Color {
    type Output = Color;

    #[inline]
    fn sub(self, rhs: Color) -> Color {
        Color::new(self.r - rhs.r, self.g - rhs.g, self.b - rhs.b)
    }
}

impl Mul<f32> for Color {
    type Output = Color;

    #[inline]
    fn mul(self, k: f32) -> Color {
        self.map(|v| v * k)
    }
}

/// Round a channel value to the nearest byte, saturating at 0 and 255.
///
/// This rounds instead of truncating toward zero, so pure green through
/// GreyScale (149.685) becomes 150 rather than 149. Truncation would let f32
/// noise such as 39.99998 from a blur drop a whole level.
#[inline]
pub fn quantize(v: f32) -> u8 {
    v.round().clamp(CHANNEL_MIN, CHANNEL_MAX) as u8
}

/// A `height x width` grid of colors, stored bottom-up.
#[derive(Debug, Clone, PartialEq)]
pub struct PixelBuffer {
    data: Array3<f32>,
}

impl PixelBuffer {
    /// Black buffer of the given size.
    pub fn new(width: usize, height: usize) -> Self {
        PixelBuffer {
            data: Array3::zeros((height, width, CHANNELS)),
        }
    }

    /// Buffer with every pixel set to `color`.
    pub fn filled(width: usize, height: usize, color: Color) -> Self {
        Self::from_fn(width, height, |_, _| color)
    }

    /// Build a buffer by evaluating `f(row, col)` for every pixel.
    ///
    /// Rows are computed in parallel; `f` must therefore only read state that
    /// no other row writes, which holds for every filter since they all read
    /// from the previous stage's buffer.
    pub fn from_fn<F>(width: usize, height: usize, f: F) -> Self
    where
        F: Fn(usize, usize) -> Color + Sync,
    {
        let mut data = Array3::<f32>::zeros((height, width, CHANNELS));
        data.axis_iter_mut(Axis(0))
            .into_par_iter()
            .enumerate()
            .for_each(|(row, mut line)| {
                for col in 0..width {
                    let color = f(row, col);
                    line[[col, B]] = color.b;
                    line[[col, G]] = color.g;
                    line[[col, R]] = color.r;
                }
            });
        PixelBuffer { data }
    }

    /// Wrap interleaved B, G, R samples laid out row by row, bottom row first.
    pub fn from_bgr_samples(width: usize, height: usize, samples: Vec<f32>) -> Result<Self> {
        let data = Array3::from_shape_vec((height, width, CHANNELS), samples)
            .map_err(|e| Error::Shape(format!("{width}x{height} BGR samples: {e}")))?;
        Ok(PixelBuffer { data })
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.data.dim().1
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.data.dim().0
    }

    /// `(width, height)`.
    #[inline]
    pub fn dimensions(&self) -> (usize, usize) {
        (self.width(), self.height())
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Read the pixel at `(row, col)`. Panics when out of range.
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> Color {
        Color {
            r: self.data[[row, col, R]],
            g: self.data[[row, col, G]],
            b: self.data[[row, col, B]],
        }
    }

    /// Write the pixel at `(row, col)`. Panics when out of range.
    #[inline]
    pub fn set(&mut self, row: usize, col: usize, color: Color) {
        self.data[[row, col, R]] = color.r;
        self.data[[row, col, G]] = color.g;
        self.data[[row, col, B]] = color.b;
    }

    /// Clamp a signed row index to `[0, height)`. The buffer must not be empty.
    #[inline]
    pub fn clamp_row(&self, row: isize) -> usize {
        row.clamp(0, self.height() as isize - 1) as usize
    }

    /// Clamp a signed column index to `[0, width)`. The buffer must not be empty.
    #[inline]
    pub fn clamp_col(&self, col: isize) -> usize {
        col.clamp(0, self.width() as isize - 1) as usize
    }

    /// Clamp-to-edge read.
    #[inline]
    pub fn get_clamped(&self, row: isize, col: isize) -> Color {
        self.get(self.clamp_row(row), self.clamp_col(col))
    }

    /// Replace every pixel with `f(pixel)` without allocating.
    ///
    /// Only for per-pixel operations that never look at neighbors.
    pub fn map_in_place(&mut self, f: impl Fn(Color) -> Color) {
        for mut px in self.data.lanes_mut(Axis(2)) {
            let out = f(Color {
                r: px[R],
                g: px[G],
                b: px[B],
            });
            px[R] = out.r;
            px[G] = out.g;
            px[B] = out.b;
        }
    }

    /// New buffer of `new_width x new_height` holding the overlapping region.
    ///
    /// The last stored rows (the top of the picture) stay aligned with the
    /// last stored rows of the result and column 0 stays column 0. Cells
    /// not covered by the source are black.
    pub fn resize(&self, new_width: usize, new_height: usize) -> PixelBuffer {
        let mut out = PixelBuffer::new(new_width, new_height);
        let rows = new_height.min(self.height());
        let cols = new_width.min(self.width());
        if rows == 0 || cols == 0 {
            return out;
        }

        let src = self.data.slice(s![self.height() - rows.., ..cols, ..]);
        out.data
            .slice_mut(s![new_height - rows.., ..cols, ..])
            .assign(&src);
        out
    }

    /// Import an `(height, width, 3)` RGB array whose row 0 is the top of the
    /// picture, as numpy and browser canvases deliver it.
    pub fn from_rgb_top_down(input: ArrayView3<u8>) -> Result<Self> {
        let (height, width, channels) = input.dim();
        if channels != CHANNELS {
            return Err(Error::Shape(format!(
                "expected (height, width, 3) RGB array, got {channels} channels"
            )));
        }

        Ok(Self::from_fn(width, height, |row, col| {
            let y = height - 1 - row;
            Color::new(
                input[[y, col, 0]] as f32,
                input[[y, col, 1]] as f32,
                input[[y, col, 2]] as f32,
            )
        }))
    }

    /// Export as an `(height, width, 3)` top-down RGB byte array.
    pub fn to_rgb_top_down(&self) -> Array3<u8> {
        let height = self.height();
        Array3::from_shape_fn((height, self.width(), CHANNELS), |(y, x, c)| {
            let px = self.get(height - 1 - y, x);
            quantize(match c {
                0 => px.r,
                1 => px.g,
                _ => px.b,
            })
        })
    }
}
