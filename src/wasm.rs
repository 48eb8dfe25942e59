//! WebAssembly exports for the bmpstag filter pipeline.
//!
//! These functions are exposed to JavaScript via wasm-bindgen.
//!
//! Images cross the boundary as flat RGB bytes, row 0 at the top, the way a
//! canvas delivers them once alpha is dropped. Errors surface as thrown
//! JavaScript `Error`s carrying the library message.

use ndarray::ArrayView3;
use wasm_bindgen::prelude::*;

use crate::buffer::{PixelBuffer, CHANNELS};
use crate::pipeline::{seeded_rng, Pipeline};

/// Filtered RGB image handed back to JavaScript.
#[wasm_bindgen]
pub struct FilteredImage {
    width: usize,
    height: usize,
    data: Vec<u8>,
}

#[wasm_bindgen]
impl FilteredImage {
    #[wasm_bindgen(getter)]
    pub fn width(&self) -> usize {
        self.width
    }

    #[wasm_bindgen(getter)]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Flat RGB bytes, length `width * height * 3`.
    #[wasm_bindgen(getter)]
    pub fn data(&self) -> Vec<u8> {
        self.data.clone()
    }
}

// ============================================================================
// Pipeline
// ============================================================================

/// Run a filter chain over a flat RGB image.
///
/// # Arguments
/// * `data` - Flat array of RGB bytes (length = width * height * 3)
/// * `width` - Image width in pixels
/// * `height` - Image height in pixels
/// * `args` - Filter tokens, e.g. `["-gs", "-blur", "2"]`
/// * `seed` - Seed for `-glass`; random when undefined
///
/// # Returns
/// The filtered image; Crop may shrink it.
#[wasm_bindgen]
pub fn apply_filters_wasm(
    data: &[u8],
    width: usize,
    height: usize,
    args: Vec<String>,
    seed: Option<u64>,
) -> Result<FilteredImage, JsError> {
    let pipeline = Pipeline::from_args(args.as_slice())?;
    let view = ArrayView3::from_shape((height, width, CHANNELS), data)?;
    let buffer = PixelBuffer::from_rgb_top_down(view)?;

    let result = pipeline.apply_with_rng(buffer, &mut seeded_rng(seed));
    Ok(FilteredImage {
        width: result.width(),
        height: result.height(),
        data: result.to_rgb_top_down().into_raw_vec_and_offset().0,
    })
}

// ============================================================================
// Codec
// ============================================================================

/// Decode, filter and re-encode a 24-bit BMP file.
///
/// # Arguments
/// * `bytes` - Complete BMP file
/// * `args` - Filter tokens
/// * `seed` - Seed for `-glass`; random when undefined
///
/// # Returns
/// The encoded BMP file.
#[wasm_bindgen]
pub fn process_bmp_wasm(
    bytes: &[u8],
    args: Vec<String>,
    seed: Option<u64>,
) -> Result<Vec<u8>, JsError> {
    let pipeline = Pipeline::from_args(args.as_slice())?;
    Ok(pipeline.process_bmp(bytes, &mut seeded_rng(seed))?)
}
