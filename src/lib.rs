//! bmpstag
//!
//! Filter pipeline for uncompressed 24-bit BMP images, with Python bindings
//! via PyO3 and WASM bindings for JavaScript.
//!
//! ## Image Format
//! Images are held as a [`PixelBuffer`]: `f32` channels in `[0, 255]`,
//! shape `(height, width, 3)`, B,G,R order, row 0 at the bottom of the
//! picture. Values may leave that range between stages; they are rounded and
//! clamped to bytes only on export.
//!
//! ## Filter Architecture
//! Filters form a closed set ([`Filter`]) parsed from command-line style
//! tokens (`-crop 800 600 -gs -blur 1.5`) and applied in order by a
//! [`Pipeline`]. Crop changes the dimensions seen by every later stage.
//!
//! ```no_run
//! use bmpstag::{bmp, pipeline::seeded_rng, Pipeline};
//!
//! # fn main() -> bmpstag::Result<()> {
//! let pipeline = Pipeline::from_args(&["-gs", "-blur", "1.5"])?;
//! let bitmap = bmp::read_file("in.bmp")?;
//! let out = pipeline.apply_to_bitmap(bitmap, &mut seeded_rng(Some(7)));
//! bmp::write_file("out.bmp", &out)?;
//! # Ok(())
//! # }
//! ```

pub mod bmp;
pub mod buffer;
pub mod error;
pub mod filters;
pub mod pipeline;
pub mod spec;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use bmp::{Bitmap, BmpHeader};
pub use buffer::{Color, PixelBuffer};
pub use error::{Error, Result};
pub use filters::{Filter, FilterKind};
pub use pipeline::Pipeline;
pub use spec::FilterSpec;

// Python bindings (only when python feature is enabled)
#[cfg(feature = "python")]
mod python {
    use numpy::{IntoPyArray, PyArray3, PyReadonlyArray3};
    use pyo3::exceptions::{PyIOError, PyMemoryError, PyValueError};
    use pyo3::prelude::*;
    use pyo3::types::PyBytes;

    use crate::bmp::{self, Bitmap};
    use crate::buffer::PixelBuffer;
    use crate::error::Error;
    use crate::pipeline::{seeded_rng, Pipeline};

    impl From<Error> for PyErr {
        fn from(err: Error) -> PyErr {
            match err {
                Error::Io(e) => PyIOError::new_err(e.to_string()),
                Error::Allocation(_) => PyMemoryError::new_err(err.to_string()),
                other => PyValueError::new_err(other.to_string()),
            }
        }
    }

    // ========================================================================
    // Pipeline
    // ========================================================================

    /// Run a filter chain over an RGB u8 image.
    ///
    /// Args:
    ///     image: (height, width, 3) RGB array, row 0 at the top
    ///     args: filter tokens, e.g. ["-crop", "64", "64", "-gs"]
    ///     seed: seed for -glass; random when omitted
    ///
    /// Returns:
    ///     (height', width', 3) RGB array; Crop may shrink it
    #[pyfunction]
    #[pyo3(signature = (image, args, seed=None))]
    pub fn apply_filters<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
        args: Vec<String>,
        seed: Option<u64>,
    ) -> PyResult<Bound<'py, PyArray3<u8>>> {
        let pipeline = Pipeline::from_args(args.as_slice())?;
        let buffer = PixelBuffer::from_rgb_top_down(image.as_array())?;
        let result = pipeline.apply_with_rng(buffer, &mut seeded_rng(seed));
        Ok(result.to_rgb_top_down().into_pyarray(py))
    }

    /// Decode, filter and re-encode BMP bytes.
    #[pyfunction]
    #[pyo3(signature = (data, args, seed=None))]
    pub fn process_bmp<'py>(
        py: Python<'py>,
        data: &[u8],
        args: Vec<String>,
        seed: Option<u64>,
    ) -> PyResult<Bound<'py, PyBytes>> {
        let pipeline = Pipeline::from_args(args.as_slice())?;
        let bytes = pipeline.process_bmp(data, &mut seeded_rng(seed))?;
        Ok(PyBytes::new(py, &bytes))
    }

    // ========================================================================
    // Codec
    // ========================================================================

    /// Decode 24-bit BMP bytes into a (height, width, 3) top-down RGB array.
    #[pyfunction]
    pub fn decode_bmp<'py>(py: Python<'py>, data: &[u8]) -> PyResult<Bound<'py, PyArray3<u8>>> {
        let bitmap = bmp::decode(data)?;
        Ok(bitmap.pixels.to_rgb_top_down().into_pyarray(py))
    }

    /// Encode a (height, width, 3) top-down RGB array as 24-bit BMP bytes.
    #[pyfunction]
    pub fn encode_bmp<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
    ) -> PyResult<Bound<'py, PyBytes>> {
        let pixels = PixelBuffer::from_rgb_top_down(image.as_array())?;
        let bytes = bmp::encode(&Bitmap::new(pixels))?;
        Ok(PyBytes::new(py, &bytes))
    }

    /// bmpstag extension module
    #[pymodule]
    pub fn bmpstag(m: &Bound<'_, PyModule>) -> PyResult<()> {
        m.add_function(wrap_pyfunction!(apply_filters, m)?)?;
        m.add_function(wrap_pyfunction!(process_bmp, m)?)?;
        m.add_function(wrap_pyfunction!(decode_bmp, m)?)?;
        m.add_function(wrap_pyfunction!(encode_bmp, m)?)?;
        Ok(())
    }
}

#[cfg(feature = "python")]
pub use python::bmpstag;
