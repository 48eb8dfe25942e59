//! Ordered filter chain.
//!
//! A [`Pipeline`] folds its filters left to right over one [`PixelBuffer`].
//! Each stage consumes the previous stage's output; a stage that changes
//! the geometry (Crop) hands the new dimensions to every later stage.

use log::debug;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::bmp::{self, Bitmap};
use crate::buffer::PixelBuffer;
use crate::error::Result;
use crate::filters::Filter;
use crate::spec::FilterSpec;

/// A validated sequence of filters. The empty pipeline is the identity.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Pipeline {
    filters: Vec<Filter>,
}

impl Pipeline {
    /// Build a pipeline, validating every filter's parameters up front.
    pub fn new(filters: Vec<Filter>) -> Result<Self> {
        for filter in &filters {
            filter.validate()?;
        }
        Ok(Pipeline { filters })
    }

    /// Parse and validate a command-line filter chain.
    pub fn from_args<S: AsRef<str>>(args: &[S]) -> Result<Self> {
        let filters = FilterSpec::parse_args(args)?
            .iter()
            .map(FilterSpec::to_filter)
            .collect::<Result<Vec<_>>>()?;
        Ok(Pipeline { filters })
    }

    pub fn filters(&self) -> &[Filter] {
        &self.filters
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    /// Run every stage with a randomly seeded source for GlassDistortion.
    pub fn apply(&self, buffer: PixelBuffer) -> PixelBuffer {
        self.apply_with_rng(buffer, &mut rand::rng())
    }

    /// Run every stage, drawing GlassDistortion offsets from `rng`.
    pub fn apply_with_rng<R: Rng>(&self, buffer: PixelBuffer, rng: &mut R) -> PixelBuffer {
        self.filters
            .iter()
            .enumerate()
            .fold(buffer, |buffer, (stage, filter)| {
                let out = filter.apply(buffer, rng);
                debug!(
                    "stage {}/{}: {} -> {}x{}",
                    stage + 1,
                    self.filters.len(),
                    filter,
                    out.width(),
                    out.height()
                );
                out
            })
    }

    /// Filter a decoded bitmap, keeping its header fields.
    pub fn apply_to_bitmap<R: Rng>(&self, bitmap: Bitmap, rng: &mut R) -> Bitmap {
        Bitmap {
            header: bitmap.header,
            pixels: self.apply_with_rng(bitmap.pixels, rng),
        }
    }

    /// Decode, filter and re-encode a BMP file held in memory.
    pub fn process_bmp<R: Rng>(&self, bytes: &[u8], rng: &mut R) -> Result<Vec<u8>> {
        let bitmap = bmp::decode(bytes)?;
        bmp::encode(&self.apply_to_bitmap(bitmap, rng))
    }
}

/// Random source for a run: reproducible when `seed` is given.
pub fn seeded_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::Color;
    use crate::error::Error;

    fn gradient(width: usize, height: usize) -> PixelBuffer {
        PixelBuffer::from_fn(width, height, |row, col| {
            Color::new((row * 20) as f32, (col * 30) as f32, ((row + col) * 10) as f32)
        })
    }

    #[test]
    fn test_empty_pipeline_is_identity() {
        let buf = gradient(4, 3);
        let pipeline = Pipeline::default();
        assert!(pipeline.is_empty());
        assert_eq!(pipeline.apply(buf.clone()), buf);
    }

    #[test]
    fn test_new_rejects_invalid_filter() {
        let err = Pipeline::new(vec![Filter::GreyScale, Filter::GaussianBlur { sigma: 0.0 }]);
        assert!(matches!(err, Err(Error::Parameter { name: "GaussianBlur", .. })));
    }

    #[test]
    fn test_stages_run_in_order() {
        let buf = gradient(5, 5);
        let mut rng = seeded_rng(Some(1));

        let pipeline = Pipeline::from_args(&["-crop", "2", "2", "-neg"]).unwrap();
        let out = pipeline.apply_with_rng(buf.clone(), &mut rng);

        let mut expected = buf.resize(2, 2);
        crate::filters::color_adjust::negative(&mut expected);
        assert_eq!(out, expected);
    }

    #[test]
    fn test_crop_geometry_visible_to_later_stages() {
        let buf = gradient(8, 6);
        let pipeline = Pipeline::from_args(&["-crop", "3", "2", "-blur", "1", "-sharp"]).unwrap();
        let out = pipeline.apply_with_rng(buf, &mut seeded_rng(Some(0)));
        assert_eq!(out.dimensions(), (3, 2));
    }

    #[test]
    fn test_seeded_glass_reproducible() {
        let buf = gradient(10, 10);
        let pipeline = Pipeline::from_args(&["-glass", "3", "-gs"]).unwrap();
        let a = pipeline.apply_with_rng(buf.clone(), &mut seeded_rng(Some(99)));
        let b = pipeline.apply_with_rng(buf, &mut seeded_rng(Some(99)));
        assert_eq!(a, b);
    }

    #[test]
    fn test_apply_to_bitmap_keeps_header() {
        let mut bitmap = Bitmap::new(gradient(3, 3));
        bitmap.header.reserved2 = 42;
        let pipeline = Pipeline::from_args(&["-crop", "1", "2"]).unwrap();
        let out = pipeline.apply_to_bitmap(bitmap, &mut seeded_rng(None));
        assert_eq!(out.header.reserved2, 42);
        assert_eq!(out.pixels.dimensions(), (1, 2));
    }

    #[test]
    fn test_from_args_reports_first_error() {
        assert!(matches!(
            Pipeline::from_args(&["-gs", "-bogus", "-blur"]),
            Err(Error::UnknownFilter(_))
        ));
    }
}
