//! Filter modules for image processing effects.
//!
//! ## Catalog
//!
//! | Filter | Flag | Parameters | Module |
//! |--------|------|------------|--------|
//! | Negative | `-neg` | none | [`color_adjust`] |
//! | GreyScale | `-gs` | none | [`grayscale`] |
//! | Sharp | `-sharp` | none | [`sharpen`] |
//! | EdgeDetection | `-edge` | threshold (fraction of 255) | [`edge`] |
//! | GaussianBlur | `-blur` | sigma | [`blur`] |
//! | SinusDistortion | `-sinus` | wave | [`distort`] |
//! | GlassDistortion | `-glass` | radius | [`distort`] |
//! | Crop | `-crop` | width, height | [`crop`] |
//!
//! ## Architecture
//!
//! All filters follow these principles:
//! - **Clamp-to-edge** - neighbor reads outside the image use the nearest edge pixel
//! - **Fresh output** - neighbor-reading filters never observe their own partial output
//! - **In-place only when local** - Negative and GreyScale rewrite the buffer directly
//! - **Row-parallel** - per-pixel work is spread over rows with rayon where it is order-independent
//!
//! The catalog is closed: [`Filter`] is an enum and [`Filter::apply`] is a
//! single exhaustive match.

pub mod core;
pub mod grayscale;
pub mod color_adjust;
pub mod sharpen;
pub mod edge;
pub mod blur;
pub mod distort;
pub mod crop;

use std::fmt;

use rand::Rng;

use crate::buffer::PixelBuffer;
use crate::error::{Error, Result};

/// Identifier of a filter, without parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterKind {
    Negative,
    GreyScale,
    Sharp,
    EdgeDetection,
    GaussianBlur,
    SinusDistortion,
    GlassDistortion,
    Crop,
}

impl FilterKind {
    pub const ALL: [FilterKind; 8] = [
        FilterKind::GreyScale,
        FilterKind::Negative,
        FilterKind::Sharp,
        FilterKind::EdgeDetection,
        FilterKind::GaussianBlur,
        FilterKind::GlassDistortion,
        FilterKind::SinusDistortion,
        FilterKind::Crop,
    ];

    pub fn name(self) -> &'static str {
        match self {
            FilterKind::Negative => "Negative",
            FilterKind::GreyScale => "GreyScale",
            FilterKind::Sharp => "Sharp",
            FilterKind::EdgeDetection => "EdgeDetection",
            FilterKind::GaussianBlur => "GaussianBlur",
            FilterKind::SinusDistortion => "SinusDistortion",
            FilterKind::GlassDistortion => "GlassDistortion",
            FilterKind::Crop => "Crop",
        }
    }

    /// Command-line flag selecting this filter.
    pub fn flag(self) -> &'static str {
        match self {
            FilterKind::Negative => "-neg",
            FilterKind::GreyScale => "-gs",
            FilterKind::Sharp => "-sharp",
            FilterKind::EdgeDetection => "-edge",
            FilterKind::GaussianBlur => "-blur",
            FilterKind::SinusDistortion => "-sinus",
            FilterKind::GlassDistortion => "-glass",
            FilterKind::Crop => "-crop",
        }
    }

    pub fn from_flag(flag: &str) -> Option<FilterKind> {
        Self::ALL.into_iter().find(|kind| kind.flag() == flag)
    }

    /// Parameter names, in command-line order.
    pub fn params(self) -> &'static [&'static str] {
        match self {
            FilterKind::Negative | FilterKind::GreyScale | FilterKind::Sharp => &[],
            FilterKind::EdgeDetection => &["threshold"],
            FilterKind::GaussianBlur => &["sigma"],
            FilterKind::SinusDistortion => &["wave"],
            FilterKind::GlassDistortion => &["radius"],
            FilterKind::Crop => &["width", "height"],
        }
    }

    /// Number of numeric parameters the flag takes.
    pub fn arity(self) -> usize {
        self.params().len()
    }

    /// One-line description for usage text.
    pub fn summary(self) -> &'static str {
        match self {
            FilterKind::Negative => "invert every channel",
            FilterKind::GreyScale => "convert to greyscale (BT.601 luma)",
            FilterKind::Sharp => "sharpen with a 5-point kernel",
            FilterKind::EdgeDetection => "Laplacian edges, white above threshold * 255 (0..1)",
            FilterKind::GaussianBlur => "Gaussian blur with standard deviation sigma (> 0)",
            FilterKind::SinusDistortion => "sinusoidal ripple, wave must be non-zero",
            FilterKind::GlassDistortion => "random scatter of up to radius pixels",
            FilterKind::Crop => "keep the top-left width x height pixels",
        }
    }

    pub(crate) fn invalid(self, reason: impl Into<String>) -> Error {
        Error::Parameter {
            name: self.name(),
            flag: self.flag(),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for FilterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A filter together with its parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Filter {
    Negative,
    GreyScale,
    Sharp,
    EdgeDetection { threshold: f64 },
    GaussianBlur { sigma: f64 },
    SinusDistortion { wave: f64 },
    GlassDistortion { radius: f64 },
    Crop { width: usize, height: usize },
}

impl Filter {
    pub fn kind(&self) -> FilterKind {
        match self {
            Filter::Negative => FilterKind::Negative,
            Filter::GreyScale => FilterKind::GreyScale,
            Filter::Sharp => FilterKind::Sharp,
            Filter::EdgeDetection { .. } => FilterKind::EdgeDetection,
            Filter::GaussianBlur { .. } => FilterKind::GaussianBlur,
            Filter::SinusDistortion { .. } => FilterKind::SinusDistortion,
            Filter::GlassDistortion { .. } => FilterKind::GlassDistortion,
            Filter::Crop { .. } => FilterKind::Crop,
        }
    }

    pub fn name(&self) -> &'static str {
        self.kind().name()
    }

    pub fn flag(&self) -> &'static str {
        self.kind().flag()
    }

    /// Check the parameters against the filter's domain.
    ///
    /// Every parameter must be finite; GaussianBlur needs `0 < sigma <= 10000`,
    /// SinusDistortion a non-zero wave, Crop targets of at least one pixel.
    pub fn validate(&self) -> Result<()> {
        let kind = self.kind();
        let finite = |name: &str, v: f64| {
            if v.is_finite() {
                Ok(())
            } else {
                Err(kind.invalid(format!("{name} must be a finite number, got {v}")))
            }
        };

        match *self {
            Filter::Negative | Filter::GreyScale | Filter::Sharp => Ok(()),
            Filter::EdgeDetection { threshold } => finite("threshold", threshold),
            Filter::GaussianBlur { sigma } => {
                finite("sigma", sigma)?;
                if sigma <= 0.0 {
                    return Err(kind.invalid(format!("sigma must be greater than 0, got {sigma}")));
                }
                if sigma > self::core::MAX_SIGMA {
                    return Err(kind.invalid(format!(
                        "sigma must be at most {}, got {sigma}",
                        self::core::MAX_SIGMA
                    )));
                }
                Ok(())
            }
            Filter::SinusDistortion { wave } => {
                finite("wave", wave)?;
                if wave == 0.0 {
                    return Err(kind.invalid("wave must be non-zero"));
                }
                Ok(())
            }
            Filter::GlassDistortion { radius } => finite("radius", radius),
            Filter::Crop { width, height } => {
                if width == 0 || height == 0 {
                    return Err(kind.invalid(format!(
                        "target size must be at least 1x1, got {width}x{height}"
                    )));
                }
                Ok(())
            }
        }
    }

    /// Run the filter on `buffer`, consuming it.
    ///
    /// `rng` is only drawn from by GlassDistortion. Parameters are assumed to
    /// have passed [`Filter::validate`].
    pub fn apply<R: Rng>(&self, mut buffer: PixelBuffer, rng: &mut R) -> PixelBuffer {
        match *self {
            Filter::Negative => {
                color_adjust::negative(&mut buffer);
                buffer
            }
            Filter::GreyScale => {
                grayscale::greyscale(&mut buffer);
                buffer
            }
            Filter::Sharp => sharpen::sharpen(&buffer),
            Filter::EdgeDetection { threshold } => edge::edge_detection(buffer, threshold),
            Filter::GaussianBlur { sigma } => blur::gaussian_blur(&buffer, sigma),
            Filter::SinusDistortion { wave } => distort::sinus_distortion(&buffer, wave),
            Filter::GlassDistortion { radius } => distort::glass_distortion(&buffer, radius, rng),
            Filter::Crop { width, height } => crop::crop(buffer, width, height),
        }
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.flag())?;
        match *self {
            Filter::Negative | Filter::GreyScale | Filter::Sharp => Ok(()),
            Filter::EdgeDetection { threshold: v }
            | Filter::GaussianBlur { sigma: v }
            | Filter::SinusDistortion { wave: v }
            | Filter::GlassDistortion { radius: v } => write!(f, " {v}"),
            Filter::Crop { width, height } => write!(f, " {width} {height}"),
        }
    }
}

/// Largest absolute channel difference between two same-sized buffers.
#[cfg(test)]
pub(crate) fn max_channel_diff(a: &PixelBuffer, b: &PixelBuffer) -> f32 {
    assert_eq!(a.dimensions(), b.dimensions());
    let mut max = 0.0f32;
    for row in 0..a.height() {
        for col in 0..a.width() {
            let (p, q) = (a.get(row, col), b.get(row, col));
            max = max
                .max((p.r - q.r).abs())
                .max((p.g - q.g).abs())
                .max((p.b - q.b).abs());
        }
    }
    max
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::Color;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_flags_round_trip() {
        for kind in FilterKind::ALL {
            assert_eq!(FilterKind::from_flag(kind.flag()), Some(kind));
        }
        assert_eq!(FilterKind::from_flag("-copy"), None);
        assert_eq!(FilterKind::from_flag("gs"), None);
    }

    #[test]
    fn test_arity() {
        assert_eq!(FilterKind::GreyScale.arity(), 0);
        assert_eq!(FilterKind::EdgeDetection.arity(), 1);
        assert_eq!(FilterKind::Crop.arity(), 2);
    }

    #[test]
    fn test_validate_rejects_degenerate_parameters() {
        assert!(Filter::GaussianBlur { sigma: 0.0 }.validate().is_err());
        assert!(Filter::GaussianBlur { sigma: -1.0 }.validate().is_err());
        assert!(Filter::GaussianBlur { sigma: f64::NAN }.validate().is_err());
        assert!(Filter::SinusDistortion { wave: 0.0 }.validate().is_err());
        assert!(Filter::EdgeDetection { threshold: f64::INFINITY }.validate().is_err());
        assert!(Filter::Crop { width: 0, height: 3 }.validate().is_err());

        assert!(Filter::GaussianBlur { sigma: 1e20 }.validate().is_err());
        assert!(Filter::GaussianBlur { sigma: 10_000.5 }.validate().is_err());

        assert!(Filter::GaussianBlur { sigma: 0.5 }.validate().is_ok());
        assert!(Filter::GaussianBlur { sigma: super::core::MAX_SIGMA }.validate().is_ok());
        assert!(Filter::SinusDistortion { wave: -3.0 }.validate().is_ok());
        assert!(Filter::GlassDistortion { radius: -2.0 }.validate().is_ok());
        assert!(Filter::GlassDistortion { radius: 0.0 }.validate().is_ok());
    }

    #[test]
    fn test_validate_error_names_filter() {
        let err = Filter::GaussianBlur { sigma: 0.0 }.validate().unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("GaussianBlur"), "{msg}");
        assert!(msg.contains("-blur"), "{msg}");
    }

    #[test]
    fn test_display() {
        assert_eq!(Filter::GreyScale.to_string(), "-gs");
        assert_eq!(Filter::GaussianBlur { sigma: 1.5 }.to_string(), "-blur 1.5");
        assert_eq!(Filter::Crop { width: 10, height: 20 }.to_string(), "-crop 10 20");
    }

    #[test]
    fn test_apply_white_examples() {
        let mut rng = StdRng::seed_from_u64(0);
        let white = PixelBuffer::filled(2, 2, Color::WHITE);

        let neg = Filter::Negative.apply(white.clone(), &mut rng);
        assert_eq!(neg, PixelBuffer::filled(2, 2, Color::BLACK));

        let gs = Filter::GreyScale.apply(white.clone(), &mut rng);
        assert!(max_channel_diff(&gs, &white) < 1e-3);
    }

    #[test]
    fn test_apply_crop_changes_geometry() {
        let mut rng = StdRng::seed_from_u64(0);
        let buf = PixelBuffer::new(6, 4);
        let out = Filter::Crop { width: 2, height: 3 }.apply(buf, &mut rng);
        assert_eq!(out.dimensions(), (2, 3));
    }
}
