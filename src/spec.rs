//! Filter-chain parsing.
//!
//! A chain is a flat token list such as `-crop 800 600 -gs -blur 1.5`.
//! Every flag is followed by exactly as many numeric tokens as its
//! [`FilterKind::arity`]. Numeric tokens may start with `-` (`-sinus -4`),
//! so a token is only read as a flag when it sits outside a parameter slot.

use log::warn;

use crate::error::{Error, Result};
use crate::filters::{Filter, FilterKind};

/// A filter identifier with its raw numeric parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterSpec {
    kind: FilterKind,
    params: Vec<f64>,
}

impl FilterSpec {
    /// Pair `kind` with `params`, checking the parameter count.
    pub fn new(kind: FilterKind, params: Vec<f64>) -> Result<Self> {
        if params.len() != kind.arity() {
            return Err(arity_error(kind));
        }
        Ok(FilterSpec { kind, params })
    }

    pub fn kind(&self) -> FilterKind {
        self.kind
    }

    pub fn params(&self) -> &[f64] {
        &self.params
    }

    /// Build the typed filter and check its parameter domain.
    pub fn to_filter(&self) -> Result<Filter> {
        let p = &self.params;
        let filter = match self.kind {
            FilterKind::Negative => Filter::Negative,
            FilterKind::GreyScale => Filter::GreyScale,
            FilterKind::Sharp => Filter::Sharp,
            FilterKind::EdgeDetection => {
                if !(0.0..=1.0).contains(&p[0]) {
                    warn!("edge threshold {} is outside 0..1", p[0]);
                }
                Filter::EdgeDetection { threshold: p[0] }
            }
            FilterKind::GaussianBlur => Filter::GaussianBlur { sigma: p[0] },
            FilterKind::SinusDistortion => Filter::SinusDistortion { wave: p[0] },
            FilterKind::GlassDistortion => Filter::GlassDistortion { radius: p[0] },
            FilterKind::Crop => Filter::Crop {
                width: pixel_count(self.kind, "width", p[0])?,
                height: pixel_count(self.kind, "height", p[1])?,
            },
        };
        filter.validate()?;
        Ok(filter)
    }

    /// Split a token list into specs.
    ///
    /// Fails on the first unknown flag, missing parameter or non-numeric
    /// parameter.
    pub fn parse_args<S: AsRef<str>>(args: &[S]) -> Result<Vec<FilterSpec>> {
        let mut specs = Vec::new();
        let mut tokens = args.iter().map(AsRef::as_ref);

        while let Some(flag) = tokens.next() {
            let kind =
                FilterKind::from_flag(flag).ok_or_else(|| Error::UnknownFilter(flag.to_string()))?;

            let mut params = Vec::with_capacity(kind.arity());
            for _ in 0..kind.arity() {
                let token = tokens.next().ok_or_else(|| arity_error(kind))?;
                params.push(parse_number(kind, token)?);
            }
            specs.push(FilterSpec { kind, params });
        }

        Ok(specs)
    }
}

fn arity_error(kind: FilterKind) -> Error {
    Error::Arity {
        name: kind.name(),
        flag: kind.flag(),
        expected: kind.arity(),
    }
}

fn parse_number(kind: FilterKind, token: &str) -> Result<f64> {
    token.trim().parse::<f64>().map_err(|_| Error::NotNumeric {
        name: kind.name(),
        flag: kind.flag(),
        expected: kind.arity(),
        value: token.to_string(),
    })
}

/// Truncate a crop target to whole pixels; anything below one pixel is rejected.
fn pixel_count(kind: FilterKind, what: &str, v: f64) -> Result<usize> {
    if !v.is_finite() || v < 1.0 {
        return Err(kind.invalid(format!("{what} must be at least 1 pixel, got {v}")));
    }
    Ok(v as usize)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Vec<Filter>> {
        FilterSpec::parse_args(args)?
            .iter()
            .map(FilterSpec::to_filter)
            .collect()
    }

    #[test]
    fn test_parse_empty() {
        assert!(parse(&[]).unwrap().is_empty());
    }

    #[test]
    fn test_parse_chain_in_order() {
        let filters = parse(&["-crop", "800", "600", "-gs", "-neg", "-sharp", "-edge", "0.1"]).unwrap();
        assert_eq!(
            filters,
            vec![
                Filter::Crop { width: 800, height: 600 },
                Filter::GreyScale,
                Filter::Negative,
                Filter::Sharp,
                Filter::EdgeDetection { threshold: 0.1 },
            ]
        );
    }

    #[test]
    fn test_parse_single_parameter_filters() {
        let filters = parse(&["-blur", "1.5", "-glass", "3", "-sinus", "-4"]).unwrap();
        assert_eq!(
            filters,
            vec![
                Filter::GaussianBlur { sigma: 1.5 },
                Filter::GlassDistortion { radius: 3.0 },
                Filter::SinusDistortion { wave: -4.0 },
            ]
        );
    }

    #[test]
    fn test_parse_crop_truncates() {
        assert_eq!(
            parse(&["-crop", "10.9", "2.2"]).unwrap(),
            vec![Filter::Crop { width: 10, height: 2 }]
        );
    }

    #[test]
    fn test_parse_unknown_flag() {
        assert!(matches!(
            parse(&["-gs", "-copy"]),
            Err(Error::UnknownFilter(flag)) if flag == "-copy"
        ));
        // Extra parameter after a zero-arity filter is not a flag.
        assert!(matches!(parse(&["-gs", "5"]), Err(Error::UnknownFilter(_))));
    }

    #[test]
    fn test_parse_missing_parameter() {
        let err = parse(&["-crop", "10"]).unwrap_err();
        assert!(matches!(err, Error::Arity { expected: 2, .. }));
        assert_eq!(
            err.to_string(),
            "filter Crop (-crop) takes exactly 2 numeric arguments"
        );

        assert!(matches!(parse(&["-blur"]), Err(Error::Arity { expected: 1, .. })));
    }

    #[test]
    fn test_parse_non_numeric_parameter() {
        let err = parse(&["-edge", "-gs"]).unwrap_err();
        assert!(matches!(&err, Error::NotNumeric { name: "EdgeDetection", value, .. } if value == "-gs"));

        assert!(matches!(
            parse(&["-crop", "10", "abc"]),
            Err(Error::NotNumeric { expected: 2, .. })
        ));
    }

    #[test]
    fn test_parse_rejects_out_of_domain() {
        assert!(matches!(parse(&["-blur", "0"]), Err(Error::Parameter { .. })));
        assert!(matches!(parse(&["-sinus", "0"]), Err(Error::Parameter { .. })));
        assert!(matches!(parse(&["-crop", "0", "5"]), Err(Error::Parameter { .. })));
        assert!(matches!(parse(&["-crop", "5", "-1"]), Err(Error::Parameter { .. })));
        assert!(matches!(parse(&["-glass", "nan"]), Err(Error::Parameter { .. })));
    }

    #[test]
    fn test_spec_new_checks_arity() {
        assert!(FilterSpec::new(FilterKind::Crop, vec![1.0]).is_err());
        let spec = FilterSpec::new(FilterKind::GaussianBlur, vec![2.0]).unwrap();
        assert_eq!(spec.kind(), FilterKind::GaussianBlur);
        assert_eq!(spec.params(), &[2.0]);
    }
}
