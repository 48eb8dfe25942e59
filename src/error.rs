//! Error type shared by the codec, the filter-chain parser and the pipeline.
//!
//! Every variant is fatal for a processing run: the CLI reports the message
//! and exits without writing an output file.

use std::io;

/// Errors produced while decoding, configuring or encoding an image.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The input is not a BMP file this crate can decode.
    #[error("invalid bitmap: {0}")]
    Format(String),

    /// A filter flag was followed by the wrong number of parameters.
    #[error("filter {name} ({flag}) takes exactly {expected} numeric argument{}", plural(.expected))]
    Arity {
        name: &'static str,
        flag: &'static str,
        expected: usize,
    },

    /// A filter parameter could not be parsed as a number.
    #[error("filter {name} ({flag}) takes exactly {expected} numeric argument{}, got '{value}'", plural(.expected))]
    NotNumeric {
        name: &'static str,
        flag: &'static str,
        expected: usize,
        value: String,
    },

    /// A filter parameter parsed but lies outside the filter's domain.
    #[error("filter {name} ({flag}): {reason}")]
    Parameter {
        name: &'static str,
        flag: &'static str,
        reason: String,
    },

    /// A raw pixel array handed in by a binding has the wrong shape.
    #[error("invalid image shape: {0}")]
    Shape(String),

    /// The flag does not name any known filter.
    #[error("unknown filter '{0}'")]
    UnknownFilter(String),

    /// Pixel memory could not be reserved.
    #[error("cannot allocate {0} bytes of pixel data")]
    Allocation(usize),

    #[error(transparent)]
    Io(#[from] io::Error),
}

fn plural(n: &usize) -> &'static str {
    if *n == 1 {
        ""
    } else {
        "s"
    }
}

/// Crate result alias.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arity_message_names_filter() {
        let err = Error::Arity {
            name: "Crop",
            flag: "-crop",
            expected: 2,
        };
        assert_eq!(
            err.to_string(),
            "filter Crop (-crop) takes exactly 2 numeric arguments"
        );

        let err = Error::Arity {
            name: "GaussianBlur",
            flag: "-blur",
            expected: 1,
        };
        assert_eq!(
            err.to_string(),
            "filter GaussianBlur (-blur) takes exactly 1 numeric argument"
        );
    }

    #[test]
    fn test_io_error_converts() {
        let err: Error = io::Error::new(io::ErrorKind::NotFound, "missing.bmp").into();
        assert!(matches!(err, Error::Io(_)));
        assert_eq!(err.to_string(), "missing.bmp");
    }
}
