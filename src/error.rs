//! Error types for URL parsing and query string operations.

use std::str::Utf8Error;
use thiserror::Error;

/// Errors that can occur while parsing URLs or decoding query strings.
///
/// Malformed URLs and malformed query strings are not errors: the parser
/// leaves the affected fields unset and the query decoder skips tokens it
/// cannot read.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum UriError {
    /// A required input was missing.
    #[error("Invalid input: `{param}` must be a string")]
    InvalidInput {
        /// Name of the offending parameter.
        param: &'static str,
    },

    /// Percent-decoding produced bytes that are not valid UTF-8.
    #[error(transparent)]
    Decode(#[from] Utf8Error),

    /// Strict conversion using the url crate failed.
    #[error("URL parsing error: {0}")]
    UrlParseError(String),
}

impl From<::url::ParseError> for UriError {
    fn from(err: ::url::ParseError) -> Self {
        UriError::UrlParseError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(
            UriError::InvalidInput { param: "url" }.to_string(),
            "Invalid input: `url` must be a string"
        );
    }

    #[test]
    fn test_decode_error_is_transparent() {
        let bytes = [0xffu8, 0xfe];
        let utf8_error = std::str::from_utf8(&bytes).unwrap_err();
        let error: UriError = utf8_error.into();

        assert_eq!(error.to_string(), utf8_error.to_string());
    }

    #[test]
    fn test_url_parse_error_conversion() {
        let url_error = ::url::ParseError::EmptyHost;
        let error: UriError = url_error.into();

        match error {
            UriError::UrlParseError(_) => (),
            _ => panic!("Expected UrlParseError variant"),
        }
    }
}
