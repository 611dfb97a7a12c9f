//! URL processing utilities.
//!
//! This module contains URL-related functionality:
//! - Lenient decomposition of URL strings
//! - Browser-style relative URL resolution
//! - Dot-segment path normalization

pub mod normalizer;
pub mod parser;
pub mod resolver;

// Re-export main functionality
pub use normalizer::normalize;
pub use parser::{parse, parse_opt, UrlParser};
pub use resolver::resolve;
