//! Query string codec.
//!
//! This module contains the query string functionality:
//! - Decoding bracket notation into nested maps and arrays
//! - Encoding nested maps and arrays back into query strings
//! - Merging new query data into an existing URL

pub mod codec;
pub mod decoder;
pub mod encoder;

// Re-export main functionality
pub use codec::{add_query, param, param_pairs, unparam, AddQuery, QueryCodec};
pub use decoder::decode_query;
pub use encoder::{encode_pairs, encode_query};
