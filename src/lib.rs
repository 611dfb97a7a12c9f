//! urlkit - lenient URL utilities and bracket-notation query strings
//!
//! This crate bundles the small set of URL helpers a client needs when it
//! builds request URLs by hand: splitting a URL into parts, resolving links
//! the way a browser does, normalizing dot segments, and converting query
//! strings to and from nested structures.
//!
//! # Features
//!
//! - **Lenient**: malformed input never fails, unrecognized parts are left unset
//! - **Browser-style resolution**: relative links resolve like an anchor's `href`
//! - **Bracket notation**: `a[b]=1&c[]=2` decodes to nested maps and arrays
//! - **Explicit configuration**: the query convention is a value, not global state
//!
//! # Quick Start
//!
//! ```
//! use urlkit::{add_query, normalize, parse, resolve, unparam};
//!
//! // Split a URL into its parts
//! let parsed = parse("https://api.example.com/v1/users?page=2#top", true, false)?;
//! assert_eq!(parsed.host.as_deref(), Some("api.example.com"));
//! assert_eq!(parsed.pathname.as_deref(), Some("/v1/users"));
//!
//! // Resolve a link against the current page
//! let next = resolve("https://api.example.com/v1/users", "../v2/users");
//! assert_eq!(next, "https://api.example.com/v2/users");
//!
//! // Collapse dot segments
//! assert_eq!(normalize("/a/./b/../c"), "/a/c");
//!
//! // Work with query strings
//! let query = unparam("filter[name]=ada&ids[]=1&ids[]=2")?;
//! assert_eq!(query["ids"].as_array().map(|ids| ids.len()), Some(2));
//!
//! let url = add_query("https://api.example.com/v1/users?page=2", "sort=name")?;
//! assert_eq!(url, "https://api.example.com/v1/users?page=2&sort=name");
//! # Ok::<(), urlkit::UriError>(())
//! ```
//!
//! # Error Handling
//!
//! Fallible functions return `Result<T, UriError>`. The only failures are:
//!
//! - A missing URL passed to [`parse_opt`]
//! - Percent-encoded query data that does not decode to UTF-8
//! - Strict conversion through [`ParsedUrl::to_url`]

// Re-export URL functions
pub use crate::url::{normalize, parse, parse_opt, resolve, UrlParser};

// Re-export query string functions
pub use query::{add_query, param, param_pairs, unparam, AddQuery, QueryCodec};

// Re-export public types
pub use error::UriError;
pub use types::{FormField, ParsedUrl, QueryMap, QueryValue};

// Module declarations
pub mod error;
pub mod query;
pub mod types;
pub mod url;
