//! Core data structures shared by the URL parser and the query codec.

use std::fmt;

use indexmap::IndexMap;

/// Insertion-ordered mapping from query keys to values.
pub type QueryMap = IndexMap<String, QueryValue>;

/// Components of a URL as produced by [`parse`](crate::parse).
///
/// Every field is optional: malformed or partial URLs simply leave the
/// missing parts unset. The canonical form is computed on demand by
/// [`ParsedUrl::href`] and is never stored.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedUrl {
    /// Scheme including the trailing colon (`http:`)
    pub protocol: Option<String>,
    /// Whether the scheme was followed by `//`
    pub slashes: bool,
    /// Raw user info without the trailing `@` (`user:pass`)
    pub auth: Option<String>,
    /// Host including the port (`example.com:8080`)
    pub host: Option<String>,
    /// Host without the port (`example.com`)
    pub hostname: Option<String>,
    /// Port digits (`8080`)
    pub port: Option<String>,
    /// Pathname plus search (`/a/b?x=1`)
    pub path: Option<String>,
    /// Path without query or hash (`/a/b`)
    pub pathname: Option<String>,
    /// Query including the leading `?` (`?x=1`)
    pub search: Option<String>,
    /// Decoded query, only present when query parsing was requested
    pub query: Option<QueryMap>,
    /// Fragment including the leading `#` (`#top`)
    pub hash: Option<String>,
}

impl ParsedUrl {
    /// Recompose the URL from its parts.
    ///
    /// Protocol and host are lowercased. A host without a protocol is emitted
    /// without a leading `//`, matching the legacy format this parser has
    /// always produced.
    pub fn href(&self) -> String {
        let mut href = String::new();

        if let Some(protocol) = &self.protocol {
            href.push_str(&protocol.to_lowercase());
            href.push_str("//");
        }
        if let Some(auth) = &self.auth {
            href.push_str(auth);
            href.push('@');
        }
        if let Some(host) = &self.host {
            href.push_str(&host.to_lowercase());
        }
        if let Some(path) = &self.path {
            href.push_str(path);
        }
        if let Some(hash) = &self.hash {
            href.push_str(hash);
        }

        href
    }
}

impl fmt::Display for ParsedUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.href())
    }
}

/// A decoded query string value.
///
/// Scalars are always strings. Arrays come from empty (`a[]`) or numeric
/// (`a[0]`) bracket keys, maps from named bracket keys (`a[b]`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryValue {
    String(String),
    Array(Vec<QueryValue>),
    Map(QueryMap),
}

impl QueryValue {
    /// Returns the scalar text, if this is a scalar.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            QueryValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the items, if this is an array.
    pub fn as_array(&self) -> Option<&[QueryValue]> {
        match self {
            QueryValue::Array(items) => Some(items),
            _ => None,
        }
    }

    /// Returns the entries, if this is a map.
    pub fn as_map(&self) -> Option<&QueryMap> {
        match self {
            QueryValue::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Look up a named entry of a map value.
    pub fn get(&self, key: &str) -> Option<&QueryValue> {
        self.as_map().and_then(|map| map.get(key))
    }

    /// Whether this value is an array or a map.
    pub fn is_structured(&self) -> bool {
        !matches!(self, QueryValue::String(_))
    }
}

impl Default for QueryValue {
    fn default() -> Self {
        QueryValue::String(String::new())
    }
}

impl From<&str> for QueryValue {
    fn from(value: &str) -> Self {
        QueryValue::String(value.to_string())
    }
}

impl From<String> for QueryValue {
    fn from(value: String) -> Self {
        QueryValue::String(value)
    }
}

macro_rules! scalar_from {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for QueryValue {
                fn from(value: $ty) -> Self {
                    QueryValue::String(value.to_string())
                }
            }
        )*
    };
}

scalar_from!(i32, i64, u32, u64, usize, bool);

impl<T: Into<QueryValue>> From<Vec<T>> for QueryValue {
    fn from(items: Vec<T>) -> Self {
        QueryValue::Array(items.into_iter().map(Into::into).collect())
    }
}

impl From<QueryMap> for QueryValue {
    fn from(map: QueryMap) -> Self {
        QueryValue::Map(map)
    }
}

/// A `name=value` pair in the style of a serialized form element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormField {
    pub name: String,
    pub value: String,
}

impl FormField {
    /// Create a field from anything convertible to strings.
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}
