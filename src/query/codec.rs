//! Query codec configuration and the query merging helper.

use crate::error::UriError;
use crate::query::decoder::decode_query;
use crate::query::encoder::{encode_pairs, encode_query};
use crate::types::{FormField, QueryMap};

/// Query string encoder/decoder with its encoding convention.
///
/// The default codec uses bracket notation for arrays and maps. A
/// traditional codec repeats keys for arrays (`a=1&a=2`) and accumulates
/// repeated keys into arrays when decoding.
///
/// # Examples
///
/// ```
/// use urlkit::{QueryCodec, QueryValue};
///
/// let codec = QueryCodec::new().traditional(true);
/// let query = codec.unparam("a=1&a=2")?;
///
/// assert_eq!(query["a"], QueryValue::from(vec!["1", "2"]));
/// assert_eq!(codec.param(&query), "a=1&a=2");
/// # Ok::<(), urlkit::UriError>(())
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QueryCodec {
    traditional: bool,
}

impl QueryCodec {
    pub const fn new() -> Self {
        Self { traditional: false }
    }

    /// Switch between traditional and bracket notation.
    pub const fn traditional(self, traditional: bool) -> Self {
        Self { traditional }
    }

    pub const fn is_traditional(&self) -> bool {
        self.traditional
    }

    /// Decode a query string. See [`decode_query`].
    pub fn unparam(&self, query: &str) -> Result<QueryMap, UriError> {
        decode_query(query, self.traditional)
    }

    /// Encode a nested structure. See [`encode_query`].
    pub fn param(&self, data: &QueryMap) -> String {
        encode_query(data, self.traditional)
    }

    /// Encode form-style pairs.
    pub fn param_pairs(&self, fields: &[FormField]) -> String {
        encode_pairs(fields)
    }

    /// Merge query data into the query string of `url`.
    ///
    /// The existing query is decoded, the new entries replace top-level keys
    /// of the same name, and the result is re-encoded in front of any hash.
    /// Empty query data returns `url` unchanged.
    pub fn add_query<'a>(
        &self,
        url: &str,
        query: impl Into<AddQuery<'a>>,
    ) -> Result<String, UriError> {
        let additions = match query.into() {
            AddQuery::Str(query) => self.unparam(query)?,
            AddQuery::Map(map) => map,
        };
        if additions.is_empty() {
            return Ok(url.to_string());
        }

        let hash_start = url.find('#').unwrap_or(url.len());
        let query_start = url[..hash_start].find('?');

        let mut merged = match query_start {
            Some(index) => self.unparam(&url[index + 1..hash_start])?,
            None => QueryMap::new(),
        };
        merged.extend(additions);

        let base = &url[..query_start.unwrap_or(hash_start)];
        Ok(format!("{base}?{}{}", self.param(&merged), &url[hash_start..]))
    }
}

/// Query data accepted by [`add_query`]: a query string or decoded map.
#[derive(Debug, Clone, PartialEq)]
pub enum AddQuery<'a> {
    Str(&'a str),
    Map(QueryMap),
}

impl<'a> From<&'a str> for AddQuery<'a> {
    fn from(query: &'a str) -> Self {
        AddQuery::Str(query)
    }
}

impl<'a> From<&'a String> for AddQuery<'a> {
    fn from(query: &'a String) -> Self {
        AddQuery::Str(query)
    }
}

impl From<QueryMap> for AddQuery<'_> {
    fn from(map: QueryMap) -> Self {
        AddQuery::Map(map)
    }
}

/// Decode a query string with the default (bracket notation) codec.
///
/// # Examples
///
/// ```
/// use urlkit::unparam;
///
/// let query = unparam("?a[b]=1&d[]=3&d[]=4")?;
/// assert_eq!(query["a"].get("b").and_then(|b| b.as_str()), Some("1"));
/// assert_eq!(query["d"].as_array().map(|d| d.len()), Some(2));
/// # Ok::<(), urlkit::UriError>(())
/// ```
pub fn unparam(query: &str) -> Result<QueryMap, UriError> {
    QueryCodec::new().unparam(query)
}

/// Encode a nested structure into a query string.
pub fn param(data: &QueryMap, traditional: bool) -> String {
    QueryCodec::new().traditional(traditional).param(data)
}

/// Encode form-style `name=value` pairs into a query string.
pub fn param_pairs(fields: &[FormField]) -> String {
    encode_pairs(fields)
}

/// Merge query data into a URL with the default codec.
///
/// # Examples
///
/// ```
/// use urlkit::{add_query, QueryMap};
///
/// let mut extra = QueryMap::new();
/// extra.insert("y".to_string(), 2i32.into());
///
/// assert_eq!(add_query("http://e.com/p?x=1#h", extra)?, "http://e.com/p?x=1&y=2#h");
/// assert_eq!(add_query("http://e.com/p", "a=b")?, "http://e.com/p?a=b");
/// # Ok::<(), urlkit::UriError>(())
/// ```
pub fn add_query<'a>(url: &str, query: impl Into<AddQuery<'a>>) -> Result<String, UriError> {
    QueryCodec::new().add_query(url, query)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::QueryValue;

    fn map(entries: Vec<(&str, QueryValue)>) -> QueryMap {
        entries
            .into_iter()
            .map(|(key, value)| (key.to_string(), value))
            .collect()
    }

    #[test]
    fn test_codec_default_is_bracket_notation() {
        let codec = QueryCodec::default();
        assert!(!codec.is_traditional());
        assert_eq!(codec, QueryCodec::new());

        let data = map(vec![("a", vec!["1", "2"].into())]);
        assert_eq!(codec.param(&data), "a%5B%5D=1&a%5B%5D=2");
    }

    #[test]
    fn test_add_query_merges_before_hash() {
        let extra = map(vec![("y", 2i32.into())]);
        assert_eq!(add_query("http://e.com/p?x=1#h", extra).unwrap(), "http://e.com/p?x=1&y=2#h");
    }

    #[test]
    fn test_add_query_replaces_existing_key_in_place() {
        let result = add_query("http://e.com/p?a=1&b=2", "a=3").unwrap();
        assert_eq!(result, "http://e.com/p?a=3&b=2");
    }

    #[test]
    fn test_add_query_without_existing_query() {
        assert_eq!(add_query("http://e.com/p#h", "a=b").unwrap(), "http://e.com/p?a=b#h");
        assert_eq!(add_query("/p", "?a=b").unwrap(), "/p?a=b");
    }

    #[test]
    fn test_add_query_empty_data_is_noop() {
        assert_eq!(add_query("http://e.com/p?x=%7e", "").unwrap(), "http://e.com/p?x=%7e");
        assert_eq!(add_query("http://e.com/p", QueryMap::new()).unwrap(), "http://e.com/p");
    }

    #[test]
    fn test_add_query_question_mark_in_hash() {
        let result = add_query("http://e.com/p#frag?x=1", "a=b").unwrap();
        assert_eq!(result, "http://e.com/p?a=b#frag?x=1");
    }

    #[test]
    fn test_add_query_nested_data() {
        let extra = map(vec![("f", map(vec![("k", "v".into())]).into())]);
        assert_eq!(add_query("/p?x=1", extra).unwrap(), "/p?x=1&f%5Bk%5D=v");
    }

    #[test]
    fn test_add_query_traditional_codec() {
        let codec = QueryCodec::new().traditional(true);
        let result = codec.add_query("/p?a=1", "a=2").unwrap();

        // Top-level keys from the new data replace existing ones
        assert_eq!(result, "/p?a=2");
    }

    #[test]
    fn test_add_query_propagates_decode_errors() {
        assert!(add_query("/p?a=%FF", "b=1").is_err());
    }
}
