//! Query string decoding with bracket notation.
//!
//! `a[b]=1&a[c]=2&d[]=3&d[]=4` decodes into
//! `{a: {b: "1", c: "2"}, d: ["3", "4"]}`.

use log::debug;
use percent_encoding::percent_decode_str;

use crate::error::UriError;
use crate::types::{QueryMap, QueryValue};

/// Numeric sub-keys above this are treated as map keys, so a single token
/// cannot allocate an arbitrarily large array.
const MAX_ARRAY_INDEX: usize = 1000;

/// Bracket sub-keys past this depth are kept together as one literal
/// sub-key, which bounds the nesting of decoded values.
const MAX_DEPTH: usize = 20;

/// Decode a query string into a nested structure.
///
/// A single leading `?` is ignored. Tokens are split on `&` and at their
/// first `=`; `+` stands for a space and both sides are percent-decoded.
/// Keys follow `name[sub1][sub2]...`, where an empty sub-key appends to an
/// array, a numeric sub-key indexes an array and any other sub-key names a
/// map entry. Tokens whose key does not fit that shape are skipped. Beyond
/// 20 levels the remaining brackets form a single map key.
///
/// Repeated keys are merged: containers merge recursively and scalars are
/// replaced (last write wins). With `traditional` set, a repeated top-level
/// name accumulates its values into an array instead.
///
/// # Errors
///
/// Returns [`UriError::Decode`] if a percent-decoded component is not valid
/// UTF-8.
pub fn decode_query(query: &str, traditional: bool) -> Result<QueryMap, UriError> {
    let query = query.strip_prefix('?').unwrap_or(query);
    let mut result = QueryMap::new();

    for token in query.split('&').filter(|token| !token.is_empty()) {
        let (raw_key, raw_value) = token.split_once('=').unwrap_or((token, ""));
        let key = decode_component(raw_key)?;
        let value = decode_component(raw_value)?;

        let Some((name, sub_keys)) = split_key(&key) else {
            debug!("skipping malformed query token {token:?}");
            continue;
        };

        if traditional {
            if let Some(existing) = result.get_mut(name) {
                let added = place(None, &sub_keys, value);
                let current = std::mem::take(existing);
                *existing = accumulate(current, added);
                continue;
            }
        }

        let current = result.get_mut(name).map(std::mem::take);
        let merged = place(current, &sub_keys, value);
        result.insert(name.to_string(), merged);
    }

    Ok(result)
}

fn decode_component(raw: &str) -> Result<String, UriError> {
    let spaced = raw.replace('+', " ");
    Ok(percent_decode_str(&spaced).decode_utf8()?.into_owned())
}

/// Split `name[a][b]` into `("name", ["a", "b"])`.
///
/// After [`MAX_DEPTH`] sub-keys the unsplit remainder, brackets included,
/// becomes the last sub-key.
fn split_key(key: &str) -> Option<(&str, Vec<&str>)> {
    let name_end = key.find('[').unwrap_or(key.len());
    let name = &key[..name_end];
    if name.is_empty() {
        return None;
    }

    let mut sub_keys = Vec::new();
    let mut rest = &key[name_end..];
    while let Some(inner) = rest.strip_prefix('[') {
        if sub_keys.len() == MAX_DEPTH {
            debug!("query key {name:?} nested deeper than {MAX_DEPTH} levels");
            sub_keys.push(rest);
            rest = "";
            break;
        }
        let close = inner.find(']')?;
        sub_keys.push(&inner[..close]);
        rest = &inner[close + 1..];
    }

    // Trailing text after the brackets
    if !rest.is_empty() {
        return None;
    }

    Some((name, sub_keys))
}

fn array_index(key: &str) -> Option<usize> {
    if key.is_empty() || !key.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    key.parse().ok().filter(|&index| index <= MAX_ARRAY_INDEX)
}

/// Store `value` under `keys` inside `existing`, creating containers as
/// needed.
fn place(existing: Option<QueryValue>, keys: &[&str], value: String) -> QueryValue {
    let Some((&key, rest)) = keys.split_first() else {
        return QueryValue::String(value);
    };
    let is_positional = key.is_empty() || array_index(key).is_some();

    match existing {
        Some(QueryValue::Array(mut items)) if is_positional => {
            let index = array_index(key).unwrap_or(items.len());
            if index < items.len() {
                let current = std::mem::take(&mut items[index]);
                items[index] = place(Some(current), rest, value);
            } else {
                items.resize(index, QueryValue::default());
                items.push(place(None, rest, value));
            }
            QueryValue::Array(items)
        }
        Some(QueryValue::Array(items)) => {
            let map = items
                .into_iter()
                .enumerate()
                .map(|(index, item)| (index.to_string(), item))
                .collect();
            place(Some(QueryValue::Map(map)), keys, value)
        }
        Some(QueryValue::Map(mut map)) => {
            let key = if key.is_empty() {
                map.len().to_string()
            } else {
                key.to_string()
            };
            let current = map.get_mut(&key).map(std::mem::take);
            let placed = place(current, rest, value);
            map.insert(key, placed);
            QueryValue::Map(map)
        }
        _ if is_positional => place(Some(QueryValue::Array(Vec::new())), keys, value),
        _ => place(Some(QueryValue::Map(QueryMap::new())), keys, value),
    }
}

/// Concatenate two values into one array, flattening one level.
fn accumulate(existing: QueryValue, added: QueryValue) -> QueryValue {
    let mut items = match existing {
        QueryValue::Array(items) => items,
        other => vec![other],
    };
    match added {
        QueryValue::Array(more) => items.extend(more),
        other => items.push(other),
    }
    QueryValue::Array(items)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s(value: &str) -> QueryValue {
        QueryValue::String(value.to_string())
    }

    #[test]
    fn test_decode_flat() {
        let query = decode_query("?foo=bar&page=2", false).unwrap();

        assert_eq!(query.len(), 2);
        assert_eq!(query["foo"], s("bar"));
        assert_eq!(query["page"], s("2"));
    }

    #[test]
    fn test_decode_nested_brackets() {
        let query = decode_query("a[b]=1&a[c]=2&d[]=3&d[]=4&d[2][c][e]=5", false).unwrap();

        let a = query["a"].as_map().unwrap();
        assert_eq!(a["b"], s("1"));
        assert_eq!(a["c"], s("2"));

        let d = query["d"].as_array().unwrap();
        assert_eq!(d.len(), 3);
        assert_eq!(d[0], s("3"));
        assert_eq!(d[1], s("4"));
        assert_eq!(d[2].get("c").and_then(|c| c.get("e")), Some(&s("5")));
    }

    #[test]
    fn test_last_write_wins() {
        let query = decode_query("a=1&a=2&a=3", false).unwrap();
        assert_eq!(query["a"], s("3"));
    }

    #[test]
    fn test_traditional_accumulates() {
        let query = decode_query("a=1&a=2&a=3", true).unwrap();
        assert_eq!(query["a"], QueryValue::Array(vec![s("1"), s("2"), s("3")]));
    }

    #[test]
    fn test_traditional_flattens_pushed_values() {
        let query = decode_query("a[]=1&a[]=2", true).unwrap();
        assert_eq!(query["a"], QueryValue::Array(vec![s("1"), s("2")]));
    }

    #[test]
    fn test_plus_and_percent_decoding() {
        let query = decode_query("q=hello+world&sym=a%2Bb&name=caf%C3%A9", false).unwrap();

        assert_eq!(query["q"], s("hello world"));
        assert_eq!(query["sym"], s("a+b"));
        assert_eq!(query["name"], s("café"));
    }

    #[test]
    fn test_encoded_brackets_in_key() {
        let query = decode_query("a%5Bb%5D=1", false).unwrap();
        assert_eq!(query["a"].get("b"), Some(&s("1")));
    }

    #[test]
    fn test_missing_value() {
        let query = decode_query("flag&x=", false).unwrap();

        assert_eq!(query["flag"], s(""));
        assert_eq!(query["x"], s(""));
    }

    #[test]
    fn test_malformed_tokens_are_skipped() {
        let query = decode_query("=1&[a]=2&b[c=3&d[e]f=4&ok=5&&", false).unwrap();

        assert_eq!(query.len(), 1);
        assert_eq!(query["ok"], s("5"));
    }

    #[test]
    fn test_sparse_index_pads_with_empty_strings() {
        let query = decode_query("a[2]=x", false).unwrap();
        assert_eq!(query["a"], QueryValue::Array(vec![s(""), s(""), s("x")]));
    }

    #[test]
    fn test_large_index_becomes_map_key() {
        let query = decode_query("a[5000]=x", false).unwrap();
        assert_eq!(query["a"].get("5000"), Some(&s("x")));
    }

    #[test]
    fn test_named_key_on_array_promotes_to_map() {
        let query = decode_query("a[]=x&a[k]=y", false).unwrap();
        let a = query["a"].as_map().unwrap();

        assert_eq!(a["0"], s("x"));
        assert_eq!(a["k"], s("y"));
    }

    #[test]
    fn test_deep_merge() {
        let query = decode_query("a[b][c]=1&a[b][d]=2", false).unwrap();
        let b = query["a"].get("b").unwrap();

        assert_eq!(b.get("c"), Some(&s("1")));
        assert_eq!(b.get("d"), Some(&s("2")));
    }

    #[test]
    fn test_push_into_nested_array() {
        let query = decode_query("a[x][]=1&a[y][]=2&a[x][]=3", false).unwrap();

        assert_eq!(query["a"].get("x"), Some(&QueryValue::Array(vec![s("1"), s("3")])));
        assert_eq!(query["a"].get("y"), Some(&QueryValue::Array(vec![s("2")])));
    }

    #[test]
    fn test_split_key_depth_limit() {
        let key = format!("a{}", "[x]".repeat(MAX_DEPTH + 2));
        let (name, sub_keys) = split_key(&key).unwrap();

        assert_eq!(name, "a");
        assert_eq!(sub_keys.len(), MAX_DEPTH + 1);
        assert_eq!(sub_keys[MAX_DEPTH], "[x][x]");
    }

    #[test]
    fn test_deeply_nested_key_is_bounded() {
        let brackets = 5000;
        let query = decode_query(&format!("a{}=1", "[]".repeat(brackets)), false).unwrap();

        let mut value = &query["a"];
        for _ in 0..MAX_DEPTH {
            let items = value.as_array().unwrap();
            assert_eq!(items.len(), 1);
            value = &items[0];
        }

        let rest = "[]".repeat(brackets - MAX_DEPTH);
        assert_eq!(value.get(&rest), Some(&s("1")));
    }

    #[test]
    fn test_invalid_utf8_is_an_error() {
        let result = decode_query("a=%FF", false);
        assert!(matches!(result, Err(UriError::Decode(_))));
    }

    #[test]
    fn test_empty_input() {
        assert!(decode_query("", false).unwrap().is_empty());
        assert!(decode_query("?", false).unwrap().is_empty());
    }
}
