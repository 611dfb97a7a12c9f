//! Query string encoding with bracket notation.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use crate::types::{FormField, QueryMap, QueryValue};

/// Characters left alone by `encodeURIComponent`.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Serialize a nested structure into a query string.
///
/// Map entries become `key[sub]=value`. Array elements become `key[]=value`
/// for scalars and `key[index][...]` for structured elements. In
/// `traditional` mode arrays repeat the key (`key=a&key=b`) and maps are not
/// expanded. Spaces are written as `+`.
///
/// # Arguments
///
/// * `data` - Top-level keys and their values
/// * `traditional` - Use repeated keys instead of bracket notation
///
/// # Returns
///
/// The encoded query string, without a leading `?`.
pub fn encode_query(data: &QueryMap, traditional: bool) -> String {
    let mut pairs = Vec::new();
    for (key, value) in data {
        build_params(key, value, traditional, &mut pairs);
    }
    finish(pairs)
}

/// Serialize form-style `name=value` pairs in order.
pub fn encode_pairs(fields: &[FormField]) -> String {
    let pairs = fields
        .iter()
        .map(|field| encode_pair(&field.name, &field.value))
        .collect();
    finish(pairs)
}

fn build_params(prefix: &str, value: &QueryValue, traditional: bool, pairs: &mut Vec<String>) {
    match value {
        QueryValue::Array(items) => {
            for (index, item) in items.iter().enumerate() {
                if traditional || prefix.ends_with("[]") {
                    add(prefix, item, pairs);
                } else if item.is_structured() {
                    build_params(&format!("{prefix}[{index}]"), item, traditional, pairs);
                } else {
                    build_params(&format!("{prefix}[]"), item, traditional, pairs);
                }
            }
        }
        QueryValue::Map(map) if !traditional => {
            for (key, item) in map {
                build_params(&format!("{prefix}[{key}]"), item, traditional, pairs);
            }
        }
        _ => add(prefix, value, pairs),
    }
}

/// Structured values reaching this point have no scalar form and are
/// written as empty.
fn add(key: &str, value: &QueryValue, pairs: &mut Vec<String>) {
    pairs.push(encode_pair(key, value.as_str().unwrap_or("")));
}

fn encode_pair(key: &str, value: &str) -> String {
    format!(
        "{}={}",
        utf8_percent_encode(key, COMPONENT),
        utf8_percent_encode(value, COMPONENT)
    )
}

fn finish(pairs: Vec<String>) -> String {
    pairs.join("&").replace("%20", "+")
}
