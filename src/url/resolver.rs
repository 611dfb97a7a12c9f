//! Relative URL resolution the way a browser resolves an anchor's `href`.

use log::trace;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::url::normalizer::normalize;

/// Schemes whose URLs carry a `//` authority.
const AUTHORITY_SCHEMES: &[&str] = &["http", "https", "ftp", "gopher", "file"];

static SCHEME_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([A-Za-z][A-Za-z0-9+.\-]*):").expect("scheme pattern is valid"));

/// A URL split into the part that stays fixed during resolution (`root`)
/// and the part that path math applies to.
#[derive(Debug, Clone, PartialEq)]
struct ResolvedUrl<'a> {
    /// Lowercased scheme name without the colon
    protocol: Option<String>,
    /// Scheme plus authority (`http://host`), or just `scheme:`, or empty
    root: &'a str,
    path: String,
    has_authority: bool,
    raw: &'a str,
}

impl<'a> ResolvedUrl<'a> {
    fn split(raw: &'a str) -> Self {
        let Some(caps) = SCHEME_PATTERN.captures(raw) else {
            return Self {
                protocol: None,
                root: "",
                path: raw.to_string(),
                has_authority: false,
                raw,
            };
        };

        let protocol = caps[1].to_lowercase();
        let scheme_end = caps[0].len();
        let has_authority = AUTHORITY_SCHEMES.contains(&protocol.as_str());

        let root_end = if has_authority {
            let slashes = raw[scheme_end..].bytes().take(2).take_while(|&b| b == b'/').count();
            let authority_start = scheme_end + slashes;
            raw[authority_start..]
                .find('/')
                .map(|offset| authority_start + offset)
                .unwrap_or(raw.len())
        } else {
            scheme_end
        };

        let mut path = raw[root_end..].to_string();
        if has_authority && path.is_empty() {
            path.push('/');
        }

        Self {
            protocol: Some(protocol),
            root: &raw[..root_end],
            path,
            has_authority,
            raw,
        }
    }
}

/// Resolve `relative` against `base`.
///
/// A query-only or fragment-only reference is appended to `base` verbatim.
/// A reference with a different scheme replaces `base` entirely. Otherwise
/// the reference path is merged with the base path and normalized.
///
/// # Examples
///
/// ```
/// use urlkit::resolve;
///
/// assert_eq!(resolve("http://example.com/a/b/c", "d"), "http://example.com/a/b/d");
/// assert_eq!(resolve("http://example.com/a/b/c", "/x/y"), "http://example.com/x/y");
/// assert_eq!(resolve("http://example.com/a/b/c", "../d"), "http://example.com/a/d");
/// assert_eq!(resolve("http://example.com/a", "https://other.com/b"), "https://other.com/b");
/// ```
pub fn resolve(base: &str, relative: &str) -> String {
    if relative.starts_with('?') || relative.starts_with('#') {
        return format!("{base}{relative}");
    }

    let base = ResolvedUrl::split(base);
    let relative = ResolvedUrl::split(relative);

    if relative.protocol.is_some() && relative.protocol != base.protocol {
        trace!("scheme change from {:?} discards base {:?}", base.protocol, base.raw);
        return format!("{}{}", relative.root, relative.path);
    }

    let root = if relative.root.is_empty() || relative.root.starts_with(base.root) {
        base.root
    } else {
        relative.root
    };

    let path = if relative.path.starts_with('/') {
        relative.path.clone()
    } else if relative.protocol.is_some() && !relative.has_authority {
        if relative.path.is_empty() {
            base.path.clone()
        } else if !base.path.starts_with('/') {
            format!("/{}", relative.path)
        } else {
            relative.path.clone()
        }
    } else {
        let directory = base.path.rfind('/').map(|index| &base.path[..=index]).unwrap_or("");
        format!("{directory}{}", relative.path)
    };

    trace!("resolved {:?} against root {root:?} to path {path:?}", relative.raw);
    format!("{root}{}", normalize(&path))
}
