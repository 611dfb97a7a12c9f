//! Lenient URL decomposition.
//!
//! A single pattern splits a URL string into protocol, auth, host, path,
//! query and hash. The parser never rejects a string: anything it cannot
//! recognize is left unset on the returned [`ParsedUrl`].

use log::trace;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::error::UriError;
use crate::query::codec::QueryCodec;
use crate::types::ParsedUrl;

/// Composite URL pattern.
///
/// Auth is recognized heuristically as a run without `@`, `.`, `/`, `?`,
/// `#` or whitespace followed by `@`, so `user.name@host` is not split into
/// auth and host.
static URL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"(?s)^",
        r"(?P<protocol>[A-Za-z][A-Za-z0-9+.\-]*:)?",
        r"(?P<slashes>//)?",
        r"(?:(?P<auth>[^@./?#\s]*)@)?",
        r"(?P<host>",
        r"(?P<hostname>[A-Za-z0-9](?:[A-Za-z0-9\-]*[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9\-]*[A-Za-z0-9])?)*)",
        r"(?::(?P<port>[0-9]+))?",
        r")?",
        r"(?P<path>(?P<pathname>[^?#]*)(?P<search>\?[^#]*)?)",
        r"(?P<hash>#.*)?$",
    ))
    .expect("URL pattern is valid")
});

/// Reusable parse options.
///
/// # Examples
///
/// ```
/// use urlkit::UrlParser;
///
/// let parser = UrlParser::new().parse_query(true);
/// let parsed = parser.parse("https://example.com/search?q=rust")?;
///
/// let query = parsed.query.unwrap();
/// assert_eq!(query["q"].as_str(), Some("rust"));
/// # Ok::<(), urlkit::UriError>(())
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UrlParser {
    parse_query: bool,
    slashes_denote_host: bool,
    codec: QueryCodec,
}

impl UrlParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode the query string into [`ParsedUrl::query`].
    pub fn parse_query(mut self, parse_query: bool) -> Self {
        self.parse_query = parse_query;
        self
    }

    /// Treat a leading `//` as the start of a host instead of a path.
    pub fn slashes_denote_host(mut self, slashes_denote_host: bool) -> Self {
        self.slashes_denote_host = slashes_denote_host;
        self
    }

    /// Codec used to decode the query string.
    pub fn codec(mut self, codec: QueryCodec) -> Self {
        self.codec = codec;
        self
    }

    /// Split `url` into its components.
    ///
    /// Only fails if query parsing was requested and the query string does
    /// not percent-decode to valid UTF-8.
    pub fn parse(&self, url: &str) -> Result<ParsedUrl, UriError> {
        let mut parsed = if !self.slashes_denote_host && is_opaque_path(url) {
            trace!("treating {url:?} as an opaque path");
            parse_opaque_path(url)
        } else {
            URL_PATTERN
                .captures(url)
                .map(|caps| from_captures(&caps))
                .unwrap_or_default()
        };

        if self.parse_query {
            let search = parsed.search.as_deref().unwrap_or("");
            parsed.query = Some(self.codec.unparam(search)?);
        }

        Ok(parsed)
    }
}

/// Split a URL string into its components.
///
/// With `slashes_denote_host` unset, a string starting with `//` is taken as
/// a path and no host is inferred from it.
///
/// # Examples
///
/// ```
/// use urlkit::parse;
///
/// let parsed = parse("HTTP://user:pw@Example.com:8080/a/b?x=1#top", false, false)?;
/// assert_eq!(parsed.protocol.as_deref(), Some("HTTP:"));
/// assert_eq!(parsed.auth.as_deref(), Some("user:pw"));
/// assert_eq!(parsed.host.as_deref(), Some("Example.com:8080"));
/// assert_eq!(parsed.port.as_deref(), Some("8080"));
/// assert_eq!(parsed.pathname.as_deref(), Some("/a/b"));
/// assert_eq!(parsed.search.as_deref(), Some("?x=1"));
/// assert_eq!(parsed.hash.as_deref(), Some("#top"));
/// assert_eq!(parsed.href(), "http://user:pw@example.com:8080/a/b?x=1#top");
/// # Ok::<(), urlkit::UriError>(())
/// ```
pub fn parse(
    url: &str,
    parse_query: bool,
    slashes_denote_host: bool,
) -> Result<ParsedUrl, UriError> {
    UrlParser::new()
        .parse_query(parse_query)
        .slashes_denote_host(slashes_denote_host)
        .parse(url)
}

/// Like [`parse`], for callers holding an optional URL.
///
/// A missing URL is an [`UriError::InvalidInput`]; every present string,
/// including the empty one, is accepted.
pub fn parse_opt(
    url: Option<&str>,
    parse_query: bool,
    slashes_denote_host: bool,
) -> Result<ParsedUrl, UriError> {
    let url = url.ok_or(UriError::InvalidInput { param: "url" })?;
    parse(url, parse_query, slashes_denote_host)
}

impl ParsedUrl {
    /// Convert into a strict [`url::Url`].
    ///
    /// Unlike [`ParsedUrl::href`], the `//` is only emitted when the parsed
    /// input had it. Values without a protocol cannot be converted.
    pub fn to_url(&self) -> Result<::url::Url, UriError> {
        let mut serialized = String::new();

        if let Some(protocol) = &self.protocol {
            serialized.push_str(&protocol.to_lowercase());
        }
        if self.slashes {
            serialized.push_str("//");
        }
        if let Some(auth) = &self.auth {
            serialized.push_str(auth);
            serialized.push('@');
        }
        if let Some(host) = &self.host {
            serialized.push_str(host);
        }
        if let Some(path) = &self.path {
            serialized.push_str(path);
        }
        if let Some(hash) = &self.hash {
            serialized.push_str(hash);
        }

        Ok(::url::Url::parse(&serialized)?)
    }
}

fn is_opaque_path(url: &str) -> bool {
    url.strip_prefix("//")
        .map(|rest| !rest.starts_with('?'))
        .unwrap_or(false)
}

fn parse_opaque_path(url: &str) -> ParsedUrl {
    let (before_hash, hash) = match url.find('#') {
        Some(index) => (&url[..index], Some(&url[index..])),
        None => (url, None),
    };
    let (pathname, search) = match before_hash.find('?') {
        Some(index) => (&before_hash[..index], Some(&before_hash[index..])),
        None => (before_hash, None),
    };

    ParsedUrl {
        path: Some(before_hash.to_string()),
        pathname: Some(pathname.to_string()),
        search: search.map(str::to_string),
        hash: hash.map(str::to_string),
        ..Default::default()
    }
}

fn from_captures(caps: &Captures<'_>) -> ParsedUrl {
    let group = |name: &str| caps.name(name).map(|m| m.as_str().to_string());
    let non_empty = |name: &str| group(name).filter(|value| !value.is_empty());

    ParsedUrl {
        protocol: group("protocol"),
        slashes: caps.name("slashes").is_some(),
        auth: group("auth"),
        host: group("host"),
        hostname: group("hostname"),
        port: group("port"),
        path: non_empty("path"),
        pathname: non_empty("pathname"),
        search: group("search"),
        query: None,
        hash: group("hash"),
    }
}
