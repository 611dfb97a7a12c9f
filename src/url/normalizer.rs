//! Dot-segment normalization for slash-delimited paths.

/// Collapse `.` and `..` segments in a path.
///
/// This is a purely mechanical string transform:
/// 1. `/segment/..` pairs are removed (repeatedly, until none remain)
/// 2. leading `/..` and `/.` segments are collapsed to `/`
/// 3. any remaining `/.` segments are removed
///
/// No validation is done on the result. A relative path with more `..`
/// segments than real ones keeps the surplus.
///
/// # Examples
///
/// ```
/// use urlkit::normalize;
///
/// assert_eq!(normalize("/a/b/../../c"), "/c");
/// assert_eq!(normalize("/./a/./b"), "/a/b");
/// assert_eq!(normalize("../x"), "../x");
/// ```
pub fn normalize(path: &str) -> String {
    let mut path = path.to_string();

    while let Some(collapsed) = collapse_parent(&path) {
        path = collapsed;
    }

    while let Some(stripped) = strip_leading_dots(&path) {
        path = stripped;
    }

    while let Some(index) = find_self_reference(&path) {
        path.replace_range(index..index + 2, "");
    }

    path
}

/// Remove the first `/segment/..` pair found, keeping a single `/`.
fn collapse_parent(path: &str) -> Option<String> {
    let mut start = 0;

    while let Some(offset) = path[start..].find('/') {
        let slash = start + offset;
        let segment_start = slash + 1;
        let segment_end = segment_start + path[segment_start..].find('/')?;
        let segment = &path[segment_start..segment_end];
        let rest = &path[segment_end..];

        if !segment.is_empty() && segment != ".." && (rest.starts_with("/../") || rest == "/..") {
            let tail = &rest[3..];
            let tail = if tail.is_empty() { "/" } else { tail };
            return Some(format!("{}{}", &path[..slash], tail));
        }

        start = segment_end;
    }

    None
}

fn strip_leading_dots(path: &str) -> Option<String> {
    for prefix in ["/../", "/./"] {
        if let Some(rest) = path.strip_prefix(prefix) {
            return Some(format!("/{rest}"));
        }
    }

    if path == "/.." || path == "/." {
        return Some("/".to_string());
    }

    None
}

/// Byte offset of a `/.` that forms a whole segment.
fn find_self_reference(path: &str) -> Option<usize> {
    path.match_indices("/.")
        .map(|(index, _)| index)
        .find(|&index| {
            let after = &path[index + 2..];
            after.is_empty() || after.starts_with('/')
        })
}
