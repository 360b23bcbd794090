//! Prefix matching module
//!
//! Matches a request path against a mount prefix and splits the remainder
//! into decoded route segments.

use percent_encoding::percent_decode_str;

/// Match `path` against `prefix` on a segment boundary
///
/// Returns the remainder after the prefix. An empty prefix (root mount)
/// matches every path.
pub fn match_prefix<'a>(prefix: &str, path: &'a str) -> Option<&'a str> {
    let rest = path.strip_prefix(prefix)?;
    if rest.is_empty() || rest.starts_with('/') {
        Some(rest)
    } else {
        None
    }
}

/// Split the remainder of a path into percent-decoded segments
///
/// Empty segments (`//`, leading or trailing slash) are dropped.
pub fn split_route(rest: &str) -> Vec<String> {
    rest.split('/')
        .filter(|segment| !segment.is_empty())
        .map(|segment| percent_decode_str(segment).decode_utf8_lossy().into_owned())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_match_prefix_boundary() {
        assert_eq!(match_prefix("/files", "/files"), Some(""));
        assert_eq!(match_prefix("/files", "/files/"), Some("/"));
        assert_eq!(match_prefix("/files", "/files/a/b.js"), Some("/a/b.js"));
        assert_eq!(match_prefix("/files", "/filesystem/a"), None);
        assert_eq!(match_prefix("/files", "/other"), None);
    }

    #[test]
    fn test_match_prefix_root() {
        assert_eq!(match_prefix("", "/"), Some("/"));
        assert_eq!(match_prefix("", "/anything/at/all"), Some("/anything/at/all"));
    }

    #[test]
    fn test_split_route() {
        assert_eq!(split_route(""), Vec::<String>::new());
        assert_eq!(split_route("/"), Vec::<String>::new());
        assert_eq!(split_route("/a//b/"), vec!["a", "b"]);
        assert_eq!(split_route("/my%20docs/x.txt"), vec!["my docs", "x.txt"]);
        assert_eq!(split_route("/%2e%2e/etc"), vec!["..", "etc"]);
    }

    #[test]
    fn test_split_route_invalid_utf8_is_lossy() {
        assert_eq!(split_route("/%FF.txt"), vec!["\u{FFFD}.txt"]);
    }
}
