// Copyright 2023 Hugo Osvaldo Barrera
//
// SPDX-License-Identifier: EUPL-1.2

//! Utilities for handling the text of `href` and `status` nodes.
use std::borrow::Cow;
use std::str::Utf8Error;

use http::{StatusCode, Uri};
use percent_encoding::percent_decode_str;

use crate::entry::PropertyStatus;

/// Status codes recognised inside a `DAV:status` node, in order of precedence.
const STATUS_CODES: [(StatusCode, PropertyStatus); 4] = [
    (StatusCode::OK, PropertyStatus::Ok),
    (StatusCode::UNAUTHORIZED, PropertyStatus::Unauthorized),
    (StatusCode::FORBIDDEN, PropertyStatus::Forbidden),
    (StatusCode::NOT_FOUND, PropertyStatus::NotFound),
];

/// Classifies the text of a `DAV:status` node.
///
/// Example input string: `HTTP/1.1 200 OK`. The first known code found anywhere in the text
/// wins. Returns [`PropertyStatus::None`] if no known code is present.
///
/// # See also
///
/// - The [status element](https://www.rfc-editor.org/rfc/rfc2518#section-12.9.1.2)
/// - [Status-Line](https://www.rfc-editor.org/rfc/rfc2068#section-6.1)
#[must_use]
pub fn classify_statusline(status_line: &str) -> PropertyStatus {
    STATUS_CODES
        .iter()
        .find(|(code, _)| status_line.contains(code.as_str()))
        .map_or(PropertyStatus::None, |(_, status)| *status)
}

/// Returns the unescaped path of an `href`.
///
/// Servers may return either an absolute path or a full URL; for the latter only the path is
/// kept. The result is percent-decoded.
///
/// # Errors
///
/// If the decoded bytes are not valid UTF-8.
pub fn unquote_href(raw: &str) -> Result<Cow<'_, str>, Utf8Error> {
    let raw = raw.trim();
    if raw.contains("://") {
        if let Ok(uri) = raw.parse::<Uri>() {
            return percent_decode_str(uri.path())
                .decode_utf8()
                .map(|path| Cow::Owned(path.into_owned()));
        }
    }
    percent_decode_str(raw).decode_utf8()
}

/// Returns the last non-empty segment of a path.
///
/// The root path `/` is its own name.
#[must_use]
pub fn extract_name(path: &str) -> &str {
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        return if path.is_empty() { "" } else { "/" };
    }
    // '/' is ASCII, so this never splits a multi-byte character.
    let start = trimmed.rfind('/').map_or(0, |i| i + 1);
    &trimmed[start..]
}

/// Returns the path of the collection containing `path`, with a trailing slash.
///
/// Returns `None` for the root path, or for relative paths with a single segment.
#[must_use]
pub fn parent_path(path: &str) -> Option<&str> {
    let trimmed = path.trim_end_matches('/');
    let end = trimmed.rfind('/')?;
    Some(&trimmed[..=end])
}

/// Returns true if both paths refer to the same resource, ignoring trailing slashes.
#[must_use]
pub fn same_path(a: &str, b: &str) -> bool {
    a.trim_end_matches('/') == b.trim_end_matches('/')
}

#[cfg(test)]
mod tests {
    use crate::entry::PropertyStatus;
    use crate::xmlutils::{classify_statusline, extract_name, parent_path, same_path, unquote_href};

    #[test]
    fn test_classify_statusline() {
        assert_eq!(classify_statusline("HTTP/1.1 200 OK"), PropertyStatus::Ok);
        assert_eq!(
            classify_statusline("HTTP/1.1 401 Unauthorized"),
            PropertyStatus::Unauthorized
        );
        assert_eq!(
            classify_statusline("HTTP/1.1 403 Forbidden"),
            PropertyStatus::Forbidden
        );
        assert_eq!(
            classify_statusline("HTTP/1.1 404 Not Found"),
            PropertyStatus::NotFound
        );
        assert_eq!(
            classify_statusline("HTTP/1.1 500 Internal Server Error"),
            PropertyStatus::None
        );
        assert_eq!(classify_statusline(""), PropertyStatus::None);
        // Precedence follows the table, not the position in the text.
        assert_eq!(classify_statusline("404 200"), PropertyStatus::Ok);
    }

    #[test]
    fn test_unquote_href() {
        assert_eq!(
            unquote_href("/dav/%d0%94%d0%b8%d1%81%d0%ba%201/").unwrap(),
            "/dav/Диск 1/"
        );
        assert_eq!(unquote_href("/plain/path").unwrap(), "/plain/path");
        assert_eq!(
            unquote_href("https://example.com:8443/dav/My%20Files/").unwrap(),
            "/dav/My Files/"
        );
        assert!(unquote_href("/bad/%ff%fe").is_err());
    }

    #[test]
    fn test_extract_name() {
        assert_eq!(extract_name("/"), "/");
        assert_eq!(extract_name("/dav"), "dav");
        assert_eq!(extract_name("/dav/"), "dav");
        assert_eq!(extract_name("/dav/Диск 2/"), "Диск 2");
        assert_eq!(extract_name("/dav/Тестовый файл.txt"), "Тестовый файл.txt");
        assert_eq!(extract_name("relative"), "relative");
        assert_eq!(extract_name(""), "");
    }

    #[test]
    fn test_parent_path() {
        assert_eq!(parent_path("/dav/"), Some("/"));
        assert_eq!(parent_path("/dav/sub/"), Some("/dav/"));
        assert_eq!(parent_path("/dav/file.txt"), Some("/dav/"));
        assert_eq!(parent_path("/"), None);
        assert_eq!(parent_path("relative"), None);
    }

    #[test]
    fn test_same_path() {
        assert!(same_path("/dav", "/dav/"));
        assert!(same_path("/", "/"));
        assert!(!same_path("/dav/", "/dav/dav/"));
    }
}
