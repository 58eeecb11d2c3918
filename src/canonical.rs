//! Lexical canonicalization of caller-supplied resource names.
//!
//! Nothing in here touches the filesystem. Names are rewritten to use a single
//! separator, `.` segments are dropped and `..` segments are collapsed against the
//! segment before them. Whatever cannot be resolved is left in place so that
//! [`is_escaping`] can reject it.

/// Separator used by canonical paths.
pub const SEPARATOR: char = '\\';
/// Separator accepted from callers and rewritten to [`SEPARATOR`].
pub const ALT_SEPARATOR: char = '/';

const RESERVED: &[char] = &[':', '*', '?', '"', '<', '>', '|'];

const CUR_INNER: &str = "\\.\\";
const CUR_LEADING: &str = ".\\";
const CUR_TRAILING: &str = "\\.";
const PARENT: &str = "..";
const PARENT_INNER: &str = "\\..\\";
const PARENT_LEADING: &str = "..\\";
const PARENT_TRAILING: &str = "\\..";

/// Rewrite `raw` into its canonical form. Never fails; an empty input yields an
/// empty output.
pub fn canonicalize(raw: &str) -> String {
    let mut path = raw.replace(ALT_SEPARATOR, "\\");

    while path.contains(CUR_INNER) {
        path = path.replace(CUR_INNER, "\\");
    }

    while let Some(rest) = path.strip_prefix(CUR_LEADING) {
        path = rest.to_string();
    }

    while path.ends_with(CUR_TRAILING) {
        if path.len() > CUR_TRAILING.len() {
            path.truncate(path.len() - CUR_TRAILING.len());
        } else {
            path = SEPARATOR.to_string();
        }
    }

    // A match at offset 0 is a rooted path and is never collapsed.
    let mut from = 1;
    while let Some(at) = find_from(&path, PARENT_INNER, from) {
        from = match collapse_parent(&mut path, at, PARENT_INNER.len()) {
            Some(resume) => resume,
            None => at + 1,
        };
    }

    if path.ends_with(PARENT_TRAILING) {
        let at = path.len() - PARENT_TRAILING.len();
        if at > 0 {
            collapse_parent(&mut path, at, PARENT_TRAILING.len());
        }
    }

    if path == "." {
        path.clear();
    }
    path
}

/// True when a canonical path could leave the directory it is joined to, or names
/// something no filesystem entry can be called.
pub fn is_escaping(canonical: &str) -> bool {
    canonical.contains(RESERVED)
        || canonical.starts_with(SEPARATOR)
        || canonical.starts_with(PARENT_LEADING)
        || canonical.contains(PARENT_INNER)
        || canonical.ends_with(PARENT_TRAILING)
        || canonical == PARENT
}

/// Canonicalize `raw` and test the result with [`is_escaping`].
pub fn is_path_escaping(raw: &str) -> bool {
    is_escaping(&canonicalize(raw))
}

/// First occurrence of `pattern` at or after byte offset `from`.
fn find_from(path: &str, pattern: &str, mut from: usize) -> Option<usize> {
    // patterns start with an ASCII separator, so skipping to a char boundary
    // cannot step over a match
    while from < path.len() && !path.is_char_boundary(from) {
        from += 1;
    }
    if from >= path.len() {
        return None;
    }
    path[from..].find(pattern).map(|i| i + from)
}

/// Remove the `..` found at `at` together with the segment it cancels. Returns the
/// offset to resume scanning from, or `None` when the preceding segment is itself
/// an unresolved `..` and nothing was removed.
fn collapse_parent(path: &mut String, at: usize, len: usize) -> Option<usize> {
    let start = path[..at].rfind(SEPARATOR).map_or(0, |sep| sep + 1);
    if &path[start..at] == PARENT {
        return None;
    }
    path.replace_range(start..at + len, "");
    Some(start.saturating_sub(1).max(1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_and_dot_are_empty() {
        assert_eq!(canonicalize(""), "");
        assert_eq!(canonicalize("."), "");
        assert_eq!(canonicalize("./."), "");
    }

    #[test]
    fn separators_normalized() {
        assert_eq!(canonicalize("a/b\\c"), "a\\b\\c");
    }

    #[test]
    fn same_directory_segments_removed() {
        assert_eq!(canonicalize("a\\.\\b"), "a\\b");
        assert_eq!(canonicalize("a/././b"), "a\\b");
        assert_eq!(canonicalize("./././a"), "a");
        assert_eq!(canonicalize("a/b/."), "a\\b");
    }

    #[test]
    fn trailing_dot_alone_keeps_root() {
        assert_eq!(canonicalize("\\."), "\\");
        assert_eq!(canonicalize("/./."), "\\");
    }

    #[test]
    fn parent_collapses_sibling() {
        assert_eq!(canonicalize("a\\b\\..\\c"), "a\\c");
        assert_eq!(canonicalize("a/b/../c/d/../e"), "a\\c\\e");
    }

    #[test]
    fn parent_cascade() {
        assert_eq!(canonicalize("a\\b\\..\\..\\c"), "c");
        assert_eq!(canonicalize("a/b/c/../../../d"), "d");
    }

    #[test]
    fn trailing_parent_collapses_once() {
        assert_eq!(canonicalize("a\\b\\.."), "a\\");
        assert_eq!(canonicalize("a\\.."), "");
    }

    #[test]
    fn unresolved_parent_survives() {
        assert_eq!(canonicalize("..\\a"), "..\\a");
        assert_eq!(canonicalize("a/../../b"), "..\\b");
        assert_eq!(canonicalize(".."), "..");
        assert_eq!(canonicalize("./.."), "..");
    }

    #[test]
    fn parent_does_not_cancel_parent() {
        assert_eq!(canonicalize("../../x"), "..\\..\\x");
        assert_eq!(canonicalize("../.."), "..\\..");
        assert_eq!(canonicalize("../../a/../b"), "..\\..\\b");
    }

    #[test]
    fn rooted_parent_untouched() {
        assert_eq!(canonicalize("/../a"), "\\..\\a");
        assert_eq!(canonicalize("/a/../../b"), "\\..\\b");
    }

    #[test]
    fn multibyte_segments() {
        assert_eq!(canonicalize("é/../ü/ß"), "ü\\ß");
        assert_eq!(canonicalize("日本/語/../x"), "日本\\x");
    }

    #[test]
    fn escaping_cases() {
        assert!(is_escaping("..\\a"));
        assert!(is_escaping(".."));
        assert!(is_escaping("\\etc\\passwd"));
        assert!(is_escaping("a\\..\\..\\b"));
        assert!(is_escaping("a\\.."));
        assert!(is_escaping("c:\\windows"));
        for c in RESERVED {
            assert!(is_escaping(&format!("a{c}b")), "{c} should be rejected");
        }
    }

    #[test]
    fn contained_cases() {
        assert!(!is_escaping(""));
        assert!(!is_escaping("a"));
        assert!(!is_escaping("a\\b.txt"));
        assert!(!is_escaping("..a\\b"));
        assert!(!is_escaping("a..\\b"));
    }

    #[test]
    fn raw_names_checked_after_canonicalization() {
        assert!(is_path_escaping("../secrets.txt"));
        assert!(is_path_escaping("./../secrets.txt"));
        assert!(is_path_escaping("a/./../../secrets.txt"));
        assert!(is_path_escaping("/etc/passwd"));
        assert!(!is_path_escaping("a/b/../c.txt"));
        assert!(!is_path_escaping("./a.txt"));
    }
}
