//! Shared utility functions.

/// Truncate a string to approximately `max_bytes` without splitting a UTF-8
/// character boundary.
pub fn truncate_str(s: &str, max_bytes: usize) -> &str {
    if s.len() <= max_bytes {
        return s;
    }
    let mut end = max_bytes;
    while end > 0 && !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

/// Trim, collapse runs of whitespace to a single space and lowercase.
///
/// Two titles refer to the same book for deduplication purposes when their
/// normalized forms are equal.
pub fn normalize_title(title: &str) -> String {
    title
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_ascii() {
        assert_eq!(truncate_str("hello world", 5), "hello");
    }

    #[test]
    fn truncate_no_op_when_short() {
        assert_eq!(truncate_str("hi", 10), "hi");
    }

    #[test]
    fn truncate_multibyte_boundary() {
        // '书' is 3 bytes; cutting at 4 backs up to the first character
        let s = "好书单";
        assert_eq!(truncate_str(s, 4), "好");
        assert_eq!(truncate_str(s, 6), "好书");
    }

    #[test]
    fn normalize_collapses_case_and_spacing() {
        assert_eq!(normalize_title("  The   Left Hand\tof Darkness "), "the left hand of darkness");
        assert_eq!(normalize_title("DUNE"), normalize_title("dune"));
    }

    #[test]
    fn normalize_empty() {
        assert_eq!(normalize_title("   "), "");
    }
}
