//! Structural interpretation of classification codes.
//!
//! A code is a fixed run of [`CODE_LEN`] ASCII digits partitioned into
//! [`CODE_SEGMENTS`]. The digit `'0'` is the placeholder: a segment made of
//! placeholders only carries no information, and the depth of the deepest
//! non-placeholder segment is the code's level. The all-placeholder code is
//! the section grand total.

use crate::constants::{CODE_LEN, CODE_SEGMENTS, TOTAL_CODE};
use crate::errors::{Error, Result};

/// Validates a code against the fixed scheme.
///
/// Fails with `InvalidCodeFormat` when the code is not exactly [`CODE_LEN`]
/// ASCII digits.
pub fn validate(code: &str) -> Result<()> {
    if code.len() != CODE_LEN || !code.bytes().all(|b| b.is_ascii_digit()) {
        return Err(Error::InvalidCodeFormat(code.to_string()));
    }
    Ok(())
}

/// Level implied by a code's non-placeholder length: the index of the
/// deepest segment containing a non-zero digit. The all-placeholder code
/// has level 0.
///
/// The caller is expected to have validated the code.
pub fn derived_level(code: &str) -> i32 {
    let mut level = 0;
    let mut offset = 0;
    for (idx, width) in CODE_SEGMENTS.iter().enumerate() {
        let segment = &code[offset..offset + width];
        if segment.bytes().any(|b| b != b'0') {
            level = idx as i32;
        }
        offset += width;
    }
    level
}

/// Length of a code's significant prefix: the segments up to and including
/// the segment carrying its level.
///
/// The grand-total code has no significant segments at all and yields 0,
/// keeping it behind every real code when parent candidates are ranked by
/// prefix length.
pub fn significant_prefix_len(code: &str) -> usize {
    if code == TOTAL_CODE {
        return 0;
    }
    let level = derived_level(code) as usize;
    CODE_SEGMENTS.iter().take(level + 1).sum()
}

/// Whether `a` is a structural prefix-ancestor of `b`.
///
/// True when `a` sits strictly above `b` and `b` reproduces all of `a`'s
/// significant segments. The grand-total code is an ancestor of every other
/// code even though its single significant digit is a placeholder.
pub fn is_ancestor(a: &str, b: &str) -> bool {
    if a == b {
        return false;
    }
    if a == TOTAL_CODE {
        return true;
    }
    if derived_level(a) >= derived_level(b) {
        return false;
    }
    let prefix = significant_prefix_len(a);
    b.as_bytes()[..prefix] == a.as_bytes()[..prefix]
}

#[cfg(test)]
mod tests {
    use super::*;

    const ROOT: &str = "10000000000000000";
    const CHILD: &str = "10100000000000000";
    const GRANDCHILD: &str = "10101000000000000";

    #[test]
    fn validate_accepts_well_formed_codes() {
        assert!(validate(ROOT).is_ok());
        assert!(validate(TOTAL_CODE).is_ok());
    }

    #[test]
    fn validate_rejects_wrong_length_and_non_digits() {
        assert!(matches!(
            validate("101"),
            Err(Error::InvalidCodeFormat(_))
        ));
        assert!(matches!(
            validate("1010000000000000X"),
            Err(Error::InvalidCodeFormat(_))
        ));
        assert!(matches!(
            validate("101000000000000000000"),
            Err(Error::InvalidCodeFormat(_))
        ));
    }

    #[test]
    fn derived_level_counts_significant_segments() {
        assert_eq!(derived_level(TOTAL_CODE), 0);
        assert_eq!(derived_level(ROOT), 0);
        assert_eq!(derived_level(CHILD), 1);
        assert_eq!(derived_level(GRANDCHILD), 2);
        assert_eq!(derived_level("10101001000000000"), 3);
        assert_eq!(derived_level("10101001001001001"), 6);
    }

    #[test]
    fn ancestor_follows_significant_prefix() {
        assert!(is_ancestor(ROOT, CHILD));
        assert!(is_ancestor(ROOT, GRANDCHILD));
        assert!(is_ancestor(CHILD, GRANDCHILD));
        assert!(!is_ancestor(CHILD, ROOT));
        assert!(!is_ancestor(CHILD, CHILD));
        // A sibling with a different significant prefix is unrelated.
        assert!(!is_ancestor("20000000000000000", CHILD));
    }

    #[test]
    fn significant_prefix_covers_segments_through_the_level() {
        assert_eq!(significant_prefix_len(ROOT), 1);
        assert_eq!(significant_prefix_len(CHILD), 3);
        assert_eq!(significant_prefix_len(GRANDCHILD), 5);
        // The grand total carries no significant segments, so every real
        // code outranks it as a parent candidate.
        assert_eq!(significant_prefix_len(TOTAL_CODE), 0);
    }

    #[test]
    fn total_code_is_ancestor_of_everything() {
        assert!(is_ancestor(TOTAL_CODE, ROOT));
        assert!(is_ancestor(TOTAL_CODE, GRANDCHILD));
        assert!(!is_ancestor(TOTAL_CODE, TOTAL_CODE));
        assert!(!is_ancestor(ROOT, TOTAL_CODE));
    }
}
