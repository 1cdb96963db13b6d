//! JavaScript keyword classification.

/// Check whether a keyword permits a regex literal right after it.
///
/// `return/ x /g;` returns a regex literal; `reTurn/ x /g;` performs
/// two divisions. Most keywords can be treated like ordinary
/// identifiers, but the ones below put the grammar in a position where
/// a following `/` must start a regex, so the scanner has to keep them
/// in their own bucket.
pub(crate) fn can_precede_regex(lexeme: &[u8]) -> bool {
    matches!(
        lexeme,
        b"await"
            | b"case"
            | b"delete"
            | b"do"
            | b"else"
            | b"in"
            | b"instanceof"
            | b"new"
            | b"return"
            | b"throw"
            | b"typeof"
            | b"void"
            | b"yield"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_regex_permitting_keywords() {
        assert!(can_precede_regex(b"return"));
        assert!(can_precede_regex(b"throw"));
        assert!(can_precede_regex(b"typeof"));
        assert!(can_precede_regex(b"case"));
    }

    #[test]
    fn test_names_and_value_keywords_do_not_permit_regex() {
        assert!(!can_precede_regex(b"foo"));
        assert!(!can_precede_regex(b"reTurn"));
        assert!(!can_precede_regex(b"var"));
        assert!(!can_precede_regex(b"this"));
        assert!(!can_precede_regex(b"null"));
        assert!(!can_precede_regex(b"42"));
    }
}
