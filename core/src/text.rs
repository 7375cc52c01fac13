use unicode_normalization::UnicodeNormalization;

/// Fold text for case-insensitive comparison: NFKC normalization, then lowercase.
pub fn fold(text: &str) -> String {
    text.nfkc().collect::<String>().to_lowercase()
}

/// Case-insensitive substring test. `needle` must already be folded.
pub fn contains_folded(haystack: &str, needle: &str) -> bool {
    fold(haystack).contains(needle)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn folds_case_and_compatibility_forms() {
        assert_eq!(fold("ISO9001"), "iso9001");
        // fullwidth "ＩＳＯ" normalizes to ascii under NFKC
        assert_eq!(fold("ＩＳＯ"), "iso");
    }

    #[test]
    fn substring_match_ignores_case() {
        assert!(contains_folded("Ocean Freight", "freight"));
        assert!(!contains_folded("Air", "ocean"));
    }
}
