//! Filename normalization for duplicate detection.

use std::collections::HashSet;

use unicode_normalization::UnicodeNormalization;

/// Normalize a filename for comparison.
///
/// NFKC-folds, lowercases and drops everything that is not alphanumeric, so
/// `"Report (1).PDF"` and `"report1.pdf"` compare equal.
pub fn normalize_filename(name: &str) -> String {
    name.nfkc()
        .flat_map(char::to_lowercase)
        .filter(|c| c.is_alphanumeric())
        .collect()
}

/// Keep the first item for each normalized key, preserving order.
pub fn dedupe_by<T>(items: Vec<T>, key: impl Fn(&T) -> &str) -> Vec<T> {
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(normalize_filename(key(item))))
        .collect()
}
