//! Autocomplete over the keyword vocabulary.

use crate::keywords::{normalize_query, KeywordDictionary};

/// Maximum number of suggestions returned by [`suggested_keywords`].
pub const SUGGESTION_LIMIT: usize = 5;

/// Keywords starting with the partial query, in dictionary order.
///
/// Returns at most [`SUGGESTION_LIMIT`] entries.
pub fn suggested_keywords<'d>(dictionary: &'d KeywordDictionary, partial: &str) -> Vec<&'d str> {
    suggested_keywords_with_limit(dictionary, partial, SUGGESTION_LIMIT)
}

/// Like [`suggested_keywords`] with a caller-chosen cap.
///
/// Blank input matches every keyword, so it yields the first `limit` keys.
pub fn suggested_keywords_with_limit<'d>(
    dictionary: &'d KeywordDictionary,
    partial: &str,
    limit: usize,
) -> Vec<&'d str> {
    let prefix = normalize_query(partial);
    dictionary
        .iter()
        .map(|(keyword, _)| keyword)
        .filter(|keyword| keyword.starts_with(&prefix))
        .take(limit)
        .collect()
}
