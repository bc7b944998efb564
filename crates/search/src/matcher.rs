//! Keyword matching against venue and event records.

use crate::keywords::{KeywordDictionary, KeywordRule};
use crate::model::{Event, Venue};

/// Returns true if the venue attribute named by `rule` contains its value.
///
/// List attributes match when any element contains the value; text
/// attributes must be non-empty. Comparison is case-insensitive on both
/// sides, and a missing attribute never matches.
pub fn rule_matches(venue: &Venue, rule: &KeywordRule) -> bool {
    let needle = rule.value.to_lowercase();
    venue
        .field(rule.field)
        .is_some_and(|attribute| attribute.contains_folded(&needle))
}

/// Looks up `keyword` and tests it against the venue.
///
/// Unknown keywords never match.
pub fn keyword_matches(dictionary: &KeywordDictionary, venue: &Venue, keyword: &str) -> bool {
    dictionary
        .get(keyword)
        .is_some_and(|rule| rule_matches(venue, rule))
}

/// Returns true if the event's genre contains the rule's value.
///
/// Only meaningful for event-category rules.
pub fn event_matches_rule(event: &Event, rule: &KeywordRule) -> bool {
    event
        .genre_text()
        .is_some_and(|genre| genre.to_lowercase().contains(&rule.value.to_lowercase()))
}
