//! WASM bindings for the app's JavaScript client.

use wasm_bindgen::prelude::*;

use crate::{parse_events, parse_venues, KeywordDictionary, SearchEngine};

const EMPTY_RESULT: &str = r#"{"venues":[],"events":[],"matchedKeywords":[]}"#;

/// Run a smart search and return the result as JSON.
///
/// # Arguments
/// * `query` - Free-text query
/// * `venues_json` - JSON array of venue records
/// * `events_json` - JSON array of event records
/// * `city` - Selected city
///
/// # Returns
/// JSON object with `venues`, `events` and `matchedKeywords`. Malformed
/// input yields the empty result.
#[wasm_bindgen(js_name = smartSearch)]
pub fn smart_search(query: &str, venues_json: &str, events_json: &str, city: &str) -> String {
    let (Ok(venues), Ok(events)) = (parse_venues(venues_json), parse_events(events_json)) else {
        return EMPTY_RESULT.to_string();
    };

    let result = SearchEngine::default().search(query, &venues, &events, city);
    serde_json::to_string(&result).unwrap_or_else(|_| EMPTY_RESULT.to_string())
}

/// Autocomplete suggestions for a partial query, as a JSON array of strings.
#[wasm_bindgen(js_name = getSuggestedKeywords)]
pub fn suggested_keywords(partial: &str) -> String {
    let suggestions = crate::suggested_keywords(KeywordDictionary::builtin(), partial);
    serde_json::to_string(&suggestions).unwrap_or_else(|_| "[]".to_string())
}
