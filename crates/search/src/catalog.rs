//! Catalog ingestion.
//!
//! Venue and event feeds come back from the REST layer either as a bare
//! JSON array or wrapped in an envelope object. Records are decoded one by
//! one so a single malformed entry cannot sink the whole catalog.
//!
//! The document itself must still be valid JSON. Syntax errors and numeric
//! literals outside the `f64` range (`"rating": 1e400`) are rejected by the
//! JSON parser before any record is looked at, and fail the whole feed with
//! [`SearchError::Json`]. The same value quoted as a string is per-record
//! data and only loses that field.

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::{Result, SearchError};
use crate::model::{Event, Venue};

/// Parse a venue feed.
///
/// Accepts `[...]`, `{"venues": [...]}` or `{"data": [...]}`.
pub fn parse_venues(json: &str) -> Result<Vec<Venue>> {
    parse_records(json, "venues")
}

/// Parse an event feed.
///
/// Accepts `[...]`, `{"events": [...]}` or `{"data": [...]}`.
pub fn parse_events(json: &str) -> Result<Vec<Event>> {
    parse_records(json, "events")
}

fn parse_records<T: DeserializeOwned>(json: &str, kind: &str) -> Result<Vec<T>> {
    let records = match serde_json::from_str::<Value>(json)? {
        Value::Array(records) => records,
        Value::Object(mut envelope) => match envelope.remove(kind).or_else(|| envelope.remove("data")) {
            Some(Value::Array(records)) => records,
            _ => {
                return Err(SearchError::InvalidCatalog(format!(
                    "object has no '{kind}' or 'data' array"
                )));
            }
        },
        other => {
            return Err(SearchError::InvalidCatalog(format!(
                "expected an array of {kind}, found {}",
                json_type(&other)
            )));
        }
    };

    let total = records.len();
    let parsed: Vec<T> = records
        .into_iter()
        .enumerate()
        .filter_map(|(index, record)| {
            if !record.is_object() {
                warn!(kind, index, found = json_type(&record), "skipping non-object record");
                return None;
            }
            serde_json::from_value(record)
                .map_err(|error| warn!(kind, index, %error, "skipping malformed record"))
                .ok()
        })
        .collect();

    debug!(kind, total, loaded = parsed.len(), "catalog parsed");
    Ok(parsed)
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_array() {
        let venues = parse_venues(r#"[{"name": "Skyline", "city": "Manhattan"}, {"name": "Cellar"}]"#).unwrap();
        assert_eq!(venues.len(), 2);
        assert_eq!(venues[0].city.as_deref(), Some("Manhattan"));
    }

    #[test]
    fn test_envelopes() {
        let venues = parse_venues(r#"{"venues": [{"name": "Skyline"}]}"#).unwrap();
        assert_eq!(venues.len(), 1);

        let events = parse_events(r#"{"data": [{"name": "Drag Brunch", "genre": "drag"}], "count": 1}"#).unwrap();
        assert_eq!(events[0].genre_text(), Some("drag"));
    }

    #[test]
    fn test_non_object_records_are_skipped() {
        let events = parse_events(r#"[{"name": "Open Mic"}, 42, "nope", null]"#).unwrap();
        assert_eq!(events.len(), 1);
    }

    #[test]
    fn test_invalid_documents() {
        assert!(matches!(parse_venues("\"venues\""), Err(SearchError::InvalidCatalog(_))));
        assert!(matches!(parse_venues(r#"{"items": []}"#), Err(SearchError::InvalidCatalog(_))));
        assert!(matches!(parse_venues("[{"), Err(SearchError::Json(_))));
    }

    #[test]
    fn test_out_of_range_numbers() {
        let literal = r#"[{"name": "Skyline", "city": "Manhattan", "rating": 1e400}, {"name": "Cellar"}]"#;
        assert!(matches!(parse_venues(literal), Err(SearchError::Json(_))));

        let quoted = r#"[{"name": "Skyline", "city": "Manhattan", "rating": "1e400"}, {"name": "Cellar"}]"#;
        let venues = parse_venues(quoted).unwrap();
        assert_eq!(venues.len(), 2);
        assert_eq!(venues[0].rating, None);
        assert_eq!(venues[0].display_name(), "Skyline");
    }

    #[test]
    fn test_empty_catalog() {
        assert!(parse_venues("[]").unwrap().is_empty());
    }
}
