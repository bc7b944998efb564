//! Keyword-driven venue and event search for Viberyte.
//!
//! This crate provides:
//! - A controlled vocabulary mapping search phrases to venue attributes
//! - Multi-keyword AND matching with weighted relevance ranking
//! - City filtering and a free-text fallback for unrecognized queries
//! - Keyword autocomplete
//! - Tolerant ingestion of venue and event feeds
//!
//! # Example
//!
//! ```
//! use viberyte_search::{parse_venues, SearchEngine};
//!
//! let venues = parse_venues(r#"[
//!     {"name": "Skyline", "city": "Manhattan", "rating": 4.5, "trending": true,
//!      "vibe_tags": ["rooftop", "romantic", "upscale"]},
//!     {"name": "Roof Only", "city": "Manhattan", "vibe_tags": ["rooftop"]}
//! ]"#).unwrap();
//!
//! let ranked = SearchEngine::default().rank("rooftop romantic", &venues, &[], "Manhattan");
//! assert_eq!(ranked.venues.len(), 1);
//! assert_eq!(ranked.venues[0].score, 34.5);
//! ```

mod catalog;
mod engine;
mod error;
mod fuzzy;
mod keywords;
mod matcher;
mod model;
mod relevance;
mod suggest;

#[cfg(feature = "wasm")]
mod wasm;

pub use catalog::{parse_events, parse_venues};
pub use engine::{city_matches, smart_search, RankedSearch, SearchEngine, SearchMode, SearchResult, DEFAULT_CITY};
pub use error::{Result, SearchError, SearchErrorCode};
pub use fuzzy::{event_contains, venue_contains};
pub use keywords::{normalize_query, KeywordCategory, KeywordDictionary, KeywordEntry, KeywordRule, VenueField};
pub use matcher::{event_matches_rule, keyword_matches, rule_matches};
pub use model::{Attribute, Event, Venue};
pub use relevance::{
    relevance_score, ScoredVenue, QUALITY_BONUS, QUALITY_SCORE_THRESHOLD, RATING_WEIGHT, TAG_RICHNESS_WEIGHT,
};
pub use suggest::{suggested_keywords, suggested_keywords_with_limit, SUGGESTION_LIMIT};
