//! Free-text fallback matching.
//!
//! Used when a query contains no controlled-vocabulary keyword. Matching
//! is plain case-insensitive containment; `query` must already be
//! normalized.

use crate::model::{Event, Venue};

fn text_contains(text: Option<&str>, query: &str) -> bool {
    text.is_some_and(|text| text.to_lowercase().contains(query))
}

/// Check if the query appears in a venue's name, cuisine, bio or neighborhood.
pub fn venue_contains(venue: &Venue, query: &str) -> bool {
    text_contains(venue.name.as_deref(), query)
        || venue.cuisine.as_ref().is_some_and(|c| c.contains_folded(query))
        || venue.cuisine_primary.as_ref().is_some_and(|c| c.contains_folded(query))
        || text_contains(venue.bio.as_deref(), query)
        || text_contains(venue.neighborhood.as_deref(), query)
}

/// Check if the query appears in an event's name or its venue's name.
pub fn event_contains(event: &Event, query: &str) -> bool {
    text_contains(event.name.as_deref(), query) || text_contains(event.venue_name.as_deref(), query)
}
