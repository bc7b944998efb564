//! Relevance scoring for keyword search results.
//!
//! A score is the sum of non-negative contributions:
//! - the weight of every matched keyword
//! - twice the venue rating
//! - a flat bonus for trending or high-quality venues
//! - half a point per vibe tag

use serde::Serialize;

use crate::keywords::KeywordRule;
use crate::model::{Attribute, Venue};

/// Multiplier applied to the venue rating.
pub const RATING_WEIGHT: f64 = 2.0;

/// Bonus for trending venues or venues with a high quality score.
pub const QUALITY_BONUS: f64 = 5.0;

/// `viberyte_score` at or above which a venue earns [`QUALITY_BONUS`].
pub const QUALITY_SCORE_THRESHOLD: f64 = 8.0;

/// Points per entry in `vibe_tags`.
pub const TAG_RICHNESS_WEIGHT: f64 = 0.5;

/// A venue with its relevance score and the keywords it satisfied.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoredVenue<'a> {
    /// The ranked venue
    pub venue: &'a Venue,
    /// Relevance score (higher is better)
    pub score: f64,
    /// Keywords this venue satisfied
    pub matched_keywords: Vec<&'a str>,
}

/// Rating used for ranking; absent or invalid ratings count as zero.
pub(crate) fn effective_rating(venue: &Venue) -> f64 {
    venue
        .rating
        .filter(|rating| rating.is_finite() && *rating > 0.0)
        .unwrap_or(0.0)
}

/// Trending and a high quality score share a single bonus.
fn is_quality_pick(venue: &Venue) -> bool {
    venue.trending == Some(true)
        || venue
            .viberyte_score
            .is_some_and(|score| score >= QUALITY_SCORE_THRESHOLD)
}

/// Calculate the relevance score of a venue for its matched keyword rules.
///
/// # Arguments
/// * `venue` - The venue to score
/// * `rules` - Rules of the keywords the venue satisfied
///
/// # Returns
/// Relevance score (higher is better, never negative)
pub fn relevance_score<'r, I>(venue: &Venue, rules: I) -> f64
where
    I: IntoIterator<Item = &'r KeywordRule>,
{
    let keyword_weight: f64 = rules.into_iter().map(|rule| f64::from(rule.weight)).sum();

    let quality = if is_quality_pick(venue) { QUALITY_BONUS } else { 0.0 };

    let richness = venue
        .vibe_tags
        .as_ref()
        .and_then(Attribute::as_list)
        .map_or(0.0, |tags| tags.len() as f64 * TAG_RICHNESS_WEIGHT);

    keyword_weight + RATING_WEIGHT * effective_rating(venue) + quality + richness
}
