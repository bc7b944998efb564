//! Smart search orchestration.
//!
//! A query is first reduced to the controlled-vocabulary keywords it
//! contains. If any are found, venues must satisfy all of them and are
//! ranked by relevance; otherwise the query falls back to plain text
//! containment ranked by rating. Venues are always restricted to the
//! selected city first.

use serde::Serialize;
use tracing::debug;

use crate::fuzzy::{event_contains, venue_contains};
use crate::keywords::{normalize_query, KeywordCategory, KeywordDictionary, KeywordRule};
use crate::matcher::{event_matches_rule, rule_matches};
use crate::model::{Event, Venue};
use crate::relevance::{effective_rating, relevance_score, ScoredVenue};
use crate::suggest::suggested_keywords;

/// City used when the caller has not picked one.
pub const DEFAULT_CITY: &str = "Manhattan";

/// Which strategy produced a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchMode {
    /// Blank query; nothing searched
    Empty,
    /// Controlled-vocabulary search with AND semantics
    Keyword,
    /// Text containment fallback
    Fuzzy,
}

impl SearchMode {
    /// Lowercase name for logs and metrics.
    pub fn as_str(&self) -> &'static str {
        match self {
            SearchMode::Empty => "empty",
            SearchMode::Keyword => "keyword",
            SearchMode::Fuzzy => "fuzzy",
        }
    }
}

/// Filtered and ranked search output.
///
/// An empty `matched_keywords` list means the fuzzy fallback ran (or the
/// query was blank).
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult<'a> {
    /// Venues, most relevant first
    pub venues: Vec<&'a Venue>,
    /// Events passing the query's filters
    pub events: Vec<&'a Event>,
    /// Keywords recognized in the query
    pub matched_keywords: Vec<&'a str>,
}

impl SearchResult<'_> {
    /// Returns true if there is nothing to show.
    pub fn is_empty(&self) -> bool {
        self.venues.is_empty() && self.events.is_empty()
    }
}

/// Search output with per-venue scores.
///
/// In fuzzy mode a venue's score is its rating, the only ranking signal.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedSearch<'a> {
    /// Strategy used
    pub mode: SearchMode,
    /// Scored venues, most relevant first
    pub venues: Vec<ScoredVenue<'a>>,
    /// Events passing the query's filters
    pub events: Vec<&'a Event>,
    /// Keywords recognized in the query
    pub matched_keywords: Vec<&'a str>,
}

impl<'a> RankedSearch<'a> {
    fn empty() -> Self {
        Self {
            mode: SearchMode::Empty,
            venues: Vec::new(),
            events: Vec::new(),
            matched_keywords: Vec::new(),
        }
    }

    /// Drops the scores.
    pub fn into_result(self) -> SearchResult<'a> {
        SearchResult {
            venues: self.venues.into_iter().map(|scored| scored.venue).collect(),
            events: self.events,
            matched_keywords: self.matched_keywords,
        }
    }
}

/// Returns true if the venue's city or neighborhood contains `city`.
///
/// `city` must already be lowercased.
pub fn city_matches(venue: &Venue, city: &str) -> bool {
    [venue.city.as_deref(), venue.neighborhood.as_deref()]
        .into_iter()
        .flatten()
        .any(|place| place.to_lowercase().contains(city))
}

/// Search entry point bound to a keyword dictionary.
#[derive(Debug, Clone, Copy)]
pub struct SearchEngine<'d> {
    dictionary: &'d KeywordDictionary,
}

impl Default for SearchEngine<'static> {
    fn default() -> Self {
        Self::new(KeywordDictionary::builtin())
    }
}

impl<'d> SearchEngine<'d> {
    /// Creates an engine over `dictionary`.
    pub fn new(dictionary: &'d KeywordDictionary) -> Self {
        Self { dictionary }
    }

    /// The dictionary this engine matches against.
    pub fn dictionary(&self) -> &'d KeywordDictionary {
        self.dictionary
    }

    /// Filters and ranks venues and events for a free-text query.
    pub fn search<'a>(
        &self,
        query: &str,
        venues: &'a [Venue],
        events: &'a [Event],
        city: &str,
    ) -> SearchResult<'a>
    where
        'd: 'a,
    {
        self.rank(query, venues, events, city).into_result()
    }

    /// Like [`SearchEngine::search`], keeping scores and the strategy used.
    pub fn rank<'a>(
        &self,
        query: &str,
        venues: &'a [Venue],
        events: &'a [Event],
        city: &str,
    ) -> RankedSearch<'a>
    where
        'd: 'a,
    {
        let query = normalize_query(query);
        if query.is_empty() {
            debug!("blank query, skipping search");
            return RankedSearch::empty();
        }

        let city = city.to_lowercase();
        let local: Vec<&'a Venue> = venues.iter().filter(|venue| city_matches(venue, &city)).collect();

        let matched = self.dictionary.matched_in(&query);
        let ranked = if matched.is_empty() {
            fuzzy_search(&query, local, events)
        } else {
            self.keyword_search(matched, local, events)
        };

        debug!(
            query = %query,
            city = %city,
            mode = ranked.mode.as_str(),
            keywords = ?ranked.matched_keywords,
            venues = ranked.venues.len(),
            events = ranked.events.len(),
            "smart search completed"
        );
        ranked
    }

    /// Autocomplete suggestions for a partial query.
    pub fn suggest(&self, partial: &str) -> Vec<&'d str> {
        suggested_keywords(self.dictionary, partial)
    }

    fn keyword_search<'a>(
        &self,
        matched: Vec<&'a str>,
        local: Vec<&'a Venue>,
        events: &'a [Event],
    ) -> RankedSearch<'a>
    where
        'd: 'a,
    {
        let rules: Vec<&KeywordRule> = matched
            .iter()
            .filter_map(|keyword| self.dictionary.get(keyword))
            .collect();

        let score_venue = |venue: &&'a Venue| -> Option<ScoredVenue<'a>> {
            rules
                .iter()
                .all(|rule| rule_matches(venue, rule))
                .then(|| ScoredVenue {
                    venue: *venue,
                    score: relevance_score(venue, rules.iter().copied()),
                    matched_keywords: matched.clone(),
                })
        };

        #[cfg(feature = "parallel")]
        let mut scored: Vec<ScoredVenue<'a>> = {
            use rayon::prelude::*;
            local.par_iter().filter_map(score_venue).collect()
        };

        #[cfg(not(feature = "parallel"))]
        let mut scored: Vec<ScoredVenue<'a>> = local.iter().filter_map(score_venue).collect();

        // Stable, so equal scores keep catalog order.
        scored.sort_by(|a, b| b.score.total_cmp(&a.score));

        let event_rules: Vec<&KeywordRule> = rules
            .iter()
            .copied()
            .filter(|rule| rule.category == KeywordCategory::Event)
            .collect();
        let events = events
            .iter()
            .filter(|event| event_rules.iter().all(|rule| event_matches_rule(event, rule)))
            .collect();

        RankedSearch {
            mode: SearchMode::Keyword,
            venues: scored,
            events,
            matched_keywords: matched,
        }
    }
}

fn fuzzy_search<'a>(query: &str, local: Vec<&'a Venue>, events: &'a [Event]) -> RankedSearch<'a> {
    let mut venues: Vec<ScoredVenue<'a>> = local
        .into_iter()
        .filter(|venue| venue_contains(venue, query))
        .map(|venue| ScoredVenue {
            venue,
            score: effective_rating(venue),
            matched_keywords: Vec::new(),
        })
        .collect();
    venues.sort_by(|a, b| b.score.total_cmp(&a.score));

    let events = events.iter().filter(|event| event_contains(event, query)).collect();

    RankedSearch {
        mode: SearchMode::Fuzzy,
        venues,
        events,
        matched_keywords: Vec::new(),
    }
}

/// Searches with the built-in dictionary.
///
/// # Example
/// ```
/// use viberyte_search::{smart_search, Attribute, Venue};
///
/// let venues = vec![Venue {
///     vibe_tags: Some(Attribute::list(["rooftop", "romantic"])),
///     ..Venue::new("Skyline", "Manhattan")
/// }];
///
/// let result = smart_search("rooftop romantic", &venues, &[], "Manhattan");
/// assert_eq!(result.venues.len(), 1);
/// assert_eq!(result.matched_keywords, vec!["rooftop", "romantic"]);
/// ```
pub fn smart_search<'a>(
    query: &str,
    venues: &'a [Venue],
    events: &'a [Event],
    city: &str,
) -> SearchResult<'a> {
    SearchEngine::default().search(query, venues, events, city)
}
