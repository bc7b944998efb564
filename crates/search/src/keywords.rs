//! Controlled search vocabulary.
//!
//! Each keyword maps a phrase users type to the venue attribute it
//! constrains. The built-in table is assembled once per process and is
//! read-only afterwards; callers that need extra vocabulary derive a new
//! dictionary at startup with [`KeywordDictionary::extended`].

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SearchError};

/// Semantic family of a keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeywordCategory {
    /// Atmosphere descriptors
    Vibe,
    /// Music genres
    Music,
    /// Cuisines
    Cuisine,
    /// Event types; the only family that also filters events
    Event,
    /// Coarse venue categories
    Category,
}

impl KeywordCategory {
    /// All categories in display order.
    pub const ALL: [KeywordCategory; 5] = [
        KeywordCategory::Vibe,
        KeywordCategory::Music,
        KeywordCategory::Cuisine,
        KeywordCategory::Event,
        KeywordCategory::Category,
    ];

    /// Lowercase name as used in configuration files.
    pub fn as_str(&self) -> &'static str {
        match self {
            KeywordCategory::Vibe => "vibe",
            KeywordCategory::Music => "music",
            KeywordCategory::Cuisine => "cuisine",
            KeywordCategory::Event => "event",
            KeywordCategory::Category => "category",
        }
    }
}

impl fmt::Display for KeywordCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for KeywordCategory {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|category| category.as_str() == wanted)
            .ok_or_else(|| format!("unknown keyword category '{s}'"))
    }
}

/// Venue attribute a keyword rule inspects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VenueField {
    /// `vibe_tags`
    VibeTags,
    /// `music_genres`
    MusicGenres,
    /// `cuisine`
    Cuisine,
    /// `cuisine_primary`
    CuisinePrimary,
    /// `category`
    Category,
}

impl VenueField {
    /// Record attribute name.
    pub fn as_str(&self) -> &'static str {
        match self {
            VenueField::VibeTags => "vibe_tags",
            VenueField::MusicGenres => "music_genres",
            VenueField::Cuisine => "cuisine",
            VenueField::CuisinePrimary => "cuisine_primary",
            VenueField::Category => "category",
        }
    }
}

impl fmt::Display for VenueField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a keyword constrains and weights a venue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordRule {
    /// Attribute to inspect
    pub field: VenueField,
    /// Value the attribute must contain, compared case-insensitively
    pub value: String,
    /// Semantic family
    pub category: KeywordCategory,
    /// Relevance contribution when matched
    pub weight: u32,
}

impl KeywordRule {
    /// Creates a new rule.
    pub fn new(field: VenueField, value: impl Into<String>, category: KeywordCategory, weight: u32) -> Self {
        Self {
            field,
            value: value.into(),
            category,
            weight,
        }
    }
}

/// A keyword with its rule, as written in configuration files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordEntry {
    /// Search phrase
    pub keyword: String,
    /// Attribute to inspect
    pub field: VenueField,
    /// Value the attribute must contain
    pub value: String,
    /// Semantic family
    pub category: KeywordCategory,
    /// Relevance contribution when matched
    pub weight: u32,
}

impl KeywordEntry {
    /// Splits into the phrase and its rule.
    pub fn into_parts(self) -> (String, KeywordRule) {
        let rule = KeywordRule::new(self.field, self.value, self.category, self.weight);
        (self.keyword, rule)
    }
}

use KeywordCategory as C;
use VenueField as F;

/// Built-in vocabulary, in suggestion order.
const BUILTIN_KEYWORDS: &[(&str, VenueField, &str, KeywordCategory, u32)] = &[
    // Vibes
    ("rooftop", F::VibeTags, "rooftop", C::Vibe, 10),
    ("speakeasy", F::VibeTags, "speakeasy", C::Vibe, 10),
    ("romantic", F::VibeTags, "romantic", C::Vibe, 9),
    ("date night", F::VibeTags, "romantic", C::Vibe, 9),
    ("live music", F::VibeTags, "live-music", C::Vibe, 9),
    ("upscale", F::VibeTags, "upscale", C::Vibe, 8),
    ("late night", F::VibeTags, "late-night", C::Vibe, 8),
    ("outdoor", F::VibeTags, "outdoor", C::Vibe, 8),
    ("views", F::VibeTags, "views", C::Vibe, 8),
    ("cocktails", F::VibeTags, "cocktails", C::Vibe, 8),
    ("dancing", F::VibeTags, "dancing", C::Vibe, 8),
    ("brunch", F::VibeTags, "brunch", C::Vibe, 8),
    ("chill", F::VibeTags, "chill", C::Vibe, 7),
    ("lively", F::VibeTags, "lively", C::Vibe, 7),
    ("casual", F::VibeTags, "casual", C::Vibe, 6),
    ("cheap", F::VibeTags, "affordable", C::Vibe, 6),
    // Music
    ("afrobeats", F::MusicGenres, "afrobeats", C::Music, 10),
    ("amapiano", F::MusicGenres, "amapiano", C::Music, 10),
    ("hip-hop", F::MusicGenres, "hip-hop", C::Music, 10),
    ("hip hop", F::MusicGenres, "hip-hop", C::Music, 10),
    ("r&b", F::MusicGenres, "r&b", C::Music, 10),
    ("rnb", F::MusicGenres, "r&b", C::Music, 10),
    ("reggaeton", F::MusicGenres, "reggaeton", C::Music, 10),
    ("latin", F::MusicGenres, "latin", C::Music, 10),
    ("house", F::MusicGenres, "house", C::Music, 10),
    ("techno", F::MusicGenres, "techno", C::Music, 10),
    ("jazz", F::MusicGenres, "jazz", C::Music, 10),
    ("dancehall", F::MusicGenres, "dancehall", C::Music, 10),
    // Cuisines. Field targeting mirrors the upstream catalog schema: some
    // cuisines are only classified in `cuisine_primary`.
    ("italian", F::CuisinePrimary, "italian", C::Cuisine, 10),
    ("japanese", F::CuisinePrimary, "japanese", C::Cuisine, 10),
    ("mexican", F::CuisinePrimary, "mexican", C::Cuisine, 10),
    ("sushi", F::Cuisine, "sushi", C::Cuisine, 10),
    ("soul food", F::Cuisine, "soul food", C::Cuisine, 10),
    ("caribbean", F::Cuisine, "caribbean", C::Cuisine, 10),
    ("seafood", F::Cuisine, "seafood", C::Cuisine, 10),
    // Events
    ("comedy", F::VibeTags, "comedy", C::Event, 9),
    ("karaoke", F::VibeTags, "karaoke", C::Event, 9),
    ("drag", F::VibeTags, "drag", C::Event, 9),
    ("trivia", F::VibeTags, "trivia", C::Event, 9),
    ("open mic", F::VibeTags, "open-mic", C::Event, 9),
    // Categories
    ("dining", F::Category, "dining", C::Category, 8),
    ("restaurant", F::Category, "dining", C::Category, 8),
    ("nightlife", F::Category, "nightlife", C::Category, 8),
    ("club", F::Category, "nightlife", C::Category, 8),
    ("lounge", F::Category, "nightlife", C::Category, 8),
];

static BUILTIN_DICTIONARY: Lazy<KeywordDictionary> = Lazy::new(|| {
    let mut dictionary = KeywordDictionary::default();
    for &(keyword, field, value, category, weight) in BUILTIN_KEYWORDS {
        dictionary.insert(keyword.to_string(), KeywordRule::new(field, value, category, weight));
    }
    dictionary
});

/// Trims and lowercases a query or keyword.
pub fn normalize_query(query: &str) -> String {
    query.trim().to_lowercase()
}

/// Insertion-ordered table of keyword rules.
#[derive(Debug, Clone, Default)]
pub struct KeywordDictionary {
    entries: Vec<(String, KeywordRule)>,
    index: HashMap<String, usize>,
}

impl KeywordDictionary {
    /// The process-wide built-in dictionary.
    pub fn builtin() -> &'static KeywordDictionary {
        &BUILTIN_DICTIONARY
    }

    /// Builds a dictionary containing only `entries`.
    pub fn from_entries<I>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = KeywordEntry>,
    {
        Self::default().extended(entries)
    }

    /// Returns a copy of this dictionary with `entries` applied.
    ///
    /// New keywords are appended; a keyword already present keeps its
    /// position and takes the new rule.
    pub fn extended<I>(&self, entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = KeywordEntry>,
    {
        let mut dictionary = self.clone();
        for entry in entries {
            let (keyword, mut rule) = entry.into_parts();
            let normalized = normalize_query(&keyword);
            if normalized.is_empty() {
                return Err(SearchError::invalid_keyword(keyword, "keyword is empty"));
            }
            rule.value = rule.value.trim().to_string();
            if rule.value.is_empty() {
                return Err(SearchError::invalid_keyword(keyword, "match value is empty"));
            }
            if rule.weight == 0 {
                return Err(SearchError::invalid_keyword(keyword, "weight must be positive"));
            }
            dictionary.insert(normalized, rule);
        }
        Ok(dictionary)
    }

    fn insert(&mut self, keyword: String, rule: KeywordRule) {
        match self.index.get(&keyword) {
            Some(&position) => self.entries[position].1 = rule,
            None => {
                self.index.insert(keyword.clone(), self.entries.len());
                self.entries.push((keyword, rule));
            }
        }
    }

    /// Looks up the rule for a keyword.
    pub fn get(&self, keyword: &str) -> Option<&KeywordRule> {
        self.index.get(keyword).map(|&position| &self.entries[position].1)
    }

    /// Returns true if the keyword is part of the vocabulary.
    pub fn contains(&self, keyword: &str) -> bool {
        self.index.contains_key(keyword)
    }

    /// Iterates keywords and rules in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &KeywordRule)> {
        self.entries.iter().map(|(keyword, rule)| (keyword.as_str(), rule))
    }

    /// Iterates the entries of one category in insertion order.
    pub fn by_category(&self, category: KeywordCategory) -> impl Iterator<Item = (&str, &KeywordRule)> {
        self.iter().filter(move |(_, rule)| rule.category == category)
    }

    /// Keywords occurring anywhere in an already normalized query.
    ///
    /// Every keyword is probed independently, so overlapping phrases such
    /// as `hip hop` and `hip-hop` can match together.
    pub fn matched_in(&self, normalized_query: &str) -> Vec<&str> {
        self.iter()
            .filter(|(keyword, _)| normalized_query.contains(keyword))
            .map(|(keyword, _)| keyword)
            .collect()
    }

    /// Number of keywords.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if there are no keywords.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(keyword: &str, value: &str, weight: u32) -> KeywordEntry {
        KeywordEntry {
            keyword: keyword.to_string(),
            field: VenueField::VibeTags,
            value: value.to_string(),
            category: KeywordCategory::Vibe,
            weight,
        }
    }

    #[test]
    fn test_builtin_keys_are_normalized_and_unique() {
        let dictionary = KeywordDictionary::builtin();
        assert_eq!(dictionary.len(), BUILTIN_KEYWORDS.len());
        for (keyword, _) in dictionary.iter() {
            assert_eq!(keyword, normalize_query(keyword));
        }
    }

    #[test]
    fn test_builtin_weights_in_range() {
        for (keyword, rule) in KeywordDictionary::builtin().iter() {
            assert!((6..=10).contains(&rule.weight), "{keyword} has weight {}", rule.weight);
        }
    }

    #[test]
    fn test_aliases_share_canonical_value() {
        let dictionary = KeywordDictionary::builtin();
        assert_eq!(dictionary.get("date night").unwrap().value, "romantic");
        assert_eq!(dictionary.get("rnb").unwrap().value, dictionary.get("r&b").unwrap().value);
        assert_eq!(dictionary.get("club").unwrap().value, "nightlife");
        assert_eq!(dictionary.get("restaurant").unwrap().value, "dining");
    }

    #[test]
    fn test_cuisine_field_targeting() {
        let dictionary = KeywordDictionary::builtin();
        assert_eq!(dictionary.get("italian").unwrap().field, VenueField::CuisinePrimary);
        assert_eq!(dictionary.get("soul food").unwrap().field, VenueField::Cuisine);
    }

    #[test]
    fn test_unknown_keyword() {
        assert!(KeywordDictionary::builtin().get("bowling").is_none());
    }

    #[test]
    fn test_matched_in_is_independent_per_key() {
        let dictionary = KeywordDictionary::builtin();
        let matched = dictionary.matched_in("rooftop romantic date night");
        assert_eq!(matched, vec!["rooftop", "romantic", "date night"]);

        assert_eq!(dictionary.matched_in("hip-hop"), vec!["hip-hop"]);
        assert!(dictionary.matched_in("bowling alley").is_empty());
    }

    #[test]
    fn test_extended_appends_and_overrides() {
        let base = KeywordDictionary::builtin();
        let extended = base
            .extended([entry("  Jazz Brunch ", "jazz-brunch", 9), entry("rooftop", "roof", 7)])
            .unwrap();

        assert_eq!(extended.len(), base.len() + 1);
        assert_eq!(extended.iter().last().unwrap().0, "jazz brunch");
        assert_eq!(extended.iter().next().unwrap().0, "rooftop");
        assert_eq!(extended.get("rooftop").unwrap().weight, 7);
        // The shared table is untouched.
        assert_eq!(base.get("rooftop").unwrap().weight, 10);
    }

    #[test]
    fn test_extended_rejects_invalid_entries() {
        let dictionary = KeywordDictionary::default();
        assert!(dictionary.extended([entry("  ", "x", 5)]).is_err());
        assert!(dictionary.extended([entry("x", " ", 5)]).is_err());
        assert!(dictionary.extended([entry("x", "x", 0)]).is_err());
    }

    #[test]
    fn test_by_category() {
        let events: Vec<_> = KeywordDictionary::builtin()
            .by_category(KeywordCategory::Event)
            .map(|(keyword, _)| keyword)
            .collect();
        assert!(events.contains(&"comedy"));
        assert!(!events.contains(&"rooftop"));
    }

    #[test]
    fn test_category_from_str() {
        assert_eq!("Music".parse::<KeywordCategory>(), Ok(KeywordCategory::Music));
        assert!("genre".parse::<KeywordCategory>().is_err());
    }

    #[test]
    fn test_entry_deserialize() {
        let entry: KeywordEntry = serde_json::from_str(
            r#"{"keyword":"tiki","field":"vibe_tags","value":"tiki","category":"vibe","weight":8}"#,
        )
        .unwrap();
        assert_eq!(entry.field, VenueField::VibeTags);
        assert_eq!(entry.category, KeywordCategory::Vibe);
    }
}
