//! Venue and event records consumed by the search engine.
//!
//! Records arrive from the app's REST layer as loosely shaped JSON. Every
//! attribute is optional, and attributes the engine does not read are kept
//! in `extra` so a search result serializes back to the shape it came in.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::keywords::VenueField;

/// A matchable venue attribute: either a list of tags or a single text value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Attribute {
    /// Ordered sequence of values, e.g. `vibe_tags`
    List(Vec<String>),
    /// Single text value, e.g. `cuisine`
    Text(String),
}

impl Attribute {
    /// Builds a list attribute.
    pub fn list<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Attribute::List(items.into_iter().map(Into::into).collect())
    }

    /// Returns the elements when this is a list attribute.
    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            Attribute::List(items) => Some(items),
            Attribute::Text(_) => None,
        }
    }

    /// Returns true if there is nothing to match against.
    pub fn is_empty(&self) -> bool {
        match self {
            Attribute::List(items) => items.is_empty(),
            Attribute::Text(text) => text.is_empty(),
        }
    }

    /// Case-insensitive substring test.
    ///
    /// `needle` must already be lowercased. A list matches when any element
    /// contains the needle; empty text never matches.
    pub fn contains_folded(&self, needle: &str) -> bool {
        match self {
            Attribute::List(items) => items.iter().any(|item| item.to_lowercase().contains(needle)),
            Attribute::Text(text) => !text.is_empty() && text.to_lowercase().contains(needle),
        }
    }
}

impl From<&str> for Attribute {
    fn from(text: &str) -> Self {
        Attribute::Text(text.to_string())
    }
}

impl From<String> for Attribute {
    fn from(text: String) -> Self {
        Attribute::Text(text)
    }
}

impl From<Vec<String>> for Attribute {
    fn from(items: Vec<String>) -> Self {
        Attribute::List(items)
    }
}

/// A bookable nightlife or dining location.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Venue {
    /// Display name
    #[serde(default, deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// City the venue is in
    #[serde(default, deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    /// Neighborhood within the city
    #[serde(default, deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub neighborhood: Option<String>,
    /// Review rating, 0 to 5
    #[serde(default, deserialize_with = "lenient::number", skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    /// Currently trending in the app
    #[serde(default, deserialize_with = "lenient::flag", skip_serializing_if = "Option::is_none")]
    pub trending: Option<bool>,
    /// In-house quality score
    #[serde(default, deserialize_with = "lenient::number", skip_serializing_if = "Option::is_none")]
    pub viberyte_score: Option<f64>,
    /// Vibe descriptors such as `rooftop` or `late-night`
    #[serde(default, deserialize_with = "lenient::attribute", skip_serializing_if = "Option::is_none")]
    pub vibe_tags: Option<Attribute>,
    /// Music genres played at the venue
    #[serde(default, deserialize_with = "lenient::attribute", skip_serializing_if = "Option::is_none")]
    pub music_genres: Option<Attribute>,
    /// Cuisine description
    #[serde(default, deserialize_with = "lenient::attribute", skip_serializing_if = "Option::is_none")]
    pub cuisine: Option<Attribute>,
    /// Primary cuisine as classified by the catalog enrichment jobs
    #[serde(default, deserialize_with = "lenient::attribute", skip_serializing_if = "Option::is_none")]
    pub cuisine_primary: Option<Attribute>,
    /// Coarse category, e.g. `dining` or `nightlife`
    #[serde(default, deserialize_with = "lenient::attribute", skip_serializing_if = "Option::is_none")]
    pub category: Option<Attribute>,
    /// Free-text description
    #[serde(default, deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    /// Attributes the search engine does not interpret
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Venue {
    /// Creates a venue with only a name and city set.
    pub fn new(name: impl Into<String>, city: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            city: Some(city.into()),
            ..Self::default()
        }
    }

    /// Returns the attribute a keyword rule inspects.
    pub fn field(&self, field: VenueField) -> Option<&Attribute> {
        match field {
            VenueField::VibeTags => self.vibe_tags.as_ref(),
            VenueField::MusicGenres => self.music_genres.as_ref(),
            VenueField::Cuisine => self.cuisine.as_ref(),
            VenueField::CuisinePrimary => self.cuisine_primary.as_ref(),
            VenueField::Category => self.category.as_ref(),
        }
    }

    /// Name for display, falling back to a placeholder.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("(unnamed venue)")
    }
}

/// A time-bound happening hosted at a venue.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// Event title
    #[serde(default, deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Name of the hosting venue
    #[serde(default, deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub venue_name: Option<String>,
    /// Event genre
    #[serde(default, deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub genre: Option<String>,
    /// Legacy genre field used by older event feeds
    #[serde(default, deserialize_with = "lenient::text", skip_serializing_if = "Option::is_none")]
    pub music_genre: Option<String>,
    /// Attributes the search engine does not interpret
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Event {
    /// Creates an event with a name and hosting venue.
    pub fn new(name: impl Into<String>, venue_name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            venue_name: Some(venue_name.into()),
            ..Self::default()
        }
    }

    /// The event's genre, falling back to `music_genre` when `genre` is unset or empty.
    pub fn genre_text(&self) -> Option<&str> {
        self.genre
            .as_deref()
            .filter(|genre| !genre.is_empty())
            .or(self.music_genre.as_deref())
    }

    /// Name for display, falling back to a placeholder.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("(unnamed event)")
    }
}

/// Tolerant field decoders.
///
/// A value of the wrong JSON type becomes `None` instead of failing the
/// whole record.
mod lenient {
    use super::Attribute;
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    pub fn text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
        Ok(match Value::deserialize(deserializer)? {
            Value::String(text) => Some(text),
            _ => None,
        })
    }

    pub fn number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
        let number = match Value::deserialize(deserializer)? {
            Value::Number(n) => n.as_f64(),
            Value::String(text) => text.trim().parse::<f64>().ok(),
            _ => None,
        };
        Ok(number.filter(|n| n.is_finite()))
    }

    pub fn flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<bool>, D::Error> {
        Ok(match Value::deserialize(deserializer)? {
            Value::Bool(flag) => Some(flag),
            Value::Number(n) => n.as_f64().map(|n| n != 0.0),
            Value::String(text) => text.trim().parse::<bool>().ok(),
            _ => None,
        })
    }

    pub fn attribute<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Attribute>, D::Error> {
        Ok(match Value::deserialize(deserializer)? {
            Value::Array(items) => Some(Attribute::List(
                items
                    .into_iter()
                    .filter_map(|item| match item {
                        Value::String(text) => Some(text),
                        _ => None,
                    })
                    .collect(),
            )),
            Value::String(text) => Some(Attribute::Text(text)),
            _ => None,
        })
    }
}
