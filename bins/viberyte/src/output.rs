//! Terminal output formatting

use owo_colors::OwoColorize;
use viberyte_search::{Attribute, KeywordDictionary, KeywordRule, RankedSearch, ScoredVenue, SearchMode, Venue};

/// Status message helpers
pub struct Status;

impl Status {
    /// Print an error message
    pub fn error(message: &str) {
        eprintln!("{} {}", "✗".red(), message);
    }

    /// Print an info message
    pub fn info(message: &str) {
        println!("{} {}", "ℹ".blue(), message);
    }

    /// Print a header
    pub fn header(message: &str) {
        println!();
        println!("{}", message.bold());
        println!("{}", "─".repeat(message.chars().count()));
    }

    /// Print a subheader
    pub fn subheader(message: &str) {
        println!();
        println!("{}", message.bold().dimmed());
    }
}

/// Attribute values of `venue` that satisfied `rule`, for highlighting.
pub fn matched_values<'v>(venue: &'v Venue, rule: &KeywordRule) -> Vec<&'v str> {
    let needle = rule.value.to_lowercase();
    match venue.field(rule.field) {
        Some(Attribute::List(items)) => items
            .iter()
            .filter(|item| item.to_lowercase().contains(&needle))
            .map(String::as_str)
            .collect(),
        Some(Attribute::Text(text)) if text.to_lowercase().contains(&needle) => vec![text.as_str()],
        _ => Vec::new(),
    }
}

/// Print a ranked search result.
pub fn print_ranked(ranked: &RankedSearch<'_>, dictionary: &KeywordDictionary, query: &str, city: &str, explain: bool) {
    let strategy = match ranked.mode {
        SearchMode::Keyword => format!("keywords: {}", ranked.matched_keywords.join(", ")),
        SearchMode::Fuzzy => "text match".to_string(),
        SearchMode::Empty => "blank query".to_string(),
    };
    Status::header(&format!(
        "{} venues, {} events for \"{}\" in {} ({})",
        ranked.venues.len(),
        ranked.events.len(),
        query.trim(),
        city,
        strategy
    ));

    if ranked.venues.is_empty() {
        Status::info("No venues found");
    }
    for (position, scored) in ranked.venues.iter().enumerate() {
        print_venue(position + 1, scored, dictionary, explain);
    }

    if !ranked.events.is_empty() {
        Status::subheader("Events");
        for event in &ranked.events {
            let venue_name = event.venue_name.as_deref().unwrap_or("TBA");
            match event.genre_text() {
                Some(genre) => println!("  • {} @ {} {}", event.display_name(), venue_name, genre.dimmed()),
                None => println!("  • {} @ {}", event.display_name(), venue_name),
            }
        }
    }
}

fn print_venue(rank: usize, scored: &ScoredVenue<'_>, dictionary: &KeywordDictionary, explain: bool) {
    let venue = scored.venue;
    let location: Vec<&str> = [venue.neighborhood.as_deref(), venue.city.as_deref()]
        .into_iter()
        .flatten()
        .collect();

    let mut line = format!("{:>3}. {}", rank, venue.display_name().bold());
    if !location.is_empty() {
        line.push_str(&format!("  {}", location.join(", ").dimmed()));
    }
    if let Some(rating) = venue.rating {
        line.push_str(&format!("  ★ {rating:.1}"));
    }
    if venue.trending == Some(true) {
        line.push_str(&format!("  {}", "trending".magenta()));
    }
    if explain {
        line.push_str(&format!("  {}", format!("score {:.1}", scored.score).cyan()));
    }
    println!("{line}");

    let mut highlights: Vec<&str> = Vec::new();
    for rule in scored.matched_keywords.iter().filter_map(|keyword| dictionary.get(keyword)) {
        for value in matched_values(venue, rule) {
            if !highlights.contains(&value) {
                highlights.push(value);
            }
        }
    }
    if !highlights.is_empty() {
        let highlighted: Vec<String> = highlights.iter().map(|value| value.green().to_string()).collect();
        println!("       {}", highlighted.join(" · "));
    }
}

/// Print autocomplete suggestions, one per line.
pub fn print_suggestions(suggestions: &[&str]) {
    if suggestions.is_empty() {
        Status::info("No suggestions");
    }
    for suggestion in suggestions {
        println!("{suggestion}");
    }
}

/// Print dictionary entries.
pub fn print_keywords<'d>(entries: impl Iterator<Item = (&'d str, &'d KeywordRule)>) {
    for (keyword, rule) in entries {
        println!(
            "{:<14} {:<16} {:<12} {}",
            keyword.bold(),
            rule.field.as_str(),
            rule.value,
            format!("[{}, {}]", rule.category, rule.weight).dimmed()
        );
    }
}
