use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tempfile::{tempdir, TempDir};

const VENUES: &str = r#"[
    {"id": 1, "name": "Skyline", "city": "Manhattan", "rating": 4.5, "trending": true,
     "vibe_tags": ["rooftop", "romantic", "upscale"]},
    {"id": 2, "name": "Roof Only", "city": "Manhattan", "rating": 5.0, "vibe_tags": ["rooftop"]},
    {"id": 3, "name": "Skyline Brooklyn", "city": "Brooklyn", "rating": 4.9,
     "vibe_tags": ["rooftop", "romantic"]},
    {"id": 4, "name": "Vino Veritas", "city": "Manhattan", "rating": 4.1,
     "bio": "Natural wine bar", "tiki_level": 0},
    "not a venue"
]"#;

const EVENTS: &str = r#"{"events": [
    {"name": "Wine & Jazz", "venue_name": "Vino Veritas", "genre": "jazz"},
    {"name": "Roast Battle", "venue_name": "The Cellar", "genre": "Comedy"}
]}"#;

fn viberyte(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("viberyte").unwrap();
    cmd.current_dir(dir).env_remove("VIBERYTE_CONFIG").env_remove("RUST_LOG");
    cmd
}

fn catalog() -> (TempDir, PathBuf, PathBuf) {
    let dir = tempdir().unwrap();
    let venues = dir.path().join("venues.json");
    let events = dir.path().join("events.json");
    std::fs::write(&venues, VENUES).unwrap();
    std::fs::write(&events, EVENTS).unwrap();
    (dir, venues, events)
}

fn json_stdout(cmd: &mut Command) -> Value {
    let output = cmd.output().unwrap();
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    serde_json::from_slice(&output.stdout).unwrap()
}

#[test]
fn test_cli_help() {
    let dir = tempdir().unwrap();
    viberyte(dir.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage:"));
}

#[test]
fn test_cli_version() {
    let dir = tempdir().unwrap();
    viberyte(dir.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_search_requires_every_keyword() {
    let (dir, venues, _) = catalog();
    let json = json_stdout(
        viberyte(dir.path())
            .args(["search", "rooftop romantic", "--format", "json", "--venues"])
            .arg(&venues),
    );

    let venues = json["venues"].as_array().unwrap();
    assert_eq!(venues.len(), 1);
    assert_eq!(venues[0]["name"], "Skyline");
    assert_eq!(venues[0]["id"], 1);
    assert_eq!(json["matchedKeywords"], serde_json::json!(["rooftop", "romantic"]));
}

#[test]
fn test_search_explain_reports_scores() {
    let (dir, venues, _) = catalog();
    let json = json_stdout(
        viberyte(dir.path())
            .args(["search", "rooftop romantic", "--explain", "--format", "json", "--venues"])
            .arg(&venues),
    );

    assert_eq!(json["mode"], "keyword");
    assert_eq!(json["venues"][0]["score"], 34.5);
    assert_eq!(json["venues"][0]["venue"]["name"], "Skyline");
}

#[test]
fn test_search_city_flag() {
    let (dir, venues, _) = catalog();
    let json = json_stdout(
        viberyte(dir.path())
            .args(["search", "rooftop", "--city", "brooklyn", "--format", "json", "--venues"])
            .arg(&venues),
    );

    let venues = json["venues"].as_array().unwrap();
    assert_eq!(venues.len(), 1);
    assert_eq!(venues[0]["name"], "Skyline Brooklyn");
}

#[test]
fn test_search_fuzzy_fallback_with_events() {
    let (dir, venues, events) = catalog();
    let json = json_stdout(
        viberyte(dir.path())
            .args(["search", "wine", "--format", "json", "--venues"])
            .arg(&venues)
            .arg("--events")
            .arg(&events),
    );

    assert_eq!(json["venues"][0]["name"], "Vino Veritas");
    assert_eq!(json["events"].as_array().unwrap().len(), 1);
    assert_eq!(json["matchedKeywords"], serde_json::json!([]));
}

#[test]
fn test_search_text_output() {
    let (dir, venues, _) = catalog();
    viberyte(dir.path())
        .args(["search", "rooftop", "--explain", "--venues"])
        .arg(&venues)
        .assert()
        .success()
        .stdout(predicate::str::contains("Skyline"))
        .stdout(predicate::str::contains("Roof Only"))
        .stdout(predicate::str::contains("score"))
        .stdout(predicate::str::contains("Skyline Brooklyn").not());
}

#[test]
fn test_search_limit() {
    let (dir, venues, _) = catalog();
    let json = json_stdout(
        viberyte(dir.path())
            .args(["search", "rooftop", "-n", "1", "--format", "json", "--venues"])
            .arg(&venues),
    );
    assert_eq!(json["venues"].as_array().unwrap().len(), 1);
}

#[test]
fn test_search_missing_catalog() {
    let dir = tempdir().unwrap();
    viberyte(dir.path())
        .args(["search", "rooftop", "--venues", "missing.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read venues file"));
}

#[test]
fn test_search_invalid_catalog() {
    let dir = tempdir().unwrap();
    let venues = dir.path().join("venues.json");
    std::fs::write(&venues, r#"{"results": []}"#).unwrap();

    viberyte(dir.path())
        .args(["search", "rooftop", "--venues"])
        .arg(&venues)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid catalog"));
}

#[test]
fn test_suggest() {
    let dir = tempdir().unwrap();
    viberyte(dir.path())
        .args(["suggest", "lat"])
        .assert()
        .success()
        .stdout(predicate::str::contains("latin"));
}

#[test]
fn test_suggest_json_is_capped_prefix_list() {
    let dir = tempdir().unwrap();
    let json = json_stdout(viberyte(dir.path()).args(["suggest", "r", "--format", "json"]));

    let suggestions = json.as_array().unwrap();
    assert!(!suggestions.is_empty());
    assert!(suggestions.len() <= 5);
    assert!(suggestions.iter().all(|s| s.as_str().unwrap().starts_with('r')));
}

#[test]
fn test_keywords_by_category() {
    let dir = tempdir().unwrap();
    let json = json_stdout(viberyte(dir.path()).args(["keywords", "--category", "event", "--format", "json"]));

    let entries = json.as_array().unwrap();
    assert!(entries.iter().all(|e| e["category"] == "event"));
    assert!(entries.iter().any(|e| e["keyword"] == "comedy"));
}

#[test]
fn test_keywords_unknown_category() {
    let dir = tempdir().unwrap();
    viberyte(dir.path())
        .args(["keywords", "--category", "genre"])
        .assert()
        .failure();
}

#[test]
fn test_config_file_extends_dictionary() {
    let (dir, venues, _) = catalog();
    std::fs::write(
        dir.path().join(".viberyte.toml"),
        r#"
default_city = "Brooklyn"

[[keywords]]
keyword = "sky"
field = "vibe_tags"
value = "romantic"
category = "vibe"
weight = 6
"#,
    )
    .unwrap();

    let json = json_stdout(
        viberyte(dir.path())
            .args(["search", "sky", "--format", "json", "--venues"])
            .arg(&venues),
    );

    assert_eq!(json["matchedKeywords"], serde_json::json!(["sky"]));
    let venues = json["venues"].as_array().unwrap();
    assert_eq!(venues.len(), 1);
    assert_eq!(venues[0]["name"], "Skyline Brooklyn");
}

#[test]
fn test_invalid_config_file() {
    let dir = tempdir().unwrap();
    let config = dir.path().join("bad.toml");
    std::fs::write(&config, "suggestion_limit = \"lots\"").unwrap();

    viberyte(dir.path())
        .arg("--config")
        .arg(&config)
        .args(["suggest", "la"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to parse config file"));
}

#[test]
fn test_stats_flag() {
    let (dir, venues, _) = catalog();
    viberyte(dir.path())
        .args(["search", "rooftop", "--stats", "--format", "json", "--venues"])
        .arg(&venues)
        .assert()
        .success()
        .stderr(predicate::str::contains("total_searches"));
}
