use std::fs;
use std::path::PathBuf;

use sportsdb_terminal::leagues_fetch::{
    first_badge_url, parse_leagues_json, parse_season_badges_json,
};

fn read_fixture(name: &str) -> String {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    fs::read_to_string(path).expect("fixture file should be readable")
}

#[test]
fn parses_all_leagues_fixture() {
    let raw = read_fixture("all_leagues.json");
    let leagues = parse_leagues_json(&raw).expect("fixture should parse");
    assert_eq!(leagues.len(), 5);
    assert_eq!(leagues[0].id, "4328");
    assert_eq!(leagues[0].name, "English Premier League");
    assert_eq!(leagues[0].sport, "Soccer");
    assert_eq!(
        leagues[0].alternate_name.as_deref(),
        Some("Premier League, EPL")
    );
    // Null alternate names come through as None.
    assert_eq!(leagues[4].name, "Spanish La Liga");
    assert!(leagues[4].alternate_name.is_none());
}

#[test]
fn parses_season_badges_fixture() {
    let raw = read_fixture("season_badges.json");
    let seasons = parse_season_badges_json(&raw).expect("fixture should parse");
    assert_eq!(seasons.len(), 2);
    assert_eq!(seasons[0].season, "2023-2024");
    assert_eq!(
        first_badge_url(&seasons).as_deref(),
        Some("https://r2.thesportsdb.com/images/media/league/badge/pl-2324.png")
    );
}

#[test]
fn null_seasons_fixture_means_no_badge() {
    let raw = read_fixture("season_badges_null.json");
    let seasons = parse_season_badges_json(&raw).expect("fixture should parse");
    assert!(seasons.is_empty());
    assert_eq!(first_badge_url(&seasons), None);
}
