use anyhow::{Context, Result, anyhow};
use serde::Deserialize;

use crate::http_client::http_client;
use crate::state::League;

const API_BASE_URL: &str = "https://www.thesportsdb.com/api/v1/json";

// TheSportsDB keys the free tier as a path segment.
fn api_key() -> String {
    std::env::var("SPORTSDB_API_KEY")
        .ok()
        .filter(|key| !key.trim().is_empty())
        .unwrap_or_else(|| "3".to_string())
}

fn all_leagues_url() -> String {
    format!("{API_BASE_URL}/{}/all_leagues.php", api_key())
}

fn season_badges_url(league_id: &str) -> String {
    format!(
        "{API_BASE_URL}/{}/search_all_seasons.php?badge=1&id={league_id}",
        api_key()
    )
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeasonBadge {
    pub season: String,
    pub badge_url: Option<String>,
}

pub fn fetch_all_leagues() -> Result<Vec<League>> {
    let body = fetch_body(&all_leagues_url())?;
    parse_leagues_json(&body)
}

pub fn fetch_season_badges(league_id: &str) -> Result<Vec<SeasonBadge>> {
    let body = fetch_body(&season_badges_url(league_id))?;
    parse_season_badges_json(&body)
}

fn fetch_body(url: &str) -> Result<String> {
    let client = http_client()?;
    let resp = client.get(url).send().context("request failed")?;
    let status = resp.status();
    let body = resp.text().context("failed reading body")?;
    if !status.is_success() {
        return Err(anyhow!("http {}: {}", status, body));
    }
    Ok(body)
}

#[derive(Debug, Deserialize)]
struct LeaguesResponse {
    // The API sends `"leagues": null` instead of an empty array.
    #[serde(default)]
    leagues: Option<Vec<ApiLeague>>,
}

#[derive(Debug, Deserialize)]
struct ApiLeague {
    #[serde(rename = "idLeague")]
    id: String,
    #[serde(rename = "strLeague")]
    name: String,
    #[serde(rename = "strSport", default)]
    sport: Option<String>,
    #[serde(rename = "strLeagueAlternate", default)]
    alternate: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SeasonsResponse {
    #[serde(default)]
    seasons: Option<Vec<ApiSeason>>,
}

#[derive(Debug, Deserialize)]
struct ApiSeason {
    #[serde(rename = "strSeason", default)]
    season: Option<String>,
    #[serde(rename = "strBadge", default)]
    badge: Option<String>,
}

pub fn parse_leagues_json(raw: &str) -> Result<Vec<League>> {
    let response: LeaguesResponse =
        serde_json::from_str(raw).context("invalid all_leagues json")?;
    let leagues = response
        .leagues
        .unwrap_or_default()
        .into_iter()
        .map(|league| League {
            id: league.id,
            name: league.name,
            sport: league.sport.unwrap_or_default(),
            alternate_name: league.alternate.filter(|alt| !alt.trim().is_empty()),
        })
        .collect();
    Ok(leagues)
}

pub fn parse_season_badges_json(raw: &str) -> Result<Vec<SeasonBadge>> {
    let response: SeasonsResponse =
        serde_json::from_str(raw).context("invalid search_all_seasons json")?;
    let seasons = response
        .seasons
        .unwrap_or_default()
        .into_iter()
        .map(|season| SeasonBadge {
            season: season.season.unwrap_or_default(),
            badge_url: season.badge.filter(|url| !url.trim().is_empty()),
        })
        .collect();
    Ok(seasons)
}

/// The orchestrator only ever uses the first returned season's badge.
pub fn first_badge_url(seasons: &[SeasonBadge]) -> Option<String> {
    seasons.first().and_then(|season| season.badge_url.clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_leagues_array_parses_as_empty() {
        let leagues = parse_leagues_json(r#"{"leagues": null}"#).unwrap();
        assert!(leagues.is_empty());
    }

    #[test]
    fn empty_alternate_name_becomes_none() {
        let raw = r#"{"leagues": [
            {"idLeague": "1", "strLeague": "EPL", "strSport": "Soccer", "strLeagueAlternate": ""}
        ]}"#;
        let leagues = parse_leagues_json(raw).unwrap();
        assert_eq!(leagues.len(), 1);
        assert!(leagues[0].alternate_name.is_none());
    }

    #[test]
    fn garbage_json_is_an_error() {
        assert!(parse_leagues_json("{ nope").is_err());
        assert!(parse_season_badges_json("[1,2").is_err());
    }

    #[test]
    fn first_badge_url_takes_the_first_season() {
        let seasons = vec![
            SeasonBadge {
                season: "2023-2024".into(),
                badge_url: None,
            },
            SeasonBadge {
                season: "2024-2025".into(),
                badge_url: Some("http://img/late.png".into()),
            },
        ];
        assert_eq!(first_badge_url(&seasons), None);
        assert_eq!(first_badge_url(&[]), None);
        assert_eq!(
            first_badge_url(&seasons[1..]),
            Some("http://img/late.png".to_string())
        );
    }
}
