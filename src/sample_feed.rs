use crate::state::League;

/// Bundled catalogue for offline runs (`SPORTSDB_OFFLINE=1`) and demos.

fn league(id: &str, name: &str, sport: &str, alt: Option<&str>) -> League {
    League {
        id: id.to_string(),
        name: name.to_string(),
        sport: sport.to_string(),
        alternate_name: alt.map(str::to_string),
    }
}

pub fn sample_leagues() -> Vec<League> {
    vec![
        league(
            "4328",
            "English Premier League",
            "Soccer",
            Some("Premier League, EPL"),
        ),
        league("4387", "NBA", "Basketball", Some("National Basketball Association")),
        league("4370", "Formula 1", "Motorsport", Some("Formula One, F1")),
        league("4391", "NFL", "American Football", Some("National Football League")),
        league("4335", "Spanish La Liga", "Soccer", Some("La Liga, Primera Division")),
        league("4380", "NHL", "Ice Hockey", Some("National Hockey League")),
        league("4424", "MLB", "Baseball", Some("Major League Baseball")),
        league("4331", "German Bundesliga", "Soccer", Some("Bundesliga")),
        league("4332", "Italian Serie A", "Soccer", Some("Serie A")),
        league("4443", "UFC", "Fighting", Some("Ultimate Fighting Championship")),
    ]
}

pub fn sample_badge(league_id: &str) -> Option<String> {
    sample_leagues()
        .iter()
        .any(|league| league.id == league_id)
        .then(|| format!("https://r2.thesportsdb.com/images/media/league/badge/{league_id}.png"))
}
