use std::sync::mpsc::{Receiver, Sender};
use std::thread;

use crate::leagues_fetch;
use crate::sample_feed;
use crate::state::{Delta, ProviderCommand};

/// Spawns the background fetch thread. All network IO happens here;
/// results flow back to the UI loop as deltas over the channel. Commands
/// are handled one at a time in arrival order and duplicate in-flight
/// requests are not deduplicated.
pub fn spawn_provider(tx: Sender<Delta>, cmd_rx: Receiver<ProviderCommand>) {
    let offline = offline_mode();
    thread::spawn(move || {
        while let Ok(cmd) = cmd_rx.recv() {
            let delta = handle_command(cmd, offline);
            if tx.send(delta).is_err() {
                return;
            }
        }
    });
}

fn handle_command(cmd: ProviderCommand, offline: bool) -> Delta {
    match cmd {
        ProviderCommand::FetchLeagues => {
            let result = if offline {
                Ok(sample_feed::sample_leagues())
            } else {
                leagues_fetch::fetch_all_leagues()
            };
            match result {
                Ok(leagues) => Delta::LeaguesLoaded(leagues),
                Err(err) => Delta::LeaguesFailed(err.to_string()),
            }
        }
        ProviderCommand::FetchBadge { league_id } => {
            let result = if offline {
                Ok(sample_feed::sample_badge(&league_id))
            } else {
                leagues_fetch::fetch_season_badges(&league_id)
                    .map(|seasons| leagues_fetch::first_badge_url(&seasons))
            };
            match result {
                Ok(badge_url) => Delta::BadgeLoaded {
                    league_id,
                    badge_url,
                },
                Err(err) => Delta::BadgeFailed {
                    league_id,
                    message: err.to_string(),
                },
            }
        }
    }
}

fn offline_mode() -> bool {
    std::env::var("SPORTSDB_OFFLINE")
        .map(|val| val == "1" || val.eq_ignore_ascii_case("true"))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offline_league_command_yields_loaded_delta() {
        let delta = handle_command(ProviderCommand::FetchLeagues, true);
        match delta {
            Delta::LeaguesLoaded(leagues) => assert!(!leagues.is_empty()),
            other => panic!("expected LeaguesLoaded, got {other:?}"),
        }
    }

    #[test]
    fn offline_badge_command_echoes_the_league_id() {
        let delta = handle_command(
            ProviderCommand::FetchBadge {
                league_id: "4328".to_string(),
            },
            true,
        );
        match delta {
            Delta::BadgeLoaded { league_id, .. } => assert_eq!(league_id, "4328"),
            other => panic!("expected BadgeLoaded, got {other:?}"),
        }
    }
}
