//! Three-phase orchestration: sequential league discovery, bounded fan-out
//! of team workers, then a barrier join and the report.

use std::sync::Arc;

use tokio::sync::Semaphore;
use tracing::{error, info, warn};

use crate::browser::{ChromeSession, Session};
use crate::config::Config;
use crate::error::Result;
use crate::export::write_averages;
use crate::scrape::teams::get_team_links;
use crate::state::AggregateStore;
use crate::types::Team;
use crate::worker::process_team;

pub async fn run(cfg: Config) -> Result<()> {
    let session: Arc<dyn Session> = Arc::new(ChromeSession::new(&cfg));
    let store = Arc::new(AggregateStore::new());

    let all_teams = discover_teams(session.as_ref(), &cfg).await?;
    info!(teams = all_teams.len(), "discovery complete");

    // Fan out one worker per team behind the admission gate. Each task body
    // is a failure boundary: a team's total failure is logged and discarded.
    let semaphore = Arc::new(Semaphore::new(cfg.concurrency));
    let cfg = Arc::new(cfg);
    let mut handles = Vec::with_capacity(all_teams.len());
    for team in all_teams {
        let semaphore = Arc::clone(&semaphore);
        let session = Arc::clone(&session);
        let store = Arc::clone(&store);
        let cfg = Arc::clone(&cfg);
        handles.push(tokio::spawn(async move {
            let Ok(_permit) = semaphore.acquire().await else {
                return;
            };
            match process_team(session.as_ref(), &team, &cfg, &store).await {
                Ok(taken) => info!(team = %team.name, matches = taken, "worker finished"),
                Err(e) => warn!(team = %team.name, "worker failed: {e}"),
            }
        }));
    }

    // Barrier: every worker finishes (or fails) before aggregation.
    futures_util::future::join_all(handles).await;

    let rows = store.materialize_sorted();
    write_averages(&rows, &cfg.out_csv)?;
    info!(rows = rows.len(), path = %cfg.out_csv.display(), "report written");
    for (rank, row) in rows.iter().enumerate() {
        info!(
            "{:>2}. {}: {:.2} (own: {:.2}, opp: {:.2})",
            rank + 1,
            row.name,
            row.avg_total,
            row.avg_own,
            row.avg_opponent,
        );
    }
    Ok(())
}

/// Phase 1: leagues in configured order, strictly sequential, on one page
/// that is released before any worker starts. A league that fails discovery
/// is skipped, never fatal.
async fn discover_teams(session: &dyn Session, cfg: &Config) -> Result<Vec<Team>> {
    let page = session.open_page().await?;
    let mut all_teams = Vec::new();
    for (index, league_url) in cfg.leagues.iter().enumerate() {
        info!(
            league = %league_url,
            "[LEAGUE {}/{}]",
            index + 1,
            cfg.leagues.len(),
        );
        match get_team_links(page.as_ref(), league_url, cfg).await {
            Ok(mut teams) => {
                info!(count = teams.len(), "teams found");
                if let Some(limit) = cfg.team_limit {
                    teams.truncate(limit);
                    info!(count = teams.len(), "league truncated to team limit");
                }
                all_teams.extend(teams);
            }
            Err(e) => error!(league = %league_url, "league discovery failed, skipping: {e}"),
        }
    }
    if let Err(e) = page.close().await {
        warn!("discovery page close failed: {e}");
    }
    Ok(all_teams)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::browser::fake::{FakePage, FakeSession};
    use crate::scrape::teams::{TEAM_LINKS_JS, TEAM_LINK_CSS};
    use serde_json::json;

    #[tokio::test(start_paused = true)]
    async fn failed_league_is_skipped_and_discovery_continues() {
        let page = FakePage::new();
        page.set_counts(TEAM_LINK_CSS, vec![12]);
        page.set_eval(
            TEAM_LINKS_JS,
            json!([
                ["Arsenal", "/team/arsenal/abc/"],
                ["Chelsea", "/team/chelsea/def/"],
            ]),
        );
        page.fail_navigation_to("https://example.com/league-a");
        let session = FakeSession::new();
        session.push_page(page.clone());

        let mut cfg = Config::for_tests();
        cfg.leagues = vec![
            "https://example.com/league-a".to_string(),
            "https://example.com/league-b".to_string(),
        ];

        let teams = discover_teams(&session, &cfg).await.unwrap();
        assert_eq!(teams.len(), 2);
        assert_eq!(teams[0].name, "Arsenal");
        assert_eq!(teams[1].name, "Chelsea");
        // Only the league that could be reached was actually read.
        assert_eq!(page.visited(), vec!["https://example.com/league-b"]);
        // One page for all leagues, released before any worker starts.
        assert_eq!(session.opened(), 1);
        assert!(page.was_closed());
    }

    #[tokio::test(start_paused = true)]
    async fn team_limit_truncates_each_league() {
        let page = FakePage::new();
        page.set_counts(TEAM_LINK_CSS, vec![12]);
        page.set_eval(
            TEAM_LINKS_JS,
            json!([
                ["Ajax", "/team/ajax/1/"],
                ["PSV", "/team/psv/2/"],
                ["Feyenoord", "/team/feyenoord/3/"],
            ]),
        );
        let session = FakeSession::new();
        session.push_page(page.clone());

        let mut cfg = Config::for_tests();
        cfg.leagues = vec!["https://example.com/league".to_string()];
        cfg.team_limit = Some(2);

        let teams = discover_teams(&session, &cfg).await.unwrap();
        assert_eq!(teams.len(), 2);
        assert_eq!(teams[0].name, "Ajax");
        assert_eq!(teams[1].name, "PSV");
    }
}
