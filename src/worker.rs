//! Per-team traversal. A worker owns exactly one page for its lifetime and
//! is totally resilient to individual bad matches: every per-candidate
//! failure is a skip, never an abort.

use tracing::{debug, info, warn};

use crate::browser::{human_pause, Page, Session};
use crate::config::Config;
use crate::error::Result;
use crate::normalize::{normalize_for_comparison, normalize_match_url};
use crate::scrape::links::get_recent_event_links;
use crate::scrape::stats::parse_match_corners;
use crate::state::AggregateStore;
use crate::types::Team;

/// Processes one team end to end and returns the number of matches counted.
/// The page is released on every exit path.
pub async fn process_team(
    session: &dyn Session,
    team: &Team,
    cfg: &Config,
    store: &AggregateStore,
) -> Result<usize> {
    let page = session.open_page().await?;
    let outcome = run_team(page.as_ref(), team, cfg, store).await;
    if let Err(e) = page.close().await {
        warn!(team = %team.name, "page close failed: {e}");
    }
    outcome
}

async fn run_team(
    page: &dyn Page,
    team: &Team,
    cfg: &Config,
    store: &AggregateStore,
) -> Result<usize> {
    page.goto(&team.url).await?;
    let candidates = get_recent_event_links(page, cfg).await?;
    if candidates.is_empty() {
        info!(team = %team.name, "no match rows found");
        return Ok(0);
    }

    let own_norm = normalize_for_comparison(&team.name);
    let mut taken = 0usize;

    for href in candidates {
        if taken >= cfg.matches_per_team {
            break;
        }
        let url = normalize_match_url(&href);
        if let Err(e) = page.goto(&url).await {
            debug!(team = %team.name, url = %url, "navigation failed, skipping: {e}");
            continue;
        }
        human_pause().await;

        let record = match parse_match_corners(page, cfg).await {
            Ok(Some(record)) => record,
            Ok(None) => {
                debug!(team = %team.name, url = %url, "no corners data, skipping");
                continue;
            }
            Err(e) => {
                debug!(team = %team.name, url = %url, "extraction failed, skipping: {e}");
                continue;
            }
        };
        let (Some(home_corners), Some(away_corners)) = (record.home_corners, record.away_corners)
        else {
            continue;
        };

        let home_norm = normalize_for_comparison(record.home_team.as_deref().unwrap_or(""));
        let away_norm = normalize_for_comparison(record.away_team.as_deref().unwrap_or(""));
        let Some((own, opponent)) =
            assign_sides(&own_norm, &home_norm, &away_norm, home_corners, away_corners)
        else {
            debug!(
                team = %team.name,
                home = %home_norm,
                away = %away_norm,
                "neither side matches this team, discarding"
            );
            continue;
        };

        store.update(&team.name, own, opponent);
        taken += 1;
        debug!(
            team = %team.name,
            match_id = ?record.match_id,
            url = %record.url,
            own,
            opponent,
            "match counted"
        );
    }

    info!(team = %team.name, matches = taken, "team complete");
    Ok(taken)
}

/// Resolves which extracted side is the worker's own team. Exact normalized
/// match first, then substring containment of the own name; ambiguity
/// resolves home-first like the exact check. None = record unusable.
pub fn assign_sides(
    own: &str,
    home: &str,
    away: &str,
    home_corners: u32,
    away_corners: u32,
) -> Option<(u32, u32)> {
    if own.is_empty() {
        return None;
    }
    if own == home {
        return Some((home_corners, away_corners));
    }
    if own == away {
        return Some((away_corners, home_corners));
    }
    if !home.is_empty() && home.contains(own) {
        return Some((home_corners, away_corners));
    }
    if !away.is_empty() && away.contains(own) {
        return Some((away_corners, home_corners));
    }
    None
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
