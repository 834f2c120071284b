//! Team discovery on league standings pages.

use serde_json::Value;
use std::collections::HashSet;

use crate::browser::{wait_for_selector, wait_stable_count, Page};
use crate::config::{Config, BASE_URL, LEAGUE_MIN_TEAM_LINKS, STABLE_WINDOW_MS};
use crate::error::{AppError, Result};
use crate::normalize::resolve_url;
use crate::scrape::accept_cookies_if_any;
use crate::types::Team;

pub const TEAM_LINK_CSS: &str = "a[href*='/team/']";

/// One bulk read of every team anchor: `[text, href]` pairs in document order.
pub(crate) const TEAM_LINKS_JS: &str = r#"
    const els = Array.from(document.querySelectorAll("a[href*='/team/']"));
    return els.map(a => [(a.textContent || '').trim(), a.getAttribute('href') || '']);
"#;

/// Returns the teams listed on a league page, deduplicated by resolved URL
/// (first occurrence wins, encounter order preserved). The standings table
/// fills in from client-side scripts, so discovery waits for the link count
/// to stabilize before the bulk read.
pub async fn get_team_links(
    page: &dyn Page,
    league_url: &str,
    cfg: &Config,
) -> Result<Vec<Team>> {
    page.goto(league_url).await?;
    accept_cookies_if_any(page, cfg).await;

    if !wait_for_selector(page, TEAM_LINK_CSS, cfg.def_timeout_ms)
        .await
        .is_ready()
    {
        return Err(AppError::Timeout(format!(
            "no team links appeared on {league_url}"
        )));
    }
    // Best-effort: a still-growing list past the timeout is read as-is.
    wait_stable_count(
        page,
        TEAM_LINK_CSS,
        LEAGUE_MIN_TEAM_LINKS,
        STABLE_WINDOW_MS,
        cfg.def_timeout_ms,
    )
    .await;

    let raw = page.evaluate(TEAM_LINKS_JS).await?;
    let mut seen = HashSet::new();
    let mut teams = Vec::new();
    for item in raw.as_array().map(Vec::as_slice).unwrap_or_default() {
        let name = item
            .get(0)
            .and_then(Value::as_str)
            .unwrap_or("")
            .trim();
        let href = item.get(1).and_then(Value::as_str).unwrap_or("");
        if name.is_empty() || href.is_empty() || !href.contains("/team/") {
            continue;
        }
        let Some(url) = resolve_url(BASE_URL, href) else {
            continue;
        };
        if seen.insert(url.clone()) {
            teams.push(Team {
                name: name.to_string(),
                url,
            });
        }
    }
    Ok(teams)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
