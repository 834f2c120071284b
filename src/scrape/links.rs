//! Match-link collection on a team page.
//!
//! The site lists matches newest first, and the freshest rows are often
//! fixtures that are unplayed or still live. The default window therefore
//! skips the first ten rows and takes the next ten; when fewer rows exist
//! the trailing up-to-ten are used instead.

use std::ops::Range;

use crate::browser::{human_pause, wait_for_selector, wait_stable_count, Page, Selector};
use crate::config::{Config, BASE_URL, STABLE_WINDOW_MS};
use crate::error::{AppError, Result};
use crate::normalize::{normalize_match_url, resolve_url};
use crate::scrape::accept_cookies_if_any;

pub const EVENT_ROW_CSS: &str = "a.eventRowLink";

/// "Recent results" tab; present on some team-page layouts only.
const RESULTS_TAB: Selector =
    Selector::XPath("//div[contains(@class,'tabs__ear') and normalize-space()='Последние результаты']");

/// Team-page readiness: cookie dismissal, best-effort tab activation, then
/// visible match rows with a stable count.
pub async fn wait_team_page_ready(page: &dyn Page, cfg: &Config) -> Result<()> {
    accept_cookies_if_any(page, cfg).await;
    if page
        .click_first_visible(&RESULTS_TAB)
        .await
        .unwrap_or(false)
    {
        human_pause().await;
    }

    if !wait_for_selector(page, EVENT_ROW_CSS, cfg.eventlinks_timeout_ms)
        .await
        .is_ready()
    {
        return Err(AppError::Timeout(
            "no visible match rows on team page".to_string(),
        ));
    }
    wait_stable_count(
        page,
        EVENT_ROW_CSS,
        1,
        STABLE_WINDOW_MS,
        cfg.eventlinks_timeout_ms,
    )
    .await;
    Ok(())
}

/// The index window taken from `count` rows: `[skip, skip+size)` when enough
/// rows exist, otherwise the trailing up-to-`size` rows.
pub fn select_window(count: usize, skip: usize, size: usize) -> Range<usize> {
    if count >= skip + size {
        skip..skip + size
    } else {
        count.saturating_sub(size)..count
    }
}

/// Collects the configured window of match URLs from a team page, resolved
/// to absolute form and rewritten to open on the statistics tab.
pub async fn get_recent_event_links(page: &dyn Page, cfg: &Config) -> Result<Vec<String>> {
    wait_team_page_ready(page, cfg).await?;

    let hrefs = page.visible_attrs(EVENT_ROW_CSS, "href").await?;
    let window = select_window(hrefs.len(), cfg.match_window_skip, cfg.match_window_size);
    Ok(hrefs[window]
        .iter()
        .filter(|href| !href.is_empty())
        .filter_map(|href| resolve_url(BASE_URL, href))
        .map(|url| normalize_match_url(&url))
        .collect())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
