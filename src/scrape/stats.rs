//! Corner extraction from a match-statistics page.
//!
//! The site serves (at least) two incompatible layouts: a structured one
//! with `wcl-statistics-category` blocks and a legacy one built from
//! `stat__row` divs. Readiness is a single in-page predicate that accepts
//! either; extraction runs an ordered strategy chain that stops at the first
//! success, so a third layout is a pure extension.

use std::time::Duration;
use tokio::time::Instant;

use serde_json::Value;

use crate::browser::{human_pause, Page, Selector, WaitOutcome};
use crate::config::{Config, POLL_INTERVAL_MS};
use crate::error::Result;
use crate::normalize::{clean_team_name, extract_match_id, parse_leading_int, split_title_teams};
use crate::scrape::accept_cookies_if_any;
use crate::types::MatchRecord;

const STATS_TAB: Selector = Selector::XPath("//a[contains(normalize-space(), 'Статистика')]");

/// True once either layout exposes a corners row with two numeric values.
pub(crate) const STATS_READY_JS: &str = r#"
    const qa = (sel, root = document) => Array.from(root.querySelectorAll(sel));
    const q = (sel, root = document) => root.querySelector(sel);
    const label = /углов|corner/i;

    for (const cat of qa('[data-testid="wcl-statistics-category"]')) {
        const t = (q('strong', cat)?.textContent || '').trim();
        if (label.test(t)) {
            const row = cat.parentElement;
            const vals = row ? qa('[data-testid="wcl-statistics-value"] strong', row) : [];
            if (vals.length >= 2 && /\d/.test(vals[0].textContent || '') && /\d/.test(vals[1].textContent || '')) {
                return true;
            }
        }
    }
    for (const r of qa('div.stat__row')) {
        if (label.test(r.textContent || '')) {
            const home = q('.stat__homeValue, .stat__value--home', r);
            const away = q('.stat__awayValue, .stat__value--away', r);
            if (home && away && /\d/.test(home.textContent || '') && /\d/.test(away.textContent || '')) {
                return true;
            }
        }
    }
    return false;
"#;

/// Structured layout: the category block labelled "corners" and the two
/// value cells of its sibling row, raw text.
pub(crate) const STRUCTURED_CORNERS_JS: &str = r#"
    const qa = (sel, root = document) => Array.from(root.querySelectorAll(sel));
    const q = (sel, root = document) => root.querySelector(sel);
    const label = /углов|corner/i;

    for (const cat of qa('[data-testid="wcl-statistics-category"]')) {
        const t = (q('strong', cat)?.textContent || '').trim();
        if (label.test(t)) {
            const row = cat.parentElement;
            const vals = row ? qa('[data-testid="wcl-statistics-value"] strong', row) : [];
            if (vals.length < 2) return null;
            return { home: vals[0].textContent || '', away: vals[1].textContent || '' };
        }
    }
    return null;
"#;

/// Legacy layout: a stat row mentioning corners, either class-name variant
/// for the value cells.
pub(crate) const LEGACY_CORNERS_JS: &str = r#"
    const qa = (sel, root = document) => Array.from(root.querySelectorAll(sel));
    const q = (sel, root = document) => root.querySelector(sel);
    const label = /углов|corner/i;

    for (const r of qa('div.stat__row')) {
        if (label.test(r.textContent || '')) {
            const home = q('.stat__homeValue, .stat__value--home', r);
            const away = q('.stat__awayValue, .stat__value--away', r);
            if (home && away) {
                return { home: home.textContent || '', away: away.textContent || '' };
            }
        }
    }
    return null;
"#;

/// Participant names under the known selector variants per side, plus the
/// page title as a fallback source.
pub(crate) const TEAM_NAMES_JS: &str = r#"
    const pick = (sels) => {
        for (const s of sels) {
            const el = document.querySelector(s);
            const t = el && (el.textContent || el.getAttribute('title') || '').trim();
            if (t) return t;
        }
        return null;
    };
    const home = pick([
        '[data-testid="wcl-participant-home"] [data-testid="wcl-participant-name"]',
        '[data-testid="wcl-participantHomeName"]',
        '[data-testid="wcl-participant-home-name"]',
        '.duelParticipants .home [class*="participantName"]',
        '.duelParticipants .home a[title]'
    ]);
    const away = pick([
        '[data-testid="wcl-participant-away"] [data-testid="wcl-participant-name"]',
        '[data-testid="wcl-participantAwayName"]',
        '[data-testid="wcl-participant-away-name"]',
        '.duelParticipants .away [class*="participantName"]',
        '.duelParticipants .away a[title]'
    ]);
    const title = document.querySelector('meta[property="og:title"]')?.content || document.title || '';
    return { home, away, title };
"#;

/// Statistics-page readiness: cookie dismissal, best-effort tab click, then
/// poll the dual-layout predicate until the stats-row timeout.
pub async fn wait_stats_ready(page: &dyn Page, cfg: &Config) -> WaitOutcome {
    accept_cookies_if_any(page, cfg).await;
    if page.click_first_visible(&STATS_TAB).await.unwrap_or(false) {
        human_pause().await;
    }

    let deadline = Instant::now() + Duration::from_millis(cfg.stat_row_timeout_ms);
    loop {
        let ready = page
            .evaluate(STATS_READY_JS)
            .await
            .ok()
            .and_then(|v| v.as_bool())
            .unwrap_or(false);
        if ready {
            return WaitOutcome::Ready;
        }
        if Instant::now() >= deadline {
            return WaitOutcome::TimedOut;
        }
        tokio::time::sleep(Duration::from_millis(POLL_INTERVAL_MS)).await;
    }
}

/// Extraction strategies in the order they are tried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Strategy {
    Structured,
    StructuredAfterScroll,
    Legacy,
}

impl Strategy {
    fn chain(cfg: &Config) -> Vec<Strategy> {
        let mut chain = vec![Strategy::Structured];
        if cfg.force_scroll_stats {
            chain.push(Strategy::StructuredAfterScroll);
        }
        chain.push(Strategy::Legacy);
        chain
    }

    async fn run(self, page: &dyn Page, cfg: &Config) -> Option<(u32, u32)> {
        match self {
            Strategy::Structured => corners_from_script(page, STRUCTURED_CORNERS_JS).await,
            Strategy::StructuredAfterScroll => {
                nudge_lazy_render(page).await;
                let _ = wait_stats_ready(page, cfg).await;
                corners_from_script(page, STRUCTURED_CORNERS_JS).await
            }
            Strategy::Legacy => corners_from_script(page, LEGACY_CORNERS_JS).await,
        }
    }
}

async fn corners_from_script(page: &dyn Page, script: &str) -> Option<(u32, u32)> {
    let value = page.evaluate(script).await.ok()?;
    corner_pair(&value)
}

/// Parses `{home, away}` raw texts into a pair; both sides must carry digits.
fn corner_pair(value: &Value) -> Option<(u32, u32)> {
    let obj = value.as_object()?;
    let home = parse_leading_int(obj.get("home")?.as_str()?)?;
    let away = parse_leading_int(obj.get("away")?.as_str()?)?;
    Some((home, away))
}

/// Scroll down and back up to trigger lazy rendering of the stats block.
async fn nudge_lazy_render(page: &dyn Page) {
    let _ = page.scroll_by(2000).await;
    tokio::time::sleep(Duration::from_millis(300)).await;
    let _ = page.scroll_by(-2000).await;
    tokio::time::sleep(Duration::from_millis(200)).await;
}

/// Home/away display names: explicit participant elements first, page title
/// split second, both cleaned of embedded scores.
async fn extract_team_names(page: &dyn Page) -> (Option<String>, Option<String>) {
    let Ok(value) = page.evaluate(TEAM_NAMES_JS).await else {
        return (None, None);
    };
    let field = |key: &str| {
        value
            .get(key)
            .and_then(Value::as_str)
            .map(str::to_string)
            .filter(|s| !s.is_empty())
    };
    let title_pair = field("title").and_then(|t| split_title_teams(&t));
    let home = field("home").or_else(|| title_pair.as_ref().map(|p| p.0.clone()));
    let away = field("away").or_else(|| title_pair.as_ref().map(|p| p.1.clone()));
    (
        home.as_deref().and_then(clean_team_name),
        away.as_deref().and_then(clean_team_name),
    )
}

/// Extracts the corners row from the current statistics page. `Ok(None)`
/// covers every soft failure: readiness timeout, exhausted strategy chain,
/// unparseable values. Nothing here aborts a worker.
pub async fn parse_match_corners(page: &dyn Page, cfg: &Config) -> Result<Option<MatchRecord>> {
    if !wait_stats_ready(page, cfg).await.is_ready() {
        return Ok(None);
    }

    let mut corners = None;
    for strategy in Strategy::chain(cfg) {
        if let Some(pair) = strategy.run(page, cfg).await {
            corners = Some(pair);
            break;
        }
    }
    let Some((home_corners, away_corners)) = corners else {
        return Ok(None);
    };

    let (home_team, away_team) = extract_team_names(page).await;
    let url = page.current_url().await.unwrap_or_default();
    Ok(Some(MatchRecord {
        match_id: extract_match_id(&url),
        url,
        home_team,
        away_team,
        home_corners: Some(home_corners),
        away_corners: Some(away_corners),
    }))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::browser::fake::FakePage;
    use serde_json::json;

    fn ready_page() -> FakePage {
        let page = FakePage::new();
        page.set_eval(STATS_READY_JS, json!(true));
        page
    }

    #[tokio::test(start_paused = true)]
    async fn structured_layout_wins_over_legacy() {
        let page = ready_page();
        page.set_eval(STRUCTURED_CORNERS_JS, json!({"home": "7", "away": "3"}));
        page.set_eval(LEGACY_CORNERS_JS, json!({"home": "1", "away": "1"}));
        page.set_eval(
            TEAM_NAMES_JS,
            json!({"home": "Arsenal", "away": "Chelsea", "title": ""}),
        );
        page.goto("https://example.com/match/football/abc123/x/")
            .await
            .unwrap();

        let record = parse_match_corners(&page, &Config::for_tests())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(record.home_corners, Some(7));
        assert_eq!(record.away_corners, Some(3));
        assert_eq!(record.home_team.as_deref(), Some("Arsenal"));
        assert_eq!(record.away_team.as_deref(), Some("Chelsea"));
        assert_eq!(record.match_id.as_deref(), Some("abc123"));
    }

    #[tokio::test(start_paused = true)]
    async fn legacy_layout_used_when_structured_is_absent() {
        let page = ready_page();
        page.set_eval(STRUCTURED_CORNERS_JS, Value::Null);
        page.set_eval(LEGACY_CORNERS_JS, json!({"home": " 4 ", "away": "\u{a0}6"}));
        page.set_eval(
            TEAM_NAMES_JS,
            json!({"home": null, "away": null, "title": "Inter - Milan | Flashscore"}),
        );

        let record = parse_match_corners(&page, &Config::for_tests())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(record.home_corners, Some(4));
        assert_eq!(record.away_corners, Some(6));
        assert_eq!(record.home_team.as_deref(), Some("Inter"));
        assert_eq!(record.away_team.as_deref(), Some("Milan"));
    }

    #[tokio::test(start_paused = true)]
    async fn scroll_retry_runs_only_when_configured() {
        let page = ready_page();
        // Structured appears only on the second attempt, after the scroll.
        page.set_eval_seq(
            STRUCTURED_CORNERS_JS,
            vec![Value::Null, json!({"home": "5", "away": "2"})],
        );
        page.set_eval(LEGACY_CORNERS_JS, Value::Null);
        page.set_eval(TEAM_NAMES_JS, json!({"home": "A", "away": "B", "title": ""}));

        let cfg = Config {
            force_scroll_stats: true,
            ..Config::for_tests()
        };
        let record = parse_match_corners(&page, &cfg).await.unwrap().unwrap();
        assert_eq!(record.home_corners, Some(5));
        assert_eq!(record.away_corners, Some(2));
    }

    #[tokio::test(start_paused = true)]
    async fn readiness_timeout_is_no_record() {
        let page = FakePage::new();
        page.set_eval(STATS_READY_JS, json!(false));

        let record = parse_match_corners(&page, &Config::for_tests())
            .await
            .unwrap();
        assert!(record.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn exhausted_chain_is_no_record() {
        let page = ready_page();
        page.set_eval(STRUCTURED_CORNERS_JS, Value::Null);
        page.set_eval(LEGACY_CORNERS_JS, json!({"home": "n/a", "away": "2"}));

        let record = parse_match_corners(&page, &Config::for_tests())
            .await
            .unwrap();
        assert!(record.is_none());
    }

    #[test]
    fn corner_pair_requires_both_sides() {
        assert_eq!(corner_pair(&json!({"home": "3", "away": "9"})), Some((3, 9)));
        assert_eq!(corner_pair(&json!({"home": "3", "away": "-"})), None);
        assert_eq!(corner_pair(&Value::Null), None);
    }
}
