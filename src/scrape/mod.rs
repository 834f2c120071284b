pub mod links;
pub mod stats;
pub mod teams;

use std::time::Duration;
use tokio::time::Instant;

use crate::browser::{human_pause, Page, Selector};
use crate::config::{Config, POLL_INTERVAL_MS};

/// Consent banner buttons across the site's locales, tried in order.
const COOKIE_BUTTONS: [Selector; 4] = [
    Selector::XPath("//button[normalize-space()='Принять']"),
    Selector::XPath("//button[normalize-space()='Согласиться']"),
    Selector::XPath("//button[normalize-space()='I Accept']"),
    Selector::Css("div[data-testid='banner'] button"),
];

/// Dismisses the cookie banner if one shows up within the configured window.
/// Best-effort and non-critical: all failures are swallowed and the return
/// value only says whether a click landed.
pub async fn accept_cookies_if_any(page: &dyn Page, cfg: &Config) -> bool {
    let deadline = Instant::now() + Duration::from_millis(cfg.cookie_btn_timeout_ms);
    loop {
        for selector in &COOKIE_BUTTONS {
            if page.click_first_visible(selector).await.unwrap_or(false) {
                human_pause().await;
                return true;
            }
        }
        if Instant::now() >= deadline {
            return false;
        }
        tokio::time::sleep(Duration::from_millis(POLL_INTERVAL_MS)).await;
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
