pub mod page;
pub mod readiness;
pub mod webdriver;

#[cfg(test)]
pub mod fake;

pub use page::{Page, Selector, Session};
pub use readiness::{wait_for_selector, wait_stable_count, WaitOutcome};
pub use webdriver::ChromeSession;

use rand::Rng;
use std::time::Duration;

use crate::config::{HUMAN_PAUSE_MAX_MS, HUMAN_PAUSE_MIN_MS};

/// Short randomized pause between UI interactions so the interaction cadence
/// doesn't look machine-generated.
pub async fn human_pause() {
    let ms = rand::thread_rng().gen_range(HUMAN_PAUSE_MIN_MS..=HUMAN_PAUSE_MAX_MS);
    tokio::time::sleep(Duration::from_millis(ms)).await;
}
