//! Polling readiness checks. The target pages render their lists
//! incrementally from client-side scripts, so "selector exists" fires on
//! half-populated lists; what we actually wait for is the element count
//! holding still.

use std::time::Duration;
use tokio::time::Instant;

use crate::browser::Page;
use crate::config::POLL_INTERVAL_MS;

/// Outcome of a bounded wait. A timeout is a value, not an error — callers
/// decide whether it is fatal at their level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitOutcome {
    Ready,
    TimedOut,
}

impl WaitOutcome {
    pub fn is_ready(self) -> bool {
        matches!(self, WaitOutcome::Ready)
    }
}

/// Waits until the count of elements matching `css` is at least `min_count`
/// and has not changed for `stable_ms`. The stability window restarts on any
/// change; count-read failures observe as zero.
pub async fn wait_stable_count(
    page: &dyn Page,
    css: &str,
    min_count: usize,
    stable_ms: u64,
    overall_timeout_ms: u64,
) -> WaitOutcome {
    let deadline = Instant::now() + Duration::from_millis(overall_timeout_ms);
    let stable = Duration::from_millis(stable_ms);
    let mut last_count: Option<usize> = None;
    let mut stable_since: Option<Instant> = None;

    while Instant::now() < deadline {
        let count = page.visible_count(css).await.unwrap_or(0);
        let now = Instant::now();

        if count >= min_count {
            if last_count == Some(count) {
                match stable_since {
                    None => stable_since = Some(now),
                    Some(since) if now.duration_since(since) >= stable => {
                        return WaitOutcome::Ready;
                    }
                    Some(_) => {}
                }
            } else {
                stable_since = Some(now);
            }
        } else {
            stable_since = None;
        }

        last_count = Some(count);
        tokio::time::sleep(Duration::from_millis(POLL_INTERVAL_MS)).await;
    }
    WaitOutcome::TimedOut
}

/// Waits until at least one rendered element matches `css`.
pub async fn wait_for_selector(page: &dyn Page, css: &str, overall_timeout_ms: u64) -> WaitOutcome {
    let deadline = Instant::now() + Duration::from_millis(overall_timeout_ms);
    loop {
        if page.visible_count(css).await.unwrap_or(0) >= 1 {
            return WaitOutcome::Ready;
        }
        if Instant::now() >= deadline {
            return WaitOutcome::TimedOut;
        }
        tokio::time::sleep(Duration::from_millis(POLL_INTERVAL_MS)).await;
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
