use std::path::PathBuf;

/// Site root used to resolve relative hrefs.
pub const BASE_URL: &str = "https://www.flashscorekz.com/";

/// Default league standings pages crawled when LEAGUES is not set.
pub const DEFAULT_LEAGUES: &[&str] = &[
    "https://www.flashscorekz.com/football/england/premier-league-2024-2025/standings/#/lAkHuyP3/table/overall",
    "https://www.flashscorekz.com/football/spain/laliga-2024-2025/#/dINOZk9Q/table/overall",
];

/// DOM polling interval for readiness checks (ms).
pub const POLL_INTERVAL_MS: u64 = 150;

/// How long an element count must hold unchanged to be considered stable (ms).
pub const STABLE_WINDOW_MS: u64 = 600;

/// A league page is considered populated once this many team links are present.
pub const LEAGUE_MIN_TEAM_LINKS: usize = 10;

/// Bounds of the randomized pause between page interactions (ms).
pub const HUMAN_PAUSE_MIN_MS: u64 = 120;
pub const HUMAN_PAUSE_MAX_MS: u64 = 280;

#[derive(Debug, Clone)]
pub struct Config {
    /// League standings URLs, in crawl order (LEAGUES, comma/newline separated).
    pub leagues: Vec<String>,
    /// WebDriver server endpoint (WEBDRIVER_URL).
    pub webdriver_url: String,
    pub log_level: String,
    /// Run the browser without a visible window (HEADLESS).
    pub headless: bool,
    /// Max teams taken per league; None = all (TEAM_LIMIT, 0 = unlimited).
    pub team_limit: Option<usize>,
    /// Max matches aggregated per team (MATCHES_PER_TEAM).
    pub matches_per_team: usize,
    /// Team workers running at once (TEAMS_CONCURRENCY; 0 is raised to 1,
    /// a fan-out with no permits would never finish).
    pub concurrency: usize,
    /// Navigation timeout (NAV_TIMEOUT_MS).
    pub nav_timeout_ms: u64,
    /// Default wait timeout for readiness checks (DEF_TIMEOUT_MS).
    pub def_timeout_ms: u64,
    /// Visibility window for cookie-banner buttons (COOKIE_BTN_TIMEOUT_MS).
    pub cookie_btn_timeout_ms: u64,
    /// Wait for visible match rows on a team page (WAIT_EVENTLINKS_TIMEOUT_MS).
    pub eventlinks_timeout_ms: u64,
    /// Wait for the corners row on a statistics page (STAT_ROW_TIMEOUT_MS).
    pub stat_row_timeout_ms: u64,
    /// Retry structured extraction after a scroll cycle (FORCE_SCROLL_STATS).
    pub force_scroll_stats: bool,
    /// Most-recent rows skipped before the match window (MATCH_WINDOW_SKIP).
    /// The site lists newest first; the freshest rows may be unplayed or live.
    pub match_window_skip: usize,
    /// Match window size (MATCH_WINDOW_SIZE).
    pub match_window_size: usize,
    /// Output CSV path (OUT_CSV).
    pub out_csv: PathBuf,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            leagues: env_list("LEAGUES", DEFAULT_LEAGUES),
            webdriver_url: std::env::var("WEBDRIVER_URL")
                .unwrap_or_else(|_| "http://localhost:9515".to_string()),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            headless: env_bool("HEADLESS", false),
            team_limit: match env_usize("TEAM_LIMIT", 0) {
                0 => None,
                n => Some(n),
            },
            matches_per_team: env_usize("MATCHES_PER_TEAM", 10),
            concurrency: env_usize("TEAMS_CONCURRENCY", 5).max(1),
            nav_timeout_ms: env_u64("NAV_TIMEOUT_MS", 8000),
            def_timeout_ms: env_u64("DEF_TIMEOUT_MS", 8000),
            cookie_btn_timeout_ms: env_u64("COOKIE_BTN_TIMEOUT_MS", 1000),
            eventlinks_timeout_ms: env_u64("WAIT_EVENTLINKS_TIMEOUT_MS", 8000),
            stat_row_timeout_ms: env_u64("STAT_ROW_TIMEOUT_MS", 10000),
            force_scroll_stats: env_bool("FORCE_SCROLL_STATS", true),
            match_window_skip: env_usize("MATCH_WINDOW_SKIP", 10),
            match_window_size: env_usize("MATCH_WINDOW_SIZE", 10).max(1),
            out_csv: PathBuf::from(
                std::env::var("OUT_CSV").unwrap_or_else(|_| "OUT/teams_corners.csv".to_string()),
            ),
        }
    }
}

#[cfg(test)]
impl Config {
    /// Small timeouts so polling tests finish quickly under paused time.
    pub fn for_tests() -> Self {
        Self {
            leagues: Vec::new(),
            webdriver_url: "http://localhost:9515".to_string(),
            log_level: "info".to_string(),
            headless: true,
            team_limit: None,
            matches_per_team: 10,
            concurrency: 2,
            nav_timeout_ms: 1000,
            def_timeout_ms: 1000,
            cookie_btn_timeout_ms: 100,
            eventlinks_timeout_ms: 1000,
            stat_row_timeout_ms: 1000,
            force_scroll_stats: false,
            match_window_skip: 10,
            match_window_size: 10,
            out_csv: std::path::PathBuf::from("out.csv"),
        }
    }
}

fn env_bool(name: &str, default: bool) -> bool {
    match std::env::var(name) {
        Ok(raw) => matches!(
            raw.trim().to_ascii_lowercase().as_str(),
            "1" | "true" | "yes" | "y" | "on"
        ),
        Err(_) => default,
    }
}

fn env_u64(name: &str, default: u64) -> u64 {
    std::env::var(name)
        .ok()
        .and_then(|raw| raw.trim().parse::<u64>().ok())
        .unwrap_or(default)
}

fn env_usize(name: &str, default: usize) -> usize {
    std::env::var(name)
        .ok()
        .and_then(|raw| raw.trim().parse::<usize>().ok())
        .unwrap_or(default)
}

fn env_list(name: &str, default: &[&str]) -> Vec<String> {
    let fallback = || default.iter().map(|s| s.to_string()).collect::<Vec<_>>();
    match std::env::var(name) {
        Ok(raw) => {
            let parsed: Vec<String> = raw
                .split([',', '\n', ';'])
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
            if parsed.is_empty() {
                fallback()
            } else {
                parsed
            }
        }
        Err(_) => fallback(),
    }
}
