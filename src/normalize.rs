//! Pure normalizers for raw strings coming off the page: match URLs, team
//! names, numeric cell text. Everything here is total — bad input yields
//! `None`, never a panic.

use once_cell::sync::Lazy;
use regex::Regex;
use url::Url;

/// Fragment that opens a match page directly on the statistics tab.
const STATS_FRAGMENT: &str = "#/match-summary/match-statistics/0";

/// Trailing embedded score, e.g. "Real Madrid 3-1" / "Арсенал 2:0".
static TRAILING_SCORE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+\d+\s*[:\-–—]\s*\d+\s*$").expect("valid regex"));

static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid regex"));

/// Anything that is not a latin/cyrillic letter or digit.
static NON_ALNUM_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^a-zа-я0-9]+").expect("valid regex"));

/// Standalone club-prefix token dropped for identity comparison.
static CLUB_PREFIX_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\bфк\b").expect("valid regex"));

/// Dash-like separator between the two team names in a page title.
static TITLE_SEP_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s[-–—]\s").expect("valid regex"));

static TITLE_SUFFIX_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+\|.*$").expect("valid regex"));

/// Rewrites a match URL so it opens on the statistics tab. Idempotent.
pub fn normalize_match_url(href: &str) -> String {
    if href.contains(STATS_FRAGMENT) {
        return href.to_string();
    }
    let base = href
        .split("#/match-summary")
        .next()
        .unwrap_or(href)
        .trim_end_matches('/');
    format!("{base}/{STATS_FRAGMENT}")
}

/// Match ID is the path segment right after `football` on `/match/...` URLs.
pub fn extract_match_id(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    let parts: Vec<&str> = parsed
        .path()
        .trim_matches('/')
        .split('/')
        .filter(|s| !s.is_empty())
        .collect();
    if !parts.contains(&"match") {
        return None;
    }
    let i = parts.iter().position(|p| *p == "football")?;
    parts.get(i + 1).map(|s| s.to_string())
}

/// First run of digits in the text, NBSP-tolerant. None when there is none.
pub fn parse_leading_int(text: &str) -> Option<u32> {
    let cleaned = text.replace('\u{a0}', " ");
    let start = cleaned.find(|c: char| c.is_ascii_digit())?;
    let digits: String = cleaned[start..]
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().ok()
}

/// Strips a trailing embedded score and collapses whitespace. None when
/// nothing displayable remains.
pub fn clean_team_name(name: &str) -> Option<String> {
    let n = TRAILING_SCORE_RE.replace(name, "");
    let n = WHITESPACE_RE.replace_all(&n, " ");
    let n = n.trim_matches(|c: char| c == ' ' || c == '-' || c == '–' || c == '—' || c == '\u{a0}');
    if n.is_empty() {
        None
    } else {
        Some(n.to_string())
    }
}

/// Canonical form for identity matching only, never for display: lowercase,
/// `ё` folded to `е`, punctuation collapsed to spaces, the `фк` club prefix
/// dropped.
pub fn normalize_for_comparison(name: &str) -> String {
    let n = name.to_lowercase().replace('ё', "е");
    let n = NON_ALNUM_RE.replace_all(&n, " ");
    let n = CLUB_PREFIX_RE.replace_all(&n, "");
    WHITESPACE_RE.replace_all(&n, " ").trim().to_string()
}

/// Splits a page title like "Arsenal - Chelsea | Flashscore" into the two
/// team halves at the first dash-like separator surrounded by spaces.
pub fn split_title_teams(title: &str) -> Option<(String, String)> {
    let trimmed = TITLE_SUFFIX_RE.replace(title, "");
    let m = TITLE_SEP_RE.find(&trimmed)?;
    let home = trimmed[..m.start()].trim();
    let away = trimmed[m.end()..].trim();
    if home.is_empty() || away.is_empty() {
        return None;
    }
    Some((home.to_string(), away.to_string()))
}

/// Resolves a possibly-relative href against the site root.
pub fn resolve_url(base: &str, href: &str) -> Option<String> {
    Url::parse(base).ok()?.join(href).ok().map(String::from)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
