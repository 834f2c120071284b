/// A team discovered on a league standings page.
///
/// Teams are deduplicated by resolved URL within one league page. The same
/// club appearing in two configured leagues yields two entries on purpose.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Team {
    pub name: String,
    pub url: String,
}

/// Everything extracted from one match-statistics page.
///
/// Transient: a record is merged into the aggregate only when both corner
/// counts are present and exactly one side matches the worker's own team.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchRecord {
    pub match_id: Option<String>,
    pub url: String,
    pub home_team: Option<String>,
    pub away_team: Option<String>,
    pub home_corners: Option<u32>,
    pub away_corners: Option<u32>,
}

/// Running per-team sums. `sum_total == sum_own + sum_opponent` holds after
/// every update.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TeamAggregate {
    pub count: u32,
    pub sum_total: u32,
    pub sum_own: u32,
    pub sum_opponent: u32,
}

/// One row of the final report, averages over the matches counted.
#[derive(Debug, Clone, PartialEq)]
pub struct AverageRow {
    pub name: String,
    pub avg_total: f64,
    pub avg_own: f64,
    pub avg_opponent: f64,
}
