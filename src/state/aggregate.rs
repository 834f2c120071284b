//! Shared per-team corner aggregates.
//!
//! The store is the single owner of all aggregate entries. Workers never see
//! the map; they go through `update`, and the whole four-field update happens
//! under one lock so readers can never observe a half-applied record.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Mutex;

use crate::types::{AverageRow, TeamAggregate};

#[derive(Default)]
struct Inner {
    entries: HashMap<String, TeamAggregate>,
    /// Key creation order; the tie-break for equal averages in the report.
    order: Vec<String>,
}

#[derive(Default)]
pub struct AggregateStore {
    inner: Mutex<Inner>,
}

impl AggregateStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one counted match: `count += 1` and the three sums. Creates
    /// the entry on first use.
    pub fn update(&self, team_name: &str, own_corners: u32, opponent_corners: u32) {
        let mut inner = self.inner.lock().expect("aggregate lock poisoned");
        if !inner.entries.contains_key(team_name) {
            inner.order.push(team_name.to_string());
        }
        let entry = inner.entries.entry(team_name.to_string()).or_default();
        entry.count += 1;
        entry.sum_own += own_corners;
        entry.sum_opponent += opponent_corners;
        entry.sum_total += own_corners + opponent_corners;
    }

    /// Snapshot of one team's aggregate, if any.
    pub fn get(&self, team_name: &str) -> Option<TeamAggregate> {
        self.inner
            .lock()
            .expect("aggregate lock poisoned")
            .entries
            .get(team_name)
            .copied()
    }

    /// Averages for every team with at least one counted match, sorted by
    /// `avg_total` descending. The sort is stable over creation order, so
    /// equal averages come out deterministically.
    pub fn materialize_sorted(&self) -> Vec<AverageRow> {
        let inner = self.inner.lock().expect("aggregate lock poisoned");
        let mut rows: Vec<AverageRow> = inner
            .order
            .iter()
            .filter_map(|name| {
                let agg = inner.entries.get(name)?;
                if agg.count == 0 {
                    return None;
                }
                let count = f64::from(agg.count);
                Some(AverageRow {
                    name: name.clone(),
                    avg_total: f64::from(agg.sum_total) / count,
                    avg_own: f64::from(agg.sum_own) / count,
                    avg_opponent: f64::from(agg.sum_opponent) / count,
                })
            })
            .collect();
        rows.sort_by(|a, b| {
            b.avg_total
                .partial_cmp(&a.avg_total)
                .unwrap_or(Ordering::Equal)
        });
        rows
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
