//! stats.rs — the dashboard view assembled from the store.
//!
//! Two floors: a low one for the recent-activity list (spam-suppressed rows
//! still show up there) and a higher one for anything that feeds the insight
//! engine.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::config::AppConfig;
use crate::insights::generate_insights_with;
use crate::signal::Signal;
use crate::store::{SignalQuery, SignalStore};

#[derive(Debug, Clone, Serialize)]
pub struct StatsSnapshot {
    pub recent_signals: Vec<Signal>,
    pub type_counts: BTreeMap<String, usize>,
    pub context_counts: BTreeMap<String, usize>,
    pub insights: Vec<String>,
}

/// Count rows per key. Plain tabulation for charts.
pub fn tally<'a, I, F>(signals: I, key: F) -> BTreeMap<String, usize>
where
    I: IntoIterator<Item = &'a Signal>,
    F: Fn(&'a Signal) -> &'a str,
{
    let mut out = BTreeMap::new();
    for s in signals {
        *out.entry(key(s).to_string()).or_insert(0) += 1;
    }
    out
}

/// Insight input: the most recent `insight_history_limit` signals at or
/// above the insight floor, returned oldest first.
pub fn insight_input(store: &dyn SignalStore, cfg: &AppConfig) -> Vec<Signal> {
    let mut rows = store.query(
        &SignalQuery::at_least(cfg.thresholds.insight_min_confidence)
            .newest_first()
            .limit(cfg.stats.insight_history_limit),
    );
    rows.reverse();
    rows
}

pub fn insights(store: &dyn SignalStore, cfg: &AppConfig) -> Vec<String> {
    generate_insights_with(&insight_input(store, cfg), &cfg.insights)
}

/// Everything is derived from one read of the store, so the recent list,
/// the tallies and the insights in a response agree with each other.
pub fn build_stats(store: &dyn SignalStore, cfg: &AppConfig) -> StatsSnapshot {
    let all = store.query(&SignalQuery::at_least(0.0));

    let recent_signals: Vec<Signal> = all
        .iter()
        .rev()
        .filter(|s| s.confidence >= cfg.thresholds.recent_min_confidence)
        .take(cfg.stats.recent_limit)
        .cloned()
        .collect();

    let type_counts = tally(&all, |s| s.signal_type.as_str());
    let context_counts = tally(&all, |s| s.context.as_str());

    let mut insight_rows: Vec<Signal> = all
        .iter()
        .rev()
        .filter(|s| s.confidence >= cfg.thresholds.insight_min_confidence)
        .take(cfg.stats.insight_history_limit)
        .cloned()
        .collect();
    insight_rows.reverse();

    StatsSnapshot {
        recent_signals,
        type_counts,
        context_counts,
        insights: generate_insights_with(&insight_rows, &cfg.insights),
    }
}
