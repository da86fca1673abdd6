//! # Insight Engine
//! Pure, rule-based summaries over stored signals. No I/O, no filtering:
//! callers pass signals already above the quality floor, oldest first.
//!
//! Findings, in this order:
//! 1. empty input -> a single "not enough data" finding, nothing else
//! 2. top issue by summed confidence per `signal_type`
//! 3. hotspot: most frequent `context` (unweighted)
//! 4. pattern: within the most recent `pattern_window` signals, a type that
//!    repeats at least `pattern_min_repeats` times (only once the input holds
//!    `pattern_min_total` signals)
//!
//! Ties always go to the key encountered first while scanning.

use std::collections::HashMap;

use serde::Deserialize;

use crate::signal::Signal;

pub const NO_DATA_INSIGHT: &str = "No sufficient data yet. Start submitting signals!";

/// Thresholds for the short-term pattern rule.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct InsightParams {
    /// Minimum total input size before pattern detection runs.
    pub pattern_min_total: usize,
    /// Number of most recent signals inspected.
    pub pattern_window: usize,
    /// Occurrences of the window's most frequent type needed to report it.
    pub pattern_min_repeats: usize,
}

impl Default for InsightParams {
    fn default() -> Self {
        Self {
            pattern_min_total: 5,
            pattern_window: 10,
            pattern_min_repeats: 3,
        }
    }
}

/// Generate findings with default pattern thresholds.
pub fn generate_insights(signals: &[Signal]) -> Vec<String> {
    generate_insights_with(signals, &InsightParams::default())
}

pub fn generate_insights_with(signals: &[Signal], params: &InsightParams) -> Vec<String> {
    if signals.is_empty() {
        return vec![NO_DATA_INSIGHT.to_string()];
    }

    let mut out = Vec::with_capacity(3);

    let weighted = fold_by_key(signals, |s| &s.signal_type, |s| s.confidence as f64);
    if let Some((kind, total)) = first_max(&weighted) {
        out.push(format!(
            "Top Pain Point: '{}' carries the highest weighted score ({:.1}).",
            kind, total
        ));
    }

    let contexts = fold_by_key(signals, |s| &s.context, |_| 1usize);
    if let Some((context, _)) = first_max(&contexts) {
        out.push(format!(
            "Hotspot Alert: The '{}' area is receiving the highest volume of feedback.",
            context
        ));
    }

    if let Some((kind, n, window)) = detect_pattern(signals, params) {
        out.push(format!(
            "Pattern Detected: '{}' appeared {} times in the last {} signals.",
            kind, n, window
        ));
    }

    tracing::debug!(
        target: "insights",
        input = signals.len(),
        findings = out.len(),
        "insights generated"
    );
    out
}

/// Most frequent type in the tail window, if it repeats often enough.
/// Returns `(type, occurrences, window_len)`.
fn detect_pattern<'a>(
    signals: &'a [Signal],
    params: &InsightParams,
) -> Option<(&'a str, usize, usize)> {
    if signals.len() < params.pattern_min_total {
        return None;
    }
    let start = signals.len().saturating_sub(params.pattern_window);
    let tail = &signals[start..];
    let counts = fold_by_key(tail, |s| &s.signal_type, |_| 1usize);
    let (kind, n) = first_max(&counts)?;
    (n >= params.pattern_min_repeats).then_some((kind, n, tail.len()))
}

/// Accumulate `value(s)` per `key(s)`, keeping keys in first-seen order.
fn fold_by_key<'a, V, K, F>(signals: &'a [Signal], key: K, value: F) -> Vec<(&'a str, V)>
where
    V: Copy + std::ops::AddAssign,
    K: Fn(&'a Signal) -> &'a String,
    F: Fn(&Signal) -> V,
{
    let mut index: HashMap<&'a str, usize> = HashMap::new();
    let mut acc: Vec<(&'a str, V)> = Vec::new();
    for s in signals {
        let k = key(s).as_str();
        let v = value(s);
        match index.get(k) {
            Some(&i) => acc[i].1 += v,
            None => {
                index.insert(k, acc.len());
                acc.push((k, v));
            }
        }
    }
    acc
}

/// Largest accumulator; on a tie the earlier entry wins.
fn first_max<'a, V>(acc: &[(&'a str, V)]) -> Option<(&'a str, V)>
where
    V: Copy + PartialOrd,
{
    let mut best: Option<(&'a str, V)> = None;
    for &(k, v) in acc {
        match best {
            Some((_, b)) if v <= b => {}
            _ => best = Some((k, v)),
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    fn sig(id: u64, kind: &str, context: &str, confidence: f32) -> Signal {
        Signal {
            id,
            signal_type: kind.to_string(),
            context: context.to_string(),
            message: None,
            timestamp: Utc.with_ymd_and_hms(2025, 9, 6, 9, 0, 0).unwrap()
                + Duration::seconds(id as i64),
            identity_token: None,
            confidence,
        }
    }

    fn seq(items: &[(&str, &str, f32)]) -> Vec<Signal> {
        items
            .iter()
            .enumerate()
            .map(|(i, (k, c, conf))| sig(i as u64 + 1, k, c, *conf))
            .collect()
    }

    #[test]
    fn empty_input_yields_single_finding() {
        let out = generate_insights(&[]);
        assert_eq!(out, vec![NO_DATA_INSIGHT.to_string()]);
    }

    #[test]
    fn top_issue_uses_summed_confidence() {
        let signals = seq(&[
            ("A", "home", 0.5),
            ("A", "home", 0.5),
            ("A", "home", 0.5),
            ("B", "home", 1.0),
        ]);
        let out = generate_insights(&signals);
        assert_eq!(out.len(), 2);
        assert!(out[0].contains("'A'"), "{}", out[0]);
        assert!(out[0].contains("(1.5)"), "{}", out[0]);
    }

    #[test]
    fn weight_beats_raw_count() {
        // B has fewer rows but more total confidence.
        let signals = seq(&[("A", "x", 0.5), ("A", "x", 0.5), ("B", "x", 1.0), ("B", "x", 1.0)]);
        let out = generate_insights(&signals);
        assert!(out[0].contains("'B'"), "{}", out[0]);
        assert!(out[0].contains("(2.0)"), "{}", out[0]);
    }

    #[test]
    fn weighted_tie_goes_to_first_seen() {
        let signals = seq(&[("A", "x", 0.5), ("A", "x", 0.5), ("B", "x", 1.0)]);
        assert!(generate_insights(&signals)[0].contains("'A'"));

        let flipped = seq(&[("B", "x", 1.0), ("A", "x", 0.5), ("A", "x", 0.5)]);
        assert!(generate_insights(&flipped)[0].contains("'B'"));
    }

    #[test]
    fn hotspot_counts_rows_not_weight() {
        let signals = seq(&[
            ("A", "search", 1.0),
            ("A", "checkout", 0.5),
            ("A", "checkout", 0.5),
        ]);
        let out = generate_insights(&signals);
        assert!(out[1].contains("'checkout'"), "{}", out[1]);
    }

    #[test]
    fn hotspot_tie_goes_to_first_seen() {
        let signals = seq(&[("A", "search", 1.0), ("A", "checkout", 1.0)]);
        let out = generate_insights(&signals);
        assert!(out[1].contains("'search'"), "{}", out[1]);
    }

    #[test]
    fn pattern_found_with_three_repeats_in_five() {
        let signals = seq(&[
            ("X", "a", 0.5),
            ("Y", "a", 0.5),
            ("X", "b", 0.5),
            ("Z", "c", 0.5),
            ("X", "d", 0.5),
        ]);
        let out = generate_insights(&signals);
        assert_eq!(out.len(), 3);
        assert!(out[2].starts_with("Pattern Detected: 'X'"), "{}", out[2]);
    }

    #[test]
    fn no_pattern_with_only_two_repeats() {
        let signals = seq(&[
            ("X", "a", 0.5),
            ("Y", "a", 0.5),
            ("X", "b", 0.5),
            ("Z", "c", 0.5),
            ("W", "d", 0.5),
        ]);
        assert_eq!(generate_insights(&signals).len(), 2);
    }

    #[test]
    fn no_pattern_below_minimum_total() {
        let signals = seq(&[("X", "a", 0.5), ("X", "a", 0.5), ("X", "a", 0.5), ("X", "a", 0.5)]);
        assert_eq!(generate_insights(&signals).len(), 2);
    }

    #[test]
    fn pattern_only_looks_at_tail_window() {
        // Y dominates the full history, but the last 10 hold Y only twice
        // and X three times.
        let mut items: Vec<(&str, &str, f32)> = vec![("Y", "a", 1.0); 8];
        items.extend([
            ("X", "a", 0.5),
            ("Y", "a", 0.5),
            ("Z", "a", 0.5),
            ("X", "a", 0.5),
            ("W", "a", 0.5),
            ("V", "a", 0.5),
            ("Y", "a", 0.5),
            ("U", "a", 0.5),
            ("T", "a", 0.5),
            ("X", "a", 0.5),
        ]);
        let out = generate_insights(&seq(&items));
        assert!(out[0].contains("'Y'"));
        assert_eq!(out.len(), 3);
        assert!(out[2].contains("'X'"), "{}", out[2]);
        assert!(out[2].contains("last 10 signals"), "{}", out[2]);
    }

    #[test]
    fn custom_params_are_respected() {
        let params = InsightParams {
            pattern_min_total: 2,
            pattern_window: 3,
            pattern_min_repeats: 2,
        };
        let signals = seq(&[("A", "a", 0.5), ("B", "a", 0.5), ("B", "a", 0.5)]);
        let out = generate_insights_with(&signals, &params);
        assert_eq!(out.len(), 3);
        assert!(out[2].contains("'B'"));
    }
}
