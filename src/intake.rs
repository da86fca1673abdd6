//! # Intake
//! Per-submission trust pipeline: hash the raw address, ask the cooldown
//! tracker whether this identity is resubmitting too fast, score the
//! submission, and build the candidate signal for the store.
//!
//! The caller persists the candidate regardless of the spam flag.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use metrics::{counter, gauge};
use serde::Serialize;

use crate::cooldown::CooldownTracker;
use crate::hasher::{anon_hash, token_prefix};
use crate::metrics::ensure_metrics_described;
use crate::scoring::{score, ScoreInput};
use crate::signal::{clip_message, NewSignal};

/// What `Intake::submit` hands back.
#[derive(Debug, Clone)]
pub struct Submission {
    pub verdict: Verdict,
    pub candidate: NewSignal,
}

/// The part of a submission result the outside world sees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Verdict {
    pub confidence: f32,
    pub accepted_as_spam: bool,
}

#[derive(Debug, Clone)]
pub struct Intake {
    cooldown: Arc<CooldownTracker>,
}

impl Intake {
    pub fn new(cooldown: Arc<CooldownTracker>) -> Self {
        Self { cooldown }
    }

    /// Hasher -> cooldown -> scoring, stamped with the current time.
    pub fn submit(
        &self,
        raw_address: &str,
        signal_type: &str,
        context: &str,
        message: Option<&str>,
    ) -> Submission {
        self.submit_at(raw_address, signal_type, context, message, Utc::now())
    }

    /// Same as `submit` with an explicit clock, for tests and replays.
    pub fn submit_at(
        &self,
        raw_address: &str,
        signal_type: &str,
        context: &str,
        message: Option<&str>,
        now: DateTime<Utc>,
    ) -> Submission {
        ensure_metrics_described();

        let identity_token = anon_hash(raw_address);
        let was_too_soon = self.cooldown.check_and_update(&identity_token, now);
        let confidence = score(&ScoreInput {
            identity_token: &identity_token,
            message,
            was_too_soon,
        });

        counter!("signals_submitted_total").increment(1);
        if was_too_soon {
            counter!("signals_spam_total").increment(1);
            tracing::debug!(
                target: "intake",
                id = token_prefix(&identity_token),
                "cooldown fired, down-weighting submission"
            );
        }
        gauge!("cooldown_tracked_identities").set(self.cooldown.len() as f64);

        tracing::info!(
            target: "intake",
            id = token_prefix(&identity_token),
            signal_type,
            context,
            confidence,
            spam = was_too_soon,
            "signal scored"
        );

        let candidate = NewSignal {
            signal_type: signal_type.to_string(),
            context: context.to_string(),
            message: clip_message(message),
            timestamp: now,
            identity_token: Some(identity_token),
            confidence,
        };

        Submission {
            verdict: Verdict {
                confidence,
                accepted_as_spam: was_too_soon,
            },
            candidate,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn intake() -> Intake {
        Intake::new(Arc::new(CooldownTracker::default()))
    }

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 9, 6, 9, 0, 0).unwrap()
    }

    #[test]
    fn double_submit_within_a_second_is_spam() {
        let it = intake();
        let first = it.submit_at("1.2.3.4", "bug", "checkout", Some(""), t0());
        assert_eq!(first.verdict.confidence, 0.5);
        assert!(!first.verdict.accepted_as_spam);

        let second = it.submit_at(
            "1.2.3.4",
            "bug",
            "checkout",
            Some(""),
            t0() + Duration::milliseconds(400),
        );
        assert_eq!(second.verdict.confidence, 0.1);
        assert!(second.verdict.accepted_as_spam);
        assert_eq!(second.candidate.confidence, 0.1);
    }

    #[test]
    fn spaced_submissions_score_by_text() {
        let it = intake();
        it.submit_at("1.2.3.4", "bug", "checkout", None, t0());
        let later = it.submit_at(
            "1.2.3.4",
            "idea",
            "search",
            Some("add filters"),
            t0() + Duration::seconds(10),
        );
        assert!(!later.verdict.accepted_as_spam);
        assert_eq!(later.verdict.confidence, 1.0);
    }

    #[test]
    fn different_addresses_do_not_interfere() {
        let it = intake();
        it.submit_at("1.2.3.4", "bug", "checkout", None, t0());
        let other = it.submit_at("5.6.7.8", "bug", "checkout", None, t0());
        assert!(!other.verdict.accepted_as_spam);
    }

    #[test]
    fn candidate_carries_token_and_clipped_message() {
        let it = intake();
        let long = "x".repeat(120);
        let sub = it.submit_at("1.2.3.4", "bug", "checkout", Some(&long), t0());
        let expected = anon_hash("1.2.3.4");
        assert_eq!(sub.candidate.identity_token.as_deref(), Some(expected.as_str()));
        assert_eq!(sub.candidate.message.as_ref().map(|m| m.len()), Some(50));
        assert_eq!(sub.candidate.timestamp, t0());
    }
}
