// src/cooldown.rs
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use std::collections::HashMap;
use std::sync::Mutex;

pub const DEFAULT_COOLDOWN_SECS: i64 = 10;

/// Per-identity cooldown gate.
/// - First submission from a token is never too soon.
/// - Every call overwrites `last_seen`, including the ones judged too soon.
/// - A single mutex serializes updates, so two racing calls for the same
///   token can never both read the same stale `last_seen`.
///
/// Entries are never evicted; `len()` is exposed so growth can be watched.
#[derive(Debug)]
pub struct CooldownTracker {
    window: ChronoDuration,
    last_seen: Mutex<HashMap<String, DateTime<Utc>>>,
}

impl Default for CooldownTracker {
    fn default() -> Self {
        Self::new(DEFAULT_COOLDOWN_SECS)
    }
}

impl CooldownTracker {
    /// `window_secs` < 0 is treated as 0 (no cooldown).
    pub fn new(window_secs: i64) -> Self {
        Self {
            window: ChronoDuration::seconds(window_secs.max(0)),
            last_seen: Mutex::new(HashMap::new()),
        }
    }

    /// Returns true if `now` is less than the window after the previous
    /// submission from `identity_token`. Records `now` either way.
    pub fn check_and_update(&self, identity_token: &str, now: DateTime<Utc>) -> bool {
        let mut map = self.last_seen.lock().unwrap_or_else(|e| e.into_inner());
        let prev = map.insert(identity_token.to_string(), now);
        match prev {
            None => false,
            Some(last) => now.signed_duration_since(last) < self.window,
        }
    }

    /// Number of identities seen since startup.
    pub fn len(&self) -> usize {
        self.last_seen.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn window_secs(&self) -> i64 {
        self.window.num_seconds()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::sync::Arc;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 9, 6, 9, 0, 0).unwrap()
    }

    #[test]
    fn first_submission_passes() {
        let cd = CooldownTracker::default();
        assert!(!cd.check_and_update("tok", t0()));
        assert_eq!(cd.len(), 1);
    }

    #[test]
    fn inside_window_is_too_soon() {
        let cd = CooldownTracker::default();
        assert!(!cd.check_and_update("tok", t0()));
        assert!(cd.check_and_update("tok", t0() + ChronoDuration::milliseconds(500)));
        assert!(cd.check_and_update("tok", t0() + ChronoDuration::milliseconds(9_900)));
    }

    #[test]
    fn exactly_window_apart_passes() {
        let cd = CooldownTracker::default();
        assert!(!cd.check_and_update("tok", t0()));
        assert!(!cd.check_and_update("tok", t0() + ChronoDuration::seconds(10)));
    }

    #[test]
    fn every_call_resets_the_clock() {
        let cd = CooldownTracker::default();
        assert!(!cd.check_and_update("tok", t0()));
        // 8s later: too soon, but the clock moves to t0+8
        assert!(cd.check_and_update("tok", t0() + ChronoDuration::seconds(8)));
        // 12s after t0 is only 4s after the last call
        assert!(cd.check_and_update("tok", t0() + ChronoDuration::seconds(12)));
        // 10s after the last call passes again
        assert!(!cd.check_and_update("tok", t0() + ChronoDuration::seconds(22)));
    }

    #[test]
    fn tokens_are_independent() {
        let cd = CooldownTracker::default();
        assert!(!cd.check_and_update("a", t0()));
        assert!(!cd.check_and_update("b", t0()));
        assert_eq!(cd.len(), 2);
    }

    #[test]
    fn negative_window_disables_cooldown() {
        let cd = CooldownTracker::new(-5);
        assert_eq!(cd.window_secs(), 0);
        assert!(!cd.check_and_update("tok", t0()));
        assert!(!cd.check_and_update("tok", t0()));
    }

    #[test]
    fn concurrent_same_token_flags_all_but_one() {
        let cd = Arc::new(CooldownTracker::default());
        let now = t0();
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let cd = Arc::clone(&cd);
                std::thread::spawn(move || cd.check_and_update("tok", now))
            })
            .collect();
        let flagged = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|too_soon| *too_soon)
            .count();
        assert_eq!(flagged, 7);
    }
}
