//! store.rs — append-only signal storage.
//!
//! The core only needs two things from storage: append one signal, and read
//! signals back filtered by a confidence floor (optionally newest first and
//! capped). `SignalStore` is that seam; `InMemorySignalStore` is the default
//! backend used by the service and the tests.

use std::sync::Mutex;

use crate::signal::{NewSignal, Signal};

/// Floor for "recent activity" views that still show spam-suppressed rows.
pub const RECENT_MIN_CONFIDENCE: f32 = 0.1;
/// Floor for anything that feeds the insight engine.
pub const INSIGHT_MIN_CONFIDENCE: f32 = 0.3;

/// Read filter for `SignalStore::query`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SignalQuery {
    pub min_confidence: f32,
    pub newest_first: bool,
    pub limit: Option<usize>,
}

impl SignalQuery {
    /// Everything at or above `min_confidence`, arrival order, no cap.
    pub fn at_least(min_confidence: f32) -> Self {
        Self {
            min_confidence,
            newest_first: false,
            limit: None,
        }
    }

    /// Recent activity: low floor, newest first, capped.
    pub fn recent(min_confidence: f32, limit: usize) -> Self {
        Self {
            min_confidence,
            newest_first: true,
            limit: Some(limit),
        }
    }

    pub fn newest_first(mut self) -> Self {
        self.newest_first = true;
        self
    }

    pub fn limit(mut self, n: usize) -> Self {
        self.limit = Some(n);
        self
    }
}

pub trait SignalStore: Send + Sync {
    /// Persist a candidate and return the stored record.
    fn append(&self, candidate: NewSignal) -> Signal;

    /// Signals with `confidence >= q.min_confidence`, in arrival order unless
    /// `q.newest_first`, keeping at most `q.limit` of them.
    fn query(&self, q: &SignalQuery) -> Vec<Signal>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Mutex-guarded vector; ids start at 1 and follow arrival order.
#[derive(Debug, Default)]
pub struct InMemorySignalStore {
    inner: Mutex<Vec<Signal>>,
}

impl InMemorySignalStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SignalStore for InMemorySignalStore {
    fn append(&self, candidate: NewSignal) -> Signal {
        let mut v = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        let stored = candidate.into_signal(v.len() as u64 + 1);
        v.push(stored.clone());
        stored
    }

    fn query(&self, q: &SignalQuery) -> Vec<Signal> {
        let v = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        let limit = q.limit.unwrap_or(usize::MAX);
        let keep = |s: &&Signal| s.confidence >= q.min_confidence;
        if q.newest_first {
            v.iter().rev().filter(keep).take(limit).cloned().collect()
        } else {
            v.iter().filter(keep).take(limit).cloned().collect()
        }
    }

    fn len(&self) -> usize {
        self.inner.lock().unwrap_or_else(|e| e.into_inner()).len()
    }
}
