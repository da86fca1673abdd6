//! signal.rs — the persisted signal record and the candidate the intake builds.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Stored message text is capped to this many characters.
pub const MAX_MESSAGE_CHARS: usize = 50;

/// A stored signal. Created once, never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Signal {
    pub id: u64,
    #[serde(rename = "type")]
    pub signal_type: String,
    pub context: String,
    #[serde(default)]
    pub message: Option<String>,
    pub timestamp: DateTime<Utc>,
    /// Never exposed over the API.
    #[serde(skip)]
    pub identity_token: Option<String>,
    pub confidence: f32,
}

/// Signal as handed to the store, before it has an id.
#[derive(Debug, Clone, PartialEq)]
pub struct NewSignal {
    pub signal_type: String,
    pub context: String,
    pub message: Option<String>,
    pub timestamp: DateTime<Utc>,
    pub identity_token: Option<String>,
    pub confidence: f32,
}

impl NewSignal {
    pub fn into_signal(self, id: u64) -> Signal {
        Signal {
            id,
            signal_type: self.signal_type,
            context: self.context,
            message: self.message,
            timestamp: self.timestamp,
            identity_token: self.identity_token,
            confidence: self.confidence.clamp(0.0, 1.0),
        }
    }
}

/// Truncate to `MAX_MESSAGE_CHARS` characters; blank text becomes `None`.
pub fn clip_message(raw: Option<&str>) -> Option<String> {
    let raw = raw?;
    if raw.trim().is_empty() {
        return None;
    }
    Some(raw.chars().take(MAX_MESSAGE_CHARS).collect())
}
