//! Confidence scoring for a single submission.
//!
//! Three possible outcomes, no blending:
//! - bare categorical submission  -> `CONFIDENCE_BARE` (0.5)
//! - submission with free text    -> `CONFIDENCE_WITH_TEXT` (1.0)
//! - cooldown fired               -> `CONFIDENCE_SPAM` (0.1), text or not
//!
//! Spam is down-weighted, never rejected.

pub const CONFIDENCE_BARE: f32 = 0.5;
pub const CONFIDENCE_TEXT_BONUS: f32 = 0.5;
pub const CONFIDENCE_WITH_TEXT: f32 = CONFIDENCE_BARE + CONFIDENCE_TEXT_BONUS;
pub const CONFIDENCE_SPAM: f32 = 0.1;

/// Inputs for one scoring call.
#[derive(Clone, Copy, Debug)]
pub struct ScoreInput<'a> {
    pub identity_token: &'a str,
    pub message: Option<&'a str>,
    pub was_too_soon: bool,
}

/// True when the message carries something other than whitespace.
pub fn has_text(message: Option<&str>) -> bool {
    message.is_some_and(|m| !m.trim().is_empty())
}

/// Compute the confidence for a submission. Always in [0.0, 1.0].
pub fn score(input: &ScoreInput<'_>) -> f32 {
    let mut confidence = CONFIDENCE_BARE;
    if has_text(input.message) {
        confidence += CONFIDENCE_TEXT_BONUS;
    }
    // Spam overrides both rules above.
    if input.was_too_soon {
        confidence = CONFIDENCE_SPAM;
    }
    confidence.clamp(0.0, 1.0)
}
