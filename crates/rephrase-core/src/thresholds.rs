//! Score floors shared by every stage.
//!
//! Confidences and sub-scores are clamped to `[floor, 1]` rather than
//! `[0, 1]` so that products of confidences never collapse to zero.

/// Floor for synonym context scores and style sub-scores.
pub const MIN_WORD_SCORE: f64 = 0.7;

/// Floor for whole-text syntax confidence.
pub const MIN_SYNTAX_SCORE: f64 = 0.8;

/// Floor for tone and emotional-coherence scores.
pub const MIN_EMOTIONAL_SCORE: f64 = 0.7;

/// Floor for every recorded change and for the final result confidence.
pub const MIN_CONFIDENCE: f64 = 0.6;

/// Floor for per-sentence syntax confidence.
pub const MIN_SENTENCE_SCORE: f64 = 0.7;

/// Authenticity below this triggers the Markov repair pass.
pub const AUTHENTICITY_REPAIR_THRESHOLD: f64 = 0.85;

/// Sentences whose tone score falls below this are rewritten toward the target tone.
pub const TONE_ADJUST_THRESHOLD: f64 = 0.8;

/// Context preservation enforced on the word pass when a generative rewriter is attached.
pub const GENERATIVE_CONTEXT_FLOOR: f64 = 0.8;

/// Minimum blended similarity a rewrite must keep to its input.
pub const MIN_REWRITE_SIMILARITY: f64 = 0.2;

/// Clamp `value` to `[floor, 1]`, mapping NaN to the floor.
pub fn clamp_score(value: f64, floor: f64) -> f64 {
    if value.is_nan() {
        floor
    } else {
        value.clamp(floor, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamp_respects_floor_and_ceiling() {
        assert_eq!(clamp_score(0.2, MIN_CONFIDENCE), MIN_CONFIDENCE);
        assert_eq!(clamp_score(1.4, MIN_CONFIDENCE), 1.0);
        assert!((clamp_score(0.75, MIN_CONFIDENCE) - 0.75).abs() < f64::EPSILON);
    }

    #[test]
    fn clamp_maps_nan_to_floor() {
        assert_eq!(clamp_score(f64::NAN, MIN_WORD_SCORE), MIN_WORD_SCORE);
        assert_eq!(clamp_score(f64::INFINITY, MIN_WORD_SCORE), 1.0);
    }
}
