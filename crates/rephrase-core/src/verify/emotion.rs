//! Emotional coherence across sentences.

use super::Sample;
use crate::lexicon::Lexicon;
use crate::metrics;
use crate::options::EmotionalTone;
use crate::thresholds::{MIN_EMOTIONAL_SCORE, clamp_score};

const TONE_SHIFT_WEIGHT: f64 = 0.4;
const INTENSITY_WEIGHT: f64 = 0.3;
const DENSITY_WEIGHT: f64 = 0.3;

/// Emotional signals found in one sentence.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SentenceMood {
    /// Positive pattern or dictionary word present.
    pub positive: bool,
    /// Negative pattern or dictionary word present.
    pub negative: bool,
    /// An intensifying adverb present.
    pub intensified: bool,
    /// A dictionary emotional word present.
    pub emotional: bool,
}

impl SentenceMood {
    fn read(sentence: &str, words: &[String], lexicon: &Lexicon) -> Self {
        let tones: Vec<EmotionalTone> = words
            .iter()
            .filter_map(|w| lexicon.emotional_word(w).map(|e| e.tone))
            .collect();
        Self {
            positive: lexicon.matches_tone(sentence, EmotionalTone::Positive)
                || tones.contains(&EmotionalTone::Positive),
            negative: lexicon.matches_tone(sentence, EmotionalTone::Negative)
                || tones.contains(&EmotionalTone::Negative),
            intensified: words.iter().any(|w| lexicon.is_intensifier(w)),
            emotional: !tones.is_empty(),
        }
    }

    const fn intensity(self) -> f64 {
        (self.intensified as u8 + self.emotional as u8) as f64
    }

    const fn is_charged(self) -> bool {
        self.emotional || self.positive || self.negative
    }
}

/// Mood of each sentence in order.
pub fn moods(sample: &Sample, lexicon: &Lexicon) -> Vec<SentenceMood> {
    sample
        .sentences
        .iter()
        .zip(&sample.words)
        .map(|(sentence, words)| SentenceMood::read(sentence, words, lexicon))
        .collect()
}

/// Weighted blend of tone-shift, intensity-variance, and density scores.
pub fn coherence(sample: &Sample, lexicon: &Lexicon) -> f64 {
    let moods = moods(sample, lexicon);
    if moods.is_empty() {
        return MIN_EMOTIONAL_SCORE;
    }
    let score = TONE_SHIFT_WEIGHT * tone_shift_score(&moods)
        + INTENSITY_WEIGHT * intensity_score(&moods)
        + DENSITY_WEIGHT * density(&moods);
    clamp_score(score, MIN_EMOTIONAL_SCORE)
}

/// One minus abrupt positive/negative flips per sentence.
pub fn tone_shift_score(moods: &[SentenceMood]) -> f64 {
    if moods.is_empty() {
        return 1.0;
    }
    let shifts = moods
        .windows(2)
        .filter(|pair| {
            (pair[0].positive && pair[1].negative) || (pair[0].negative && pair[1].positive)
        })
        .count();
    1.0 - shifts as f64 / moods.len() as f64
}

/// One minus the variance of per-sentence intensity, capped at 1.
pub fn intensity_score(moods: &[SentenceMood]) -> f64 {
    let intensities: Vec<f64> = moods.iter().map(|m| m.intensity()).collect();
    1.0 - metrics::variance(&intensities).min(1.0)
}

/// Share of sentences carrying any emotional signal.
pub fn density(moods: &[SentenceMood]) -> f64 {
    if moods.is_empty() {
        return 0.0;
    }
    moods.iter().filter(|m| m.is_charged()).count() as f64 / moods.len() as f64
}

/// Whether most sentences carry a single, unambiguous emotional direction.
pub fn consistent_emotion(sample: &Sample, lexicon: &Lexicon) -> bool {
    let moods = moods(sample, lexicon);
    if moods.is_empty() {
        return false;
    }
    let steady = moods
        .iter()
        .filter(|m| m.emotional && (m.positive != m.negative))
        .count();
    steady as f64 / moods.len() as f64 > 0.7
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tagger::HeuristicAnalyzer;

    fn sample(text: &str) -> Sample {
        Sample::new(text, &HeuristicAnalyzer::new())
    }

    #[test]
    fn reads_sentence_mood() {
        let lexicon = Lexicon::english();
        let s = sample("This is really awesome.");
        let mood = moods(&s, &lexicon)[0];
        assert!(mood.positive);
        assert!(!mood.negative);
        assert!(mood.intensified);
        assert!(mood.emotional);
    }

    #[test]
    fn flips_are_penalized() {
        let lexicon = Lexicon::english();
        let flipping = moods(&sample("Great work. Awful bug. Good fix. Bad test."), &lexicon);
        assert!((tone_shift_score(&flipping) - 0.25).abs() < 1e-12);
        let steady = moods(&sample("Great work. Good fix. Happy team."), &lexicon);
        assert!((tone_shift_score(&steady) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn flat_text_sits_at_floor() {
        let lexicon = Lexicon::english();
        let s = sample("The meeting is at noon. The room is upstairs.");
        assert!((coherence(&s, &lexicon) - MIN_EMOTIONAL_SCORE).abs() < 1e-12);
    }

    #[test]
    fn steady_positive_text_is_coherent() {
        let lexicon = Lexicon::english();
        let s = sample("Great work. Good fix. Happy team.");
        assert!((coherence(&s, &lexicon) - 1.0).abs() < 1e-12);
        assert!(consistent_emotion(&s, &lexicon));
    }

    #[test]
    fn mixed_sentences_are_not_consistent() {
        let lexicon = Lexicon::english();
        let s = sample("Good news but bad timing. The plan is done.");
        assert!(!consistent_emotion(&s, &lexicon));
    }
}
