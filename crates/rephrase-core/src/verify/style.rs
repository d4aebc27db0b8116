//! Stylistic consistency: register leakage, voice, and tone balance.

use super::Sample;
use crate::lexicon::Lexicon;
use crate::metrics;
use crate::options::EmotionalTone;
use crate::syntax::is_passive;
use crate::thresholds::{MIN_WORD_SCORE, clamp_score};

/// Mean of formality, voice consistency, and tone consistency.
pub fn consistency(sample: &Sample, lexicon: &Lexicon) -> f64 {
    let formality = formality_leakage(sample, lexicon);
    let voice = voice_consistency(sample);
    let tone = tone_consistency(sample, lexicon);
    clamp_score((formality + voice + tone) / 3.0, MIN_WORD_SCORE)
}

/// One minus informal markers per word; contractions count half.
pub fn formality_leakage(sample: &Sample, lexicon: &Lexicon) -> f64 {
    let words = sample.word_count();
    if words == 0 {
        return 1.0;
    }
    let markers: usize = sample
        .sentences
        .iter()
        .map(|s| lexicon.count_informal_markers(s))
        .sum();
    let contractions = sample
        .all_words()
        .filter(|w| lexicon.is_contraction(w))
        .count();
    let informal = markers as f64 + contractions as f64 * 0.5;
    clamp_score(1.0 - informal / words as f64, MIN_WORD_SCORE)
}

/// Share of adjacent sentence pairs that keep the same voice.
pub fn voice_consistency(sample: &Sample) -> f64 {
    if sample.sentences.len() < 2 {
        return 1.0;
    }
    let voices: Vec<bool> = sample.sentences.iter().map(|s| is_passive(s)).collect();
    let same = voices.windows(2).filter(|pair| pair[0] == pair[1]).count();
    clamp_score(same as f64 / (voices.len() - 1) as f64, MIN_WORD_SCORE)
}

/// One minus the spread of per-sentence positive/negative balance.
pub fn tone_consistency(sample: &Sample, lexicon: &Lexicon) -> f64 {
    let balances: Vec<f64> = sample
        .sentences
        .iter()
        .zip(&sample.words)
        .map(|(sentence, words)| {
            if words.is_empty() {
                return 0.0;
            }
            let positive = lexicon.count_tone_matches(sentence, EmotionalTone::Positive) as f64;
            let negative = lexicon.count_tone_matches(sentence, EmotionalTone::Negative) as f64;
            (positive - negative) / words.len() as f64
        })
        .collect();
    clamp_score(1.0 - metrics::std_dev(&balances), MIN_WORD_SCORE)
}
