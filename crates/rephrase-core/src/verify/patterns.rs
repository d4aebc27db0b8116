//! Pattern variation: repetition, structural diversity, transitions.

use std::collections::{BTreeSet, HashMap};

use super::Sample;
use crate::lexicon::Lexicon;
use crate::tagger::PosTag;
use crate::thresholds::{MIN_WORD_SCORE, clamp_score};

/// Mean of the repetition, structure, and transition scores.
pub fn variation(sample: &Sample, lexicon: &Lexicon) -> f64 {
    let repetition = repetition_score(sample);
    let structure = structural_diversity(sample);
    let transitions = transition_sentence_share(sample, lexicon).min(1.0);
    clamp_score((repetition + structure + transitions) / 3.0, MIN_WORD_SCORE)
}

/// One minus the number of words seen more than twice, per word.
pub fn repetition_score(sample: &Sample) -> f64 {
    let total = sample.word_count();
    if total == 0 {
        return 1.0;
    }
    let mut frequency: HashMap<&str, usize> = HashMap::new();
    for word in sample.all_words() {
        *frequency.entry(word).or_default() += 1;
    }
    let repeated = frequency.values().filter(|&&count| count > 2).count();
    clamp_score(1.0 - repeated as f64 / total as f64, MIN_WORD_SCORE)
}

/// Distinct tag sequences over sentence count.
pub fn structural_diversity(sample: &Sample) -> f64 {
    if sample.tags.is_empty() {
        return 0.0;
    }
    let unique: BTreeSet<&[PosTag]> = sample.tags.iter().map(Vec::as_slice).collect();
    (unique.len() as f64 / sample.tags.len() as f64).min(1.0)
}

/// Share of sentences containing a transition word.
pub fn transition_sentence_share(sample: &Sample, lexicon: &Lexicon) -> f64 {
    if sample.words.is_empty() {
        return 0.0;
    }
    let with_transition = sample
        .words
        .iter()
        .filter(|words| words.iter().any(|w| lexicon.is_transition_word(w)))
        .count();
    with_transition as f64 / sample.words.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tagger::HeuristicAnalyzer;

    fn sample(text: &str) -> Sample {
        Sample::new(text, &HeuristicAnalyzer::new())
    }

    #[test]
    fn heavy_repetition_hits_floor() {
        let s = sample("go go go go go go go go go go stop stop stop");
        // Two words above the threshold out of thirteen
        let expected = 1.0 - 2.0 / 13.0;
        assert!((repetition_score(&s) - expected).abs() < 1e-12);
        let s = sample("no no no");
        assert!((repetition_score(&s) - MIN_WORD_SCORE).abs() < 1e-12);
    }

    #[test]
    fn identical_structures_count_once() {
        let same = sample("The cat sat. The dog sat. The owl sat.");
        assert!((structural_diversity(&same) - 1.0 / 3.0).abs() < 1e-12);
        let varied = sample("The cat sat. Dogs bark loudly at night. Why?");
        assert!((structural_diversity(&varied) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn transitions_are_counted_per_sentence() {
        let lexicon = Lexicon::english();
        let s = sample("It rained. However, we went out. Moreover, however, it was cold. Fine.");
        assert!((transition_sentence_share(&s, &lexicon) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn variation_is_floored() {
        let lexicon = Lexicon::english();
        let s = sample("It is. It is. It is.");
        assert!((variation(&s, &lexicon) - MIN_WORD_SCORE).abs() < 1e-12);
    }
}
