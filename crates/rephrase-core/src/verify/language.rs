//! Language naturalness: sentence variety, vocabulary richness, grammar.

use std::collections::BTreeSet;

use super::Sample;
use crate::dictionaries::verbs;
use crate::metrics;
use crate::tagger::PosTag;
use crate::thresholds::{MIN_SENTENCE_SCORE, MIN_WORD_SCORE, clamp_score};

/// Mean of sentence variety, vocabulary richness, and grammar consistency.
pub fn naturalness(sample: &Sample) -> f64 {
    let variety = clamp_score(
        metrics::coefficient_of_variation(&sample.sentence_lengths()),
        MIN_SENTENCE_SCORE,
    );
    let richness = sample.unique_ratio().min(1.0);
    let grammar = grammar_consistency(sample);
    clamp_score((variety + richness + grammar) / 3.0, MIN_WORD_SCORE)
}

/// Fraction of sentences with a subject followed by a verb.
pub fn grammar_consistency(sample: &Sample) -> f64 {
    if sample.tags.is_empty() {
        return 0.0;
    }
    let valid = sample.tags.iter().filter(|tags| has_subject_and_verb(tags)).count();
    valid as f64 / sample.tags.len() as f64
}

fn has_subject_and_verb(tags: &[PosTag]) -> bool {
    tags.iter()
        .position(|t| matches!(t, PosTag::Noun | PosTag::Pronoun))
        .is_some_and(|subject| tags[subject + 1..].contains(&PosTag::Verb))
}

/// Whether any sentence refers back to the one before it.
///
/// A reference is a shared noun, or a pronoun following a sentence that had a
/// subject.
pub fn has_context_references(sample: &Sample) -> bool {
    (1..sample.sentences.len()).any(|i| {
        let nouns = |idx: usize| -> BTreeSet<&str> {
            sample.words[idx]
                .iter()
                .zip(&sample.tags[idx])
                .filter(|(_, tag)| **tag == PosTag::Noun)
                .map(|(w, _)| w.as_str())
                .collect()
        };
        let shared_noun = !nouns(i).is_disjoint(&nouns(i - 1));
        let pronoun = sample.tags[i].contains(&PosTag::Pronoun);
        shared_noun || (pronoun && has_subject_and_verb(&sample.tags[i - 1]))
    })
}

/// Share of tensed verbs that agree with the dominant tense.
///
/// Zero when the text has no tensed verbs.
pub fn dominant_tense_share(sample: &Sample) -> f64 {
    let mut past = 0usize;
    let mut present = 0usize;
    for (words, tags) in sample.words.iter().zip(&sample.tags) {
        for (word, tag) in words.iter().zip(tags) {
            if *tag != PosTag::Verb {
                continue;
            }
            if verbs::looks_past(word) {
                past += 1;
            } else if !word.ends_with("ing") {
                present += 1;
            }
        }
    }
    let total = past + present;
    if total == 0 {
        return 0.0;
    }
    past.max(present) as f64 / total as f64
}
