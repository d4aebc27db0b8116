//! Markov-chain perturbation.
//!
//! A first-order transition model is built from a text's own whitespace
//! tokens and then used to resample the text in place. Tokens keep their
//! punctuation, the gaps between tokens are copied verbatim, and the number of
//! tokens never changes. The walk starts on the text's first token and ends on
//! its last, so [`perturb_spans`] can resample each sentence on its own and
//! leave every sentence boundary where it was.

use std::collections::{BTreeMap, BTreeSet};
use std::ops::Range;

use rand::Rng;
use rand::distributions::{Distribution, WeightedIndex};

pub use crate::metrics::{EditWeights, normalized_similarity, weighted_edit_distance};
use crate::text;

/// Source token to successor token to probability.
pub type TransitionModel = BTreeMap<String, BTreeMap<String, f64>>;

/// Count observed word-to-word transitions and normalize them per source word.
pub fn markov_transition_model<S: AsRef<str>>(words: &[S]) -> TransitionModel {
    let mut counts: BTreeMap<String, BTreeMap<String, usize>> = BTreeMap::new();
    for pair in words.windows(2) {
        *counts
            .entry(pair[0].as_ref().to_string())
            .or_default()
            .entry(pair[1].as_ref().to_string())
            .or_default() += 1;
    }
    counts
        .into_iter()
        .map(|(source, successors)| {
            let total: usize = successors.values().sum();
            let probabilities = successors
                .into_iter()
                .map(|(next, count)| (next, count as f64 / total as f64))
                .collect();
            (source, probabilities)
        })
        .collect()
}

/// Resample `text` by walking `model` from its first token to its last.
///
/// Each token after the first is drawn from the successors of the token
/// emitted before it, weighted by transition probability. Successors that
/// cannot reach the text's final token in exactly the remaining number of
/// steps are passed over while a live one exists, so with a model built from
/// `text` itself every adjacent output pair is an observed transition and the
/// final token is unchanged. A token whose predecessor has no recorded
/// transitions is kept as it was.
#[tracing::instrument(skip_all, fields(text_len = text.len(), states = model.len()))]
pub fn apply_perturbation<R: Rng + ?Sized>(
    text: &str,
    model: &TransitionModel,
    rng: &mut R,
) -> String {
    let tokens = text::tokens_with_offsets(text);
    if tokens.len() < 2 {
        return text.to_string();
    }
    let last = tokens[tokens.len() - 1].1;
    let reach = reachability(model, last, tokens.len() - 1);

    let mut chosen: Vec<&str> = Vec::with_capacity(tokens.len());
    chosen.push(tokens[0].1);
    for (i, &(_, original)) in tokens.iter().enumerate().skip(1) {
        let previous = chosen[i - 1];
        let remaining = tokens.len() - 1 - i;
        let next = model
            .get(previous)
            .and_then(|successors| sample_successor(successors, &reach, remaining, rng))
            .unwrap_or(original);
        chosen.push(next);
    }

    let mut out = String::with_capacity(text.len());
    let mut cursor = 0;
    for (&(offset, original), replacement) in tokens.iter().zip(&chosen) {
        out.push_str(&text[cursor..offset]);
        out.push_str(replacement);
        cursor = offset + original.len();
    }
    out.push_str(&text[cursor..]);
    out
}

/// Build a model from `text` and resample it.
pub fn perturb<R: Rng + ?Sized>(text: &str, rng: &mut R) -> String {
    let words: Vec<&str> = text.split_whitespace().collect();
    let model = markov_transition_model(&words);
    apply_perturbation(text, &model, rng)
}

/// Resample each span of `text` separately, copying the text between spans.
///
/// Each span gets a model built from its own tokens, so no token moves from
/// one sentence to another.
pub fn perturb_spans<R: Rng + ?Sized>(
    text: &str,
    spans: &[Range<usize>],
    rng: &mut R,
) -> String {
    text::rewrite_spans(text, spans, |_, sentence| {
        let resampled = perturb(sentence, rng);
        (resampled != sentence).then_some(resampled)
    })
}

/// `reach[k]` holds the tokens from which `target` is exactly `k` steps away.
///
/// Computation stops at `max_steps` or at the first empty set.
fn reachability<'m>(
    model: &'m TransitionModel,
    target: &'m str,
    max_steps: usize,
) -> Vec<BTreeSet<&'m str>> {
    let mut reach = vec![BTreeSet::from([target])];
    for _ in 0..max_steps {
        let Some(last) = reach.last() else { break };
        let next: BTreeSet<&str> = model
            .iter()
            .filter(|(_, successors)| successors.keys().any(|s| last.contains(s.as_str())))
            .map(|(source, _)| source.as_str())
            .collect();
        if next.is_empty() {
            break;
        }
        reach.push(next);
    }
    reach
}

fn sample_successor<'m, R: Rng + ?Sized>(
    successors: &'m BTreeMap<String, f64>,
    reach: &[BTreeSet<&str>],
    remaining: usize,
    rng: &mut R,
) -> Option<&'m str> {
    let mut options: Vec<(&str, f64)> = match reach.get(remaining) {
        Some(live) => successors
            .iter()
            .filter(|(word, _)| live.contains(word.as_str()))
            .map(|(word, p)| (word.as_str(), *p))
            .collect(),
        None => Vec::new(),
    };
    if options.is_empty() {
        options = successors.iter().map(|(w, p)| (w.as_str(), *p)).collect();
    }
    let weights = WeightedIndex::new(options.iter().map(|(_, p)| *p)).ok()?;
    Some(options[weights.sample(rng)].0)
}
