//! Synonym ranking and selection.
//!
//! Ranking scores every candidate against the requested style; selection
//! applies variety pressure from the [`UsedSynonymLedger`] and then indexes
//! into the ranked list by creativity. Selection is deterministic: the same
//! candidates, options, and ledger always pick the same word.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use crate::error::{TransformError, TransformResult};
use crate::lexicon::Lexicon;
use crate::options::TransformationOptions;
use crate::thresholds::MIN_WORD_SCORE;
use crate::tone::ToneAnalyzer;
use crate::types::{RankedSynonym, SynonymCandidate, WordContext};

/// Replacements already chosen in one transform call, keyed by source word.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UsedSynonymLedger {
    used: BTreeMap<String, BTreeSet<String>>,
}

impl UsedSynonymLedger {
    /// An empty ledger.
    pub const fn new() -> Self {
        Self {
            used: BTreeMap::new(),
        }
    }

    /// Note that `replacement` was chosen for `original`.
    pub fn record(&mut self, original: &str, replacement: &str) {
        self.used
            .entry(original.to_lowercase())
            .or_default()
            .insert(replacement.to_lowercase());
    }

    /// Replacements already chosen for `original`.
    pub fn used_for(&self, original: &str) -> Option<&BTreeSet<String>> {
        self.used.get(&original.to_lowercase())
    }

    /// How many source words `word` has already replaced.
    pub fn times_used(&self, word: &str) -> usize {
        let word = word.to_lowercase();
        self.used.values().filter(|set| set.contains(&word)).count()
    }

    /// Number of source words recorded.
    pub fn len(&self) -> usize {
        self.used.len()
    }

    /// Whether nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.used.is_empty()
    }
}

/// Scores candidates and picks one.
#[derive(Debug, Clone)]
pub struct SynonymRanker {
    lexicon: Arc<Lexicon>,
    tone: ToneAnalyzer,
}

impl SynonymRanker {
    /// Ranker over the given tables.
    pub fn new(lexicon: Arc<Lexicon>) -> Self {
        let tone = ToneAnalyzer::new(Arc::clone(&lexicon));
        Self { lexicon, tone }
    }

    /// Score `candidates` for `context`, drop those at or below the word floor,
    /// and sort best first.
    ///
    /// `contextScore = 0.3·tone + 0.3·formality + 0.4·(contextPreservationScore · contextPreservation)`.
    pub fn rank_synonyms(
        &self,
        candidates: &[SynonymCandidate],
        context: &WordContext,
        options: &TransformationOptions,
    ) -> TransformResult<Vec<RankedSynonym>> {
        let mut ranked = Vec::with_capacity(candidates.len());
        for candidate in candidates {
            let tone_score =
                self.tone
                    .analyze_synonym(&candidate.word, options.emotional_tone, Some(&context.word));
            let formality_score = if self
                .lexicon
                .matches_formality(&candidate.word, options.formality)
            {
                1.2
            } else {
                0.8
            };
            let preservation = candidate
                .context_preservation_score
                .unwrap_or_else(|| fallback_preservation(candidate, context));
            let context_score = 0.3 * tone_score
                + 0.3 * formality_score
                + 0.4 * preservation * options.context_preservation;

            if !context_score.is_finite() {
                return Err(TransformError::NonFiniteScore {
                    word: context.word.clone(),
                });
            }
            if context_score > MIN_WORD_SCORE {
                ranked.push(RankedSynonym {
                    candidate: candidate.clone(),
                    context_score,
                });
            }
        }
        sort_descending(&mut ranked);
        Ok(ranked)
    }

    /// Pick one of `ranked` as the replacement for `original` and record it.
    ///
    /// Returns `None` only when `ranked` is empty; callers check first.
    pub fn select_best_synonym(
        &self,
        ranked: &[RankedSynonym],
        original: &str,
        options: &TransformationOptions,
        ledger: &mut UsedSynonymLedger,
    ) -> Option<RankedSynonym> {
        debug_assert!(!ranked.is_empty(), "selection needs at least one candidate");
        if ranked.is_empty() {
            return None;
        }

        let mut pool = variety_adjusted(ranked, options, ledger);
        if options.variety_level > 0.3
            && let Some(used) = ledger.used_for(original)
        {
            let fresh: Vec<RankedSynonym> = pool
                .iter()
                .filter(|r| !used.contains(&r.word().to_lowercase()))
                .cloned()
                .collect();
            if !fresh.is_empty() {
                pool = fresh;
            }
        }

        let index = ((options.creativity * pool.len() as f64).floor() as usize).min(pool.len() - 1);
        let word = pool[index].word().to_string();
        ledger.record(original, &word);

        ranked.iter().find(|r| r.word() == word).cloned()
    }
}

/// 1 without neighbors; otherwise 1.2 when a candidate tag matches the word's tag, else 0.8.
fn fallback_preservation(candidate: &SynonymCandidate, context: &WordContext) -> f64 {
    if !context.has_neighbors() {
        return 1.0;
    }
    if candidate.has_tag(context.part_of_speech) {
        1.2
    } else {
        0.8
    }
}

fn variety_adjusted(
    ranked: &[RankedSynonym],
    options: &TransformationOptions,
    ledger: &UsedSynonymLedger,
) -> Vec<RankedSynonym> {
    let variety = options.variety_level;
    if variety <= 0.3 {
        let mut top = ranked.to_vec();
        sort_descending(&mut top);
        top.truncate(3);
        return top;
    }

    let penalty = (1.0 - variety).max(0.5);
    let mut adjusted: Vec<RankedSynonym> = ranked
        .iter()
        .map(|r| {
            let times = ledger.times_used(r.word());
            let mut score = r.context_score;
            for _ in 0..times {
                score *= penalty;
            }
            if variety > 0.7 && times == 0 {
                score *= 1.2;
            }
            RankedSynonym {
                candidate: r.candidate.clone(),
                context_score: score.max(MIN_WORD_SCORE),
            }
        })
        .collect();
    sort_descending(&mut adjusted);

    let keep = ((ranked.len() as f64 * variety * options.creativity).ceil() as usize).max(3);
    adjusted.truncate(keep);
    adjusted
}

fn sort_descending(ranked: &mut [RankedSynonym]) {
    ranked.sort_by(|a, b| b.context_score.total_cmp(&a.context_score));
}
