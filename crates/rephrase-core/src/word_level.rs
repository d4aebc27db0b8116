//! Word-level synonym substitution.
//!
//! Walks each sentence left to right, builds a [`WordContext`] per word, and
//! asks the synonym collaborator for candidates. Candidates are scored for
//! context fit, ranked, and one is selected under variety pressure from a
//! ledger that lives for exactly one call. Any failure while handling a word
//! leaves that word untouched.

use std::sync::Arc;

use crate::dictionaries::verbs;
use crate::error::TransformResult;
use crate::lexicon::Lexicon;
use crate::options::TransformationOptions;
use crate::provider::SynonymProvider;
use crate::ranking::{SynonymRanker, UsedSynonymLedger};
use crate::tagger::{LanguageAnalyzer, PosTag};
use crate::text::{self, TokenParts};
use crate::thresholds::{MIN_CONFIDENCE, clamp_score};
use crate::types::{
    ChangeKind, RankedSynonym, StageOutput, SynonymCandidate, TransformationChange, WordContext,
};

/// Weights for the (base, grammar, semantic) context sub-scores.
fn context_weights(context_preservation: f64) -> (f64, f64, f64) {
    if context_preservation >= 0.8 {
        (0.2, 0.4, 0.4)
    } else if context_preservation >= 0.5 {
        (0.3, 0.4, 0.3)
    } else {
        (0.4, 0.3, 0.3)
    }
}

const MODALS_AND_TO: &[&str] = &[
    "to", "will", "would", "shall", "should", "can", "could", "may", "might", "must",
];

/// Synonym substitution stage.
pub struct WordLevelTransformer {
    provider: Arc<dyn SynonymProvider>,
    analyzer: Arc<dyn LanguageAnalyzer>,
    lexicon: Arc<Lexicon>,
    ranker: SynonymRanker,
}

impl std::fmt::Debug for WordLevelTransformer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WordLevelTransformer")
            .field("ranker", &self.ranker)
            .finish_non_exhaustive()
    }
}

impl WordLevelTransformer {
    /// Stage wired to the given collaborators and tables.
    pub fn new(
        provider: Arc<dyn SynonymProvider>,
        analyzer: Arc<dyn LanguageAnalyzer>,
        lexicon: Arc<Lexicon>,
    ) -> Self {
        let ranker = SynonymRanker::new(Arc::clone(&lexicon));
        Self {
            provider,
            analyzer,
            lexicon,
            ranker,
        }
    }

    /// Substitute words throughout `text`.
    pub fn transform(
        &self,
        text: &str,
        options: &TransformationOptions,
    ) -> TransformResult<StageOutput> {
        self.run(text, options, None)
    }

    /// Like [`transform`](Self::transform), but only applies substitutions
    /// whose confidence exceeds `min_confidence`.
    pub fn transform_with_floor(
        &self,
        text: &str,
        options: &TransformationOptions,
        min_confidence: f64,
    ) -> TransformResult<StageOutput> {
        self.run(text, options, Some(min_confidence))
    }

    #[tracing::instrument(name = "word_level", skip_all, fields(text_len = text.len()))]
    fn run(
        &self,
        text: &str,
        options: &TransformationOptions,
        min_confidence: Option<f64>,
    ) -> TransformResult<StageOutput> {
        options.validate()?;

        let spans = self.analyzer.sentence_spans(text);
        let mut ledger = UsedSynonymLedger::new();
        let mut changes = Vec::new();

        let rewritten = text::rewrite_spans(text, &spans, |_, sentence| {
            self.rewrite_sentence(sentence, options, min_confidence, &mut ledger, &mut changes)
        });

        tracing::debug!(changes = changes.len(), "word-level pass complete");
        Ok(StageOutput {
            text: rewritten,
            changes,
        })
    }

    fn rewrite_sentence(
        &self,
        sentence: &str,
        options: &TransformationOptions,
        min_confidence: Option<f64>,
        ledger: &mut UsedSynonymLedger,
        changes: &mut Vec<TransformationChange>,
    ) -> Option<String> {
        let tokens = text::tokens_with_offsets(sentence);
        let parts: Vec<TokenParts<'_>> = tokens.iter().map(|(_, t)| text::split_token(t)).collect();
        let cores: Vec<&str> = parts.iter().map(|p| p.core).collect();
        let tags = self.analyzer.tag_words(&cores);

        let mut replacements: Vec<Option<String>> = vec![None; tokens.len()];
        for (i, part) in parts.iter().enumerate() {
            if self.should_skip(part.core, options) {
                continue;
            }
            let neighbor = |j: Option<usize>| {
                j.and_then(|j| cores.get(j))
                    .filter(|w| !w.is_empty())
                    .map(|w| (*w).to_string())
            };
            let context = WordContext {
                word: part.core.to_string(),
                previous_word: neighbor(i.checked_sub(1)),
                next_word: neighbor(Some(i + 1)),
                part_of_speech: tags.get(i).copied().unwrap_or_default(),
                is_important_term: self.lexicon.is_important_term(part.core),
            };

            let Some((chosen, confidence)) = self.substitute(&context, options, ledger) else {
                continue;
            };
            if min_confidence.is_some_and(|floor| confidence <= floor) {
                continue;
            }
            let replacement = text::match_case(part.core, chosen.word());
            changes.push(TransformationChange::new(
                part.core,
                replacement.clone(),
                ChangeKind::Word,
                confidence,
            ));
            replacements[i] = Some(part.with_core(&replacement));
        }

        if replacements.iter().all(Option::is_none) {
            return None;
        }
        Some(splice_tokens(sentence, &tokens, &replacements))
    }

    /// Stoplisted, short, numeric, punctuation-laden, or protected by intent.
    fn should_skip(&self, core: &str, options: &TransformationOptions) -> bool {
        if core.chars().count() < 3 || self.lexicon.is_stopword(core) {
            return true;
        }
        if core.chars().all(|c| c.is_numeric() || c == '.' || c == ',') {
            return true;
        }
        let laden = core
            .chars()
            .any(|c| !(c.is_alphabetic() || matches!(c, '-' | '\'' | '\u{2019}')));
        if laden {
            return true;
        }
        options.preserve_intent
            && (self.lexicon.is_important_term(core) || self.lexicon.is_intent_critical(core))
    }

    /// Pick a replacement for one word; `None` keeps the word.
    fn substitute(
        &self,
        context: &WordContext,
        options: &TransformationOptions,
        ledger: &mut UsedSynonymLedger,
    ) -> Option<(RankedSynonym, f64)> {
        let candidates = match self.provider.synonyms(&context.word) {
            Ok(candidates) => candidates,
            Err(e) => {
                tracing::warn!(word = %context.word, error = %e, "synonym lookup failed, keeping word");
                return None;
            }
        };
        if candidates.is_empty() {
            return None;
        }

        let scored: Vec<SynonymCandidate> = candidates
            .into_iter()
            .map(|mut candidate| {
                let score = self.context_preservation(&candidate, context, options);
                candidate.context_preservation_score = Some(score);
                candidate
            })
            .collect();

        let ranked = match self.ranker.rank_synonyms(&scored, context, options) {
            Ok(ranked) => ranked,
            Err(e) => {
                tracing::warn!(word = %context.word, error = %e, "ranking failed, keeping word");
                return None;
            }
        };
        if ranked.is_empty() {
            return None;
        }

        let chosen = self
            .ranker
            .select_best_synonym(&ranked, &context.word, options, ledger)?;
        if chosen.word().eq_ignore_ascii_case(&context.word) {
            return None;
        }
        let confidence = self.substitution_confidence(&chosen, context);
        Some((chosen, confidence))
    }

    /// Weighted blend of part-of-speech/collocation fit, grammatical fit, and
    /// tense/number agreement.
    fn context_preservation(
        &self,
        candidate: &SynonymCandidate,
        context: &WordContext,
        options: &TransformationOptions,
    ) -> f64 {
        let (w_base, w_grammar, w_semantic) = context_weights(options.context_preservation);
        let base = self.base_fit(candidate, context);
        let grammar = self.grammar_fit(candidate, context);
        let semantic = agreement(&candidate.word, &context.word);
        let score = w_base * base + w_grammar * grammar + w_semantic * semantic;
        if score.is_finite() {
            score.clamp(0.5, 1.2)
        } else {
            score
        }
    }

    fn base_fit(&self, candidate: &SynonymCandidate, context: &WordContext) -> f64 {
        let pos = if candidate.grammatical_tags.is_empty() || !context.part_of_speech.is_known() {
            1.0
        } else if candidate.has_tag(context.part_of_speech) {
            1.2
        } else {
            0.8
        };
        let collocated = context
            .previous_word
            .as_deref()
            .is_some_and(|prev| self.lexicon.is_collocation(prev, &candidate.word))
            || context
                .next_word
                .as_deref()
                .is_some_and(|next| self.lexicon.is_collocation(&candidate.word, next));
        if collocated { pos * 1.2 } else { pos }
    }

    /// What the previous word expects to follow it.
    fn grammar_fit(&self, candidate: &SynonymCandidate, context: &WordContext) -> f64 {
        let Some(previous) = context.previous_word.as_deref() else {
            return 1.0;
        };
        if candidate.grammatical_tags.is_empty() {
            return 1.0;
        }
        let lower = previous.to_lowercase();
        let expected: &[PosTag] = if MODALS_AND_TO.contains(&lower.as_str()) {
            &[PosTag::Verb]
        } else {
            match self.analyzer.tag(previous) {
                PosTag::Determiner => &[PosTag::Noun, PosTag::Adjective],
                PosTag::Preposition => &[PosTag::Noun, PosTag::Pronoun, PosTag::Adjective],
                _ => return 1.0,
            }
        };
        if expected.iter().any(|tag| candidate.has_tag(*tag)) {
            1.2
        } else {
            0.9
        }
    }

    fn substitution_confidence(&self, chosen: &RankedSynonym, context: &WordContext) -> f64 {
        let pos = if chosen.candidate.has_tag(context.part_of_speech) {
            1.2
        } else {
            0.8
        };
        let neighbors: f64 = [&context.previous_word, &context.next_word]
            .into_iter()
            .flatten()
            .map(|w| self.neighbor_multiplier(w))
            .product();
        let important = if context.is_important_term { 0.8 } else { 1.0 };
        let phrase = if self.lexicon.in_fixed_phrase(
            context.previous_word.as_deref(),
            &context.word,
            context.next_word.as_deref(),
        ) {
            0.7
        } else {
            1.0
        };
        clamp_score(
            chosen.context_score * pos * neighbors * important * phrase,
            MIN_CONFIDENCE,
        )
    }

    /// Neighbors that anchor structure make a substitution riskier.
    fn neighbor_multiplier(&self, word: &str) -> f64 {
        if self.lexicon.is_important_term(word) {
            return 0.9;
        }
        match self.analyzer.tag(word) {
            PosTag::Preposition | PosTag::Determiner => 0.95,
            _ => 1.0,
        }
    }
}

/// Number and tense agreement between a candidate and the word it replaces.
fn agreement(candidate: &str, original: &str) -> f64 {
    let plural = |w: &str| {
        let lower = w.to_lowercase();
        lower.len() > 3 && lower.ends_with('s') && !lower.ends_with("ss") && !lower.ends_with("us")
    };
    let past = |w: &str| verbs::looks_past(w);
    let gerund = |w: &str| w.len() > 5 && w.to_lowercase().ends_with("ing");

    let mut score = 1.0;
    if plural(candidate) != plural(original) {
        score *= 0.8;
    }
    if past(candidate) != past(original) {
        score *= 0.8;
    }
    if gerund(candidate) != gerund(original) {
        score *= 0.8;
    }
    score
}

/// Rebuild `sentence` with some tokens replaced, keeping every gap.
fn splice_tokens(sentence: &str, tokens: &[(usize, &str)], replacements: &[Option<String>]) -> String {
    let mut out = String::with_capacity(sentence.len() + 16);
    let mut cursor = 0;
    for ((offset, token), replacement) in tokens.iter().zip(replacements) {
        out.push_str(&sentence[cursor..*offset]);
        match replacement {
            Some(r) => out.push_str(r),
            None => out.push_str(token),
        }
        cursor = offset + token.len();
    }
    out.push_str(&sentence[cursor..]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProviderError;
    use crate::provider::Thesaurus;
    use crate::tagger::HeuristicAnalyzer;
    use crate::thresholds::MIN_CONFIDENCE;

    struct FailingProvider;

    impl SynonymProvider for FailingProvider {
        fn synonyms(&self, _word: &str) -> Result<Vec<SynonymCandidate>, ProviderError> {
            Err(ProviderError::Unavailable("offline".to_string()))
        }
    }

    fn transformer_with(provider: Arc<dyn SynonymProvider>) -> WordLevelTransformer {
        WordLevelTransformer::new(
            provider,
            Arc::new(HeuristicAnalyzer::new()),
            Arc::new(Lexicon::english()),
        )
    }

    fn transformer() -> WordLevelTransformer {
        transformer_with(Arc::new(Thesaurus::builtin()))
    }

    fn table(entries: &[(&str, &[&str])]) -> Thesaurus {
        let mut thesaurus = Thesaurus::empty();
        for (word, synonyms) in entries {
            for synonym in *synonyms {
                thesaurus.insert(word, SynonymCandidate::new(*synonym, 0.9).with_tags(["adjective"]));
            }
        }
        thesaurus
    }

    fn options(creativity: f64, variety: f64, context: f64) -> TransformationOptions {
        TransformationOptions {
            creativity,
            variety_level: variety,
            context_preservation: context,
            ..Default::default()
        }
    }

    #[test]
    fn stopword_text_is_untouched() {
        let text = "It is what it is, and that was that.";
        let out = transformer().transform(text, &options(0.0, 0.0, 1.0)).unwrap();
        assert_eq!(out.text, text);
        assert!(out.changes.is_empty());
    }

    #[test]
    fn substitutes_known_words() {
        let text = "I think that the implementation is really good and we should use it.";
        let out = transformer().transform(text, &options(0.3, 0.2, 0.9)).unwrap();
        assert!(!out.changes.is_empty());
        assert_ne!(out.text, text);
        for change in &out.changes {
            assert_eq!(change.kind, ChangeKind::Word);
            assert!(text.contains(&change.original), "{change:?}");
            assert!((MIN_CONFIDENCE..=1.0).contains(&change.confidence));
        }
    }

    #[test]
    fn keeps_capitalization_and_punctuation() {
        let thesaurus = table(&[("happy", &["glad"])]);
        let out = transformer_with(Arc::new(thesaurus))
            .transform("Happy, they left.", &options(0.0, 0.0, 0.9))
            .unwrap();
        assert_eq!(out.text, "Glad, they left.");
        assert_eq!(out.changes[0].original, "Happy");
    }

    #[test]
    fn preserve_intent_protects_terms() {
        let thesaurus = table(&[("database", &["datastore"]), ("never", &["rarely"])]);
        let transformer = transformer_with(Arc::new(thesaurus));
        let text = "The database never sleeps.";
        let kept = transformer.transform(text, &options(0.0, 0.0, 0.9)).unwrap();
        assert_eq!(kept.text, text);

        let loose = TransformationOptions {
            preserve_intent: false,
            ..options(0.0, 0.0, 0.9)
        };
        let changed = transformer.transform(text, &loose).unwrap();
        assert_ne!(changed.text, text);
    }

    #[test]
    fn failing_provider_degrades_to_identity() {
        let text = "The implementation is good.";
        let out = transformer_with(Arc::new(FailingProvider))
            .transform(text, &TransformationOptions::default())
            .unwrap();
        assert_eq!(out.text, text);
        assert!(out.changes.is_empty());
    }

    #[test]
    fn variety_spreads_replacements() {
        let thesaurus = table(&[("quick", &["fast", "rapid", "swift"])]);
        let text = "A quick fox. A quick dog. A quick cat. A quick owl.";
        let out = transformer_with(Arc::new(thesaurus))
            .transform(text, &options(1.0, 1.0, 0.9))
            .unwrap();
        let distinct: std::collections::BTreeSet<_> =
            out.changes.iter().map(|c| c.replacement.to_lowercase()).collect();
        assert!(distinct.len() >= 2, "{:?}", out.changes);
    }

    #[test]
    fn gaps_between_sentences_survive() {
        let thesaurus = table(&[("happy", &["glad"])]);
        let text = "Happy days.\n\n  Happy  nights!";
        let out = transformer_with(Arc::new(thesaurus))
            .transform(text, &options(0.0, 0.0, 0.9))
            .unwrap();
        assert_eq!(out.text, "Glad days.\n\n  Glad  nights!");
    }

    #[test]
    fn confidence_floor_gates_substitutions() {
        let text = "I think that the implementation is really good.";
        let out = transformer()
            .transform_with_floor(text, &options(0.3, 0.2, 0.9), 1.0)
            .unwrap();
        assert_eq!(out.text, text);
        assert!(out.changes.is_empty());
    }

    #[test]
    fn invalid_options_are_rejected() {
        let bad = TransformationOptions {
            creativity: 2.0,
            ..Default::default()
        };
        assert!(transformer().transform("Anything.", &bad).is_err());
    }

    #[test]
    fn skips_numbers_and_symbols() {
        let transformer = transformer();
        let options = TransformationOptions::default();
        assert!(transformer.should_skip("2024", &options));
        assert!(transformer.should_skip("a/b/c", &options));
        assert!(transformer.should_skip("ok", &options));
        assert!(!transformer.should_skip("well-known", &options));
    }

    #[test]
    fn agreement_penalizes_mismatch() {
        assert!((agreement("ran", "walked") - 1.0).abs() < f64::EPSILON);
        assert!(agreement("cars", "vehicle") < 1.0);
        assert!(agreement("running", "walk") < 1.0);
    }
}
