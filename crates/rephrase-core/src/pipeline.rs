//! Pipeline orchestration.
//!
//! Stages run in a fixed order:
//!
//! ```text
//! word-level -> syntax -> [tone] -> [generative] -> [perturbation] -> scoring
//! ```
//!
//! Tone adjustment runs only for a marked tone, the generative stage only when
//! a rewriter is attached, and perturbation only when the text scores below
//! [`AUTHENTICITY_REPAIR_THRESHOLD`]. A failure up through syntax returns the
//! input unchanged; a failure in a later stage keeps the text from before that
//! stage. [`Pipeline::transform`] never fails.
//!
//! Generated rewrites get their quoted and capitalized key phrases restored
//! before the drift guard judges them. Perturbation resamples each sentence on
//! its own and is dropped if the sentence shape changes anyway.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, LazyLock};

use rand::SeedableRng;
use rand::rngs::StdRng;
use regex::Regex;

use crate::error::{PipelineError, PipelineResult, RewriteError, TransformResult};
use crate::lexicon::Lexicon;
use crate::metrics::{self, EditWeights};
use crate::options::{EmotionalTone, TransformationOptions};
use crate::perturbation;
use crate::provider::{GenerativeRewriter, SynonymProvider, Thesaurus};
use crate::syntax::SyntaxTransformer;
use crate::tagger::{HeuristicAnalyzer, LanguageAnalyzer};
use crate::thresholds::{
    AUTHENTICITY_REPAIR_THRESHOLD, GENERATIVE_CONTEXT_FLOOR, MIN_CONFIDENCE,
    MIN_REWRITE_SIMILARITY, MIN_SYNTAX_SCORE, MIN_WORD_SCORE, clamp_score,
};
use crate::tone::ToneAnalyzer;
use crate::types::{ChangeKind, StageOutput, TransformationChange, TransformationResult};
use crate::verify::{AuthenticityScore, AuthenticityVerifier};
use crate::word_level::WordLevelTransformer;

/// Seed used for Markov sampling when none is configured.
pub const DEFAULT_SEED: u64 = 42;

/// Rewrites shorter or longer than this ratio of the input are discarded.
const REWRITE_LENGTH_RATIO: std::ops::RangeInclusive<f64> = 0.5..=1.5;

static QUOTED_PHRASE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""([^"]+)"|\x{201C}([^\x{201D}]+)\x{201D}"#).expect("valid regex"));

static CAPITALIZED_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b[A-Z][a-z]+(?:[ \t]+[A-Z][a-z]+)+\b").expect("valid regex"));

/// A point in the pipeline where cancellation is checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    /// Synonym substitution.
    WordLevel,
    /// Contractions, register, voice.
    Syntax,
    /// Sentence tone adjustment.
    Tone,
    /// External generative rewrite.
    Generative,
    /// Markov repair pass.
    Perturbation,
    /// Final confidence scoring.
    Scoring,
}

impl Stage {
    /// Kebab-case name used in logs and errors.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::WordLevel => "word-level",
            Self::Syntax => "syntax",
            Self::Tone => "tone",
            Self::Generative => "generative",
            Self::Perturbation => "perturbation",
            Self::Scoring => "scoring",
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Shared flag a caller sets to stop a run between stages.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    /// A token that has not fired.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fire the token. Every clone observes it.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    /// Whether the token has fired.
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    fn check(&self, stage: Stage) -> PipelineResult<()> {
        if self.is_cancelled() {
            tracing::debug!(%stage, "cancelled");
            return Err(PipelineError::Cancelled { stage });
        }
        Ok(())
    }
}

/// Builder for [`Pipeline`].
pub struct PipelineBuilder {
    provider: Arc<dyn SynonymProvider>,
    rewriter: Option<Arc<dyn GenerativeRewriter>>,
    analyzer: Arc<dyn LanguageAnalyzer>,
    lexicon: Arc<Lexicon>,
    seed: u64,
}

impl std::fmt::Debug for PipelineBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PipelineBuilder")
            .field("rewriter", &self.rewriter.is_some())
            .field("seed", &self.seed)
            .finish_non_exhaustive()
    }
}

impl Default for PipelineBuilder {
    fn default() -> Self {
        Self {
            provider: Arc::new(Thesaurus::builtin()),
            rewriter: None,
            analyzer: Arc::new(HeuristicAnalyzer::new()),
            lexicon: Arc::new(Lexicon::english()),
            seed: DEFAULT_SEED,
        }
    }
}

impl PipelineBuilder {
    /// Builder with the built-in thesaurus, heuristic analyzer, and English tables.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use `provider` for synonym lookup.
    #[must_use]
    pub fn with_provider(mut self, provider: Arc<dyn SynonymProvider>) -> Self {
        self.provider = provider;
        self
    }

    /// Attach a generative rewriter.
    #[must_use]
    pub fn with_rewriter(mut self, rewriter: Arc<dyn GenerativeRewriter>) -> Self {
        self.rewriter = Some(rewriter);
        self
    }

    /// Replace the grammar analyzer.
    #[must_use]
    pub fn with_analyzer(mut self, analyzer: Arc<dyn LanguageAnalyzer>) -> Self {
        self.analyzer = analyzer;
        self
    }

    /// Replace the lexical tables.
    #[must_use]
    pub fn with_lexicon(mut self, lexicon: Lexicon) -> Self {
        self.lexicon = Arc::new(lexicon);
        self
    }

    /// Seed for Markov sampling.
    #[must_use]
    pub const fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Wire the stages.
    pub fn build(self) -> Pipeline {
        Pipeline {
            word_level: WordLevelTransformer::new(
                self.provider,
                Arc::clone(&self.analyzer),
                Arc::clone(&self.lexicon),
            ),
            syntax: SyntaxTransformer::new(Arc::clone(&self.analyzer), &self.lexicon),
            tone: ToneAnalyzer::with_analyzer(
                Arc::clone(&self.lexicon),
                Arc::clone(&self.analyzer),
            ),
            verifier: AuthenticityVerifier::new(Arc::clone(&self.analyzer), self.lexicon),
            analyzer: self.analyzer,
            rewriter: self.rewriter,
            seed: self.seed,
        }
    }
}

/// The full transformation pipeline.
pub struct Pipeline {
    word_level: WordLevelTransformer,
    syntax: SyntaxTransformer,
    tone: ToneAnalyzer,
    verifier: AuthenticityVerifier,
    analyzer: Arc<dyn LanguageAnalyzer>,
    rewriter: Option<Arc<dyn GenerativeRewriter>>,
    seed: u64,
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("word_level", &self.word_level)
            .field("syntax", &self.syntax)
            .field("rewriter", &self.rewriter.is_some())
            .field("seed", &self.seed)
            .finish_non_exhaustive()
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new()
    }
}

impl Pipeline {
    /// Pipeline with default collaborators.
    pub fn new() -> Self {
        PipelineBuilder::new().build()
    }

    /// Start configuring a pipeline.
    pub fn builder() -> PipelineBuilder {
        PipelineBuilder::new()
    }

    /// Run every stage on `text`. Never fails; see the module docs for fallbacks.
    pub fn transform(&self, text: &str, options: &TransformationOptions) -> TransformationResult {
        match self.transform_cancellable(text, options, &CancellationToken::new()) {
            Ok(result) => result,
            Err(err) => {
                tracing::warn!(error = %err, "pipeline stopped, returning input unchanged");
                TransformationResult::unchanged(text)
            }
        }
    }

    /// Run every stage, checking `cancel` before each one.
    #[tracing::instrument(name = "pipeline", skip_all, fields(text_len = text.len()))]
    pub fn transform_cancellable(
        &self,
        text: &str,
        options: &TransformationOptions,
        cancel: &CancellationToken,
    ) -> PipelineResult<TransformationResult> {
        cancel.check(Stage::WordLevel)?;
        let word = match self.word_pass(text, options) {
            Ok(out) => out,
            Err(err) => {
                tracing::warn!(error = %err, stage = %Stage::WordLevel, "stage failed, returning input unchanged");
                return Ok(TransformationResult::unchanged(text));
            }
        };

        cancel.check(Stage::Syntax)?;
        let syntax = match self.syntax.transform(&word.text, options) {
            Ok(out) => out,
            Err(err) => {
                tracing::warn!(error = %err, stage = %Stage::Syntax, "stage failed, returning input unchanged");
                return Ok(TransformationResult::unchanged(text));
            }
        };

        let mut changes = word.changes;
        changes.extend(syntax.changes);
        let mut current = syntax.text;

        if options.emotional_tone != EmotionalTone::Neutral {
            cancel.check(Stage::Tone)?;
            let tone = self.tone.adjust(&current, options);
            changes.extend(tone.changes);
            current = tone.text;
        }

        if let Some(rewriter) = &self.rewriter {
            cancel.check(Stage::Generative)?;
            match generative_rewrite(rewriter.as_ref(), &current, options) {
                Ok(rewritten) => current = rewritten,
                Err(err) => {
                    tracing::warn!(error = %err, stage = %Stage::Generative, "stage failed, keeping previous text");
                }
            }
        }

        let mut authenticity = self.verifier.verify(&current);
        if options.creativity > 0.0 && authenticity.overall < AUTHENTICITY_REPAIR_THRESHOLD {
            cancel.check(Stage::Perturbation)?;
            if let Some((perturbed, score)) = self.repair(&current, &authenticity) {
                current = perturbed;
                authenticity = score;
            }
        }

        cancel.check(Stage::Scoring)?;
        let confidence = overall_confidence(text, &current, authenticity.overall, &changes);
        tracing::info!(
            changes = changes.len(),
            confidence,
            authenticity = authenticity.overall,
            "transformation complete"
        );
        Ok(TransformationResult {
            original_text: text.to_string(),
            transformed_text: current,
            confidence,
            transformations: changes,
            authenticity: Some(authenticity),
        })
    }

    /// Authenticity of `text` on its own.
    pub fn verify(&self, text: &str) -> AuthenticityScore {
        self.verifier.verify(text)
    }

    /// Dominant tone of `text`.
    pub fn dominant_tone(&self, text: &str) -> EmotionalTone {
        self.tone.get_emotional_tone(text)
    }

    fn word_pass(
        &self,
        text: &str,
        options: &TransformationOptions,
    ) -> TransformResult<StageOutput> {
        if self.rewriter.is_some() {
            let guarded = options.with_context_floor(GENERATIVE_CONTEXT_FLOOR);
            self.word_level
                .transform_with_floor(text, &guarded, MIN_WORD_SCORE)
        } else {
            self.word_level.transform(text, options)
        }
    }

    /// Resample each sentence of `text` and keep the result only if it reads
    /// at least as well and has the same sentences.
    fn repair(
        &self,
        text: &str,
        before: &AuthenticityScore,
    ) -> Option<(String, AuthenticityScore)> {
        let spans = self.analyzer.sentence_spans(text);
        let mut rng = StdRng::seed_from_u64(self.seed);
        let perturbed = perturbation::perturb_spans(text, &spans, &mut rng);
        if perturbed == text {
            return None;
        }
        if self.sentence_endings(&perturbed) != self.sentence_endings(text) {
            tracing::debug!("perturbation moved a sentence boundary, discarded");
            return None;
        }
        let similarity = metrics::text_similarity(text, &perturbed);
        let after = self.verifier.verify(&perturbed);
        if after.overall < before.overall || similarity < MIN_REWRITE_SIMILARITY {
            tracing::debug!(
                before = before.overall,
                after = after.overall,
                similarity,
                "perturbation discarded"
            );
            return None;
        }
        tracing::debug!(before = before.overall, after = after.overall, "perturbation kept");
        Some((perturbed, after))
    }

    /// Final character of each sentence; the length is the sentence count.
    fn sentence_endings(&self, text: &str) -> Vec<Option<char>> {
        self.analyzer
            .sentence_spans(text)
            .into_iter()
            .map(|span| text.get(span).and_then(|s| s.trim_end().chars().last()))
            .collect()
    }
}

/// Ask `rewriter` for a rewrite and refuse output that drifted too far.
///
/// Key phrases of `text` missing from the rewrite are appended before the
/// guard runs again. With intent preservation on this always happens; with it
/// off, only for a rewrite the guard has already refused.
fn generative_rewrite(
    rewriter: &dyn GenerativeRewriter,
    text: &str,
    options: &TransformationOptions,
) -> Result<String, RewriteError> {
    if text.trim().is_empty() {
        return Ok(text.to_string());
    }
    let rewritten = rewriter.rewrite(text, options)?;
    if check_rewrite(text, &rewritten).is_ok() && !options.preserve_intent {
        return Ok(rewritten);
    }
    let restored = restore_key_phrases(text, &rewritten);
    if restored != rewritten {
        tracing::debug!("restored key phrases dropped by the rewrite");
    }
    check_rewrite(text, &restored)?;
    Ok(restored)
}

fn check_rewrite(text: &str, rewritten: &str) -> Result<(), RewriteError> {
    let length_ratio = rewritten.chars().count() as f64 / text.chars().count() as f64;
    let similarity = metrics::text_similarity(text, rewritten);
    if !REWRITE_LENGTH_RATIO.contains(&length_ratio) || similarity < MIN_REWRITE_SIMILARITY {
        return Err(RewriteError::Rejected {
            similarity,
            length_ratio,
        });
    }
    Ok(())
}

/// A phrase a rewrite must keep.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct KeyPhrase<'a> {
    text: &'a str,
    quoted: bool,
}

/// Quoted passages, then runs of two or more capitalized words, first occurrence only.
fn key_phrases(text: &str) -> Vec<KeyPhrase<'_>> {
    let quoted = QUOTED_PHRASE.captures_iter(text).filter_map(|caps| {
        caps.get(1).or_else(|| caps.get(2)).map(|m| KeyPhrase {
            text: m.as_str().trim(),
            quoted: true,
        })
    });
    let capitalized = CAPITALIZED_RUN.find_iter(text).map(|m| KeyPhrase {
        text: m.as_str(),
        quoted: false,
    });

    let mut phrases: Vec<KeyPhrase<'_>> = Vec::new();
    for phrase in quoted.chain(capitalized) {
        let seen = phrases
            .iter()
            .any(|p| p.text.eq_ignore_ascii_case(phrase.text) || p.text.contains(phrase.text));
        if !phrase.text.is_empty() && !seen {
            phrases.push(phrase);
        }
    }
    phrases
}

/// Append every key phrase of `original` that `rewritten` lost.
fn restore_key_phrases(original: &str, rewritten: &str) -> String {
    let lower = rewritten.to_lowercase();
    let missing: Vec<KeyPhrase<'_>> = key_phrases(original)
        .into_iter()
        .filter(|phrase| !lower.contains(&phrase.text.to_lowercase()))
        .collect();
    if missing.is_empty() {
        return rewritten.to_string();
    }

    let mut restored = rewritten.trim_end().to_string();
    for phrase in missing {
        restored.push(' ');
        if phrase.quoted {
            restored.push('"');
            restored.push_str(phrase.text);
            restored.push('"');
        } else {
            restored.push_str(phrase.text);
        }
    }
    restored
}

/// Product of the confidences of one kind of change, floored; 1 when there are none.
fn kind_confidence(changes: &[TransformationChange], kind: ChangeKind, floor: f64) -> f64 {
    let product: f64 = changes
        .iter()
        .filter(|c| c.kind == kind)
        .map(|c| c.confidence)
        .product();
    clamp_score(product, floor)
}

/// Blend similarity, overlap, and authenticity, scaled by the change confidences.
fn overall_confidence(
    original: &str,
    transformed: &str,
    authenticity: f64,
    changes: &[TransformationChange],
) -> f64 {
    let similarity = metrics::normalized_similarity(original, transformed, EditWeights::UNIT);
    let overlap = metrics::lexical_overlap(original, transformed);
    let base = 0.3 * similarity + 0.3 * overlap + 0.4 * authenticity;

    let word = kind_confidence(changes, ChangeKind::Word, MIN_CONFIDENCE);
    let syntax = kind_confidence(changes, ChangeKind::Syntax, MIN_SYNTAX_SCORE);
    clamp_score(base * word.powf(0.6) * syntax.powf(0.4), MIN_CONFIDENCE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;
    use std::ops::Range;
    use std::sync::atomic::AtomicUsize;

    use crate::error::ProviderError;
    use crate::lexicon::{LexiconTables, ToneRule};
    use crate::options::Formality;
    use crate::tagger::PosTag;
    use crate::types::SynonymCandidate;

    struct FailingProvider;

    impl SynonymProvider for FailingProvider {
        fn synonyms(&self, _word: &str) -> Result<Vec<SynonymCandidate>, ProviderError> {
            Err(ProviderError::Unavailable("lookup service down".to_string()))
        }
    }

    struct AppendingRewriter;

    impl GenerativeRewriter for AppendingRewriter {
        fn rewrite(&self, text: &str, _: &TransformationOptions) -> Result<String, RewriteError> {
            Ok(format!("{text} Indeed."))
        }
    }

    struct DriftingRewriter;

    impl GenerativeRewriter for DriftingRewriter {
        fn rewrite(&self, _: &str, _: &TransformationOptions) -> Result<String, RewriteError> {
            Ok("Bananas.".to_string())
        }
    }

    /// Drops every quoted passage, and the rest of the sentence after it.
    struct QuoteDroppingRewriter;

    impl GenerativeRewriter for QuoteDroppingRewriter {
        fn rewrite(&self, text: &str, _: &TransformationOptions) -> Result<String, RewriteError> {
            let head = text.split('"').next().unwrap_or_default().trim_end();
            Ok(format!("{head} it in the memo."))
        }
    }

    struct FailingRewriter;

    impl GenerativeRewriter for FailingRewriter {
        fn rewrite(&self, _: &str, _: &TransformationOptions) -> Result<String, RewriteError> {
            Err(RewriteError::Unavailable("timeout".to_string()))
        }
    }

    const SCENARIO: &str = "I think that the implementation is really good and we should use it.";

    fn scenario_options() -> TransformationOptions {
        TransformationOptions {
            formality: Formality::Formal,
            emotional_tone: EmotionalTone::Neutral,
            creativity: 0.3,
            preserve_intent: true,
            variety_level: 0.2,
            context_preservation: 0.9,
        }
    }

    fn quiet_options() -> TransformationOptions {
        TransformationOptions {
            creativity: 0.0,
            variety_level: 0.0,
            context_preservation: 1.0,
            ..Default::default()
        }
    }

    #[test]
    fn stopword_text_is_a_no_op() {
        let text = "It is what it is, and that was that.";
        let result = Pipeline::new().transform(text, &quiet_options());
        assert_eq!(result.transformed_text, text);
        assert!(result.transformations.is_empty());
    }

    #[test]
    fn end_to_end_scenario() {
        let result = Pipeline::new().transform(SCENARIO, &scenario_options());
        assert_eq!(result.original_text, SCENARIO);
        assert!(!result.transformed_text.contains('\''));
        assert!(
            result
                .transformations
                .iter()
                .any(|c| matches!(c.kind, ChangeKind::Word | ChangeKind::Syntax))
        );
        assert!(result.confidence > 0.0 && result.confidence < 1.0);
        assert!(result.authenticity.is_some());
    }

    #[test]
    fn change_confidences_are_bounded() {
        let text = "We don't really need it. The team fixed the bug. I think it's good.";
        let result = Pipeline::new().transform(text, &scenario_options());
        for change in &result.transformations {
            assert!((MIN_CONFIDENCE..=1.0).contains(&change.confidence), "{change:?}");
        }
        assert!((MIN_CONFIDENCE..=1.0).contains(&result.confidence));
    }

    #[test]
    fn failing_lookup_still_returns_a_result() {
        let pipeline = Pipeline::builder()
            .with_provider(Arc::new(FailingProvider))
            .build();
        let result = pipeline.transform(SCENARIO, &scenario_options());
        assert_eq!(result.changes_of(ChangeKind::Word).count(), 0);
        assert!(result.changes_of(ChangeKind::Syntax).count() > 0);
    }

    #[test]
    fn invalid_options_return_input_unchanged() {
        let options = TransformationOptions {
            creativity: 2.0,
            ..Default::default()
        };
        let result = Pipeline::new().transform(SCENARIO, &options);
        assert_eq!(result, TransformationResult::unchanged(SCENARIO));
    }

    #[test]
    fn cancelled_token_stops_before_first_stage() {
        let token = CancellationToken::new();
        token.clone().cancel();
        let err = Pipeline::new()
            .transform_cancellable(SCENARIO, &scenario_options(), &token)
            .unwrap_err();
        assert_eq!(
            err,
            PipelineError::Cancelled {
                stage: Stage::WordLevel
            }
        );
    }

    #[test]
    fn tone_stage_runs_for_marked_tones() {
        let pipeline = Pipeline::builder()
            .with_provider(Arc::new(Thesaurus::empty()))
            .build();
        let options = TransformationOptions {
            emotional_tone: EmotionalTone::Positive,
            ..quiet_options()
        };
        let result = pipeline.transform("The launch was a terrible problem.", &options);
        assert!(result.changes_of(ChangeKind::Emotional).count() > 0);
        assert!(result.transformed_text.contains("opportunity"));
    }

    #[test]
    fn accepted_rewrite_replaces_text() {
        let pipeline = Pipeline::builder()
            .with_provider(Arc::new(Thesaurus::empty()))
            .with_rewriter(Arc::new(AppendingRewriter))
            .build();
        let result = pipeline.transform("The report is ready for review.", &quiet_options());
        assert_eq!(result.transformed_text, "The report is ready for review. Indeed.");
    }

    #[test]
    fn rejected_or_failed_rewrite_falls_back() {
        let build = |rewriter: Arc<dyn GenerativeRewriter>| {
            Pipeline::builder()
                .with_provider(Arc::new(Thesaurus::empty()))
                .with_rewriter(rewriter)
                .build()
        };
        let text = "The report is ready for review.";
        let drifted = build(Arc::new(DriftingRewriter)).transform(text, &quiet_options());
        let failed = build(Arc::new(FailingRewriter)).transform(text, &quiet_options());
        assert_eq!(drifted.transformed_text, text);
        assert_eq!(failed.transformed_text, text);
    }

    #[test]
    fn guard_reports_rejection_details() {
        let err = generative_rewrite(&DriftingRewriter, "A much longer input sentence here.", &quiet_options())
            .unwrap_err();
        match err {
            RewriteError::Rejected { length_ratio, .. } => assert!(length_ratio < 0.5),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn dropped_quote_is_restored_before_the_guard() {
        let text = r#"She wrote "the quarterly numbers look strong" in the memo."#;
        let expected = r#"She wrote it in the memo. "the quarterly numbers look strong""#;

        // too short on its own, accepted once the quote is back
        let lenient = TransformationOptions {
            preserve_intent: false,
            ..quiet_options()
        };
        assert_eq!(
            generative_rewrite(&QuoteDroppingRewriter, text, &lenient).unwrap(),
            expected
        );

        let pipeline = Pipeline::builder()
            .with_provider(Arc::new(Thesaurus::empty()))
            .with_rewriter(Arc::new(QuoteDroppingRewriter))
            .build();
        let result = pipeline.transform(text, &quiet_options());
        assert_eq!(result.transformed_text, expected);
    }

    #[test]
    fn key_phrases_cover_quotes_and_capitalized_runs() {
        let text = "The Friday Launch Review said \"ship it\" and \u{201C}hold the line\u{201D}.";
        let phrases: Vec<&str> = key_phrases(text).iter().map(|p| p.text).collect();
        assert_eq!(phrases, ["ship it", "hold the line", "The Friday Launch Review"]);

        let restored = restore_key_phrases(text, "The review said to ship it.");
        assert!(restored.ends_with(r#" "hold the line" The Friday Launch Review"#), "{restored}");
        assert_eq!(restore_key_phrases("Plain text here.", "Plain text."), "Plain text.");
    }

    #[test]
    fn swapped_tone_table_changes_output() {
        let options = TransformationOptions {
            emotional_tone: EmotionalTone::Positive,
            ..quiet_options()
        };
        let text = "The launch was a terrible problem.";

        let mut tables = LexiconTables::english();
        tables.tone_modifiers.positive = vec![ToneRule::new("problem", "puzzle")];
        let custom = Pipeline::builder()
            .with_provider(Arc::new(Thesaurus::empty()))
            .with_lexicon(Lexicon::from_tables(tables).unwrap())
            .build()
            .transform(text, &options);
        let builtin = Pipeline::builder()
            .with_provider(Arc::new(Thesaurus::empty()))
            .build()
            .transform(text, &options);

        assert!(builtin.transformed_text.contains("opportunity"));
        assert!(custom.transformed_text.contains("puzzle"));
        assert!(custom.transformed_text.contains("terrible"));
        assert!(!custom.transformed_text.contains("opportunity"));
    }

    /// Reports no sentences and fires `token` on the `cancel_on`-th split.
    ///
    /// With no sentences every stage passes text through and the verifier
    /// scores the floor, so the repair stage is always reached.
    struct CancellingAnalyzer {
        token: CancellationToken,
        cancel_on: usize,
        calls: AtomicUsize,
    }

    impl LanguageAnalyzer for CancellingAnalyzer {
        fn tag(&self, word: &str) -> PosTag {
            HeuristicAnalyzer::new().tag(word)
        }

        fn sentence_spans(&self, _text: &str) -> Vec<Range<usize>> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            if call == self.cancel_on {
                self.token.cancel();
            }
            Vec::new()
        }
    }

    /// Stages split sentences once each: word-level, syntax, tone, then the verifier.
    fn cancelled_at(
        cancel_on: usize,
        options: &TransformationOptions,
        with_rewriter: bool,
    ) -> PipelineError {
        let token = CancellationToken::new();
        let analyzer = CancellingAnalyzer {
            token: token.clone(),
            cancel_on,
            calls: AtomicUsize::new(0),
        };
        let mut builder = Pipeline::builder().with_analyzer(Arc::new(analyzer));
        if with_rewriter {
            builder = builder.with_rewriter(Arc::new(AppendingRewriter));
        }
        builder
            .build()
            .transform_cancellable(SCENARIO, options, &token)
            .unwrap_err()
    }

    #[test]
    fn cancellation_is_observed_before_each_later_stage() {
        let positive = TransformationOptions {
            emotional_tone: EmotionalTone::Positive,
            ..scenario_options()
        };
        let still = TransformationOptions {
            creativity: 0.0,
            ..scenario_options()
        };
        let cases = [
            (1, scenario_options(), false, Stage::Syntax),
            (2, positive, false, Stage::Tone),
            (3, positive, true, Stage::Generative),
            (3, scenario_options(), false, Stage::Perturbation),
            (3, still, false, Stage::Scoring),
        ];
        for (cancel_on, options, with_rewriter, stage) in cases {
            assert_eq!(
                cancelled_at(cancel_on, &options, with_rewriter),
                PipelineError::Cancelled { stage },
                "cancel on split {cancel_on}"
            );
        }
    }

    /// Tags nothing, so every tag lookup falls back to unknown.
    struct UntaggedAnalyzer;

    impl LanguageAnalyzer for UntaggedAnalyzer {
        fn tag(&self, _word: &str) -> PosTag {
            PosTag::Unknown
        }

        fn sentence_spans(&self, text: &str) -> Vec<Range<usize>> {
            HeuristicAnalyzer::new().sentence_spans(text)
        }

        fn tag_words(&self, _words: &[&str]) -> Vec<PosTag> {
            Vec::new()
        }
    }

    #[test]
    fn short_tag_lists_do_not_break_stages() {
        let pipeline = Pipeline::builder()
            .with_analyzer(Arc::new(UntaggedAnalyzer))
            .build();
        let text = "The team fixed the bug. We utilize the tools. The bug was fixed by the team.";
        for formality in [Formality::Formal, Formality::Informal] {
            let options = TransformationOptions {
                formality,
                preserve_intent: false,
                ..scenario_options()
            };
            let result = pipeline.transform(text, &options);
            assert_eq!(result.original_text, text);
            assert!(!result.transformed_text.is_empty());
        }
    }

    #[test]
    fn stage_changes_quote_their_own_input() {
        let pipeline = Pipeline::new();
        let options = TransformationOptions {
            emotional_tone: EmotionalTone::Positive,
            creativity: 0.0,
            ..scenario_options()
        };
        let text = "The launch was terrible and we don't know why. It failed again.";
        let word = pipeline.word_pass(text, &options).unwrap();
        let syntax = pipeline.syntax.transform(&word.text, &options).unwrap();
        let result = pipeline.transform(text, &options);

        assert!(result.changes_of(ChangeKind::Syntax).count() > 0);
        assert!(result.changes_of(ChangeKind::Emotional).count() > 0);
        for change in result.changes_of(ChangeKind::Word) {
            assert!(text.contains(&change.original), "{change:?}");
        }
        for change in result.changes_of(ChangeKind::Syntax) {
            assert!(word.text.contains(&change.original), "{change:?}");
        }
        for change in result.changes_of(ChangeKind::Emotional) {
            assert!(syntax.text.contains(&change.original), "{change:?}");
        }
    }

    const TWO_SENTENCES: &str =
        "The dog saw the cat and the cat saw the dog. A bird sang and a bird flew and a bird sang again.";

    #[test]
    fn repair_resamples_within_sentences() {
        let analyzer = HeuristicAnalyzer::new();
        let floor = AuthenticityScore::floor();
        let vocab: Vec<BTreeSet<&str>> = analyzer
            .sentence_spans(TWO_SENTENCES)
            .into_iter()
            .map(|span| TWO_SENTENCES[span].split_whitespace().collect())
            .collect();

        let mut kept = 0;
        for seed in 0..50 {
            let pipeline = Pipeline::builder().with_seed(seed).build();
            let Some((text, score)) = pipeline.repair(TWO_SENTENCES, &floor) else {
                continue;
            };
            kept += 1;
            assert_ne!(text, TWO_SENTENCES);
            assert!(score.overall >= floor.overall);
            let sentences = analyzer.split_sentences(&text);
            assert_eq!(sentences.len(), 2, "seed {seed}: {text}");
            assert!(sentences[0].ends_with(" dog.") && sentences[1].ends_with(" again."));
            for (sentence, words) in sentences.iter().zip(&vocab) {
                assert!(
                    sentence.split_whitespace().all(|w| words.contains(w)),
                    "seed {seed}: {text}"
                );
            }
        }
        assert!(kept > 0);
    }

    #[test]
    fn repair_discards_worse_or_unchanged_text() {
        let unreachable = AuthenticityScore {
            overall: 1.5,
            ..AuthenticityScore::floor()
        };
        for seed in 0..20 {
            let pipeline = Pipeline::builder().with_seed(seed).build();
            assert!(pipeline.repair(TWO_SENTENCES, &unreachable).is_none());
        }
        // no token repeats, so the only walk is the text itself
        let pipeline = Pipeline::new();
        assert!(
            pipeline
                .repair("Quick brown foxes jump high.", &AuthenticityScore::floor())
                .is_none()
        );
    }

    #[test]
    fn same_seed_same_result() {
        let options = TransformationOptions {
            creativity: 0.9,
            variety_level: 0.9,
            ..Default::default()
        };
        let text = "The dog saw the cat and the cat saw the dog. The bird sang and the dog ran.";
        let a = Pipeline::builder().with_seed(7).build().transform(text, &options);
        let b = Pipeline::builder().with_seed(7).build().transform(text, &options);
        assert_eq!(a, b);
    }

    #[test]
    fn confidence_without_changes_tracks_similarity() {
        let confidence = overall_confidence("Same text.", "Same text.", 0.9, &[]);
        assert!((confidence - (0.3 + 0.3 + 0.4 * 0.9)).abs() < 1e-12);
    }

    #[test]
    fn kind_confidence_is_floored() {
        let changes: Vec<TransformationChange> = (0..10)
            .map(|_| TransformationChange::new("a", "b", ChangeKind::Word, 0.6))
            .collect();
        assert!((kind_confidence(&changes, ChangeKind::Word, MIN_CONFIDENCE) - MIN_CONFIDENCE).abs() < 1e-12);
        assert!((kind_confidence(&changes, ChangeKind::Syntax, MIN_SYNTAX_SCORE) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn stage_names() {
        assert_eq!(Stage::WordLevel.to_string(), "word-level");
        assert_eq!(Stage::Perturbation.as_str(), "perturbation");
    }
}
