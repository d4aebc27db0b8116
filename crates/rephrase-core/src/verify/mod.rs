//! Authenticity verification.
//!
//! Four independent heuristics estimate how naturally human-written a text
//! reads. Each works from a shared [`Sample`] so the text is split and tagged
//! once per call.

pub mod emotion;
pub mod language;
pub mod patterns;
pub mod style;

use std::collections::BTreeSet;
use std::sync::Arc;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::lexicon::Lexicon;
use crate::tagger::{LanguageAnalyzer, PosTag};
use crate::text;
use crate::thresholds::{MIN_EMOTIONAL_SCORE, MIN_WORD_SCORE};

const LANGUAGE_WEIGHT: f64 = 0.3;
const STYLE_WEIGHT: f64 = 0.3;
const PATTERN_WEIGHT: f64 = 0.2;
const EMOTION_WEIGHT: f64 = 0.2;

/// Composite human-likeness score for a finished text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuthenticityScore {
    /// Weighted blend of the four sub-scores.
    pub overall: f64,
    /// Sentence variety, vocabulary richness, grammar consistency.
    pub language_naturalness: f64,
    /// Register leakage, voice and tone consistency.
    pub stylistic: f64,
    /// Repetition, structural diversity, transitions.
    pub pattern_variation: f64,
    /// Tone shifts, intensity variance, emotional density.
    pub emotional_coherence: f64,
    /// Descriptive tags. Not used in scoring.
    pub features: BTreeSet<String>,
}

impl AuthenticityScore {
    /// Score given to text with no sentences: every dimension at its floor.
    pub fn floor() -> Self {
        Self::from_parts(MIN_WORD_SCORE, MIN_WORD_SCORE, MIN_WORD_SCORE, MIN_EMOTIONAL_SCORE)
    }

    fn from_parts(language: f64, style: f64, patterns: f64, emotion: f64) -> Self {
        Self {
            overall: LANGUAGE_WEIGHT * language
                + STYLE_WEIGHT * style
                + PATTERN_WEIGHT * patterns
                + EMOTION_WEIGHT * emotion,
            language_naturalness: language,
            stylistic: style,
            pattern_variation: patterns,
            emotional_coherence: emotion,
            features: BTreeSet::new(),
        }
    }
}

/// A text split into sentences, words, and tags.
#[derive(Debug, Clone, Default)]
pub struct Sample {
    /// Sentence strings in order.
    pub sentences: Vec<String>,
    /// Lowercased words per sentence.
    pub words: Vec<Vec<String>>,
    /// Tags per sentence, aligned with `words`.
    pub tags: Vec<Vec<PosTag>>,
}

impl Sample {
    /// Split and tag `text`.
    pub fn new(text: &str, analyzer: &dyn LanguageAnalyzer) -> Self {
        let sentences = analyzer.split_sentences(text);
        let mut words = Vec::with_capacity(sentences.len());
        let mut tags = Vec::with_capacity(sentences.len());
        for sentence in &sentences {
            // Tag with original case so capitalized names read as nouns
            let cased: Vec<&str> = sentence
                .split_whitespace()
                .map(|w| text::split_token(w).core)
                .filter(|w| !w.is_empty())
                .collect();
            tags.push(analyzer.tag_words(&cased));
            words.push(cased.iter().map(|w| w.to_lowercase()).collect());
        }
        Self {
            sentences,
            words,
            tags,
        }
    }

    /// Every word in order.
    pub fn all_words(&self) -> impl Iterator<Item = &str> {
        self.words.iter().flatten().map(String::as_str)
    }

    /// Total word count.
    pub fn word_count(&self) -> usize {
        self.words.iter().map(Vec::len).sum()
    }

    /// Word count of each sentence as floats.
    pub fn sentence_lengths(&self) -> Vec<f64> {
        self.words.iter().map(|w| w.len() as f64).collect()
    }

    /// Distinct words over total words; zero for no words.
    pub fn unique_ratio(&self) -> f64 {
        let total = self.word_count();
        if total == 0 {
            return 0.0;
        }
        let unique: BTreeSet<&str> = self.all_words().collect();
        unique.len() as f64 / total as f64
    }

    /// Whether the sample has no sentences.
    pub fn is_empty(&self) -> bool {
        self.sentences.is_empty()
    }
}

/// Scores texts for authenticity.
pub struct AuthenticityVerifier {
    analyzer: Arc<dyn LanguageAnalyzer>,
    lexicon: Arc<Lexicon>,
}

impl std::fmt::Debug for AuthenticityVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthenticityVerifier").finish_non_exhaustive()
    }
}

impl AuthenticityVerifier {
    /// Verifier tagging with `analyzer` and matching against `lexicon`.
    pub fn new(analyzer: Arc<dyn LanguageAnalyzer>, lexicon: Arc<Lexicon>) -> Self {
        Self { analyzer, lexicon }
    }

    /// Score `text` from scratch.
    #[tracing::instrument(name = "verify", skip_all, fields(text_len = text.len()))]
    pub fn verify(&self, text: &str) -> AuthenticityScore {
        let sample = Sample::new(text, self.analyzer.as_ref());
        if sample.is_empty() {
            return AuthenticityScore::floor();
        }

        let language = language::naturalness(&sample);
        let style = style::consistency(&sample, &self.lexicon);
        let patterns = patterns::variation(&sample, &self.lexicon);
        let emotion = emotion::coherence(&sample, &self.lexicon);

        let mut score = AuthenticityScore::from_parts(language, style, patterns, emotion);
        score.features = self.human_features(&sample);
        tracing::debug!(
            overall = score.overall,
            language,
            style,
            patterns,
            emotion,
            "authenticity scored"
        );
        score
    }

    fn human_features(&self, sample: &Sample) -> BTreeSet<String> {
        let mut features = BTreeSet::new();
        if crate::metrics::std_dev(&sample.sentence_lengths()) > 2.0 {
            features.insert("natural pause patterns".to_string());
        }
        if sample.unique_ratio() > 0.6 {
            features.insert("varied vocabulary".to_string());
        }
        if emotion::consistent_emotion(sample, &self.lexicon) {
            features.insert("consistent emotion".to_string());
        }
        if language::has_context_references(sample) {
            features.insert("context-aware references".to_string());
        }
        if patterns::transition_sentence_share(sample, &self.lexicon) >= 0.2 {
            features.insert("natural transition words".to_string());
        }
        if language::dominant_tense_share(sample) > 0.7 {
            features.insert("consistent tense usage".to_string());
        }
        features
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tagger::HeuristicAnalyzer;

    fn verifier() -> AuthenticityVerifier {
        AuthenticityVerifier::new(
            Arc::new(HeuristicAnalyzer::new()),
            Arc::new(Lexicon::english()),
        )
    }

    fn in_bounds(score: &AuthenticityScore) -> bool {
        [
            score.overall,
            score.language_naturalness,
            score.stylistic,
            score.pattern_variation,
        ]
        .iter()
        .all(|s| (MIN_WORD_SCORE..=1.0).contains(s))
            && (MIN_EMOTIONAL_SCORE..=1.0).contains(&score.emotional_coherence)
    }

    #[test]
    fn empty_text_scores_at_floor() {
        let score = verifier().verify("   ");
        assert_eq!(score, AuthenticityScore::floor());
        assert!(score.features.is_empty());
    }

    #[test]
    fn scores_stay_in_bounds() {
        let texts = [
            "Short.",
            "The team shipped the release on time. However, the docs lagged behind by a week, \
             which annoyed several users. We fixed it.",
            "gonna gonna gonna gonna. wanna wanna wanna. it's it's it's!",
            "Great great great. Terrible terrible terrible. Great great great.",
        ];
        let verifier = verifier();
        for text in texts {
            let score = verifier.verify(text);
            assert!(in_bounds(&score), "{text}: {score:?}");
        }
    }

    #[test]
    fn overall_is_weighted_blend() {
        let score = verifier().verify("We wrote the parser. It was fast, and users liked it a lot.");
        let expected = 0.3 * score.language_naturalness
            + 0.3 * score.stylistic
            + 0.2 * score.pattern_variation
            + 0.2 * score.emotional_coherence;
        assert!((score.overall - expected).abs() < 1e-12);
    }

    #[test]
    fn repetition_lowers_pattern_variation() {
        let verifier = verifier();
        let varied = verifier.verify(
            "The morning started slowly. By noon, however, the whole office was buzzing with \
             rumors about the merger. Nobody knew much.",
        );
        let repetitive = verifier.verify("It is good. It is good. It is good. It is good.");
        assert!(varied.pattern_variation > repetitive.pattern_variation);
        assert!((repetitive.pattern_variation - MIN_WORD_SCORE).abs() < 1e-12);
    }

    #[test]
    fn reports_human_features() {
        let score = verifier().verify(
            "The server crashed overnight. However, the server restarted itself within an hour \
             and nobody noticed anything at all during the quiet weekend shift.",
        );
        assert!(score.features.contains("varied vocabulary"));
        assert!(score.features.contains("natural transition words"));
        assert!(score.features.contains("context-aware references"));
        assert!(score.features.contains("natural pause patterns"));
    }

    #[test]
    fn sample_counts_words() {
        let sample = Sample::new("One two three. Four five.", &HeuristicAnalyzer::new());
        assert_eq!(sample.sentences.len(), 2);
        assert_eq!(sample.word_count(), 5);
        assert_eq!(sample.sentence_lengths(), vec![3.0, 2.0]);
        assert!((sample.unique_ratio() - 1.0).abs() < f64::EPSILON);
    }
}
