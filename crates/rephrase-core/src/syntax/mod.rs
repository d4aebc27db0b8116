//! Sentence-level syntax rewriting.
//!
//! Each sentence goes through three passes toward the target register:
//! contractions, register-marked vocabulary, then voice. A sentence that
//! comes out identical produces no change record and is copied verbatim.

pub mod contractions;
pub mod register;
pub mod voice;

use std::sync::Arc;

pub use contractions::ContractionRules;
pub use register::RegisterTable;
pub use voice::{VOICE_REWRITE_PENALTY, is_passive};

use crate::error::TransformResult;
use crate::lexicon::Lexicon;
use crate::options::{Formality, TransformationOptions};
use crate::tagger::LanguageAnalyzer;
use crate::text;
use crate::thresholds::{MIN_SENTENCE_SCORE, clamp_score};
use crate::types::{ChangeKind, StageOutput, TransformationChange};

/// Voice rewrites allowed per call.
pub const MAX_VOICE_REWRITES: usize = 2;

/// Syntax and formality stage.
pub struct SyntaxTransformer {
    analyzer: Arc<dyn LanguageAnalyzer>,
    contractions: ContractionRules,
    register: RegisterTable,
}

impl std::fmt::Debug for SyntaxTransformer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyntaxTransformer")
            .field("contractions", &self.contractions)
            .field("register", &self.register)
            .finish_non_exhaustive()
    }
}

impl SyntaxTransformer {
    /// Stage built from `lexicon`, tagging with `analyzer`.
    pub fn new(analyzer: Arc<dyn LanguageAnalyzer>, lexicon: &Lexicon) -> Self {
        Self {
            analyzer,
            contractions: ContractionRules::new(lexicon),
            register: RegisterTable::new(lexicon),
        }
    }

    /// Rewrite every sentence of `text` toward `options.formality`.
    #[tracing::instrument(name = "syntax", skip_all, fields(text_len = text.len(), formality = %options.formality))]
    pub fn transform(
        &self,
        text: &str,
        options: &TransformationOptions,
    ) -> TransformResult<StageOutput> {
        options.validate()?;

        let spans = self.analyzer.sentence_spans(text);
        let mut voice_budget = MAX_VOICE_REWRITES;
        let mut changes = Vec::new();

        let rewritten = text::rewrite_spans(text, &spans, |_, sentence| {
            let (candidate, voice_rewrites) =
                self.rewrite_sentence(sentence, options, voice_budget);
            voice_budget -= voice_rewrites;
            if candidate == sentence {
                return None;
            }
            let confidence = self.sentence_confidence(&candidate, voice_rewrites);
            changes.push(TransformationChange::new(
                sentence,
                candidate.clone(),
                ChangeKind::Syntax,
                confidence,
            ));
            Some(candidate)
        });

        tracing::debug!(changes = changes.len(), "syntax pass complete");
        Ok(StageOutput {
            text: rewritten,
            changes,
        })
    }

    /// Returns the rewritten sentence and how many voice rewrites it used.
    fn rewrite_sentence(
        &self,
        sentence: &str,
        options: &TransformationOptions,
        voice_budget: usize,
    ) -> (String, usize) {
        let contracted = match options.formality {
            Formality::Formal => self.contractions.expand(sentence),
            Formality::Informal => self.contractions.contract(sentence),
        };
        let (swapped, _) = self
            .register
            .apply(&contracted, self.analyzer.as_ref(), options);

        if voice_budget == 0 {
            return (swapped, 0);
        }
        let voiced = match options.formality {
            Formality::Formal => voice::to_passive(&swapped, self.analyzer.as_ref()),
            Formality::Informal => voice::to_active(&swapped, self.analyzer.as_ref()),
        };
        match voiced {
            Some(voiced) => (voiced, 1),
            None => (swapped, 0),
        }
    }

    /// Share of words the analyzer could tag, floored, times the voice penalty.
    fn sentence_confidence(&self, sentence: &str, voice_rewrites: usize) -> f64 {
        let words = text::extract_words(sentence);
        let refs: Vec<&str> = words.iter().map(String::as_str).collect();
        let tags = self.analyzer.tag_words(&refs);
        let known = if tags.is_empty() {
            1.0
        } else {
            tags.iter().filter(|t| t.is_known()).count() as f64 / tags.len() as f64
        };
        let mut confidence = known.max(MIN_SENTENCE_SCORE);
        for _ in 0..voice_rewrites {
            confidence *= VOICE_REWRITE_PENALTY;
        }
        clamp_score(confidence, MIN_SENTENCE_SCORE)
    }
}
