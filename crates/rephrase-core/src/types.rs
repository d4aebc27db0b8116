//! Data model shared by the pipeline stages.

use std::collections::BTreeSet;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::tagger::PosTag;
use crate::verify::AuthenticityScore;

/// A word together with its immediate neighbors in one sentence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct WordContext {
    /// The bare word (punctuation peeled off).
    pub word: String,
    /// The word before this one in the same sentence.
    pub previous_word: Option<String>,
    /// The word after this one in the same sentence.
    pub next_word: Option<String>,
    /// Tag assigned by the language analyzer.
    pub part_of_speech: PosTag,
    /// Technical term that should anchor the sentence.
    pub is_important_term: bool,
}

impl WordContext {
    /// Whether the word has at least one neighbor.
    pub const fn has_neighbors(&self) -> bool {
        self.previous_word.is_some() || self.next_word.is_some()
    }
}

/// A replacement offered by a synonym lookup collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SynonymCandidate {
    /// The replacement word.
    pub word: String,
    /// Lookup score, normalized to `[0, 1]`.
    pub base_score: f64,
    /// Grammatical tags reported by the lookup (`noun`, `verb`, ...).
    #[serde(default)]
    pub grammatical_tags: BTreeSet<String>,
    /// Context-fit score filled in by the word-level stage.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context_preservation_score: Option<f64>,
}

impl SynonymCandidate {
    /// Candidate with no tags and no context score.
    pub fn new(word: impl Into<String>, base_score: f64) -> Self {
        Self {
            word: word.into(),
            base_score,
            grammatical_tags: BTreeSet::new(),
            context_preservation_score: None,
        }
    }

    /// Add grammatical tags.
    #[must_use]
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.grammatical_tags.extend(tags.into_iter().map(Into::into));
        self
    }

    /// Whether any tag parses to `tag`.
    pub fn has_tag(&self, tag: PosTag) -> bool {
        self.grammatical_tags
            .iter()
            .any(|t| PosTag::from_label(t) == tag)
    }
}

/// A candidate scored against the requested style.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct RankedSynonym {
    /// The underlying candidate.
    #[serde(flatten)]
    pub candidate: SynonymCandidate,
    /// Blended tone, formality, and context score.
    pub context_score: f64,
}

impl RankedSynonym {
    /// The replacement word.
    pub fn word(&self) -> &str {
        &self.candidate.word
    }
}

/// Which stage produced a change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    /// Word-level synonym substitution.
    Word,
    /// Sentence-level syntax or register rewrite.
    Syntax,
    /// Tone adjustment.
    Emotional,
}

impl ChangeKind {
    /// Returns the kind as a lowercase string slice.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Word => "word",
            Self::Syntax => "syntax",
            Self::Emotional => "emotional",
        }
    }
}

impl std::fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One recorded rewrite.
///
/// `original` is always a literal substring of the text the producing stage
/// received.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct TransformationChange {
    /// Text that was replaced.
    pub original: String,
    /// Text that replaced it.
    pub replacement: String,
    /// Producing stage.
    #[serde(rename = "type")]
    pub kind: ChangeKind,
    /// Reliability estimate in `[MIN_CONFIDENCE, 1]`.
    pub confidence: f64,
}

impl TransformationChange {
    /// Build a change record.
    pub fn new(
        original: impl Into<String>,
        replacement: impl Into<String>,
        kind: ChangeKind,
        confidence: f64,
    ) -> Self {
        Self {
            original: original.into(),
            replacement: replacement.into(),
            kind,
            confidence,
        }
    }
}

/// Text and change list produced by one stage.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StageOutput {
    /// Rewritten text.
    pub text: String,
    /// Changes in input order.
    pub changes: Vec<TransformationChange>,
}

impl StageOutput {
    /// Output that leaves `text` untouched.
    pub fn identity(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            changes: Vec::new(),
        }
    }
}

/// What the pipeline returns to its caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct TransformationResult {
    /// Input exactly as received.
    pub original_text: String,
    /// Final text.
    pub transformed_text: String,
    /// Overall confidence.
    pub confidence: f64,
    /// Every recorded change, stage by stage in input order.
    pub transformations: Vec<TransformationChange>,
    /// Authenticity of the final text when scoring ran.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authenticity: Option<AuthenticityScore>,
}

impl TransformationResult {
    /// Result returned when the pipeline gives up: input verbatim, confidence 1.
    pub fn unchanged(text: &str) -> Self {
        Self {
            original_text: text.to_string(),
            transformed_text: text.to_string(),
            confidence: 1.0,
            transformations: Vec::new(),
            authenticity: None,
        }
    }

    /// Changes of one kind.
    pub fn changes_of(&self, kind: ChangeKind) -> impl Iterator<Item = &TransformationChange> {
        self.transformations.iter().filter(move |c| c.kind == kind)
    }
}
