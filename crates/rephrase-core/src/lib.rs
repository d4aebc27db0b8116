//! Core library for rephrase.
//!
//! This crate holds the text transformation pipeline used by the `rephrase`
//! CLI and MCP server: word-level synonym substitution, syntax and register
//! rewriting, tone adjustment, an optional generative rewrite, Markov
//! perturbation, and authenticity scoring.
//!
//! # Modules
//!
//! - [`pipeline`] - Stage orchestration and confidence scoring
//! - [`word_level`] / [`ranking`] - Synonym selection
//! - [`syntax`] - Formality, contractions, and voice
//! - [`tone`] - Sentiment classification and tone rewriting
//! - [`perturbation`] - Markov resampling and edit distance
//! - [`verify`] - Authenticity scoring
//! - [`config`] - Configuration loading and management
//! - [`error`] - Error types and result aliases
//!
//! # Quick Start
//!
//! ```no_run
//! use rephrase_core::{Formality, Pipeline, TransformationOptions};
//!
//! let pipeline = Pipeline::new();
//! let options = TransformationOptions {
//!     formality: Formality::Informal,
//!     ..TransformationOptions::default()
//! };
//! let result = pipeline.transform("I do not think it is ready.", &options);
//! println!("{} ({:.2})", result.transformed_text, result.confidence);
//! ```
#![deny(unsafe_code)]

pub mod config;
pub mod dictionaries;
pub mod error;
pub mod lexicon;
pub mod markdown;
pub mod metrics;
pub mod options;
pub mod perturbation;
pub mod pipeline;
pub mod provider;
pub mod ranking;
pub mod syntax;
pub mod tagger;
pub mod text;
pub mod thresholds;
pub mod tone;
pub mod types;
pub mod verify;
pub mod word_level;

pub use config::{Config, ConfigLoader, LogLevel, RewriterConfig, TransformDefaults};
pub use error::{
    ConfigError, ConfigResult, PipelineError, PipelineResult, ProviderError, RewriteError,
    TransformError, TransformResult,
};
pub use lexicon::{Lexicon, LexiconTables};
pub use options::{EmotionalTone, Formality, TransformationOptions};
pub use pipeline::{CancellationToken, Pipeline, PipelineBuilder, Stage};
pub use provider::{GenerativeRewriter, SynonymProvider, Thesaurus};
pub use tagger::{HeuristicAnalyzer, LanguageAnalyzer, PosTag};
pub use types::{
    ChangeKind, SynonymCandidate, TransformationChange, TransformationResult, WordContext,
};
pub use verify::{AuthenticityScore, AuthenticityVerifier};

/// Default maximum input size in bytes (5 MiB).
pub const DEFAULT_MAX_INPUT_BYTES: usize = 5 * 1024 * 1024;
