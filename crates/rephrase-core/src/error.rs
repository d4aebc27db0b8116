//! Error types for rephrase-core.

use camino::Utf8PathBuf;
use thiserror::Error;

use crate::pipeline::Stage;

/// Errors that can occur when working with configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to deserialize configuration.
    #[error("invalid configuration: {0}")]
    Deserialize(#[from] Box<figment::Error>),

    /// Configuration file not found after searching all locations.
    #[error("no configuration file found")]
    NotFound,

    /// A thesaurus file named in configuration does not exist.
    #[error("thesaurus file not found: {path}")]
    ThesaurusMissing {
        /// The path that was requested.
        path: Utf8PathBuf,
    },

    /// A thesaurus file exists but could not be parsed.
    #[error("invalid thesaurus file {path}: {source}")]
    ThesaurusFormat {
        /// The file that failed to parse.
        path: Utf8PathBuf,
        /// The underlying parse error.
        source: Box<figment::Error>,
    },

    /// A lexicon file named in configuration does not exist.
    #[error("lexicon file not found: {path}")]
    LexiconMissing {
        /// The path that was requested.
        path: Utf8PathBuf,
    },

    /// A lexicon file exists but could not be parsed.
    #[error("invalid lexicon file {path}: {source}")]
    LexiconFormat {
        /// The file that failed to parse.
        path: Utf8PathBuf,
        /// The underlying parse error.
        source: Box<figment::Error>,
    },

    /// A lexicon table holds a pattern that does not compile.
    #[error("invalid pattern in lexicon table {table}: {reason}")]
    LexiconPattern {
        /// The table holding the pattern.
        table: &'static str,
        /// Why the pattern was refused.
        reason: String,
    },
}

/// Result type alias using [`ConfigError`].
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Errors raised by a synonym lookup collaborator.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProviderError {
    /// The lookup service could not be reached.
    #[error("synonym lookup unavailable: {0}")]
    Unavailable(String),

    /// The lookup service answered with something unusable.
    #[error("invalid synonym response: {0}")]
    InvalidResponse(String),
}

/// Errors raised by a generative rewrite collaborator.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RewriteError {
    /// No rewrite backend is configured or reachable.
    #[error("generative rewrite unavailable: {0}")]
    Unavailable(String),

    /// The backend failed while producing a rewrite.
    #[error("generative rewrite failed: {0}")]
    Failed(String),

    /// The rewrite drifted too far from its input and was discarded.
    #[error("generative rewrite rejected (similarity {similarity:.2}, length ratio {length_ratio:.2})")]
    Rejected {
        /// Blended similarity between input and rewrite.
        similarity: f64,
        /// Rewrite length divided by input length.
        length_ratio: f64,
    },
}

/// Errors raised inside a transformation stage.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TransformError {
    /// A numeric option is outside `[0, 1]` or not finite.
    #[error("option {field} must be a finite value in [0, 1], got {value}")]
    InvalidOptions {
        /// The offending option name.
        field: &'static str,
        /// The value that was supplied.
        value: f64,
    },

    /// Scoring a word produced NaN or infinity.
    #[error("non-finite score while ranking synonyms for {word:?}")]
    NonFiniteScore {
        /// The word being scored.
        word: String,
    },

    /// The synonym lookup collaborator failed.
    #[error(transparent)]
    Provider(#[from] ProviderError),

    /// The generative rewrite collaborator failed.
    #[error(transparent)]
    Rewrite(#[from] RewriteError),
}

/// Result type alias using [`TransformError`].
pub type TransformResult<T> = Result<T, TransformError>;

/// Errors returned by the cancellable pipeline entry point.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineError {
    /// The cancellation token fired before `stage` started.
    #[error("transformation cancelled before the {stage} stage")]
    Cancelled {
        /// The stage that would have run next.
        stage: Stage,
    },
}

/// Result type alias using [`PipelineError`].
pub type PipelineResult<T> = Result<T, PipelineError>;
