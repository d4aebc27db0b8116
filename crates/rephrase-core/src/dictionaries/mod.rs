//! Dictionaries for grammatical heuristics.
//!
//! Provides curated verb-form tables used by the tagger, the voice rewriter,
//! and the verifier's tense checks.

pub mod verbs;
