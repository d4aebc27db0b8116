//! Similarity command: edit distance and word overlap between two texts.

use camino::Utf8PathBuf;
use clap::Args;
use owo_colors::OwoColorize;
use serde::Serialize;
use tracing::{debug, instrument};

use rephrase_core::metrics::{
    EditWeights, lexical_overlap, normalized_similarity, text_similarity, weighted_edit_distance,
};

use super::read_input;

/// Arguments for the `similarity` subcommand.
#[derive(Args, Debug)]
pub struct SimilarityArgs {
    /// First file (`-` reads standard input).
    pub first: Utf8PathBuf,

    /// Second file.
    pub second: Utf8PathBuf,

    /// Cost of inserting a character.
    #[arg(long, default_value_t = 1)]
    pub insertion: usize,

    /// Cost of deleting a character.
    #[arg(long, default_value_t = 1)]
    pub deletion: usize,

    /// Cost of substituting a character.
    #[arg(long, default_value_t = 1)]
    pub substitution: usize,
}

/// Comparison of two texts.
#[derive(Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SimilarityReport {
    /// Weighted character edit distance.
    pub edit_distance: usize,
    /// Edit distance normalized by the longer text.
    pub similarity: f64,
    /// Jaccard overlap of the word sets.
    pub lexical_overlap: f64,
    /// Blend used by the rewrite guard.
    pub blended: f64,
}

impl SimilarityReport {
    /// Compare `a` and `b` under `weights`.
    pub fn compare(a: &str, b: &str, weights: EditWeights) -> Self {
        Self {
            edit_distance: weighted_edit_distance(a, b, weights),
            similarity: normalized_similarity(a, b, weights),
            lexical_overlap: lexical_overlap(a, b),
            blended: text_similarity(a, b),
        }
    }
}

/// Compare two files.
#[instrument(name = "cmd_similarity", skip_all, fields(first = %args.first, second = %args.second))]
pub fn cmd_similarity(
    args: SimilarityArgs,
    global_json: bool,
    max_input_bytes: Option<usize>,
) -> anyhow::Result<()> {
    if args.first.as_str() == super::STDIN_PATH && args.second.as_str() == super::STDIN_PATH {
        anyhow::bail!("only one input can be read from standard input");
    }
    let weights = EditWeights {
        insertion: args.insertion,
        deletion: args.deletion,
        substitution: args.substitution,
    };
    debug!(?weights, "executing similarity command");

    let first = read_input(&args.first, max_input_bytes)?;
    let second = read_input(&args.second, max_input_bytes)?;
    let report = SimilarityReport::compare(first.trim_end(), second.trim_end(), weights);

    if global_json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{}: {}", "Edit distance".dimmed(), report.edit_distance);
        println!("{}: {:.3}", "Similarity".dimmed(), report.similarity);
        println!("{}: {:.3}", "Word overlap".dimmed(), report.lexical_overlap);
        println!("{}: {:.3}", "Blended".bold(), report.blended);
    }
    Ok(())
}
