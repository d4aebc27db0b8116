//! Verify command: authenticity scoring without rewriting.

use camino::Utf8PathBuf;
use clap::Args;
use owo_colors::OwoColorize;
use serde::Serialize;
use tracing::{debug, instrument};

use rephrase_core::config::Config;
use rephrase_core::thresholds::AUTHENTICITY_REPAIR_THRESHOLD;
use rephrase_core::{AuthenticityScore, EmotionalTone};

use super::{offline_pipeline, read_prose};

/// Arguments for the `verify` subcommand.
#[derive(Args, Debug)]
pub struct VerifyArgs {
    /// File to score (`-` reads standard input).
    pub input: Utf8PathBuf,

    /// Treat the input as markdown even without a `.md` extension.
    #[arg(long)]
    pub markdown: bool,

    /// Fail when the overall score is below this value.
    #[arg(long, value_parser = super::transform::unit_interval)]
    pub min_score: Option<f64>,
}

/// Authenticity plus the dominant tone.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyReport {
    /// Composite score.
    pub authenticity: AuthenticityScore,
    /// Tone with the most pattern matches.
    pub dominant_tone: EmotionalTone,
    /// Whether the pipeline would attempt a Markov repair on this text.
    pub below_repair_threshold: bool,
}

/// Score a text and print the breakdown.
#[instrument(name = "cmd_verify", skip_all, fields(input = %args.input))]
pub fn cmd_verify(
    args: VerifyArgs,
    global_json: bool,
    config: &Config,
    max_input_bytes: Option<usize>,
) -> anyhow::Result<()> {
    debug!(min_score = ?args.min_score, "executing verify command");

    let text = read_prose(&args.input, args.markdown, max_input_bytes)?;
    let pipeline = offline_pipeline(config, None, None)?;
    let authenticity = pipeline.verify(&text);
    let report = VerifyReport {
        below_repair_threshold: authenticity.overall < AUTHENTICITY_REPAIR_THRESHOLD,
        dominant_tone: pipeline.dominant_tone(&text),
        authenticity,
    };

    if global_json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }

    if let Some(min) = args.min_score
        && report.authenticity.overall < min
    {
        anyhow::bail!(
            "{} scores {:.2} (min: {:.2})",
            args.input,
            report.authenticity.overall,
            min
        );
    }
    Ok(())
}

fn print_report(report: &VerifyReport) {
    let score = &report.authenticity;
    let overall = format!("{:.2}", score.overall);
    if report.below_repair_threshold {
        println!("{}: {}", "Authenticity".bold(), overall.yellow());
    } else {
        println!("{}: {}", "Authenticity".bold(), overall.green());
    }
    println!("  {:<22}{:.2}", "language naturalness", score.language_naturalness);
    println!("  {:<22}{:.2}", "stylistic consistency", score.stylistic);
    println!("  {:<22}{:.2}", "pattern variation", score.pattern_variation);
    println!("  {:<22}{:.2}", "emotional coherence", score.emotional_coherence);
    println!("{}: {}", "Dominant tone".dimmed(), report.dominant_tone);
    if !score.features.is_empty() {
        let features: Vec<&str> = score.features.iter().map(String::as_str).collect();
        println!("{}: {}", "Features".dimmed(), features.join(", "));
    }
}
