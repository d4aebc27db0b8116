//! Transform command: run the full pipeline over a text.

use anyhow::Context;
use camino::Utf8PathBuf;
use clap::Args;
use owo_colors::OwoColorize;
use tracing::{debug, instrument};

use rephrase_core::config::Config;
use rephrase_core::{
    ChangeKind, EmotionalTone, Formality, Pipeline, TransformationOptions, TransformationResult,
};

use super::{offline_pipeline, read_prose};

/// Arguments for the `transform` subcommand.
#[derive(Args, Debug, Default)]
pub struct TransformArgs {
    /// File to transform (`-` reads standard input).
    pub input: Utf8PathBuf,

    /// Target register.
    #[arg(long, value_enum)]
    pub formality: Option<Formality>,

    /// Target emotional tone.
    #[arg(long, value_enum)]
    pub tone: Option<EmotionalTone>,

    /// How far down the ranked synonyms selection may reach (0-1).
    #[arg(long, value_parser = unit_interval)]
    pub creativity: Option<f64>,

    /// Pressure against reusing replacements (0-1).
    #[arg(long, value_parser = unit_interval)]
    pub variety: Option<f64>,

    /// How strictly substitutions must fit their context (0-1).
    #[arg(long, value_parser = unit_interval)]
    pub context: Option<f64>,

    /// Allow rewriting technical and intent-critical words.
    #[arg(long)]
    pub no_preserve_intent: bool,

    /// Seed for Markov sampling.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Extra thesaurus file (TOML, YAML, or JSON).
    #[arg(long, value_name = "FILE")]
    pub thesaurus: Option<Utf8PathBuf>,

    /// Treat the input as markdown even without a `.md` extension.
    #[arg(long)]
    pub markdown: bool,

    /// List every change after the text.
    #[arg(long)]
    pub changes: bool,

    /// Use the online synonym service and configured generative rewriter.
    #[cfg(feature = "online")]
    #[arg(long)]
    pub online: bool,
}

impl TransformArgs {
    /// Config defaults with any flags applied on top.
    pub fn options(&self, config: &Config) -> TransformationOptions {
        let mut options = config.transform.to_options();
        if let Some(formality) = self.formality {
            options.formality = formality;
        }
        if let Some(tone) = self.tone {
            options.emotional_tone = tone;
        }
        if let Some(creativity) = self.creativity {
            options.creativity = creativity;
        }
        if let Some(variety) = self.variety {
            options.variety_level = variety;
        }
        if let Some(context) = self.context {
            options.context_preservation = context;
        }
        if self.no_preserve_intent {
            options.preserve_intent = false;
        }
        options
    }
}

/// Parse a number in `[0, 1]`.
pub fn unit_interval(raw: &str) -> Result<f64, String> {
    let value: f64 = raw.parse().map_err(|_| format!("`{raw}` is not a number"))?;
    if (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(format!("{value} is outside 0..=1"))
    }
}

/// Rewrite a text and print the result.
#[instrument(name = "cmd_transform", skip_all, fields(input = %args.input))]
pub fn cmd_transform(
    args: TransformArgs,
    global_json: bool,
    config: &Config,
    max_input_bytes: Option<usize>,
) -> anyhow::Result<()> {
    let options = args.options(config);
    options
        .validate()
        .context("invalid transformation options")?;
    debug!(?options, "executing transform command");

    let text = read_prose(&args.input, args.markdown, max_input_bytes)?;
    let pipeline = build_pipeline(&args, config)?;
    let result = pipeline.transform(&text, &options);

    if global_json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!("{}", result.transformed_text);
        if args.changes {
            print_changes(&result);
        }
    }
    Ok(())
}

#[cfg(not(feature = "online"))]
fn build_pipeline(args: &TransformArgs, config: &Config) -> anyhow::Result<Pipeline> {
    offline_pipeline(config, args.thesaurus.as_deref(), args.seed)
}

#[cfg(feature = "online")]
fn build_pipeline(args: &TransformArgs, config: &Config) -> anyhow::Result<Pipeline> {
    use std::sync::Arc;

    use crate::online::{ChatRewriter, DatamuseProvider};

    if !args.online {
        return offline_pipeline(config, args.thesaurus.as_deref(), args.seed);
    }
    let mut builder = super::configured_builder(config, args.seed)?
        .with_provider(Arc::new(DatamuseProvider::new()?));
    if let Some(settings) = &config.rewriter {
        builder = builder.with_rewriter(Arc::new(ChatRewriter::from_config(settings)?));
    }
    Ok(builder.build())
}

fn print_changes(result: &TransformationResult) {
    println!();
    if result.transformations.is_empty() {
        println!("{}", "No changes.".dimmed());
    }
    for change in &result.transformations {
        let kind = match change.kind {
            ChangeKind::Word => change.kind.as_str().cyan().to_string(),
            ChangeKind::Syntax => change.kind.as_str().magenta().to_string(),
            ChangeKind::Emotional => change.kind.as_str().yellow().to_string(),
        };
        println!(
            "{:>9}  {} -> {}  {}",
            kind,
            change.original.red(),
            change.replacement.green(),
            format!("({:.2})", change.confidence).dimmed(),
        );
    }
    println!("{}: {:.2}", "Confidence".dimmed(), result.confidence);
    if let Some(score) = &result.authenticity {
        println!("{}: {:.2}", "Authenticity".dimmed(), score.overall);
    }
}
