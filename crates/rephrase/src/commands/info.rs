//! Info command implementation

use clap::Args;
use owo_colors::OwoColorize;
use rephrase_core::config::{Config, ConfigSources};
use serde::Serialize;
use tracing::{debug, instrument};

/// Arguments for the `info` subcommand.
#[derive(Args, Debug, Default)]
pub struct InfoArgs {
    // No subcommand-specific arguments; uses global --json flag
}

#[derive(Serialize)]
struct PackageInfo {
    name: &'static str,
    version: &'static str,
    #[serde(skip_serializing_if = "str::is_empty")]
    description: &'static str,
    #[serde(skip_serializing_if = "str::is_empty")]
    repository: &'static str,
    #[serde(skip_serializing_if = "str::is_empty")]
    homepage: &'static str,
    #[serde(skip_serializing_if = "str::is_empty")]
    license: &'static str,
    features: Vec<&'static str>,
}

impl PackageInfo {
    fn new() -> Self {
        let mut features = Vec::new();
        if cfg!(feature = "mcp") {
            features.push("mcp");
        }
        if cfg!(feature = "online") {
            features.push("online");
        }
        Self {
            name: env!("CARGO_PKG_NAME"),
            version: env!("CARGO_PKG_VERSION"),
            description: env!("CARGO_PKG_DESCRIPTION"),
            repository: env!("CARGO_PKG_REPOSITORY"),
            homepage: env!("CARGO_PKG_HOMEPAGE"),
            license: env!("CARGO_PKG_LICENSE"),
            features,
        }
    }
}

#[derive(Serialize)]
struct TransformInfo {
    formality: String,
    emotional_tone: String,
    creativity: f64,
    variety_level: f64,
    context_preservation: f64,
    preserve_intent: bool,
}

#[derive(Serialize)]
struct ConfigInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    config_file: Option<String>,
    log_level: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    log_dir: Option<String>,
    seed: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    thesaurus: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    lexicon: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    rewriter_model: Option<String>,
    transform: TransformInfo,
}

impl ConfigInfo {
    fn from_config(config: &Config, sources: &ConfigSources) -> Self {
        let defaults = &config.transform;
        Self {
            config_file: sources.primary_file().map(|p| p.to_string()),
            log_level: config.log_level.as_str().to_string(),
            log_dir: config.log_dir.as_ref().map(|p| p.to_string()),
            seed: config.markov_seed(),
            thesaurus: config.thesaurus.as_ref().map(|p| p.to_string()),
            lexicon: config.lexicon.as_ref().map(|p| p.to_string()),
            rewriter_model: config.rewriter.as_ref().map(|r| r.model.clone()),
            transform: TransformInfo {
                formality: defaults.formality.to_string(),
                emotional_tone: defaults.emotional_tone.to_string(),
                creativity: defaults.creativity,
                variety_level: defaults.variety_level,
                context_preservation: defaults.context_preservation,
                preserve_intent: defaults.preserve_intent,
            },
        }
    }
}

#[derive(Serialize)]
struct FullInfo {
    #[serde(flatten)]
    package: PackageInfo,
    config: ConfigInfo,
}

/// Print package information
///
/// # Arguments
/// * `global_json` - Global `--json` flag from CLI
/// * `config` - Loaded configuration
/// * `sources` - Config source metadata from loading
#[instrument(name = "cmd_info", skip_all, fields(json_output))]
pub fn cmd_info(
    _args: InfoArgs,
    global_json: bool,
    config: &Config,
    sources: &ConfigSources,
) -> anyhow::Result<()> {
    debug!(json_output = global_json, "executing info command");

    let full_info = FullInfo {
        package: PackageInfo::new(),
        config: ConfigInfo::from_config(config, sources),
    };

    if global_json {
        println!("{}", serde_json::to_string_pretty(&full_info)?);
        return Ok(());
    }

    let package = &full_info.package;
    println!("{} {}", package.name.bold(), package.version.green());
    if !package.description.is_empty() {
        println!("{}", package.description);
    }
    if !package.license.is_empty() {
        println!("{}: {}", "License".dimmed(), package.license);
    }
    if !package.repository.is_empty() {
        println!("{}: {}", "Repository".dimmed(), package.repository.cyan());
    }
    if !package.features.is_empty() {
        println!("{}: {}", "Features".dimmed(), package.features.join(", "));
    }

    let cfg = &full_info.config;
    println!();
    println!("{}", "Configuration".bold().underline());
    match cfg.config_file {
        Some(ref path) => println!("{}: {}", "Config file".dimmed(), path.cyan()),
        None => println!("{}: {}", "Config file".dimmed(), "none loaded".yellow()),
    }
    println!("{}: {}", "Log level".dimmed(), cfg.log_level);
    if let Some(ref dir) = cfg.log_dir {
        println!("{}: {}", "Log directory".dimmed(), dir);
    }
    println!("{}: {}", "Seed".dimmed(), cfg.seed);
    if let Some(ref path) = cfg.thesaurus {
        println!("{}: {}", "Thesaurus".dimmed(), path);
    }
    if let Some(ref path) = cfg.lexicon {
        println!("{}: {}", "Lexicon".dimmed(), path);
    }
    if let Some(ref model) = cfg.rewriter_model {
        println!("{}: {}", "Rewriter model".dimmed(), model);
    }

    let t = &cfg.transform;
    println!();
    println!("{}", "Transform Defaults".bold().underline());
    println!("{}: {}", "Formality".dimmed(), t.formality);
    println!("{}: {}", "Tone".dimmed(), t.emotional_tone);
    println!("{}: {:.2}", "Creativity".dimmed(), t.creativity);
    println!("{}: {:.2}", "Variety".dimmed(), t.variety_level);
    println!("{}: {:.2}", "Context".dimmed(), t.context_preservation);
    println!("{}: {}", "Preserve intent".dimmed(), t.preserve_intent);

    Ok(())
}
