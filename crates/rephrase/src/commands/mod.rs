//! Command implementations.

use std::io::Read;
use std::sync::Arc;

use anyhow::Context;
use camino::Utf8Path;
use rephrase_core::config::Config;
use rephrase_core::markdown;
use rephrase_core::{Lexicon, Pipeline, PipelineBuilder, Thesaurus};

pub mod info;
pub mod similarity;
pub mod transform;
pub mod verify;
#[cfg(feature = "mcp")]
pub mod serve;

/// Path argument that means "read standard input".
pub const STDIN_PATH: &str = "-";

/// Read a file (or stdin for `-`) and validate its size against the configured limit.
pub fn read_input(path: &Utf8Path, max_bytes: Option<usize>) -> anyhow::Result<String> {
    if path.as_str() == STDIN_PATH {
        let mut content = String::new();
        std::io::stdin()
            .read_to_string(&mut content)
            .context("failed to read standard input")?;
        check_size("standard input", content.len(), max_bytes)?;
        return Ok(content);
    }

    // Preflight: check file size via metadata before reading into memory.
    let metadata =
        std::fs::metadata(path.as_std_path()).with_context(|| format!("failed to read {path}"))?;
    check_size(path.as_str(), metadata.len() as usize, max_bytes)?;

    std::fs::read_to_string(path.as_std_path()).with_context(|| format!("failed to read {path}"))
}

/// Read an input and reduce it to prose when it is markdown.
pub fn read_prose(
    path: &Utf8Path,
    force_markdown: bool,
    max_bytes: Option<usize>,
) -> anyhow::Result<String> {
    let content = read_input(path, max_bytes)?;
    if force_markdown || is_markdown(path) {
        Ok(markdown::strip_to_prose(&content))
    } else {
        Ok(content)
    }
}

fn is_markdown(path: &Utf8Path) -> bool {
    matches!(path.extension(), Some("md" | "markdown"))
}

fn check_size(name: &str, size: usize, max_bytes: Option<usize>) -> anyhow::Result<()> {
    if let Some(max) = max_bytes
        && size > max
    {
        anyhow::bail!("input too large: {name} is {size} bytes (limit: {max} bytes)");
    }
    Ok(())
}

/// The configured thesaurus: built-in vocabulary plus any extra file.
pub fn load_thesaurus(config: &Config, extra: Option<&Utf8Path>) -> anyhow::Result<Thesaurus> {
    let mut thesaurus = Thesaurus::builtin();
    for path in config.thesaurus.as_deref().into_iter().chain(extra) {
        thesaurus
            .extend_from_file(path)
            .with_context(|| format!("failed to load thesaurus {path}"))?;
    }
    Ok(thesaurus)
}

/// Pipeline builder carrying the configured lexicon and seed.
pub fn configured_builder(config: &Config, seed: Option<u64>) -> anyhow::Result<PipelineBuilder> {
    let mut builder = Pipeline::builder().with_seed(seed.unwrap_or_else(|| config.markov_seed()));
    if let Some(path) = config.lexicon.as_deref() {
        let lexicon =
            Lexicon::from_file(path).with_context(|| format!("failed to load lexicon {path}"))?;
        builder = builder.with_lexicon(lexicon);
    }
    Ok(builder)
}

/// Offline pipeline wired from configuration.
pub fn offline_pipeline(
    config: &Config,
    extra_thesaurus: Option<&Utf8Path>,
    seed: Option<u64>,
) -> anyhow::Result<Pipeline> {
    let thesaurus = load_thesaurus(config, extra_thesaurus)?;
    Ok(configured_builder(config, seed)?
        .with_provider(Arc::new(thesaurus))
        .build())
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8PathBuf;
    use std::fs;
    use tempfile::TempDir;

    fn utf8(path: std::path::PathBuf) -> Utf8PathBuf {
        Utf8PathBuf::try_from(path).unwrap()
    }

    #[test]
    fn oversized_file_is_rejected() {
        let tmp = TempDir::new().unwrap();
        let path = utf8(tmp.path().join("big.txt"));
        fs::write(&path, "x".repeat(64)).unwrap();
        let err = read_input(&path, Some(10)).unwrap_err();
        assert!(err.to_string().contains("input too large"));
        assert!(read_input(&path, None).is_ok());
    }

    #[test]
    fn markdown_is_detected_by_extension() {
        let tmp = TempDir::new().unwrap();
        let path = utf8(tmp.path().join("note.md"));
        fs::write(&path, "# Title\n\nBody text.\n\n```\ncode\n```").unwrap();
        assert_eq!(read_prose(&path, false, None).unwrap(), "Body text.");
    }

    #[test]
    fn plain_text_is_untouched() {
        let tmp = TempDir::new().unwrap();
        let path = utf8(tmp.path().join("note.txt"));
        fs::write(&path, "# not a heading here").unwrap();
        assert_eq!(
            read_prose(&path, false, None).unwrap(),
            "# not a heading here"
        );
    }

    #[test]
    fn missing_thesaurus_is_an_error() {
        let config = Config::default();
        let missing = Utf8PathBuf::from("/definitely/not/here.toml");
        let err = load_thesaurus(&config, Some(&missing)).unwrap_err();
        assert!(err.to_string().contains("failed to load thesaurus"));
    }

    #[test]
    fn extra_thesaurus_extends_builtin() {
        let tmp = TempDir::new().unwrap();
        let path = utf8(tmp.path().join("extra.toml"));
        fs::write(&path, "[[widget]]\nword = \"gadget\"\nscore = 0.9\n").unwrap();
        let thesaurus = load_thesaurus(&Config::default(), Some(&path)).unwrap();
        assert_eq!(thesaurus.len(), Thesaurus::builtin().len() + 1);
    }
}
