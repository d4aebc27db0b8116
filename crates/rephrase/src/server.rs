//! MCP (Model Context Protocol) server implementation.
//!
//! Exposes the transformation pipeline, authenticity scoring, and text
//! comparison to AI assistants over stdio. The server always runs the offline
//! pipeline: built-in thesaurus plus any configured thesaurus file.
//!
//! Each `#[tool]` method delegates to `rephrase-core`; no transformation
//! logic lives here.

use std::sync::Arc;

use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{CallToolResult, Content, Implementation, ServerCapabilities, ServerInfo};
use rmcp::schemars;
use rmcp::{ErrorData as McpError, ServerHandler, tool, tool_handler, tool_router};

use rephrase_core::config::Config;
use rephrase_core::markdown;
use rephrase_core::metrics::EditWeights;
use rephrase_core::thresholds::AUTHENTICITY_REPAIR_THRESHOLD;
use rephrase_core::{EmotionalTone, Formality, Pipeline, TransformationOptions};

use crate::commands::offline_pipeline;
use crate::commands::similarity::SimilarityReport;
use crate::commands::verify::VerifyReport;

/// Parameters for the `get_info` tool.
#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct GetInfoParams {
    /// Output format: "text" or "json"
    #[serde(default = "default_format")]
    pub format: String,
}

fn default_format() -> String {
    "text".to_string()
}

/// Parameters for the `transform_text` tool.
///
/// Unset style fields fall back to the server's configured defaults.
#[derive(Debug, Default, serde::Deserialize, schemars::JsonSchema)]
pub struct TransformTextParams {
    /// The text to rewrite.
    pub text: String,
    /// Target register: "formal" or "informal".
    pub formality: Option<Formality>,
    /// Target tone: "neutral", "positive", "negative", "professional", or "casual".
    pub emotional_tone: Option<EmotionalTone>,
    /// Synonym selection depth (0-1).
    pub creativity: Option<f64>,
    /// Pressure against reusing replacements (0-1).
    pub variety_level: Option<f64>,
    /// How strictly substitutions must fit their context (0-1).
    pub context_preservation: Option<f64>,
    /// Leave technical and intent-critical words untouched.
    pub preserve_intent: Option<bool>,
    /// Whether to strip markdown formatting first.
    #[serde(default)]
    pub strip_markdown: bool,
}

/// Parameters for the `verify_authenticity` tool.
#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct VerifyAuthenticityParams {
    /// The text to score.
    pub text: String,
    /// Whether to strip markdown formatting first.
    #[serde(default)]
    pub strip_markdown: bool,
}

/// Parameters for the `compare_texts` tool.
#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct CompareTextsParams {
    /// First text.
    pub first: String,
    /// Second text.
    pub second: String,
    /// Cost of inserting a character (default 1).
    pub insertion: Option<usize>,
    /// Cost of deleting a character (default 1).
    pub deletion: Option<usize>,
    /// Cost of substituting a character (default 1).
    pub substitution: Option<usize>,
}

/// MCP server exposing the rephrase pipeline.
#[derive(Clone)]
pub struct RephraseServer {
    pipeline: Arc<Pipeline>,
    defaults: TransformationOptions,
    max_input_bytes: Option<usize>,
    tool_router: rmcp::handler::server::router::tool::ToolRouter<Self>,
}

impl Default for RephraseServer {
    fn default() -> Self {
        Self::new()
    }
}

#[tool_router]
impl RephraseServer {
    /// Server with the default pipeline and options.
    pub fn new() -> Self {
        Self::with_pipeline(
            Pipeline::new(),
            TransformationOptions::default(),
            Some(rephrase_core::DEFAULT_MAX_INPUT_BYTES),
        )
    }

    /// Server wired from loaded configuration.
    pub fn from_config(config: &Config, max_input_bytes: Option<usize>) -> anyhow::Result<Self> {
        let pipeline = offline_pipeline(config, None, None)?;
        Ok(Self::with_pipeline(
            pipeline,
            config.transform.to_options(),
            max_input_bytes,
        ))
    }

    fn with_pipeline(
        pipeline: Pipeline,
        defaults: TransformationOptions,
        max_input_bytes: Option<usize>,
    ) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
            defaults,
            max_input_bytes,
            tool_router: Self::tool_router(),
        }
    }

    fn prepare(&self, text: &str, strip_markdown: bool) -> Result<String, McpError> {
        if let Some(max) = self.max_input_bytes
            && text.len() > max
        {
            return Err(McpError::invalid_params(
                format!("input too large: {} bytes (limit: {max} bytes)", text.len()),
                None,
            ));
        }
        Ok(if strip_markdown {
            markdown::strip_to_prose(text)
        } else {
            text.to_string()
        })
    }

    /// Get project information.
    #[tool(description = "Get project name, version, and description")]
    #[tracing::instrument(skip(self), fields(otel.kind = "server"))]
    fn get_info(
        &self,
        Parameters(params): Parameters<GetInfoParams>,
    ) -> Result<CallToolResult, McpError> {
        tracing::debug!(tool = "get_info", format = %params.format, "executing MCP tool");

        let info = serde_json::json!({
            "name": env!("CARGO_PKG_NAME"),
            "version": env!("CARGO_PKG_VERSION"),
            "description": env!("CARGO_PKG_DESCRIPTION"),
        });

        let text = if params.format == "json" {
            serde_json::to_string_pretty(&info)
                .map_err(|e| McpError::internal_error(format!("serialization error: {e}"), None))?
        } else {
            format!(
                "{} v{}\n{}",
                env!("CARGO_PKG_NAME"),
                env!("CARGO_PKG_VERSION"),
                env!("CARGO_PKG_DESCRIPTION"),
            )
        };

        Ok(CallToolResult::success(vec![Content::text(text)]))
    }

    /// Run the full transformation pipeline.
    #[tool(
        description = "Rewrite text toward a register and tone. Returns the transformed text, every change, a confidence, and an authenticity score."
    )]
    #[tracing::instrument(skip(self, params), fields(otel.kind = "server"))]
    fn transform_text(
        &self,
        Parameters(params): Parameters<TransformTextParams>,
    ) -> Result<CallToolResult, McpError> {
        let text = self.prepare(&params.text, params.strip_markdown)?;
        let mut options = self.defaults;
        if let Some(formality) = params.formality {
            options.formality = formality;
        }
        if let Some(tone) = params.emotional_tone {
            options.emotional_tone = tone;
        }
        if let Some(creativity) = params.creativity {
            options.creativity = creativity;
        }
        if let Some(variety) = params.variety_level {
            options.variety_level = variety;
        }
        if let Some(context) = params.context_preservation {
            options.context_preservation = context;
        }
        if let Some(preserve) = params.preserve_intent {
            options.preserve_intent = preserve;
        }
        options
            .validate()
            .map_err(|e| McpError::invalid_params(e.to_string(), None))?;
        tracing::debug!(tool = "transform_text", ?options, "executing MCP tool");

        let result = self.pipeline.transform(&text, &options);
        let json = serde_json::to_string_pretty(&result)
            .map_err(|e| McpError::internal_error(format!("serialization error: {e}"), None))?;

        tracing::info!(
            tool = "transform_text",
            changes = result.transformations.len(),
            confidence = result.confidence,
            "MCP tool completed"
        );
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    /// Score authenticity without rewriting.
    #[tool(
        description = "Score how naturally human a text reads. Returns overall and per-dimension scores, descriptive features, and the dominant tone."
    )]
    #[tracing::instrument(skip(self, params), fields(otel.kind = "server"))]
    fn verify_authenticity(
        &self,
        Parameters(params): Parameters<VerifyAuthenticityParams>,
    ) -> Result<CallToolResult, McpError> {
        let text = self.prepare(&params.text, params.strip_markdown)?;
        let authenticity = self.pipeline.verify(&text);
        let report = VerifyReport {
            below_repair_threshold: authenticity.overall < AUTHENTICITY_REPAIR_THRESHOLD,
            dominant_tone: self.pipeline.dominant_tone(&text),
            authenticity,
        };
        let json = serde_json::to_string_pretty(&report)
            .map_err(|e| McpError::internal_error(format!("serialization error: {e}"), None))?;

        tracing::info!(
            tool = "verify_authenticity",
            overall = report.authenticity.overall,
            "MCP tool completed"
        );
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    /// Compare two texts.
    #[tool(
        description = "Compare two texts. Returns weighted edit distance, normalized similarity, and word overlap."
    )]
    #[tracing::instrument(skip(self, params), fields(otel.kind = "server"))]
    fn compare_texts(
        &self,
        Parameters(params): Parameters<CompareTextsParams>,
    ) -> Result<CallToolResult, McpError> {
        let first = self.prepare(&params.first, false)?;
        let second = self.prepare(&params.second, false)?;
        let defaults = EditWeights::UNIT;
        let weights = EditWeights {
            insertion: params.insertion.unwrap_or(defaults.insertion),
            deletion: params.deletion.unwrap_or(defaults.deletion),
            substitution: params.substitution.unwrap_or(defaults.substitution),
        };
        let report = SimilarityReport::compare(&first, &second, weights);
        let json = serde_json::to_string_pretty(&report)
            .map_err(|e| McpError::internal_error(format!("serialization error: {e}"), None))?;

        tracing::info!(
            tool = "compare_texts",
            distance = report.edit_distance,
            "MCP tool completed"
        );
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }
}

#[tool_handler]
impl ServerHandler for RephraseServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: Default::default(),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: env!("CARGO_PKG_NAME").to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                ..Default::default()
            },
            instructions: Some(format!(
                "{} MCP server. Use transform_text to rewrite prose, verify_authenticity to score it, and compare_texts to measure drift.",
                env!("CARGO_PKG_NAME"),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rmcp::model::RawContent;

    /// Extract text from the first content item in a `CallToolResult`.
    fn extract_text(result: &CallToolResult) -> Option<&str> {
        result.content.first().and_then(|c| match &c.raw {
            RawContent::Text(t) => Some(t.text.as_str()),
            _ => None,
        })
    }

    fn json_of(result: &CallToolResult) -> serde_json::Value {
        assert!(!result.is_error.unwrap_or(false));
        let text = extract_text(result).expect("should have text content");
        serde_json::from_str(text).expect("valid JSON")
    }

    #[test]
    fn server_info_has_correct_name() {
        let server = RephraseServer::new();
        let info = ServerHandler::get_info(&server);
        assert_eq!(info.server_info.name, env!("CARGO_PKG_NAME"));
        assert_eq!(info.server_info.version, env!("CARGO_PKG_VERSION"));
        assert!(info.capabilities.tools.is_some());
    }

    #[test]
    fn get_info_tool_returns_json_when_requested() {
        let server = RephraseServer::new();
        let params = Parameters(GetInfoParams {
            format: "json".to_string(),
        });
        let result = server.get_info(params).expect("get_info should succeed");
        let json = json_of(&result);
        assert_eq!(json["name"], env!("CARGO_PKG_NAME"));
    }

    #[test]
    fn transform_text_expands_contractions() {
        let server = RephraseServer::new();
        let params = Parameters(TransformTextParams {
            text: "We don't think it's ready.".to_string(),
            creativity: Some(0.0),
            ..TransformTextParams::default()
        });
        let result = server
            .transform_text(params)
            .expect("transform_text should succeed");
        let json = json_of(&result);
        let transformed = json["transformedText"].as_str().unwrap();
        assert!(!transformed.contains("n't"), "{transformed}");
        assert_eq!(json["originalText"], "We don't think it's ready.");
        let confidence = json["confidence"].as_f64().unwrap();
        assert!((0.0..=1.0).contains(&confidence));
    }

    #[test]
    fn transform_text_rejects_out_of_range_options() {
        let server = RephraseServer::new();
        let params = Parameters(TransformTextParams {
            text: "Hello there.".to_string(),
            creativity: Some(3.0),
            ..TransformTextParams::default()
        });
        assert!(server.transform_text(params).is_err());
    }

    #[test]
    fn oversized_input_is_rejected() {
        let server = RephraseServer::with_pipeline(
            Pipeline::new(),
            TransformationOptions::default(),
            Some(8),
        );
        let params = Parameters(VerifyAuthenticityParams {
            text: "This sentence is longer than eight bytes.".to_string(),
            strip_markdown: false,
        });
        assert!(server.verify_authenticity(params).is_err());
    }

    #[test]
    fn verify_authenticity_reports_scores() {
        let server = RephraseServer::new();
        let params = Parameters(VerifyAuthenticityParams {
            text: "# Notes\n\nThe team shipped the release. However, the docs lag behind."
                .to_string(),
            strip_markdown: true,
        });
        let result = server
            .verify_authenticity(params)
            .expect("verify_authenticity should succeed");
        let json = json_of(&result);
        let overall = json["authenticity"]["overall"].as_f64().unwrap();
        assert!((0.0..=1.0).contains(&overall));
        assert!(json["dominantTone"].is_string());
        assert!(json["belowRepairThreshold"].is_boolean());
    }

    #[test]
    fn compare_texts_uses_weights() {
        let server = RephraseServer::new();
        let params = Parameters(CompareTextsParams {
            first: "kitten".to_string(),
            second: "sitting".to_string(),
            insertion: None,
            deletion: None,
            substitution: None,
        });
        let result = server
            .compare_texts(params)
            .expect("compare_texts should succeed");
        let json = json_of(&result);
        assert_eq!(json["editDistance"], 3);
    }
}
