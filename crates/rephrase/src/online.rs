//! Network-backed collaborators.
//!
//! [`DatamuseProvider`] looks synonyms up in the Datamuse word service and
//! [`ChatRewriter`] sends text to an OpenAI-compatible chat completions
//! endpoint. Both use blocking HTTP and are only wired into the `transform`
//! command; failures surface as collaborator errors, which the pipeline turns
//! into identity fallbacks.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use anyhow::Context;
use reqwest::blocking::Client;
use reqwest::header::AUTHORIZATION;
use serde::{Deserialize, Serialize};

use rephrase_core::config::RewriterConfig;
use rephrase_core::{
    Formality, GenerativeRewriter, ProviderError, RewriteError, SynonymCandidate,
    SynonymProvider, TransformationOptions,
};

const DATAMUSE_URL: &str = "https://api.datamuse.com/words";
const DATAMUSE_TIMEOUT: Duration = Duration::from_secs(10);
const MIN_CALL_INTERVAL: Duration = Duration::from_millis(100);
const DATAMUSE_SCORE_SCALE: f64 = 100_000.0;

#[derive(Debug, Deserialize)]
struct DatamuseWord {
    word: String,
    #[serde(default)]
    score: f64,
    #[serde(default)]
    tags: Vec<String>,
}

impl DatamuseWord {
    fn into_candidate(self) -> SynonymCandidate {
        let tags = self.tags.iter().filter_map(|t| part_of_speech(t));
        SynonymCandidate::new(self.word, (self.score / DATAMUSE_SCORE_SCALE).clamp(0.0, 1.0))
            .with_tags(tags)
    }
}

/// Datamuse part-of-speech codes to tag labels.
fn part_of_speech(code: &str) -> Option<&'static str> {
    match code {
        "n" => Some("noun"),
        "v" => Some("verb"),
        "adj" => Some("adjective"),
        "adv" => Some("adverb"),
        _ => None,
    }
}

/// Synonym lookup against the Datamuse API.
///
/// Responses are cached per word for the life of the provider and calls are
/// spaced at least 100 ms apart.
#[derive(Debug)]
pub struct DatamuseProvider {
    client: Client,
    base_url: String,
    cache: Mutex<HashMap<String, Vec<SynonymCandidate>>>,
    last_call: Mutex<Option<Instant>>,
}

impl DatamuseProvider {
    /// Provider pointed at the public Datamuse endpoint.
    pub fn new() -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(DATAMUSE_TIMEOUT)
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self {
            client,
            base_url: DATAMUSE_URL.to_string(),
            cache: Mutex::new(HashMap::new()),
            last_call: Mutex::new(None),
        })
    }

    /// Point the provider at another Datamuse-compatible endpoint.
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    fn throttle(&self) {
        let mut last = self.last_call.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(previous) = *last {
            let elapsed = previous.elapsed();
            if elapsed < MIN_CALL_INTERVAL {
                std::thread::sleep(MIN_CALL_INTERVAL - elapsed);
            }
        }
        *last = Some(Instant::now());
    }

    fn fetch(&self, word: &str) -> Result<Vec<SynonymCandidate>, ProviderError> {
        self.throttle();
        let response = self
            .client
            .get(&self.base_url)
            .query(&[("rel_syn", word), ("md", "p")])
            .send()
            .map_err(|e| ProviderError::Unavailable(format!("Datamuse request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::Unavailable(format!(
                "Datamuse API error: {status}"
            )));
        }

        let words: Vec<DatamuseWord> = response
            .json()
            .map_err(|e| ProviderError::InvalidResponse(format!("Datamuse parse failed: {e}")))?;
        Ok(words.into_iter().map(DatamuseWord::into_candidate).collect())
    }
}

impl SynonymProvider for DatamuseProvider {
    #[tracing::instrument(skip(self))]
    fn synonyms(&self, word: &str) -> Result<Vec<SynonymCandidate>, ProviderError> {
        let key = word.to_lowercase();
        if let Some(hit) = self
            .cache
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(&key)
        {
            return Ok(hit.clone());
        }
        let candidates = self.fetch(&key)?;
        tracing::debug!(count = candidates.len(), "synonyms fetched");
        self.cache
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(key, candidates.clone());
        Ok(candidates)
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    temperature: f64,
}

#[derive(Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessageResponse,
}

#[derive(Deserialize)]
struct ChatMessageResponse {
    content: String,
}

impl ChatResponse {
    fn first_content(self) -> Result<String, RewriteError> {
        let content = self
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| RewriteError::Failed("response has no choices".to_string()))?
            .message
            .content;
        let trimmed = content.trim();
        if trimmed.is_empty() {
            return Err(RewriteError::Failed("response is empty".to_string()));
        }
        Ok(trimmed.to_string())
    }
}

/// Generative rewrite through an OpenAI-compatible chat completions API.
pub struct ChatRewriter {
    client: Client,
    endpoint: String,
    model: String,
    api_key: String,
    temperature: f64,
}

impl std::fmt::Debug for ChatRewriter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatRewriter")
            .field("endpoint", &self.endpoint)
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

impl ChatRewriter {
    /// Rewriter built from config; the API key is read from `api_key_env`.
    pub fn from_config(settings: &RewriterConfig) -> anyhow::Result<Self> {
        let api_key = std::env::var(&settings.api_key_env).with_context(|| {
            format!(
                "rewriter is configured but {} is not set",
                settings.api_key_env
            )
        })?;
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self {
            client,
            endpoint: settings.endpoint.clone(),
            model: settings.model.clone(),
            api_key,
            temperature: settings.temperature,
        })
    }
}

impl GenerativeRewriter for ChatRewriter {
    #[tracing::instrument(skip_all, fields(model = %self.model, text_len = text.len()))]
    fn rewrite(&self, text: &str, options: &TransformationOptions) -> Result<String, RewriteError> {
        let request = ChatRequest {
            model: &self.model,
            temperature: self.temperature,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system_prompt(options),
                },
                ChatMessage {
                    role: "user",
                    content: text.to_string(),
                },
            ],
        };

        let response = self
            .client
            .post(&self.endpoint)
            .header(AUTHORIZATION, format!("Bearer {}", self.api_key))
            .json(&request)
            .send()
            .map_err(|e| RewriteError::Unavailable(format!("rewrite request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            let detail = body.trim();
            return Err(RewriteError::Unavailable(if detail.is_empty() {
                format!("rewrite API error: {status}")
            } else {
                format!("rewrite API error: {status} {detail}")
            }));
        }

        let body: ChatResponse = response
            .json()
            .map_err(|e| RewriteError::Failed(format!("rewrite response parse failed: {e}")))?;
        body.first_content()
    }
}

fn system_prompt(options: &TransformationOptions) -> String {
    let register = match options.formality {
        Formality::Formal => "formal, without contractions",
        Formality::Informal => "informal and conversational, with contractions",
    };
    format!(
        "Rewrite the user's text so it reads as if a person wrote it.\n\
         Register: {register}.\n\
         Tone: {tone}.\n\
         Keep the meaning, the facts, and roughly the same length.\n\
         Reply with the rewritten text only.",
        tone = options.emotional_tone,
    )
}
