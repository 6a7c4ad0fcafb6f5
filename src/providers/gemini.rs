//! Google Gemini provider implementation for Quotegen
//!
//! This module implements the [`Provider`] and [`Conversation`] traits for
//! the Gemini `generateContent` REST API. Conversation handles accumulate
//! the full turn history and replay it on every request, which is how the
//! stateless REST endpoint provides stateful chat semantics.
//!
//! Credential resolution order: explicit `api_key` in config, then the
//! `GEMINI_API_KEY` and `GOOGLE_API_KEY` environment variables.

use crate::config::GeminiConfig;
use crate::error::{QuotegenError, Result};
use crate::providers::{Conversation, Provider};

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default API base for the Gemini REST endpoint
const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com";

/// Google Gemini API provider
///
/// # Examples
///
/// ```no_run
/// use quotegen::config::GeminiConfig;
/// use quotegen::providers::{GeminiProvider, Provider};
///
/// # fn example() -> quotegen::error::Result<()> {
/// let config = GeminiConfig {
///     api_key: Some("my-key".to_string()),
///     ..GeminiConfig::default()
/// };
/// let provider = GeminiProvider::new(config)?;
/// let mut conversation = provider.start_conversation();
/// # Ok(())
/// # }
/// ```
pub struct GeminiProvider {
    client: Client,
    config: GeminiConfig,
    api_key: String,
}

/// A single Gemini conversation
///
/// Keeps the accumulated `contents` list and posts the whole history on
/// every turn. A turn that fails is removed again so the history never
/// contains messages the server did not answer.
pub struct GeminiConversation {
    client: Client,
    config: GeminiConfig,
    api_key: String,
    contents: Vec<Content>,
}

/// Request structure for the generateContent endpoint
#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

/// One message in the conversation, in Gemini wire format
#[derive(Debug, Clone, Serialize)]
struct Content {
    role: String,
    parts: Vec<Part>,
}

#[derive(Debug, Clone, Serialize)]
struct Part {
    text: String,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    temperature: f64,
    #[serde(rename = "maxOutputTokens")]
    max_output_tokens: u32,
}

/// Response structure from the generateContent endpoint
#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    candidates: Option<Vec<Candidate>>,
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    message: String,
}

impl Content {
    fn user(text: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            parts: vec![Part { text: text.into() }],
        }
    }

    fn model(text: impl Into<String>) -> Self {
        Self {
            role: "model".to_string(),
            parts: vec![Part { text: text.into() }],
        }
    }
}

impl GeminiProvider {
    /// Create a new Gemini provider instance
    ///
    /// # Arguments
    ///
    /// * `config` - Gemini configuration containing model and credentials
    ///
    /// # Errors
    ///
    /// Returns `QuotegenError::MissingCredentials` if no API key could be
    /// resolved from config or environment, or `QuotegenError::Provider`
    /// if HTTP client initialization fails
    pub fn new(config: GeminiConfig) -> Result<Self> {
        let api_key = resolve_api_key(&config)
            .ok_or_else(|| QuotegenError::MissingCredentials("gemini".to_string()))?;

        let client = Client::builder()
            .timeout(Duration::from_secs(120))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("quotegen/0.1.0")
            .build()
            .map_err(|e| QuotegenError::Provider(format!("Failed to create HTTP client: {}", e)))?;

        tracing::info!("Initialized Gemini provider: model={}", config.model);

        Ok(Self {
            client,
            config,
            api_key,
        })
    }
}

impl Provider for GeminiProvider {
    fn name(&self) -> &'static str {
        "Gemini"
    }

    fn model(&self) -> String {
        self.config.model.clone()
    }

    fn start_conversation(&self) -> Box<dyn Conversation> {
        Box::new(GeminiConversation {
            client: self.client.clone(),
            config: self.config.clone(),
            api_key: self.api_key.clone(),
            contents: Vec::new(),
        })
    }
}

#[async_trait]
impl Conversation for GeminiConversation {
    async fn send_turn(&mut self, text: &str) -> Result<String> {
        self.contents.push(Content::user(text));
        match self.dispatch().await {
            Ok(reply) => {
                self.contents.push(Content::model(reply.clone()));
                Ok(reply)
            }
            Err(e) => {
                // Keep the handle's history consistent with what the
                // server actually answered.
                self.contents.pop();
                Err(e)
            }
        }
    }
}

impl GeminiConversation {
    /// Number of turns (user and model) accumulated so far
    pub fn history_len(&self) -> usize {
        self.contents.len()
    }

    fn endpoint(&self) -> String {
        let base = self
            .config
            .api_base
            .as_deref()
            .unwrap_or(DEFAULT_API_BASE)
            .trim_end_matches('/');
        format!(
            "{}/v1beta/models/{}:generateContent?key={}",
            base, self.config.model, self.api_key
        )
    }

    async fn dispatch(&self) -> Result<String> {
        let request = GenerateContentRequest {
            contents: self.contents.clone(),
            generation_config: GenerationConfig {
                temperature: self.config.temperature,
                max_output_tokens: self.config.max_output_tokens,
            },
        };

        let url = self.endpoint();
        tracing::debug!(
            "Dispatching turn {} to Gemini model {}",
            self.contents.len(),
            self.config.model
        );

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| QuotegenError::Provider(format!("Request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            tracing::warn!("Gemini returned error {}: {}", status, error_text);
            return Err(QuotegenError::Provider(format!(
                "Gemini API error ({}): {}",
                status, error_text
            ))
            .into());
        }

        let result: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| QuotegenError::Provider(format!("Failed to parse response: {}", e)))?;

        if let Some(err) = result.error {
            return Err(QuotegenError::Provider(format!("Gemini API error: {}", err.message)).into());
        }

        result
            .candidates
            .and_then(|c| c.into_iter().next())
            .and_then(|c| c.content.parts.into_iter().next())
            .and_then(|p| p.text)
            .ok_or_else(|| QuotegenError::Provider("No response from Gemini".to_string()).into())
    }
}

/// Resolve the Gemini API key from config or environment
///
/// Resolution order: explicit config value, `GEMINI_API_KEY`, then
/// `GOOGLE_API_KEY`.
fn resolve_api_key(config: &GeminiConfig) -> Option<String> {
    config
        .api_key
        .clone()
        .or_else(|| std::env::var("GEMINI_API_KEY").ok())
        .or_else(|| std::env::var("GOOGLE_API_KEY").ok())
}
