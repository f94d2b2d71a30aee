/*!
 * Core translation service implementation.
 *
 * This module contains the `TranslationService`, the `TextCollaborator`
 * backed by one of the configured LLM providers.
 */

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use log::debug;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::time::{Duration, Instant};
use url::Url;

use crate::app_config::{TranslationConfig, TranslationProvider as ConfigTranslationProvider};
use crate::errors::{ProviderError, TranslationError};
use crate::providers::anthropic::{Anthropic, AnthropicRequest};
use crate::providers::mock::{MockProvider, MockRequest};
use crate::providers::ollama::{ChatRequest, Ollama};
use crate::providers::openai::{OpenAI, OpenAIRequest};
use crate::providers::Provider;
use super::prompts;
use super::response::parse_translation_reply;
use super::{TextCollaborator, TranslationTable};

/// Token usage statistics for tracking API consumption
#[derive(Debug, Clone)]
pub struct TokenUsageStats {
    /// Number of prompt tokens
    pub prompt_tokens: u64,

    /// Number of completion tokens
    pub completion_tokens: u64,

    /// Number of completed requests
    pub requests: u64,

    /// Total time spent on API requests
    pub api_duration: Duration,

    /// Provider name
    pub provider: String,

    /// Model name
    pub model: String,
}

impl TokenUsageStats {
    /// Create new token usage stats with provider info
    pub fn with_provider_info(provider: String, model: String) -> Self {
        Self {
            prompt_tokens: 0,
            completion_tokens: 0,
            requests: 0,
            api_duration: Duration::from_secs(0),
            provider,
            model,
        }
    }

    /// Record one completed request
    pub fn add_request(&mut self, prompt_tokens: Option<u64>, completion_tokens: Option<u64>, duration: Duration) {
        self.prompt_tokens += prompt_tokens.unwrap_or(0);
        self.completion_tokens += completion_tokens.unwrap_or(0);
        self.requests += 1;
        self.api_duration += duration;
    }

    pub fn total_tokens(&self) -> u64 {
        self.prompt_tokens + self.completion_tokens
    }

    /// One-line summary of token usage
    pub fn summary(&self) -> String {
        format!(
            "{} ({}): {} requests, {} prompt + {} completion tokens, {:.1}s API time",
            self.provider,
            self.model,
            self.requests,
            self.prompt_tokens,
            self.completion_tokens,
            self.api_duration.as_secs_f64()
        )
    }
}

/// Translation provider implementation variants
#[derive(Debug)]
enum TranslationProviderImpl {
    /// OpenAI-compatible chat API (OpenAI, DeepSeek)
    OpenAI {
        /// Client instance
        client: OpenAI,
    },

    /// Anthropic API service
    Anthropic {
        /// Client instance
        client: Anthropic,
    },

    /// Ollama LLM service
    Ollama {
        /// Client instance
        client: Ollama,
    },

    /// Scripted replies, no network
    Mock {
        /// Client instance
        client: MockProvider,
    },
}

/// Text collaborator backed by an LLM provider
#[derive(Debug)]
pub struct TranslationService {
    /// Provider implementation
    provider: TranslationProviderImpl,

    /// Configuration for the translation service
    pub config: TranslationConfig,

    /// Target language name as written into prompts
    target_language: String,

    /// Accumulated token usage
    usage: Mutex<TokenUsageStats>,
}

impl TranslationService {
    /// Create a new translation service with the given configuration
    pub fn new(config: TranslationConfig, target_language: impl Into<String>) -> Result<Self> {
        let endpoint = config.get_endpoint();
        Url::parse(&endpoint).map_err(|e| anyhow!("Invalid endpoint '{}': {}", endpoint, e))?;
        let timeout_secs = config.get_timeout_secs();

        let provider = match config.provider {
            ConfigTranslationProvider::DeepSeek | ConfigTranslationProvider::OpenAI => TranslationProviderImpl::OpenAI {
                client: OpenAI::new(config.get_api_key(), endpoint, timeout_secs),
            },
            ConfigTranslationProvider::Anthropic => TranslationProviderImpl::Anthropic {
                client: Anthropic::new(config.get_api_key(), endpoint, timeout_secs),
            },
            ConfigTranslationProvider::Ollama => TranslationProviderImpl::Ollama {
                client: Ollama::from_url(endpoint, timeout_secs),
            },
        };

        Ok(Self::with_provider(provider, config, target_language.into()))
    }

    /// Create a service that answers from a mock provider
    pub fn with_mock(config: TranslationConfig, target_language: impl Into<String>, client: MockProvider) -> Self {
        Self::with_provider(TranslationProviderImpl::Mock { client }, config, target_language.into())
    }

    fn with_provider(provider: TranslationProviderImpl, config: TranslationConfig, target_language: String) -> Self {
        let usage = TokenUsageStats::with_provider_info(
            config.provider.display_name().to_string(),
            config.get_model(),
        );
        Self {
            provider,
            config,
            target_language,
            usage: Mutex::new(usage),
        }
    }

    /// Snapshot of the token usage so far
    pub fn usage(&self) -> TokenUsageStats {
        self.usage.lock().clone()
    }

    /// Send a single-turn prompt and return the reply text
    pub async fn complete_prompt(&self, prompt: &str, json_mode: bool) -> Result<String, ProviderError> {
        let start_time = Instant::now();
        let model = self.config.get_model();
        let temperature = self.config.common.temperature;
        let max_tokens = self.config.common.max_tokens;

        let (text, prompt_tokens, completion_tokens) = match &self.provider {
            TranslationProviderImpl::OpenAI { client } => {
                let mut request = OpenAIRequest::new(model)
                    .add_message("user", prompt)
                    .temperature(temperature)
                    .max_tokens(max_tokens);
                if json_mode {
                    request = request.json_mode();
                }
                let response = client.complete(request).await?;
                let usage = response.usage.as_ref()
                    .map(|u| (Some(u.prompt_tokens as u64), Some(u.completion_tokens as u64)))
                    .unwrap_or((None, None));
                (OpenAI::extract_text(&response), usage.0, usage.1)
            }
            TranslationProviderImpl::Anthropic { client } => {
                let request = AnthropicRequest::new(model, max_tokens)
                    .add_message("user", prompt)
                    .temperature(temperature);
                let response = client.complete(request).await?;
                (
                    Anthropic::extract_text(&response),
                    Some(response.usage.input_tokens as u64),
                    Some(response.usage.output_tokens as u64),
                )
            }
            TranslationProviderImpl::Ollama { client } => {
                let mut request = ChatRequest::new(model)
                    .add_message("user", prompt)
                    .temperature(temperature)
                    .num_predict(max_tokens);
                if json_mode {
                    request = request.format("json");
                }
                let response = client.complete(request).await?;
                let (pt, ct) = (response.prompt_eval_count, response.eval_count);
                (Ollama::extract_text(&response), pt, ct)
            }
            TranslationProviderImpl::Mock { client } => {
                let response = client.complete(MockRequest::new(prompt, json_mode)).await?;
                (MockProvider::extract_text(&response), None, None)
            }
        };

        let duration = start_time.elapsed();
        debug!("{} replied in {:?} ({} chars)", self.config.provider.display_name(), duration, text.len());
        self.usage.lock().add_request(prompt_tokens, completion_tokens, duration);
        Ok(text)
    }
}

#[async_trait]
impl TextCollaborator for TranslationService {
    async fn batch_translate(&self, batch: &TranslationTable) -> Result<HashMap<String, String>, TranslationError> {
        let payload = serde_json::to_string_pretty(&batch.to_json())
            .map_err(|e| TranslationError::Unavailable(format!("cannot encode batch: {}", e)))?;
        let prompt = prompts::fragment_translation_prompt(&self.target_language, &payload);

        let reply = self.complete_prompt(&prompt, true).await?;
        parse_translation_reply(&reply)
    }

    async fn rewrite_whole(&self, code: &str) -> Result<String, TranslationError> {
        let reply = self.complete_prompt(&prompts::beautify_prompt(code), false).await?;
        if reply.trim().is_empty() {
            return Err(TranslationError::Unavailable("empty rewrite reply".to_string()));
        }
        Ok(reply)
    }

    async fn generate(&self, prompt: &str) -> Result<String, TranslationError> {
        let reply = self.complete_prompt(prompt, false).await?;
        if reply.trim().is_empty() {
            return Err(TranslationError::Unavailable("empty reply".to_string()));
        }
        Ok(reply)
    }

    fn target_language(&self) -> &str {
        &self.target_language
    }
}
