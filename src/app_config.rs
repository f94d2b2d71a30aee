//! Application configuration module
//! This module handles the application configuration including loading,
//! validating and saving configuration settings.

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::default::Default;

/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Target language code (ISO) for translated text
    #[serde(default = "default_target_language")]
    pub target_language: String,

    /// Translation config
    pub translation: TranslationConfig,

    /// Which calls and keywords carry translatable text
    #[serde(default)]
    pub extraction: ExtractionConfig,

    /// Font support boilerplate settings
    #[serde(default)]
    pub injection: InjectionConfig,

    /// Output file settings
    #[serde(default)]
    pub output: OutputConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Translation provider type
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TranslationProvider {
    // @provider: DeepSeek (OpenAI-compatible chat API)
    #[default]
    DeepSeek,
    // @provider: OpenAI
    OpenAI,
    // @provider: Anthropic
    Anthropic,
    // @provider: Ollama
    Ollama,
}

impl TranslationProvider {
    // @returns: Capitalized provider name
    pub fn display_name(&self) -> &str {
        match self {
            Self::DeepSeek => "DeepSeek",
            Self::OpenAI => "OpenAI",
            Self::Anthropic => "Anthropic",
            Self::Ollama => "Ollama",
        }
    }

    // @returns: Lowercase provider identifier
    pub fn to_lowercase_string(&self) -> String {
        match self {
            Self::DeepSeek => "deepseek".to_string(),
            Self::OpenAI => "openai".to_string(),
            Self::Anthropic => "anthropic".to_string(),
            Self::Ollama => "ollama".to_string(),
        }
    }

    // @returns: Environment variable holding the API key, if the provider needs one
    pub fn api_key_env(&self) -> Option<&'static str> {
        match self {
            Self::DeepSeek => Some("DEEPSEEK_API_KEY"),
            Self::OpenAI => Some("OPENAI_API_KEY"),
            Self::Anthropic => Some("ANTHROPIC_API_KEY"),
            Self::Ollama => None,
        }
    }

    pub fn requires_api_key(&self) -> bool {
        self.api_key_env().is_some()
    }
}

// Implement Display trait for TranslationProvider
impl std::fmt::Display for TranslationProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_lowercase_string())
    }
}

// Implement FromStr trait for TranslationProvider
impl std::str::FromStr for TranslationProvider {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "deepseek" => Ok(Self::DeepSeek),
            "openai" => Ok(Self::OpenAI),
            "anthropic" => Ok(Self::Anthropic),
            "ollama" => Ok(Self::Ollama),
            _ => Err(anyhow!("Invalid provider type: {}", s)),
        }
    }
}

/// Provider configuration wrapper
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ProviderConfig {
    // @field: Provider type identifier
    #[serde(rename = "type")]
    pub provider_type: String,

    // @field: Model name
    #[serde(default = "String::new")]
    pub model: String,

    // @field: API key
    #[serde(default = "String::new")]
    pub api_key: String,

    // @field: Service URL
    #[serde(default = "String::new")]
    pub endpoint: String,

    // @field: Timeout seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl ProviderConfig {
    // @param provider_type: Provider enum
    // @returns: Provider config with defaults
    pub fn new(provider_type: TranslationProvider) -> Self {
        Self {
            provider_type: provider_type.to_lowercase_string(),
            model: default_model(&provider_type),
            api_key: String::new(),
            endpoint: default_endpoint(&provider_type),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Translation service configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TranslationConfig {
    /// Translation provider to use
    #[serde(default)]
    pub provider: TranslationProvider,

    /// Available translation providers
    #[serde(default)]
    pub available_providers: Vec<ProviderConfig>,

    /// Common translation settings
    #[serde(default)]
    pub common: TranslationCommonConfig,
}

/// Common settings applicable to all providers
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TranslationCommonConfig {
    /// Temperature parameter for text generation (0.0 to 1.0)
    /// Lower values make output more deterministic, higher values more creative
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Upper bound on generated tokens per request
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
}

impl Default for TranslationCommonConfig {
    fn default() -> Self {
        Self {
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
        }
    }
}

/// Which call sites and keyword arguments carry translatable text
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ExtractionConfig {
    /// Member names of presentation calls (`set_title`, `xlabel`, ...)
    #[serde(default = "default_call_names")]
    pub call_names: Vec<String>,

    /// Keyword arguments whose values are styling options, never text
    #[serde(default = "default_protected_keywords")]
    pub protected_keywords: Vec<String>,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            call_names: default_call_names(),
            protected_keywords: default_protected_keywords(),
        }
    }
}

impl ExtractionConfig {
    pub fn is_target_call(&self, name: &str) -> bool {
        self.call_names.iter().any(|c| c == name)
    }

    pub fn is_protected_keyword(&self, name: &str) -> bool {
        self.protected_keywords.iter().any(|k| k == name)
    }
}

/// CJK font support boilerplate settings
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct InjectionConfig {
    /// Whether to insert the font block at all
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Font families written into `font.sans-serif`
    #[serde(default = "default_font_families")]
    pub font_families: Vec<String>,
}

impl Default for InjectionConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            font_families: default_font_families(),
        }
    }
}

/// Output file settings
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct OutputConfig {
    /// Appended to the input file stem to form the output name
    #[serde(default = "default_output_suffix")]
    pub suffix: String,

    /// Run the layout beautify pass after translation
    #[serde(default)]
    pub beautify: bool,

    /// Reject rewritten code that no longer parses
    #[serde(default = "default_true")]
    pub verify_rewrites: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            suffix: default_output_suffix(),
            beautify: false,
            verify_rewrites: true,
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

/// Marker that shows an API key was never filled in
const API_KEY_PLACEHOLDER: &str = "xxxxxxxx";

fn default_target_language() -> String {
    "zh".to_string()
}

fn default_timeout_secs() -> u64 {
    180
}

fn default_temperature() -> f32 {
    0.3
}

fn default_max_tokens() -> u32 {
    8192
}

fn default_true() -> bool {
    true
}

fn default_output_suffix() -> String {
    "_zh_revision".to_string()
}

fn default_font_families() -> Vec<String> {
    vec!["SimHei".to_string()]
}

fn default_call_names() -> Vec<String> {
    [
        "title", "suptitle", "xlabel", "ylabel",
        "set_title", "set_xlabel", "set_ylabel", "set_zlabel",
        "text", "figtext", "annotate", "legend",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_protected_keywords() -> Vec<String> {
    [
        "loc", "color", "c", "ha", "va",
        "horizontalalignment", "verticalalignment",
        "fontweight", "weight", "fontstyle", "style",
        "family", "fontfamily", "fontname",
        "backgroundcolor", "rotation", "fontsize", "size",
        "xycoords", "textcoords", "mode",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_endpoint(provider: &TranslationProvider) -> String {
    match provider {
        TranslationProvider::DeepSeek => "https://api.deepseek.com/v1".to_string(),
        TranslationProvider::OpenAI => "https://api.openai.com/v1".to_string(),
        TranslationProvider::Anthropic => "https://api.anthropic.com".to_string(),
        TranslationProvider::Ollama => "http://localhost:11434".to_string(),
    }
}

fn default_model(provider: &TranslationProvider) -> String {
    match provider {
        TranslationProvider::DeepSeek => "deepseek-chat".to_string(),
        TranslationProvider::OpenAI => "gpt-4o-mini".to_string(),
        TranslationProvider::Anthropic => "claude-3-haiku-20240307".to_string(),
        TranslationProvider::Ollama => "llama3.2:3b".to_string(),
    }
}

impl Config {
    /// Validate the configuration for consistency and required values
    ///
    /// Runs before any network call is attempted, so a missing or
    /// placeholder API key stops the run up front.
    pub fn validate(&self) -> Result<()> {
        let _target_name = crate::language_utils::get_language_name(&self.target_language)?;

        let provider = &self.translation.provider;
        if provider.requires_api_key() {
            let api_key = self.translation.get_api_key();
            if api_key.trim().is_empty() {
                return Err(anyhow!(
                    "Translation API key is required for {} provider (set it in the config or {})",
                    provider.display_name(),
                    provider.api_key_env().unwrap_or("the environment")
                ));
            }
            if api_key.contains(API_KEY_PLACEHOLDER) {
                return Err(anyhow!(
                    "Translation API key for {} provider is still a placeholder",
                    provider.display_name()
                ));
            }
        }

        if self.output.suffix.trim().is_empty() {
            return Err(anyhow!("Output suffix cannot be empty, the input file would be overwritten"));
        }

        Ok(())
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            target_language: default_target_language(),
            translation: TranslationConfig::default(),
            extraction: ExtractionConfig::default(),
            injection: InjectionConfig::default(),
            output: OutputConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}

impl TranslationConfig {
    /// Get the active provider configuration from the available_providers array
    pub fn get_active_provider_config(&self) -> Option<&ProviderConfig> {
        self.get_provider_config(&self.provider)
    }

    /// Get a specific provider configuration by type
    pub fn get_provider_config(&self, provider_type: &TranslationProvider) -> Option<&ProviderConfig> {
        let provider_str = provider_type.to_lowercase_string();
        self.available_providers.iter()
            .find(|p| p.provider_type == provider_str)
    }

    /// Mutable access to the active provider configuration, created on demand
    pub fn active_provider_config_mut(&mut self) -> &mut ProviderConfig {
        let provider_str = self.provider.to_lowercase_string();
        let index = match self.available_providers.iter().position(|p| p.provider_type == provider_str) {
            Some(index) => index,
            None => {
                self.available_providers.push(ProviderConfig::new(self.provider.clone()));
                self.available_providers.len() - 1
            }
        };
        &mut self.available_providers[index]
    }

    /// Get the model for the active provider
    pub fn get_model(&self) -> String {
        if let Some(provider_config) = self.get_active_provider_config() {
            if !provider_config.model.is_empty() {
                return provider_config.model.clone();
            }
        }

        default_model(&self.provider)
    }

    /// Get the API key for the active provider
    pub fn get_api_key(&self) -> String {
        self.get_active_provider_config()
            .map(|p| p.api_key.clone())
            .unwrap_or_default()
    }

    /// Get the endpoint for the active provider
    pub fn get_endpoint(&self) -> String {
        if let Some(provider_config) = self.get_active_provider_config() {
            if !provider_config.endpoint.is_empty() {
                return provider_config.endpoint.clone();
            }
        }

        default_endpoint(&self.provider)
    }

    /// Get the request timeout for the active provider
    pub fn get_timeout_secs(&self) -> u64 {
        match self.get_active_provider_config() {
            Some(provider_config) if provider_config.timeout_secs > 0 => provider_config.timeout_secs,
            _ => default_timeout_secs(),
        }
    }

    /// Fill an empty API key from the provider's environment variable
    pub fn apply_api_key_from_env(&mut self) {
        let Some(var) = self.provider.api_key_env() else {
            return;
        };
        if !self.get_api_key().is_empty() {
            return;
        }
        if let Ok(value) = std::env::var(var) {
            if !value.trim().is_empty() {
                self.active_provider_config_mut().api_key = value.trim().to_string();
            }
        }
    }
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            provider: TranslationProvider::default(),
            available_providers: vec![
                ProviderConfig::new(TranslationProvider::DeepSeek),
                ProviderConfig::new(TranslationProvider::OpenAI),
                ProviderConfig::new(TranslationProvider::Anthropic),
                ProviderConfig::new(TranslationProvider::Ollama),
            ],
            common: TranslationCommonConfig::default(),
        }
    }
}
