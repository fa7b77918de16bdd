//! Configuration loading and typed config structures for the Functor Engine.
//!
//! The configuration lives in `functor-config.yaml`. The file is located
//! through `FUNCTOR_CONFIG` when set, otherwise by walking up from the
//! working directory; without a file every section falls back to its
//! defaults. Environment variables override file values, and the language
//! model credential normally comes only from the environment:
//!
//! - `LLM_API_KEY` or `GEMINI_API_KEY` -- backend credential
//! - `LLM_BACKEND` -- `gemini`, `openai` (also `deepseek`, `ollama`), `anthropic`
//! - `LLM_API_URL` -- backend base URL
//! - `LLM_MODEL` -- model identifier
//! - `FUNCTOR_HOST` / `FUNCTOR_PORT` -- HTTP bind address
//!
//! A missing credential is not an error: the server runs without an engine
//! and only serves the graph.

use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use serde::Deserialize;

/// File name searched for during discovery.
pub const CONFIG_FILE_NAME: &str = "functor-config.yaml";

/// Environment variable naming an explicit config file.
pub const CONFIG_PATH_ENV: &str = "FUNCTOR_CONFIG";

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file {path}: {source}")]
    Io {
        /// The file that could not be read.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        #[from]
        source: serde_yml::Error,
    },

    /// An override or field holds an unusable value.
    #[error("invalid config value: {0}")]
    Invalid(String),
}

/// Top-level configuration, mirroring `functor-config.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct FunctorConfig {
    /// HTTP bind settings.
    #[serde(default)]
    pub server: ServerSection,

    /// Language model backend settings.
    #[serde(default)]
    pub llm: LlmConfig,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// HTTP bind settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ServerSection {
    /// Address to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// TCP port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    String::from("0.0.0.0")
}

const fn default_port() -> u16 {
    8000
}

/// Language model backend settings as written in the file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LlmConfig {
    /// Which API dialect to speak.
    #[serde(default)]
    pub backend: BackendType,
    /// Base URL; defaults per backend.
    #[serde(default)]
    pub api_url: Option<String>,
    /// Model identifier; defaults per backend.
    #[serde(default)]
    pub model: Option<String>,
    /// Credential. Usually supplied through the environment instead.
    #[serde(default)]
    pub api_key: Option<String>,
    /// Deadline for one model call, in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    /// Sampling temperature.
    #[serde(default = "default_temperature")]
    pub temperature: f64,
    /// Directory whose `*.j2` files override the built-in prompts.
    #[serde(default)]
    pub templates_dir: Option<PathBuf>,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            backend: BackendType::default(),
            api_url: None,
            model: None,
            api_key: None,
            timeout_ms: default_timeout_ms(),
            temperature: default_temperature(),
            templates_dir: None,
        }
    }
}

const fn default_timeout_ms() -> u64 {
    30_000
}

const fn default_temperature() -> f64 {
    0.7
}

/// Logging settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Filter used when `RUST_LOG` is not set.
    #[serde(default = "default_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
        }
    }
}

fn default_level() -> String {
    String::from("info")
}

/// Supported language model API dialects.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub enum BackendType {
    /// Google Gemini `generateContent` API.
    #[default]
    Gemini,
    /// `OpenAI`-compatible chat completions (`OpenAI`, `DeepSeek`, Ollama).
    OpenAi,
    /// Anthropic Messages API.
    Anthropic,
}

impl BackendType {
    /// Base URL used when none is configured.
    pub const fn default_api_url(self) -> &'static str {
        match self {
            Self::Gemini => "https://generativelanguage.googleapis.com/v1beta",
            Self::OpenAi => "https://api.openai.com/v1",
            Self::Anthropic => "https://api.anthropic.com/v1",
        }
    }

    /// Model used when none is configured.
    pub const fn default_model(self) -> &'static str {
        match self {
            Self::Gemini => "gemini-1.5-flash",
            Self::OpenAi => "gpt-4o-mini",
            Self::Anthropic => "claude-3-5-haiku-latest",
        }
    }
}

impl FromStr for BackendType {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "gemini" | "google" => Ok(Self::Gemini),
            "openai" | "deepseek" | "ollama" => Ok(Self::OpenAi),
            "anthropic" | "claude" => Ok(Self::Anthropic),
            other => Err(ConfigError::Invalid(format!("unknown backend type: {other}"))),
        }
    }
}

impl TryFrom<String> for BackendType {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Fully resolved settings for one backend, ready to build a client.
#[derive(Debug, Clone, PartialEq)]
pub struct LlmBackendConfig {
    /// The API dialect.
    pub backend_type: BackendType,
    /// Base API URL, without a trailing slash.
    pub api_url: String,
    /// Credential.
    pub api_key: String,
    /// Model identifier.
    pub model: String,
    /// Sampling temperature.
    pub temperature: f64,
}

impl LlmConfig {
    /// Resolve defaults into a [`LlmBackendConfig`].
    ///
    /// Returns `None` when no non-empty credential is configured.
    pub fn backend_config(&self) -> Option<LlmBackendConfig> {
        let api_key = self
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())?;

        let api_url = self
            .api_url
            .as_deref()
            .unwrap_or_else(|| self.backend.default_api_url())
            .trim_end_matches('/')
            .to_owned();
        let model = self
            .model
            .clone()
            .unwrap_or_else(|| self.backend.default_model().to_owned());

        Some(LlmBackendConfig {
            backend_type: self.backend,
            api_url,
            api_key: api_key.to_owned(),
            model,
            temperature: self.temperature,
        })
    }

    /// Deadline for one model call.
    pub const fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl FunctorConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// Environment overrides are not applied; see [`FunctorConfig::load`].
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yml::from_str(yaml)?)
    }

    /// Locate, read and override the process configuration.
    ///
    /// Returns the configuration together with the file it came from, if
    /// any.
    pub fn load() -> Result<(Self, Option<PathBuf>), ConfigError> {
        let path = match std::env::var_os(CONFIG_PATH_ENV) {
            Some(explicit) => Some(PathBuf::from(explicit)),
            None => std::env::current_dir()
                .ok()
                .and_then(|cwd| find_config_file(&cwd)),
        };

        let mut config = match &path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_overrides(|name| std::env::var(name).ok())?;
        Ok((config, path))
    }

    /// Apply overrides looked up by variable name.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = lookup("LLM_API_KEY").or_else(|| lookup("GEMINI_API_KEY")) {
            self.llm.api_key = Some(key);
        }
        if let Some(backend) = lookup("LLM_BACKEND") {
            self.llm.backend = backend.parse()?;
        }
        if let Some(url) = lookup("LLM_API_URL") {
            self.llm.api_url = Some(url);
        }
        if let Some(model) = lookup("LLM_MODEL") {
            self.llm.model = Some(model);
        }
        if let Some(host) = lookup("FUNCTOR_HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("FUNCTOR_PORT") {
            self.server.port = port
                .parse()
                .map_err(|e| ConfigError::Invalid(format!("invalid FUNCTOR_PORT: {e}")))?;
        }
        Ok(())
    }
}

/// Find the nearest `functor-config.yaml` in `start` or any parent.
pub fn find_config_file(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .map(|dir| dir.join(CONFIG_FILE_NAME))
        .find(|candidate| candidate.is_file())
}
