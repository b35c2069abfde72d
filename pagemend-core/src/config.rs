//! Configuration management for Pagemend
//!
//! Configuration is loaded with the following priority (highest to lowest):
//! 1. CLI flags
//! 2. Environment variables (PAGEMEND_*)
//! 3. Config file (~/.config/pagemend/config.toml)
//! 4. Default values

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Completion-service configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CompletionConfig {
    /// Model to request from the completion service
    pub model: String,

    /// Endpoint override; the client default is used when unset
    pub endpoint: Option<String>,

    /// API keys for the rotation ring; environment keys take over
    /// when this is empty
    pub api_keys: Vec<String>,

    /// Retry budget per completion call
    pub max_retries: u32,

    /// How long a failed key stays excluded from rotation
    #[serde(with = "humantime_serde")]
    pub blacklist_window: Duration,

    /// Per-request HTTP timeout
    #[serde(with = "humantime_serde")]
    pub timeout: Duration,
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            model: "gemini-2.0-flash".to_string(),
            endpoint: None,
            api_keys: Vec::new(),
            max_retries: 3,
            blacklist_window: Duration::from_secs(300),
            timeout: Duration::from_secs(30),
        }
    }
}

/// Knowledge-base configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct KnowledgeConfig {
    /// Path to a best-practices document; the embedded corpus is
    /// used when unset
    pub corpus_path: Option<PathBuf>,

    /// Chunk size in characters
    pub chunk_size: usize,

    /// Overlap between consecutive chunks in characters
    pub chunk_overlap: usize,

    /// How many snippets each optimization query retrieves
    pub top_k: usize,
}

impl Default for KnowledgeConfig {
    fn default() -> Self {
        Self {
            corpus_path: None,
            chunk_size: 1000,
            chunk_overlap: 200,
            top_k: 3,
        }
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind
    pub host: String,

    /// Port to bind
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8000,
        }
    }
}

/// Root configuration structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Completion-service configuration
    pub completion: CompletionConfig,

    /// Knowledge-base configuration
    pub knowledge: KnowledgeConfig,

    /// HTTP server configuration
    pub server: ServerConfig,
}

impl Config {
    /// Load configuration from the default config file location
    ///
    /// Returns default config if file doesn't exist
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path();

        if let Some(path) = config_path {
            if path.exists() {
                return Self::load_from_file(&path);
            }
        }

        Ok(Self::default())
    }

    /// Load configuration from a specific file
    pub fn load_from_file(path: &PathBuf) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(Error::Io)?;
        toml::from_str(&contents)
            .map_err(|e| Error::Config(format!("Failed to parse config: {}", e)))
    }

    /// Get the default config file path
    ///
    /// Returns `~/.config/pagemend/config.toml` on Unix
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("pagemend").join("config.toml"))
    }

    /// Apply environment variable overrides
    ///
    /// Supported variables:
    /// - PAGEMEND_MODEL: Completion model name
    /// - PAGEMEND_ENDPOINT: Completion endpoint override
    /// - PAGEMEND_CORPUS: Best-practices document path
    /// - PAGEMEND_PORT: HTTP server port
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(model) = std::env::var("PAGEMEND_MODEL") {
            self.completion.model = model;
        }

        if let Ok(endpoint) = std::env::var("PAGEMEND_ENDPOINT") {
            self.completion.endpoint = Some(endpoint);
        }

        if let Ok(corpus) = std::env::var("PAGEMEND_CORPUS") {
            self.knowledge.corpus_path = Some(PathBuf::from(corpus));
        }

        if let Ok(port) = std::env::var("PAGEMEND_PORT") {
            if let Ok(port) = port.parse() {
                self.server.port = port;
            }
        }

        self
    }

    /// Apply CLI flag overrides
    pub fn with_cli_overrides(mut self, model: Option<String>, port: Option<u16>) -> Self {
        if let Some(m) = model {
            self.completion.model = m;
        }

        if let Some(p) = port {
            self.server.port = p;
        }

        self
    }

    /// Load configuration with all overrides applied
    ///
    /// Priority: CLI > env > config file > defaults
    pub fn load_with_overrides(model: Option<String>, port: Option<u16>) -> Result<Self> {
        Ok(Self::load()?
            .with_env_overrides()
            .with_cli_overrides(model, port))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.completion.model, "gemini-2.0-flash");
        assert_eq!(config.completion.max_retries, 3);
        assert_eq!(config.completion.blacklist_window, Duration::from_secs(300));
        assert_eq!(config.knowledge.chunk_size, 1000);
        assert_eq!(config.knowledge.chunk_overlap, 200);
        assert_eq!(config.knowledge.top_k, 3);
        assert_eq!(config.server.port, 8000);
    }

    #[test]
    fn test_cli_overrides() {
        let config = Config::default()
            .with_cli_overrides(Some("gemini-1.5-pro".to_string()), Some(9001));

        assert_eq!(config.completion.model, "gemini-1.5-pro");
        assert_eq!(config.server.port, 9001);
    }

    #[test]
    fn test_parse_toml() {
        let toml = r#"
[completion]
model = "gemini-1.5-flash"
max_retries = 5
blacklist_window = "2m"

[server]
port = 8080
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.completion.model, "gemini-1.5-flash");
        assert_eq!(config.completion.max_retries, 5);
        assert_eq!(config.completion.blacklist_window, Duration::from_secs(120));
        assert_eq!(config.server.port, 8080);
    }

    #[test]
    fn test_partial_toml() {
        let toml = r#"
[knowledge]
top_k = 5
"#;
        let config: Config = toml::from_str(toml).unwrap();
        // unset sections and fields keep their defaults
        assert_eq!(config.knowledge.top_k, 5);
        assert_eq!(config.knowledge.chunk_size, 1000);
        assert_eq!(config.completion.model, "gemini-2.0-flash");
    }

    #[test]
    fn test_env_overrides_and_cli_precedence() {
        std::env::set_var("PAGEMEND_MODEL", "env-model");
        std::env::set_var("PAGEMEND_PORT", "7777");

        let config = Config::default().with_env_overrides();
        assert_eq!(config.completion.model, "env-model");
        assert_eq!(config.server.port, 7777);

        // CLI flags beat the environment
        let config = config.with_cli_overrides(Some("cli-model".to_string()), None);
        assert_eq!(config.completion.model, "cli-model");
        assert_eq!(config.server.port, 7777);

        std::env::remove_var("PAGEMEND_MODEL");
        std::env::remove_var("PAGEMEND_PORT");
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[server]\nport = 4242\n").unwrap();

        let config = Config::load_from_file(&path).unwrap();
        assert_eq!(config.server.port, 4242);
    }

    #[test]
    fn test_load_from_file_malformed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "not valid toml [").unwrap();

        assert!(Config::load_from_file(&path).is_err());
    }
}
