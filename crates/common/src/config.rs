use crate::error::VisionaryError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Visionary application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Directory holding the persisted key-value store
    pub data_dir: PathBuf,

    /// Log directory
    pub log_dir: PathBuf,

    /// Log level
    pub log_level: String,

    /// Ollama API base URL
    pub ollama_base_url: String,

    /// Model used for text analysis
    pub llm_model: String,

    /// HTTP timeout for a whole analysis stream, in seconds
    pub request_timeout_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./data"),
            log_dir: PathBuf::from("./data/log"),
            log_level: "info".to_string(),
            ollama_base_url: "http://localhost:11434".to_string(),
            llm_model: "llama3.2:latest".to_string(),
            request_timeout_secs: 300,
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables and .env file
    ///
    /// Nothing is created on disk; call [`ensure_directories`](Self::ensure_directories)
    /// once any overrides have been applied.
    pub fn from_env() -> Result<Self, VisionaryError> {
        // Load .env file (ignore if not exists)
        let _ = dotenv::dotenv();

        Ok(Self::from_lookup(|key| std::env::var(key).ok()))
    }

    /// Build configuration from an arbitrary variable lookup
    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        Self {
            data_dir: lookup("DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.data_dir),
            log_dir: lookup("LOG_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.log_dir),
            log_level: lookup("LOG_LEVEL").unwrap_or(defaults.log_level),
            ollama_base_url: lookup("OLLAMA_BASE_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or(defaults.ollama_base_url),
            llm_model: lookup("LLM_MODEL").unwrap_or(defaults.llm_model),
            request_timeout_secs: lookup("REQUEST_TIMEOUT_SECS")
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.request_timeout_secs),
        }
    }

    /// Ensure required directories exist, create if not
    pub fn ensure_directories(&self) -> Result<(), VisionaryError> {
        for dir in [&self.data_dir, &self.log_dir] {
            if !dir.exists() {
                std::fs::create_dir_all(dir).map_err(|e| {
                    VisionaryError::config(format!(
                        "Failed to create directory {}: {}",
                        dir.display(),
                        e
                    ))
                })?;
            }
        }

        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), VisionaryError> {
        if !self.ollama_base_url.starts_with("http://")
            && !self.ollama_base_url.starts_with("https://")
        {
            return Err(VisionaryError::config(
                "Ollama base URL must start with http:// or https://",
            ));
        }

        if self.llm_model.trim().is_empty() {
            return Err(VisionaryError::config("LLM model name cannot be empty"));
        }

        if self.request_timeout_secs == 0 {
            return Err(VisionaryError::config("Request timeout cannot be 0"));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.request_timeout_secs, 300);
        assert_eq!(config.llm_model, "llama3.2:latest");
        assert_eq!(config.ollama_base_url, "http://localhost:11434");
    }

    #[test]
    fn test_from_lookup_overrides() {
        let vars: HashMap<&str, &str> = [
            ("DATA_DIR", "/tmp/visionary"),
            ("OLLAMA_BASE_URL", "http://gpu-box:11434/"),
            ("REQUEST_TIMEOUT_SECS", "45"),
        ]
        .into_iter()
        .collect();

        let config = AppConfig::from_lookup(|key| vars.get(key).map(|v| v.to_string()));
        assert_eq!(config.data_dir, PathBuf::from("/tmp/visionary"));
        assert_eq!(config.ollama_base_url, "http://gpu-box:11434");
        assert_eq!(config.request_timeout_secs, 45);
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_unparseable_timeout_falls_back() {
        let config = AppConfig::from_lookup(|key| {
            (key == "REQUEST_TIMEOUT_SECS").then(|| "soon".to_string())
        });
        assert_eq!(config.request_timeout_secs, 300);
    }

    #[test]
    fn test_validate() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());

        let mut invalid_config = AppConfig::default();
        invalid_config.ollama_base_url = "localhost:11434".to_string();
        assert!(invalid_config.validate().is_err());

        let mut invalid_config = AppConfig::default();
        invalid_config.llm_model = "  ".to_string();
        assert!(invalid_config.validate().is_err());
    }

    #[test]
    fn test_ensure_directories() {
        let tmp = tempfile::tempdir().unwrap();
        let config = AppConfig {
            data_dir: tmp.path().join("data"),
            log_dir: tmp.path().join("data/log"),
            ..AppConfig::default()
        };

        config.ensure_directories().unwrap();
        assert!(config.data_dir.is_dir());
        assert!(config.log_dir.is_dir());
    }

    #[test]
    fn test_from_env_creates_nothing() {
        let tmp = tempfile::tempdir().unwrap();
        let data_dir = tmp.path().join("env-data");
        std::env::set_var("DATA_DIR", &data_dir);
        std::env::set_var("LOG_DIR", data_dir.join("log"));

        let config = AppConfig::from_env().unwrap();

        std::env::remove_var("DATA_DIR");
        std::env::remove_var("LOG_DIR");
        assert_eq!(config.data_dir, data_dir);
        assert!(!data_dir.exists());
    }
}
