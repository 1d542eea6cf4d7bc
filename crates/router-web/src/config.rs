//! Configuration loader (§4.8): produces one immutable [`AppConfig`] at
//! process start from an optional YAML file, with LLM credentials layered on
//! top from environment variables regardless of what the file says.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use router_kernel::defaults::{default_analysis_config, default_validation_config};
use router_kernel::{AnalysisConfig, ValidationConfig};

pub const CONFIG_PATH_ENV: &str = "ROUTER_CONFIG_PATH";
pub const DEFAULT_CONFIG_PATH: &str = "config.yaml";

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_bind_addr() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            port: default_port(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LlmConfig {
    #[serde(default)]
    pub base_url: String,
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_tool_calling_models")]
    pub tool_calling_models: Vec<String>,
}

fn default_model() -> String {
    "llama3.1".to_string()
}

fn default_timeout_secs() -> u64 {
    60
}

fn default_tool_calling_models() -> Vec<String> {
    router_agent::TOOL_CALLING_MODELS
        .iter()
        .map(|s| s.to_string())
        .collect()
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            api_key: String::new(),
            model: default_model(),
            request_timeout_secs: default_timeout_secs(),
            tool_calling_models: default_tool_calling_models(),
        }
    }
}

fn default_projects_root() -> String {
    "./projects-data".to_string()
}

/// Process-wide configuration, loaded once (§3.1).
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default = "default_analysis_config")]
    pub analysis: AnalysisConfig,
    #[serde(default = "default_validation_config")]
    pub validation: ValidationConfig,
    /// Filesystem root the reference "projects" tool operates under (§4.7).
    /// Not named in the distilled core spec's data model since that spec
    /// treats the tool as external; the ambient expansion needs a concrete
    /// root to actually run it.
    #[serde(default = "default_projects_root")]
    pub projects_root: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            llm: LlmConfig::default(),
            analysis: default_analysis_config(),
            validation: default_validation_config(),
            projects_root: default_projects_root(),
        }
    }
}

impl AppConfig {
    /// Load from `path`, or `$ROUTER_CONFIG_PATH`, or `config.yaml`. Falls
    /// back to built-in defaults wholesale -- never a partial merge -- when
    /// the file is missing or fails to parse (§9 "Config fallback is
    /// all-or-nothing"), then layers environment-variable LLM credentials on
    /// top either way.
    pub fn load(path: Option<&Path>) -> Self {
        let resolved: PathBuf = path.map(Path::to_path_buf).unwrap_or_else(|| {
            std::env::var(CONFIG_PATH_ENV)
                .unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string())
                .into()
        });

        let mut config = match std::fs::read_to_string(&resolved) {
            Ok(contents) => match serde_yaml::from_str::<AppConfig>(&contents) {
                Ok(config) => {
                    tracing::info!(path = %resolved.display(), "loaded configuration file");
                    config
                }
                Err(err) => {
                    tracing::warn!(
                        path = %resolved.display(),
                        error = %err,
                        "configuration file failed to parse, falling back to built-in defaults"
                    );
                    AppConfig::default()
                }
            },
            Err(_) => {
                tracing::warn!(
                    path = %resolved.display(),
                    "configuration file not found, using built-in defaults"
                );
                AppConfig::default()
            }
        };

        config.apply_env_overrides();
        config
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(base_url) = std::env::var("ROUTER_LLM_BASE_URL") {
            self.llm.base_url = base_url;
        }
        if let Ok(api_key) = std::env::var("ROUTER_LLM_API_KEY") {
            self.llm.api_key = api_key;
        }
        if let Ok(model) = std::env::var("ROUTER_LLM_MODEL") {
            self.llm.model = model;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let config = AppConfig::load(Some(Path::new("/nonexistent/config.yaml")));
        assert_eq!(config.analysis.default_namespace, "test");
        assert_eq!(config.server.port, 8080);
    }

    #[test]
    fn malformed_file_falls_back_wholesale_not_partial() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "server: {{ not: valid: yaml: [").unwrap();
        let config = AppConfig::load(Some(file.path()));
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.validation.min_response_length, 50);
    }

    #[test]
    fn valid_file_overrides_server_port() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "server:\n  bind_addr: \"0.0.0.0\"\n  port: 9000\n").unwrap();
        let config = AppConfig::load(Some(file.path()));
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.bind_addr, "0.0.0.0");
        // Untouched sections still fall back to their own field defaults.
        assert_eq!(config.analysis.default_namespace, "test");
    }

    #[test]
    fn env_var_wins_over_file_base_url() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "llm:\n  base_url: \"http://from-file:11434/v1\"\n").unwrap();
        unsafe {
            std::env::set_var("ROUTER_LLM_BASE_URL", "http://from-env:11434/v1");
        }
        let config = AppConfig::load(Some(file.path()));
        unsafe {
            std::env::remove_var("ROUTER_LLM_BASE_URL");
        }
        assert_eq!(config.llm.base_url, "http://from-env:11434/v1");
    }
}
