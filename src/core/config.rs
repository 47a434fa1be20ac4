//! Configuration management

use std::path::PathBuf;

use crate::core::models::{ProviderKind, ProviderPreset};

/// Process-level configuration, built once at startup and never mutated
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub upload_dir: PathBuf,
    pub output_dir: PathBuf,
    pub retention_limit: usize,
    pub server_port: u16,
    pub engine_program: String,
    /// Provider catalog in display order
    pub providers: Vec<(String, ProviderPreset)>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            upload_dir: PathBuf::from("uploads"),
            output_dir: PathBuf::from("output"),
            retention_limit: 30,
            server_port: 7860,
            engine_program: "babeldoc".to_string(),
            providers: default_providers(),
        }
    }
}

/// Read one provider preset from its `DEFAULT_{NAME}_*` override variables
fn preset_from(
    lookup: &dyn Fn(&str) -> Option<String>,
    env_name: &str,
    kind: ProviderKind,
    fallback_url: &str,
    fallback_model: &str,
) -> ProviderPreset {
    ProviderPreset {
        kind,
        base_url: lookup(&format!("DEFAULT_{env_name}_BASE_URL"))
            .unwrap_or_else(|| fallback_url.to_string()),
        api_key: lookup(&format!("DEFAULT_{env_name}_API_KEY")).unwrap_or_default(),
        default_model: lookup(&format!("DEFAULT_{env_name}_DEFAULT_MODEL"))
            .unwrap_or_else(|| fallback_model.to_string()),
    }
}

/// Built-in provider catalog with overrides resolved through `lookup`
fn providers_from(lookup: &dyn Fn(&str) -> Option<String>) -> Vec<(String, ProviderPreset)> {
    vec![
        (
            "OpenAI".to_string(),
            preset_from(
                lookup,
                "OPENAI",
                ProviderKind::Remote,
                "https://api.openai.com/v1",
                "gpt-4o",
            ),
        ),
        (
            "DeepSeek".to_string(),
            preset_from(
                lookup,
                "DEEPSEEK",
                ProviderKind::Remote,
                "https://api.deepseek.com/v1",
                "deepseek-chat",
            ),
        ),
        (
            "Ollama".to_string(),
            preset_from(
                lookup,
                "OLLAMA",
                ProviderKind::Local,
                "http://localhost:11434/v1",
                "llama3",
            ),
        ),
    ]
}

/// Built-in provider catalog with environment overrides
fn default_providers() -> Vec<(String, ProviderPreset)> {
    providers_from(&|key| std::env::var(key).ok())
}

impl AppConfig {
    /// Load configuration from environment variables with built-in fallbacks
    pub fn from_env() -> anyhow::Result<Self> {
        let upload_dir = std::env::var("UPLOAD_DIR")
            .unwrap_or_else(|_| "uploads".to_string())
            .into();

        let output_dir = std::env::var("OUTPUT_DIR")
            .unwrap_or_else(|_| "output".to_string())
            .into();

        let retention_limit = std::env::var("RETENTION_LIMIT")
            .unwrap_or_else(|_| "30".to_string())
            .parse::<usize>()?;

        let server_port = std::env::var("SERVER_PORT")
            .unwrap_or_else(|_| "7860".to_string())
            .parse::<u16>()?;

        let engine_program =
            std::env::var("BABELDOC_COMMAND").unwrap_or_else(|_| "babeldoc".to_string());

        Ok(Self {
            upload_dir,
            output_dir,
            retention_limit,
            server_port,
            engine_program,
            providers: default_providers(),
        })
    }

    /// Validate configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.engine_program.is_empty() {
            return Err(anyhow::anyhow!("engine program name is required"));
        }

        if self.providers.is_empty() {
            return Err(anyhow::anyhow!("provider catalog is empty"));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.retention_limit, 30);
        assert_eq!(config.server_port, 7860);
    }

    #[test]
    fn test_default_catalog_entries() {
        let config = AppConfig::default();
        let names: Vec<&str> = config.providers.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["OpenAI", "DeepSeek", "Ollama"]);

        let (_, ollama) = config
            .providers
            .iter()
            .find(|(n, _)| n == "Ollama")
            .unwrap();
        assert_eq!(ollama.kind, ProviderKind::Local);
        assert_eq!(ollama.default_model, "llama3");
    }

    #[test]
    fn test_catalog_override() {
        let overrides = |key: &str| match key {
            "DEFAULT_DEEPSEEK_DEFAULT_MODEL" => Some("deepseek-reasoner".to_string()),
            "DEFAULT_OPENAI_API_KEY" => Some("sk-seeded".to_string()),
            _ => None,
        };

        let providers = providers_from(&overrides);

        let (_, deepseek) = providers.iter().find(|(n, _)| n == "DeepSeek").unwrap();
        assert_eq!(deepseek.default_model, "deepseek-reasoner");
        // untouched fields keep their built-in fallbacks
        assert_eq!(deepseek.base_url, "https://api.deepseek.com/v1");

        let (_, openai) = providers.iter().find(|(n, _)| n == "OpenAI").unwrap();
        assert_eq!(openai.api_key, "sk-seeded");
    }
}
