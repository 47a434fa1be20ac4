//! Provider preset catalog

use crate::core::errors::{Result, TranslateError};
use crate::core::models::ProviderPreset;

/// Read-only catalog of named provider presets
#[derive(Debug, Clone)]
pub struct ProviderRegistry {
    presets: Vec<(String, ProviderPreset)>,
}

impl ProviderRegistry {
    /// Build the registry from an explicit catalog; entries keep their order
    pub fn new(presets: Vec<(String, ProviderPreset)>) -> Self {
        Self { presets }
    }

    /// Look up a preset by display name
    pub fn resolve(&self, name: &str) -> Result<&ProviderPreset> {
        self.presets
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, preset)| preset)
            .ok_or_else(|| TranslateError::UnknownProvider {
                name: name.to_string(),
            })
    }

    /// Provider names in catalog order
    pub fn names(&self) -> Vec<&str> {
        self.presets.iter().map(|(n, _)| n.as_str()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::ProviderKind;

    fn catalog() -> Vec<(String, ProviderPreset)> {
        vec![(
            "OpenAI".to_string(),
            ProviderPreset {
                kind: ProviderKind::Remote,
                base_url: "https://api.openai.com/v1".to_string(),
                api_key: "sk-test".to_string(),
                default_model: "gpt-4o".to_string(),
            },
        )]
    }

    #[test]
    fn test_resolve_known_provider() {
        let registry = ProviderRegistry::new(catalog());
        let preset = registry.resolve("OpenAI").unwrap();
        assert_eq!(preset.default_model, "gpt-4o");
    }

    #[test]
    fn test_resolve_unknown_provider() {
        let registry = ProviderRegistry::new(catalog());
        let err = registry.resolve("Claude").unwrap_err();
        assert!(matches!(
            err,
            TranslateError::UnknownProvider { ref name } if name == "Claude"
        ));
    }

    #[test]
    fn test_names_keep_order() {
        let registry = ProviderRegistry::new(catalog());
        assert_eq!(registry.names(), vec!["OpenAI"]);
    }
}
