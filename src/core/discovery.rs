//! Model list discovery for remote and local providers

use std::time::Duration;

use serde::Deserialize;
use tracing::debug;

use crate::core::errors::Result;

/// Fallback model assumed to exist on a local host that cannot be queried
const LOCAL_FALLBACK_MODEL: &str = "llama3";

/// Default local model host (Ollama)
const LOCAL_HOST: &str = "http://localhost:11434";

/// OpenAI-compatible `/models` listing body
#[derive(Deserialize)]
struct RemoteModelList {
    data: Vec<RemoteModel>,
}

#[derive(Deserialize)]
struct RemoteModel {
    id: String,
}

/// Ollama `/api/tags` listing body
#[derive(Deserialize)]
struct LocalTagList {
    models: Vec<LocalTag>,
}

#[derive(Deserialize)]
struct LocalTag {
    name: String,
}

/// Queries providers for their available model identifiers.
///
/// Discovery failures are absorbed, never propagated: the remote strategy
/// degrades to an empty list, the local strategy to a single built-in
/// fallback. The asymmetry is deliberate and matches observed UI behavior.
#[derive(Debug, Clone)]
pub struct ModelDiscovery {
    client: reqwest::Client,
    local_host: String,
}

impl Default for ModelDiscovery {
    fn default() -> Self {
        Self::new()
    }
}

impl ModelDiscovery {
    /// Client against the standard local host
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
            local_host: LOCAL_HOST.to_string(),
        }
    }

    /// Override the local host, for tests
    pub fn with_local_host(mut self, host: impl Into<String>) -> Self {
        self.local_host = host.into();
        self
    }

    /// List models from an OpenAI-compatible endpoint.
    ///
    /// Returns an empty list on any network failure, non-200 response, or
    /// malformed body.
    pub async fn remote_models(&self, api_key: &str, base_url: &str) -> Vec<String> {
        match self.fetch_remote(api_key, base_url).await {
            Ok(models) => models,
            Err(e) => {
                debug!("Remote model discovery failed: {}", e);
                Vec::new()
            }
        }
    }

    async fn fetch_remote(&self, api_key: &str, base_url: &str) -> Result<Vec<String>> {
        let url = format!("{}/models", base_url.trim_end_matches('/'));
        let response = self
            .client
            .get(&url)
            .header("Authorization", format!("Bearer {api_key}"))
            .timeout(Duration::from_secs(5))
            .send()
            .await?
            .error_for_status()?;

        let body: RemoteModelList = response.json().await?;
        Ok(body.data.into_iter().map(|m| m.id).collect())
    }

    /// List models from the local host.
    ///
    /// Returns the built-in fallback model when the host is unreachable or
    /// replies with garbage, never an empty list.
    pub async fn local_models(&self) -> Vec<String> {
        match self.fetch_local().await {
            Ok(models) => models,
            Err(e) => {
                debug!("Local model discovery failed: {}", e);
                vec![LOCAL_FALLBACK_MODEL.to_string()]
            }
        }
    }

    async fn fetch_local(&self) -> Result<Vec<String>> {
        let url = format!("{}/api/tags", self.local_host.trim_end_matches('/'));
        let response = self.client.get(&url).send().await?.error_for_status()?;

        let body: LocalTagList = response.json().await?;
        Ok(body.models.into_iter().map(|m| m.name).collect())
    }
}
