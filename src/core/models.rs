//! Core data models for translation jobs

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// How a provider hosts its models
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProviderKind {
    /// OpenAI-compatible remote API, authenticated
    Remote,
    /// Local model host (Ollama), unauthenticated
    Local,
}

/// Default endpoint/credential/model bundle for a provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderPreset {
    pub kind: ProviderKind,
    pub base_url: String,
    pub api_key: String,
    pub default_model: String,
}

/// Per-job engine toggles, each mapping independently to one CLI flag
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslationOptions {
    pub dual_output: bool,
    pub no_watermark: bool,
    pub skip_clean: bool,
    pub rich_text_disable: bool,
    pub enhance_compatibility: bool,
    pub max_pages_per_part: Option<u32>,
    pub min_text_length: Option<u32>,
}

impl Default for TranslationOptions {
    fn default() -> Self {
        Self {
            dual_output: true,
            no_watermark: false,
            skip_clean: false,
            rich_text_disable: false,
            enhance_compatibility: false,
            max_pages_per_part: None,
            min_text_length: None,
        }
    }
}

/// Parse a free-text numeric field; blank or non-numeric text means unset
pub fn optional_count(raw: &str) -> Option<u32> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse().ok()
}

/// One validated translation job, immutable once built
#[derive(Debug, Clone)]
pub struct TranslationRequest {
    pub input_path: PathBuf,
    pub model: String,
    pub base_url: String,
    pub api_key: String,
    pub lang_in: String,
    pub lang_out: String,
    pub options: TranslationOptions,
}

/// User-facing parameters of a submission, before file persistence
#[derive(Debug, Clone)]
pub struct JobParams {
    pub provider: String,
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub lang_in: String,
    pub lang_out: String,
    pub options: TranslationOptions,
}

/// An uploaded document held in memory before it is persisted
#[derive(Debug, Clone)]
pub struct Upload {
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// Terminal outcome of one job: a status line plus the artifact on success
#[derive(Debug, Clone, Serialize)]
pub struct JobResult {
    pub status: String,
    pub artifact: Option<PathBuf>,
}

impl JobResult {
    /// Successful completion with a produced artifact
    pub fn success(status: impl Into<String>, artifact: PathBuf) -> Self {
        Self {
            status: status.into(),
            artifact: Some(artifact),
        }
    }

    /// Failure with a diagnostic status and no artifact
    pub fn failure(status: impl Into<String>) -> Self {
        Self {
            status: status.into(),
            artifact: None,
        }
    }

    /// True when the job produced an artifact
    pub fn is_success(&self) -> bool {
        self.artifact.is_some()
    }
}
