//! Single entry point for one translation request

use tracing::{debug, info, warn};

use crate::core::engine::TranslationEngine;
use crate::core::models::{JobParams, JobResult, TranslationRequest, Upload};
use crate::core::runner::JobRunner;
use crate::core::storage::StorageManager;

/// Status line returned when no file came with the request
pub const STATUS_NO_FILE: &str = "Please upload a PDF file";

/// Ties storage, retention, and job execution together; owns no state of its
/// own beyond its collaborators.
#[derive(Debug, Clone)]
pub struct RequestHandler<E> {
    storage: StorageManager,
    runner: JobRunner<E>,
    retention_limit: usize,
}

impl<E: TranslationEngine> RequestHandler<E> {
    /// Handler over the given storage and engine
    pub fn new(storage: StorageManager, engine: E, retention_limit: usize) -> Self {
        Self {
            storage,
            runner: JobRunner::new(engine),
            retention_limit,
        }
    }

    /// Storage manager backing this handler
    pub fn storage(&self) -> &StorageManager {
        &self.storage
    }

    /// Accept one submission and drive it to a terminal result.
    ///
    /// Every failure — missing file, filesystem trouble, engine error — comes
    /// back as a diagnostic status in the `JobResult`; this method never
    /// returns an error to the serving layer.
    pub async fn submit(&self, upload: Option<Upload>, params: &JobParams) -> JobResult {
        let upload = match upload {
            Some(upload) if !upload.filename.is_empty() => upload,
            _ => return JobResult::failure(STATUS_NO_FILE),
        };

        info!(
            "Submission: file={} provider={} model={} {}->{}",
            upload.filename, params.provider, params.model, params.lang_in, params.lang_out
        );

        let sweep = self.storage.enforce_retention(self.retention_limit);
        if sweep.removed > 0 || !sweep.warnings.is_empty() {
            debug!(
                "Retention sweep removed {} uploads ({} warnings)",
                sweep.removed,
                sweep.warnings.len()
            );
        }

        let input_path = match self.storage.persist_upload(&upload.bytes, &upload.filename) {
            Ok(path) => path,
            Err(e) => {
                warn!("Cannot store upload: {}", e);
                return JobResult::failure(format!("Translation failed: cannot store upload: {e}"));
            }
        };

        let output_dir = match self.storage.create_output_directory(&upload.filename) {
            Ok(dir) => dir,
            Err(e) => {
                warn!("Cannot create output directory: {}", e);
                return JobResult::failure(format!(
                    "Translation failed: cannot create output directory: {e}"
                ));
            }
        };

        let request = TranslationRequest {
            input_path,
            model: params.model.clone(),
            base_url: params.base_url.clone(),
            api_key: params.api_key.clone(),
            lang_in: params.lang_in.clone(),
            lang_out: params.lang_out.clone(),
            options: params.options.clone(),
        };

        self.runner.run(&request, &output_dir).await
    }
}
