//! Job execution: build arguments, run the engine, discover the artifact

use std::path::Path;

use tracing::{info, warn};

use crate::core::engine::{build_args, TranslationEngine};
use crate::core::models::{JobResult, TranslationRequest};
use crate::core::storage::most_recent_pdf;

/// Status line returned on successful completion
pub const STATUS_COMPLETE: &str = "Translation complete, download below";

/// Runs one job at a time against an external engine
#[derive(Debug, Clone)]
pub struct JobRunner<E> {
    engine: E,
}

impl<E: TranslationEngine> JobRunner<E> {
    /// Runner over the given engine
    pub fn new(engine: E) -> Self {
        Self { engine }
    }

    /// Execute one request and locate the produced artifact.
    ///
    /// All engine and filesystem failures come back as a diagnostic status in
    /// the `JobResult`; nothing propagates past this boundary.
    pub async fn run(&self, request: &TranslationRequest, output_dir: &Path) -> JobResult {
        let args = build_args(request, output_dir);
        info!("Invoking engine: {}", args.join(" "));

        let exit = match self.engine.invoke(&args).await {
            Ok(exit) => exit,
            Err(e) => {
                warn!("Engine invocation failed: {}", e);
                return JobResult::failure(format!("Translation failed: {e}"));
            }
        };

        if !exit.success() {
            let detail = if exit.stderr.trim().is_empty() {
                match exit.code {
                    Some(code) => format!("engine exited with status {code}"),
                    None => "engine was terminated by a signal".to_string(),
                }
            } else {
                exit.stderr.trim().to_string()
            };
            warn!("Engine reported failure: {}", detail);
            return JobResult::failure(format!("Translation failed: {detail}"));
        }

        // A clean exit can still write nothing, e.g. when no pages matched a
        // filter; report that distinctly from an engine error.
        match most_recent_pdf(output_dir) {
            Some(artifact) => {
                info!("Job produced {}", artifact.display());
                JobResult::success(STATUS_COMPLETE, artifact)
            }
            None => {
                warn!("Engine exited cleanly but wrote no PDF to {}", output_dir.display());
                JobResult::failure("Translation failed: no output file was produced")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::engine::EngineExit;
    use crate::core::errors::Result;
    use crate::core::models::TranslationOptions;
    use async_trait::async_trait;
    use std::path::PathBuf;

    struct ScriptedEngine {
        code: i32,
        stderr: &'static str,
        writes: Option<&'static str>,
    }

    #[async_trait]
    impl TranslationEngine for ScriptedEngine {
        async fn invoke(&self, args: &[String]) -> Result<EngineExit> {
            if let Some(name) = self.writes {
                let output = args.iter().position(|a| a == "--output").unwrap();
                let dir = PathBuf::from(&args[output + 1]);
                std::fs::write(dir.join(name), b"%PDF-").unwrap();
            }
            Ok(EngineExit {
                code: Some(self.code),
                stderr: self.stderr.to_string(),
            })
        }
    }

    fn request() -> TranslationRequest {
        TranslationRequest {
            input_path: PathBuf::from("in.pdf"),
            model: "gpt-4o".to_string(),
            base_url: "https://api.openai.com/v1".to_string(),
            api_key: "sk-test".to_string(),
            lang_in: "en".to_string(),
            lang_out: "zh".to_string(),
            options: TranslationOptions::default(),
        }
    }

    #[tokio::test]
    async fn test_zero_exit_with_artifact_succeeds() {
        let tmp = tempfile::tempdir().unwrap();
        let runner = JobRunner::new(ScriptedEngine {
            code: 0,
            stderr: "",
            writes: Some("sample.pdf"),
        });

        let result = runner.run(&request(), tmp.path()).await;

        assert!(result.is_success());
        assert_eq!(result.status, STATUS_COMPLETE);
        let artifact = result.artifact.unwrap();
        assert!(artifact.exists());
        assert_eq!(artifact.file_name().unwrap(), "sample.pdf");
    }

    #[tokio::test]
    async fn test_nonzero_exit_reports_stderr() {
        let tmp = tempfile::tempdir().unwrap();
        let runner = JobRunner::new(ScriptedEngine {
            code: 1,
            stderr: "model quota exhausted",
            writes: None,
        });

        let result = runner.run(&request(), tmp.path()).await;

        assert!(!result.is_success());
        assert!(result.status.contains("model quota exhausted"));
    }

    #[tokio::test]
    async fn test_clean_exit_without_output_is_distinct_failure() {
        let tmp = tempfile::tempdir().unwrap();
        let runner = JobRunner::new(ScriptedEngine {
            code: 0,
            stderr: "",
            writes: None,
        });

        let result = runner.run(&request(), tmp.path()).await;

        assert!(!result.is_success());
        assert!(result.status.contains("no output file was produced"));
    }

    #[tokio::test]
    async fn test_nonzero_exit_without_stderr_reports_code() {
        let tmp = tempfile::tempdir().unwrap();
        let runner = JobRunner::new(ScriptedEngine {
            code: 2,
            stderr: "",
            writes: None,
        });

        let result = runner.run(&request(), tmp.path()).await;

        assert!(!result.is_success());
        assert!(result.status.contains("status 2"));
    }
}
