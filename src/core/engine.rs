//! External translation engine boundary

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

use crate::core::errors::{Result, TranslateError};
use crate::core::models::TranslationRequest;
use std::path::Path;

/// Exit report from one engine invocation
#[derive(Debug, Clone)]
pub struct EngineExit {
    /// Process exit code; `None` when killed by a signal
    pub code: Option<i32>,
    /// Captured stderr text
    pub stderr: String,
}

impl EngineExit {
    /// True iff the process exited with status zero
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

/// Opaque external engine: one operation, swappable for a mock in tests
#[async_trait]
pub trait TranslationEngine: Send + Sync {
    /// Run the engine with the given argument list and wait for it to exit
    async fn invoke(&self, args: &[String]) -> Result<EngineExit>;
}

/// The real BabelDOC CLI invoked as a subprocess
#[derive(Debug, Clone)]
pub struct BabeldocEngine {
    program: String,
}

impl BabeldocEngine {
    /// Engine driving the named program (normally `babeldoc`)
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

#[async_trait]
impl TranslationEngine for BabeldocEngine {
    async fn invoke(&self, args: &[String]) -> Result<EngineExit> {
        debug!("Spawning {} with {} arguments", self.program, args.len());

        // Blocks the request for the full translation; no timeout or
        // cancellation hook exists once the process starts.
        let output = Command::new(&self.program)
            .args(args)
            .output()
            .await
            .map_err(|e| TranslateError::EngineFailed {
                message: format!("failed to launch {}: {e}", self.program),
            })?;

        Ok(EngineExit {
            code: output.status.code(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

/// Build the BabelDOC argument list for one request.
///
/// Flag spelling and ordering follow the engine's CLI contract exactly; the
/// credential and endpoint travel as plain arguments and are visible to any
/// process inspector on the host.
pub fn build_args(request: &TranslationRequest, output_dir: &Path) -> Vec<String> {
    let mut args = vec![
        "--files".to_string(),
        request.input_path.display().to_string(),
        "--openai".to_string(),
        "--openai-model".to_string(),
        request.model.clone(),
        "--openai-base-url".to_string(),
        request.base_url.clone(),
        "--openai-api-key".to_string(),
        request.api_key.clone(),
        "--lang-in".to_string(),
        request.lang_in.clone(),
        "--lang-out".to_string(),
        request.lang_out.clone(),
        "--output".to_string(),
        output_dir.display().to_string(),
    ];

    let options = &request.options;

    if !options.dual_output {
        args.push("--no-dual".to_string());
    }
    if options.no_watermark {
        args.push("--watermark-output-mode".to_string());
        args.push("no_watermark".to_string());
    }
    if options.skip_clean {
        args.push("--skip-clean".to_string());
    }
    if options.rich_text_disable {
        args.push("--disable-rich-text-translate".to_string());
    }
    if options.enhance_compatibility {
        args.push("--enhance-compatibility".to_string());
    }
    if let Some(max_pages) = options.max_pages_per_part {
        args.push("--max-pages-per-part".to_string());
        args.push(max_pages.to_string());
    }
    if let Some(min_length) = options.min_text_length {
        args.push("--min-text-length".to_string());
        args.push(min_length.to_string());
    }

    args
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::TranslationOptions;
    use std::path::PathBuf;

    fn request(options: TranslationOptions) -> TranslationRequest {
        TranslationRequest {
            input_path: PathBuf::from("uploads/abc_doc.pdf"),
            model: "gpt-4o".to_string(),
            base_url: "https://api.openai.com/v1".to_string(),
            api_key: "sk-test".to_string(),
            lang_in: "en".to_string(),
            lang_out: "zh".to_string(),
            options,
        }
    }

    #[test]
    fn test_mandatory_args_in_order() {
        let req = request(TranslationOptions::default());
        let args = build_args(&req, Path::new("output/doc_20240305_140709"));

        let expected: Vec<String> = [
            "--files",
            "uploads/abc_doc.pdf",
            "--openai",
            "--openai-model",
            "gpt-4o",
            "--openai-base-url",
            "https://api.openai.com/v1",
            "--openai-api-key",
            "sk-test",
            "--lang-in",
            "en",
            "--lang-out",
            "zh",
            "--output",
            "output/doc_20240305_140709",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();
        assert_eq!(&args[..15], expected.as_slice());
    }

    #[test]
    fn test_conditional_flags() {
        let options = TranslationOptions {
            dual_output: false,
            no_watermark: true,
            skip_clean: false,
            rich_text_disable: false,
            enhance_compatibility: true,
            max_pages_per_part: Some(2),
            min_text_length: None,
        };
        let args = build_args(&request(options), Path::new("out"));

        assert!(args.contains(&"--no-dual".to_string()));
        assert!(args.contains(&"--enhance-compatibility".to_string()));

        let watermark = args
            .iter()
            .position(|a| a == "--watermark-output-mode")
            .unwrap();
        assert_eq!(args[watermark + 1], "no_watermark");

        let max_pages = args
            .iter()
            .position(|a| a == "--max-pages-per-part")
            .unwrap();
        assert_eq!(args[max_pages + 1], "2");

        assert!(!args.contains(&"--skip-clean".to_string()));
        assert!(!args.contains(&"--disable-rich-text-translate".to_string()));
        assert!(!args.contains(&"--min-text-length".to_string()));
    }

    #[test]
    fn test_all_flags_enabled() {
        let options = TranslationOptions {
            dual_output: true,
            no_watermark: false,
            skip_clean: true,
            rich_text_disable: true,
            enhance_compatibility: false,
            max_pages_per_part: None,
            min_text_length: Some(5),
        };
        let args = build_args(&request(options), Path::new("out"));

        assert!(!args.contains(&"--no-dual".to_string()));
        assert!(!args.contains(&"--watermark-output-mode".to_string()));
        assert!(args.contains(&"--skip-clean".to_string()));
        assert!(args.contains(&"--disable-rich-text-translate".to_string()));

        let min_length = args.iter().position(|a| a == "--min-text-length").unwrap();
        assert_eq!(args[min_length + 1], "5");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_subprocess_failure_carries_stderr() {
        use std::os::unix::fs::PermissionsExt;

        let tmp = tempfile::tempdir().unwrap();
        let script = tmp.path().join("engine.sh");
        std::fs::write(&script, "#!/bin/sh\necho oops >&2\nexit 3\n").unwrap();
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();

        let engine = BabeldocEngine::new(script.display().to_string());
        let exit = engine.invoke(&[]).await.unwrap();

        assert_eq!(exit.code, Some(3));
        assert!(!exit.success());
        assert!(exit.stderr.contains("oops"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_missing_program_is_engine_failure() {
        let engine = BabeldocEngine::new("/nonexistent/babeldoc");
        let err = engine.invoke(&[]).await.unwrap_err();
        assert!(matches!(err, TranslateError::EngineFailed { .. }));
    }
}
