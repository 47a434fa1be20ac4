//! CLI command definitions and handlers

use clap::Subcommand;
use std::path::PathBuf;

/// Commands for the BabelDOC web front end
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the HTTP server
    Server {
        /// Bind address (default: 0.0.0.0)
        #[arg(long, default_value = "0.0.0.0")]
        host: String,

        /// Listen port (default: SERVER_PORT env var or 7860)
        #[arg(short, long)]
        port: Option<u16>,

        /// Enable debug mode
        #[arg(long)]
        debug: bool,
    },

    /// Translate one PDF without starting the server
    Translate {
        /// Input PDF file (required)
        #[arg(short, long)]
        file: PathBuf,

        /// Provider preset to use (default: OpenAI)
        #[arg(long, default_value = "OpenAI")]
        provider: String,

        /// API key (defaults to the provider preset)
        #[arg(long)]
        api_key: Option<String>,

        /// API base URL (defaults to the provider preset)
        #[arg(long)]
        base_url: Option<String>,

        /// Model name (defaults to the provider preset)
        #[arg(short, long)]
        model: Option<String>,

        /// Source language (default: en)
        #[arg(long, default_value = "en")]
        lang_in: String,

        /// Target language (default: zh)
        #[arg(short, long, default_value = "zh")]
        lang_out: String,

        /// Disable the dual-language output
        #[arg(long)]
        no_dual: bool,

        /// Suppress the generated-by watermark
        #[arg(long)]
        no_watermark: bool,

        /// Skip PDF cleaning
        #[arg(long)]
        skip_clean: bool,

        /// Disable rich text translation
        #[arg(long)]
        disable_rich_text: bool,

        /// Enhance output compatibility
        #[arg(long)]
        enhance_compatibility: bool,

        /// Maximum pages per part
        #[arg(long)]
        max_pages_per_part: Option<u32>,

        /// Minimum text length to translate
        #[arg(long)]
        min_text_length: Option<u32>,
    },
}

/// Handle server command
pub async fn handle_server(host: String, port: Option<u16>, debug: bool) -> anyhow::Result<()> {
    use crate::core::config::AppConfig;
    use crate::server::api::run_server;
    use tracing::info;

    if debug {
        std::env::set_var("RUST_LOG", "debug");
    }

    let mut config = AppConfig::from_env()?;
    if let Some(port) = port {
        config.server_port = port;
    }

    info!("Starting HTTP server on {}:{}", host, config.server_port);
    println!("🚀 Server starting on http://{}:{}", host, config.server_port);

    run_server(host, config).await?;

    Ok(())
}

/// Handle one-shot translate command
#[allow(clippy::too_many_arguments)]
pub async fn handle_translate(
    file: PathBuf,
    provider: String,
    api_key: Option<String>,
    base_url: Option<String>,
    model: Option<String>,
    lang_in: String,
    lang_out: String,
    no_dual: bool,
    no_watermark: bool,
    skip_clean: bool,
    disable_rich_text: bool,
    enhance_compatibility: bool,
    max_pages_per_part: Option<u32>,
    min_text_length: Option<u32>,
) -> anyhow::Result<()> {
    use crate::core::config::AppConfig;
    use crate::core::engine::BabeldocEngine;
    use crate::core::handler::RequestHandler;
    use crate::core::models::{JobParams, TranslationOptions, Upload};
    use crate::core::providers::ProviderRegistry;
    use crate::core::storage::StorageManager;
    use tracing::info;

    let config = AppConfig::from_env()?;
    config.validate()?;

    let registry = ProviderRegistry::new(config.providers.clone());
    let preset = registry.resolve(&provider)?;

    let params = JobParams {
        provider: provider.clone(),
        api_key: api_key.unwrap_or_else(|| preset.api_key.clone()),
        base_url: base_url.unwrap_or_else(|| preset.base_url.clone()),
        model: model.unwrap_or_else(|| preset.default_model.clone()),
        lang_in,
        lang_out,
        options: TranslationOptions {
            dual_output: !no_dual,
            no_watermark,
            skip_clean,
            rich_text_disable: disable_rich_text,
            enhance_compatibility,
            max_pages_per_part,
            min_text_length,
        },
    };

    let filename = file
        .file_name()
        .ok_or_else(|| anyhow::anyhow!("input path has no filename: {}", file.display()))?
        .to_string_lossy()
        .into_owned();
    let bytes = std::fs::read(&file)?;

    let storage = StorageManager::new(&config.upload_dir, &config.output_dir);
    storage.ensure_dirs()?;

    let engine = BabeldocEngine::new(config.engine_program.clone());
    let handler = RequestHandler::new(storage, engine, config.retention_limit);

    info!("Translating {} via {}", file.display(), provider);

    let result = handler.submit(Some(Upload { filename, bytes }), &params).await;

    println!("{}", result.status);
    match result.artifact {
        Some(artifact) => {
            println!("📄 {}", artifact.display());
            Ok(())
        }
        None => Err(anyhow::anyhow!("translation did not produce an artifact")),
    }
}
