//! Main entry point for the BabelDOC web front end

#![forbid(unsafe_code)]

use clap::Parser;
use dotenvy::dotenv;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use babeldoc_web::cli::commands::{self, Commands};

/// BabelDOC Web - PDF translation front end and job orchestrator
#[derive(Parser, Debug)]
#[command(name = "babeldoc-web", version, about, long_about = None)]
struct Args {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenv().ok();

    let args = Args::parse();

    // Initialize logging
    let log_level = if args.verbose { "debug" } else { "info" };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("babeldoc_web={log_level}").into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Execute command
    match args.command {
        Some(Commands::Server { host, port, debug }) => {
            commands::handle_server(host, port, debug).await?;
        }
        Some(Commands::Translate {
            file,
            provider,
            api_key,
            base_url,
            model,
            lang_in,
            lang_out,
            no_dual,
            no_watermark,
            skip_clean,
            disable_rich_text,
            enhance_compatibility,
            max_pages_per_part,
            min_text_length,
        }) => {
            commands::handle_translate(
                file,
                provider,
                api_key,
                base_url,
                model,
                lang_in,
                lang_out,
                no_dual,
                no_watermark,
                skip_clean,
                disable_rich_text,
                enhance_compatibility,
                max_pages_per_part,
                min_text_length,
            )
            .await?;
        }
        None => {
            println!("Please specify a command. Use --help for more information.");
        }
    }

    Ok(())
}
