//! BabelDOC Web - translation job orchestration for the BabelDOC engine
//!
//! This library accepts PDF translation requests, manages the upload and
//! output file lifecycle, invokes the external BabelDOC engine, and exposes
//! the whole flow over an HTTP API.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

pub mod cli;
pub mod core;
pub mod server;

// Re-export key types for convenience
pub use crate::core::{
    config::AppConfig,
    discovery::ModelDiscovery,
    engine::{build_args, BabeldocEngine, EngineExit, TranslationEngine},
    errors::TranslateError,
    handler::RequestHandler,
    models::{JobParams, JobResult, ProviderPreset, TranslationOptions, TranslationRequest, Upload},
    providers::ProviderRegistry,
    runner::JobRunner,
    storage::StorageManager,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
