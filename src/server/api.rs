//! HTTP API server implementation

use axum::{
    extract::{DefaultBodyLimit, Multipart, Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::core::config::AppConfig;
use crate::core::discovery::ModelDiscovery;
use crate::core::engine::BabeldocEngine;
use crate::core::handler::RequestHandler;
use crate::core::models::{optional_count, JobParams, ProviderKind, TranslationOptions, Upload};
use crate::core::providers::ProviderRegistry;
use crate::core::storage::StorageManager;

/// Application state
pub struct AppState {
    handler: RequestHandler<BabeldocEngine>,
    registry: ProviderRegistry,
    discovery: ModelDiscovery,
    output_dir: PathBuf,
}

impl AppState {
    /// Assemble the serving state from its collaborators
    pub fn new(
        handler: RequestHandler<BabeldocEngine>,
        registry: ProviderRegistry,
        discovery: ModelDiscovery,
        output_dir: PathBuf,
    ) -> Self {
        Self {
            handler,
            registry,
            discovery,
            output_dir,
        }
    }
}

/// Health check response
#[derive(Serialize)]
struct HealthResponse {
    status: String,
    service: String,
    version: String,
}

/// Provider name listing
#[derive(Serialize)]
struct ProvidersResponse {
    providers: Vec<String>,
}

/// Active configuration after a provider change
#[derive(Serialize)]
struct ProviderResponse {
    api_key: String,
    base_url: String,
    models: Vec<String>,
}

/// Model refresh request
#[derive(Deserialize)]
pub struct RefreshRequest {
    pub api_key: String,
    pub base_url: String,
}

/// Model listing response
#[derive(Serialize)]
struct ModelsResponse {
    models: Vec<String>,
}

/// Translation submission response
#[derive(Serialize)]
struct TranslateResponse {
    status: String,
    /// Download path under `/outputs` when the job succeeded
    artifact: Option<String>,
}

/// Error response
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Serialize)]
pub struct ErrorDetail {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

/// Health check handler
async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        service: "babeldoc-web".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Provider catalog handler
async fn list_providers(State(state): State<Arc<AppState>>) -> Json<ProvidersResponse> {
    Json(ProvidersResponse {
        providers: state
            .registry
            .names()
            .into_iter()
            .map(String::from)
            .collect(),
    })
}

/// Change-provider handler: preset credentials plus a model choice list
async fn change_provider(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Result<Json<ProviderResponse>, (StatusCode, Json<ErrorResponse>)> {
    let preset = state.registry.resolve(&name).map_err(|e| {
        (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: ErrorDetail {
                    message: e.to_string(),
                    code: Some("unknown_provider".to_string()),
                },
            }),
        )
    })?;

    let models = match preset.kind {
        ProviderKind::Local => state.discovery.local_models().await,
        ProviderKind::Remote => vec![preset.default_model.clone()],
    };

    Ok(Json(ProviderResponse {
        api_key: preset.api_key.clone(),
        base_url: preset.base_url.clone(),
        models,
    }))
}

/// Refresh-models handler against an OpenAI-compatible endpoint
async fn refresh_models(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<RefreshRequest>,
) -> Json<ModelsResponse> {
    let models = state
        .discovery
        .remote_models(&payload.api_key, &payload.base_url)
        .await;
    Json(ModelsResponse { models })
}

/// True for the truthy spellings HTML forms send
fn parse_flag(text: &str) -> bool {
    matches!(text.trim(), "true" | "1" | "on" | "yes")
}

/// Translation submission handler: multipart file plus form fields
async fn translate(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Json<TranslateResponse> {
    let mut upload: Option<Upload> = None;
    let mut params = JobParams {
        provider: "OpenAI".to_string(),
        api_key: String::new(),
        base_url: String::new(),
        model: String::new(),
        lang_in: "en".to_string(),
        lang_out: "zh".to_string(),
        options: TranslationOptions::default(),
    };

    while let Some(field) = multipart.next_field().await.unwrap_or(None) {
        let Some(name) = field.name().map(String::from) else {
            continue;
        };

        if name == "file" {
            let filename = field.file_name().unwrap_or_default().to_string();
            if let Ok(bytes) = field.bytes().await {
                upload = Some(Upload {
                    filename,
                    bytes: bytes.to_vec(),
                });
            }
            continue;
        }

        let Ok(value) = field.text().await else {
            continue;
        };

        match name.as_str() {
            "provider" => params.provider = value,
            "api_key" => params.api_key = value,
            "base_url" => params.base_url = value,
            "model" => params.model = value,
            "lang_in" => params.lang_in = value,
            "lang_out" => params.lang_out = value,
            "dual_output" => params.options.dual_output = parse_flag(&value),
            "no_watermark" => params.options.no_watermark = parse_flag(&value),
            "skip_clean" => params.options.skip_clean = parse_flag(&value),
            "rich_text_disable" => params.options.rich_text_disable = parse_flag(&value),
            "enhance_compatibility" => {
                params.options.enhance_compatibility = parse_flag(&value)
            }
            "max_pages_per_part" => params.options.max_pages_per_part = optional_count(&value),
            "min_text_length" => params.options.min_text_length = optional_count(&value),
            _ => {}
        }
    }

    let result = state.handler.submit(upload, &params).await;

    let artifact = result.artifact.as_ref().map(|path| {
        match path.strip_prefix(&state.output_dir) {
            Ok(rel) => format!("/outputs/{}", rel.display()),
            Err(_) => path.display().to_string(),
        }
    });

    Json(TranslateResponse {
        status: result.status,
        artifact,
    })
}

/// Build the router over shared application state
pub fn build_router(state: Arc<AppState>) -> Router {
    let outputs = ServeDir::new(&state.output_dir);

    Router::new()
        .route("/", get(health_check))
        .route("/translate", post(translate))
        .route("/providers", get(list_providers))
        .route("/providers/:name", get(change_provider))
        .route("/models/refresh", post(refresh_models))
        .nest_service("/outputs", outputs)
        .layer(DefaultBodyLimit::max(200 * 1024 * 1024))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Run the HTTP server
pub async fn run_server(host: String, config: AppConfig) -> anyhow::Result<()> {
    config.validate()?;

    let storage = StorageManager::new(&config.upload_dir, &config.output_dir);
    storage.ensure_dirs()?;

    let engine = BabeldocEngine::new(config.engine_program.clone());
    let handler = RequestHandler::new(storage, engine, config.retention_limit);

    let state = Arc::new(AppState::new(
        handler,
        ProviderRegistry::new(config.providers.clone()),
        ModelDiscovery::new(),
        config.output_dir.clone(),
    ));

    let app = build_router(state);

    let addr: SocketAddr = format!("{}:{}", host, config.server_port).parse()?;
    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
