//! HTTP API server backing the channel browser and translation UI.
//!
//! Provides REST endpoints for channel listing, transcript extraction,
//! translation and production content generation.

use crate::cli::Output;
use crate::config::{Prompts, Settings, YoutubeSettings};
use crate::error::ScribeError;
use crate::http::{HttpTransport, ReqwestTransport};
use crate::orchestrator::TranscriptExtractor;
use crate::transcript::TranscriptResult;
use crate::translation::{GoogleTranslator, ProductionGenerator, LANGUAGES};
use crate::youtube::{ChannelClient, ChannelResolution, VideoPage, VideoSummary};
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};

/// Shared application state.
pub struct AppState {
    extractor: TranscriptExtractor,
    channel: Option<ChannelClient>,
    channel_id: Option<String>,
    translator: GoogleTranslator,
    production: ProductionGenerator,
    youtube: YoutubeSettings,
    default_target: String,
}

impl AppState {
    /// Build the state over `transport` without touching the network.
    fn build(
        settings: &Settings,
        prompts: Prompts,
        transport: Arc<dyn HttpTransport>,
    ) -> crate::error::Result<Self> {
        let channel = match ChannelClient::new(transport.clone(), &settings.youtube) {
            Ok(client) => Some(client),
            Err(e) => {
                warn!("Channel browsing disabled: {}", e);
                None
            }
        };

        Ok(Self {
            extractor: TranscriptExtractor::with_transport(transport.clone(), &settings.transcripts),
            channel,
            channel_id: None,
            translator: GoogleTranslator::new(transport.clone(), &settings.translation),
            production: ProductionGenerator::new(&settings.llm, prompts, transport)?,
            youtube: settings.youtube.clone(),
            default_target: settings.translation.default_target.clone(),
        })
    }

    /// Resolve the configured channel handle once.
    async fn resolve_channel(&mut self) -> ChannelResolution {
        let Some(client) = &self.channel else {
            return ChannelResolution::Unresolved;
        };

        let resolution = match client.resolve_handle(&self.youtube.channel_handle).await {
            Ok(resolution) => resolution,
            Err(e) => {
                warn!("Failed to resolve {}: {}", self.youtube.channel_handle, e);
                ChannelResolution::Unresolved
            }
        };

        self.channel_id = resolution.channel_id().map(str::to_string);
        resolution
    }
}

/// Build the API router.
pub fn router(state: Arc<AppState>, cors: bool) -> Router {
    let app = Router::new()
        .route("/health", get(health))
        .route("/api/channel/videos", get(channel_videos))
        .route("/api/channel/search", get(channel_search))
        .route("/api/transcript", post(extract_transcripts))
        .route("/api/languages", get(languages))
        .route("/api/models", get(models))
        .route("/api/translate", post(translate))
        .route("/api/generate-production", post(generate_production))
        .with_state(state);

    if cors {
        app.layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
    } else {
        app
    }
}

/// Run the HTTP API server.
pub async fn run_serve(
    host: Option<String>,
    port: Option<u16>,
    settings: Settings,
) -> anyhow::Result<()> {
    let prompts = Prompts::load(
        settings.prompts.custom_dir.as_deref(),
        Some(&settings.prompts.variables),
    )?;
    let transport: Arc<dyn HttpTransport> = Arc::new(ReqwestTransport::new(&settings.transcripts)?);

    let mut state = AppState::build(&settings, prompts, transport)?;
    let resolution = state.resolve_channel().await;

    let app = router(Arc::new(state), settings.server.cors);

    let host = host.unwrap_or_else(|| settings.server.host.clone());
    let port = port.unwrap_or(settings.server.port);
    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    Output::header("Tubescribe API Server");
    println!();
    Output::success(&format!("Listening on http://{}", addr));
    match resolution.channel_id() {
        Some(id) => Output::kv("Channel", &format!("{} ({})", settings.youtube.channel_handle, id)),
        None => Output::warning(&format!(
            "Channel {} not resolved; channel routes are disabled",
            settings.youtube.channel_handle
        )),
    }
    if settings.youtube.dev_mode {
        Output::kv("Dev mode", &format!("listing limited to {} videos", settings.youtube.dev_video_limit));
    }
    println!();
    println!("Endpoints:");
    Output::kv("Health", "GET  /health");
    Output::kv("Channel videos", "GET  /api/channel/videos");
    Output::kv("Channel search", "GET  /api/channel/search?q=");
    Output::kv("Transcripts", "POST /api/transcript");
    Output::kv("Languages", "GET  /api/languages");
    Output::kv("Models", "GET  /api/models");
    Output::kv("Translate", "POST /api/translate");
    Output::kv("Production", "POST /api/generate-production");
    println!();
    Output::info("Press Ctrl+C to stop the server.");

    info!("Serving on {}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}

// === Request/Response Types ===

#[derive(Deserialize)]
struct ListingQuery {
    #[serde(default)]
    q: String,
    #[serde(rename = "pageToken")]
    page_token: Option<String>,
}

#[derive(Serialize)]
struct ListingResponse {
    videos: Vec<VideoSummary>,
    #[serde(rename = "nextPageToken")]
    next_page_token: Option<String>,
}

#[derive(Deserialize)]
struct TranscriptRequest {
    #[serde(default)]
    video_ids: Vec<String>,
}

#[derive(Serialize)]
struct TranscriptResponse {
    results: Vec<TranscriptResult>,
}

#[derive(Deserialize)]
struct TranslateRequest {
    #[serde(default)]
    text: String,
    target_lang: Option<String>,
}

#[derive(Serialize)]
struct TranslateResponse {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    translated_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    target_lang: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

#[derive(Deserialize)]
struct ProductionRequest {
    #[serde(default)]
    title: String,
    #[serde(default)]
    english_text: String,
    model: Option<String>,
}

#[derive(Serialize)]
struct ProductionResponse {
    success: bool,
    title: String,
    description: String,
    tags: String,
    model_used: String,
}

#[derive(Serialize)]
struct ModelEntry {
    name: String,
    description: String,
    category: String,
    provider: String,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

#[derive(Serialize)]
struct FailureResponse {
    success: bool,
    error: String,
}

fn error_response(status: StatusCode, error: impl Into<String>) -> Response {
    (status, Json(ErrorResponse { error: error.into() })).into_response()
}

fn failure_response(error: &ScribeError) -> Response {
    Json(FailureResponse {
        success: false,
        error: error.to_string(),
    })
    .into_response()
}

// === Handlers ===

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

/// Channel client and ID, or the 400 response when either is missing.
fn channel(state: &AppState) -> Result<(&ChannelClient, &str), Response> {
    match (&state.channel, state.channel_id.as_deref()) {
        (Some(client), Some(id)) => Ok((client, id)),
        _ => Err(error_response(StatusCode::BAD_REQUEST, "Channel ID not set")),
    }
}

fn listing_response(state: &AppState, result: crate::error::Result<VideoPage>) -> Response {
    match result {
        Ok(page) => Json(ListingResponse {
            videos: page.videos,
            next_page_token: if state.youtube.dev_mode {
                None
            } else {
                page.next_page_token
            },
        })
        .into_response(),
        Err(e) => {
            warn!("Channel listing failed: {}", e);
            error_response(StatusCode::BAD_GATEWAY, e.to_string())
        }
    }
}

async fn channel_videos(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListingQuery>,
) -> Response {
    let (client, channel_id) = match channel(&state) {
        Ok(found) => found,
        Err(response) => return response,
    };

    let result = client
        .channel_videos(channel_id, state.youtube.max_results(), query.page_token.as_deref())
        .await;
    listing_response(&state, result)
}

async fn channel_search(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListingQuery>,
) -> Response {
    let (client, channel_id) = match channel(&state) {
        Ok(found) => found,
        Err(response) => return response,
    };

    let result = client
        .search_channel(
            channel_id,
            &query.q,
            state.youtube.max_results(),
            query.page_token.as_deref(),
        )
        .await;
    listing_response(&state, result)
}

async fn extract_transcripts(
    State(state): State<Arc<AppState>>,
    Json(req): Json<TranscriptRequest>,
) -> Response {
    if req.video_ids.is_empty() {
        return error_response(StatusCode::BAD_REQUEST, "No video IDs provided");
    }

    let results = state.extractor.extract_batch(&req.video_ids).await;
    Json(TranscriptResponse { results }).into_response()
}

async fn languages() -> impl IntoResponse {
    let languages: BTreeMap<&str, &str> = LANGUAGES.iter().copied().collect();
    Json(serde_json::json!({ "languages": languages }))
}

async fn models(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let catalog = state.production.catalog();
    let models: BTreeMap<&str, ModelEntry> = catalog
        .models()
        .iter()
        .map(|m| {
            (
                m.id.as_str(),
                ModelEntry {
                    name: m.name.clone(),
                    description: m.description.clone(),
                    category: m.category.clone(),
                    provider: m.provider.to_string(),
                },
            )
        })
        .collect();

    Json(serde_json::json!({
        "models": models,
        "current": catalog.default_model(),
    }))
}

async fn translate(
    State(state): State<Arc<AppState>>,
    Json(req): Json<TranslateRequest>,
) -> Response {
    if req.text.trim().is_empty() {
        return error_response(StatusCode::BAD_REQUEST, "No text provided");
    }

    let target = req
        .target_lang
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| state.default_target.clone());

    match state.translator.translate(&req.text, &target).await {
        Ok(translation) => Json(TranslateResponse {
            success: true,
            translated_text: Some(translation.translated_text),
            target_lang: Some(translation.target_lang),
            error: None,
        })
        .into_response(),
        Err(e) => {
            warn!("Translation to {} failed: {}", target, e);
            Json(TranslateResponse {
                success: false,
                translated_text: None,
                target_lang: None,
                error: Some(e.to_string()),
            })
            .into_response()
        }
    }
}

async fn generate_production(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ProductionRequest>,
) -> Response {
    if req.english_text.trim().is_empty() {
        return error_response(StatusCode::BAD_REQUEST, "No English text provided");
    }

    match state
        .production
        .generate(&req.title, &req.english_text, req.model.as_deref())
        .await
    {
        Ok((content, model_used)) => Json(ProductionResponse {
            success: true,
            title: content.title,
            description: content.description,
            tags: content.tags,
            model_used,
        })
        .into_response(),
        Err(e) => {
            warn!("Production generation failed: {}", e);
            failure_response(&e)
        }
    }
}
