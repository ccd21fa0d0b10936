use std::{collections::HashSet, sync::Arc};

use axum::{
    Json, Router,
    extract::{RawQuery, State},
    http::{HeaderValue, Method},
    routing::get,
};
use tokio::net::TcpListener;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};
use tracing::{debug, info, warn};
use url::Url;

use crate::config::{ServerConfig, non_empty};
use crate::error::{ApiError, ExtractError};
use crate::extractor::{Extractor, HttpUpstream};
use crate::model::MediaResult;

#[derive(Clone)]
pub struct AppState {
    extractor: Arc<Extractor>,
}

impl AppState {
    pub fn new(extractor: Extractor) -> Self {
        Self {
            extractor: Arc::new(extractor),
        }
    }
}

pub fn router(state: AppState, config: &ServerConfig) -> Result<Router, ApiError> {
    let cors = build_cors_layer(&config.allowed_origins)?;

    Ok(Router::new()
        .route("/download", get(download))
        .route("/api/health", get(health))
        .fallback_service(ServeDir::new(&config.static_dir))
        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http()))
}

pub async fn run(config: ServerConfig) -> Result<(), ApiError> {
    let upstream = HttpUpstream::new(config.user_agent.clone()).map_err(|error| {
        ApiError::internal(format!("Could not build the upstream HTTP client: {error}"))
    })?;
    let extractor = Extractor::new(Arc::new(upstream));
    info!(
        "Registered extractors in priority order: {:?}",
        extractor.platforms()
    );

    let app = router(AppState::new(extractor), &config)?;

    let listener = TcpListener::bind(&config.bind_addr)
        .await
        .map_err(|error| {
            ApiError::internal(format!("Could not bind {}: {error}", config.bind_addr))
        })?;

    info!(
        "Serving /download and static assets from {:?} on http://{}",
        config.static_dir, config.bind_addr
    );

    axum::serve(listener, app)
        .await
        .map_err(|error| ApiError::internal(format!("HTTP server error: {error}")))
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

async fn download(
    State(state): State<AppState>,
    RawQuery(query): RawQuery,
) -> Result<Json<MediaResult>, ApiError> {
    let target = query
        .as_deref()
        .and_then(first_url_param)
        .ok_or(ExtractError::MissingUrlParameter)?;

    let result = state.extractor.extract(&target).await?;
    Ok(Json(result))
}

/// First non-blank `url` value; repeated or unknown parameters are ignored.
fn first_url_param(query: &str) -> Option<String> {
    url::form_urlencoded::parse(query.as_bytes())
        .find(|(key, _)| key == "url")
        .and_then(|(_, value)| non_empty(&value).map(ToString::to_string))
}

fn build_cors_layer(configured: &[String]) -> Result<CorsLayer, ApiError> {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers(Any);

    if configured.is_empty() {
        return Ok(layer.allow_origin(Any));
    }

    let normalized_origins = configured
        .iter()
        .map(|origin| {
            normalize_origin(origin).ok_or_else(|| {
                ApiError::internal(format!(
                    "Invalid origin in ALLOWED_ORIGINS: {origin}. Use values like https://example.com"
                ))
            })
        })
        .collect::<Result<HashSet<_>, _>>()?;
    let allowed_origins = Arc::new(normalized_origins);
    info!(
        "CORS allow-list loaded with {} origin(s): {:?}",
        allowed_origins.len(),
        allowed_origins
    );

    let allow_origin = AllowOrigin::predicate({
        let allowed_origins = Arc::clone(&allowed_origins);
        move |origin: &HeaderValue, _| {
            let normalized = origin.to_str().ok().and_then(normalize_origin);
            let allowed = normalized
                .as_ref()
                .is_some_and(|value| allowed_origins.contains(value));
            if !allowed {
                warn!("Rejected CORS origin {origin:?}");
            }
            debug!("CORS origin check raw={origin:?} normalized={normalized:?} allowed={allowed}");
            allowed
        }
    });

    Ok(layer.allow_origin(allow_origin))
}

fn normalize_origin(value: &str) -> Option<String> {
    let parsed = Url::parse(value).ok()?;
    let host = parsed.host_str()?.to_ascii_lowercase();
    let scheme = parsed.scheme();
    let default_port = match scheme {
        "http" => 80,
        "https" => 443,
        _ => return None,
    };

    if parsed.path() != "/" || parsed.query().is_some() || parsed.fragment().is_some() {
        return None;
    }

    match parsed.port() {
        Some(port) if port != default_port => Some(format!("{scheme}://{host}:{port}")),
        _ => Some(format!("{scheme}://{host}")),
    }
}
