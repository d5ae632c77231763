//! Router, handlers and middleware stack.
//!
//! Every `/api` handler follows the same shape: check the caller's budget for
//! the endpoint kind, run the work, and record the request only when the work
//! succeeded. Responses carry the remaining budget in `X-RateLimit-Remaining`.

use std::time::Duration;

use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::{HeaderName, HeaderValue, Method, StatusCode, header::CONTENT_TYPE};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use glossa_core::{EndpointKind, ParsedArticle, WordMeaning};
use serde::{Deserialize, Serialize};
use tower::ServiceBuilder;
use tower_http::compression::CompressionLayer;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::client_ip::ClientIp;
use crate::{ApiError, AppState, ServerConfig};

pub const RATE_LIMIT_REMAINING: HeaderName = HeaderName::from_static("x-ratelimit-remaining");

#[derive(Debug, Deserialize)]
pub struct ParseRequest {
    pub url: String,
}

#[derive(Debug, Deserialize)]
pub struct WordRequest {
    pub word: String,
    pub context: String,
}

#[derive(Debug, Deserialize)]
pub struct TranslateRequest {
    pub sentence: String,
}

#[derive(Debug, Serialize)]
pub struct TranslateResponse {
    pub translation: String,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    status: &'static str,
}

/// Build the application router with CORS, timeout, compression and tracing layers.
pub fn build_app(state: AppState, config: &ServerConfig) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(allow_origin(&config.allowed_origins))
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([CONTENT_TYPE])
        .expose_headers([RATE_LIMIT_REMAINING]);

    Router::new()
        .route("/health", get(health_handler))
        .route("/api/parse", post(parse_handler))
        .route("/api/word", post(word_handler))
        .route("/api/translate", post(translate_handler))
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors)
                .layer(CompressionLayer::new())
                .layer(TimeoutLayer::with_status_code(
                    StatusCode::GATEWAY_TIMEOUT,
                    Duration::from_secs(config.request_timeout),
                )),
        )
}

fn allow_origin(origins: &[String]) -> AllowOrigin {
    if origins.is_empty() || origins.iter().any(|origin| origin == "*") {
        return AllowOrigin::from(Any);
    }
    let parsed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(origin = %origin, error = %e, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    AllowOrigin::list(parsed)
}

/// Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

/// Fetch an article page and return its paragraph/sentence/word tree.
pub async fn parse_handler(
    State(state): State<AppState>, ClientIp(ip): ClientIp, body: Result<Json<ParseRequest>, JsonRejection>,
) -> Response {
    let client = ip.to_string();
    limited(&state, &client, EndpointKind::Parse, async {
        let Json(request) = body?;
        let url = request.url.trim();
        if url.is_empty() {
            return Err(ApiError::BadRequest("url must not be empty".to_string()));
        }
        let article: ParsedArticle = state.structurer.fetch_and_structure(url, &state.fetch_config).await?;
        tracing::info!(source = %article.source(), paragraphs = article.paragraphs().len(), "parsed article");
        Ok::<_, ApiError>(article)
    })
    .await
}

/// Gloss a word in the sentence it appeared in.
pub async fn word_handler(
    State(state): State<AppState>, ClientIp(ip): ClientIp, body: Result<Json<WordRequest>, JsonRejection>,
) -> Response {
    let client = ip.to_string();
    limited(&state, &client, EndpointKind::Lookup, async {
        let Json(request) = body?;
        let meaning: WordMeaning = state.lookup.word_meaning(&request.word, &request.context).await?;
        Ok::<_, ApiError>(meaning)
    })
    .await
}

/// Translate one sentence.
pub async fn translate_handler(
    State(state): State<AppState>, ClientIp(ip): ClientIp, body: Result<Json<TranslateRequest>, JsonRejection>,
) -> Response {
    let client = ip.to_string();
    limited(&state, &client, EndpointKind::Lookup, async {
        let Json(request) = body?;
        let translation = state.lookup.translate_sentence(&request.sentence).await?;
        Ok::<_, ApiError>(TranslateResponse { translation })
    })
    .await
}

/// Run `work` under the caller's budget for `kind`.
async fn limited<T: Serialize>(
    state: &AppState, client: &str, kind: EndpointKind, work: impl Future<Output = Result<T, ApiError>>,
) -> Response {
    let decision = state.rate_limiter.check(client, kind);
    if !decision.allowed {
        tracing::info!(client, kind = %kind, "rate limit exceeded");
        return with_remaining(ApiError::RateLimited.into_response(), 0);
    }

    match work.await {
        Ok(body) => {
            let recorded = state.rate_limiter.record(client, kind);
            with_remaining(Json(body).into_response(), recorded.remaining)
        }
        Err(e) => with_remaining(e.into_response(), decision.remaining),
    }
}

fn with_remaining(mut response: Response, remaining: u32) -> Response {
    response.headers_mut().insert(RATE_LIMIT_REMAINING, HeaderValue::from(remaining));
    response
}
