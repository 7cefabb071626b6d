use std::sync::Arc;

use axum::{Json, extract::State, http::HeaderMap};
use tracing::warn;

use crate::{
    error::AppError,
    models::{Quote, SubmitRequest, SubmitResponse},
    query::list_all,
    quotes::submit_quote,
    state::AppState,
    suggest::{SuggestRequest, SuggestedQuote, suggest_quote},
    utils::client_ip,
};

/// `POST /quotes`. Every pipeline failure is folded into the response
/// envelope here; nothing propagates as a bare status code.
pub async fn submit_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(payload): Json<SubmitRequest>,
) -> Json<SubmitResponse> {
    let source_ip = client_ip(&headers);

    match submit_quote(
        &state.store,
        &state.captcha,
        &state.listing_cache,
        &source_ip,
        payload,
    )
    .await
    {
        Ok(()) => Json(SubmitResponse::ok()),
        Err(error) => {
            warn!("Rejected submission from {source_ip}: {error}");
            Json(SubmitResponse::rejected(error.to_string()))
        }
    }
}

/// `GET /quotes`. Always answers, even with storage down.
pub async fn quotes_handler(State(state): State<Arc<AppState>>) -> Json<Vec<Quote>> {
    Json(list_all(&state.store, &state.listing_cache).await)
}

pub async fn suggest_handler(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<SuggestRequest>,
) -> Result<Json<SuggestedQuote>, AppError> {
    let suggestion = suggest_quote(&state.http, &state.config, payload.emotion).await?;

    Ok(Json(suggestion))
}
