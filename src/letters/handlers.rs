use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use tracing::instrument;

use crate::auth::extractors::AuthUser;
use crate::error::ApiError;
use crate::letters::dto::{GenerateLetterRequest, LetterListResponse, LetterResponse};
use crate::letters::repo::Letter;
use crate::letters::services;
use crate::state::AppState;

pub fn letter_routes() -> Router<AppState> {
    Router::new()
        .route("/letters/generate", post(generate))
        .route("/letters", get(list))
}

#[instrument(skip(state, payload))]
pub async fn generate(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Json(payload): Json<GenerateLetterRequest>,
) -> Result<Json<LetterResponse>, ApiError> {
    let letter = services::generate_letter(&state, claims.sub, payload).await?;
    Ok(Json(LetterResponse { letter }))
}

#[instrument(skip(state))]
pub async fn list(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
) -> Result<Json<LetterListResponse>, ApiError> {
    let letters = Letter::list_by_user(&state.db, claims.sub).await?;
    Ok(Json(LetterListResponse { letters }))
}
