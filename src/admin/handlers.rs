use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;
use tracing::instrument;

use crate::auth::extractors::AdminUser;
use crate::auth::repo::User;
use crate::error::ApiError;
use crate::letters::repo::Letter;
use crate::state::AppState;

pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/admin/users", get(list_users))
        .route("/admin/letters", get(list_letters))
}

#[derive(Debug, Serialize)]
pub struct UserListResponse {
    pub users: Vec<User>,
}

#[derive(Debug, Serialize)]
pub struct LetterListResponse {
    pub letters: Vec<Letter>,
}

/// Password hashes stay out of the payload via the model's
/// `skip_serializing`.
#[instrument(skip(state))]
pub async fn list_users(
    State(state): State<AppState>,
    AdminUser(_claims): AdminUser,
) -> Result<Json<UserListResponse>, ApiError> {
    let users = User::list_all(&state.db).await?;
    Ok(Json(UserListResponse { users }))
}

#[instrument(skip(state))]
pub async fn list_letters(
    State(state): State<AppState>,
    AdminUser(_claims): AdminUser,
) -> Result<Json<LetterListResponse>, ApiError> {
    let letters = Letter::list_all(&state.db).await?;
    Ok(Json(LetterListResponse { letters }))
}
