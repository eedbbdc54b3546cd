use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use tracing::{error, instrument};

use crate::auth::{
    dto::{AuthResponse, CouponRegisterRequest, LoginRequest, MeResponse, MeUser, RegisterRequest},
    extractors::AuthUser,
    repo::User,
    services,
};
use crate::error::ApiError;
use crate::state::AppState;

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/register-with-coupon", post(register_with_coupon))
        .route("/auth/login", post(login))
        .route("/auth/me", get(me))
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    services::register_user(&state, payload).await.map(Json)
}

#[instrument(skip(state, payload))]
pub async fn register_with_coupon(
    State(state): State<AppState>,
    Json(payload): Json<CouponRegisterRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    services::register_with_coupon(&state, payload)
        .await
        .map(Json)
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    services::login_user(&state, payload).await.map(Json)
}

#[instrument(skip(state))]
pub async fn me(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
) -> Result<Json<MeResponse>, ApiError> {
    let user = User::find_by_id(&state.db, claims.sub)
        .await
        .map_err(|e| {
            error!(error = %e, user_id = %claims.sub, "find_by_id failed");
            ApiError::from(e)
        })?
        .ok_or_else(|| ApiError::NotFound("User not found".into()))?;

    Ok(Json(MeResponse {
        user: MeUser {
            id: user.id,
            email: user.email,
            name: user.name,
            role: user.role,
            subscription_status: user.subscription_status,
        },
    }))
}
