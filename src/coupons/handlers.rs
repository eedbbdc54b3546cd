use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use tracing::instrument;

use crate::auth::extractors::ContractorUser;
use crate::coupons::dto::{
    CouponListResponse, CouponResponse, CreateCouponRequest, ValidateCouponRequest,
    ValidateCouponResponse,
};
use crate::coupons::repo::Coupon;
use crate::coupons::services;
use crate::error::ApiError;
use crate::state::AppState;

pub fn coupon_routes() -> Router<AppState> {
    Router::new()
        .route("/coupons/create", post(create))
        .route("/coupons", get(list))
        .route("/coupons/validate", post(validate))
}

#[instrument(skip(state, payload))]
pub async fn create(
    State(state): State<AppState>,
    ContractorUser(claims): ContractorUser,
    Json(payload): Json<CreateCouponRequest>,
) -> Result<Json<CouponResponse>, ApiError> {
    let coupon = services::create_coupon(&state, claims.sub, payload).await?;
    Ok(Json(CouponResponse { coupon }))
}

#[instrument(skip(state))]
pub async fn list(
    State(state): State<AppState>,
    ContractorUser(claims): ContractorUser,
) -> Result<Json<CouponListResponse>, ApiError> {
    let coupons = Coupon::list_by_contractor(&state.db, claims.sub).await?;
    Ok(Json(CouponListResponse { coupons }))
}

#[instrument(skip(state, payload))]
pub async fn validate(
    State(state): State<AppState>,
    Json(payload): Json<ValidateCouponRequest>,
) -> Result<Json<ValidateCouponResponse>, ApiError> {
    let resp = services::validate_code(&state, payload.code.trim()).await?;
    Ok(Json(resp))
}
