use axum::{extract::State, routing::get, Json, Router};
use time::OffsetDateTime;
use tracing::instrument;

use crate::auth::extractors::ContractorUser;
use crate::contractors::dto::ContractorStats;
use crate::contractors::repo::ContractorProfile;
use crate::coupons::repo::Coupon;
use crate::error::ApiError;
use crate::state::AppState;

pub fn contractor_routes() -> Router<AppState> {
    Router::new().route("/contractor/stats", get(stats))
}

#[instrument(skip(state))]
pub async fn stats(
    State(state): State<AppState>,
    ContractorUser(claims): ContractorUser,
) -> Result<Json<ContractorStats>, ApiError> {
    let profile = ContractorProfile::find_by_user(&state.db, claims.sub)
        .await?
        .ok_or_else(|| ApiError::NotFound("Contractor profile not found".into()))?;

    let coupons = Coupon::list_by_contractor(&state.db, claims.sub).await?;
    let now = OffsetDateTime::now_utc();
    let active_coupons = coupons.iter().filter(|c| c.is_active(now)).count();

    Ok(Json(ContractorStats {
        points: profile.points,
        total_signups: profile.total_signups,
        total_coupons: coupons.len(),
        active_coupons,
    }))
}
