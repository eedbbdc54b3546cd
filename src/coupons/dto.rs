use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::coupons::repo::Coupon;

#[derive(Debug, Deserialize)]
pub struct CreateCouponRequest {
    pub discount_percent: i32,
    #[serde(default = "default_max_uses")]
    pub max_uses: i32,
    #[serde(default = "default_expires_in_days")]
    pub expires_in_days: i64,
}

fn default_max_uses() -> i32 {
    100
}

fn default_expires_in_days() -> i64 {
    30
}

#[derive(Debug, Deserialize)]
pub struct ValidateCouponRequest {
    pub code: String,
}

#[derive(Debug, Serialize)]
pub struct ValidateCouponResponse {
    pub valid: bool,
    pub discount_percent: i32,
    pub contractor_id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct CouponResponse {
    pub coupon: Coupon,
}

#[derive(Debug, Serialize)]
pub struct CouponListResponse {
    pub coupons: Vec<Coupon>,
}
