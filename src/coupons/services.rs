use rand::Rng;
use thiserror::Error;
use time::{Duration, OffsetDateTime};
use tracing::{info, warn};
use uuid::Uuid;

use crate::auth::repo::is_unique_violation;
use crate::coupons::dto::{CreateCouponRequest, ValidateCouponResponse};
use crate::coupons::repo::Coupon;
use crate::error::ApiError;
use crate::state::AppState;

const CODE_LEN: usize = 9;
const CODE_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
const CODE_INSERT_ATTEMPTS: usize = 3;

/// Why a coupon cannot be used. The validate endpoint reports these
/// distinctly; coupon-based registration collapses them into one message.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CouponRejection {
    #[error("Invalid coupon code")]
    NotFound,
    #[error("Coupon has expired")]
    Expired,
    #[error("Coupon usage limit exceeded")]
    Exhausted,
}

/// Read-time check only; never mutates. Redemption re-runs the same checks
/// inside a single conditional update.
pub fn check_redeemable(coupon: &Coupon, now: OffsetDateTime) -> Result<(), CouponRejection> {
    if coupon.expires_at < now {
        return Err(CouponRejection::Expired);
    }
    if coupon.current_uses >= coupon.max_uses {
        return Err(CouponRejection::Exhausted);
    }
    Ok(())
}

/// Human-enterable referral code: 9 uppercase alphanumeric characters.
pub fn generate_code() -> String {
    let mut rng = rand::thread_rng();
    (0..CODE_LEN)
        .map(|_| {
            let i = rng.gen_range(0..CODE_ALPHABET.len());
            CODE_ALPHABET[i] as char
        })
        .collect()
}

/// Creates a coupon owned by the calling contractor. Bounds are enforced
/// here rather than trusted from the client; a code collision retries with a
/// fresh code a bounded number of times.
pub async fn create_coupon(
    state: &AppState,
    contractor_id: Uuid,
    req: CreateCouponRequest,
) -> Result<Coupon, ApiError> {
    if !(1..=100).contains(&req.discount_percent) {
        return Err(ApiError::Validation(
            "discount_percent must be between 1 and 100".into(),
        ));
    }
    if req.max_uses < 1 {
        return Err(ApiError::Validation("max_uses must be at least 1".into()));
    }
    if req.expires_in_days < 1 {
        return Err(ApiError::Validation(
            "expires_in_days must be at least 1".into(),
        ));
    }

    let expires_at = OffsetDateTime::now_utc() + Duration::days(req.expires_in_days);

    for _ in 0..CODE_INSERT_ATTEMPTS {
        let code = generate_code();
        match Coupon::insert(
            &state.db,
            contractor_id,
            &code,
            req.discount_percent,
            req.max_uses,
            expires_at,
        )
        .await
        {
            Ok(coupon) => {
                info!(coupon_id = %coupon.id, contractor_id = %contractor_id, code = %coupon.code, "coupon created");
                return Ok(coupon);
            }
            Err(e) if is_unique_violation(&e) => {
                warn!(code = %code, "coupon code collision, regenerating");
                continue;
            }
            Err(e) => return Err(e.into()),
        }
    }
    Err(ApiError::Internal(anyhow::anyhow!(
        "coupon code collision persisted across {CODE_INSERT_ATTEMPTS} attempts"
    )))
}

/// Pure read-time validation of an entered code, with distinct rejection
/// reasons. Usable by anyone, authenticated or not.
pub async fn validate_code(
    state: &AppState,
    code: &str,
) -> Result<ValidateCouponResponse, ApiError> {
    let coupon = Coupon::find_by_code(&state.db, code).await?;
    let Some(coupon) = coupon else {
        return Err(ApiError::Validation(CouponRejection::NotFound.to_string()));
    };
    check_redeemable(&coupon, OffsetDateTime::now_utc())
        .map_err(|reason| ApiError::Validation(reason.to_string()))?;
    Ok(ValidateCouponResponse {
        valid: true,
        discount_percent: coupon.discount_percent,
        contractor_id: coupon.contractor_id,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coupon(current_uses: i32, max_uses: i32, expires_in: Duration) -> Coupon {
        let now = OffsetDateTime::now_utc();
        Coupon {
            id: Uuid::new_v4(),
            contractor_id: Uuid::new_v4(),
            code: "TESTCODE1".into(),
            discount_percent: 15,
            max_uses,
            current_uses,
            created_at: now,
            expires_at: now + expires_in,
        }
    }

    #[test]
    fn generated_codes_are_nine_uppercase_alphanumerics() {
        for _ in 0..200 {
            let code = generate_code();
            assert_eq!(code.len(), 9);
            assert!(code
                .bytes()
                .all(|b| b.is_ascii_uppercase() || b.is_ascii_digit()));
        }
    }

    #[test]
    fn generated_codes_vary() {
        let codes: std::collections::HashSet<String> = (0..50).map(|_| generate_code()).collect();
        assert!(codes.len() > 1);
    }

    #[test]
    fn fresh_coupon_is_redeemable() {
        let now = OffsetDateTime::now_utc();
        assert_eq!(check_redeemable(&coupon(0, 100, Duration::days(30)), now), Ok(()));
    }

    #[test]
    fn expired_coupon_rejected_regardless_of_uses() {
        let now = OffsetDateTime::now_utc();
        assert_eq!(
            check_redeemable(&coupon(0, 100, Duration::days(-1)), now),
            Err(CouponRejection::Expired)
        );
    }

    #[test]
    fn exhausted_coupon_rejected() {
        let now = OffsetDateTime::now_utc();
        assert_eq!(
            check_redeemable(&coupon(100, 100, Duration::days(30)), now),
            Err(CouponRejection::Exhausted)
        );
        // One use of headroom still passes.
        assert_eq!(check_redeemable(&coupon(99, 100, Duration::days(30)), now), Ok(()));
    }

    #[test]
    fn rejection_messages_are_stable() {
        assert_eq!(CouponRejection::NotFound.to_string(), "Invalid coupon code");
        assert_eq!(CouponRejection::Expired.to_string(), "Coupon has expired");
        assert_eq!(
            CouponRejection::Exhausted.to_string(),
            "Coupon usage limit exceeded"
        );
    }
}
