use axum::extract::FromRef;
use lazy_static::lazy_static;
use regex::Regex;
use time::OffsetDateTime;
use tracing::{info, warn};

use crate::auth::dto::{AuthResponse, CouponRegisterRequest, LoginRequest, PublicUser, RegisterRequest};
use crate::auth::jwt::JwtKeys;
use crate::auth::password::{hash_password, verify_password};
use crate::auth::repo::{is_unique_violation, Role, User};
use crate::admin::repo::AdminProfile;
use crate::contractors::repo::ContractorProfile;
use crate::coupons::repo::Coupon;
use crate::coupons::services::check_redeemable;
use crate::error::ApiError;
use crate::state::AppState;

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

fn check_credentials(email: &str, password: &str) -> Result<(), ApiError> {
    if !is_valid_email(email) {
        warn!(email = %email, "invalid email");
        return Err(ApiError::Validation("Invalid email".into()));
    }
    if password.len() < 8 {
        warn!("password too short");
        return Err(ApiError::Validation("Password too short".into()));
    }
    Ok(())
}

fn duplicate_user(e: sqlx::Error) -> ApiError {
    if is_unique_violation(&e) {
        ApiError::Conflict("User already exists".into())
    } else {
        ApiError::from(e)
    }
}

fn invalid_coupon() -> ApiError {
    ApiError::Validation("Invalid or expired coupon".into())
}

/// Plain registration. The account and its role profile (contractor/admin)
/// are inserted in one transaction.
pub async fn register_user(
    state: &AppState,
    mut payload: RegisterRequest,
) -> Result<AuthResponse, ApiError> {
    payload.email = payload.email.trim().to_string();
    check_credentials(&payload.email, &payload.password)?;

    if User::find_by_email(&state.db, &payload.email).await?.is_some() {
        warn!(email = %payload.email, "email already registered");
        return Err(ApiError::Conflict("User already exists".into()));
    }

    let hash = hash_password(&payload.password)?;

    let mut tx = state.db.begin().await?;
    let user = User::create_tx(
        &mut tx,
        &payload.email,
        &hash,
        &payload.name,
        payload.role,
        None,
    )
    .await
    .map_err(duplicate_user)?;

    match user.role {
        Role::Contractor => {
            ContractorProfile::create_tx(&mut tx, user.id).await?;
        }
        Role::Admin => {
            AdminProfile::create_tx(&mut tx, user.id).await?;
        }
        Role::User => {}
    }
    tx.commit().await?;

    let token = JwtKeys::from_ref(state).sign(user.id, &user.email, user.role)?;
    info!(user_id = %user.id, role = ?user.role, "user registered");
    Ok(AuthResponse {
        user: PublicUser::from(&user),
        token,
        message: None,
    })
}

/// Coupon-based registration. The coupon is classified up front so an
/// unusable code rejects before any write; the user insert, the conditional
/// coupon increment, and the referral credit then commit atomically.
/// A coupon exhausted by a concurrent registration between the pre-check and
/// the increment rolls the whole flow back.
pub async fn register_with_coupon(
    state: &AppState,
    mut payload: CouponRegisterRequest,
) -> Result<AuthResponse, ApiError> {
    payload.email = payload.email.trim().to_string();
    check_credentials(&payload.email, &payload.password)?;
    let code = payload.coupon_code.trim().to_string();

    let Some(coupon) = Coupon::find_by_code(&state.db, &code).await? else {
        warn!(code = %code, "coupon registration with unknown code");
        return Err(invalid_coupon());
    };
    if let Err(reason) = check_redeemable(&coupon, OffsetDateTime::now_utc()) {
        warn!(code = %code, reason = %reason, "coupon registration rejected");
        return Err(invalid_coupon());
    }

    if User::find_by_email(&state.db, &payload.email).await?.is_some() {
        warn!(email = %payload.email, "email already registered");
        return Err(ApiError::Conflict("User already exists".into()));
    }

    let hash = hash_password(&payload.password)?;

    let mut tx = state.db.begin().await?;
    let user = User::create_tx(
        &mut tx,
        &payload.email,
        &hash,
        &payload.name,
        Role::User,
        Some(&code),
    )
    .await
    .map_err(duplicate_user)?;

    let Some(redeemed) = Coupon::redeem_tx(&mut tx, &code).await? else {
        // Lost the race to the last use (or the coupon expired meanwhile).
        // Dropping the transaction discards the user insert too.
        warn!(code = %code, "coupon no longer redeemable at increment");
        return Err(invalid_coupon());
    };
    ContractorProfile::credit_signup_tx(&mut tx, redeemed.contractor_id).await?;
    tx.commit().await?;

    let token = JwtKeys::from_ref(state).sign(user.id, &user.email, user.role)?;
    info!(
        user_id = %user.id,
        code = %code,
        contractor_id = %redeemed.contractor_id,
        "user registered with coupon"
    );
    Ok(AuthResponse {
        user: PublicUser::from(&user),
        token,
        message: Some("Registration successful with coupon!".into()),
    })
}

/// Unknown email and wrong password are indistinguishable to the caller.
pub async fn login_user(
    state: &AppState,
    mut payload: LoginRequest,
) -> Result<AuthResponse, ApiError> {
    payload.email = payload.email.trim().to_string();

    let Some(user) = User::find_by_email(&state.db, &payload.email).await? else {
        warn!(email = %payload.email, "login unknown email");
        return Err(ApiError::InvalidCredentials);
    };

    if !verify_password(&payload.password, &user.password_hash)? {
        warn!(user_id = %user.id, "login invalid password");
        return Err(ApiError::InvalidCredentials);
    }

    let token = JwtKeys::from_ref(state).sign(user.id, &user.email, user.role)?;
    info!(user_id = %user.id, "user logged in");
    Ok(AuthResponse {
        user: PublicUser::from(&user),
        token,
        message: None,
    })
}
