use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use tracing::warn;

use crate::auth::jwt::{Claims, JwtKeys};
use crate::auth::repo::Role;
use crate::error::ApiError;

/// Pure authorization decision: exact role equality, no hierarchy. Every
/// protected handler declares exactly one required role.
pub fn authorize(claims: &Claims, required: Role) -> Result<(), ApiError> {
    if claims.role == required {
        Ok(())
    } else {
        warn!(user_id = %claims.sub, role = ?claims.role, required = ?required, "role denied");
        Err(ApiError::Forbidden)
    }
}

/// Any authenticated caller. Missing header and failed verification reject
/// with the same messages the API has always used.
#[derive(Debug)]
pub struct AuthUser(pub Claims);

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    JwtKeys: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let keys = JwtKeys::from_ref(state);
        let auth_header = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or(ApiError::AuthMissing)?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or(ApiError::AuthInvalid)?;

        match keys.verify(token) {
            Ok(claims) => Ok(AuthUser(claims)),
            Err(_) => {
                warn!("invalid or expired token");
                Err(ApiError::AuthInvalid)
            }
        }
    }
}

/// Caller must hold the contractor role.
#[derive(Debug)]
pub struct ContractorUser(pub Claims);

#[async_trait]
impl<S> FromRequestParts<S> for ContractorUser
where
    S: Send + Sync,
    JwtKeys: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let AuthUser(claims) = AuthUser::from_request_parts(parts, state).await?;
        authorize(&claims, Role::Contractor)?;
        Ok(ContractorUser(claims))
    }
}

/// Caller must hold the admin role.
#[derive(Debug)]
pub struct AdminUser(pub Claims);

#[async_trait]
impl<S> FromRequestParts<S> for AdminUser
where
    S: Send + Sync,
    JwtKeys: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let AuthUser(claims) = AuthUser::from_request_parts(parts, state).await?;
        authorize(&claims, Role::Admin)?;
        Ok(AdminUser(claims))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::AppState;
    use axum::http::{Request, StatusCode};
    use uuid::Uuid;

    fn parts_with_header(value: Option<&str>) -> Parts {
        let mut builder = Request::builder().uri("/coupons");
        if let Some(v) = value {
            builder = builder.header(axum::http::header::AUTHORIZATION, v);
        }
        builder.body(()).unwrap().into_parts().0
    }

    fn signed_token(state: &AppState, role: Role) -> String {
        let keys = JwtKeys::from_ref(state);
        keys.sign(Uuid::new_v4(), "t@example.com", role).unwrap()
    }

    #[tokio::test]
    async fn missing_header_is_unauthenticated() {
        let state = AppState::fake();
        let mut parts = parts_with_header(None);
        let err = AuthUser::from_request_parts(&mut parts, &state)
            .await
            .unwrap_err();
        assert_eq!(err.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(err.to_string(), "No token provided");
    }

    #[tokio::test]
    async fn bad_token_is_unauthenticated() {
        let state = AppState::fake();
        let mut parts = parts_with_header(Some("Bearer garbage"));
        let err = AuthUser::from_request_parts(&mut parts, &state)
            .await
            .unwrap_err();
        assert_eq!(err.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(err.to_string(), "Invalid token");
    }

    #[tokio::test]
    async fn valid_token_authenticates() {
        let state = AppState::fake();
        let token = signed_token(&state, Role::User);
        let mut parts = parts_with_header(Some(&format!("Bearer {token}")));
        let AuthUser(claims) = AuthUser::from_request_parts(&mut parts, &state)
            .await
            .unwrap();
        assert_eq!(claims.role, Role::User);
    }

    #[tokio::test]
    async fn contractor_gate_admits_only_contractors() {
        let state = AppState::fake();
        let token = signed_token(&state, Role::Contractor);
        let mut parts = parts_with_header(Some(&format!("Bearer {token}")));
        assert!(ContractorUser::from_request_parts(&mut parts, &state)
            .await
            .is_ok());

        // An admin token does not satisfy a contractor-only check.
        let token = signed_token(&state, Role::Admin);
        let mut parts = parts_with_header(Some(&format!("Bearer {token}")));
        let err = ContractorUser::from_request_parts(&mut parts, &state)
            .await
            .unwrap_err();
        assert_eq!(err.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn admin_gate_admits_only_admins() {
        let state = AppState::fake();
        let token = signed_token(&state, Role::Admin);
        let mut parts = parts_with_header(Some(&format!("Bearer {token}")));
        assert!(AdminUser::from_request_parts(&mut parts, &state)
            .await
            .is_ok());

        let token = signed_token(&state, Role::User);
        let mut parts = parts_with_header(Some(&format!("Bearer {token}")));
        let err = AdminUser::from_request_parts(&mut parts, &state)
            .await
            .unwrap_err();
        assert_eq!(err.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn authorize_is_exact_match() {
        let state = AppState::fake();
        let keys = JwtKeys::from_ref(&state);
        let token = keys.sign(Uuid::new_v4(), "x@y.z", Role::Contractor).unwrap();
        let claims = keys.verify(&token).unwrap();
        assert!(authorize(&claims, Role::Contractor).is_ok());
        assert!(authorize(&claims, Role::User).is_err());
        assert!(authorize(&claims, Role::Admin).is_err());
    }
}
