use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::repo::{Role, SubscriptionStatus, User};

/// Request body for plain registration. Role defaults to `user`.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub name: String,
    #[serde(default)]
    pub role: Role,
}

/// Request body for coupon-based registration. The new account is always a
/// plain user; registrants cannot self-assign a role here.
#[derive(Debug, Deserialize)]
pub struct CouponRegisterRequest {
    pub email: String,
    pub password: String,
    pub name: String,
    pub coupon_code: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Public part of the user returned to the client.
#[derive(Debug, Serialize)]
pub struct PublicUser {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub role: Role,
}

impl From<&User> for PublicUser {
    fn from(u: &User) -> Self {
        Self {
            id: u.id,
            email: u.email.clone(),
            name: u.name.clone(),
            role: u.role,
        }
    }
}

/// Response returned after register or login.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub user: PublicUser,
    pub token: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// `GET /auth/me` payload; includes the subscription tier.
#[derive(Debug, Serialize)]
pub struct MeUser {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub role: Role,
    pub subscription_status: SubscriptionStatus,
}

#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub user: MeUser,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_role_defaults_to_user() {
        let req: RegisterRequest = serde_json::from_str(
            r#"{"email":"a@b.co","password":"longenough","name":"A"}"#,
        )
        .unwrap();
        assert_eq!(req.role, Role::User);

        let req: RegisterRequest = serde_json::from_str(
            r#"{"email":"a@b.co","password":"longenough","name":"A","role":"contractor"}"#,
        )
        .unwrap();
        assert_eq!(req.role, Role::Contractor);
    }

    #[test]
    fn auth_response_omits_absent_message() {
        let resp = AuthResponse {
            user: PublicUser {
                id: Uuid::new_v4(),
                email: "a@b.co".into(),
                name: "A".into(),
                role: Role::User,
            },
            token: "tok".into(),
            message: None,
        };
        let json = serde_json::to_string(&resp).unwrap();
        assert!(!json.contains("message"));
    }
}
