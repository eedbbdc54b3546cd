use serde::Serialize;
use sqlx::{FromRow, Postgres, Transaction};
use time::OffsetDateTime;
use uuid::Uuid;

pub const DEFAULT_PERMISSIONS: &[&str] = &["manage_users", "manage_contractors", "manage_letters"];

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct AdminProfile {
    pub id: Uuid,
    pub user_id: Uuid,
    pub permissions: Vec<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl AdminProfile {
    /// Created in the same transaction as the admin's user row, with the
    /// full permission set.
    pub async fn create_tx(
        tx: &mut Transaction<'_, Postgres>,
        user_id: Uuid,
    ) -> anyhow::Result<AdminProfile> {
        let permissions: Vec<String> = DEFAULT_PERMISSIONS.iter().map(|p| p.to_string()).collect();
        let profile = sqlx::query_as::<_, AdminProfile>(
            "INSERT INTO admins (user_id, permissions)
             VALUES ($1, $2)
             RETURNING id, user_id, permissions, created_at",
        )
        .bind(user_id)
        .bind(&permissions)
        .fetch_one(&mut **tx)
        .await?;
        Ok(profile)
    }
}
