use serde::Serialize;
use sqlx::{FromRow, PgPool, Postgres, Transaction};
use time::OffsetDateTime;
use uuid::Uuid;

/// 1:1 with a contractor-role user. `total_signups` counts successful
/// coupon-based registrations attributed to this contractor; `points` accrue
/// one per such signup.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ContractorProfile {
    pub id: Uuid,
    pub user_id: Uuid,
    pub points: i64,
    pub total_signups: i64,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

const PROFILE_COLUMNS: &str = "id, user_id, points, total_signups, created_at";

impl ContractorProfile {
    /// Created in the same transaction as the contractor's user row.
    pub async fn create_tx(
        tx: &mut Transaction<'_, Postgres>,
        user_id: Uuid,
    ) -> anyhow::Result<ContractorProfile> {
        let profile = sqlx::query_as::<_, ContractorProfile>(&format!(
            "INSERT INTO contractors (user_id) VALUES ($1) RETURNING {PROFILE_COLUMNS}"
        ))
        .bind(user_id)
        .fetch_one(&mut **tx)
        .await?;
        Ok(profile)
    }

    pub async fn find_by_user(
        db: &PgPool,
        user_id: Uuid,
    ) -> anyhow::Result<Option<ContractorProfile>> {
        let profile = sqlx::query_as::<_, ContractorProfile>(&format!(
            "SELECT {PROFILE_COLUMNS} FROM contractors WHERE user_id = $1"
        ))
        .bind(user_id)
        .fetch_optional(db)
        .await?;
        Ok(profile)
    }

    /// Referral credit for one redeemed coupon. Not idempotent: the
    /// registration orchestrator calls this exactly once per redemption,
    /// inside the same transaction as the coupon increment.
    pub async fn credit_signup_tx(
        tx: &mut Transaction<'_, Postgres>,
        contractor_user_id: Uuid,
    ) -> anyhow::Result<()> {
        sqlx::query(
            "UPDATE contractors
             SET total_signups = total_signups + 1, points = points + 1
             WHERE user_id = $1",
        )
        .bind(contractor_user_id)
        .execute(&mut **tx)
        .await?;
        Ok(())
    }
}
