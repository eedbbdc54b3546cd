use serde::Serialize;
use sqlx::{FromRow, PgPool, Postgres, Transaction};
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Coupon {
    pub id: Uuid,
    pub contractor_id: Uuid,
    pub code: String,
    pub discount_percent: i32,
    pub max_uses: i32,
    pub current_uses: i32,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub expires_at: OffsetDateTime,
}

const COUPON_COLUMNS: &str =
    "id, contractor_id, code, discount_percent, max_uses, current_uses, created_at, expires_at";

impl Coupon {
    /// Unexpired and under its usage limit.
    pub fn is_active(&self, now: OffsetDateTime) -> bool {
        self.expires_at > now && self.current_uses < self.max_uses
    }

    /// Returns `sqlx::Error` untranslated so the caller can detect a code
    /// collision (unique violation) and retry with a fresh code.
    pub async fn insert(
        db: &PgPool,
        contractor_id: Uuid,
        code: &str,
        discount_percent: i32,
        max_uses: i32,
        expires_at: OffsetDateTime,
    ) -> Result<Coupon, sqlx::Error> {
        sqlx::query_as::<_, Coupon>(&format!(
            "INSERT INTO coupons (contractor_id, code, discount_percent, max_uses, expires_at)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COUPON_COLUMNS}"
        ))
        .bind(contractor_id)
        .bind(code)
        .bind(discount_percent)
        .bind(max_uses)
        .bind(expires_at)
        .fetch_one(db)
        .await
    }

    pub async fn find_by_code(db: &PgPool, code: &str) -> anyhow::Result<Option<Coupon>> {
        let coupon = sqlx::query_as::<_, Coupon>(&format!(
            "SELECT {COUPON_COLUMNS} FROM coupons WHERE code = $1"
        ))
        .bind(code)
        .fetch_optional(db)
        .await?;
        Ok(coupon)
    }

    pub async fn list_by_contractor(db: &PgPool, contractor_id: Uuid) -> anyhow::Result<Vec<Coupon>> {
        let coupons = sqlx::query_as::<_, Coupon>(&format!(
            "SELECT {COUPON_COLUMNS} FROM coupons
             WHERE contractor_id = $1
             ORDER BY created_at DESC"
        ))
        .bind(contractor_id)
        .fetch_all(db)
        .await?;
        Ok(coupons)
    }

    /// Consumes one use as a single conditional update. Expiry and the usage
    /// limit are re-checked in the same statement, so two redemptions racing
    /// for the last use cannot both succeed and `current_uses` can never
    /// pass `max_uses`. `None` means the coupon is missing, expired, or
    /// exhausted; the row is untouched.
    pub async fn redeem_tx(
        tx: &mut Transaction<'_, Postgres>,
        code: &str,
    ) -> anyhow::Result<Option<Coupon>> {
        let coupon = sqlx::query_as::<_, Coupon>(&format!(
            "UPDATE coupons
             SET current_uses = current_uses + 1
             WHERE code = $1 AND expires_at > now() AND current_uses < max_uses
             RETURNING {COUPON_COLUMNS}"
        ))
        .bind(code)
        .fetch_optional(&mut **tx)
        .await?;
        Ok(coupon)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::Duration;

    fn coupon(current_uses: i32, max_uses: i32, expires_in: Duration) -> Coupon {
        let now = OffsetDateTime::now_utc();
        Coupon {
            id: Uuid::new_v4(),
            contractor_id: Uuid::new_v4(),
            code: "ABC123XYZ".into(),
            discount_percent: 20,
            max_uses,
            current_uses,
            created_at: now,
            expires_at: now + expires_in,
        }
    }

    #[test]
    fn active_requires_time_and_headroom() {
        let now = OffsetDateTime::now_utc();
        assert!(coupon(0, 100, Duration::days(30)).is_active(now));
        assert!(!coupon(100, 100, Duration::days(30)).is_active(now));
        assert!(!coupon(0, 100, Duration::days(-1)).is_active(now));
    }

    #[test]
    fn coupon_serializes_rfc3339_dates() {
        let c = coupon(3, 10, Duration::days(7));
        let json = serde_json::to_value(&c).unwrap();
        assert_eq!(json["current_uses"], 3);
        assert!(json["expires_at"].as_str().unwrap().contains('T'));
    }
}
