use serde::Serialize;
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Letter {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub content: String,
    pub letter_type: String,
    pub form_data: serde_json::Value,
    pub urgency_level: String,
    pub total_price: f64,
    pub status: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

const LETTER_COLUMNS: &str = "id, user_id, title, content, letter_type, form_data, \
                              urgency_level, total_price, status, created_at, updated_at";

impl Letter {
    #[allow(clippy::too_many_arguments)]
    pub async fn insert(
        db: &PgPool,
        user_id: Uuid,
        title: &str,
        content: &str,
        letter_type: &str,
        form_data: &serde_json::Value,
        urgency_level: &str,
        total_price: f64,
    ) -> anyhow::Result<Letter> {
        let letter = sqlx::query_as::<_, Letter>(&format!(
            "INSERT INTO letters (user_id, title, content, letter_type, form_data, urgency_level, total_price)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {LETTER_COLUMNS}"
        ))
        .bind(user_id)
        .bind(title)
        .bind(content)
        .bind(letter_type)
        .bind(form_data)
        .bind(urgency_level)
        .bind(total_price)
        .fetch_one(db)
        .await?;
        Ok(letter)
    }

    pub async fn list_by_user(db: &PgPool, user_id: Uuid) -> anyhow::Result<Vec<Letter>> {
        let letters = sqlx::query_as::<_, Letter>(&format!(
            "SELECT {LETTER_COLUMNS} FROM letters
             WHERE user_id = $1
             ORDER BY created_at DESC"
        ))
        .bind(user_id)
        .fetch_all(db)
        .await?;
        Ok(letters)
    }

    pub async fn list_all(db: &PgPool) -> anyhow::Result<Vec<Letter>> {
        let letters = sqlx::query_as::<_, Letter>(&format!(
            "SELECT {LETTER_COLUMNS} FROM letters ORDER BY created_at DESC"
        ))
        .fetch_all(db)
        .await?;
        Ok(letters)
    }
}
