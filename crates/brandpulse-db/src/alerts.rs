//! Database operations for the `alerts` table.
//!
//! Alerts are created by the crisis evaluator and mutated in exactly one
//! way afterwards: flipping `is_sent` from false to true.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::DbError;

// ---------------------------------------------------------------------------
// Row types
// ---------------------------------------------------------------------------

/// A row from the `alerts` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct AlertRow {
    pub id: i64,
    pub brand_id: i64,
    pub alert_type: String,
    pub message: String,
    pub sentiment_threshold: Option<f64>,
    pub is_sent: bool,
    pub sent_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// An alert joined with its brand's name, for the alert center list.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct AlertWithBrandRow {
    pub id: i64,
    pub brand_id: i64,
    pub brand_name: String,
    pub alert_type: String,
    pub message: String,
    pub sentiment_threshold: Option<f64>,
    pub is_sent: bool,
    pub sent_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

/// Insert a new alert and return the full row.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the insert fails.
pub async fn insert_alert(
    pool: &PgPool,
    brand_id: i64,
    alert_type: &str,
    message: &str,
    sentiment_threshold: Option<f64>,
) -> Result<AlertRow, DbError> {
    let row = sqlx::query_as::<_, AlertRow>(
        "INSERT INTO alerts (brand_id, alert_type, message, sentiment_threshold) \
         VALUES ($1, $2, $3, $4) \
         RETURNING id, brand_id, alert_type, message, sentiment_threshold, \
                   is_sent, sent_at, created_at",
    )
    .bind(brand_id)
    .bind(alert_type)
    .bind(message)
    .bind(sentiment_threshold)
    .fetch_one(pool)
    .await?;

    Ok(row)
}

/// List alerts newest-first with their brand names.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_alerts(pool: &PgPool, limit: i64) -> Result<Vec<AlertWithBrandRow>, DbError> {
    let rows = sqlx::query_as::<_, AlertWithBrandRow>(
        "SELECT a.id, a.brand_id, b.name AS brand_name, a.alert_type, a.message, \
                a.sentiment_threshold, a.is_sent, a.sent_at, a.created_at \
         FROM alerts a \
         JOIN brands b ON b.id = a.brand_id \
         ORDER BY a.created_at DESC, a.id DESC \
         LIMIT $1",
    )
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Mark an alert as sent, returning the updated row, or `None` for an
/// unknown id.
///
/// The flag is monotonic: this statement only ever sets `is_sent = true`,
/// and no query exists to unset it. Re-marking an already-sent alert leaves
/// the flag unchanged and refreshes `sent_at`.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the update fails.
pub async fn mark_alert_sent(pool: &PgPool, alert_id: i64) -> Result<Option<AlertRow>, DbError> {
    let row = sqlx::query_as::<_, AlertRow>(
        "UPDATE alerts \
         SET is_sent = true, sent_at = NOW() \
         WHERE id = $1 \
         RETURNING id, brand_id, alert_type, message, sentiment_threshold, \
                   is_sent, sent_at, created_at",
    )
    .bind(alert_id)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}
