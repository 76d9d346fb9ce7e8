//! Database operations for the `brands` table.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::DbError;

// ---------------------------------------------------------------------------
// Row types
// ---------------------------------------------------------------------------

/// A row from the `brands` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct BrandRow {
    pub id: i64,
    pub public_id: Uuid,
    pub name: String,
    pub notification_email: Option<String>,
    pub twitter_handle: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A brand joined with its all-time mention counts, for the dashboard
/// brand cards.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct BrandOverviewRow {
    pub id: i64,
    pub public_id: Uuid,
    pub name: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub total_mentions: i64,
    pub positive_mentions: i64,
    pub negative_mentions: i64,
}

const BRAND_COLUMNS: &str = "id, public_id, name, notification_email, twitter_handle, \
                             is_active, created_at, updated_at";

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

/// Returns all active brands, ordered by name.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_active_brands(pool: &PgPool) -> Result<Vec<BrandRow>, DbError> {
    let rows = sqlx::query_as::<_, BrandRow>(&format!(
        "SELECT {BRAND_COLUMNS} FROM brands WHERE is_active = true ORDER BY name"
    ))
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Returns a single brand by id, or `None` if not found.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn get_brand(pool: &PgPool, brand_id: i64) -> Result<Option<BrandRow>, DbError> {
    let row = sqlx::query_as::<_, BrandRow>(&format!(
        "SELECT {BRAND_COLUMNS} FROM brands WHERE id = $1"
    ))
    .bind(brand_id)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

/// Case-insensitive lookup by exact name, or `None` if not found.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn find_brand_by_name(pool: &PgPool, name: &str) -> Result<Option<BrandRow>, DbError> {
    let row = sqlx::query_as::<_, BrandRow>(&format!(
        "SELECT {BRAND_COLUMNS} FROM brands WHERE LOWER(name) = LOWER($1)"
    ))
    .bind(name)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

/// Find a brand by name (case-insensitive) or create it as active.
///
/// Backed by the unique index on `LOWER(name)`, so two concurrent searches
/// for the same name resolve to a single row: the loser of the insert race
/// lands on the `ON CONFLICT` arm and gets the winner's row back. Re-searching
/// an existing brand refreshes `updated_at`.
///
/// Returns the row plus `true` when this call created it.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the statement fails.
pub async fn lookup_or_create_brand(
    pool: &PgPool,
    name: &str,
) -> Result<(BrandRow, bool), DbError> {
    let row = sqlx::query_as::<_, BrandRow>(&format!(
        "INSERT INTO brands (name, is_active) VALUES ($1, true) \
         ON CONFLICT ((LOWER(name))) DO UPDATE SET updated_at = NOW() \
         RETURNING {BRAND_COLUMNS}"
    ))
    .bind(name.trim())
    .fetch_one(pool)
    .await?;

    // A fresh insert stamps both timestamps from the same statement clock;
    // the conflict arm bumps only updated_at.
    let created = row.created_at == row.updated_at;
    Ok((row, created))
}

/// Returns active brands with their all-time mention counts, most-mentioned
/// first.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_brand_overview(
    pool: &PgPool,
    limit: i64,
) -> Result<Vec<BrandOverviewRow>, DbError> {
    let rows = sqlx::query_as::<_, BrandOverviewRow>(
        "SELECT b.id, b.public_id, b.name, b.is_active, b.created_at, \
                COUNT(m.id) AS total_mentions, \
                COUNT(m.id) FILTER (WHERE m.sentiment_label = 'positive') AS positive_mentions, \
                COUNT(m.id) FILTER (WHERE m.sentiment_label = 'negative') AS negative_mentions \
         FROM brands b \
         LEFT JOIN brand_mentions m ON m.brand_id = b.id \
         WHERE b.is_active = true \
         GROUP BY b.id, b.public_id, b.name, b.is_active, b.created_at \
         ORDER BY COUNT(m.id) DESC, b.name \
         LIMIT $1",
    )
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}
