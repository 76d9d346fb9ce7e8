//! Database operations for the `brand_mentions` table, including the
//! windowed aggregation queries behind analytics and reports.

use brandpulse_core::{SentimentBreakdown, SentimentLabel};
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::DbError;

// ---------------------------------------------------------------------------
// Row types
// ---------------------------------------------------------------------------

/// A row from the `brand_mentions` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct MentionRow {
    pub id: i64,
    pub brand_id: i64,
    pub mention_text: String,
    pub platform: String,
    pub author_username: Option<String>,
    pub url: Option<String>,
    pub sentiment_label: String,
    pub sentiment_score: f64,
    pub confidence: f64,
    pub mention_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

/// A mention to insert. Label and scores come from the mention source;
/// rows are append-only.
#[derive(Debug, Clone)]
pub struct NewMention<'a> {
    pub mention_text: &'a str,
    pub platform: &'a str,
    pub author_username: Option<&'a str>,
    pub url: Option<&'a str>,
    pub sentiment_label: SentimentLabel,
    pub sentiment_score: f64,
    pub confidence: f64,
}

/// Per-brand aggregate over a reporting window.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct BrandReportRow {
    pub brand_name: String,
    pub total_mentions: i64,
    pub positive_mentions: i64,
    pub negative_mentions: i64,
    pub neutral_mentions: i64,
    pub avg_sentiment: f64,
}

#[derive(Debug, sqlx::FromRow)]
struct BreakdownRow {
    total: i64,
    positive: i64,
    negative: i64,
    neutral: i64,
    avg_score: f64,
}

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

/// Append one mention row and return its generated id.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the insert fails (including a missing brand,
/// via the foreign key).
pub async fn insert_mention(
    pool: &PgPool,
    brand_id: i64,
    mention: &NewMention<'_>,
) -> Result<i64, DbError> {
    let id: i64 = sqlx::query_scalar(
        "INSERT INTO brand_mentions \
             (brand_id, mention_text, platform, author_username, url, \
              sentiment_label, sentiment_score, confidence) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
         RETURNING id",
    )
    .bind(brand_id)
    .bind(mention.mention_text)
    .bind(mention.platform)
    .bind(mention.author_username)
    .bind(mention.url)
    .bind(mention.sentiment_label.as_str())
    .bind(mention.sentiment_score)
    .bind(mention.confidence)
    .fetch_one(pool)
    .await?;

    Ok(id)
}

/// List recent mentions, optionally filtered by brand and window.
///
/// Results are ordered by `mention_date DESC` then `id DESC`.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_recent_mentions(
    pool: &PgPool,
    brand_id: Option<i64>,
    window_days: Option<i32>,
    limit: i64,
) -> Result<Vec<MentionRow>, DbError> {
    let rows = sqlx::query_as::<_, MentionRow>(
        "SELECT id, brand_id, mention_text, platform, author_username, url, \
                sentiment_label, sentiment_score, confidence, mention_date, created_at \
         FROM brand_mentions \
         WHERE ($1::BIGINT IS NULL OR brand_id = $1) \
           AND ($2::INT IS NULL OR mention_date >= NOW() - MAKE_INTERVAL(days => $2)) \
         ORDER BY mention_date DESC, id DESC \
         LIMIT $3",
    )
    .bind(brand_id)
    .bind(window_days)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Aggregate label counts and average score, optionally filtered by brand
/// and window. An empty window comes back as all zeros, never an error.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn sentiment_breakdown(
    pool: &PgPool,
    brand_id: Option<i64>,
    window_days: Option<i32>,
) -> Result<SentimentBreakdown, DbError> {
    let row = sqlx::query_as::<_, BreakdownRow>(
        "SELECT COUNT(*) AS total, \
                COUNT(*) FILTER (WHERE sentiment_label = 'positive') AS positive, \
                COUNT(*) FILTER (WHERE sentiment_label = 'negative') AS negative, \
                COUNT(*) FILTER (WHERE sentiment_label = 'neutral') AS neutral, \
                COALESCE(AVG(sentiment_score), 0)::FLOAT8 AS avg_score \
         FROM brand_mentions \
         WHERE ($1::BIGINT IS NULL OR brand_id = $1) \
           AND ($2::INT IS NULL OR mention_date >= NOW() - MAKE_INTERVAL(days => $2))",
    )
    .bind(brand_id)
    .bind(window_days)
    .fetch_one(pool)
    .await?;

    Ok(SentimentBreakdown {
        total: row.total,
        positive: row.positive,
        negative: row.negative,
        neutral: row.neutral,
        avg_score: row.avg_score,
    })
}

/// Per-brand aggregates for every active brand over the window,
/// most-mentioned first. Brands without mentions in the window appear
/// with zero counts.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_brand_reports(
    pool: &PgPool,
    window_days: i32,
) -> Result<Vec<BrandReportRow>, DbError> {
    let rows = sqlx::query_as::<_, BrandReportRow>(
        "SELECT b.name AS brand_name, \
                COUNT(m.id) AS total_mentions, \
                COUNT(m.id) FILTER (WHERE m.sentiment_label = 'positive') AS positive_mentions, \
                COUNT(m.id) FILTER (WHERE m.sentiment_label = 'negative') AS negative_mentions, \
                COUNT(m.id) FILTER (WHERE m.sentiment_label = 'neutral') AS neutral_mentions, \
                COALESCE(AVG(m.sentiment_score), 0)::FLOAT8 AS avg_sentiment \
         FROM brands b \
         LEFT JOIN brand_mentions m \
           ON m.brand_id = b.id \
          AND m.mention_date >= NOW() - MAKE_INTERVAL(days => $1) \
         WHERE b.is_active = true \
         GROUP BY b.id, b.name \
         ORDER BY COUNT(m.id) DESC, b.name",
    )
    .bind(window_days)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}
