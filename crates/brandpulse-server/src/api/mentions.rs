use axum::{
    extract::{Query, State},
    response::IntoResponse,
    Extension, Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use brandpulse_db::MentionRow;

use crate::middleware::RequestId;

use super::{ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Deserialize)]
pub(super) struct MentionQuery {
    brand_id: Option<i64>,
    days: Option<i32>,
    limit: Option<i64>,
}

#[derive(Debug, Serialize)]
pub(super) struct MentionItem {
    id: i64,
    brand_id: i64,
    mention_text: String,
    platform: String,
    author_username: Option<String>,
    url: Option<String>,
    sentiment_label: String,
    sentiment_score: f64,
    confidence: f64,
    mention_date: DateTime<Utc>,
}

impl From<MentionRow> for MentionItem {
    fn from(row: MentionRow) -> Self {
        Self {
            id: row.id,
            brand_id: row.brand_id,
            mention_text: row.mention_text,
            platform: row.platform,
            author_username: row.author_username,
            url: row.url,
            sentiment_label: row.sentiment_label,
            sentiment_score: row.sentiment_score,
            confidence: row.confidence,
            mention_date: row.mention_date,
        }
    }
}

pub(super) async fn list_mentions(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<MentionQuery>,
) -> Result<impl IntoResponse, ApiError> {
    if let Some(days) = query.days {
        if days < 1 {
            return Err(ApiError::new(
                req_id.0,
                "validation_error",
                "days must be at least 1",
            ));
        }
    }

    let rows = brandpulse_db::list_recent_mentions(
        &state.pool,
        query.brand_id,
        query.days,
        super::normalize_limit(query.limit),
    )
    .await
    .map_err(|e| super::map_db_error(req_id.0.clone(), &e))?;

    let data: Vec<MentionItem> = rows.into_iter().map(MentionItem::from).collect();

    Ok(Json(ApiResponse {
        data,
        meta: ResponseMeta::new(req_id.0),
    }))
}
