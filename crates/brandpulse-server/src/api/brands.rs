use axum::{extract::State, response::IntoResponse, Extension, Json};
use chrono::{DateTime, Utc};
use serde::Serialize;

use brandpulse_core::BrandHealth;
use brandpulse_db::BrandOverviewRow;

use crate::middleware::RequestId;

use super::{ApiError, ApiResponse, AppState, ResponseMeta};

/// An active brand with its all-time mention tallies and a coarse health
/// label derived from the positive ratio.
#[derive(Debug, Serialize)]
pub(super) struct BrandOverviewItem {
    pub id: i64,
    pub public_id: uuid::Uuid,
    pub name: String,
    pub mention_count: i64,
    pub positive_mentions: i64,
    pub negative_mentions: i64,
    pub sentiment_label: String,
    pub created_at: DateTime<Utc>,
}

impl From<BrandOverviewRow> for BrandOverviewItem {
    fn from(row: BrandOverviewRow) -> Self {
        let health = BrandHealth::from_counts(row.positive_mentions, row.total_mentions);
        Self {
            id: row.id,
            public_id: row.public_id,
            name: row.name,
            mention_count: row.total_mentions,
            positive_mentions: row.positive_mentions,
            negative_mentions: row.negative_mentions,
            sentiment_label: health.as_str().to_string(),
            created_at: row.created_at,
        }
    }
}

pub(super) async fn list_brands(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Result<impl IntoResponse, ApiError> {
    let rows = brandpulse_db::list_brand_overview(&state.pool, super::normalize_limit(None))
        .await
        .map_err(|e| super::map_db_error(req_id.0.clone(), &e))?;

    let data: Vec<BrandOverviewItem> = rows.into_iter().map(BrandOverviewItem::from).collect();

    Ok(Json(ApiResponse {
        data,
        meta: ResponseMeta::new(req_id.0),
    }))
}
