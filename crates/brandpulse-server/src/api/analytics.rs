use axum::{extract::State, response::IntoResponse, Extension, Json};
use serde::Serialize;

use crate::middleware::RequestId;

use super::brands::BrandOverviewItem;
use super::alerts::AlertItem;
use super::{ApiError, ApiResponse, AppState, ResponseMeta};

const TOP_BRANDS_LIMIT: i64 = 6;
const RECENT_ALERTS_LIMIT: i64 = 5;

/// The dashboard's landing payload: all-time sentiment totals plus the
/// most-mentioned brands and latest alerts.
#[derive(Debug, Serialize)]
pub(super) struct OverviewData {
    total_mentions: i64,
    positive_mentions: i64,
    negative_mentions: i64,
    neutral_mentions: i64,
    positive_pct: f64,
    negative_pct: f64,
    neutral_pct: f64,
    avg_sentiment: f64,
    top_brands: Vec<BrandOverviewItem>,
    recent_alerts: Vec<AlertItem>,
}

pub(super) async fn overview(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Result<impl IntoResponse, ApiError> {
    let breakdown = brandpulse_db::sentiment_breakdown(&state.pool, None, None)
        .await
        .map_err(|e| super::map_db_error(req_id.0.clone(), &e))?;

    let brands = brandpulse_db::list_brand_overview(&state.pool, TOP_BRANDS_LIMIT)
        .await
        .map_err(|e| super::map_db_error(req_id.0.clone(), &e))?;

    let alerts = brandpulse_db::list_alerts(&state.pool, RECENT_ALERTS_LIMIT)
        .await
        .map_err(|e| super::map_db_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: OverviewData {
            total_mentions: breakdown.total,
            positive_mentions: breakdown.positive,
            negative_mentions: breakdown.negative,
            neutral_mentions: breakdown.neutral,
            positive_pct: breakdown.positive_pct(),
            negative_pct: breakdown.negative_pct(),
            neutral_pct: breakdown.neutral_pct(),
            avg_sentiment: breakdown.avg_score,
            top_brands: brands.into_iter().map(BrandOverviewItem::from).collect(),
            recent_alerts: alerts.into_iter().map(AlertItem::from).collect(),
        },
        meta: ResponseMeta::new(req_id.0),
    }))
}
