use axum::{
    extract::{Query, State},
    http::header,
    response::IntoResponse,
    Extension, Json,
};
use chrono::Utc;
use serde::Deserialize;

use brandpulse_core::{export_filename, period_label, render_report, BrandReport, ExportFormat};
use brandpulse_db::BrandReportRow;

use crate::middleware::RequestId;

use super::{ApiError, ApiResponse, AppState, ResponseMeta};

const DEFAULT_PERIOD_DAYS: u32 = 7;
const MAX_PERIOD_DAYS: u32 = 365;

#[derive(Debug, Deserialize)]
pub(super) struct ReportQuery {
    days: Option<u32>,
    format: Option<String>,
}

fn validate_days(req_id: &str, days: Option<u32>) -> Result<u32, ApiError> {
    let days = days.unwrap_or(DEFAULT_PERIOD_DAYS);
    if days < 1 || days > MAX_PERIOD_DAYS {
        return Err(ApiError::new(
            req_id,
            "validation_error",
            format!("days must be between 1 and {MAX_PERIOD_DAYS}"),
        ));
    }
    Ok(days)
}

fn to_report(row: BrandReportRow, days: u32) -> BrandReport {
    BrandReport {
        brand: row.brand_name,
        total_mentions: row.total_mentions,
        positive_mentions: row.positive_mentions,
        negative_mentions: row.negative_mentions,
        neutral_mentions: row.neutral_mentions,
        avg_sentiment: row.avg_sentiment,
        period: period_label(days),
    }
}

async fn build_reports(
    state: &AppState,
    req_id: &str,
    days: u32,
) -> Result<Vec<BrandReport>, ApiError> {
    #[allow(clippy::cast_possible_wrap)]
    let window_days = days as i32;
    let rows = brandpulse_db::list_brand_reports(&state.pool, window_days)
        .await
        .map_err(|e| super::map_db_error(req_id.to_string(), &e))?;

    Ok(rows.into_iter().map(|row| to_report(row, days)).collect())
}

pub(super) async fn list_reports(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<ReportQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let days = validate_days(&req_id.0, query.days)?;
    let data = build_reports(&state, &req_id.0, days).await?;

    Ok(Json(ApiResponse {
        data,
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// Render the per-brand report as a downloadable attachment. CSV by
/// default; `?format=json` switches to the pretty-printed JSON rendition.
pub(super) async fn export_report(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<ReportQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let days = validate_days(&req_id.0, query.days)?;
    let format = match query.format.as_deref() {
        None => ExportFormat::Csv,
        Some(raw) => raw.parse::<ExportFormat>().map_err(|_| {
            ApiError::new(
                req_id.0.clone(),
                "validation_error",
                format!("unsupported export format: {raw}"),
            )
        })?,
    };

    let reports = build_reports(&state, &req_id.0, days).await?;
    let body = render_report(&reports, format)
        .map_err(|e| ApiError::new(req_id.0.clone(), "bad_request", e.to_string()))?;

    let filename = export_filename(days, Utc::now().date_naive(), format);
    Ok((
        [
            (header::CONTENT_TYPE, format.content_type().to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        body,
    ))
}
