use axum::{extract::State, response::IntoResponse, Extension, Json};
use serde::{Deserialize, Serialize};

use brandpulse_db::BrandRow;
use brandpulse_monitor::{run_monitor, MockMentionSource, MonitorError, MonitorOutcome};

use crate::alert_feed::AlertEvent;
use crate::middleware::RequestId;

use super::{ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Deserialize)]
pub(super) struct SearchRequest {
    query: String,
}

#[derive(Debug, Serialize)]
pub(super) struct SearchResponse {
    brand: BrandSummary,
    created: bool,
    mentions_added: usize,
    alert_created: bool,
}

#[derive(Debug, Serialize)]
pub(super) struct BrandSummary {
    id: i64,
    public_id: uuid::Uuid,
    name: String,
    is_active: bool,
}

impl From<&BrandRow> for BrandSummary {
    fn from(row: &BrandRow) -> Self {
        Self {
            id: row.id,
            public_id: row.public_id,
            name: row.name.clone(),
            is_active: row.is_active,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct MonitorRequest {
    brand_id: i64,
    brand_name: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct MonitorResponse {
    success: bool,
    mentions_added: usize,
}

/// Looks a brand up by name (creating it on first sight), then runs one
/// monitoring pass against it.
pub(super) async fn search_brand(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(request): Json<SearchRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let query = request.query.trim();
    if query.is_empty() {
        return Err(ApiError::new(
            req_id.0,
            "validation_error",
            "query must not be blank",
        ));
    }

    let (brand, created) = brandpulse_db::lookup_or_create_brand(&state.pool, query)
        .await
        .map_err(|e| super::map_db_error(req_id.0.clone(), &e))?;

    let outcome = run_pass(&state, &req_id.0, &brand).await?;
    let alert_created = outcome.alert.is_some();
    publish_alert(&state, &brand, outcome.alert);

    Ok(Json(ApiResponse {
        data: SearchResponse {
            brand: BrandSummary::from(&brand),
            created,
            mentions_added: outcome.mentions_added,
            alert_created,
        },
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// Compatibility endpoint for callers that already hold a brand id. Same
/// monitoring pass as `search_brand`, camelCase payloads on both sides.
/// When the caller supplies a `brandName`, that spelling is what the
/// mention templates and any alert message embed.
pub(super) async fn monitor_brand(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(request): Json<MonitorRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let mut brand = brandpulse_db::get_brand(&state.pool, request.brand_id)
        .await
        .map_err(|e| super::map_db_error(req_id.0.clone(), &e))?
        .ok_or_else(|| ApiError::new(req_id.0.clone(), "not_found", "brand not found"))?;

    if let Some(name) = request.brand_name {
        let name = name.trim().to_string();
        if !name.is_empty() {
            brand.name = name;
        }
    }

    let outcome = run_pass(&state, &req_id.0, &brand).await?;
    publish_alert(&state, &brand, outcome.alert);

    Ok(Json(ApiResponse {
        data: MonitorResponse {
            success: true,
            mentions_added: outcome.mentions_added,
        },
        meta: ResponseMeta::new(req_id.0),
    }))
}

async fn run_pass(
    state: &AppState,
    req_id: &str,
    brand: &BrandRow,
) -> Result<MonitorOutcome, ApiError> {
    run_monitor(&state.pool, &MockMentionSource, brand)
        .await
        .map_err(|e| match e {
            MonitorError::Db(db) => super::map_db_error(req_id.to_string(), &db),
            MonitorError::Source(msg) => {
                tracing::error!(brand = %brand.name, error = %msg, "mention source failed");
                ApiError::new(req_id, "internal_error", "mention source failed")
            }
        })
}

fn publish_alert(state: &AppState, brand: &BrandRow, alert: Option<brandpulse_db::AlertRow>) {
    if let Some(alert) = alert {
        state.alerts.publish(AlertEvent {
            id: alert.id,
            brand_id: brand.id,
            brand_name: brand.name.clone(),
            alert_type: alert.alert_type,
            message: alert.message,
            created_at: alert.created_at,
        });
    }
}
