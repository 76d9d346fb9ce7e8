use std::convert::Infallible;

use axum::{
    extract::{Path, Query, State},
    response::sse::{Event, KeepAlive, Sse},
    response::IntoResponse,
    Extension, Json,
};
use chrono::{DateTime, Utc};
use futures::stream::Stream;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use brandpulse_db::{AlertRow, AlertWithBrandRow};

#[cfg(test)]
use crate::alert_feed::AlertEvent;
use crate::middleware::RequestId;

use super::{ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Deserialize)]
pub(super) struct AlertQuery {
    limit: Option<i64>,
}

#[derive(Debug, Serialize)]
pub(super) struct AlertItem {
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

impl From<AlertWithBrandRow> for AlertItem {
    fn from(row: AlertWithBrandRow) -> Self {
        Self {
            id: row.id,
            brand_id: row.brand_id,
            brand_name: row.brand_name,
            alert_type: row.alert_type,
            message: row.message,
            sentiment_threshold: row.sentiment_threshold,
            is_sent: row.is_sent,
            sent_at: row.sent_at,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub(super) struct AlertSentResponse {
    id: i64,
    is_sent: bool,
    sent_at: Option<DateTime<Utc>>,
}

impl From<AlertRow> for AlertSentResponse {
    fn from(row: AlertRow) -> Self {
        Self {
            id: row.id,
            is_sent: row.is_sent,
            sent_at: row.sent_at,
        }
    }
}

pub(super) async fn list_alerts(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<AlertQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let rows = brandpulse_db::list_alerts(&state.pool, super::normalize_limit(query.limit))
        .await
        .map_err(|e| super::map_db_error(req_id.0.clone(), &e))?;

    let data: Vec<AlertItem> = rows.into_iter().map(AlertItem::from).collect();

    Ok(Json(ApiResponse {
        data,
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// Flip an alert's sent flag. Safe to call repeatedly; the flag stays true
/// and `sent_at` tracks the latest delivery.
pub(super) async fn mark_alert_sent(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(alert_id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let row = brandpulse_db::mark_alert_sent(&state.pool, alert_id)
        .await
        .map_err(|e| super::map_db_error(req_id.0.clone(), &e))?
        .ok_or_else(|| ApiError::new(req_id.0.clone(), "not_found", "alert not found"))?;

    Ok(Json(ApiResponse {
        data: AlertSentResponse::from(row),
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// Server-sent events feed of alerts as they are raised. A subscriber that
/// falls behind the broadcast buffer skips the missed events and keeps
/// receiving; the stream ends only when the server shuts down.
pub(super) async fn stream_alerts(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let receiver = state.alerts.subscribe();

    let stream = futures::stream::unfold(receiver, |mut receiver| async move {
        loop {
            match receiver.recv().await {
                Ok(event) => {
                    let sse_event = match Event::default().event("alert").json_data(&event) {
                        Ok(e) => e,
                        Err(error) => {
                            tracing::error!(%error, "failed to encode alert event");
                            continue;
                        }
                    };
                    return Some((Ok(sse_event), receiver));
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "alert stream subscriber lagged");
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    });

    Sse::new(stream).keep_alive(KeepAlive::default())
}
