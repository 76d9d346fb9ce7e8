mod alerts;
mod analytics;
mod brands;
mod mentions;
mod monitor;
mod reports;

use axum::{
    extract::State,
    http::{header, HeaderName, Method, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Extension, Json, Router,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::PgPool;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;

use crate::alert_feed::AlertFeed;
use crate::middleware::{request_id, RequestId};

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub alerts: AlertFeed,
}

#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ResponseMeta {
    pub request_id: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: ErrorBody,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct HealthData {
    status: &'static str,
    database: &'static str,
}

impl ResponseMeta {
    pub(super) fn new(request_id: String) -> Self {
        Self {
            request_id,
            timestamp: Utc::now(),
        }
    }
}

impl ApiError {
    pub fn new(
        request_id: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            error: ErrorBody {
                code: code.into(),
                message: message.into(),
            },
            meta: ResponseMeta::new(request_id.into()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match self.error.code.as_str() {
            "not_found" => StatusCode::NOT_FOUND,
            "bad_request" | "validation_error" => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(self)).into_response()
    }
}

pub(super) fn normalize_limit(limit: Option<i64>) -> i64 {
    limit.unwrap_or(50).clamp(1, 200)
}

pub(super) fn map_db_error(request_id: String, error: &brandpulse_db::DbError) -> ApiError {
    tracing::error!(error = %error, "database query failed");
    ApiError::new(request_id, "internal_error", "database query failed")
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([
            header::CONTENT_TYPE,
            HeaderName::from_static("x-request-id"),
        ])
}

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/api/v1/health", get(health))
        .route("/api/v1/search", post(monitor::search_brand))
        .route("/api/v1/monitor", post(monitor::monitor_brand))
        .route("/api/v1/brands", get(brands::list_brands))
        .route("/api/v1/mentions", get(mentions::list_mentions))
        .route("/api/v1/alerts", get(alerts::list_alerts))
        .route("/api/v1/alerts/{alert_id}/sent", post(alerts::mark_alert_sent))
        .route("/api/v1/alerts/stream", get(alerts::stream_alerts))
        .route("/api/v1/analytics/overview", get(analytics::overview))
        .route("/api/v1/reports", get(reports::list_reports))
        .route("/api/v1/reports/export", get(reports::export_report))
        .layer(
            ServiceBuilder::new()
                .layer(build_cors())
                .layer(axum::middleware::from_fn(request_id)),
        )
        .with_state(state)
}

async fn health(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> impl IntoResponse {
    let meta = ResponseMeta::new(req_id.0);

    match brandpulse_db::health_check(&state.pool).await {
        Ok(()) => (
            StatusCode::OK,
            Json(ApiResponse {
                data: HealthData {
                    status: "ok",
                    database: "ok",
                },
                meta,
            }),
        ),
        Err(e) => {
            tracing::warn!(error = %e, "health check: database unavailable");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ApiResponse {
                    data: HealthData {
                        status: "degraded",
                        database: "unavailable",
                    },
                    meta,
                }),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::alerts::AlertItem;
    use super::brands::BrandOverviewItem;
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use chrono::Utc;
    use tower::ServiceExt;

    fn test_app(pool: sqlx::PgPool) -> Router {
        build_app(AppState {
            pool,
            alerts: AlertFeed::new(16),
        })
    }

    // -------------------------------------------------------------------------
    // Serialization unit tests (no DB)
    // -------------------------------------------------------------------------

    #[test]
    fn brand_overview_item_is_serializable() {
        let item = BrandOverviewItem {
            id: 1,
            public_id: uuid::Uuid::new_v4(),
            name: "Acme".to_string(),
            mention_count: 9,
            positive_mentions: 3,
            negative_mentions: 3,
            sentiment_label: "mixed".to_string(),
            created_at: Utc::now(),
        };
        let json = serde_json::to_string(&item).expect("serialize");
        assert!(json.contains("\"name\":\"Acme\""));
        assert!(json.contains("\"sentiment_label\":\"mixed\""));
    }

    #[test]
    fn alert_item_is_serializable() {
        let item = AlertItem {
            id: 5,
            brand_id: 1,
            brand_name: "Acme".to_string(),
            alert_type: "negative_spike".to_string(),
            message: "Acme experiencing increased negative sentiment".to_string(),
            sentiment_threshold: Some(50.0),
            is_sent: false,
            sent_at: None,
            created_at: Utc::now(),
        };
        let json = serde_json::to_value(&item).expect("serialize");
        assert_eq!(json["alert_type"], "negative_spike");
        assert!(json["sent_at"].is_null());
    }

    #[test]
    fn normalize_limit_applies_defaults_and_bounds() {
        assert_eq!(normalize_limit(None), 50);
        assert_eq!(normalize_limit(Some(0)), 1);
        assert_eq!(normalize_limit(Some(1_000)), 200);
        assert_eq!(normalize_limit(Some(25)), 25);
    }

    #[test]
    fn api_error_validation_error_maps_to_bad_request() {
        let response = ApiError::new("req-1", "validation_error", "invalid input").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn api_error_unknown_code_maps_to_internal_error() {
        let response = ApiError::new("req-1", "mystery", "boom").into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    // -------------------------------------------------------------------------
    // Route integration tests (with DB)
    // -------------------------------------------------------------------------

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body bytes");
        serde_json::from_slice(&body).expect("json parse")
    }

    fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .expect("request")
    }

    fn get_req(uri: &str) -> Request<Body> {
        Request::builder()
            .uri(uri)
            .body(Body::empty())
            .expect("request")
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn health_returns_ok(pool: sqlx::PgPool) {
        let response = test_app(pool)
            .oneshot(get_req("/api/v1/health"))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["data"]["status"], "ok");
        assert!(json["meta"]["request_id"].is_string());
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn search_creates_brand_and_ingests_batch(pool: sqlx::PgPool) {
        let app = test_app(pool.clone());

        let response = app
            .oneshot(post_json(
                "/api/v1/search",
                serde_json::json!({ "query": "Acme" }),
            ))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["data"]["brand"]["name"], "Acme");
        assert_eq!(json["data"]["created"], true);
        assert_eq!(json["data"]["mentions_added"], 3);
        // 1 negative of 3 in the batch: the crisis rule must stay quiet.
        assert_eq!(json["data"]["alert_created"], false);

        let mention_count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM brand_mentions")
                .fetch_one(&pool)
                .await
                .expect("count");
        assert_eq!(mention_count, 3);
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn repeated_searches_reuse_the_brand(pool: sqlx::PgPool) {
        for expected_created in [true, false, false] {
            let response = test_app(pool.clone())
                .oneshot(post_json(
                    "/api/v1/search",
                    serde_json::json!({ "query": "acme" }),
                ))
                .await
                .expect("response");
            let json = body_json(response).await;
            assert_eq!(json["data"]["created"], expected_created);
            assert_eq!(json["data"]["alert_created"], false);
        }

        let brand_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM brands")
            .fetch_one(&pool)
            .await
            .expect("count");
        assert_eq!(brand_count, 1);

        let mention_count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM brand_mentions")
                .fetch_one(&pool)
                .await
                .expect("count");
        assert_eq!(mention_count, 9);

        // Cumulative evaluation never happens; 3 negatives of 9 trigger nothing.
        let alert_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM alerts")
            .fetch_one(&pool)
            .await
            .expect("count");
        assert_eq!(alert_count, 0);
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn search_rejects_blank_query(pool: sqlx::PgPool) {
        let response = test_app(pool)
            .oneshot(post_json(
                "/api/v1/search",
                serde_json::json!({ "query": "   " }),
            ))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn monitor_honours_the_edge_contract(pool: sqlx::PgPool) {
        let (brand, _) = brandpulse_db::lookup_or_create_brand(&pool, "Acme")
            .await
            .expect("brand");

        let response = test_app(pool)
            .oneshot(post_json(
                "/api/v1/monitor",
                serde_json::json!({ "brandId": brand.id, "brandName": "Acme" }),
            ))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["data"]["success"], true);
        assert_eq!(json["data"]["mentionsAdded"], 3);
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn monitor_uses_the_supplied_brand_name(pool: sqlx::PgPool) {
        let (brand, _) = brandpulse_db::lookup_or_create_brand(&pool, "Acme")
            .await
            .expect("brand");

        let response = test_app(pool.clone())
            .oneshot(post_json(
                "/api/v1/monitor",
                serde_json::json!({ "brandId": brand.id, "brandName": "Acme Corp" }),
            ))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK);

        // The caller's spelling, not the stored row's, lands in the batch.
        let texts: Vec<String> =
            sqlx::query_scalar("SELECT mention_text FROM brand_mentions ORDER BY id")
                .fetch_all(&pool)
                .await
                .expect("texts");
        assert_eq!(texts.len(), 3);
        assert!(texts.iter().all(|t| t.contains("Acme Corp")));
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn monitor_unknown_brand_is_404(pool: sqlx::PgPool) {
        let response = test_app(pool)
            .oneshot(post_json(
                "/api/v1/monitor",
                serde_json::json!({ "brandId": 404, "brandName": "Ghost" }),
            ))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn brands_list_reports_counts_and_health(pool: sqlx::PgPool) {
        test_app(pool.clone())
            .oneshot(post_json(
                "/api/v1/search",
                serde_json::json!({ "query": "Acme" }),
            ))
            .await
            .expect("search");

        let response = test_app(pool)
            .oneshot(get_req("/api/v1/brands"))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        let data = json["data"].as_array().expect("data array");
        assert_eq!(data.len(), 1);
        assert_eq!(data[0]["name"], "Acme");
        assert_eq!(data[0]["mention_count"], 3);
        // 1/3 positive lands between the favorable and unfavorable cutoffs.
        assert_eq!(data[0]["sentiment_label"], "mixed");
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn analytics_overview_sums_percentages(pool: sqlx::PgPool) {
        test_app(pool.clone())
            .oneshot(post_json(
                "/api/v1/search",
                serde_json::json!({ "query": "Acme" }),
            ))
            .await
            .expect("search");

        let response = test_app(pool)
            .oneshot(get_req("/api/v1/analytics/overview"))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        let data = &json["data"];
        assert_eq!(data["total_mentions"], 3);
        let sum = data["positive_pct"].as_f64().unwrap()
            + data["negative_pct"].as_f64().unwrap()
            + data["neutral_pct"].as_f64().unwrap();
        assert!((sum - 100.0).abs() < 1e-9, "pct sum was {sum}");
        assert_eq!(data["top_brands"].as_array().map(Vec::len), Some(1));
        assert_eq!(data["recent_alerts"].as_array().map(Vec::len), Some(0));
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn alerts_mark_sent_roundtrip(pool: sqlx::PgPool) {
        let (brand, _) = brandpulse_db::lookup_or_create_brand(&pool, "Acme")
            .await
            .expect("brand");
        let alert = brandpulse_db::insert_alert(
            &pool,
            brand.id,
            "negative_spike",
            "Acme experiencing increased negative sentiment",
            Some(50.0),
        )
        .await
        .expect("alert");

        let response = test_app(pool.clone())
            .oneshot(post_json(
                &format!("/api/v1/alerts/{}/sent", alert.id),
                serde_json::json!({}),
            ))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["data"]["is_sent"], true);

        let response = test_app(pool)
            .oneshot(get_req("/api/v1/alerts"))
            .await
            .expect("response");
        let json = body_json(response).await;
        let data = json["data"].as_array().expect("data array");
        assert_eq!(data.len(), 1);
        assert_eq!(data[0]["is_sent"], true);
        assert_eq!(data[0]["brand_name"], "Acme");
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn mark_sent_unknown_alert_is_404(pool: sqlx::PgPool) {
        let response = test_app(pool)
            .oneshot(post_json("/api/v1/alerts/999/sent", serde_json::json!({})))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn report_export_produces_csv_attachment(pool: sqlx::PgPool) {
        test_app(pool.clone())
            .oneshot(post_json(
                "/api/v1/search",
                serde_json::json!({ "query": "Acme" }),
            ))
            .await
            .expect("search");

        let response = test_app(pool)
            .oneshot(get_req("/api/v1/reports/export?days=7&format=csv"))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK);

        let disposition = response
            .headers()
            .get(header::CONTENT_DISPOSITION)
            .and_then(|v| v.to_str().ok())
            .expect("content-disposition")
            .to_string();
        assert!(disposition.starts_with("attachment; filename=\"sentiment-report-7days-"));
        assert!(disposition.ends_with(".csv\""));

        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body bytes");
        let text = String::from_utf8(body.to_vec()).expect("utf8");
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines[0],
            "Brand,Total Mentions,Positive,Negative,Neutral,Avg Sentiment,Period"
        );
        assert_eq!(lines.len(), 2);
        assert!(lines[1].starts_with("Acme,3,1,1,1,0.50,"));
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn report_export_with_no_brands_is_refused(pool: sqlx::PgPool) {
        let response = test_app(pool)
            .oneshot(get_req("/api/v1/reports/export?days=7&format=json"))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["error"]["message"], "no data to export");
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn reports_list_includes_window_label(pool: sqlx::PgPool) {
        test_app(pool.clone())
            .oneshot(post_json(
                "/api/v1/search",
                serde_json::json!({ "query": "Acme" }),
            ))
            .await
            .expect("search");

        let response = test_app(pool)
            .oneshot(get_req("/api/v1/reports?days=30"))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        let data = json["data"].as_array().expect("data array");
        assert_eq!(data.len(), 1);
        assert_eq!(data[0]["brand"], "Acme");
        assert_eq!(data[0]["totalMentions"], 3);
        assert_eq!(data[0]["period"], "30 days");
    }
}
