//! Live pipeline tests against a sqlx-managed Postgres database.

use brandpulse_core::SentimentLabel;
use brandpulse_db::{list_alerts, list_recent_mentions, lookup_or_create_brand};
use brandpulse_monitor::{run_monitor, MentionSource, MockMentionSource, MonitorError, ScoredMention};

/// Source that labels every mention negative, tripping the crisis rule.
struct AllNegativeSource;

impl MentionSource for AllNegativeSource {
    async fn fetch(&self, brand_name: &str) -> Result<Vec<ScoredMention>, MonitorError> {
        Ok((0..3)
            .map(|i| ScoredMention {
                text: format!("{brand_name} is awful, take {i}"),
                platform: "twitter".to_string(),
                author_username: format!("user_{i:09}"),
                url: None,
                label: SentimentLabel::Negative,
                score: 0.1,
                confidence: 0.95,
            })
            .collect())
    }
}

/// Source that always fails, for the abort path.
struct BrokenSource;

impl MentionSource for BrokenSource {
    async fn fetch(&self, _brand_name: &str) -> Result<Vec<ScoredMention>, MonitorError> {
        Err(MonitorError::Source("upstream unavailable".to_string()))
    }
}

#[sqlx::test(migrations = "../../migrations")]
async fn mock_pass_adds_three_mentions_and_no_alert(pool: sqlx::PgPool) {
    let (brand, created) = lookup_or_create_brand(&pool, "Acme").await.expect("brand");
    assert!(created);

    let outcome = run_monitor(&pool, &MockMentionSource, &brand)
        .await
        .expect("monitor pass");
    assert_eq!(outcome.mentions_added, 3);
    assert!(outcome.alert.is_none(), "1 negative of 3 must not alert");

    let mentions = list_recent_mentions(&pool, Some(brand.id), None, 50)
        .await
        .expect("mentions");
    assert_eq!(mentions.len(), 3);

    let labels: Vec<&str> = {
        let mut v: Vec<&str> = mentions.iter().map(|m| m.sentiment_label.as_str()).collect();
        v.sort_unstable();
        v
    };
    assert_eq!(labels, ["negative", "neutral", "positive"]);
}

#[sqlx::test(migrations = "../../migrations")]
async fn repeated_passes_append_and_still_never_alert(pool: sqlx::PgPool) {
    let (brand, _) = lookup_or_create_brand(&pool, "Acme").await.expect("brand");

    // Three searches for the same brand: 9 mentions total, 3 negative, but
    // the crisis rule sees each 3-mention batch on its own (ratio 0.33).
    for _ in 0..3 {
        let outcome = run_monitor(&pool, &MockMentionSource, &brand)
            .await
            .expect("monitor pass");
        assert!(outcome.alert.is_none());
    }

    let mentions = list_recent_mentions(&pool, Some(brand.id), None, 50)
        .await
        .expect("mentions");
    assert_eq!(mentions.len(), 9);

    let alerts = list_alerts(&pool, 50).await.expect("alerts");
    assert!(alerts.is_empty());
}

#[sqlx::test(migrations = "../../migrations")]
async fn negative_batch_creates_exactly_one_alert(pool: sqlx::PgPool) {
    let (brand, _) = lookup_or_create_brand(&pool, "Acme").await.expect("brand");

    let outcome = run_monitor(&pool, &AllNegativeSource, &brand)
        .await
        .expect("monitor pass");
    let alert = outcome.alert.expect("alert expected");
    assert_eq!(alert.alert_type, "negative_spike");
    assert_eq!(alert.sentiment_threshold, Some(50.0));
    assert!(!alert.is_sent);

    let alerts = list_alerts(&pool, 50).await.expect("alerts");
    assert_eq!(alerts.len(), 1);
    assert_eq!(
        alerts[0].message,
        "Acme experiencing increased negative sentiment"
    );
}

#[sqlx::test(migrations = "../../migrations")]
async fn failing_source_aborts_without_writes(pool: sqlx::PgPool) {
    let (brand, _) = lookup_or_create_brand(&pool, "Acme").await.expect("brand");

    let err = run_monitor(&pool, &BrokenSource, &brand)
        .await
        .expect_err("source failure must surface");
    assert!(matches!(err, MonitorError::Source(_)));

    let mentions = list_recent_mentions(&pool, Some(brand.id), None, 50)
        .await
        .expect("mentions");
    assert!(mentions.is_empty());
}
