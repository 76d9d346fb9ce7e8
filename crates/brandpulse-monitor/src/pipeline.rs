//! Ties a mention source, persistence, and the crisis rule together for a
//! single monitoring pass over one brand.

use brandpulse_db::{AlertRow, BrandRow, NewMention};
use sqlx::PgPool;

use crate::crisis;
use crate::source::MentionSource;
use crate::MonitorError;

/// What one monitoring pass produced.
#[derive(Debug)]
pub struct MonitorOutcome {
    pub mentions_added: usize,
    /// The alert created by the crisis rule, if the batch tripped it.
    pub alert: Option<AlertRow>,
}

/// Run one monitoring pass: fetch a batch for the brand, append every
/// mention, then evaluate the crisis rule over that batch only.
///
/// Each call appends a fresh batch; there is no deduplication. A write
/// failure aborts the pass — no retries, no partial-failure recovery beyond
/// surfacing the error.
///
/// # Errors
///
/// Returns [`MonitorError::Source`] if the source fails, or
/// [`MonitorError::Db`] if persisting a mention or the alert fails.
pub async fn run_monitor<S: MentionSource>(
    pool: &PgPool,
    source: &S,
    brand: &BrandRow,
) -> Result<MonitorOutcome, MonitorError> {
    let batch = source.fetch(&brand.name).await?;

    for m in &batch {
        let row = NewMention {
            mention_text: &m.text,
            platform: &m.platform,
            author_username: Some(&m.author_username),
            url: m.url.as_deref(),
            sentiment_label: m.label,
            sentiment_score: m.score,
            confidence: m.confidence,
        };
        brandpulse_db::insert_mention(pool, brand.id, &row).await?;
    }
    tracing::info!(
        brand = %brand.name,
        mentions = batch.len(),
        "ingested mention batch"
    );

    let alert = match crisis::evaluate_batch(&brand.name, &batch) {
        Some(draft) => {
            tracing::warn!(brand = %brand.name, "negative sentiment spike detected");
            let row = brandpulse_db::insert_alert(
                pool,
                brand.id,
                draft.alert_type,
                &draft.message,
                Some(draft.threshold),
            )
            .await?;
            Some(row)
        }
        None => None,
    };

    Ok(MonitorOutcome {
        mentions_added: batch.len(),
        alert,
    })
}
