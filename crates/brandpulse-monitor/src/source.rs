//! The mention source capability and the shipped mock implementation.

use brandpulse_core::SentimentLabel;
use rand::Rng;

use crate::types::ScoredMention;
use crate::MonitorError;

/// Capability interface for anything that can produce scored mentions for
/// a brand. The pipeline is generic over this, so swapping the mock for a
/// real social-media + sentiment-model integration is a drop-in change.
#[allow(async_fn_in_trait)]
pub trait MentionSource {
    async fn fetch(&self, brand_name: &str) -> Result<Vec<ScoredMention>, MonitorError>;
}

/// Simulated social-media source: every fetch yields the same three-mention
/// batch (one per label, fixed scores) with a fresh random author handle.
///
/// Fetches are not idempotent; repeated monitoring keeps appending batches.
#[derive(Debug, Clone, Copy, Default)]
pub struct MockMentionSource;

const MOCK_CONFIDENCE: f64 = 0.95;
const MOCK_PLATFORM: &str = "twitter";

impl MentionSource for MockMentionSource {
    async fn fetch(&self, brand_name: &str) -> Result<Vec<ScoredMention>, MonitorError> {
        let templates: [(String, SentimentLabel, f64); 3] = [
            (
                format!("Just got the new {brand_name} product and it's amazing!"),
                SentimentLabel::Positive,
                0.8,
            ),
            (
                format!("{brand_name} customer service is terrible"),
                SentimentLabel::Negative,
                0.2,
            ),
            (
                format!("Saw {brand_name} in the news today"),
                SentimentLabel::Neutral,
                0.5,
            ),
        ];

        Ok(templates
            .into_iter()
            .map(|(text, label, score)| ScoredMention {
                text,
                platform: MOCK_PLATFORM.to_string(),
                author_username: random_handle(),
                url: None,
                label,
                score,
                confidence: MOCK_CONFIDENCE,
            })
            .collect())
    }
}

/// `user_<9 lowercase alphanumerics>`, mimicking a throwaway social handle.
fn random_handle() -> String {
    let suffix: String = rand::rng()
        .sample_iter(rand::distr::Alphanumeric)
        .take(9)
        .map(char::from)
        .collect();
    format!("user_{}", suffix.to_lowercase())
}
