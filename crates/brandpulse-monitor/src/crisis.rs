//! The crisis rule: one threshold comparison over a just-ingested batch.

use brandpulse_core::SentimentLabel;

use crate::types::ScoredMention;

/// A batch whose negative fraction strictly exceeds this triggers an alert.
pub const CRISIS_NEGATIVE_RATIO: f64 = 0.5;

/// Threshold recorded on the alert row, as a percentage.
pub const ALERT_THRESHOLD_PCT: f64 = 50.0;

/// An alert the evaluator wants persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct AlertDraft {
    pub alert_type: &'static str,
    pub message: String,
    pub threshold: f64,
}

/// Evaluate the crisis rule over one mention batch.
///
/// Scoped strictly to the batch at hand, never the brand's full history:
/// `negative / total > 0.5` yields exactly one `negative_spike` draft.
/// The comparison is strict, so a half-negative batch does not alert, and
/// an empty batch never alerts.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn evaluate_batch(brand_name: &str, batch: &[ScoredMention]) -> Option<AlertDraft> {
    if batch.is_empty() {
        return None;
    }

    let negative = batch
        .iter()
        .filter(|m| m.label == SentimentLabel::Negative)
        .count();
    let ratio = negative as f64 / batch.len() as f64;

    if ratio > CRISIS_NEGATIVE_RATIO {
        Some(AlertDraft {
            alert_type: "negative_spike",
            message: format!("{brand_name} experiencing increased negative sentiment"),
            threshold: ALERT_THRESHOLD_PCT,
        })
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn batch_with_negatives(negative: usize, total: usize) -> Vec<ScoredMention> {
        (0..total)
            .map(|i| {
                let (label, score) = if i < negative {
                    (SentimentLabel::Negative, 0.2)
                } else {
                    (SentimentLabel::Positive, 0.8)
                };
                ScoredMention {
                    text: format!("mention {i}"),
                    platform: "twitter".to_string(),
                    author_username: format!("user_{i:09}"),
                    url: None,
                    label,
                    score,
                    confidence: 0.95,
                }
            })
            .collect()
    }

    #[test]
    fn exactly_half_negative_does_not_alert() {
        assert!(evaluate_batch("Acme", &batch_with_negatives(2, 4)).is_none());
    }

    #[test]
    fn just_over_half_negative_alerts_once() {
        let draft = evaluate_batch("Acme", &batch_with_negatives(3, 5)).expect("alert expected");
        assert_eq!(draft.alert_type, "negative_spike");
        assert_eq!(draft.threshold, 50.0);
        assert_eq!(
            draft.message,
            "Acme experiencing increased negative sentiment"
        );
    }

    #[test]
    fn the_mock_batch_never_alerts() {
        // 1 negative of 3 => ratio 0.33
        assert!(evaluate_batch("Acme", &batch_with_negatives(1, 3)).is_none());
    }

    #[test]
    fn all_negative_batch_alerts() {
        assert!(evaluate_batch("Acme", &batch_with_negatives(3, 3)).is_some());
    }

    #[test]
    fn empty_batch_never_alerts() {
        assert!(evaluate_batch("Acme", &[]).is_none());
    }
}
