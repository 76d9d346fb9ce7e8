//! Sentiment labels, windowed aggregation math, and the display-health
//! classification used by the dashboard brand cards.

use serde::{Deserialize, Serialize};

use crate::CoreError;

/// Classification assigned to a single mention. Exactly three values exist,
/// mirrored by a CHECK constraint on `brand_mentions.sentiment_label`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SentimentLabel {
    Positive,
    Neutral,
    Negative,
}

impl SentimentLabel {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            SentimentLabel::Positive => "positive",
            SentimentLabel::Neutral => "neutral",
            SentimentLabel::Negative => "negative",
        }
    }
}

impl std::fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SentimentLabel {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "positive" => Ok(SentimentLabel::Positive),
            "neutral" => Ok(SentimentLabel::Neutral),
            "negative" => Ok(SentimentLabel::Negative),
            other => Err(CoreError::InvalidSentimentLabel(other.to_string())),
        }
    }
}

/// Per-label counts and average score for a set of mentions.
///
/// Derived on demand from `brand_mentions`; never persisted as
/// authoritative state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SentimentBreakdown {
    pub total: i64,
    pub positive: i64,
    pub negative: i64,
    pub neutral: i64,
    pub avg_score: f64,
}

impl SentimentBreakdown {
    /// Aggregate a batch of labeled scores.
    #[must_use]
    pub fn from_labeled_scores(items: &[(SentimentLabel, f64)]) -> Self {
        let mut breakdown = SentimentBreakdown {
            total: 0,
            positive: 0,
            negative: 0,
            neutral: 0,
            avg_score: 0.0,
        };
        let mut score_sum = 0.0;
        for &(label, score) in items {
            breakdown.total += 1;
            match label {
                SentimentLabel::Positive => breakdown.positive += 1,
                SentimentLabel::Neutral => breakdown.neutral += 1,
                SentimentLabel::Negative => breakdown.negative += 1,
            }
            score_sum += score;
        }
        if breakdown.total > 0 {
            #[allow(clippy::cast_precision_loss)]
            {
                breakdown.avg_score = score_sum / breakdown.total as f64;
            }
        }
        breakdown
    }

    #[must_use]
    pub fn positive_pct(&self) -> f64 {
        pct(self.positive, self.total)
    }

    #[must_use]
    pub fn negative_pct(&self) -> f64 {
        pct(self.negative, self.total)
    }

    #[must_use]
    pub fn neutral_pct(&self) -> f64 {
        pct(self.neutral, self.total)
    }

    /// Display badge for the brand cards, driven by the positive ratio.
    #[must_use]
    pub fn health(&self) -> BrandHealth {
        BrandHealth::from_counts(self.positive, self.total)
    }
}

/// `count / total * 100`, or 0 when the window is empty.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn pct(count: i64, total: i64) -> f64 {
    if total > 0 {
        count as f64 / total as f64 * 100.0
    } else {
        0.0
    }
}

/// Dashboard badge derived from the positive-mention ratio.
///
/// Purely a display label; carries no side effects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BrandHealth {
    Positive,
    Negative,
    Mixed,
}

impl BrandHealth {
    /// Positive ratio > 60% reads favorable, < 40% unfavorable,
    /// everything else (including an empty window) mixed.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn from_counts(positive: i64, total: i64) -> Self {
        if total == 0 {
            return BrandHealth::Mixed;
        }
        let ratio = positive as f64 / total as f64;
        if ratio > 0.6 {
            BrandHealth::Positive
        } else if ratio < 0.4 {
            BrandHealth::Negative
        } else {
            BrandHealth::Mixed
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            BrandHealth::Positive => "positive",
            BrandHealth::Negative => "negative",
            BrandHealth::Mixed => "mixed",
        }
    }
}

impl std::fmt::Display for BrandHealth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
