use brandpulse_core::SentimentLabel;

/// One mention as produced by a [`crate::MentionSource`], already carrying
/// its sentiment label and score.
#[derive(Debug, Clone)]
pub struct ScoredMention {
    pub text: String,
    pub platform: String,
    pub author_username: String,
    pub url: Option<String>,
    pub label: SentimentLabel,
    /// Sentiment score in [0, 1].
    pub score: f64,
    /// Classifier confidence in [0, 1].
    pub confidence: f64,
}
