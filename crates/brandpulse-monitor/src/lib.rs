//! Monitoring pipeline: pull a batch of scored mentions for a brand from a
//! [`MentionSource`], persist them, and run the crisis rule over the batch.
//!
//! The shipped source is [`MockMentionSource`], a stand-in that synthesizes
//! a fixed three-mention batch; a real social-media integration slots in by
//! implementing [`MentionSource`] without touching the crisis rule or the
//! aggregation layer.

pub mod crisis;
pub mod pipeline;
pub mod source;
pub mod types;

use thiserror::Error;

pub use crisis::{evaluate_batch, AlertDraft, ALERT_THRESHOLD_PCT, CRISIS_NEGATIVE_RATIO};
pub use pipeline::{run_monitor, MonitorOutcome};
pub use source::{MentionSource, MockMentionSource};
pub use types::ScoredMention;

#[derive(Debug, Error)]
pub enum MonitorError {
    #[error("mention source failed: {0}")]
    Source(String),
    #[error(transparent)]
    Db(#[from] brandpulse_db::DbError),
}
