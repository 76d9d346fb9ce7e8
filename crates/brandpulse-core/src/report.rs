//! Report rows and the two export renditions (flat CSV, structured JSON).

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::CoreError;

/// One brand's aggregate over the selected reporting window.
///
/// Field names serialize in camelCase so the JSON export stays readable to
/// the dashboard tooling that consumes it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrandReport {
    pub brand: String,
    pub total_mentions: i64,
    pub positive_mentions: i64,
    pub negative_mentions: i64,
    pub neutral_mentions: i64,
    pub avg_sentiment: f64,
    pub period: String,
}

/// Fixed CSV header; column order matches [`BrandReport`] field order.
pub const CSV_HEADERS: [&str; 7] = [
    "Brand",
    "Total Mentions",
    "Positive",
    "Negative",
    "Neutral",
    "Avg Sentiment",
    "Period",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Json,
}

impl ExportFormat {
    #[must_use]
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        }
    }

    #[must_use]
    pub fn content_type(self) -> &'static str {
        match self {
            ExportFormat::Csv => "text/csv",
            ExportFormat::Json => "application/json",
        }
    }
}

impl std::str::FromStr for ExportFormat {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "csv" => Ok(ExportFormat::Csv),
            "json" => Ok(ExportFormat::Json),
            other => Err(CoreError::InvalidExportFormat(other.to_string())),
        }
    }
}

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("no data to export")]
    Empty,
    #[error("failed to serialize report: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Human label for a reporting window, e.g. `"7 days"`.
#[must_use]
pub fn period_label(days: u32) -> String {
    format!("{days} days")
}

/// Download filename for an export artifact:
/// `sentiment-report-<period>days-<YYYY-MM-DD>.<ext>`.
#[must_use]
pub fn export_filename(period_days: u32, date: NaiveDate, format: ExportFormat) -> String {
    format!(
        "sentiment-report-{period_days}days-{date}.{ext}",
        ext = format.extension()
    )
}

/// Render a report set into the chosen export format.
///
/// # Errors
///
/// Returns [`ReportError::Empty`] for an empty report set — the exporter
/// refuses to produce a file with only a header — or
/// [`ReportError::Serialize`] if JSON encoding fails.
pub fn render_report(reports: &[BrandReport], format: ExportFormat) -> Result<String, ReportError> {
    if reports.is_empty() {
        return Err(ReportError::Empty);
    }
    match format {
        ExportFormat::Csv => Ok(render_csv(reports)),
        ExportFormat::Json => Ok(serde_json::to_string_pretty(reports)?),
    }
}

/// Fields are joined with bare commas and never quoted or escaped; a brand
/// name containing a comma shifts the columns after it. Consumers of the
/// export treat brand names as comma-free.
fn render_csv(reports: &[BrandReport]) -> String {
    let mut lines = Vec::with_capacity(reports.len() + 1);
    lines.push(CSV_HEADERS.join(","));
    for r in reports {
        lines.push(format!(
            "{},{},{},{},{},{:.2},{}",
            r.brand,
            r.total_mentions,
            r.positive_mentions,
            r.negative_mentions,
            r.neutral_mentions,
            r.avg_sentiment,
            r.period
        ));
    }
    lines.join("\n")
}
