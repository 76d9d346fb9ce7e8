pub mod app_config;
pub mod brands;
pub mod config;
pub mod report;
pub mod sentiment;

use thiserror::Error;

pub use app_config::{AppConfig, Environment};
pub use brands::{load_brands, BrandSeed, BrandsFile};
pub use config::{load_app_config, load_app_config_from_env};
pub use report::{
    export_filename, period_label, render_report, BrandReport, ExportFormat, ReportError,
};
pub use sentiment::{BrandHealth, SentimentBreakdown, SentimentLabel};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
    #[error("failed to read brands file {path}: {source}")]
    BrandsFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse brands file: {0}")]
    BrandsFileParse(#[from] serde_yaml::Error),
    #[error("invalid brands configuration: {0}")]
    Validation(String),
}

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid sentiment label: {0}")]
    InvalidSentimentLabel(String),
    #[error("invalid alert type: {0}")]
    InvalidAlertType(String),
    #[error("invalid export format: {0}")]
    InvalidExportFormat(String),
}
