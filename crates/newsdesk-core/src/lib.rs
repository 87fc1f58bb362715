pub mod app_config;
pub mod article;
pub mod attribution;
pub mod config;
pub mod scoring;

use thiserror::Error;

pub use app_config::{AppConfig, Environment};
pub use article::{AggregateReport, NormalizedArticle, ReporterAggregate};
pub use attribution::{load_attribution, AttributionConfig};
pub use config::{load_app_config, load_app_config_from_env};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required env var: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for env var {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read attribution rules file {path}: {source}")]
    RulesFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse attribution rules file: {0}")]
    RulesFileParse(#[from] serde_yaml::Error),

    #[error("configuration validation failed: {0}")]
    Validation(String),
}
