use miette::Diagnostic;
use sqlchain_config::error::ConfigError;
use sqlchain_db::QueryError;
use thiserror::Error;

#[derive(Error, Diagnostic, Debug)]
pub enum CliError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Query(#[from] QueryError),

    #[error("Error while {action}")]
    #[diagnostic(code(sqlchain::io), help("Check file permissions and disk space"))]
    IoError {
        action: String,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON serialization error: {0}")]
    #[diagnostic(code(sqlchain::json))]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, CliError>;
