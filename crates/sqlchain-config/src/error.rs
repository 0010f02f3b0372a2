use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Diagnostic, Debug)]
pub enum ConfigError {
    #[error("TOML serialization error: {0}")]
    #[diagnostic(
        code(sqlchain_config::toml_serialize),
        help("Check your configuration structure for invalid values")
    )]
    TomlSerError(#[from] toml::ser::Error),

    #[error("TOML deserialization error: {0}")]
    #[diagnostic(
        code(sqlchain_config::toml_deserialize),
        help("Check your config.toml syntax and structure")
    )]
    TomlDeError(#[from] toml::de::Error),

    #[error("Configuration file already exists: {0}")]
    #[diagnostic(
        code(sqlchain_config::already_exists),
        help("Remove the existing config file or pass a different path with --config")
    )]
    ConfigAlreadyExists(String),

    #[error("Backend must not be empty")]
    #[diagnostic(
        code(sqlchain_config::empty_backend),
        help("Set `backend = \"sqlite\"` or remove the key to use the default")
    )]
    EmptyBackend,

    #[error("Invalid `since` date: {0}")]
    #[diagnostic(
        code(sqlchain_config::invalid_since),
        help("Use the YYYY-MM-DD form, e.g. 2012-01-01")
    )]
    InvalidSince(String),

    #[error("Path is empty")]
    #[diagnostic(code(sqlchain_config::empty_path))]
    EmptyPath,

    #[error("Environment variable `{var}` not set in `{input}`")]
    #[diagnostic(
        code(sqlchain_config::missing_env_var),
        help("Export the variable or use an absolute path")
    )]
    MissingEnvVar { var: String, input: String },

    #[error("Unclosed variable expression starting at `{0}`")]
    #[diagnostic(code(sqlchain_config::unclosed_variable))]
    UnclosedVariable(String),

    #[error("IO error: {0}")]
    #[diagnostic(code(sqlchain_config::io))]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ConfigError>;
