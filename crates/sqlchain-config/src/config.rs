use std::{
    fs,
    path::{Path, PathBuf},
    sync::{LazyLock, PoisonError, RwLock},
};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::{
    error::{ConfigError, Result},
    utils::{is_date_shaped, resolve_path, xdg_config_home, xdg_data_home},
};

/// How `IN`, `NOT IN` and `VALUES` literals reach the database.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LiteralSets {
    /// Written into the statement text, unescaped.
    #[default]
    Inline,
    /// Bound as `?` parameters.
    Bind,
}

/// Application's configuration
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Config {
    /// Database backend.
    /// Default: sqlite
    pub backend: Option<String>,

    /// Path to the database file.
    /// Default: $XDG_DATA_HOME/sqlchain/sample.db
    pub database: Option<String>,

    /// Literal handling for sets and inserted values: "inline" or "bind".
    /// Default: inline
    pub literal_sets: Option<LiteralSets>,

    /// Cutoff date used by the users demo, as YYYY-MM-DD.
    pub since: Option<String>,
}

pub static CONFIG: LazyLock<RwLock<Option<Config>>> = LazyLock::new(|| RwLock::new(None));

pub static CONFIG_PATH: LazyLock<RwLock<PathBuf>> = LazyLock::new(|| {
    RwLock::new(match std::env::var("SQLCHAIN_CONFIG") {
        Ok(path_str) => PathBuf::from(path_str),
        Err(_) => xdg_config_home().join("sqlchain").join("config.toml"),
    })
});

pub const DEFAULT_BACKEND: &str = "sqlite";

pub fn config_path() -> PathBuf {
    CONFIG_PATH
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .clone()
}

/// Points subsequent loads and saves at `path`.
pub fn set_config_path<P: AsRef<Path>>(path: P) -> Result<()> {
    let resolved = resolve_path(&path.as_ref().to_string_lossy())?;
    *CONFIG_PATH.write().unwrap_or_else(PoisonError::into_inner) = resolved;
    Ok(())
}

/// Loads the configuration file into the process-wide [`CONFIG`].
pub fn init() -> Result<()> {
    let config = Config::new()?;
    *CONFIG.write().unwrap_or_else(PoisonError::into_inner) = Some(config);
    Ok(())
}

/// Returns the loaded configuration, falling back to defaults when
/// [`init`] has not run.
pub fn get_config() -> Config {
    CONFIG
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .get_or_insert_with(Config::default_config)
        .clone()
}

impl Default for Config {
    fn default() -> Self {
        Self::default_config()
    }
}

impl Config {
    pub fn default_config() -> Self {
        Self {
            backend: Some(DEFAULT_BACKEND.to_string()),
            database: Some(format!("{}/sqlchain/sample.db", xdg_data_home().display())),
            literal_sets: Some(LiteralSets::Inline),
            since: None,
        }
    }

    /// Loads the configuration from [`CONFIG_PATH`].
    /// If the configuration file is not found, it uses the default configuration.
    pub fn new() -> Result<Self> {
        Self::load(config_path())
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let mut config = match fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("{} not found, using defaults", path.display());
                Self::default_config()
            }
            Err(err) => return Err(ConfigError::IoError(err)),
        };

        config.resolve()?;
        Ok(config)
    }

    /// Fills unset fields with defaults and validates the rest.
    pub fn resolve(&mut self) -> Result<()> {
        let defaults = Self::default_config();

        match self.backend.as_deref().map(str::trim) {
            Some("") => return Err(ConfigError::EmptyBackend),
            Some(_) => {}
            None => self.backend = defaults.backend,
        }

        if let Some(since) = &self.since {
            if !is_date_shaped(since) {
                return Err(ConfigError::InvalidSince(since.clone()));
            }
        }

        if self.database.is_none() {
            self.database = defaults.database;
        }
        self.literal_sets.get_or_insert(LiteralSets::Inline);

        Ok(())
    }

    pub fn backend(&self) -> &str {
        self.backend.as_deref().unwrap_or(DEFAULT_BACKEND)
    }

    pub fn literal_sets(&self) -> LiteralSets {
        self.literal_sets.unwrap_or_default()
    }

    /// Database path; `$SQLCHAIN_DB` takes precedence over the file.
    pub fn get_db_path(&self) -> Result<PathBuf> {
        if let Ok(env_path) = std::env::var("SQLCHAIN_DB") {
            return resolve_path(&env_path);
        }
        match &self.database {
            Some(database) => resolve_path(database),
            None => resolve_path(&Self::default_config().database.unwrap_or_default()),
        }
    }

    pub fn save(&self) -> Result<()> {
        let config_path = config_path();
        let serialized = toml::to_string_pretty(self)?;
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&config_path, serialized)?;
        info!("Configuration saved to {}", config_path.display());
        Ok(())
    }
}

/// Writes the default configuration to [`CONFIG_PATH`], refusing to replace
/// an existing file.
pub fn generate_default_config() -> Result<PathBuf> {
    let config_path = config_path();

    if config_path.exists() {
        return Err(ConfigError::ConfigAlreadyExists(
            config_path.display().to_string(),
        ));
    }

    Config::default_config().save()?;
    Ok(config_path)
}
