//! Database drivers.
//!
//! A [`Driver`] opens a [`Session`] per dispatched statement. The session is
//! driven in a fixed order: execute, then commit if requested, then fetch if
//! requested. Dropping the session closes the connection on every exit path,
//! rolling back whatever was not committed.

pub mod sqlite;

use std::{fmt, path::Path, str::FromStr};

use rusqlite::types::Value;
use tracing::{debug, trace};

use crate::{
    error::{QueryError, Result},
    row::Row,
};

pub use sqlite::SqliteDriver;

/// An open connection with a transaction in progress.
pub trait Session {
    /// Runs one statement with its bound parameters.
    fn execute(&mut self, sql: &str, params: &[Value]) -> Result<()>;

    fn commit(&mut self) -> Result<()>;

    /// Returns the rows produced by the last `execute`, shaped by the output
    /// column names.
    fn fetch(&mut self, columns: &[String]) -> Result<Vec<Row>>;
}

pub trait Driver {
    fn connect(&self) -> Result<Box<dyn Session + '_>>;
}

/// Supported database backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    Sqlite,
    MySql,
}

impl FromStr for Backend {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "sqlite" => Ok(Backend::Sqlite),
            "mysql" => Ok(Backend::MySql),
            _ => Err(QueryError::UnsupportedBackend(s.to_string())),
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Backend::Sqlite => f.write_str("sqlite"),
            Backend::MySql => f.write_str("mysql"),
        }
    }
}

/// Handle used by [`crate::SqlBuilder`] to dispatch statements.
pub struct Db {
    driver: Box<dyn Driver>,
}

impl Db {
    /// Creates a handle for `backend`. Only SQLite is implemented.
    pub fn new<P: AsRef<Path>>(backend: Backend, path: P) -> Result<Self> {
        match backend {
            Backend::Sqlite => Ok(Self::sqlite(path)),
            Backend::MySql => Err(QueryError::UnsupportedBackend(backend.to_string())),
        }
    }

    pub fn sqlite<P: AsRef<Path>>(path: P) -> Self {
        Self::with_driver(SqliteDriver::new(path))
    }

    pub fn with_driver<D: Driver + 'static>(driver: D) -> Self {
        Self {
            driver: Box::new(driver),
        }
    }

    /// Dispatches one statement.
    ///
    /// Returns the shaped rows when `columns` is given, otherwise an empty
    /// list.
    pub fn run(
        &self,
        sql: &str,
        params: &[Value],
        commit: bool,
        columns: Option<&[String]>,
    ) -> Result<Vec<Row>> {
        debug!("Sql = {}, params = {:?}", sql, params);

        let mut session = self.driver.connect()?;
        session.execute(sql, params)?;
        if commit {
            session.commit()?;
        }
        let rows = match columns {
            Some(columns) => session.fetch(columns)?,
            None => Vec::new(),
        };
        trace!("fetched {} row(s)", rows.len());
        Ok(rows)
    }
}
