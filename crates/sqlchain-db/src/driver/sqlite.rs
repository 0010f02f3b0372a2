//! SQLite driver backed by `rusqlite`.

use std::path::{Path, PathBuf};

use rusqlite::{types::Value, Connection, ToSql};
use tracing::{trace, warn};

use crate::{
    driver::{Driver, Session},
    error::Result,
    row::Row,
};

/// Opens the database file anew for every session.
#[derive(Debug, Clone)]
pub struct SqliteDriver {
    path: PathBuf,
}

impl SqliteDriver {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Driver for SqliteDriver {
    fn connect(&self) -> Result<Box<dyn Session + '_>> {
        trace!("opening {}", self.path.display());
        let conn = Connection::open(&self.path)?;
        conn.execute_batch("BEGIN")?;
        Ok(Box::new(SqliteSession {
            conn,
            rows: Vec::new(),
            dirty: false,
        }))
    }
}

/// A connection with an open transaction.
///
/// Result rows are buffered by `execute`; `fetch` only shapes them.
pub struct SqliteSession {
    conn: Connection,
    rows: Vec<Vec<Value>>,
    dirty: bool,
}

impl Session for SqliteSession {
    fn execute(&mut self, sql: &str, params: &[Value]) -> Result<()> {
        let mut stmt = self.conn.prepare(sql)?;
        let params_ref: Vec<&dyn ToSql> = params.iter().map(|v| v as &dyn ToSql).collect();

        let width = stmt.column_count();
        self.rows.clear();

        if width == 0 {
            stmt.execute(params_ref.as_slice())?;
            self.dirty = true;
            return Ok(());
        }

        let mut rows = stmt.query(params_ref.as_slice())?;
        while let Some(row) = rows.next()? {
            let values = (0..width)
                .map(|idx| row.get::<_, Value>(idx))
                .collect::<rusqlite::Result<Vec<_>>>()?;
            self.rows.push(values);
        }
        Ok(())
    }

    fn commit(&mut self) -> Result<()> {
        self.conn.execute_batch("COMMIT")?;
        self.dirty = false;
        Ok(())
    }

    fn fetch(&mut self, columns: &[String]) -> Result<Vec<Row>> {
        std::mem::take(&mut self.rows)
            .into_iter()
            .map(|values| Row::new(columns.to_vec(), values))
            .collect()
    }
}

impl Drop for SqliteSession {
    fn drop(&mut self) {
        if !self.conn.is_autocommit() {
            if self.dirty {
                warn!("rolling back uncommitted changes");
            }
            if let Err(err) = self.conn.execute_batch("ROLLBACK") {
                warn!("rollback failed: {}", err);
            }
        }
        trace!("closing session");
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    fn driver() -> (TempDir, SqliteDriver) {
        let dir = tempfile::tempdir().unwrap();
        let driver = SqliteDriver::new(dir.path().join("test.db"));
        (dir, driver)
    }

    fn count(driver: &SqliteDriver) -> i64 {
        let mut session = driver.connect().unwrap();
        session.execute("SELECT COUNT(*) FROM t", &[]).unwrap();
        let rows = session.fetch(&["n".into()]).unwrap();
        rows[0].get_as("n").unwrap()
    }

    #[test]
    fn test_commit_persists() {
        let (_dir, driver) = driver();
        {
            let mut session = driver.connect().unwrap();
            session.execute("CREATE TABLE t (id INT)", &[]).unwrap();
            session
                .execute("INSERT INTO t VALUES (?)", &[Value::Integer(7)])
                .unwrap();
            session.commit().unwrap();
        }
        assert_eq!(count(&driver), 1);
    }

    #[test]
    fn test_drop_rolls_back() {
        let (_dir, driver) = driver();
        {
            let mut session = driver.connect().unwrap();
            session.execute("CREATE TABLE t (id INT)", &[]).unwrap();
            session.commit().unwrap();
        }
        {
            let mut session = driver.connect().unwrap();
            session.execute("INSERT INTO t VALUES (1)", &[]).unwrap();
        }
        assert_eq!(count(&driver), 0);
    }

    #[test]
    fn test_fetch_shapes_rows() {
        let (_dir, driver) = driver();
        let mut session = driver.connect().unwrap();
        session
            .execute("SELECT 1 AS a, 'x' AS b", &[])
            .unwrap();

        let rows = session.fetch(&["id".into(), "login".into()]).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].get("login"), Some(&Value::Text("x".into())));

        session.execute("SELECT 1, 2", &[]).unwrap();
        assert!(session.fetch(&["id".into()]).is_err());
    }
}
