//! Table descriptors and the schema registry.
//!
//! Tables are normally declared with [`crate::define_table!`], which binds
//! every column to its table name and field name once, at compile time.
//! A [`Schema`] groups tables for whole-schema operations.

use tracing::trace;

use crate::{
    error::{QueryError, Result},
    expr::Column,
};

/// Whether `name` is a valid registered table name: non-empty, with no
/// uppercase ASCII letters.
pub const fn is_lowercase_name(name: &str) -> bool {
    let bytes = name.as_bytes();
    if bytes.is_empty() {
        return false;
    }
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i].is_ascii_uppercase() {
            return false;
        }
        i += 1;
    }
    true
}

/// A named, ordered collection of columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Table {
    name: &'static str,
    columns: &'static [Column],
}

impl Table {
    pub const fn new(name: &'static str, columns: &'static [Column]) -> Self {
        Self {
            name,
            columns,
        }
    }

    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Every column of the table, in declaration order.
    pub const fn all(&self) -> &'static [Column] {
        self.columns
    }

    pub fn column(&self, name: &str) -> Option<&'static Column> {
        self.columns.iter().find(|c| c.name() == name)
    }
}

/// An ordered set of uniquely named tables.
#[derive(Debug, Clone, Default)]
pub struct Schema {
    tables: Vec<Table>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a table, rejecting a second table with the same name.
    pub fn register(&mut self, table: Table) -> Result<&mut Self> {
        if self.table(table.name()).is_some() {
            return Err(QueryError::DuplicateTable(table.name().to_string()));
        }
        trace!("registered table {}", table.name());
        self.tables.push(table);
        Ok(self)
    }

    pub fn table(&self, name: &str) -> Option<&Table> {
        self.tables.iter().find(|t| t.name() == name)
    }

    /// Tables in registration order.
    pub fn tables(&self) -> impl Iterator<Item = &Table> {
        self.tables.iter()
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::ColumnKind;

    const COLUMNS: &[Column] = &[
        Column::new("managers", "id", ColumnKind::Integer),
        Column::new("managers", "photo", ColumnKind::Text),
    ];
    const MANAGERS: Table = Table::new("managers", COLUMNS);

    #[test]
    fn test_lowercase_names() {
        assert!(is_lowercase_name("users"));
        assert!(is_lowercase_name("manager_photos"));
        assert!(!is_lowercase_name("Users"));
        assert!(!is_lowercase_name("managerPhotos"));
        assert!(!is_lowercase_name(""));
    }

    #[test]
    fn test_table_lookup() {
        assert_eq!(MANAGERS.name(), "managers");
        assert_eq!(MANAGERS.all().len(), 2);
        assert_eq!(MANAGERS.column("photo").map(|c| c.kind()), Some(ColumnKind::Text));
        assert!(MANAGERS.column("missing").is_none());
    }

    #[test]
    fn test_schema_rejects_duplicates() {
        let mut schema = Schema::new();
        schema.register(MANAGERS).unwrap();
        assert!(matches!(
            schema.register(MANAGERS),
            Err(QueryError::DuplicateTable(name)) if name == "managers"
        ));
        assert_eq!(schema.len(), 1);
        assert!(schema.table("managers").is_some());
    }
}
