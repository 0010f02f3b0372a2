//! Shaped result rows.

use rusqlite::types::{FromSql, Value, ValueRef};
use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::error::{QueryError, Result};

/// One fetched row: a value per output column, in select order.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    columns: Vec<String>,
    values: Vec<Value>,
}

impl Row {
    /// Pairs output column names with fetched values.
    ///
    /// Fails with `RowShape` when the widths differ.
    pub fn new(columns: Vec<String>, values: Vec<Value>) -> Result<Self> {
        if columns.len() != values.len() {
            return Err(QueryError::RowShape {
                expected: columns.len(),
                got: values.len(),
            });
        }
        Ok(Self {
            columns,
            values,
        })
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub fn get(&self, column: &str) -> Option<&Value> {
        self.position(column).map(|idx| &self.values[idx])
    }

    /// Reads a column and converts it with [`FromSql`].
    pub fn get_as<T: FromSql>(&self, column: &str) -> Result<T> {
        let idx = self
            .position(column)
            .ok_or_else(|| QueryError::MissingColumn(column.to_string()))?;
        let value = ValueRef::from(&self.values[idx]);

        T::column_result(value).map_err(|err| {
            rusqlite::Error::FromSqlConversionFailure(idx, value.data_type(), Box::new(err)).into()
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.columns
            .iter()
            .map(String::as_str)
            .zip(self.values.iter())
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    fn position(&self, column: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == column)
    }
}

struct SqlValue<'a>(&'a Value);

impl Serialize for SqlValue<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self.0 {
            Value::Null => serializer.serialize_none(),
            Value::Integer(i) => serializer.serialize_i64(*i),
            Value::Real(r) => serializer.serialize_f64(*r),
            Value::Text(s) => serializer.serialize_str(s),
            Value::Blob(b) => serializer.serialize_bytes(b),
        }
    }
}

/// Serializes as a map keyed by column name.
impl Serialize for Row {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (name, value) in self.iter() {
            map.serialize_entry(name, &SqlValue(value))?;
        }
        map.end()
    }
}
