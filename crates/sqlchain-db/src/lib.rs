pub mod driver;
pub mod error;
pub mod expr;
pub mod macros;
pub mod query;
pub mod row;
pub mod schema;
pub mod traits;

#[cfg(test)]
mod test_utils;

pub use driver::{Backend, Db, Driver, Session, SqliteDriver};
pub use error::{QueryError, Result};
pub use expr::{Column, ColumnKind, CompareOp, Condition, Literal, Operand};
pub use query::*;
pub use row::Row;
pub use schema::{Schema, Table};
pub use traits::{Expression, FromRow};
