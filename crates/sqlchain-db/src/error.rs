//! Error types for sqlchain-db.

use miette::Diagnostic;
use thiserror::Error;

use crate::{
    expr::{ColumnKind, CompareOp},
    query::state::{Clause, ClauseState},
};

/// Error type for statement construction and execution.
#[derive(Error, Diagnostic, Debug)]
pub enum QueryError {
    #[error("Invalid operand for {kind} column `{column}` with `{op}`: {operand}")]
    #[diagnostic(
        code(sqlchain_db::invalid_type),
        help("Integer columns take numbers, Text columns only support = and !=, DateTime columns take YYYY-MM-DD text")
    )]
    InvalidType {
        column: String,
        kind: ColumnKind,
        op: CompareOp,
        operand: String,
    },

    #[error("`{clause}` cannot follow `{state}`")]
    #[diagnostic(
        code(sqlchain_db::invalid_order),
        help("Restart the statement with select, update, insert, delete, create_table or drop_table")
    )]
    InvalidOrder { clause: Clause, state: ClauseState },

    #[error("Unsupported database backend: {0}")]
    #[diagnostic(
        code(sqlchain_db::unsupported_backend),
        help("Only the `sqlite` backend is implemented")
    )]
    UnsupportedBackend(String),

    #[error("Statement expects {expected} parameter(s), got {got}")]
    #[diagnostic(
        code(sqlchain_db::param_count),
        help("Pass exactly one value per `?` placeholder of the built statement")
    )]
    ParamCount { expected: usize, got: usize },

    #[error("Row has {got} value(s) but {expected} output column(s) were selected")]
    #[diagnostic(code(sqlchain_db::row_shape))]
    RowShape { expected: usize, got: usize },

    #[error("Column not found in row: {0}")]
    #[diagnostic(code(sqlchain_db::missing_column))]
    MissingColumn(String),

    #[error("Table already registered: {0}")]
    #[diagnostic(
        code(sqlchain_db::duplicate_table),
        help("Each table in a schema must have a unique name")
    )]
    DuplicateTable(String),

    #[error("Database error: {0}")]
    #[diagnostic(
        code(sqlchain_db::driver),
        help("Check that the database file exists and the schema has been created")
    )]
    Driver(#[from] rusqlite::Error),
}

/// Result type alias for sqlchain-db operations.
pub type Result<T> = std::result::Result<T, QueryError>;
