//! Core traits that power the query builder.
//!
//! These traits define the contract for:
//! - Rendering conditions into a statement (`Expression`)
//! - Converting fetched rows into Rust types (`FromRow`)

use crate::{error::Result, query::context::BuildContext, row::Row};

/// A value that renders into a SQL fragment.
///
/// `to_sql` returns the fragment text, using `?` placeholders, and pushes the
/// values for those placeholders onto the context in the same order.
///
/// # Example
///
/// ```rust
/// use sqlchain_db::{expr::{Column, ColumnKind}, BuildContext, Expression};
///
/// let login = Column::new("users", "login", ColumnKind::Text);
/// let cond = login.eq("Greg").unwrap();
///
/// let mut ctx = BuildContext::default();
/// assert_eq!(cond.to_sql(&mut ctx), "users.login = ?");
/// assert_eq!(ctx.params().len(), 1);
/// ```
pub trait Expression {
    fn to_sql(&self, ctx: &mut BuildContext) -> String;
}

/// A trait for types that can be constructed from a fetched [`Row`].
///
/// # Example
///
/// ```rust
/// use sqlchain_db::{FromRow, Row};
///
/// struct User {
///     id: i64,
///     login: String,
/// }
///
/// impl FromRow for User {
///     fn from_row(row: &Row) -> sqlchain_db::Result<Self> {
///         Ok(User {
///             id: row.get_as("id")?,
///             login: row.get_as("login")?,
///         })
///     }
/// }
/// ```
pub trait FromRow: Sized {
    fn from_row(row: &Row) -> Result<Self>;
}
