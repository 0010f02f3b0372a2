//! Represents a typed database column.
//!
//! A [`Column`] is bound to its owning table and its own name at registration
//! time (see [`crate::define_table!`]) and never changes afterwards. Its
//! [`ColumnKind`] selects the operand rules and the SQL type used in
//! `CREATE TABLE`.

use std::fmt;

use rusqlite::types::Value;

use crate::{
    error::{QueryError, Result},
    expr::ops::{CompareOp, Condition, Literal, Operand},
};

/// The declared type of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnKind {
    Integer,
    Text,
    DateTime,
}

/// Per-kind rules: the SQL type name, the operators the kind supports and
/// the check applied to literal operands.
struct KindRules {
    sql_type: &'static str,
    ops: &'static [CompareOp],
    accepts: fn(&Value) -> bool,
}

const ALL_OPS: &[CompareOp] = &[
    CompareOp::Lt,
    CompareOp::Le,
    CompareOp::Gt,
    CompareOp::Ge,
    CompareOp::Eq,
    CompareOp::Ne,
    CompareOp::In,
    CompareOp::NotIn,
];

static RULES: [KindRules; 3] = [
    KindRules {
        sql_type: "INT",
        ops: ALL_OPS,
        accepts: is_numeric,
    },
    KindRules {
        sql_type: "TEXT",
        ops: &[CompareOp::Eq, CompareOp::Ne, CompareOp::In, CompareOp::NotIn],
        accepts: is_text,
    },
    KindRules {
        sql_type: "DATETIME",
        ops: ALL_OPS,
        accepts: is_date_shaped,
    },
];

/// Integers and finite reals. `NaN` and infinities have no SQL literal form.
fn is_numeric(value: &Value) -> bool {
    match value {
        Value::Integer(_) => true,
        Value::Real(r) => r.is_finite(),
        _ => false,
    }
}

fn is_text(value: &Value) -> bool {
    matches!(value, Value::Text(_))
}

/// Accepts text made of exactly three dash-separated parts, e.g. `2012-01-01`.
fn is_date_shaped(value: &Value) -> bool {
    match value {
        Value::Text(s) => s.split('-').count() == 3,
        _ => false,
    }
}

impl ColumnKind {
    fn rules(self) -> &'static KindRules {
        match self {
            ColumnKind::Integer => &RULES[0],
            ColumnKind::Text => &RULES[1],
            ColumnKind::DateTime => &RULES[2],
        }
    }

    /// SQL type used in `CREATE TABLE`.
    pub fn sql_type(self) -> &'static str {
        self.rules().sql_type
    }

    /// Whether the operator is legal on this kind, regardless of operand.
    pub fn supports(self, op: CompareOp) -> bool {
        self.rules().ops.contains(&op)
    }

    /// Whether a literal operand is acceptable for this kind.
    pub fn accepts(self, value: &Value) -> bool {
        (self.rules().accepts)(value)
    }
}

impl fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.sql_type())
    }
}

/// A column reference bound to its table.
///
/// # Example
///
/// ```rust
/// use sqlchain_db::expr::{Column, ColumnKind};
///
/// const LOGIN: Column = Column::new("users", "login", ColumnKind::Text);
/// assert_eq!(LOGIN.qualified_name(), "users.login");
/// assert!(LOGIN.lt("a").is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Column {
    table: &'static str,
    name: &'static str,
    kind: ColumnKind,
}

impl Column {
    pub const fn new(table: &'static str, name: &'static str, kind: ColumnKind) -> Self {
        Self {
            table,
            name,
            kind,
        }
    }

    pub const fn table_name(&self) -> &'static str {
        self.table
    }

    pub const fn name(&self) -> &'static str {
        self.name
    }

    pub const fn kind(&self) -> ColumnKind {
        self.kind
    }

    /// `table.column`, as rendered everywhere except assignment targets.
    pub fn qualified_name(&self) -> String {
        format!("{}.{}", self.table, self.name)
    }

    /// Column definition for `CREATE TABLE`, e.g. `login TEXT`.
    pub fn definition(&self) -> String {
        format!("{} {}", self.name, self.kind.sql_type())
    }

    /// Creates a `<` condition.
    pub fn lt(&self, right: impl Into<Operand>) -> Result<Condition> {
        self.compare(CompareOp::Lt, right.into())
    }

    /// Creates a `<=` condition.
    pub fn le(&self, right: impl Into<Operand>) -> Result<Condition> {
        self.compare(CompareOp::Le, right.into())
    }

    /// Creates a `>` condition.
    pub fn gt(&self, right: impl Into<Operand>) -> Result<Condition> {
        self.compare(CompareOp::Gt, right.into())
    }

    /// Creates a `>=` condition.
    pub fn ge(&self, right: impl Into<Operand>) -> Result<Condition> {
        self.compare(CompareOp::Ge, right.into())
    }

    /// Creates a `=` condition. Inside `update(..).set(..)` it renders as an
    /// assignment with the bare column name.
    pub fn eq(&self, right: impl Into<Operand>) -> Result<Condition> {
        self.compare(CompareOp::Eq, right.into())
    }

    /// Creates a `!=` condition.
    pub fn ne(&self, right: impl Into<Operand>) -> Result<Condition> {
        self.compare(CompareOp::Ne, right.into())
    }

    /// Creates an `IN (...)` condition over a literal set.
    pub fn in_<T, I>(&self, values: I) -> Result<Condition>
    where
        T: Into<Literal>,
        I: IntoIterator<Item = T>,
    {
        self.membership(CompareOp::In, values)
    }

    /// Creates a `NOT IN (...)` condition over a literal set.
    pub fn not_in<T, I>(&self, values: I) -> Result<Condition>
    where
        T: Into<Literal>,
        I: IntoIterator<Item = T>,
    {
        self.membership(CompareOp::NotIn, values)
    }

    fn compare(&self, op: CompareOp, right: Operand) -> Result<Condition> {
        if !self.kind.supports(op) {
            return Err(self.invalid(op, right.describe()));
        }
        if let Operand::Literal(ref literal) = right {
            if !self.kind.accepts(literal.value()) {
                return Err(self.invalid(op, right.describe()));
            }
        }
        Ok(Condition::new(*self, op, right))
    }

    fn membership<T, I>(&self, op: CompareOp, values: I) -> Result<Condition>
    where
        T: Into<Literal>,
        I: IntoIterator<Item = T>,
    {
        let values: Vec<Literal> = values.into_iter().map(Into::into).collect();
        if let Some(bad) = values.iter().find(|v| !self.kind.accepts(v.value())) {
            return Err(self.invalid(op, bad.to_string()));
        }
        Ok(Condition::new(*self, op, Operand::Set(values)))
    }

    fn invalid(&self, op: CompareOp, operand: String) -> QueryError {
        QueryError::InvalidType {
            column: self.qualified_name(),
            kind: self.kind,
            op,
            operand,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ID: Column = Column::new("users", "id", ColumnKind::Integer);
    const LOGIN: Column = Column::new("users", "login", ColumnKind::Text);
    const SEEN: Column = Column::new("users", "last_login_time", ColumnKind::DateTime);
    const MANAGER_ID: Column = Column::new("managers", "id", ColumnKind::Integer);

    #[test]
    fn test_sql_types() {
        assert_eq!(ID.definition(), "id INT");
        assert_eq!(LOGIN.definition(), "login TEXT");
        assert_eq!(SEEN.definition(), "last_login_time DATETIME");
    }

    #[test]
    fn test_integer_rules() {
        assert!(ID.lt(2).is_ok());
        assert!(ID.ge(2.5).is_ok());
        assert!(ID.eq(MANAGER_ID).is_ok());
        assert!(matches!(
            ID.lt("2"),
            Err(QueryError::InvalidType { .. })
        ));
        assert!(ID.ne(Option::<i64>::None).is_err());
    }

    #[test]
    fn test_integer_rejects_non_finite_reals() {
        for value in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            assert!(matches!(
                ID.lt(value),
                Err(QueryError::InvalidType { .. })
            ));
            assert!(ID.in_([value]).is_err());
        }
        assert!(ID.in_([1.5]).is_ok());
    }

    #[test]
    fn test_text_rules() {
        assert!(LOGIN.eq("admin").is_ok());
        assert!(LOGIN.ne("admin").is_ok());
        assert!(LOGIN.eq(2).is_err());

        for result in [LOGIN.lt(2), LOGIN.le("a"), LOGIN.gt(LOGIN), LOGIN.ge("b")] {
            assert!(matches!(result, Err(QueryError::InvalidType { .. })));
        }
    }

    #[test]
    fn test_datetime_rules() {
        assert!(SEEN.lt("2012-01-01").is_ok());
        assert!(SEEN.ge(SEEN).is_ok());
        assert!(SEEN.lt("2012-01").is_err());
        assert!(SEEN.lt("2012-01-01-01").is_err());
        assert!(SEEN.lt(20120101).is_err());
    }

    #[test]
    fn test_membership_rules() {
        assert!(ID.in_([1, 2]).is_ok());
        assert!(ID.not_in(Vec::<i64>::new()).is_ok());
        assert!(LOGIN.in_(["Greg", "Alex"]).is_ok());
        assert!(ID.in_(["1"]).is_err());
        assert!(SEEN.not_in(["yesterday"]).is_err());
    }

    #[test]
    fn test_invalid_type_reports_operand() {
        let err = LOGIN.lt(2).unwrap_err();
        match err {
            QueryError::InvalidType {
                column,
                kind,
                op,
                operand,
            } => {
                assert_eq!(column, "users.login");
                assert_eq!(kind, ColumnKind::Text);
                assert_eq!(op, CompareOp::Lt);
                assert_eq!(operand, "2");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
