//! Comparison conditions.
//!
//! A [`Condition`] is a structured comparison: operator, left column and
//! right operand. Nothing is rendered when it is built; the clause that
//! consumes it renders it into the builder's [`BuildContext`], which is where
//! bound parameters are pushed.

use std::fmt;

use rusqlite::types::Value;

use crate::{expr::column::Column, query::context::BuildContext, traits::Expression};

/// Comparison operator of a [`Condition`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompareOp {
    Lt,
    Le,
    Gt,
    Ge,
    Eq,
    Ne,
    In,
    NotIn,
}

impl CompareOp {
    pub fn as_str(self) -> &'static str {
        match self {
            CompareOp::Lt => "<",
            CompareOp::Le => "<=",
            CompareOp::Gt => ">",
            CompareOp::Ge => ">=",
            CompareOp::Eq => "=",
            CompareOp::Ne => "!=",
            CompareOp::In => "IN",
            CompareOp::NotIn => "NOT IN",
        }
    }
}

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A literal SQL value.
///
/// Converts from the usual Rust scalars so call sites can write
/// `users::ID.lt(2)` or `.values(&[1.into(), "Greg".into()])`.
#[derive(Debug, Clone, PartialEq)]
pub struct Literal(Value);

impl Literal {
    pub fn value(&self) -> &Value {
        &self.0
    }

    pub fn into_value(self) -> Value {
        self.0
    }
}

/// Renders the literal the way it is inlined into statement text.
///
/// Text is wrapped in single quotes without any escaping.
impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Value::Null => f.write_str("NULL"),
            Value::Integer(i) => write!(f, "{i}"),
            Value::Real(r) => write!(f, "{r}"),
            Value::Text(s) => write!(f, "'{s}'"),
            Value::Blob(bytes) => {
                f.write_str("X'")?;
                for byte in bytes {
                    write!(f, "{byte:02X}")?;
                }
                f.write_str("'")
            }
        }
    }
}

macro_rules! impl_literal_from {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for Literal {
                fn from(value: $ty) -> Self {
                    Literal(Value::from(value))
                }
            }

            impl From<$ty> for Operand {
                fn from(value: $ty) -> Self {
                    Operand::Literal(Literal::from(value))
                }
            }
        )*
    };
}

impl_literal_from!(i32, i64, u32, f64, bool, String, Value);

impl From<&str> for Literal {
    fn from(value: &str) -> Self {
        Literal(Value::Text(value.to_string()))
    }
}

impl From<&str> for Operand {
    fn from(value: &str) -> Self {
        Operand::Literal(Literal::from(value))
    }
}

impl<T: Into<Literal>> From<Option<T>> for Literal {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Literal(Value::Null))
    }
}

impl<T: Into<Literal>> From<Option<T>> for Operand {
    fn from(value: Option<T>) -> Self {
        Operand::Literal(Literal::from(value))
    }
}

/// Right-hand side of a [`Condition`].
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    /// Another column; rendered by name, never bound.
    Column(Column),
    /// A single literal; bound as a `?` parameter.
    Literal(Literal),
    /// A literal set for `IN` / `NOT IN`.
    Set(Vec<Literal>),
}

impl Operand {
    pub fn is_column(&self) -> bool {
        matches!(self, Operand::Column(_))
    }

    pub(crate) fn describe(&self) -> String {
        match self {
            Operand::Column(col) => col.qualified_name(),
            Operand::Literal(lit) => match lit.value() {
                Value::Text(s) => s.clone(),
                _ => lit.to_string(),
            },
            Operand::Set(values) => format!(
                "({})",
                values
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
        }
    }
}

impl From<Column> for Operand {
    fn from(col: Column) -> Self {
        Operand::Column(col)
    }
}

impl From<&Column> for Operand {
    fn from(col: &Column) -> Self {
        Operand::Column(*col)
    }
}

impl From<Literal> for Operand {
    fn from(lit: Literal) -> Self {
        Operand::Literal(lit)
    }
}

/// A validated comparison, produced by the [`Column`] comparison methods.
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    left: Column,
    op: CompareOp,
    right: Operand,
}

impl Condition {
    pub(crate) fn new(left: Column, op: CompareOp, right: Operand) -> Self {
        Self {
            left,
            op,
            right,
        }
    }

    pub fn left(&self) -> &Column {
        &self.left
    }

    pub fn op(&self) -> CompareOp {
        self.op
    }

    pub fn right(&self) -> &Operand {
        &self.right
    }
}

impl Expression for Condition {
    fn to_sql(&self, ctx: &mut BuildContext) -> String {
        let left = ctx.column_name(&self.left);
        let right = match &self.right {
            Operand::Column(col) => ctx.column_name(col),
            Operand::Literal(lit) => ctx.bind(lit.clone()),
            Operand::Set(values) => ctx.literal_list(values),
        };
        format!("{} {} {}", left, self.op, right)
    }
}
