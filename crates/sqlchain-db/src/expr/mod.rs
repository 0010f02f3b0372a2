//! Columns, literals and comparison conditions.

pub mod column;
pub mod ops;

pub use column::{Column, ColumnKind};
pub use ops::{CompareOp, Condition, Literal, Operand};
