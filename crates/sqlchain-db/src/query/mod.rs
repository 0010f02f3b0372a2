//! Statement assembly.

pub mod builder;
pub mod context;
pub mod state;

pub use builder::SqlBuilder;
pub use context::{BuildContext, LiteralMode};
pub use state::{Clause, ClauseState};
