//! Clause ordering.
//!
//! [`ClauseState`] records the last order-checked clause of the statement in
//! progress. Every checked clause consults [`ClauseState::advance`] before it
//! touches the build context.

use std::fmt;

use crate::error::{QueryError, Result};

/// A clause call subject to order checking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Clause {
    Select,
    Update,
    Insert,
    Delete,
    CreateTable,
    DropTable,
    From,
    Where,
    And,
    Or,
    Join,
    On,
    Set,
}

/// The last order-checked clause of the current statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ClauseState {
    #[default]
    Initial,
    Select,
    Update,
    Insert,
    Delete,
    CreateTable,
    DropTable,
    From,
    Where,
    And,
    Or,
    Join,
    On,
    Set,
}

impl Clause {
    /// States a clause may follow. `None` means any state.
    pub fn predecessors(self) -> Option<&'static [ClauseState]> {
        use ClauseState as S;

        match self {
            Clause::Select
            | Clause::Update
            | Clause::Insert
            | Clause::Delete
            | Clause::CreateTable
            | Clause::DropTable
            | Clause::Set => None,
            Clause::From => Some(&[S::Select, S::Delete]),
            Clause::Where => Some(&[S::From, S::Set, S::Update]),
            Clause::And => Some(&[S::Where, S::Or, S::And]),
            Clause::Or => Some(&[S::Where, S::And, S::Or]),
            Clause::Join => Some(&[S::From]),
            Clause::On => Some(&[S::Join]),
        }
    }

    /// Whether this clause opens a new statement and resets the context.
    pub fn opens_statement(self) -> bool {
        matches!(
            self,
            Clause::Select
                | Clause::Update
                | Clause::Insert
                | Clause::Delete
                | Clause::CreateTable
                | Clause::DropTable
        )
    }

    /// The state entered once the clause is accepted.
    pub fn state(self) -> ClauseState {
        match self {
            Clause::Select => ClauseState::Select,
            Clause::Update => ClauseState::Update,
            Clause::Insert => ClauseState::Insert,
            Clause::Delete => ClauseState::Delete,
            Clause::CreateTable => ClauseState::CreateTable,
            Clause::DropTable => ClauseState::DropTable,
            Clause::From => ClauseState::From,
            Clause::Where => ClauseState::Where,
            Clause::And => ClauseState::And,
            Clause::Or => ClauseState::Or,
            Clause::Join => ClauseState::Join,
            Clause::On => ClauseState::On,
            Clause::Set => ClauseState::Set,
        }
    }

    pub fn keyword(self) -> &'static str {
        match self {
            Clause::Select => "SELECT",
            Clause::Update => "UPDATE",
            Clause::Insert => "INSERT",
            Clause::Delete => "DELETE",
            Clause::CreateTable => "CREATE TABLE",
            Clause::DropTable => "DROP TABLE",
            Clause::From => "FROM",
            Clause::Where => "WHERE",
            Clause::And => "AND",
            Clause::Or => "OR",
            Clause::Join => "JOIN",
            Clause::On => "ON",
            Clause::Set => "SET",
        }
    }
}

impl ClauseState {
    /// Returns the state after `clause`, or `InvalidOrder` if `clause` may
    /// not follow `self`.
    pub fn advance(self, clause: Clause) -> Result<ClauseState> {
        match clause.predecessors() {
            Some(allowed) if !allowed.contains(&self) => Err(QueryError::InvalidOrder {
                clause,
                state: self,
            }),
            _ => Ok(clause.state()),
        }
    }

    /// Inside `UPDATE ... SET`, columns render by bare name.
    pub fn is_assignment(self) -> bool {
        matches!(self, ClauseState::Update | ClauseState::Set)
    }
}

impl fmt::Display for Clause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

impl fmt::Display for ClauseState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClauseState::Initial => f.write_str("START"),
            ClauseState::Select => f.write_str("SELECT"),
            ClauseState::Update => f.write_str("UPDATE"),
            ClauseState::Insert => f.write_str("INSERT"),
            ClauseState::Delete => f.write_str("DELETE"),
            ClauseState::CreateTable => f.write_str("CREATE TABLE"),
            ClauseState::DropTable => f.write_str("DROP TABLE"),
            ClauseState::From => f.write_str("FROM"),
            ClauseState::Where => f.write_str("WHERE"),
            ClauseState::And => f.write_str("AND"),
            ClauseState::Or => f.write_str("OR"),
            ClauseState::Join => f.write_str("JOIN"),
            ClauseState::On => f.write_str("ON"),
            ClauseState::Set => f.write_str("SET"),
        }
    }
}
