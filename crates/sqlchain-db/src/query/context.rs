//! The per-builder accumulator of statement text and bound parameters.

use rusqlite::types::Value;

use crate::{
    expr::{Column, Literal},
    query::state::ClauseState,
};

/// How literal lists (`IN (...)`, `NOT IN (...)`, `VALUES (...)`) are emitted.
///
/// `Inline` writes the literals into the statement text, quoting text with
/// single quotes and no escaping: a quote inside a value changes the
/// statement. `Bind` emits `?` placeholders and binds the values instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LiteralMode {
    #[default]
    Inline,
    Bind,
}

/// Fragments, parameters and the last clause of one statement in progress.
///
/// The number of `?` placeholders written through [`BuildContext::bind`]
/// always equals `params().len()`, and the Nth placeholder in [`sql`]
/// corresponds to the Nth parameter.
///
/// [`sql`]: BuildContext::sql
#[derive(Debug, Clone, Default)]
pub struct BuildContext {
    last_clause: ClauseState,
    fragments: Vec<String>,
    params: Vec<Value>,
    placeholders: usize,
    literal_mode: LiteralMode,
}

impl BuildContext {
    pub fn new(literal_mode: LiteralMode) -> Self {
        Self {
            literal_mode,
            ..Self::default()
        }
    }

    pub fn state(&self) -> ClauseState {
        self.last_clause
    }

    pub fn literal_mode(&self) -> LiteralMode {
        self.literal_mode
    }

    pub fn fragments(&self) -> &[String] {
        &self.fragments
    }

    pub fn params(&self) -> &[Value] {
        &self.params
    }

    /// Number of `?` placeholders emitted so far.
    pub fn placeholders(&self) -> usize {
        self.placeholders
    }

    /// The statement text: all fragments joined in call order.
    pub fn sql(&self) -> String {
        self.fragments.concat()
    }

    /// Clears fragments and parameters for a new statement.
    pub(crate) fn reset(&mut self) {
        self.fragments.clear();
        self.params.clear();
        self.placeholders = 0;
    }

    pub(crate) fn set_state(&mut self, state: ClauseState) {
        self.last_clause = state;
    }

    pub(crate) fn push(&mut self, fragment: impl Into<String>) {
        self.fragments.push(fragment.into());
    }

    /// Replaces the bound parameters, keeping the statement text.
    pub(crate) fn replace_params(&mut self, params: Vec<Value>) {
        self.params = params;
    }

    /// Binds a literal and returns its placeholder.
    pub fn bind(&mut self, literal: Literal) -> String {
        self.params.push(literal.into_value());
        self.placeholders += 1;
        "?".to_string()
    }

    /// Renders a parenthesized literal list according to the literal mode.
    pub fn literal_list(&mut self, values: &[Literal]) -> String {
        let items: Vec<String> = match self.literal_mode {
            LiteralMode::Inline => values.iter().map(ToString::to_string).collect(),
            LiteralMode::Bind => values.iter().map(|v| self.bind(v.clone())).collect(),
        };
        format!("({})", items.join(", "))
    }

    /// Column name as rendered in the current state: bare inside
    /// `UPDATE ... SET`, `table.column` everywhere else.
    pub fn column_name(&self, col: &Column) -> String {
        if self.last_clause.is_assignment() {
            col.name().to_string()
        } else {
            col.qualified_name()
        }
    }
}
