//! The fluent statement builder.

use tracing::trace;

use crate::{
    driver::Db,
    error::{QueryError, Result},
    expr::{Column, Condition, Literal},
    query::{
        context::{BuildContext, LiteralMode},
        state::{Clause, ClauseState},
    },
    row::Row,
    schema::Table,
    traits::{Expression, FromRow},
};

/// Builds one statement at a time and dispatches it through a [`Db`].
///
/// Clause methods that take part in order checking return
/// `Result<&mut Self>` and fail with [`QueryError::InvalidOrder`] without
/// touching the statement. Statement-opening clauses (`select`, `update`,
/// `insert`, `delete`, `create_table`, `drop_table`) discard the previous
/// statement.
///
/// # Example
///
/// ```rust
/// use sqlchain_db::{define_table, SqlBuilder};
///
/// define_table!(
///     users {
///         columns: {
///             ID: Integer => "id",
///             LOGIN: Text => "login",
///             LAST_LOGIN_TIME: DateTime => "last_login_time"
///         }
///     }
/// );
///
/// # fn main() -> sqlchain_db::Result<()> {
/// let mut query = SqlBuilder::new();
/// query
///     .select(&[users::ID, users::LOGIN])?
///     .from(&[users::TABLE])?
///     .where_(&[users::LAST_LOGIN_TIME.lt("2012-01-01")?])?
///     .and(&[users::LOGIN.ne("admin")?])?;
///
/// assert_eq!(
///     query.sql(),
///     "SELECT users.id, users.login FROM users \
///      WHERE users.last_login_time < ? AND users.login != ?"
/// );
/// assert_eq!(query.params().len(), 2);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct SqlBuilder {
    ctx: BuildContext,
    select_columns: Vec<String>,
}

fn render_all(ctx: &mut BuildContext, conditions: &[Condition], sep: &str) -> String {
    conditions
        .iter()
        .map(|cond| cond.to_sql(ctx))
        .collect::<Vec<_>>()
        .join(sep)
}

fn names(columns: &[Column]) -> String {
    columns
        .iter()
        .map(|col| col.name())
        .collect::<Vec<_>>()
        .join(", ")
}

impl SqlBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a builder that emits `IN`, `NOT IN` and `VALUES` literals
    /// according to `mode`.
    pub fn with_literal_mode(mode: LiteralMode) -> Self {
        Self {
            ctx: BuildContext::new(mode),
            select_columns: Vec::new(),
        }
    }

    /// Checks the order, renders the fragment against the pre-transition
    /// state, then commits fragment and state together.
    fn clause<F>(&mut self, clause: Clause, render: F) -> Result<&mut Self>
    where
        F: FnOnce(&mut BuildContext) -> String,
    {
        let current = self.ctx.state();
        let next = current.advance(clause)?;

        if clause.opens_statement() {
            self.ctx.reset();
            self.select_columns.clear();
        }

        let fragment = render(&mut self.ctx);
        trace!("{} -> {}: {:?}", current, next, fragment);

        self.ctx.push(fragment);
        self.ctx.set_state(next);
        Ok(self)
    }

    /// `SELECT t.a, t.b`. Records the bare column names as the row shape.
    pub fn select(&mut self, columns: &[Column]) -> Result<&mut Self> {
        self.clause(Clause::Select, |_| {
            let list: Vec<String> = columns.iter().map(Column::qualified_name).collect();
            format!("SELECT {}", list.join(", "))
        })?;
        self.select_columns = columns.iter().map(|c| c.name().to_string()).collect();
        Ok(self)
    }

    /// `UPDATE name SET `; follow with [`SqlBuilder::set`].
    pub fn update(&mut self, table: &Table) -> Result<&mut Self> {
        self.clause(Clause::Update, |_| format!("UPDATE {} SET ", table.name()))
    }

    /// `INSERT INTO name `; follow with [`SqlBuilder::columns`] and
    /// [`SqlBuilder::values`].
    pub fn insert(&mut self, table: &Table) -> Result<&mut Self> {
        self.clause(Clause::Insert, |_| format!("INSERT INTO {} ", table.name()))
    }

    /// `DELETE `; the table follows through [`SqlBuilder::from`].
    pub fn delete(&mut self) -> Result<&mut Self> {
        self.clause(Clause::Delete, |_| "DELETE ".to_string())
    }

    pub fn create_table(&mut self, table: &Table) -> Result<&mut Self> {
        self.clause(Clause::CreateTable, |_| {
            let defs: Vec<String> = table.all().iter().map(Column::definition).collect();
            format!("CREATE TABLE {} ({})", table.name(), defs.join(", "))
        })
    }

    pub fn drop_table(&mut self, table: &Table) -> Result<&mut Self> {
        self.clause(Clause::DropTable, |_| {
            format!("DROP TABLE IF EXISTS {}", table.name())
        })
    }

    pub fn from(&mut self, tables: &[Table]) -> Result<&mut Self> {
        self.clause(Clause::From, |_| {
            let list: Vec<&str> = tables.iter().map(Table::name).collect();
            format!(" FROM {}", list.join(", "))
        })
    }

    /// ` WHERE c1 AND c2`. With no conditions only the keyword is written,
    /// for use with [`SqlBuilder::left_bracket`].
    pub fn where_(&mut self, conditions: &[Condition]) -> Result<&mut Self> {
        self.clause(Clause::Where, |ctx| {
            format!(" WHERE {}", render_all(ctx, conditions, " AND "))
        })
    }

    pub fn and(&mut self, conditions: &[Condition]) -> Result<&mut Self> {
        self.clause(Clause::And, |ctx| {
            format!(" AND {}", render_all(ctx, conditions, " AND "))
        })
    }

    pub fn or(&mut self, conditions: &[Condition]) -> Result<&mut Self> {
        self.clause(Clause::Or, |ctx| {
            format!(" OR {}", render_all(ctx, conditions, " AND "))
        })
    }

    pub fn inner_join(&mut self, table: &Table) -> Result<&mut Self> {
        self.clause(Clause::Join, |_| format!(" INNER JOIN {}", table.name()))
    }

    pub fn left_join(&mut self, table: &Table) -> Result<&mut Self> {
        self.clause(Clause::Join, |_| format!(" LEFT JOIN {}", table.name()))
    }

    pub fn right_join(&mut self, table: &Table) -> Result<&mut Self> {
        self.clause(Clause::Join, |_| format!(" RIGHT JOIN {}", table.name()))
    }

    pub fn outer_join(&mut self, table: &Table) -> Result<&mut Self> {
        self.clause(Clause::Join, |_| format!(" FULL OUTER JOIN {}", table.name()))
    }

    pub fn on(&mut self, conditions: &[Condition]) -> Result<&mut Self> {
        self.clause(Clause::On, |ctx| {
            format!(" ON {}", render_all(ctx, conditions, " AND "))
        })
    }

    /// Assignments for `UPDATE`, built with [`Column::eq`]. Columns render
    /// by bare name. Repeated calls continue the comma-separated list.
    pub fn set(&mut self, assignments: &[Condition]) -> Result<&mut Self> {
        let lead = if self.ctx.state() == ClauseState::Set {
            ", "
        } else {
            ""
        };
        self.clause(Clause::Set, |ctx| {
            format!("{}{}", lead, render_all(ctx, assignments, ", "))
        })
    }

    /// ` (a, b) ` column list for `INSERT`. Not order-checked.
    pub fn columns(&mut self, columns: &[Column]) -> &mut Self {
        self.ctx.push(format!(" ({}) ", names(columns)));
        self
    }

    /// `VALUES (...)` for `INSERT`. Not order-checked.
    ///
    /// In [`LiteralMode::Inline`] the values are written into the statement
    /// text unescaped.
    pub fn values(&mut self, values: &[Literal]) -> &mut Self {
        let list = self.ctx.literal_list(values);
        self.ctx.push(format!("VALUES {}", list));
        self
    }

    /// Opens a group: ` (` followed by the conditions. Not order-checked,
    /// and nothing verifies that groups are balanced.
    pub fn left_bracket(&mut self, conditions: &[Condition]) -> &mut Self {
        let body = render_all(&mut self.ctx, conditions, " AND ");
        self.ctx.push(format!(" ({}", body));
        self
    }

    /// Closes a group with `) `. Not order-checked.
    pub fn right_bracket(&mut self) -> &mut Self {
        self.ctx.push(") ");
        self
    }

    /// The assembled statement text.
    pub fn sql(&self) -> String {
        self.ctx.sql()
    }

    pub fn params(&self) -> &[rusqlite::types::Value] {
        self.ctx.params()
    }

    /// Output column names recorded by the last `select`.
    pub fn select_columns(&self) -> &[String] {
        &self.select_columns
    }

    pub fn state(&self) -> ClauseState {
        self.ctx.state()
    }

    pub fn context(&self) -> &BuildContext {
        &self.ctx
    }

    /// Runs the statement and commits. No rows are retrieved.
    pub fn execute(&self, db: &Db) -> Result<()> {
        db.run(&self.sql(), self.ctx.params(), true, None)?;
        Ok(())
    }

    /// Runs the statement and returns rows shaped by the selected columns.
    pub fn fetch_from(&self, db: &Db) -> Result<Vec<Row>> {
        db.run(
            &self.sql(),
            self.ctx.params(),
            false,
            Some(self.select_columns.as_slice()),
        )
    }

    /// Re-runs the assembled statement with a new parameter list.
    ///
    /// The new list replaces the stored parameters, so a later
    /// [`SqlBuilder::fetch_from`] reuses it.
    pub fn fetch_constructed(&mut self, db: &Db, params: &[Literal]) -> Result<Vec<Row>> {
        let expected = self.ctx.placeholders();
        if params.len() != expected {
            return Err(QueryError::ParamCount {
                expected,
                got: params.len(),
            });
        }
        self.ctx
            .replace_params(params.iter().cloned().map(Literal::into_value).collect());
        self.fetch_from(db)
    }

    /// Like [`SqlBuilder::fetch_from`], mapping each row through [`FromRow`].
    pub fn fetch_as<T: FromRow>(&self, db: &Db) -> Result<Vec<T>> {
        self.fetch_from(db)?.iter().map(T::from_row).collect()
    }
}

#[cfg(test)]
mod tests {
    use rusqlite::types::Value;

    use super::*;
    use crate::test_utils::{managers, users};

    #[test]
    fn test_select_where_and() {
        let mut query = SqlBuilder::new();
        query
            .select(&[users::ID, users::LOGIN])
            .unwrap()
            .from(&[users::TABLE])
            .unwrap()
            .where_(&[users::LAST_LOGIN_TIME.lt("2012-01-01").unwrap()])
            .unwrap()
            .and(&[users::LOGIN.ne("admin").unwrap()])
            .unwrap();

        assert_eq!(
            query.sql(),
            "SELECT users.id, users.login FROM users WHERE users.last_login_time < ? AND users.login != ?"
        );
        assert_eq!(
            query.params(),
            &[Value::Text("2012-01-01".into()), Value::Text("admin".into())]
        );
        assert_eq!(query.select_columns(), ["id", "login"]);
        assert_eq!(query.state(), ClauseState::And);
    }

    #[test]
    fn test_rejected_clause_leaves_context() {
        let mut query = SqlBuilder::new();
        query.select(users::ALL).unwrap();
        let before = query.sql();

        let err = query.and(&[users::ID.eq(1).unwrap()]).unwrap_err();
        assert!(matches!(
            err,
            QueryError::InvalidOrder {
                clause: Clause::And,
                state: ClauseState::Select
            }
        ));
        assert_eq!(query.sql(), before);
        assert!(query.params().is_empty());
        assert_eq!(query.state(), ClauseState::Select);
    }

    #[test]
    fn test_illegal_sequences() {
        let id = || users::ID.eq(1).unwrap();

        assert!(SqlBuilder::new().from(&[users::TABLE]).is_err());
        assert!(SqlBuilder::new().where_(&[id()]).is_err());
        assert!(SqlBuilder::new()
            .select(users::ALL)
            .unwrap()
            .on(&[id()])
            .is_err());
        assert!(SqlBuilder::new()
            .insert(&users::TABLE)
            .unwrap()
            .from(&[users::TABLE])
            .is_err());
        assert!(SqlBuilder::new()
            .select(users::ALL)
            .unwrap()
            .from(&[users::TABLE])
            .unwrap()
            .where_(&[id()])
            .unwrap()
            .inner_join(&managers::TABLE)
            .is_err());
    }

    #[test]
    fn test_comparison_parameter_counts() {
        let mut query = SqlBuilder::new();
        query
            .select(&[users::ID])
            .unwrap()
            .from(&[users::TABLE, managers::TABLE])
            .unwrap()
            .where_(&[users::ID.eq(managers::ID).unwrap()])
            .unwrap();
        assert!(query.params().is_empty());
        assert_eq!(
            query.sql(),
            "SELECT users.id FROM users, managers WHERE users.id = managers.id"
        );

        query.and(&[users::ID.ne(3).unwrap()]).unwrap();
        assert_eq!(query.params(), &[Value::Integer(3)]);
    }

    #[test]
    fn test_opening_clause_resets() {
        let mut query = SqlBuilder::new();
        query
            .select(&[users::ID])
            .unwrap()
            .from(&[users::TABLE])
            .unwrap()
            .where_(&[users::ID.lt(2).unwrap()])
            .unwrap();

        query.delete().unwrap();
        assert_eq!(query.sql(), "DELETE ");
        assert!(query.params().is_empty());
        assert!(query.select_columns().is_empty());
    }

    #[test]
    fn test_update_set_uses_bare_names() {
        let mut query = SqlBuilder::new();
        query
            .update(&users::TABLE)
            .unwrap()
            .set(&[users::LOGIN.eq("Mark").unwrap(), users::POSITION.eq(3).unwrap()])
            .unwrap()
            .set(&[users::FLAG.eq("C").unwrap()])
            .unwrap()
            .where_(&[users::ID.eq(2).unwrap()])
            .unwrap();

        assert_eq!(
            query.sql(),
            "UPDATE users SET login = ?, position = ?, flag = ? WHERE id = ?"
        );
        assert_eq!(query.params().len(), 4);
    }

    #[test]
    fn test_insert_inline_values() {
        let mut query = SqlBuilder::new();
        query
            .insert(&managers::TABLE)
            .unwrap()
            .columns(managers::ALL)
            .values(&[1.into(), "photo.jpg".into()]);

        assert_eq!(
            query.sql(),
            "INSERT INTO managers  (id, photo) VALUES (1, 'photo.jpg')"
        );
        assert!(query.params().is_empty());
        assert_eq!(query.state(), ClauseState::Insert);
    }

    #[test]
    fn test_insert_bound_values() {
        let mut query = SqlBuilder::with_literal_mode(LiteralMode::Bind);
        query
            .insert(&managers::TABLE)
            .unwrap()
            .columns(managers::ALL)
            .values(&[1.into(), "photo.jpg".into()]);

        assert_eq!(query.sql(), "INSERT INTO managers  (id, photo) VALUES (?, ?)");
        assert_eq!(query.params().len(), 2);
    }

    #[test]
    fn test_membership_rendering() {
        let mut query = SqlBuilder::new();
        query
            .select(&[users::ID])
            .unwrap()
            .from(&[users::TABLE])
            .unwrap()
            .where_(&[users::ID.in_([2]).unwrap()])
            .unwrap()
            .or(&[users::LOGIN.not_in(["Greg", "Alex"]).unwrap()])
            .unwrap();

        assert_eq!(
            query.sql(),
            "SELECT users.id FROM users WHERE users.id IN (2) OR users.login NOT IN ('Greg', 'Alex')"
        );
        assert!(query.params().is_empty());
    }

    #[test]
    fn test_joins() {
        type Join = for<'a, 'b> fn(&'a mut SqlBuilder, &'b Table) -> Result<&'a mut SqlBuilder>;

        let joins: [(Join, &str); 4] = [
            (SqlBuilder::inner_join, " INNER JOIN managers"),
            (SqlBuilder::left_join, " LEFT JOIN managers"),
            (SqlBuilder::right_join, " RIGHT JOIN managers"),
            (SqlBuilder::outer_join, " FULL OUTER JOIN managers"),
        ];

        for (join, expected) in joins {
            let mut query = SqlBuilder::new();
            query
                .select(&[users::ID, managers::PHOTO])
                .unwrap()
                .from(&[users::TABLE])
                .unwrap();
            join(&mut query, &managers::TABLE).unwrap();
            query.on(&[users::ID.eq(managers::ID).unwrap()]).unwrap();

            assert_eq!(
                query.sql(),
                format!(
                    "SELECT users.id, managers.photo FROM users{} ON users.id = managers.id",
                    expected
                )
            );
        }
    }

    #[test]
    fn test_brackets_are_unchecked() {
        let mut query = SqlBuilder::new();
        query
            .select(users::ALL)
            .unwrap()
            .from(&[users::TABLE])
            .unwrap()
            .where_(&[])
            .unwrap()
            .left_bracket(&[users::FLAG.eq("A").unwrap()])
            .or(&[])
            .unwrap()
            .left_bracket(&[users::FLAG.eq("B").unwrap()])
            .and(&[users::CLASS_FIELD.eq("m").unwrap()])
            .unwrap()
            .right_bracket()
            .right_bracket();

        assert!(query.sql().ends_with(
            " WHERE  (users.flag = ? OR  (users.flag = ? AND users.class_field = ?) ) "
        ));
        assert_eq!(query.params().len(), 3);

        let mut loose = SqlBuilder::new();
        loose.right_bracket().left_bracket(&[]);
        assert_eq!(loose.sql(), ")  (");
        assert_eq!(loose.state(), ClauseState::Initial);
    }

    #[test]
    fn test_create_and_drop_table() {
        let mut query = SqlBuilder::new();
        query.create_table(&managers::TABLE).unwrap();
        assert_eq!(query.sql(), "CREATE TABLE managers (id INT, photo TEXT)");

        query.drop_table(&users::TABLE).unwrap();
        assert_eq!(query.sql(), "DROP TABLE IF EXISTS users");
    }

    #[test]
    fn test_builders_are_isolated() {
        let mut first = SqlBuilder::new();
        let mut second = SqlBuilder::new();
        first.select(&[users::ID]).unwrap();
        second.update(&users::TABLE).unwrap();

        assert!(first.from(&[users::TABLE]).is_ok());
        assert!(second.from(&[users::TABLE]).is_err());
    }
}
