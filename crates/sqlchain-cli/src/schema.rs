//! Example schema and sample rows.

use sqlchain_db::{define_table, Column, Db, Literal, LiteralMode, Schema, SqlBuilder};
use tracing::info;

use crate::error::Result;

define_table!(
    users {
        columns: {
            ID: Integer => "id",
            LOGIN: Text => "login",
            LAST_LOGIN_TIME: DateTime => "last_login_time",
            FLAG: Text => "flag",
            POSITION: Integer => "position",
            CLASS_FIELD: Text => "class_field",
        }
    }
);

define_table!(
    managers {
        columns: {
            ID: Integer => "id",
            PHOTO: Text => "photo",
        }
    }
);

pub fn schema() -> Result<Schema> {
    let mut schema = Schema::new();
    schema.register(users::TABLE)?.register(managers::TABLE)?;
    Ok(schema)
}

/// `CREATE TABLE` statements for every table, in registration order.
pub fn create_statements() -> Result<Vec<String>> {
    let schema = schema()?;
    let mut query = SqlBuilder::new();
    let mut statements = Vec::with_capacity(schema.len());
    for table in schema.tables() {
        statements.push(query.create_table(table)?.sql());
    }
    Ok(statements)
}

/// Drops and recreates every table, then optionally loads the sample rows.
pub fn init_database(db: &Db, mode: LiteralMode, seed: bool) -> Result<()> {
    let mut query = SqlBuilder::with_literal_mode(mode);

    for table in schema()?.tables() {
        query.drop_table(table)?.execute(db)?;
        query.create_table(table)?.execute(db)?;
        info!("Created table {}", table.name());
    }

    if seed {
        let rows = seed_users();
        for row in &rows {
            let columns: Vec<_> = row.iter().map(|(col, _)| *col).collect();
            let values: Vec<Literal> = row.iter().map(|(_, v)| v.clone()).collect();
            query
                .insert(&users::TABLE)?
                .columns(&columns)
                .values(&values)
                .execute(db)?;
        }
        query
            .insert(&managers::TABLE)?
            .columns(managers::ALL)
            .values(&[1.into(), "photo.jpg".into()])
            .execute(db)?;
        info!("Loaded {} users and 1 manager", rows.len());
    }

    Ok(())
}

type SeedRow = Vec<(Column, Literal)>;

fn seed_users() -> Vec<SeedRow> {
    let base = |id: i64, login: &str, seen: &str| {
        vec![
            (users::ID, Literal::from(id)),
            (users::LOGIN, Literal::from(login)),
            (users::LAST_LOGIN_TIME, Literal::from(seen)),
        ]
    };

    let mut mike = base(2, "Mike", "2014-01-01");
    mike.extend([(users::FLAG, "A".into()), (users::POSITION, 5.into())]);

    let mut rows = vec![base(1, "Greg", "2010-01-01"), mike];
    for (id, login, seen) in [(3, "Alex", "1999-01-01"), (4, "admin", "2010-01-01")] {
        let mut row = base(id, login, seen);
        row.extend([
            (users::FLAG, "B".into()),
            (users::CLASS_FIELD, "m".into()),
            (users::POSITION, 5.into()),
        ]);
        rows.push(row);
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_tables() {
        let schema = schema().unwrap();
        let names: Vec<_> = schema.tables().map(|t| t.name()).collect();
        assert_eq!(names, ["users", "managers"]);
    }

    #[test]
    fn test_create_statements() {
        let statements = create_statements().unwrap();
        assert_eq!(
            statements,
            [
                "CREATE TABLE users (id INT, login TEXT, last_login_time DATETIME, flag TEXT, position INT, class_field TEXT)",
                "CREATE TABLE managers (id INT, photo TEXT)",
            ]
        );
    }

    #[test]
    fn test_init_database_seeds_rows() {
        let dir = tempfile::tempdir().unwrap();
        let db = Db::sqlite(dir.path().join("sample.db"));
        init_database(&db, LiteralMode::Bind, true).unwrap();

        let mut query = SqlBuilder::new();
        query.select(users::ALL).unwrap().from(&[users::TABLE]).unwrap();
        assert_eq!(query.fetch_from(&db).unwrap().len(), 4);

        init_database(&db, LiteralMode::Inline, false).unwrap();
        assert!(query.fetch_from(&db).unwrap().is_empty());
    }
}
