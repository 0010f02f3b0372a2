use sqlchain_db::{Db, FromRow, LiteralMode, Row, SqlBuilder};
use tracing::{debug, info};

use crate::{error::Result, schema::users};

pub const DEFAULT_SINCE: &str = "2012-01-01";

#[derive(Debug, PartialEq)]
pub struct UserLogin {
    pub id: i64,
    pub login: String,
}

impl FromRow for UserLogin {
    fn from_row(row: &Row) -> sqlchain_db::Result<Self> {
        Ok(Self {
            id: row.get_as("id")?,
            login: row.get_as("login")?,
        })
    }
}

/// Users last seen before `since`, excluding the admin account.
pub fn users_mapping(db: &Db, mode: LiteralMode, since: &str) -> Result<Vec<UserLogin>> {
    let mut query = SqlBuilder::with_literal_mode(mode);
    query
        .select(&[users::ID, users::LOGIN])?
        .from(&[users::TABLE])?
        .where_(&[users::LAST_LOGIN_TIME.lt(since)?])?
        .and(&[users::LOGIN.ne("admin")?])?;

    debug!("users mapping: {}", query.sql());
    Ok(query.fetch_as(db)?)
}

pub fn print_users(db: &Db, mode: LiteralMode, since: &str, json: bool) -> Result<()> {
    let rows = users_mapping(db, mode, since)?;

    if json {
        let map: serde_json::Map<String, serde_json::Value> = rows
            .into_iter()
            .map(|u| (u.id.to_string(), serde_json::Value::String(u.login)))
            .collect();
        println!("{}", serde_json::to_string_pretty(&map)?);
        return Ok(());
    }

    if rows.is_empty() {
        info!("No users seen before {}", since);
    }
    for user in rows {
        info!("{}: {}", user.id, user.login);
    }
    Ok(())
}
