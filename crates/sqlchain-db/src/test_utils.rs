use tempfile::TempDir;

use crate::{define_table, driver::Db, query::SqlBuilder};

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

/// A fresh database in a temporary directory holding the four users and
/// one manager the query tests rely on.
pub fn fixture() -> (TempDir, Db) {
    let dir = tempfile::tempdir().unwrap();
    let db = Db::sqlite(dir.path().join("fixture.db"));
    let mut query = SqlBuilder::new();

    for table in [&users::TABLE, &managers::TABLE] {
        query.drop_table(table).unwrap().execute(&db).unwrap();
        query.create_table(table).unwrap().execute(&db).unwrap();
    }

    query
        .insert(&users::TABLE)
        .unwrap()
        .columns(&[users::ID, users::LOGIN, users::LAST_LOGIN_TIME])
        .values(&[1.into(), "Greg".into(), "2010-01-01".into()])
        .execute(&db)
        .unwrap();
    query
        .insert(&users::TABLE)
        .unwrap()
        .columns(&[
            users::ID,
            users::LOGIN,
            users::LAST_LOGIN_TIME,
            users::FLAG,
            users::POSITION,
        ])
        .values(&[2.into(), "Mike".into(), "2014-01-01".into(), "A".into(), 5.into()])
        .execute(&db)
        .unwrap();

    for (id, login, seen) in [(3, "Alex", "1999-01-01"), (4, "admin", "2010-01-01")] {
        query
            .insert(&users::TABLE)
            .unwrap()
            .columns(&[
                users::ID,
                users::LOGIN,
                users::LAST_LOGIN_TIME,
                users::FLAG,
                users::CLASS_FIELD,
                users::POSITION,
            ])
            .values(&[id.into(), login.into(), seen.into(), "B".into(), "m".into(), 5.into()])
            .execute(&db)
            .unwrap();
    }

    query
        .insert(&managers::TABLE)
        .unwrap()
        .columns(managers::ALL)
        .values(&[1.into(), "photo.jpg".into()])
        .execute(&db)
        .unwrap();

    (dir, db)
}
