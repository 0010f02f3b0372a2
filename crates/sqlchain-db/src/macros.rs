//! Macros for declaring table schemas.
//!
//! The [`define_table!`] macro registers a table: it generates column
//! constants bound to the table name and their column names, plus the
//! ordered `ALL` list and the `TABLE` descriptor.

/// Defines a module with typed column constants for a database table.
///
/// # Syntax
///
/// ```ignore
/// define_table!(
///     users {
///         columns: {
///             ID: Integer => "id",
///             LOGIN: Text => "login",
///             LAST_LOGIN_TIME: DateTime => "last_login_time"
///         }
///     }
/// );
/// ```
///
/// The table name defaults to the module name; pass `table: "name"` before
/// `columns` to override it. Either way the name must be lowercase, which is
/// checked at compile time:
///
/// ```compile_fail
/// use sqlchain_db::define_table;
///
/// define_table!(
///     Users {
///         columns: {
///             ID: Integer => "id"
///         }
///     }
/// );
/// ```
///
/// The first example expands to:
///
/// ```ignore
/// pub mod users {
///     pub const NAME: &str = "users";
///     pub const ID: Column = Column::new(NAME, "id", ColumnKind::Integer);
///     pub const LOGIN: Column = Column::new(NAME, "login", ColumnKind::Text);
///     pub const LAST_LOGIN_TIME: Column =
///         Column::new(NAME, "last_login_time", ColumnKind::DateTime);
///     pub const ALL: &[Column] = &[ID, LOGIN, LAST_LOGIN_TIME];
///     pub const TABLE: Table = Table::new(NAME, ALL);
/// }
/// ```
///
/// # Usage
///
/// ```rust
/// use sqlchain_db::{define_table, SqlBuilder};
///
/// define_table!(
///     managers {
///         columns: {
///             ID: Integer => "id",
///             PHOTO: Text => "photo"
///         }
///     }
/// );
///
/// let mut query = SqlBuilder::new();
/// query
///     .select(managers::ALL)
///     .unwrap()
///     .from(&[managers::TABLE])
///     .unwrap();
/// assert_eq!(query.sql(), "SELECT managers.id, managers.photo FROM managers");
/// ```
#[macro_export]
macro_rules! define_table {
    (
        $entity:ident {
            columns: {
                $($col_name:ident: $kind:ident => $db_col:literal),* $(,)?
            }
        }
    ) => {
        $crate::define_table!(
            $entity {
                table: stringify!($entity),
                columns: {
                    $($col_name: $kind => $db_col),*
                }
            }
        );
    };

    (
        $entity:ident {
            table: $table:expr,
            columns: {
                $($col_name:ident: $kind:ident => $db_col:literal),* $(,)?
            }
        }
    ) => {
        pub mod $entity {
            #[allow(unused_imports)]
            use $crate::{
                expr::{Column, ColumnKind},
                schema::Table,
            };

            pub const NAME: &str = $table;

            const _: () = assert!(
                $crate::schema::is_lowercase_name(NAME),
                "table names must be lowercase"
            );

            $(
                pub const $col_name: Column = Column::new(NAME, $db_col, ColumnKind::$kind);
            )*

            pub const ALL: &[Column] = &[$($col_name),*];

            pub const TABLE: Table = Table::new(NAME, ALL);
        }
    };
}
