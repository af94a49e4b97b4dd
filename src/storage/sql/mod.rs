//! Unified SQL storage implementations.
//!
//! This module provides shared implementations for SQL-based storage
//! backends (PostgreSQL, SQLite). The implementations are parameterized by
//! database type using the `SqlDatabase` trait.

mod event_store;
mod query;
mod snapshot_store;
mod subscription_store;

pub use event_store::SqlEventStore;
pub use query::SqlDatabase;
pub use snapshot_store::SqlSnapshotStore;
pub use subscription_store::SqlSubscriptionStore;

#[cfg(feature = "postgres")]
pub mod postgres {
    //! PostgreSQL database backend.

    use sea_query::PostgresQueryBuilder;
    use sqlx::PgPool;

    use crate::storage::schema::POSTGRES_SCHEMA;

    /// PostgreSQL database marker type.
    pub struct Postgres;

    impl super::SqlDatabase for Postgres {
        type Pool = PgPool;

        const SCHEMA: &'static [&'static str] = POSTGRES_SCHEMA;

        fn build_select(stmt: sea_query::SelectStatement) -> String {
            stmt.to_string(PostgresQueryBuilder)
        }

        fn build_insert(stmt: sea_query::InsertStatement) -> String {
            stmt.to_string(PostgresQueryBuilder)
        }

        fn build_update(stmt: sea_query::UpdateStatement) -> String {
            stmt.to_string(PostgresQueryBuilder)
        }

        fn build_delete(stmt: sea_query::DeleteStatement) -> String {
            stmt.to_string(PostgresQueryBuilder)
        }
    }

    /// PostgreSQL event store.
    pub type PostgresEventStore = super::SqlEventStore<Postgres>;

    /// PostgreSQL snapshot store.
    pub type PostgresSnapshotStore = super::SqlSnapshotStore<Postgres>;

    /// PostgreSQL subscription store.
    pub type PostgresSubscriptionStore = super::SqlSubscriptionStore<Postgres>;
}

#[cfg(feature = "sqlite")]
pub mod sqlite {
    //! SQLite database backend.

    use sea_query::SqliteQueryBuilder;
    use sqlx::SqlitePool;

    use crate::storage::schema::SQLITE_SCHEMA;

    /// SQLite database marker type.
    pub struct Sqlite;

    impl super::SqlDatabase for Sqlite {
        type Pool = SqlitePool;

        const SCHEMA: &'static [&'static str] = SQLITE_SCHEMA;

        fn build_select(stmt: sea_query::SelectStatement) -> String {
            stmt.to_string(SqliteQueryBuilder)
        }

        fn build_insert(stmt: sea_query::InsertStatement) -> String {
            stmt.to_string(SqliteQueryBuilder)
        }

        fn build_update(stmt: sea_query::UpdateStatement) -> String {
            stmt.to_string(SqliteQueryBuilder)
        }

        fn build_delete(stmt: sea_query::DeleteStatement) -> String {
            stmt.to_string(SqliteQueryBuilder)
        }
    }

    /// SQLite event store.
    pub type SqliteEventStore = super::SqlEventStore<Sqlite>;

    /// SQLite snapshot store.
    pub type SqliteSnapshotStore = super::SqlSnapshotStore<Sqlite>;

    /// SQLite subscription store.
    pub type SqliteSubscriptionStore = super::SqlSubscriptionStore<Sqlite>;
}
