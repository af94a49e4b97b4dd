//! SQL backend abstraction.

/// A SQL database backend usable by the unified storage implementations.
///
/// Implemented by marker types (one per backend) that pair a connection
/// pool with the sea-query statement builder for that dialect and the DDL
/// run at startup.
pub trait SqlDatabase: Send + Sync + 'static {
    /// The sqlx connection pool type for this backend.
    type Pool: Clone + Send + Sync;

    /// DDL statements executed by `init()`, in order.
    const SCHEMA: &'static [&'static str];

    fn build_select(stmt: sea_query::SelectStatement) -> String;

    fn build_insert(stmt: sea_query::InsertStatement) -> String;

    fn build_update(stmt: sea_query::UpdateStatement) -> String;

    fn build_delete(stmt: sea_query::DeleteStatement) -> String;
}
