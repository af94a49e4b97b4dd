//! Unified SQL SnapshotStore implementation.

use std::marker::PhantomData;

use super::SqlDatabase;

/// SQL-based implementation of SnapshotStore.
///
/// One row per source UUID; `put` upserts via the backend's
/// ON CONFLICT clause.
pub struct SqlSnapshotStore<DB: SqlDatabase> {
    pool: DB::Pool,
    _marker: PhantomData<DB>,
}

impl<DB: SqlDatabase> SqlSnapshotStore<DB> {
    /// Create a new SQL snapshot store with the given pool.
    pub fn new(pool: DB::Pool) -> Self {
        Self {
            pool,
            _marker: PhantomData,
        }
    }
}

/// Macro to implement SnapshotStore for a specific SQL backend.
macro_rules! impl_snapshot_store {
    ($db_type:ty, $feature:literal) => {
        #[cfg(feature = $feature)]
        #[async_trait::async_trait]
        impl crate::interfaces::SnapshotStore for SqlSnapshotStore<$db_type> {
            async fn get(
                &self,
                source_uuid: uuid::Uuid,
            ) -> crate::interfaces::Result<Option<crate::types::Snapshot>> {
                use sea_query::{Expr, Query};
                use sqlx::Row;

                use crate::storage::schema::Snapshots;

                let stmt = Query::select()
                    .columns([
                        Snapshots::SourceVersion,
                        Snapshots::SourceType,
                        Snapshots::Data,
                    ])
                    .from(Snapshots::Table)
                    .and_where(Expr::col(Snapshots::SourceUuid).eq(source_uuid.to_string()))
                    .to_owned();

                let sql = <$db_type>::build_select(stmt);
                let row = sqlx::query(&sql).fetch_optional(&self.pool).await?;

                match row {
                    Some(row) => Ok(Some(crate::types::Snapshot {
                        source_uuid,
                        source_version: row.get("source_version"),
                        source_type: row.get("source_type"),
                        data: row.get("data"),
                    })),
                    None => Ok(None),
                }
            }

            async fn put(
                &self,
                snapshot: crate::types::Snapshot,
            ) -> crate::interfaces::Result<()> {
                use sea_query::{OnConflict, Query};

                use crate::storage::schema::Snapshots;

                let stmt = Query::insert()
                    .into_table(Snapshots::Table)
                    .columns([
                        Snapshots::SourceUuid,
                        Snapshots::SourceVersion,
                        Snapshots::SourceType,
                        Snapshots::Data,
                        Snapshots::CreatedAt,
                    ])
                    .values_panic([
                        snapshot.source_uuid.to_string().into(),
                        snapshot.source_version.into(),
                        snapshot.source_type.clone().into(),
                        snapshot.data.clone().into(),
                        chrono::Utc::now().to_rfc3339().into(),
                    ])
                    .on_conflict(
                        OnConflict::column(Snapshots::SourceUuid)
                            .update_columns([
                                Snapshots::SourceVersion,
                                Snapshots::SourceType,
                                Snapshots::Data,
                                Snapshots::CreatedAt,
                            ])
                            .to_owned(),
                    )
                    .to_owned();

                let sql = <$db_type>::build_insert(stmt);
                sqlx::query(&sql).execute(&self.pool).await?;

                Ok(())
            }

            async fn delete(&self, source_uuid: uuid::Uuid) -> crate::interfaces::Result<()> {
                use sea_query::{Expr, Query};

                use crate::storage::schema::Snapshots;

                let stmt = Query::delete()
                    .from_table(Snapshots::Table)
                    .and_where(Expr::col(Snapshots::SourceUuid).eq(source_uuid.to_string()))
                    .to_owned();

                let sql = <$db_type>::build_delete(stmt);
                sqlx::query(&sql).execute(&self.pool).await?;

                Ok(())
            }
        }
    };
}

impl_snapshot_store!(super::postgres::Postgres, "postgres");
impl_snapshot_store!(super::sqlite::Sqlite, "sqlite");
