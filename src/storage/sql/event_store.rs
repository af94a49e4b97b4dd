//! Unified SQL EventStore implementation.
//!
//! A macro generates the trait impl for each enabled backend. The batch
//! insert is a single multi-row statement, so the whole batch commits or
//! fails as one unit without an explicit transaction; the uniqueness
//! constraint on `(stream_id, stream_version)` arbitrates write conflicts,
//! including races with writers outside this process.

use std::marker::PhantomData;

use super::SqlDatabase;

/// SQL-based implementation of EventStore.
///
/// Works with any backend implementing [`SqlDatabase`] (PostgreSQL, SQLite).
pub struct SqlEventStore<DB: SqlDatabase> {
    pool: DB::Pool,
    _marker: PhantomData<DB>,
}

impl<DB: SqlDatabase> SqlEventStore<DB> {
    /// Create a new SQL event store with the given pool.
    pub fn new(pool: DB::Pool) -> Self {
        Self {
            pool,
            _marker: PhantomData,
        }
    }

    /// Get the underlying pool.
    pub fn pool(&self) -> &DB::Pool {
        &self.pool
    }
}

/// Macro to implement EventStore for a specific SQL backend.
macro_rules! impl_event_store {
    ($db_type:ty, $feature:literal) => {
        #[cfg(feature = $feature)]
        impl SqlEventStore<$db_type> {
            /// Create the schema if it does not exist.
            pub async fn init(&self) -> crate::interfaces::Result<()> {
                for ddl in <$db_type>::SCHEMA {
                    sqlx::query(ddl).execute(&self.pool).await?;
                }
                Ok(())
            }
        }

        #[cfg(feature = $feature)]
        #[async_trait::async_trait]
        impl crate::interfaces::EventStore for SqlEventStore<$db_type> {
            async fn resolve_or_create_stream(
                &self,
                stream_uuid: uuid::Uuid,
            ) -> crate::interfaces::Result<i64> {
                use sea_query::{Expr, OnConflict, Query};
                use sqlx::Row;

                use crate::storage::schema::Streams;

                let uuid_str = stream_uuid.to_string();

                // First-write-wins: a concurrent creator makes the insert a
                // no-op and the select below observes its row.
                let stmt = Query::insert()
                    .into_table(Streams::Table)
                    .columns([Streams::StreamUuid, Streams::CreatedAt])
                    .values_panic([
                        uuid_str.clone().into(),
                        chrono::Utc::now().to_rfc3339().into(),
                    ])
                    .on_conflict(
                        OnConflict::column(Streams::StreamUuid)
                            .do_nothing()
                            .to_owned(),
                    )
                    .to_owned();

                let sql = <$db_type>::build_insert(stmt);
                sqlx::query(&sql).execute(&self.pool).await?;

                let stmt = Query::select()
                    .column(Streams::Id)
                    .from(Streams::Table)
                    .and_where(Expr::col(Streams::StreamUuid).eq(&uuid_str))
                    .to_owned();

                let sql = <$db_type>::build_select(stmt);
                let row = sqlx::query(&sql).fetch_one(&self.pool).await?;

                Ok(row.get::<i64, _>(0))
            }

            async fn current_version(&self, stream_id: i64) -> crate::interfaces::Result<i64> {
                use sea_query::{Expr, Query};
                use sqlx::Row;

                use crate::storage::schema::Events;

                let stmt = Query::select()
                    .expr(Expr::col(Events::StreamVersion).max())
                    .from(Events::Table)
                    .and_where(Expr::col(Events::StreamId).eq(stream_id))
                    .to_owned();

                let sql = <$db_type>::build_select(stmt);
                let row = sqlx::query(&sql).fetch_one(&self.pool).await?;

                let max_version: Option<i64> = row.get(0);
                Ok(max_version.unwrap_or(0))
            }

            async fn insert_events(
                &self,
                events: &[crate::types::RecordedEvent],
            ) -> crate::interfaces::Result<u64> {
                use sea_query::Query;

                use crate::interfaces::StorageError;
                use crate::storage::schema::Events;

                if events.is_empty() {
                    return Ok(0);
                }

                // Scoped so the non-Send statement is dropped before the await.
                let sql = {
                    let mut stmt = Query::insert()
                        .into_table(Events::Table)
                        .columns([
                            Events::EventId,
                            Events::StreamId,
                            Events::StreamVersion,
                            Events::EventType,
                            Events::CorrelationId,
                            Events::CausationId,
                            Events::Data,
                            Events::Metadata,
                            Events::CreatedAt,
                        ])
                        .to_owned();

                    for event in events {
                        stmt.values_panic([
                            event.event_id.into(),
                            event.stream_id.into(),
                            event.stream_version.into(),
                            event.event_type.clone().into(),
                            event.correlation_id.clone().into(),
                            event.causation_id.clone().into(),
                            event.data.clone().into(),
                            event.metadata.clone().into(),
                            event.created_at.clone().into(),
                        ]);
                    }

                    <$db_type>::build_insert(stmt)
                };
                let result = sqlx::query(&sql).execute(&self.pool).await.map_err(|e| {
                    match &e {
                        sqlx::Error::Database(db)
                            if matches!(
                                db.kind(),
                                sqlx::error::ErrorKind::UniqueViolation
                            ) =>
                        {
                            StorageError::VersionConflict {
                                stream_id: events[0].stream_id,
                                version: events[0].stream_version,
                            }
                        }
                        _ => StorageError::Unavailable(e),
                    }
                })?;

                Ok(result.rows_affected())
            }

            async fn max_event_id(&self) -> crate::interfaces::Result<i64> {
                use sea_query::{Expr, Query};
                use sqlx::Row;

                use crate::storage::schema::Events;

                let stmt = Query::select()
                    .expr(Expr::col(Events::EventId).max())
                    .from(Events::Table)
                    .to_owned();

                let sql = <$db_type>::build_select(stmt);
                let row = sqlx::query(&sql).fetch_one(&self.pool).await?;

                let max_id: Option<i64> = row.get(0);
                Ok(max_id.unwrap_or(0))
            }

            async fn read_stream(
                &self,
                stream_uuid: uuid::Uuid,
                from_version: i64,
                limit: u64,
            ) -> crate::interfaces::Result<Vec<crate::types::RecordedEvent>> {
                use sea_query::{Expr, Order, Query};
                use sqlx::Row;

                use crate::storage::schema::{Events, Streams};

                let stmt = Query::select()
                    .column(Streams::Id)
                    .from(Streams::Table)
                    .and_where(Expr::col(Streams::StreamUuid).eq(stream_uuid.to_string()))
                    .to_owned();

                let sql = <$db_type>::build_select(stmt);
                let stream_id = match sqlx::query(&sql).fetch_optional(&self.pool).await? {
                    Some(row) => row.get::<i64, _>(0),
                    None => return Ok(Vec::new()),
                };

                let stmt = Query::select()
                    .columns([
                        Events::EventId,
                        Events::StreamId,
                        Events::StreamVersion,
                        Events::EventType,
                        Events::CorrelationId,
                        Events::CausationId,
                        Events::Data,
                        Events::Metadata,
                        Events::CreatedAt,
                    ])
                    .from(Events::Table)
                    .and_where(Expr::col(Events::StreamId).eq(stream_id))
                    .and_where(Expr::col(Events::StreamVersion).gte(from_version))
                    .order_by(Events::StreamVersion, Order::Asc)
                    .limit(limit)
                    .to_owned();

                let sql = <$db_type>::build_select(stmt);
                let rows = sqlx::query(&sql).fetch_all(&self.pool).await?;

                let mut events = Vec::with_capacity(rows.len());
                for row in rows {
                    events.push(crate::types::RecordedEvent {
                        event_id: row.get("event_id"),
                        stream_id: row.get("stream_id"),
                        stream_version: row.get("stream_version"),
                        event_type: row.get("event_type"),
                        correlation_id: row.get("correlation_id"),
                        causation_id: row.get("causation_id"),
                        data: row.get("data"),
                        metadata: row.get("metadata"),
                        created_at: row.get("created_at"),
                    });
                }

                Ok(events)
            }

            async fn read_all(
                &self,
                from_event_id: i64,
                limit: u64,
            ) -> crate::interfaces::Result<Vec<crate::types::RecordedEvent>> {
                use sea_query::{Expr, Order, Query};
                use sqlx::Row;

                use crate::storage::schema::Events;

                let stmt = Query::select()
                    .columns([
                        Events::EventId,
                        Events::StreamId,
                        Events::StreamVersion,
                        Events::EventType,
                        Events::CorrelationId,
                        Events::CausationId,
                        Events::Data,
                        Events::Metadata,
                        Events::CreatedAt,
                    ])
                    .from(Events::Table)
                    .and_where(Expr::col(Events::EventId).gte(from_event_id))
                    .order_by(Events::EventId, Order::Asc)
                    .limit(limit)
                    .to_owned();

                let sql = <$db_type>::build_select(stmt);
                let rows = sqlx::query(&sql).fetch_all(&self.pool).await?;

                let mut events = Vec::with_capacity(rows.len());
                for row in rows {
                    events.push(crate::types::RecordedEvent {
                        event_id: row.get("event_id"),
                        stream_id: row.get("stream_id"),
                        stream_version: row.get("stream_version"),
                        event_type: row.get("event_type"),
                        correlation_id: row.get("correlation_id"),
                        causation_id: row.get("causation_id"),
                        data: row.get("data"),
                        metadata: row.get("metadata"),
                        created_at: row.get("created_at"),
                    });
                }

                Ok(events)
            }
        }
    };
}

impl_event_store!(super::postgres::Postgres, "postgres");
impl_event_store!(super::sqlite::Sqlite, "sqlite");
