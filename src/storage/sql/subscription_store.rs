//! Unified SQL SubscriptionStore implementation.

use std::marker::PhantomData;

use super::SqlDatabase;

/// SQL-based implementation of SubscriptionStore.
///
/// One row per `(stream_uuid, subscription_name)`; positions move only via
/// `ack`.
pub struct SqlSubscriptionStore<DB: SqlDatabase> {
    pool: DB::Pool,
    _marker: PhantomData<DB>,
}

impl<DB: SqlDatabase> SqlSubscriptionStore<DB> {
    /// Create a new SQL subscription store with the given pool.
    pub fn new(pool: DB::Pool) -> Self {
        Self {
            pool,
            _marker: PhantomData,
        }
    }
}

/// Macro to implement SubscriptionStore for a specific SQL backend.
macro_rules! impl_subscription_store {
    ($db_type:ty, $feature:literal) => {
        #[cfg(feature = $feature)]
        #[async_trait::async_trait]
        impl crate::interfaces::SubscriptionStore for SqlSubscriptionStore<$db_type> {
            async fn create(
                &self,
                stream_uuid: uuid::Uuid,
                name: &str,
            ) -> crate::interfaces::Result<()> {
                use sea_query::{OnConflict, Query};

                use crate::storage::schema::Subscriptions;

                // Re-creating an existing subscription keeps its position.
                let stmt = Query::insert()
                    .into_table(Subscriptions::Table)
                    .columns([
                        Subscriptions::StreamUuid,
                        Subscriptions::SubscriptionName,
                        Subscriptions::LastSeenEventId,
                        Subscriptions::LastSeenStreamVersion,
                        Subscriptions::CreatedAt,
                    ])
                    .values_panic([
                        stream_uuid.to_string().into(),
                        name.into(),
                        0i64.into(),
                        0i64.into(),
                        chrono::Utc::now().to_rfc3339().into(),
                    ])
                    .on_conflict(
                        OnConflict::columns([
                            Subscriptions::StreamUuid,
                            Subscriptions::SubscriptionName,
                        ])
                        .do_nothing()
                        .to_owned(),
                    )
                    .to_owned();

                let sql = <$db_type>::build_insert(stmt);
                sqlx::query(&sql).execute(&self.pool).await?;

                Ok(())
            }

            async fn get(
                &self,
                stream_uuid: uuid::Uuid,
                name: &str,
            ) -> crate::interfaces::Result<Option<crate::types::SubscriptionCursor>> {
                use sea_query::{Expr, Query};
                use sqlx::Row;

                use crate::storage::schema::Subscriptions;

                let stmt = Query::select()
                    .columns([
                        Subscriptions::LastSeenEventId,
                        Subscriptions::LastSeenStreamVersion,
                    ])
                    .from(Subscriptions::Table)
                    .and_where(Expr::col(Subscriptions::StreamUuid).eq(stream_uuid.to_string()))
                    .and_where(Expr::col(Subscriptions::SubscriptionName).eq(name))
                    .to_owned();

                let sql = <$db_type>::build_select(stmt);
                let row = sqlx::query(&sql).fetch_optional(&self.pool).await?;

                match row {
                    Some(row) => Ok(Some(crate::types::SubscriptionCursor {
                        stream_uuid,
                        name: name.to_string(),
                        last_seen_event_id: row.get("last_seen_event_id"),
                        last_seen_stream_version: row.get("last_seen_stream_version"),
                    })),
                    None => Ok(None),
                }
            }

            async fn ack(
                &self,
                stream_uuid: uuid::Uuid,
                name: &str,
                event_id: i64,
                stream_version: i64,
            ) -> crate::interfaces::Result<()> {
                use sea_query::{Expr, Query};

                use crate::storage::schema::Subscriptions;

                let stmt = Query::update()
                    .table(Subscriptions::Table)
                    .values([
                        (Subscriptions::LastSeenEventId, event_id.into()),
                        (Subscriptions::LastSeenStreamVersion, stream_version.into()),
                    ])
                    .and_where(Expr::col(Subscriptions::StreamUuid).eq(stream_uuid.to_string()))
                    .and_where(Expr::col(Subscriptions::SubscriptionName).eq(name))
                    .to_owned();

                let sql = <$db_type>::build_update(stmt);
                sqlx::query(&sql).execute(&self.pool).await?;

                Ok(())
            }

            async fn delete(
                &self,
                stream_uuid: uuid::Uuid,
                name: &str,
            ) -> crate::interfaces::Result<()> {
                use sea_query::{Expr, Query};

                use crate::storage::schema::Subscriptions;

                let stmt = Query::delete()
                    .from_table(Subscriptions::Table)
                    .and_where(Expr::col(Subscriptions::StreamUuid).eq(stream_uuid.to_string()))
                    .and_where(Expr::col(Subscriptions::SubscriptionName).eq(name))
                    .to_owned();

                let sql = <$db_type>::build_delete(stmt);
                sqlx::query(&sql).execute(&self.pool).await?;

                Ok(())
            }
        }
    };
}

impl_subscription_store!(super::postgres::Postgres, "postgres");
impl_subscription_store!(super::sqlite::Sqlite, "sqlite");
