//! Database schema definitions using sea-query.
//!
//! These define the table and column identifiers for type-safe query
//! building, plus the DDL each backend runs at startup. The constraints are
//! load-bearing: the unique index on `(stream_id, stream_version)` is the
//! authoritative write-conflict detector.

use sea_query::Iden;

/// Streams table schema.
#[derive(Iden)]
pub enum Streams {
    Table,
    #[iden = "id"]
    Id,
    #[iden = "stream_uuid"]
    StreamUuid,
    #[iden = "created_at"]
    CreatedAt,
}

/// Events table schema.
#[derive(Iden)]
pub enum Events {
    Table,
    #[iden = "event_id"]
    EventId,
    #[iden = "stream_id"]
    StreamId,
    #[iden = "stream_version"]
    StreamVersion,
    #[iden = "event_type"]
    EventType,
    #[iden = "correlation_id"]
    CorrelationId,
    #[iden = "causation_id"]
    CausationId,
    #[iden = "data"]
    Data,
    #[iden = "metadata"]
    Metadata,
    #[iden = "created_at"]
    CreatedAt,
}

/// Subscriptions table schema.
#[derive(Iden)]
pub enum Subscriptions {
    Table,
    #[iden = "stream_uuid"]
    StreamUuid,
    #[iden = "subscription_name"]
    SubscriptionName,
    #[iden = "last_seen_event_id"]
    LastSeenEventId,
    #[iden = "last_seen_stream_version"]
    LastSeenStreamVersion,
    #[iden = "created_at"]
    CreatedAt,
}

/// Snapshots table schema.
#[derive(Iden)]
pub enum Snapshots {
    Table,
    #[iden = "source_uuid"]
    SourceUuid,
    #[iden = "source_version"]
    SourceVersion,
    #[iden = "source_type"]
    SourceType,
    #[iden = "data"]
    Data,
    #[iden = "created_at"]
    CreatedAt,
}

/// DDL statements for SQLite, executed in order.
pub const SQLITE_SCHEMA: &[&str] = &[
    r#"
CREATE TABLE IF NOT EXISTS streams (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    stream_uuid TEXT NOT NULL UNIQUE,
    created_at TEXT NOT NULL
)"#,
    r#"
CREATE TABLE IF NOT EXISTS events (
    event_id INTEGER PRIMARY KEY,
    stream_id INTEGER NOT NULL REFERENCES streams(id),
    stream_version INTEGER NOT NULL,
    event_type TEXT NOT NULL,
    correlation_id TEXT,
    causation_id TEXT,
    data BLOB NOT NULL,
    metadata BLOB,
    created_at TEXT NOT NULL,
    UNIQUE (stream_id, stream_version)
)"#,
    r#"
CREATE TABLE IF NOT EXISTS subscriptions (
    stream_uuid TEXT NOT NULL,
    subscription_name TEXT NOT NULL,
    last_seen_event_id INTEGER NOT NULL DEFAULT 0,
    last_seen_stream_version INTEGER NOT NULL DEFAULT 0,
    created_at TEXT NOT NULL,
    PRIMARY KEY (stream_uuid, subscription_name)
)"#,
    r#"
CREATE TABLE IF NOT EXISTS snapshots (
    source_uuid TEXT PRIMARY KEY,
    source_version INTEGER NOT NULL,
    source_type TEXT NOT NULL,
    data BLOB NOT NULL,
    created_at TEXT NOT NULL
)"#,
];

/// DDL statements for PostgreSQL, executed in order.
pub const POSTGRES_SCHEMA: &[&str] = &[
    r#"
CREATE TABLE IF NOT EXISTS streams (
    id BIGSERIAL PRIMARY KEY,
    stream_uuid TEXT NOT NULL UNIQUE,
    created_at TEXT NOT NULL
)"#,
    r#"
CREATE TABLE IF NOT EXISTS events (
    event_id BIGINT PRIMARY KEY,
    stream_id BIGINT NOT NULL REFERENCES streams(id),
    stream_version BIGINT NOT NULL,
    event_type TEXT NOT NULL,
    correlation_id TEXT,
    causation_id TEXT,
    data BYTEA NOT NULL,
    metadata BYTEA,
    created_at TEXT NOT NULL,
    UNIQUE (stream_id, stream_version)
)"#,
    r#"
CREATE TABLE IF NOT EXISTS subscriptions (
    stream_uuid TEXT NOT NULL,
    subscription_name TEXT NOT NULL,
    last_seen_event_id BIGINT NOT NULL DEFAULT 0,
    last_seen_stream_version BIGINT NOT NULL DEFAULT 0,
    created_at TEXT NOT NULL,
    PRIMARY KEY (stream_uuid, subscription_name)
)"#,
    r#"
CREATE TABLE IF NOT EXISTS snapshots (
    source_uuid TEXT PRIMARY KEY,
    source_version BIGINT NOT NULL,
    source_type TEXT NOT NULL,
    data BYTEA NOT NULL,
    created_at TEXT NOT NULL
)"#,
];
