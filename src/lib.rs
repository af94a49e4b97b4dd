//! Quill - Embeddable Event Store
//!
//! An append-only log of immutable events grouped into streams, with
//! per-stream versioning, globally ordered identifiers, optimistic
//! concurrency, and live subscriptions delivered in commit order.
//!
//! All writes flow through a single coordinator task per [`Quill`]
//! instance; reads and subscriptions never block the write path.

pub mod appender;
pub mod config;
pub mod coordinator;
pub mod facade;
pub mod interfaces;
pub mod notifier;
pub mod storage;
pub mod types;
pub mod utils;

pub use config::Config;
pub use facade::Quill;
pub use interfaces::{EventStore, Result, SnapshotStore, StorageError, SubscriptionStore};
pub use notifier::{EventHandler, Scope, SubscriptionHandle};
pub use types::{RecordedEvent, Snapshot, SubscriptionCursor, UnsavedEvent};
