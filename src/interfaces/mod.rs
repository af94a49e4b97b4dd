//! Abstract interfaces for quill components.
//!
//! These traits define the contracts for:
//! - Event persistence (the durable store)
//! - Snapshot persistence (optimization)
//! - Durable subscription cursors (consumer resume points)

pub mod event_store;
pub mod snapshot_store;
pub mod subscription_store;

pub use event_store::{EventStore, Result, StorageError};
pub use snapshot_store::SnapshotStore;
pub use subscription_store::SubscriptionStore;
