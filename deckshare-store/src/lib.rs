//! Document store seam for DeckShare.
//!
//! The engine consumes its persistent store through the narrow
//! [`DocumentStore`] trait: a path-addressable read/write/subscribe
//! primitive with per-path linearizability. Any realtime document store can
//! sit behind it; [`memory::MemoryStore`] is the in-process backend used by
//! tests and embedders.
//!
//! Three path shapes exist:
//! - `users/{actor}/decks` — an actor's private collection
//! - `users/{actor}/decks/{deck}` — a single private deck
//! - `decks/{deck}` — a public gallery entry, flat namespace shared by all
//!   actors

pub mod memory;

mod error;
mod path;
mod subscription;

pub use error::{StoreError, StoreResult};
pub use path::StorePath;
pub use subscription::{StoreEvent, StoreSubscription, SubscriptionGuard};

use async_trait::async_trait;
use serde_json::{Map, Value};

/// A path-addressable realtime document store.
///
/// Per-path ordering is the backend's responsibility; the engine layers no
/// locking of its own on top. One-shot calls run to completion once issued —
/// there is no cancellation below this seam.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Reads the value at `path`. `Ok(None)` means the path is absent,
    /// which is not an error.
    async fn read(&self, path: &StorePath) -> StoreResult<Option<Value>>;

    /// Replaces the value at `path` in full, creating intermediate nodes.
    async fn write(&self, path: &StorePath, value: Value) -> StoreResult<()>;

    /// Shallow-merges `fields` into the object at `path`. A `null` field
    /// value removes that key. Merging into an absent path creates it.
    async fn merge(&self, path: &StorePath, fields: Map<String, Value>) -> StoreResult<()>;

    /// Removes the value at `path`. Removing an absent path is a no-op.
    async fn remove(&self, path: &StorePath) -> StoreResult<()>;

    /// Establishes a push subscription at `path`.
    ///
    /// The current snapshot is delivered immediately, then every mutation at
    /// or below `path` delivers a fresh snapshot. Dropping the returned
    /// subscription tears the listener down.
    async fn subscribe(&self, path: &StorePath) -> StoreResult<StoreSubscription>;

    /// Mints an opaque unique child key under `parent` without writing
    /// anything.
    fn generate_child_key(&self, parent: &StorePath) -> String;
}
