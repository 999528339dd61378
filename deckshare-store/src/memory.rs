//! In-memory document store.
//!
//! A JSON tree behind a mutex, with the same observable semantics the engine
//! expects from a realtime backend: per-path linearizability (the tree
//! mutex), immediate initial snapshot on subscribe, and snapshot fanout to
//! every listener whose path overlaps a mutation. Tests drive the engine
//! against it; `fail_path` injects per-path write/read failures so
//! partial-failure behavior is reachable without a real backend.

use crate::{
    DocumentStore, StoreError, StoreEvent, StorePath, StoreResult, StoreSubscription,
    SubscriptionGuard,
};
use async_trait::async_trait;
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;
use tracing::debug;
use uuid::Uuid;

struct Subscriber {
    id: u64,
    path: StorePath,
    tx: mpsc::UnboundedSender<StoreEvent>,
}

/// An in-process [`DocumentStore`].
#[derive(Default)]
pub struct MemoryStore {
    root: Mutex<Value>,
    subscribers: Arc<Mutex<Vec<Subscriber>>>,
    next_sub_id: AtomicU64,
    failing: Mutex<HashSet<String>>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            root: Mutex::new(Value::Object(Map::new())),
            subscribers: Arc::new(Mutex::new(Vec::new())),
            next_sub_id: AtomicU64::new(0),
            failing: Mutex::new(HashSet::new()),
        }
    }

    /// Makes every subsequent operation at exactly `path` fail with
    /// [`StoreError::Unavailable`] until [`MemoryStore::heal_path`].
    pub fn fail_path(&self, path: &StorePath) {
        self.failing.lock().unwrap().insert(path.as_str().to_string());
    }

    /// Clears an injected failure.
    pub fn heal_path(&self, path: &StorePath) {
        self.failing.lock().unwrap().remove(path.as_str());
    }

    /// Pushes a backend error to every listener overlapping `path`.
    /// Models an upstream subscription failure (permission change, outage).
    pub fn emit_error(&self, path: &StorePath) {
        let subs = self.subscribers.lock().unwrap();
        for sub in subs.iter().filter(|s| s.path.overlaps(path)) {
            let _ = sub
                .tx
                .send(Err(StoreError::Unavailable("injected".to_string())));
        }
    }

    fn check_failure(&self, path: &StorePath) -> StoreResult<()> {
        if self.failing.lock().unwrap().contains(path.as_str()) {
            return Err(StoreError::Unavailable(format!(
                "injected failure at {path}"
            )));
        }
        Ok(())
    }

    fn snapshot(&self, path: &StorePath) -> Option<Value> {
        let root = self.root.lock().unwrap();
        Self::value_at(&root, path).cloned()
    }

    fn value_at<'v>(root: &'v Value, path: &StorePath) -> Option<&'v Value> {
        let mut node = root;
        for segment in path.segments() {
            node = node.as_object()?.get(segment)?;
        }
        Some(node)
    }

    /// Navigates to the parent object of `path`'s last segment, creating
    /// intermediate objects. Fails if a non-object sits on the way.
    fn parent_object<'v>(
        root: &'v mut Value,
        path: &StorePath,
    ) -> StoreResult<(&'v mut Map<String, Value>, String)> {
        let segments: Vec<&str> = path.segments().collect();
        let (last, ancestors) = segments
            .split_last()
            .ok_or_else(|| StoreError::InvalidPath("empty path".to_string()))?;

        let mut node = root;
        for segment in ancestors {
            let map = node
                .as_object_mut()
                .ok_or_else(|| StoreError::InvalidPath(path.as_str().to_string()))?;
            node = map
                .entry(segment.to_string())
                .or_insert_with(|| Value::Object(Map::new()));
        }
        let map = node
            .as_object_mut()
            .ok_or_else(|| StoreError::InvalidPath(path.as_str().to_string()))?;
        Ok((map, (*last).to_string()))
    }

    /// Delivers the current snapshot at each overlapping listener's own path.
    fn notify(&self, mutated: &StorePath) {
        let root = self.root.lock().unwrap();
        let mut subs = self.subscribers.lock().unwrap();
        subs.retain(|s| !s.tx.is_closed());
        for sub in subs.iter().filter(|s| s.path.overlaps(mutated)) {
            let snapshot = Self::value_at(&root, &sub.path).cloned();
            let _ = sub.tx.send(Ok(snapshot));
        }
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn read(&self, path: &StorePath) -> StoreResult<Option<Value>> {
        self.check_failure(path)?;
        Ok(self.snapshot(path))
    }

    async fn write(&self, path: &StorePath, value: Value) -> StoreResult<()> {
        self.check_failure(path)?;
        {
            let mut root = self.root.lock().unwrap();
            let (parent, key) = Self::parent_object(&mut root, path)?;
            parent.insert(key, value);
        }
        debug!(%path, "write");
        self.notify(path);
        Ok(())
    }

    async fn merge(&self, path: &StorePath, fields: Map<String, Value>) -> StoreResult<()> {
        self.check_failure(path)?;
        {
            let mut root = self.root.lock().unwrap();
            let (parent, key) = Self::parent_object(&mut root, path)?;
            let target = parent
                .entry(key)
                .or_insert_with(|| Value::Object(Map::new()));
            let map = target
                .as_object_mut()
                .ok_or_else(|| StoreError::InvalidPath(path.as_str().to_string()))?;
            for (field, value) in fields {
                if value.is_null() {
                    map.remove(&field);
                } else {
                    map.insert(field, value);
                }
            }
        }
        debug!(%path, "merge");
        self.notify(path);
        Ok(())
    }

    async fn remove(&self, path: &StorePath) -> StoreResult<()> {
        self.check_failure(path)?;
        let removed = {
            let mut root = self.root.lock().unwrap();
            let (parent, key) = Self::parent_object(&mut root, path)?;
            parent.remove(&key).is_some()
        };
        if removed {
            debug!(%path, "remove");
            self.notify(path);
        }
        Ok(())
    }

    async fn subscribe(&self, path: &StorePath) -> StoreResult<StoreSubscription> {
        self.check_failure(path)?;
        let (tx, rx) = mpsc::unbounded_channel();
        let id = self.next_sub_id.fetch_add(1, Ordering::Relaxed);

        // Initial snapshot fires before any later mutation can be observed.
        let _ = tx.send(Ok(self.snapshot(path)));
        self.subscribers.lock().unwrap().push(Subscriber {
            id,
            path: path.clone(),
            tx,
        });

        let subscribers = Arc::clone(&self.subscribers);
        let guard = SubscriptionGuard::new(move || {
            subscribers.lock().unwrap().retain(|s| s.id != id);
        });
        Ok(StoreSubscription::new(rx, guard))
    }

    fn generate_child_key(&self, _parent: &StorePath) -> String {
        Uuid::now_v7().to_string()
    }
}
