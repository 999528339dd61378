//! Shared test harness: an in-memory store, a session, and the four engine
//! components wired together.

#![allow(dead_code)]

use deckshare_engine::{CardEditor, DeckRepository, ForkEngine, GalleryMirror};
use deckshare_identity::Session;
use deckshare_store::memory::MemoryStore;
use deckshare_store::{DocumentStore, StorePath};
use deckshare_types::{Actor, ActorId, DeckId};
use serde_json::{Map, Value};
use std::sync::Arc;

pub struct Harness {
    pub store: Arc<MemoryStore>,
    pub session: Session,
    pub repo: DeckRepository,
    pub gallery: GalleryMirror,
    pub forks: ForkEngine,
    pub editor: CardEditor,
}

pub fn harness() -> Harness {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();

    let store = Arc::new(MemoryStore::new());
    let session = Session::signed_out();
    let seam: Arc<dyn DocumentStore> = store.clone();
    Harness {
        repo: DeckRepository::new(Arc::clone(&seam), Arc::new(session.clone())),
        gallery: GalleryMirror::new(Arc::clone(&seam)),
        forks: ForkEngine::new(Arc::clone(&seam)),
        editor: CardEditor::new(seam),
        store,
        session,
    }
}

pub fn alice() -> Actor {
    Actor::new("a1", "alice@example.com").with_display_name("Alice")
}

pub fn bob() -> Actor {
    Actor::new("a2", "bob@example.com")
}

pub fn fields(entries: &[(&str, Value)]) -> Map<String, Value> {
    entries
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect()
}

/// Raw private record, straight from the store.
pub async fn private_record(store: &MemoryStore, actor: &ActorId, deck: &DeckId) -> Option<Value> {
    store
        .read(&StorePath::private_deck(actor, deck))
        .await
        .unwrap()
}

/// Raw gallery record, straight from the store.
pub async fn gallery_record(store: &MemoryStore, deck: &DeckId) -> Option<Value> {
    store.read(&StorePath::gallery_deck(deck)).await.unwrap()
}

pub async fn gallery_exists(store: &MemoryStore, deck: &DeckId) -> bool {
    gallery_record(store, deck).await.is_some()
}
