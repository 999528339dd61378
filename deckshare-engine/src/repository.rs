//! Deck repository — CRUD and live subscription for one actor's private
//! collection.

use crate::mirror::mirror_fields;
use crate::{EngineError, EngineResult};
use deckshare_identity::IdentityProvider;
use deckshare_store::{DocumentStore, StorePath};
use deckshare_types::{Actor, Deck, DeckId, GalleryEntry};
use serde_json::{Map, Value};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Reads and decodes a private deck record. `Ok(None)` when absent.
pub(crate) async fn load_private_deck(
    store: &dyn DocumentStore,
    actor: &Actor,
    deck_id: &DeckId,
) -> EngineResult<Option<(StorePath, Deck)>> {
    let path = StorePath::private_deck(&actor.id, deck_id);
    match store.read(&path).await? {
        Some(value) => {
            let deck: Deck = serde_json::from_value(value)?;
            Ok(Some((path, deck)))
        }
        None => Ok(None),
    }
}

/// One delivery from the live deck subscription.
#[derive(Debug)]
pub enum DeckEvent {
    /// The actor's decks, in mapping iteration order.
    Decks(Vec<Deck>),
    /// The upstream read failed while the actor was still signed in.
    Failed(EngineError),
}

/// A live view over one actor's deck collection.
///
/// Dropping the stream tears down the underlying store listener.
pub struct DeckStream {
    rx: mpsc::UnboundedReceiver<DeckEvent>,
    forwarder: Option<JoinHandle<()>>,
}

impl DeckStream {
    /// Receives the next delivery. `None` means the stream has ended.
    pub async fn recv(&mut self) -> Option<DeckEvent> {
        self.rx.recv().await
    }
}

impl Drop for DeckStream {
    fn drop(&mut self) {
        if let Some(task) = self.forwarder.take() {
            task.abort();
        }
    }
}

/// Owns CRUD and subscription for a single actor's private deck collection.
pub struct DeckRepository {
    store: Arc<dyn DocumentStore>,
    identity: Arc<dyn IdentityProvider>,
}

impl DeckRepository {
    /// Creates a repository over the given store and identity provider.
    ///
    /// The provider is consulted only at subscription delivery time, to
    /// discard events that arrive after sign-out; every operation still takes
    /// its actor explicitly.
    pub fn new(store: Arc<dyn DocumentStore>, identity: Arc<dyn IdentityProvider>) -> Self {
        Self { store, identity }
    }

    /// Establishes a live subscription over the actor's deck collection.
    ///
    /// An unauthenticated caller gets a single clean empty delivery and no
    /// error. Deliveries are re-checked against the *current* identity:
    /// snapshots for a signed-out or switched actor are discarded, and a late
    /// upstream error after sign-out is converted to a clean empty state
    /// instead of surfacing.
    pub async fn subscribe(&self, actor: Option<&Actor>) -> EngineResult<DeckStream> {
        let (tx, rx) = mpsc::unbounded_channel();

        let Some(actor) = actor else {
            debug!("subscribe without actor: delivering empty collection");
            let _ = tx.send(DeckEvent::Decks(Vec::new()));
            return Ok(DeckStream {
                rx,
                forwarder: None,
            });
        };

        let mut sub = self
            .store
            .subscribe(&StorePath::private_decks(&actor.id))
            .await?;
        let identity = Arc::clone(&self.identity);
        let subscribed_id = actor.id.clone();

        let forwarder = tokio::spawn(async move {
            while let Some(event) = sub.recv().await {
                let still_current = identity
                    .current_actor()
                    .is_some_and(|a| a.id == subscribed_id);

                match event {
                    Ok(snapshot) => {
                        if !still_current {
                            // Delayed delivery after sign-out: applying it
                            // would resurrect stale decks into view.
                            debug!(actor = %subscribed_id, "discarding stale deck delivery");
                            continue;
                        }
                        let value = snapshot.unwrap_or_else(|| Value::Object(Map::new()));
                        let delivery = match Deck::decode_collection(&value) {
                            Ok(decks) => DeckEvent::Decks(decks),
                            Err(err) => {
                                warn!(actor = %subscribed_id, %err, "deck collection failed to decode");
                                DeckEvent::Failed(EngineError::Decode(err))
                            }
                        };
                        if tx.send(delivery).is_err() {
                            break;
                        }
                    }
                    Err(err) => {
                        if !still_current {
                            // Errors racing a sign-out are swallowed into a
                            // clean empty state, never surfaced.
                            debug!(actor = %subscribed_id, %err, "suppressing post-sign-out store error");
                            let _ = tx.send(DeckEvent::Decks(Vec::new()));
                            continue;
                        }
                        warn!(actor = %subscribed_id, %err, "deck subscription error");
                        if tx
                            .send(DeckEvent::Failed(EngineError::StoreUnavailable(err)))
                            .is_err()
                        {
                            break;
                        }
                    }
                }
            }
        });

        Ok(DeckStream {
            rx,
            forwarder: Some(forwarder),
        })
    }

    /// Creates an empty deck and writes it to the actor's collection.
    ///
    /// A deck born shared is published in the same operation, so the
    /// shared-iff-mirrored invariant holds after create settles.
    pub async fn create(
        &self,
        actor: Option<&Actor>,
        name: impl Into<String>,
        is_shared: bool,
    ) -> EngineResult<Deck> {
        let actor = actor.ok_or(EngineError::Unauthenticated)?;
        let collection = StorePath::private_decks(&actor.id);
        let id = DeckId::from_key(self.store.generate_child_key(&collection));
        let deck = Deck::new(id.clone(), name, actor.id.clone(), is_shared);

        let path = StorePath::private_deck(&actor.id, &id);
        self.store.write(&path, serde_json::to_value(&deck)?).await?;

        if is_shared {
            let entry = GalleryEntry::publish_of(&deck, actor);
            self.store
                .write(&StorePath::gallery_deck(&id), serde_json::to_value(&entry)?)
                .await?;
        }

        info!(actor = %actor.id, deck = %id, shared = is_shared, "created deck");
        Ok(deck)
    }

    /// Deletes a private deck, removing its gallery entry first when the deck
    /// is shared and creator-owned.
    ///
    /// Returns `Ok(false)` — not an error — if the private record does not
    /// exist.
    pub async fn delete(&self, actor: Option<&Actor>, deck_id: &DeckId) -> EngineResult<bool> {
        let actor = actor.ok_or(EngineError::Unauthenticated)?;
        let Some((path, deck)) = load_private_deck(self.store.as_ref(), actor, deck_id).await?
        else {
            debug!(actor = %actor.id, deck = %deck_id, "delete: deck not present");
            return Ok(false);
        };

        // Gallery first: a crash between the two removals must not leave an
        // orphan entry whose private origin is already gone.
        if deck.is_shared && deck.is_owned_by(&actor.id) {
            self.store.remove(&StorePath::gallery_deck(deck_id)).await?;
        }
        self.store.remove(&path).await?;

        info!(actor = %actor.id, deck = %deck_id, "deleted deck");
        Ok(true)
    }

    /// Merges partial fields into a private deck and mirrors the same merge
    /// onto its gallery entry when shared and creator-owned.
    ///
    /// `id`, `createdAt` and `creatorId` are immutable and dropped from the
    /// patch. `isShared` and `forkedFrom` are dropped too: the gallery
    /// lifecycle belongs to [`crate::GalleryMirror::set_shared`] and fork
    /// provenance to [`crate::ForkEngine::fork`] — patching them here would
    /// orphan a gallery entry or launder a fork into something publishable.
    pub async fn update(
        &self,
        actor: Option<&Actor>,
        deck_id: &DeckId,
        mut fields: Map<String, Value>,
    ) -> EngineResult<bool> {
        let actor = actor.ok_or(EngineError::Unauthenticated)?;
        let Some((path, deck)) = load_private_deck(self.store.as_ref(), actor, deck_id).await?
        else {
            return Err(EngineError::deck_not_found(deck_id));
        };

        fields.remove("id");
        fields.remove("createdAt");
        fields.remove("creatorId");
        fields.remove("isShared");
        fields.remove("forkedFrom");
        if fields.is_empty() {
            return Ok(true);
        }

        self.store.merge(&path, fields.clone()).await?;
        mirror_fields(self.store.as_ref(), &deck, actor, fields).await?;

        info!(actor = %actor.id, deck = %deck_id, "updated deck");
        Ok(true)
    }
}
