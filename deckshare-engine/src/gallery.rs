//! Gallery mirror — the public-copy lifecycle.
//!
//! A gallery entry exists iff its private origin is marked shared. The entry
//! has no create/delete entry points of its own: everything derives from
//! `is_shared` transitions driven here.

use crate::repository::load_private_deck;
use crate::{EngineError, EngineResult};
use deckshare_store::{DocumentStore, StorePath};
use deckshare_types::{Actor, DeckId, GalleryEntry};
use serde_json::{json, Map};
use std::sync::Arc;
use tracing::info;

/// Owns publish and unpublish of private decks to the shared gallery.
pub struct GalleryMirror {
    store: Arc<dyn DocumentStore>,
}

impl GalleryMirror {
    /// Creates a mirror over the given store.
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Sets (or toggles) a deck's shared flag and brings the gallery in step.
    ///
    /// The private record is read exactly once; the flag write, the gallery
    /// write and the returned state all derive from that single snapshot.
    /// With no `desired` argument the current flag is negated. Returns the
    /// new state.
    ///
    /// Fails with [`EngineError::ForkNotShareable`] — before any write — when
    /// the deck carries fork provenance: a fork can be studied but never
    /// re-published as if original.
    pub async fn set_shared(
        &self,
        actor: Option<&Actor>,
        deck_id: &DeckId,
        desired: Option<bool>,
    ) -> EngineResult<bool> {
        let actor = actor.ok_or(EngineError::Unauthenticated)?;
        let Some((path, deck)) = load_private_deck(self.store.as_ref(), actor, deck_id).await?
        else {
            return Err(EngineError::deck_not_found(deck_id));
        };

        if deck.forked_from.is_some() {
            return Err(EngineError::ForkNotShareable);
        }

        let target = desired.unwrap_or(!deck.is_shared);

        let mut flag = Map::new();
        flag.insert("isShared".to_string(), json!(target));
        self.store.merge(&path, flag).await?;

        let gallery_path = StorePath::gallery_deck(deck_id);
        if target {
            let entry = GalleryEntry::publish_of(&deck, actor);
            self.store
                .write(&gallery_path, serde_json::to_value(&entry)?)
                .await?;
            info!(actor = %actor.id, deck = %deck_id, "published deck to gallery");
        } else {
            self.store.remove(&gallery_path).await?;
            info!(actor = %actor.id, deck = %deck_id, "removed deck from gallery");
        }

        Ok(target)
    }

    /// Reads the whole public gallery, in mapping iteration order.
    pub async fn list_gallery(&self) -> EngineResult<Vec<GalleryEntry>> {
        match self.store.read(&StorePath::gallery()).await? {
            Some(value) => Ok(GalleryEntry::decode_gallery(&value)?),
            None => Ok(Vec::new()),
        }
    }

    /// Reads a single public deck. `Ok(None)` when nothing is published
    /// under that id.
    pub async fn gallery_entry(&self, deck_id: &DeckId) -> EngineResult<Option<GalleryEntry>> {
        match self.store.read(&StorePath::gallery_deck(deck_id)).await? {
            Some(value) => Ok(Some(serde_json::from_value(value)?)),
            None => Ok(None),
        }
    }
}
