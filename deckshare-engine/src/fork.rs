//! Fork engine — gallery entry → new private deck.
//!
//! The one operation that crosses from the gallery back into a private
//! collection. It never writes to the gallery.

use crate::{EngineError, EngineResult};
use deckshare_store::{DocumentStore, StorePath};
use deckshare_types::{Actor, Card, Deck, DeckId, ForkProvenance, GalleryEntry};
use chrono::Utc;
use std::sync::Arc;
use tracing::info;

/// Creates private forks of published decks.
pub struct ForkEngine {
    store: Arc<dyn DocumentStore>,
}

impl ForkEngine {
    /// Creates a fork engine over the given store.
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Forks a published deck into the actor's private collection.
    ///
    /// The new deck copies the gallery entry's fields, then overwrites
    /// identity and provenance: fresh id, creation time now, the forking
    /// actor as creator, `is_shared` false, a provenance record pointing at
    /// the source, and the entry's owner as `original_creator`. The
    /// gallery-only `owner`/`ownerEmail` attributions are stripped. Every
    /// card is copied bit-for-bit except learner progress, which resets.
    pub async fn fork(&self, actor: Option<&Actor>, source_id: &DeckId) -> EngineResult<Deck> {
        let actor = actor.ok_or(EngineError::Unauthenticated)?;

        let value = self
            .store
            .read(&StorePath::gallery_deck(source_id))
            .await?
            .ok_or_else(|| EngineError::deck_not_found(source_id))?;
        let entry: GalleryEntry = serde_json::from_value(value)?;
        let source = entry.deck;

        let collection = StorePath::private_decks(&actor.id);
        let id = DeckId::from_key(self.store.generate_child_key(&collection));

        let deck = Deck {
            id: id.clone(),
            name: format!("{} (Forked)", source.name),
            created_at: Utc::now(),
            creator_id: actor.id.clone(),
            is_shared: false,
            cards: source.cards.iter().map(Card::forgotten).collect(),
            forked_from: Some(ForkProvenance {
                id: source.id.clone(),
                name: source.name.clone(),
                creator_id: source.creator_id.clone(),
            }),
            creator_name: Some(actor.attribution_name().to_string()),
            original_creator: Some(entry.owner.clone()),
            version: 0,
        };

        self.store
            .write(
                &StorePath::private_deck(&actor.id, &id),
                serde_json::to_value(&deck)?,
            )
            .await?;

        info!(actor = %actor.id, source = %source_id, fork = %id, "forked deck");
        Ok(deck)
    }
}
