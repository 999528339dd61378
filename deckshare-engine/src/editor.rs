//! Card editor — card-level CRUD inside a deck.
//!
//! The store has no ordered-list patch primitive, so every mutation is a
//! whole-sequence replace: read the deck, mutate the card vector in memory,
//! write the vector back, mirror when applicable. Concurrent card mutations
//! on one deck can lose each other's writes; callers must not issue them.
//! The deck's version counter is bumped on every write so an interleaving
//! is at least detectable after the fact.

use crate::mirror::{mirror_fields, MirrorStatus};
use crate::repository::load_private_deck;
use crate::{EngineError, EngineResult};
use chrono::Utc;
use deckshare_store::{DocumentStore, StorePath};
use deckshare_types::{Actor, Card, CardId, Deck, DeckId};
use serde_json::{json, Map, Value};
use std::sync::Arc;
use tracing::info;

/// Owns card-level mutations, cascading to the gallery mirror when the deck
/// is shared.
pub struct CardEditor {
    store: Arc<dyn DocumentStore>,
}

impl CardEditor {
    /// Creates an editor over the given store.
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Appends a new card built from `payload` and returns it.
    ///
    /// The card id is freshly assigned and unique within the deck.
    pub async fn add_card(
        &self,
        actor: Option<&Actor>,
        deck_id: &DeckId,
        payload: Map<String, Value>,
    ) -> EngineResult<Card> {
        let actor = actor.ok_or(EngineError::Unauthenticated)?;
        let (path, mut deck) = self.require_deck(actor, deck_id).await?;

        let mut card = Card::from_payload(payload);
        while deck.has_card(&card.id) {
            card.id = CardId::new();
        }

        deck.cards.push(card.clone());
        deck.version += 1;
        self.write_cards(&path, &deck, actor).await?;

        info!(actor = %actor.id, deck = %deck_id, card = %card.id, "added card");
        Ok(card)
    }

    /// Merges partial fields into a card and stamps its update time.
    ///
    /// Returns the updated card. Fails with `NotFound` when no card in the
    /// deck carries `card_id`.
    pub async fn update_card(
        &self,
        actor: Option<&Actor>,
        deck_id: &DeckId,
        card_id: &CardId,
        patch: Map<String, Value>,
    ) -> EngineResult<Card> {
        let actor = actor.ok_or(EngineError::Unauthenticated)?;
        let (path, mut deck) = self.require_deck(actor, deck_id).await?;

        let card = deck
            .cards
            .iter_mut()
            .find(|c| c.id == *card_id)
            .ok_or_else(|| EngineError::card_not_found(card_id))?;
        card.apply_patch(patch);
        card.updated_at = Some(Utc::now());
        let updated = card.clone();

        deck.version += 1;
        self.write_cards(&path, &deck, actor).await?;

        info!(actor = %actor.id, deck = %deck_id, card = %card_id, "updated card");
        Ok(updated)
    }

    /// Removes a card by id.
    ///
    /// Fails with `NotFound` when the filtered sequence is unchanged, i.e.
    /// the card did not exist.
    pub async fn delete_card(
        &self,
        actor: Option<&Actor>,
        deck_id: &DeckId,
        card_id: &CardId,
    ) -> EngineResult<bool> {
        let actor = actor.ok_or(EngineError::Unauthenticated)?;
        let (path, mut deck) = self.require_deck(actor, deck_id).await?;

        let before = deck.cards.len();
        deck.cards.retain(|c| c.id != *card_id);
        if deck.cards.len() == before {
            return Err(EngineError::card_not_found(card_id));
        }

        deck.version += 1;
        self.write_cards(&path, &deck, actor).await?;

        info!(actor = %actor.id, deck = %deck_id, card = %card_id, "deleted card");
        Ok(true)
    }

    async fn require_deck(
        &self,
        actor: &Actor,
        deck_id: &DeckId,
    ) -> EngineResult<(StorePath, Deck)> {
        load_private_deck(self.store.as_ref(), actor, deck_id)
            .await?
            .ok_or_else(|| EngineError::deck_not_found(deck_id))
    }

    /// Writes the full card sequence (and version) back: private record
    /// first, then the gallery mirror when shared and creator-owned.
    async fn write_cards(
        &self,
        path: &StorePath,
        deck: &Deck,
        actor: &Actor,
    ) -> EngineResult<MirrorStatus> {
        let mut fields = Map::new();
        fields.insert("cards".to_string(), serde_json::to_value(&deck.cards)?);
        fields.insert("version".to_string(), json!(deck.version));

        self.store.merge(path, fields.clone()).await?;
        mirror_fields(self.store.as_ref(), deck, actor, fields).await
    }
}
