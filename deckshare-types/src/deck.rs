use crate::{ActorId, Card, CardId, DeckId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Provenance pointer carried by a forked deck.
///
/// Records where the copy came from; a deck carrying one can be studied but
/// never re-published as if original.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForkProvenance {
    pub id: DeckId,
    pub name: String,
    pub creator_id: ActorId,
}

/// A named, ordered collection of cards owned by exactly one actor's private
/// collection.
///
/// `is_shared` is the single source of truth for the public mirror: a gallery
/// entry keyed by `id` exists iff the flag is true.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Deck {
    pub id: DeckId,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub creator_id: ActorId,
    #[serde(default)]
    pub is_shared: bool,
    #[serde(default)]
    pub cards: Vec<Card>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub forked_from: Option<ForkProvenance>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creator_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_creator: Option<ActorId>,
    /// Bumped by every card-sequence write. Lets concurrent whole-sequence
    /// replacements be detected after the fact; the engine does not
    /// serialize them.
    #[serde(default)]
    pub version: u64,
}

impl Deck {
    /// Creates an empty deck owned by `creator_id`.
    #[must_use]
    pub fn new(id: DeckId, name: impl Into<String>, creator_id: ActorId, is_shared: bool) -> Self {
        Self {
            id,
            name: name.into(),
            created_at: Utc::now(),
            creator_id,
            is_shared,
            cards: Vec::new(),
            forked_from: None,
            creator_name: None,
            original_creator: None,
            version: 0,
        }
    }

    /// Whether `actor_id` created this private record.
    #[must_use]
    pub fn is_owned_by(&self, actor_id: &ActorId) -> bool {
        self.creator_id == *actor_id
    }

    /// Finds a card by id.
    #[must_use]
    pub fn card(&self, card_id: &CardId) -> Option<&Card> {
        self.cards.iter().find(|c| c.id == *card_id)
    }

    /// Whether a card id is already taken in this deck.
    #[must_use]
    pub fn has_card(&self, card_id: &CardId) -> bool {
        self.card(card_id).is_some()
    }

    /// Decodes the `users/{actor}/decks` mapping into an ordered deck list.
    ///
    /// Mapping insertion order is preserved for iteration but carries no
    /// meaning beyond that. Each record's `id` is forced to its mapping key,
    /// so a stale embedded id can never shadow the key identity.
    pub fn decode_collection(value: &Value) -> Result<Vec<Deck>, serde_json::Error> {
        let Some(entries) = value.as_object() else {
            return Ok(Vec::new());
        };
        let mut decks = Vec::with_capacity(entries.len());
        for (key, record) in entries {
            let mut deck: Deck = serde_json::from_value(record.clone())?;
            deck.id = DeckId::from_key(key.as_str());
            decks.push(deck);
        }
        Ok(decks)
    }
}
