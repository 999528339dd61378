use crate::{Actor, ActorId, Deck, DeckId};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The denormalized public mirror of a shared deck.
///
/// Keyed in the flat `decks/` namespace by the same id as its private origin.
/// Exists iff the origin's `is_shared` flag is true; it has no independent
/// lifecycle. `owner` and `owner_email` are gallery-only attribution fields
/// and never flow back onto a private record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GalleryEntry {
    #[serde(flatten)]
    pub deck: Deck,
    pub owner: ActorId,
    pub owner_email: String,
}

impl GalleryEntry {
    /// Builds the public copy written when `actor` shares `deck`.
    #[must_use]
    pub fn publish_of(deck: &Deck, actor: &Actor) -> Self {
        let mut copy = deck.clone();
        copy.is_shared = true;
        Self {
            deck: copy,
            owner: actor.id.clone(),
            owner_email: actor.email.clone(),
        }
    }

    /// Decodes the flat `decks/` namespace into an ordered entry list,
    /// forcing each record's id to its mapping key.
    pub fn decode_gallery(value: &Value) -> Result<Vec<GalleryEntry>, serde_json::Error> {
        let Some(entries) = value.as_object() else {
            return Ok(Vec::new());
        };
        let mut gallery = Vec::with_capacity(entries.len());
        for (key, record) in entries {
            let mut entry: GalleryEntry = serde_json::from_value(record.clone())?;
            entry.deck.id = DeckId::from_key(key.as_str());
            gallery.push(entry);
        }
        Ok(gallery)
    }
}
