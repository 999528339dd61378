use crate::CardId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A single flashcard, embedded in exactly one deck.
///
/// The engine replicates cards but does not interpret their content: term,
/// definition and any other UI fields live in the flattened `payload` map.
/// Only `isKnown` (learner progress, reset on fork) and the timestamps are
/// typed out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub id: CardId,
    #[serde(default)]
    pub is_known: bool,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub payload: Map<String, Value>,
}

impl Card {
    /// Builds a new card from a caller-supplied payload, assigning a fresh
    /// time-ordered id and stamping the creation time.
    ///
    /// An `isKnown` boolean in the payload seeds the typed flag; `id`,
    /// `createdAt` and `updatedAt` keys are dropped — those fields belong to
    /// the engine, not the caller.
    #[must_use]
    pub fn from_payload(mut payload: Map<String, Value>) -> Self {
        let is_known = payload
            .remove("isKnown")
            .and_then(|v| v.as_bool())
            .unwrap_or(false);
        payload.remove("id");
        payload.remove("createdAt");
        payload.remove("updatedAt");

        Self {
            id: CardId::new(),
            is_known,
            created_at: Utc::now(),
            updated_at: None,
            payload,
        }
    }

    /// Shallow-merges a partial update into this card.
    ///
    /// `isKnown` routes to the typed flag; `id` and `createdAt` are immutable
    /// and ignored; `updatedAt` is stamped by the editor, not the patch. A
    /// `null` value removes the payload field, matching the store's merge
    /// semantics.
    pub fn apply_patch(&mut self, patch: Map<String, Value>) {
        for (key, value) in patch {
            match key.as_str() {
                "isKnown" => {
                    if let Some(flag) = value.as_bool() {
                        self.is_known = flag;
                    }
                }
                "id" | "createdAt" | "updatedAt" => {}
                _ => {
                    if value.is_null() {
                        self.payload.remove(&key);
                    } else {
                        self.payload.insert(key, value);
                    }
                }
            }
        }
    }

    /// Returns the copy a fork receives: identical bytes except learner
    /// progress, which starts over.
    #[must_use]
    pub fn forgotten(&self) -> Self {
        let mut copy = self.clone();
        copy.is_known = false;
        copy
    }
}
