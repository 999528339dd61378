//! The mirror step: propagating a private-deck change to its gallery entry.
//!
//! Every mirrored mutation is two-phase: the private write happens (and is
//! reported) first, then the same fields are merged onto the gallery entry
//! iff the deck is shared and the acting actor created it. A mirror failure
//! is surfaced to the caller and the private write stands — no rollback, no
//! engine-side retry. The stores are transiently inconsistent until the next
//! successful mirrored write re-merges the same fields.

use crate::{EngineError, EngineResult};
use deckshare_store::{DocumentStore, StorePath};
use deckshare_types::{Actor, Deck};
use serde_json::{Map, Value};
use tracing::debug;

/// Outcome of a mirror step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MirrorStatus {
    /// The deck is not shared, or the actor is not its creator: the gallery
    /// was not touched.
    Skipped,
    /// The fields were merged onto the gallery entry.
    Applied,
}

/// Merges `fields` onto the gallery entry of `deck`, if the deck is shared
/// and `actor` created it.
///
/// `deck` must be the snapshot the private write was computed from; the
/// decision re-reads nothing, which bounds the share-toggle race window to a
/// single read-compute-write sequence.
pub async fn mirror_fields(
    store: &dyn DocumentStore,
    deck: &Deck,
    actor: &Actor,
    fields: Map<String, Value>,
) -> EngineResult<MirrorStatus> {
    if !deck.is_shared || !deck.is_owned_by(&actor.id) {
        return Ok(MirrorStatus::Skipped);
    }
    store
        .merge(&StorePath::gallery_deck(&deck.id), fields)
        .await
        .map_err(EngineError::StoreUnavailable)?;
    debug!(deck = %deck.id, "mirrored fields to gallery");
    Ok(MirrorStatus::Applied)
}
