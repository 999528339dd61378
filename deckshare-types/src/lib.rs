//! Core type definitions for DeckShare.
//!
//! A *deck* is a named, ordered collection of flashcards owned privately by
//! one actor. A shared deck has a denormalized public mirror (a *gallery
//! entry*) keyed by the same id. These types are the vocabulary shared by the
//! store seam and the replication engine; they carry no I/O.
//!
//! Documents in the store are schemaless JSON, so the card payload (term,
//! definition, whatever the UI adds) stays an opaque field map — the engine
//! only understands the fields it replicates.

mod actor;
mod card;
mod deck;
mod gallery;
mod ids;

pub use actor::Actor;
pub use card::Card;
pub use deck::{Deck, ForkProvenance};
pub use gallery::GalleryEntry;
pub use ids::{ActorId, CardId, DeckId};
