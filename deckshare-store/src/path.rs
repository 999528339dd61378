//! Store path addressing.

use deckshare_types::{ActorId, DeckId};
use std::fmt;

/// A slash-separated path into the document tree.
///
/// Only the three shapes the engine uses have constructors; arbitrary paths
/// can still be built with [`StorePath::child`] where a backend needs them.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StorePath(String);

impl StorePath {
    /// `users/{actor}/decks` — the actor's private deck collection.
    #[must_use]
    pub fn private_decks(actor: &ActorId) -> Self {
        Self(format!("users/{}/decks", actor))
    }

    /// `users/{actor}/decks/{deck}` — a single private deck.
    #[must_use]
    pub fn private_deck(actor: &ActorId, deck: &DeckId) -> Self {
        Self(format!("users/{}/decks/{}", actor, deck))
    }

    /// `decks/{deck}` — a public gallery entry.
    #[must_use]
    pub fn gallery_deck(deck: &DeckId) -> Self {
        Self(format!("decks/{}", deck))
    }

    /// `decks` — the whole public gallery namespace.
    #[must_use]
    pub fn gallery() -> Self {
        Self("decks".to_string())
    }

    /// Appends a key segment.
    #[must_use]
    pub fn child(&self, key: &str) -> Self {
        Self(format!("{}/{}", self.0, key))
    }

    /// The path's segments, in order.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('/')
    }

    /// Whether `self` addresses `other` or one of its ancestors/descendants.
    /// A listener at one path observes mutations at any related path.
    #[must_use]
    pub fn overlaps(&self, other: &StorePath) -> bool {
        let a = self.as_str();
        let b = other.as_str();
        a == b
            || (a.len() < b.len() && b.starts_with(a) && b.as_bytes()[a.len()] == b'/')
            || (b.len() < a.len() && a.starts_with(b) && a.as_bytes()[b.len()] == b'/')
    }

    /// Returns the path as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StorePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
