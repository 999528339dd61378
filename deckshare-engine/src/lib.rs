//! Deck replication and fork engine for DeckShare.
//!
//! Keeps a user's private deck collection and its public gallery mirror
//! consistent across two loosely-coupled store paths, and creates forks of
//! published decks with clean provenance.
//!
//! # Components
//!
//! - **Repository**: CRUD and live subscription for one actor's private decks
//! - **Gallery**: publish/unpublish and the shared-iff-mirrored invariant
//! - **Fork**: gallery → private copy, provenance attached, progress reset
//! - **Editor**: card-level CRUD with whole-sequence replace
//! - **Mirror**: the explicit private-then-gallery two-phase write step
//!
//! Every operation takes the acting identity explicitly; there is no ambient
//! current-user state inside the engine. Mirrored writes report the private
//! write first and never roll it back if the gallery write fails — see
//! [`mirror`] for the policy.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use deckshare_engine::DeckRepository;
//! use deckshare_identity::{IdentityProvider, Session};
//! use deckshare_store::memory::MemoryStore;
//! use deckshare_types::Actor;
//!
//! # async fn demo() -> Result<(), deckshare_engine::EngineError> {
//! let store = Arc::new(MemoryStore::new());
//! let session = Session::signed_in(Actor::new("a1", "a1@example.com"));
//! let repo = DeckRepository::new(store, Arc::new(session.clone()));
//!
//! let actor = session.current_actor();
//! let deck = repo.create(actor.as_ref(), "Spanish 101", false).await?;
//! # let _ = deck;
//! # Ok(())
//! # }
//! ```

mod editor;
mod error;
mod fork;
mod gallery;
pub mod mirror;
mod repository;

pub use editor::CardEditor;
pub use error::{EngineError, EngineResult};
pub use fork::ForkEngine;
pub use gallery::GalleryMirror;
pub use mirror::{mirror_fields, MirrorStatus};
pub use repository::{DeckEvent, DeckRepository, DeckStream};
