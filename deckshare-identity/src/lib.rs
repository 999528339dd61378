//! Identity provider seam for DeckShare.
//!
//! The engine never reads ambient global state to find out who is acting:
//! every operation takes the actor explicitly. The provider exists for the
//! one place that genuinely needs *current* identity — the live deck
//! subscription, which must discard deliveries that arrive after the actor
//! has signed out.

use deckshare_types::Actor;
use std::sync::Arc;
use tokio::sync::watch;

/// Supplies the current actor and a subscription to actor-change events.
///
/// Single-writer (the auth layer), multi-reader (every engine component).
pub trait IdentityProvider: Send + Sync {
    /// The currently signed-in actor, if any.
    fn current_actor(&self) -> Option<Actor>;

    /// A receiver that observes every sign-in/sign-out transition.
    fn watch(&self) -> watch::Receiver<Option<Actor>>;
}

/// A watch-channel-backed identity provider.
///
/// The auth layer holds the [`Session`] and flips it on sign-in/sign-out;
/// engine components hold it as `Arc<dyn IdentityProvider>`.
#[derive(Clone)]
pub struct Session {
    tx: Arc<watch::Sender<Option<Actor>>>,
}

impl Session {
    /// Creates a signed-out session.
    #[must_use]
    pub fn signed_out() -> Self {
        let (tx, _rx) = watch::channel(None);
        Self { tx: Arc::new(tx) }
    }

    /// Creates a session already signed in as `actor`.
    #[must_use]
    pub fn signed_in(actor: Actor) -> Self {
        let (tx, _rx) = watch::channel(Some(actor));
        Self { tx: Arc::new(tx) }
    }

    /// Signs an actor in, replacing any previous identity.
    pub fn sign_in(&self, actor: Actor) {
        self.tx.send_replace(Some(actor));
    }

    /// Signs the current actor out.
    pub fn sign_out(&self) {
        self.tx.send_replace(None);
    }
}

impl IdentityProvider for Session {
    fn current_actor(&self) -> Option<Actor> {
        self.tx.borrow().clone()
    }

    fn watch(&self) -> watch::Receiver<Option<Actor>> {
        self.tx.subscribe()
    }
}
