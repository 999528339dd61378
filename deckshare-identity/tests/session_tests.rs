use deckshare_identity::{IdentityProvider, Session};
use deckshare_types::{Actor, ActorId};

fn alice() -> Actor {
    Actor::new("a1", "alice@example.com").with_display_name("Alice")
}

#[test]
fn signed_out_session_has_no_actor() {
    let session = Session::signed_out();
    assert!(session.current_actor().is_none());
}

#[test]
fn signed_in_session_exposes_actor() {
    let session = Session::signed_in(alice());
    let actor = session.current_actor().unwrap();
    assert_eq!(actor.id, ActorId::from("a1"));
}

#[test]
fn sign_in_then_out_transitions() {
    let session = Session::signed_out();
    session.sign_in(alice());
    assert!(session.current_actor().is_some());
    session.sign_out();
    assert!(session.current_actor().is_none());
}

#[test]
fn clones_share_identity_state() {
    let session = Session::signed_out();
    let view = session.clone();
    session.sign_in(alice());
    assert!(view.current_actor().is_some());
}

#[tokio::test]
async fn watch_observes_transitions() {
    let session = Session::signed_out();
    let mut rx = session.watch();
    assert!(rx.borrow().is_none());

    session.sign_in(alice());
    rx.changed().await.unwrap();
    assert_eq!(
        rx.borrow().as_ref().map(|a| a.id.clone()),
        Some(ActorId::from("a1"))
    );

    session.sign_out();
    rx.changed().await.unwrap();
    assert!(rx.borrow().is_none());
}

#[test]
fn switching_actors_replaces_identity() {
    let session = Session::signed_in(alice());
    session.sign_in(Actor::new("a2", "bob@example.com"));
    assert_eq!(session.current_actor().unwrap().id, ActorId::from("a2"));
}
