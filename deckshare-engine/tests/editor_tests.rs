mod common;

use common::*;
use deckshare_engine::EngineError;
use deckshare_store::StorePath;
use pretty_assertions::{assert_eq, assert_ne};
use serde_json::json;

#[tokio::test]
async fn card_mutations_require_actor() {
    let h = harness();
    let deck_id = "d1".into();
    let card_id = "c1".into();

    assert!(matches!(
        h.editor.add_card(None, &deck_id, fields(&[])).await.unwrap_err(),
        EngineError::Unauthenticated
    ));
    assert!(matches!(
        h.editor
            .update_card(None, &deck_id, &card_id, fields(&[]))
            .await
            .unwrap_err(),
        EngineError::Unauthenticated
    ));
    assert!(matches!(
        h.editor.delete_card(None, &deck_id, &card_id).await.unwrap_err(),
        EngineError::Unauthenticated
    ));
}

#[tokio::test]
async fn missing_deck_is_not_found() {
    let h = harness();
    let actor = alice();
    let err = h
        .editor
        .add_card(Some(&actor), &"nope".into(), fields(&[("term", json!("x"))]))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::NotFound(_)));
}

#[tokio::test]
async fn missing_card_is_not_found() {
    let h = harness();
    let actor = alice();
    let deck = h.repo.create(Some(&actor), "x", false).await.unwrap();

    assert!(matches!(
        h.editor
            .update_card(Some(&actor), &deck.id, &"ghost".into(), fields(&[]))
            .await
            .unwrap_err(),
        EngineError::NotFound(_)
    ));
    assert!(matches!(
        h.editor
            .delete_card(Some(&actor), &deck.id, &"ghost".into())
            .await
            .unwrap_err(),
        EngineError::NotFound(_)
    ));
}

// ── add ───────────────────────────────────────────────────────────

#[tokio::test]
async fn add_card_appends_with_fresh_id() {
    let h = harness();
    let actor = alice();
    let deck = h.repo.create(Some(&actor), "x", false).await.unwrap();

    let card = h
        .editor
        .add_card(
            Some(&actor),
            &deck.id,
            fields(&[("term", json!("hola")), ("definition", json!("hello"))]),
        )
        .await
        .unwrap();

    assert!(!card.is_known);
    assert!(card.updated_at.is_none());
    assert_eq!(card.payload.get("term"), Some(&json!("hola")));

    let record = private_record(&h.store, &actor.id, &deck.id).await.unwrap();
    let cards = record["cards"].as_array().unwrap();
    assert_eq!(cards.len(), 1);
    assert_eq!(cards[0].get("id"), Some(&json!(card.id.as_str())));
    assert_eq!(cards[0].get("definition"), Some(&json!("hello")));
}

#[tokio::test]
async fn add_card_ignores_caller_supplied_identity() {
    let h = harness();
    let actor = alice();
    let deck = h.repo.create(Some(&actor), "x", false).await.unwrap();

    let card = h
        .editor
        .add_card(
            Some(&actor),
            &deck.id,
            fields(&[("id", json!("mine")), ("createdAt", json!("1999-01-01T00:00:00Z"))]),
        )
        .await
        .unwrap();

    assert_ne!(card.id.as_str(), "mine");
    assert!(card.payload.get("id").is_none());
    assert!(card.payload.get("createdAt").is_none());
}

#[tokio::test]
async fn add_preserves_existing_cards() {
    let h = harness();
    let actor = alice();
    let deck = h.repo.create(Some(&actor), "x", false).await.unwrap();

    let first = h
        .editor
        .add_card(Some(&actor), &deck.id, fields(&[("term", json!("uno"))]))
        .await
        .unwrap();
    let second = h
        .editor
        .add_card(Some(&actor), &deck.id, fields(&[("term", json!("dos"))]))
        .await
        .unwrap();

    let record = private_record(&h.store, &actor.id, &deck.id).await.unwrap();
    let cards = record["cards"].as_array().unwrap();
    assert_eq!(cards.len(), 2);
    assert_eq!(cards[0]["id"], json!(first.id.as_str()));
    assert_eq!(cards[1]["id"], json!(second.id.as_str()));
}

// ── update ────────────────────────────────────────────────────────

#[tokio::test]
async fn update_card_flips_progress_and_stamps_time() {
    let h = harness();
    let actor = alice();
    let deck = h.repo.create(Some(&actor), "x", false).await.unwrap();
    let card = h
        .editor
        .add_card(Some(&actor), &deck.id, fields(&[("term", json!("hola"))]))
        .await
        .unwrap();

    let updated = h
        .editor
        .update_card(
            Some(&actor),
            &deck.id,
            &card.id,
            fields(&[("isKnown", json!(true))]),
        )
        .await
        .unwrap();

    assert!(updated.is_known);
    assert!(updated.updated_at.is_some());
    // Untouched payload survives the patch.
    assert_eq!(updated.payload.get("term"), Some(&json!("hola")));

    let record = private_record(&h.store, &actor.id, &deck.id).await.unwrap();
    assert_eq!(record["cards"][0].get("isKnown"), Some(&json!(true)));
    assert!(record["cards"][0].get("updatedAt").is_some());
}

#[tokio::test]
async fn update_only_touches_the_named_card() {
    let h = harness();
    let actor = alice();
    let deck = h.repo.create(Some(&actor), "x", false).await.unwrap();
    let a = h
        .editor
        .add_card(Some(&actor), &deck.id, fields(&[("term", json!("uno"))]))
        .await
        .unwrap();
    h.editor
        .add_card(Some(&actor), &deck.id, fields(&[("term", json!("dos"))]))
        .await
        .unwrap();

    h.editor
        .update_card(Some(&actor), &deck.id, &a.id, fields(&[("term", json!("UNO"))]))
        .await
        .unwrap();

    let record = private_record(&h.store, &actor.id, &deck.id).await.unwrap();
    assert_eq!(record["cards"][0].get("term"), Some(&json!("UNO")));
    assert_eq!(record["cards"][1].get("term"), Some(&json!("dos")));
}

// ── delete ────────────────────────────────────────────────────────

#[tokio::test]
async fn add_then_delete_restores_the_sequence() {
    let h = harness();
    let actor = alice();
    let deck = h.repo.create(Some(&actor), "x", false).await.unwrap();
    let keeper = h
        .editor
        .add_card(Some(&actor), &deck.id, fields(&[("term", json!("uno"))]))
        .await
        .unwrap();

    let doomed = h
        .editor
        .add_card(Some(&actor), &deck.id, fields(&[("term", json!("dos"))]))
        .await
        .unwrap();
    assert!(h.editor.delete_card(Some(&actor), &deck.id, &doomed.id).await.unwrap());

    let record = private_record(&h.store, &actor.id, &deck.id).await.unwrap();
    let cards = record["cards"].as_array().unwrap();
    assert_eq!(cards.len(), 1);
    assert_eq!(cards[0]["id"], json!(keeper.id.as_str()));
}

// ── version counter ───────────────────────────────────────────────

#[tokio::test]
async fn every_mutation_bumps_the_version() {
    let h = harness();
    let actor = alice();
    let deck = h.repo.create(Some(&actor), "x", false).await.unwrap();

    let version = |record: serde_json::Value| record["version"].as_u64().unwrap();

    let card = h
        .editor
        .add_card(Some(&actor), &deck.id, fields(&[("term", json!("uno"))]))
        .await
        .unwrap();
    assert_eq!(version(private_record(&h.store, &actor.id, &deck.id).await.unwrap()), 1);

    h.editor
        .update_card(Some(&actor), &deck.id, &card.id, fields(&[("isKnown", json!(true))]))
        .await
        .unwrap();
    assert_eq!(version(private_record(&h.store, &actor.id, &deck.id).await.unwrap()), 2);

    h.editor.delete_card(Some(&actor), &deck.id, &card.id).await.unwrap();
    assert_eq!(version(private_record(&h.store, &actor.id, &deck.id).await.unwrap()), 3);
}

// ── gallery cascade ───────────────────────────────────────────────

#[tokio::test]
async fn shared_deck_mirrors_card_writes() {
    let h = harness();
    let actor = alice();
    let deck = h.repo.create(Some(&actor), "x", true).await.unwrap();

    let card = h
        .editor
        .add_card(Some(&actor), &deck.id, fields(&[("term", json!("hola"))]))
        .await
        .unwrap();

    let entry = gallery_record(&h.store, &deck.id).await.unwrap();
    let cards = entry["cards"].as_array().unwrap();
    assert_eq!(cards.len(), 1);
    assert_eq!(cards[0]["id"], json!(card.id.as_str()));
    assert_eq!(entry["version"], json!(1));
}

#[tokio::test]
async fn unshared_deck_does_not_mirror() {
    let h = harness();
    let actor = alice();
    let deck = h.repo.create(Some(&actor), "x", false).await.unwrap();

    h.editor
        .add_card(Some(&actor), &deck.id, fields(&[("term", json!("hola"))]))
        .await
        .unwrap();

    assert!(!gallery_exists(&h.store, &deck.id).await);
}

#[tokio::test]
async fn mirror_failure_keeps_private_write_then_heals() {
    let h = harness();
    let actor = alice();
    let deck = h.repo.create(Some(&actor), "x", true).await.unwrap();
    let gallery_path = StorePath::gallery_deck(&deck.id);

    h.store.fail_path(&gallery_path);
    let err = h
        .editor
        .add_card(Some(&actor), &deck.id, fields(&[("term", json!("uno"))]))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::StoreUnavailable(_)));

    // The private write landed before the mirror failed.
    let record = private_record(&h.store, &actor.id, &deck.id).await.unwrap();
    assert_eq!(record["cards"].as_array().unwrap().len(), 1);
    assert_eq!(record["version"], json!(1));
    // The gallery is stale: no cards yet.
    let entry = gallery_record(&h.store, &deck.id).await.unwrap();
    assert!(entry.get("cards").map_or(true, |c| c.as_array().is_none_or(Vec::is_empty)));

    // Once the path heals, the next card write carries the full sequence
    // and reconciles the mirror.
    h.store.heal_path(&gallery_path);
    h.editor
        .add_card(Some(&actor), &deck.id, fields(&[("term", json!("dos"))]))
        .await
        .unwrap();

    let entry = gallery_record(&h.store, &deck.id).await.unwrap();
    assert_eq!(entry["cards"].as_array().unwrap().len(), 2);
    assert_eq!(entry["version"], json!(2));
}
