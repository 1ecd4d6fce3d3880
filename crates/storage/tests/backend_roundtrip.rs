use deck_core::model::{Card, CardDraft};
use storage::{decode_deck, encode_deck, DeckBackend, JsonFileBackend, PrefsBackend};

fn build_deck() -> Vec<Card> {
    ["In which year was SwiftUI released?", "Who wrote Dune?", "6 * 7?"]
        .iter()
        .zip(["2019", "Frank Herbert", "42"])
        .map(|(prompt, answer)| {
            CardDraft::new(*prompt, answer)
                .validate()
                .unwrap()
                .assign_fresh_id()
        })
        .collect()
}

#[tokio::test]
async fn json_file_roundtrip_preserves_deck() {
    let dir = tempfile::tempdir().unwrap();
    let backend = JsonFileBackend::new(dir.path().join("cards.json")).unwrap();

    let deck = build_deck();
    backend.save(&encode_deck(&deck).unwrap()).await.unwrap();

    let bytes = backend.load().await.unwrap().expect("payload saved");
    assert_eq!(decode_deck(&bytes).unwrap(), deck);
}

#[tokio::test]
async fn prefs_roundtrip_preserves_deck() {
    let backend = PrefsBackend::new();

    let deck = build_deck();
    backend.save(&encode_deck(&deck).unwrap()).await.unwrap();

    let bytes = backend.load().await.unwrap().expect("payload saved");
    assert_eq!(decode_deck(&bytes).unwrap(), deck);
}

#[tokio::test]
async fn resave_replaces_payload_wholesale() {
    let dir = tempfile::tempdir().unwrap();
    let backend = JsonFileBackend::new(dir.path().join("cards.json")).unwrap();

    let mut deck = build_deck();
    backend.save(&encode_deck(&deck).unwrap()).await.unwrap();

    deck.remove(1);
    backend.save(&encode_deck(&deck).unwrap()).await.unwrap();

    let bytes = backend.load().await.unwrap().unwrap();
    let reloaded = decode_deck(&bytes).unwrap();
    assert_eq!(reloaded.len(), 2);
    assert_eq!(reloaded, deck);
}
