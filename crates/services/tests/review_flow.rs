use std::sync::Arc;
use std::time::Duration;

use deck_core::session::{SessionState, SESSION_SECONDS};
use services::{DeckService, SessionHandle, SessionLoop, Ticker};
use storage::PrefsBackend;

/// Builds a deck with the given prompt/answer pairs in display order and
/// spawns a session loop over it.
async fn spawn_session(pairs: &[(&str, &str)]) -> SessionHandle {
    let mut deck = DeckService::load(Arc::new(PrefsBackend::new())).await;
    // add() prepends, so seed in reverse to keep display order.
    for (prompt, answer) in pairs.iter().rev() {
        deck.add(*prompt, *answer).await.unwrap();
    }
    let (handle, _join) = SessionLoop::spawn(deck);
    handle
}

#[tokio::test]
async fn review_walk_drains_queue_to_empty() {
    let handle = spawn_session(&[("A", "1"), ("B", "2"), ("C", "3")]).await;
    let deck = handle.list_deck().await.unwrap();
    let a = deck[0].clone();

    // markWrong(A): queue becomes [A', B, C] with A' under a new id.
    handle.mark_wrong(a.id()).await.unwrap();
    let session = handle.query_session().await.unwrap();
    assert_eq!(session.queue_len, 3);
    let a_prime = session.current_card.unwrap();
    assert_eq!(a_prime.prompt().as_str(), "A");
    assert_ne!(a_prime.id(), a.id());

    // markRight(B), markRight(C): queue becomes [A'].
    handle.mark_right(deck[1].id()).await.unwrap();
    handle.mark_right(deck[2].id()).await.unwrap();
    let session = handle.query_session().await.unwrap();
    assert_eq!(session.queue_len, 1);
    assert_eq!(session.state, SessionState::Loaded);

    // markRight(A'): queue drained, terminal Empty state.
    handle.mark_right(a_prime.id()).await.unwrap();
    let session = handle.query_session().await.unwrap();
    assert_eq!(session.state, SessionState::Empty);
}

#[tokio::test]
async fn review_outcomes_never_touch_the_durable_deck() {
    let handle = spawn_session(&[("A", "1"), ("B", "2")]).await;
    let before = handle.list_deck().await.unwrap();

    handle.mark_wrong(before[0].id()).await.unwrap();
    handle.mark_right(before[1].id()).await.unwrap();

    assert_eq!(handle.list_deck().await.unwrap(), before);
}

#[tokio::test]
async fn stale_mark_is_tolerated() {
    let handle = spawn_session(&[("A", "1"), ("B", "2")]).await;
    let a = handle.list_deck().await.unwrap()[0].clone();

    handle.mark_right(a.id()).await.unwrap();
    // Double-tap on the card that was just removed.
    handle.mark_right(a.id()).await.unwrap();
    handle.mark_wrong(a.id()).await.unwrap();

    let session = handle.query_session().await.unwrap();
    assert_eq!(session.queue_len, 1);
}

#[tokio::test]
async fn expiry_freezes_review_input() {
    let handle = spawn_session(&[("A", "1")]).await;
    let token = handle.query_session().await.unwrap().tick_token;

    for _ in 0..SESSION_SECONDS {
        handle.tick(token).await.unwrap();
    }
    let session = handle.query_session().await.unwrap();
    assert_eq!(session.state, SessionState::Expired);
    assert_eq!(session.time_remaining, 0);

    let id = session.current_card.unwrap().id();
    handle.mark_right(id).await.unwrap();
    assert_eq!(handle.query_session().await.unwrap().queue_len, 1);
}

#[tokio::test]
async fn ticks_from_a_previous_session_are_dropped() {
    let handle = spawn_session(&[("A", "1")]).await;
    let stale = handle.query_session().await.unwrap().tick_token;

    handle.restart().await.unwrap();
    handle.tick(stale).await.unwrap();

    let session = handle.query_session().await.unwrap();
    assert_eq!(session.time_remaining, SESSION_SECONDS);

    handle.tick(session.tick_token).await.unwrap();
    let session = handle.query_session().await.unwrap();
    assert_eq!(session.time_remaining, SESSION_SECONDS - 1);
}

#[tokio::test]
async fn backgrounding_freezes_the_clock_but_not_decisions() {
    let handle = spawn_session(&[("A", "1"), ("B", "2")]).await;
    let token = handle.query_session().await.unwrap().tick_token;

    handle.pause().await.unwrap();
    handle.tick(token).await.unwrap();
    let session = handle.query_session().await.unwrap();
    assert_eq!(session.time_remaining, SESSION_SECONDS);
    assert!(!session.is_active);

    let id = session.current_card.unwrap().id();
    handle.mark_right(id).await.unwrap();
    assert_eq!(handle.query_session().await.unwrap().queue_len, 1);

    handle.resume().await.unwrap();
    handle.tick(token).await.unwrap();
    let session = handle.query_session().await.unwrap();
    assert_eq!(session.time_remaining, SESSION_SECONDS - 1);
}

#[tokio::test(flavor = "multi_thread")]
async fn ticker_drives_the_countdown_and_stops_cleanly() {
    let handle = spawn_session(&[("A", "1")]).await;
    let ticker = Ticker::spawn_with_period(&handle, Duration::from_millis(5));

    tokio::time::sleep(Duration::from_millis(100)).await;
    let running = handle.query_session().await.unwrap().time_remaining;
    assert!(running < SESSION_SECONDS);

    ticker.stop();
    // A tick already in flight at abort time may still land; let it drain
    // before measuring.
    tokio::time::sleep(Duration::from_millis(20)).await;
    let settled = handle.query_session().await.unwrap().time_remaining;
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(
        handle.query_session().await.unwrap().time_remaining,
        settled
    );
}
