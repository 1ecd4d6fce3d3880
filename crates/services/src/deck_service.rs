use std::collections::BTreeSet;
use std::sync::Arc;

use deck_core::model::{Card, CardDraft, CardValidationError};
use storage::{decode_deck, encode_deck, DeckBackend};

type Listener = Box<dyn Fn(&[Card]) + Send + Sync>;

/// The durable card store: an ordered, in-memory deck persisted wholesale to
/// a backend after every mutation.
///
/// Construct one instance at startup and pass it by handle; there is no
/// global. Persistence is best-effort: a failed save is logged and the
/// in-memory deck is kept as-is, a failed load degrades to an empty deck.
pub struct DeckService {
    backend: Arc<dyn DeckBackend>,
    cards: Vec<Card>,
    listeners: Vec<Listener>,
}

impl DeckService {
    /// Loads the deck from the backend. Missing or corrupt payloads yield an
    /// empty deck rather than an error.
    pub async fn load(backend: Arc<dyn DeckBackend>) -> Self {
        let cards = Self::read_deck(backend.as_ref()).await;
        Self {
            backend,
            cards,
            listeners: Vec::new(),
        }
    }

    async fn read_deck(backend: &dyn DeckBackend) -> Vec<Card> {
        match backend.load().await {
            Ok(Some(bytes)) => match decode_deck(&bytes) {
                Ok(cards) => cards,
                Err(e) => {
                    log::warn!("discarding unreadable deck payload: {e}");
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(e) => {
                log::warn!("failed to load deck, starting empty: {e}");
                Vec::new()
            }
        }
    }

    #[must_use]
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Registers a listener invoked after every mutation, once the new
    /// sequence is in place.
    pub fn subscribe(&mut self, listener: impl Fn(&[Card]) + Send + Sync + 'static) {
        self.listeners.push(Box::new(listener));
    }

    /// Validates and adds a new card at the front of the deck, then persists.
    ///
    /// # Errors
    ///
    /// Returns `CardValidationError` if either trimmed field is empty; the
    /// deck is left untouched in that case.
    pub async fn add(
        &mut self,
        prompt: impl Into<String>,
        answer: impl Into<String>,
    ) -> Result<Card, CardValidationError> {
        let card = CardDraft::new(prompt, answer).validate()?.assign_fresh_id();
        self.cards.insert(0, card.clone());
        self.persist().await;
        self.notify();
        Ok(card)
    }

    /// Removes the cards at the given positions. Out-of-range positions are
    /// skipped; relative order of the survivors is preserved.
    pub async fn delete(&mut self, offsets: &BTreeSet<usize>) {
        if offsets.iter().all(|&offset| offset >= self.cards.len()) {
            return;
        }
        let mut index = 0;
        self.cards.retain(|_| {
            let keep = !offsets.contains(&index);
            index += 1;
            keep
        });
        self.persist().await;
        self.notify();
    }

    /// Re-reads the deck from the backend, replacing the in-memory copy.
    pub async fn reload(&mut self) {
        self.cards = Self::read_deck(self.backend.as_ref()).await;
        self.notify();
    }

    /// Best-effort save: on failure the previous on-disk payload stays valid
    /// and the in-memory deck is not rolled back.
    async fn persist(&self) {
        let bytes = match encode_deck(&self.cards) {
            Ok(bytes) => bytes,
            Err(e) => {
                log::error!("failed to encode deck: {e}");
                return;
            }
        };
        if let Err(e) = self.backend.save(&bytes).await {
            log::error!("failed to persist deck: {e}");
        }
    }

    fn notify(&self) {
        for listener in &self.listeners {
            listener(&self.cards);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use storage::PrefsBackend;

    async fn empty_service() -> DeckService {
        DeckService::load(Arc::new(PrefsBackend::new())).await
    }

    #[tokio::test]
    async fn add_prepends_and_persists() {
        let backend = Arc::new(PrefsBackend::new());
        let mut deck = DeckService::load(Arc::clone(&backend) as Arc<dyn DeckBackend>).await;

        deck.add("first", "1").await.unwrap();
        deck.add("second", "2").await.unwrap();
        assert_eq!(deck.cards()[0].prompt().as_str(), "second");
        assert_eq!(deck.cards()[1].prompt().as_str(), "first");

        let reloaded = DeckService::load(backend).await;
        assert_eq!(reloaded.cards(), deck.cards());
    }

    #[tokio::test]
    async fn blank_fields_never_mutate_the_deck() {
        let mut deck = empty_service().await;
        assert!(deck.add("  ", "answer").await.is_err());
        assert!(deck.add("prompt", "\t").await.is_err());
        assert!(deck.is_empty());
    }

    #[tokio::test]
    async fn delete_removes_exact_offsets_in_order() {
        let mut deck = empty_service().await;
        // add() prepends, so insert in reverse display order.
        for (prompt, answer) in [("d", "4"), ("c", "3"), ("b", "2"), ("a", "1")] {
            deck.add(prompt, answer).await.unwrap();
        }

        deck.delete(&BTreeSet::from([1, 3])).await;

        let prompts: Vec<_> = deck
            .cards()
            .iter()
            .map(|card| card.prompt().as_str())
            .collect();
        assert_eq!(prompts, ["a", "c"]);
    }

    #[tokio::test]
    async fn delete_out_of_range_is_a_noop() {
        let mut deck = empty_service().await;
        deck.add("only", "card").await.unwrap();

        deck.delete(&BTreeSet::from([5, 9])).await;
        assert_eq!(deck.len(), 1);
    }

    #[tokio::test]
    async fn corrupt_payload_degrades_to_empty_deck() {
        let backend = Arc::new(PrefsBackend::new());
        backend.save(b"{ definitely not a deck").await.unwrap();

        let deck = DeckService::load(backend).await;
        assert!(deck.is_empty());
    }

    #[tokio::test]
    async fn listeners_fire_after_each_mutation() {
        static CALLS: AtomicUsize = AtomicUsize::new(0);

        let mut deck = empty_service().await;
        deck.subscribe(|_| {
            CALLS.fetch_add(1, Ordering::SeqCst);
        });

        deck.add("q", "a").await.unwrap();
        deck.delete(&BTreeSet::from([0])).await;
        assert_eq!(CALLS.load(Ordering::SeqCst), 2);
    }
}
