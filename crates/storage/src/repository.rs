use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use deck_core::model::{Card, CardDraft, CardId, CardValidationError};

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("record failed validation: {0}")]
    InvalidRecord(#[from] CardValidationError),

    #[error("backend error: {0}")]
    Backend(String),
}

/// Persisted shape for a card: exactly the wire object
/// `{ "id": <uuid-string>, "prompt": <string>, "answer": <string> }`.
///
/// This mirrors the domain `Card` so backends can serialize/deserialize
/// without leaking storage concerns into the domain layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardRecord {
    pub id: CardId,
    pub prompt: String,
    pub answer: String,
}

impl CardRecord {
    #[must_use]
    pub fn from_card(card: &Card) -> Self {
        Self {
            id: card.id(),
            prompt: card.prompt().as_str().to_owned(),
            answer: card.answer().as_str().to_owned(),
        }
    }

    /// Convert the record back into a domain `Card`.
    ///
    /// # Errors
    ///
    /// Returns `CardValidationError` if prompt/answer fail validation.
    pub fn into_card(self) -> Result<Card, CardValidationError> {
        let validated = CardDraft::new(self.prompt, self.answer).validate()?;
        Ok(validated.assign_id(self.id))
    }
}

/// Serializes a full deck as a JSON array, insertion order preserved.
///
/// # Errors
///
/// Returns `StorageError::Serialization` on encode failure.
pub fn encode_deck(cards: &[Card]) -> Result<Vec<u8>, StorageError> {
    let records: Vec<CardRecord> = cards.iter().map(CardRecord::from_card).collect();
    Ok(serde_json::to_vec(&records)?)
}

/// Deserializes a deck previously produced by `encode_deck`.
///
/// # Errors
///
/// Returns `StorageError` if the payload is not a valid card array or any
/// record fails validation. Degrading a corrupt payload to an empty deck is
/// the caller's policy, not the codec's.
pub fn decode_deck(bytes: &[u8]) -> Result<Vec<Card>, StorageError> {
    let records: Vec<CardRecord> = serde_json::from_slice(bytes)?;
    records
        .into_iter()
        .map(|record| record.into_card().map_err(StorageError::from))
        .collect()
}

/// Backing collaborator for the deck: a single opaque payload, written
/// wholesale on every save.
#[async_trait]
pub trait DeckBackend: Send + Sync {
    /// Reads the stored payload, `None` if nothing has been saved yet.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the payload exists but cannot be read.
    async fn load(&self) -> Result<Option<Vec<u8>>, StorageError>;

    /// Replaces the stored payload. Either the new payload is fully written
    /// or the previous one remains intact.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the payload cannot be written.
    async fn save(&self, bytes: &[u8]) -> Result<(), StorageError>;
}
