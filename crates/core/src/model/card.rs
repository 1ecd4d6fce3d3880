use thiserror::Error;

use crate::model::{
    ids::CardId,
    text::{AnswerText, PromptText, TextError},
};

//
// ─── CARD TYPES ────────────────────────────────────────────────────────────────
//

/// Unvalidated input for a new card, as typed by the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardDraft {
    pub prompt: String,
    pub answer: String,
}

impl CardDraft {
    pub fn new(prompt: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            answer: answer.into(),
        }
    }

    /// Validates both fields (trimmed, non-empty).
    ///
    /// # Errors
    ///
    /// Returns `CardValidationError` naming the offending field.
    pub fn validate(self) -> Result<ValidatedCard, CardValidationError> {
        let prompt = PromptText::parse(self.prompt).map_err(CardValidationError::Prompt)?;
        let answer = AnswerText::parse(self.answer).map_err(CardValidationError::Answer)?;

        Ok(ValidatedCard { prompt, answer })
    }
}

/// A card that passed validation but has not been assigned an identity yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedCard {
    pub prompt: PromptText,
    pub answer: AnswerText,
}

impl ValidatedCard {
    #[must_use]
    pub fn assign_id(self, id: CardId) -> Card {
        Card {
            id,
            prompt: self.prompt,
            answer: self.answer,
        }
    }

    /// Convenience for the common path: validate, then take a random id.
    #[must_use]
    pub fn assign_fresh_id(self) -> Card {
        self.assign_id(CardId::fresh())
    }
}

/// A prompt/answer pair with a unique identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Card {
    id: CardId,
    prompt: PromptText,
    answer: AnswerText,
}

impl Card {
    #[must_use]
    pub fn id(&self) -> CardId {
        self.id
    }

    #[must_use]
    pub fn prompt(&self) -> &PromptText {
        &self.prompt
    }

    #[must_use]
    pub fn answer(&self) -> &AnswerText {
        &self.answer
    }

    /// Returns the same prompt/answer under a brand-new identity.
    ///
    /// Used when a card re-enters the review queue: the new occurrence must
    /// not compare equal to any stale reference to the old one.
    #[must_use]
    pub fn with_fresh_id(self) -> Card {
        Card {
            id: CardId::fresh(),
            ..self
        }
    }
}

//
// ─── CARD VALIDATION ERRORS ────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CardValidationError {
    #[error("invalid prompt: {0}")]
    Prompt(#[source] TextError),

    #[error("invalid answer: {0}")]
    Answer(#[source] TextError),
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
