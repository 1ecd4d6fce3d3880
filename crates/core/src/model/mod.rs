pub mod card;
pub mod ids;
pub mod text;

pub use card::{Card, CardDraft, CardValidationError, ValidatedCard};
pub use ids::CardId;
pub use text::{AnswerText, PromptText, TextError};
