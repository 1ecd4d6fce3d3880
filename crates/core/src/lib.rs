#![forbid(unsafe_code)]

pub mod error;
pub mod model;
pub mod session;

pub use error::Error;
pub use model::{Card, CardDraft, CardId, CardValidationError};
pub use session::{MarkOutcome, ReviewSession, SessionState, SESSION_SECONDS};
