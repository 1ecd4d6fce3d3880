use thiserror::Error;

use crate::model::card::CardValidationError;
use crate::model::text::TextError;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    CardValidation(#[from] CardValidationError),
    #[error(transparent)]
    TextValidation(#[from] TextError),
}
