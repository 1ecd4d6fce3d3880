use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TextError {
    #[error("text must not be empty")]
    Empty,
}

/// A non-empty, trimmed piece of card text. The phantom marker keeps prompt
/// and answer text from being swapped by accident.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Text<T>(String, std::marker::PhantomData<T>);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Prompt;
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Answer;

pub type PromptText = Text<Prompt>;
pub type AnswerText = Text<Answer>;

impl<T> Text<T> {
    /// Trims the input and rejects strings that are empty after trimming.
    /// The stored value is always the trimmed form.
    pub fn parse(s: impl Into<String>) -> Result<Self, TextError> {
        let s = s.into();
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(TextError::Empty);
        }
        Ok(Self(trimmed.to_owned(), std::marker::PhantomData))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl<T> std::fmt::Display for Text<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
