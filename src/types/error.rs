use thiserror::Error;

/// Returned when a string is not a valid 24-hour `HH:MM` time.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid time '{input}': expected 24-hour HH:MM")]
pub struct TimeParseError {
    input: String,
}

impl TimeParseError {
    pub(crate) fn new(input: impl Into<String>) -> Self {
        Self {
            input: input.into(),
        }
    }

    /// The rejected input.
    #[must_use]
    pub fn input(&self) -> &str {
        &self.input
    }
}
