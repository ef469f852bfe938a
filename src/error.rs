use thiserror::Error;

/// A corpus or catalog that could not be loaded.
#[derive(Debug, Error)]
pub enum CorpusError {
    #[error("failed to parse question data: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("bundled asset `{0}` is missing or not UTF-8")]
    MissingAsset(&'static str),
    #[error("duplicate question id `{0}`")]
    DuplicateId(String),
    #[error("question `{id}` has {count} option(s), at least 2 are required")]
    TooFewOptions { id: String, count: usize },
    #[error("question `{id}` marks option {index} correct but only has {count} options")]
    CorrectIndexOutOfRange { id: String, index: usize, count: usize },
    #[error("question `{0}` has no category tags")]
    NoCategories(String),
}

/// A session configuration rejected before any selection happens.
/// The messages are shown to the user verbatim.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("select at least one category")]
    NoCategories,
    #[error("no flagged questions available")]
    NoFlaggedQuestions,
    #[error("invalid question count")]
    InvalidCount,
}

/// An operation invoked in a state that does not permit it.
/// Rejected without touching the session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum StateError {
    #[error("a quiz is already running")]
    NotIdle,
    #[error("no quiz is running")]
    NotActive,
    #[error("question {position} has already been answered")]
    AlreadyAnswered { position: usize },
    #[error("option {index} does not exist ({count} options)")]
    OptionOutOfRange { index: usize, count: usize },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum StartError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("no questions match your selection")]
    EmptySelection,
    #[error(transparent)]
    State(#[from] StateError),
}

/// Failure of the durable slot behind the flag store. Never escapes
/// [`crate::store::flags::FlagStore`].
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("stored data is not valid UTF-8: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),
    #[error("stored data is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_errors_read_as_user_facing_reasons() {
        assert_eq!(ConfigError::NoCategories.to_string(), "select at least one category");
        assert_eq!(
            ConfigError::NoFlaggedQuestions.to_string(),
            "no flagged questions available"
        );
        assert_eq!(ConfigError::InvalidCount.to_string(), "invalid question count");
    }

    #[test]
    fn start_error_is_transparent_over_config_reason() {
        let err: StartError = ConfigError::InvalidCount.into();
        assert_eq!(err.to_string(), "invalid question count");
        assert_eq!(
            StartError::EmptySelection.to_string(),
            "no questions match your selection"
        );
    }
}
