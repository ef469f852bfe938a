use crate::engine::selector::{CountSpec, DifficultyFilter};
use crate::error::ConfigError;

/// What the user asked for. Immutable once a session starts.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionConfig {
    pub categories: Vec<String>,
    pub count: CountSpec,
    pub difficulty: DifficultyFilter,
}

impl SessionConfig {
    pub fn new(categories: Vec<String>, count: CountSpec, difficulty: DifficultyFilter) -> Self {
        Self {
            categories,
            count,
            difficulty,
        }
    }

    /// Build from raw user input. The category check runs before the count is
    /// parsed so the rejection reason matches the validator's rule order.
    pub fn from_input(
        categories: Vec<String>,
        count: &str,
        difficulty: &str,
    ) -> Result<Self, ConfigError> {
        if categories.is_empty() {
            return Err(ConfigError::NoCategories);
        }
        Ok(Self::new(categories, count.parse()?, DifficultyFilter::parse(difficulty)))
    }
}
