use crate::engine::selector::CountSpec;
use crate::error::ConfigError;
use crate::session::setup::SessionConfig;

pub const MAX_QUESTION_COUNT: i64 = 50;

/// Check a requested configuration before any selection is attempted.
///
/// Only cardinalities are inspected: a configuration that passes here can
/// still select zero questions once the corpus filters are applied.
pub fn validate(config: &SessionConfig, flagged_count: usize) -> Result<(), ConfigError> {
    if config.categories.is_empty() {
        return Err(ConfigError::NoCategories);
    }
    match config.count {
        CountSpec::Flagged if flagged_count == 0 => Err(ConfigError::NoFlaggedQuestions),
        CountSpec::Flagged | CountSpec::All => Ok(()),
        CountSpec::Limit(n) if (1..=MAX_QUESTION_COUNT).contains(&n) => Ok(()),
        CountSpec::Limit(_) => Err(ConfigError::InvalidCount),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::selector::DifficultyFilter;

    fn config(categories: &[&str], count: CountSpec) -> SessionConfig {
        SessionConfig::new(
            categories.iter().map(|s| s.to_string()).collect(),
            count,
            DifficultyFilter::All,
        )
    }

    #[test]
    fn empty_categories_rejected_first() {
        assert_eq!(
            validate(&config(&[], CountSpec::Limit(10)), 0),
            Err(ConfigError::NoCategories)
        );
        assert_eq!(
            validate(&config(&[], CountSpec::Limit(0)), 0),
            Err(ConfigError::NoCategories)
        );
    }

    #[test]
    fn flagged_requires_stored_flags() {
        assert_eq!(
            validate(&config(&["sleep"], CountSpec::Flagged), 0),
            Err(ConfigError::NoFlaggedQuestions)
        );
        assert_eq!(validate(&config(&["sleep"], CountSpec::Flagged), 2), Ok(()));
    }

    #[test]
    fn all_is_always_valid() {
        assert_eq!(validate(&config(&["sleep"], CountSpec::All), 0), Ok(()));
    }

    #[test]
    fn numeric_count_bounds() {
        for n in [1, 25, MAX_QUESTION_COUNT] {
            assert_eq!(validate(&config(&["sleep"], CountSpec::Limit(n)), 0), Ok(()));
        }
        for n in [0, -1, MAX_QUESTION_COUNT + 1] {
            assert_eq!(
                validate(&config(&["sleep"], CountSpec::Limit(n)), 0),
                Err(ConfigError::InvalidCount)
            );
        }
    }
}
