use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::corpus::{Corpus, Difficulty, QuestionRecord};
use crate::error::ConfigError;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DifficultyFilter {
    #[default]
    All,
    Easy,
    Medium,
    Hard,
    EasyMedium,
    MediumHard,
}

impl DifficultyFilter {
    pub const ALL: [DifficultyFilter; 6] = [
        DifficultyFilter::All,
        DifficultyFilter::Easy,
        DifficultyFilter::Medium,
        DifficultyFilter::Hard,
        DifficultyFilter::EasyMedium,
        DifficultyFilter::MediumHard,
    ];

    /// Lenient parse: anything unrecognised means every difficulty.
    pub fn parse(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" => DifficultyFilter::Easy,
            "medium" => DifficultyFilter::Medium,
            "hard" => DifficultyFilter::Hard,
            "easy-medium" => DifficultyFilter::EasyMedium,
            "medium-hard" => DifficultyFilter::MediumHard,
            _ => DifficultyFilter::All,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DifficultyFilter::All => "all",
            DifficultyFilter::Easy => "easy",
            DifficultyFilter::Medium => "medium",
            DifficultyFilter::Hard => "hard",
            DifficultyFilter::EasyMedium => "easy-medium",
            DifficultyFilter::MediumHard => "medium-hard",
        }
    }

    pub fn levels(self) -> &'static [Difficulty] {
        match self {
            DifficultyFilter::All => &Difficulty::ALL,
            DifficultyFilter::Easy => &[Difficulty::Easy],
            DifficultyFilter::Medium => &[Difficulty::Medium],
            DifficultyFilter::Hard => &[Difficulty::Hard],
            DifficultyFilter::EasyMedium => &[Difficulty::Easy, Difficulty::Medium],
            DifficultyFilter::MediumHard => &[Difficulty::Medium, Difficulty::Hard],
        }
    }

    pub fn includes(self, difficulty: Difficulty) -> bool {
        self.levels().contains(&difficulty)
    }

    pub fn next(self) -> Self {
        let i = Self::ALL.iter().position(|&f| f == self).unwrap_or(0);
        Self::ALL[(i + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Self {
        let i = Self::ALL.iter().position(|&f| f == self).unwrap_or(0);
        Self::ALL[(i + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

impl fmt::Display for DifficultyFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How many questions a session asks for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CountSpec {
    /// At most this many, sampled at random. Range is checked by the validator.
    Limit(i64),
    /// Every matching question, shuffled.
    All,
    /// Every flagged question, in corpus order, ignoring category and difficulty.
    Flagged,
}

impl FromStr for CountSpec {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(CountSpec::All),
            "flagged" => Ok(CountSpec::Flagged),
            other => other
                .parse::<i64>()
                .map(CountSpec::Limit)
                .map_err(|_| ConfigError::InvalidCount),
        }
    }
}

impl fmt::Display for CountSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CountSpec::Limit(n) => write!(f, "{n}"),
            CountSpec::All => f.write_str("all"),
            CountSpec::Flagged => f.write_str("flagged"),
        }
    }
}

/// Resolve the ordered question list for one session.
///
/// An empty result is not an error here; starting a session maps it to
/// [`crate::error::StartError::EmptySelection`].
pub fn select<R: Rng + ?Sized>(
    corpus: &Corpus,
    categories: &[String],
    difficulty: DifficultyFilter,
    count: CountSpec,
    flagged: &BTreeSet<String>,
    rng: &mut R,
) -> Vec<QuestionRecord> {
    if count == CountSpec::Flagged {
        return corpus
            .questions()
            .iter()
            .filter(|q| flagged.contains(&q.id))
            .cloned()
            .collect();
    }

    if categories.is_empty() {
        return Vec::new();
    }

    // Shuffle a list of references; the corpus order is left alone.
    let mut picked: Vec<&QuestionRecord> = corpus
        .questions()
        .iter()
        .filter(|q| q.has_any_category(categories) && difficulty.includes(q.difficulty))
        .collect();
    picked.shuffle(rng);
    if let CountSpec::Limit(n) = count {
        picked.truncate(usize::try_from(n).unwrap_or(0));
    }
    picked.into_iter().cloned().collect()
}
