pub mod catalog;

use std::collections::HashSet;
use std::fmt;

use rust_embed::Embed;
use serde::{Deserialize, Serialize};

use crate::error::CorpusError;

pub use catalog::{CategoryCatalog, CategoryInfo};

#[derive(Embed)]
#[folder = "assets/corpus/"]
pub(crate) struct CorpusAssets;

const QUESTIONS_FILE: &str = "questions.json";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One multiple-choice question. Immutable once loaded into a [`Corpus`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct QuestionRecord {
    pub id: String,
    pub prompt: String,
    pub options: Vec<String>,
    pub correct_index: usize,
    /// Category tags. Order matters only for display-name resolution.
    pub categories: Vec<String>,
    pub difficulty: Difficulty,
    #[serde(default)]
    pub explanation: Option<String>,
}

impl QuestionRecord {
    pub fn has_category(&self, tag: &str) -> bool {
        self.categories.iter().any(|c| c == tag)
    }

    pub fn has_any_category(&self, tags: &[String]) -> bool {
        self.categories.iter().any(|c| tags.contains(c))
    }

    pub fn correct_option(&self) -> &str {
        &self.options[self.correct_index]
    }

    fn check(&self) -> Result<(), CorpusError> {
        if self.options.len() < 2 {
            return Err(CorpusError::TooFewOptions {
                id: self.id.clone(),
                count: self.options.len(),
            });
        }
        if self.correct_index >= self.options.len() {
            return Err(CorpusError::CorrectIndexOutOfRange {
                id: self.id.clone(),
                index: self.correct_index,
                count: self.options.len(),
            });
        }
        if self.categories.is_empty() {
            return Err(CorpusError::NoCategories(self.id.clone()));
        }
        Ok(())
    }
}

/// The read-only question collection a quiz draws from.
#[derive(Clone, Debug, Default)]
pub struct Corpus {
    questions: Vec<QuestionRecord>,
}

impl Corpus {
    /// Build a corpus, rejecting records that break the question invariants
    /// or reuse an identifier.
    pub fn new(questions: Vec<QuestionRecord>) -> Result<Self, CorpusError> {
        let mut seen = HashSet::with_capacity(questions.len());
        for q in &questions {
            q.check()?;
            if !seen.insert(q.id.as_str()) {
                return Err(CorpusError::DuplicateId(q.id.clone()));
            }
        }
        Ok(Self { questions })
    }

    pub fn from_json(json: &str) -> Result<Self, CorpusError> {
        let questions: Vec<QuestionRecord> = serde_json::from_str(json)?;
        Self::new(questions)
    }

    /// The corpus compiled into the binary.
    pub fn bundled() -> Result<Self, CorpusError> {
        let file = CorpusAssets::get(QUESTIONS_FILE)
            .ok_or(CorpusError::MissingAsset(QUESTIONS_FILE))?;
        let content = std::str::from_utf8(file.data.as_ref())
            .map_err(|_| CorpusError::MissingAsset(QUESTIONS_FILE))?;
        Self::from_json(content)
    }

    pub fn questions(&self) -> &[QuestionRecord] {
        &self.questions
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&QuestionRecord> {
        self.questions.iter().find(|q| q.id == id)
    }

    /// Every tag used by at least one question, in first-seen order.
    pub fn categories(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        let mut out = Vec::new();
        for tag in self.questions.iter().flat_map(|q| q.categories.iter()) {
            if seen.insert(tag.as_str()) {
                out.push(tag.as_str());
            }
        }
        out
    }

    pub fn count_in_category(&self, tag: &str) -> usize {
        self.questions.iter().filter(|q| q.has_category(tag)).count()
    }
}
