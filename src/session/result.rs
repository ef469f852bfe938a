use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::corpus::CategoryCatalog;
use crate::engine::scoring;
use crate::session::quiz::Session;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CategoryScore {
    pub tag: String,
    pub name: String,
    pub total: usize,
    pub correct: usize,
    pub percentage: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FlaggedQuestion {
    /// Zero-based position in the session.
    pub position: usize,
    pub question_id: String,
    pub prompt: String,
    pub correct_option: String,
    /// Text of the chosen option, `None` when the question was skipped.
    pub answer: Option<String>,
    pub correct: bool,
}

impl FlaggedQuestion {
    pub fn answer_label(&self) -> &str {
        self.answer.as_deref().unwrap_or("not answered")
    }
}

/// Final tally of a finished session. Built once, never updated.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct QuizResult {
    pub total: usize,
    pub answered: usize,
    pub correct: usize,
    /// Everything not answered correctly, skipped questions included.
    pub incorrect: usize,
    pub percentage: f64,
    pub grade: String,
    pub elapsed_secs: f64,
    pub average_secs: f64,
    pub started_at: DateTime<Utc>,
    pub flagged: Vec<FlaggedQuestion>,
    pub categories: Vec<CategoryScore>,
}

impl QuizResult {
    pub fn from_session(session: &Session, finished_at: Instant, catalog: &CategoryCatalog) -> Self {
        let questions = session.questions();
        let answers = session.answers();

        let total = questions.len();
        let correct = answers.iter().filter(|a| a.correct).count();
        let percentage = scoring::percentage(correct, total);

        let elapsed_secs = finished_at
            .saturating_duration_since(session.started_instant())
            .as_secs_f64();
        let average_secs = if total > 0 {
            elapsed_secs / total as f64
        } else {
            0.0
        };

        let flagged = session
            .flagged_positions()
            .iter()
            .filter_map(|&position| {
                let question = questions.get(position)?;
                let recorded = session.answer_at(position);
                Some(FlaggedQuestion {
                    position,
                    question_id: question.id.clone(),
                    prompt: question.prompt.clone(),
                    correct_option: question.correct_option().to_string(),
                    answer: recorded
                        .and_then(|a| question.options.get(a.selected_index))
                        .cloned(),
                    correct: recorded.is_some_and(|a| a.correct),
                })
            })
            .collect();

        Self {
            total,
            answered: answers.len(),
            correct,
            incorrect: total - correct,
            percentage,
            grade: scoring::grade(percentage).to_string(),
            elapsed_secs,
            average_secs,
            started_at: session.started_at(),
            flagged,
            categories: scoring::category_breakdown(
                questions,
                answers,
                session.categories(),
                catalog,
            ),
        }
    }
}
