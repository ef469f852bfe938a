use std::time::Duration;

use serde::{Deserialize, Serialize};

/// One answered question. Written once per position and never replaced.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AnswerRecord {
    pub position: usize,
    pub selected_index: usize,
    pub correct_index: usize,
    pub correct: bool,
    /// Time since the session started.
    pub elapsed: Duration,
}

/// Immediate feedback after an answer is recorded.
#[derive(Clone, Debug, PartialEq)]
pub struct AnswerFeedback {
    pub correct: bool,
    pub selected_index: usize,
    pub correct_index: usize,
    pub explanation: Option<String>,
}
