pub mod answer;
pub mod quiz;
pub mod result;
pub mod setup;

pub use answer::{AnswerFeedback, AnswerRecord};
pub use quiz::{Advance, Phase, QuestionView, QuizEngine, QuizState, Session};
pub use result::{CategoryScore, FlaggedQuestion, QuizResult};
pub use setup::SessionConfig;
