pub mod scoring;
pub mod selector;
pub mod validator;

pub use selector::{CountSpec, DifficultyFilter, select};
pub use validator::{MAX_QUESTION_COUNT, validate};
