// Library target holds the quiz core so integration tests and benchmarks can
// reach it. The terminal front end (app, event, ui) lives in the binary.

pub mod config;
pub mod corpus;
pub mod engine;
pub mod error;
pub mod logging;
pub mod session;
pub mod store;
