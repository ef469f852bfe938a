pub mod flags;
pub mod json_store;
pub mod schema;
pub mod slot;

pub use flags::FlagStore;
pub use json_store::JsonStore;
pub use slot::{KeyValueSlot, MemorySlot};
