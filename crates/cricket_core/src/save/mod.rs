// Match persistence: versioned JSON documents with atomic writes

pub mod error;
pub mod format;
pub mod manager;

pub use error::SaveError;
pub use format::{document_schema, from_json, to_json, SavedMatch};
pub use manager::{JsonFileStore, MatchStore, MemoryStore};

pub const SAVE_VERSION: u32 = 1;
