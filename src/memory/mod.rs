pub mod store;
pub mod types;

pub use store::MemoryStore;
pub use types::{AppendOutcome, RecallOutcome, RemoveOutcome};
