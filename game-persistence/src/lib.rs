pub mod fallback;
pub mod gateway;
pub mod store;

pub use gateway::*;
pub use store::{DocumentStore, FileStore, MemoryStore, StoreError};
