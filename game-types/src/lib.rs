pub mod engine;
pub mod errors;
pub mod game;
pub mod stats;
pub mod word;

// Re-export all types
pub use engine::*;
pub use errors::*;
pub use game::*;
pub use stats::*;
pub use word::*;
