pub mod catalog;
pub mod clock;
pub mod engine;
pub mod scoring;
pub mod session;
pub mod stats;
pub mod word_pool;

// Re-export main components
pub use catalog::*;
pub use clock::*;
pub use engine::*;
pub use scoring::*;
pub use session::*;
pub use stats::*;
pub use word_pool::*;
