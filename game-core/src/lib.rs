pub mod resolver;
pub mod session;
pub mod stats;

// Re-export main components
pub use resolver::*;
pub use session::*;
pub use stats::*;
