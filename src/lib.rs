pub mod codec;
pub mod error;
pub mod logger;
pub mod model;
pub mod translate;
pub mod variable;

// Re-export commonly used types
pub use error::{Result, RumeterError};
