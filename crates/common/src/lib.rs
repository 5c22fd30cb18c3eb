pub mod config;
pub mod error;
pub mod logger;

// Re-export commonly used types
pub use config::AppConfig;
pub use error::{VisionaryError, ANALYSIS_FAILED_MESSAGE, EMPTY_INPUT_MESSAGE};
pub type Result<T> = std::result::Result<T, VisionaryError>;
