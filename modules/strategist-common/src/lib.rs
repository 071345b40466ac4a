pub mod config;
pub mod error;
pub mod types;

pub use config::{Config, DEFAULT_GEMINI_MODEL};
pub use error::{ErrorKind, StrategistError};
pub use types::*;
