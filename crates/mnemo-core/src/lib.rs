pub mod error;
pub mod types;

pub use error::AppError;
pub use types::{Amendment, Conversation, LogEntry, OutputFormat, Role};
