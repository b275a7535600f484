mod format;
mod parser;
mod segment;

pub use format::{FormatOptions, NO_LOGS_PLACEHOLDER, format_for_analysis, truncate_chars};
pub use parser::{LOG_DATE_FORMAT, LogParser, LogStats};
pub use segment::segment;
