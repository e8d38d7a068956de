//! Status lines reported to the [`StatusSink`](crate::sink::StatusSink).

pub const IN_PROGRESS: &str = "Debate in progress…";
pub const FINISHED: &str = "Debate finished";
pub const STOPPED: &str = "Stopped";
pub const NOTHING_TO_CONTINUE: &str = "No debate to continue.";
pub const NOTHING_TO_EXPORT: &str = "No debate record to export";
pub const EXPORTED: &str = "Debate record exported";

pub const ARCHIVE_EMPTY_INPUT: &str = "Please enter JSON content";
pub const ARCHIVE_MALFORMED: &str = "Failed to parse JSON, please check the format";
pub const ARCHIVE_NO_TURNS: &str = "No displayable conversation found";
pub const ARCHIVE_LOADED: &str = "Debate record loaded";
pub const ARCHIVE_CLEARED: &str = "Cleared";
pub const ARCHIVE_NOTHING_TO_EXPORT: &str = "No content to export";
pub const ARCHIVE_EXPORTED: &str = "Current record exported";

/// `Error: <message>`.
pub fn error_line(message: &str) -> String {
    format!("Error: {message}")
}
