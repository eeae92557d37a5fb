use chrono::{DateTime, Local};
use colored::*;
use std::fmt::Display;

#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Debug,
    Information,
    Notice,
    Warning,
    Error,
    Critical,
    Alert,
    Emergency,
}

impl LogLevel {
    pub fn to_plain_string(&self) -> String {
        match self {
            LogLevel::Debug => "Debug      ".to_string(),
            LogLevel::Information => "Information".to_string(),
            LogLevel::Notice => "Notice     ".to_string(),
            LogLevel::Warning => "Warning    ".to_string(),
            LogLevel::Error => "Error      ".to_string(),
            LogLevel::Critical => "Critical   ".to_string(),
            LogLevel::Alert => "Alert      ".to_string(),
            LogLevel::Emergency => "Emergency  ".to_string(),
        }
    }

    pub fn to_colored_string(&self) -> ColoredString {
        match self {
            LogLevel::Debug => "Debug      ".to_string().bright_black(),
            LogLevel::Information => "Information".to_string().bright_blue(),
            LogLevel::Notice => "Notice     ".to_string().bright_green(),
            LogLevel::Warning => "Warning    ".to_string().yellow(),
            LogLevel::Error => "Error      ".to_string().bright_red(),
            LogLevel::Critical => "Critical   ".to_string().bright_yellow(),
            LogLevel::Alert => "Alert      ".to_string().red(),
            LogLevel::Emergency => "Emergency  ".to_string().magenta(),
        }
    }
}

impl Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_plain_string())
    }
}

#[derive(Clone, Debug)]
pub struct LogEntry {
    pub level: LogLevel,
    pub timestamp: DateTime<Local>,
    pub position: String,
    pub message: String,
    pub debug_info: String,
}

impl LogEntry {
    pub fn new<T: Into<String>, U: Into<String>, V: Into<String>>(level: LogLevel, position: T, message: U, debug_info: V) -> Self {
        Self {
            level,
            timestamp: Local::now(),
            position: position.into(),
            message: message.into(),
            debug_info: debug_info.into(),
        }
    }

    pub fn to_plain_string(&self) -> String {
        let level = self.level.to_plain_string();
        let timestamp = self.timestamp.format("%Y/%m/%d %H:%M:%S").to_string();
        if self.debug_info.is_empty() {
            format!("[{}] {} {}: {}", level, timestamp, self.position, self.message)
        } else {
            format!("[{}] {} {}: {}\n{}", level, timestamp, self.position, self.message, self.debug_info)
        }
    }

    pub fn to_colored_string(&self) -> String {
        let level = self.level.to_colored_string();
        let timestamp = self.timestamp.format("%Y/%m/%d %H:%M:%S").to_string();
        let position = self.position.cyan();
        let message = self.message.white();
        if self.debug_info.is_empty() {
            format!("[{}] {} {}: {}", level, timestamp, position, message)
        } else {
            let debug_info = self.debug_info.bright_black();
            format!("[{}] {} {}: {}\n{}", level, timestamp, position, message, debug_info)
        }
    }
}

impl Display for LogEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_plain_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_string_omits_empty_debug_info() {
        let entry = LogEntry::new(LogLevel::Warning, "src/history.rs:10", "Line skipped", "");
        let text = entry.to_plain_string();
        assert!(text.starts_with("[Warning    ] "));
        assert!(text.ends_with("src/history.rs:10: Line skipped"));
        assert!(!text.contains('\n'));
    }

    #[test]
    fn plain_string_appends_debug_info_on_next_line() {
        let entry = LogEntry::new(LogLevel::Error, "position", "message", "details");
        assert!(entry.to_plain_string().ends_with("message\ndetails"));
    }

    #[test]
    fn levels_are_ordered_by_severity() {
        assert!(LogLevel::Debug < LogLevel::Information);
        assert!(LogLevel::Error < LogLevel::Emergency);
    }
}
