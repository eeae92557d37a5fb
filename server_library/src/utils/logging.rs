pub use crate::{logging_critical, logging_emergency, logging_error, logging_information, logging_notice, logging_warning};
pub use common::utils::log_entry::detection::DetectionEntry;
pub use common::utils::log_entry::io::IOEntry;
pub use common::utils::log_entry::report::ReportEntry;
pub use common::utils::log_entry::store::StoreEntry;
pub use common::utils::log_entry::system::SystemEntry;
pub use common::utils::log_entry::upload::UploadEntry;
pub use common::utils::logging::*;

use chrono::{DateTime, Local};
use lazy_static::lazy_static;
use std::collections::VecDeque;
use tokio::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

const SYSTEM_LOG_CAPACITY: usize = 10_000;

lazy_static! {
    static ref LOGGER: RwLock<Logger> = RwLock::new(Logger::new());
}

pub struct Logger {
    system_log: VecDeque<LogEntry>,
}

impl Logger {
    fn new() -> Self {
        let mut system_log = VecDeque::new();
        let log_entry = LogEntry::new(LogLevel::Information, "Logger", "Online now", "");
        system_log.push_back(log_entry);
        Self {
            system_log,
        }
    }

    pub async fn instance() -> RwLockReadGuard<'static, Logger> {
        LOGGER.read().await
    }

    pub async fn instance_mut() -> RwLockWriteGuard<'static, Logger> {
        LOGGER.write().await
    }

    pub async fn add_system_log<T: Into<String>, U: Into<String>, V: Into<String>>(level: LogLevel, position: T, message: U, debug_info: V) {
        let log_entry = LogEntry::new(level, position, message, debug_info);
        Self::add_system_log_entry(log_entry).await;
    }

    pub async fn add_system_log_entry(log_entry: LogEntry) {
        Self::logging_console(log_entry.clone());
        Self::instance_mut().await.push(log_entry);
    }

    fn push(&mut self, log_entry: LogEntry) {
        if self.system_log.len() >= SYSTEM_LOG_CAPACITY {
            self.system_log.pop_front();
        }
        self.system_log.push_back(log_entry);
    }

    pub fn logging_console(log_entry: LogEntry) {
        println!("{}", log_entry.to_colored_string());
    }

    pub async fn get_system_logs() -> Vec<LogEntry> {
        Self::instance().await.system_log.iter().cloned().collect()
    }

    pub async fn get_system_logs_since(time: DateTime<Local>) -> Vec<LogEntry> {
        let logger = Self::instance().await;
        let index = logger.system_log.partition_point(|entry| entry.timestamp < time);
        logger.system_log.range(index..).cloned().collect()
    }
}

#[macro_export]
macro_rules! logging_information {
    ($message:expr) => {
        Logger::add_system_log(LogLevel::Information, format!("{}:{}", file!(), line!()), $message, "").await
    };
    ($message:expr, $debug_info:expr) => {
        Logger::add_system_log(LogLevel::Information, format!("{}:{}", file!(), line!()), $message, $debug_info).await
    };
}

#[macro_export]
macro_rules! logging_notice {
    ($message:expr) => {
        Logger::add_system_log(LogLevel::Notice, format!("{}:{}", file!(), line!()), $message, "").await
    };
    ($message:expr, $debug_info:expr) => {
        Logger::add_system_log(LogLevel::Notice, format!("{}:{}", file!(), line!()), $message, $debug_info).await
    };
}

#[macro_export]
macro_rules! logging_warning {
    ($message:expr) => {
        Logger::add_system_log(LogLevel::Warning, format!("{}:{}", file!(), line!()), $message, "").await
    };
    ($message:expr, $debug_info:expr) => {
        Logger::add_system_log(LogLevel::Warning, format!("{}:{}", file!(), line!()), $message, $debug_info).await
    };
}

#[macro_export]
macro_rules! logging_error {
    ($message:expr) => {
        Logger::add_system_log(LogLevel::Error, format!("{}:{}", file!(), line!()), $message, "").await
    };
    ($message:expr, $debug_info:expr) => {
        Logger::add_system_log(LogLevel::Error, format!("{}:{}", file!(), line!()), $message, $debug_info).await
    };
}

#[macro_export]
macro_rules! logging_critical {
    ($message:expr) => {
        Logger::add_system_log(LogLevel::Critical, format!("{}:{}", file!(), line!()), $message, "").await
    };
    ($message:expr, $debug_info:expr) => {
        Logger::add_system_log(LogLevel::Critical, format!("{}:{}", file!(), line!()), $message, $debug_info).await
    };
}

#[macro_export]
macro_rules! logging_emergency {
    ($message:expr) => {
        Logger::add_system_log(LogLevel::Emergency, format!("{}:{}", file!(), line!()), $message, "").await
    };
    ($message:expr, $debug_info:expr) => {
        Logger::add_system_log(LogLevel::Emergency, format!("{}:{}", file!(), line!()), $message, $debug_info).await
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[tokio::test]
    async fn records_and_filters_by_time() {
        let before = Local::now();
        logging_information!("history ready for logger test");
        let logs = Logger::get_system_logs().await;
        assert!(logs.iter().any(|entry| entry.message == "history ready for logger test"));

        let recent = Logger::get_system_logs_since(before).await;
        assert!(recent.iter().any(|entry| entry.message == "history ready for logger test"));
        let future = Logger::get_system_logs_since(Local::now() + Duration::hours(1)).await;
        assert!(future.is_empty());
    }

    #[test]
    fn buffer_drops_oldest_entries_when_full() {
        let mut logger = Logger::new();
        for index in 0..SYSTEM_LOG_CAPACITY {
            logger.push(LogEntry::new(LogLevel::Debug, "test", format!("entry {index}"), ""));
        }
        assert_eq!(logger.system_log.len(), SYSTEM_LOG_CAPACITY);
        assert_eq!(logger.system_log.front().map(|entry| entry.message.as_str()), Some("entry 0"));
        assert_eq!(logger.system_log.back().map(|entry| entry.message.as_str()), Some("entry 9999"));
    }

    #[tokio::test]
    async fn entries_carry_call_site() {
        logging_warning!(StoreEntry::StoreClosedError);
        let logs = Logger::get_system_logs().await;
        let entry = logs.iter().rev()
            .find(|entry| entry.message == "History writer is not running")
            .expect("warning should be recorded");
        assert_eq!(entry.level, LogLevel::Warning);
        assert!(entry.position.contains("logging.rs"));
    }
}
