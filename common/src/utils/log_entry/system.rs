use std::io::Error as IoError;
use thiserror::Error;
use tokio::task::JoinError;
use toml::de::Error as TomlError;

#[derive(Error, Debug)]
pub enum SystemEntry {
    #[error("Online now")]
    Online,
    #[error("Initializing")]
    Initializing,
    #[error("Initialization completed")]
    InitializeComplete,
    #[error("Termination in process")]
    Terminating,
    #[error("Termination completed")]
    TerminateComplete,
    #[error("Configuration not found: {0}")]
    ConfigNotFound(IoError),
    #[error("Unable to parse configuration: {0}")]
    ConfigParseError(TomlError),
    #[error("Invalid configuration")]
    InvalidConfig,
    #[error("Web service ready")]
    WebReady,
    #[error("Web service panic: {0}")]
    WebPanic(IoError),
    #[error("Failed to bind port: {0}")]
    BindPortError(IoError),
    #[error("Detection model {0} loaded")]
    ModelReady(String),
    #[error("Label font unavailable, annotations are drawn without text: {0}")]
    FontUnavailable(String),
    #[error("Task panic while execution: {0}")]
    TaskPanickedError(JoinError),
}

impl From<SystemEntry> for String {
    #[inline(always)]
    fn from(value: SystemEntry) -> Self {
        value.to_string()
    }
}
