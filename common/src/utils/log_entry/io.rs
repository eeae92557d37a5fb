use serde_json::error::Error as SerdeJsonError;
use std::io::Error as IoError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum IOEntry {
    #[error("Failed to create directory {0}: {1}")]
    CreateDirectoryError(String, IoError),
    #[error("Failed to open file {0}: {1}")]
    OpenFileError(String, IoError),
    #[error("Failed to read file {0}: {1}")]
    ReadFileError(String, IoError),
    #[error("Failed to write file {0}: {1}")]
    WriteFileError(String, IoError),
    #[error("Failed to move file {0} to {1}: {2}")]
    MoveFileError(String, String, IoError),
    #[error("Failed to serialize data: {0}")]
    SerdeSerializeError(SerdeJsonError),
    #[error("Failed to deserialize data: {0}")]
    SerdeDeserializeError(SerdeJsonError),
}

impl From<IOEntry> for String {
    #[inline(always)]
    fn from(value: IOEntry) -> Self {
        value.to_string()
    }
}
