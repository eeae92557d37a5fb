use thiserror::Error;

#[derive(Error, Debug)]
pub enum UploadEntry {
    #[error("File not found in request")]
    MissingFileError,
    #[error("No file selected")]
    EmptyFilenameError,
    #[error("Invalid filename")]
    InvalidFilenameError,
    #[error("Unsupported file format: {0}")]
    UnsupportedFormatError(String),
    #[error("File exceeds the maximum upload size of {0} bytes")]
    FileTooLargeError(usize),
    #[error("Invalid payload: {0}")]
    InvalidPayloadError(String),
}

impl From<UploadEntry> for String {
    #[inline(always)]
    fn from(value: UploadEntry) -> Self {
        value.to_string()
    }
}
