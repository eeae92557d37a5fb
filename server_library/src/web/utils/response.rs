use crate::history::history_entry::DetectionRecord;
use crate::utils::logging::*;
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ErrorBody {
    pub error: String,
}

impl ErrorBody {
    pub fn new<T: Into<String>>(error: T) -> Self {
        Self {
            error: error.into(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ProcessResponse {
    pub success: bool,
    pub luggage_count: usize,
    pub detected_objects: Vec<DetectionRecord>,
    pub result_image: String,
    pub history_id: String,
}

/// Every failure a handler can report, rendered as `{"error": message}`.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    Upload(#[from] UploadEntry),
    #[error(transparent)]
    Detection(#[from] DetectionEntry),
    #[error(transparent)]
    Store(#[from] StoreEntry),
    #[error(transparent)]
    Report(#[from] ReportEntry),
    #[error(transparent)]
    IO(#[from] IOEntry),
    #[error(transparent)]
    System(#[from] SystemEntry),
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Upload(UploadEntry::FileTooLargeError(_)) => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::Upload(_) => StatusCode::BAD_REQUEST,
            ApiError::Store(StoreEntry::HistoryNotFoundError(_)) => StatusCode::NOT_FOUND,
            ApiError::Report(ReportEntry::ReportRenderError(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Report(_) => StatusCode::BAD_REQUEST,
            ApiError::Detection(_) | ApiError::Store(_) | ApiError::IO(_) | ApiError::System(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorBody::new(self.to_string()))
    }
}

/// Records server-side failures in the service log before they are rendered.
pub async fn logged<T>(result: Result<T, ApiError>) -> Result<T, ApiError> {
    if let Err(err) = &result {
        if err.status_code().is_server_error() {
            logging_error!(err.to_string());
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;

    #[test]
    fn maps_entries_to_status_codes() {
        assert_eq!(ApiError::from(UploadEntry::MissingFileError).status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::from(UploadEntry::FileTooLargeError(10)).status_code(), StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(ApiError::from(StoreEntry::HistoryNotFoundError("x".to_string())).status_code(), StatusCode::NOT_FOUND);
        assert_eq!(ApiError::from(StoreEntry::StoreClosedError).status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(ApiError::from(ReportEntry::EmptyHistoryError).status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::from(ReportEntry::UnsupportedReportTypeError("csv".to_string())).status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::from(ReportEntry::ReportRenderError("disk".to_string())).status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(ApiError::from(DetectionEntry::DetectionError("boom".to_string())).status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[actix_web::test]
    async fn error_body_carries_entry_message() {
        let response = ApiError::from(UploadEntry::EmptyFilenameError).error_response();
        let body = to_bytes(response.into_body()).await.unwrap();
        let body: ErrorBody = serde_json::from_slice(&body).unwrap();
        assert_eq!(body.error, "No file selected");
    }
}
