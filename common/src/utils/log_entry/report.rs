use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReportEntry {
    #[error("Unsupported report type: {0}")]
    UnsupportedReportTypeError(String),
    #[error("History is empty")]
    EmptyHistoryError,
    #[error("Failed to generate report: {0}")]
    ReportRenderError(String),
    #[error("Invalid request body: {0}")]
    InvalidRequestError(String),
    #[error("Report {0} generated")]
    ReportGenerated(String),
}

impl From<ReportEntry> for String {
    #[inline(always)]
    fn from(value: ReportEntry) -> Self {
        value.to_string()
    }
}
