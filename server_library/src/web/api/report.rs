use crate::report::report_type::ReportType;
use crate::server::app_state::AppState;
use crate::utils::logging::*;
use crate::web::utils::response::{ApiError, logged};
use actix_files::NamedFile;
use actix_web::http::header::{ContentDisposition, DispositionParam, DispositionType};
use actix_web::{post, web, HttpRequest, HttpResponse};
use serde::Deserialize;
use tokio::task::spawn_blocking;

#[derive(Deserialize, Debug, Default)]
pub struct ReportRequest {
    #[serde(rename = "type", default)]
    pub report_type: Option<String>,
}

/// Malformed or non-JSON bodies become a 400 with the usual error shape.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _| {
        ApiError::from(ReportEntry::InvalidRequestError(err.to_string())).into()
    })
}

#[post("/generate-report")]
pub async fn generate_report(req: HttpRequest, state: web::Data<AppState>, request: web::Json<ReportRequest>) -> Result<HttpResponse, ApiError> {
    logged(generate(req, state, request.into_inner()).await).await
}

async fn generate(req: HttpRequest, state: web::Data<AppState>, request: ReportRequest) -> Result<HttpResponse, ApiError> {
    let history = state.history.list().await?;
    if history.is_empty() {
        return Err(ReportEntry::EmptyHistoryError.into());
    }
    let report_type = request.report_type.as_deref().unwrap_or("pdf").parse::<ReportType>()?;
    let reports = state.reports.clone();
    let report = spawn_blocking(move || reports.generate(&history, report_type))
        .await
        .map_err(SystemEntry::TaskPanickedError)??;
    logging_information!(ReportEntry::ReportGenerated(report.filename.clone()));

    let named_file = NamedFile::open_async(&report.path).await
        .map_err(|err| IOEntry::OpenFileError(report.path.display().to_string(), err))?;
    let content_disposition = ContentDisposition {
        disposition: DispositionType::Attachment,
        parameters: vec![
            DispositionParam::Filename(report.filename.clone()),
        ],
    };
    Ok(named_file
        .set_content_disposition(content_disposition)
        .set_content_type(mime_guess::from_path(&report.path).first_or_octet_stream())
        .into_response(&req))
}
