use crate::detection::detector::DetectionOutcome;
use crate::history::history_entry::HistoryEntry;
use crate::server::app_state::AppState;
use crate::utils::logging::*;
use crate::web::utils::response::{ApiError, ProcessResponse, logged};
use crate::web::utils::upload::{UploadedFile, save_upload};
use actix_multipart::Multipart;
use actix_web::{post, web, HttpResponse};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use image::ImageFormat;
use std::io::Cursor;
use std::path::PathBuf;
use tokio::task::spawn_blocking;

struct ProcessedImage {
    outcome: DetectionOutcome,
    jpeg: Vec<u8>,
    result_path: PathBuf,
}

#[post("/process")]
pub async fn process_image(state: web::Data<AppState>, payload: Multipart) -> Result<HttpResponse, ApiError> {
    logged(process(state, payload).await).await
}

async fn process(state: web::Data<AppState>, payload: Multipart) -> Result<HttpResponse, ApiError> {
    let upload = save_upload(payload, &state.upload_folder, state.max_upload_size).await?;
    let result_path = state.results_folder.join(format!("result_{}.jpg", upload.stem()));
    let processed = run_detection(&state, &upload, result_path).await?;

    let entry = HistoryEntry::new(
        upload.filename.clone(),
        processed.outcome.detections.clone(),
        processed.result_path.display().to_string(),
    );
    let history_id = entry.id.clone();
    state.history.append(entry).await?;
    logging_information!(DetectionEntry::ImageProcessed(upload.storage_name.clone(), processed.outcome.luggage_count));

    Ok(HttpResponse::Ok().json(ProcessResponse {
        success: true,
        luggage_count: processed.outcome.luggage_count,
        detected_objects: processed.outcome.detections,
        result_image: format!("data:image/jpeg;base64,{}", STANDARD.encode(&processed.jpeg)),
        history_id,
    }))
}

/// Detection, annotation and the result file write happen on a blocking worker.
async fn run_detection(state: &AppState, upload: &UploadedFile, result_path: PathBuf) -> Result<ProcessedImage, ApiError> {
    let detector = state.detector.clone();
    let annotator = state.annotator.clone();
    let upload_path = upload.path.clone();
    spawn_blocking(move || -> Result<ProcessedImage, ApiError> {
        let outcome = detector.process(&upload_path, &annotator)?;
        let mut jpeg = Vec::new();
        outcome.annotated
            .write_to(&mut Cursor::new(&mut jpeg), ImageFormat::Jpeg)
            .map_err(DetectionEntry::EncodeError)?;
        std::fs::write(&result_path, &jpeg)
            .map_err(|err| IOEntry::WriteFileError(result_path.display().to_string(), err))?;
        Ok(ProcessedImage {
            outcome,
            jpeg,
            result_path,
        })
    })
    .await
    .map_err(SystemEntry::TaskPanickedError)?
}
