#![allow(dead_code)]

use actix_web::web;
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use server_library::detection::annotator::Annotator;
use server_library::detection::model::{COCO_CLASSES, ObjectDetectionModel, RawDetection};
use server_library::history::history_entry::HistoryEntry;
use server_library::history::history_store::HistoryStore;
use server_library::server::app_state::AppState;
use server_library::utils::config::Config;
use server_library::utils::logging::DetectionEntry;
use std::io::Cursor;
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;

pub const BOUNDARY: &str = "luggage-test-boundary";

pub struct FakeModel {
    pub detections: Vec<RawDetection>,
}

impl ObjectDetectionModel for FakeModel {
    fn infer(&self, _image: &DynamicImage) -> Result<Vec<RawDetection>, DetectionEntry> {
        Ok(self.detections.clone())
    }

    fn label(&self, class_id: usize) -> Option<&str> {
        COCO_CLASSES.get(class_id).copied()
    }
}

pub struct TestContext {
    pub directory: TempDir,
    pub state: web::Data<AppState>,
}

pub fn config(root: &Path, max_upload_size: usize) -> Config {
    Config {
        http_server_bind_port: 0,
        bind_retry_duration: 1,
        upload_folder: root.join("uploads").display().to_string(),
        results_folder: root.join("results").display().to_string(),
        static_folder: root.join("static").display().to_string(),
        history_file: root.join("history.jsonl").display().to_string(),
        model_path: "unused.onnx".to_string(),
        confidence_threshold: 0.25,
        iou_threshold: 0.7,
        max_upload_size,
        font_path: "unused.ttf".to_string(),
        font_size: 16.0,
        border_width: 2,
        border_color: [0, 255, 0],
        text_color: [0, 255, 0],
        report_recent_entries: 10,
    }
}

pub fn context(detections: Vec<RawDetection>) -> TestContext {
    context_with(detections, Vec::new(), 1024 * 1024)
}

pub fn context_with(detections: Vec<RawDetection>, history: Vec<HistoryEntry>, max_upload_size: usize) -> TestContext {
    let directory = tempfile::tempdir().unwrap();
    let config = config(directory.path(), max_upload_size);
    std::fs::create_dir_all(config.upload_folder()).unwrap();
    std::fs::create_dir_all(config.results_folder()).unwrap();
    std::fs::create_dir_all(&config.static_folder).unwrap();
    let annotator = Annotator::new(None, config.font_size, config.border_width, config.border_color, config.text_color);
    let state = AppState::new(&config, Arc::new(FakeModel { detections }), annotator, HistoryStore::in_memory(history));
    TestContext {
        directory,
        state: web::Data::new(state),
    }
}

pub fn detection(class_id: usize, confidence: f32, bbox: [f32; 4]) -> RawDetection {
    RawDetection { class_id, confidence, bbox }
}

pub fn png_bytes() -> Vec<u8> {
    let image = RgbImage::from_pixel(64, 48, Rgb([180, 180, 180]));
    let mut bytes = Vec::new();
    image.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png).unwrap();
    bytes
}

/// One part per `(name, filename, content)`.
pub fn multipart(parts: &[(&str, Option<&str>, &[u8])]) -> (String, Vec<u8>) {
    let mut body = Vec::new();
    for (name, filename, content) in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        match filename {
            Some(filename) => {
                body.extend_from_slice(format!("Content-Disposition: form-data; name=\"{name}\"; filename=\"{filename}\"\r\n").as_bytes());
                body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
            }
            None => {
                body.extend_from_slice(format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes());
            }
        }
        body.extend_from_slice(content);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    (format!("multipart/form-data; boundary={BOUNDARY}"), body)
}

pub fn history_entry(filename: &str, luggage: usize) -> HistoryEntry {
    let records = (0..luggage)
        .map(|_| server_library::history::history_entry::DetectionRecord {
            class_label: "suitcase".to_string(),
            confidence: 0.9,
            bbox: [1, 1, 10, 10],
        })
        .collect();
    HistoryEntry::new(filename.to_string(), records, format!("results/result_{filename}"))
}
