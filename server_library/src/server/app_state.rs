use crate::detection::annotator::Annotator;
use crate::detection::detector::LuggageDetector;
use crate::detection::model::ObjectDetectionModel;
use crate::history::history_store::HistoryStore;
use crate::report::report_generator::ReportGenerator;
use crate::utils::config::Config;
use std::path::PathBuf;
use std::sync::Arc;

/// Everything the handlers share, built once at startup.
pub struct AppState {
    pub detector: LuggageDetector,
    pub annotator: Arc<Annotator>,
    pub history: HistoryStore,
    pub reports: ReportGenerator,
    pub upload_folder: PathBuf,
    pub results_folder: PathBuf,
    pub static_folder: PathBuf,
    pub max_upload_size: usize,
}

impl AppState {
    pub fn new(config: &Config, model: Arc<dyn ObjectDetectionModel>, annotator: Annotator, history: HistoryStore) -> Self {
        Self {
            detector: LuggageDetector::new(model),
            annotator: Arc::new(annotator),
            history,
            reports: ReportGenerator::new(config.results_folder(), config.report_recent_entries),
            upload_folder: config.upload_folder(),
            results_folder: config.results_folder(),
            static_folder: PathBuf::from(&config.static_folder),
            max_upload_size: config.max_upload_size,
        }
    }
}
