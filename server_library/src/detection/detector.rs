use crate::detection::annotator::Annotator;
use crate::detection::model::{ObjectDetectionModel, RawDetection};
use crate::history::history_entry::DetectionRecord;
use common::utils::log_entry::detection::DetectionEntry;
use image::{DynamicImage, ImageError, ImageReader, RgbImage};
use std::path::Path;
use std::sync::Arc;

pub const LUGGAGE_CLASS_IDS: [usize; 5] = [24, 26, 27, 28, 32];
pub const LUGGAGE_CLASS_NAMES: [&str; 5] = ["suitcase", "handbag", "backpack", "bag", "sports ball"];

pub struct DetectionOutcome {
    pub annotated: RgbImage,
    pub detections: Vec<DetectionRecord>,
    pub luggage_count: usize,
}

/// Runs the model and keeps only luggage-like objects.
#[derive(Clone)]
pub struct LuggageDetector {
    model: Arc<dyn ObjectDetectionModel>,
}

impl LuggageDetector {
    pub fn new(model: Arc<dyn ObjectDetectionModel>) -> Self {
        Self { model }
    }

    /// The decoder is chosen from the file contents, not the extension.
    pub fn load_image<P: AsRef<Path>>(path: P) -> Result<DynamicImage, DetectionEntry> {
        let reader = ImageReader::open(path)
            .and_then(|reader| reader.with_guessed_format())
            .map_err(|err| DetectionEntry::ImageDecodeError(ImageError::IoError(err)))?;
        reader.decode().map_err(DetectionEntry::ImageDecodeError)
    }

    pub fn detect(&self, image: &DynamicImage) -> Result<Vec<DetectionRecord>, DetectionEntry> {
        let detections = self.model.infer(image)?
            .into_iter()
            .filter_map(|detection| self.to_record(detection))
            .collect();
        Ok(detections)
    }

    /// Decodes, detects and annotates in one pass. Nothing is returned on failure.
    pub fn process<P: AsRef<Path>>(&self, path: P, annotator: &Annotator) -> Result<DetectionOutcome, DetectionEntry> {
        let image = Self::load_image(path)?;
        let detections = self.detect(&image)?;
        let annotated = annotator.annotate(&image, &detections);
        Ok(DetectionOutcome {
            annotated,
            luggage_count: detections.len(),
            detections,
        })
    }

    fn to_record(&self, detection: RawDetection) -> Option<DetectionRecord> {
        let label = self.model.label(detection.class_id)
            .map(str::to_string)
            .unwrap_or_else(|| format!("class_{}", detection.class_id));
        if !is_luggage(detection.class_id, &label) {
            return None;
        }
        let [x1, y1, x2, y2] = detection.bbox;
        Some(DetectionRecord {
            class_label: label,
            confidence: round_half_even(detection.confidence as f64, 2),
            bbox: [x1 as i32, y1 as i32, x2 as i32, y2 as i32],
        })
    }
}

/// Rounds to `digits` decimals on the exact binary value, ties to even.
pub fn round_half_even(value: f64, digits: usize) -> f64 {
    format!("{value:.digits$}").parse().unwrap_or(value)
}

pub fn is_luggage(class_id: usize, label: &str) -> bool {
    LUGGAGE_CLASS_IDS.contains(&class_id) || LUGGAGE_CLASS_NAMES.contains(&label)
}
