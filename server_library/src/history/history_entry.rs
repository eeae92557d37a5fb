use chrono::{DateTime, Local, NaiveDateTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const REPORT_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One detected luggage object, as reported to clients and stored in history.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct DetectionRecord {
    #[serde(rename = "class")]
    pub class_label: String,
    pub confidence: f64,
    /// `[x1, y1, x2, y2]` in pixels of the original image.
    pub bbox: [i32; 4],
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct HistoryEntry {
    pub id: String,
    pub timestamp: String,
    pub filename: String,
    pub luggage_count: usize,
    pub detected_objects: Vec<DetectionRecord>,
    pub result_path: String,
}

impl HistoryEntry {
    pub fn new(filename: String, detected_objects: Vec<DetectionRecord>, result_path: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            timestamp: Local::now().naive_local().format("%Y-%m-%dT%H:%M:%S%.6f").to_string(),
            filename,
            luggage_count: detected_objects.len(),
            detected_objects,
            result_path,
        }
    }

    /// Timestamp rendered for reports. Unparseable values are passed through unchanged.
    pub fn formatted_timestamp(&self) -> String {
        if let Ok(naive) = NaiveDateTime::parse_from_str(&self.timestamp, "%Y-%m-%dT%H:%M:%S%.f") {
            return naive.format(REPORT_TIMESTAMP_FORMAT).to_string();
        }
        match DateTime::parse_from_rfc3339(&self.timestamp) {
            Ok(datetime) => datetime.naive_local().format(REPORT_TIMESTAMP_FORMAT).to_string(),
            Err(_) => self.timestamp.clone(),
        }
    }

    pub fn class_labels(&self) -> Vec<&str> {
        self.detected_objects.iter().map(|record| record.class_label.as_str()).collect()
    }
}
