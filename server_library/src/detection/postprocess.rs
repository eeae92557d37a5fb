use crate::detection::model::RawDetection;
use common::utils::log_entry::detection::DetectionEntry;

pub const MAX_DETECTIONS: usize = 300;

/// Aspect-preserving fit of an image into the square model input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Letterbox {
    pub ratio: f32,
    pub resized_width: u32,
    pub resized_height: u32,
    pub offset_x: u32,
    pub offset_y: u32,
    original_width: u32,
    original_height: u32,
}

impl Letterbox {
    pub fn new(original_width: u32, original_height: u32, input_size: u32) -> Self {
        let ratio = (input_size as f32 / original_width.max(1) as f32)
            .min(input_size as f32 / original_height.max(1) as f32);
        let resized_width = ((original_width as f32 * ratio).round() as u32).clamp(1, input_size);
        let resized_height = ((original_height as f32 * ratio).round() as u32).clamp(1, input_size);
        Self {
            ratio,
            resized_width,
            resized_height,
            offset_x: (input_size - resized_width) / 2,
            offset_y: (input_size - resized_height) / 2,
            original_width,
            original_height,
        }
    }

    /// Maps a box from model input space back onto the original image.
    pub fn restore(&self, bbox: [f32; 4]) -> [f32; 4] {
        let width = self.original_width as f32;
        let height = self.original_height as f32;
        [
            ((bbox[0] - self.offset_x as f32) / self.ratio).clamp(0.0, width),
            ((bbox[1] - self.offset_y as f32) / self.ratio).clamp(0.0, height),
            ((bbox[2] - self.offset_x as f32) / self.ratio).clamp(0.0, width),
            ((bbox[3] - self.offset_y as f32) / self.ratio).clamp(0.0, height),
        ]
    }
}

/// Reads a YOLOv8 head output of shape `[1, 4 + classes, anchors]` or its
/// transpose. Boxes stay in model input space.
pub fn decode_output(shape: &[usize], data: &[f32], classes: usize, confidence_threshold: f32) -> Result<Vec<RawDetection>, DetectionEntry> {
    let features = classes + 4;
    if classes == 0 || shape.len() != 3 || shape[0] != 1 {
        return Err(DetectionEntry::InvalidOutputShape(format!("{shape:?}")));
    }
    let (channel_first, anchors) = if shape[1] == features {
        (true, shape[2])
    } else if shape[2] == features {
        (false, shape[1])
    } else {
        return Err(DetectionEntry::InvalidOutputShape(format!("{shape:?} for {classes} classes")));
    };
    if data.len() != features * anchors {
        return Err(DetectionEntry::InvalidOutputShape(format!("{shape:?} with {} values", data.len())));
    }
    let value = |anchor: usize, feature: usize| {
        if channel_first {
            data[feature * anchors + anchor]
        } else {
            data[anchor * features + feature]
        }
    };
    let mut detections = Vec::new();
    for anchor in 0..anchors {
        let (class_id, confidence) = (4..features)
            .map(|feature| (feature - 4, value(anchor, feature)))
            .fold((0, f32::MIN), |best, candidate| if candidate.1 > best.1 { candidate } else { best });
        if confidence < confidence_threshold {
            continue;
        }
        let (center_x, center_y) = (value(anchor, 0), value(anchor, 1));
        let (half_width, half_height) = (value(anchor, 2) / 2.0, value(anchor, 3) / 2.0);
        detections.push(RawDetection {
            class_id,
            confidence,
            bbox: [center_x - half_width, center_y - half_height, center_x + half_width, center_y + half_height],
        });
    }
    Ok(detections)
}

pub fn intersection_over_union(a: &[f32; 4], b: &[f32; 4]) -> f32 {
    let width = (a[2].min(b[2]) - a[0].max(b[0])).max(0.0);
    let height = (a[3].min(b[3]) - a[1].max(b[1])).max(0.0);
    let intersection = width * height;
    let area_a = (a[2] - a[0]).max(0.0) * (a[3] - a[1]).max(0.0);
    let area_b = (b[2] - b[0]).max(0.0) * (b[3] - b[1]).max(0.0);
    let union = area_a + area_b - intersection;
    if union <= 0.0 { 0.0 } else { intersection / union }
}

/// Per-class greedy suppression, highest confidence first.
pub fn non_max_suppression(mut detections: Vec<RawDetection>, iou_threshold: f32) -> Vec<RawDetection> {
    detections.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));
    let mut kept: Vec<RawDetection> = Vec::new();
    for detection in detections {
        let suppressed = kept.iter().any(|other| {
            other.class_id == detection.class_id
                && intersection_over_union(&other.bbox, &detection.bbox) > iou_threshold
        });
        if !suppressed {
            kept.push(detection);
            if kept.len() == MAX_DETECTIONS {
                break;
            }
        }
    }
    kept
}
