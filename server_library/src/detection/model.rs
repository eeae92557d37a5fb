use common::utils::log_entry::detection::DetectionEntry;
use image::DynamicImage;

/// A region reported by the model, in original image coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct RawDetection {
    pub class_id: usize,
    pub confidence: f32,
    pub bbox: [f32; 4],
}

/// Pretrained object detector treated as a black box.
pub trait ObjectDetectionModel: Send + Sync {
    fn infer(&self, image: &DynamicImage) -> Result<Vec<RawDetection>, DetectionEntry>;

    fn label(&self, class_id: usize) -> Option<&str>;
}

pub const COCO_CLASSES: [&str; 80] = [
    "person", "bicycle", "car", "motorcycle", "airplane", "bus", "train", "truck", "boat",
    "traffic light", "fire hydrant", "stop sign", "parking meter", "bench", "bird", "cat", "dog",
    "horse", "sheep", "cow", "elephant", "bear", "zebra", "giraffe", "backpack", "umbrella",
    "handbag", "tie", "suitcase", "frisbee", "skis", "snowboard", "sports ball", "kite",
    "baseball bat", "baseball glove", "skateboard", "surfboard", "tennis racket", "bottle",
    "wine glass", "cup", "fork", "knife", "spoon", "bowl", "banana", "apple", "sandwich", "orange",
    "broccoli", "carrot", "hot dog", "pizza", "donut", "cake", "chair", "couch", "potted plant",
    "bed", "dining table", "toilet", "tv", "laptop", "mouse", "remote", "keyboard", "cell phone",
    "microwave", "oven", "toaster", "sink", "refrigerator", "book", "clock", "vase", "scissors",
    "teddy bear", "hair drier", "toothbrush",
];
