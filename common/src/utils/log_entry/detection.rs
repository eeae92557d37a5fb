use image::ImageError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DetectionEntry {
    #[error("Failed to decode image: {0}")]
    ImageDecodeError(ImageError),
    #[error("Failed to load detection model: {0}")]
    ModelLoadError(String),
    #[error("Inference failed: {0}")]
    DetectionError(String),
    #[error("Unexpected model output shape: {0}")]
    InvalidOutputShape(String),
    #[error("Failed to encode annotated image: {0}")]
    EncodeError(ImageError),
    #[error("Processed {0}: {1} luggage item(s) detected")]
    ImageProcessed(String, usize),
}

impl From<DetectionEntry> for String {
    #[inline(always)]
    fn from(value: DetectionEntry) -> Self {
        value.to_string()
    }
}
