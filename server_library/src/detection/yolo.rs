use crate::detection::model::{COCO_CLASSES, ObjectDetectionModel, RawDetection};
use crate::detection::postprocess::{Letterbox, decode_output, non_max_suppression};
use common::utils::log_entry::detection::DetectionEntry;
use image::{DynamicImage, Rgb, RgbImage, imageops};
use ndarray::Array4;
use ort::session::Session;
use ort::session::builder::GraphOptimizationLevel;
use ort::value::Tensor;
use std::fmt::Display;
use std::path::Path;
use std::sync::Mutex;

const INPUT_SIZE: u32 = 640;
const PADDING_VALUE: u8 = 114;

/// YOLOv8 detector exported to ONNX, trained on the 80 COCO classes.
pub struct YoloModel {
    session: Mutex<Session>,
    input_size: u32,
    confidence_threshold: f32,
    iou_threshold: f32,
    names: Vec<String>,
}

impl YoloModel {
    pub fn new<P: AsRef<Path>>(model_path: P, confidence_threshold: f32, iou_threshold: f32) -> Result<Self, DetectionEntry> {
        let session = Session::builder()
            .map_err(model_load_error)?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(model_load_error)?
            .commit_from_file(model_path.as_ref())
            .map_err(model_load_error)?;
        Ok(Self {
            session: Mutex::new(session),
            input_size: INPUT_SIZE,
            confidence_threshold,
            iou_threshold,
            names: COCO_CLASSES.iter().map(|name| name.to_string()).collect(),
        })
    }

    fn preprocess(&self, image: &DynamicImage) -> (Array4<f32>, Letterbox) {
        let rgb = image.to_rgb8();
        let letterbox = Letterbox::new(rgb.width(), rgb.height(), self.input_size);
        let resized = imageops::resize(&rgb, letterbox.resized_width, letterbox.resized_height, imageops::FilterType::Triangle);
        let mut canvas = RgbImage::from_pixel(self.input_size, self.input_size, Rgb([PADDING_VALUE; 3]));
        imageops::replace(&mut canvas, &resized, letterbox.offset_x as i64, letterbox.offset_y as i64);

        let size = self.input_size as usize;
        let mut tensor = Array4::<f32>::zeros((1, 3, size, size));
        for (x, y, pixel) in canvas.enumerate_pixels() {
            for channel in 0..3 {
                tensor[[0, channel, y as usize, x as usize]] = pixel[channel] as f32 / 255.0;
            }
        }
        (tensor, letterbox)
    }
}

impl ObjectDetectionModel for YoloModel {
    fn infer(&self, image: &DynamicImage) -> Result<Vec<RawDetection>, DetectionEntry> {
        let (input, letterbox) = self.preprocess(image);
        let tensor = Tensor::from_array(input).map_err(detection_error)?;
        let mut session = self.session.lock()
            .map_err(|_| DetectionEntry::DetectionError("Session lock poisoned".to_string()))?;
        let outputs = session.run(ort::inputs![tensor]).map_err(detection_error)?;
        let output = outputs.get("output0")
            .or_else(|| outputs.get("output"))
            .ok_or_else(|| DetectionEntry::DetectionError("Model has no output0 tensor".to_string()))?;
        let (shape, data) = output.try_extract_tensor::<f32>().map_err(detection_error)?;
        let shape: Vec<usize> = shape.iter().map(|dimension| (*dimension).max(0) as usize).collect();

        let candidates = decode_output(&shape, data, self.names.len(), self.confidence_threshold)?;
        Ok(non_max_suppression(candidates, self.iou_threshold)
            .into_iter()
            .map(|detection| RawDetection {
                bbox: letterbox.restore(detection.bbox),
                ..detection
            })
            .collect())
    }

    fn label(&self, class_id: usize) -> Option<&str> {
        self.names.get(class_id).map(String::as_str)
    }
}

fn model_load_error(err: impl Display) -> DetectionEntry {
    DetectionEntry::ModelLoadError(err.to_string())
}

fn detection_error(err: impl Display) -> DetectionEntry {
    DetectionEntry::DetectionError(err.to_string())
}
