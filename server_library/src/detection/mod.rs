pub mod annotator;
pub mod detector;
pub mod model;
pub mod postprocess;
pub mod yolo;
