use crate::history::history_entry::DetectionRecord;
use crate::utils::config::Config;
use crate::utils::logging::*;
use ab_glyph::FontArc;
use image::{DynamicImage, Rgb, RgbImage};
use imageproc::drawing::{draw_hollow_rect_mut, draw_text_mut};
use imageproc::rect::Rect;
use tokio::fs;

const LABEL_MARGIN: f32 = 4.0;

pub struct Annotator {
    font: Option<FontArc>,
    font_size: f32,
    border_width: u32,
    border_color: Rgb<u8>,
    text_color: Rgb<u8>,
}

impl Annotator {
    pub fn new(font: Option<FontArc>, font_size: f32, border_width: u32, border_color: [u8; 3], text_color: [u8; 3]) -> Self {
        Self {
            font,
            font_size,
            border_width,
            border_color: Rgb(border_color),
            text_color: Rgb(text_color),
        }
    }

    /// Loads the label font named in the configuration. Boxes are still drawn
    /// when the font cannot be read.
    pub async fn from_config(config: &Config) -> Self {
        let font = match fs::read(&config.font_path).await {
            Ok(data) => match FontArc::try_from_vec(data) {
                Ok(font) => Some(font),
                Err(err) => {
                    logging_warning!(SystemEntry::FontUnavailable(format!("{}: {err}", config.font_path)));
                    None
                }
            },
            Err(err) => {
                logging_warning!(SystemEntry::FontUnavailable(format!("{}: {err}", config.font_path)));
                None
            }
        };
        Self::new(font, config.font_size, config.border_width, config.border_color, config.text_color)
    }

    pub fn annotate(&self, image: &DynamicImage, detections: &[DetectionRecord]) -> RgbImage {
        let mut canvas = image.to_rgb8();
        for detection in detections {
            let [x1, y1, x2, y2] = detection.bbox;
            let base_rectangle = Rect::at(x1, y1)
                .of_size((x2 - x1).max(1) as u32, (y2 - y1).max(1) as u32);
            for i in 0..self.border_width {
                let offset_rect = Rect::at(base_rectangle.left() - i as i32, base_rectangle.top() - i as i32)
                    .of_size(base_rectangle.width() + 2 * i, base_rectangle.height() + 2 * i);
                draw_hollow_rect_mut(&mut canvas, offset_rect, self.border_color);
            }
            if let Some(font) = &self.font {
                let text = format!("{} {:.2}", detection.class_label, detection.confidence);
                let position_y = ((y1 as f32) - self.font_size - LABEL_MARGIN).max(0.0) as i32;
                draw_text_mut(&mut canvas, self.text_color, x1.max(0), position_y, self.font_size, font, &text);
            }
        }
        canvas
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(bbox: [i32; 4]) -> DetectionRecord {
        DetectionRecord {
            class_label: "suitcase".to_string(),
            confidence: 0.91,
            bbox,
        }
    }

    #[test]
    fn draws_border_without_touching_source() {
        let source = DynamicImage::ImageRgb8(RgbImage::new(40, 40));
        let annotator = Annotator::new(None, 12.0, 2, [0, 255, 0], [0, 255, 0]);
        let annotated = annotator.annotate(&source, &[record([10, 10, 30, 30])]);
        assert_eq!(annotated.get_pixel(10, 20), &Rgb([0, 255, 0]));
        assert_eq!(annotated.get_pixel(9, 20), &Rgb([0, 255, 0]));
        assert_eq!(annotated.get_pixel(20, 20), &Rgb([0, 0, 0]));
        assert_eq!(source.to_rgb8().get_pixel(10, 20), &Rgb([0, 0, 0]));
    }

    #[test]
    fn label_is_drawn_above_box() {
        let font = FontArc::try_from_slice(include_bytes!("../../../fonts/DejaVuSans.ttf")).unwrap();
        let source = DynamicImage::ImageRgb8(RgbImage::new(100, 60));
        let annotator = Annotator::new(Some(font), 12.0, 1, [0, 255, 0], [255, 0, 0]);
        let annotated = annotator.annotate(&source, &[record([10, 30, 80, 55])]);

        let label_pixels = (10..90)
            .flat_map(|x| (12..29).map(move |y| (x, y)))
            .filter(|&(x, y)| annotated.get_pixel(x, y)[0] > 0)
            .count();
        assert!(label_pixels > 0);
        assert!((0..100).all(|x| (0..12).all(|y| annotated.get_pixel(x, y) == &Rgb([0, 0, 0]))));
        assert_eq!(annotated.get_pixel(10, 40), &Rgb([0, 255, 0]));
    }

    #[test]
    fn label_near_top_edge_is_clamped() {
        let font = FontArc::try_from_slice(include_bytes!("../../../fonts/DejaVuSans.ttf")).unwrap();
        let source = DynamicImage::ImageRgb8(RgbImage::new(60, 40));
        let annotator = Annotator::new(Some(font), 12.0, 1, [0, 255, 0], [255, 0, 0]);
        let annotated = annotator.annotate(&source, &[record([2, 2, 50, 30])]);
        let label_pixels = annotated.pixels().filter(|pixel| pixel[0] > 0).count();
        assert!(label_pixels > 0);
    }

    #[test]
    fn degenerate_and_out_of_bounds_boxes_do_not_panic() {
        let source = DynamicImage::ImageRgb8(RgbImage::new(16, 16));
        let annotator = Annotator::new(None, 12.0, 3, [255, 0, 0], [255, 0, 0]);
        let annotated = annotator.annotate(&source, &[record([5, 5, 5, 5]), record([-10, -10, 100, 100])]);
        assert_eq!(annotated.dimensions(), (16, 16));
    }

    #[test]
    fn no_detections_leaves_image_unchanged() {
        let source = DynamicImage::ImageRgb8(RgbImage::from_pixel(8, 8, Rgb([7, 8, 9])));
        let annotator = Annotator::new(None, 12.0, 2, [0, 255, 0], [0, 255, 0]);
        assert_eq!(annotator.annotate(&source, &[]), source.to_rgb8());
    }
}
