use crate::history::history_entry::HistoryEntry;
use crate::report::statistics::ReportStatistics;
use common::utils::log_entry::report::ReportEntry;
use printpdf::path::{PaintMode, WindingOrder};
use printpdf::{BuiltinFont, Color, IndirectFontRef, Line, Mm, PdfDocument, PdfDocumentReference, PdfLayerReference, Point, Polygon, Rgb};
use std::fmt::Display;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

const PAGE_WIDTH: f32 = 210.0;
const PAGE_HEIGHT: f32 = 297.0;
const MARGIN: f32 = 20.0;
const LINE_HEIGHT: f32 = 6.0;
const TABLE_COLUMN_WIDTHS: [f32; 2] = [76.2, 50.8];
const TABLE_HEADER_HEIGHT: f32 = 11.0;
const TABLE_ROW_HEIGHT: f32 = 8.0;
// Helvetica averages about half an em per glyph; 1pt = 0.3528mm.
const GLYPH_WIDTH_RATIO: f32 = 0.5 * 0.3528;

/// Builtin PDF fonts only cover Latin-1; anything beyond renders as `?`.
pub fn pdf_safe_text(text: &str) -> String {
    text.chars().map(|c| if (c as u32) < 256 { c } else { '?' }).collect()
}

struct PdfWriter {
    document: PdfDocumentReference,
    layer: PdfLayerReference,
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    cursor: f32,
    pages: usize,
}

impl PdfWriter {
    fn new(title: &str) -> Result<Self, ReportEntry> {
        let (document, page, layer) = PdfDocument::new(title, Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");
        let regular = document.add_builtin_font(BuiltinFont::Helvetica).map_err(render_error)?;
        let bold = document.add_builtin_font(BuiltinFont::HelveticaBold).map_err(render_error)?;
        let layer = document.get_page(page).get_layer(layer);
        Ok(Self {
            document,
            layer,
            regular,
            bold,
            cursor: PAGE_HEIGHT - MARGIN,
            pages: 1,
        })
    }

    fn ensure_space(&mut self, height: f32) {
        if self.cursor - height >= MARGIN {
            return;
        }
        let (page, layer) = self.document.add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), format!("Layer {}", self.pages + 1));
        self.layer = self.document.get_page(page).get_layer(layer);
        self.cursor = PAGE_HEIGHT - MARGIN;
        self.pages += 1;
    }

    fn text(&self, text: &str, size: f32, x: f32, y: f32, bold: bool, color: (f32, f32, f32)) {
        let font = if bold { &self.bold } else { &self.regular };
        self.layer.set_fill_color(rgb(color));
        self.layer.use_text(pdf_safe_text(text), size, Mm(x), Mm(y), font);
    }

    fn paragraph(&mut self, text: &str, size: f32, bold: bool) {
        let height = size * 0.3528 + LINE_HEIGHT / 2.0;
        self.ensure_space(height);
        self.cursor -= height;
        self.text(text, size, MARGIN, self.cursor, bold, (0.0, 0.0, 0.0));
    }

    fn spacer(&mut self, height: f32) {
        self.cursor -= height;
    }

    fn fill_rect(&self, x: f32, y: f32, width: f32, height: f32, color: (f32, f32, f32)) {
        let ring = vec![
            (Point::new(Mm(x), Mm(y)), false),
            (Point::new(Mm(x + width), Mm(y)), false),
            (Point::new(Mm(x + width), Mm(y + height)), false),
            (Point::new(Mm(x), Mm(y + height)), false),
        ];
        self.layer.set_fill_color(rgb(color));
        self.layer.add_polygon(Polygon {
            rings: vec![ring],
            mode: PaintMode::Fill,
            winding_order: WindingOrder::NonZero,
        });
    }

    fn line(&self, from: (f32, f32), to: (f32, f32)) {
        self.layer.add_line(Line {
            points: vec![
                (Point::new(Mm(from.0), Mm(from.1)), false),
                (Point::new(Mm(to.0), Mm(to.1)), false),
            ],
            is_closed: false,
        });
    }

    /// Grey header row, beige body, black grid, centered cells.
    fn table(&mut self, header: [&str; 2], rows: &[(&str, String)]) {
        let total_width: f32 = TABLE_COLUMN_WIDTHS.iter().sum();
        let total_height = TABLE_HEADER_HEIGHT + TABLE_ROW_HEIGHT * rows.len() as f32;
        self.ensure_space(total_height);
        let top = self.cursor;
        let bottom = top - total_height;

        self.fill_rect(MARGIN, top - TABLE_HEADER_HEIGHT, total_width, TABLE_HEADER_HEIGHT, (0.5, 0.5, 0.5));
        self.fill_rect(MARGIN, bottom, total_width, total_height - TABLE_HEADER_HEIGHT, (0.96, 0.96, 0.86));

        self.layer.set_outline_color(rgb((0.0, 0.0, 0.0)));
        self.layer.set_outline_thickness(1.0);
        let mut y = top;
        self.line((MARGIN, y), (MARGIN + total_width, y));
        y -= TABLE_HEADER_HEIGHT;
        for _ in 0..=rows.len() {
            self.line((MARGIN, y), (MARGIN + total_width, y));
            y -= TABLE_ROW_HEIGHT;
        }
        let mut x = MARGIN;
        self.line((x, top), (x, bottom));
        for width in TABLE_COLUMN_WIDTHS {
            x += width;
            self.line((x, top), (x, bottom));
        }

        let header_baseline = top - TABLE_HEADER_HEIGHT + 3.5;
        self.centered_cells(&header, header_baseline, 14.0, true, (0.96, 0.96, 0.96));
        for (index, (parameter, value)) in rows.iter().enumerate() {
            let baseline = top - TABLE_HEADER_HEIGHT - TABLE_ROW_HEIGHT * (index + 1) as f32 + 2.5;
            self.centered_cells(&[*parameter, value.as_str()], baseline, 11.0, false, (0.0, 0.0, 0.0));
        }
        self.cursor = bottom;
    }

    fn centered_cells(&self, cells: &[&str; 2], baseline: f32, size: f32, bold: bool, color: (f32, f32, f32)) {
        let mut left = MARGIN;
        for (cell, width) in cells.iter().zip(TABLE_COLUMN_WIDTHS) {
            let text_width = cell.chars().count() as f32 * size * GLYPH_WIDTH_RATIO;
            let x = left + ((width - text_width) / 2.0).max(1.0);
            self.text(cell, size, x, baseline, bold, color);
            left += width;
        }
    }

    fn save(self, path: &Path) -> Result<usize, ReportEntry> {
        let file = File::create(path).map_err(render_error)?;
        self.document.save(&mut BufWriter::new(file)).map_err(render_error)?;
        Ok(self.pages)
    }
}

/// Writes the statistics table and the `recent` entries to `path`.
/// Returns the number of pages.
pub fn render_pdf(path: &Path, statistics: &ReportStatistics, recent: &[HistoryEntry]) -> Result<usize, ReportEntry> {
    let mut writer = PdfWriter::new("Luggage Count Report")?;
    writer.paragraph("Luggage Count Report", 24.0, true);
    writer.spacer(8.0);

    writer.paragraph("Summary statistics", 16.0, true);
    writer.spacer(3.0);
    writer.table(["Parameter", "Value"], &statistics.rows());
    writer.spacer(10.0);

    writer.paragraph("Detailed history", 16.0, true);
    writer.spacer(3.0);
    for entry in recent {
        writer.ensure_space(LINE_HEIGHT * 4.0);
        writer.paragraph(&format!("Request at {}", entry.formatted_timestamp()), 11.0, true);
        writer.paragraph(&format!("File: {}", entry.filename), 11.0, false);
        writer.paragraph(&format!("Luggage detected: {}", entry.luggage_count), 11.0, false);
        writer.spacer(3.0);
    }
    writer.save(path)
}

fn rgb((r, g, b): (f32, f32, f32)) -> Color {
    Color::Rgb(Rgb::new(r, g, b, None))
}

fn render_error(err: impl Display) -> ReportEntry {
    ReportEntry::ReportRenderError(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn entries(count: usize) -> Vec<HistoryEntry> {
        (0..count)
            .map(|index| HistoryEntry::new(format!("belt_{index}.jpg"), Vec::new(), String::new()))
            .collect()
    }

    #[test]
    fn replaces_characters_outside_latin1() {
        assert_eq!(pdf_safe_text("багаж.jpg"), "?????.jpg");
        assert_eq!(pdf_safe_text("café"), "café");
    }

    #[test]
    fn writes_a_pdf_file() {
        let directory = tempdir().unwrap();
        let path = directory.path().join("report.pdf");
        let history = entries(3);
        let pages = render_pdf(&path, &ReportStatistics::from_history(&history), &history).unwrap();
        assert_eq!(pages, 1);
        let content = std::fs::read(&path).unwrap();
        assert!(content.starts_with(b"%PDF"));
    }

    #[test]
    fn long_history_spills_onto_new_pages() {
        let directory = tempdir().unwrap();
        let path = directory.path().join("report.pdf");
        let history = entries(60);
        let pages = render_pdf(&path, &ReportStatistics::from_history(&history), &history).unwrap();
        assert!(pages > 1);
    }

    #[test]
    fn unwritable_path_is_a_render_error() {
        let directory = tempdir().unwrap();
        let path = directory.path().join("missing").join("report.pdf");
        let history = entries(1);
        let result = render_pdf(&path, &ReportStatistics::from_history(&history), &history);
        assert!(matches!(result, Err(ReportEntry::ReportRenderError(_))));
    }
}
