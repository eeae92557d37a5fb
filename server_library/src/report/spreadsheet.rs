use crate::history::history_entry::HistoryEntry;
use common::utils::log_entry::report::ReportEntry;
use rust_xlsxwriter::{Format, Workbook, XlsxError};
use std::path::Path;

pub const SHEET_NAME: &str = "Report";
pub const HEADERS: [&str; 4] = ["Date and time", "File", "Luggage count", "Objects"];
const MAX_COLUMN_WIDTH: usize = 50;

#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    Number(usize),
}

impl Cell {
    fn display_len(&self) -> usize {
        match self {
            Cell::Text(text) => text.chars().count(),
            Cell::Number(number) => number.to_string().len(),
        }
    }
}

/// Every history entry as a row, followed by one totals row.
#[derive(Debug, Clone, PartialEq)]
pub struct SpreadsheetTable {
    pub rows: Vec<[Cell; 4]>,
}

impl SpreadsheetTable {
    pub fn from_history(history: &[HistoryEntry]) -> Self {
        let mut rows: Vec<[Cell; 4]> = history.iter()
            .map(|entry| [
                Cell::Text(entry.formatted_timestamp()),
                Cell::Text(entry.filename.clone()),
                Cell::Number(entry.luggage_count),
                Cell::Text(entry.class_labels().join(", ")),
            ])
            .collect();
        let total_luggage = history.iter().map(|entry| entry.luggage_count).sum();
        rows.push([
            Cell::Text("TOTAL".to_string()),
            Cell::Text(String::new()),
            Cell::Number(total_luggage),
            Cell::Text(format!("Total requests: {}", history.len())),
        ]);
        Self { rows }
    }

    pub fn totals(&self) -> Option<&[Cell; 4]> {
        self.rows.last()
    }

    /// Longest cell text per column (header included) plus 2, capped.
    pub fn column_widths(&self) -> [usize; 4] {
        let mut widths = HEADERS.map(|header| header.chars().count());
        for row in &self.rows {
            for (width, cell) in widths.iter_mut().zip(row) {
                *width = (*width).max(cell.display_len());
            }
        }
        widths.map(|width| (width + 2).min(MAX_COLUMN_WIDTH))
    }

    pub fn write_xlsx(&self, path: &Path) -> Result<(), ReportEntry> {
        self.build_workbook(path).map_err(|err| ReportEntry::ReportRenderError(err.to_string()))
    }

    fn build_workbook(&self, path: &Path) -> Result<(), XlsxError> {
        let mut workbook = Workbook::new();
        let header_format = Format::new().set_bold();
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(SHEET_NAME)?;
        for (column, header) in HEADERS.iter().enumerate() {
            worksheet.write_string_with_format(0, column as u16, *header, &header_format)?;
        }
        for (index, row) in self.rows.iter().enumerate() {
            let row_number = index as u32 + 1;
            for (column, cell) in row.iter().enumerate() {
                match cell {
                    Cell::Text(text) => worksheet.write_string(row_number, column as u16, text)?,
                    Cell::Number(number) => worksheet.write_number(row_number, column as u16, *number as f64)?,
                };
            }
        }
        for (column, width) in self.column_widths().iter().enumerate() {
            worksheet.set_column_width(column as u16, *width as f64)?;
        }
        workbook.save(path)
    }
}
