use crate::history::history_entry::HistoryEntry;
use crate::report::pdf::render_pdf;
use crate::report::report_type::ReportType;
use crate::report::spreadsheet::SpreadsheetTable;
use crate::report::statistics::ReportStatistics;
use chrono::Local;
use common::utils::log_entry::report::ReportEntry;
use std::path::PathBuf;

pub struct GeneratedReport {
    pub path: PathBuf,
    pub filename: String,
}

#[derive(Debug, Clone)]
pub struct ReportGenerator {
    results_folder: PathBuf,
    recent_entries: usize,
}

impl ReportGenerator {
    pub fn new(results_folder: PathBuf, recent_entries: usize) -> Self {
        Self {
            results_folder,
            recent_entries,
        }
    }

    pub fn filename(report_type: ReportType) -> String {
        format!("luggage_report_{}.{}", Local::now().format("%Y%m%d_%H%M%S"), report_type.extension())
    }

    /// Renders `history` into the results folder. Blocking.
    pub fn generate(&self, history: &[HistoryEntry], report_type: ReportType) -> Result<GeneratedReport, ReportEntry> {
        if history.is_empty() {
            return Err(ReportEntry::EmptyHistoryError);
        }
        let filename = Self::filename(report_type);
        let path = self.results_folder.join(&filename);
        match report_type {
            ReportType::Pdf => {
                let statistics = ReportStatistics::from_history(history);
                let recent = &history[history.len().saturating_sub(self.recent_entries)..];
                render_pdf(&path, &statistics, recent)?;
            }
            ReportType::Excel => SpreadsheetTable::from_history(history).write_xlsx(&path)?,
        }
        Ok(GeneratedReport {
            path,
            filename,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn history(count: usize) -> Vec<HistoryEntry> {
        (0..count)
            .map(|index| HistoryEntry::new(format!("{index}.png"), Vec::new(), String::new()))
            .collect()
    }

    #[test]
    fn empty_history_is_rejected() {
        let directory = tempdir().unwrap();
        let generator = ReportGenerator::new(directory.path().to_path_buf(), 10);
        assert!(matches!(generator.generate(&[], ReportType::Pdf), Err(ReportEntry::EmptyHistoryError)));
        assert!(matches!(generator.generate(&[], ReportType::Excel), Err(ReportEntry::EmptyHistoryError)));
    }

    #[test]
    fn pdf_report_lands_in_results_folder() {
        let directory = tempdir().unwrap();
        let generator = ReportGenerator::new(directory.path().to_path_buf(), 10);
        let report = generator.generate(&history(12), ReportType::Pdf).unwrap();
        assert!(report.filename.starts_with("luggage_report_"));
        assert!(report.filename.ends_with(".pdf"));
        assert_eq!(report.path.parent(), Some(directory.path()));
        assert!(std::fs::read(&report.path).unwrap().starts_with(b"%PDF"));
    }

    #[test]
    fn excel_report_uses_xlsx_extension() {
        let directory = tempdir().unwrap();
        let generator = ReportGenerator::new(directory.path().to_path_buf(), 10);
        let report = generator.generate(&history(2), ReportType::Excel).unwrap();
        assert!(report.filename.ends_with(".xlsx"));
        assert!(report.path.exists());
    }

    #[test]
    fn filename_has_timestamp_shape() {
        let filename = ReportGenerator::filename(ReportType::Pdf);
        assert_eq!(filename.len(), "luggage_report_20240501_083015.pdf".len());
    }
}
