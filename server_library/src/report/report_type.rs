use common::utils::log_entry::report::ReportEntry;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportType {
    Pdf,
    Excel,
}

impl ReportType {
    pub fn extension(&self) -> &'static str {
        match self {
            ReportType::Pdf => "pdf",
            ReportType::Excel => "xlsx",
        }
    }
}

impl FromStr for ReportType {
    type Err = ReportEntry;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "pdf" => Ok(ReportType::Pdf),
            "excel" => Ok(ReportType::Excel),
            other => Err(ReportEntry::UnsupportedReportTypeError(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_types_only() {
        assert_eq!("pdf".parse::<ReportType>().unwrap(), ReportType::Pdf);
        assert_eq!("excel".parse::<ReportType>().unwrap(), ReportType::Excel);
        assert!(matches!("csv".parse::<ReportType>(), Err(ReportEntry::UnsupportedReportTypeError(value)) if value == "csv"));
        assert!("PDF".parse::<ReportType>().is_err());
    }

    #[test]
    fn excel_reports_are_xlsx_files() {
        assert_eq!(ReportType::Excel.extension(), "xlsx");
        assert_eq!(ReportType::Pdf.extension(), "pdf");
    }
}
