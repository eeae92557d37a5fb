pub mod pdf;
pub mod report_generator;
pub mod report_type;
pub mod spreadsheet;
pub mod statistics;
