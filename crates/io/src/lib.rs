// File I/O for site comparisons: CSV import and report export

pub mod csv;
pub mod export;

pub use crate::csv::{import_table, read_file_as_utf8, read_reader_as_utf8, sniff_delimiter};
pub use crate::export::{export, write_report, ExportOptions, ExportScope};
