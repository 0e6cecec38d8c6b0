//! Spreadsheet collaborators for `sheetrow`: reader/writer traits, adapters
//! over umya-spreadsheet, calamine and csv, and whole-sheet record I/O.

pub mod backends;
pub mod error;
pub mod rows;
pub mod traits;

pub use error::IoError;
pub use rows::{
    DEFAULT_NAMESPACE, DEFAULT_SHEET_NAME, ReadOptions, WriteOptions, decode_rows,
    encode_records, read_records_from_bytes, read_records_from_path, read_records_from_reader,
};
pub use traits::{SaveDestination, SpreadsheetReader, SpreadsheetWriter};

#[cfg(feature = "umya")]
pub use rows::new_workbook;

#[cfg(feature = "calamine")]
pub use backends::CalamineAdapter;
#[cfg(feature = "csv")]
pub use backends::{
    CsvAdapter, CsvNewline, CsvQuoteStyle, CsvReadOptions, CsvTrim, CsvWriteOptions,
};
#[cfg(feature = "umya")]
pub use backends::UmyaAdapter;

pub use sheetrow_common::{SheetSelector, cell_name, column_to_letters};
