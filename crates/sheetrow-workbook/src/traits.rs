use sheetrow::ConverterRegistry;
use sheetrow_common::{CellValue, DateSystem, SheetSelector};
use std::io::{Read, Write};
use std::path::Path;

use crate::error::IoError;

/// Where [`SpreadsheetWriter::save_to`] sends the finished workbook.
pub enum SaveDestination<'a> {
    /// Back to the path the workbook was opened from.
    InPlace,
    Path(&'a Path),
    Writer(&'a mut dyn Write),
    /// Return the encoded workbook from `save_to`.
    Bytes,
}

pub trait SpreadsheetReader {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Short backend name used in error messages.
    const BACKEND: &'static str;

    /// Constructor variants for different environments
    fn open_path<P: AsRef<Path>>(path: P) -> Result<Self, Self::Error>
    where
        Self: Sized;

    /// Upload streams and other sources that are not files.
    fn open_reader(reader: Box<dyn Read + Send + Sync>) -> Result<Self, Self::Error>
    where
        Self: Sized;

    fn open_bytes(data: Vec<u8>) -> Result<Self, Self::Error>
    where
        Self: Sized;

    fn sheet_names(&self) -> Result<Vec<String>, Self::Error>;

    /// Every row of `sheet` as untranslated cell text, starting at row 1.
    /// Trailing empty cells of a row are dropped.
    fn read_rows(&mut self, sheet: &str) -> Result<Vec<Vec<String>>, Self::Error>;

    /// Date system serial numbers in this workbook are counted in.
    fn date_system(&self) -> DateSystem {
        DateSystem::Excel1900
    }

    /// Converters matching how this backend renders dates as text.
    fn default_converters(&self) -> ConverterRegistry {
        ConverterRegistry::spreadsheet(self.date_system())
    }

    fn resolve_sheet(&self, selector: &SheetSelector<'_>) -> Result<String, IoError> {
        let names = self
            .sheet_names()
            .map_err(|e| IoError::from_backend(Self::BACKEND, e))?;
        selector
            .resolve(&names)
            .map(str::to_string)
            .ok_or_else(|| IoError::SheetNotFound(selector.to_string()))
    }
}

pub trait SpreadsheetWriter {
    type Error: std::error::Error + Send + Sync + 'static;

    const BACKEND: &'static str;

    /// No-op when the sheet already exists.
    fn create_sheet(&mut self, name: &str) -> Result<(), Self::Error>;

    /// `row` and `col` are 1-based.
    fn write_cell(
        &mut self,
        sheet: &str,
        row: u32,
        col: u32,
        value: CellValue,
    ) -> Result<(), Self::Error>;

    fn write_row(
        &mut self,
        sheet: &str,
        row: u32,
        values: Vec<CellValue>,
    ) -> Result<(), Self::Error> {
        for (i, value) in values.into_iter().enumerate() {
            self.write_cell(sheet, row, i as u32 + 1, value)?;
        }
        Ok(())
    }

    fn save_to(&mut self, dest: SaveDestination<'_>) -> Result<Option<Vec<u8>>, Self::Error>;
}

/// Drop trailing empty cells.
pub(crate) fn trim_row(row: &mut Vec<String>) {
    while row.last().is_some_and(|c| c.is_empty()) {
        row.pop();
    }
}
