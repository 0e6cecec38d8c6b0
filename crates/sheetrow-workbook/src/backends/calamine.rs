use crate::traits::{SpreadsheetReader, trim_row};
use sheetrow_common::DateSystem;
use std::io::{Cursor, Read};
use std::path::Path;

use calamine::{Data, Reader, Sheets, open_workbook_auto_from_rs};

/// Read-only adapter over `calamine` (xlsx, xlsm, xlsb, xls, ods).
///
/// The format is detected from the content, so paths, streams and byte
/// buffers all go through the same in-memory reader.
pub struct CalamineAdapter {
    workbook: Sheets<Cursor<Vec<u8>>>,
    date_system: DateSystem,
}

impl CalamineAdapter {
    /// Set the date system serials are counted in; calamine reports raw
    /// serials.
    pub fn with_date_system(mut self, system: DateSystem) -> Self {
        self.date_system = system;
        self
    }

    fn cell_text(data: &Data) -> String {
        match data {
            Data::Empty => String::new(),
            Data::String(s) => s.clone(),
            Data::Float(f) => f.to_string(),
            Data::Int(i) => i.to_string(),
            Data::Bool(true) => "TRUE".to_string(),
            Data::Bool(false) => "FALSE".to_string(),
            Data::Error(e) => e.to_string(),
            // Serial number, same as what umya reports
            Data::DateTime(dt) => dt.as_f64().to_string(),
            Data::DateTimeIso(s) => s.clone(),
            Data::DurationIso(s) => s.clone(),
        }
    }
}

impl SpreadsheetReader for CalamineAdapter {
    type Error = calamine::Error;

    const BACKEND: &'static str = "calamine";

    fn open_path<P: AsRef<Path>>(path: P) -> Result<Self, Self::Error>
    where
        Self: Sized,
    {
        let data = std::fs::read(path.as_ref()).map_err(calamine::Error::Io)?;
        Self::open_bytes(data)
    }

    fn open_reader(mut reader: Box<dyn Read + Send + Sync>) -> Result<Self, Self::Error>
    where
        Self: Sized,
    {
        // calamine expects concrete Read + Seek; buffer the stream
        let mut data = Vec::new();
        reader.read_to_end(&mut data).map_err(calamine::Error::Io)?;
        Self::open_bytes(data)
    }

    fn open_bytes(data: Vec<u8>) -> Result<Self, Self::Error>
    where
        Self: Sized,
    {
        let workbook = open_workbook_auto_from_rs(Cursor::new(data))?;
        Ok(Self {
            workbook,
            date_system: DateSystem::Excel1900,
        })
    }

    fn sheet_names(&self) -> Result<Vec<String>, Self::Error> {
        Ok(self.workbook.sheet_names().to_vec())
    }

    fn read_rows(&mut self, sheet: &str) -> Result<Vec<Vec<String>>, Self::Error> {
        let range = self.workbook.worksheet_range(sheet)?;
        let Some((start_row, start_col)) = range.start() else {
            return Ok(Vec::new());
        };

        // Calamine ranges begin at the first used cell; pad back to A1
        let mut rows: Vec<Vec<String>> = vec![Vec::new(); start_row as usize];
        for cells in range.rows() {
            let mut row = vec![String::new(); start_col as usize];
            row.extend(cells.iter().map(Self::cell_text));
            trim_row(&mut row);
            rows.push(row);
        }
        while rows.last().is_some_and(Vec::is_empty) {
            rows.pop();
        }
        Ok(rows)
    }

    fn date_system(&self) -> DateSystem {
        self.date_system
    }
}
