use crate::traits::{SaveDestination, SpreadsheetReader, SpreadsheetWriter, trim_row};
use parking_lot::RwLock;
use sheetrow_common::{CellValue, DateSystem, cell_name};
use std::io::{Cursor, Read};
use std::path::{Path, PathBuf};
use umya_spreadsheet::{Spreadsheet, XlsxError, reader::xlsx};

const DATE_FORMAT: &str = "yyyy-mm-dd";
const DATETIME_FORMAT: &str = "yyyy-mm-dd hh:mm:ss";
/// Integers above this magnitude lose precision as an f64 and are stored as text.
const MAX_EXACT_INTEGER: u64 = 1 << 53;

/// xlsx read/write through `umya-spreadsheet`.
///
/// Cells are read as the text umya stores: numbers (dates included) as their
/// serial, booleans as `TRUE`/`FALSE`.
pub struct UmyaAdapter {
    workbook: RwLock<Spreadsheet>,
    original_path: Option<PathBuf>,
    date_system: DateSystem,
}

impl UmyaAdapter {
    /// Workbook without any sheet.
    pub fn new() -> Self {
        Self {
            workbook: RwLock::new(umya_spreadsheet::new_file_empty_worksheet()),
            original_path: None,
            date_system: DateSystem::Excel1900,
        }
    }

    pub fn with_date_system(mut self, system: DateSystem) -> Self {
        self.date_system = system;
        self
    }

    fn from_spreadsheet(book: Spreadsheet, original_path: Option<PathBuf>) -> Self {
        Self {
            workbook: RwLock::new(book),
            original_path,
            date_system: DateSystem::Excel1900,
        }
    }

    /// Run `f` against the underlying workbook.
    pub fn with_spreadsheet<R>(&self, f: impl FnOnce(&Spreadsheet) -> R) -> R {
        f(&*self.workbook.read())
    }

    fn write_book(&self, out: &mut Cursor<Vec<u8>>) -> Result<(), XlsxError> {
        let mut wb = self.workbook.write();
        // Force deserialize each sheet before writing
        let count = wb.get_sheet_count();
        for i in 0..count {
            wb.read_sheet(i);
        }
        umya_spreadsheet::writer::xlsx::write_writer(&*wb, out)
    }
}

impl Default for UmyaAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl SpreadsheetReader for UmyaAdapter {
    type Error = XlsxError;

    const BACKEND: &'static str = "umya";

    fn open_path<P: AsRef<Path>>(path: P) -> Result<Self, Self::Error>
    where
        Self: Sized,
    {
        // Full read so later saves don't hit lazy deserialization
        let book = xlsx::read(path.as_ref())?;
        Ok(Self::from_spreadsheet(book, Some(path.as_ref().to_path_buf())))
    }

    fn open_reader(mut reader: Box<dyn Read + Send + Sync>) -> Result<Self, Self::Error>
    where
        Self: Sized,
    {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        Self::open_bytes(data)
    }

    fn open_bytes(data: Vec<u8>) -> Result<Self, Self::Error>
    where
        Self: Sized,
    {
        let book = xlsx::read_reader(Cursor::new(data), true)?;
        Ok(Self::from_spreadsheet(book, None))
    }

    fn sheet_names(&self) -> Result<Vec<String>, Self::Error> {
        // Need write lock to deserialize sheets lazily
        let mut wb = self.workbook.write();
        let count = wb.get_sheet_count();
        let mut names = Vec::with_capacity(count);
        for i in 0..count {
            wb.read_sheet(i);
            if let Some(s) = wb.get_sheet(&i) {
                names.push(s.get_name().to_string());
            }
        }
        Ok(names)
    }

    fn read_rows(&mut self, sheet: &str) -> Result<Vec<Vec<String>>, Self::Error> {
        let mut wb = self.workbook.write();
        wb.read_sheet_by_name(sheet);
        let ws = wb
            .get_sheet_by_name(sheet)
            .ok_or_else(|| XlsxError::CellError(format!("sheet not found: {sheet}")))?;

        let mut rows: Vec<Vec<String>> = Vec::new();
        for cell in ws.get_cell_collection() {
            let value = cell.get_value();
            if value.is_empty() {
                continue;
            }
            let coord = cell.get_coordinate();
            let row = *coord.get_row_num() as usize;
            let col = *coord.get_col_num() as usize;
            if rows.len() < row {
                rows.resize_with(row, Vec::new);
            }
            let cells = &mut rows[row - 1];
            if cells.len() < col {
                cells.resize(col, String::new());
            }
            cells[col - 1] = value.into_owned();
        }
        rows.iter_mut().for_each(trim_row);
        Ok(rows)
    }

    fn date_system(&self) -> DateSystem {
        self.date_system
    }
}

impl SpreadsheetWriter for UmyaAdapter {
    type Error = XlsxError;

    const BACKEND: &'static str = "umya";

    fn create_sheet(&mut self, name: &str) -> Result<(), Self::Error> {
        let mut wb = self.workbook.write();
        if wb.get_sheet_by_name(name).is_none() {
            wb.new_sheet(name)
                .map_err(|e| XlsxError::CellError(e.to_string()))?;
            // Ensure it's marked deserialized for writer
            wb.read_sheet_collection();
        }
        Ok(())
    }

    fn write_cell(
        &mut self,
        sheet: &str,
        row: u32,
        col: u32,
        value: CellValue,
    ) -> Result<(), Self::Error> {
        let system = self.date_system;
        let mut wb = self.workbook.write();
        wb.read_sheet_by_name(sheet);
        let ws = wb
            .get_sheet_by_name_mut(sheet)
            .ok_or_else(|| XlsxError::CellError(format!("sheet not found: {sheet}")))?;

        let coordinate = cell_name(col, row).map_err(|e| XlsxError::CellError(e.to_string()))?;
        let cell = ws.get_cell_mut(coordinate.as_str());
        let format = match value {
            CellValue::Empty => {
                cell.set_blank();
                None
            }
            CellValue::Int(i) if i.unsigned_abs() <= MAX_EXACT_INTEGER => {
                cell.set_value_number(i as f64);
                None
            }
            CellValue::Uint(u) if u <= MAX_EXACT_INTEGER => {
                cell.set_value_number(u as f64);
                None
            }
            CellValue::Int(i) => {
                cell.set_value_string(i.to_string());
                None
            }
            CellValue::Uint(u) => {
                cell.set_value_string(u.to_string());
                None
            }
            CellValue::Number(n) => {
                cell.set_value_number(n);
                None
            }
            CellValue::Boolean(b) => {
                cell.set_value_bool(b);
                None
            }
            CellValue::Text(s) => {
                cell.set_value_string(s);
                None
            }
            CellValue::Date(d) => {
                cell.set_value_number(system.date_to_serial(&d));
                Some(DATE_FORMAT)
            }
            CellValue::DateTime(dt) => {
                cell.set_value_number(system.datetime_to_serial(&dt));
                Some(DATETIME_FORMAT)
            }
            list @ CellValue::List(_) => {
                cell.set_value_string(list.to_string());
                None
            }
        };
        if let Some(code) = format {
            ws.get_style_mut(coordinate.as_str())
                .get_number_format_mut()
                .set_format_code(code);
        }
        Ok(())
    }

    fn save_to(&mut self, dest: SaveDestination<'_>) -> Result<Option<Vec<u8>>, Self::Error> {
        let mut buf = Cursor::new(Vec::new());
        self.write_book(&mut buf)?;
        let bytes = buf.into_inner();
        match dest {
            SaveDestination::InPlace => {
                let path = self.original_path.as_ref().ok_or_else(|| {
                    XlsxError::Io(std::io::Error::new(
                        std::io::ErrorKind::Unsupported,
                        "InPlace save unavailable: no original path",
                    ))
                })?;
                std::fs::write(path, bytes)?;
                Ok(None)
            }
            SaveDestination::Path(p) => {
                std::fs::write(p, bytes)?;
                Ok(None)
            }
            SaveDestination::Writer(w) => {
                w.write_all(&bytes)?;
                w.flush()?;
                Ok(None)
            }
            SaveDestination::Bytes => Ok(Some(bytes)),
        }
    }
}
