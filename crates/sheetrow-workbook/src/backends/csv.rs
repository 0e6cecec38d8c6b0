use crate::error::IoError;
use crate::traits::{SaveDestination, SpreadsheetReader, SpreadsheetWriter, trim_row};
use sheetrow::ConverterRegistry;
use sheetrow_common::CellValue;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, Read, Write};
use std::path::{Path, PathBuf};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum CsvTrim {
    #[default]
    None,
    All,
}

#[derive(Clone, Debug)]
pub struct CsvReadOptions {
    /// Field delimiter as a single byte. Use `b'\t'` for TSV.
    pub delimiter: u8,
    pub trim: CsvTrim,
}

impl Default for CsvReadOptions {
    fn default() -> Self {
        Self {
            delimiter: b',',
            trim: CsvTrim::None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum CsvNewline {
    #[default]
    Lf,
    Crlf,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum CsvQuoteStyle {
    #[default]
    Necessary,
    Always,
    Never,
    NonNumeric,
}

#[derive(Clone, Debug)]
pub struct CsvWriteOptions {
    /// Field delimiter as a single byte. Use `b'\t'` for TSV.
    pub delimiter: u8,
    pub newline: CsvNewline,
    pub quote_style: CsvQuoteStyle,
}

impl Default for CsvWriteOptions {
    fn default() -> Self {
        Self {
            delimiter: b',',
            newline: CsvNewline::Lf,
            quote_style: CsvQuoteStyle::Necessary,
        }
    }
}

/// CSV backend adapter.
///
/// Semantics:
/// - A CSV file is treated as a single-sheet workbook (default sheet name: `Sheet1`).
/// - UTF-8 only; every field is kept as text.
/// - Dates are written as `YYYY-MM-DD[ HH:MM:SS]` text, so the default
///   converters are the textual ones.
pub struct CsvAdapter {
    sheet_name: String,
    /// Only non-empty cells are stored, keyed by 1-based (row, col).
    cells: BTreeMap<(u32, u32), String>,
    path: Option<PathBuf>,
    read_options: CsvReadOptions,
    write_options: CsvWriteOptions,
}

impl Default for CsvAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl CsvAdapter {
    pub fn new() -> Self {
        Self::new_with_options(CsvReadOptions::default(), CsvWriteOptions::default())
    }

    pub fn new_with_options(read_options: CsvReadOptions, write_options: CsvWriteOptions) -> Self {
        Self {
            sheet_name: "Sheet1".to_string(),
            cells: BTreeMap::new(),
            path: None,
            read_options,
            write_options,
        }
    }

    pub fn read_options(&self) -> &CsvReadOptions {
        &self.read_options
    }

    pub fn write_options(&self) -> &CsvWriteOptions {
        &self.write_options
    }

    pub fn set_write_options(&mut self, opts: CsvWriteOptions) {
        self.write_options = opts;
    }

    pub fn open_path_with_options<P: AsRef<Path>>(
        path: P,
        read_options: CsvReadOptions,
    ) -> Result<Self, IoError> {
        let file = File::open(path.as_ref())?;
        let mut adapter = Self::new_with_options(read_options, CsvWriteOptions::default());
        adapter.load(Box::new(BufReader::new(file)))?;
        adapter.path = Some(path.as_ref().to_path_buf());
        Ok(adapter)
    }

    pub fn open_reader_with_options(
        reader: Box<dyn Read + Send + Sync>,
        read_options: CsvReadOptions,
    ) -> Result<Self, IoError> {
        let mut adapter = Self::new_with_options(read_options, CsvWriteOptions::default());
        adapter.load(reader)?;
        Ok(adapter)
    }

    pub fn open_bytes_with_options(
        bytes: Vec<u8>,
        read_options: CsvReadOptions,
    ) -> Result<Self, IoError> {
        Self::open_reader_with_options(Box::new(std::io::Cursor::new(bytes)), read_options)
    }

    fn load(&mut self, reader: Box<dyn Read + Send + Sync>) -> Result<(), IoError> {
        let mut rb = csv::ReaderBuilder::new();
        rb.delimiter(self.read_options.delimiter)
            // The header is an ordinary row here
            .has_headers(false)
            // Allow ragged rows; missing cells read as empty.
            .flexible(true);

        match self.read_options.trim {
            CsvTrim::None => rb.trim(csv::Trim::None),
            CsvTrim::All => rb.trim(csv::Trim::All),
        };

        let mut rdr = rb.from_reader(reader);
        self.cells.clear();
        for (ri, rec) in rdr.records().enumerate() {
            let rec = rec.map_err(|e| IoError::from_backend("csv", e))?;
            let row = ri as u32 + 1;
            for (ci, field) in rec.iter().enumerate() {
                if !field.is_empty() {
                    self.cells.insert((row, ci as u32 + 1), field.to_string());
                }
            }
        }
        Ok(())
    }

    fn bounds(&self) -> Option<(u32, u32)> {
        let max_row = self.cells.keys().map(|(r, _)| *r).max()?;
        let max_col = self.cells.keys().map(|(_, c)| *c).max()?;
        Some((max_row, max_col))
    }

    fn check_sheet(&self, sheet: &str) -> Result<(), IoError> {
        if sheet == self.sheet_name {
            Ok(())
        } else {
            Err(IoError::SheetNotFound(sheet.to_string()))
        }
    }

    fn write_csv<W: Write + ?Sized>(&self, writer: &mut W) -> Result<(), IoError> {
        let opts = &self.write_options;
        let mut wb = csv::WriterBuilder::new();
        wb.delimiter(opts.delimiter)
            .terminator(csv_terminator(opts.newline))
            .quote_style(csv_quote_style(opts.quote_style))
            .flexible(true);
        let mut wtr = wb.from_writer(writer);

        let Some((rows, cols)) = self.bounds() else {
            wtr.flush()?;
            return Ok(());
        };
        for r in 1..=rows {
            let mut record: Vec<&str> = Vec::with_capacity(cols as usize);
            for c in 1..=cols {
                record.push(self.cells.get(&(r, c)).map_or("", String::as_str));
            }
            wtr.write_record(record)
                .map_err(|e| IoError::from_backend("csv", e))?;
        }
        wtr.flush()?;
        Ok(())
    }
}

impl SpreadsheetReader for CsvAdapter {
    type Error = IoError;

    const BACKEND: &'static str = "csv";

    fn open_path<P: AsRef<Path>>(path: P) -> Result<Self, Self::Error>
    where
        Self: Sized,
    {
        Self::open_path_with_options(path, CsvReadOptions::default())
    }

    fn open_reader(reader: Box<dyn Read + Send + Sync>) -> Result<Self, Self::Error>
    where
        Self: Sized,
    {
        Self::open_reader_with_options(reader, CsvReadOptions::default())
    }

    fn open_bytes(data: Vec<u8>) -> Result<Self, Self::Error>
    where
        Self: Sized,
    {
        Self::open_bytes_with_options(data, CsvReadOptions::default())
    }

    fn sheet_names(&self) -> Result<Vec<String>, Self::Error> {
        Ok(vec![self.sheet_name.clone()])
    }

    fn read_rows(&mut self, sheet: &str) -> Result<Vec<Vec<String>>, Self::Error> {
        self.check_sheet(sheet)?;
        let Some((rows, cols)) = self.bounds() else {
            return Ok(Vec::new());
        };
        Ok((1..=rows)
            .map(|r| {
                let mut row: Vec<String> = (1..=cols)
                    .map(|c| self.cells.get(&(r, c)).cloned().unwrap_or_default())
                    .collect();
                trim_row(&mut row);
                row
            })
            .collect())
    }

    fn default_converters(&self) -> ConverterRegistry {
        ConverterRegistry::textual()
    }
}

impl SpreadsheetWriter for CsvAdapter {
    type Error = IoError;

    const BACKEND: &'static str = "csv";

    fn create_sheet(&mut self, name: &str) -> Result<(), Self::Error> {
        if name == self.sheet_name {
            return Ok(());
        }
        if self.cells.is_empty() {
            // A fresh CSV takes whatever name its one sheet is given
            self.sheet_name = name.to_string();
            return Ok(());
        }
        Err(IoError::Unsupported {
            feature: "multiple sheets".to_string(),
            context: "csv".to_string(),
        })
    }

    fn write_cell(
        &mut self,
        sheet: &str,
        row: u32,
        col: u32,
        value: CellValue,
    ) -> Result<(), Self::Error> {
        self.check_sheet(sheet)?;
        let text = cell_to_field(&value);
        if text.is_empty() {
            self.cells.remove(&(row, col));
        } else {
            self.cells.insert((row, col), text);
        }
        Ok(())
    }

    fn save_to(&mut self, dest: SaveDestination<'_>) -> Result<Option<Vec<u8>>, Self::Error> {
        match dest {
            SaveDestination::InPlace => {
                let Some(path) = self.path.as_ref() else {
                    return Err(IoError::Backend {
                        backend: "csv".to_string(),
                        message: "no known path for in-place save".to_string(),
                    });
                };
                let mut file = File::create(path)?;
                self.write_csv(&mut file)?;
                Ok(None)
            }
            SaveDestination::Path(path) => {
                let mut file = File::create(path)?;
                self.write_csv(&mut file)?;
                Ok(None)
            }
            SaveDestination::Writer(writer) => {
                self.write_csv(writer)?;
                Ok(None)
            }
            SaveDestination::Bytes => {
                let mut buf: Vec<u8> = Vec::new();
                self.write_csv(&mut buf)?;
                Ok(Some(buf))
            }
        }
    }
}

fn cell_to_field(v: &CellValue) -> String {
    match v {
        CellValue::Boolean(true) => "TRUE".to_string(),
        CellValue::Boolean(false) => "FALSE".to_string(),
        other => other.to_string(),
    }
}

fn csv_terminator(nl: CsvNewline) -> csv::Terminator {
    match nl {
        CsvNewline::Lf => csv::Terminator::Any(b'\n'),
        CsvNewline::Crlf => csv::Terminator::CRLF,
    }
}

fn csv_quote_style(q: CsvQuoteStyle) -> csv::QuoteStyle {
    match q {
        CsvQuoteStyle::Necessary => csv::QuoteStyle::Necessary,
        CsvQuoteStyle::Always => csv::QuoteStyle::Always,
        CsvQuoteStyle::Never => csv::QuoteStyle::Never,
        CsvQuoteStyle::NonNumeric => csv::QuoteStyle::NonNumeric,
    }
}
