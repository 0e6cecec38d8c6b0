//! Whole-sheet reading and writing of records.

use sheetrow::{
    ConverterRegistry, DuplicateLabelPolicy, RawRecord, Record, TranscodeOptions, Transcoder,
    resolve_mapping,
};
use sheetrow_common::{DateSystem, SheetSelector};
use std::io::Read;
use std::path::Path;

use crate::error::IoError;
use crate::traits::{SpreadsheetReader, SpreadsheetWriter};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

pub const DEFAULT_NAMESPACE: &str = "xlsx";
pub const DEFAULT_SHEET_NAME: &str = "Sheet1";

#[derive(Debug, Clone)]
pub struct ReadOptions {
    /// Tag namespace the header labels are looked up in.
    pub namespace: String,
    pub sheet: SheetSelector<'static>,
    pub duplicate_labels: DuplicateLabelPolicy,
    pub transcode: TranscodeOptions,
    /// Overrides the reader's own date system for serial dates.
    pub date_system: Option<DateSystem>,
    /// Replaces the reader's default converters entirely.
    pub converters: Option<ConverterRegistry>,
    /// Drop rows with no text at all instead of decoding them to
    /// `T::default()`.
    pub skip_blank_rows: bool,
}

impl Default for ReadOptions {
    fn default() -> Self {
        Self {
            namespace: DEFAULT_NAMESPACE.to_string(),
            sheet: SheetSelector::default(),
            duplicate_labels: DuplicateLabelPolicy::default(),
            transcode: TranscodeOptions::default(),
            date_system: None,
            converters: None,
            skip_blank_rows: false,
        }
    }
}

impl ReadOptions {
    pub fn sheet(mut self, sheet: impl Into<SheetSelector<'static>>) -> Self {
        self.sheet = sheet.into();
        self
    }

    pub fn namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    pub fn converters(mut self, converters: ConverterRegistry) -> Self {
        self.converters = Some(converters);
        self
    }

    pub fn skip_blank_rows(mut self, skip: bool) -> Self {
        self.skip_blank_rows = skip;
        self
    }

    fn registry_for<R: SpreadsheetReader>(&self, reader: &R) -> ConverterRegistry {
        match (&self.converters, self.date_system) {
            (Some(registry), _) => registry.clone(),
            (None, Some(system)) => ConverterRegistry::spreadsheet(system),
            (None, None) => reader.default_converters(),
        }
    }
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteOptions {
    pub namespace: String,
    pub sheet_name: String,
    pub duplicate_labels: DuplicateLabelPolicy,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            namespace: DEFAULT_NAMESPACE.to_string(),
            sheet_name: DEFAULT_SHEET_NAME.to_string(),
            duplicate_labels: DuplicateLabelPolicy::default(),
        }
    }
}

impl WriteOptions {
    pub fn sheet_name(mut self, name: impl Into<String>) -> Self {
        self.sheet_name = name.into();
        self
    }

    pub fn namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }
}

/// Decode every data row of the selected sheet into `T`.
///
/// Row 1 is the header. Header cells are matched against `T`'s labels under
/// `options.namespace`; cells under an unknown header are ignored. The first
/// failing row aborts the read with [`IoError::Decode`].
pub fn decode_rows<T, R>(reader: &mut R, options: &ReadOptions) -> Result<Vec<T>, IoError>
where
    T: Record,
    R: SpreadsheetReader,
{
    let sheet = reader.resolve_sheet(&options.sheet)?;
    let rows = reader
        .read_rows(&sheet)
        .map_err(|e| IoError::from_backend(R::BACKEND, e))?;
    let mut rows = rows.into_iter();
    let Some(header) = rows.next() else {
        return Ok(Vec::new());
    };

    let mapping = resolve_mapping::<T>(&options.namespace, options.duplicate_labels)?;
    let descriptor = T::descriptor();
    let transcoder = Transcoder::with_options(options.transcode, options.registry_for(reader));

    #[cfg(feature = "tracing")]
    for label in header.iter().filter(|l| !l.is_empty()) {
        if !mapping.label_to_field.contains_key(label.as_str()) {
            tracing::warn!(
                sheet = %sheet,
                label = %label,
                record = descriptor.name(),
                "column has no field"
            );
        }
    }

    let mut records = Vec::with_capacity(rows.len());
    for (i, row) in rows.enumerate() {
        let row_number = i as u32 + 2;
        if options.skip_blank_rows && row.iter().all(String::is_empty) {
            continue;
        }
        let raw: RawRecord = header.iter().map(String::as_str).zip(row).collect();
        let mut record = T::default();
        transcoder
            .decode_with(&descriptor, &mut record, &raw, &mapping.label_to_field)
            .map_err(|source| IoError::Decode {
                sheet: sheet.clone(),
                row: row_number,
                source,
            })?;
        records.push(record);
    }

    #[cfg(feature = "tracing")]
    tracing::debug!(
        sheet = %sheet,
        rows = records.len(),
        record = descriptor.name(),
        "decoded sheet"
    );

    Ok(records)
}

/// Write a header row and one row per record to `options.sheet_name`.
pub fn encode_records<T, W>(
    writer: &mut W,
    records: &[T],
    options: &WriteOptions,
) -> Result<(), IoError>
where
    T: Record,
    W: SpreadsheetWriter,
{
    let backend = |e: W::Error| IoError::from_backend(W::BACKEND, e);
    let sheet = options.sheet_name.as_str();
    let mapping = resolve_mapping::<T>(&options.namespace, options.duplicate_labels)?;
    let transcoder = Transcoder::new();

    writer.create_sheet(sheet).map_err(backend)?;
    writer
        .write_row(sheet, 1, mapping.labels.into_iter().map(Into::into).collect())
        .map_err(backend)?;
    for (i, record) in records.iter().enumerate() {
        writer
            .write_row(sheet, i as u32 + 2, transcoder.encode(record))
            .map_err(backend)?;
    }

    #[cfg(feature = "tracing")]
    tracing::debug!(sheet, rows = records.len(), backend = W::BACKEND, "encoded records");

    Ok(())
}

pub fn read_records_from_path<T, R>(
    path: impl AsRef<Path>,
    options: &ReadOptions,
) -> Result<Vec<T>, IoError>
where
    T: Record,
    R: SpreadsheetReader,
{
    let mut reader = R::open_path(path).map_err(|e| IoError::open(R::BACKEND, e))?;
    decode_rows(&mut reader, options)
}

/// Read records from a stream, e.g. an uploaded file.
pub fn read_records_from_reader<T, R>(
    source: Box<dyn Read + Send + Sync>,
    options: &ReadOptions,
) -> Result<Vec<T>, IoError>
where
    T: Record,
    R: SpreadsheetReader,
{
    let mut reader = R::open_reader(source).map_err(|e| IoError::open(R::BACKEND, e))?;
    decode_rows(&mut reader, options)
}

pub fn read_records_from_bytes<T, R>(
    data: Vec<u8>,
    options: &ReadOptions,
) -> Result<Vec<T>, IoError>
where
    T: Record,
    R: SpreadsheetReader,
{
    let mut reader = R::open_bytes(data).map_err(|e| IoError::open(R::BACKEND, e))?;
    decode_rows(&mut reader, options)
}

/// New xlsx workbook holding `records` on one sheet.
#[cfg(feature = "umya")]
pub fn new_workbook<T: Record>(
    records: &[T],
    options: &WriteOptions,
) -> Result<crate::UmyaAdapter, IoError> {
    let mut book = crate::UmyaAdapter::new();
    encode_records(&mut book, records, options)?;
    Ok(book)
}
