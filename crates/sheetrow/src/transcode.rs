//! Record transcoding: raw label → text rows into typed records and back.

use sheetrow_common::CellValue;
use std::fmt::Write as _;

use crate::convert::ConverterRegistry;
use crate::error::{AssignError, TranscodeError};
use crate::field::{Decoded, ElementKind, FieldKind};
use crate::parse;
use crate::record::{FieldDescriptor, RawRecord, Record, RecordDescriptor};
use crate::tags::{self, LabelMap};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Behaviour switches for [`Transcoder`].
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TranscodeOptions {
    /// Leave fields untouched when their raw value is `""`.
    ///
    /// When disabled, empty text is coerced like any other value: text fields
    /// become `""`, sequences become empty and numeric fields fail.
    pub skip_empty: bool,
    /// Decode `Vec` fields from comma-separated text.
    pub sequences: bool,
}

impl Default for TranscodeOptions {
    fn default() -> Self {
        Self {
            skip_empty: true,
            sequences: true,
        }
    }
}

/// Moves values between [`RawRecord`]s and typed records.
///
/// Holds no per-row state, so one transcoder serves any number of rows and
/// record types.
#[derive(Debug, Clone, Default)]
pub struct Transcoder {
    options: TranscodeOptions,
    converters: ConverterRegistry,
}

impl Transcoder {
    /// Default options with the spreadsheet (1900 serial date) converters.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: TranscodeOptions, converters: ConverterRegistry) -> Self {
        Self {
            options,
            converters,
        }
    }

    pub fn with_converters(converters: ConverterRegistry) -> Self {
        Self::with_options(TranscodeOptions::default(), converters)
    }

    pub fn options(&self) -> &TranscodeOptions {
        &self.options
    }

    pub fn converters(&self) -> &ConverterRegistry {
        &self.converters
    }

    /// Build a fresh `T` from `raw`, using `label_to_field` to find the field
    /// behind each label. Labels with no field are ignored.
    pub fn decode<T: Record>(
        &self,
        raw: &RawRecord,
        label_to_field: &LabelMap,
    ) -> Result<T, TranscodeError> {
        let mut record = T::default();
        self.decode_into(&mut record, raw, label_to_field)?;
        Ok(record)
    }

    /// Like [`decode`](Self::decode) but writes into an existing record.
    ///
    /// Stops at the first failing field; fields already visited keep their
    /// new values.
    pub fn decode_into<T: Record>(
        &self,
        record: &mut T,
        raw: &RawRecord,
        label_to_field: &LabelMap,
    ) -> Result<(), TranscodeError> {
        self.decode_with(&T::descriptor(), record, raw, label_to_field)
    }

    /// [`decode_into`](Self::decode_into) with a descriptor the caller already
    /// holds, for decoding many rows of one type.
    pub fn decode_with<T: Record>(
        &self,
        descriptor: &RecordDescriptor,
        record: &mut T,
        raw: &RawRecord,
        label_to_field: &LabelMap,
    ) -> Result<(), TranscodeError> {
        for (label, value) in raw.iter() {
            if value.is_empty() && self.options.skip_empty {
                continue;
            }
            let Some(field) = label_to_field
                .get(label)
                .and_then(|name| descriptor.field(name))
            else {
                #[cfg(feature = "tracing")]
                tracing::trace!(record = descriptor.name(), label, "no field for label");
                continue;
            };

            let decoded = self.coerce(field, value)?;
            match record.assign_field(field.name, decoded) {
                Ok(true) => {}
                Ok(false) => {
                    #[cfg(feature = "tracing")]
                    tracing::trace!(
                        record = descriptor.name(),
                        field = field.name,
                        "record has no accessor for field"
                    );
                }
                Err(err) => return Err(assign_failure(field, value, err)),
            }
        }
        Ok(())
    }

    /// Coerce one raw value to the shape `field` expects.
    pub fn coerce(&self, field: &FieldDescriptor, raw: &str) -> Result<Decoded, TranscodeError> {
        let result = match field.kind {
            FieldKind::Int { .. } => parse::parse_i64(raw)
                .map(Decoded::Int)
                .map_err(|e| conversion(field, raw, e.to_string())),
            FieldKind::Uint { .. } => parse::parse_u64(raw)
                .map(Decoded::Uint)
                .map_err(|e| conversion(field, raw, e.to_string())),
            FieldKind::Float => parse::parse_f64(raw)
                .map(Decoded::Float)
                .map_err(|e| conversion(field, raw, e.to_string())),
            FieldKind::Bool => parse::parse_bool(raw)
                .map(Decoded::Bool)
                .ok_or_else(|| conversion(field, raw, "not a boolean literal".to_string())),
            FieldKind::Text => Ok(Decoded::Text(raw.to_string())),
            FieldKind::Sequence(element) => self.coerce_sequence(field, element, raw),
            FieldKind::Structured => self.coerce_structured(field, raw),
        };

        #[cfg(feature = "tracing")]
        if let Err(err) = &result {
            tracing::debug!(field = field.name, raw, error = %err, "coercion failed");
        }

        result
    }

    fn coerce_sequence(
        &self,
        field: &FieldDescriptor,
        element: ElementKind,
        raw: &str,
    ) -> Result<Decoded, TranscodeError> {
        if !self.options.sequences {
            return Err(TranscodeError::UnsupportedType {
                field: field.name.to_string(),
                type_name: field.type_name,
            });
        }
        if !element.is_decodable() {
            return Err(TranscodeError::UnsupportedElementKind {
                field: field.name.to_string(),
                element,
            });
        }
        if raw.is_empty() {
            return Ok(Decoded::Sequence(Vec::new()));
        }

        raw.split(',')
            .map(|item| match element {
                ElementKind::Text => Ok(Decoded::Text(item.to_string())),
                ElementKind::Int => parse::parse_i64(item)
                    .map(Decoded::Int)
                    .map_err(|e| conversion(field, raw, format!("element {item:?}: {e}"))),
                ElementKind::Bool => parse::parse_bool(item).map(Decoded::Bool).ok_or_else(|| {
                    conversion(field, raw, format!("element {item:?} is not a boolean literal"))
                }),
                ElementKind::Uint | ElementKind::Float => {
                    Err(TranscodeError::UnsupportedElementKind {
                        field: field.name.to_string(),
                        element,
                    })
                }
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Decoded::Sequence)
    }

    fn coerce_structured(
        &self,
        field: &FieldDescriptor,
        raw: &str,
    ) -> Result<Decoded, TranscodeError> {
        let converter = self
            .converters
            .find(field.type_id)
            .ok_or_else(|| TranscodeError::UnsupportedType {
                field: field.name.to_string(),
                type_name: field.type_name,
            })?;
        converter
            .convert(raw)
            .map(Decoded::Converted)
            .map_err(|e| conversion(field, raw, e.to_string()))
    }

    /// One cell value per field in declaration order. Sequences are joined
    /// with `,` into a single text value.
    pub fn encode<T: Record>(&self, record: &T) -> Vec<CellValue> {
        record.field_values().into_iter().map(flatten_list).collect()
    }

    /// Header labels for `T` under `namespace`.
    pub fn header<T: Record>(&self, namespace: &str) -> Vec<String> {
        tags::resolve_labels::<T>(namespace)
    }
}

fn flatten_list(value: CellValue) -> CellValue {
    match value {
        CellValue::List(items) => {
            let mut joined = String::new();
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    joined.push(',');
                }
                let _ = write!(joined, "{item}");
            }
            CellValue::Text(joined)
        }
        other => other,
    }
}

fn conversion(field: &FieldDescriptor, raw: &str, reason: String) -> TranscodeError {
    TranscodeError::Conversion {
        field: field.name.to_string(),
        raw: raw.to_string(),
        target: field.kind,
        reason,
    }
}

fn assign_failure(field: &FieldDescriptor, raw: &str, err: AssignError) -> TranscodeError {
    conversion(field, raw, err.to_string())
}
