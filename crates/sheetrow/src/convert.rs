//! Converters for structured field types and the registry that orders them.
//!
//! Lookup is by exact [`TypeId`]: custom converters are searched first, then
//! the built-ins, and the first match wins.

use chrono::{NaiveDate, NaiveDateTime};
use sheetrow_common::DateSystem;
use std::any::{Any, TypeId, type_name};
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use crate::error::ConvertError;
use crate::parse;

/// Turns one raw string into an instance of a specific type.
pub trait Converter: Send + Sync {
    fn target(&self) -> TypeId;

    fn target_name(&self) -> &'static str;

    /// The returned box must hold a value of the type named by `target`.
    fn convert(&self, raw: &str) -> Result<Box<dyn Any>, ConvertError>;
}

/// Converter backed by a closure returning the concrete type.
pub struct FnConverter<T, F> {
    f: F,
    _target: PhantomData<fn() -> T>,
}

impl<T, F> FnConverter<T, F>
where
    T: 'static,
    F: Fn(&str) -> Result<T, ConvertError> + Send + Sync,
{
    pub fn new(f: F) -> Self {
        Self {
            f,
            _target: PhantomData,
        }
    }
}

impl<T, F> Converter for FnConverter<T, F>
where
    T: 'static,
    F: Fn(&str) -> Result<T, ConvertError> + Send + Sync,
{
    fn target(&self) -> TypeId {
        TypeId::of::<T>()
    }

    fn target_name(&self) -> &'static str {
        type_name::<T>()
    }

    fn convert(&self, raw: &str) -> Result<Box<dyn Any>, ConvertError> {
        (self.f)(raw).map(|v| Box::new(v) as Box<dyn Any>)
    }
}

/// Shorthand for [`FnConverter::new`].
pub fn from_fn<T, F>(f: F) -> FnConverter<T, F>
where
    T: 'static,
    F: Fn(&str) -> Result<T, ConvertError> + Send + Sync,
{
    FnConverter::new(f)
}

fn serial_from_text(raw: &str) -> Result<f64, ConvertError> {
    parse::parse_f64(raw).map_err(|e| ConvertError::new(format!("not a date serial: {e}")))
}

/// Spreadsheet serial number → `NaiveDateTime`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SerialDateTimeConverter {
    pub system: DateSystem,
}

impl Converter for SerialDateTimeConverter {
    fn target(&self) -> TypeId {
        TypeId::of::<NaiveDateTime>()
    }

    fn target_name(&self) -> &'static str {
        type_name::<NaiveDateTime>()
    }

    fn convert(&self, raw: &str) -> Result<Box<dyn Any>, ConvertError> {
        let serial = serial_from_text(raw)?;
        let dt = self.system.serial_to_datetime(serial).ok_or_else(|| {
            ConvertError::new(format!("serial {serial} is outside the {} date system", self.system))
        })?;
        Ok(Box::new(dt))
    }
}

/// Spreadsheet serial number → `NaiveDate`; the time of day is dropped.
#[derive(Debug, Clone, Copy, Default)]
pub struct SerialDateConverter {
    pub system: DateSystem,
}

impl Converter for SerialDateConverter {
    fn target(&self) -> TypeId {
        TypeId::of::<NaiveDate>()
    }

    fn target_name(&self) -> &'static str {
        type_name::<NaiveDate>()
    }

    fn convert(&self, raw: &str) -> Result<Box<dyn Any>, ConvertError> {
        let serial = serial_from_text(raw)?;
        let date = self.system.serial_to_date(serial).ok_or_else(|| {
            ConvertError::new(format!("serial {serial} is outside the {} date system", self.system))
        })?;
        Ok(Box::new(date))
    }
}

/// Textual date/time layouts → `NaiveDateTime`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextDateTimeConverter;

impl Converter for TextDateTimeConverter {
    fn target(&self) -> TypeId {
        TypeId::of::<NaiveDateTime>()
    }

    fn target_name(&self) -> &'static str {
        type_name::<NaiveDateTime>()
    }

    fn convert(&self, raw: &str) -> Result<Box<dyn Any>, ConvertError> {
        parse::parse_datetime_text(raw)
            .map(|dt| Box::new(dt) as Box<dyn Any>)
            .ok_or_else(|| ConvertError::new("unrecognised date/time layout"))
    }
}

/// Textual date layouts → `NaiveDate`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextDateConverter;

impl Converter for TextDateConverter {
    fn target(&self) -> TypeId {
        TypeId::of::<NaiveDate>()
    }

    fn target_name(&self) -> &'static str {
        type_name::<NaiveDate>()
    }

    fn convert(&self, raw: &str) -> Result<Box<dyn Any>, ConvertError> {
        parse::parse_date_text(raw)
            .map(|d| Box::new(d) as Box<dyn Any>)
            .ok_or_else(|| ConvertError::new("unrecognised date layout"))
    }
}

/// Ordered converter list: custom converters, then built-ins.
///
/// Immutable once handed to a [`Transcoder`](crate::Transcoder); the
/// `with_*` builders consume and return the registry.
#[derive(Clone)]
pub struct ConverterRegistry {
    custom: Vec<Arc<dyn Converter>>,
    builtin: Vec<Arc<dyn Converter>>,
}

impl Default for ConverterRegistry {
    fn default() -> Self {
        Self::spreadsheet(DateSystem::Excel1900)
    }
}

impl fmt::Debug for ConverterRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names = |list: &[Arc<dyn Converter>]| -> Vec<&'static str> {
            list.iter().map(|c| c.target_name()).collect()
        };
        f.debug_struct("ConverterRegistry")
            .field("custom", &names(&self.custom))
            .field("builtin", &names(&self.builtin))
            .finish()
    }
}

impl ConverterRegistry {
    /// No converters at all; every structured field is unsupported.
    pub fn empty() -> Self {
        Self {
            custom: Vec::new(),
            builtin: Vec::new(),
        }
    }

    /// Built-ins for values read from spreadsheet cells: dates arrive as
    /// serial numbers.
    pub fn spreadsheet(system: DateSystem) -> Self {
        Self::empty()
            .with_builtin(SerialDateTimeConverter { system })
            .with_builtin(SerialDateConverter { system })
    }

    /// Built-ins for plain text sources: dates arrive as formatted strings.
    pub fn textual() -> Self {
        Self::empty()
            .with_builtin(TextDateTimeConverter)
            .with_builtin(TextDateConverter)
    }

    /// Add a user converter. User converters are consulted in the order they
    /// were added, all before any built-in.
    pub fn with_converter(mut self, converter: impl Converter + 'static) -> Self {
        self.custom.push(Arc::new(converter));
        self
    }

    pub fn with_shared_converter(mut self, converter: Arc<dyn Converter>) -> Self {
        self.custom.push(converter);
        self
    }

    pub fn with_builtin(mut self, converter: impl Converter + 'static) -> Self {
        self.builtin.push(Arc::new(converter));
        self
    }

    pub fn find(&self, target: TypeId) -> Option<&dyn Converter> {
        self.iter().find(|c| c.target() == target)
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn Converter> {
        self.custom
            .iter()
            .chain(self.builtin.iter())
            .map(|c| c.as_ref())
    }

    pub fn len(&self) -> usize {
        self.custom.len() + self.builtin.len()
    }

    pub fn is_empty(&self) -> bool {
        self.custom.is_empty() && self.builtin.is_empty()
    }
}
