use sheetrow_common::CellValue;
use std::any::TypeId;

use crate::error::AssignError;
use crate::field::{Decoded, Field, FieldKind};

/// A struct whose fields map to spreadsheet columns.
///
/// Normally implemented with `#[derive(Record)]`:
///
/// ```
/// use sheetrow::Record;
///
/// #[derive(Debug, Default, Record)]
/// struct User {
///     #[tag(xlsx = "ID")]
///     id: i64,
///     #[tag(xlsx = "Name")]
///     name: String,
///     tags: Vec<String>,
/// }
///
/// let desc = User::descriptor();
/// assert_eq!(desc.fields().len(), 3);
/// assert_eq!(desc.fields()[0].label("xlsx"), "ID");
/// assert_eq!(desc.fields()[2].label("xlsx"), "tags");
/// ```
pub trait Record: Default + 'static {
    /// Fields in declaration order.
    fn descriptor() -> RecordDescriptor;

    /// Store `value` in the field called `field`. `Ok(false)` when the record
    /// has no such field.
    fn assign_field(&mut self, field: &str, value: Decoded) -> Result<bool, AssignError>;

    /// One value per field, in declaration order.
    fn field_values(&self) -> Vec<CellValue>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordDescriptor {
    name: &'static str,
    fields: Vec<FieldDescriptor>,
}

impl RecordDescriptor {
    pub fn new(name: &'static str, fields: Vec<FieldDescriptor>) -> Self {
        Self { name, fields }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    pub name: &'static str,
    pub kind: FieldKind,
    pub type_name: &'static str,
    pub type_id: TypeId,
    pub optional: bool,
    /// `(namespace, label)` pairs from `#[tag(...)]`.
    pub tags: &'static [(&'static str, &'static str)],
}

impl FieldDescriptor {
    pub fn of<T: Field>(name: &'static str, tags: &'static [(&'static str, &'static str)]) -> Self {
        Self {
            name,
            kind: T::KIND,
            type_name: T::target_type_name(),
            type_id: T::target_type_id(),
            optional: T::OPTIONAL,
            tags,
        }
    }

    /// Tag value under `namespace`, if declared and non-empty.
    pub fn tag(&self, namespace: &str) -> Option<&'static str> {
        self.tags
            .iter()
            .rev()
            .find(|(ns, _)| *ns == namespace)
            .map(|(_, label)| *label)
            .filter(|label| !label.is_empty())
    }

    /// External label under `namespace`, falling back to the field name.
    pub fn label(&self, namespace: &str) -> &'static str {
        self.tag(namespace).unwrap_or(self.name)
    }
}

/// One input row: external label → raw text, in insertion order.
///
/// Inserting a label that is already present replaces its value in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRecord {
    entries: Vec<(String, String)>,
}

impl RawRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
        }
    }

    pub fn insert(&mut self, label: impl Into<String>, value: impl Into<String>) {
        let label = label.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(l, _)| *l == label) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((label, value)),
        }
    }

    pub fn get(&self, label: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(l, _)| l == label)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(l, v)| (l.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> Extend<(K, V)> for RawRecord {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (k, v) in iter {
            self.insert(k, v);
        }
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for RawRecord {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut raw = RawRecord::new();
        raw.extend(iter);
        raw
    }
}
