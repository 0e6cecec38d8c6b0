//! Tag resolution: which external label belongs to which field.
//!
//! A field's label under a namespace is its `#[tag(namespace = "...")]` value
//! when present and non-empty, otherwise the field's own name.

use rustc_hash::FxHashMap;

use crate::error::TranscodeError;
use crate::record::{Record, RecordDescriptor};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// External label → field name.
pub type LabelMap = FxHashMap<String, String>;

/// What to do when two fields resolve to the same label.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DuplicateLabelPolicy {
    /// The later-declared field takes the label.
    #[default]
    LastWins,
    /// Fail with [`TranscodeError::DuplicateLabel`].
    Reject,
}

/// Both views of a record's labels under one namespace.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagMapping {
    pub labels: Vec<String>,
    pub label_to_field: LabelMap,
}

pub fn resolve_labels<T: Record>(namespace: &str) -> Vec<String> {
    labels_for(&T::descriptor(), namespace)
}

pub fn resolve_label_to_field<T: Record>(namespace: &str) -> LabelMap {
    label_to_field_for(&T::descriptor(), namespace)
}

pub fn resolve_mapping<T: Record>(
    namespace: &str,
    policy: DuplicateLabelPolicy,
) -> Result<TagMapping, TranscodeError> {
    mapping_for(&T::descriptor(), namespace, policy)
}

pub fn labels_for(descriptor: &RecordDescriptor, namespace: &str) -> Vec<String> {
    descriptor
        .fields()
        .iter()
        .map(|f| f.label(namespace).to_string())
        .collect()
}

pub fn label_to_field_for(descriptor: &RecordDescriptor, namespace: &str) -> LabelMap {
    descriptor
        .fields()
        .iter()
        .map(|f| (f.label(namespace).to_string(), f.name.to_string()))
        .collect()
}

pub fn mapping_for(
    descriptor: &RecordDescriptor,
    namespace: &str,
    policy: DuplicateLabelPolicy,
) -> Result<TagMapping, TranscodeError> {
    let fields = descriptor.fields();
    let mut labels = Vec::with_capacity(fields.len());
    let mut label_to_field = LabelMap::default();
    label_to_field.reserve(fields.len());

    for field in fields {
        let label = field.label(namespace);
        if let Some(previous) = label_to_field.insert(label.to_string(), field.name.to_string()) {
            match policy {
                DuplicateLabelPolicy::LastWins => {
                    #[cfg(feature = "tracing")]
                    tracing::debug!(
                        record = descriptor.name(),
                        label,
                        shadowed = %previous,
                        field = field.name,
                        "duplicate label; later field wins"
                    );
                }
                DuplicateLabelPolicy::Reject => {
                    return Err(TranscodeError::DuplicateLabel {
                        label: label.to_string(),
                        first: previous,
                        second: field.name.to_string(),
                    });
                }
            }
        }
        labels.push(label.to_string());
    }

    Ok(TagMapping {
        labels,
        label_to_field,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::FieldDescriptor;

    type FieldTags = (&'static str, &'static [(&'static str, &'static str)]);

    fn descriptor(fields: &[FieldTags]) -> RecordDescriptor {
        RecordDescriptor::new(
            "Test",
            fields
                .iter()
                .map(|(name, tags)| FieldDescriptor::of::<String>(name, tags))
                .collect(),
        )
    }

    #[test]
    fn labels_follow_declaration_order() {
        let desc = descriptor(&[
            ("id", &[("xlsx", "ID")]),
            ("name", &[("csv", "full_name")]),
            ("note", &[("xlsx", "")]),
        ]);
        assert_eq!(labels_for(&desc, "xlsx"), vec!["ID", "name", "note"]);
        assert_eq!(labels_for(&desc, "csv"), vec!["id", "full_name", "note"]);

        let map = label_to_field_for(&desc, "xlsx");
        assert_eq!(map.len(), 3);
        assert_eq!(map.get("ID").map(String::as_str), Some("id"));
        assert_eq!(map.get("note").map(String::as_str), Some("note"));
    }

    #[test]
    fn duplicate_labels_last_wins_by_default() {
        let desc = descriptor(&[("first", &[("xlsx", "Dup")]), ("second", &[("xlsx", "Dup")])]);
        let mapping = mapping_for(&desc, "xlsx", DuplicateLabelPolicy::LastWins).unwrap();
        assert_eq!(mapping.labels, vec!["Dup", "Dup"]);
        assert_eq!(mapping.label_to_field.len(), 1);
        assert_eq!(
            mapping.label_to_field.get("Dup").map(String::as_str),
            Some("second")
        );
        assert_eq!(label_to_field_for(&desc, "xlsx"), mapping.label_to_field);
    }

    #[test]
    fn duplicate_labels_can_be_rejected() {
        let desc = descriptor(&[("first", &[("xlsx", "Dup")]), ("second", &[("xlsx", "Dup")])]);
        let err = mapping_for(&desc, "xlsx", DuplicateLabelPolicy::Reject).unwrap_err();
        match err {
            TranscodeError::DuplicateLabel {
                label,
                first,
                second,
            } => {
                assert_eq!(label, "Dup");
                assert_eq!(first, "first");
                assert_eq!(second, "second");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
