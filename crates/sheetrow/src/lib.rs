//! Tag-driven marshaling between flat label → text rows and typed records.
//!
//! A record type derives [`Record`]; each field may carry one label per tag
//! namespace with `#[tag(namespace = "Label")]`. The tag resolver turns those
//! into a header and a label → field map, and the [`Transcoder`] uses the map
//! to fill records from [`RawRecord`]s and to turn records back into cell
//! values.
//!
//! ```
//! use sheetrow::{RawRecord, Record, Transcoder, resolve_label_to_field};
//!
//! #[derive(Debug, Default, PartialEq, Record)]
//! struct User {
//!     #[tag(xlsx = "ID")]
//!     id: i64,
//!     #[tag(xlsx = "Name")]
//!     name: String,
//!     #[tag(xlsx = "Tags")]
//!     tags: Vec<String>,
//! }
//!
//! let map = resolve_label_to_field::<User>("xlsx");
//! let raw: RawRecord = [("ID", "7"), ("Name", "Alice"), ("Tags", "x,y")]
//!     .into_iter()
//!     .collect();
//! let user: User = Transcoder::new().decode(&raw, &map).unwrap();
//! assert_eq!(user.tags, vec!["x", "y"]);
//! ```

extern crate self as sheetrow;

pub mod convert;
pub mod error;
pub mod field;
pub mod parse;
pub mod record;
pub mod tags;
pub mod transcode;

pub use convert::{
    Converter, ConverterRegistry, FnConverter, SerialDateConverter, SerialDateTimeConverter,
    TextDateConverter, TextDateTimeConverter, from_fn,
};
pub use error::{AssignError, ConvertError, TranscodeError};
pub use field::{Decoded, Element, ElementKind, Field, FieldKind};
pub use record::{FieldDescriptor, RawRecord, Record, RecordDescriptor};
pub use tags::{
    DuplicateLabelPolicy, LabelMap, TagMapping, label_to_field_for, labels_for, mapping_for,
    resolve_label_to_field, resolve_labels, resolve_mapping,
};
pub use transcode::{TranscodeOptions, Transcoder};

pub use sheetrow_common::{CellValue, DateSystem};
pub use sheetrow_macros::Record;
