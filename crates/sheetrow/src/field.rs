//! Field kinds and the [`Field`] trait that lets a Rust type sit in a record.
//!
//! The transcoder never touches a field directly. It looks at the field's
//! [`FieldKind`], turns the raw text into a [`Decoded`] value, and hands that
//! to [`Field::from_decoded`] through the record's generated accessor.

use chrono::{NaiveDate, NaiveDateTime};
use sheetrow_common::CellValue;
use std::any::{Any, TypeId, type_name};
use std::fmt;

use crate::error::AssignError;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Closed set of shapes the transcoder knows how to decode.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    Int { bits: u8 },
    Uint { bits: u8 },
    Float,
    Bool,
    Text,
    Sequence(ElementKind),
    /// Anything decoded through the converter registry.
    Structured,
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldKind::Int { bits } => write!(f, "i{bits}"),
            FieldKind::Uint { bits } => write!(f, "u{bits}"),
            FieldKind::Float => f.write_str("float"),
            FieldKind::Bool => f.write_str("bool"),
            FieldKind::Text => f.write_str("text"),
            FieldKind::Sequence(elem) => write!(f, "sequence of {elem}"),
            FieldKind::Structured => f.write_str("structured value"),
        }
    }
}

/// Element shape of a sequence field. Only `Text`, `Int` and `Bool` decode.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementKind {
    Text,
    Int,
    Bool,
    Uint,
    Float,
}

impl ElementKind {
    pub const fn is_decodable(self) -> bool {
        matches!(self, ElementKind::Text | ElementKind::Int | ElementKind::Bool)
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ElementKind::Text => "text",
            ElementKind::Int => "int",
            ElementKind::Bool => "bool",
            ElementKind::Uint => "uint",
            ElementKind::Float => "float",
        })
    }
}

/// Raw text after coercion, before it is stored in a field.
pub enum Decoded {
    Int(i64),
    Uint(u64),
    Float(f64),
    Bool(bool),
    Text(String),
    Sequence(Vec<Decoded>),
    /// Output of a converter; downcast by the receiving field.
    Converted(Box<dyn Any>),
}

impl fmt::Debug for Decoded {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Decoded::Int(v) => f.debug_tuple("Int").field(v).finish(),
            Decoded::Uint(v) => f.debug_tuple("Uint").field(v).finish(),
            Decoded::Float(v) => f.debug_tuple("Float").field(v).finish(),
            Decoded::Bool(v) => f.debug_tuple("Bool").field(v).finish(),
            Decoded::Text(v) => f.debug_tuple("Text").field(v).finish(),
            Decoded::Sequence(v) => f.debug_tuple("Sequence").field(v).finish(),
            Decoded::Converted(_) => f.write_str("Converted(..)"),
        }
    }
}

/// A type that can be a field of a [`Record`](crate::Record).
pub trait Field: Sized + 'static {
    /// Kind used for dispatch, with `Option` already unwrapped.
    const KIND: FieldKind;
    const OPTIONAL: bool = false;

    /// Exact type the converter registry is searched with.
    fn target_type_id() -> TypeId {
        TypeId::of::<Self>()
    }

    fn target_type_name() -> &'static str {
        type_name::<Self>()
    }

    fn from_decoded(value: Decoded) -> Result<Self, AssignError>;

    fn to_cell(&self) -> CellValue;

    fn assign(&mut self, value: Decoded) -> Result<(), AssignError> {
        *self = Self::from_decoded(value)?;
        Ok(())
    }
}

/// Element type of a `Vec` field.
pub trait Element: Sized + 'static {
    const KIND: ElementKind;

    fn from_decoded(value: Decoded) -> Result<Self, AssignError>;

    fn to_cell(&self) -> CellValue;
}

/// Downcast a converter result into the field's own type.
pub fn downcast_converted<T: 'static>(value: Decoded) -> Result<T, AssignError> {
    match value {
        Decoded::Converted(boxed) => boxed
            .downcast::<T>()
            .map(|b| *b)
            .map_err(|_| AssignError::Mismatch {
                target: type_name::<T>(),
            }),
        _ => Err(AssignError::Mismatch {
            target: type_name::<T>(),
        }),
    }
}

fn mismatch<T>() -> AssignError {
    AssignError::Mismatch {
        target: type_name::<T>(),
    }
}

macro_rules! signed_fields {
    ($($ty:ty),+) => {
        $(
            impl Field for $ty {
                const KIND: FieldKind = FieldKind::Int { bits: <$ty>::BITS as u8 };

                fn from_decoded(value: Decoded) -> Result<Self, AssignError> {
                    <$ty as Element>::from_decoded(value)
                }

                fn to_cell(&self) -> CellValue {
                    CellValue::Int(*self as i64)
                }
            }

            impl Element for $ty {
                const KIND: ElementKind = ElementKind::Int;

                fn from_decoded(value: Decoded) -> Result<Self, AssignError> {
                    match value {
                        Decoded::Int(v) => <$ty>::try_from(v).map_err(|_| AssignError::OutOfRange {
                            value: v.to_string(),
                            target: stringify!($ty),
                        }),
                        _ => Err(mismatch::<$ty>()),
                    }
                }

                fn to_cell(&self) -> CellValue {
                    CellValue::Int(*self as i64)
                }
            }
        )+
    };
}

macro_rules! unsigned_fields {
    ($($ty:ty),+) => {
        $(
            impl Field for $ty {
                const KIND: FieldKind = FieldKind::Uint { bits: <$ty>::BITS as u8 };

                fn from_decoded(value: Decoded) -> Result<Self, AssignError> {
                    <$ty as Element>::from_decoded(value)
                }

                fn to_cell(&self) -> CellValue {
                    CellValue::Uint(*self as u64)
                }
            }

            impl Element for $ty {
                const KIND: ElementKind = ElementKind::Uint;

                fn from_decoded(value: Decoded) -> Result<Self, AssignError> {
                    match value {
                        Decoded::Uint(v) => <$ty>::try_from(v).map_err(|_| AssignError::OutOfRange {
                            value: v.to_string(),
                            target: stringify!($ty),
                        }),
                        _ => Err(mismatch::<$ty>()),
                    }
                }

                fn to_cell(&self) -> CellValue {
                    CellValue::Uint(*self as u64)
                }
            }
        )+
    };
}

macro_rules! float_fields {
    ($($ty:ty),+) => {
        $(
            impl Field for $ty {
                const KIND: FieldKind = FieldKind::Float;

                fn from_decoded(value: Decoded) -> Result<Self, AssignError> {
                    <$ty as Element>::from_decoded(value)
                }

                fn to_cell(&self) -> CellValue {
                    CellValue::Number(*self as f64)
                }
            }

            impl Element for $ty {
                const KIND: ElementKind = ElementKind::Float;

                fn from_decoded(value: Decoded) -> Result<Self, AssignError> {
                    match value {
                        // Narrowing to f32 follows `as` semantics (nearest, saturating to inf).
                        Decoded::Float(v) => Ok(v as $ty),
                        _ => Err(mismatch::<$ty>()),
                    }
                }

                fn to_cell(&self) -> CellValue {
                    CellValue::Number(*self as f64)
                }
            }
        )+
    };
}

signed_fields!(i8, i16, i32, i64, isize);
unsigned_fields!(u8, u16, u32, u64, usize);
float_fields!(f32, f64);

impl Field for bool {
    const KIND: FieldKind = FieldKind::Bool;

    fn from_decoded(value: Decoded) -> Result<Self, AssignError> {
        <bool as Element>::from_decoded(value)
    }

    fn to_cell(&self) -> CellValue {
        CellValue::Boolean(*self)
    }
}

impl Element for bool {
    const KIND: ElementKind = ElementKind::Bool;

    fn from_decoded(value: Decoded) -> Result<Self, AssignError> {
        match value {
            Decoded::Bool(b) => Ok(b),
            _ => Err(mismatch::<bool>()),
        }
    }

    fn to_cell(&self) -> CellValue {
        CellValue::Boolean(*self)
    }
}

impl Field for String {
    const KIND: FieldKind = FieldKind::Text;

    fn from_decoded(value: Decoded) -> Result<Self, AssignError> {
        <String as Element>::from_decoded(value)
    }

    fn to_cell(&self) -> CellValue {
        CellValue::Text(self.clone())
    }
}

impl Element for String {
    const KIND: ElementKind = ElementKind::Text;

    fn from_decoded(value: Decoded) -> Result<Self, AssignError> {
        match value {
            Decoded::Text(s) => Ok(s),
            _ => Err(mismatch::<String>()),
        }
    }

    fn to_cell(&self) -> CellValue {
        CellValue::Text(self.clone())
    }
}

impl<E: Element> Field for Vec<E> {
    const KIND: FieldKind = FieldKind::Sequence(E::KIND);

    fn from_decoded(value: Decoded) -> Result<Self, AssignError> {
        match value {
            Decoded::Sequence(items) => items.into_iter().map(E::from_decoded).collect(),
            _ => Err(mismatch::<Self>()),
        }
    }

    fn to_cell(&self) -> CellValue {
        CellValue::List(self.iter().map(Element::to_cell).collect())
    }
}

impl<T: Field> Field for Option<T> {
    const KIND: FieldKind = T::KIND;
    const OPTIONAL: bool = true;

    fn target_type_id() -> TypeId {
        T::target_type_id()
    }

    fn target_type_name() -> &'static str {
        T::target_type_name()
    }

    fn from_decoded(value: Decoded) -> Result<Self, AssignError> {
        T::from_decoded(value).map(Some)
    }

    fn to_cell(&self) -> CellValue {
        self.as_ref().map_or(CellValue::Empty, Field::to_cell)
    }
}

impl Field for NaiveDateTime {
    const KIND: FieldKind = FieldKind::Structured;

    fn from_decoded(value: Decoded) -> Result<Self, AssignError> {
        downcast_converted(value)
    }

    fn to_cell(&self) -> CellValue {
        CellValue::DateTime(*self)
    }
}

impl Field for NaiveDate {
    const KIND: FieldKind = FieldKind::Structured;

    fn from_decoded(value: Decoded) -> Result<Self, AssignError> {
        downcast_converted(value)
    }

    fn to_cell(&self) -> CellValue {
        CellValue::Date(*self)
    }
}

/// Lets a user type appear as a structured record field.
///
/// Decoding goes through the converter registered for the exact type.
/// Encoding uses `Display` unless an encoder closure is supplied:
///
/// ```
/// use sheetrow::{CellValue, structured_field};
///
/// #[derive(Debug, Clone, PartialEq)]
/// pub struct Money { pub cents: i64 }
///
/// structured_field!(Money => |m: &Money| CellValue::Number(m.cents as f64 / 100.0));
/// ```
#[macro_export]
macro_rules! structured_field {
    ($ty:ty) => {
        $crate::structured_field!($ty => |v: &$ty| $crate::CellValue::Text(v.to_string()));
    };
    ($ty:ty => $encode:expr) => {
        impl $crate::Field for $ty {
            const KIND: $crate::FieldKind = $crate::FieldKind::Structured;

            fn from_decoded(value: $crate::Decoded) -> Result<Self, $crate::AssignError> {
                $crate::field::downcast_converted(value)
            }

            fn to_cell(&self) -> $crate::CellValue {
                let encode: fn(&$ty) -> $crate::CellValue = $encode;
                encode(self)
            }
        }
    };
}
