//! Column lettering and sheet selection helpers shared by readers and writers.

use std::borrow::Cow;
use std::error::Error;
use std::fmt;

/// Largest column a worksheet can address (`XFD`).
pub const MAX_COLUMN: u32 = 16_384;
/// Largest row a worksheet can address.
pub const MAX_ROW: u32 = 1_048_576;

/// Errors raised while turning 1-based indices into A1 names.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum AddressError {
    /// Encountered a 0 where a 1-based index was expected.
    ZeroIndex,
    ColumnOverflow(u32),
    RowOverflow(u32),
}

impl fmt::Display for AddressError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AddressError::ZeroIndex => {
                write!(f, "row and column indices must be 1-based (>= 1)")
            }
            AddressError::ColumnOverflow(col) => {
                write!(f, "column {col} exceeds {MAX_COLUMN}")
            }
            AddressError::RowOverflow(row) => write!(f, "row {row} exceeds {MAX_ROW}"),
        }
    }
}

impl Error for AddressError {}

/// 1-based column index to letters: 1 → `A`, 26 → `Z`, 27 → `AA`.
pub fn column_to_letters(col: u32) -> Result<String, AddressError> {
    if col == 0 {
        return Err(AddressError::ZeroIndex);
    }
    if col > MAX_COLUMN {
        return Err(AddressError::ColumnOverflow(col));
    }
    let mut n = col - 1;
    let mut buf = Vec::new();
    loop {
        buf.push(b'A' + (n % 26) as u8);
        n /= 26;
        if n == 0 {
            break;
        }
        n -= 1;
    }
    buf.reverse();
    Ok(buf.into_iter().map(char::from).collect())
}

/// A1-style name of a cell from 1-based column and row.
pub fn cell_name(col: u32, row: u32) -> Result<String, AddressError> {
    if row == 0 {
        return Err(AddressError::ZeroIndex);
    }
    if row > MAX_ROW {
        return Err(AddressError::RowOverflow(row));
    }
    Ok(format!("{}{row}", column_to_letters(col)?))
}

/// Picks a sheet either by its 0-based position or by name.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub enum SheetSelector<'a> {
    Index(usize),
    Name(Cow<'a, str>),
}

impl Default for SheetSelector<'_> {
    fn default() -> Self {
        SheetSelector::Index(0)
    }
}

impl<'a> SheetSelector<'a> {
    pub const fn from_index(index: usize) -> Self {
        SheetSelector::Index(index)
    }

    pub fn from_name(name: impl Into<Cow<'a, str>>) -> Self {
        SheetSelector::Name(name.into())
    }

    pub const fn index(&self) -> Option<usize> {
        match self {
            SheetSelector::Index(i) => Some(*i),
            SheetSelector::Name(_) => None,
        }
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            SheetSelector::Index(_) => None,
            SheetSelector::Name(name) => Some(name.as_ref()),
        }
    }

    /// Look the selector up in an ordered list of sheet names.
    pub fn resolve<'n>(&self, names: &'n [String]) -> Option<&'n str> {
        match self {
            SheetSelector::Index(i) => names.get(*i).map(String::as_str),
            SheetSelector::Name(name) => names
                .iter()
                .find(|n| n.as_str() == name.as_ref())
                .map(String::as_str),
        }
    }

    pub fn into_owned(self) -> SheetSelector<'static> {
        match self {
            SheetSelector::Index(i) => SheetSelector::Index(i),
            SheetSelector::Name(name) => SheetSelector::Name(Cow::Owned(name.into_owned())),
        }
    }
}

impl fmt::Display for SheetSelector<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SheetSelector::Index(i) => write!(f, "#{i}"),
            SheetSelector::Name(name) => write!(f, "'{name}'"),
        }
    }
}

impl From<usize> for SheetSelector<'_> {
    fn from(value: usize) -> Self {
        SheetSelector::from_index(value)
    }
}

impl<'a> From<&'a str> for SheetSelector<'a> {
    fn from(value: &'a str) -> Self {
        SheetSelector::from_name(value)
    }
}

impl From<String> for SheetSelector<'_> {
    fn from(value: String) -> Self {
        SheetSelector::from_name(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn column_letters() {
        assert_eq!(column_to_letters(1).unwrap(), "A");
        assert_eq!(column_to_letters(26).unwrap(), "Z");
        assert_eq!(column_to_letters(27).unwrap(), "AA");
        assert_eq!(column_to_letters(702).unwrap(), "ZZ");
        assert_eq!(column_to_letters(703).unwrap(), "AAA");
        assert_eq!(column_to_letters(MAX_COLUMN).unwrap(), "XFD");
        assert_eq!(column_to_letters(0), Err(AddressError::ZeroIndex));
        assert_eq!(
            column_to_letters(MAX_COLUMN + 1),
            Err(AddressError::ColumnOverflow(MAX_COLUMN + 1))
        );
    }

    #[test]
    fn cell_names() {
        assert_eq!(cell_name(1, 1).unwrap(), "A1");
        assert_eq!(cell_name(28, 15).unwrap(), "AB15");
        assert_eq!(cell_name(1, 0), Err(AddressError::ZeroIndex));
        assert_eq!(cell_name(0, 1), Err(AddressError::ZeroIndex));
        assert_eq!(cell_name(1, MAX_ROW).unwrap(), "A1048576");
        assert_eq!(
            cell_name(1, MAX_ROW + 1),
            Err(AddressError::RowOverflow(MAX_ROW + 1))
        );
    }

    #[test]
    fn selector_resolution() {
        let names = vec!["Users".to_string(), "Orders".to_string()];
        assert_eq!(SheetSelector::default().resolve(&names), Some("Users"));
        assert_eq!(SheetSelector::from(1).resolve(&names), Some("Orders"));
        assert_eq!(SheetSelector::from("Orders").resolve(&names), Some("Orders"));
        assert_eq!(SheetSelector::from(2).resolve(&names), None);
        assert_eq!(SheetSelector::from("orders").resolve(&names), None);
    }

    proptest! {
        #[test]
        fn cell_name_is_letters_then_row(col in 1u32..=MAX_COLUMN, row in 1u32..=MAX_ROW) {
            let name = cell_name(col, row).unwrap();
            let split = name.find(|c: char| c.is_ascii_digit()).unwrap();
            let (letters, digits) = name.split_at(split);
            prop_assert!(letters.bytes().all(|b| b.is_ascii_uppercase()));
            prop_assert_eq!(letters, column_to_letters(col).unwrap());
            prop_assert_eq!(digits.parse::<u32>().unwrap(), row);
        }
    }
}
