#[cfg(feature = "calamine")]
pub mod calamine;

#[cfg(feature = "calamine")]
pub use self::calamine::CalamineAdapter;

#[cfg(feature = "csv")]
pub mod csv;

#[cfg(feature = "csv")]
pub use self::csv::{
    CsvAdapter, CsvNewline, CsvQuoteStyle, CsvReadOptions, CsvTrim, CsvWriteOptions,
};

#[cfg(feature = "umya")]
pub mod umya;

#[cfg(feature = "umya")]
pub use self::umya::UmyaAdapter;
