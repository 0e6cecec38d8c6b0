// Shared test helpers (umya workbook builders, record types)
#[path = "../common.rs"]
mod common;

#[cfg(feature = "umya")]
mod read;
#[cfg(feature = "umya")]
mod write;
