// Shared test helpers (umya workbook builders, record types)
#[path = "../common.rs"]
mod common;

#[cfg(feature = "calamine")]
mod read;
