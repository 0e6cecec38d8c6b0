use sheetrow::TranscodeError;
use thiserror::Error;

/// Errors raised while opening, reading or writing a workbook.
#[derive(Debug, Error)]
pub enum IoError {
    /// The container could not be opened or parsed.
    #[error("{backend}: cannot open workbook: {message}")]
    Open { backend: String, message: String },

    #[error("sheet not found: {0}")]
    SheetNotFound(String),

    #[error("{backend} error: {message}")]
    Backend { backend: String, message: String },

    #[error("unsupported {feature}: {context}")]
    Unsupported { feature: String, context: String },

    /// A data row failed to decode. `row` is the 1-based sheet row.
    #[error("sheet {sheet:?} row {row}: {source}")]
    Decode {
        sheet: String,
        row: u32,
        #[source]
        source: TranscodeError,
    },

    #[error(transparent)]
    Transcode(#[from] TranscodeError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl IoError {
    pub fn from_backend<E: std::fmt::Display>(backend: &str, err: E) -> Self {
        IoError::Backend {
            backend: backend.to_string(),
            message: err.to_string(),
        }
    }

    pub fn open<E: std::fmt::Display>(backend: &str, err: E) -> Self {
        IoError::Open {
            backend: backend.to_string(),
            message: err.to_string(),
        }
    }

    /// Row number for decode failures.
    pub fn row(&self) -> Option<u32> {
        match self {
            IoError::Decode { row, .. } => Some(*row),
            _ => None,
        }
    }
}
