//! File-level import errors.
//!
//! Only failures that make the whole file unusable live here. Row and
//! entry problems are accumulated into the import summary instead.

use thiserror::Error;

/// Errors that abort an import run before any rows are produced.
#[derive(Debug, Error)]
pub enum ImportError {
    /// The file has no content at all.
    #[error("File is empty")]
    Empty,

    /// No known delimiter occurs in the header line.
    #[error("Could not detect a delimiter in the header line")]
    NoDelimiter,

    /// A required column is missing from the header.
    #[error("Missing required column: {0}")]
    MissingColumn(&'static str),

    /// The file has a header but no data rows.
    #[error("No data rows after the header")]
    NoRows,

    /// The underlying CSV reader failed on the file as a whole.
    #[error("CSV parse failure: {0}")]
    Csv(#[from] csv::Error),
}

impl ImportError {
    /// Returns the stable error code for operator-facing output.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Empty => "EMPTY_FILE",
            Self::NoDelimiter => "NO_DELIMITER",
            Self::MissingColumn(_) => "MISSING_COLUMN",
            Self::NoRows => "NO_ROWS",
            Self::Csv(_) => "CSV_ERROR",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(ImportError::Empty.error_code(), "EMPTY_FILE");
        assert_eq!(ImportError::NoDelimiter.error_code(), "NO_DELIMITER");
        assert_eq!(
            ImportError::MissingColumn("CompteNum").error_code(),
            "MISSING_COLUMN"
        );
        assert_eq!(ImportError::NoRows.error_code(), "NO_ROWS");
    }

    #[test]
    fn test_error_display() {
        assert_eq!(
            ImportError::MissingColumn("JournalCode").to_string(),
            "Missing required column: JournalCode"
        );
    }
}
