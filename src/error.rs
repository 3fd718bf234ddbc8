use thiserror::Error;

/// Everything that can go wrong while reading a tabular file.
///
/// The `Display` text is shown verbatim in the status label, so messages are
/// written for the user rather than for a log.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("unsupported file extension: .{0} (expected .csv or .xlsx)")]
    UnsupportedExtension(String),

    #[error("{0}")]
    Csv(#[from] csv::Error),

    #[error("{0}")]
    Spreadsheet(#[from] calamine::Error),

    #[error("the workbook contains no worksheet")]
    NoSheets,

    #[error("no columns to parse from file")]
    NoColumns,

    #[error("line {line}: expected {expected} fields, saw {found}")]
    TooManyFields {
        line: u64,
        expected: usize,
        found: usize,
    },
}
