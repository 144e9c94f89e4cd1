use thiserror::Error;

/// Errors surfaced while configuring, reading or writing trade entries.
///
/// Matching itself never fails: degenerate entries are skipped and unmatched
/// volume is reported separately by `fifo::match_fifo`.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid configuration: {0}")]
    Configuration(String),
    #[error("line {line}: {kind} in row '{raw}'")]
    Parse {
        line: u64,
        raw: String,
        kind: ParseErrorKind,
    },
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// What went wrong with a single row.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseErrorKind {
    #[error("{column} column {index} is missing")]
    MissingColumn { column: &'static str, index: usize },
    #[error("'{value}' is not a valid number for {column}")]
    InvalidNumber { column: &'static str, value: String },
    #[error("'{0}' is not a valid time")]
    InvalidTime(String),
    #[error("volume {0} cannot be negative")]
    NegativeVolume(f64),
}
