use std::path::PathBuf;
use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Error reading directory {path}: {source}")]
    Scan {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Command failed ({status}): {command}\n{stderr}")]
    ExternalTool {
        command: String,
        status: String,
        stderr: String,
    },

    #[error("Could not parse archive listing: {0}")]
    Parse(#[from] ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("{0}")]
    Other(String),
}

/// Failures reading the compressor's listing table.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("no separator row found")]
    MissingSeparator,

    #[error("no data row after the separator row")]
    MissingDataRow,

    #[error("data row has no field {index}: {row:?}")]
    MissingField { index: usize, row: String },

    #[error("field {index} is not a byte count: {value:?}")]
    InvalidNumber { index: usize, value: String },
}
