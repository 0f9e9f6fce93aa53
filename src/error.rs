// File: ./src/error.rs
//! Error types shared by the parser, the stores and the reconciler.
use thiserror::Error;

/// Raised synchronously by the CSV parser.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    #[error("CSV file is empty or invalid: expected a header row and at least one data row, found {rows} row(s)")]
    TooFewRows { rows: usize },
    #[error("missing required column(s): {}", .0.join(", "))]
    MissingColumns(Vec<String>),
    #[error("input is not valid UTF-8: {0}")]
    InvalidEncoding(String),
}

/// Any failure raised by a `TaskStore` implementation.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },
    #[error("store io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("store serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("store file '{path}' could not be read: {reason}")]
    Corrupt { path: String, reason: String },
    #[error("store backend error: {0}")]
    Backend(#[from] anyhow::Error),
}

/// Error returned by the caller-facing import surface.
#[derive(Error, Debug)]
pub enum ImportError {
    #[error("format error: {0}")]
    Format(#[from] FormatError),
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

impl ImportError {
    pub fn is_format(&self) -> bool {
        matches!(self, ImportError::Format(_))
    }
}
