//! Per-file failures.
//!
//! None of these abort a batch: a failing file is skipped and reported to
//! the caller as a [`ScanWarning`].

use std::fmt;
use thiserror::Error;

/// Errors that cause a single file to be excluded from the model.
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("cannot read file: {0}")]
    Read(#[from] std::io::Error),
    #[error("file is not valid UTF-8")]
    Decode,
    #[error("declaration body opened on line {line} is never closed")]
    UnterminatedBody { line: usize },
    #[error("declaration on line {line} has no body")]
    MissingBody { line: usize },
    #[error("duplicate declaration {fqn} replaced the one from {previous}")]
    Duplicate { fqn: String, previous: String },
}

/// A non-fatal problem tied to one input file.
#[derive(Debug)]
pub struct ScanWarning {
    pub path: String,
    pub error: ScanError,
}

impl ScanWarning {
    pub fn new(path: impl Into<String>, error: ScanError) -> Self {
        Self {
            path: path.into(),
            error,
        }
    }
}

impl fmt::Display for ScanWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.error)
    }
}
