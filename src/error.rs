//! Error types for compression and decompression.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::min_heap::HeapErr;

/// Result type alias used throughout the crate.
pub type Result<T> = std::result::Result<T, HuffmanError>;

#[derive(Debug, Error)]
pub enum HuffmanError {
    /// The container is not one we produced, or its header is inconsistent.
    #[error("invalid container: {0}")]
    Format(String),

    /// The payload is shorter than the header says it should be.
    #[error("truncated input: expected {expected} {unit}, got {actual}")]
    TruncatedInput {
        expected: u64,
        actual: u64,
        unit: &'static str,
    },

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("cannot access {}: {source}", .path.display())]
    File {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("unsupported mode: {0}")]
    UnsupportedMode(String),

    #[error("byte 0x{0:02x} is not in the code table")]
    SymbolNotInTable(u8),

    #[error("priority queue failure: {0}")]
    Heap(#[from] HeapErr),
}

impl HuffmanError {
    pub(crate) fn format(message: impl Into<String>) -> Self {
        HuffmanError::Format(message.into())
    }

    pub(crate) fn file(path: impl Into<PathBuf>, source: io::Error) -> Self {
        HuffmanError::File {
            path: path.into(),
            source,
        }
    }
}
