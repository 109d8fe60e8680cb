//! Dump loader errors

use rvemu_core::{Address, Exception};
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DumpError {
    #[error("Invalid address at line {line}: {field}")]
    InvalidAddress { line: usize, field: String },

    #[error("Unrecognised instruction length at line {line}: {width} digits")]
    InvalidWidth { line: usize, width: usize },

    #[error("Invalid instruction word at line {line}: {field}")]
    InvalidWord { line: usize, field: String },

    #[error("Unexpected character at line {line}")]
    Lex { line: usize },

    #[error("Store to {address:#x} at line {line} failed: {ex}")]
    Store {
        line: usize,
        address: Address,
        ex: Exception,
    },

    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl DumpError {
    /// Source line the error refers to, if any.
    pub fn line(&self) -> Option<usize> {
        match self {
            DumpError::InvalidAddress { line, .. }
            | DumpError::InvalidWidth { line, .. }
            | DumpError::InvalidWord { line, .. }
            | DumpError::Lex { line }
            | DumpError::Store { line, .. } => Some(*line),
            DumpError::Io { .. } => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, DumpError>;
