//! Disassembler errors

use thiserror::Error;

/// ISA construction errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IsaError {
    #[error("{new} ({new_ext}) conflicts with {existing} ({existing_ext})")]
    Conflict {
        new: String,
        new_ext: String,
        existing: String,
        existing_ext: String,
    },

    #[error("Unknown ISA: {0}")]
    UnknownIsa(String),
}

/// Instruction decode failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("No instruction matches 0x{0:08x}")]
    NoMatch(u32),

    #[error("Reserved {mnemonic} encoding: 0x{ins:08x}")]
    Reserved { mnemonic: String, ins: u32 },
}

pub type Result<T> = std::result::Result<T, IsaError>;
