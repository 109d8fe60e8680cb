//! Runtime error types

use rvemu_core::{Address, Exception, MemoryError};
use rvemu_disassembler::IsaError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("ISA error: {0}")]
    Isa(#[from] IsaError),

    #[error("Memory error: {0}")]
    Memory(#[from] MemoryError),

    #[error("Load fault at {address:#x}: {ex}")]
    LoadFault { address: Address, ex: Exception },
}

pub type Result<T> = std::result::Result<T, RuntimeError>;
