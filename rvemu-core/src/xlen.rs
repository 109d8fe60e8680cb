//! Base integer register width

use serde::{Deserialize, Serialize};
use std::fmt;

/// XLEN of the base integer ISA.
///
/// Register values are held as `u64`. On RV32 they are kept sign-extended
/// from bit 31 so the same arithmetic serves both widths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Xlen {
    Rv32,
    Rv64,
}

impl Xlen {
    #[inline]
    pub const fn bits(self) -> u32 {
        match self {
            Xlen::Rv32 => 32,
            Xlen::Rv64 => 64,
        }
    }

    #[inline]
    pub const fn bytes(self) -> usize {
        self.bits() as usize / 8
    }

    /// Canonical register value: sign-extended from bit 31 on RV32.
    #[inline]
    pub const fn normalize(self, val: u64) -> u64 {
        match self {
            Xlen::Rv32 => val as u32 as i32 as i64 as u64,
            Xlen::Rv64 => val,
        }
    }

    /// Effective address of a register value.
    #[inline]
    pub const fn address(self, val: u64) -> u64 {
        match self {
            Xlen::Rv32 => val & 0xffff_ffff,
            Xlen::Rv64 => val,
        }
    }

    /// Mask for register shift amounts (5 or 6 bits).
    #[inline]
    pub const fn shamt_mask(self) -> u32 {
        self.bits() - 1
    }
}

impl fmt::Display for Xlen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rv{}", self.bits())
    }
}
