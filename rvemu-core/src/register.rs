//! Register definitions (RISC-V calling convention)

use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of registers in each register file
pub const NUM_REGISTERS: usize = 32;

const X_NAMES: [&str; NUM_REGISTERS] = [
    "zero", // x0  - hardwired to 0
    "ra",   // x1  - return address
    "sp",   // x2  - stack pointer
    "gp",   // x3  - global pointer
    "tp",   // x4  - thread pointer
    "t0",   // x5  - temporary (caller-saved)
    "t1",   // x6
    "t2",   // x7
    "s0",   // x8  - saved register / frame pointer
    "s1",   // x9
    "a0",   // x10 - argument 0 / return value
    "a1",   // x11 - argument 1 / return value
    "a2",   // x12
    "a3",   // x13
    "a4",   // x14
    "a5",   // x15
    "a6",   // x16
    "a7",   // x17
    "s2",   // x18 - saved registers (callee-saved)
    "s3",   // x19
    "s4",   // x20
    "s5",   // x21
    "s6",   // x22
    "s7",   // x23
    "s8",   // x24
    "s9",   // x25
    "s10",  // x26
    "s11",  // x27
    "t3",   // x28 - temporaries (caller-saved)
    "t4",   // x29
    "t5",   // x30
    "t6",   // x31
];

const F_NAMES: [&str; NUM_REGISTERS] = [
    "ft0", "ft1", "ft2", "ft3", "ft4", "ft5", "ft6", "ft7",
    "fs0", "fs1",
    "fa0", "fa1", "fa2", "fa3", "fa4", "fa5", "fa6", "fa7",
    "fs2", "fs3", "fs4", "fs5", "fs6", "fs7", "fs8", "fs9", "fs10", "fs11",
    "ft8", "ft9", "ft10", "ft11",
];

/// Integer register (x0-x31)
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Register(u8);

impl Register {
    pub const ZERO: Self = Self(0);
    pub const RA: Self = Self(1);
    pub const SP: Self = Self(2);
    pub const GP: Self = Self(3);
    pub const TP: Self = Self(4);
    pub const FP: Self = Self(8);
    pub const A0: Self = Self(10);
    pub const A1: Self = Self(11);
    pub const A7: Self = Self(17);

    #[inline]
    pub fn from_index(index: usize) -> Option<Self> {
        (index < NUM_REGISTERS).then(|| Self(index as u8))
    }

    /// Register from a 5-bit instruction field (upper bits ignored).
    #[inline]
    pub const fn from_field(field: u32) -> Self {
        Self((field & 0x1f) as u8)
    }

    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }

    #[inline]
    pub fn is_zero(self) -> bool {
        self == Self::ZERO
    }

    pub fn name(self) -> &'static str {
        X_NAMES[self.index()]
    }

    /// Look up a register by ABI name (`a0`, `fp`) or number (`x10`).
    pub fn parse(name: &str) -> Option<Self> {
        let name = name.trim().to_lowercase();
        if name == "fp" {
            return Some(Self::FP);
        }
        if let Some(n) = name.strip_prefix('x') {
            return n.parse::<usize>().ok().and_then(Self::from_index);
        }
        X_NAMES.iter().position(|n| *n == name).map(|i| Self(i as u8))
    }
}

impl fmt::Display for Register {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Floating-point register (f0-f31)
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FRegister(u8);

impl FRegister {
    #[inline]
    pub fn from_index(index: usize) -> Option<Self> {
        (index < NUM_REGISTERS).then(|| Self(index as u8))
    }

    #[inline]
    pub const fn from_field(field: u32) -> Self {
        Self((field & 0x1f) as u8)
    }

    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }

    pub fn name(self) -> &'static str {
        F_NAMES[self.index()]
    }
}

impl fmt::Display for FRegister {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_abi_names() {
        assert_eq!(Register::ZERO.name(), "zero");
        assert_eq!(Register::from_field(8).name(), "s0");
        assert_eq!(Register::from_field(31).name(), "t6");
        assert_eq!(FRegister::from_field(10).name(), "fa0");
        assert_eq!(FRegister::from_field(27).name(), "fs11");
    }

    #[test]
    fn test_from_field_masks() {
        assert_eq!(Register::from_field(0x21), Register::RA);
    }

    #[test]
    fn test_parse() {
        assert_eq!(Register::parse("a0"), Some(Register::A0));
        assert_eq!(Register::parse("x2"), Some(Register::SP));
        assert_eq!(Register::parse("FP"), Some(Register::FP));
        assert_eq!(Register::parse("x32"), None);
        assert_eq!(Register::parse("q1"), None);
    }

    #[test]
    fn test_from_index_bounds() {
        assert!(Register::from_index(31).is_some());
        assert!(Register::from_index(32).is_none());
    }
}
