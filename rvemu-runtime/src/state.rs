//! CPU state

use rvemu_core::{Address, Exception, FRegister, Register, Xlen, NUM_REGISTERS};
use serde::Serialize;
use std::fmt;
use std::fmt::Write as _;

/// Upper half of a NaN-boxed single-precision value.
const NAN_BOX: u64 = 0xffff_ffff_0000_0000;

/// Canonical single-precision NaN.
pub const CANONICAL_NAN_F32: u32 = 0x7fc0_0000;

/// Register file, PC and the small amount of hart-local state execution
/// needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CpuState {
    /// Program counter
    pub pc: Address,

    /// Integer registers, kept normalised for the XLEN (x0 is never written)
    regs: [u64; NUM_REGISTERS],

    /// Floating-point registers as raw bits
    fregs: [u64; NUM_REGISTERS],

    /// Accrued floating-point exception flags (5 bits)
    pub fflags: u8,

    /// Dynamic rounding mode (3 bits)
    pub frm: u8,

    /// Address reserved by the last load-reserved
    pub reservation: Option<Address>,

    /// Retired instruction count
    pub instret: u64,

    /// Address of the last faulting data access
    pub fault_address: Option<Address>,

    xlen: Xlen,
}

impl CpuState {
    pub fn new(xlen: Xlen, pc: Address) -> Self {
        Self {
            pc,
            regs: [0; NUM_REGISTERS],
            fregs: [0; NUM_REGISTERS],
            fflags: 0,
            frm: 0,
            reservation: None,
            instret: 0,
            fault_address: None,
            xlen,
        }
    }

    pub fn xlen(&self) -> Xlen {
        self.xlen
    }

    /// Read register (x0 always returns 0)
    #[inline]
    pub fn read_reg(&self, reg: Register) -> u64 {
        self.x(reg.index() as u8)
    }

    /// Write register (writes to x0 are ignored)
    #[inline]
    pub fn write_reg(&mut self, reg: Register, value: u64) {
        self.set_x(reg.index() as u8, value)
    }

    /// Read integer register by number.
    #[inline]
    pub fn x(&self, n: u8) -> u64 {
        match n & 0x1f {
            0 => 0,
            n => self.regs[n as usize],
        }
    }

    /// Write integer register by number, normalised for the XLEN.
    #[inline]
    pub fn set_x(&mut self, n: u8, value: u64) {
        let n = (n & 0x1f) as usize;
        if n != 0 {
            self.regs[n] = self.xlen.normalize(value);
        }
    }

    /// Raw bits of a floating-point register.
    #[inline]
    pub fn read_freg(&self, reg: FRegister) -> u64 {
        self.f_bits(reg.index() as u8)
    }

    #[inline]
    pub fn f_bits(&self, n: u8) -> u64 {
        self.fregs[(n & 0x1f) as usize]
    }

    #[inline]
    pub fn set_f_bits(&mut self, n: u8, bits: u64) {
        self.fregs[(n & 0x1f) as usize] = bits;
    }

    /// Single-precision bits of a register; an improperly boxed value reads
    /// as the canonical NaN.
    #[inline]
    pub fn f32_bits(&self, n: u8) -> u32 {
        let raw = self.f_bits(n);
        if raw & NAN_BOX == NAN_BOX {
            raw as u32
        } else {
            CANONICAL_NAN_F32
        }
    }

    #[inline]
    pub fn f32(&self, n: u8) -> f32 {
        f32::from_bits(self.f32_bits(n))
    }

    /// Store single-precision bits, NaN-boxed.
    #[inline]
    pub fn set_f32_bits(&mut self, n: u8, bits: u32) {
        self.set_f_bits(n, NAN_BOX | bits as u64);
    }

    #[inline]
    pub fn set_f32(&mut self, n: u8, value: f32) {
        self.set_f32_bits(n, value.to_bits());
    }

    #[inline]
    pub fn f64(&self, n: u8) -> f64 {
        f64::from_bits(self.f_bits(n))
    }

    #[inline]
    pub fn set_f64(&mut self, n: u8, value: f64) {
        self.set_f_bits(n, value.to_bits());
    }

    /// fcsr as software sees it: `frm << 5 | fflags`.
    pub fn fcsr(&self) -> u64 {
        ((self.frm as u64) << 5) | self.fflags as u64
    }

    pub fn set_fcsr(&mut self, value: u64) {
        self.fflags = (value & 0x1f) as u8;
        self.frm = ((value >> 5) & 0x7) as u8;
    }

    /// Integer register listing, one register per line.
    pub fn iregs(&self) -> String {
        let mut s = String::new();
        let _ = writeln!(s, "{:<9} {}", "pc", self.hex(self.pc));
        for n in 0..NUM_REGISTERS {
            let reg = Register::from_field(n as u32);
            let _ = writeln!(s, "{:<4} {:<4} {}", format!("x{}", n), reg.name(), self.hex(self.x(n as u8)));
        }
        s
    }

    /// Floating-point register listing with raw bits and double value.
    pub fn fregs(&self) -> String {
        let mut s = String::new();
        for n in 0..NUM_REGISTERS {
            let reg = FRegister::from_field(n as u32);
            let bits = self.f_bits(n as u8);
            let _ = writeln!(s, "{:<4} {:<4} {:016x} {}", format!("f{}", n), reg.name(), bits, f64::from_bits(bits));
        }
        let _ = writeln!(s, "fcsr {:02x} (frm {}, fflags {:05b})", self.fcsr(), self.frm, self.fflags);
        s
    }

    fn hex(&self, val: u64) -> String {
        match self.xlen {
            Xlen::Rv32 => format!("{:08x}", val as u32),
            Xlen::Rv64 => format!("{:016x}", val),
        }
    }
}

/// Why a run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum HaltReason {
    /// A step reported a non-empty exception; `pc` is the faulting instruction
    Exception { pc: Address, ex: Exception },
    /// The step budget ran out
    StepLimit,
    /// The stop predicate fired
    Cancelled,
}

impl fmt::Display for HaltReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HaltReason::Exception { pc, ex } => write!(f, "exception {} at pc {:#x}", ex, pc),
            HaltReason::StepLimit => write!(f, "step limit reached"),
            HaltReason::Cancelled => write!(f, "cancelled"),
        }
    }
}
