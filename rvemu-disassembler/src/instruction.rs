//! Decoded instruction

use crate::op::{Op, Syntax};
use rvemu_core::{Address, Xlen};
use serde::Serialize;

/// A decoded instruction in its expanded (32-bit) form.
///
/// Register fields hold raw register numbers; whether a field names an
/// integer or a floating-point register follows from the operation's
/// [`Syntax`]. CSR instructions keep the CSR number in `imm` and the 5-bit
/// immediate of the `*i` forms in `rs1`. Fences keep `pred << 4 | succ` in
/// `imm`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct Instruction {
    pub op: Op,
    pub rd: u8,
    pub rs1: u8,
    pub rs2: u8,
    pub rs3: u8,
    pub imm: i64,
    /// Rounding mode (floating point) or funct3
    pub rm: u8,
    pub aq: bool,
    pub rl: bool,
    /// Encoded length in bytes (2 or 4)
    pub len: u8,
}

impl Instruction {
    pub fn new(op: Op, len: u8) -> Self {
        Self {
            op,
            rd: 0,
            rs1: 0,
            rs2: 0,
            rs3: 0,
            imm: 0,
            rm: 0,
            aq: false,
            rl: false,
            len,
        }
    }

    /// True for a 16-bit encoding.
    pub fn is_compressed(&self) -> bool {
        self.len == 2
    }

    /// CSR number of a CSR instruction.
    pub fn csr(&self) -> u32 {
        (self.imm as u32) & 0xfff
    }

    /// Static target of a branch or `jal`.
    pub fn target(&self, pc: Address, xlen: Xlen) -> Option<Address> {
        match self.op.syntax() {
            Syntax::Branch | Syntax::Jal => Some(xlen.address(pc.wrapping_add(self.imm as u64))),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_branch_target_wraps() {
        let mut ins = Instruction::new(Op::Beq, 4);
        ins.imm = -8;
        assert_eq!(ins.target(0x100, Xlen::Rv32), Some(0xf8));
        assert_eq!(ins.target(0x4, Xlen::Rv32), Some(0xffff_fffc));
        assert_eq!(ins.target(0x4, Xlen::Rv64), Some(0xffff_ffff_ffff_fffc));
    }

    #[test]
    fn test_no_target_for_jalr() {
        let ins = Instruction::new(Op::Jalr, 4);
        assert_eq!(ins.target(0x100, Xlen::Rv64), None);
    }

    #[test]
    fn test_csr_number() {
        let mut ins = Instruction::new(Op::Csrrs, 4);
        ins.imm = 0xc00;
        assert_eq!(ins.csr(), 0xc00);
    }
}
