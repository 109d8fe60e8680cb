//! # Operand formats
//!
//! A [`Format`] is the operand decoder attached to a table entry. It turns a
//! matched instruction word into an [`Instruction`]. Compressed formats
//! expand to the equivalent 32-bit operation; formats that cover several
//! encodings sharing one mask/match pattern (for example `c.mv` and `c.jr`)
//! pick the operation from the operand fields.
//!
//! `decode` returns `None` for encodings the ISA reserves inside a matched
//! pattern, such as `c.addi4spn` with a zero immediate.

use crate::instruction::Instruction;
use crate::op::Op;
use rvemu_core::encoding::*;
use rvemu_core::Xlen;

/// Operand decoder of a table entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Format {
    // ========== 32-bit ==========
    /// rd, rs1, rs2, funct3, aq/rl
    R,
    /// rd, rs1, rs2, rs3, rm
    R4,
    I,
    S,
    B,
    U,
    J,
    /// rd, rs1, shamt
    Shift,
    /// rd, rs1, csr
    Csr,
    /// rd, uimm, csr
    CsrI,
    Fence,
    /// No operands
    None,

    // ========== Compressed ==========
    CAddi4spn,
    /// Word-scaled load, primed registers
    CLw,
    /// Doubleword-scaled load, primed registers
    CLd,
    CSw,
    CSd,
    /// c.addi (c.nop when rd is zero)
    CAddi,
    CAddiw,
    CJal,
    CLi,
    /// c.lui, or c.addi16sp when rd is sp
    CLui,
    /// c.srli / c.srai
    CShift,
    CAndi,
    /// c.sub, c.xor, c.or, c.and, c.subw, c.addw
    CArith,
    CJ,
    /// c.beqz / c.bnez
    CBranch,
    CSlli,
    CLwsp,
    CLdsp,
    /// c.mv, or c.jr when rs2 is zero
    CMv,
    /// c.add, or c.jalr / c.ebreak when rs2 is zero
    CAdd,
    CSwsp,
    CSdsp,
}

const SP: u8 = 2;
const RA: u8 = 1;

#[inline]
fn reg(field: u32) -> u8 {
    field as u8
}

impl Format {
    /// Decode the operands of `ins` for operation `op`.
    pub fn decode(self, op: Op, ins: u32, xlen: Xlen) -> Option<Instruction> {
        match self {
            Format::R
            | Format::R4
            | Format::I
            | Format::S
            | Format::B
            | Format::U
            | Format::J
            | Format::Shift
            | Format::Csr
            | Format::CsrI
            | Format::Fence
            | Format::None => Some(self.decode_32(op, ins)),
            _ => self.decode_16(op, ins & 0xffff, xlen),
        }
    }

    fn decode_32(self, op: Op, ins: u32) -> Instruction {
        let mut i = Instruction::new(op, 4);
        match self {
            Format::R => {
                i.rd = reg(rd(ins));
                i.rs1 = reg(rs1(ins));
                i.rs2 = reg(rs2(ins));
                i.rm = funct3(ins) as u8;
                i.aq = aq(ins);
                i.rl = rl(ins);
            }
            Format::R4 => {
                i.rd = reg(rd(ins));
                i.rs1 = reg(rs1(ins));
                i.rs2 = reg(rs2(ins));
                i.rs3 = reg(rs3(ins));
                i.rm = funct3(ins) as u8;
            }
            Format::I => {
                i.rd = reg(rd(ins));
                i.rs1 = reg(rs1(ins));
                i.imm = imm_i(ins) as i64;
            }
            Format::S => {
                i.rs1 = reg(rs1(ins));
                i.rs2 = reg(rs2(ins));
                i.imm = imm_s(ins) as i64;
            }
            Format::B => {
                i.rs1 = reg(rs1(ins));
                i.rs2 = reg(rs2(ins));
                i.imm = imm_b(ins) as i64;
            }
            Format::U => {
                i.rd = reg(rd(ins));
                i.imm = imm_u(ins) as i64;
            }
            Format::J => {
                i.rd = reg(rd(ins));
                i.imm = imm_j(ins) as i64;
            }
            Format::Shift => {
                i.rd = reg(rd(ins));
                i.rs1 = reg(rs1(ins));
                i.imm = shamt(ins) as i64;
            }
            Format::Csr | Format::CsrI => {
                i.rd = reg(rd(ins));
                i.rs1 = reg(rs1(ins));
                i.imm = csr(ins) as i64;
            }
            Format::Fence => {
                i.imm = ((fence_pred(ins) << 4) | fence_succ(ins)) as i64;
            }
            _ => {}
        }
        i
    }

    fn decode_16(self, op: Op, ins: u32, xlen: Xlen) -> Option<Instruction> {
        let mut i = Instruction::new(op, 2);
        match self {
            Format::CAddi4spn => {
                let imm = c_addi4spn_imm(ins);
                if imm == 0 {
                    return None;
                }
                i.rd = reg(c_rs2_prime(ins));
                i.rs1 = SP;
                i.imm = imm as i64;
            }
            Format::CLw | Format::CLd => {
                i.rd = reg(c_rs2_prime(ins));
                i.rs1 = reg(c_rs1_prime(ins));
                i.imm = (if self == Format::CLw { c_lw_imm(ins) } else { c_ld_imm(ins) }) as i64;
            }
            Format::CSw | Format::CSd => {
                i.rs2 = reg(c_rs2_prime(ins));
                i.rs1 = reg(c_rs1_prime(ins));
                i.imm = (if self == Format::CSw { c_lw_imm(ins) } else { c_ld_imm(ins) }) as i64;
            }
            Format::CAddi | Format::CAddiw => {
                let rd = reg(c_rd(ins));
                if self == Format::CAddiw && rd == 0 {
                    return None;
                }
                i.rd = rd;
                i.rs1 = rd;
                i.imm = c_imm6(ins) as i64;
            }
            Format::CJal => {
                i.rd = RA;
                i.imm = c_j_imm(ins) as i64;
            }
            Format::CJ => {
                i.imm = c_j_imm(ins) as i64;
            }
            Format::CLi => {
                i.rd = reg(c_rd(ins));
                i.imm = c_imm6(ins) as i64;
            }
            Format::CLui => {
                let rd = reg(c_rd(ins));
                if rd == SP {
                    let imm = c_addi16sp_imm(ins);
                    if imm == 0 {
                        return None;
                    }
                    i.op = Op::Addi;
                    i.rd = SP;
                    i.rs1 = SP;
                    i.imm = imm as i64;
                } else {
                    let imm = c_lui_imm(ins);
                    if imm == 0 {
                        return None;
                    }
                    i.op = Op::Lui;
                    i.rd = rd;
                    i.imm = imm as i64;
                }
            }
            Format::CShift | Format::CSlli => {
                let sh = c_shamt(ins);
                if xlen == Xlen::Rv32 && sh >= 32 {
                    return None;
                }
                let rd = if self == Format::CSlli {
                    reg(c_rd(ins))
                } else {
                    reg(c_rs1_prime(ins))
                };
                i.rd = rd;
                i.rs1 = rd;
                i.imm = sh as i64;
            }
            Format::CAndi => {
                let rd = reg(c_rs1_prime(ins));
                i.rd = rd;
                i.rs1 = rd;
                i.imm = c_imm6(ins) as i64;
            }
            Format::CArith => {
                let rd = reg(c_rs1_prime(ins));
                i.rd = rd;
                i.rs1 = rd;
                i.rs2 = reg(c_rs2_prime(ins));
            }
            Format::CBranch => {
                i.rs1 = reg(c_rs1_prime(ins));
                i.imm = c_b_imm(ins) as i64;
            }
            Format::CLwsp | Format::CLdsp => {
                let rd = reg(c_rd(ins));
                if rd == 0 && matches!(op, Op::Lw | Op::Ld) {
                    return None;
                }
                i.rd = rd;
                i.rs1 = SP;
                i.imm = (if self == Format::CLwsp { c_lwsp_imm(ins) } else { c_ldsp_imm(ins) }) as i64;
            }
            Format::CSwsp | Format::CSdsp => {
                i.rs1 = SP;
                i.rs2 = reg(c_rs2(ins));
                i.imm = (if self == Format::CSwsp { c_swsp_imm(ins) } else { c_sdsp_imm(ins) }) as i64;
            }
            Format::CMv => {
                let rd = reg(c_rd(ins));
                let rs2 = reg(c_rs2(ins));
                if rs2 == 0 {
                    // c.jr
                    if rd == 0 {
                        return None;
                    }
                    i.op = Op::Jalr;
                    i.rs1 = rd;
                } else {
                    i.op = Op::Add;
                    i.rd = rd;
                    i.rs2 = rs2;
                }
            }
            Format::CAdd => {
                let rd = reg(c_rd(ins));
                let rs2 = reg(c_rs2(ins));
                match (rd, rs2) {
                    (0, 0) => i.op = Op::Ebreak,
                    (_, 0) => {
                        i.op = Op::Jalr;
                        i.rd = RA;
                        i.rs1 = rd;
                    }
                    _ => {
                        i.op = Op::Add;
                        i.rd = rd;
                        i.rs1 = rd;
                        i.rs2 = rs2;
                    }
                }
            }
            _ => return None,
        }
        Some(i)
    }
}
