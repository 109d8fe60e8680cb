//! Instruction execution
//!
//! [`execute`] applies one decoded instruction to the CPU state and memory.
//! On success the PC is advanced (or redirected) and an empty mask is
//! returned. On any exception the PC and the destination register are left
//! untouched, so the faulting instruction can be inspected and retried.

use crate::float::{fclass32, fclass64, fmax, fmin, to_signed, to_unsigned, Rounding};
use crate::state::CpuState;
use rvemu_core::{Address, AddressSpace, Exception, Xlen};
use rvemu_disassembler::{Instruction, Op};

const CSR_FFLAGS: u32 = 0x001;
const CSR_FRM: u32 = 0x002;
const CSR_FCSR: u32 = 0x003;
const CSR_CYCLE: u32 = 0xc00;
const CSR_TIME: u32 = 0xc01;
const CSR_INSTRET: u32 = 0xc02;
const CSR_CYCLEH: u32 = 0xc80;
const CSR_TIMEH: u32 = 0xc81;
const CSR_INSTRETH: u32 = 0xc82;

#[inline]
fn bool_val(b: bool) -> u64 {
    b as u64
}

#[inline]
fn sext32(v: u32) -> u64 {
    v as i32 as i64 as u64
}

/// Logical right shift of a register value at the current XLEN.
#[inline]
fn srl(xlen: Xlen, v: u64, sh: u32) -> u64 {
    match xlen {
        Xlen::Rv32 => ((v as u32) >> sh) as u64,
        Xlen::Rv64 => v >> sh,
    }
}

fn mulh(xlen: Xlen, a: u64, b: u64) -> u64 {
    match xlen {
        Xlen::Rv32 => ((a as i64 * b as i64) >> 32) as u64,
        Xlen::Rv64 => ((a as i64 as i128 * b as i64 as i128) >> 64) as u64,
    }
}

fn mulhsu(xlen: Xlen, a: u64, b: u64) -> u64 {
    match xlen {
        Xlen::Rv32 => ((a as i64 * b as u32 as i64) >> 32) as u64,
        Xlen::Rv64 => ((a as i64 as i128 * b as u128 as i128) >> 64) as u64,
    }
}

fn mulhu(xlen: Xlen, a: u64, b: u64) -> u64 {
    match xlen {
        Xlen::Rv32 => ((a as u32 as u64 * b as u32 as u64) >> 32) as u64,
        Xlen::Rv64 => ((a as u128 * b as u128) >> 64) as u64,
    }
}

fn amo_result(op: Op, old: u64, src: u64) -> u64 {
    use Op::*;
    match op {
        AmoswapW | AmoswapD => src,
        AmoaddW | AmoaddD => old.wrapping_add(src),
        AmoxorW | AmoxorD => old ^ src,
        AmoandW | AmoandD => old & src,
        AmoorW | AmoorD => old | src,
        AmominW => (old as i32).min(src as i32) as u64,
        AmomaxW => (old as i32).max(src as i32) as u64,
        AmominuW => (old as u32).min(src as u32) as u64,
        AmomaxuW => (old as u32).max(src as u32) as u64,
        AmominD => (old as i64).min(src as i64) as u64,
        AmomaxD => (old as i64).max(src as i64) as u64,
        AmominuD => old.min(src),
        AmomaxuD => old.max(src),
        _ => old,
    }
}

fn read_csr(s: &CpuState, csr: u32) -> Option<u64> {
    let rv32 = s.xlen() == Xlen::Rv32;
    match csr {
        CSR_FFLAGS => Some(s.fflags as u64),
        CSR_FRM => Some(s.frm as u64),
        CSR_FCSR => Some(s.fcsr()),
        CSR_CYCLE | CSR_TIME | CSR_INSTRET => Some(s.instret),
        CSR_CYCLEH | CSR_TIMEH | CSR_INSTRETH if rv32 => Some(s.instret >> 32),
        _ => None,
    }
}

/// Write a CSR; `false` if the CSR is read-only.
fn write_csr(s: &mut CpuState, csr: u32, value: u64) -> bool {
    match csr {
        CSR_FFLAGS => s.fflags = (value & 0x1f) as u8,
        CSR_FRM => s.frm = (value & 0x7) as u8,
        CSR_FCSR => s.set_fcsr(value),
        _ => return false,
    }
    true
}

/// Record a data fault and hand the mask back.
#[inline]
fn data_fault(s: &mut CpuState, adr: Address, ex: Exception) -> Exception {
    s.fault_address = Some(adr);
    ex
}

/// Execute a single instruction
pub fn execute(i: &Instruction, s: &mut CpuState, mem: &mut AddressSpace) -> Exception {
    use Op::*;

    let xlen = s.xlen();
    let pc = s.pc;
    let mut next = xlen.address(pc.wrapping_add(i.len as u64));
    let rs1 = s.x(i.rs1);
    let rs2 = s.x(i.rs2);
    let imm = i.imm as u64;
    let rd = i.rd;
    let ea = xlen.address(rs1.wrapping_add(imm));
    let shamt_mask = xlen.shamt_mask();

    macro_rules! load {
        ($read:ident, $conv:expr) => {{
            let (v, ex) = mem.$read(ea);
            if !ex.is_ok() {
                return data_fault(s, ea, ex);
            }
            s.set_x(rd, ($conv)(v));
        }};
    }

    macro_rules! store {
        ($write:ident, $val:expr) => {{
            let ex = mem.$write(ea, $val);
            if !ex.is_ok() {
                return data_fault(s, ea, ex);
            }
        }};
    }

    macro_rules! branch {
        ($cond:expr) => {
            if $cond {
                next = xlen.address(pc.wrapping_add(imm));
            }
        };
    }

    macro_rules! rounding {
        () => {
            match Rounding::resolve(i.rm, s.frm) {
                Some(rm) => rm,
                None => return Exception::ILLEGAL,
            }
        };
    }

    match i.op {
        // ========== RV32I ==========
        Lui => s.set_x(rd, imm),
        Auipc => s.set_x(rd, pc.wrapping_add(imm)),
        Jal => {
            s.set_x(rd, next);
            next = xlen.address(pc.wrapping_add(imm));
        }
        Jalr => {
            let target = xlen.address(rs1.wrapping_add(imm) & !1);
            s.set_x(rd, next);
            next = target;
        }
        Beq => branch!(rs1 == rs2),
        Bne => branch!(rs1 != rs2),
        Blt => branch!((rs1 as i64) < (rs2 as i64)),
        Bge => branch!((rs1 as i64) >= (rs2 as i64)),
        Bltu => branch!(rs1 < rs2),
        Bgeu => branch!(rs1 >= rs2),

        Lb => load!(read_u8, |v: u8| v as i8 as i64 as u64),
        Lh => load!(read_u16, |v: u16| v as i16 as i64 as u64),
        Lw => load!(read_u32, sext32),
        Lbu => load!(read_u8, |v: u8| v as u64),
        Lhu => load!(read_u16, |v: u16| v as u64),
        Sb => store!(write_u8, rs2 as u8),
        Sh => store!(write_u16, rs2 as u16),
        Sw => store!(write_u32, rs2 as u32),

        Addi => s.set_x(rd, rs1.wrapping_add(imm)),
        Slti => s.set_x(rd, bool_val((rs1 as i64) < i.imm)),
        Sltiu => s.set_x(rd, bool_val(rs1 < imm)),
        Xori => s.set_x(rd, rs1 ^ imm),
        Ori => s.set_x(rd, rs1 | imm),
        Andi => s.set_x(rd, rs1 & imm),
        Slli => s.set_x(rd, rs1 << (i.imm as u32 & shamt_mask)),
        Srli => s.set_x(rd, srl(xlen, rs1, i.imm as u32 & shamt_mask)),
        Srai => s.set_x(rd, ((rs1 as i64) >> (i.imm as u32 & shamt_mask)) as u64),

        Add => s.set_x(rd, rs1.wrapping_add(rs2)),
        Sub => s.set_x(rd, rs1.wrapping_sub(rs2)),
        Sll => s.set_x(rd, rs1 << (rs2 as u32 & shamt_mask)),
        Slt => s.set_x(rd, bool_val((rs1 as i64) < (rs2 as i64))),
        Sltu => s.set_x(rd, bool_val(rs1 < rs2)),
        Xor => s.set_x(rd, rs1 ^ rs2),
        Srl => s.set_x(rd, srl(xlen, rs1, rs2 as u32 & shamt_mask)),
        Sra => s.set_x(rd, ((rs1 as i64) >> (rs2 as u32 & shamt_mask)) as u64),
        Or => s.set_x(rd, rs1 | rs2),
        And => s.set_x(rd, rs1 & rs2),

        Fence | FenceI => {}
        Ecall => return Exception::ECALL,
        Ebreak => return Exception::EBREAK,

        Csrrw | Csrrs | Csrrc | Csrrwi | Csrrsi | Csrrci => {
            let csr = i.csr();
            let Some(old) = read_csr(s, csr) else {
                return Exception::ILLEGAL;
            };
            let src = match i.op {
                Csrrw | Csrrs | Csrrc => rs1,
                _ => i.rs1 as u64,
            };
            let new = match i.op {
                Csrrw | Csrrwi => Some(src),
                // set/clear with a zero source do not write
                _ if i.rs1 == 0 => None,
                Csrrs | Csrrsi => Some(old | src),
                _ => Some(old & !src),
            };
            if let Some(new) = new {
                if !write_csr(s, csr, new) {
                    return Exception::ILLEGAL;
                }
            }
            s.set_x(rd, old);
        }

        // ========== RV64I ==========
        Lwu => load!(read_u32, |v: u32| v as u64),
        Ld => load!(read_u64, |v: u64| v),
        Sd => store!(write_u64, rs2),
        Addiw => s.set_x(rd, sext32((rs1 as u32).wrapping_add(imm as u32))),
        Slliw => s.set_x(rd, sext32((rs1 as u32) << (i.imm as u32 & 31))),
        Srliw => s.set_x(rd, sext32((rs1 as u32) >> (i.imm as u32 & 31))),
        Sraiw => s.set_x(rd, ((rs1 as i32) >> (i.imm as u32 & 31)) as i64 as u64),
        Addw => s.set_x(rd, sext32((rs1 as u32).wrapping_add(rs2 as u32))),
        Subw => s.set_x(rd, sext32((rs1 as u32).wrapping_sub(rs2 as u32))),
        Sllw => s.set_x(rd, sext32((rs1 as u32) << (rs2 as u32 & 31))),
        Srlw => s.set_x(rd, sext32((rs1 as u32) >> (rs2 as u32 & 31))),
        Sraw => s.set_x(rd, ((rs1 as i32) >> (rs2 as u32 & 31)) as i64 as u64),

        // ========== M ==========
        Mul => s.set_x(rd, rs1.wrapping_mul(rs2)),
        Mulh => s.set_x(rd, mulh(xlen, rs1, rs2)),
        Mulhsu => s.set_x(rd, mulhsu(xlen, rs1, rs2)),
        Mulhu => s.set_x(rd, mulhu(xlen, rs1, rs2)),
        Div => {
            // RV32 operands are sign-extended, so the i64 quotient of
            // MIN / -1 normalises back to MIN
            let v = if rs2 == 0 {
                u64::MAX
            } else {
                (rs1 as i64).wrapping_div(rs2 as i64) as u64
            };
            s.set_x(rd, v);
        }
        Divu => {
            let (a, b) = (xlen.address(rs1), xlen.address(rs2));
            s.set_x(rd, a.checked_div(b).unwrap_or(u64::MAX));
        }
        Rem => {
            let v = if rs2 == 0 {
                rs1
            } else {
                (rs1 as i64).wrapping_rem(rs2 as i64) as u64
            };
            s.set_x(rd, v);
        }
        Remu => {
            let (a, b) = (xlen.address(rs1), xlen.address(rs2));
            s.set_x(rd, a.checked_rem(b).unwrap_or(a));
        }
        Mulw => s.set_x(rd, sext32((rs1 as u32).wrapping_mul(rs2 as u32))),
        Divw => {
            let (a, b) = (rs1 as i32, rs2 as i32);
            let v = if b == 0 { -1 } else { a.wrapping_div(b) };
            s.set_x(rd, v as i64 as u64);
        }
        Divuw => {
            let (a, b) = (rs1 as u32, rs2 as u32);
            s.set_x(rd, sext32(a.checked_div(b).unwrap_or(u32::MAX)));
        }
        Remw => {
            let (a, b) = (rs1 as i32, rs2 as i32);
            let v = if b == 0 { a } else { a.wrapping_rem(b) };
            s.set_x(rd, v as i64 as u64);
        }
        Remuw => {
            let (a, b) = (rs1 as u32, rs2 as u32);
            s.set_x(rd, sext32(a.checked_rem(b).unwrap_or(a)));
        }

        // ========== A ==========
        LrW | LrD => {
            let adr = xlen.address(rs1);
            let (v, ex) = if i.op == LrW {
                let (v, ex) = mem.read_u32(adr);
                (sext32(v), ex)
            } else {
                mem.read_u64(adr)
            };
            if !ex.is_ok() {
                return data_fault(s, adr, ex);
            }
            s.reservation = Some(adr);
            s.set_x(rd, v);
        }
        ScW | ScD => {
            let adr = xlen.address(rs1);
            // every sc, faulting or not, consumes the reservation
            if s.reservation.take() == Some(adr) {
                let ex = if i.op == ScW {
                    mem.write_u32(adr, rs2 as u32)
                } else {
                    mem.write_u64(adr, rs2)
                };
                if !ex.is_ok() {
                    return data_fault(s, adr, ex);
                }
                s.set_x(rd, 0);
            } else {
                s.set_x(rd, 1);
            }
        }
        AmoswapW | AmoaddW | AmoxorW | AmoandW | AmoorW | AmominW | AmomaxW | AmominuW
        | AmomaxuW => {
            let adr = xlen.address(rs1);
            let (old, ex) = mem.read_u32(adr);
            if !ex.is_ok() {
                return data_fault(s, adr, ex);
            }
            let old = sext32(old);
            let ex = mem.write_u32(adr, amo_result(i.op, old, rs2) as u32);
            if !ex.is_ok() {
                return data_fault(s, adr, ex);
            }
            s.set_x(rd, old);
        }
        AmoswapD | AmoaddD | AmoxorD | AmoandD | AmoorD | AmominD | AmomaxD | AmominuD
        | AmomaxuD => {
            let adr = xlen.address(rs1);
            let (old, ex) = mem.read_u64(adr);
            if !ex.is_ok() {
                return data_fault(s, adr, ex);
            }
            let ex = mem.write_u64(adr, amo_result(i.op, old, rs2));
            if !ex.is_ok() {
                return data_fault(s, adr, ex);
            }
            s.set_x(rd, old);
        }

        // ========== F ==========
        Flw => {
            let (v, ex) = mem.read_u32(ea);
            if !ex.is_ok() {
                return data_fault(s, ea, ex);
            }
            s.set_f32_bits(rd, v);
        }
        Fsw => store!(write_u32, s.f_bits(i.rs2) as u32),
        FmaddS | FmsubS | FnmsubS | FnmaddS => {
            let (a, b, c) = (s.f32(i.rs1), s.f32(i.rs2), s.f32(i.rs3));
            let v = match i.op {
                FmaddS => a.mul_add(b, c),
                FmsubS => a.mul_add(b, -c),
                FnmsubS => (-a).mul_add(b, c),
                _ => (-a).mul_add(b, -c),
            };
            s.set_f32(rd, v);
        }
        FaddS => s.set_f32(rd, s.f32(i.rs1) + s.f32(i.rs2)),
        FsubS => s.set_f32(rd, s.f32(i.rs1) - s.f32(i.rs2)),
        FmulS => s.set_f32(rd, s.f32(i.rs1) * s.f32(i.rs2)),
        FdivS => s.set_f32(rd, s.f32(i.rs1) / s.f32(i.rs2)),
        FsqrtS => s.set_f32(rd, s.f32(i.rs1).sqrt()),
        FsgnjS | FsgnjnS | FsgnjxS => {
            const SIGN: u32 = 0x8000_0000;
            let (a, b) = (s.f32_bits(i.rs1), s.f32_bits(i.rs2));
            let v = match i.op {
                FsgnjS => (a & !SIGN) | (b & SIGN),
                FsgnjnS => (a & !SIGN) | (!b & SIGN),
                _ => a ^ (b & SIGN),
            };
            s.set_f32_bits(rd, v);
        }
        FminS => s.set_f32(rd, fmin(s.f32(i.rs1) as f64, s.f32(i.rs2) as f64) as f32),
        FmaxS => s.set_f32(rd, fmax(s.f32(i.rs1) as f64, s.f32(i.rs2) as f64) as f32),
        FcvtWS => {
            let rm = rounding!();
            let v = to_signed(s.f32(i.rs1) as f64, rm, i32::MIN as i64, i32::MAX as i64);
            s.set_x(rd, v as u64);
        }
        FcvtWuS => {
            let rm = rounding!();
            let v = to_unsigned(s.f32(i.rs1) as f64, rm, u32::MAX as u64);
            s.set_x(rd, sext32(v as u32));
        }
        FcvtLS => {
            let rm = rounding!();
            s.set_x(rd, to_signed(s.f32(i.rs1) as f64, rm, i64::MIN, i64::MAX) as u64);
        }
        FcvtLuS => {
            let rm = rounding!();
            s.set_x(rd, to_unsigned(s.f32(i.rs1) as f64, rm, u64::MAX));
        }
        FmvXW => s.set_x(rd, sext32(s.f_bits(i.rs1) as u32)),
        FeqS => s.set_x(rd, bool_val(s.f32(i.rs1) == s.f32(i.rs2))),
        FltS => s.set_x(rd, bool_val(s.f32(i.rs1) < s.f32(i.rs2))),
        FleS => s.set_x(rd, bool_val(s.f32(i.rs1) <= s.f32(i.rs2))),
        FclassS => s.set_x(rd, fclass32(s.f32_bits(i.rs1))),
        FcvtSW => s.set_f32(rd, rs1 as i32 as f32),
        FcvtSWu => s.set_f32(rd, rs1 as u32 as f32),
        FcvtSL => s.set_f32(rd, rs1 as i64 as f32),
        FcvtSLu => s.set_f32(rd, rs1 as f32),
        FmvWX => s.set_f32_bits(rd, rs1 as u32),

        // ========== D ==========
        Fld => {
            let (v, ex) = mem.read_u64(ea);
            if !ex.is_ok() {
                return data_fault(s, ea, ex);
            }
            s.set_f_bits(rd, v);
        }
        Fsd => store!(write_u64, s.f_bits(i.rs2)),
        FmaddD | FmsubD | FnmsubD | FnmaddD => {
            let (a, b, c) = (s.f64(i.rs1), s.f64(i.rs2), s.f64(i.rs3));
            let v = match i.op {
                FmaddD => a.mul_add(b, c),
                FmsubD => a.mul_add(b, -c),
                FnmsubD => (-a).mul_add(b, c),
                _ => (-a).mul_add(b, -c),
            };
            s.set_f64(rd, v);
        }
        FaddD => s.set_f64(rd, s.f64(i.rs1) + s.f64(i.rs2)),
        FsubD => s.set_f64(rd, s.f64(i.rs1) - s.f64(i.rs2)),
        FmulD => s.set_f64(rd, s.f64(i.rs1) * s.f64(i.rs2)),
        FdivD => s.set_f64(rd, s.f64(i.rs1) / s.f64(i.rs2)),
        FsqrtD => s.set_f64(rd, s.f64(i.rs1).sqrt()),
        FsgnjD | FsgnjnD | FsgnjxD => {
            const SIGN: u64 = 1 << 63;
            let (a, b) = (s.f_bits(i.rs1), s.f_bits(i.rs2));
            let v = match i.op {
                FsgnjD => (a & !SIGN) | (b & SIGN),
                FsgnjnD => (a & !SIGN) | (!b & SIGN),
                _ => a ^ (b & SIGN),
            };
            s.set_f_bits(rd, v);
        }
        FminD => s.set_f64(rd, fmin(s.f64(i.rs1), s.f64(i.rs2))),
        FmaxD => s.set_f64(rd, fmax(s.f64(i.rs1), s.f64(i.rs2))),
        FcvtSD => s.set_f32(rd, s.f64(i.rs1) as f32),
        FcvtDS => s.set_f64(rd, s.f32(i.rs1) as f64),
        FeqD => s.set_x(rd, bool_val(s.f64(i.rs1) == s.f64(i.rs2))),
        FltD => s.set_x(rd, bool_val(s.f64(i.rs1) < s.f64(i.rs2))),
        FleD => s.set_x(rd, bool_val(s.f64(i.rs1) <= s.f64(i.rs2))),
        FclassD => s.set_x(rd, fclass64(s.f_bits(i.rs1))),
        FcvtWD => {
            let rm = rounding!();
            let v = to_signed(s.f64(i.rs1), rm, i32::MIN as i64, i32::MAX as i64);
            s.set_x(rd, v as u64);
        }
        FcvtWuD => {
            let rm = rounding!();
            let v = to_unsigned(s.f64(i.rs1), rm, u32::MAX as u64);
            s.set_x(rd, sext32(v as u32));
        }
        FcvtLD => {
            let rm = rounding!();
            s.set_x(rd, to_signed(s.f64(i.rs1), rm, i64::MIN, i64::MAX) as u64);
        }
        FcvtLuD => {
            let rm = rounding!();
            s.set_x(rd, to_unsigned(s.f64(i.rs1), rm, u64::MAX));
        }
        FcvtDW => s.set_f64(rd, rs1 as i32 as f64),
        FcvtDWu => s.set_f64(rd, rs1 as u32 as f64),
        FcvtDL => s.set_f64(rd, rs1 as i64 as f64),
        FcvtDLu => s.set_f64(rd, rs1 as f64),
        FmvXD => s.set_x(rd, s.f_bits(i.rs1)),
        FmvDX => s.set_f_bits(rd, rs1),
    }

    s.pc = next;
    Exception::empty()
}
