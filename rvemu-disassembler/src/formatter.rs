//! Instruction formatting to assembly text
//!
//! Output follows GNU objdump: ABI register names, operands separated by a
//! bare comma, the usual pseudo-instructions (`nop`, `li`, `mv`, `ret`,
//! `beqz`, `csrr`, ...), branch and jump targets as bare hex addresses, and
//! compressed instructions printed as their 32-bit expansion.

use crate::instruction::Instruction;
use crate::op::{Op, Syntax};
use rvemu_core::{Address, FRegister, Register, SymbolTable, Xlen};

const ROUNDING_MODES: [&str; 8] = ["rne", "rtz", "rdn", "rup", "rmm", "rm5", "rm6", "dyn"];
const RM_DYN: u8 = 7;

const CSR_NAMES: &[(u32, &str)] = &[
    (0x001, "fflags"),
    (0x002, "frm"),
    (0x003, "fcsr"),
    (0x100, "sstatus"),
    (0x104, "sie"),
    (0x105, "stvec"),
    (0x140, "sscratch"),
    (0x141, "sepc"),
    (0x142, "scause"),
    (0x143, "stval"),
    (0x144, "sip"),
    (0x180, "satp"),
    (0x300, "mstatus"),
    (0x301, "misa"),
    (0x302, "medeleg"),
    (0x303, "mideleg"),
    (0x304, "mie"),
    (0x305, "mtvec"),
    (0x340, "mscratch"),
    (0x341, "mepc"),
    (0x342, "mcause"),
    (0x343, "mtval"),
    (0x344, "mip"),
    (0xb00, "mcycle"),
    (0xb02, "minstret"),
    (0xc00, "cycle"),
    (0xc01, "time"),
    (0xc02, "instret"),
    (0xc80, "cycleh"),
    (0xc81, "timeh"),
    (0xc82, "instreth"),
    (0xf11, "mvendorid"),
    (0xf12, "marchid"),
    (0xf13, "mimpid"),
    (0xf14, "mhartid"),
];

/// Name of a CSR, if it has one.
pub fn csr_name(csr: u32) -> Option<&'static str> {
    CSR_NAMES.iter().find(|(n, _)| *n == csr).map(|(_, name)| *name)
}

#[inline]
fn x(n: u8) -> &'static str {
    Register::from_field(n as u32).name()
}

#[inline]
fn f(n: u8) -> &'static str {
    FRegister::from_field(n as u32).name()
}

fn csr(i: &Instruction) -> String {
    let n = i.csr();
    csr_name(n).map_or_else(|| format!("{:#x}", n), str::to_string)
}

fn fence_set(bits: i64) -> String {
    let s: String = [(8, 'i'), (4, 'o'), (2, 'r'), (1, 'w')]
        .iter()
        .filter(|(b, _)| bits & b != 0)
        .map(|(_, c)| *c)
        .collect();
    if s.is_empty() {
        "0".to_string()
    } else {
        s
    }
}

fn with_rm(mut s: String, i: &Instruction) -> String {
    // exact widening conversions are normally encoded with rm = 0
    let exact = matches!(i.op, Op::FcvtDS | Op::FcvtDW | Op::FcvtDWu) && i.rm == 0;
    if i.op.has_rm() && i.rm != RM_DYN && !exact {
        s.push(',');
        s.push_str(ROUNDING_MODES[(i.rm & 7) as usize]);
    }
    s
}

fn mnemonic(i: &Instruction) -> String {
    let mut m = i.op.mnemonic().to_string();
    if i.op.is_atomic() {
        match (i.aq, i.rl) {
            (true, true) => m.push_str(".aqrl"),
            (true, false) => m.push_str(".aq"),
            (false, true) => m.push_str(".rl"),
            (false, false) => {}
        }
    }
    m
}

/// Format an instruction located at `pc` as assembly text.
pub fn format(i: &Instruction, pc: Address, xlen: Xlen) -> String {
    let target = i.target(pc, xlen).unwrap_or_default();
    if let Some(s) = pseudo(i, target) {
        return s;
    }
    let m = mnemonic(i);
    match i.op.syntax() {
        Syntax::R => format!("{} {},{},{}", m, x(i.rd), x(i.rs1), x(i.rs2)),
        Syntax::I => format!("{} {},{},{}", m, x(i.rd), x(i.rs1), i.imm),
        Syntax::Shift => format!("{} {},{},{:#x}", m, x(i.rd), x(i.rs1), i.imm),
        Syntax::Load | Syntax::Jalr => format!("{} {},{}({})", m, x(i.rd), i.imm, x(i.rs1)),
        Syntax::Store => format!("{} {},{}({})", m, x(i.rs2), i.imm, x(i.rs1)),
        Syntax::Branch => format!("{} {},{},{:x}", m, x(i.rs1), x(i.rs2), target),
        Syntax::Jal => format!("{} {},{:x}", m, x(i.rd), target),
        Syntax::U => format!("{} {},{:#x}", m, x(i.rd), (i.imm >> 12) & 0xfffff),
        Syntax::System => m,
        Syntax::Fence => format!("{} {},{}", m, fence_set(i.imm >> 4), fence_set(i.imm)),
        Syntax::Csr => format!("{} {},{},{}", m, x(i.rd), csr(i), x(i.rs1)),
        Syntax::CsrI => format!("{} {},{},{}", m, x(i.rd), csr(i), i.rs1),
        Syntax::Amo => format!("{} {},{},({})", m, x(i.rd), x(i.rs2), x(i.rs1)),
        Syntax::Lr => format!("{} {},({})", m, x(i.rd), x(i.rs1)),
        Syntax::FLoad => format!("{} {},{}({})", m, f(i.rd), i.imm, x(i.rs1)),
        Syntax::FStore => format!("{} {},{}({})", m, f(i.rs2), i.imm, x(i.rs1)),
        Syntax::FR => with_rm(format!("{} {},{},{}", m, f(i.rd), f(i.rs1), f(i.rs2)), i),
        Syntax::FR4 => with_rm(
            format!("{} {},{},{},{}", m, f(i.rd), f(i.rs1), f(i.rs2), f(i.rs3)),
            i,
        ),
        Syntax::FUnary => with_rm(format!("{} {},{}", m, f(i.rd), f(i.rs1)), i),
        Syntax::FToInt => with_rm(format!("{} {},{}", m, x(i.rd), f(i.rs1)), i),
        Syntax::IntToF => with_rm(format!("{} {},{}", m, f(i.rd), x(i.rs1)), i),
        Syntax::FCmp => format!("{} {},{},{}", m, x(i.rd), f(i.rs1), f(i.rs2)),
    }
}

/// Pseudo-instruction rendering, where one applies.
fn pseudo(i: &Instruction, target: Address) -> Option<String> {
    use Op::*;
    let (rd, rs1, rs2, imm) = (i.rd, i.rs1, i.rs2, i.imm);
    let s = match i.op {
        Addi if rd == 0 && rs1 == 0 && imm == 0 => "nop".to_string(),
        Addi if rs1 == 0 => format!("li {},{}", x(rd), imm),
        Addi if imm == 0 => format!("mv {},{}", x(rd), x(rs1)),
        Addiw if imm == 0 => format!("sext.w {},{}", x(rd), x(rs1)),
        Xori if imm == -1 => format!("not {},{}", x(rd), x(rs1)),
        Sltiu if imm == 1 => format!("seqz {},{}", x(rd), x(rs1)),
        Add if i.is_compressed() && rs1 == 0 => format!("mv {},{}", x(rd), x(rs2)),
        Sub if rs1 == 0 => format!("neg {},{}", x(rd), x(rs2)),
        Subw if rs1 == 0 => format!("negw {},{}", x(rd), x(rs2)),
        Sltu if rs1 == 0 => format!("snez {},{}", x(rd), x(rs2)),
        Slt if rs2 == 0 => format!("sltz {},{}", x(rd), x(rs1)),
        Slt if rs1 == 0 => format!("sgtz {},{}", x(rd), x(rs2)),

        Jal if rd == 0 => format!("j {:x}", target),
        Jal if rd == 1 => format!("jal {:x}", target),
        Jalr if rd == 0 && rs1 == 1 && imm == 0 => "ret".to_string(),
        Jalr if rd == 0 && imm == 0 => format!("jr {}", x(rs1)),
        Jalr if rd == 0 => format!("jr {}({})", imm, x(rs1)),
        Jalr if rd == 1 && imm == 0 => format!("jalr {}", x(rs1)),
        Jalr if rd == 1 => format!("jalr {}({})", imm, x(rs1)),
        Beq if rs2 == 0 => format!("beqz {},{:x}", x(rs1), target),
        Bne if rs2 == 0 => format!("bnez {},{:x}", x(rs1), target),
        Bge if rs1 == 0 => format!("blez {},{:x}", x(rs2), target),
        Bge if rs2 == 0 => format!("bgez {},{:x}", x(rs1), target),
        Blt if rs2 == 0 => format!("bltz {},{:x}", x(rs1), target),
        Blt if rs1 == 0 => format!("bgtz {},{:x}", x(rs2), target),

        Fence if imm == 0xff => "fence".to_string(),

        FsgnjS if rs1 == rs2 => format!("fmv.s {},{}", f(rd), f(rs1)),
        FsgnjnS if rs1 == rs2 => format!("fneg.s {},{}", f(rd), f(rs1)),
        FsgnjxS if rs1 == rs2 => format!("fabs.s {},{}", f(rd), f(rs1)),
        FsgnjD if rs1 == rs2 => format!("fmv.d {},{}", f(rd), f(rs1)),
        FsgnjnD if rs1 == rs2 => format!("fneg.d {},{}", f(rd), f(rs1)),
        FsgnjxD if rs1 == rs2 => format!("fabs.d {},{}", f(rd), f(rs1)),

        Csrrs if rs1 == 0 => match i.csr() {
            0x001 => format!("frflags {}", x(rd)),
            0x002 => format!("frrm {}", x(rd)),
            0x003 => format!("frcsr {}", x(rd)),
            0xc00 => format!("rdcycle {}", x(rd)),
            0xc01 => format!("rdtime {}", x(rd)),
            0xc02 => format!("rdinstret {}", x(rd)),
            0xc80 => format!("rdcycleh {}", x(rd)),
            0xc81 => format!("rdtimeh {}", x(rd)),
            0xc82 => format!("rdinstreth {}", x(rd)),
            _ => format!("csrr {},{}", x(rd), csr(i)),
        },
        Csrrs if rd == 0 => format!("csrs {},{}", csr(i), x(rs1)),
        Csrrc if rd == 0 => format!("csrc {},{}", csr(i), x(rs1)),
        Csrrw => {
            let name = match i.csr() {
                0x001 => "fsflags",
                0x002 => "fsrm",
                0x003 => "fscsr",
                _ if rd == 0 => return Some(format!("csrw {},{}", csr(i), x(rs1))),
                _ => return None,
            };
            if rd == 0 {
                format!("{} {}", name, x(rs1))
            } else {
                format!("{} {},{}", name, x(rd), x(rs1))
            }
        }
        Csrrwi => {
            let name = match i.csr() {
                0x001 => "fsflagsi",
                0x002 => "fsrmi",
                _ if rd == 0 => return Some(format!("csrwi {},{}", csr(i), rs1)),
                _ => return None,
            };
            if rd == 0 {
                format!("{} {}", name, rs1)
            } else {
                format!("{} {},{}", name, x(rd), rs1)
            }
        }
        Csrrsi if rd == 0 => format!("csrsi {},{}", csr(i), rs1),
        Csrrci if rd == 0 => format!("csrci {},{}", csr(i), rs1),
        _ => return None,
    };
    Some(s)
}

/// Comment for an instruction: the symbol at its branch or jump target.
pub fn comment(i: &Instruction, pc: Address, xlen: Xlen, symbols: &SymbolTable) -> String {
    i.target(pc, xlen)
        .and_then(|t| symbols.describe(t))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ins(op: Op, rd: u8, rs1: u8, rs2: u8, imm: i64) -> Instruction {
        Instruction {
            rd,
            rs1,
            rs2,
            imm,
            ..Instruction::new(op, 4)
        }
    }

    fn fmt(i: &Instruction) -> String {
        format(i, 0x1000, Xlen::Rv32)
    }

    #[test]
    fn test_integer_pseudos() {
        assert_eq!(fmt(&ins(Op::Addi, 0, 0, 0, 0)), "nop");
        assert_eq!(fmt(&ins(Op::Addi, 15, 0, 0, -1)), "li a5,-1");
        assert_eq!(fmt(&ins(Op::Addi, 10, 15, 0, 0)), "mv a0,a5");
        assert_eq!(fmt(&ins(Op::Addi, 2, 2, 0, -16)), "addi sp,sp,-16");
        assert_eq!(fmt(&ins(Op::Xori, 10, 10, 0, -1)), "not a0,a0");
        assert_eq!(fmt(&ins(Op::Sltiu, 10, 10, 0, 1)), "seqz a0,a0");
        assert_eq!(fmt(&ins(Op::Sltu, 10, 0, 11, 0)), "snez a0,a1");
        assert_eq!(fmt(&ins(Op::Sub, 10, 0, 11, 0)), "neg a0,a1");
        assert_eq!(fmt(&ins(Op::Addiw, 10, 10, 0, 0)), "sext.w a0,a0");
        // a full-width add from zero is not an alias
        assert_eq!(fmt(&ins(Op::Add, 10, 0, 11, 0)), "add a0,zero,a1");
    }

    #[test]
    fn test_compressed_mv() {
        let mut i = ins(Op::Add, 10, 0, 15, 0);
        i.len = 2;
        assert_eq!(fmt(&i), "mv a0,a5");
    }

    #[test]
    fn test_jumps() {
        assert_eq!(fmt(&ins(Op::Jal, 0, 0, 0, -8)), "j ff8");
        assert_eq!(fmt(&ins(Op::Jal, 1, 0, 0, 0x20)), "jal 1020");
        assert_eq!(fmt(&ins(Op::Jal, 5, 0, 0, 0x20)), "jal t0,1020");
        assert_eq!(fmt(&ins(Op::Jalr, 0, 1, 0, 0)), "ret");
        assert_eq!(fmt(&ins(Op::Jalr, 0, 15, 0, 0)), "jr a5");
        assert_eq!(fmt(&ins(Op::Jalr, 1, 15, 0, 0)), "jalr a5");
        assert_eq!(fmt(&ins(Op::Jalr, 1, 15, 0, 8)), "jalr 8(a5)");
        assert_eq!(fmt(&ins(Op::Jalr, 5, 6, 0, 4)), "jalr t0,4(t1)");
    }

    #[test]
    fn test_branches() {
        assert_eq!(fmt(&ins(Op::Beq, 0, 15, 0, 16)), "beqz a5,1010");
        assert_eq!(fmt(&ins(Op::Bne, 0, 15, 14, -4)), "bne a5,a4,ffc");
        assert_eq!(fmt(&ins(Op::Bge, 0, 0, 10, 8)), "blez a0,1008");
        assert_eq!(fmt(&ins(Op::Blt, 0, 10, 0, 8)), "bltz a0,1008");
        assert_eq!(fmt(&ins(Op::Bltu, 0, 10, 11, 8)), "bltu a0,a1,1008");
    }

    #[test]
    fn test_memory_and_upper() {
        assert_eq!(fmt(&ins(Op::Lw, 15, 8, 0, -20)), "lw a5,-20(s0)");
        assert_eq!(fmt(&ins(Op::Sd, 0, 2, 1, 8)), "sd ra,8(sp)");
        assert_eq!(fmt(&ins(Op::Lui, 10, 0, 0, 0x12345000)), "lui a0,0x12345");
        assert_eq!(fmt(&ins(Op::Lui, 15, 0, 0, -4096)), "lui a5,0xfffff");
        assert_eq!(fmt(&ins(Op::Slli, 15, 15, 0, 2)), "slli a5,a5,0x2");
        assert_eq!(fmt(&ins(Op::Ecall, 0, 0, 0, 0)), "ecall");
    }

    #[test]
    fn test_csr_forms() {
        assert_eq!(fmt(&ins(Op::Csrrs, 10, 0, 0, 0xc00)), "rdcycle a0");
        assert_eq!(fmt(&ins(Op::Csrrs, 10, 0, 0, 0x300)), "csrr a0,mstatus");
        assert_eq!(fmt(&ins(Op::Csrrw, 0, 11, 0, 0x305)), "csrw mtvec,a1");
        assert_eq!(fmt(&ins(Op::Csrrw, 0, 11, 0, 0x003)), "fscsr a1");
        assert_eq!(fmt(&ins(Op::Csrrw, 10, 11, 0, 0x002)), "fsrm a0,a1");
        assert_eq!(fmt(&ins(Op::Csrrw, 10, 11, 0, 0x7c0)), "csrrw a0,0x7c0,a1");
        assert_eq!(fmt(&ins(Op::Csrrsi, 0, 8, 0, 0x300)), "csrsi mstatus,8");
    }

    #[test]
    fn test_fence() {
        assert_eq!(fmt(&ins(Op::Fence, 0, 0, 0, 0xff)), "fence");
        assert_eq!(fmt(&ins(Op::Fence, 0, 0, 0, 0x33)), "fence rw,rw");
        assert_eq!(fmt(&ins(Op::FenceI, 0, 0, 0, 0)), "fence.i");
    }

    #[test]
    fn test_atomics() {
        let mut i = ins(Op::AmoaddW, 10, 12, 11, 0);
        assert_eq!(fmt(&i), "amoadd.w a0,a1,(a2)");
        i.aq = true;
        i.rl = true;
        assert_eq!(fmt(&i), "amoadd.w.aqrl a0,a1,(a2)");
        let mut lr = ins(Op::LrW, 10, 12, 0, 0);
        lr.aq = true;
        assert_eq!(fmt(&lr), "lr.w.aq a0,(a2)");
    }

    #[test]
    fn test_float_forms() {
        let mut add = ins(Op::FaddS, 10, 11, 12, 0);
        add.rm = RM_DYN;
        assert_eq!(fmt(&add), "fadd.s fa0,fa1,fa2");
        add.rm = 0;
        assert_eq!(fmt(&add), "fadd.s fa0,fa1,fa2,rne");

        let mut cvt = ins(Op::FcvtWS, 10, 10, 0, 0);
        cvt.rm = 1;
        assert_eq!(fmt(&cvt), "fcvt.w.s a0,fa0,rtz");

        assert_eq!(fmt(&ins(Op::FsgnjnD, 10, 11, 11, 0)), "fneg.d fa0,fa1");
        assert_eq!(fmt(&ins(Op::FmvXW, 10, 10, 0, 0)), "fmv.x.w a0,fa0");
        assert_eq!(fmt(&ins(Op::FeqS, 10, 0, 1, 0)), "feq.s a0,ft0,ft1");
        assert_eq!(fmt(&ins(Op::Fld, 15, 8, 0, -24)), "fld fa5,-24(s0)");
        assert_eq!(fmt(&ins(Op::Fsw, 0, 2, 8, 12)), "fsw fs0,12(sp)");
    }

    #[test]
    fn test_comment() {
        let mut st = SymbolTable::new();
        st.insert(0x1000, "main");
        let b = ins(Op::Beq, 0, 10, 0, 8);
        assert_eq!(comment(&b, 0x1000, Xlen::Rv32, &st), "main+0x8");
        let a = ins(Op::Addi, 10, 10, 0, 8);
        assert_eq!(comment(&a, 0x1000, Xlen::Rv32, &st), "");
    }
}
