//! # Operation identifiers
//!
//! An [`Op`] names the semantic operation an instruction performs. Compressed
//! encodings decode to the [`Op`] of their 32-bit expansion, so execution and
//! formatting only ever see this one set.
//!
//! Each operation also carries its assembler [`Syntax`], which decides how
//! the operands are rendered.

use serde::{Deserialize, Serialize};

/// Operand layout of an operation in assembler text.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Syntax {
    /// `rd,rs1,rs2`
    R,
    /// `rd,rs1,imm`
    I,
    /// `rd,rs1,shamt` with a hex shift amount
    Shift,
    /// `rd,imm(rs1)`
    Load,
    /// `rs2,imm(rs1)`
    Store,
    /// `rs1,rs2,target`
    Branch,
    /// `rd,target`
    Jal,
    /// `rd,imm(rs1)`
    Jalr,
    /// `rd,imm[31:12]` in hex
    U,
    /// No operands
    System,
    /// `pred,succ`
    Fence,
    /// `rd,csr,rs1`
    Csr,
    /// `rd,csr,uimm`
    CsrI,
    /// `rd,rs2,(rs1)`
    Amo,
    /// `rd,(rs1)`
    Lr,
    /// `frd,imm(rs1)`
    FLoad,
    /// `frs2,imm(rs1)`
    FStore,
    /// `frd,frs1,frs2`
    FR,
    /// `frd,frs1,frs2,frs3`
    FR4,
    /// `frd,frs1`
    FUnary,
    /// `rd,frs1`
    FToInt,
    /// `frd,rs1`
    IntToF,
    /// `rd,frs1,frs2`
    FCmp,
}

macro_rules! define_ops {
    ($( $(#[$doc:meta])* $variant:ident => $mnemonic:literal, $syntax:ident; )*) => {
        /// Semantic operation of a decoded instruction.
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum Op {
            $( $(#[$doc])* $variant, )*
        }

        impl Op {
            /// Every operation, in declaration order.
            pub const ALL: &'static [Op] = &[ $( Op::$variant, )* ];

            /// Assembler mnemonic of the 32-bit form.
            pub const fn mnemonic(self) -> &'static str {
                match self {
                    $( Op::$variant => $mnemonic, )*
                }
            }

            /// Operand syntax.
            pub const fn syntax(self) -> Syntax {
                match self {
                    $( Op::$variant => Syntax::$syntax, )*
                }
            }
        }
    };
}

define_ops! {
    // ========== RV32I ==========
    Lui => "lui", U;
    Auipc => "auipc", U;
    Jal => "jal", Jal;
    Jalr => "jalr", Jalr;
    Beq => "beq", Branch;
    Bne => "bne", Branch;
    Blt => "blt", Branch;
    Bge => "bge", Branch;
    Bltu => "bltu", Branch;
    Bgeu => "bgeu", Branch;
    Lb => "lb", Load;
    Lh => "lh", Load;
    Lw => "lw", Load;
    Lbu => "lbu", Load;
    Lhu => "lhu", Load;
    Sb => "sb", Store;
    Sh => "sh", Store;
    Sw => "sw", Store;
    Addi => "addi", I;
    Slti => "slti", I;
    Sltiu => "sltiu", I;
    Xori => "xori", I;
    Ori => "ori", I;
    Andi => "andi", I;
    Slli => "slli", Shift;
    Srli => "srli", Shift;
    Srai => "srai", Shift;
    Add => "add", R;
    Sub => "sub", R;
    Sll => "sll", R;
    Slt => "slt", R;
    Sltu => "sltu", R;
    Xor => "xor", R;
    Srl => "srl", R;
    Sra => "sra", R;
    Or => "or", R;
    And => "and", R;
    Fence => "fence", Fence;
    FenceI => "fence.i", System;
    Ecall => "ecall", System;
    Ebreak => "ebreak", System;
    Csrrw => "csrrw", Csr;
    Csrrs => "csrrs", Csr;
    Csrrc => "csrrc", Csr;
    Csrrwi => "csrrwi", CsrI;
    Csrrsi => "csrrsi", CsrI;
    Csrrci => "csrrci", CsrI;

    // ========== RV64I ==========
    Lwu => "lwu", Load;
    Ld => "ld", Load;
    Sd => "sd", Store;
    Addiw => "addiw", I;
    Slliw => "slliw", Shift;
    Srliw => "srliw", Shift;
    Sraiw => "sraiw", Shift;
    Addw => "addw", R;
    Subw => "subw", R;
    Sllw => "sllw", R;
    Srlw => "srlw", R;
    Sraw => "sraw", R;

    // ========== M ==========
    Mul => "mul", R;
    Mulh => "mulh", R;
    Mulhsu => "mulhsu", R;
    Mulhu => "mulhu", R;
    Div => "div", R;
    Divu => "divu", R;
    Rem => "rem", R;
    Remu => "remu", R;
    Mulw => "mulw", R;
    Divw => "divw", R;
    Divuw => "divuw", R;
    Remw => "remw", R;
    Remuw => "remuw", R;

    // ========== A ==========
    LrW => "lr.w", Lr;
    ScW => "sc.w", Amo;
    AmoswapW => "amoswap.w", Amo;
    AmoaddW => "amoadd.w", Amo;
    AmoxorW => "amoxor.w", Amo;
    AmoandW => "amoand.w", Amo;
    AmoorW => "amoor.w", Amo;
    AmominW => "amomin.w", Amo;
    AmomaxW => "amomax.w", Amo;
    AmominuW => "amominu.w", Amo;
    AmomaxuW => "amomaxu.w", Amo;
    LrD => "lr.d", Lr;
    ScD => "sc.d", Amo;
    AmoswapD => "amoswap.d", Amo;
    AmoaddD => "amoadd.d", Amo;
    AmoxorD => "amoxor.d", Amo;
    AmoandD => "amoand.d", Amo;
    AmoorD => "amoor.d", Amo;
    AmominD => "amomin.d", Amo;
    AmomaxD => "amomax.d", Amo;
    AmominuD => "amominu.d", Amo;
    AmomaxuD => "amomaxu.d", Amo;

    // ========== F ==========
    Flw => "flw", FLoad;
    Fsw => "fsw", FStore;
    FmaddS => "fmadd.s", FR4;
    FmsubS => "fmsub.s", FR4;
    FnmsubS => "fnmsub.s", FR4;
    FnmaddS => "fnmadd.s", FR4;
    FaddS => "fadd.s", FR;
    FsubS => "fsub.s", FR;
    FmulS => "fmul.s", FR;
    FdivS => "fdiv.s", FR;
    FsqrtS => "fsqrt.s", FUnary;
    FsgnjS => "fsgnj.s", FR;
    FsgnjnS => "fsgnjn.s", FR;
    FsgnjxS => "fsgnjx.s", FR;
    FminS => "fmin.s", FR;
    FmaxS => "fmax.s", FR;
    FcvtWS => "fcvt.w.s", FToInt;
    FcvtWuS => "fcvt.wu.s", FToInt;
    FmvXW => "fmv.x.w", FToInt;
    FeqS => "feq.s", FCmp;
    FltS => "flt.s", FCmp;
    FleS => "fle.s", FCmp;
    FclassS => "fclass.s", FToInt;
    FcvtSW => "fcvt.s.w", IntToF;
    FcvtSWu => "fcvt.s.wu", IntToF;
    FmvWX => "fmv.w.x", IntToF;
    FcvtLS => "fcvt.l.s", FToInt;
    FcvtLuS => "fcvt.lu.s", FToInt;
    FcvtSL => "fcvt.s.l", IntToF;
    FcvtSLu => "fcvt.s.lu", IntToF;

    // ========== D ==========
    Fld => "fld", FLoad;
    Fsd => "fsd", FStore;
    FmaddD => "fmadd.d", FR4;
    FmsubD => "fmsub.d", FR4;
    FnmsubD => "fnmsub.d", FR4;
    FnmaddD => "fnmadd.d", FR4;
    FaddD => "fadd.d", FR;
    FsubD => "fsub.d", FR;
    FmulD => "fmul.d", FR;
    FdivD => "fdiv.d", FR;
    FsqrtD => "fsqrt.d", FUnary;
    FsgnjD => "fsgnj.d", FR;
    FsgnjnD => "fsgnjn.d", FR;
    FsgnjxD => "fsgnjx.d", FR;
    FminD => "fmin.d", FR;
    FmaxD => "fmax.d", FR;
    FcvtSD => "fcvt.s.d", FUnary;
    FcvtDS => "fcvt.d.s", FUnary;
    FeqD => "feq.d", FCmp;
    FltD => "flt.d", FCmp;
    FleD => "fle.d", FCmp;
    FclassD => "fclass.d", FToInt;
    FcvtWD => "fcvt.w.d", FToInt;
    FcvtWuD => "fcvt.wu.d", FToInt;
    FcvtDW => "fcvt.d.w", IntToF;
    FcvtDWu => "fcvt.d.wu", IntToF;
    FcvtLD => "fcvt.l.d", FToInt;
    FcvtLuD => "fcvt.lu.d", FToInt;
    FmvXD => "fmv.x.d", FToInt;
    FcvtDL => "fcvt.d.l", IntToF;
    FcvtDLu => "fcvt.d.lu", IntToF;
    FmvDX => "fmv.d.x", IntToF;
}

impl Op {
    /// True if the funct3 field of this operation is a rounding mode.
    pub const fn has_rm(self) -> bool {
        use Op::*;
        matches!(
            self,
            FmaddS | FmsubS | FnmsubS | FnmaddS
                | FaddS | FsubS | FmulS | FdivS | FsqrtS
                | FcvtWS | FcvtWuS | FcvtSW | FcvtSWu
                | FcvtLS | FcvtLuS | FcvtSL | FcvtSLu
                | FmaddD | FmsubD | FnmsubD | FnmaddD
                | FaddD | FsubD | FmulD | FdivD | FsqrtD
                | FcvtSD | FcvtDS
                | FcvtWD | FcvtWuD | FcvtDW | FcvtDWu
                | FcvtLD | FcvtLuD | FcvtDL | FcvtDLu
        )
    }

    /// True if the operation is an atomic memory operation (incl. LR/SC).
    pub const fn is_atomic(self) -> bool {
        matches!(self.syntax(), Syntax::Amo | Syntax::Lr)
    }

    /// True for conditional branches and jumps.
    pub const fn is_control_flow(self) -> bool {
        matches!(self.syntax(), Syntax::Branch | Syntax::Jal | Syntax::Jalr)
    }
}

impl std::fmt::Display for Op {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.mnemonic())
    }
}
