//! # Instruction tables
//!
//! Standard RISC-V extension sets as mask/match tables. A word matches an
//! entry iff `ins & mask == val`.
//!
//! `RV64I` is a complete base (it replaces `RV32I`, since the shift
//! encodings widen to a 6-bit shift amount) and `RV64C` is a complete
//! compressed set (it replaces `RV32C`, since `c.jal`/`c.flw` become
//! `c.addiw`/`c.ld`). The other RV64 sets are add-ons to their RV32
//! counterparts.

use crate::format::Format;
use crate::op::Op;
use std::borrow::Cow;

/// One mask/match pattern.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Entry {
    pub mnemonic: Cow<'static, str>,
    pub mask: u32,
    pub val: u32,
    pub op: Op,
    pub format: Format,
}

impl Entry {
    pub const fn new(mnemonic: &'static str, mask: u32, val: u32, op: Op, format: Format) -> Self {
        Self {
            mnemonic: Cow::Borrowed(mnemonic),
            mask,
            val,
            op,
            format,
        }
    }

    /// An entry with a mnemonic chosen at runtime.
    pub fn named(mnemonic: impl Into<String>, mask: u32, val: u32, op: Op, format: Format) -> Self {
        Self {
            mnemonic: Cow::Owned(mnemonic.into()),
            mask,
            val,
            op,
            format,
        }
    }

    /// Encoded length in bytes: 4 when the low two bits of the pattern are
    /// `11`, else 2.
    #[inline]
    pub const fn width(&self) -> usize {
        if self.val & 3 == 3 {
            4
        } else {
            2
        }
    }

    #[inline]
    pub const fn matches(&self, ins: u32) -> bool {
        ins & self.mask == self.val
    }

    /// True if some word matches both entries.
    pub const fn conflicts_with(&self, other: &Entry) -> bool {
        let common = self.mask & other.mask;
        self.val & common == other.val & common
    }
}

#[derive(Debug, Clone)]
enum Parts {
    Static(&'static [&'static [Entry]]),
    Owned(Vec<Entry>),
}

/// A named extension set. The standard sets are static slices; custom sets
/// own their entries.
#[derive(Debug, Clone)]
pub struct ExtensionSet {
    pub name: Cow<'static, str>,
    parts: Parts,
}

impl ExtensionSet {
    pub const fn new(name: &'static str, parts: &'static [&'static [Entry]]) -> Self {
        Self {
            name: Cow::Borrowed(name),
            parts: Parts::Static(parts),
        }
    }

    /// A set built at runtime, e.g. a vendor extension.
    pub fn from_entries(name: impl Into<String>, entries: Vec<Entry>) -> Self {
        Self {
            name: Cow::Owned(name.into()),
            parts: Parts::Owned(entries),
        }
    }

    /// Entries in table order.
    pub fn entries(&self) -> impl Iterator<Item = &Entry> + '_ {
        let parts: &[&[Entry]] = match &self.parts {
            Parts::Static(parts) => parts,
            Parts::Owned(_) => &[],
        };
        let owned: &[Entry] = match &self.parts {
            Parts::Owned(entries) => entries,
            Parts::Static(_) => &[],
        };
        parts.iter().flat_map(|part| part.iter()).chain(owned)
    }

    pub fn len(&self) -> usize {
        match &self.parts {
            Parts::Static(parts) => parts.iter().map(|p| p.len()).sum(),
            Parts::Owned(entries) => entries.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

use Format as F;

const MASK_R: u32 = 0xfe00_707f;
const MASK_I: u32 = 0x0000_707f;
const MASK_U: u32 = 0x0000_007f;
const MASK_SHIFT64: u32 = 0xfc00_707f;
const MASK_AMO: u32 = 0xf800_707f;
const MASK_LR: u32 = 0xf9f0_707f;
const MASK_FR: u32 = 0xfe00_007f;
const MASK_FR4: u32 = 0x0600_007f;
const MASK_FUNARY: u32 = 0xfff0_007f;
const MASK_FMV: u32 = 0xfff0_707f;

const MASK_C: u32 = 0xe003;
const MASK_C_ALU_IMM: u32 = 0xec03;
const MASK_C_ALU: u32 = 0xfc63;
const MASK_C_CR: u32 = 0xf003;

// ============================================================================
// Base integer
// ============================================================================

const BASE_COMMON: &[Entry] = &[
    Entry::new("lui", MASK_U, 0x0000_0037, Op::Lui, F::U),
    Entry::new("auipc", MASK_U, 0x0000_0017, Op::Auipc, F::U),
    Entry::new("jal", MASK_U, 0x0000_006f, Op::Jal, F::J),
    Entry::new("jalr", MASK_I, 0x0000_0067, Op::Jalr, F::I),
    Entry::new("beq", MASK_I, 0x0000_0063, Op::Beq, F::B),
    Entry::new("bne", MASK_I, 0x0000_1063, Op::Bne, F::B),
    Entry::new("blt", MASK_I, 0x0000_4063, Op::Blt, F::B),
    Entry::new("bge", MASK_I, 0x0000_5063, Op::Bge, F::B),
    Entry::new("bltu", MASK_I, 0x0000_6063, Op::Bltu, F::B),
    Entry::new("bgeu", MASK_I, 0x0000_7063, Op::Bgeu, F::B),
    Entry::new("lb", MASK_I, 0x0000_0003, Op::Lb, F::I),
    Entry::new("lh", MASK_I, 0x0000_1003, Op::Lh, F::I),
    Entry::new("lw", MASK_I, 0x0000_2003, Op::Lw, F::I),
    Entry::new("lbu", MASK_I, 0x0000_4003, Op::Lbu, F::I),
    Entry::new("lhu", MASK_I, 0x0000_5003, Op::Lhu, F::I),
    Entry::new("sb", MASK_I, 0x0000_0023, Op::Sb, F::S),
    Entry::new("sh", MASK_I, 0x0000_1023, Op::Sh, F::S),
    Entry::new("sw", MASK_I, 0x0000_2023, Op::Sw, F::S),
    Entry::new("addi", MASK_I, 0x0000_0013, Op::Addi, F::I),
    Entry::new("slti", MASK_I, 0x0000_2013, Op::Slti, F::I),
    Entry::new("sltiu", MASK_I, 0x0000_3013, Op::Sltiu, F::I),
    Entry::new("xori", MASK_I, 0x0000_4013, Op::Xori, F::I),
    Entry::new("ori", MASK_I, 0x0000_6013, Op::Ori, F::I),
    Entry::new("andi", MASK_I, 0x0000_7013, Op::Andi, F::I),
    Entry::new("add", MASK_R, 0x0000_0033, Op::Add, F::R),
    Entry::new("sub", MASK_R, 0x4000_0033, Op::Sub, F::R),
    Entry::new("sll", MASK_R, 0x0000_1033, Op::Sll, F::R),
    Entry::new("slt", MASK_R, 0x0000_2033, Op::Slt, F::R),
    Entry::new("sltu", MASK_R, 0x0000_3033, Op::Sltu, F::R),
    Entry::new("xor", MASK_R, 0x0000_4033, Op::Xor, F::R),
    Entry::new("srl", MASK_R, 0x0000_5033, Op::Srl, F::R),
    Entry::new("sra", MASK_R, 0x4000_5033, Op::Sra, F::R),
    Entry::new("or", MASK_R, 0x0000_6033, Op::Or, F::R),
    Entry::new("and", MASK_R, 0x0000_7033, Op::And, F::R),
    Entry::new("fence", MASK_I, 0x0000_000f, Op::Fence, F::Fence),
    Entry::new("fence.i", MASK_I, 0x0000_100f, Op::FenceI, F::None),
    Entry::new("ecall", 0xffff_ffff, 0x0000_0073, Op::Ecall, F::None),
    Entry::new("ebreak", 0xffff_ffff, 0x0010_0073, Op::Ebreak, F::None),
    Entry::new("csrrw", MASK_I, 0x0000_1073, Op::Csrrw, F::Csr),
    Entry::new("csrrs", MASK_I, 0x0000_2073, Op::Csrrs, F::Csr),
    Entry::new("csrrc", MASK_I, 0x0000_3073, Op::Csrrc, F::Csr),
    Entry::new("csrrwi", MASK_I, 0x0000_5073, Op::Csrrwi, F::CsrI),
    Entry::new("csrrsi", MASK_I, 0x0000_6073, Op::Csrrsi, F::CsrI),
    Entry::new("csrrci", MASK_I, 0x0000_7073, Op::Csrrci, F::CsrI),
];

const RV32I_SHIFTS: &[Entry] = &[
    Entry::new("slli", MASK_R, 0x0000_1013, Op::Slli, F::Shift),
    Entry::new("srli", MASK_R, 0x0000_5013, Op::Srli, F::Shift),
    Entry::new("srai", MASK_R, 0x4000_5013, Op::Srai, F::Shift),
];

const RV64I_SHIFTS: &[Entry] = &[
    Entry::new("slli", MASK_SHIFT64, 0x0000_1013, Op::Slli, F::Shift),
    Entry::new("srli", MASK_SHIFT64, 0x0000_5013, Op::Srli, F::Shift),
    Entry::new("srai", MASK_SHIFT64, 0x4000_5013, Op::Srai, F::Shift),
];

const RV64I_ONLY: &[Entry] = &[
    Entry::new("lwu", MASK_I, 0x0000_6003, Op::Lwu, F::I),
    Entry::new("ld", MASK_I, 0x0000_3003, Op::Ld, F::I),
    Entry::new("sd", MASK_I, 0x0000_3023, Op::Sd, F::S),
    Entry::new("addiw", MASK_I, 0x0000_001b, Op::Addiw, F::I),
    Entry::new("slliw", MASK_R, 0x0000_101b, Op::Slliw, F::Shift),
    Entry::new("srliw", MASK_R, 0x0000_501b, Op::Srliw, F::Shift),
    Entry::new("sraiw", MASK_R, 0x4000_501b, Op::Sraiw, F::Shift),
    Entry::new("addw", MASK_R, 0x0000_003b, Op::Addw, F::R),
    Entry::new("subw", MASK_R, 0x4000_003b, Op::Subw, F::R),
    Entry::new("sllw", MASK_R, 0x0000_103b, Op::Sllw, F::R),
    Entry::new("srlw", MASK_R, 0x0000_503b, Op::Srlw, F::R),
    Entry::new("sraw", MASK_R, 0x4000_503b, Op::Sraw, F::R),
];

pub static RV32I: ExtensionSet = ExtensionSet::new("rv32i", &[BASE_COMMON, RV32I_SHIFTS]);
pub static RV64I: ExtensionSet = ExtensionSet::new("rv64i", &[BASE_COMMON, RV64I_SHIFTS, RV64I_ONLY]);

// ============================================================================
// M
// ============================================================================

const RV32M_ENTRIES: &[Entry] = &[
    Entry::new("mul", MASK_R, 0x0200_0033, Op::Mul, F::R),
    Entry::new("mulh", MASK_R, 0x0200_1033, Op::Mulh, F::R),
    Entry::new("mulhsu", MASK_R, 0x0200_2033, Op::Mulhsu, F::R),
    Entry::new("mulhu", MASK_R, 0x0200_3033, Op::Mulhu, F::R),
    Entry::new("div", MASK_R, 0x0200_4033, Op::Div, F::R),
    Entry::new("divu", MASK_R, 0x0200_5033, Op::Divu, F::R),
    Entry::new("rem", MASK_R, 0x0200_6033, Op::Rem, F::R),
    Entry::new("remu", MASK_R, 0x0200_7033, Op::Remu, F::R),
];

const RV64M_ENTRIES: &[Entry] = &[
    Entry::new("mulw", MASK_R, 0x0200_003b, Op::Mulw, F::R),
    Entry::new("divw", MASK_R, 0x0200_403b, Op::Divw, F::R),
    Entry::new("divuw", MASK_R, 0x0200_503b, Op::Divuw, F::R),
    Entry::new("remw", MASK_R, 0x0200_603b, Op::Remw, F::R),
    Entry::new("remuw", MASK_R, 0x0200_703b, Op::Remuw, F::R),
];

pub static RV32M: ExtensionSet = ExtensionSet::new("rv32m", &[RV32M_ENTRIES]);
pub static RV64M: ExtensionSet = ExtensionSet::new("rv64m", &[RV64M_ENTRIES]);

// ============================================================================
// A
// ============================================================================

const RV32A_ENTRIES: &[Entry] = &[
    Entry::new("lr.w", MASK_LR, 0x1000_202f, Op::LrW, F::R),
    Entry::new("sc.w", MASK_AMO, 0x1800_202f, Op::ScW, F::R),
    Entry::new("amoswap.w", MASK_AMO, 0x0800_202f, Op::AmoswapW, F::R),
    Entry::new("amoadd.w", MASK_AMO, 0x0000_202f, Op::AmoaddW, F::R),
    Entry::new("amoxor.w", MASK_AMO, 0x2000_202f, Op::AmoxorW, F::R),
    Entry::new("amoand.w", MASK_AMO, 0x6000_202f, Op::AmoandW, F::R),
    Entry::new("amoor.w", MASK_AMO, 0x4000_202f, Op::AmoorW, F::R),
    Entry::new("amomin.w", MASK_AMO, 0x8000_202f, Op::AmominW, F::R),
    Entry::new("amomax.w", MASK_AMO, 0xa000_202f, Op::AmomaxW, F::R),
    Entry::new("amominu.w", MASK_AMO, 0xc000_202f, Op::AmominuW, F::R),
    Entry::new("amomaxu.w", MASK_AMO, 0xe000_202f, Op::AmomaxuW, F::R),
];

const RV64A_ENTRIES: &[Entry] = &[
    Entry::new("lr.d", MASK_LR, 0x1000_302f, Op::LrD, F::R),
    Entry::new("sc.d", MASK_AMO, 0x1800_302f, Op::ScD, F::R),
    Entry::new("amoswap.d", MASK_AMO, 0x0800_302f, Op::AmoswapD, F::R),
    Entry::new("amoadd.d", MASK_AMO, 0x0000_302f, Op::AmoaddD, F::R),
    Entry::new("amoxor.d", MASK_AMO, 0x2000_302f, Op::AmoxorD, F::R),
    Entry::new("amoand.d", MASK_AMO, 0x6000_302f, Op::AmoandD, F::R),
    Entry::new("amoor.d", MASK_AMO, 0x4000_302f, Op::AmoorD, F::R),
    Entry::new("amomin.d", MASK_AMO, 0x8000_302f, Op::AmominD, F::R),
    Entry::new("amomax.d", MASK_AMO, 0xa000_302f, Op::AmomaxD, F::R),
    Entry::new("amominu.d", MASK_AMO, 0xc000_302f, Op::AmominuD, F::R),
    Entry::new("amomaxu.d", MASK_AMO, 0xe000_302f, Op::AmomaxuD, F::R),
];

pub static RV32A: ExtensionSet = ExtensionSet::new("rv32a", &[RV32A_ENTRIES]);
pub static RV64A: ExtensionSet = ExtensionSet::new("rv64a", &[RV64A_ENTRIES]);

// ============================================================================
// F
// ============================================================================

const RV32F_ENTRIES: &[Entry] = &[
    Entry::new("flw", MASK_I, 0x0000_2007, Op::Flw, F::I),
    Entry::new("fsw", MASK_I, 0x0000_2027, Op::Fsw, F::S),
    Entry::new("fmadd.s", MASK_FR4, 0x0000_0043, Op::FmaddS, F::R4),
    Entry::new("fmsub.s", MASK_FR4, 0x0000_0047, Op::FmsubS, F::R4),
    Entry::new("fnmsub.s", MASK_FR4, 0x0000_004b, Op::FnmsubS, F::R4),
    Entry::new("fnmadd.s", MASK_FR4, 0x0000_004f, Op::FnmaddS, F::R4),
    Entry::new("fadd.s", MASK_FR, 0x0000_0053, Op::FaddS, F::R),
    Entry::new("fsub.s", MASK_FR, 0x0800_0053, Op::FsubS, F::R),
    Entry::new("fmul.s", MASK_FR, 0x1000_0053, Op::FmulS, F::R),
    Entry::new("fdiv.s", MASK_FR, 0x1800_0053, Op::FdivS, F::R),
    Entry::new("fsqrt.s", MASK_FUNARY, 0x5800_0053, Op::FsqrtS, F::R),
    Entry::new("fsgnj.s", MASK_R, 0x2000_0053, Op::FsgnjS, F::R),
    Entry::new("fsgnjn.s", MASK_R, 0x2000_1053, Op::FsgnjnS, F::R),
    Entry::new("fsgnjx.s", MASK_R, 0x2000_2053, Op::FsgnjxS, F::R),
    Entry::new("fmin.s", MASK_R, 0x2800_0053, Op::FminS, F::R),
    Entry::new("fmax.s", MASK_R, 0x2800_1053, Op::FmaxS, F::R),
    Entry::new("fcvt.w.s", MASK_FUNARY, 0xc000_0053, Op::FcvtWS, F::R),
    Entry::new("fcvt.wu.s", MASK_FUNARY, 0xc010_0053, Op::FcvtWuS, F::R),
    Entry::new("fmv.x.w", MASK_FMV, 0xe000_0053, Op::FmvXW, F::R),
    Entry::new("feq.s", MASK_R, 0xa000_2053, Op::FeqS, F::R),
    Entry::new("flt.s", MASK_R, 0xa000_1053, Op::FltS, F::R),
    Entry::new("fle.s", MASK_R, 0xa000_0053, Op::FleS, F::R),
    Entry::new("fclass.s", MASK_FMV, 0xe000_1053, Op::FclassS, F::R),
    Entry::new("fcvt.s.w", MASK_FUNARY, 0xd000_0053, Op::FcvtSW, F::R),
    Entry::new("fcvt.s.wu", MASK_FUNARY, 0xd010_0053, Op::FcvtSWu, F::R),
    Entry::new("fmv.w.x", MASK_FMV, 0xf000_0053, Op::FmvWX, F::R),
];

const RV64F_ENTRIES: &[Entry] = &[
    Entry::new("fcvt.l.s", MASK_FUNARY, 0xc020_0053, Op::FcvtLS, F::R),
    Entry::new("fcvt.lu.s", MASK_FUNARY, 0xc030_0053, Op::FcvtLuS, F::R),
    Entry::new("fcvt.s.l", MASK_FUNARY, 0xd020_0053, Op::FcvtSL, F::R),
    Entry::new("fcvt.s.lu", MASK_FUNARY, 0xd030_0053, Op::FcvtSLu, F::R),
];

pub static RV32F: ExtensionSet = ExtensionSet::new("rv32f", &[RV32F_ENTRIES]);
pub static RV64F: ExtensionSet = ExtensionSet::new("rv64f", &[RV64F_ENTRIES]);

// ============================================================================
// D
// ============================================================================

const RV32D_ENTRIES: &[Entry] = &[
    Entry::new("fld", MASK_I, 0x0000_3007, Op::Fld, F::I),
    Entry::new("fsd", MASK_I, 0x0000_3027, Op::Fsd, F::S),
    Entry::new("fmadd.d", MASK_FR4, 0x0200_0043, Op::FmaddD, F::R4),
    Entry::new("fmsub.d", MASK_FR4, 0x0200_0047, Op::FmsubD, F::R4),
    Entry::new("fnmsub.d", MASK_FR4, 0x0200_004b, Op::FnmsubD, F::R4),
    Entry::new("fnmadd.d", MASK_FR4, 0x0200_004f, Op::FnmaddD, F::R4),
    Entry::new("fadd.d", MASK_FR, 0x0200_0053, Op::FaddD, F::R),
    Entry::new("fsub.d", MASK_FR, 0x0a00_0053, Op::FsubD, F::R),
    Entry::new("fmul.d", MASK_FR, 0x1200_0053, Op::FmulD, F::R),
    Entry::new("fdiv.d", MASK_FR, 0x1a00_0053, Op::FdivD, F::R),
    Entry::new("fsqrt.d", MASK_FUNARY, 0x5a00_0053, Op::FsqrtD, F::R),
    Entry::new("fsgnj.d", MASK_R, 0x2200_0053, Op::FsgnjD, F::R),
    Entry::new("fsgnjn.d", MASK_R, 0x2200_1053, Op::FsgnjnD, F::R),
    Entry::new("fsgnjx.d", MASK_R, 0x2200_2053, Op::FsgnjxD, F::R),
    Entry::new("fmin.d", MASK_R, 0x2a00_0053, Op::FminD, F::R),
    Entry::new("fmax.d", MASK_R, 0x2a00_1053, Op::FmaxD, F::R),
    Entry::new("fcvt.s.d", MASK_FUNARY, 0x4010_0053, Op::FcvtSD, F::R),
    Entry::new("fcvt.d.s", MASK_FUNARY, 0x4200_0053, Op::FcvtDS, F::R),
    Entry::new("feq.d", MASK_R, 0xa200_2053, Op::FeqD, F::R),
    Entry::new("flt.d", MASK_R, 0xa200_1053, Op::FltD, F::R),
    Entry::new("fle.d", MASK_R, 0xa200_0053, Op::FleD, F::R),
    Entry::new("fclass.d", MASK_FMV, 0xe200_1053, Op::FclassD, F::R),
    Entry::new("fcvt.w.d", MASK_FUNARY, 0xc200_0053, Op::FcvtWD, F::R),
    Entry::new("fcvt.wu.d", MASK_FUNARY, 0xc210_0053, Op::FcvtWuD, F::R),
    Entry::new("fcvt.d.w", MASK_FUNARY, 0xd200_0053, Op::FcvtDW, F::R),
    Entry::new("fcvt.d.wu", MASK_FUNARY, 0xd210_0053, Op::FcvtDWu, F::R),
];

const RV64D_ENTRIES: &[Entry] = &[
    Entry::new("fcvt.l.d", MASK_FUNARY, 0xc220_0053, Op::FcvtLD, F::R),
    Entry::new("fcvt.lu.d", MASK_FUNARY, 0xc230_0053, Op::FcvtLuD, F::R),
    Entry::new("fmv.x.d", MASK_FMV, 0xe200_0053, Op::FmvXD, F::R),
    Entry::new("fcvt.d.l", MASK_FUNARY, 0xd220_0053, Op::FcvtDL, F::R),
    Entry::new("fcvt.d.lu", MASK_FUNARY, 0xd230_0053, Op::FcvtDLu, F::R),
    Entry::new("fmv.d.x", MASK_FMV, 0xf200_0053, Op::FmvDX, F::R),
];

pub static RV32D: ExtensionSet = ExtensionSet::new("rv32d", &[RV32D_ENTRIES]);
pub static RV64D: ExtensionSet = ExtensionSet::new("rv64d", &[RV64D_ENTRIES]);

// ============================================================================
// C
// ============================================================================

const RVC_COMMON: &[Entry] = &[
    // quadrant 0
    Entry::new("c.addi4spn", MASK_C, 0x0000, Op::Addi, F::CAddi4spn),
    Entry::new("c.fld", MASK_C, 0x2000, Op::Fld, F::CLd),
    Entry::new("c.lw", MASK_C, 0x4000, Op::Lw, F::CLw),
    Entry::new("c.fsd", MASK_C, 0xa000, Op::Fsd, F::CSd),
    Entry::new("c.sw", MASK_C, 0xc000, Op::Sw, F::CSw),
    // quadrant 1
    Entry::new("c.addi", MASK_C, 0x0001, Op::Addi, F::CAddi),
    Entry::new("c.li", MASK_C, 0x4001, Op::Addi, F::CLi),
    Entry::new("c.lui", MASK_C, 0x6001, Op::Lui, F::CLui),
    Entry::new("c.srli", MASK_C_ALU_IMM, 0x8001, Op::Srli, F::CShift),
    Entry::new("c.srai", MASK_C_ALU_IMM, 0x8401, Op::Srai, F::CShift),
    Entry::new("c.andi", MASK_C_ALU_IMM, 0x8801, Op::Andi, F::CAndi),
    Entry::new("c.sub", MASK_C_ALU, 0x8c01, Op::Sub, F::CArith),
    Entry::new("c.xor", MASK_C_ALU, 0x8c21, Op::Xor, F::CArith),
    Entry::new("c.or", MASK_C_ALU, 0x8c41, Op::Or, F::CArith),
    Entry::new("c.and", MASK_C_ALU, 0x8c61, Op::And, F::CArith),
    Entry::new("c.j", MASK_C, 0xa001, Op::Jal, F::CJ),
    Entry::new("c.beqz", MASK_C, 0xc001, Op::Beq, F::CBranch),
    Entry::new("c.bnez", MASK_C, 0xe001, Op::Bne, F::CBranch),
    // quadrant 2
    Entry::new("c.slli", MASK_C, 0x0002, Op::Slli, F::CSlli),
    Entry::new("c.fldsp", MASK_C, 0x2002, Op::Fld, F::CLdsp),
    Entry::new("c.lwsp", MASK_C, 0x4002, Op::Lw, F::CLwsp),
    Entry::new("c.mv", MASK_C_CR, 0x8002, Op::Add, F::CMv),
    Entry::new("c.add", MASK_C_CR, 0x9002, Op::Add, F::CAdd),
    Entry::new("c.fsdsp", MASK_C, 0xa002, Op::Fsd, F::CSdsp),
    Entry::new("c.swsp", MASK_C, 0xc002, Op::Sw, F::CSwsp),
];

const RV32C_ONLY: &[Entry] = &[
    Entry::new("c.flw", MASK_C, 0x6000, Op::Flw, F::CLw),
    Entry::new("c.fsw", MASK_C, 0xe000, Op::Fsw, F::CSw),
    Entry::new("c.jal", MASK_C, 0x2001, Op::Jal, F::CJal),
    Entry::new("c.flwsp", MASK_C, 0x6002, Op::Flw, F::CLwsp),
    Entry::new("c.fswsp", MASK_C, 0xe002, Op::Fsw, F::CSwsp),
];

const RV64C_ONLY: &[Entry] = &[
    Entry::new("c.ld", MASK_C, 0x6000, Op::Ld, F::CLd),
    Entry::new("c.sd", MASK_C, 0xe000, Op::Sd, F::CSd),
    Entry::new("c.addiw", MASK_C, 0x2001, Op::Addiw, F::CAddiw),
    Entry::new("c.subw", MASK_C_ALU, 0x9c01, Op::Subw, F::CArith),
    Entry::new("c.addw", MASK_C_ALU, 0x9c21, Op::Addw, F::CArith),
    Entry::new("c.ldsp", MASK_C, 0x6002, Op::Ld, F::CLdsp),
    Entry::new("c.sdsp", MASK_C, 0xe002, Op::Sd, F::CSdsp),
];

pub static RV32C: ExtensionSet = ExtensionSet::new("rv32c", &[RVC_COMMON, RV32C_ONLY]);
pub static RV64C: ExtensionSet = ExtensionSet::new("rv64c", &[RVC_COMMON, RV64C_ONLY]);

/// Every standard set.
pub static ALL_SETS: [&ExtensionSet; 12] = [
    &RV32I, &RV32M, &RV32A, &RV32F, &RV32D, &RV32C,
    &RV64I, &RV64M, &RV64A, &RV64F, &RV64D, &RV64C,
];
