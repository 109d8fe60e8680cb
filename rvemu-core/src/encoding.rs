//! # Instruction Field Extraction
//!
//! Helpers for pulling register numbers and immediates out of RISC-V
//! instruction words.
//!
//! ## 32-bit Formats
//!
//! ```text
//! R-type: [funct7:7][rs2:5][rs1:5][funct3:3][rd:5][opcode:7]
//! I-type: [imm[11:0]:12][rs1:5][funct3:3][rd:5][opcode:7]
//! S-type: [imm[11:5]:7][rs2:5][rs1:5][funct3:3][imm[4:0]:5][opcode:7]
//! B-type: [imm[12|10:5]:7][rs2:5][rs1:5][funct3:3][imm[4:1|11]:5][opcode:7]
//! U-type: [imm[31:12]:20][rd:5][opcode:7]
//! J-type: [imm[20|10:1|11|19:12]:20][rd:5][opcode:7]
//! ```
//!
//! Compressed (16-bit) encodings scatter immediate bits differently for
//! nearly every instruction; the `c_*` helpers below each cover one layout.

// ============================================================================
// Bit helpers
// ============================================================================

/// Extract bits `hi..=lo` of `ins`, right-aligned.
#[inline]
pub const fn bits(ins: u32, hi: u32, lo: u32) -> u32 {
    (ins >> lo) & ((1 << (hi - lo + 1)) - 1)
}

/// Extract a single bit of `ins`.
#[inline]
pub const fn bit(ins: u32, n: u32) -> u32 {
    (ins >> n) & 1
}

/// Sign-extend the low `width` bits of `val`.
#[inline]
pub const fn sign_extend(val: u32, width: u32) -> i32 {
    let shift = 32 - width;
    ((val << shift) as i32) >> shift
}

// ============================================================================
// 32-bit Field Extraction
// ============================================================================

/// Major opcode (bits 6:0)
#[inline]
pub const fn opcode(ins: u32) -> u32 {
    ins & 0x7f
}

/// Destination register (bits 11:7)
#[inline]
pub const fn rd(ins: u32) -> u32 {
    bits(ins, 11, 7)
}

/// Source register 1 (bits 19:15)
#[inline]
pub const fn rs1(ins: u32) -> u32 {
    bits(ins, 19, 15)
}

/// Source register 2 (bits 24:20)
#[inline]
pub const fn rs2(ins: u32) -> u32 {
    bits(ins, 24, 20)
}

/// Source register 3 of fused multiply-add (bits 31:27)
#[inline]
pub const fn rs3(ins: u32) -> u32 {
    bits(ins, 31, 27)
}

/// funct3 field (bits 14:12), also the floating-point rounding mode
#[inline]
pub const fn funct3(ins: u32) -> u32 {
    bits(ins, 14, 12)
}

/// funct7 field (bits 31:25)
#[inline]
pub const fn funct7(ins: u32) -> u32 {
    bits(ins, 31, 25)
}

/// I-type immediate (sign-extended)
#[inline]
pub const fn imm_i(ins: u32) -> i32 {
    (ins as i32) >> 20
}

/// S-type immediate (sign-extended)
#[inline]
pub const fn imm_s(ins: u32) -> i32 {
    sign_extend((bits(ins, 31, 25) << 5) | bits(ins, 11, 7), 12)
}

/// B-type immediate (sign-extended, always even)
#[inline]
pub const fn imm_b(ins: u32) -> i32 {
    let imm = (bit(ins, 31) << 12)
        | (bit(ins, 7) << 11)
        | (bits(ins, 30, 25) << 5)
        | (bits(ins, 11, 8) << 1);
    sign_extend(imm, 13)
}

/// U-type immediate (already shifted into bits 31:12)
#[inline]
pub const fn imm_u(ins: u32) -> i32 {
    (ins & 0xffff_f000) as i32
}

/// J-type immediate (sign-extended, always even)
#[inline]
pub const fn imm_j(ins: u32) -> i32 {
    let imm = (bit(ins, 31) << 20)
        | (bits(ins, 19, 12) << 12)
        | (bit(ins, 20) << 11)
        | (bits(ins, 30, 21) << 1);
    sign_extend(imm, 21)
}

/// Shift amount of an immediate shift (bits 25:20, RV64 width)
#[inline]
pub const fn shamt(ins: u32) -> u32 {
    bits(ins, 25, 20)
}

/// CSR number (bits 31:20)
#[inline]
pub const fn csr(ins: u32) -> u32 {
    bits(ins, 31, 20)
}

/// Acquire bit of an atomic (bit 26)
#[inline]
pub const fn aq(ins: u32) -> bool {
    bit(ins, 26) != 0
}

/// Release bit of an atomic (bit 25)
#[inline]
pub const fn rl(ins: u32) -> bool {
    bit(ins, 25) != 0
}

/// Fence predecessor set (bits 27:24)
#[inline]
pub const fn fence_pred(ins: u32) -> u32 {
    bits(ins, 27, 24)
}

/// Fence successor set (bits 23:20)
#[inline]
pub const fn fence_succ(ins: u32) -> u32 {
    bits(ins, 23, 20)
}

// ============================================================================
// Compressed Field Extraction
// ============================================================================

/// Full rd/rs1 field (bits 11:7)
#[inline]
pub const fn c_rd(ins: u32) -> u32 {
    bits(ins, 11, 7)
}

/// Full rs2 field (bits 6:2)
#[inline]
pub const fn c_rs2(ins: u32) -> u32 {
    bits(ins, 6, 2)
}

/// Popular rs1'/rd' field (bits 9:7), mapped onto x8-x15
#[inline]
pub const fn c_rs1_prime(ins: u32) -> u32 {
    bits(ins, 9, 7) + 8
}

/// Popular rs2'/rd' field (bits 4:2), mapped onto x8-x15
#[inline]
pub const fn c_rs2_prime(ins: u32) -> u32 {
    bits(ins, 4, 2) + 8
}

/// CI-format 6-bit immediate (c.addi, c.li, c.andi, c.addiw), sign-extended
#[inline]
pub const fn c_imm6(ins: u32) -> i32 {
    sign_extend((bit(ins, 12) << 5) | bits(ins, 6, 2), 6)
}

/// CI-format shift amount (c.slli, c.srli, c.srai)
#[inline]
pub const fn c_shamt(ins: u32) -> u32 {
    (bit(ins, 12) << 5) | bits(ins, 6, 2)
}

/// c.lui immediate, already shifted into bits 17:12
#[inline]
pub const fn c_lui_imm(ins: u32) -> i32 {
    c_imm6(ins) << 12
}

/// c.addi16sp immediate (multiple of 16)
#[inline]
pub const fn c_addi16sp_imm(ins: u32) -> i32 {
    let imm = (bit(ins, 12) << 9)
        | (bits(ins, 4, 3) << 7)
        | (bit(ins, 5) << 6)
        | (bit(ins, 2) << 5)
        | (bit(ins, 6) << 4);
    sign_extend(imm, 10)
}

/// c.addi4spn immediate (multiple of 4)
#[inline]
pub const fn c_addi4spn_imm(ins: u32) -> u32 {
    (bits(ins, 10, 7) << 6) | (bits(ins, 12, 11) << 4) | (bit(ins, 5) << 3) | (bit(ins, 6) << 2)
}

/// CL/CS word offset (c.lw, c.sw, c.flw, c.fsw)
#[inline]
pub const fn c_lw_imm(ins: u32) -> u32 {
    (bit(ins, 5) << 6) | (bits(ins, 12, 10) << 3) | (bit(ins, 6) << 2)
}

/// CL/CS doubleword offset (c.ld, c.sd, c.fld, c.fsd)
#[inline]
pub const fn c_ld_imm(ins: u32) -> u32 {
    (bits(ins, 6, 5) << 6) | (bits(ins, 12, 10) << 3)
}

/// Stack-relative word load offset (c.lwsp, c.flwsp)
#[inline]
pub const fn c_lwsp_imm(ins: u32) -> u32 {
    (bits(ins, 3, 2) << 6) | (bit(ins, 12) << 5) | (bits(ins, 6, 4) << 2)
}

/// Stack-relative doubleword load offset (c.ldsp, c.fldsp)
#[inline]
pub const fn c_ldsp_imm(ins: u32) -> u32 {
    (bits(ins, 4, 2) << 6) | (bit(ins, 12) << 5) | (bits(ins, 6, 5) << 3)
}

/// Stack-relative word store offset (c.swsp, c.fswsp)
#[inline]
pub const fn c_swsp_imm(ins: u32) -> u32 {
    (bits(ins, 8, 7) << 6) | (bits(ins, 12, 9) << 2)
}

/// Stack-relative doubleword store offset (c.sdsp, c.fsdsp)
#[inline]
pub const fn c_sdsp_imm(ins: u32) -> u32 {
    (bits(ins, 9, 7) << 6) | (bits(ins, 12, 10) << 3)
}

/// CJ-format jump offset (c.j, c.jal)
#[inline]
pub const fn c_j_imm(ins: u32) -> i32 {
    let imm = (bit(ins, 12) << 11)
        | (bit(ins, 8) << 10)
        | (bits(ins, 10, 9) << 8)
        | (bit(ins, 6) << 7)
        | (bit(ins, 7) << 6)
        | (bit(ins, 2) << 5)
        | (bit(ins, 11) << 4)
        | (bits(ins, 5, 3) << 1);
    sign_extend(imm, 12)
}

/// CB-format branch offset (c.beqz, c.bnez)
#[inline]
pub const fn c_b_imm(ins: u32) -> i32 {
    let imm = (bit(ins, 12) << 8)
        | (bits(ins, 6, 5) << 6)
        | (bit(ins, 2) << 5)
        | (bits(ins, 11, 10) << 3)
        | (bits(ins, 4, 3) << 1);
    sign_extend(imm, 9)
}
