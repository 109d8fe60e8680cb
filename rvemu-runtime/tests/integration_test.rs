//! Integration tests for rvemu-runtime
//!
//! Programs are assembled with the small encoders below and executed on a
//! RAM-backed CPU.

use rvemu_core::{AddressSpace, Attribute, Exception, Register};
use rvemu_runtime::{Cpu, CpuConfig, HaltReason};

const A0: u32 = 10;
const A1: u32 = 11;
const A2: u32 = 12;
const T0: u32 = 5;
const T1: u32 = 6;
const SP: u32 = 2;

fn r_type(f7: u32, rs2: u32, rs1: u32, f3: u32, rd: u32, op: u32) -> u32 {
    f7 << 25 | rs2 << 20 | rs1 << 15 | f3 << 12 | rd << 7 | op
}

fn i_type(imm: i32, rs1: u32, f3: u32, rd: u32, op: u32) -> u32 {
    ((imm as u32) & 0xfff) << 20 | rs1 << 15 | f3 << 12 | rd << 7 | op
}

fn s_type(imm: i32, rs2: u32, rs1: u32, f3: u32) -> u32 {
    let imm = imm as u32;
    ((imm >> 5) & 0x7f) << 25 | rs2 << 20 | rs1 << 15 | f3 << 12 | (imm & 0x1f) << 7 | 0x23
}

fn b_type(imm: i32, rs2: u32, rs1: u32, f3: u32) -> u32 {
    let imm = imm as u32;
    ((imm >> 12) & 1) << 31
        | ((imm >> 5) & 0x3f) << 25
        | rs2 << 20
        | rs1 << 15
        | f3 << 12
        | ((imm >> 1) & 0xf) << 8
        | ((imm >> 11) & 1) << 7
        | 0x63
}

fn addi(rd: u32, rs1: u32, imm: i32) -> u32 {
    i_type(imm, rs1, 0, rd, 0x13)
}

fn add(rd: u32, rs1: u32, rs2: u32) -> u32 {
    r_type(0, rs2, rs1, 0, rd, 0x33)
}

fn mul(rd: u32, rs1: u32, rs2: u32) -> u32 {
    r_type(1, rs2, rs1, 0, rd, 0x33)
}

fn bne(rs1: u32, rs2: u32, offset: i32) -> u32 {
    b_type(offset, rs2, rs1, 1)
}

fn sw(rs2: u32, rs1: u32, offset: i32) -> u32 {
    s_type(offset, rs2, rs1, 2)
}

fn lw(rd: u32, rs1: u32, offset: i32) -> u32 {
    i_type(offset, rs1, 2, rd, 0x03)
}

const EBREAK: u32 = 0x0010_0073;

fn cpu(isa: &str, words: &[u32]) -> Cpu {
    let mut cpu = Cpu::from_isa_name(isa, AddressSpace::new(), CpuConfig::default()).unwrap();
    cpu.map_ram("ram", 0, 0x1000).unwrap();
    let bytes: Vec<u8> = words.iter().flat_map(|w| w.to_le_bytes()).collect();
    cpu.load(0, &bytes).unwrap();
    cpu
}

#[test]
fn test_sum_loop() {
    let program = [
        addi(A0, 0, 0),
        addi(T0, 0, 10),
        add(A0, A0, T0),
        addi(T0, T0, -1),
        bne(T0, 0, -8),
        EBREAK,
    ];
    let mut cpu = cpu("rv32i", &program);
    let halt = cpu.run(1000);
    assert_eq!(halt, HaltReason::Exception { pc: 20, ex: Exception::EBREAK });
    assert_eq!(cpu.reg(Register::A0), 55);
    assert_eq!(cpu.state().instret, 32);
}

#[test]
fn test_factorial_rv64() {
    // a0 = 20!
    let program = [
        addi(A0, 0, 1),
        addi(T0, 0, 20),
        mul(A0, A0, T0),
        addi(T0, T0, -1),
        bne(T0, 0, -8),
        EBREAK,
    ];
    let mut cpu = cpu("rv64im", &program);
    cpu.run(1000);
    assert_eq!(cpu.reg(Register::A0), 2_432_902_008_176_640_000);
}

#[test]
fn test_factorial_rv32_wraps() {
    let program = [
        addi(A0, 0, 1),
        addi(T0, 0, 13),
        mul(A0, A0, T0),
        addi(T0, T0, -1),
        bne(T0, 0, -8),
        EBREAK,
    ];
    let mut cpu = cpu("rv32im", &program);
    cpu.run(1000);
    // 13! mod 2^32, viewed as a sign-extended 32-bit value
    let expected = (6_227_020_800u64 as u32) as i32 as i64 as u64;
    assert_eq!(cpu.reg(Register::A0), expected);
}

#[test]
fn test_stack_round_trip() {
    let program = [
        addi(SP, 0, 0x7f0),
        addi(T0, 0, 0x123),
        sw(T0, SP, 4),
        lw(T1, SP, 4),
        EBREAK,
    ];
    let mut cpu = cpu("rv32i", &program);
    cpu.run(100);
    assert_eq!(cpu.reg(Register::from_field(T1)), 0x123);
    assert_eq!(cpu.memory().read_u32(0x7f4), (0x123, Exception::empty()));
}

#[test]
fn test_store_to_text_halts() {
    let mut mem = AddressSpace::new();
    mem.add_chunk("text", 0, 0x100, Attribute::RX).unwrap();
    mem.add_chunk("data", 0x1000, 0x100, Attribute::RW).unwrap();
    let mut cpu = Cpu::from_isa_name("rv32i", mem, CpuConfig::default()).unwrap();
    let program = [addi(T0, 0, 0x40), sw(T0, T0, 0), EBREAK];
    let bytes: Vec<u8> = program.iter().flat_map(|w| w.to_le_bytes()).collect();
    // loading into RX text reports the write fault but the bytes land
    assert!(cpu.load(0, &bytes).is_err());

    let halt = cpu.run(10);
    assert_eq!(halt, HaltReason::Exception { pc: 4, ex: Exception::WRITE });
    assert_eq!(cpu.state().fault_address, Some(0x40));
}

#[test]
fn test_misaligned_load_leaves_rd() {
    let program = [addi(A1, 0, 0x7ff), addi(A2, 0, 99), lw(A2, A1, 0), EBREAK];
    let mut cpu = cpu("rv32i", &program);
    let halt = cpu.run(10);
    assert_eq!(halt, HaltReason::Exception { pc: 8, ex: Exception::ALIGN });
    assert_eq!(cpu.reg(Register::from_field(A2)), 99);

    // resuming retries the same instruction
    assert_eq!(cpu.step(), Exception::ALIGN);
    assert_eq!(cpu.pc(), 8);
}

#[test]
fn test_fetch_beyond_ram() {
    let mut cpu = cpu("rv32i", &[]);
    cpu.set_pc(0x1000);
    let halt = cpu.run(10);
    assert_eq!(halt, HaltReason::Exception { pc: 0x1000, ex: Exception::EMPTY });
}

#[test]
fn test_compressed_program() {
    // c.li a0,5 ; c.addi a0,3 ; c.ebreak
    let mut cpu = Cpu::from_isa_name("rv32gc", AddressSpace::new(), CpuConfig::default()).unwrap();
    cpu.map_ram("ram", 0, 0x100).unwrap();
    cpu.load(0, &[0x15, 0x45, 0x0d, 0x05, 0x02, 0x90]).unwrap();
    let halt = cpu.run(10);
    assert_eq!(halt, HaltReason::Exception { pc: 4, ex: Exception::EBREAK });
    assert_eq!(cpu.reg(Register::A0), 8);
    assert_eq!(cpu.state().instret, 2);
}

#[test]
fn test_compressed_rejected_without_c() {
    let mut cpu = Cpu::from_isa_name("rv32im", AddressSpace::new(), CpuConfig::default()).unwrap();
    cpu.map_ram("ram", 0, 0x100).unwrap();
    cpu.load(0, &[0x15, 0x45, 0x0d, 0x05]).unwrap();
    assert_eq!(cpu.run(10), HaltReason::Exception { pc: 0, ex: Exception::ILLEGAL });
}

#[test]
fn test_double_conversion_rounding() {
    let fcvt_d_w = |fd: u32, rs1: u32| r_type(0x69, 0, rs1, 0, fd, 0x53);
    let fdiv_d = |fd: u32, fs1: u32, fs2: u32| r_type(0x0d, fs2, fs1, 0, fd, 0x53);
    let fcvt_w_d = |rd: u32, fs1: u32, rm: u32| r_type(0x61, 0, fs1, rm, rd, 0x53);
    // csrrwi zero,frm,2 (round down)
    let set_frm_rdn = 0x002 << 20 | 2 << 15 | 5 << 12 | 0x73;

    let program = [
        addi(T0, 0, -7),
        addi(T1, 0, 2),
        fcvt_d_w(1, T0),
        fcvt_d_w(2, T1),
        fdiv_d(3, 1, 2),
        fcvt_w_d(A0, 3, 1), // rtz: -3
        fcvt_w_d(A1, 3, 0), // rne: -4
        set_frm_rdn,
        fcvt_w_d(A2, 3, 7), // dyn (rdn): -4
        EBREAK,
    ];
    let mut cpu = cpu("rv64gc", &program);
    let halt = cpu.run(100);
    assert_eq!(halt, HaltReason::Exception { pc: 36, ex: Exception::EBREAK });
    assert_eq!(cpu.reg(Register::A0) as i64, -3);
    assert_eq!(cpu.reg(Register::A1) as i64, -4);
    assert_eq!(cpu.reg(Register::from_field(A2)) as i64, -4);
    assert_eq!(cpu.state().frm, 2);
}

#[test]
fn test_dynamic_rounding_invalid_frm() {
    let fcvt_w_d = r_type(0x61, 0, 1, 7, A0, 0x53);
    // csrrwi zero,frm,5 (reserved)
    let set_frm = 0x002 << 20 | 5 << 15 | 5 << 12 | 0x73;
    let mut cpu = cpu("rv64gc", &[set_frm, fcvt_w_d, EBREAK]);
    assert_eq!(cpu.run(10), HaltReason::Exception { pc: 4, ex: Exception::ILLEGAL });
}

#[test]
fn test_instret_csr() {
    // nop ; nop ; csrrs a0,instret,zero
    let rdinstret = 0xc02 << 20 | 2 << 12 | A0 << 7 | 0x73;
    let mut cpu = cpu("rv32i", &[addi(0, 0, 0), addi(0, 0, 0), rdinstret, EBREAK]);
    cpu.run(10);
    assert_eq!(cpu.reg(Register::A0), 2);
}

#[test]
fn test_run_until_breakpoint() {
    let program = [
        addi(A0, 0, 0),
        addi(T0, 0, 10),
        add(A0, A0, T0),
        addi(T0, T0, -1),
        bne(T0, 0, -8),
        EBREAK,
    ];
    let mut cpu = cpu("rv32i", &program);
    let halt = cpu.run_until(1000, |s| s.pc == 0x10);
    assert_eq!(halt, HaltReason::Cancelled);
    assert_eq!(cpu.reg(Register::A0), 10);
}

#[test]
fn test_trace_does_not_change_results() {
    let program = [addi(A0, 0, 3), add(A0, A0, A0), EBREAK];
    let config = CpuConfig {
        trace: true,
        ..CpuConfig::default()
    };
    let mut traced = Cpu::from_isa_name("rv32i", AddressSpace::new(), config).unwrap();
    traced.map_ram("ram", 0, 0x100).unwrap();
    let bytes: Vec<u8> = program.iter().flat_map(|w| w.to_le_bytes()).collect();
    traced.load(0, &bytes).unwrap();

    let mut plain = cpu("rv32i", &program);
    assert_eq!(traced.run(10), plain.run(10));
    assert_eq!(traced.state(), plain.state());
}

#[test]
fn test_halt_reason_json() {
    let json = serde_json::to_string(&HaltReason::StepLimit).unwrap();
    assert_eq!(json, r#"{"reason":"step_limit"}"#);

    let json = serde_json::to_string(&HaltReason::Exception { pc: 4, ex: Exception::EBREAK }).unwrap();
    assert!(json.contains(r#""reason":"exception""#));
    assert!(json.contains(r#""pc":4"#));
}

#[test]
fn test_config_json_round_trip() {
    let config = CpuConfig {
        max_steps: 42,
        trace: true,
        reset_pc: 0x8000_0000,
    };
    let json = serde_json::to_string(&config).unwrap();
    let back: CpuConfig = serde_json::from_str(&json).unwrap();
    assert_eq!(back, config);
}

#[test]
fn test_register_listing_after_run() {
    let mut cpu = cpu("rv64i", &[addi(A0, 0, -1), EBREAK]);
    cpu.run(10);
    assert!(cpu.state().iregs().contains("x10  a0   ffffffffffffffff"));
}
