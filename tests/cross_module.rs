//! Cross-module tests
//!
//! Checks that the core address space, the ISA registry, the dump loader and
//! the runtime agree with each other.

use rvemu_core::{AddressSpace, Attribute, Exception, Register, Xlen};
use rvemu_disassembler::{decode, disassemble, format, Isa};
use rvemu_dump::{load, DumpError};
use rvemu_runtime::{Cpu, CpuConfig, HaltReason};
use std::sync::Arc;
use std::thread;

// ============================================================================
// Fault model
// ============================================================================

#[test]
fn test_store_to_empty_region_faults() {
    let mut mem = AddressSpace::new();
    mem.add_chunk("text", 0, 0x100, Attribute::RWX).unwrap();
    mem.add_empty("mmio", 0x1000, 0x100, Attribute::RW).unwrap();
    // lui a1,0x1 ; sw a0,0(a1) ; ebreak
    let words: [u32; 3] = [0x0000_15b7, 0x00a5_a023, 0x0010_0073];
    for (i, w) in words.iter().enumerate() {
        assert!(mem.write_u32(4 * i as u64, *w).is_ok());
    }

    let mut cpu = Cpu::from_isa_name("rv32i", mem, CpuConfig::default()).unwrap();
    let halt = cpu.run(10);
    assert_eq!(halt, HaltReason::Exception { pc: 4, ex: Exception::EMPTY });
    assert_eq!(cpu.state().fault_address, Some(0x1000));
}

#[test]
fn test_fetch_from_non_executable_segment() {
    let mut mem = AddressSpace::new();
    mem.add_chunk("data", 0, 0x100, Attribute::RW).unwrap();
    mem.write_u32(0, 0x0000_0013);

    let mut cpu = Cpu::from_isa_name("rv32i", mem, CpuConfig::default()).unwrap();
    let ex = cpu.step();
    assert!(ex.contains(Exception::EXEC));
    assert_eq!(cpu.pc(), 0);
}

#[test]
fn test_misaligned_fetch() {
    let mut mem = AddressSpace::new();
    mem.add_chunk("text", 0, 0x100, Attribute::RWX).unwrap();
    // jalr zero,1(zero): target bit 0 is cleared, so land on 0
    mem.write_u32(0, 0x0010_0067);
    let mut cpu = Cpu::from_isa_name("rv32gc", mem, CpuConfig::default()).unwrap();
    assert!(cpu.step().is_ok());
    assert_eq!(cpu.pc(), 0);

    cpu.set_pc(1);
    assert!(cpu.step().contains(Exception::ALIGN));
}

#[test]
fn test_dump_into_read_only_text_is_rejected() {
    let mut mem = AddressSpace::new();
    mem.add_chunk("rom", 0, 0x100, Attribute::RX).unwrap();
    let err = load(&mut mem, "0: 00000013 nop").unwrap_err();
    match err {
        DumpError::Store { ex, .. } => assert_eq!(ex, Exception::WRITE),
        other => panic!("unexpected error {}", other),
    }
}

// ============================================================================
// Decoder shared between disassembly and execution
// ============================================================================

#[test]
fn test_decoder_and_runtime_agree_on_length() {
    let isa = Isa::from_name("rv32gc").unwrap();
    let mut mem = AddressSpace::new();
    mem.add_chunk("text", 0, 0x100, Attribute::RWX).unwrap();
    // c.li a0,5 ; addi a0,a0,1 ; c.ebreak
    mem.load(0, &[0x15, 0x45, 0x13, 0x05, 0x15, 0x00, 0x02, 0x90]);

    let lengths: Vec<usize> = [0u64, 2, 6].iter().map(|&a| disassemble(&isa, &mem, a).length).collect();
    assert_eq!(lengths, vec![2, 4, 2]);

    let mut cpu = Cpu::new(Arc::new(isa), mem, CpuConfig::default());
    let mut pcs = Vec::new();
    cpu.run_until(10, |s| {
        pcs.push(s.pc);
        false
    });
    assert_eq!(pcs, vec![0, 2, 6]);
    assert_eq!(cpu.reg(Register::A0), 6);
}

#[test]
fn test_format_uses_xlen() {
    let rv32 = Isa::from_name("rv32gc").unwrap();
    let rv64 = Isa::from_name("rv64gc").unwrap();
    // c.addiw is c.jal on RV32
    let narrow = decode(&rv32, 0x2501).unwrap();
    let wide = decode(&rv64, 0x2501).unwrap();
    assert_ne!(narrow.op, wide.op);
    assert_eq!(format(&wide, 0, Xlen::Rv64), "sext.w a0,a0");
}

#[test]
fn test_symbols_flow_from_dump_to_cpu() {
    let mut mem = AddressSpace::new();
    mem.add_chunk("ram", 0, 0x100, Attribute::RWX).unwrap();
    load(&mut mem, "00000000 <entry>:\n0: 0000006f j 0 <entry>\n").unwrap();
    let cpu = Cpu::from_isa_name("rv32gc", mem, CpuConfig::default()).unwrap();
    let d = cpu.disassemble(0);
    assert_eq!(d.symbol, "entry");
    assert_eq!(d.instruction, "j 0");
    assert_eq!(d.comment, "entry");
}

// ============================================================================
// Sharing
// ============================================================================

#[test]
fn test_isa_shared_across_threads() {
    let isa = Arc::new(Isa::from_name("rv64gc").unwrap());
    let handles: Vec<_> = (1..=4u64)
        .map(|n| {
            let isa = Arc::clone(&isa);
            thread::spawn(move || {
                let mut cpu = Cpu::new(isa, AddressSpace::new(), CpuConfig::default());
                cpu.map_ram("ram", 0, 0x100).unwrap();
                // addi a0,a0,n ; ebreak
                let addi = ((n as u32) << 20) | (10 << 15) | (10 << 7) | 0x13;
                let mut bytes = addi.to_le_bytes().to_vec();
                bytes.extend_from_slice(&0x0010_0073u32.to_le_bytes());
                cpu.load(0, &bytes).unwrap();
                cpu.run(10);
                cpu.reg(Register::A0)
            })
        })
        .collect();
    let results: Vec<u64> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert_eq!(results, vec![1, 2, 3, 4]);
}

#[test]
fn test_cpu_clone_is_independent() {
    let mut cpu = Cpu::from_isa_name("rv32i", AddressSpace::new(), CpuConfig::default()).unwrap();
    cpu.map_ram("ram", 0, 0x100).unwrap();
    cpu.load(0, &0x0010_0073u32.to_le_bytes()).unwrap();
    let mut copy = cpu.clone();
    copy.memory_mut().write_u32(0, 0x0000_0073);
    assert_eq!(cpu.run(1), HaltReason::Exception { pc: 0, ex: Exception::EBREAK });
    assert_eq!(copy.run(1), HaltReason::Exception { pc: 0, ex: Exception::ECALL });
}
