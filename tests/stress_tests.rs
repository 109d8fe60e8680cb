//! Stress tests
//!
//! Long runs, exhaustive halfword decoding and large disassembly ranges.

use rvemu_core::{AddressSpace, Attribute, Exception, Register};
use rvemu_disassembler::{decode, disassemble_range, format, Isa};
use rvemu_runtime::{Cpu, CpuConfig, HaltReason};

fn cpu_with(isa: &str, words: &[u32], config: CpuConfig) -> Cpu {
    let mut cpu = Cpu::from_isa_name(isa, AddressSpace::new(), config).unwrap();
    cpu.map_ram("ram", 0, 0x10000).unwrap();
    let bytes: Vec<u8> = words.iter().flat_map(|w| w.to_le_bytes()).collect();
    cpu.load(0, &bytes).unwrap();
    cpu
}

#[test]
fn test_long_counting_loop() {
    // lui t0,0x18 ; addi t0,t0,1696 (100000) ; addi a0,a0,1 ; bne a0,t0,-4 ; ebreak
    let program = [0x0001_82b7, 0x6a02_8293, 0x0015_0513, 0xfe55_1ee3, 0x0010_0073];
    let mut cpu = cpu_with("rv32i", &program, CpuConfig::default());
    let halt = cpu.run_default();
    assert_eq!(halt, HaltReason::Exception { pc: 16, ex: Exception::EBREAK });
    assert_eq!(cpu.reg(Register::A0), 100_000);
    assert_eq!(cpu.state().instret, 2 + 2 * 100_000);
}

#[test]
fn test_step_budget_on_infinite_loop() {
    let config = CpuConfig {
        max_steps: 250_000,
        ..CpuConfig::default()
    };
    // j .
    let mut cpu = cpu_with("rv64gc", &[0x0000_006f], config);
    assert_eq!(cpu.run_default(), HaltReason::StepLimit);
    assert_eq!(cpu.state().instret, 250_000);
}

#[test]
fn test_every_halfword_decodes_or_rejects() {
    for name in ["rv32gc", "rv64gc"] {
        let isa = Isa::from_name(name).unwrap();
        let mut decoded = 0;
        for half in 0..=u16::MAX as u32 {
            if half & 0b11 == 0b11 {
                continue;
            }
            if let Ok(i) = decode(&isa, half) {
                assert_eq!(i.len, 2, "{} {:04x}", name, half);
                let text = format(&i, 0x1000, isa.xlen());
                assert!(!text.is_empty());
                decoded += 1;
            }
        }
        // most of the 48K compressed encodings are valid
        assert!(decoded > 32_768, "{} decoded only {}", name, decoded);
    }
}

#[test]
fn test_indexed_lookup_matches_linear_scan() {
    let isa = Isa::from_name("rv64gc").unwrap();
    let mut x: u32 = 0x1234_5678;
    for _ in 0..200_000 {
        // xorshift
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        assert_eq!(isa.lookup(x), isa.lookup_linear(x), "{:08x}", x);
    }
}

#[test]
fn test_disassemble_large_range() {
    let isa = Isa::from_name("rv32gc").unwrap();
    let mut mem = AddressSpace::new();
    mem.add_chunk("ram", 0, 0x10000, Attribute::RWX).unwrap();
    let mut x: u32 = 0xdead_beef;
    for adr in (0..0x10000).step_by(4) {
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        mem.write_u32(adr, x);
    }

    let lines = disassemble_range(&isa, &mem, 0, 0x10000);
    let total: usize = lines.iter().map(|d| d.length).sum();
    assert!(total >= 0x10000);
    assert!(lines.iter().all(|d| d.length == 2 || d.length == 4));
}

#[test]
fn test_random_programs_never_panic() {
    let mut x: u32 = 0x0bad_f00d;
    for round in 0..200 {
        let words: Vec<u32> = (0..64)
            .map(|_| {
                x ^= x << 13;
                x ^= x >> 17;
                x ^= x << 5;
                x
            })
            .collect();
        let isa = if round % 2 == 0 { "rv32gc" } else { "rv64gc" };
        let mut cpu = cpu_with(isa, &words, CpuConfig::default());
        match cpu.run(10_000) {
            HaltReason::Exception { pc, .. } => assert_eq!(pc, cpu.pc()),
            HaltReason::StepLimit => {}
            HaltReason::Cancelled => unreachable!(),
        }
    }
}
