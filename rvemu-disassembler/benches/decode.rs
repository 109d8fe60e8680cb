//! Benchmarks for decode and disassembly performance.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rvemu_core::{AddressSpace, Attribute};
use rvemu_disassembler::{decode, disassemble_range, Isa};

/// A small rv32gc function: prologue, loop, epilogue, mixed widths.
const RV32GC_CODE: &[u32] = &[
    0xff01_0113, // addi sp,sp,-16
    0x0011_2623, // sw ra,12(sp)
    0x0081_2423, // sw s0,8(sp)
    0x0101_0413, // addi s0,sp,16
    0xfe84_2623, // sw s0,-20(s0)
    0x0000_0013, // nop
    0x02c5_8533, // mul a0,a1,a2
    0x00c5_f553, // fadd.s fa0,fa1,fa2
    0xfeb5_0ce3, // beq a0,a1,-8
    0x8082_1141, // c.addi sp,-16 ; c.jr ra
];

fn load(words: &[u32], repeat: usize) -> (AddressSpace, u64) {
    let size = (words.len() * 4 * repeat) as u64;
    let mut mem = AddressSpace::new();
    let _ = mem.add_chunk("text", 0x1000, size, Attribute::RX);
    let mut adr = 0x1000;
    for _ in 0..repeat {
        for &w in words {
            mem.write_u32(adr, w);
            adr += 4;
        }
    }
    (mem, size)
}

fn bench_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode");

    for name in ["rv32gc", "rv64gc"] {
        let Ok(isa) = Isa::from_name(name) else { continue };

        group.bench_function(BenchmarkId::new("indexed", name), |b| {
            b.iter(|| {
                for &w in RV32GC_CODE {
                    let _ = decode(&isa, black_box(w));
                }
            })
        });

        group.bench_function(BenchmarkId::new("linear", name), |b| {
            b.iter(|| {
                for &w in RV32GC_CODE {
                    let _ = isa.lookup_linear(black_box(w));
                }
            })
        });
    }

    group.finish();
}

fn bench_disassembly(c: &mut Criterion) {
    let Ok(isa) = Isa::from_name("rv32gc") else { return };
    let mut group = c.benchmark_group("disassembly");

    for repeat in [16, 256, 1024] {
        let (mem, size) = load(RV32GC_CODE, repeat);
        group.throughput(Throughput::Bytes(size));
        group.bench_with_input(BenchmarkId::new("throughput", size), &mem, |b, mem| {
            b.iter(|| disassemble_range(&isa, black_box(mem), 0x1000, size))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_decode, bench_disassembly);
criterion_main!(benches);
