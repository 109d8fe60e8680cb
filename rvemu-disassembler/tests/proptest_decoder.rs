//! Property-based tests for the decoder.
//!
//! - The dispatch index finds exactly the entry a full linear scan finds
//! - Decoding is deterministic and never panics
//! - Decoded lengths agree with the low two bits of the word
//! - Disassembly never panics and always advances

use proptest::prelude::*;

use rvemu_core::{AddressSpace, Attribute};
use rvemu_disassembler::{decode, disassemble, format, Isa};

fn isa_strategy() -> impl Strategy<Value = &'static str> {
    prop::sample::select(Isa::PRESETS)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(2000))]

    /// Index lookup agrees with a linear first-match scan.
    #[test]
    fn lookup_matches_linear_scan(name in isa_strategy(), ins in any::<u32>()) {
        let isa = Isa::from_name(name).unwrap();
        prop_assert_eq!(isa.lookup(ins), isa.lookup_linear(ins));
    }

    /// Same word, same result.
    #[test]
    fn decode_is_deterministic(ins in any::<u32>()) {
        let isa = Isa::from_name("rv64gc").unwrap();
        prop_assert_eq!(decode(&isa, ins), decode(&isa, ins));
    }

    /// Compressed words decode to length 2, everything else to 4.
    #[test]
    fn decoded_length_follows_low_bits(name in isa_strategy(), ins in any::<u32>()) {
        let isa = Isa::from_name(name).unwrap();
        if let Ok(i) = decode(&isa, ins) {
            let expected = if ins & 3 == 3 { 4 } else { 2 };
            prop_assert_eq!(i.len, expected);
        }
    }

    /// The upper halfword never affects a 16-bit decode.
    #[test]
    fn compressed_ignores_upper_half(half in any::<u16>(), upper in any::<u16>()) {
        prop_assume!(half & 3 != 3);
        let isa = Isa::from_name("rv32gc").unwrap();
        let a = decode(&isa, half as u32).ok();
        let b = decode(&isa, (half as u32) | ((upper as u32) << 16)).ok();
        prop_assert_eq!(a, b);
    }

    /// Formatting any decoded instruction yields non-empty text.
    #[test]
    fn format_is_total(ins in any::<u32>(), pc in any::<u64>()) {
        let isa = Isa::from_name("rv64gc").unwrap();
        if let Ok(i) = decode(&isa, ins) {
            let text = format(&i, pc & !1, isa.xlen());
            prop_assert!(!text.is_empty());
            prop_assert!(!text.contains(", "));
        }
    }

    /// Disassembly always consumes at least the minimum width.
    #[test]
    fn disassemble_advances(ins in any::<u32>()) {
        let isa = Isa::from_name("rv32gc").unwrap();
        let mut mem = AddressSpace::new();
        mem.add_chunk("text", 0, 0x10, Attribute::RX).unwrap();
        mem.write_u32(0, ins);
        let d = disassemble(&isa, &mem, 0);
        prop_assert!(d.length >= isa.min_width());
        prop_assert!(d.length == 2 || d.length == 4);
    }
}
