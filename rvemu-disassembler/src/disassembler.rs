//! Main disassembler logic

use crate::decoder::decode;
use crate::formatter::{comment, format};
use crate::isa::Isa;
use rvemu_core::{Address, AddressSpace};
use serde::Serialize;
use std::fmt;
use tracing::trace;

/// One disassembled instruction.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Disassembly {
    /// Address and encoding, e.g. `00000010: 00112623`
    pub dump: String,
    /// Symbol defined at this address, or empty
    pub symbol: String,
    /// Assembly text, `?` when nothing matched
    pub instruction: String,
    /// Target symbol of a branch or jump, or empty
    pub comment: String,
    /// Bytes consumed
    pub length: usize,
}

impl fmt::Display for Disassembly {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:<16} {:>8} {:<13}", self.dump, self.symbol, self.instruction)?;
        if !self.comment.is_empty() {
            write!(f, " ; {}", self.comment)?;
        }
        Ok(())
    }
}

fn dump(adr: Address, ins: u32, len: usize) -> String {
    if len == 2 {
        format!("{:08x}: {:04x}", adr, ins & 0xffff)
    } else {
        format!("{:08x}: {:08x}", adr, ins)
    }
}

/// Disassemble the instruction at `adr`.
///
/// Fetch faults are ignored: whatever word the fetch returns is decoded. A
/// word that matches no entry, or hits a reserved encoding, disassembles as
/// `?` with length [`Isa::min_width`].
pub fn disassemble(isa: &Isa, mem: &AddressSpace, adr: Address) -> Disassembly {
    let (ins, _) = mem.read_ins(adr);
    let symbol = mem.symbols().get(adr).unwrap_or_default().to_string();
    match decode(isa, ins) {
        Ok(i) => {
            let length = i.len as usize;
            Disassembly {
                dump: dump(adr, ins, length),
                symbol,
                instruction: format(&i, adr, isa.xlen()),
                comment: comment(&i, adr, isa.xlen(), mem.symbols()),
                length,
            }
        }
        Err(err) => {
            trace!(adr = format_args!("{:#x}", adr), %err, "undecodable word");
            let length = isa.min_width();
            Disassembly {
                dump: dump(adr, ins, length),
                symbol,
                instruction: "?".to_string(),
                comment: String::new(),
                length,
            }
        }
    }
}

/// Disassemble consecutive instructions covering `[start, start + len)`.
pub fn disassemble_range(isa: &Isa, mem: &AddressSpace, start: Address, len: u64) -> Vec<Disassembly> {
    let end = start.saturating_add(len);
    let mut out = Vec::new();
    let mut adr = start;
    while adr < end {
        let d = disassemble(isa, mem, adr);
        adr = adr.saturating_add(d.length as u64);
        out.push(d);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use rvemu_core::Attribute;

    fn setup(words: &[(Address, u32)]) -> (Isa, AddressSpace) {
        let isa = Isa::from_name("rv32gc").unwrap();
        let mut mem = AddressSpace::new();
        mem.add_chunk("text", 0, 0x100, Attribute::RX).unwrap();
        for &(adr, w) in words {
            mem.write_u32(adr, w);
        }
        (isa, mem)
    }

    #[test]
    fn test_disassemble_nop() {
        let (isa, mem) = setup(&[(0, 0x0000_0013)]);
        let d = disassemble(&isa, &mem, 0);
        assert_eq!(d.dump, "00000000: 00000013");
        assert_eq!(d.instruction, "nop");
        assert_eq!(d.length, 4);
        assert!(d.comment.is_empty());
    }

    #[test]
    fn test_compressed_dump_width() {
        // c.addi sp,-16 followed by c.jr ra
        let (isa, mem) = setup(&[(0x10, 0x8082_1141)]);
        let d = disassemble(&isa, &mem, 0x10);
        assert_eq!(d.dump, "00000010: 1141");
        assert_eq!(d.instruction, "addi sp,sp,-16");
        assert_eq!(d.length, 2);
        let d = disassemble(&isa, &mem, 0x12);
        assert_eq!(d.instruction, "ret");
    }

    #[test]
    fn test_unknown_word() {
        let (isa, mem) = setup(&[]);
        let d = disassemble(&isa, &mem, 0x20);
        assert_eq!(d.instruction, "?");
        assert_eq!(d.length, 2);
        assert_eq!(d.dump, "00000020: ffff");
    }

    #[test]
    fn test_symbol_and_comment() {
        // 0x10: beqz a0,0x20
        let (isa, mut mem) = setup(&[(0x10, 0x0005_0863)]);
        mem.add_symbol(0x10, "loop");
        mem.add_symbol(0x20, "done");
        let d = disassemble(&isa, &mem, 0x10);
        assert_eq!(d.symbol, "loop");
        assert_eq!(d.instruction, "beqz a0,20");
        assert_eq!(d.comment, "done");
    }

    #[test]
    fn test_display_layout() {
        let d = Disassembly {
            dump: "00000010: 0005".to_string(),
            symbol: "".to_string(),
            instruction: "beqz a0,20".to_string(),
            comment: "done".to_string(),
            length: 4,
        };
        assert_eq!(d.to_string(), format!("{:<16} {:>8} {:<13} ; done", "00000010: 0005", "", "beqz a0,20"));

        let plain = Disassembly { comment: String::new(), ..d };
        assert!(!plain.to_string().contains(';'));
    }

    #[test]
    fn test_range_walks_mixed_widths() {
        let (isa, mem) = setup(&[(0, 0x8082_1141), (4, 0x0000_0013)]);
        let lines = disassemble_range(&isa, &mem, 0, 8);
        let lengths: Vec<usize> = lines.iter().map(|d| d.length).collect();
        assert_eq!(lengths, vec![2, 2, 4]);
    }
}
