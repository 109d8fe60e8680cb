//! Segmented address space
//!
//! Accesses are routed to the first segment that fully contains them. An
//! access no segment contains is resolved against a phantom, always-empty
//! RWX segment, so it reports [`Exception::EMPTY`] plus [`Exception::ALIGN`]
//! when misaligned and nothing else.

use crate::error::{MemoryError, Result};
use crate::segment::{fetch_fault, read_fault, write_fault, Word};
use crate::{Address, Attribute, Chunk, Empty, Exception, Segment, SymbolTable, FETCH_BYTES};
use std::collections::BTreeMap;
use std::fmt::Write as _;
use tracing::trace;

/// Physical memory as a list of disjoint segments, plus the symbol table and
/// reference disassembly attached by loaders.
#[derive(Debug, Clone, Default)]
pub struct AddressSpace {
    segments: Vec<Segment>,
    symbols: SymbolTable,
    reference: BTreeMap<Address, String>,
}

impl AddressSpace {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a segment. Overlapping an existing segment is an error and leaves
    /// the address space unchanged.
    pub fn add(&mut self, seg: impl Into<Segment>) -> Result<()> {
        let seg = seg.into();
        if let Some(existing) = self.segments.iter().find(|s| s.overlaps(&seg)) {
            return Err(MemoryError::Overlap {
                name: seg.name().to_string(),
                start: seg.start(),
                end: seg.end(),
                existing: existing.name().to_string(),
                existing_start: existing.start(),
                existing_end: existing.end(),
            });
        }
        self.segments.push(seg);
        Ok(())
    }

    /// Add a backed chunk initialised to `0xff`.
    pub fn add_chunk(&mut self, name: &str, start: Address, size: u64, attr: Attribute) -> Result<()> {
        self.add(Chunk::new(name, start, size, attr)?)
    }

    /// Add an unbacked region.
    pub fn add_empty(&mut self, name: &str, start: Address, size: u64, attr: Attribute) -> Result<()> {
        self.add(Empty::new(name, start, size, attr)?)
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// First segment containing `[adr, adr + size)`.
    pub fn find(&self, adr: Address, size: u64) -> Option<&Segment> {
        self.segments.iter().find(|s| s.contains(adr, size))
    }

    fn find_mut(&mut self, adr: Address, size: u64) -> Option<&mut Segment> {
        self.segments.iter_mut().find(|s| s.contains(adr, size))
    }

    // ========================================================================
    // Access
    // ========================================================================

    pub fn read<W: Word>(&self, adr: Address) -> (W, Exception) {
        match self.find(adr, W::BYTES) {
            Some(seg) => seg.read(adr),
            None => {
                trace!(adr = format_args!("{:#x}", adr), bytes = W::BYTES, "read from unmapped memory");
                (W::SENTINEL, read_fault(adr, Attribute::RWX, W::BYTES) | Exception::EMPTY)
            }
        }
    }

    pub fn write<W: Word>(&mut self, adr: Address, val: W) -> Exception {
        match self.find_mut(adr, W::BYTES) {
            Some(seg) => seg.write(adr, val),
            None => {
                trace!(adr = format_args!("{:#x}", adr), bytes = W::BYTES, "write to unmapped memory");
                write_fault(adr, Attribute::RWX, W::BYTES) | Exception::EMPTY
            }
        }
    }

    /// Faults [`write`](Self::write) would report at `adr`. Memory is not
    /// modified.
    pub fn write_check<W: Word>(&self, adr: Address) -> Exception {
        match self.find(adr, W::BYTES) {
            Some(seg) => seg.write_check::<W>(adr),
            None => write_fault(adr, Attribute::RWX, W::BYTES) | Exception::EMPTY,
        }
    }

    /// Fetch an instruction word. A segment holding only the final halfword
    /// can still supply a 16-bit encoding.
    pub fn read_ins(&self, adr: Address) -> (u32, Exception) {
        match self.find(adr, FETCH_BYTES).or_else(|| self.find(adr, 2)) {
            Some(seg) => seg.read_ins(adr),
            None => {
                trace!(adr = format_args!("{:#x}", adr), "fetch from unmapped memory");
                (u32::SENTINEL, fetch_fault(adr, Attribute::RWX) | Exception::EMPTY)
            }
        }
    }

    pub fn read_u8(&self, adr: Address) -> (u8, Exception) {
        self.read(adr)
    }

    pub fn read_u16(&self, adr: Address) -> (u16, Exception) {
        self.read(adr)
    }

    pub fn read_u32(&self, adr: Address) -> (u32, Exception) {
        self.read(adr)
    }

    pub fn read_u64(&self, adr: Address) -> (u64, Exception) {
        self.read(adr)
    }

    pub fn write_u8(&mut self, adr: Address, val: u8) -> Exception {
        self.write(adr, val)
    }

    pub fn write_u16(&mut self, adr: Address, val: u16) -> Exception {
        self.write(adr, val)
    }

    pub fn write_u32(&mut self, adr: Address, val: u32) -> Exception {
        self.write(adr, val)
    }

    pub fn write_u64(&mut self, adr: Address, val: u64) -> Exception {
        self.write(adr, val)
    }

    /// Store a byte image starting at `adr`. Returns the union of the
    /// per-byte faults.
    pub fn load(&mut self, adr: Address, bytes: &[u8]) -> Exception {
        bytes.iter().enumerate().fold(Exception::empty(), |ex, (i, b)| {
            ex | self.write_u8(adr.wrapping_add(i as u64), *b)
        })
    }

    // ========================================================================
    // Attachments
    // ========================================================================

    pub fn add_symbol(&mut self, adr: Address, name: impl Into<String>) {
        self.symbols.insert(adr, name);
    }

    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    /// Attach reference disassembly text for `adr`.
    pub fn add_disassembly(&mut self, adr: Address, text: impl Into<String>) {
        self.reference.insert(adr, text.into());
    }

    pub fn disassembly(&self, adr: Address) -> Option<&str> {
        self.reference.get(&adr).map(String::as_str)
    }

    pub fn reference_len(&self) -> usize {
        self.reference.len()
    }

    // ========================================================================
    // Listings
    // ========================================================================

    /// One line per segment: name, range, size, attributes and kind.
    pub fn memory_map(&self) -> String {
        let mut s = String::new();
        for seg in &self.segments {
            let kind = if seg.is_empty_region() { "empty" } else { "chunk" };
            let _ = writeln!(
                s,
                "{:<8} {:016x} {:016x} {:>10x} {} {}",
                seg.name(),
                seg.start(),
                seg.end(),
                seg.size(),
                seg.attr(),
                kind
            );
        }
        s
    }

    /// Hex dump of `len` bytes from `adr`, 16 per line. Unreadable bytes
    /// show as `??`.
    pub fn display(&self, adr: Address, len: u64) -> String {
        let mut s = String::new();
        let mut line = adr;
        let end = adr.saturating_add(len);
        while line < end {
            let _ = write!(s, "{:016x} ", line);
            let mut ascii = String::with_capacity(16);
            for a in line..line.saturating_add(16) {
                if a >= end {
                    s.push_str("   ");
                    continue;
                }
                let (b, ex) = self.read_u8(a);
                if ex.is_empty() {
                    let _ = write!(s, " {:02x}", b);
                    ascii.push(if b.is_ascii_graphic() || b == b' ' { b as char } else { '.' });
                } else {
                    s.push_str(" ??");
                    ascii.push('.');
                }
            }
            let _ = writeln!(s, "  {}", ascii);
            line = line.saturating_add(16);
            if line == Address::MAX {
                break;
            }
        }
        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn space() -> AddressSpace {
        let mut mem = AddressSpace::new();
        mem.add_chunk("rom", 0x0, 0x100, Attribute::RX).unwrap();
        mem.add_chunk("ram", 0x1000, 0x100, Attribute::RW).unwrap();
        mem.add_empty("io", 0x2000, 0x10, Attribute::RW).unwrap();
        mem
    }

    #[test]
    fn test_routing() {
        let mut mem = space();
        assert!(mem.write_u32(0x1000, 0x1234_5678).is_ok());
        assert_eq!(mem.read_u32(0x1000), (0x1234_5678, Exception::empty()));
        assert_eq!(mem.find(0x1000, 4).map(|s| s.name()), Some("ram"));
        assert!(mem.find(0x10fe, 4).is_none());
    }

    #[test]
    fn test_write_check_leaves_memory() {
        let mem = space();
        assert_eq!(mem.write_check::<u32>(0x10), Exception::WRITE);
        assert!(mem.write_check::<u32>(0x1010).is_ok());
        assert_eq!(mem.write_check::<u16>(0x2000), Exception::EMPTY);
        assert_eq!(mem.write_check::<u32>(0x5002), Exception::EMPTY | Exception::ALIGN);
        assert_eq!(mem.read_u32(0x10).0, u32::MAX);
    }

    #[test]
    fn test_unmapped_faults() {
        let mut mem = space();
        assert_eq!(mem.read_u64(0x5000), (u64::MAX, Exception::EMPTY));
        assert_eq!(mem.read_u16(0x5001), (u16::MAX, Exception::EMPTY | Exception::ALIGN));
        assert_eq!(mem.write_u8(0x5001, 1), Exception::EMPTY);
        assert_eq!(mem.read_ins(0x5002), (u32::MAX, Exception::EMPTY));
        assert_eq!(mem.read_ins(0x5001), (u32::MAX, Exception::EMPTY | Exception::ALIGN));
    }

    #[test]
    fn test_straddling_access_is_unmapped() {
        let mem = space();
        // last two bytes of ram plus two unmapped bytes
        assert_eq!(mem.read_u32(0x10fe).1, Exception::EMPTY | Exception::ALIGN);
    }

    #[test]
    fn test_overlap_rejected() {
        let mut mem = space();
        let err = mem.add_chunk("bad", 0x10f0, 0x20, Attribute::RW).unwrap_err();
        assert!(matches!(err, MemoryError::Overlap { ref existing, .. } if existing == "ram"));
        assert_eq!(mem.segments().len(), 3);
    }

    #[test]
    fn test_adjacent_segments_allowed() {
        let mut mem = space();
        assert!(mem.add_chunk("ram2", 0x1100, 0x100, Attribute::RW).is_ok());
        assert_eq!(mem.segments().len(), 4);
    }

    #[test]
    fn test_fetch_final_halfword() {
        let mut mem = AddressSpace::new();
        mem.add_chunk("rom", 0, 0x6, Attribute::RWX).unwrap();
        mem.write_u32(0, 0x0000_0013);
        mem.write_u16(4, 0x0001);
        assert_eq!(mem.read_ins(0), (0x13, Exception::empty()));
        assert_eq!(mem.read_ins(4), (0x0001, Exception::empty()));
    }

    #[test]
    fn test_load_reports_union() {
        let mut mem = space();
        assert!(mem.load(0x1000, &[1, 2, 3, 4]).is_ok());
        assert_eq!(mem.read_u32(0x1000).0, 0x0403_0201);
        assert_eq!(mem.load(0x10ff, &[9, 9]), Exception::EMPTY);
        assert_eq!(mem.load(0x0, &[9]), Exception::WRITE);
        // wraps past the top of the address space without panicking
        assert_eq!(mem.load(u64::MAX, &[9, 9]), Exception::EMPTY);
    }

    #[test]
    fn test_attachments() {
        let mut mem = space();
        mem.add_symbol(0x10, "main");
        mem.add_disassembly(0x10, "addi sp,sp,-16");
        assert_eq!(mem.symbols().get(0x10), Some("main"));
        assert_eq!(mem.disassembly(0x10), Some("addi sp,sp,-16"));
        assert_eq!(mem.disassembly(0x14), None);
    }

    #[test]
    fn test_memory_map_lists_segments() {
        let map = space().memory_map();
        assert_eq!(map.lines().count(), 3);
        assert!(map.contains("ram"));
        assert!(map.contains("rw- chunk"));
        assert!(map.contains("rw- empty"));
    }

    #[test]
    fn test_display() {
        let mut mem = space();
        mem.load(0x1000, b"Hi");
        let dump = mem.display(0x1000, 4);
        assert!(dump.starts_with("0000000000001000  48 69 ff ff"));
        assert!(dump.contains("Hi"));
        let hole = mem.display(0x2000, 2);
        assert!(hole.contains("?? ??"));
    }
}
