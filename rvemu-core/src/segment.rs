//! Memory segments
//!
//! A [`Segment`] is a contiguous, independently permissioned region of the
//! address space. It is either a backed [`Chunk`] or an [`Empty`] region that
//! owns no storage. Both report faults the same way; an empty region adds
//! [`Exception::EMPTY`] to every access.

use crate::error::{MemoryError, Result};
use crate::{Address, Attribute, Exception, FETCH_ALIGN, FETCH_BYTES};

/// A little-endian machine word of 8, 16, 32 or 64 bits.
pub trait Word: Copy + Sized {
    /// Width in bytes.
    const BYTES: u64;
    /// All-ones value returned by a faulting read.
    const SENTINEL: Self;

    fn from_le_slice(bytes: &[u8]) -> Self;
    fn write_le_slice(self, bytes: &mut [u8]);
}

macro_rules! impl_word {
    ($($ty:ty),*) => {$(
        impl Word for $ty {
            const BYTES: u64 = std::mem::size_of::<$ty>() as u64;
            const SENTINEL: Self = <$ty>::MAX;

            #[inline]
            fn from_le_slice(bytes: &[u8]) -> Self {
                let mut buf = [0u8; std::mem::size_of::<$ty>()];
                buf.copy_from_slice(bytes);
                <$ty>::from_le_bytes(buf)
            }

            #[inline]
            fn write_le_slice(self, bytes: &mut [u8]) {
                bytes.copy_from_slice(&self.to_le_bytes());
            }
        }
    )*};
}

impl_word!(u8, u16, u32, u64);

// ============================================================================
// Fault computation
// ============================================================================

#[inline]
fn misaligned(adr: Address, align: u64) -> bool {
    adr & (align - 1) != 0
}

/// Faults of a data read with the given alignment.
pub(crate) fn read_fault(adr: Address, attr: Attribute, align: u64) -> Exception {
    let mut ex = Exception::empty();
    if !attr.contains(Attribute::R) {
        ex |= Exception::READ;
    }
    if misaligned(adr, align) {
        ex |= Exception::ALIGN;
    }
    ex
}

/// Faults of a data write with the given alignment.
pub(crate) fn write_fault(adr: Address, attr: Attribute, align: u64) -> Exception {
    let mut ex = Exception::empty();
    if !attr.contains(Attribute::W) {
        ex |= Exception::WRITE;
    }
    if misaligned(adr, align) {
        ex |= Exception::ALIGN;
    }
    ex
}

/// Faults of an instruction fetch.
pub(crate) fn fetch_fault(adr: Address, attr: Attribute) -> Exception {
    let mut ex = read_fault(adr, attr, FETCH_ALIGN);
    if !attr.contains(Attribute::X) {
        ex |= Exception::EXEC;
    }
    ex
}

/// True when a halfword is a 16-bit (compressed) encoding.
#[inline]
pub(crate) fn is_compressed(half: u16) -> bool {
    half & 0b11 != 0b11
}

// ============================================================================
// Region bookkeeping
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
struct Region {
    name: String,
    attr: Attribute,
    start: Address,
    end: Address,
}

impl Region {
    fn new(name: &str, start: Address, size: u64, attr: Attribute) -> Result<Self> {
        if size == 0 {
            return Err(MemoryError::ZeroSize { start });
        }
        let end = start
            .checked_add(size - 1)
            .ok_or(MemoryError::AddressOverflow { start, size })?;
        Ok(Self {
            name: name.to_string(),
            attr,
            start,
            end,
        })
    }

    #[inline]
    fn contains(&self, adr: Address, size: u64) -> bool {
        match adr.checked_add(size - 1) {
            Some(last) => adr >= self.start && last <= self.end,
            None => false,
        }
    }
}

// ============================================================================
// Chunk
// ============================================================================

/// A backed chunk of memory, initialised to all ones.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    region: Region,
    mem: Vec<u8>,
}

impl Chunk {
    pub fn new(name: &str, start: Address, size: u64, attr: Attribute) -> Result<Self> {
        let region = Region::new(name, start, size, attr)?;
        let len = usize::try_from(size).map_err(|_| MemoryError::Allocation { size })?;
        let mut mem = Vec::new();
        mem.try_reserve_exact(len)
            .map_err(|_| MemoryError::Allocation { size })?;
        mem.resize(len, 0xff);
        Ok(Self { region, mem })
    }

    #[inline]
    fn offset(&self, adr: Address) -> usize {
        (adr - self.region.start) as usize
    }

    fn read<W: Word>(&self, adr: Address) -> (W, Exception) {
        let ex = read_fault(adr, self.region.attr, W::BYTES);
        if !ex.is_empty() {
            return (W::SENTINEL, ex);
        }
        let ofs = self.offset(adr);
        (W::from_le_slice(&self.mem[ofs..ofs + W::BYTES as usize]), ex)
    }

    fn write<W: Word>(&mut self, adr: Address, val: W) -> Exception {
        let ofs = self.offset(adr);
        val.write_le_slice(&mut self.mem[ofs..ofs + W::BYTES as usize]);
        write_fault(adr, self.region.attr, W::BYTES)
    }

    fn read_ins(&self, adr: Address) -> (u32, Exception) {
        let ex = fetch_fault(adr, self.region.attr);
        if !ex.is_empty() {
            return (u32::SENTINEL, ex);
        }
        let ofs = self.offset(adr);
        (u32::from_le_slice(&self.mem[ofs..ofs + 4]), ex)
    }

    fn read_ins_half(&self, adr: Address) -> (u32, Exception) {
        let ex = fetch_fault(adr, self.region.attr);
        if !ex.is_empty() {
            return (u32::SENTINEL, ex);
        }
        let ofs = self.offset(adr);
        let half = u16::from_le_slice(&self.mem[ofs..ofs + 2]);
        if is_compressed(half) {
            (half as u32, ex)
        } else {
            // a 32-bit encoding running off the end of the segment
            (u32::SENTINEL, Exception::EMPTY)
        }
    }

    /// Backing bytes of the chunk.
    pub fn bytes(&self) -> &[u8] {
        &self.mem
    }
}

// ============================================================================
// Empty
// ============================================================================

/// An address range with no backing storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Empty {
    region: Region,
}

impl Empty {
    pub fn new(name: &str, start: Address, size: u64, attr: Attribute) -> Result<Self> {
        Ok(Self {
            region: Region::new(name, start, size, attr)?,
        })
    }
}

// ============================================================================
// Segment
// ============================================================================

/// A contiguous region of the address space.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Chunk(Chunk),
    Empty(Empty),
}

impl Segment {
    fn region(&self) -> &Region {
        match self {
            Segment::Chunk(c) => &c.region,
            Segment::Empty(e) => &e.region,
        }
    }

    pub fn name(&self) -> &str {
        &self.region().name
    }

    pub fn start(&self) -> Address {
        self.region().start
    }

    /// Last address of the segment (inclusive).
    pub fn end(&self) -> Address {
        self.region().end
    }

    pub fn size(&self) -> u64 {
        self.end() - self.start() + 1
    }

    pub fn attr(&self) -> Attribute {
        self.region().attr
    }

    pub fn is_empty_region(&self) -> bool {
        matches!(self, Segment::Empty(_))
    }

    /// True if `[adr, adr + size)` lies entirely within the segment.
    #[inline]
    pub fn contains(&self, adr: Address, size: u64) -> bool {
        size > 0 && self.region().contains(adr, size)
    }

    /// True if the two segments share at least one address.
    pub fn overlaps(&self, other: &Segment) -> bool {
        self.start() <= other.end() && other.start() <= self.end()
    }

    /// Read a word. Faulting reads return [`Word::SENTINEL`].
    pub fn read<W: Word>(&self, adr: Address) -> (W, Exception) {
        let attr = self.attr();
        if !self.contains(adr, W::BYTES) {
            return (W::SENTINEL, read_fault(adr, attr, W::BYTES) | Exception::EMPTY);
        }
        match self {
            Segment::Chunk(c) => c.read(adr),
            Segment::Empty(_) => (W::SENTINEL, read_fault(adr, attr, W::BYTES) | Exception::EMPTY),
        }
    }

    /// Write a word. A chunk stores the value even when a fault is reported.
    pub fn write<W: Word>(&mut self, adr: Address, val: W) -> Exception {
        let attr = self.attr();
        if !self.contains(adr, W::BYTES) {
            return write_fault(adr, attr, W::BYTES) | Exception::EMPTY;
        }
        match self {
            Segment::Chunk(c) => c.write(adr, val),
            Segment::Empty(_) => write_fault(adr, attr, W::BYTES) | Exception::EMPTY,
        }
    }

    /// Faults a write of `W` at `adr` would report, without storing.
    pub fn write_check<W: Word>(&self, adr: Address) -> Exception {
        let ex = write_fault(adr, self.attr(), W::BYTES);
        match self {
            Segment::Chunk(_) if self.contains(adr, W::BYTES) => ex,
            _ => ex | Exception::EMPTY,
        }
    }

    /// Fetch a 32-bit instruction word with halfword alignment.
    ///
    /// In the final halfword of a segment only a 16-bit encoding can be
    /// fetched; it is returned zero-extended.
    pub fn read_ins(&self, adr: Address) -> (u32, Exception) {
        let attr = self.attr();
        match self {
            Segment::Chunk(c) if self.contains(adr, FETCH_BYTES) => c.read_ins(adr),
            Segment::Chunk(c) if self.contains(adr, 2) => c.read_ins_half(adr),
            _ => (u32::SENTINEL, fetch_fault(adr, attr) | Exception::EMPTY),
        }
    }
}

impl From<Chunk> for Segment {
    fn from(chunk: Chunk) -> Self {
        Segment::Chunk(chunk)
    }
}

impl From<Empty> for Segment {
    fn from(empty: Empty) -> Self {
        Segment::Empty(empty)
    }
}
