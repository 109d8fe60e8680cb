//! # ISA registry
//!
//! An [`Isa`] is the ordered concatenation of the entries of its extension
//! sets. A word is decoded by the first entry that matches it, so entries
//! must be unambiguous: [`IsaBuilder::add`] rejects any entry that can match
//! the same word as an entry already present.
//!
//! ## Dispatch index
//!
//! The built ISA groups entry indices into buckets keyed on the major
//! opcode (`ins[6:0]`) of 32-bit words, or the quadrant and funct3
//! (`ins[1:0]`, `ins[15:13]`) of 16-bit words. An entry is placed in every
//! bucket whose key bits it can match, in table order, so scanning one
//! bucket gives exactly the result of scanning the whole table.

use crate::error::{IsaError, Result};
use crate::tables::{
    Entry, ExtensionSet, RV32A, RV32C, RV32D, RV32F, RV32I, RV32M, RV64A, RV64C, RV64D, RV64F,
    RV64I, RV64M,
};
use rvemu_core::Xlen;
use std::borrow::Cow;
use tracing::info;

const BUCKETS_32: usize = 128;
const BUCKETS: usize = BUCKETS_32 + 32;

/// Key bits of a 16-bit word: quadrant and funct3.
const KEY_MASK_16: u32 = 0xe003;
/// Key bits of a 32-bit word: major opcode.
const KEY_MASK_32: u32 = 0x7f;

/// A table entry tagged with the extension set it came from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IsaEntry {
    pub entry: Entry,
    pub ext: Cow<'static, str>,
}

/// Bucket of an instruction word.
#[inline]
fn bucket(ins: u32) -> usize {
    if ins & 3 == 3 {
        (ins & KEY_MASK_32) as usize
    } else {
        BUCKETS_32 + (((ins & 3) << 3) | ((ins >> 13) & 7)) as usize
    }
}

/// Representative key bits of a bucket, and which bits are significant.
fn bucket_pattern(key: usize) -> Option<(u32, u32)> {
    if key < BUCKETS_32 {
        let k = key as u32;
        (k & 3 == 3).then_some((k, KEY_MASK_32))
    } else {
        let k = (key - BUCKETS_32) as u32;
        let quadrant = k >> 3;
        let funct3 = k & 7;
        (quadrant != 3).then_some((quadrant | (funct3 << 13), KEY_MASK_16))
    }
}

/// Builds an [`Isa`] one batch of extension sets at a time.
#[derive(Debug, Clone)]
pub struct IsaBuilder {
    name: String,
    xlen: Xlen,
    entries: Vec<IsaEntry>,
}

impl IsaBuilder {
    pub fn new(name: &str, xlen: Xlen) -> Self {
        Self {
            name: name.to_string(),
            xlen,
            entries: Vec::new(),
        }
    }

    /// Append extension sets. Every new entry is checked against the
    /// entries already present and those earlier in this batch; on conflict
    /// nothing is added. Entries are copied, so the sets need not outlive
    /// the builder.
    pub fn add(&mut self, sets: &[&ExtensionSet]) -> Result<()> {
        let mut batch: Vec<IsaEntry> = Vec::new();
        for set in sets {
            for entry in set.entries() {
                let existing = self.entries.iter().chain(batch.iter()).find(|e| e.entry.conflicts_with(entry));
                if let Some(existing) = existing {
                    return Err(IsaError::Conflict {
                        new: entry.mnemonic.to_string(),
                        new_ext: set.name.to_string(),
                        existing: existing.entry.mnemonic.to_string(),
                        existing_ext: existing.ext.to_string(),
                    });
                }
                batch.push(IsaEntry {
                    entry: entry.clone(),
                    ext: set.name.clone(),
                });
            }
        }
        self.entries.extend(batch);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Freeze the entry list and build the dispatch index.
    pub fn build(self) -> Isa {
        let mut index: Vec<Vec<u16>> = vec![Vec::new(); BUCKETS];
        for (key, slot) in index.iter_mut().enumerate() {
            let Some((pattern, key_mask)) = bucket_pattern(key) else {
                continue;
            };
            for (i, e) in self.entries.iter().enumerate() {
                let m = e.entry.mask & key_mask;
                if pattern & m == e.entry.val & m {
                    slot.push(i as u16);
                }
            }
        }
        let min_width = if self.entries.iter().any(|e| e.entry.width() == 2) { 2 } else { 4 };
        info!(isa = %self.name, entries = self.entries.len(), "built ISA");
        Isa {
            name: self.name,
            xlen: self.xlen,
            entries: self.entries,
            index,
            min_width,
        }
    }
}

/// An immutable instruction set ready for decoding.
#[derive(Debug, Clone)]
pub struct Isa {
    name: String,
    xlen: Xlen,
    entries: Vec<IsaEntry>,
    index: Vec<Vec<u16>>,
    min_width: usize,
}

impl Isa {
    /// Build one of the standard ISAs by name, e.g. `rv32gc` or `rv64imac`.
    pub fn from_name(name: &str) -> Result<Self> {
        let lower = name.to_ascii_lowercase();
        let (xlen, sets): (Xlen, Vec<&'static ExtensionSet>) = match lower.as_str() {
            "rv32i" => (Xlen::Rv32, vec![&RV32I]),
            "rv32im" => (Xlen::Rv32, vec![&RV32I, &RV32M]),
            "rv32imac" => (Xlen::Rv32, vec![&RV32I, &RV32M, &RV32A, &RV32C]),
            "rv32g" => (Xlen::Rv32, vec![&RV32I, &RV32M, &RV32A, &RV32F, &RV32D]),
            "rv32gc" => (Xlen::Rv32, vec![&RV32I, &RV32M, &RV32A, &RV32F, &RV32D, &RV32C]),
            "rv64i" => (Xlen::Rv64, vec![&RV64I]),
            "rv64im" => (Xlen::Rv64, vec![&RV64I, &RV32M, &RV64M]),
            "rv64imac" => (Xlen::Rv64, vec![&RV64I, &RV32M, &RV64M, &RV32A, &RV64A, &RV64C]),
            "rv64g" => (
                Xlen::Rv64,
                vec![&RV64I, &RV32M, &RV64M, &RV32A, &RV64A, &RV32F, &RV64F, &RV32D, &RV64D],
            ),
            "rv64gc" => (
                Xlen::Rv64,
                vec![&RV64I, &RV32M, &RV64M, &RV32A, &RV64A, &RV32F, &RV64F, &RV32D, &RV64D, &RV64C],
            ),
            _ => return Err(IsaError::UnknownIsa(name.to_string())),
        };
        let mut builder = IsaBuilder::new(&lower, xlen);
        builder.add(&sets)?;
        Ok(builder.build())
    }

    /// Names accepted by [`Isa::from_name`].
    pub const PRESETS: &'static [&'static str] = &[
        "rv32i", "rv32im", "rv32imac", "rv32g", "rv32gc", "rv64i", "rv64im", "rv64imac", "rv64g",
        "rv64gc",
    ];

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn xlen(&self) -> Xlen {
        self.xlen
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[IsaEntry] {
        &self.entries
    }

    /// Smallest instruction width in bytes: 2 with compressed entries, else 4.
    pub fn min_width(&self) -> usize {
        self.min_width
    }

    /// True if any entry comes from the named extension set.
    pub fn has_extension(&self, ext: &str) -> bool {
        self.entries.iter().any(|e| e.ext == ext)
    }

    /// First entry matching `ins`.
    pub fn lookup(&self, ins: u32) -> Option<&IsaEntry> {
        self.index[bucket(ins)]
            .iter()
            .map(|&i| &self.entries[i as usize])
            .find(|e| e.entry.matches(ins))
    }

    /// First entry matching `ins`, by linear scan of the whole table.
    pub fn lookup_linear(&self, ins: u32) -> Option<&IsaEntry> {
        self.entries.iter().find(|e| e.entry.matches(ins))
    }
}
