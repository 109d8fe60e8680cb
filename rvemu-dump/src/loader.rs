//! Reference dump loader
//!
//! Reads `objdump -d` style listings:
//!
//! ```text
//! 00000000 <main>:
//!    0:   00000013    nop
//!    4:   4501        li  a0,0
//!    6:   0040006f    j   a <main+0xa>  # comment
//! ```
//!
//! Symbol lines attach a name to an address. Instruction lines store the
//! encoding (8 hex digits for 32 bits, 4 for 16 bits) and keep the assembly
//! text up to the first `#` or `<` field as the reference disassembly.

use crate::error::{DumpError, Result};
use crate::lexer::lines;
use rvemu_core::{Address, AddressSpace, Exception};
use serde::Serialize;
use std::path::Path;
use tracing::info;

/// One meaningful line of a dump.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Record {
    Symbol {
        address: Address,
        name: String,
    },
    Instruction {
        address: Address,
        word: u32,
        /// Encoding width in bytes (2 or 4)
        width: u8,
        reference: String,
    },
}

impl Record {
    pub fn address(&self) -> Address {
        match self {
            Record::Symbol { address, .. } | Record::Instruction { address, .. } => *address,
        }
    }
}

/// A record and the line it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DumpLine {
    pub line: usize,
    pub record: Record,
}

/// What a load put into memory.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DumpSummary {
    pub symbols: usize,
    pub instructions: usize,
    pub bytes: u64,
    /// Lowest and highest instruction address
    pub range: Option<(Address, Address)>,
}

fn parse_line(line: usize, fields: &[&str]) -> Result<Option<Record>> {
    if fields.len() < 2 {
        return Ok(None);
    }
    let adr_field = fields[0].trim_matches(':');
    let address = Address::from_str_radix(adr_field, 16).map_err(|_| DumpError::InvalidAddress {
        line,
        field: fields[0].to_string(),
    })?;

    if fields.len() == 2 {
        let name = fields[1].trim_matches(|c| matches!(c, '<' | '>' | ':'));
        return Ok(Some(Record::Symbol {
            address,
            name: name.to_string(),
        }));
    }

    let hex = fields[1];
    let width = match hex.len() {
        4 => 2,
        8 => 4,
        n => return Err(DumpError::InvalidWidth { line, width: n }),
    };
    let word = u32::from_str_radix(hex, 16).map_err(|_| DumpError::InvalidWord {
        line,
        field: hex.to_string(),
    })?;
    let reference = fields[2..]
        .iter()
        .take_while(|f| !f.starts_with('#') && !f.starts_with('<'))
        .copied()
        .collect::<Vec<_>>()
        .join(" ");

    Ok(Some(Record::Instruction {
        address,
        word,
        width,
        reference,
    }))
}

/// Parse a dump without touching memory.
pub fn parse(text: &str) -> Result<Vec<DumpLine>> {
    let mut out = Vec::new();
    for (line, fields) in lines(text)? {
        if let Some(record) = parse_line(line, &fields)? {
            out.push(DumpLine { line, record });
        }
    }
    Ok(out)
}

/// Faults storing an instruction record would raise. Encodings are stored
/// byte by byte, since 32-bit instructions may sit on halfword boundaries.
fn store_check(mem: &AddressSpace, address: Address, width: u8) -> Exception {
    (0..width as u64).fold(Exception::empty(), |ex, i| {
        ex | mem.write_check::<u8>(address.wrapping_add(i))
    })
}

/// Parse a dump and apply it to `mem`: encodings are stored, symbols and
/// reference text attached.
///
/// The dump is parsed and every store is checked before anything is
/// written, so on any error `mem` is left untouched.
pub fn load(mem: &mut AddressSpace, text: &str) -> Result<DumpSummary> {
    let records = parse(text)?;
    for DumpLine { line, record } in &records {
        if let Record::Instruction { address, width, .. } = record {
            let ex = store_check(mem, *address, *width);
            if !ex.is_ok() {
                return Err(DumpError::Store {
                    line: *line,
                    address: *address,
                    ex,
                });
            }
        }
    }

    let mut summary = DumpSummary::default();
    for DumpLine { record, .. } in records {
        match record {
            Record::Symbol { address, name } => {
                mem.add_symbol(address, name);
                summary.symbols += 1;
            }
            Record::Instruction {
                address,
                word,
                width,
                reference,
            } => {
                mem.load(address, &word.to_le_bytes()[..width as usize]);
                mem.add_disassembly(address, reference);
                summary.instructions += 1;
                summary.bytes += width as u64;
                summary.range = Some(match summary.range {
                    None => (address, address),
                    Some((lo, hi)) => (lo.min(address), hi.max(address)),
                });
            }
        }
    }

    info!(
        symbols = summary.symbols,
        instructions = summary.instructions,
        bytes = summary.bytes,
        "loaded reference dump"
    );
    Ok(summary)
}

/// [`load`] from a file.
pub fn load_file(mem: &mut AddressSpace, path: impl AsRef<Path>) -> Result<DumpSummary> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|source| DumpError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    load(mem, &text)
}
