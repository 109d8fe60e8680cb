//! Differential check of the disassembler against a loaded reference dump

use rvemu_core::{Address, AddressSpace};
use rvemu_disassembler::{disassemble, Disassembly, Isa};
use serde::Serialize;
use std::fmt;
use tracing::debug;

/// One decoded instruction paired with the reference text for its address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Comparison {
    pub address: Address,
    pub disassembly: Disassembly,
    /// Reference text, empty when the dump had nothing at this address
    pub reference: String,
}

impl Comparison {
    pub fn is_match(&self) -> bool {
        self.disassembly.instruction == self.reference
    }
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_match() {
            write!(f, "{}", self.disassembly)
        } else {
            write!(f, "{} should be: \"{}\"", self.disassembly, self.reference)
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Report {
    pub lines: Vec<Comparison>,
}

impl Report {
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn mismatches(&self) -> impl Iterator<Item = &Comparison> {
        self.lines.iter().filter(|c| !c.is_match())
    }

    pub fn mismatch_count(&self) -> usize {
        self.mismatches().count()
    }

    /// True when every decoded instruction matched its reference.
    pub fn is_clean(&self) -> bool {
        self.mismatches().next().is_none()
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in &self.lines {
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}

/// Disassemble from `start` until an undecodable word, comparing each
/// instruction with the reference text attached to `mem`.
pub fn compare(isa: &Isa, mem: &AddressSpace, start: Address) -> Report {
    let mut report = Report::default();
    let mut adr = start;
    loop {
        let disassembly = disassemble(isa, mem, adr);
        if disassembly.instruction == "?" {
            debug!(adr = format_args!("{:#x}", adr), "end of decodable code");
            break;
        }
        let length = disassembly.length as u64;
        let reference = mem.disassembly(adr).unwrap_or_default().to_string();
        report.lines.push(Comparison {
            address: adr,
            disassembly,
            reference,
        });
        match adr.checked_add(length) {
            Some(next) => adr = next,
            None => break,
        }
    }
    report
}
