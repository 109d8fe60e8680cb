//! Instruction decoder

use crate::error::DecodeError;
use crate::instruction::Instruction;
use crate::isa::{Isa, IsaEntry};

/// Decode an instruction word against `isa`.
///
/// For a 16-bit encoding only the low halfword of `ins` is significant.
pub fn decode(isa: &Isa, ins: u32) -> Result<Instruction, DecodeError> {
    let e = isa.lookup(ins).ok_or(DecodeError::NoMatch(ins))?;
    decode_entry(isa, e, ins)
}

/// Decode `ins` with an entry already known to match it.
pub fn decode_entry(isa: &Isa, e: &IsaEntry, ins: u32) -> Result<Instruction, DecodeError> {
    let reserved = || DecodeError::Reserved {
        mnemonic: e.entry.mnemonic.to_string(),
        ins,
    };
    let i = e.entry.format.decode(e.entry.op, ins, isa.xlen()).ok_or_else(reserved)?;
    // rounding modes 5 and 6 are reserved
    if i.op.has_rm() && matches!(i.rm, 5 | 6) {
        return Err(reserved());
    }
    Ok(i)
}
