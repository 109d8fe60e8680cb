//! # RISC-V Disassembler
//!
//! Instruction tables, the ISA registry that composes them, the decoder and
//! the objdump-compatible formatter.
//!
//! ## Layers
//!
//! - [`tables`]: mask/match entries grouped into extension sets
//! - [`isa`]: an [`Isa`] built from extension sets, validated to be
//!   unambiguous and indexed for fast first-match lookup
//! - [`decoder`]: word to [`Instruction`]
//! - [`formatter`]: [`Instruction`] to assembly text
//! - [`disassembler`]: fetch from an address space and produce a
//!   [`Disassembly`] line
//!
//! ## Example
//!
//! ```rust
//! use rvemu_core::{AddressSpace, Attribute};
//! use rvemu_disassembler::{disassemble, Isa};
//!
//! let isa = Isa::from_name("rv32gc").unwrap();
//! let mut mem = AddressSpace::new();
//! mem.add_chunk("text", 0, 0x20, Attribute::RX).unwrap();
//! mem.write_u32(0, 0x0000_0013);
//!
//! let d = disassemble(&isa, &mem, 0);
//! assert_eq!(d.instruction, "nop");
//! assert_eq!(d.length, 4);
//! ```

pub mod decoder;
pub mod disassembler;
pub mod error;
pub mod format;
pub mod formatter;
pub mod instruction;
pub mod isa;
pub mod op;
pub mod tables;

pub use decoder::decode;
pub use disassembler::{disassemble, disassemble_range, Disassembly};
pub use error::{DecodeError, IsaError, Result};
pub use formatter::format;
pub use instruction::Instruction;
pub use isa::{Isa, IsaBuilder, IsaEntry};
pub use op::{Op, Syntax};
pub use tables::{Entry, ExtensionSet};
