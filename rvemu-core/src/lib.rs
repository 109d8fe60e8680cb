//! # rvemu core
//!
//! Memory and machine-word building blocks shared by the RISC-V decoder and
//! the emulator.
//!
//! ## Key Features
//! - Segmented physical address space (backed chunks and empty regions)
//! - Composable fault model: every access returns a value and an [`Exception`] mask
//! - Per-segment read/write/execute [`Attribute`]s
//! - Symbol table and reference-disassembly attachments for differential testing
//! - Integer and floating-point register names (ABI)
//! - Instruction field extraction for 32-bit and compressed encodings
//!
//! ## Example
//!
//! ```rust
//! use rvemu_core::{AddressSpace, Attribute, Exception};
//!
//! let mut mem = AddressSpace::new();
//! mem.add_chunk("rom", 0, 0x20, Attribute::RX).unwrap();
//!
//! // read-only memory: the store still lands but reports a write fault
//! assert_eq!(mem.write_u32(0, 0x0000_0013), Exception::WRITE);
//! assert_eq!(mem.read_ins(0), (0x0000_0013, Exception::empty()));
//!
//! // unmapped and misaligned
//! let (val, ex) = mem.read_u32(0x1001);
//! assert_eq!(val, u32::MAX);
//! assert_eq!(ex, Exception::EMPTY | Exception::ALIGN);
//! ```

pub mod address_space;
pub mod attribute;
pub mod encoding;
pub mod error;
pub mod exception;
pub mod register;
pub mod segment;
pub mod symbol;
pub mod xlen;

pub use address_space::AddressSpace;
pub use attribute::Attribute;
pub use error::{MemoryError, Result};
pub use exception::Exception;
pub use register::{FRegister, Register, NUM_REGISTERS};
pub use segment::{Chunk, Empty, Segment, Word};
pub use symbol::SymbolTable;
pub use xlen::Xlen;

/// Physical address. RV32 machines only use the low 32 bits.
pub type Address = u64;

/// Fixed width of an instruction fetch in bytes.
pub const FETCH_BYTES: u64 = 4;

/// Fetch alignment. Mixed 16/32-bit streams only need halfword alignment.
pub const FETCH_ALIGN: u64 = 2;
