//! # rvemu dump
//!
//! Load `objdump -d` listings into an address space and check the
//! disassembler against them.
//!
//! ## Example
//!
//! ```rust
//! use rvemu_core::{AddressSpace, Attribute};
//! use rvemu_disassembler::Isa;
//! use rvemu_dump::{compare, load};
//!
//! let mut mem = AddressSpace::new();
//! mem.add_chunk("ram", 0, 0x1000, Attribute::RWX).unwrap();
//!
//! let dump = r#"
//! 00000000 <_start>:
//!    0:   00000513        li  a0,0
//!    4:   00008067        ret
//! "#;
//! load(&mut mem, dump).unwrap();
//!
//! let isa = Isa::from_name("rv32gc").unwrap();
//! let report = compare(&isa, &mem, 0);
//! assert!(report.is_clean());
//! ```

pub mod compare;
pub mod error;
pub mod lexer;
pub mod loader;

pub use compare::{compare, Comparison, Report};
pub use error::{DumpError, Result};
pub use loader::{load, load_file, parse, DumpLine, DumpSummary, Record};
