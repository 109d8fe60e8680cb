//! Access fault mask.
//!
//! Every memory operation returns an [`Exception`] alongside its value. The
//! mask is the OR of every violated condition for that access, so an
//! unaligned write into an empty read-only region reports
//! `ALIGN | WRITE | EMPTY`. An empty mask means success.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use std::fmt;

bitflags! {
    /// Bit mask of access faults and CPU stop conditions.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct Exception: u32 {
        /// Misaligned read/write/fetch
        const ALIGN = 1 << 0;
        /// Segment is not readable
        const READ = 1 << 1;
        /// Segment is not writable
        const WRITE = 1 << 2;
        /// No memory at this address
        const EMPTY = 1 << 3;
        /// Segment is not executable
        const EXEC = 1 << 4;

        // CPU-level conditions, never produced by a memory access.

        /// Unknown or reserved instruction encoding
        const ILLEGAL = 1 << 5;
        /// Environment call
        const ECALL = 1 << 6;
        /// Breakpoint
        const EBREAK = 1 << 7;
    }
}

impl Exception {
    /// All conditions a memory access may report.
    pub const MEMORY: Self = Self::ALIGN
        .union(Self::READ)
        .union(Self::WRITE)
        .union(Self::EMPTY)
        .union(Self::EXEC);

    /// True when no condition is set.
    #[inline]
    pub fn is_ok(self) -> bool {
        self.is_empty()
    }

    /// True when at least one memory fault is set.
    #[inline]
    pub fn is_memory_fault(self) -> bool {
        self.intersects(Self::MEMORY)
    }
}

impl fmt::Display for Exception {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const NAMES: [(Exception, &str); 8] = [
            (Exception::ALIGN, "align"),
            (Exception::READ, "read"),
            (Exception::WRITE, "write"),
            (Exception::EMPTY, "empty"),
            (Exception::EXEC, "exec"),
            (Exception::ILLEGAL, "illegal"),
            (Exception::ECALL, "ecall"),
            (Exception::EBREAK, "ebreak"),
        ];

        if self.is_empty() {
            return write!(f, "none");
        }
        let names: Vec<&str> = NAMES
            .iter()
            .filter(|(flag, _)| self.contains(*flag))
            .map(|(_, name)| *name)
            .collect();
        write!(f, "{}", names.join(","))
    }
}
