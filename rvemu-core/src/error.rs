//! Address space construction errors
//!
//! Access faults never use these; they are reported through
//! [`Exception`](crate::Exception) masks.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MemoryError {
    #[error("Segment at {start:#x} has zero size")]
    ZeroSize { start: u64 },

    #[error("Segment at {start:#x} with size {size:#x} overflows the address space")]
    AddressOverflow { start: u64, size: u64 },

    #[error("Cannot allocate {size:#x} bytes of backing memory")]
    Allocation { size: u64 },

    #[error("Segment {name} [{start:#x}, {end:#x}] overlaps segment {existing} [{existing_start:#x}, {existing_end:#x}]")]
    Overlap {
        name: String,
        start: u64,
        end: u64,
        existing: String,
        existing_start: u64,
        existing_end: u64,
    },
}

pub type Result<T> = std::result::Result<T, MemoryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_size_display() {
        let err = MemoryError::ZeroSize { start: 0x1000 };
        assert_eq!(err.to_string(), "Segment at 0x1000 has zero size");
    }

    #[test]
    fn test_allocation_display() {
        let err = MemoryError::Allocation { size: 0x100 };
        assert_eq!(err.to_string(), "Cannot allocate 0x100 bytes of backing memory");
    }

    #[test]
    fn test_overlap_display() {
        let err = MemoryError::Overlap {
            name: "ram".to_string(),
            start: 0x10,
            end: 0x2f,
            existing: "rom".to_string(),
            existing_start: 0,
            existing_end: 0x1f,
        };
        assert_eq!(
            err.to_string(),
            "Segment ram [0x10, 0x2f] overlaps segment rom [0x0, 0x1f]"
        );
    }
}
