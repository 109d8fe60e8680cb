//! # rvemu runtime
//!
//! Execute RV32 and RV64 code (I, M, A, F, D and C extensions) on a single
//! hart over a segmented [`AddressSpace`](rvemu_core::AddressSpace).
//!
//! ## Features
//!
//! - **Fault model**: a step returns an [`Exception`](rvemu_core::Exception)
//!   mask and leaves the PC on the faulting instruction
//! - **Shared ISA**: execution uses the same decoder as the disassembler
//! - **Floating point**: NaN-boxed singles, `fcsr`/`frm`/`fflags`, static and
//!   dynamic rounding for conversions
//! - **Run control**: step budget and a stop predicate checked between steps
//!
//! ## Example
//!
//! ```rust
//! use rvemu_core::{AddressSpace, Exception, Register};
//! use rvemu_runtime::{Cpu, CpuConfig, HaltReason};
//!
//! let mut cpu = Cpu::from_isa_name("rv64gc", AddressSpace::new(), CpuConfig::default()).unwrap();
//! cpu.map_ram("ram", 0, 0x1000).unwrap();
//! // li a0,42 ; ebreak
//! cpu.load(0, &[0x13, 0x05, 0xa0, 0x02, 0x73, 0x00, 0x10, 0x00]).unwrap();
//!
//! assert_eq!(cpu.run(100), HaltReason::Exception { pc: 4, ex: Exception::EBREAK });
//! assert_eq!(cpu.reg(Register::A0), 42);
//! ```

pub mod cpu;
pub mod error;
pub mod execute;
pub mod float;
pub mod state;

pub use cpu::{Cpu, CpuConfig};
pub use error::{Result, RuntimeError};
pub use execute::execute;
pub use float::Rounding;
pub use state::{CpuState, HaltReason};

use rvemu_core::{Address, AddressSpace};

/// Load `image` into a fresh RAM chunk at `base` and run from `base`.
///
/// The RAM chunk spans `ram_size` bytes.
pub fn run_image(isa: &str, base: Address, ram_size: u64, image: &[u8], max_steps: u64) -> Result<(Cpu, HaltReason)> {
    let config = CpuConfig {
        max_steps,
        reset_pc: base,
        ..CpuConfig::default()
    };
    let mut cpu = Cpu::from_isa_name(isa, AddressSpace::new(), config)?;
    cpu.map_ram("ram", base, ram_size)?;
    cpu.load(base, image)?;
    let halt = cpu.run_default();
    Ok((cpu, halt))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rvemu_core::{Exception, Register};

    #[test]
    fn test_public_exports() {
        let _ = CpuConfig::default();
        let _ = HaltReason::StepLimit;
        let _ = Rounding::resolve(0, 0);
    }

    #[test]
    fn test_cpuconfig_default() {
        let config = CpuConfig::default();
        assert_eq!(config.max_steps, 1_000_000);
        assert!(!config.trace);
        assert_eq!(config.reset_pc, 0);
    }

    #[test]
    fn test_run_image_helper() {
        // li a0,7 ; ecall
        let image = [0x13, 0x05, 0x70, 0x00, 0x73, 0x00, 0x00, 0x00];
        let (cpu, halt) = run_image("rv32im", 0x8000_0000, 0x1000, &image, 10).unwrap();
        assert_eq!(halt, HaltReason::Exception { pc: 0x8000_0004, ex: Exception::ECALL });
        assert_eq!(cpu.reg(Register::A0), 7);
    }

    #[test]
    fn test_run_image_unknown_isa() {
        let err = run_image("rv16", 0, 0x100, &[], 1).unwrap_err();
        assert!(matches!(err, RuntimeError::Isa(_)));
    }

    #[test]
    fn test_image_too_large() {
        let err = run_image("rv32i", 0, 4, &[0; 8], 1).unwrap_err();
        assert!(matches!(err, RuntimeError::LoadFault { .. }));
    }
}
