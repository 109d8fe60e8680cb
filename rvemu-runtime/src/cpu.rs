//! RISC-V hart: fetch, decode, execute

use crate::error::{Result, RuntimeError};
use crate::execute::execute;
use crate::state::{CpuState, HaltReason};
use rvemu_core::{Address, AddressSpace, Attribute, Exception, FRegister, Register};
use rvemu_disassembler::{decode, disassemble, format, Disassembly, Isa};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

/// CPU configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CpuConfig {
    /// Step budget used by [`Cpu::run_default`]
    pub max_steps: u64,

    /// Log every executed instruction at debug level
    pub trace: bool,

    /// PC after reset
    pub reset_pc: Address,
}

impl Default for CpuConfig {
    fn default() -> Self {
        Self {
            max_steps: 1_000_000,
            trace: false,
            reset_pc: 0,
        }
    }
}

/// A single hart with its own address space.
#[derive(Debug, Clone)]
pub struct Cpu {
    isa: Arc<Isa>,
    mem: AddressSpace,
    state: CpuState,
    config: CpuConfig,
}

impl Cpu {
    pub fn new(isa: Arc<Isa>, mem: AddressSpace, config: CpuConfig) -> Self {
        let state = CpuState::new(isa.xlen(), config.reset_pc);
        Self { isa, mem, state, config }
    }

    /// Create a CPU for one of the named ISA presets.
    pub fn from_isa_name(name: &str, mem: AddressSpace, config: CpuConfig) -> Result<Self> {
        Ok(Self::new(Arc::new(Isa::from_name(name)?), mem, config))
    }

    pub fn isa(&self) -> &Isa {
        &self.isa
    }

    pub fn config(&self) -> &CpuConfig {
        &self.config
    }

    pub fn memory(&self) -> &AddressSpace {
        &self.mem
    }

    pub fn memory_mut(&mut self) -> &mut AddressSpace {
        &mut self.mem
    }

    pub fn state(&self) -> &CpuState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut CpuState {
        &mut self.state
    }

    pub fn pc(&self) -> Address {
        self.state.pc
    }

    pub fn set_pc(&mut self, pc: Address) {
        self.state.pc = self.isa.xlen().address(pc);
    }

    pub fn reg(&self, reg: Register) -> u64 {
        self.state.read_reg(reg)
    }

    pub fn set_reg(&mut self, reg: Register, value: u64) {
        self.state.write_reg(reg, value)
    }

    pub fn freg(&self, reg: FRegister) -> u64 {
        self.state.read_freg(reg)
    }

    /// Add a read/write/execute RAM chunk.
    pub fn map_ram(&mut self, name: &str, start: Address, size: u64) -> Result<()> {
        self.mem.add_chunk(name, start, size, Attribute::RWX)?;
        Ok(())
    }

    /// Copy bytes into memory. Every byte is attempted; the error carries the
    /// union of all per-byte faults.
    pub fn load(&mut self, adr: Address, bytes: &[u8]) -> Result<()> {
        let ex = self.mem.load(adr, bytes);
        if ex.is_ok() {
            Ok(())
        } else {
            Err(RuntimeError::LoadFault { address: adr, ex })
        }
    }

    /// Clear registers, reservation and counters and jump to the reset vector.
    pub fn reset(&mut self) {
        self.state = CpuState::new(self.isa.xlen(), self.config.reset_pc);
        debug!(pc = format_args!("{:#x}", self.state.pc), "reset");
    }

    /// Execute one instruction.
    ///
    /// A non-empty result leaves the PC at the instruction that raised it.
    pub fn step(&mut self) -> Exception {
        let pc = self.state.pc;
        let (ins, ex) = self.mem.read_ins(pc);
        if !ex.is_ok() {
            return ex;
        }
        let i = match decode(&self.isa, ins) {
            Ok(i) => i,
            Err(err) => {
                debug!(pc = format_args!("{:#x}", pc), %err, "illegal instruction");
                return Exception::ILLEGAL;
            }
        };
        if self.config.trace {
            debug!(
                step = self.state.instret,
                pc = format_args!("{:#010x}", pc),
                "{}",
                format(&i, pc, self.isa.xlen())
            );
        }
        let ex = execute(&i, &mut self.state, &mut self.mem);
        if ex.is_ok() {
            self.state.instret += 1;
        }
        ex
    }

    /// Step until an exception or until `max_steps` instructions retire.
    pub fn run(&mut self, max_steps: u64) -> HaltReason {
        self.run_until(max_steps, |_| false)
    }

    /// [`Cpu::run`] with the configured step budget.
    pub fn run_default(&mut self) -> HaltReason {
        self.run(self.config.max_steps)
    }

    /// Step until an exception, the step budget, or `should_stop` returns
    /// true. The predicate is checked before every step.
    pub fn run_until<F>(&mut self, max_steps: u64, mut should_stop: F) -> HaltReason
    where
        F: FnMut(&CpuState) -> bool,
    {
        for _ in 0..max_steps {
            if should_stop(&self.state) {
                return HaltReason::Cancelled;
            }
            let ex = self.step();
            if !ex.is_ok() {
                let halt = HaltReason::Exception { pc: self.state.pc, ex };
                debug!(%halt, "halted");
                return halt;
            }
        }
        HaltReason::StepLimit
    }

    /// Disassemble the instruction at `adr` using this CPU's ISA and memory.
    pub fn disassemble(&self, adr: Address) -> Disassembly {
        disassemble(&self.isa, &self.mem, adr)
    }
}
