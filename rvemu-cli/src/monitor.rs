//! Interactive emulator monitor
//!
//! A line-oriented command loop over a single [`Cpu`]. Every command
//! produces text; argument problems are reported and the loop carries on.

use anyhow::{bail, Context, Result};
use rvemu_runtime::{Cpu, HaltReason};
use std::io::{BufRead, Write};
use tracing::warn;

const PROMPT: &str = "rvemu> ";

/// Default `md` length in bytes
const MD_LEN: u64 = 0x40;

/// Default `da` length in bytes
const DA_LEN: u64 = 0x10;

/// Result of one monitor command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Output(String),
    Exit,
}

pub struct Monitor {
    cpu: Cpu,
    history: Vec<String>,
}

impl Monitor {
    pub fn new(cpu: Cpu) -> Self {
        Self {
            cpu,
            history: Vec::new(),
        }
    }

    pub fn cpu(&self) -> &Cpu {
        &self.cpu
    }

    /// Run one command line.
    pub fn execute(&mut self, line: &str) -> Result<Action> {
        let line = line.trim();
        let parts: Vec<&str> = line.split_whitespace().collect();
        let Some((&cmd, args)) = parts.split_first() else {
            return Ok(Action::Output(String::new()));
        };
        self.history.push(line.to_string());

        let out = match cmd {
            "md" => self.memory_display(args)?,
            "go" => self.go(args)?,
            "trace" => self.trace(args)?,
            "step" => self.step(args)?,
            "da" => self.disassemble(args)?,
            "ireg" => {
                no_args(args)?;
                self.cpu.state().iregs()
            }
            "freg" => {
                no_args(args)?;
                self.cpu.state().fregs()
            }
            "map" => {
                no_args(args)?;
                self.cpu.memory().memory_map()
            }
            "reset" => {
                no_args(args)?;
                self.cpu.reset();
                String::new()
            }
            "history" => self.show_history(),
            "help" | "?" => HELP_TEXT.trim_start().to_string(),
            "exit" | "quit" => return Ok(Action::Exit),
            _ => bail!("unknown command: {} (try 'help')", cmd),
        };
        Ok(Action::Output(out))
    }

    /// Read commands until `exit` or end of input.
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, mut out: W) -> Result<()> {
        write!(out, "{}", PROMPT)?;
        out.flush()?;
        for line in input.lines() {
            let line = line.context("failed to read command")?;
            match self.execute(&line) {
                Ok(Action::Exit) => break,
                Ok(Action::Output(text)) => {
                    if !text.is_empty() {
                        writeln!(out, "{}", text.trim_end())?;
                    }
                }
                Err(e) => {
                    warn!("{:#}", e);
                    writeln!(out, "error: {:#}", e)?;
                }
            }
            write!(out, "{}", PROMPT)?;
            out.flush()?;
        }
        Ok(())
    }

    fn memory_display(&self, args: &[&str]) -> Result<String> {
        let (adr, len) = memory_args(args, 0, MD_LEN)?;
        Ok(self.cpu.memory().display(adr, len))
    }

    fn go(&mut self, args: &[&str]) -> Result<String> {
        let adr = address_arg(args, self.cpu.pc())?;
        self.cpu.set_pc(adr);
        Ok(self.cpu.run_default().to_string())
    }

    fn trace(&mut self, args: &[&str]) -> Result<String> {
        let adr = address_arg(args, self.cpu.pc())?;
        self.cpu.set_pc(adr);
        let mut lines = Vec::new();
        let mut halt = HaltReason::StepLimit;
        for _ in 0..self.cpu.config().max_steps {
            let pc = self.cpu.pc();
            lines.push(self.cpu.disassemble(pc).to_string());
            let ex = self.cpu.step();
            if !ex.is_ok() {
                halt = HaltReason::Exception { pc, ex };
                break;
            }
        }
        lines.push(halt.to_string());
        Ok(lines.join("\n"))
    }

    fn step(&mut self, args: &[&str]) -> Result<String> {
        let adr = address_arg(args, self.cpu.pc())?;
        self.cpu.set_pc(adr);
        let pc = self.cpu.pc();
        let mut out = self.cpu.disassemble(pc).to_string();
        let ex = self.cpu.step();
        if !ex.is_ok() {
            out.push('\n');
            out.push_str(&HaltReason::Exception { pc, ex }.to_string());
        }
        Ok(out)
    }

    fn disassemble(&self, args: &[&str]) -> Result<String> {
        let (mut adr, len) = memory_args(args, self.cpu.pc(), DA_LEN)?;
        let mut remaining = len;
        let mut lines = Vec::new();
        while remaining > 0 {
            let d = self.cpu.disassemble(adr);
            let length = d.length as u64;
            lines.push(d.to_string());
            adr = adr.wrapping_add(length);
            remaining = remaining.saturating_sub(length);
        }
        Ok(lines.join("\n"))
    }

    fn show_history(&self) -> String {
        self.history
            .iter()
            .enumerate()
            .map(|(n, cmd)| format!("{:>4}  {}", n + 1, cmd))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Parse a hex number with an optional `0x` prefix.
pub fn parse_hex(s: &str) -> Result<u64> {
    let digits = s
        .strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s);
    u64::from_str_radix(digits, 16).with_context(|| format!("invalid hex value: {}", s))
}

fn no_args(args: &[&str]) -> Result<()> {
    if !args.is_empty() {
        bail!("unexpected arguments: {}", args.join(" "));
    }
    Ok(())
}

fn address_arg(args: &[&str], default: u64) -> Result<u64> {
    match args {
        [] => Ok(default),
        [adr] => parse_hex(adr),
        _ => bail!("too many arguments"),
    }
}

fn memory_args(args: &[&str], default_adr: u64, default_len: u64) -> Result<(u64, u64)> {
    match args {
        [] => Ok((default_adr, default_len)),
        [adr] => Ok((parse_hex(adr)?, default_len)),
        [adr, len] => Ok((parse_hex(adr)?, parse_hex(len)?)),
        _ => bail!("too many arguments"),
    }
}

const HELP_TEXT: &str = r#"
Commands:
  md [adr] [len]   display memory (hex, default 0 0x40)
  go [adr]         run until an exception (default pc)
  trace [adr]      run with an instruction trace (default pc)
  step [adr]       single step (default pc)
  da [adr] [len]   disassemble memory (hex, default pc 0x10)
  ireg             integer registers
  freg             floating-point registers
  map              memory map
  reset            reset the cpu
  history          command history
  help             this text
  exit             leave the monitor
"#;
