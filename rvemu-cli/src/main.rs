//! rvemu - RISC-V disassembler check and emulator monitor
//!
//! Usage:
//!   rvemu da -f dump.txt [--isa rv32gc] [--json]   Compare against an objdump listing
//!   rvemu emu [--isa rv64gc] [-f dump.txt]          Interactive monitor

mod monitor;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use monitor::{parse_hex, Monitor};
use rvemu_core::AddressSpace;
use rvemu_disassembler::Isa;
use rvemu_dump::{compare, load_file};
use rvemu_runtime::{Cpu, CpuConfig};
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "rvemu")]
#[command(about = "RISC-V disassembler and emulator", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Disassemble a loaded objdump listing and report mismatches
    Da {
        /// Dump file to load
        #[arg(short, long, default_value = "dump.txt")]
        file: PathBuf,

        /// ISA preset used for decoding
        #[arg(long, default_value = "rv32gc")]
        isa: String,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,

        /// Address to start disassembling at (hex)
        #[arg(long, value_parser = hex_arg, default_value = "0")]
        start: u64,

        /// Size of the RAM mapped at 0 (hex)
        #[arg(long, value_parser = hex_arg, default_value = "100000")]
        mem_size: u64,
    },
    /// Run the interactive emulator monitor
    Emu {
        /// ISA preset to emulate
        #[arg(long, default_value = "rv64gc")]
        isa: String,

        /// Dump file to preload
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// Size of the RAM mapped at 0 (hex)
        #[arg(long, value_parser = hex_arg, default_value = "100000")]
        mem_size: u64,

        /// Step budget for `go` and `trace`
        #[arg(long, default_value_t = 1_000_000)]
        max_steps: u64,
    },
}

fn hex_arg(s: &str) -> Result<u64, String> {
    parse_hex(s).map_err(|e| e.to_string())
}

fn ram(mem_size: u64) -> Result<AddressSpace> {
    let mut mem = AddressSpace::new();
    mem.add_chunk("ram", 0, mem_size, rvemu_core::Attribute::RWX)
        .context("Failed to map RAM")?;
    Ok(mem)
}

fn run_da(file: PathBuf, isa: &str, json: bool, start: u64, mem_size: u64) -> Result<()> {
    let mut mem = ram(mem_size)?;
    load_file(&mut mem, &file).with_context(|| format!("Failed to load dump: {}", file.display()))?;
    let isa = Isa::from_name(isa)?;

    let report = compare(&isa, &mem, start);
    info!(
        isa = isa.name(),
        instructions = report.len(),
        mismatches = report.mismatch_count(),
        "comparison finished"
    );

    let stdout = io::stdout();
    let mut out = stdout.lock();
    if json {
        serde_json::to_writer_pretty(&mut out, &report)?;
        writeln!(out)?;
    } else {
        write!(out, "{}", report)?;
    }
    Ok(())
}

fn run_emu(isa: &str, file: Option<PathBuf>, mem_size: u64, max_steps: u64) -> Result<()> {
    let isa = Arc::new(Isa::from_name(isa)?);
    let config = CpuConfig {
        max_steps,
        ..CpuConfig::default()
    };
    let mut cpu = Cpu::new(isa, ram(mem_size)?, config);
    if let Some(file) = file {
        load_file(cpu.memory_mut(), &file)
            .with_context(|| format!("Failed to load dump: {}", file.display()))?;
    }

    println!("rvemu {} monitor, 'help' for commands", cpu.isa().name());
    let stdin = io::stdin();
    Monitor::new(cpu).run(stdin.lock(), io::stdout())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Da {
            file,
            isa,
            json,
            start,
            mem_size,
        } => run_da(file, &isa, json, start, mem_size),
        Commands::Emu {
            isa,
            file,
            mem_size,
            max_steps,
        } => run_emu(&isa, file, mem_size, max_steps),
    }
}
