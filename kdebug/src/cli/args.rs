//! CLI argument definitions

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "kdebug",
    about = "Resolve kernel addresses and function names from a kernel image",
    after_help = "\
EXAMPLES:
    kdebug kernel.elf addr 0x8041601d2a 0x80416015f0   Symbolize return addresses
    kdebug kernel.elf func monitor_backtrace           Find a function's entry address
    kdebug --user-limit 0 ./a.out addr 0x1139          Inspect a host binary"
)]
pub struct Args {
    /// Kernel ELF image carrying DWARF sections and a symbol table
    #[arg(value_name = "IMAGE")]
    pub image: PathBuf,

    #[command(subcommand)]
    pub command: Command,

    /// Print one JSON object per query
    #[arg(long, global = true)]
    pub json: bool,

    /// Demangle Rust function names
    #[arg(long, global = true)]
    pub demangle: bool,

    /// Lowest address treated as kernel space (hex or decimal)
    #[arg(long, value_name = "ADDR", value_parser = parse_address, global = true)]
    pub user_limit: Option<u64>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Resolve return addresses to file, line and function
    Addr {
        /// Return addresses, innermost frame first (hex with 0x, or decimal)
        #[arg(required = true, value_parser = parse_address)]
        addresses: Vec<u64>,
    },

    /// Resolve function names to entry addresses
    Func {
        #[arg(required = true)]
        names: Vec<String>,
    },
}

/// Parse `0x`-prefixed hex or plain decimal.
///
/// # Errors
/// Returns a message suitable for clap when `s` is not a valid address.
pub fn parse_address(s: &str) -> Result<u64, String> {
    let s = s.trim();
    let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u64::from_str_radix(&hex.replace('_', ""), 16),
        None => s.replace('_', "").parse::<u64>(),
    };
    parsed.map_err(|e| format!("invalid address '{s}': {e}"))
}
