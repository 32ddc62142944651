//! # kdebug - Host Entry Point
//!
//! Loads a kernel image the way the bootloader would publish it and runs the
//! kernel's own resolvers against it:
//! - `kdebug <IMAGE> addr <ADDR>...`: symbolize return addresses (a backtrace)
//! - `kdebug <IMAGE> func <NAME>...`: find function entry addresses

use anyhow::{Context, Result};
use clap::Parser;
use kdebug::cli::{output, Args, Command};
use kdebug::dwarf::GimliDwarf;
use kdebug::image::KernelImage;
use kdebug::resolver::{Resolver, ResolverConfig};
use log::info;

// Exit codes
const EXIT_SUCCESS: i32 = 0;
const EXIT_ERROR: i32 = 1;
const EXIT_USAGE: i32 = 2;
const EXIT_NOT_FOUND: i32 = 3;

fn main() {
    env_logger::init();
    std::process::exit(match run() {
        Ok(true) => EXIT_SUCCESS,
        Ok(false) => EXIT_NOT_FOUND,
        Err(e) => {
            let code = exit_code_for(&e);
            eprintln!("error: {e:#}");
            code
        }
    });
}

fn exit_code_for(err: &anyhow::Error) -> i32 {
    let msg = err.to_string().to_lowercase();
    if msg.contains("below the kernel boundary") {
        EXIT_USAGE
    } else {
        EXIT_ERROR
    }
}

/// Returns `false` when some query could not be answered completely.
fn run() -> Result<bool> {
    let args = Args::parse();

    let image = KernelImage::open(&args.image)
        .with_context(|| format!("Failed to load kernel image {}", args.image.display()))?;

    let mut config = ResolverConfig::default();
    if let Some(limit) = args.user_limit {
        config.user_limit = limit;
    }
    info!("Kernel boundary: 0x{:x}", config.user_limit);

    let resolver = Resolver::with_config(image.boot_info(), GimliDwarf::new(), config);

    match args.command {
        Command::Addr { addresses } => {
            // The resolver asserts this precondition; report it instead of panicking
            if let Some(bad) = addresses.iter().find(|&&addr| addr != 0 && addr < config.user_limit) {
                anyhow::bail!(
                    "Address 0x{bad:x} is below the kernel boundary 0x{:x}.\n\n\
                     Pass --user-limit to lower the boundary for images linked low.",
                    config.user_limit
                );
            }

            let mut complete = true;
            for (i, &addr) in addresses.iter().enumerate() {
                let resolution = resolver.resolve_address(addr);
                complete &= resolution.is_complete();
                if args.json {
                    println!("{}", output::frame_json(i, &resolution, args.demangle)?);
                } else {
                    println!("{}", output::format_frame(i, &resolution, args.demangle));
                }
            }
            Ok(complete)
        }
        Command::Func { names } => {
            let mut complete = true;
            for name in &names {
                let resolved = resolver.resolve_function(name);
                complete &= resolved.is_some();
                if args.json {
                    println!("{}", output::function_json(name, resolved.as_ref())?);
                } else {
                    println!("{}", output::format_function(name, resolved.as_ref()));
                }
            }
            Ok(complete)
        }
    }
}
