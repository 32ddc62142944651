//! # kdebug - Kernel Address and Symbol Resolution
//!
//! Turns raw instruction addresses inside a running kernel into source file,
//! line and function, and function names back into entry addresses. Only the
//! kernel image's own debug sections are used: no symbol server, no debugger
//! process. The resolver and its result record never allocate; the `gimli`
//! backend does, for the abbreviation tables of each unit it parses.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────────┐
//! │            Loader descriptor (kdebug-common::LoaderParams)     │
//! │   .debug_{aranges,abbrev,info,line,str,pubnames,pubtypes}      │
//! │   .symtab / .strtab                                            │
//! └───────────────────────────┬───────────────────────────────────┘
//!                             │ once, at boot
//!                             ▼
//!                     ┌──────────────┐
//!                     │   BootInfo   │  immutable, injected
//!                     └──────┬───────┘
//!              ┌─────────────┼──────────────┐
//!              ▼             ▼              ▼
//!     ┌──────────────┐ ┌──────────────┐ ┌──────────────┐
//!     │   Section    │ │    DWARF     │ │ Symbol table │
//!     │   locator    │ │   queries    │ │   scanner    │
//!     └──────┬───────┘ └──────┬───────┘ └──────┬───────┘
//!            └────────────────┼────────────────┘
//!                             ▼
//!                     ┌──────────────┐
//!                     │   Resolver   │  resolve_address / resolve_function
//!                     └──────────────┘
//! ```
//!
//! ## Module Structure
//!
//! - [`boot`]: section bounds published by the loader, as byte slices
//! - [`sections`]: locates the seven DWARF sections for a query
//! - [`dwarf`]: the DWARF query trait and its `gimli` implementation
//! - [`symtab`]: linear scan of the ELF symbol table
//! - [`resolver`]: the address pipeline and the name lookup strategies
//! - [`image`]: loads a kernel ELF on the host in place of the bootloader
//! - [`cli`]: arguments and output of the `kdebug` host tool
//! - [`domain`]: offset newtypes and error types
//!
//! ## Typical Usage
//!
//! ```rust,ignore
//! let boot = unsafe { BootInfo::from_loader_params(&LOADER_PARAMS) };
//! let resolver = Resolver::new(boot, GimliDwarf::new());
//!
//! for (i, ret) in return_addresses.enumerate() {
//!     let frame = resolver.resolve_address(ret);
//!     log::info!("#{i} {}:{} {}", frame.info.rip_file, frame.info.rip_line, frame.info.rip_fn_name);
//! }
//!
//! let entry = resolver.resolve_function("monitor_backtrace");
//! ```

pub mod boot;
pub mod cli;
pub mod domain;
pub mod dwarf;
pub mod image;
pub mod resolver;
pub mod sections;
pub mod symtab;
