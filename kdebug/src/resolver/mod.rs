//! # Address and Name Resolution
//!
//! The two entry points kernel code calls:
//!
//! - [`Resolver::resolve_address`]: return address → file, line, function.
//!   Used once per frame by the backtrace printer.
//! - [`Resolver::resolve_function`]: function name → entry address.
//!   Used by tooling that places breakpoints or inspects a known routine.
//!
//! Both re-locate the debug sections from the injected [`BootInfo`] on every
//! call and keep no state between calls, so any number of callers may use one
//! resolver at the same time.
//!
//! ## Address pipeline
//!
//! ```text
//! addr ─▶ info_by_address ─▶ file_name_by_info ─▶ line_for_address ─▶ function_by_info
//!              │                    │                    │                   │
//!              ▼                    ▼                    ▼                   ▼
//!          (defaults)          rip_file             rip_line       rip_fn_name/addr
//! ```
//!
//! The first failing stage ends the pipeline; whatever earlier stages wrote
//! stays in the record.
//!
//! ## Name strategies
//!
//! `.debug_pubnames` first, then a full `.debug_info` walk, then the ELF
//! symbol table. The first success wins.

mod address;
mod function;
pub mod record;

pub use address::AddressResolution;
pub use function::{NameSource, ResolvedFunction};
pub use kdebug_common::CALL_INSN_LEN;
pub use record::{BoundedStr, RipDebugInfo, RIPDEBUG_BUFSIZE, UNKNOWN};

use crate::boot::BootInfo;
use crate::dwarf::DwarfQuery;
use kdebug_common::MAX_USER_READABLE;

/// Tunables for a [`Resolver`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolverConfig {
    /// Lowest address accepted by [`Resolver::resolve_address`], apart from zero
    pub user_limit: u64,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self { user_limit: MAX_USER_READABLE }
    }
}

/// Resolves kernel addresses and function names against boot-time debug data
#[derive(Debug, Clone)]
pub struct Resolver<'a, D> {
    boot: BootInfo<'a>,
    dwarf: D,
    config: ResolverConfig,
}

impl<'a, D: DwarfQuery> Resolver<'a, D> {
    #[must_use]
    pub fn new(boot: BootInfo<'a>, dwarf: D) -> Self {
        Self::with_config(boot, dwarf, ResolverConfig::default())
    }

    #[must_use]
    pub fn with_config(boot: BootInfo<'a>, dwarf: D, config: ResolverConfig) -> Self {
        Self { boot, dwarf, config }
    }

    #[must_use]
    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    #[must_use]
    pub fn boot(&self) -> &BootInfo<'a> {
        &self.boot
    }
}
