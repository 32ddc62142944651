//! Function name → entry address

use log::debug;
use serde::Serialize;
use std::fmt;

use super::Resolver;
use crate::dwarf::DwarfQuery;
use crate::sections::load_debug_sections;
use crate::symtab::find_in_symbol_table;

/// Lookup strategy that produced an address
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NameSource {
    /// `.debug_pubnames` accelerator table
    PubNames,
    /// Full walk of `.debug_info`
    DebugInfo,
    /// ELF symbol table
    SymbolTable,
}

impl fmt::Display for NameSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::PubNames => ".debug_pubnames",
            Self::DebugInfo => ".debug_info",
            Self::SymbolTable => ".symtab",
        };
        f.write_str(name)
    }
}

/// Entry address of a named function
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ResolvedFunction {
    pub address: u64,
    pub source: NameSource,
}

impl<D: DwarfQuery> Resolver<'_, D> {
    /// Find the entry address of the function called `name`.
    ///
    /// Tries `.debug_pubnames`, then a full `.debug_info` walk, then the ELF
    /// symbol table. A full walk that reports address `0` counts as a miss.
    /// Returns `None` when every strategy misses, or when `name` is empty.
    #[must_use]
    pub fn resolve_function(&self, name: &str) -> Option<ResolvedFunction> {
        if name.is_empty() {
            return None;
        }

        let sections = load_debug_sections(&self.boot);

        match self.dwarf.address_by_fname(&sections, name) {
            Ok(address) => return Some(ResolvedFunction { address, source: NameSource::PubNames }),
            Err(e) => debug!("{name}: pubnames lookup failed: {e}"),
        }

        match self.dwarf.naive_address_by_fname(&sections, name) {
            Ok(0) => debug!("{name}: debug info walk reported address 0, ignoring"),
            Ok(address) => return Some(ResolvedFunction { address, source: NameSource::DebugInfo }),
            Err(e) => debug!("{name}: debug info walk failed: {e}"),
        }

        match find_in_symbol_table(&self.boot, name) {
            Ok(address) => Some(ResolvedFunction { address, source: NameSource::SymbolTable }),
            Err(e) => {
                debug!("{name}: symbol table lookup failed: {e}");
                None
            }
        }
    }
}
