//! Newtypes for offsets handed between DWARF queries
//!
//! A compile-unit offset and a line-program offset are both plain section
//! offsets; keeping them distinct stops one from being fed to the wrong query.

use std::fmt;

/// Offset of a compile-unit header within `.debug_info`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CuOffset(pub usize);

impl fmt::Display for CuOffset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CU@0x{:x}", self.0)
    }
}

impl From<gimli::DebugInfoOffset<usize>> for CuOffset {
    fn from(offset: gimli::DebugInfoOffset<usize>) -> Self {
        Self(offset.0)
    }
}

impl From<CuOffset> for gimli::DebugInfoOffset<usize> {
    fn from(offset: CuOffset) -> Self {
        gimli::DebugInfoOffset(offset.0)
    }
}

/// Offset of a line-number program within `.debug_line`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LineProgramOffset(pub usize);

impl fmt::Display for LineProgramOffset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LINE@0x{:x}", self.0)
    }
}

impl From<gimli::DebugLineOffset<usize>> for LineProgramOffset {
    fn from(offset: gimli::DebugLineOffset<usize>) -> Self {
        Self(offset.0)
    }
}

impl From<LineProgramOffset> for gimli::DebugLineOffset<usize> {
    fn from(offset: LineProgramOffset) -> Self {
        gimli::DebugLineOffset(offset.0)
    }
}
