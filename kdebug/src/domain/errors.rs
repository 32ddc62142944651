//! Structured error types for kdebug
//!
//! Using thiserror for automatic Display implementation and error chaining.
//! Lookup failures also carry a negative integer status so kernel callers that
//! only log a number keep working.

use std::fmt;
use thiserror::Error;

/// Status returned for a query whose address or name has no entry.
pub const E_NO_ENT: i32 = -2;

/// Status returned when the debug sections cannot be decoded.
pub const E_BAD_DWARF: i32 = -22;

/// Failure of a single DWARF or symbol-table query
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupError {
    #[error("no matching entry")]
    NotFound,

    #[error("malformed debug info: {0}")]
    Malformed(#[from] gimli::Error),
}

impl LookupError {
    /// Negative status code for this failure
    #[must_use]
    pub fn code(&self) -> i32 {
        match self {
            Self::NotFound => E_NO_ENT,
            Self::Malformed(_) => E_BAD_DWARF,
        }
    }
}

/// Step of the address pipeline that produced a failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    CompileUnit,
    FileName,
    Line,
    Function,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::CompileUnit => "compile unit",
            Self::FileName => "file name",
            Self::Line => "line",
            Self::Function => "function",
        };
        f.write_str(name)
    }
}

/// First failing stage of an address resolution
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("{stage} lookup failed: {source}")]
pub struct ResolveError {
    pub stage: Stage,
    #[source]
    pub source: LookupError,
}

impl ResolveError {
    #[must_use]
    pub fn new(stage: Stage, source: LookupError) -> Self {
        Self { stage, source }
    }

    /// Status of the failing query, unchanged
    #[must_use]
    pub fn code(&self) -> i32 {
        self.source.code()
    }
}

/// Errors from loading a kernel image on the host
#[derive(Error, Debug)]
pub enum ImageError {
    #[error("Failed to parse ELF image: {0}")]
    Parse(String),

    #[error("Unsupported image: {0}")]
    Unsupported(String),

    #[error("Image has no {0} section")]
    MissingSection(&'static str),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
