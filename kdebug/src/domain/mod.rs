//! Domain model for kdebug
//!
//! This module contains core domain types and errors that provide:
//! - Compile-time safety via newtype pattern for DWARF section offsets
//! - Structured error handling with integer status codes for the kernel ABI

pub mod errors;
pub mod types;

// Re-export common types for convenience
pub use types::{CuOffset, LineProgramOffset};

pub use errors::{ImageError, LookupError, ResolveError, Stage};
