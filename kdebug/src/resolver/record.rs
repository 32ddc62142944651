//! Fixed-capacity result record for address lookups
//!
//! The record never allocates: names are copied into inline buffers and cut
//! off at capacity. Source bytes are not assumed to be NUL-terminated, but a
//! NUL inside them ends the copy.

use serde::{Serialize, Serializer};
use std::fmt;

/// Capacity of the file and function name buffers
pub const RIPDEBUG_BUFSIZE: usize = 256;

/// Placeholder for any field a lookup could not fill
pub const UNKNOWN: &str = "<unknown>";

/// Inline byte buffer with an explicit length
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct BoundedStr<const N: usize> {
    buf: [u8; N],
    len: usize,
}

impl<const N: usize> BoundedStr<N> {
    #[must_use]
    pub const fn new() -> Self {
        Self { buf: [0; N], len: 0 }
    }

    /// Copy from `src`, stopping at the first NUL or at capacity.
    #[must_use]
    pub fn from_bytes(src: &[u8]) -> Self {
        let mut out = Self::new();
        out.set(src);
        out
    }

    /// Replace the contents with `src`, stopping at the first NUL or at capacity.
    pub fn set(&mut self, src: &[u8]) {
        let src = src.iter().position(|&b| b == 0).map_or(src, |nul| &src[..nul]);
        let len = src.len().min(N);
        self.buf[..len].copy_from_slice(&src[..len]);
        self.buf[len..].fill(0);
        self.len = len;
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf[..self.len]
    }

    /// Contents as text; a multi-byte character cut off by truncation is dropped.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match std::str::from_utf8(self.as_bytes()) {
            Ok(s) => s,
            Err(e) => std::str::from_utf8(&self.buf[..e.valid_up_to()]).unwrap_or_default(),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[must_use]
    pub const fn capacity(&self) -> usize {
        N
    }
}

impl<const N: usize> Default for BoundedStr<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> fmt::Debug for BoundedStr<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self.as_str(), f)
    }
}

impl<const N: usize> fmt::Display for BoundedStr<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<const N: usize> PartialEq<str> for BoundedStr<N> {
    fn eq(&self, other: &str) -> bool {
        self.as_bytes() == other.as_bytes()
    }
}

impl<const N: usize> PartialEq<&str> for BoundedStr<N> {
    fn eq(&self, other: &&str) -> bool {
        self.as_bytes() == other.as_bytes()
    }
}

impl<const N: usize> Serialize for BoundedStr<N> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Debug information for one instruction address
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RipDebugInfo {
    /// Source file of the enclosing compile unit
    pub rip_file: BoundedStr<RIPDEBUG_BUFSIZE>,
    /// Source line of the call site
    pub rip_line: u32,
    /// Name of the enclosing function
    pub rip_fn_name: BoundedStr<RIPDEBUG_BUFSIZE>,
    /// Entry address of the enclosing function
    pub rip_fn_addr: u64,
    /// Number of function arguments; not provided by the DWARF queries
    pub rip_fn_narg: u32,
    /// Address that was looked up
    pub rip: u64,
}

impl RipDebugInfo {
    /// Record for `addr` with every field defaulted
    #[must_use]
    pub fn unknown(addr: u64) -> Self {
        Self {
            rip_file: BoundedStr::from_bytes(UNKNOWN.as_bytes()),
            rip_line: 0,
            rip_fn_name: BoundedStr::from_bytes(UNKNOWN.as_bytes()),
            rip_fn_addr: addr,
            rip_fn_narg: 0,
            rip: addr,
        }
    }

    /// Length of the stored function name
    #[must_use]
    pub fn rip_fn_namelen(&self) -> usize {
        self.rip_fn_name.len()
    }

    /// Distance from the function entry to the looked-up address
    #[must_use]
    pub fn offset_in_fn(&self) -> u64 {
        self.rip.wrapping_sub(self.rip_fn_addr)
    }
}
