//! # Shared Data Structures (Bootloader ↔ Kernel)
//!
//! Defines the data the firmware loader hands to the kernel before any kernel
//! code runs. All types use `#[repr(C)]` so the loader and the kernel agree on
//! the layout without sharing a compiler.
//!
//! ## Key Types
//!
//! - [`LoaderParams`] - Start/end addresses of the debug sections and the ELF
//!   symbol/string tables, as placed in memory by the loader
//! - [`Elf64Sym`] - One entry of the ELF64 symbol table
//!
//! The descriptor is written once at boot and never mutated afterwards.

#![no_std]

// ============================================================================
// Memory Layout Constants
// ============================================================================

/// First address above the range user environments may read.
///
/// Every return address handed to the address resolver must lie at or above
/// this boundary (or be zero). Anything lower belongs to user space, which
/// the debug tables do not describe.
pub const MAX_USER_READABLE: u64 = 0x0000_0080_0000_0000;

/// Length in bytes of the `call rel32` encoding the kernel toolchain emits.
///
/// A return address points just past the call; subtracting this yields the
/// call instruction itself. Indirect calls use other encodings and are not
/// corrected exactly.
pub const CALL_INSN_LEN: u64 = 5;

// ============================================================================
// Loader Descriptor
// ============================================================================

/// Section bounds published by the loader.
///
/// Each `*_start`/`*_end` pair delimits one region. A region the loader did not
/// populate has `start == end` (usually both zero), which consumers treat as an
/// absent section rather than an error.
///
/// The host tool reuses this layout with file offsets instead of addresses.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LoaderParams {
    pub debug_aranges_start: u64,
    pub debug_aranges_end: u64,
    pub debug_abbrev_start: u64,
    pub debug_abbrev_end: u64,
    pub debug_info_start: u64,
    pub debug_info_end: u64,
    pub debug_line_start: u64,
    pub debug_line_end: u64,
    pub debug_str_start: u64,
    pub debug_str_end: u64,
    pub debug_pubnames_start: u64,
    pub debug_pubnames_end: u64,
    pub debug_pubtypes_start: u64,
    pub debug_pubtypes_end: u64,

    /// `.symtab` contents, an array of [`Elf64Sym`]
    pub symbol_table_start: u64,
    pub symbol_table_end: u64,
    /// `.strtab` contents, NUL-terminated names indexed by `Elf64Sym::st_name`
    pub string_table_start: u64,
    pub string_table_end: u64,
}

// ============================================================================
// ELF Symbol Entry
// ============================================================================

/// ELF64 symbol table entry (`Elf64_Sym`)
///
/// The loader copies `.symtab` verbatim, so entries arrive in the on-disk
/// little-endian encoding.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Elf64Sym {
    /// Offset of the symbol name in the string table
    pub st_name: u32,
    pub st_info: u8,
    pub st_other: u8,
    pub st_shndx: u16,
    /// Symbol address
    pub st_value: u64,
    pub st_size: u64,
}

impl Elf64Sym {
    /// Size of one encoded entry
    pub const SIZE: usize = 24;

    /// Decode one little-endian entry.
    #[must_use]
    pub fn parse(raw: &[u8; Self::SIZE]) -> Self {
        let [n0, n1, n2, n3, info, other, x0, x1, v0, v1, v2, v3, v4, v5, v6, v7, s0, s1, s2, s3, s4, s5, s6, s7] =
            *raw;
        Self {
            st_name: u32::from_le_bytes([n0, n1, n2, n3]),
            st_info: info,
            st_other: other,
            st_shndx: u16::from_le_bytes([x0, x1]),
            st_value: u64::from_le_bytes([v0, v1, v2, v3, v4, v5, v6, v7]),
            st_size: u64::from_le_bytes([s0, s1, s2, s3, s4, s5, s6, s7]),
        }
    }

    /// Encode the entry the way a linker lays it out.
    #[must_use]
    pub fn to_bytes(&self) -> [u8; Self::SIZE] {
        let mut out = [0u8; Self::SIZE];
        out[0..4].copy_from_slice(&self.st_name.to_le_bytes());
        out[4] = self.st_info;
        out[5] = self.st_other;
        out[6..8].copy_from_slice(&self.st_shndx.to_le_bytes());
        out[8..16].copy_from_slice(&self.st_value.to_le_bytes());
        out[16..24].copy_from_slice(&self.st_size.to_le_bytes());
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_elf64_sym_layout() {
        assert_eq!(core::mem::size_of::<Elf64Sym>(), Elf64Sym::SIZE);
    }

    #[test]
    fn test_elf64_sym_parse() {
        let sym = Elf64Sym {
            st_name: 0x11,
            st_info: 0x12,
            st_other: 0,
            st_shndx: 3,
            st_value: 0xffff_8000_0010_2000,
            st_size: 0x40,
        };

        let raw = sym.to_bytes();
        assert_eq!(&raw[0..4], &[0x11, 0, 0, 0]);
        assert_eq!(raw[4], 0x12);
        assert_eq!(Elf64Sym::parse(&raw), sym);
    }

    #[test]
    fn test_loader_params_default_is_empty() {
        let params = LoaderParams::default();
        assert_eq!(params.debug_info_start, params.debug_info_end);
        assert_eq!(params.symbol_table_start, params.symbol_table_end);
    }
}
