//! Host-side kernel image loader
//!
//! Plays the bootloader's part outside the kernel: reads an ELF image, notes
//! where each section the loader would publish lives in the file, and hands
//! out a [`BootInfo`] over those bytes. The section bounds are kept in a
//! [`LoaderParams`] holding file offsets instead of addresses.

use kdebug_common::LoaderParams;
use log::{info, warn};
use object::{Object, ObjectSection};
use std::fs;
use std::path::Path;

use crate::boot::BootInfo;
use crate::domain::ImageError;

/// A kernel ELF file held in memory
#[derive(Debug)]
pub struct KernelImage {
    data: Vec<u8>,
    params: LoaderParams,
}

impl KernelImage {
    /// Read and index a kernel image.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read, is not a 64-bit
    /// little-endian ELF, or has no `.debug_info` and no `.symtab`.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, ImageError> {
        let data = fs::read(path.as_ref())?;
        Self::from_bytes(data)
    }

    /// Index an image already in memory.
    ///
    /// # Errors
    /// See [`KernelImage::open`].
    pub fn from_bytes(data: Vec<u8>) -> Result<Self, ImageError> {
        let params = index_sections(&data)?;
        Ok(Self { data, params })
    }

    /// Section view equivalent to what the loader publishes at boot
    #[must_use]
    pub fn boot_info(&self) -> BootInfo<'_> {
        BootInfo::from_image_offsets(&self.data, &self.params)
    }

    /// File offsets of every published section
    #[must_use]
    pub fn params(&self) -> &LoaderParams {
        &self.params
    }
}

fn index_sections(data: &[u8]) -> Result<LoaderParams, ImageError> {
    let file = object::File::parse(data).map_err(|e| ImageError::Parse(e.to_string()))?;

    if !file.is_64() {
        return Err(ImageError::Unsupported("32-bit images are not supported".into()));
    }
    if !file.is_little_endian() {
        return Err(ImageError::Unsupported("big-endian images are not supported".into()));
    }

    let range = |name: &str| -> (u64, u64) {
        match file.section_by_name(name).and_then(|section| section.file_range()) {
            Some((offset, size)) => (offset, offset + size),
            None => (0, 0),
        }
    };

    let mut params = LoaderParams::default();
    (params.debug_aranges_start, params.debug_aranges_end) = range(".debug_aranges");
    (params.debug_abbrev_start, params.debug_abbrev_end) = range(".debug_abbrev");
    (params.debug_info_start, params.debug_info_end) = range(".debug_info");
    (params.debug_line_start, params.debug_line_end) = range(".debug_line");
    (params.debug_str_start, params.debug_str_end) = range(".debug_str");
    (params.debug_pubnames_start, params.debug_pubnames_end) = range(".debug_pubnames");
    (params.debug_pubtypes_start, params.debug_pubtypes_end) = range(".debug_pubtypes");
    (params.symbol_table_start, params.symbol_table_end) = range(".symtab");
    (params.string_table_start, params.string_table_end) = range(".strtab");

    let has_dwarf = params.debug_info_end > params.debug_info_start;
    let has_symtab = params.symbol_table_end > params.symbol_table_start;
    if !has_dwarf && !has_symtab {
        return Err(ImageError::MissingSection(".debug_info"));
    }
    if !has_dwarf {
        warn!("Image has no DWARF; only symbol table lookups will succeed");
    }

    info!(
        "Indexed image: .debug_info {} KB, .debug_line {} KB, .symtab {} entries",
        (params.debug_info_end - params.debug_info_start) / 1024,
        (params.debug_line_end - params.debug_line_start) / 1024,
        (params.symbol_table_end - params.symbol_table_start) / kdebug_common::Elf64Sym::SIZE as u64
    );

    Ok(params)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_non_elf() {
        let err = KernelImage::from_bytes(b"definitely not an ELF file".to_vec()).unwrap_err();
        assert!(matches!(err, ImageError::Parse(_)), "unexpected {err:?}");
    }

    #[test]
    fn test_missing_file() {
        let err = KernelImage::open("/nonexistent/kernel.elf").unwrap_err();
        assert!(matches!(err, ImageError::Io(_)));
    }

    #[test]
    fn test_indexes_own_executable() {
        let exe = std::env::current_exe().expect("Failed to get current exe");
        let image = KernelImage::open(&exe).expect("Failed to index test executable");
        let boot = image.boot_info();

        assert!(!boot.debug_info.is_empty(), "test executable should carry DWARF");
        assert!(!boot.symbol_table.is_empty());
        assert_eq!(boot.symbol_table.len() % kdebug_common::Elf64Sym::SIZE, 0);
    }
}
