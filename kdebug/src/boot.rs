//! Boot-time section bounds
//!
//! [`BootInfo`] is the kernel's view of the loader descriptor: every region the
//! loader published, as a byte slice. It is built once at startup and passed to
//! the resolvers, which only ever borrow it.

use kdebug_common::LoaderParams;
use log::warn;

/// Byte regions published by the loader
///
/// An empty slice means the loader did not provide that region.
#[derive(Debug, Clone, Copy, Default)]
pub struct BootInfo<'a> {
    pub debug_aranges: &'a [u8],
    pub debug_abbrev: &'a [u8],
    pub debug_info: &'a [u8],
    pub debug_line: &'a [u8],
    pub debug_str: &'a [u8],
    pub debug_pubnames: &'a [u8],
    pub debug_pubtypes: &'a [u8],
    pub symbol_table: &'a [u8],
    pub string_table: &'a [u8],
}

impl BootInfo<'static> {
    /// Build the section view from the descriptor the loader left in memory.
    ///
    /// # Safety
    /// Every non-empty `start..end` pair in `params` must describe memory that is
    /// mapped, readable and never written for the rest of the kernel's life.
    #[allow(unsafe_code)]
    #[must_use]
    pub unsafe fn from_loader_params(params: &LoaderParams) -> Self {
        // SAFETY: forwarded to the caller, see above
        Self {
            debug_aranges: memory_region(params.debug_aranges_start, params.debug_aranges_end),
            debug_abbrev: memory_region(params.debug_abbrev_start, params.debug_abbrev_end),
            debug_info: memory_region(params.debug_info_start, params.debug_info_end),
            debug_line: memory_region(params.debug_line_start, params.debug_line_end),
            debug_str: memory_region(params.debug_str_start, params.debug_str_end),
            debug_pubnames: memory_region(params.debug_pubnames_start, params.debug_pubnames_end),
            debug_pubtypes: memory_region(params.debug_pubtypes_start, params.debug_pubtypes_end),
            symbol_table: memory_region(params.symbol_table_start, params.symbol_table_end),
            string_table: memory_region(params.string_table_start, params.string_table_end),
        }
    }
}

impl<'a> BootInfo<'a> {
    /// Build the section view from a descriptor whose pairs are offsets into `image`.
    ///
    /// Pairs that fall outside `image` are treated as absent.
    #[must_use]
    pub fn from_image_offsets(image: &'a [u8], params: &LoaderParams) -> Self {
        let region = |start: u64, end: u64| image_region(image, start, end);

        Self {
            debug_aranges: region(params.debug_aranges_start, params.debug_aranges_end),
            debug_abbrev: region(params.debug_abbrev_start, params.debug_abbrev_end),
            debug_info: region(params.debug_info_start, params.debug_info_end),
            debug_line: region(params.debug_line_start, params.debug_line_end),
            debug_str: region(params.debug_str_start, params.debug_str_end),
            debug_pubnames: region(params.debug_pubnames_start, params.debug_pubnames_end),
            debug_pubtypes: region(params.debug_pubtypes_start, params.debug_pubtypes_end),
            symbol_table: region(params.symbol_table_start, params.symbol_table_end),
            string_table: region(params.string_table_start, params.string_table_end),
        }
    }
}

/// # Safety
/// See [`BootInfo::from_loader_params`].
#[allow(unsafe_code)]
unsafe fn memory_region(start: u64, end: u64) -> &'static [u8] {
    if start == 0 || end <= start {
        if end < start {
            warn!("Ignoring inverted region 0x{start:x}..0x{end:x}");
        }
        return &[];
    }

    let Ok(len) = usize::try_from(end - start) else {
        warn!("Ignoring oversized region 0x{start:x}..0x{end:x}");
        return &[];
    };

    // SAFETY: the loader guarantees start..end is mapped and immutable
    unsafe { core::slice::from_raw_parts(start as usize as *const u8, len) }
}

fn image_region(image: &[u8], start: u64, end: u64) -> &[u8] {
    if end < start {
        warn!("Ignoring inverted region 0x{start:x}..0x{end:x}");
        return &[];
    }

    let (Ok(start), Ok(end)) = (usize::try_from(start), usize::try_from(end)) else {
        return &[];
    };
    image.get(start..end).unwrap_or(&[])
}
