//! Debug section locator
//!
//! Copies the seven DWARF section bounds out of the boot descriptor into a
//! [`DwarfSections`] value that the DWARF queries consume. No parsing happens
//! here; an empty section simply reads as absent.

use crate::boot::BootInfo;
use gimli::SectionId;

/// Borrowed bounds of the DWARF sections the loader provides
#[derive(Debug, Clone, Copy, Default)]
pub struct DwarfSections<'a> {
    pub aranges: &'a [u8],
    pub abbrev: &'a [u8],
    pub info: &'a [u8],
    pub line: &'a [u8],
    pub str: &'a [u8],
    pub pubnames: &'a [u8],
    pub pubtypes: &'a [u8],
}

impl<'a> DwarfSections<'a> {
    /// Section data by gimli id; sections the loader never publishes are empty.
    #[must_use]
    pub fn section(&self, id: SectionId) -> &'a [u8] {
        match id {
            SectionId::DebugAranges => self.aranges,
            SectionId::DebugAbbrev => self.abbrev,
            SectionId::DebugInfo => self.info,
            SectionId::DebugLine => self.line,
            SectionId::DebugStr => self.str,
            SectionId::DebugPubNames => self.pubnames,
            SectionId::DebugPubTypes => self.pubtypes,
            _ => &[],
        }
    }

    /// True when no compile unit can be described at all
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.info.is_empty()
    }
}

/// Fetch the debug section bounds from the boot descriptor.
#[must_use]
pub fn load_debug_sections<'a>(boot: &BootInfo<'a>) -> DwarfSections<'a> {
    DwarfSections {
        aranges: boot.debug_aranges,
        abbrev: boot.debug_abbrev,
        info: boot.debug_info,
        line: boot.debug_line,
        str: boot.debug_str,
        pubnames: boot.debug_pubnames,
        pubtypes: boot.debug_pubtypes,
    }
}
