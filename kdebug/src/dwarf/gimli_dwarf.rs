//! `gimli`-backed implementation of the DWARF queries
//!
//! Every query builds a `gimli::Dwarf` over the located sections (a handful of
//! slice copies, no parsing) and walks only what it needs. Readers borrow the
//! section memory directly, so returned names live as long as the sections.

use gimli::{AttributeValue, DebugPubNames, EndianSlice, LittleEndian, SectionId};
use log::{debug, trace};
use std::num::NonZeroU64;

use super::DwarfQuery;
use crate::domain::{CuOffset, LineProgramOffset, LookupError};
use crate::sections::DwarfSections;

type Reader<'a> = EndianSlice<'a, LittleEndian>;
type Dwarf<'a> = gimli::Dwarf<Reader<'a>>;
type Unit<'a> = gimli::Unit<Reader<'a>>;
type Entry<'abbrev, 'unit, 'a> = gimli::DebuggingInformationEntry<'abbrev, 'unit, Reader<'a>>;

/// Pointer width of the kernel image
const ADDRESS_SIZE: u8 = 8;

/// DWARF queries answered by parsing the sections with `gimli`
#[derive(Debug, Clone, Copy, Default)]
pub struct GimliDwarf;

impl GimliDwarf {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl DwarfQuery for GimliDwarf {
    fn info_by_address(&self, sections: &DwarfSections<'_>, addr: u64) -> Result<CuOffset, LookupError> {
        let dwarf = load_dwarf(sections)?;

        if !sections.aranges.is_empty() {
            match find_in_aranges(&dwarf, addr) {
                Ok(Some(offset)) => {
                    trace!("0x{addr:x} covered by aranges set for {}", CuOffset::from(offset));
                    return Ok(offset.into());
                }
                Ok(None) => {}
                Err(e) => debug!("Unreadable .debug_aranges, walking units instead: {e}"),
            }
        }

        // No usable accelerator entry; fall back to each unit's own ranges
        let mut headers = dwarf.units();
        while let Some(header) = headers.next()? {
            let Some(offset) = header.offset().as_debug_info_offset() else {
                continue;
            };
            let unit = dwarf.unit(header)?;
            match unit_contains(&dwarf, &unit, addr) {
                Ok(true) => return Ok(offset.into()),
                Ok(false) => {}
                Err(e) => trace!("Skipping ranges of {}: {e}", CuOffset::from(offset)),
            }
        }

        Err(LookupError::NotFound)
    }

    fn file_name_by_info<'a>(
        &self,
        sections: &DwarfSections<'a>,
        cu: CuOffset,
    ) -> Result<(&'a [u8], LineProgramOffset), LookupError> {
        let dwarf = load_dwarf(sections)?;
        let unit = unit_at(&dwarf, cu)?;

        let name = unit.name.ok_or(LookupError::NotFound)?;
        let program = unit.line_program.as_ref().ok_or(LookupError::NotFound)?;

        Ok((name.slice(), program.header().offset().into()))
    }

    fn line_for_address(
        &self,
        sections: &DwarfSections<'_>,
        addr: u64,
        line: LineProgramOffset,
    ) -> Result<u32, LookupError> {
        let dwarf = load_dwarf(sections)?;
        let program = dwarf.debug_line.program(line.into(), ADDRESS_SIZE, None, None)?;

        // Each row opens a span that runs up to the next row of the same sequence
        let mut rows = program.rows();
        let mut open: Option<(u64, Option<NonZeroU64>)> = None;
        while let Some((_, row)) = rows.next_row()? {
            let address = row.address();
            if let Some((start, line)) = open {
                if start <= addr && addr < address {
                    let line = line.ok_or(LookupError::NotFound)?;
                    return Ok(u32::try_from(line.get()).unwrap_or(u32::MAX));
                }
            }
            open = if row.end_sequence() { None } else { Some((address, row.line())) };
        }

        Err(LookupError::NotFound)
    }

    fn function_by_info<'a>(
        &self,
        sections: &DwarfSections<'a>,
        addr: u64,
        cu: CuOffset,
    ) -> Result<(&'a [u8], u64), LookupError> {
        let dwarf = load_dwarf(sections)?;
        let unit = unit_at(&dwarf, cu)?;

        // (depth, DIE, entry address) of the deepest subprogram seen so far
        let mut innermost: Option<(isize, gimli::UnitOffset, u64)> = None;
        let mut depth = 0isize;
        let mut entries = unit.entries();
        while let Some((delta, entry)) = entries.next_dfs()? {
            depth += delta;
            if entry.tag() != gimli::DW_TAG_subprogram {
                continue;
            }
            let Some(start) = entry_start_if_contains(&dwarf, &unit, entry, addr)? else {
                continue;
            };
            if innermost.map_or(true, |(best, _, _)| depth > best) {
                innermost = Some((depth, entry.offset(), start));
            }
        }

        let (_, offset, start) = innermost.ok_or(LookupError::NotFound)?;
        let entry = unit.entry(offset)?;
        let name = entry_name(&dwarf, &unit, &entry)?.ok_or(LookupError::NotFound)?;

        Ok((name.slice(), start))
    }

    fn address_by_fname(&self, sections: &DwarfSections<'_>, name: &str) -> Result<u64, LookupError> {
        if sections.pubnames.is_empty() {
            return Err(LookupError::NotFound);
        }

        let dwarf = load_dwarf(sections)?;
        let pubnames = DebugPubNames::new(sections.pubnames, LittleEndian);

        let mut items = pubnames.items();
        while let Some(item) = items.next()? {
            if item.name().slice() != name.as_bytes() {
                continue;
            }

            let header = dwarf.debug_info.header_from_offset(item.unit_header_offset())?;
            let unit = dwarf.unit(header)?;
            let entry = unit.entry(item.die_offset())?;
            if let Some(addr) = low_pc(&dwarf, &unit, &entry)? {
                return Ok(addr);
            }
            trace!("pubnames entry for {name} has no address, continuing");
        }

        Err(LookupError::NotFound)
    }

    fn naive_address_by_fname(&self, sections: &DwarfSections<'_>, name: &str) -> Result<u64, LookupError> {
        let dwarf = load_dwarf(sections)?;

        let mut headers = dwarf.units();
        while let Some(header) = headers.next()? {
            let unit = dwarf.unit(header)?;
            let mut entries = unit.entries();
            while let Some((_, entry)) = entries.next_dfs()? {
                if entry.tag() != gimli::DW_TAG_subprogram && entry.tag() != gimli::DW_TAG_label {
                    continue;
                }
                let Some(attr) = entry.attr(gimli::DW_AT_name)? else {
                    continue;
                };
                let Ok(entry_name) = dwarf.attr_string(&unit, attr.value()) else {
                    continue;
                };
                if entry_name.slice() == name.as_bytes() {
                    // Declarations match by name but carry no address
                    return Ok(low_pc(&dwarf, &unit, entry)?.unwrap_or(0));
                }
            }
        }

        Err(LookupError::NotFound)
    }
}

fn load_dwarf<'a>(sections: &DwarfSections<'a>) -> Result<Dwarf<'a>, LookupError> {
    let load_section = |id: SectionId| -> Result<Reader<'a>, gimli::Error> {
        Ok(EndianSlice::new(sections.section(id), LittleEndian))
    };
    Ok(gimli::Dwarf::load(load_section)?)
}

fn unit_at<'a>(dwarf: &Dwarf<'a>, cu: CuOffset) -> Result<Unit<'a>, LookupError> {
    let header = dwarf.debug_info.header_from_offset(cu.into())?;
    Ok(dwarf.unit(header)?)
}

fn find_in_aranges(dwarf: &Dwarf<'_>, addr: u64) -> gimli::Result<Option<gimli::DebugInfoOffset<usize>>> {
    let mut headers = dwarf.debug_aranges.headers();
    while let Some(header) = headers.next()? {
        let mut entries = header.entries();
        while let Some(entry) = entries.next()? {
            let begin = entry.address();
            if begin <= addr && addr < begin.wrapping_add(entry.length()) {
                return Ok(Some(header.debug_info_offset()));
            }
        }
    }
    Ok(None)
}

fn unit_contains<'a>(dwarf: &Dwarf<'a>, unit: &Unit<'a>, addr: u64) -> gimli::Result<bool> {
    let mut ranges = dwarf.unit_ranges(unit)?;
    while let Some(range) = ranges.next()? {
        if range.begin <= addr && addr < range.end {
            return Ok(true);
        }
    }
    Ok(false)
}

/// Lowest start address of `entry` if any of its ranges contains `addr`
fn entry_start_if_contains<'a>(
    dwarf: &Dwarf<'a>,
    unit: &Unit<'a>,
    entry: &Entry<'_, '_, 'a>,
    addr: u64,
) -> gimli::Result<Option<u64>> {
    let mut ranges = dwarf.die_ranges(unit, entry)?;
    let mut lowest: Option<u64> = None;
    let mut contains = false;
    while let Some(range) = ranges.next()? {
        contains |= range.begin <= addr && addr < range.end;
        lowest = Some(lowest.map_or(range.begin, |low| low.min(range.begin)));
    }
    Ok(if contains { lowest } else { None })
}

fn low_pc<'a>(dwarf: &Dwarf<'a>, unit: &Unit<'a>, entry: &Entry<'_, '_, 'a>) -> gimli::Result<Option<u64>> {
    match entry.attr_value(gimli::DW_AT_low_pc)? {
        Some(value) => dwarf.attr_address(unit, value),
        None => Ok(None),
    }
}

/// `DW_AT_name` of `entry`, or of the declaration it completes
fn entry_name<'a>(
    dwarf: &Dwarf<'a>,
    unit: &Unit<'a>,
    entry: &Entry<'_, '_, 'a>,
) -> gimli::Result<Option<Reader<'a>>> {
    if let Some(attr) = entry.attr(gimli::DW_AT_name)? {
        return dwarf.attr_string(unit, attr.value()).map(Some);
    }

    for link in [gimli::DW_AT_specification, gimli::DW_AT_abstract_origin] {
        if let Some(AttributeValue::UnitRef(offset)) = entry.attr_value(link)? {
            let origin = unit.entry(offset)?;
            if let Some(attr) = origin.attr(gimli::DW_AT_name)? {
                return dwarf.attr_string(unit, attr.value()).map(Some);
            }
        }
    }

    Ok(None)
}
