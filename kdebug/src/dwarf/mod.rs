//! # DWARF Queries
//!
//! The resolvers never walk DWARF themselves. They ask a [`DwarfQuery`]
//! implementation six questions about the sections located at boot:
//!
//! ```text
//! address ──info_by_address──▶ compile unit
//! compile unit ──file_name_by_info──▶ (file name, line program)
//! (address, line program) ──line_for_address──▶ line
//! (address, compile unit) ──function_by_info──▶ (function name, entry address)
//! name ──address_by_fname──▶ address          (.debug_pubnames)
//! name ──naive_address_by_fname──▶ address    (full .debug_info walk)
//! ```
//!
//! Names are returned as raw bytes borrowed from the sections; they are not
//! guaranteed to be valid UTF-8 and callers copy them with a bound.
//!
//! [`GimliDwarf`] answers the queries with `gimli`. Tests substitute scripted
//! implementations.

mod gimli_dwarf;

pub use gimli_dwarf::GimliDwarf;

use crate::domain::{CuOffset, LineProgramOffset, LookupError};
use crate::sections::DwarfSections;

/// Address and name lookups over the kernel's DWARF sections
pub trait DwarfQuery {
    /// Compile unit whose address ranges contain `addr`
    ///
    /// # Errors
    /// [`LookupError::NotFound`] when no unit covers `addr`.
    fn info_by_address(&self, sections: &DwarfSections<'_>, addr: u64) -> Result<CuOffset, LookupError>;

    /// Primary source file of a compile unit and the offset of its line program
    ///
    /// # Errors
    /// [`LookupError::NotFound`] when the unit lacks a name or a line program.
    fn file_name_by_info<'a>(
        &self,
        sections: &DwarfSections<'a>,
        cu: CuOffset,
    ) -> Result<(&'a [u8], LineProgramOffset), LookupError>;

    /// Source line covering `addr` according to the line program at `line`
    ///
    /// # Errors
    /// [`LookupError::NotFound`] when no row covers `addr`.
    fn line_for_address(
        &self,
        sections: &DwarfSections<'_>,
        addr: u64,
        line: LineProgramOffset,
    ) -> Result<u32, LookupError>;

    /// Innermost function of `cu` containing `addr`, with its entry address
    ///
    /// # Errors
    /// [`LookupError::NotFound`] when no function DIE contains `addr`.
    fn function_by_info<'a>(
        &self,
        sections: &DwarfSections<'a>,
        addr: u64,
        cu: CuOffset,
    ) -> Result<(&'a [u8], u64), LookupError>;

    /// Entry address of `name` via the `.debug_pubnames` accelerator table
    ///
    /// # Errors
    /// [`LookupError::NotFound`] when the table has no usable entry for `name`.
    fn address_by_fname(&self, sections: &DwarfSections<'_>, name: &str) -> Result<u64, LookupError>;

    /// Entry address of `name` by walking every DIE in `.debug_info`
    ///
    /// May succeed with address `0` when the matching DIE has no address;
    /// callers must treat that as a miss.
    ///
    /// # Errors
    /// [`LookupError::NotFound`] when no DIE carries `name`.
    fn naive_address_by_fname(&self, sections: &DwarfSections<'_>, name: &str) -> Result<u64, LookupError>;
}
