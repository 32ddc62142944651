//! ELF symbol table scanner
//!
//! Last-resort name lookup for symbols DWARF knows nothing about, such as
//! hand-written assembly entry points. The table is scanned front to back and
//! the first entry with an exactly matching name wins; no ordering is assumed.

use kdebug_common::Elf64Sym;
use object::read::StringTable;

use crate::boot::BootInfo;
use crate::domain::LookupError;

/// `.symtab` entries paired with the `.strtab` their names point into
#[derive(Debug, Clone, Copy)]
pub struct SymbolTable<'a> {
    symbols: &'a [u8],
    strings: &'a [u8],
}

impl<'a> SymbolTable<'a> {
    #[must_use]
    pub fn new(symbols: &'a [u8], strings: &'a [u8]) -> Self {
        Self { symbols, strings }
    }

    #[must_use]
    pub fn from_boot(boot: &BootInfo<'a>) -> Self {
        Self::new(boot.symbol_table, boot.string_table)
    }

    /// Number of complete entries; a trailing partial entry is ignored
    #[must_use]
    pub fn len(&self) -> usize {
        self.symbols.len() / Elf64Sym::SIZE
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Entries paired with their names, in table order
    ///
    /// Entries whose name offset falls outside the string table are skipped.
    pub fn symbols(&self) -> impl Iterator<Item = (&'a [u8], Elf64Sym)> + 'a {
        let strings = StringTable::new(self.strings, 0, self.strings.len() as u64);
        self.symbols.chunks_exact(Elf64Sym::SIZE).filter_map(move |raw| {
            let raw: &[u8; Elf64Sym::SIZE] = raw.try_into().ok()?;
            let sym = Elf64Sym::parse(raw);
            let name = strings.get(sym.st_name).ok()?;
            Some((name, sym))
        })
    }

    /// Value of the first symbol named exactly `name`
    ///
    /// # Errors
    /// [`LookupError::NotFound`] when no entry carries `name`.
    pub fn find(&self, name: &str) -> Result<u64, LookupError> {
        self.symbols()
            .find(|(sym_name, _)| *sym_name == name.as_bytes())
            .map(|(_, sym)| sym.st_value)
            .ok_or(LookupError::NotFound)
    }
}

/// Look `name` up in the symbol table the loader published.
///
/// # Errors
/// [`LookupError::NotFound`] when no entry carries `name`.
pub fn find_in_symbol_table(boot: &BootInfo<'_>, name: &str) -> Result<u64, LookupError> {
    SymbolTable::from_boot(boot).find(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Raw `.symtab`/`.strtab` with the reserved null symbol first
    fn table(entries: &[(&str, u64)]) -> (Vec<u8>, Vec<u8>) {
        let mut symbols = Elf64Sym::default().to_bytes().to_vec();
        let mut strings = vec![0];
        for &(name, value) in entries {
            let st_name = u32::try_from(strings.len()).unwrap();
            strings.extend_from_slice(name.as_bytes());
            strings.push(0);
            symbols.extend_from_slice(&Elf64Sym { st_name, st_value: value, ..Elf64Sym::default() }.to_bytes());
        }
        (symbols, strings)
    }

    #[test]
    fn test_find_symbol() {
        let (symbols, strings) = table(&[("entry", 0x0020_0000), ("memcpy", 0xf000), ("_alltraps", 0x0020_1000)]);
        let table = SymbolTable::new(&symbols, &strings);

        assert_eq!(table.len(), 4);
        assert_eq!(table.find("memcpy"), Ok(0xf000));
        assert_eq!(table.find("_alltraps"), Ok(0x0020_1000));
        assert_eq!(table.find("memset"), Err(LookupError::NotFound));
    }

    #[test]
    fn test_first_match_wins() {
        let (symbols, strings) = table(&[("dup", 0x2000), ("dup", 0x1000)]);

        assert_eq!(SymbolTable::new(&symbols, &strings).find("dup"), Ok(0x2000));
    }

    #[test]
    fn test_name_must_match_exactly() {
        let (symbols, strings) = table(&[("memcpy_fast", 0x3000)]);
        let table = SymbolTable::new(&symbols, &strings);

        assert_eq!(table.find("memcpy"), Err(LookupError::NotFound));
        assert_eq!(table.find("memcpy_fast_path"), Err(LookupError::NotFound));
    }

    #[test]
    fn test_bad_name_offset_is_skipped() {
        let (mut symbols, strings) = table(&[("ok", 0x10)]);
        let broken = Elf64Sym { st_name: 0xffff, st_value: 0x20, ..Elf64Sym::default() };
        symbols.extend_from_slice(&broken.to_bytes());

        let table = SymbolTable::new(&symbols, &strings);
        assert_eq!(table.symbols().count(), 2);
        assert_eq!(table.find("ok"), Ok(0x10));
    }

    #[test]
    fn test_partial_trailing_entry_is_ignored() {
        let (mut symbols, strings) = table(&[("tail", 0x40)]);
        symbols.extend_from_slice(&[0xaa; 7]);

        let table = SymbolTable::new(&symbols, &strings);
        assert_eq!(table.len(), 2);
        assert_eq!(table.find("tail"), Ok(0x40));
    }

    #[test]
    fn test_empty_tables() {
        let boot = BootInfo::default();
        assert!(SymbolTable::from_boot(&boot).is_empty());
        assert_eq!(find_in_symbol_table(&boot, "memcpy"), Err(LookupError::NotFound));
    }
}
