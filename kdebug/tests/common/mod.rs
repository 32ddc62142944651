//! Helpers shared by the integration tests

use kdebug_common::Elf64Sym;

/// Builds `.symtab`/`.strtab` images in the layout a linker produces.
pub struct SymbolTableBuilder {
    symbols: Vec<u8>,
    strings: Vec<u8>,
}

impl SymbolTableBuilder {
    /// Starts with the reserved null symbol, whose name is empty
    pub fn new() -> Self {
        Self { symbols: Elf64Sym::default().to_bytes().to_vec(), strings: vec![0] }
    }

    /// Append a symbol; names are stored NUL-terminated.
    pub fn symbol(mut self, name: &str, value: u64) -> Self {
        let st_name = u32::try_from(self.strings.len()).expect("string table too large");
        self.strings.extend_from_slice(name.as_bytes());
        self.strings.push(0);

        let sym = Elf64Sym { st_name, st_value: value, ..Elf64Sym::default() };
        self.symbols.extend_from_slice(&sym.to_bytes());
        self
    }

    /// Raw `(symbols, strings)` sections
    pub fn build(self) -> (Vec<u8>, Vec<u8>) {
        (self.symbols, self.strings)
    }
}
