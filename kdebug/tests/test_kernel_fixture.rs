//! Resolves addresses in a small C kernel built with `-gdwarf-4 -gpubnames`
//!
//! `fixtures/trap.elf` is built from `fixtures/trap.c` (build line at the top
//! of that file). Its layout:
//!
//! ```text
//! 0x401000 _alltraps       asm only, no DWARF
//! 0x401001 trap_dispatch   lines 16-18
//! 0x40101c trap            line 22 calls trap_dispatch at 0x40102c
//! 0x401043 kern_init       line 28 calls trap at 0x40104c
//! 0x402000 trap_count      variable, listed in .debug_pubnames
//! ```

use kdebug::domain::{LookupError, Stage};
use kdebug::dwarf::{DwarfQuery, GimliDwarf};
use kdebug::image::KernelImage;
use kdebug::resolver::{NameSource, Resolver, ResolverConfig, CALL_INSN_LEN, UNKNOWN};
use kdebug::sections::load_debug_sections;

const TRAP_ELF: &[u8] = include_bytes!("fixtures/trap.elf");

/// Everything below the fixture's link address is "user space"
const USER_LIMIT: u64 = 0x0040_0000;

fn kernel() -> KernelImage {
    KernelImage::from_bytes(TRAP_ELF.to_vec()).expect("Failed to index fixture kernel")
}

fn resolver(image: &KernelImage) -> Resolver<'_, GimliDwarf> {
    Resolver::with_config(image.boot_info(), GimliDwarf::new(), ResolverConfig { user_limit: USER_LIMIT })
}

#[test]
fn test_fixture_carries_debug_sections() {
    let image = kernel();
    let boot = image.boot_info();

    assert!(!boot.debug_info.is_empty());
    assert!(!boot.debug_aranges.is_empty());
    assert!(!boot.debug_pubnames.is_empty());
    assert!(!boot.debug_line.is_empty());
    assert!(!boot.symbol_table.is_empty());
}

// ---------------------------------------------------------------------------
// resolve_address
// ---------------------------------------------------------------------------

#[test]
fn test_return_address_in_trap() {
    let image = kernel();
    let res = resolver(&image).resolve_address(0x0040_1031);

    assert!(res.is_complete(), "unexpected {:?}", res.status);
    assert_eq!(res.status_code(), 0);
    assert_eq!(res.info.rip_file, "trap.c");
    assert_eq!(res.info.rip_line, 22);
    assert_eq!(res.info.rip_fn_name, "trap");
    assert_eq!(res.info.rip_fn_namelen(), 4);
    assert_eq!(res.info.rip_fn_addr, 0x0040_101c);
    assert_eq!(res.info.offset_in_fn(), 0x15);
}

#[test]
fn test_return_address_in_kern_init() {
    let image = kernel();
    let res = resolver(&image).resolve_address(0x0040_1051);

    assert!(res.is_complete(), "unexpected {:?}", res.status);
    assert_eq!(res.info.rip_file, "trap.c");
    assert_eq!(res.info.rip_line, 28);
    assert_eq!(res.info.rip_fn_name, "kern_init");
    assert_eq!(res.info.rip_fn_addr, 0x0040_1043);
}

#[test]
fn test_call_site_line_differs_from_return_address_line() {
    let image = kernel();
    let sections = load_debug_sections(&image.boot_info());
    let dwarf = GimliDwarf::new();

    let cu = dwarf.info_by_address(&sections, 0x0040_1031).unwrap();
    let (_, line_program) = dwarf.file_name_by_info(&sections, cu).unwrap();

    // The return address starts line 23; the call before it is on line 22
    assert_eq!(dwarf.line_for_address(&sections, 0x0040_1031, line_program), Ok(23));
    assert_eq!(resolver(&image).resolve_address(0x0040_1031).info.rip_line, 22);
}

#[test]
fn test_address_without_line_keeps_file() {
    let image = kernel();
    // Call site 0x401000 is the asm stub: inside the unit, outside the line table
    let res = resolver(&image).resolve_address(0x0040_1000 + CALL_INSN_LEN);

    let err = res.status.unwrap_err();
    assert_eq!(err.stage, Stage::Line);
    assert_eq!(res.status_code(), LookupError::NotFound.code());
    assert_eq!(res.info.rip_file, "trap.c");
    assert_eq!(res.info.rip_line, 0);
    assert_eq!(res.info.rip_fn_name, UNKNOWN);
}

#[test]
fn test_address_outside_any_unit() {
    let image = kernel();
    let res = resolver(&image).resolve_address(0x0040_1100);

    assert_eq!(res.status.unwrap_err().stage, Stage::CompileUnit);
    assert_eq!(res.info.rip_file, UNKNOWN);
    assert_eq!(res.info.rip_fn_addr, 0x0040_1100);
}

#[test]
fn test_unit_ranges_used_without_aranges() {
    let image = kernel();
    let mut boot = image.boot_info();
    boot.debug_aranges = &[];
    let resolver = Resolver::with_config(boot, GimliDwarf::new(), ResolverConfig { user_limit: USER_LIMIT });

    let res = resolver.resolve_address(0x0040_1031);
    assert!(res.is_complete(), "unexpected {:?}", res.status);
    assert_eq!(res.info.rip_fn_name, "trap");
}

#[test]
fn test_unreadable_aranges_fall_back_to_unit_ranges() {
    let image = kernel();
    let mut boot = image.boot_info();
    // Header claims a 44-byte set but the section is cut short
    let aranges = boot.debug_aranges;
    boot.debug_aranges = &aranges[..10];
    let resolver = Resolver::with_config(boot, GimliDwarf::new(), ResolverConfig { user_limit: USER_LIMIT });

    let res = resolver.resolve_address(0x0040_1051);
    assert!(res.is_complete(), "unexpected {:?}", res.status);
    assert_eq!(res.info.rip_line, 28);
    assert_eq!(res.info.rip_fn_name, "kern_init");
}

// ---------------------------------------------------------------------------
// resolve_function
// ---------------------------------------------------------------------------

#[test]
fn test_functions_found_through_pubnames() {
    let image = kernel();
    let resolver = resolver(&image);

    for (name, address) in [("trap_dispatch", 0x0040_1001), ("trap", 0x0040_101c), ("kern_init", 0x0040_1043)] {
        let resolved = resolver.resolve_function(name).expect("function should resolve");
        assert_eq!(resolved.address, address, "{name}");
        assert_eq!(resolved.source, NameSource::PubNames, "{name}");
    }
}

#[test]
fn test_pubnames_and_full_walk_agree() {
    let image = kernel();
    let sections = load_debug_sections(&image.boot_info());
    let dwarf = GimliDwarf::new();

    for name in ["trap_dispatch", "trap", "kern_init"] {
        let fast = dwarf.address_by_fname(&sections, name).unwrap();
        let slow = dwarf.naive_address_by_fname(&sections, name).unwrap();
        assert_eq!(fast, slow, "{name}");
    }
}

#[test]
fn test_full_walk_used_without_pubnames() {
    let image = kernel();
    let mut boot = image.boot_info();
    boot.debug_pubnames = &[];
    let resolver = Resolver::with_config(boot, GimliDwarf::new(), ResolverConfig { user_limit: USER_LIMIT });

    let resolved = resolver.resolve_function("trap").unwrap();
    assert_eq!(resolved.address, 0x0040_101c);
    assert_eq!(resolved.source, NameSource::DebugInfo);
}

#[test]
fn test_pubnames_entry_without_address_is_skipped() {
    let image = kernel();
    let sections = load_debug_sections(&image.boot_info());

    // trap_count is listed in .debug_pubnames but its DIE is a variable with no low_pc
    assert_eq!(GimliDwarf::new().address_by_fname(&sections, "trap_count"), Err(LookupError::NotFound));

    let resolved = resolver(&image).resolve_function("trap_count").unwrap();
    assert_eq!(resolved.address, 0x0040_2000);
    assert_eq!(resolved.source, NameSource::SymbolTable);
}

#[test]
fn test_asm_symbol_found_in_symbol_table() {
    let image = kernel();
    let resolved = resolver(&image).resolve_function("_alltraps").unwrap();

    assert_eq!(resolved.address, 0x0040_1000);
    assert_eq!(resolved.source, NameSource::SymbolTable);
}

#[test]
fn test_unknown_function_is_not_found() {
    let image = kernel();
    assert_eq!(resolver(&image).resolve_function("page_fault_handler"), None);
}

// ---------------------------------------------------------------------------
// Cross-check
// ---------------------------------------------------------------------------

#[test]
fn test_lines_match_addr2line() {
    use object::{Object, ObjectSection};

    let file = object::File::parse(TRAP_ELF).expect("Failed to parse fixture");
    let dwarf = gimli::Dwarf::load(|id| -> Result<_, gimli::Error> {
        let bytes = file.section_by_name(id.name()).and_then(|s| s.data().ok()).unwrap_or(&[]);
        Ok(gimli::EndianSlice::new(bytes, gimli::LittleEndian))
    })
    .expect("Failed to load DWARF");
    let context = addr2line::Context::from_dwarf(dwarf).expect("Failed to build addr2line context");

    let image = kernel();
    let resolver = resolver(&image);

    for call_site in [0x0040_1001, 0x0040_1008, 0x0040_101c, 0x0040_102c, 0x0040_1040, 0x0040_104c] {
        let res = resolver.resolve_address(call_site + CALL_INSN_LEN);
        assert!(res.is_complete(), "0x{call_site:x}: {:?}", res.status);

        let location = context
            .find_location(call_site)
            .expect("addr2line lookup failed")
            .expect("addr2line found no location");
        assert_eq!(Some(res.info.rip_line), location.line, "line at 0x{call_site:x}");
    }
}
