//! Return address → source location

use log::{debug, trace};

use super::{Resolver, RipDebugInfo, CALL_INSN_LEN};
use crate::domain::{ResolveError, Stage};
use crate::dwarf::DwarfQuery;
use crate::sections::load_debug_sections;

/// Record produced for one address, plus the first stage that failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AddressResolution {
    pub info: RipDebugInfo,
    pub status: Result<(), ResolveError>,
}

impl AddressResolution {
    /// `0` when every stage succeeded, otherwise the failing query's negative status
    #[must_use]
    pub fn status_code(&self) -> i32 {
        match &self.status {
            Ok(()) => 0,
            Err(e) => e.code(),
        }
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.status.is_ok()
    }
}

impl<D: DwarfQuery> Resolver<'_, D> {
    /// Look up file, line and enclosing function for a return address.
    ///
    /// `addr` is a return address as found on the stack; line and function are
    /// resolved for the call instruction [`CALL_INSN_LEN`] bytes before it.
    /// The record is always fully initialized, with `<unknown>`/`0` in the
    /// fields no stage could fill.
    ///
    /// # Panics
    /// If `addr` is nonzero and below [`ResolverConfig::user_limit`]. Only
    /// kernel addresses are described by the debug tables.
    ///
    /// [`ResolverConfig::user_limit`]: super::ResolverConfig::user_limit
    pub fn resolve_address(&self, addr: u64) -> AddressResolution {
        let mut info = RipDebugInfo::unknown(addr);
        if addr == 0 {
            return AddressResolution { info, status: Ok(()) };
        }

        assert!(
            addr >= self.config.user_limit,
            "address 0x{addr:x} is below the kernel boundary 0x{:x}",
            self.config.user_limit
        );

        let status = self.fill_debug_info(addr, &mut info);
        match &status {
            Ok(()) => trace!("0x{addr:x} -> {}:{} {}", info.rip_file, info.rip_line, info.rip_fn_name),
            Err(e) => debug!("0x{addr:x}: {e} (status {})", e.code()),
        }

        AddressResolution { info, status }
    }

    fn fill_debug_info(&self, addr: u64, info: &mut RipDebugInfo) -> Result<(), ResolveError> {
        let sections = load_debug_sections(&self.boot);

        let cu = self
            .dwarf
            .info_by_address(&sections, addr)
            .map_err(|e| ResolveError::new(Stage::CompileUnit, e))?;

        let (file, line_program) = self
            .dwarf
            .file_name_by_info(&sections, cu)
            .map_err(|e| ResolveError::new(Stage::FileName, e))?;
        info.rip_file.set(file);

        // Line and function tables describe the call, not the return address
        let call_site = addr.saturating_sub(CALL_INSN_LEN);

        info.rip_line = self
            .dwarf
            .line_for_address(&sections, call_site, line_program)
            .map_err(|e| ResolveError::new(Stage::Line, e))?;

        let (fn_name, fn_addr) = self
            .dwarf
            .function_by_info(&sections, call_site, cu)
            .map_err(|e| ResolveError::new(Stage::Function, e))?;
        info.rip_fn_name.set(fn_name);
        info.rip_fn_addr = fn_addr;

        Ok(())
    }
}
