//! Text and JSON rendering of resolver results

#![allow(clippy::format_push_string)]

use rustc_demangle::demangle;
use serde::Serialize;

use crate::resolver::{AddressResolution, ResolvedFunction, RipDebugInfo};

/// Demangle a Rust symbol name; other names pass through unchanged
#[must_use]
pub fn demangle_symbol(symbol: &str) -> String {
    format!("{:#}", demangle(symbol))
}

fn function_name(info: &RipDebugInfo, demangled: bool) -> String {
    let name = info.rip_fn_name.as_str();
    if demangled {
        demangle_symbol(name)
    } else {
        name.to_string()
    }
}

/// Format one resolved address like a backtrace frame
#[must_use]
pub fn format_frame(frame_num: usize, resolution: &AddressResolution, demangled: bool) -> String {
    let info = &resolution.info;
    let mut output = format!(
        "#{frame_num:<2} 0x{:016x} {}+{}",
        info.rip,
        function_name(info, demangled),
        info.offset_in_fn()
    );
    output.push_str(&format!("\n      at {}:{}", info.rip_file, info.rip_line));

    if let Err(ref e) = resolution.status {
        output.push_str(&format!("  [{e}]"));
    }

    output
}

/// Format a function lookup result
#[must_use]
pub fn format_function(name: &str, resolved: Option<&ResolvedFunction>) -> String {
    match resolved {
        Some(f) => format!("{name} = 0x{:016x} (from {})", f.address, f.source),
        None => format!("{name}: not found"),
    }
}

#[derive(Serialize)]
struct FrameJson<'a> {
    frame: usize,
    status: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(flatten)]
    info: &'a RipDebugInfo,
    #[serde(skip_serializing_if = "Option::is_none")]
    demangled: Option<String>,
}

/// JSON object for one resolved address
///
/// # Errors
/// Returns an error if serialization fails.
pub fn frame_json(frame_num: usize, resolution: &AddressResolution, demangled: bool) -> serde_json::Result<String> {
    let info = &resolution.info;
    serde_json::to_string(&FrameJson {
        frame: frame_num,
        status: resolution.status_code(),
        error: resolution.status.err().map(|e| e.to_string()),
        info,
        demangled: demangled.then(|| function_name(info, true)),
    })
}

#[derive(Serialize)]
struct FunctionJson<'a> {
    name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    address: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    source: Option<crate::resolver::NameSource>,
}

/// JSON object for one function lookup
///
/// # Errors
/// Returns an error if serialization fails.
pub fn function_json(name: &str, resolved: Option<&ResolvedFunction>) -> serde_json::Result<String> {
    serde_json::to_string(&FunctionJson {
        name,
        address: resolved.map(|f| f.address),
        source: resolved.map(|f| f.source),
    })
}
