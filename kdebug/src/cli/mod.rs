//! Command-line interface of the host tool

pub mod args;
pub mod output;

pub use args::{parse_address, Args, Command};
