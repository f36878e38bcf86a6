//! Helpers shared by every bluetc crate: command line number parsing and hex conversion.

pub mod hex;
pub mod parse;

pub use parse::{get_size, get_u32, sprint_size, ParseNumError};

#[allow(non_upper_case_globals)]
pub mod constants {
    pub const KiB: u32 = 1024;
    pub const MiB: u32 = 1024 * KiB;
    pub const GiB: u32 = 1024 * MiB;
}
