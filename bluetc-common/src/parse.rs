//! Number parsing for command line tokens.
//!
//! The grammar follows what `tc` accepts for qdisc parameters:
//!
//! - [`get_u32`]: an unsigned integer in C notation. A `0x`/`0X` prefix selects hex, a
//!   leading `0` selects octal, anything else is decimal. Signs, whitespace and trailing
//!   characters are rejected.
//! - [`get_size`]: a (possibly fractional) amount of bytes with an optional unit suffix
//!   (`b`, `k`/`kb`, `m`/`mb`, `g`/`gb`, `kbit`, `mbit`, `gbit`), case-insensitive.

use thiserror::Error;

use crate::constants::{GiB, KiB, MiB};

/// Errors returned by the token parsers in this module.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseNumError {
    #[error("empty value")]
    Empty,
    #[error("\"{0}\" is not a valid number")]
    Invalid(String),
    #[error("\"{0}\" is out of range")]
    OutOfRange(String),
    #[error("unknown unit in \"{0}\"")]
    UnknownUnit(String),
}

/// Parses an unsigned 32-bit integer, auto-detecting the base from its prefix.
pub fn get_u32(arg: &str) -> Result<u32, ParseNumError> {
    if arg.is_empty() {
        return Err(ParseNumError::Empty);
    }

    let (digits, radix) =
        if let Some(hex) = arg.strip_prefix("0x").or_else(|| arg.strip_prefix("0X")) {
            (hex, 16)
        } else if arg.len() > 1 && arg.starts_with('0') {
            (&arg[1..], 8)
        } else {
            (arg, 10)
        };

    // `from_str_radix` tolerates a leading `+`; signs are rejected outright.
    if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
        return Err(ParseNumError::Invalid(arg.to_owned()));
    }

    u32::from_str_radix(digits, radix).map_err(|_| ParseNumError::OutOfRange(arg.to_owned()))
}

/// Parses a size in bytes with an optional unit suffix.
pub fn get_size(arg: &str) -> Result<u32, ParseNumError> {
    if arg.is_empty() {
        return Err(ParseNumError::Empty);
    }

    let split = arg
        .find(|c: char| !(c.is_ascii_digit() || matches!(c, '.' | 'e' | 'E' | '+' | '-')))
        .unwrap_or(arg.len());
    let (number, unit) = arg.split_at(split);

    let value: f64 = number.parse().map_err(|_| ParseNumError::Invalid(arg.to_owned()))?;
    if !value.is_finite() || value < 0.0 {
        return Err(ParseNumError::OutOfRange(arg.to_owned()));
    }

    let multiplier = match unit.to_ascii_lowercase().as_str() {
        "" | "b" => 1.0,
        "k" | "kb" => KiB as f64,
        "m" | "mb" => MiB as f64,
        "g" | "gb" => GiB as f64,
        "kbit" => (KiB / 8) as f64,
        "mbit" => (MiB / 8) as f64,
        "gbit" => (GiB / 8) as f64,
        _ => return Err(ParseNumError::UnknownUnit(arg.to_owned())),
    };

    let size = value * multiplier;
    if size > u32::MAX as f64 {
        return Err(ParseNumError::OutOfRange(arg.to_owned()));
    }

    Ok(size as u32)
}

/// Formats a size in bytes the way `tc` prints it back: whole megabytes as `Mb`, whole
/// kilobytes as `Kb`, anything else as `b`. Small remainders are rounded away.
pub fn sprint_size(size: u32) -> String {
    let size = size as f64;
    let mib = (size / MiB as f64).round();
    let kib = (size / KiB as f64).round();

    if size >= MiB as f64 && (mib * MiB as f64 - size).abs() < KiB as f64 {
        format!("{mib}Mb")
    } else if size >= KiB as f64 && (kib * KiB as f64 - size).abs() < 16.0 {
        format!("{kib}Kb")
    } else {
        format!("{size}b")
    }
}
