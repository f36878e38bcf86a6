//! Traffic control attribute types and the records they carry.
//!
//! A qdisc request (`RTM_NEWQDISC`) carries its kind in `TCA_KIND` and its configuration in
//! `TCA_OPTIONS`. Depending on the qdisc, `TCA_OPTIONS` either holds a raw options struct
//! or nests further attributes:
//!
//! ```text
//! TCA_OPTIONS (nested)
//! └── TCA_FIFO_PARMS
//!     └── struct tc_fifo_qopt { __u32 limit; }
//! ```
//!
//! Statistics come back in `TCA_STATS_APP` (or the legacy `TCA_XSTATS`) as a qdisc
//! specific record, such as [`blue::ExtendedStats`].

pub mod blue;
pub mod fifo;

/// `TCA_KIND`: the qdisc identifier string.
pub const TCA_KIND: u16 = 1;
/// `TCA_OPTIONS`: qdisc specific configuration.
pub const TCA_OPTIONS: u16 = 2;
/// `TCA_XSTATS`: legacy location of the qdisc specific statistics.
pub const TCA_XSTATS: u16 = 4;
