//! The `blue_csc573` qdisc.
//!
//! A Blue-style active queue manager: it keeps a marking probability that rises on packet
//! loss (`increment`) and falls when the link goes idle (`decrement`), with per-flow
//! buckets rehashed every `rehash` seconds and a penalty box for unresponsive flows.
//!
//! The kernel side accepts its configuration as a nested `TCA_OPTIONS` block:
//!
//! ```text
//! ┌──────────────────────────────────┐
//! │ len=12 │ TCA_OPTIONS             │
//! ├──────────────────────────────────┤
//! │   len=8 │ TCA_FIFO_PARMS         │
//! │   ├────────────────────────────  │
//! │   │ limit (u32)                  │
//! └──────────────────────────────────┘
//! ```
//!
//! Of the advertised parameters only `limit` has a slot in that record. The others are
//! parsed and validated, so typos are still caught, but are not transmitted.

use std::io;

use bluetc_common::{get_u32, ParseNumError};
use bluetc_wire::tc::blue::{prob_to_fixed, ExtendedStats};
use bluetc_wire::tc::fifo::{FifoQopt, FIFO_TABLE_SIZE, TCA_FIFO_PARMS};
use bluetc_wire::tc::TCA_OPTIONS;
use bluetc_wire::{AttrTable, MessageBuilder, NlAttr, WireError};

use crate::{ParseError, QdiscError, QdiscUtil};

/// The identifier the qdisc is selected by.
pub const ID: &str = "blue_csc573";

/// Queue limit used when `limit` is not given, in packets.
pub const DEFAULT_LIMIT: u32 = 5_000_000;

const USAGE: &str = "Usage: ... blue_csc573 [ rehash SECS ] [ db SECS ]\n\
                     \t    [ limit PACKETS ] [ max PACKETS ] [ target PACKETS ]\n\
                     \t    [ increment FLOAT ] [ decrement FLOAT ]\n\
                     \t    [ penalty_rate PPS ] [ penalty_burst PACKETS ]\n";

/// Options of the `blue_csc573` qdisc.
///
/// `None` leaves a parameter at the kernel's default.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QdiscOptions {
    /// Maximum queue length in packets. Always transmitted.
    pub limit: u32,
    /// Bucket rehash interval, in seconds.
    pub rehash: Option<u32>,
    /// Double-buffering warmup before a rehash, in seconds.
    pub db: Option<u32>,
    /// Per-bucket packet limit.
    pub max: Option<u32>,
    /// Per-bucket target queue length, in packets.
    pub target: Option<u32>,
    /// Marking probability increment, scaled by [`MAX_PROB`](bluetc_wire::tc::blue::MAX_PROB).
    pub increment: Option<u32>,
    /// Marking probability decrement, scaled by [`MAX_PROB`](bluetc_wire::tc::blue::MAX_PROB).
    pub decrement: Option<u32>,
    /// Packets per second allowed through the penalty box.
    pub penalty_rate: Option<u32>,
    /// Burst allowed through the penalty box, in packets.
    pub penalty_burst: Option<u32>,
}

impl Default for QdiscOptions {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            rehash: None,
            db: None,
            max: None,
            target: None,
            increment: None,
            decrement: None,
            penalty_rate: None,
            penalty_burst: None,
        }
    }
}

impl QdiscOptions {
    /// Sets the queue limit in packets.
    pub const fn with_limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }

    /// Sets the marking probability increment, already scaled.
    pub const fn with_increment(mut self, increment: u32) -> Self {
        self.increment = Some(increment);
        self
    }

    /// Sets the marking probability decrement, already scaled.
    pub const fn with_decrement(mut self, decrement: u32) -> Self {
        self.decrement = Some(decrement);
        self
    }

    /// Parses command line tokens, e.g. `["limit", "100000"]`.
    ///
    /// An empty command line yields the defaults. Any unknown token fails the whole parse.
    pub fn parse(args: &[&str]) -> Result<Self, ParseError> {
        let mut opts = Self::default();
        let mut args = args.iter().copied();

        while let Some(arg) = args.next() {
            match arg {
                "limit" => opts.limit = next_u32(&mut args, "limit")?,
                "rehash" => opts.rehash = Some(next_u32(&mut args, "rehash")?),
                "db" => opts.db = Some(next_u32(&mut args, "db")?),
                "max" => opts.max = Some(next_u32(&mut args, "max")?),
                "target" => opts.target = Some(next_u32(&mut args, "target")?),
                "increment" => opts.increment = Some(next_prob(&mut args, "increment")?),
                "decrement" => opts.decrement = Some(next_prob(&mut args, "decrement")?),
                "penalty_rate" => opts.penalty_rate = Some(next_u32(&mut args, "penalty_rate")?),
                "penalty_burst" => {
                    opts.penalty_burst = Some(next_u32(&mut args, "penalty_burst")?)
                }
                unknown => return Err(ParseError::UnknownKeyword(unknown.to_owned())),
            }
        }

        tracing::debug!(?opts, "parsed {ID} options");
        Ok(opts)
    }

    /// The record sent in `TCA_FIFO_PARMS`.
    pub const fn qopt(&self) -> FifoQopt {
        FifoQopt { limit: self.limit }
    }

    /// Parameters that were set but have no slot in the kernel record.
    pub fn untransmitted(&self) -> impl Iterator<Item = (&'static str, u32)> {
        [
            ("rehash", self.rehash),
            ("db", self.db),
            ("max", self.max),
            ("target", self.target),
            ("increment", self.increment),
            ("decrement", self.decrement),
            ("penalty_rate", self.penalty_rate),
            ("penalty_burst", self.penalty_burst),
        ]
        .into_iter()
        .filter_map(|(name, value)| value.map(|value| (name, value)))
    }

    /// Appends the nested `TCA_OPTIONS` attribute to `builder`.
    ///
    /// On error `builder` is left as it was.
    pub fn encode(&self, builder: &mut MessageBuilder) -> Result<(), WireError> {
        for (keyword, value) in self.untransmitted() {
            tracing::warn!(keyword, value, "{ID} has no kernel attribute for parameter, not sent");
        }

        let start = builder.len();
        let res = self.encode_nested(builder);
        if res.is_err() {
            builder.truncate(start);
        }

        res
    }

    fn encode_nested(&self, builder: &mut MessageBuilder) -> Result<(), WireError> {
        let nest = builder.nest_start(TCA_OPTIONS)?;
        builder.add_attr(TCA_FIFO_PARMS, &self.qopt().to_bytes())?;
        builder.nest_end(nest)?;

        tracing::debug!(limit = self.limit, len = builder.len(), "encoded {ID} options");
        Ok(())
    }
}

/// Parses a probability in `[0, 1]` into its fixed-point form.
pub fn get_prob(arg: &str) -> Result<u32, ParseNumError> {
    if arg.is_empty() {
        return Err(ParseNumError::Empty);
    }

    let p: f64 = arg.parse().map_err(|_| ParseNumError::Invalid(arg.to_owned()))?;
    prob_to_fixed(p).ok_or_else(|| ParseNumError::OutOfRange(arg.to_owned()))
}

fn next_value<'a>(
    args: &mut impl Iterator<Item = &'a str>,
    keyword: &'static str,
) -> Result<&'a str, ParseError> {
    args.next().ok_or(ParseError::MissingValue(keyword))
}

fn next_u32<'a>(
    args: &mut impl Iterator<Item = &'a str>,
    keyword: &'static str,
) -> Result<u32, ParseError> {
    get_u32(next_value(args, keyword)?)
        .map_err(|source| ParseError::InvalidValue { keyword, source })
}

fn next_prob<'a>(
    args: &mut impl Iterator<Item = &'a str>,
    keyword: &'static str,
) -> Result<u32, ParseError> {
    get_prob(next_value(args, keyword)?)
        .map_err(|source| ParseError::InvalidValue { keyword, source })
}

/// Extracts the options record from a received `TCA_OPTIONS` attribute.
///
/// `None` input means there is nothing to show and is not an error. The returned record
/// is read from within the declared `TCA_FIFO_PARMS` length only.
pub fn decode(opt: Option<&[u8]>) -> Result<Option<FifoQopt>, WireError> {
    let Some(opt) = opt else {
        return Ok(None);
    };

    let (outer, _) = NlAttr::parse(opt)?;
    if outer.unflagged_kind() != TCA_OPTIONS {
        tracing::debug!(kind = outer.kind(), "decoding {ID} options from unexpected attribute");
    }

    let table = AttrTable::<FIFO_TABLE_SIZE>::parse(outer.payload());
    let parms = table.get(TCA_FIFO_PARMS).ok_or(WireError::Malformed("missing TCA_FIFO_PARMS"))?;
    if parms.payload().len() < FifoQopt::SIZE {
        return Err(WireError::Malformed("TCA_FIFO_PARMS shorter than tc_fifo_qopt"));
    }

    FifoQopt::from_bytes(parms.payload()).map(Some)
}

/// Renders a statistics payload. Nothing is written unless the whole record decodes.
pub fn print_xstats(f: &mut dyn io::Write, xstats: Option<&[u8]>) -> Result<(), QdiscError> {
    let Some(xstats) = xstats else {
        return Ok(());
    };

    let stats = ExtendedStats::from_bytes(xstats)?;
    f.write_all(stats.to_string().as_bytes())?;

    Ok(())
}

/// The `blue_csc573` module, as registered with the front-end.
#[derive(Debug, Clone, Copy, Default)]
pub struct BlueCsc573;

impl QdiscUtil for BlueCsc573 {
    fn id(&self) -> &'static str {
        ID
    }

    fn usage(&self) -> &'static str {
        USAGE
    }

    fn parse_opt(&self, args: &[&str], builder: &mut MessageBuilder) -> Result<(), QdiscError> {
        let opts = QdiscOptions::parse(args)?;
        opts.encode(builder)?;
        Ok(())
    }

    fn print_opt(&self, f: &mut dyn io::Write, opt: Option<&[u8]>) -> Result<(), QdiscError> {
        if let Some(qopt) = decode(opt)? {
            write!(f, "{qopt} ")?;
        }
        Ok(())
    }

    fn print_xstats(&self, f: &mut dyn io::Write, xstats: Option<&[u8]>) -> Result<(), QdiscError> {
        print_xstats(f, xstats)
    }
}
