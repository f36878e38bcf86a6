//! The `pfifo` and `bfifo` qdiscs.
//!
//! Both share `tc_fifo_qopt` with `blue_csc573`, but send it as the flat payload of
//! `TCA_OPTIONS` rather than nested under `TCA_FIFO_PARMS`. `pfifo` counts its limit in
//! packets, `bfifo` in bytes. Without a `limit` no options are sent and the kernel picks
//! one from the device's queue length.

use std::io;

use bluetc_common::{get_size, get_u32, sprint_size, ParseNumError};
use bluetc_wire::tc::fifo::FifoQopt;
use bluetc_wire::tc::TCA_OPTIONS;
use bluetc_wire::{MessageBuilder, NlAttr};

use crate::{ParseError, QdiscError, QdiscUtil};

/// Unit of a fifo queue limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FifoKind {
    /// Limit in packets (`pfifo`).
    Packets,
    /// Limit in bytes (`bfifo`).
    Bytes,
}

/// A fifo qdisc module.
#[derive(Debug, Clone, Copy)]
pub struct Fifo {
    kind: FifoKind,
}

impl Fifo {
    /// The packet-limited fifo.
    pub const PFIFO: Self = Self { kind: FifoKind::Packets };
    /// The byte-limited fifo.
    pub const BFIFO: Self = Self { kind: FifoKind::Bytes };

    /// Whether the limit counts packets or bytes.
    pub const fn kind(&self) -> FifoKind {
        self.kind
    }

    /// Parses `[ limit NUMBER ]`. Returns `None` if no limit was given.
    pub fn parse(&self, args: &[&str]) -> Result<Option<FifoQopt>, ParseError> {
        let mut qopt = None;
        let mut args = args.iter().copied();

        while let Some(arg) = args.next() {
            match arg {
                "limit" => {
                    let value = args.next().ok_or(ParseError::MissingValue("limit"))?;
                    let limit = self
                        .parse_limit(value)
                        .map_err(|source| ParseError::InvalidValue { keyword: "limit", source })?;
                    qopt = Some(FifoQopt { limit });
                }
                unknown => return Err(ParseError::UnknownKeyword(unknown.to_owned())),
            }
        }

        Ok(qopt)
    }

    fn parse_limit(&self, value: &str) -> Result<u32, ParseNumError> {
        match self.kind {
            FifoKind::Packets => get_u32(value),
            FifoKind::Bytes => get_size(value),
        }
    }

    fn render(&self, qopt: FifoQopt) -> String {
        match self.kind {
            FifoKind::Packets => qopt.to_string(),
            FifoKind::Bytes => format!("limit {}", sprint_size(qopt.limit)),
        }
    }
}

impl QdiscUtil for Fifo {
    fn id(&self) -> &'static str {
        match self.kind {
            FifoKind::Packets => "pfifo",
            FifoKind::Bytes => "bfifo",
        }
    }

    fn usage(&self) -> &'static str {
        match self.kind {
            FifoKind::Packets => "Usage: ... pfifo [ limit NUMBER ]\n",
            FifoKind::Bytes => "Usage: ... bfifo [ limit NUMBER ]\n",
        }
    }

    fn parse_opt(&self, args: &[&str], builder: &mut MessageBuilder) -> Result<(), QdiscError> {
        if let Some(qopt) = self.parse(args)? {
            builder.add_attr(TCA_OPTIONS, &qopt.to_bytes())?;
            tracing::debug!(qdisc = self.id(), limit = qopt.limit, "encoded fifo options");
        }
        Ok(())
    }

    fn print_opt(&self, f: &mut dyn io::Write, opt: Option<&[u8]>) -> Result<(), QdiscError> {
        let Some(opt) = opt else {
            return Ok(());
        };

        let (attr, _) = NlAttr::parse(opt)?;
        let qopt = FifoQopt::from_bytes(attr.payload())?;
        write!(f, "{} ", self.render(qopt))?;
        Ok(())
    }
}
