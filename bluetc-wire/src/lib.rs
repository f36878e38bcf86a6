#![doc(issue_tracker_base_url = "https://github.com/chainbound/msg-rs/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

//! Netlink attribute (NLA) wire formats.
//!
//! Netlink carries configuration as a tree of TLV attributes. This crate contains:
//!
//! - [`nla`]: the attribute header layout and alignment rules.
//! - [`MessageBuilder`]: a bounded buffer that appends attributes and nests them.
//! - [`NlAttr`] and [`AttrTable`]: borrowed views used to walk received attributes.
//! - [`tc`]: the traffic control records (`tc_fifo_qopt`, blue xstats) carried inside them.

mod attr;
mod builder;
mod error;
pub mod nla;
pub mod tc;

pub use attr::{AttrIter, AttrTable, NlAttr};
pub use builder::{BuilderOptions, MessageBuilder, NestToken, DEFAULT_MAX_LEN};
pub use error::WireError;
