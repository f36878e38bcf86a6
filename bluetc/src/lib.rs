#![doc(issue_tracker_base_url = "https://github.com/chainbound/msg-rs/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

pub use bluetc_common::{get_size, get_u32, hex, ParseNumError};
pub use bluetc_qdisc::*;
pub use bluetc_wire::{tc, BuilderOptions, MessageBuilder, NlAttr, WireError};
