#![doc(issue_tracker_base_url = "https://github.com/chainbound/msg-rs/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

//! # Queueing discipline front-ends
//!
//! Each qdisc module translates between `tc`-style command line tokens and the netlink
//! attributes the kernel expects, and renders what the kernel reports back:
//!
//! ```text
//!  "limit 100000"                                       kernel
//!        │                                                 │
//!        ▼  parse_opt                          TCA_OPTIONS │ TCA_STATS_APP
//!  ┌───────────────┐   encode   ┌──────────────────┐       │
//!  │  options      │ ─────────▶ │  MessageBuilder  │ ──────┘
//!  └───────────────┘            └──────────────────┘       │
//!                                                          ▼
//!              print_opt / print_xstats  ◀──────── received attributes
//! ```
//!
//! Modules implement [`QdiscUtil`] and are looked up by identifier through the
//! process-wide [`registry()`].

mod error;
pub use error::{ParseError, QdiscError};

pub mod blue;
pub mod fifo;

mod registry;
pub use registry::{registry, Registry};

mod util;
pub use util::QdiscUtil;
