//! The FIFO options record, shared by `pfifo`, `bfifo` and `blue_csc573`.

use std::fmt;

use crate::WireError;

/// `TCA_FIFO_UNSPEC`: unused attribute type.
pub const TCA_FIFO_UNSPEC: u16 = 0;
/// `TCA_FIFO_PARMS`: carries a [`FifoQopt`].
pub const TCA_FIFO_PARMS: u16 = 1;
/// Highest FIFO attribute type.
pub const TCA_FIFO_MAX: u16 = TCA_FIFO_PARMS;

/// Slots needed to index every FIFO attribute type.
pub const FIFO_TABLE_SIZE: usize = TCA_FIFO_MAX as usize + 1;

/// The kernel's `tc_fifo_qopt` structure.
///
/// # Kernel Definition
///
/// From `<linux/pkt_sched.h>`:
///
/// ```c
/// struct tc_fifo_qopt {
///     __u32 limit; /* Queue length: bytes for bfifo, packets for pfifo */
/// };
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FifoQopt {
    /// Queue limit, in packets or bytes depending on the qdisc.
    pub limit: u32,
}

impl FifoQopt {
    /// Size of the record on the wire.
    pub const SIZE: usize = 4;

    /// Serialize to bytes in kernel format.
    pub const fn to_bytes(&self) -> [u8; Self::SIZE] {
        self.limit.to_ne_bytes()
    }

    /// Reads the record from the start of an attribute payload. Trailing bytes (fields a
    /// newer kernel may append) are ignored.
    pub fn from_bytes(buf: &[u8]) -> Result<Self, WireError> {
        let bytes = buf.get(..Self::SIZE).ok_or(WireError::Malformed("fifo options too short"))?;
        Ok(Self { limit: u32::from_ne_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]) })
    }
}

impl fmt::Display for FifoQopt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "limit {}p", self.limit)
    }
}
