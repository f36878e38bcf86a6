//! Wire records of the `blue_csc573` qdisc.
//!
//! Probabilities travel as fixed-point integers: a probability `p` in `[0, 1]` is sent as
//! `round(p * MAX_PROB)`. `MAX_PROB` matches the scale the kernel's Blue family uses.

use std::fmt;

use bytes::Buf;

use crate::WireError;

/// The fixed-point value representing a probability of 1.
pub const MAX_PROB: u32 = 0xFFFF;

/// Converts a probability to its fixed-point wire value.
///
/// Returns `None` if `p` is not within `[0.0, 1.0]` (NaN included).
pub fn prob_to_fixed(p: f64) -> Option<u32> {
    if !(0.0..=1.0).contains(&p) {
        return None;
    }

    Some((p * MAX_PROB as f64 + 0.5) as u32)
}

/// Converts a fixed-point wire value back to a probability.
///
/// Values above [`MAX_PROB`] are not clamped, so a misbehaving kernel shows up as a
/// probability above 1 rather than being hidden.
pub fn fixed_to_prob(value: u32) -> f64 {
    value as f64 / MAX_PROB as f64
}

/// The kernel's `tc_blue_csc573_xstats` structure, reported in `TCA_STATS_APP`.
///
/// Nine native endian `u32` counters, in field order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExtendedStats {
    /// Packets dropped by the marking probability.
    pub earlydrop: u32,
    /// Packets dropped by the penalty box.
    pub penaltydrop: u32,
    /// Packets dropped because their bucket was full.
    pub bucketdrop: u32,
    /// Packets dropped because the queue was full.
    pub queuedrop: u32,
    /// Packets dropped by the child qdisc.
    pub childdrop: u32,
    /// Packets ECN marked instead of dropped.
    pub marked: u32,
    /// Longest bucket queue seen, in packets.
    pub maxqlen: u32,
    /// Highest marking probability, scaled by [`MAX_PROB`].
    pub maxprob: u32,
    /// Average marking probability, scaled by [`MAX_PROB`].
    pub avgprob: u32,
}

impl ExtendedStats {
    /// Size of the record on the wire.
    pub const SIZE: usize = 9 * 4;

    /// Decodes the record from a statistics payload. Trailing bytes are ignored.
    pub fn from_bytes(buf: &[u8]) -> Result<Self, WireError> {
        if buf.len() < Self::SIZE {
            return Err(WireError::Malformed("xstats too short"));
        }

        let mut buf = &buf[..Self::SIZE];
        Ok(Self {
            earlydrop: buf.get_u32_ne(),
            penaltydrop: buf.get_u32_ne(),
            bucketdrop: buf.get_u32_ne(),
            queuedrop: buf.get_u32_ne(),
            childdrop: buf.get_u32_ne(),
            marked: buf.get_u32_ne(),
            maxqlen: buf.get_u32_ne(),
            maxprob: buf.get_u32_ne(),
            avgprob: buf.get_u32_ne(),
        })
    }

    /// Serialize to bytes in kernel format.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut vec = Vec::with_capacity(Self::SIZE);
        vec.extend_from_slice(&self.earlydrop.to_ne_bytes());
        vec.extend_from_slice(&self.penaltydrop.to_ne_bytes());
        vec.extend_from_slice(&self.bucketdrop.to_ne_bytes());
        vec.extend_from_slice(&self.queuedrop.to_ne_bytes());
        vec.extend_from_slice(&self.childdrop.to_ne_bytes());
        vec.extend_from_slice(&self.marked.to_ne_bytes());
        vec.extend_from_slice(&self.maxqlen.to_ne_bytes());
        vec.extend_from_slice(&self.maxprob.to_ne_bytes());
        vec.extend_from_slice(&self.avgprob.to_ne_bytes());
        vec
    }

    /// Peak marking probability.
    pub fn max_probability(&self) -> f64 {
        fixed_to_prob(self.maxprob)
    }

    /// Average marking probability.
    pub fn avg_probability(&self) -> f64 {
        fixed_to_prob(self.avgprob)
    }
}

impl fmt::Display for ExtendedStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "  earlydrop {} penaltydrop {} bucketdrop {} queuedrop {} childdrop {} marked {}\n  \
             maxqlen {} maxprob {:.5} avgprob {:.5} ",
            self.earlydrop,
            self.penaltydrop,
            self.bucketdrop,
            self.queuedrop,
            self.childdrop,
            self.marked,
            self.maxqlen,
            self.max_probability(),
            self.avg_probability(),
        )
    }
}
