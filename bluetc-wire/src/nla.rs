//! Netlink attribute layout.
//!
//! Netlink uses a TLV (Type-Length-Value) format for attributes:
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  Length (2 bytes) │  Type (2 bytes)     │  <- NLA header (4 bytes)
//! ├─────────────────────────────────────────┤
//! │  Value (variable length, padded to 4)   │
//! └─────────────────────────────────────────┘
//! ```
//!
//! The length counts the header and the value but not the trailing padding. Both header
//! fields are native endian. Reference: `<linux/netlink.h>`, `<linux/rtnetlink.h>`.

use crate::WireError;

/// Attributes start at multiples of this many bytes.
pub const NLA_ALIGNTO: usize = 4;

/// Size of the `{ len, type }` header in front of every attribute.
pub const NLA_HEADER_SIZE: usize = 4;

/// Type flag set by senders on attributes that carry nested attributes.
pub const NLA_F_NESTED: u16 = 1 << 15;

/// Rounds `len` up to the attribute alignment.
#[inline]
pub const fn nla_align(len: usize) -> usize {
    (len + NLA_ALIGNTO - 1) & !(NLA_ALIGNTO - 1)
}

/// The header of a netlink attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NlaHeader {
    /// Header plus payload length, without padding.
    pub len: u16,
    /// Attribute type.
    pub kind: u16,
}

impl NlaHeader {
    /// Creates the header for an attribute carrying `payload_len` bytes.
    pub fn for_payload(kind: u16, payload_len: usize) -> Result<Self, WireError> {
        let len = NLA_HEADER_SIZE + payload_len;
        let len = u16::try_from(len).map_err(|_| WireError::AttrTooLong(len))?;
        Ok(Self { len, kind })
    }

    /// Reads a header from the start of `buf`, if there are enough bytes for one.
    pub fn read(buf: &[u8]) -> Option<Self> {
        let header = buf.get(..NLA_HEADER_SIZE)?;
        Some(Self {
            len: u16::from_ne_bytes([header[0], header[1]]),
            kind: u16::from_ne_bytes([header[2], header[3]]),
        })
    }

    /// Serializes the header in kernel format.
    pub fn to_bytes(self) -> [u8; NLA_HEADER_SIZE] {
        let [l0, l1] = self.len.to_ne_bytes();
        let [k0, k1] = self.kind.to_ne_bytes();
        [l0, l1, k0, k1]
    }
}

/// Build a standalone attribute: header, value and zeroed padding.
pub fn build_nla(kind: u16, value: &[u8]) -> Result<Vec<u8>, WireError> {
    let header = NlaHeader::for_payload(kind, value.len())?;

    let mut buf = vec![0u8; nla_align(header.len as usize)];
    buf[..NLA_HEADER_SIZE].copy_from_slice(&header.to_bytes());
    buf[NLA_HEADER_SIZE..NLA_HEADER_SIZE + value.len()].copy_from_slice(value);

    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn align_rounds_up() {
        assert_eq!(nla_align(0), 0);
        assert_eq!(nla_align(1), 4);
        assert_eq!(nla_align(4), 4);
        assert_eq!(nla_align(5), 8);
        assert_eq!(nla_align(1023), 1024);
    }

    #[test]
    fn build_nla_pads_but_keeps_length() {
        let nla = build_nla(7, &[0xaa, 0xbb, 0xcc]).unwrap();
        assert_eq!(nla.len(), 8);

        let header = NlaHeader::read(&nla).unwrap();
        assert_eq!(header, NlaHeader { len: 7, kind: 7 });
        assert_eq!(&nla[4..], &[0xaa, 0xbb, 0xcc, 0x00]);
    }

    #[test]
    fn header_rejects_oversized_payload() {
        assert_eq!(
            NlaHeader::for_payload(1, u16::MAX as usize),
            Err(WireError::AttrTooLong(u16::MAX as usize + NLA_HEADER_SIZE))
        );
        assert!(NlaHeader::read(&[1, 2, 3]).is_none());
    }
}
