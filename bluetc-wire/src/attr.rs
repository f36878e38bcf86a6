use crate::nla::{nla_align, NlaHeader, NLA_F_NESTED, NLA_HEADER_SIZE};
use crate::WireError;

/// A borrowed netlink attribute: its type and the payload its header declares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NlAttr<'a> {
    kind: u16,
    payload: &'a [u8],
}

impl<'a> NlAttr<'a> {
    /// Parses the attribute at the start of `buf`.
    ///
    /// Returns the attribute and the number of bytes it occupies including padding,
    /// clamped to `buf.len()` for a final unpadded attribute.
    pub fn parse(buf: &'a [u8]) -> Result<(Self, usize), WireError> {
        let header = NlaHeader::read(buf).ok_or(WireError::Malformed("truncated header"))?;
        let len = header.len as usize;

        if len < NLA_HEADER_SIZE {
            return Err(WireError::Malformed("length shorter than header"));
        }
        if len > buf.len() {
            return Err(WireError::Malformed("length exceeds buffer"));
        }

        let attr = Self { kind: header.kind, payload: &buf[NLA_HEADER_SIZE..len] };
        Ok((attr, nla_align(len).min(buf.len())))
    }

    /// Iterates over consecutive attributes in `buf`.
    pub fn iter(buf: &'a [u8]) -> AttrIter<'a> {
        AttrIter { buf }
    }

    /// The attribute type, as sent.
    pub const fn kind(&self) -> u16 {
        self.kind
    }

    /// The attribute type with the [`NLA_F_NESTED`] flag cleared.
    pub const fn unflagged_kind(&self) -> u16 {
        self.kind & !NLA_F_NESTED
    }

    /// The payload, without header or padding.
    pub const fn payload(&self) -> &'a [u8] {
        self.payload
    }

    /// Header plus payload length, as stored in the header.
    pub const fn len(&self) -> usize {
        NLA_HEADER_SIZE + self.payload.len()
    }

    /// Returns `true` if the attribute carries no payload.
    pub const fn is_empty(&self) -> bool {
        self.payload.is_empty()
    }

    /// Iterates over the attributes nested in this one's payload.
    pub fn nested(&self) -> AttrIter<'a> {
        Self::iter(self.payload)
    }

    /// Reads the payload as a native endian `u32`.
    pub fn read_u32(&self) -> Option<u32> {
        let bytes = self.payload.get(..4)?;
        Some(u32::from_ne_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }
}

/// Iterator over a run of attributes. Yields one error and stops at the first attribute
/// whose header is unreadable or whose length runs past the buffer.
#[derive(Debug, Clone)]
pub struct AttrIter<'a> {
    buf: &'a [u8],
}

impl<'a> AttrIter<'a> {
    /// Bytes not consumed yet.
    pub const fn remaining(&self) -> &'a [u8] {
        self.buf
    }
}

impl<'a> Iterator for AttrIter<'a> {
    type Item = Result<NlAttr<'a>, WireError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.buf.is_empty() {
            return None;
        }

        match NlAttr::parse(self.buf) {
            Ok((attr, consumed)) => {
                self.buf = &self.buf[consumed..];
                Some(Ok(attr))
            }
            Err(e) => {
                self.buf = &[];
                Some(Err(e))
            }
        }
    }
}

/// Attributes of a nested block indexed by type, for types `0..N`.
///
/// Equivalent to the `tb[]` array filled by iproute2's `parse_rtattr_nested`: attributes
/// are indexed with [`NLA_F_NESTED`] cleared, types outside the table are skipped and the
/// first attribute of each type wins.
#[derive(Debug, Clone, Copy)]
pub struct AttrTable<'a, const N: usize> {
    slots: [Option<NlAttr<'a>>; N],
}

impl<'a, const N: usize> AttrTable<'a, N> {
    /// Indexes the attributes in `payload`.
    ///
    /// A malformed trailing attribute ends the walk; attributes before it stay
    /// available, so callers decide whether a missing slot is fatal.
    pub fn parse(payload: &'a [u8]) -> Self {
        let mut slots = [None; N];

        for attr in NlAttr::iter(payload) {
            let attr = match attr {
                Ok(attr) => attr,
                Err(e) => {
                    tracing::warn!(error = %e, table_size = N, "stopped parsing nested attributes");
                    break;
                }
            };

            let kind = attr.unflagged_kind();
            match slots.get_mut(kind as usize) {
                Some(slot @ None) => *slot = Some(attr),
                Some(Some(_)) => tracing::debug!(kind, "ignoring duplicate attribute"),
                None => tracing::trace!(kind, "ignoring attribute outside table"),
            }
        }

        Self { slots }
    }

    /// The attribute of type `kind`, if present.
    pub fn get(&self, kind: u16) -> Option<NlAttr<'a>> {
        self.slots.get(kind as usize).copied().flatten()
    }

    /// Number of populated slots.
    pub fn count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }
}
