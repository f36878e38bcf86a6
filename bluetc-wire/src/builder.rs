use bytes::{BufMut, Bytes, BytesMut};

use crate::nla::{nla_align, NlaHeader, NLA_HEADER_SIZE};
use crate::WireError;

/// The bound `tc` uses for qdisc requests.
pub const DEFAULT_MAX_LEN: usize = 1024;

/// Options for a [`MessageBuilder`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuilderOptions {
    /// Maximum number of bytes the message may grow to.
    pub max_len: usize,
}

impl Default for BuilderOptions {
    fn default() -> Self {
        Self { max_len: DEFAULT_MAX_LEN }
    }
}

impl BuilderOptions {
    /// Sets the maximum message length in bytes.
    pub const fn with_max_len(mut self, max_len: usize) -> Self {
        self.max_len = max_len;
        self
    }
}

/// Marks an open nested attribute. Pass it back to [`MessageBuilder::nest_end`] once the
/// inner attributes have been appended.
#[derive(Debug)]
#[must_use = "a nested attribute has a zero length until `nest_end` is called"]
pub struct NestToken {
    offset: usize,
    kind: u16,
}

impl NestToken {
    /// The type of the nested attribute.
    pub const fn kind(&self) -> u16 {
        self.kind
    }
}

/// Appends netlink attributes to a bounded buffer.
///
/// The write cursor is always the aligned end of the buffer, so every attribute starts on
/// a 4-byte boundary. An append that would grow the message past `max_len` fails with
/// [`WireError::BufferOverflow`] and leaves the buffer untouched.
#[derive(Debug, Clone)]
pub struct MessageBuilder {
    buf: BytesMut,
    max_len: usize,
}

impl Default for MessageBuilder {
    fn default() -> Self {
        Self::new(BuilderOptions::default())
    }
}

impl MessageBuilder {
    /// Creates an empty builder.
    pub fn new(options: BuilderOptions) -> Self {
        Self {
            buf: BytesMut::with_capacity(options.max_len.min(DEFAULT_MAX_LEN)),
            max_len: options.max_len,
        }
    }

    /// Creates a builder that continues after `prefix`, e.g. a message header that was
    /// already written by the caller.
    pub fn with_prefix(prefix: &[u8], options: BuilderOptions) -> Result<Self, WireError> {
        let needed = nla_align(prefix.len());
        if needed > options.max_len {
            return Err(WireError::BufferOverflow { needed, capacity: options.max_len });
        }

        let mut this = Self::new(options);
        this.buf.extend_from_slice(prefix);
        this.pad();
        Ok(this)
    }

    /// Current length of the message, which is also the write cursor.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Returns `true` if nothing has been written yet.
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// The bound this builder enforces.
    pub const fn max_len(&self) -> usize {
        self.max_len
    }

    /// The bytes written so far.
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Consumes the builder and returns the message.
    pub fn freeze(self) -> Bytes {
        self.buf.freeze()
    }

    /// Drops everything after `len`, e.g. to undo a partially written nest.
    pub fn truncate(&mut self, len: usize) {
        self.buf.truncate(len);
        self.pad();
    }

    /// Appends an attribute of type `kind` carrying `data`.
    pub fn add_attr(&mut self, kind: u16, data: &[u8]) -> Result<(), WireError> {
        let header = NlaHeader::for_payload(kind, data.len())?;
        self.reserve(header.len as usize)?;

        self.put_header(header);
        self.buf.put_slice(data);
        self.pad();

        Ok(())
    }

    /// Appends a `u32` attribute.
    pub fn add_u32(&mut self, kind: u16, value: u32) -> Result<(), WireError> {
        self.add_attr(kind, &value.to_ne_bytes())
    }

    /// Opens a nested attribute. Its length is reserved as zero and backfilled by
    /// [`nest_end`](Self::nest_end).
    pub fn nest_start(&mut self, kind: u16) -> Result<NestToken, WireError> {
        let offset = self.len();
        self.add_attr(kind, &[])?;
        Ok(NestToken { offset, kind })
    }

    /// Closes a nested attribute, setting its length to everything appended since
    /// the matching [`nest_start`](Self::nest_start).
    pub fn nest_end(&mut self, token: NestToken) -> Result<(), WireError> {
        let len = self.len() - token.offset;
        let header = NlaHeader {
            len: u16::try_from(len).map_err(|_| WireError::AttrTooLong(len))?,
            kind: token.kind,
        };
        self.buf[token.offset..token.offset + NLA_HEADER_SIZE].copy_from_slice(&header.to_bytes());

        tracing::trace!(kind = token.kind, len, "closed nested attribute");
        Ok(())
    }

    /// Checks that an attribute of `attr_len` bytes (header included) fits.
    fn reserve(&mut self, attr_len: usize) -> Result<(), WireError> {
        let needed = nla_align(self.len()) + nla_align(attr_len);
        if needed > self.max_len {
            tracing::debug!(needed, max_len = self.max_len, "message exceeded bound");
            return Err(WireError::BufferOverflow { needed, capacity: self.max_len });
        }

        self.buf.reserve(needed - self.len());
        Ok(())
    }

    fn put_header(&mut self, header: NlaHeader) {
        self.buf.put_slice(&header.to_bytes());
    }

    /// Zero-fills up to the next attribute boundary.
    fn pad(&mut self) {
        let aligned = nla_align(self.len());
        self.buf.put_bytes(0, aligned - self.len());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::NlAttr;

    #[test]
    fn add_attr_aligns_cursor() {
        let mut builder = MessageBuilder::default();
        builder.add_attr(1, b"abc").unwrap();
        assert_eq!(builder.len(), 8);
        builder.add_u32(2, 0xdead_beef).unwrap();
        assert_eq!(builder.len(), 16);

        let attrs: Vec<_> = NlAttr::iter(builder.as_bytes()).map(Result::unwrap).collect();
        assert_eq!(attrs.len(), 2);
        assert_eq!(attrs[0].kind(), 1);
        assert_eq!(attrs[0].payload(), b"abc");
        assert_eq!(attrs[1].read_u32(), Some(0xdead_beef));
    }

    #[test]
    fn nest_backfills_length() {
        let mut builder = MessageBuilder::default();
        let nest = builder.nest_start(2).unwrap();
        builder.add_attr(1, &[1, 2, 3, 4, 5]).unwrap();
        builder.add_u32(3, 9).unwrap();
        builder.nest_end(nest).unwrap();

        let (outer, consumed) = NlAttr::parse(builder.as_bytes()).unwrap();
        assert_eq!(consumed, builder.len());
        assert_eq!(outer.kind(), 2);
        assert_eq!(outer.len(), 4 + 12 + 8);

        let inner: Vec<_> = outer.nested().map(Result::unwrap).collect();
        assert_eq!(inner.len(), 2);
        assert_eq!(inner[0].payload(), &[1, 2, 3, 4, 5]);
        assert_eq!(inner[1].read_u32(), Some(9));
    }

    #[test]
    fn overflow_leaves_buffer_untouched() {
        let mut builder = MessageBuilder::new(BuilderOptions::default().with_max_len(12));
        builder.add_u32(1, 1).unwrap();

        let before = builder.as_bytes().to_vec();
        let err = builder.add_u32(2, 2).unwrap_err();
        assert_eq!(err, WireError::BufferOverflow { needed: 16, capacity: 12 });
        assert_eq!(builder.as_bytes(), &before[..]);

        // Exactly filling the bound is fine.
        builder.add_attr(3, &[]).unwrap();
        assert_eq!(builder.len(), 12);
    }

    #[test]
    fn prefix_is_aligned() {
        let builder = MessageBuilder::with_prefix(&[0xff; 6], BuilderOptions::default()).unwrap();
        assert_eq!(builder.as_bytes(), &[0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0, 0]);

        let err =
            MessageBuilder::with_prefix(&[0; 9], BuilderOptions::default().with_max_len(8))
                .unwrap_err();
        assert_eq!(err, WireError::BufferOverflow { needed: 12, capacity: 8 });
    }
}
