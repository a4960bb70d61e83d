//! Reply patterns and verification
//!
//! # Reply shapes
//!
//! ```text
//! Status:  ┌──────┬────────┬──────┬────────┬──────────────┬──────────────────┐
//!          │ 0x76 │ serial │ code │ status │ data length  │ variable suffix  │
//!          └──────┴────────┴──────┴────────┴──────────────┴──────────────────┘
//! Chunk:   [ 76 00 32 00 00 ] [ k payload bytes ] [ 76 00 32 00 00 ]
//! Banner:  free-form text up to and including a terminator byte
//! ```

use std::fmt;

use byteorder::{BigEndian, ByteOrder};
use bytes::Bytes;
use tracing::trace;

use crate::command::size_reply;
use crate::error::{Error, Result};

/// What the camera sends back for a command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// Free-form text ending with `terminator`
    Banner { terminator: u8 },

    /// Fixed-length reply checked against a pattern
    Status(ExpectedReply),

    /// `frame` header, `payload_len` data bytes, then `frame` again as footer
    Chunk {
        frame: ExpectedReply,
        payload_len: usize,
    },
}

/// Byte pattern a reply must match
///
/// The reply is `pattern` followed by `variable_len` bytes that are not
/// checked (for example the image size in a size-query reply).
#[derive(Clone, PartialEq, Eq)]
pub struct ExpectedReply {
    command: &'static str,
    pattern: Bytes,
    variable_len: usize,
}

impl ExpectedReply {
    /// Reply that must equal `pattern` byte for byte
    pub fn exact(command: &'static str, pattern: impl Into<Bytes>) -> Self {
        Self::with_variable_suffix(command, pattern, 0)
    }

    /// Reply made of a fixed `prefix` and `variable_len` wildcard bytes
    pub fn with_variable_suffix(
        command: &'static str,
        prefix: impl Into<Bytes>,
        variable_len: usize,
    ) -> Self {
        Self {
            command,
            pattern: prefix.into(),
            variable_len,
        }
    }

    /// Total reply length in bytes
    pub fn len(&self) -> usize {
        self.pattern.len() + self.variable_len
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Fixed bytes of the reply
    pub fn pattern(&self) -> &Bytes {
        &self.pattern
    }

    /// Verify a received reply
    ///
    /// # Errors
    ///
    /// - [`Error::ReplyLength`] if `reply` is not exactly [`len`](Self::len) bytes
    /// - [`Error::ProtocolMismatch`] if any fixed byte differs
    pub fn verify(&self, reply: &[u8]) -> Result<()> {
        self.variable_suffix(reply).map(|_| ())
    }

    /// Verify a received reply and return its variable suffix
    pub fn variable_suffix<'a>(&self, reply: &'a [u8]) -> Result<&'a [u8]> {
        if reply.len() != self.len() {
            return Err(Error::ReplyLength {
                command: self.command,
                expected: self.len(),
                actual: reply.len(),
            });
        }

        let (fixed, suffix) = reply.split_at(self.pattern.len());
        if fixed != self.pattern.as_ref() {
            return Err(Error::ProtocolMismatch {
                command: self.command,
                expected: self.pattern.clone(),
                actual: Bytes::copy_from_slice(fixed),
            });
        }

        trace!(command = self.command, "Reply verified: {:02X?}", reply);

        Ok(suffix)
    }
}

impl fmt::Debug for ExpectedReply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExpectedReply")
            .field("command", &self.command)
            .field("pattern", &hex::encode(&self.pattern))
            .field("variable_len", &self.variable_len)
            .finish()
    }
}

/// Parse the image size out of a size-query reply
///
/// The first 7 bytes must be `76 00 34 00 04 00 00`; the last two are the
/// size, most significant byte first.
///
/// # Examples
///
/// ```
/// use linkcam_core::reply::parse_image_size;
///
/// let size = parse_image_size(&[0x76, 0x00, 0x34, 0x00, 0x04, 0x00, 0x00, 0x01, 0x2C]).unwrap();
/// assert_eq!(size, 300);
/// ```
pub fn parse_image_size(reply: &[u8]) -> Result<u16> {
    let suffix = size_reply().variable_suffix(reply)?;
    Ok(BigEndian::read_u16(suffix))
}
