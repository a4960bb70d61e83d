//! Error types for linkcam-core

use bytes::Bytes;

/// Result type alias for linkcam-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core protocol errors
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Reply bytes differ from the expected pattern
    #[error(
        "Protocol mismatch in {command} reply: expected {}, got {}",
        hex::encode(.expected),
        hex::encode(.actual)
    )]
    ProtocolMismatch {
        command: &'static str,
        expected: Bytes,
        actual: Bytes,
    },

    /// Reply has the wrong number of bytes
    #[error("{command} reply has {actual} bytes, expected {expected}")]
    ReplyLength {
        command: &'static str,
        expected: usize,
        actual: usize,
    },

    /// Chunk payload has the wrong number of bytes
    #[error("Chunk payload has {actual} bytes, expected {expected}")]
    ChunkLength {
        expected: usize,
        actual: usize,
    },

    /// The next chunk would start beyond the 16-bit address space
    #[error("Image address space exhausted at 0x{address:04X} without an end marker")]
    AddressSpaceExhausted {
        address: u16,
    },
}

impl Error {
    /// Check if the device answered with something other than what was expected
    pub fn is_mismatch(&self) -> bool {
        matches!(self, Self::ProtocolMismatch { .. } | Self::ReplyLength { .. })
    }
}
