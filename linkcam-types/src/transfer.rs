//! Chunked transfer bookkeeping

use std::fmt;

/// Snapshot handed to progress callbacks after every chunk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferProgress {
    /// Bytes emitted to the sink so far
    pub bytes_read: usize,

    /// Image size reported by the camera (advisory only)
    pub advertised_size: u16,

    /// Address of the next chunk to be requested
    pub address: u16,
}

impl fmt::Display for TransferProgress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Read {} of {} bytes", self.bytes_read, self.advertised_size)
    }
}

/// Summary of a finished chunked read
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TransferStats {
    /// Read-chunk commands issued
    pub chunks: usize,

    /// Bytes emitted, up to and including the end marker
    pub bytes: usize,

    /// Replies whose 5-byte header did not match
    pub header_mismatches: usize,

    /// Replies whose 5-byte footer did not match
    pub footer_mismatches: usize,

    /// Image size reported by the camera before the transfer
    pub advertised_size: u16,
}

impl TransferStats {
    /// True when every chunk was framed correctly
    pub fn is_clean(&self) -> bool {
        self.header_mismatches == 0 && self.footer_mismatches == 0
    }
}

impl fmt::Display for TransferStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} bytes in {} chunks (advertised {}, {} header / {} footer mismatches)",
            self.bytes,
            self.chunks,
            self.advertised_size,
            self.header_mismatches,
            self.footer_mismatches
        )
    }
}
