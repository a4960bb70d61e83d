//! Chunked image reader
//!
//! Pulls the captured JPEG out of the camera's image memory in fixed-size
//! chunks until the end-of-image marker shows up. Every chunk reply is
//! `header | payload | footer`; header and footer mismatches are counted and
//! logged but do not stop the transfer, since the camera always sends all
//! three parts. The whole reply is read before the payload reaches the sink.

use std::io::Write;

use tracing::{debug, info, warn};

use linkcam_core::command::chunk_frame;
use linkcam_core::constants::{CHUNK_FRAME_LEN, DEFAULT_MAX_CHUNKS};
use linkcam_core::ImageCursor;
use linkcam_transport::Transport;
use linkcam_types::{TransferProgress, TransferStats};

use crate::error::{Error, Result};

/// Reads one image through a borrowed transport
pub struct ChunkReader<'t, T: Transport> {
    transport: &'t mut T,
    max_chunks: usize,
}

impl<'t, T: Transport> ChunkReader<'t, T> {
    pub fn new(transport: &'t mut T) -> Self {
        Self {
            transport,
            max_chunks: DEFAULT_MAX_CHUNKS,
        }
    }

    /// Set the maximum number of chunks before giving up
    pub fn with_max_chunks(mut self, chunks: usize) -> Self {
        self.max_chunks = chunks;
        self
    }

    /// Read chunks into `sink` until the end marker
    ///
    /// `advertised_size` comes from the size query and is only passed through
    /// to `progress` and the returned stats.
    ///
    /// # Errors
    ///
    /// - Transport failures and timeouts abort the read
    /// - [`Error::ChunkLimitExceeded`] once `max_chunks` chunks passed without a marker
    /// - [`Error::Sink`] if writing to `sink` fails
    pub fn read<W, F>(
        self,
        advertised_size: u16,
        sink: &mut W,
        mut progress: F,
    ) -> Result<TransferStats>
    where
        W: Write,
        F: FnMut(TransferProgress),
    {
        let frame = chunk_frame();
        let mut cursor = ImageCursor::new(advertised_size);
        let mut stats = TransferStats {
            advertised_size,
            ..TransferStats::default()
        };

        debug!(advertised_size, "Reading image...");

        loop {
            if stats.chunks >= self.max_chunks {
                warn!("No end marker after {} chunks, giving up", stats.chunks);
                return Err(Error::ChunkLimitExceeded {
                    chunks: stats.chunks,
                });
            }

            let address = cursor.address();
            let command = cursor.next_command()?;
            self.transport.write(&command.encode())?;
            stats.chunks += 1;

            let header = self.transport.read_exact(CHUNK_FRAME_LEN)?;
            if let Err(e) = frame.verify(&header) {
                warn!(address, "Header mismatch: {}", e);
                stats.header_mismatches += 1;
            }

            let payload = self.transport.read_exact(usize::from(cursor.chunk_len()))?;

            // Finish the reply before touching the sink so a sink failure
            // leaves the line at a command boundary
            let footer = self.transport.read_exact(CHUNK_FRAME_LEN)?;
            if let Err(e) = frame.verify(&footer) {
                warn!(address, "Footer mismatch: {}", e);
                stats.footer_mismatches += 1;
            }

            let scan = cursor.accept(&payload)?;
            sink.write_all(scan.data).map_err(Error::Sink)?;

            stats.bytes = cursor.bytes_emitted();
            progress(TransferProgress {
                bytes_read: stats.bytes,
                advertised_size,
                address: cursor.address(),
            });

            if scan.complete {
                break;
            }
        }

        sink.flush().map_err(Error::Sink)?;

        info!("Image read: {}", stats);
        Ok(stats)
    }
}
