//! Chunked image read state
//!
//! The camera neither reports the transfer length precisely nor aligns the
//! JPEG end marker (`FF D9`) to a chunk boundary. The cursor therefore keeps
//! the last byte of each chunk so a marker split across two chunks is still
//! recognized.
//!
//! A cursor tracks:
//! - Read address (starts at 0, grows by the chunk length per accepted chunk)
//! - Last byte of the previous chunk
//! - Bytes emitted so far
//! - The advertised image size (progress reporting only)

use tracing::trace;

use crate::command::Command;
use crate::constants::{CHUNK_LEN, END_MARKER};
use crate::error::{Error, Result};

/// Outcome of scanning one chunk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkScan<'a> {
    /// Bytes to emit, in order; ends with `D9` when `complete`
    pub data: &'a [u8],

    /// The end marker was found in (or completed by) this chunk
    pub complete: bool,
}

/// Cursor over the camera's image memory
#[derive(Debug, Clone)]
pub struct ImageCursor {
    address: u16,
    chunk_len: u16,
    last_byte: u8,
    bytes_emitted: usize,
    advertised_size: u16,
    complete: bool,
    exhausted: bool,
}

impl ImageCursor {
    /// Create a cursor at address 0 using the device chunk length
    pub fn new(advertised_size: u16) -> Self {
        Self {
            address: 0,
            chunk_len: CHUNK_LEN,
            last_byte: 0,
            bytes_emitted: 0,
            advertised_size,
            complete: false,
            exhausted: false,
        }
    }

    /// Address of the next chunk
    pub fn address(&self) -> u16 {
        self.address
    }

    pub fn chunk_len(&self) -> u16 {
        self.chunk_len
    }

    pub fn last_byte(&self) -> u8 {
        self.last_byte
    }

    pub fn bytes_emitted(&self) -> usize {
        self.bytes_emitted
    }

    pub fn advertised_size(&self) -> u16 {
        self.advertised_size
    }

    /// Check if the end marker has been seen
    pub fn is_complete(&self) -> bool {
        self.complete
    }

    /// Build the read command for the chunk at the current address
    ///
    /// # Errors
    ///
    /// Returns [`Error::AddressSpaceExhausted`] once the next chunk would start
    /// past `0xFFFF`.
    pub fn next_command(&self) -> Result<Command> {
        if self.exhausted {
            return Err(Error::AddressSpaceExhausted {
                address: self.address,
            });
        }

        Ok(Command::ReadChunk {
            address: self.address,
            len: self.chunk_len,
        })
    }

    /// Scan a chunk payload for the end marker and advance the address
    ///
    /// Bytes after the marker are never part of the returned slice.
    ///
    /// # Examples
    ///
    /// ```
    /// use linkcam_core::ImageCursor;
    ///
    /// let mut cursor = ImageCursor::new(0);
    /// let mut first = [0x11u8; 32];
    /// first[31] = 0xFF;
    /// let mut second = [0x22u8; 32];
    /// second[0] = 0xD9;
    ///
    /// assert!(!cursor.accept(&first).unwrap().complete);
    /// let scan = cursor.accept(&second).unwrap();
    /// assert!(scan.complete);
    /// assert_eq!(scan.data, &[0xD9]);
    /// ```
    pub fn accept<'a>(&mut self, payload: &'a [u8]) -> Result<ChunkScan<'a>> {
        let expected = usize::from(self.chunk_len);
        if payload.len() != expected {
            return Err(Error::ChunkLength {
                expected,
                actual: payload.len(),
            });
        }

        if self.complete {
            return Ok(ChunkScan {
                data: &[],
                complete: true,
            });
        }

        let end = if self.last_byte == END_MARKER[0] && payload[0] == END_MARKER[1] {
            Some(1)
        } else {
            payload
                .windows(2)
                .position(|pair| pair == END_MARKER)
                .map(|index| index + 2)
        };

        let data = match end {
            Some(end) => &payload[..end],
            None => payload,
        };

        self.complete = end.is_some();
        self.last_byte = payload[expected - 1];
        self.bytes_emitted += data.len();

        trace!(
            address = self.address,
            emitted = data.len(),
            complete = self.complete,
            "Scanned chunk"
        );

        match self.address.checked_add(self.chunk_len) {
            Some(next) => self.address = next,
            None => self.exhausted = true,
        }

        Ok(ChunkScan {
            data,
            complete: self.complete,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn chunk(fill: u8) -> Vec<u8> {
        vec![fill; CHUNK_LEN as usize]
    }

    #[test]
    fn test_cursor_new() {
        let cursor = ImageCursor::new(300);
        assert_eq!(cursor.address(), 0);
        assert_eq!(cursor.chunk_len(), 32);
        assert_eq!(cursor.last_byte(), 0);
        assert_eq!(cursor.bytes_emitted(), 0);
        assert_eq!(cursor.advertised_size(), 300);
        assert!(!cursor.is_complete());
    }

    #[test]
    fn test_next_command_tracks_address() {
        let mut cursor = ImageCursor::new(0);
        cursor.accept(&chunk(0x10)).unwrap();
        cursor.accept(&chunk(0x10)).unwrap();

        assert_eq!(
            cursor.next_command().unwrap(),
            Command::ReadChunk { address: 64, len: 32 }
        );
    }

    #[test]
    fn test_interior_marker() {
        let mut cursor = ImageCursor::new(0);
        let mut payload = chunk(0x42);
        payload[9] = 0xFF;
        payload[10] = 0xD9;

        let scan = cursor.accept(&payload).unwrap();
        assert!(scan.complete);
        assert_eq!(scan.data.len(), 11);
        assert_eq!(&scan.data[9..], &[0xFF, 0xD9]);
        assert_eq!(cursor.bytes_emitted(), 11);
    }

    #[test]
    fn test_split_marker() {
        let mut cursor = ImageCursor::new(0);
        let mut first = chunk(0x42);
        first[31] = 0xFF;
        let mut second = chunk(0x99);
        second[0] = 0xD9;

        let scan = cursor.accept(&first).unwrap();
        assert!(!scan.complete);
        assert_eq!(scan.data.len(), 32);
        assert_eq!(cursor.last_byte(), 0xFF);

        let scan = cursor.accept(&second).unwrap();
        assert!(scan.complete);
        assert_eq!(scan.data, &[0xD9]);
        assert_eq!(cursor.bytes_emitted(), 33);
    }

    #[test]
    fn test_marker_at_chunk_start_needs_previous_ff() {
        let mut cursor = ImageCursor::new(0);
        let mut payload = chunk(0x00);
        payload[0] = 0xD9;

        let scan = cursor.accept(&payload).unwrap();
        assert!(!scan.complete);
        assert_eq!(scan.data.len(), 32);
    }

    #[test]
    fn test_marker_in_last_two_bytes() {
        let mut cursor = ImageCursor::new(0);
        let mut payload = chunk(0x01);
        payload[30] = 0xFF;
        payload[31] = 0xD9;

        let scan = cursor.accept(&payload).unwrap();
        assert!(scan.complete);
        assert_eq!(scan.data.len(), 32);
    }

    #[test]
    fn test_wrong_chunk_length() {
        let mut cursor = ImageCursor::new(0);
        let result = cursor.accept(&[0xFF, 0xD9]);
        assert!(matches!(
            result,
            Err(Error::ChunkLength { expected: 32, actual: 2 })
        ));
        assert_eq!(cursor.address(), 0);
    }

    #[test]
    fn test_address_space_exhausted() {
        let mut cursor = ImageCursor::new(0);
        for _ in 0..2048 {
            cursor.next_command().unwrap();
            cursor.accept(&chunk(0x00)).unwrap();
        }

        assert!(matches!(
            cursor.next_command(),
            Err(Error::AddressSpaceExhausted { .. })
        ));
    }

    proptest! {
        #[test]
        fn prop_address_grows_by_chunk_len(chunks in 1usize..200) {
            let mut cursor = ImageCursor::new(0);
            let mut previous = cursor.address();

            for _ in 0..chunks {
                cursor.accept(&chunk(0x00)).unwrap();
                prop_assert_eq!(cursor.address(), previous + CHUNK_LEN);
                previous = cursor.address();
            }
        }

        #[test]
        fn prop_emits_exactly_up_to_marker(
            body in proptest::collection::vec(0u8..0xD9, 0..300),
            padding in 0x00u8..0xD9,
        ) {
            let mut image = body.clone();
            image.extend_from_slice(&END_MARKER);

            let mut device_memory = image.clone();
            let len = CHUNK_LEN as usize;
            let padded = device_memory.len().div_ceil(len) * len + len;
            device_memory.resize(padded, padding);

            let mut cursor = ImageCursor::new(image.len() as u16);
            let mut emitted = Vec::new();

            for payload in device_memory.chunks(len) {
                let scan = cursor.accept(payload).unwrap();
                emitted.extend_from_slice(scan.data);
                if scan.complete {
                    break;
                }
            }

            prop_assert!(cursor.is_complete());
            prop_assert_eq!(emitted, image);
        }
    }
}
