//! Protocol constants

/// First byte of every host-to-camera command
pub const COMMAND_SIGN: u8 = 0x56;

/// First byte of every camera-to-host reply
pub const REPLY_SIGN: u8 = 0x76;

/// Camera serial number field (always 0 on a single-camera bus)
pub const SERIAL_NUMBER: u8 = 0x00;

/// Command codes (third byte of every command and reply)
pub mod codes {
    pub const SET_BAUD_RATE: u8 = 0x24;
    pub const RESET: u8 = 0x26;
    pub const WRITE_DATA: u8 = 0x31;
    pub const READ_CHUNK: u8 = 0x32;
    pub const QUERY_SIZE: u8 = 0x34;
    pub const CAPTURE: u8 = 0x36;
}

/// Bytes of image data requested per read-chunk command
pub const CHUNK_LEN: u16 = 32;

/// Length of the header and of the footer framing every chunk
pub const CHUNK_FRAME_LEN: usize = 5;

/// Length of a plain status reply (`76 00 xx 00 00`)
pub const STATUS_REPLY_LEN: usize = 5;

/// JPEG end-of-image marker
pub const END_MARKER: [u8; 2] = [0xFF, 0xD9];

/// Byte that ends the banner printed after a reset
pub const BANNER_TERMINATOR: u8 = b'5';

/// Maximum single-byte reads spent looking for the banner terminator
pub const DEFAULT_BANNER_LIMIT: usize = 512;

/// Safety bound on read-chunk commands per image (the whole 16-bit address space)
pub const DEFAULT_MAX_CHUNKS: usize = (u16::MAX as usize + 1) / CHUNK_LEN as usize;

/// Line speed the camera boots with (bits per second)
pub const DEFAULT_BAUD_RATE: u32 = 38400;

/// Line speed used for image transfer when nothing else is configured
pub const DEFAULT_TRANSFER_BAUD_RATE: u32 = 115200;

/// Default per-read timeout (milliseconds)
pub const DEFAULT_READ_TIMEOUT_MS: u64 = 2000;
