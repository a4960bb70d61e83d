//! Camera command catalog
//!
//! Every command is built from typed parameters into a fresh, immutable byte
//! sequence. Nothing here is shared or mutated between calls.

use std::fmt;

use bytes::{BufMut, Bytes, BytesMut};
use linkcam_types::{BaudRate, CompressionRatio, Resolution};

use crate::constants::{codes, BANNER_TERMINATOR, COMMAND_SIGN, REPLY_SIGN, SERIAL_NUMBER};
use crate::reply::{ExpectedReply, Reply};

/// Byte template for the compression-ratio command
///
/// The encoding differs between firmware revisions and has to come from the
/// module's datasheet. The command sent is `prefix` followed by the ratio byte,
/// and the camera must answer with exactly `reply`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompressionTemplate {
    pub prefix: Bytes,
    pub reply: Bytes,
}

impl CompressionTemplate {
    pub fn new(prefix: impl Into<Bytes>, reply: impl Into<Bytes>) -> Self {
        Self {
            prefix: prefix.into(),
            reply: reply.into(),
        }
    }
}

/// Camera commands
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Soft reset; the camera answers with a free-form banner
    Reset,

    /// Change the camera's UART speed
    SetBaudRate(BaudRate),

    /// Change the capture resolution
    SetResolution(Resolution),

    /// Change the JPEG compression ratio using a datasheet-supplied template
    SetCompression {
        template: CompressionTemplate,
        ratio: CompressionRatio,
    },

    /// Ask for the size of the captured image
    QuerySize,

    /// Read `len` bytes of image memory starting at `address`
    ReadChunk { address: u16, len: u16 },

    /// Take a picture into the camera's frame buffer
    Capture,
}

impl Command {
    /// Get command name
    pub fn name(&self) -> &'static str {
        match self {
            Self::Reset => "RESET",
            Self::SetBaudRate(_) => "SET_BAUD_RATE",
            Self::SetResolution(_) => "SET_RESOLUTION",
            Self::SetCompression { .. } => "SET_COMPRESSION",
            Self::QuerySize => "QUERY_SIZE",
            Self::ReadChunk { .. } => "READ_CHUNK",
            Self::Capture => "CAPTURE",
        }
    }

    /// Encode the command to the bytes sent on the wire
    ///
    /// # Examples
    ///
    /// ```
    /// use linkcam_core::Command;
    ///
    /// let bytes = Command::Capture.encode();
    /// assert_eq!(bytes.as_ref(), &[0x56, 0x00, 0x36, 0x01, 0x00]);
    /// ```
    pub fn encode(&self) -> Bytes {
        let mut buf = BytesMut::with_capacity(16);

        match self {
            Self::Reset => {
                header(&mut buf, codes::RESET, 0x00);
            }
            Self::SetBaudRate(rate) => {
                header(&mut buf, codes::SET_BAUD_RATE, 0x03);
                buf.put_u8(0x01);
                buf.put_slice(&baud_rate_code(*rate));
            }
            Self::SetResolution(resolution) => {
                header(&mut buf, codes::WRITE_DATA, 0x05);
                buf.put_slice(&[0x04, 0x01, 0x00, 0x19]);
                buf.put_u8(resolution_code(*resolution));
            }
            Self::SetCompression { template, ratio } => {
                buf.put_slice(&template.prefix);
                buf.put_u8(ratio.value());
            }
            Self::QuerySize => {
                header(&mut buf, codes::QUERY_SIZE, 0x01);
                buf.put_u8(0x00);
            }
            Self::ReadChunk { address, len } => {
                header(&mut buf, codes::READ_CHUNK, 0x0C);
                buf.put_slice(&[0x00, 0x0A, 0x00, 0x00]);
                buf.put_u16(*address);
                buf.put_slice(&[0x00, 0x00]);
                buf.put_u16(*len);
                // Interval between chunks, in units of 0.01 ms
                buf.put_slice(&[0x00, 0x0A]);
            }
            Self::Capture => {
                header(&mut buf, codes::CAPTURE, 0x01);
                buf.put_u8(0x00);
            }
        }

        buf.freeze()
    }

    /// Describe the reply the camera sends for this command
    pub fn reply(&self) -> Reply {
        let name = self.name();

        match self {
            Self::Reset => Reply::Banner {
                terminator: BANNER_TERMINATOR,
            },
            Self::SetBaudRate(_) => Reply::Status(status(name, codes::SET_BAUD_RATE)),
            Self::SetResolution(_) => Reply::Status(status(name, codes::WRITE_DATA)),
            Self::SetCompression { template, .. } => {
                Reply::Status(ExpectedReply::exact(name, template.reply.clone()))
            }
            Self::QuerySize => Reply::Status(size_reply()),
            Self::ReadChunk { len, .. } => Reply::Chunk {
                frame: chunk_frame(),
                payload_len: usize::from(*len),
            },
            Self::Capture => Reply::Status(status(name, codes::CAPTURE)),
        }
    }
}

fn header(buf: &mut BytesMut, code: u8, data_len: u8) {
    buf.put_u8(COMMAND_SIGN);
    buf.put_u8(SERIAL_NUMBER);
    buf.put_u8(code);
    buf.put_u8(data_len);
}

/// `76 00 <code> 00 00`, the camera's "done, no error" answer
fn status(name: &'static str, code: u8) -> ExpectedReply {
    ExpectedReply::exact(name, vec![REPLY_SIGN, SERIAL_NUMBER, code, 0x00, 0x00])
}

/// Header and footer around every chunk payload
pub fn chunk_frame() -> ExpectedReply {
    status("READ_CHUNK", codes::READ_CHUNK)
}

/// Seven fixed bytes followed by the 16-bit image size
pub fn size_reply() -> ExpectedReply {
    ExpectedReply::with_variable_suffix(
        "QUERY_SIZE",
        vec![REPLY_SIGN, SERIAL_NUMBER, codes::QUERY_SIZE, 0x00, 0x04, 0x00, 0x00],
        2,
    )
}

/// Device encoding of each line speed; a lookup table, not a formula
fn baud_rate_code(rate: BaudRate) -> [u8; 2] {
    match rate {
        BaudRate::B9600 => [0xAE, 0xC8],
        BaudRate::B19200 => [0x56, 0xE4],
        BaudRate::B38400 => [0x2A, 0xF2],
        BaudRate::B57600 => [0x1C, 0x4C],
        BaudRate::B115200 => [0x0D, 0xA6],
    }
}

fn resolution_code(resolution: Resolution) -> u8 {
    match resolution {
        Resolution::Qqvga => 0x22,
        Resolution::Qvga => 0x11,
        Resolution::Vga => 0x00,
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.name(), hex::encode(self.encode()))
    }
}
