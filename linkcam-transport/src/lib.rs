//! Transport layer for the camera protocol
//!
//! Provides blocking, half-duplex byte exchange with the camera.

pub mod error;
pub mod serial;

pub use error::{Error, Result};
pub use serial::SerialTransport;

use bytes::Bytes;

/// Byte channel to the camera
///
/// Every call blocks until it completes or the read timeout expires. After a
/// transport is closed, all reads and writes fail with [`Error::NotOpen`].
#[cfg_attr(any(test, feature = "mock"), mockall::automock)]
pub trait Transport {
    /// Write all bytes
    fn write(&mut self, data: &[u8]) -> Result<()>;

    /// Read exactly `len` bytes (with timeout)
    fn read_exact(&mut self, len: usize) -> Result<Bytes>;

    /// Change the host-side line speed without closing the port
    fn set_line_speed(&mut self, baud_rate: u32) -> Result<()>;

    /// Current host-side line speed
    fn line_speed(&self) -> u32;

    /// Check if open
    fn is_open(&self) -> bool;

    /// Close the port; further I/O fails
    fn close(&mut self) -> Result<()>;

    /// Port name, for logging
    fn port_name(&self) -> String;
}
