//! Serial transport

use std::io::{ErrorKind, Read, Write};
use std::time::Duration;

use bytes::{Bytes, BytesMut};
use linkcam_core::constants::{DEFAULT_BAUD_RATE, DEFAULT_READ_TIMEOUT_MS};
use serialport::{DataBits, FlowControl, Parity, SerialPort, StopBits};
use tracing::{debug, trace};

use crate::{error::*, Transport};

/// Serial (UART) transport for the camera, 8N1 without flow control
pub struct SerialTransport {
    path: String,
    baud_rate: u32,
    port: Option<Box<dyn SerialPort>>,
    read_timeout: Duration,
}

impl SerialTransport {
    /// Create new serial transport at the camera's power-on speed
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            baud_rate: DEFAULT_BAUD_RATE,
            port: None,
            read_timeout: Duration::from_millis(DEFAULT_READ_TIMEOUT_MS),
        }
    }

    /// Set the initial line speed
    pub fn with_baud_rate(mut self, baud_rate: u32) -> Self {
        self.baud_rate = baud_rate;
        self
    }

    /// Set read timeout
    pub fn with_read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = timeout;
        self
    }

    /// Open the device
    pub fn open(&mut self) -> Result<()> {
        if self.is_open() {
            return Err(Error::AlreadyOpen);
        }

        debug!("Opening {} at {} baud...", self.path, self.baud_rate);

        let port = serialport::new(&self.path, self.baud_rate)
            .data_bits(DataBits::Eight)
            .parity(Parity::None)
            .stop_bits(StopBits::One)
            .flow_control(FlowControl::None)
            .timeout(self.read_timeout)
            .open()?;

        debug!("Opened {}", self.path);

        self.port = Some(port);
        Ok(())
    }

    /// Convenience constructor: create and open in one step
    pub fn open_path(path: impl Into<String>, baud_rate: u32) -> Result<Self> {
        let mut transport = Self::new(path).with_baud_rate(baud_rate);
        transport.open()?;
        Ok(transport)
    }
}

impl Transport for SerialTransport {
    fn write(&mut self, data: &[u8]) -> Result<()> {
        let port = self.port.as_mut().ok_or(Error::NotOpen)?;

        trace!("Sending {} bytes: {:02X?}", data.len(), data);

        port.write_all(data)?;
        port.flush()?;

        Ok(())
    }

    fn read_exact(&mut self, len: usize) -> Result<Bytes> {
        let port = self.port.as_mut().ok_or(Error::NotOpen)?;

        let mut buf = BytesMut::zeroed(len);
        let mut filled = 0;

        while filled < len {
            match port.read(&mut buf[filled..]) {
                Ok(0) => return Err(Error::ConnectionClosed),
                Ok(n) => filled += n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) if e.kind() == ErrorKind::TimedOut => {
                    debug!("Read timeout after {} of {} bytes", filled, len);
                    return Err(Error::ReadTimeout {
                        expected: len,
                        received: filled,
                    });
                }
                Err(e) => return Err(Error::Io(e)),
            }
        }

        trace!("Received {} bytes: {:02X?}", len, &buf[..]);

        Ok(buf.freeze())
    }

    fn set_line_speed(&mut self, baud_rate: u32) -> Result<()> {
        let port = self.port.as_mut().ok_or(Error::NotOpen)?;

        port.set_baud_rate(baud_rate)?;
        debug!("Line speed of {} now {} baud", self.path, baud_rate);

        self.baud_rate = baud_rate;
        Ok(())
    }

    fn line_speed(&self) -> u32 {
        self.baud_rate
    }

    fn is_open(&self) -> bool {
        self.port.is_some()
    }

    fn close(&mut self) -> Result<()> {
        if self.port.take().is_some() {
            debug!("Closed {}", self.path);
        }
        Ok(())
    }

    fn port_name(&self) -> String {
        self.path.clone()
    }
}

impl Drop for SerialTransport {
    fn drop(&mut self) {
        if self.is_open() {
            debug!("Serial transport for {} dropped while open, closing", self.path);
        }
    }
}
