//! High-level camera interface

use bytes::Bytes;
use tracing::{debug, info, trace, warn};

use linkcam_core::constants::{BANNER_TERMINATOR, DEFAULT_BANNER_LIMIT, DEFAULT_MAX_CHUNKS};
use linkcam_core::reply::parse_image_size;
use linkcam_core::{Command, CompressionTemplate, Reply};
use linkcam_transport::{SerialTransport, Transport};
use linkcam_types::{
    BaudRate, CapturedImage, CompressionRatio, Resolution, TransferProgress, TransferStats,
};

use crate::config::CameraConfig;
use crate::error::{Error, Result};
use crate::reader::ChunkReader;

/// Serial JPEG camera
///
/// Drives the camera's command/reply protocol over any [`Transport`]. The
/// protocol is strictly half-duplex: every command's reply is read in full
/// before the next command is written.
///
/// # Examples
///
/// ```no_run
/// use linkcam::{BaudRate, Camera};
///
/// fn main() -> linkcam::Result<()> {
///     let mut camera = Camera::open("/dev/ttyUSB0", BaudRate::B38400)?;
///
///     camera.reset()?;
///     camera.negotiate_baud(BaudRate::B115200)?;
///
///     let image = camera.capture_image()?;
///     std::fs::write("out.jpg", &image.data).map_err(linkcam::Error::Sink)?;
///     Ok(())
/// }
/// ```
pub struct Camera<T: Transport> {
    transport: T,
    banner_limit: usize,
    max_chunks: usize,
    compression: Option<CompressionTemplate>,
}

impl Camera<SerialTransport> {
    /// Open a camera on a serial device at its current line speed
    pub fn open(path: impl Into<String>, baud_rate: BaudRate) -> Result<Self> {
        let transport = SerialTransport::open_path(path, baud_rate.bits_per_second())?;
        Ok(Self::new(transport))
    }

    /// Open a camera using port, speed and timeout from a [`CameraConfig`]
    pub fn from_config(config: &CameraConfig) -> Result<Self> {
        let mut transport = SerialTransport::new(config.port.clone())
            .with_baud_rate(config.baud_rate.bits_per_second())
            .with_read_timeout(config.read_timeout);
        transport.open()?;
        Ok(Self::new(transport))
    }
}

impl<T: Transport> Camera<T> {
    /// Create a camera over an already open transport
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            banner_limit: DEFAULT_BANNER_LIMIT,
            max_chunks: DEFAULT_MAX_CHUNKS,
            compression: None,
        }
    }

    /// Set the number of single-byte reads spent waiting for the reset banner to end
    pub fn with_banner_limit(mut self, reads: usize) -> Self {
        self.banner_limit = reads;
        self
    }

    /// Set the maximum number of chunks read for one image
    pub fn with_max_chunks(mut self, chunks: usize) -> Self {
        self.max_chunks = chunks;
        self
    }

    /// Set the datasheet byte template used by [`set_compression`](Self::set_compression)
    pub fn with_compression_template(mut self, template: CompressionTemplate) -> Self {
        self.compression = Some(template);
        self
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    pub fn into_transport(self) -> T {
        self.transport
    }

    /// Host-side line speed in bits per second
    pub fn line_speed(&self) -> u32 {
        self.transport.line_speed()
    }

    /// Check if the transport is open
    pub fn is_open(&self) -> bool {
        self.transport.is_open()
    }

    /// Close the transport
    pub fn close(&mut self) -> Result<()> {
        self.transport.close()?;
        Ok(())
    }

    /// Reset the camera
    ///
    /// Reads the banner the camera prints after a reset one byte at a time
    /// until the terminator byte arrives, then keeps reading until the line
    /// goes quiet so text printed after the terminator (`Init end` on VC0703
    /// modules) is not taken for the next reply. The banner is returned as
    /// text; its content is informational and never checked.
    ///
    /// A successful reset therefore waits one read timeout.
    ///
    /// # Errors
    ///
    /// Returns [`Error::BannerTerminatorMissing`] if the terminator does not
    /// arrive within the banner limit, or a transport timeout if the camera
    /// stops sending before it.
    pub fn reset(&mut self) -> Result<String> {
        self.ensure_open()?;

        info!("Resetting camera on {}...", self.transport.port_name());
        self.send(&Command::Reset)?;

        let mut banner = Vec::with_capacity(self.banner_limit.min(128));
        let mut terminated = false;
        for _ in 0..self.banner_limit {
            let byte = self.transport.read_exact(1)?;
            banner.extend_from_slice(&byte);

            if byte[0] == BANNER_TERMINATOR {
                terminated = true;
                break;
            }
        }

        if !terminated {
            warn!(
                "No banner terminator after {} bytes: {:?}",
                banner.len(),
                String::from_utf8_lossy(&banner)
            );
            return Err(Error::BannerTerminatorMissing {
                reads: self.banner_limit,
            });
        }

        self.drain_banner_tail(&mut banner)?;

        let text = String::from_utf8_lossy(&banner).into_owned();
        debug!("Reset banner: {:?}", text);
        info!("Camera reset");
        Ok(text)
    }

    /// Switch the camera and then the host to a new line speed
    ///
    /// The command goes out at the current speed and the reply is verified
    /// before the host switches, so a camera that ignored the command is never
    /// left talking at a different speed than the host.
    ///
    /// # Errors
    ///
    /// Returns a protocol mismatch if the camera does not acknowledge; the
    /// host line speed is unchanged in that case. Returns
    /// [`Error::LineSpeedDesync`] if the camera acknowledged but the host port
    /// could not follow; the camera then only answers at `rate`.
    pub fn negotiate_baud(&mut self, rate: BaudRate) -> Result<()> {
        self.ensure_open()?;

        debug!("Negotiating {} baud...", rate);
        self.exchange(&Command::SetBaudRate(rate))?;

        let bits_per_second = rate.bits_per_second();
        if let Err(source) = self.transport.set_line_speed(bits_per_second) {
            warn!("Camera switched to {} baud but the host port did not: {}", rate, source);
            return Err(Error::LineSpeedDesync {
                rate: bits_per_second,
                source,
            });
        }
        info!("Line speed switched to {} baud", rate);

        Ok(())
    }

    /// Set the capture resolution
    pub fn set_resolution(&mut self, resolution: Resolution) -> Result<()> {
        self.ensure_open()?;

        debug!("Setting resolution {}...", resolution);
        self.exchange(&Command::SetResolution(resolution))?;
        info!("Resolution set to {}", resolution);

        Ok(())
    }

    /// Set the JPEG compression ratio
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotSupported`] without touching the device when no
    /// compression template was configured.
    pub fn set_compression(&mut self, ratio: CompressionRatio) -> Result<()> {
        let template = self.compression.clone().ok_or_else(|| {
            Error::NotSupported("compression command template not configured".into())
        })?;
        self.ensure_open()?;

        debug!("Setting compression ratio {}...", ratio);
        self.exchange(&Command::SetCompression { template, ratio })?;
        info!("Compression ratio set to {}", ratio);

        Ok(())
    }

    /// Take a picture into the camera's frame buffer
    ///
    /// Only verifies the acknowledgement; use [`fetch_image`](Self::fetch_image)
    /// or [`read_image`](Self::read_image) to transfer the JPEG.
    pub fn capture(&mut self) -> Result<()> {
        self.ensure_open()?;

        debug!("Capturing...");
        self.exchange(&Command::Capture)?;
        info!("Image captured");

        Ok(())
    }

    /// Ask the camera for the size of the captured image
    ///
    /// The value is advisory; transfers end on the JPEG end marker.
    pub fn query_size(&mut self) -> Result<u16> {
        self.ensure_open()?;

        let reply = self.exchange(&Command::QuerySize)?;
        let size = parse_image_size(&reply)?;
        debug!("Camera reports {} byte image", size);

        Ok(size)
    }

    /// Transfer the captured JPEG into `sink`
    pub fn read_image<W: std::io::Write>(&mut self, sink: &mut W) -> Result<TransferStats> {
        self.read_image_with_progress(sink, |_| {})
    }

    /// Transfer the captured JPEG into `sink`, reporting progress after each chunk
    pub fn read_image_with_progress<W, F>(
        &mut self,
        sink: &mut W,
        progress: F,
    ) -> Result<TransferStats>
    where
        W: std::io::Write,
        F: FnMut(TransferProgress),
    {
        let advertised_size = self.query_size()?;

        ChunkReader::new(&mut self.transport)
            .with_max_chunks(self.max_chunks)
            .read(advertised_size, sink, progress)
    }

    /// Transfer the captured JPEG into memory
    pub fn fetch_image(&mut self) -> Result<CapturedImage> {
        let mut data = Vec::new();
        let stats = self.read_image(&mut data)?;
        Ok(CapturedImage::new(data, stats))
    }

    /// Capture a picture and transfer it into memory
    pub fn capture_image(&mut self) -> Result<CapturedImage> {
        self.capture()?;
        self.fetch_image()
    }

    // Helper methods

    /// Read whatever follows the banner terminator until a read times out
    fn drain_banner_tail(&mut self, banner: &mut Vec<u8>) -> Result<()> {
        for _ in 0..self.banner_limit {
            match self.transport.read_exact(1) {
                Ok(byte) => banner.extend_from_slice(&byte),
                Err(e) if e.is_timeout() => return Ok(()),
                Err(e) => return Err(e.into()),
            }
        }

        warn!("Camera still sending after {} banner bytes", banner.len());
        Ok(())
    }

    fn ensure_open(&self) -> Result<()> {
        if !self.transport.is_open() {
            return Err(Error::NotOpen);
        }
        Ok(())
    }

    fn send(&mut self, command: &Command) -> Result<()> {
        trace!("Sending: {}", command);
        self.transport.write(&command.encode())?;
        Ok(())
    }

    /// Send a command and verify its fixed-length reply
    fn exchange(&mut self, command: &Command) -> Result<Bytes> {
        let Reply::Status(expected) = command.reply() else {
            return Err(Error::NotSupported(format!(
                "{} has no fixed-length reply",
                command.name()
            )));
        };

        self.send(command)?;

        let reply = self.transport.read_exact(expected.len())?;
        trace!("Received: {:02X?}", &reply[..]);

        expected.verify(&reply)?;
        Ok(reply)
    }
}
