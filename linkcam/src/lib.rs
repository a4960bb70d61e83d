//! # linkcam
//!
//! Driver for LinkSprite-style serial JPEG camera modules.
//!
//! ## Features
//!
//! - Exact command catalog with reply verification
//! - Baud-rate negotiation that never desynchronizes host and camera
//! - Chunked image transfer with end-marker detection across chunk boundaries
//! - Blocking, transport-agnostic engine (serial port included)
//!
//! ## Quick Start
//!
//! ```no_run
//! use linkcam::{BaudRate, Camera};
//!
//! fn main() -> linkcam::Result<()> {
//!     // Open the camera at its power-on speed
//!     let mut camera = Camera::open("/dev/ttyUSB0", BaudRate::B38400)?;
//!     camera.reset()?;
//!
//!     // Speed up the transfer
//!     camera.negotiate_baud(BaudRate::B115200)?;
//!
//!     // Take a picture
//!     let image = camera.capture_image()?;
//!     println!("{}", image);
//!
//!     Ok(())
//! }
//! ```

pub mod camera;
pub mod config;
pub mod error;
pub mod reader;

// Re-exports
pub use camera::Camera;
pub use config::CameraConfig;
pub use error::{Error, ErrorKind, Result};
pub use reader::ChunkReader;

// Re-export types
pub use linkcam_core::{Command, CompressionTemplate};
pub use linkcam_transport::{SerialTransport, Transport};
pub use linkcam_types::{
    BaudRate, CapturedImage, CompressionRatio, Resolution, TransferProgress, TransferStats,
};
