//! Runtime configuration for front ends
//!
//! Options are read from `CAMERA_*` environment variables:
//!
//! | Variable | Default | Meaning |
//! |---|---|---|
//! | `CAMERA_PORT` | `/dev/ttyUSB0` | Serial device |
//! | `CAMERA_BAUD` | `38400` | Speed the camera currently runs at |
//! | `CAMERA_TRANSFER_BAUD` | `115200` | Speed to negotiate before transfer |
//! | `CAMERA_RESOLUTION` | unset | `160x120`, `320x240` or `640x480` |
//! | `CAMERA_COMPRESSION` | unset | Hex ratio `00` to `FF` |
//! | `CAMERA_OUTPUT` | `out.jpg` | Output file |
//! | `CAMERA_TIMEOUT_MS` | `2000` | Per-read timeout |
//! | `CAMERA_COUNTDOWN` | `3` | Seconds to wait before capturing |
//! | `CAMERA_VERBOSE` | unset | `1`, `true` or `yes` for debug logging |

use std::path::PathBuf;
use std::time::Duration;

use linkcam_core::constants::{
    DEFAULT_BAUD_RATE, DEFAULT_READ_TIMEOUT_MS, DEFAULT_TRANSFER_BAUD_RATE,
};
use linkcam_types::{BaudRate, CompressionRatio, Error as TypesError, Resolution};

use crate::error::Result;

/// Default serial device
pub const DEFAULT_PORT: &str = "/dev/ttyUSB0";

/// Default output file
pub const DEFAULT_OUTPUT: &str = "out.jpg";

/// Default countdown before capture (seconds)
pub const DEFAULT_COUNTDOWN_SECS: u64 = 3;

/// Camera and front-end options
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CameraConfig {
    pub port: String,
    pub baud_rate: BaudRate,
    pub transfer_baud_rate: BaudRate,
    pub resolution: Option<Resolution>,
    pub compression: Option<CompressionRatio>,
    pub output: PathBuf,
    pub read_timeout: Duration,
    pub countdown: Duration,
    pub verbose: bool,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT.to_string(),
            baud_rate: BaudRate::try_from(DEFAULT_BAUD_RATE).unwrap_or_default(),
            transfer_baud_rate: BaudRate::try_from(DEFAULT_TRANSFER_BAUD_RATE)
                .unwrap_or(BaudRate::B115200),
            resolution: None,
            compression: None,
            output: PathBuf::from(DEFAULT_OUTPUT),
            read_timeout: Duration::from_millis(DEFAULT_READ_TIMEOUT_MS),
            countdown: Duration::from_secs(DEFAULT_COUNTDOWN_SECS),
            verbose: false,
        }
    }
}

impl CameraConfig {
    /// Load from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load using `lookup` to resolve variable names
    ///
    /// # Examples
    ///
    /// ```
    /// use linkcam::{BaudRate, CameraConfig};
    ///
    /// let config = CameraConfig::from_lookup(|key| match key {
    ///     "CAMERA_TRANSFER_BAUD" => Some("57600".to_string()),
    ///     _ => None,
    /// })
    /// .unwrap();
    ///
    /// assert_eq!(config.transfer_baud_rate, BaudRate::B57600);
    /// ```
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(port) = lookup("CAMERA_PORT") {
            config.port = port;
        }
        if let Some(rate) = lookup("CAMERA_BAUD") {
            config.baud_rate = rate.parse()?;
        }
        if let Some(rate) = lookup("CAMERA_TRANSFER_BAUD") {
            config.transfer_baud_rate = rate.parse()?;
        }
        if let Some(resolution) = lookup("CAMERA_RESOLUTION") {
            config.resolution = Some(resolution.parse()?);
        }
        if let Some(ratio) = lookup("CAMERA_COMPRESSION") {
            config.compression = Some(ratio.parse()?);
        }
        if let Some(output) = lookup("CAMERA_OUTPUT") {
            config.output = PathBuf::from(output);
        }
        if let Some(ms) = lookup("CAMERA_TIMEOUT_MS") {
            config.read_timeout = Duration::from_millis(parse_number("CAMERA_TIMEOUT_MS", &ms)?);
        }
        if let Some(secs) = lookup("CAMERA_COUNTDOWN") {
            config.countdown = Duration::from_secs(parse_number("CAMERA_COUNTDOWN", &secs)?);
        }
        if let Some(flag) = lookup("CAMERA_VERBOSE") {
            config.verbose = matches!(
                flag.trim().to_ascii_lowercase().as_str(),
                "1" | "true" | "yes" | "on"
            );
        }

        Ok(config)
    }
}

fn parse_number(key: &str, value: &str) -> Result<u64> {
    value
        .trim()
        .parse()
        .map_err(|_| TypesError::Parse(format!("{}: '{}' is not a number", key, value)).into())
}
