//! Device settings the camera accepts
//!
//! Every value here is drawn from a closed set. Anything outside that set is
//! rejected while parsing, so it can never be turned into a command.

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Serial line speeds supported by the camera
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BaudRate {
    B9600,
    B19200,
    B38400,
    B57600,
    B115200,
}

impl BaudRate {
    /// All supported rates, slowest first
    pub const ALL: [BaudRate; 5] = [
        Self::B9600,
        Self::B19200,
        Self::B38400,
        Self::B57600,
        Self::B115200,
    ];

    /// Host-side line speed in bits per second
    pub fn bits_per_second(self) -> u32 {
        match self {
            Self::B9600 => 9600,
            Self::B19200 => 19200,
            Self::B38400 => 38400,
            Self::B57600 => 57600,
            Self::B115200 => 115200,
        }
    }
}

impl Default for BaudRate {
    /// Factory setting of the camera
    fn default() -> Self {
        Self::B38400
    }
}

impl From<BaudRate> for u32 {
    fn from(rate: BaudRate) -> u32 {
        rate.bits_per_second()
    }
}

impl TryFrom<u32> for BaudRate {
    type Error = Error;

    fn try_from(value: u32) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|rate| rate.bits_per_second() == value)
            .ok_or(Error::UnsupportedBaudRate(value))
    }
}

impl FromStr for BaudRate {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let value: u32 = s
            .trim()
            .parse()
            .map_err(|_| Error::Parse(format!("'{}' is not a baud rate", s)))?;
        Self::try_from(value)
    }
}

impl fmt::Display for BaudRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.bits_per_second())
    }
}

/// Image resolution presets
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Resolution {
    /// 160x120
    Qqvga,
    /// 320x240
    Qvga,
    /// 640x480
    Vga,
}

impl Resolution {
    pub const ALL: [Resolution; 3] = [Self::Qqvga, Self::Qvga, Self::Vga];

    /// Width and height in pixels
    pub fn dimensions(self) -> (u16, u16) {
        match self {
            Self::Qqvga => (160, 120),
            Self::Qvga => (320, 240),
            Self::Vga => (640, 480),
        }
    }
}

impl FromStr for Resolution {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|res| res.to_string() == normalized)
            .ok_or_else(|| Error::UnsupportedResolution(s.to_string()))
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (width, height) = self.dimensions();
        write!(f, "{}x{}", width, height)
    }
}

/// JPEG compression ratio, any value from 0x00 to 0xFF
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
pub struct CompressionRatio(pub u8);

impl CompressionRatio {
    pub fn value(self) -> u8 {
        self.0
    }
}

impl From<u8> for CompressionRatio {
    fn from(value: u8) -> Self {
        Self(value)
    }
}

impl FromStr for CompressionRatio {
    type Err = Error;

    /// Parses a hex byte such as `36`, `0x36` or `FF`
    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        let digits = trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
            .unwrap_or(trimmed);

        if digits.is_empty() || digits.len() > 2 {
            return Err(Error::Parse(format!(
                "'{}' is not a compression ratio (expected 00 to FF)",
                s
            )));
        }

        u8::from_str_radix(digits, 16)
            .map(Self)
            .map_err(|_| Error::Parse(format!("'{}' is not a hex byte", s)))
    }
}

impl fmt::Display for CompressionRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:02X}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_baud_rate_conversion() {
        assert_eq!(u32::from(BaudRate::B115200), 115200);
        assert_eq!(BaudRate::try_from(9600).unwrap(), BaudRate::B9600);
        assert_eq!("57600".parse::<BaudRate>().unwrap(), BaudRate::B57600);
    }

    #[test]
    fn test_unsupported_baud_rate() {
        assert!(matches!(
            BaudRate::try_from(14400),
            Err(Error::UnsupportedBaudRate(14400))
        ));
        assert!(matches!("fast".parse::<BaudRate>(), Err(Error::Parse(_))));
    }

    #[test]
    fn test_resolution_parse() {
        assert_eq!("160x120".parse::<Resolution>().unwrap(), Resolution::Qqvga);
        assert_eq!("320X240".parse::<Resolution>().unwrap(), Resolution::Qvga);
        assert_eq!(" 640x480 ".parse::<Resolution>().unwrap(), Resolution::Vga);
        assert!(matches!(
            "800x600".parse::<Resolution>(),
            Err(Error::UnsupportedResolution(_))
        ));
    }

    #[test]
    fn test_resolution_display() {
        assert_eq!(Resolution::Qvga.to_string(), "320x240");
    }

    #[test]
    fn test_compression_ratio_parse() {
        assert_eq!("36".parse::<CompressionRatio>().unwrap(), CompressionRatio(0x36));
        assert_eq!("0xff".parse::<CompressionRatio>().unwrap(), CompressionRatio(0xFF));
        assert_eq!("0".parse::<CompressionRatio>().unwrap(), CompressionRatio(0));
        assert!("100".parse::<CompressionRatio>().is_err());
        assert!("0x".parse::<CompressionRatio>().is_err());
        assert!("zz".parse::<CompressionRatio>().is_err());
    }
}
