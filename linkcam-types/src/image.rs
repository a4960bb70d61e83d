//! Captured image structures

use std::fmt;

use bytes::Bytes;
use chrono::{DateTime, Utc};

use crate::error::{Error, Result};
use crate::transfer::TransferStats;

/// JPEG start-of-image marker
pub const SOI: [u8; 2] = [0xFF, 0xD8];

/// JPEG end-of-image marker
pub const EOI: [u8; 2] = [0xFF, 0xD9];

/// A JPEG read out of the camera
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedImage {
    /// Raw JPEG bytes, ending with the end-of-image marker
    pub data: Bytes,

    /// Size the camera reported before the transfer
    pub advertised_size: u16,

    /// Transfer bookkeeping
    pub stats: TransferStats,

    /// When the transfer finished
    pub captured_at: DateTime<Utc>,
}

impl CapturedImage {
    pub fn new(data: impl Into<Bytes>, stats: TransferStats) -> Self {
        Self {
            data: data.into(),
            advertised_size: stats.advertised_size,
            stats,
            captured_at: Utc::now(),
        }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Check the SOI/EOI framing of the JPEG
    pub fn validate(&self) -> Result<()> {
        if !self.data.starts_with(&SOI) {
            return Err(Error::Validation(format!(
                "image does not start with FF D8 (got {:02X?})",
                &self.data[..self.data.len().min(2)]
            )));
        }

        if !self.data.ends_with(&EOI) {
            return Err(Error::Validation("image does not end with FF D9".into()));
        }

        Ok(())
    }
}

impl fmt::Display for CapturedImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "JPEG[{} bytes, advertised {}, at {}]",
            self.data.len(),
            self.advertised_size,
            self.captured_at.format("%Y-%m-%d %H:%M:%S")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_framed_jpeg() {
        let image = CapturedImage::new(
            vec![0xFF, 0xD8, 0x01, 0x02, 0xFF, 0xD9],
            TransferStats::default(),
        );
        assert!(image.validate().is_ok());
        assert_eq!(image.len(), 6);
    }

    #[test]
    fn test_validate_missing_soi() {
        let image = CapturedImage::new(vec![0x00, 0xD8, 0xFF, 0xD9], TransferStats::default());
        assert!(matches!(image.validate(), Err(Error::Validation(_))));
    }

    #[test]
    fn test_validate_truncated() {
        let image = CapturedImage::new(vec![0xFF, 0xD8, 0x10], TransferStats::default());
        assert!(image.validate().is_err());

        let empty = CapturedImage::new(Vec::new(), TransferStats::default());
        assert!(empty.is_empty());
        assert!(empty.validate().is_err());
    }

    #[test]
    fn test_advertised_size_from_stats() {
        let stats = TransferStats {
            advertised_size: 300,
            ..TransferStats::default()
        };
        let image = CapturedImage::new(vec![0xFF, 0xD8, 0xFF, 0xD9], stats);
        assert_eq!(image.advertised_size, 300);
    }
}
