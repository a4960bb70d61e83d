//! Type definitions for linkcam

pub mod error;
pub mod image;
pub mod settings;
pub mod transfer;

pub use error::{Error, Result};
pub use image::CapturedImage;
pub use settings::{BaudRate, CompressionRatio, Resolution};
pub use transfer::{TransferProgress, TransferStats};
