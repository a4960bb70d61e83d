//! # linkcam-core
//!
//! Core protocol implementation for LinkSprite-style serial JPEG cameras.
//!
//! This crate provides the low-level protocol primitives:
//! - Command catalog (exact byte encodings)
//! - Reply verification
//! - Chunk cursor with end-of-image detection
//! - Protocol constants
//!
//! Nothing in here performs I/O.

pub mod command;
pub mod constants;
pub mod cursor;
pub mod error;
pub mod reply;

pub use command::{Command, CompressionTemplate};
pub use cursor::{ChunkScan, ImageCursor};
pub use error::{Error, Result};
pub use reply::{ExpectedReply, Reply};
