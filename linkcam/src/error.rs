//! High-level error types

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Core protocol error: {0}")]
    Core(#[from] linkcam_core::Error),

    #[error("Transport error: {0}")]
    Transport(#[from] linkcam_transport::Error),

    #[error("Type error: {0}")]
    Types(#[from] linkcam_types::Error),

    #[error("Camera not open")]
    NotOpen,

    /// The camera switched to `rate` but the host port could not follow
    #[error("Camera now at {rate} baud but host line speed change failed: {source}")]
    LineSpeedDesync {
        rate: u32,
        #[source]
        source: linkcam_transport::Error,
    },

    #[error("Reset banner not terminated after {reads} reads")]
    BannerTerminatorMissing { reads: usize },

    #[error("No end-of-image marker after {chunks} chunks")]
    ChunkLimitExceeded { chunks: usize },

    #[error("Operation not supported: {0}")]
    NotSupported(String),

    #[error("Failed to write image data: {0}")]
    Sink(#[source] std::io::Error),
}

/// Failure classes callers can base retry policy on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A read did not complete in time; device state unknown
    Timeout,

    /// A reply did not match the expected bytes
    ProtocolMismatch,

    /// The port or the output sink failed
    Io,

    /// The request was rejected before reaching the device
    UnsupportedParameter,

    /// A transfer safety bound stopped a read that never terminated
    SafetyBound,
}

impl Error {
    /// Classify the error
    pub fn kind(&self) -> ErrorKind {
        use linkcam_core::Error as CoreError;

        match self {
            Self::Core(CoreError::AddressSpaceExhausted { .. }) => ErrorKind::SafetyBound,
            Self::Core(_) => ErrorKind::ProtocolMismatch,
            Self::Transport(e) if e.is_timeout() => ErrorKind::Timeout,
            Self::Transport(_) | Self::NotOpen | Self::Sink(_) => ErrorKind::Io,
            Self::LineSpeedDesync { .. } => ErrorKind::Io,
            Self::Types(_) | Self::NotSupported(_) => ErrorKind::UnsupportedParameter,
            Self::BannerTerminatorMissing { .. } => ErrorKind::Timeout,
            Self::ChunkLimitExceeded { .. } => ErrorKind::SafetyBound,
        }
    }

    /// Check if the error is a read timeout
    pub fn is_timeout(&self) -> bool {
        self.kind() == ErrorKind::Timeout
    }

    /// Check if the camera should be reset before further commands
    pub fn requires_reset(&self) -> bool {
        matches!(self, Self::LineSpeedDesync { .. })
            || matches!(
                self.kind(),
                ErrorKind::Timeout | ErrorKind::ProtocolMismatch | ErrorKind::SafetyBound
            )
    }
}
