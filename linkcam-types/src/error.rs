pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Unsupported baud rate: {0} (supported: 9600, 19200, 38400, 57600, 115200)")]
    UnsupportedBaudRate(u32),

    #[error("Unsupported resolution: {0} (supported: 160x120, 320x240, 640x480)")]
    UnsupportedResolution(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Validation error: {0}")]
    Validation(String),
}
