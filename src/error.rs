//! Error types for qrstamp operations

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using qrstamp's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for qrstamp operations
#[derive(Error, Debug)]
pub enum Error {
    /// Input cannot be represented as a QR symbol (empty, too long, unsupported)
    #[error("Failed to encode QR code: {0}")]
    Encoding(String),

    /// Input was required to be an http(s) URL and is not one
    #[error("Invalid URL provided: {0}")]
    InvalidUrl(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Image processing error
    #[error("Image processing error: {0}")]
    Image(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Report could not be serialized for output
    #[error("Failed to serialize output: {0}")]
    Serialization(String),

    /// QR code decoding failed
    #[error("Failed to decode QR code: {0}")]
    Decode(String),

    /// No QR code found in image
    #[error("No QR code found in image")]
    NoQrCodeFound,

    /// The written file does not decode back to the input
    #[error("Verification failed for {}: expected {expected:?}, decoded {found:?}", .path.display())]
    Verification {
        /// File that was written
        path: PathBuf,
        /// Content that was encoded
        expected: String,
        /// Content read back from the file
        found: String,
    },
}

impl Error {
    /// Process exit code reported by the `qrstamp` binary for this error.
    pub fn exit_code(&self) -> u8 {
        match self {
            Error::Config(_) => 1,
            Error::Encoding(_) | Error::InvalidUrl(_) => 2,
            Error::Io(_) | Error::Image(_) => 3,
            Error::Decode(_) | Error::NoQrCodeFound | Error::Verification { .. } => 4,
            Error::Serialization(_) => 5,
        }
    }

    /// Whether this error originates from the input string rather than the environment.
    pub fn is_encoding(&self) -> bool {
        matches!(self, Error::Encoding(_) | Error::InvalidUrl(_))
    }
}

impl From<image::ImageError> for Error {
    fn from(e: image::ImageError) -> Self {
        match e {
            image::ImageError::IoError(io) => Error::Io(io),
            other => Error::Image(other.to_string()),
        }
    }
}

impl From<qrcode::types::QrError> for Error {
    fn from(e: qrcode::types::QrError) -> Self {
        Error::Encoding(e.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}
