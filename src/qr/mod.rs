//! QR code encoding, with optional decoding for self-verification
//!
//! Symbol construction is delegated to `qrcode`; this module adds the
//! rasterization details (module scale, quiet zone, colors) and PNG output.

mod color;
#[cfg(feature = "verify")]
mod decoder;
mod encoder;

pub use color::Color;
#[cfg(feature = "verify")]
pub use decoder::QrDecoder;
pub use encoder::{ECC_LEVEL, EncodedQr, QrEncoder, to_png};

use serde::{Deserialize, Serialize};

/// Data to encode into, or decoded from, a QR symbol
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QrPayload {
    /// The raw data
    pub data: Vec<u8>,
    /// String representation if valid UTF-8
    pub text: Option<String>,
}

impl QrPayload {
    /// Create a new QR payload from raw bytes
    pub fn from_bytes(data: Vec<u8>) -> Self {
        let text = String::from_utf8(data.clone()).ok();
        Self { data, text }
    }

    /// Create a new QR payload from a string
    pub fn from_string(s: String) -> Self {
        Self {
            data: s.as_bytes().to_vec(),
            text: Some(s),
        }
    }

    /// Get the payload as a string, if valid UTF-8
    pub fn as_str(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// Get the raw bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }
}
