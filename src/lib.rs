//! qrstamp - timestamped QR code images from a URL or text
//!
//! This library encodes a single string into a QR symbol, rasterizes it to
//! PNG, and writes it as `QRCode_<YYYYMMDDHHMMSS>.png` into an output
//! directory. It is the engine behind the `qrstamp` binary, which is meant to
//! run inside a container with its settings injected through `QR_*`
//! environment variables.
//!
//! # Features
//!
//! - **Layered configuration**: defaults, TOML/YAML file, environment, flags
//! - **Styled output**: module scale, quiet zone width, fill/back colors
//! - **Collision-safe names**: same-second runs get `_1`, `_2`, ... suffixes
//! - **Self-verification**: decode the written file and compare (`verify` feature)
//!
//! # Example
//!
//! ```no_run
//! use qrstamp::{QrEncoder, QrGenerator};
//! use std::path::Path;
//!
//! fn main() -> anyhow::Result<()> {
//!     let generator = QrGenerator::new(QrEncoder::new()).require_url(true);
//!     let path = generator.generate("https://example.com/repo", Path::new("qr_codes"))?;
//!
//!     println!("Wrote {}", path.display());
//!     Ok(())
//! }
//! ```

#![warn(missing_docs, rust_2024_compatibility)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod config;
pub mod error;
pub mod generator;
pub mod logging;
pub mod output;
pub mod qr;

// Re-exports for convenience
pub use error::{Error, Result};

pub use config::{LogRotation, LoggingOptions, OutputOptions, QrOptions, QrstampConfig};
pub use generator::{GenerationReport, QrGenerator, file_name_for, is_valid_url};
#[cfg(feature = "verify")]
#[cfg_attr(docsrs, doc(cfg(feature = "verify")))]
pub use qr::QrDecoder;
pub use qr::{Color, EncodedQr, QrEncoder, QrPayload};
