//! Timestamped QR image generation
//!
//! One call encodes one string, renders it, and writes exactly one PNG named
//! `QRCode_<YYYYMMDDHHMMSS>.png` into the output directory. Everything that
//! can fail on the input side happens before the filesystem is touched.

use crate::config::QrstampConfig;
use crate::error::{Error, Result};
use crate::qr::{ECC_LEVEL, QrEncoder, QrPayload, to_png};
use chrono::{Local, NaiveDateTime};
use serde::Serialize;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Prefix shared by every generated file name
pub const FILE_PREFIX: &str = "QRCode_";

/// `chrono` format string for the timestamp embedded in file names
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d%H%M%S";

/// Upper bound on `_N` suffixes tried when same-second names collide
const MAX_COLLISION_SUFFIX: u32 = 1000;

/// Summary of a successful generation
#[derive(Debug, Clone, Serialize)]
pub struct GenerationReport {
    /// Full path of the written PNG
    pub path: PathBuf,
    /// Encoded content
    pub content: String,
    /// Symbol version chosen by the encoder
    pub version: i16,
    /// Modules per side, excluding the quiet zone
    pub modules: usize,
    /// Image width in pixels
    pub width: u32,
    /// Image height in pixels
    pub height: u32,
    /// Size of the written file in bytes
    pub file_size: usize,
    /// Error correction level label
    pub ecc_level: String,
    /// Local time used for the file name
    pub generated_at: NaiveDateTime,
    /// Whether the written file was decoded and matched the content
    pub verified: bool,
}

/// Turns one input string into one PNG file on disk
#[derive(Debug, Clone)]
pub struct QrGenerator {
    encoder: QrEncoder,
    require_url: bool,
    verify: bool,
}

impl QrGenerator {
    /// Create a generator around an encoder, with URL checks and verification off
    pub fn new(encoder: QrEncoder) -> Self {
        Self {
            encoder,
            require_url: false,
            verify: false,
        }
    }

    /// Build a generator from resolved configuration
    pub fn from_config(config: &QrstampConfig) -> Result<Self> {
        if config.output.verify && !cfg!(feature = "verify") {
            return Err(Error::Config(
                "verification requested but qrstamp was built without the `verify` feature"
                    .to_string(),
            ));
        }

        let encoder = QrEncoder::from_options(&config.qr)?;
        Ok(Self::new(encoder)
            .require_url(config.qr.require_url)
            .verify(config.output.verify))
    }

    /// Only accept absolute http(s) URLs as input
    pub fn require_url(mut self, enabled: bool) -> Self {
        self.require_url = enabled;
        self
    }

    /// Decode each written file and compare it against the input
    pub fn verify(mut self, enabled: bool) -> Self {
        self.verify = enabled;
        self
    }

    /// Generate a QR image for `input` in `output_dir`, stamped with the current local time.
    pub fn generate(&self, input: &str, output_dir: &Path) -> Result<PathBuf> {
        self.generate_at(input, output_dir, Local::now().naive_local())
    }

    /// Generate a QR image for `input` in `output_dir`, stamped with `timestamp`.
    pub fn generate_at(
        &self,
        input: &str,
        output_dir: &Path,
        timestamp: NaiveDateTime,
    ) -> Result<PathBuf> {
        self.generate_report(input, output_dir, timestamp)
            .map(|report| report.path)
    }

    /// Generate and return a full [`GenerationReport`].
    pub fn generate_report(
        &self,
        input: &str,
        output_dir: &Path,
        timestamp: NaiveDateTime,
    ) -> Result<GenerationReport> {
        let result = self.run(input, output_dir, timestamp);
        if let Err(ref err) = result {
            tracing::error!(
                output_dir = %output_dir.display(),
                "An error occurred while generating QR code: {err}"
            );
        }
        result
    }

    fn run(
        &self,
        input: &str,
        output_dir: &Path,
        timestamp: NaiveDateTime,
    ) -> Result<GenerationReport> {
        if self.require_url && !is_valid_url(input) {
            return Err(Error::InvalidUrl(input.to_string()));
        }

        let payload = QrPayload::from_string(input.to_string());
        let encoded = self.encoder.encode(&payload)?;
        let png = to_png(&encoded.image)?;

        create_directory(output_dir)?;
        let path = write_new_file(output_dir, &file_stem_for(&timestamp), &png)?;

        let verified = if self.verify {
            self.verify_written(&path, input)?;
            true
        } else {
            false
        };

        tracing::info!(
            version = encoded.version,
            bytes = png.len(),
            verified,
            "QR code successfully saved to {}",
            path.display()
        );

        Ok(GenerationReport {
            path,
            content: input.to_string(),
            version: encoded.version,
            modules: encoded.modules,
            width: encoded.image.width(),
            height: encoded.image.height(),
            file_size: png.len(),
            ecc_level: format!("{:?}", ECC_LEVEL),
            generated_at: timestamp,
            verified,
        })
    }

    #[cfg(feature = "verify")]
    fn verify_written(&self, path: &Path, expected: &str) -> Result<()> {
        let decoded = crate::qr::QrDecoder::new().decode_file(path)?;
        let found = decoded
            .as_str()
            .map(str::to_string)
            .unwrap_or_else(|| String::from_utf8_lossy(decoded.as_bytes()).into_owned());

        if found != expected {
            return Err(Error::Verification {
                path: path.to_path_buf(),
                expected: expected.to_string(),
                found,
            });
        }

        tracing::debug!(path = %path.display(), "Verified written QR code");
        Ok(())
    }

    #[cfg(not(feature = "verify"))]
    fn verify_written(&self, _path: &Path, _expected: &str) -> Result<()> {
        Err(Error::Config(
            "qrstamp was built without the `verify` feature".to_string(),
        ))
    }
}

/// Whether `candidate` is an absolute http(s) URL with a host.
pub fn is_valid_url(candidate: &str) -> bool {
    let valid = match url::Url::parse(candidate) {
        Ok(parsed) => {
            matches!(parsed.scheme(), "http" | "https")
                && parsed.host_str().is_some_and(|host| !host.is_empty())
        }
        Err(_) => false,
    };

    if !valid {
        tracing::error!("Invalid URL provided: {candidate:?}");
    }
    valid
}

/// Base file name (without collision suffix) for a generation timestamp.
pub fn file_name_for(timestamp: &NaiveDateTime) -> String {
    format!("{}.png", file_stem_for(timestamp))
}

fn file_stem_for(timestamp: &NaiveDateTime) -> String {
    format!("{FILE_PREFIX}{}", timestamp.format(TIMESTAMP_FORMAT))
}

/// Create `path` and any missing parents; existing directories are fine.
pub fn create_directory(path: &Path) -> Result<()> {
    fs::create_dir_all(path).map_err(|e| {
        tracing::error!("Failed to create directory {}: {e}", path.display());
        Error::Io(e)
    })
}

/// Write `bytes` to `<dir>/<stem>.png`, or `<stem>_N.png` if that name is taken.
///
/// Files are opened with create-new semantics, so existing outputs are never
/// overwritten. A failed write removes the partial file.
fn write_new_file(dir: &Path, stem: &str, bytes: &[u8]) -> Result<PathBuf> {
    write_new_file_with(dir, stem, |file| {
        file.write_all(bytes)?;
        file.sync_all()
    })
}

fn write_new_file_with<F>(dir: &Path, stem: &str, write: F) -> Result<PathBuf>
where
    F: FnOnce(&mut File) -> io::Result<()>,
{
    for attempt in 0..MAX_COLLISION_SUFFIX {
        let name = if attempt == 0 {
            format!("{stem}.png")
        } else {
            format!("{stem}_{attempt}.png")
        };
        let path = dir.join(name);

        match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(mut file) => {
                if let Err(e) = write(&mut file) {
                    drop(file);
                    let _ = fs::remove_file(&path);
                    tracing::error!("Failed to write {}: {e}", path.display());
                    return Err(Error::Io(e));
                }
                if attempt > 0 {
                    tracing::debug!(attempt, "Timestamped name was taken, used suffix");
                }
                return Ok(path);
            }
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => continue,
            Err(e) => {
                tracing::error!("Failed to create {}: {e}", path.display());
                return Err(Error::Io(e));
            }
        }
    }

    Err(Error::Io(io::Error::new(
        io::ErrorKind::AlreadyExists,
        format!("no free file name for {stem} in {}", dir.display()),
    )))
}
