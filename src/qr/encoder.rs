//! QR code encoder

use crate::config::QrOptions;
use crate::error::{Error, Result};
use crate::qr::{Color, QrPayload};
use image::{ImageFormat, Rgb, RgbImage};
use qrcode::{EcLevel, QrCode, Version};
use std::io::Cursor;

/// Error correction level used for every generated symbol
pub const ECC_LEVEL: EcLevel = EcLevel::M;

/// Largest image side, in pixels, the encoder will produce
pub const MAX_IMAGE_SIDE: u32 = 16_384;

/// Modules per side of the largest (version 40) symbol
const MAX_MODULES: u32 = 177;

/// A rendered QR symbol together with the metadata the encoder picked
#[derive(Debug, Clone)]
pub struct EncodedQr {
    /// Rasterized symbol including the quiet zone
    pub image: RgbImage,
    /// Symbol version (1-40) chosen for the data
    pub version: i16,
    /// Modules per side, excluding the quiet zone
    pub modules: usize,
}

/// QR code encoder
#[derive(Debug, Clone)]
pub struct QrEncoder {
    /// Pixels per module side
    scale: u32,
    /// Quiet zone width in modules
    border: u32,
    fill: Color,
    back: Color,
}

impl QrEncoder {
    /// Create a new QR encoder with default settings (10px modules, 4-module border, black on white)
    pub fn new() -> Self {
        Self {
            scale: 10,
            border: 4,
            fill: Color::BLACK,
            back: Color::WHITE,
        }
    }

    /// Create an encoder from configured rendering options
    pub fn from_options(options: &QrOptions) -> Result<Self> {
        let (fill, back) = options.palette()?;
        Self::new()
            .with_colors(fill, back)
            .with_geometry(options.scale, options.border)
    }

    /// Override the module colors
    pub fn with_colors(mut self, fill: Color, back: Color) -> Self {
        self.fill = fill;
        self.back = back;
        self
    }

    /// Override pixels per module and quiet zone width.
    ///
    /// Fails when a version 40 symbol drawn with this geometry would be wider
    /// than [`MAX_IMAGE_SIDE`].
    pub fn with_geometry(mut self, scale: u32, border: u32) -> Result<Self> {
        let scale = scale.max(1);
        match image_side(MAX_MODULES, scale, border) {
            Some(side) if side <= MAX_IMAGE_SIDE => {}
            _ => {
                return Err(Error::Config(format!(
                    "scale {scale} with a {border}-module border exceeds the \
                     {MAX_IMAGE_SIDE}px image limit"
                )));
            }
        }
        self.scale = scale;
        self.border = border;
        Ok(self)
    }

    /// Encode data into a QR code image
    pub fn encode(&self, payload: &QrPayload) -> Result<EncodedQr> {
        if payload.data.is_empty() {
            return Err(Error::Encoding("input is empty".to_string()));
        }

        let code = QrCode::with_error_correction_level(&payload.data, ECC_LEVEL)?;
        let version = match code.version() {
            Version::Normal(v) | Version::Micro(v) => v,
        };
        let modules = code.width();

        let side = u32::try_from(modules)
            .ok()
            .and_then(|m| image_side(m, self.scale, self.border));
        if side.is_none_or(|side| side > MAX_IMAGE_SIDE) {
            return Err(Error::Image(format!(
                "{modules}-module symbol exceeds the {MAX_IMAGE_SIDE}px image limit"
            )));
        }

        let symbol = code
            .render::<Rgb<u8>>()
            .dark_color(self.fill.to_pixel())
            .light_color(self.back.to_pixel())
            .quiet_zone(false)
            .module_dimensions(self.scale, self.scale)
            .build();

        let image = self.with_quiet_zone(&symbol);

        tracing::debug!(
            version,
            modules,
            width = image.width(),
            height = image.height(),
            bytes = payload.data.len(),
            "Encoded QR symbol"
        );

        Ok(EncodedQr {
            image,
            version,
            modules,
        })
    }

    /// Encode a string into a QR code image
    pub fn encode_string(&self, data: &str) -> Result<EncodedQr> {
        let payload = QrPayload::from_string(data.to_string());
        self.encode(&payload)
    }

    /// Encode bytes into a QR code image
    pub fn encode_bytes(&self, data: &[u8]) -> Result<EncodedQr> {
        let payload = QrPayload::from_bytes(data.to_vec());
        self.encode(&payload)
    }

    fn with_quiet_zone(&self, symbol: &RgbImage) -> RgbImage {
        // Bounded by `with_geometry` and the per-symbol check in `encode`.
        let pad = self.border * self.scale;
        let width = symbol.width() + 2 * pad;
        let height = symbol.height() + 2 * pad;

        let mut canvas = RgbImage::from_pixel(width, height, self.back.to_pixel());
        image::imageops::replace(&mut canvas, symbol, i64::from(pad), i64::from(pad));
        canvas
    }
}

/// Side length in pixels of a `modules`-wide symbol plus its quiet zone.
fn image_side(modules: u32, scale: u32, border: u32) -> Option<u32> {
    border
        .checked_mul(2)
        .and_then(|b| b.checked_add(modules))
        .and_then(|m| m.checked_mul(scale))
}

impl Default for QrEncoder {
    fn default() -> Self {
        Self::new()
    }
}

/// Serialize an image as PNG bytes
pub fn to_png(image: &RgbImage) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    image.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_string() {
        let encoder = QrEncoder::new();
        let encoded = encoder.encode_string("https://example.com/repo").unwrap();

        assert_eq!(encoded.version, 2);
        assert_eq!(encoded.modules, 25);
        // 25 modules + 2 * 4 border, 10px each
        assert_eq!(encoded.image.width(), 330);
        assert_eq!(encoded.image.height(), 330);
    }

    #[test]
    fn test_encode_bytes() {
        let encoder = QrEncoder::new();
        assert!(encoder.encode_bytes(b"Binary data").is_ok());
    }

    #[test]
    fn test_empty_input_rejected() {
        let encoder = QrEncoder::new();
        assert!(matches!(
            encoder.encode_string(""),
            Err(Error::Encoding(_))
        ));
    }

    #[test]
    fn test_over_capacity_rejected() {
        let encoder = QrEncoder::new();
        let oversized = "x".repeat(4000);
        assert!(matches!(
            encoder.encode_string(&oversized),
            Err(Error::Encoding(_))
        ));
    }

    #[test]
    fn test_quiet_zone_uses_back_color() {
        let yellow = Color::rgb(255, 255, 0);
        let encoder = QrEncoder::new()
            .with_colors(Color::rgb(0, 0, 255), yellow)
            .with_geometry(2, 3)
            .unwrap();
        let encoded = encoder.encode_string("hi").unwrap();

        assert_eq!(encoded.image.width() as usize, (encoded.modules + 6) * 2);
        assert_eq!(*encoded.image.get_pixel(0, 0), yellow.to_pixel());
        // Top-left finder pattern starts right after the border
        assert_eq!(*encoded.image.get_pixel(6, 6), Rgb([0, 0, 255]));
    }

    #[test]
    fn test_zero_border() {
        let encoder = QrEncoder::new().with_geometry(1, 0).unwrap();
        let encoded = encoder.encode_string("hi").unwrap();
        assert_eq!(encoded.image.width() as usize, encoded.modules);
        assert_eq!(*encoded.image.get_pixel(0, 0), Color::BLACK.to_pixel());
    }

    #[test]
    fn test_oversized_geometry_rejected() {
        assert!(matches!(
            QrEncoder::new().with_geometry(1, 2_000_000_000),
            Err(Error::Config(_))
        ));
        assert!(matches!(
            QrEncoder::new().with_geometry(400_000_000, 4),
            Err(Error::Config(_))
        ));
        assert!(matches!(
            QrEncoder::new().with_geometry(1000, 4),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_geometry_at_limit_accepted() {
        // (177 + 2 * 4) * 88 = 16280
        assert!(QrEncoder::new().with_geometry(88, 4).is_ok());
        assert!(QrEncoder::new().with_geometry(89, 4).is_err());
    }

    #[test]
    fn test_from_options_rejects_huge_scale() {
        let options = QrOptions {
            scale: 400_000_000,
            ..QrOptions::default()
        };
        assert!(matches!(
            QrEncoder::from_options(&options),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_to_png_signature() {
        let encoded = QrEncoder::new().encode_string("png").unwrap();
        let bytes = to_png(&encoded.image).unwrap();
        assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
    }

    #[cfg(feature = "verify")]
    #[test]
    fn test_round_trip() {
        use crate::qr::QrDecoder;

        let encoder = QrEncoder::new();
        let decoder = QrDecoder::new();

        let original = "Test payload for round trip";
        let encoded = encoder.encode_string(original).unwrap();
        let decoded = decoder
            .decode(&image::DynamicImage::ImageRgb8(encoded.image))
            .unwrap();

        assert_eq!(decoded.as_str(), Some(original));
    }
}
