//! Module colors accepted in configuration

use image::Rgb;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// An opaque RGB color used for dark modules or the background.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color([u8; 3]);

const NAMED: &[(&str, [u8; 3])] = &[
    ("black", [0, 0, 0]),
    ("white", [255, 255, 255]),
    ("red", [255, 0, 0]),
    ("green", [0, 128, 0]),
    ("blue", [0, 0, 255]),
    ("yellow", [255, 255, 0]),
    ("cyan", [0, 255, 255]),
    ("magenta", [255, 0, 255]),
    ("gray", [128, 128, 128]),
    ("grey", [128, 128, 128]),
    ("orange", [255, 165, 0]),
    ("purple", [128, 0, 128]),
    ("navy", [0, 0, 128]),
];

impl Color {
    /// Pure black
    pub const BLACK: Color = Color([0, 0, 0]);
    /// Pure white
    pub const WHITE: Color = Color([255, 255, 255]);

    /// Build a color from its red, green and blue channels.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self([r, g, b])
    }

    /// Convert into an `image` pixel.
    pub fn to_pixel(self) -> Rgb<u8> {
        Rgb(self.0)
    }

    fn from_hex(digits: &str) -> Option<Self> {
        if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        match digits.len() {
            6 => {
                let r = u8::from_str_radix(&digits[0..2], 16).ok()?;
                let g = u8::from_str_radix(&digits[2..4], 16).ok()?;
                let b = u8::from_str_radix(&digits[4..6], 16).ok()?;
                Some(Self([r, g, b]))
            }
            3 => {
                let mut out = [0u8; 3];
                for (slot, ch) in out.iter_mut().zip(digits.chars()) {
                    let nibble = ch.to_digit(16)? as u8;
                    *slot = nibble * 17;
                }
                Some(Self(out))
            }
            _ => None,
        }
    }
}

impl FromStr for Color {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        if let Some(hex) = trimmed.strip_prefix('#') {
            return Self::from_hex(hex)
                .ok_or_else(|| format!("Invalid hex color '{value}', expected #RRGGBB or #RGB"));
        }

        let lower = trimmed.to_ascii_lowercase();
        NAMED
            .iter()
            .find(|(name, _)| *name == lower)
            .map(|(_, rgb)| Self(*rgb))
            .ok_or_else(|| format!("Unknown color '{value}'. Use a color name or #RRGGBB"))
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [r, g, b] = self.0;
        write!(f, "#{r:02x}{g:02x}{b:02x}")
    }
}

impl TryFrom<String> for Color {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_named_colors() {
        assert_eq!("black".parse::<Color>().unwrap(), Color::BLACK);
        assert_eq!("Blue".parse::<Color>().unwrap(), Color::rgb(0, 0, 255));
        assert_eq!(" grey ".parse::<Color>().unwrap(), Color::rgb(128, 128, 128));
    }

    #[test]
    fn test_hex_colors() {
        assert_eq!("#FFFF00".parse::<Color>().unwrap(), Color::rgb(255, 255, 0));
        assert_eq!("#0a0B0c".parse::<Color>().unwrap(), Color::rgb(10, 11, 12));
        assert_eq!("#f80".parse::<Color>().unwrap(), Color::rgb(255, 136, 0));
    }

    #[test]
    fn test_invalid_colors() {
        assert!("#12345".parse::<Color>().is_err());
        assert!("#gggggg".parse::<Color>().is_err());
        assert!("#+1+1+1".parse::<Color>().is_err());
        assert!("ultraviolet".parse::<Color>().is_err());
    }

    #[test]
    fn test_display_is_hex() {
        assert_eq!(Color::rgb(255, 165, 0).to_string(), "#ffa500");
    }
}
