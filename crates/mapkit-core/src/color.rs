//! Color parsing for feature styling
//!
//! Accepts `#RGB`, `#RRGGBB` and `#AARRGGBB` hex strings as well as a small
//! set of named colors.

use regex::Regex;
use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;
use thiserror::Error;

static HEX_COLOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^#(?:[0-9A-Fa-f]{3}|[0-9A-Fa-f]{6}|[0-9A-Fa-f]{8})$")
        .expect("hex color pattern is valid")
});

const NAMED_COLORS: &[(&str, Color)] = &[
    ("black", Color::rgb(0x00, 0x00, 0x00)),
    ("white", Color::rgb(0xFF, 0xFF, 0xFF)),
    ("red", Color::rgb(0xFF, 0x00, 0x00)),
    ("green", Color::rgb(0x00, 0xFF, 0x00)),
    ("blue", Color::rgb(0x00, 0x00, 0xFF)),
    ("yellow", Color::rgb(0xFF, 0xFF, 0x00)),
    ("cyan", Color::rgb(0x00, 0xFF, 0xFF)),
    ("magenta", Color::rgb(0xFF, 0x00, 0xFF)),
    ("gray", Color::rgb(0x88, 0x88, 0x88)),
    ("grey", Color::rgb(0x88, 0x88, 0x88)),
    ("lightgray", Color::rgb(0xCC, 0xCC, 0xCC)),
    ("lightgrey", Color::rgb(0xCC, 0xCC, 0xCC)),
    ("darkgray", Color::rgb(0x44, 0x44, 0x44)),
    ("darkgrey", Color::rgb(0x44, 0x44, 0x44)),
    ("aqua", Color::rgb(0x00, 0xFF, 0xFF)),
    ("fuchsia", Color::rgb(0xFF, 0x00, 0xFF)),
    ("lime", Color::rgb(0x00, 0xFF, 0x00)),
    ("maroon", Color::rgb(0x80, 0x00, 0x00)),
    ("navy", Color::rgb(0x00, 0x00, 0x80)),
    ("olive", Color::rgb(0x80, 0x80, 0x00)),
    ("orange", Color::rgb(0xFF, 0xA5, 0x00)),
    ("purple", Color::rgb(0x80, 0x00, 0x80)),
    ("silver", Color::rgb(0xC0, 0xC0, 0xC0)),
    ("teal", Color::rgb(0x00, 0x80, 0x80)),
];

/// A color string could not be parsed
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unrecognized color: {0}")]
pub struct ParseColorError(pub String);

/// An sRGB color with alpha
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    /// Opaque color from red, green and blue components
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 0xFF }
    }

    /// Color from all four components
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Parse a hex or named color
    pub fn parse(input: &str) -> Result<Self, ParseColorError> {
        let trimmed = input.trim();
        if HEX_COLOR.is_match(trimmed) {
            return Ok(Self::from_hex_digits(&trimmed[1..]));
        }

        NAMED_COLORS
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(trimmed))
            .map(|(_, color)| *color)
            .ok_or_else(|| ParseColorError(input.to_string()))
    }

    /// Hex form: `#RRGGBB` for opaque colors, `#AARRGGBB` otherwise
    pub fn to_hex(&self) -> String {
        if self.a == 0xFF {
            format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
        } else {
            format!("#{:02X}{:02X}{:02X}{:02X}", self.a, self.r, self.g, self.b)
        }
    }

    // Digits have already been validated by HEX_COLOR.
    fn from_hex_digits(digits: &str) -> Self {
        let byte = |s: &str| u8::from_str_radix(s, 16).unwrap_or(0);
        match digits.len() {
            3 => {
                let expand = |i: usize| byte(&digits[i..=i]) * 0x11;
                Self::rgb(expand(0), expand(1), expand(2))
            }
            6 => Self::rgb(byte(&digits[0..2]), byte(&digits[2..4]), byte(&digits[4..6])),
            _ => Self::rgba(
                byte(&digits[2..4]),
                byte(&digits[4..6]),
                byte(&digits[6..8]),
                byte(&digits[0..2]),
            ),
        }
    }
}

impl FromStr for Color {
    type Err = ParseColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
