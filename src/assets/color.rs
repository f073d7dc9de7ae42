use std::{fmt, str::FromStr};

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::foundation::error::{TypebannerError, TypebannerResult};

/// Opaque sRGB accent color used for the text, cursor, markers and banner border.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AccentColor {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl AccentColor {
    /// Build a color from its channels.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Terminal green, the default accent.
    pub const MATRIX_GREEN: AccentColor = AccentColor::rgb(0x00, 0xFF, 0x41);
    /// Bright azure.
    pub const AZURE: AccentColor = AccentColor::rgb(0x00, 0x9D, 0xFF);
    /// Crimson.
    pub const CRIMSON: AccentColor = AccentColor::rgb(0xFF, 0x00, 0x4C);
    /// Plain white.
    pub const WHITE: AccentColor = AccentColor::rgb(0xFF, 0xFF, 0xFF);
    /// Amber.
    pub const AMBER: AccentColor = AccentColor::rgb(0xFF, 0xA2, 0x00);

    /// Parse `#RRGGBB` (the leading `#` is optional, case-insensitive).
    pub fn from_hex(s: &str) -> TypebannerResult<Self> {
        let s = s.trim();
        let s = s.strip_prefix('#').unwrap_or(s);
        if s.len() != 6 || !s.is_ascii() {
            return Err(TypebannerError::validation(format!(
                "accent color must be #RRGGBB, got \"{s}\""
            )));
        }

        fn hex_byte(pair: &str) -> TypebannerResult<u8> {
            u8::from_str_radix(pair, 16)
                .map_err(|_| TypebannerError::validation(format!("invalid hex byte \"{pair}\"")))
        }

        Ok(Self::rgb(
            hex_byte(&s[0..2])?,
            hex_byte(&s[2..4])?,
            hex_byte(&s[4..6])?,
        ))
    }

    /// Uppercase `#RRGGBB` form.
    pub fn to_hex(self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }

    /// RGB channels as an array.
    pub fn to_array(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }

    /// Packed `0xRRGGBB` value, the form chat embeds expect.
    pub fn to_u32(self) -> u32 {
        (u32::from(self.r) << 16) | (u32::from(self.g) << 8) | u32::from(self.b)
    }
}

impl Default for AccentColor {
    fn default() -> Self {
        Self::MATRIX_GREEN
    }
}

impl fmt::Display for AccentColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for AccentColor {
    type Err = TypebannerError;

    /// Accepts a palette name (`green`, `azure`, `crimson`, `white`, `amber`) or a hex string.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some((_, color)) = ACCENT_PALETTE
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(s.trim()))
        {
            return Ok(*color);
        }
        Self::from_hex(s)
    }
}

impl TryFrom<String> for AccentColor {
    type Error = TypebannerError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<AccentColor> for String {
    fn from(value: AccentColor) -> Self {
        value.to_hex()
    }
}

/// The five accent colors a welcome greeting is drawn from.
pub const ACCENT_PALETTE: [(&str, AccentColor); 5] = [
    ("green", AccentColor::MATRIX_GREEN),
    ("azure", AccentColor::AZURE),
    ("crimson", AccentColor::CRIMSON),
    ("white", AccentColor::WHITE),
    ("amber", AccentColor::AMBER),
];

/// Pick a palette color uniformly at random from `rng`.
pub fn pick_accent<R: Rng + ?Sized>(rng: &mut R) -> AccentColor {
    ACCENT_PALETTE[rng.gen_range(0..ACCENT_PALETTE.len())].1
}

#[cfg(test)]
#[path = "../../tests/unit/assets/color.rs"]
mod tests;
