use serde::{Deserialize, Serialize};

use crate::foundation::error::{GrafelError, GrafelResult};

/// Opaque RGB color with 8 bits per channel.
///
/// Colors are plain values: actions replace an actor's color wholesale and never mutate a shared
/// instance in place.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Color {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

const NAMED: &[(&str, [u8; 3])] = &[
    ("white", [255, 255, 255]),
    ("red", [255, 0, 0]),
    ("green", [0, 255, 0]),
    ("blue", [0, 0, 255]),
    ("black", [0, 0, 0]),
    ("yellow", [255, 255, 0]),
    ("fuchsia", [255, 0, 255]),
    ("aliceblue", [240, 248, 255]),
    ("brown4", [139, 35, 35]),
    ("cadetblue", [95, 158, 160]),
    ("khaki", [240, 230, 140]),
    ("maroon", [128, 0, 0]),
    ("gold", [255, 215, 0]),
    ("silver", [192, 192, 192]),
    ("dimgray", [105, 105, 105]),
    ("ghostgray", [248, 248, 255]),
    ("gray", [128, 128, 128]),
    ("purple", [128, 0, 128]),
    ("orange", [255, 165, 0]),
    ("navy", [0, 0, 128]),
    ("coral", [255, 127, 80]),
    ("palegreen", [152, 251, 152]),
];

impl Color {
    /// Pure black.
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    /// Pure white.
    pub const WHITE: Self = Self::rgb(255, 255, 255);
    /// Default actor color.
    pub const SILVER: Self = Self::rgb(192, 192, 192);
    /// Border color used by dice faces.
    pub const GHOSTGRAY: Self = Self::rgb(248, 248, 255);
    /// Dot color used by dice faces.
    pub const DIMGRAY: Self = Self::rgb(105, 105, 105);

    /// Build a color from its channels.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse a color name from the built-in table or a `#rrggbb` code.
    pub fn parse(s: &str) -> GrafelResult<Self> {
        let s = s.trim();
        if let Some(hex) = s.strip_prefix('#') {
            return parse_hex(hex).map_err(GrafelError::validation);
        }
        Self::named(s)
            .ok_or_else(|| GrafelError::validation(format!("unknown color name '{s}'")))
    }

    /// Look up a name in the built-in table (case-insensitive).
    pub fn named(name: &str) -> Option<Self> {
        NAMED
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, [r, g, b])| Self::rgb(*r, *g, *b))
    }

    /// Names accepted by [`Color::named`].
    pub fn names() -> impl Iterator<Item = &'static str> {
        NAMED.iter().map(|(n, _)| *n)
    }

    /// Channel-wise inverse (`255 - c`).
    pub fn inverse(self) -> Self {
        Self::rgb(255 - self.r, 255 - self.g, 255 - self.b)
    }

    /// Lowercase `#rrggbb` representation.
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Channels as an array.
    pub fn as_rgb(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }

    /// Per-channel linear interpolation. The channel delta is rounded (half away from zero)
    /// before it is added to the source channel.
    pub fn lerp(self, to: Self, t: f64) -> Self {
        fn lerp_u8(a: u8, b: u8, t: f64) -> u8 {
            let a = f64::from(a);
            let b = f64::from(b);
            (a + ((b - a) * t).round()).clamp(0.0, 255.0) as u8
        }

        Self::rgb(
            lerp_u8(self.r, to.r, t),
            lerp_u8(self.g, to.g, t),
            lerp_u8(self.b, to.b, t),
        )
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::SILVER
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl std::str::FromStr for Color {
    type Err = GrafelError;

    fn from_str(s: &str) -> GrafelResult<Self> {
        Self::parse(s)
    }
}

fn parse_hex(s: &str) -> Result<Color, String> {
    fn hex_byte(pair: &str) -> Result<u8, String> {
        u8::from_str_radix(pair, 16).map_err(|_| format!("invalid hex byte \"{pair}\""))
    }

    if s.len() != 6 || !s.is_ascii() {
        return Err(format!(
            "hex color must be #RRGGBB (case-insensitive), got \"#{s}\""
        ));
    }
    Ok(Color::rgb(
        hex_byte(&s[0..2])?,
        hex_byte(&s[2..4])?,
        hex_byte(&s[4..6])?,
    ))
}

impl Serialize for Color {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Text(String),
            Arr([u8; 3]),
        }

        match Repr::deserialize(deserializer)? {
            Repr::Text(s) => Color::parse(&s).map_err(serde::de::Error::custom),
            Repr::Arr([r, g, b]) => Ok(Color::rgb(r, g, b)),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/color.rs"]
mod tests;
