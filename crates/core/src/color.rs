// Color model: hex <-> RGB <-> HSB
//
// Color is the storage form (#rrggbb), Hsb is the editing form used by the
// picker. Conversions round to the nearest 8-bit channel.

use std::fmt;
use std::str::FromStr;

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

/// Three 8-bit channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// Hue in degrees [0, 360), saturation and brightness in percent [0, 100].
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Hsb {
    pub h: f64,
    pub s: f64,
    pub b: f64,
}

impl Hsb {
    pub const fn new(h: f64, s: f64, b: f64) -> Self {
        Self { h, s, b }
    }

    /// Clamp every component into its legal range. Hue 360 wraps to 0.
    pub fn clamped(self) -> Self {
        let h = if self.h.is_finite() { self.h.rem_euclid(360.0) } else { 0.0 };
        Self {
            h,
            s: clamp_percent(self.s),
            b: clamp_percent(self.b),
        }
    }
}

fn clamp_percent(v: f64) -> f64 {
    if v.is_nan() {
        0.0
    } else {
        v.clamp(0.0, 100.0)
    }
}

/// Error returned by the strict color parser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColorError {
    Empty,
    Invalid(String),
}

impl fmt::Display for ColorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColorError::Empty => write!(f, "empty color value"),
            ColorError::Invalid(s) => {
                write!(f, "invalid color '{}': expected #rgb, #rrggbb or rgb(r, g, b)", s)
            }
        }
    }
}

impl std::error::Error for ColorError {}

/// A resolved color, always displayed as lowercase `#rrggbb`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Color(Rgb);

impl Color {
    pub const BLACK: Color = Color(Rgb::new(0, 0, 0));
    pub const WHITE: Color = Color(Rgb::new(255, 255, 255));

    pub const fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        Self(Rgb::new(r, g, b))
    }

    /// Strict parse. Accepts `#rgb`, `#rrggbb` (with or without `#`, any
    /// case) and `rgb(r, g, b)`.
    pub fn parse(input: &str) -> Result<Self, ColorError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(ColorError::Empty);
        }

        if let Some(inner) = trimmed.strip_prefix("rgb(").and_then(|s| s.strip_suffix(')')) {
            let parts: Vec<&str> = inner.split(',').map(str::trim).collect();
            if let [r, g, b] = parts.as_slice() {
                if let (Ok(r), Ok(g), Ok(b)) = (r.parse::<u8>(), g.parse::<u8>(), b.parse::<u8>()) {
                    return Ok(Self::from_rgb(r, g, b));
                }
            }
            return Err(ColorError::Invalid(trimmed.to_string()));
        }

        parse_hex_digits(trimmed)
            .map(Self)
            .ok_or_else(|| ColorError::Invalid(trimmed.to_string()))
    }

    pub fn rgb(&self) -> Rgb {
        self.0
    }

    pub fn hsb(&self) -> Hsb {
        rgb_to_hsb(self.0)
    }

    pub fn from_hsb(hsb: Hsb) -> Self {
        Self(hsb_to_rgb(hsb))
    }

    /// True when all channels are equal (grey, black, white).
    pub fn is_achromatic(&self) -> bool {
        self.0.r == self.0.g && self.0.g == self.0.b
    }

    pub fn to_hex(&self) -> String {
        rgb_to_hex(self.0.r, self.0.g, self.0.b)
    }
}

impl From<Rgb> for Color {
    fn from(rgb: Rgb) -> Self {
        Self(rgb)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.0.r, self.0.g, self.0.b)
    }
}

impl FromStr for Color {
    type Err = ColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Color::parse(s)
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Color::parse(&s).map_err(de::Error::custom)
    }
}

/// Parse 3 or 6 hex digits with an optional leading `#`.
fn parse_hex_digits(input: &str) -> Option<Rgb> {
    let hex = input.strip_prefix('#').unwrap_or(input);
    if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }

    match hex.len() {
        3 => {
            // #RGB -> #RRGGBB
            let r = u8::from_str_radix(&hex[0..1], 16).ok()?;
            let g = u8::from_str_radix(&hex[1..2], 16).ok()?;
            let b = u8::from_str_radix(&hex[2..3], 16).ok()?;
            Some(Rgb::new(r * 17, g * 17, b * 17))
        }
        6 => {
            let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
            let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
            let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
            Some(Rgb::new(r, g, b))
        }
        _ => None,
    }
}

/// Lenient hex decode: malformed input yields black.
pub fn hex_to_rgb(hex: &str) -> Rgb {
    parse_hex_digits(hex).unwrap_or_default()
}

pub fn rgb_to_hex(r: u8, g: u8, b: u8) -> String {
    format!("#{:02x}{:02x}{:02x}", r, g, b)
}

pub fn rgb_to_hsb(rgb: Rgb) -> Hsb {
    let r = rgb.r as f64 / 255.0;
    let g = rgb.g as f64 / 255.0;
    let b = rgb.b as f64 / 255.0;

    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = max - min;

    let h = if delta == 0.0 {
        0.0
    } else if max == r {
        60.0 * ((g - b) / delta).rem_euclid(6.0)
    } else if max == g {
        60.0 * ((b - r) / delta + 2.0)
    } else {
        60.0 * ((r - g) / delta + 4.0)
    };

    let s = if max == 0.0 { 0.0 } else { delta / max * 100.0 };

    Hsb {
        h: h.rem_euclid(360.0),
        s,
        b: max * 100.0,
    }
}

pub fn hsb_to_rgb(hsb: Hsb) -> Rgb {
    let hsb = hsb.clamped();
    let s = hsb.s / 100.0;
    let v = hsb.b / 100.0;

    if s == 0.0 {
        let c = to_channel(v);
        return Rgb::new(c, c, c);
    }

    let sector = hsb.h / 60.0;
    let i = sector.floor();
    let f = sector - i;
    let p = v * (1.0 - s);
    let q = v * (1.0 - f * s);
    let t = v * (1.0 - (1.0 - f) * s);

    let (r, g, b) = match (i as i64).rem_euclid(6) {
        0 => (v, t, p),
        1 => (q, v, p),
        2 => (p, v, t),
        3 => (p, q, v),
        4 => (t, p, v),
        _ => (v, p, q),
    };

    Rgb::new(to_channel(r), to_channel(g), to_channel(b))
}

fn to_channel(v: f64) -> u8 {
    (v * 255.0).round().clamp(0.0, 255.0) as u8
}

/// Manual hex entry: trims, adds a missing `#`, and accepts exactly six hex
/// digits. Anything else is discarded.
pub fn parse_hex_input(input: &str) -> Option<Color> {
    let trimmed = input.trim();
    let digits = trimmed.strip_prefix('#').unwrap_or(trimmed);
    if digits.len() != 6 {
        return None;
    }
    parse_hex_digits(digits).map(Color)
}
