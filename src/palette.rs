//! Colors used when rendering the floor image.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::MapError;

/// An RGBA color, written in config files as `#RRGGBB` or `#RRGGBBAA`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Color { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Color { r, g, b, a }
    }

    pub fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

impl FromStr for Color {
    type Err = MapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s
            .strip_prefix('#')
            .ok_or_else(|| MapError::config(format!("color '{}' must start with '#'", s)))?;
        if !hex.is_ascii() || (hex.len() != 6 && hex.len() != 8) {
            return Err(MapError::config(format!(
                "color '{}' must be #RRGGBB or #RRGGBBAA",
                s
            )));
        }

        let channel = |i: usize| {
            u8::from_str_radix(&hex[i..i + 2], 16)
                .map_err(|_| MapError::config(format!("color '{}' has invalid hex digits", s)))
        };
        let alpha = if hex.len() == 8 { channel(6)? } else { 255 };
        Ok(Color::rgba(channel(0)?, channel(2)?, channel(4)?, alpha))
    }
}

impl TryFrom<String> for Color {
    type Error = MapError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_string()
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.a == 255 {
            write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            write!(f, "#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }
}

/// Pixel classes that have a configurable color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SupportedColor {
    MapOutside,
    MapInside,
    MapWall,
    MapWallV2,
    GreyWall,
    Scan,
    Carpets,
    Unknown,
}

impl SupportedColor {
    pub fn default_color(self) -> Color {
        match self {
            SupportedColor::MapOutside => Color::rgba(0, 0, 0, 0),
            SupportedColor::MapInside => Color::rgb(32, 115, 185),
            SupportedColor::MapWall => Color::rgb(100, 196, 254),
            SupportedColor::MapWallV2 => Color::rgb(93, 109, 126),
            SupportedColor::GreyWall => Color::rgb(93, 109, 126),
            SupportedColor::Scan => Color::rgb(0xDF, 0xDF, 0xDF),
            SupportedColor::Carpets => Color::rgba(0xA9, 0xF7, 0xA9, 0xA0),
            SupportedColor::Unknown => Color::rgb(0, 0, 0),
        }
    }
}

const DEFAULT_ROOM_COLORS: [Color; 16] = [
    Color::rgb(240, 178, 122),
    Color::rgb(133, 193, 233),
    Color::rgb(217, 136, 128),
    Color::rgb(52, 152, 219),
    Color::rgb(205, 97, 85),
    Color::rgb(243, 156, 18),
    Color::rgb(88, 214, 141),
    Color::rgb(245, 176, 65),
    Color::rgb(252, 212, 81),
    Color::rgb(72, 201, 176),
    Color::rgb(84, 153, 199),
    Color::rgb(133, 193, 233),
    Color::rgb(245, 176, 65),
    Color::rgb(82, 190, 128),
    Color::rgb(72, 201, 176),
    Color::rgb(165, 105, 189),
];

/// Resolved colors for every pixel class and room
#[derive(Debug, Clone)]
pub struct ColorsPalette {
    colors: HashMap<SupportedColor, Color>,
    room_colors: Vec<Color>,
}

impl Default for ColorsPalette {
    fn default() -> Self {
        ColorsPalette::new(HashMap::new(), Vec::new())
    }
}

impl ColorsPalette {
    /// Build a palette, overriding the defaults with the given colors.
    ///
    /// An empty `room_colors` keeps the 16 default room colors.
    pub fn new(overrides: HashMap<SupportedColor, Color>, room_colors: Vec<Color>) -> Self {
        let room_colors = if room_colors.is_empty() {
            DEFAULT_ROOM_COLORS.to_vec()
        } else {
            room_colors
        };
        ColorsPalette {
            colors: overrides,
            room_colors,
        }
    }

    pub fn color(&self, kind: SupportedColor) -> Color {
        self.colors
            .get(&kind)
            .copied()
            .unwrap_or_else(|| kind.default_color())
    }

    /// Color for a room number, cycling through the room palette.
    pub fn room_color(&self, room_number: u8) -> Color {
        let index = (room_number as usize).saturating_sub(1) % self.room_colors.len();
        self.room_colors[index]
    }
}
