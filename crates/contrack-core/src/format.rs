use serde::{Deserialize, Serialize};

/// RGBA color representation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    #[serde(default = "default_alpha")]
    pub a: u8,
}

fn default_alpha() -> u8 {
    255
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Color { r, g, b, a: 255 }
    }

    // Highlight palette
    pub const LIGHT_GREEN: Color = Color::rgb(0xd9, 0xea, 0xd3);
    pub const LIGHT_RED: Color = Color::rgb(0xf4, 0xcc, 0xcc);
    pub const LIGHT_ORANGE: Color = Color::rgb(0xfc, 0xe5, 0xcd);
    pub const LIGHT_YELLOW: Color = Color::rgb(0xff, 0xf2, 0xcc);
}

/// Cell formatting properties
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CellFormat {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<Color>,
}
