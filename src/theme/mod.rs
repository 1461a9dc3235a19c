//! Color themes

mod palettes;

use ratatui::style::Color;
use serde::{Deserialize, Serialize};

/// A color theme for the application
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Theme {
    pub name: String,

    // Background colors
    pub bg_primary: Color,
    pub bg_secondary: Color,

    // Foreground colors
    pub fg_primary: Color,
    pub fg_secondary: Color,
    pub fg_muted: Color,

    // Accent colors
    pub accent_primary: Color,
    pub accent_secondary: Color,

    // Semantic colors
    pub success: Color,
    pub warning: Color,
    pub error: Color,

    /// Inline and block code
    pub code: Color,

    // UI elements
    pub border: Color,
    pub border_focused: Color,
    pub selection: Color,
}

impl Theme {
    pub const MIDNIGHT: &'static str = "Midnight";
    pub const DAYLIGHT: &'static str = "Daylight";

    /// Look up a built-in theme by name (case insensitive)
    pub fn by_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "midnight" => Some(Self::midnight()),
            "daylight" => Some(Self::daylight()),
            _ => None,
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Theme::midnight()
    }
}
