//! Built-in palettes

use ratatui::style::Color;

use super::Theme;

impl Theme {
    /// Dark palette with magenta and lime accents
    pub fn midnight() -> Self {
        Theme {
            name: Self::MIDNIGHT.to_string(),
            bg_primary: Color::Rgb(18, 16, 28),
            bg_secondary: Color::Rgb(32, 28, 46),
            fg_primary: Color::Rgb(230, 228, 240),
            fg_secondary: Color::Rgb(200, 196, 215),
            fg_muted: Color::Rgb(120, 114, 140),
            accent_primary: Color::Rgb(209, 78, 196),   // #d14ec4
            accent_secondary: Color::Rgb(175, 209, 78), // #afd14e
            success: Color::Rgb(175, 209, 78),
            warning: Color::Rgb(230, 180, 90),
            error: Color::Rgb(240, 100, 120),
            code: Color::Rgb(120, 200, 230),
            border: Color::Rgb(60, 54, 80),
            border_focused: Color::Rgb(209, 78, 196),
            selection: Color::Rgb(60, 36, 70),
        }
    }

    /// Light palette for bright terminals
    pub fn daylight() -> Self {
        Theme {
            name: Self::DAYLIGHT.to_string(),
            bg_primary: Color::Rgb(250, 249, 246),
            bg_secondary: Color::Rgb(236, 233, 240),
            fg_primary: Color::Rgb(36, 32, 48),
            fg_secondary: Color::Rgb(70, 64, 90),
            fg_muted: Color::Rgb(140, 134, 156),
            accent_primary: Color::Rgb(160, 40, 150),
            accent_secondary: Color::Rgb(90, 130, 20),
            success: Color::Rgb(60, 130, 40),
            warning: Color::Rgb(180, 120, 20),
            error: Color::Rgb(190, 40, 60),
            code: Color::Rgb(20, 100, 150),
            border: Color::Rgb(200, 194, 210),
            border_focused: Color::Rgb(160, 40, 150),
            selection: Color::Rgb(240, 214, 236),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palettes_are_rgb() {
        for theme in [Theme::midnight(), Theme::daylight()] {
            assert!(matches!(theme.bg_primary, Color::Rgb(_, _, _)));
            assert!(matches!(theme.accent_primary, Color::Rgb(_, _, _)));
        }
    }
}
