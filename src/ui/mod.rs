//! UI rendering components

pub mod command_line;
pub mod content;
pub mod help;
pub mod layout;
pub mod notes_panel;
pub mod quiz_panel;
pub mod reader_screen;

use ratatui::Frame;

use crate::app::state::{AppState, Screen};
use crate::theme::Theme;

/// Main draw function
pub fn draw(frame: &mut Frame, state: &mut AppState, theme: &Theme) {
    let base = if state.screen == Screen::Help { state.previous_screen } else { state.screen };

    match base {
        Screen::Quiz => quiz_panel::draw(frame, state, theme),
        _ => reader_screen::draw(frame, state, theme),
    }

    if state.screen == Screen::Help {
        help::draw(frame, theme);
    }
}
