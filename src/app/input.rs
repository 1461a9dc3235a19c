//! Event handling utilities

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// Vim-style key mapping (basic, without modifiers)
pub fn vim_key_to_action(key: KeyCode) -> Option<Action> {
    match key {
        KeyCode::Char('j') | KeyCode::Down => Some(Action::Down),
        KeyCode::Char('k') | KeyCode::Up => Some(Action::Up),
        KeyCode::Char('h') | KeyCode::Left => Some(Action::Left),
        KeyCode::Char('l') | KeyCode::Right => Some(Action::Right),
        KeyCode::Char('g') | KeyCode::Home => Some(Action::Top),
        KeyCode::Char('G') | KeyCode::End => Some(Action::Bottom),
        KeyCode::Char('d') | KeyCode::PageDown => Some(Action::PageDown),
        KeyCode::Char('u') | KeyCode::PageUp => Some(Action::PageUp),
        KeyCode::Enter => Some(Action::Select),
        KeyCode::Esc => Some(Action::Back),
        KeyCode::Char('n') | KeyCode::Tab => Some(Action::NextChapter),
        KeyCode::Char('p') | KeyCode::BackTab => Some(Action::PreviousChapter),
        KeyCode::Char('m') => Some(Action::MarkComplete),
        KeyCode::Char('b') => Some(Action::Bookmark),
        KeyCode::Char(' ') => Some(Action::ToggleLearning),
        KeyCode::Char('e') => Some(Action::EditNotes),
        KeyCode::Char('?') => Some(Action::Help),
        // 'q' is not mapped, use :q to quit
        KeyCode::Char('[') => Some(Action::ToggleChapters),
        KeyCode::Char(']') => Some(Action::ToggleNotes),
        KeyCode::Char(c @ '1'..='9') => c.to_digit(10).map(|d| Action::Option(d as usize - 1)),
        _ => None,
    }
}

/// Key mapping with modifiers (for Ctrl combinations)
pub fn key_with_modifier_to_action(key: KeyCode, modifiers: KeyModifiers) -> Option<Action> {
    if modifiers.contains(KeyModifiers::CONTROL) {
        match key {
            KeyCode::Char('d') => Some(Action::HalfPageDown),
            KeyCode::Char('u') => Some(Action::HalfPageUp),
            KeyCode::Char('f') => Some(Action::PageDown),
            KeyCode::Char('b') => Some(Action::PageUp),
            KeyCode::Char('s') => Some(Action::Save),
            _ => None,
        }
    } else {
        vim_key_to_action(key)
    }
}

/// Key mapping honoring the vim mode setting. Without vim mode only arrow
/// and paging keys move around.
pub fn key_to_action(key: KeyCode, modifiers: KeyModifiers, vim_mode: bool) -> Option<Action> {
    let vim_motion = matches!(key, KeyCode::Char('h' | 'j' | 'k' | 'l' | 'g' | 'G' | 'd' | 'u'));
    if !vim_mode && vim_motion && !modifiers.contains(KeyModifiers::CONTROL) {
        return None;
    }
    key_with_modifier_to_action(key, modifiers)
}

/// Actions that can be taken in the app
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    // Navigation
    Up,
    Down,
    Left,
    Right,
    Top,
    Bottom,
    PageUp,
    PageDown,
    HalfPageUp,
    HalfPageDown,

    // Selection
    Select,
    Back,
    /// Pick an answer option (0-based)
    Option(usize),

    // Chapters
    NextChapter,
    PreviousChapter,
    MarkComplete,
    Bookmark,

    // Study session
    ToggleLearning,
    EditNotes,
    Save,

    // Panel management
    ToggleChapters,
    ToggleNotes,

    Help,
}

/// Result of a key press while typing hidden input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecretInput {
    Pending,
    Submit,
    Cancel,
}

/// Apply a key press to hidden input such as a password.
///
/// Nothing is echoed; the caller only learns whether input is complete.
pub fn secret_input_key(buffer: &mut String, key: KeyEvent) -> SecretInput {
    if key.kind == KeyEventKind::Release {
        return SecretInput::Pending;
    }
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') | KeyCode::Char('d') => SecretInput::Cancel,
            KeyCode::Char('u') => {
                buffer.clear();
                SecretInput::Pending
            }
            _ => SecretInput::Pending,
        };
    }
    match key.code {
        KeyCode::Enter => SecretInput::Submit,
        KeyCode::Esc => SecretInput::Cancel,
        KeyCode::Backspace => {
            buffer.pop();
            SecretInput::Pending
        }
        KeyCode::Char(c) => {
            buffer.push(c);
            SecretInput::Pending
        }
        _ => SecretInput::Pending,
    }
}
