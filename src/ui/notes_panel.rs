//! Notes panel component

use chrono::{DateTime, Utc};
use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};

use crate::app::state::{NotesState, TextInput};
use crate::reader::ReaderSession;
use crate::theme::Theme;

/// Draw the notes panel
pub fn draw(
    frame: &mut Frame,
    area: Rect,
    reader: &ReaderSession,
    notes: &NotesState,
    theme: &Theme,
    focused: bool,
) {
    let border_color = if focused { theme.border_focused } else { theme.border };
    let title = if notes.is_editing() { " Notes (editing) " } else { " Notes " };

    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color))
        .style(Style::default().bg(theme.bg_primary));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let mut lines: Vec<Line> = match &notes.editor {
        Some(editor) => editor_lines(editor, theme),
        None if reader.progress().has_notes() => reader
            .progress()
            .notes
            .lines()
            .map(|l| Line::from(Span::styled(l.to_string(), Style::default().fg(theme.fg_primary))))
            .collect(),
        None => {
            let msg = Paragraph::new("No notes yet\n\nPress 'e' to write notes for this subtopic")
                .style(Style::default().fg(theme.fg_muted))
                .wrap(Wrap { trim: true });
            frame.render_widget(msg, inner);
            return;
        }
    };

    lines.push(Line::from(""));
    let footer = if notes.is_editing() {
        "Esc to finish editing".to_string()
    } else {
        match reader.progress().last_accessed {
            Some(at) => format!("Saved {}", format_timestamp(at, Utc::now())),
            None => "Not saved yet".to_string(),
        }
    };
    lines.push(Line::from(Span::styled(footer, Style::default().fg(theme.fg_muted))));

    let widget = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .scroll((notes.scroll_offset.min(u16::MAX as usize) as u16, 0));
    frame.render_widget(widget, inner);
}

/// Editor buffer with a cursor bar at the cursor position
fn editor_lines(editor: &TextInput, theme: &Theme) -> Vec<Line<'static>> {
    let text_style = Style::default().fg(theme.fg_primary);
    let cursor_style = Style::default().fg(theme.accent_primary).add_modifier(Modifier::SLOW_BLINK);

    split_at_cursor(&editor.text, editor.cursor)
        .into_iter()
        .map(|(line, cursor)| match cursor {
            Some(col) => {
                let before: String = line.chars().take(col).collect();
                let after: String = line.chars().skip(col).collect();
                Line::from(vec![
                    Span::styled(before, text_style),
                    Span::styled("│", cursor_style),
                    Span::styled(after, text_style),
                ])
            }
            None => Line::from(Span::styled(line, text_style)),
        })
        .collect()
}

/// Split text into lines, returning the cursor column on the line holding
/// the (character) cursor
fn split_at_cursor(text: &str, cursor: usize) -> Vec<(String, Option<usize>)> {
    let mut out = Vec::new();
    let mut start = 0;
    for line in text.split('\n') {
        let len = line.chars().count();
        let col = (cursor >= start && cursor <= start + len).then(|| cursor - start);
        out.push((line.to_string(), col));
        // +1 for the newline
        start += len + 1;
    }
    out
}

/// Format a save time relative to `now`
fn format_timestamp(at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let secs = (now - at).num_seconds().max(0);
    if secs < 60 {
        "just now".to_string()
    } else if secs < 3600 {
        format!("{}m ago", secs / 60)
    } else if secs < 86_400 {
        format!("{}h ago", secs / 3600)
    } else if secs < 604_800 {
        format!("{}d ago", secs / 86_400)
    } else {
        at.format("%Y-%m-%d").to_string()
    }
}
