//! Help overlay

use ratatui::{
    Frame,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
};

use super::layout::centered_rect;
use crate::theme::Theme;

const READER_KEYS: &[(&str, &str)] = &[
    ("j / k", "Scroll, or move through chapters in the list"),
    ("h / l", "Focus panel left / right"),
    ("n / p", "Next / previous chapter"),
    ("m", "Mark chapter complete"),
    ("b", "Toggle bookmark"),
    ("space", "Start / pause the study timer"),
    ("e", "Edit notes"),
    ("[ / ]", "Toggle chapter list / notes panel"),
    ("Ctrl-s", "Save progress"),
];

const QUIZ_KEYS: &[(&str, &str)] = &[
    ("1-9", "Answer with option"),
    ("j / k", "Move between options"),
    ("Enter", "Answer with highlighted option"),
    ("h / l", "Previous / next question"),
];

const COMMANDS: &[(&str, &str)] = &[
    (":w", "Save progress"),
    (":q  :wq", "Quit"),
    (":goto N", "Open chapter N"),
    (":complete  :bookmark", "Update the current chapter"),
    (":start  :pause", "Control the study timer"),
    (":notes", "Edit notes"),
    (":submit", "Finish the quiz"),
];

/// Draw the help overlay
pub fn draw(frame: &mut Frame, theme: &Theme) {
    let area = centered_rect(70, 80, frame.area());
    frame.render_widget(Clear, area);

    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.border_focused))
        .style(Style::default().bg(theme.bg_secondary));

    let mut lines = Vec::new();
    for (title, entries) in [("Reader", READER_KEYS), ("Quiz", QUIZ_KEYS), ("Commands", COMMANDS)] {
        lines.push(Line::from(Span::styled(
            title,
            Style::default().fg(theme.accent_primary).add_modifier(Modifier::BOLD),
        )));
        for (key, description) in entries {
            lines.push(Line::from(vec![
                Span::styled(format!("  {:<22}", key), Style::default().fg(theme.accent_secondary)),
                Span::styled(*description, Style::default().fg(theme.fg_primary)),
            ]));
        }
        lines.push(Line::from(""));
    }
    lines.push(Line::from(Span::styled("Esc to close", Style::default().fg(theme.fg_muted))));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}
