//! Chapter reader screen

use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, List, ListItem, ListState, Paragraph},
};

use super::{command_line, content, layout, notes_panel};
use crate::app::state::{AppState, Panel};
use crate::progress::format_study_time;
use crate::reader::ReaderSession;
use crate::theme::Theme;

/// Draw the reader screen
pub fn draw(frame: &mut Frame, state: &mut AppState, theme: &Theme) {
    let [header_area, progress_area, main_area, command_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Min(3),
        Constraint::Length(1),
    ])
    .areas(frame.area());

    let Some(reader) = state.reader.as_ref() else {
        frame.render_widget(
            Paragraph::new("No subtopic open").style(Style::default().fg(theme.fg_muted)),
            main_area,
        );
        command_line::draw(frame, command_area, &state.command_line, theme);
        return;
    };

    draw_header(frame, header_area, reader, theme);
    draw_progress(frame, progress_area, reader, theme);

    let chunks = layout::panel_layout(main_area, &state.panel_visibility);
    let mut panel_index = 0;

    if state.panel_visibility.chapters {
        draw_chapter_list(frame, chunks[panel_index], reader, theme, state.focused_panel == Panel::Chapters);
        panel_index += 1;
    }

    content::draw(
        frame,
        chunks[panel_index],
        reader,
        &mut state.content,
        theme,
        state.focused_panel == Panel::Content,
    );
    panel_index += 1;

    if state.panel_visibility.notes {
        notes_panel::draw(
            frame,
            chunks[panel_index],
            reader,
            &state.notes,
            theme,
            state.focused_panel == Panel::Notes,
        );
    }

    command_line::draw(frame, command_area, &state.command_line, theme);
}

/// Course, subtopic, study time and timer state
fn draw_header(frame: &mut Frame, area: Rect, reader: &ReaderSession, theme: &Theme) {
    let (status, status_style) = if reader.is_learning() {
        ("● studying", Style::default().fg(theme.success).add_modifier(Modifier::BOLD))
    } else {
        ("○ paused", Style::default().fg(theme.fg_muted))
    };

    let line = Line::from(vec![
        Span::styled(format!(" {} ", reader.course()), Style::default().fg(theme.accent_primary).add_modifier(Modifier::BOLD)),
        Span::styled("› ", Style::default().fg(theme.fg_muted)),
        Span::styled(reader.subtopic().to_string(), Style::default().fg(theme.fg_primary)),
        Span::raw("   "),
        Span::styled(format!("⏱ {} ", format_study_time(reader.progress().study_time)), Style::default().fg(theme.fg_secondary)),
        Span::styled(status, status_style),
    ]);
    frame.render_widget(Paragraph::new(line).style(Style::default().bg(theme.bg_secondary)), area);
}

fn draw_progress(frame: &mut Frame, area: Rect, reader: &ReaderSession, theme: &Theme) {
    let percent = reader.progress_percentage();
    let label = format!(
        "{}/{} chapters · {:.0}%",
        reader.progress().completed_chapters.len(),
        reader.chapters().len(),
        percent
    );
    let gauge = Gauge::default()
        .gauge_style(Style::default().fg(theme.accent_secondary).bg(theme.bg_secondary))
        .ratio((percent / 100.0).clamp(0.0, 1.0))
        .label(label);
    frame.render_widget(gauge, area);
}

fn draw_chapter_list(frame: &mut Frame, area: Rect, reader: &ReaderSession, theme: &Theme, focused: bool) {
    let border_color = if focused { theme.border_focused } else { theme.border };
    let block = Block::default()
        .title(" Chapters ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color))
        .style(Style::default().bg(theme.bg_primary));

    let items: Vec<ListItem> = reader
        .chapters()
        .iter()
        .enumerate()
        .map(|(i, chapter)| {
            let (marker, marker_style) = chapter_marker(reader.is_completed(i), theme);
            let mut spans = vec![
                Span::styled(marker, marker_style),
                Span::styled(format!("{}. {}", i + 1, chapter.title), Style::default().fg(theme.fg_primary)),
            ];
            if reader.is_bookmarked(i) {
                spans.push(Span::styled(" ★", Style::default().fg(theme.warning)));
            }
            spans.push(Span::styled(format!(" {}m", chapter.duration), Style::default().fg(theme.fg_muted)));
            ListItem::new(Line::from(spans))
        })
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().bg(theme.selection).add_modifier(Modifier::BOLD));
    let mut list_state = ListState::default().with_selected(Some(reader.current_index()));
    frame.render_stateful_widget(list, area, &mut list_state);
}

fn chapter_marker(completed: bool, theme: &Theme) -> (&'static str, Style) {
    if completed {
        ("✓ ", Style::default().fg(theme.success))
    } else {
        ("  ", Style::default())
    }
}
