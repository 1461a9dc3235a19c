//! Chapter content renderer

use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};
use textwrap::{Options, wrap};

use crate::app::state::ContentState;
use crate::reader::{ContentBlock, ReaderSession, parse_blocks};
use crate::theme::Theme;

/// Draw the content panel with the current chapter
pub fn draw(
    frame: &mut Frame,
    area: Rect,
    reader: &ReaderSession,
    content: &mut ContentState,
    theme: &Theme,
    focused: bool,
) {
    let border_color = if focused { theme.border_focused } else { theme.border };

    let chapter = reader.current_chapter();
    let title = match chapter {
        Some(ch) => format!(" {} · {} min ", ch.title, ch.duration),
        None => " Content ".to_string(),
    };

    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color))
        .style(Style::default().bg(theme.bg_primary));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let Some(chapter) = chapter else {
        let msg = Paragraph::new("This subtopic has no chapters yet")
            .style(Style::default().fg(theme.fg_muted))
            .wrap(Wrap { trim: true });
        frame.render_widget(msg, inner);
        return;
    };

    // Reserve 1 column for scrollbar
    let content_width = inner.width.saturating_sub(2) as usize;
    let content_area =
        Rect { x: inner.x, y: inner.y, width: inner.width.saturating_sub(1), height: inner.height };
    let scrollbar_x = inner.x + inner.width.saturating_sub(1);

    let blocks = parse_blocks(&chapter.content);
    let lines = render_content_blocks(&blocks, theme, content_width);
    let total_lines = lines.len();
    let visible_height = inner.height as usize;

    // Update state with content metrics for scroll clamping
    content.total_lines = total_lines;
    content.visible_height = visible_height;
    content.clamp_scroll();

    let scroll_offset = content.scroll_offset;
    let visible_lines: Vec<Line> = lines.into_iter().skip(scroll_offset).take(visible_height).collect();
    frame.render_widget(Paragraph::new(visible_lines), content_area);

    draw_scrollbar(frame, scrollbar_x, inner.y, inner.height, scroll_offset, total_lines, theme);
}

fn draw_scrollbar(
    frame: &mut Frame,
    x: u16,
    y: u16,
    height: u16,
    scroll_offset: usize,
    total_lines: usize,
    theme: &Theme,
) {
    let height = height as usize;
    if total_lines <= height || height == 0 {
        return;
    }

    let thumb_height = ((height * height).div_ceil(total_lines)).max(1);
    let max_scroll = total_lines.saturating_sub(height / 2).max(1);
    let scroll_ratio = (scroll_offset as f64 / max_scroll as f64).min(1.0);
    let thumb_top = ((height - thumb_height) as f64 * scroll_ratio).round() as usize;

    for i in 0..height {
        let on_thumb = i >= thumb_top && i < thumb_top + thumb_height;
        let (ch, color) = if on_thumb { ("█", theme.accent_secondary) } else { ("░", theme.bg_secondary) };
        frame.render_widget(
            Paragraph::new(ch).style(Style::default().fg(color)),
            Rect { x, y: y.saturating_add(i as u16), width: 1, height: 1 },
        );
    }
}

/// Render content blocks to styled lines
pub fn render_content_blocks(
    blocks: &[ContentBlock],
    theme: &Theme,
    width: usize,
) -> Vec<Line<'static>> {
    let mut lines: Vec<Line<'static>> = Vec::new();

    for block in blocks {
        match block {
            ContentBlock::Heading { level, text } => render_heading(&mut lines, *level, text, theme),
            ContentBlock::Paragraph(text) => {
                let style = Style::default().fg(theme.fg_primary);
                push_wrapped(&mut lines, text, "", "", style, theme, width);
                lines.push(Line::from(""));
            }
            ContentBlock::Code { language, code } => {
                render_code_block(&mut lines, language.as_deref(), code, theme);
            }
            ContentBlock::List { ordered, items } => {
                let style = Style::default().fg(theme.fg_primary);
                for (i, item) in items.iter().enumerate() {
                    let bullet = if *ordered { format!("  {}. ", i + 1) } else { "  • ".to_string() };
                    let indent = " ".repeat(bullet.chars().count());
                    push_wrapped(&mut lines, item, &bullet, &indent, style, theme, width);
                }
                lines.push(Line::from(""));
            }
            ContentBlock::Quote(text) => {
                let style = Style::default().fg(theme.fg_muted).add_modifier(Modifier::ITALIC);
                push_wrapped(&mut lines, text, "  │ ", "  │ ", style, theme, width);
                lines.push(Line::from(""));
            }
            ContentBlock::Rule => {
                let rule_width = width.saturating_sub(4).min(32);
                lines.push(Line::from(Span::styled("─".repeat(rule_width), Style::default().fg(theme.border))));
                lines.push(Line::from(""));
            }
        }
    }

    lines
}

fn render_heading(lines: &mut Vec<Line<'static>>, level: u8, text: &str, theme: &Theme) {
    let (style, prefix) = match level {
        1 => (
            Style::default().fg(theme.accent_primary).add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
            "",
        ),
        2 => (Style::default().fg(theme.accent_secondary).add_modifier(Modifier::BOLD), ""),
        3 => (Style::default().fg(theme.fg_secondary).add_modifier(Modifier::BOLD), "  "),
        _ => (Style::default().fg(theme.fg_muted), "    "),
    };

    let mut spans = vec![Span::styled(prefix.to_string(), style)];
    spans.extend(inline_spans(text, style, theme, &mut false));

    lines.push(Line::from(""));
    lines.push(Line::from(spans));
    if level <= 2 {
        lines.push(Line::from(""));
    }
}

fn render_code_block(lines: &mut Vec<Line<'static>>, language: Option<&str>, code: &str, theme: &Theme) {
    let border = Style::default().fg(theme.border);
    lines.push(Line::from(vec![
        Span::styled("┌─ ", border),
        Span::styled(language.unwrap_or("code").to_string(), Style::default().fg(theme.accent_secondary)),
        Span::styled(" ─", border),
    ]));
    for line in code.lines() {
        lines.push(Line::from(vec![
            Span::styled("│ ", border),
            Span::styled(line.to_string(), Style::default().fg(theme.code)),
        ]));
    }
    lines.push(Line::from(Span::styled("└──────", border)));
    lines.push(Line::from(""));
}

/// Word-wrap `text` to `width`, putting `first` before the first line and
/// `rest` before the others
fn push_wrapped(
    lines: &mut Vec<Line<'static>>,
    text: &str,
    first: &str,
    rest: &str,
    style: Style,
    theme: &Theme,
    width: usize,
) {
    let prefix_width = first.chars().count().max(rest.chars().count());
    let options = Options::new(width.saturating_sub(prefix_width).max(10));
    let prefix_style = Style::default().fg(theme.accent_secondary);
    let mut in_code = false;

    for (i, row) in text.lines().flat_map(|l| wrap(l, &options)).enumerate() {
        let prefix = if i == 0 { first } else { rest };
        let mut spans = vec![Span::styled(prefix.to_string(), prefix_style)];
        spans.extend(inline_spans(&row, style, theme, &mut in_code));
        lines.push(Line::from(spans));
    }
}

/// Split on backticks, styling inline code. `in_code` carries over wrapped
/// lines.
fn inline_spans(text: &str, style: Style, theme: &Theme, in_code: &mut bool) -> Vec<Span<'static>> {
    let code_style = Style::default().fg(theme.code);
    let mut spans = Vec::new();
    for (i, part) in text.split('`').enumerate() {
        if i > 0 {
            *in_code = !*in_code;
        }
        if part.is_empty() {
            continue;
        }
        let style = if *in_code { code_style } else { style };
        spans.push(Span::styled(part.to_string(), style));
    }
    spans
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text_of(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn render_content_blocks_empty() {
        let lines = render_content_blocks(&[], &Theme::default(), 80);
        assert!(lines.is_empty());
    }

    #[test]
    fn paragraph_is_wrapped_to_width() {
        let blocks = vec![ContentBlock::Paragraph("word ".repeat(40))];
        let lines = render_content_blocks(&blocks, &Theme::default(), 40);
        assert!(lines.len() > 4);
        assert!(lines.iter().all(|l| text_of(l).chars().count() <= 40));
    }

    #[test]
    fn heading_is_padded_with_blank_lines() {
        let blocks = vec![ContentBlock::Heading { level: 1, text: "Title".into() }];
        let lines = render_content_blocks(&blocks, &Theme::default(), 80);
        assert_eq!(lines.len(), 3);
        assert_eq!(text_of(&lines[1]), "Title");
    }

    #[test]
    fn code_block_is_framed() {
        let blocks = vec![ContentBlock::Code { language: Some("rust".into()), code: "fn main() {}".into() }];
        let lines = render_content_blocks(&blocks, &Theme::default(), 80);
        assert_eq!(text_of(&lines[0]), "┌─ rust ─");
        assert_eq!(text_of(&lines[1]), "│ fn main() {}");
    }

    #[test]
    fn ordered_list_is_numbered() {
        let blocks = vec![ContentBlock::List { ordered: true, items: vec!["First".into(), "Second".into()] }];
        let lines = render_content_blocks(&blocks, &Theme::default(), 80);
        assert_eq!(text_of(&lines[0]), "  1. First");
        assert_eq!(text_of(&lines[1]), "  2. Second");
    }

    #[test]
    fn inline_code_gets_code_style() {
        let theme = Theme::default();
        let spans = inline_spans("use `Vec` here", Style::default(), &theme, &mut false);
        assert_eq!(spans.len(), 3);
        assert_eq!(spans[1].content, "Vec");
        assert_eq!(spans[1].style.fg, Some(theme.code));
    }
}
