//! Quiz screen

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};

use super::command_line;
use crate::app::state::{AppState, QuizState};
use crate::progress::PASS_PERCENTAGE;
use crate::quiz::QuizOutcome;
use crate::theme::Theme;

/// Draw the quiz screen
pub fn draw(frame: &mut Frame, state: &AppState, theme: &Theme) {
    let [main_area, command_area] =
        Layout::vertical([Constraint::Min(3), Constraint::Length(1)]).areas(frame.area());

    if let Some(quiz) = &state.quiz {
        let title = if quiz.submitted.is_some() { " Quiz Results " } else { " Quiz " };
        let block = Block::default()
            .title(format!("{}· {} ", title, quiz.subtopic))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.border_focused))
            .style(Style::default().bg(theme.bg_primary));

        let inner = block.inner(main_area);
        frame.render_widget(block, main_area);

        match &quiz.submitted {
            Some(outcome) => draw_results(frame, inner, quiz, outcome, theme),
            None => draw_question(frame, inner, quiz, theme),
        }
    }

    command_line::draw(frame, command_area, &state.command_line, theme);
}

/// Draw the selected question with its options and feedback
fn draw_question(frame: &mut Frame, area: Rect, quiz: &QuizState, theme: &Theme) {
    let session = &quiz.session;
    let current = session.selected();
    let total = session.questions().len();

    let Some(question) = session.questions().get(current) else {
        let msg = Paragraph::new("This quiz has no questions. Use :submit to record it.")
            .style(Style::default().fg(theme.fg_muted));
        frame.render_widget(msg, area);
        return;
    };

    let answered = session.answer_of(current);
    let mut lines = vec![
        Line::from(vec![
            Span::styled(format!("Question {} of {}", current + 1, total), Style::default().fg(theme.fg_muted)),
            Span::styled(
                format!("   answered {}/{}   ⏱ {}s", session.answered_count(), total, session.elapsed().as_secs()),
                Style::default().fg(theme.fg_muted),
            ),
        ]),
        Line::from(""),
        Line::from(Span::styled(
            question.question.clone(),
            Style::default().fg(theme.fg_primary).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
    ];

    for (i, option) in question.options.iter().enumerate() {
        let is_cursor = i == quiz.option_cursor;
        let prefix = if answered == Some(i) || (answered.is_none() && is_cursor) { "●" } else { "○" };

        let style = match answered {
            Some(_) if question.is_correct(i) => Style::default().fg(theme.success).add_modifier(Modifier::BOLD),
            Some(chosen) if chosen == i => Style::default().fg(theme.error),
            _ if is_cursor => Style::default().fg(theme.accent_primary).add_modifier(Modifier::BOLD),
            _ => Style::default().fg(theme.fg_secondary),
        };

        lines.push(Line::from(Span::styled(format!("  {} {}) {}", prefix, i + 1, option), style)));
    }

    lines.push(Line::from(""));

    if let Some(feedback) = quiz.feedback.get(current).copied().flatten() {
        let (verdict, style) = if feedback.correct {
            ("Correct!", Style::default().fg(theme.success).add_modifier(Modifier::BOLD))
        } else {
            ("Incorrect", Style::default().fg(theme.error).add_modifier(Modifier::BOLD))
        };
        lines.push(Line::from(Span::styled(verdict, style)));
        if !question.reason.is_empty() {
            lines.push(Line::from(Span::styled(question.reason.clone(), Style::default().fg(theme.fg_secondary))));
        }
        lines.push(Line::from(""));
    }

    lines.push(Line::from(Span::styled(
        "[1-9] Answer    [j/k] Option    [h/l] Question    :submit Finish",
        Style::default().fg(theme.fg_muted),
    )));

    let para = Paragraph::new(lines).wrap(Wrap { trim: true });
    frame.render_widget(para, area);
}

/// Draw the score once submitted
fn draw_results(frame: &mut Frame, area: Rect, quiz: &QuizState, outcome: &QuizOutcome, theme: &Theme) {
    let record = &outcome.record;
    let percentage = record.percentage();
    let passed = percentage >= PASS_PERCENTAGE;

    let (headline, style) = if passed {
        (format!("Passed! {}/{} correct ({:.0}%)", record.num_correct, record.num_ques, percentage), theme.success)
    } else {
        (
            format!(
                "{}/{} correct ({:.0}%) · {:.0}% needed to pass",
                record.num_correct, record.num_ques, percentage, PASS_PERCENTAGE
            ),
            theme.error,
        )
    };

    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled(headline, Style::default().fg(style).add_modifier(Modifier::BOLD))),
        Line::from(""),
        Line::from(Span::styled(
            format!("Time taken: {}s", record.seconds_taken()),
            Style::default().fg(theme.fg_secondary),
        )),
    ];
    if outcome.unanswered > 0 {
        lines.push(Line::from(Span::styled(
            format!("{} unanswered question(s) counted as wrong", outcome.unanswered),
            Style::default().fg(theme.warning),
        )));
    }
    lines.push(Line::from(""));

    let mut marks = Vec::new();
    for (i, question) in quiz.session.questions().iter().enumerate() {
        let correct = quiz.session.answer_of(i).is_some_and(|a| question.is_correct(a));
        let (marker, color) = if correct { ("✓", theme.success) } else { ("✗", theme.error) };
        marks.push(Span::styled(format!(" Q{} {} ", i + 1, marker), Style::default().fg(color)));
    }
    lines.push(Line::from(marks));
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled("[Enter] Close", Style::default().fg(theme.fg_muted))));

    let para = Paragraph::new(lines).alignment(Alignment::Center).wrap(Wrap { trim: true });
    frame.render_widget(para, area);
}
