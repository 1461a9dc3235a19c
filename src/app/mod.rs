//! Application state and event handling

pub mod command;
pub mod input;
pub mod state;

use std::io::{self, Stdout};
use std::time::Duration;

use anyhow::Result;
use chrono::Utc;
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers,
    },
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use tokio::sync::mpsc;

use crate::config::Config;
use crate::reader::{ReaderSession, StudyTick, StudyTimer};
use crate::store::{FileStore, Repository};
use crate::ui;
use command::{Command, ParseResult, parse_command};
use input::{Action, key_to_action};
use state::{AppState, Panel, QuizState, Screen, TextInput};

/// Buffered study ticks between two frames
const TICK_BUFFER: usize = 64;

/// The main application
pub struct App {
    /// Application configuration
    config: Config,

    /// Current application state
    state: AppState,

    /// Persisted learner data
    repo: Repository<FileStore>,

    /// Study timer, running while the learner is studying
    timer: Option<StudyTimer>,
    ticks_tx: mpsc::Sender<StudyTick>,
    ticks_rx: mpsc::Receiver<StudyTick>,

    /// Terminal backend
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl App {
    /// Open the chapter reader for a subtopic
    pub fn reader(config: Config, repo: Repository<FileStore>, session: ReaderSession) -> Result<Self> {
        let state = AppState { screen: Screen::Reader, reader: Some(session), ..Default::default() };
        Self::with_state(config, repo, state)
    }

    /// Open a quiz attempt
    pub fn quiz(config: Config, repo: Repository<FileStore>, quiz: QuizState) -> Result<Self> {
        let state = AppState { screen: Screen::Quiz, quiz: Some(quiz), ..Default::default() };
        Self::with_state(config, repo, state)
    }

    fn with_state(config: Config, repo: Repository<FileStore>, state: AppState) -> Result<Self> {
        let terminal = Self::setup_terminal()?;
        let (ticks_tx, ticks_rx) = mpsc::channel(TICK_BUFFER);
        Ok(Self { config, state, repo, timer: None, ticks_tx, ticks_rx, terminal })
    }

    /// Set up the terminal for TUI rendering
    fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;
        Ok(terminal)
    }

    /// Restore the terminal to its original state
    fn restore_terminal(&mut self) -> Result<()> {
        disable_raw_mode()?;
        execute!(self.terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
        self.terminal.show_cursor()?;
        Ok(())
    }

    /// Run the application main loop
    pub async fn run(&mut self) -> Result<()> {
        // Set up panic hook to restore terminal
        let original_hook = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |panic_info| {
            let _ = disable_raw_mode();
            let _ = execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture);
            original_hook(panic_info);
        }));

        let theme = self.config.active_theme();

        loop {
            // Draw UI
            let state = &mut self.state;
            self.terminal.draw(|frame| {
                ui::draw(frame, state, &theme);
            })?;

            // Handle events
            if event::poll(Duration::from_millis(16))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        match self.handle_key(key) {
                            Ok(true) => break, // Exit requested
                            Ok(false) => {}
                            Err(e) => {
                                tracing::error!("Error handling key: {}", e);
                                self.state.command_line.set_error(e.to_string());
                            }
                        }
                    }
                }
            }

            self.drain_ticks();
            self.autosave();
        }

        self.shutdown();
        self.restore_terminal()?;
        Ok(())
    }

    /// Count study seconds delivered by the timer
    fn drain_ticks(&mut self) {
        while self.ticks_rx.try_recv().is_ok() {
            if let Some(reader) = self.state.reader.as_mut() {
                reader.tick();
            }
        }
    }

    fn autosave(&mut self) {
        let Some(reader) = self.state.reader.as_mut() else {
            return;
        };
        if let Err(e) = reader.save_if_due(&mut self.repo) {
            tracing::warn!("Autosave failed: {}", e);
            self.state.command_line.set_error(format!("Autosave failed: {}", e));
        }
    }

    /// Stop the timer and flush unsaved reading progress
    fn shutdown(&mut self) {
        self.stop_timer();
        if let Some(reader) = self.state.reader.as_mut() {
            if let Err(e) = reader.save_now(&mut self.repo) {
                tracing::error!("Failed to save reading progress on exit: {}", e);
            }
        }
    }

    fn start_timer(&mut self) {
        if self.timer.as_ref().is_none_or(|t| !t.is_running()) {
            self.timer = Some(StudyTimer::start(self.ticks_tx.clone()));
        }
    }

    fn stop_timer(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.stop();
        }
    }

    /// Handle a key press, returns true if should exit
    fn handle_key(&mut self, key: KeyEvent) -> Result<bool> {
        if self.state.command_line.is_input_mode() {
            return self.handle_command_key(key);
        }
        if self.state.notes.is_editing() {
            self.handle_notes_key(key);
            return Ok(false);
        }
        if key.code == KeyCode::Char(':') {
            self.state.command_line.enter_command_mode();
            return Ok(false);
        }

        let Some(action) = key_to_action(key.code, key.modifiers, self.config.vim_mode) else {
            return Ok(false);
        };

        match self.state.screen {
            Screen::Help => {
                if matches!(action, Action::Back | Action::Help | Action::Select) {
                    self.state.close_help();
                }
                Ok(false)
            }
            Screen::Reader => self.handle_reader_action(action),
            Screen::Quiz => self.handle_quiz_action(action),
        }
    }

    fn handle_command_key(&mut self, key: KeyEvent) -> Result<bool> {
        let input = &mut self.state.command_line.input;
        match key.code {
            KeyCode::Esc => self.state.command_line.exit_input_mode(),
            KeyCode::Enter => {
                let text = input.text.clone();
                self.state.command_line.exit_input_mode();
                return self.run_command(&text);
            }
            KeyCode::Backspace => {
                if input.text.is_empty() {
                    self.state.command_line.exit_input_mode();
                } else {
                    input.delete_char();
                }
            }
            KeyCode::Delete => input.delete_char_forward(),
            KeyCode::Left => input.move_left(),
            KeyCode::Right => input.move_right(),
            KeyCode::Home => input.move_start(),
            KeyCode::End => input.move_end(),
            KeyCode::Char(c) => input.insert_char(c),
            _ => {}
        }
        Ok(false)
    }

    fn handle_notes_key(&mut self, key: KeyEvent) {
        let save = key.code == KeyCode::Esc
            || (key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('s'));
        if save {
            self.finish_notes();
            return;
        }

        let Some(editor) = self.state.notes.editor.as_mut() else {
            return;
        };
        match key.code {
            KeyCode::Enter => editor.insert_char('\n'),
            KeyCode::Backspace => editor.delete_char(),
            KeyCode::Delete => editor.delete_char_forward(),
            KeyCode::Left => editor.move_left(),
            KeyCode::Right => editor.move_right(),
            KeyCode::Home => editor.move_start(),
            KeyCode::End => editor.move_end(),
            KeyCode::Char(c) => editor.insert_char(c),
            _ => {}
        }
    }

    fn begin_notes(&mut self) {
        let Some(reader) = self.state.reader.as_ref() else {
            return;
        };
        self.state.panel_visibility.notes = true;
        self.state.focused_panel = Panel::Notes;
        self.state.notes.editor = Some(TextInput::with_text(reader.progress().notes.clone()));
        self.state.command_line.set_message("Editing notes (Esc to finish)");
    }

    fn finish_notes(&mut self) {
        let Some(editor) = self.state.notes.editor.take() else {
            return;
        };
        if let Some(reader) = self.state.reader.as_mut() {
            if reader.progress().notes != editor.text {
                reader.update_notes(editor.text);
                self.state.command_line.set_message("Notes updated");
            } else {
                self.state.command_line.message = None;
            }
        }
    }

    /// Execute a : command, returns true if should exit
    fn run_command(&mut self, input: &str) -> Result<bool> {
        let command = match parse_command(input) {
            ParseResult::Ok(command) => command,
            ParseResult::UnknownCommand(cmd) => {
                self.state.command_line.set_error(format!("Unknown command: {}", cmd));
                return Ok(false);
            }
            ParseResult::MissingArgument(cmd) => {
                self.state.command_line.set_error(format!("{} needs an argument", cmd));
                return Ok(false);
            }
            ParseResult::InvalidArgument { command, argument } => {
                self.state.command_line.set_error(format!("Invalid argument for {}: {}", command, argument));
                return Ok(false);
            }
        };

        match command {
            Command::Nop => self.state.command_line.message = None,
            Command::Quit => return Ok(true),
            Command::WriteQuit => {
                self.save_reader()?;
                return Ok(true);
            }
            Command::Write => {
                self.save_reader()?;
                self.state.command_line.set_message("Progress saved");
            }
            Command::Help => self.state.show_help(),
            Command::Submit => self.submit_quiz()?,
            Command::Goto(n) => {
                if let Some(reader) = self.state.reader.as_mut() {
                    reader.select_chapter(n - 1)?;
                    self.state.content.reset();
                }
            }
            Command::Bookmark => return self.handle_reader_action(Action::Bookmark),
            Command::Complete => return self.handle_reader_action(Action::MarkComplete),
            Command::Notes => self.begin_notes(),
            Command::Start => self.set_learning(true),
            Command::Pause => self.set_learning(false),
        }
        Ok(false)
    }

    fn save_reader(&mut self) -> Result<()> {
        if let Some(reader) = self.state.reader.as_mut() {
            reader.save_now(&mut self.repo)?;
        }
        Ok(())
    }

    fn set_learning(&mut self, learning: bool) {
        let Some(reader) = self.state.reader.as_mut() else {
            return;
        };
        if learning {
            reader.start();
            self.start_timer();
            self.state.command_line.set_message("Study timer started");
        } else {
            reader.pause();
            self.stop_timer();
            self.state.command_line.set_message("Study timer paused");
        }
    }

    fn handle_reader_action(&mut self, action: Action) -> Result<bool> {
        let visibility = &self.state.panel_visibility;
        let page = self.state.content.visible_height.max(2) as isize;
        let Some(reader) = self.state.reader.as_mut() else {
            return Ok(false);
        };

        match action {
            Action::Down if self.state.focused_panel == Panel::Chapters => {
                if reader.current_index() + 1 < reader.chapters().len() {
                    reader.next_chapter()?;
                    self.state.content.reset();
                }
            }
            Action::Up if self.state.focused_panel == Panel::Chapters => {
                if reader.current_index() > 0 {
                    reader.previous_chapter()?;
                    self.state.content.reset();
                }
            }
            Action::Down => self.state.content.scroll_by(1),
            Action::Up => self.state.content.scroll_by(-1),
            Action::Top => self.state.content.reset(),
            Action::Bottom => self.state.content.scroll_by(isize::MAX / 2),
            Action::PageDown => self.state.content.scroll_by(page),
            Action::PageUp => self.state.content.scroll_by(-page),
            Action::HalfPageDown => self.state.content.scroll_by(page / 2),
            Action::HalfPageUp => self.state.content.scroll_by(-page / 2),
            Action::Left => self.state.focused_panel = self.state.focused_panel.left(visibility),
            Action::Right => self.state.focused_panel = self.state.focused_panel.right(visibility),
            Action::Select | Action::Back => self.state.focused_panel = Panel::Content,
            Action::NextChapter => {
                if reader.current_index() + 1 < reader.chapters().len() {
                    reader.next_chapter()?;
                    self.state.content.reset();
                }
            }
            Action::PreviousChapter => {
                if reader.current_index() > 0 {
                    reader.previous_chapter()?;
                    self.state.content.reset();
                }
            }
            Action::MarkComplete => {
                let index = reader.current_index();
                reader.mark_complete(index)?;
                if reader.current_index() != index {
                    self.state.content.reset();
                }
                self.state
                    .command_line
                    .set_message(format!("Chapter {} complete ({:.0}%)", index + 1, reader.progress_percentage()));
            }
            Action::Bookmark => {
                let index = reader.current_index();
                let on = reader.toggle_bookmark(index)?;
                let msg = if on { "Bookmarked" } else { "Bookmark removed" };
                self.state.command_line.set_message(msg);
            }
            Action::ToggleLearning => {
                let learning = !reader.is_learning();
                self.set_learning(learning);
            }
            Action::EditNotes => self.begin_notes(),
            Action::Save => {
                reader.save_now(&mut self.repo)?;
                self.state.command_line.set_message("Progress saved");
            }
            Action::ToggleChapters => {
                self.state.panel_visibility.chapters = !self.state.panel_visibility.chapters;
                if !self.state.panel_visibility.chapters && self.state.focused_panel == Panel::Chapters {
                    self.state.focused_panel = Panel::Content;
                }
            }
            Action::ToggleNotes => {
                self.state.panel_visibility.notes = !self.state.panel_visibility.notes;
                if !self.state.panel_visibility.notes && self.state.focused_panel == Panel::Notes {
                    self.state.focused_panel = Panel::Content;
                }
            }
            Action::Help => self.state.show_help(),
            Action::Option(_) => {}
        }
        Ok(false)
    }

    fn handle_quiz_action(&mut self, action: Action) -> Result<bool> {
        let Some(quiz) = self.state.quiz.as_mut() else {
            return Ok(false);
        };

        if quiz.submitted.is_some() {
            return Ok(matches!(action, Action::Select | Action::Back));
        }

        match action {
            Action::Down => quiz.move_option(true),
            Action::Up => quiz.move_option(false),
            Action::Right | Action::NextChapter => quiz.select_question(true),
            Action::Left | Action::PreviousChapter => quiz.select_question(false),
            Action::Option(n) => {
                quiz.option_cursor = n;
                self.answer_selected();
            }
            Action::Select => self.answer_selected(),
            Action::Help => self.state.show_help(),
            _ => {}
        }
        Ok(false)
    }

    fn answer_selected(&mut self) {
        let Some(quiz) = self.state.quiz.as_mut() else {
            return;
        };
        match quiz.answer_selected() {
            Some(feedback) if !feedback.counted => {
                self.state.command_line.set_message("Already answered, the first answer counts");
            }
            Some(feedback) => {
                let msg = if feedback.correct { "Correct!" } else { "Incorrect" };
                if quiz.session.is_complete() {
                    self.state.command_line.set_message(format!("{} All questions answered, :submit to finish", msg));
                } else {
                    self.state.command_line.set_message(msg);
                }
            }
            None => {}
        }
    }

    fn submit_quiz(&mut self) -> Result<()> {
        let Some(quiz) = self.state.quiz.as_mut() else {
            self.state.command_line.set_error("No quiz in progress");
            return Ok(());
        };
        if quiz.submitted.is_some() {
            self.state.command_line.set_error("Quiz already submitted");
            return Ok(());
        }

        let outcome = quiz.session.clone().finish(Utc::now());
        let index = self.repo.record_quiz(
            &quiz.topic,
            quiz.week,
            quiz.subtopic_number,
            outcome.record.clone(),
            &self.config.hardness_bounds,
        )?;
        tracing::info!(
            topic = %quiz.topic,
            week = quiz.week,
            subtopic = quiz.subtopic_number,
            correct = outcome.record.num_correct,
            questions = outcome.record.num_ques,
            hardness = index.value(),
            "Quiz submitted"
        );
        quiz.submitted = Some(outcome);
        self.state.command_line.set_message(format!("Submitted. Hardness index is now {:.2}", index.value()));
        Ok(())
    }
}

impl Drop for App {
    fn drop(&mut self) {
        let _ = self.restore_terminal();
    }
}
