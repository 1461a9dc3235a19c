//! Application state definitions

use crate::model::QuizRecord;
use crate::quiz::{AnswerFeedback, QuizOutcome, QuizSession};
use crate::reader::ReaderSession;

/// Which screen is currently displayed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Screen {
    #[default]
    Reader,
    Quiz,
    Help,
}

/// Which reader panel is currently focused
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Panel {
    Chapters,
    #[default]
    Content,
    Notes,
}

impl Panel {
    /// Next visible panel to the right
    pub fn right(self, visibility: &PanelVisibility) -> Self {
        match self {
            Panel::Chapters => Panel::Content,
            Panel::Content if visibility.notes => Panel::Notes,
            other => other,
        }
    }

    /// Next visible panel to the left
    pub fn left(self, visibility: &PanelVisibility) -> Self {
        match self {
            Panel::Notes => Panel::Content,
            Panel::Content if visibility.chapters => Panel::Chapters,
            other => other,
        }
    }
}

/// Panel visibility settings
#[derive(Debug, Clone)]
pub struct PanelVisibility {
    /// Show the chapter list (left) panel
    pub chapters: bool,
    /// Show the notes (right) panel
    pub notes: bool,
}

impl Default for PanelVisibility {
    fn default() -> Self {
        Self { chapters: true, notes: false }
    }
}

/// Scroll state of the chapter content
#[derive(Debug, Clone, Default)]
pub struct ContentState {
    /// Current scroll position (lines from top)
    pub scroll_offset: usize,
    /// Total rendered lines (updated on render)
    pub total_lines: usize,
    /// Visible height in lines (updated on render)
    pub visible_height: usize,
}

impl ContentState {
    /// Get the maximum allowed scroll offset
    pub fn max_scroll(&self) -> usize {
        self.total_lines.saturating_sub(self.visible_height / 2)
    }

    /// Clamp scroll offset to valid range
    pub fn clamp_scroll(&mut self) {
        self.scroll_offset = self.scroll_offset.min(self.max_scroll());
    }

    pub fn scroll_by(&mut self, lines: isize) {
        self.scroll_offset = self.scroll_offset.saturating_add_signed(lines);
        self.clamp_scroll();
    }

    pub fn reset(&mut self) {
        self.scroll_offset = 0;
    }
}

/// Command line mode
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CommandMode {
    /// Command line hidden or showing status
    #[default]
    Normal,
    /// Accepting : commands
    Command,
}

/// State for the command line input
#[derive(Debug, Clone, Default)]
pub struct CommandLineState {
    /// Current mode
    pub mode: CommandMode,
    /// Input buffer
    pub input: TextInput,
    /// Status/error message to display (when not in input mode)
    pub message: Option<String>,
    /// Whether message is an error
    pub is_error: bool,
}

impl CommandLineState {
    /// Start command mode
    pub fn enter_command_mode(&mut self) {
        self.mode = CommandMode::Command;
        self.input.clear();
        self.message = None;
    }

    /// Exit input mode
    pub fn exit_input_mode(&mut self) {
        self.mode = CommandMode::Normal;
        self.input.clear();
    }

    /// Set a status message
    pub fn set_message(&mut self, msg: impl Into<String>) {
        self.message = Some(msg.into());
        self.is_error = false;
    }

    /// Set an error message
    pub fn set_error(&mut self, msg: impl Into<String>) {
        self.message = Some(msg.into());
        self.is_error = true;
    }

    pub fn is_input_mode(&self) -> bool {
        self.mode == CommandMode::Command
    }
}

/// Single-buffer text input with a character cursor
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextInput {
    pub text: String,
    /// Cursor position in characters
    pub cursor: usize,
}

impl TextInput {
    pub fn with_text(text: impl Into<String>) -> Self {
        let text = text.into();
        let cursor = text.chars().count();
        Self { text, cursor }
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.cursor = 0;
    }

    /// Convert character index to byte index
    fn byte_index(&self, char_idx: usize) -> usize {
        self.text.char_indices().nth(char_idx).map_or(self.text.len(), |(i, _)| i)
    }

    fn char_count(&self) -> usize {
        self.text.chars().count()
    }

    /// Insert a character at the cursor
    pub fn insert_char(&mut self, c: char) {
        let idx = self.byte_index(self.cursor);
        self.text.insert(idx, c);
        self.cursor += 1;
    }

    /// Delete character before cursor
    pub fn delete_char(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            let idx = self.byte_index(self.cursor);
            self.text.remove(idx);
        }
    }

    /// Delete character at cursor
    pub fn delete_char_forward(&mut self) {
        if self.cursor < self.char_count() {
            let idx = self.byte_index(self.cursor);
            self.text.remove(idx);
        }
    }

    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        self.cursor = (self.cursor + 1).min(self.char_count());
    }

    pub fn move_start(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.char_count();
    }
}

/// Notes editing in the notes panel
#[derive(Debug, Clone, Default)]
pub struct NotesState {
    /// Editor buffer while editing, `None` otherwise
    pub editor: Option<TextInput>,
    /// Scroll offset of the notes view
    pub scroll_offset: usize,
}

impl NotesState {
    pub fn is_editing(&self) -> bool {
        self.editor.is_some()
    }
}

/// A quiz being taken for one roadmap position
#[derive(Debug)]
pub struct QuizState {
    pub topic: String,
    pub week: u32,
    pub subtopic_number: u32,
    pub subtopic: String,
    pub description: String,
    pub session: QuizSession,
    /// Feedback per question once answered
    pub feedback: Vec<Option<AnswerFeedback>>,
    /// Option under the cursor for the selected question
    pub option_cursor: usize,
    /// Set once the attempt has been submitted and recorded
    pub submitted: Option<QuizOutcome>,
    /// Earlier attempt for this position, if any
    pub previous: Option<QuizRecord>,
}

impl QuizState {
    pub fn new(
        topic: impl Into<String>,
        week: u32,
        subtopic_number: u32,
        subtopic: impl Into<String>,
        description: impl Into<String>,
        session: QuizSession,
    ) -> Self {
        let feedback = vec![None; session.questions().len()];
        Self {
            topic: topic.into(),
            week,
            subtopic_number,
            subtopic: subtopic.into(),
            description: description.into(),
            session,
            feedback,
            option_cursor: 0,
            submitted: None,
            previous: None,
        }
    }

    /// Answer the selected question with the option under the cursor
    pub fn answer_selected(&mut self) -> Option<AnswerFeedback> {
        let question = self.session.selected();
        let feedback = self.session.answer(question, self.option_cursor)?;
        if let Some(slot) = self.feedback.get_mut(question) {
            slot.get_or_insert(feedback);
        }
        Some(feedback)
    }

    pub fn move_option(&mut self, down: bool) {
        let count = self
            .session
            .questions()
            .get(self.session.selected())
            .map_or(0, |q| q.options.len());
        if count == 0 {
            return;
        }
        self.option_cursor =
            if down { (self.option_cursor + 1).min(count - 1) } else { self.option_cursor.saturating_sub(1) };
    }

    pub fn select_question(&mut self, next: bool) {
        if next {
            self.session.select_next();
        } else {
            self.session.select_previous();
        }
        self.option_cursor = self.session.answer_of(self.session.selected()).unwrap_or(0);
    }
}

/// Full application state
#[derive(Debug, Default)]
pub struct AppState {
    /// Current screen
    pub screen: Screen,

    /// Screen to return to when help is closed
    pub previous_screen: Screen,

    /// Reading session (reader screen)
    pub reader: Option<ReaderSession>,

    /// Quiz attempt (quiz screen)
    pub quiz: Option<QuizState>,

    /// Panel visibility settings
    pub panel_visibility: PanelVisibility,

    /// Currently focused panel
    pub focused_panel: Panel,

    /// Chapter content scroll state
    pub content: ContentState,

    /// Notes panel state
    pub notes: NotesState,

    /// Command line state
    pub command_line: CommandLineState,
}

impl AppState {
    pub fn show_help(&mut self) {
        if self.screen != Screen::Help {
            self.previous_screen = self.screen;
            self.screen = Screen::Help;
        }
    }

    pub fn close_help(&mut self) {
        if self.screen == Screen::Help {
            self.screen = self.previous_screen;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Question;

    #[test]
    fn text_input_edits_at_cursor() {
        let mut input = TextInput::with_text("héllo");
        input.move_start();
        input.move_right();
        input.delete_char_forward();
        input.insert_char('e');
        assert_eq!(input.text, "hello");
        input.move_end();
        input.delete_char();
        assert_eq!(input.text, "hell");
    }

    #[test]
    fn panel_focus_skips_hidden_panels() {
        let visibility = PanelVisibility { chapters: false, notes: false };
        assert_eq!(Panel::Content.left(&visibility), Panel::Content);
        assert_eq!(Panel::Content.right(&visibility), Panel::Content);

        let all = PanelVisibility { chapters: true, notes: true };
        assert_eq!(Panel::Content.left(&all), Panel::Chapters);
        assert_eq!(Panel::Content.right(&all), Panel::Notes);
    }

    #[test]
    fn content_scroll_is_clamped() {
        let mut content = ContentState { total_lines: 100, visible_height: 20, ..Default::default() };
        content.scroll_by(500);
        assert_eq!(content.scroll_offset, 90);
        content.scroll_by(-1000);
        assert_eq!(content.scroll_offset, 0);
    }

    #[test]
    fn help_returns_to_previous_screen() {
        let mut state = AppState { screen: Screen::Quiz, ..Default::default() };
        state.show_help();
        assert_eq!(state.screen, Screen::Help);
        state.close_help();
        assert_eq!(state.screen, Screen::Quiz);
    }

    #[test]
    fn quiz_state_keeps_first_feedback() {
        let question = Question {
            question: "?".into(),
            options: vec!["a".into(), "b".into()],
            answer_index: 1,
            reason: String::new(),
        };
        let mut quiz = QuizState::new("Rust", 1, 1, "Syntax", "", QuizSession::start(vec![question]));
        quiz.answer_selected();
        quiz.move_option(true);
        let second = quiz.answer_selected().unwrap();
        assert!(!second.counted);
        assert_eq!(quiz.feedback[0].map(|f| f.correct), Some(false));
    }
}
