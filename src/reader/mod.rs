//! Chapter reader
//!
//! Generates chapters for a subtopic and tracks reading progress, study time,
//! notes and bookmarks while the learner works through them.

pub mod autosave;
pub mod chapters;
pub mod markdown;
pub mod platforms;
pub mod session;
pub mod timer;

pub use autosave::Autosave;
pub use chapters::{Chapter, ChapterContext, ChapterKind, generate_chapters, template_chapters};
pub use markdown::{ContentBlock, parse_blocks};
pub use session::{ReaderError, ReaderSession};
pub use timer::{StudyTick, StudyTimer};
