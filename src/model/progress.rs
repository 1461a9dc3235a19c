//! Per-subtopic learning progress recorded by the chapter reader

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Chapters the aggregator assumes for every subtopic
pub const CHAPTERS_PER_SUBTOPIC: usize = 4;

/// Progress for one (course, subtopic) pair
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LearningProgress {
    /// Indices of completed chapters
    pub completed_chapters: BTreeSet<usize>,
    /// Index of the chapter being read
    pub current_chapter: usize,
    /// Accumulated study time in seconds
    pub study_time: u64,
    /// Free-text notes
    pub notes: String,
    /// Indices of bookmarked chapters
    pub bookmarks: BTreeSet<usize>,
    /// Last time the record was saved
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_accessed: Option<DateTime<Utc>>,
}

impl LearningProgress {
    /// Completed chapters counted towards the fixed four-chapter budget
    pub fn counted_chapters(&self) -> usize {
        self.completed_chapters.len().min(CHAPTERS_PER_SUBTOPIC)
    }

    /// Whether the subtopic counts as completed
    pub fn is_subtopic_complete(&self) -> bool {
        self.completed_chapters.len() >= CHAPTERS_PER_SUBTOPIC
    }

    /// Whether the learner wrote any notes
    pub fn has_notes(&self) -> bool {
        !self.notes.trim().is_empty()
    }

    /// Drop chapter indices that do not exist in a reader with
    /// `chapter_count` chapters
    pub fn clamp_to(&mut self, chapter_count: usize) {
        self.completed_chapters.retain(|&i| i < chapter_count);
        self.bookmarks.retain(|&i| i < chapter_count);
        if self.current_chapter >= chapter_count {
            self.current_chapter = chapter_count.saturating_sub(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_partial_record() {
        let json = r#"{"completedChapters":[0,1],"studyTime":120}"#;
        let progress: LearningProgress = serde_json::from_str(json).unwrap();
        assert_eq!(progress.completed_chapters.len(), 2);
        assert_eq!(progress.study_time, 120);
        assert_eq!(progress.current_chapter, 0);
        assert!(progress.bookmarks.is_empty());
        assert!(progress.last_accessed.is_none());
    }

    #[test]
    fn deserializes_iso_timestamp() {
        let json = r#"{"notes":"hi","lastAccessed":"2024-05-01T10:00:00.000Z"}"#;
        let progress: LearningProgress = serde_json::from_str(json).unwrap();
        assert!(progress.has_notes());
        assert!(progress.last_accessed.is_some());
    }

    #[test]
    fn whitespace_notes_do_not_count() {
        let progress = LearningProgress { notes: "  \n ".into(), ..Default::default() };
        assert!(!progress.has_notes());
    }

    #[test]
    fn counted_chapters_is_capped() {
        let progress =
            LearningProgress { completed_chapters: (0..6).collect(), ..Default::default() };
        assert_eq!(progress.counted_chapters(), CHAPTERS_PER_SUBTOPIC);
        assert!(progress.is_subtopic_complete());
    }

    #[test]
    fn clamp_drops_out_of_range_indices() {
        let mut progress = LearningProgress {
            completed_chapters: [0, 3, 7].into_iter().collect(),
            bookmarks: [5].into_iter().collect(),
            current_chapter: 9,
            ..Default::default()
        };
        progress.clamp_to(4);
        assert_eq!(progress.completed_chapters, [0, 3].into_iter().collect());
        assert!(progress.bookmarks.is_empty());
        assert_eq!(progress.current_chapter, 3);
    }
}
