//! Reading session for one subtopic

use std::time::Duration;

use chrono::Utc;
use thiserror::Error;

use super::autosave::Autosave;
use super::chapters::Chapter;
use crate::model::LearningProgress;
use crate::store::{KeyValueStore, Repository, StoreError};

/// Errors raised by reader operations
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ReaderError {
    #[error("Chapter {index} does not exist (this subtopic has {count} chapters)")]
    ChapterOutOfRange { index: usize, count: usize },
}

/// Chapter reading state of one (course, subtopic) pair
#[derive(Debug)]
pub struct ReaderSession {
    course: String,
    subtopic: String,
    chapters: Vec<Chapter>,
    progress: LearningProgress,
    learning: bool,
    autosave: Autosave,
}

impl ReaderSession {
    /// Start a session with `progress`, dropping chapter indices that do not
    /// exist in `chapters`
    pub fn new(
        course: impl Into<String>,
        subtopic: impl Into<String>,
        chapters: Vec<Chapter>,
        mut progress: LearningProgress,
        autosave_delay: Duration,
    ) -> Self {
        progress.clamp_to(chapters.len());
        Self {
            course: course.into(),
            subtopic: subtopic.into(),
            chapters,
            progress,
            learning: false,
            autosave: Autosave::new(autosave_delay),
        }
    }

    /// Resume from the stored progress record
    pub fn load<S: KeyValueStore>(
        repo: &Repository<S>,
        course: &str,
        subtopic: &str,
        chapters: Vec<Chapter>,
        autosave_delay: Duration,
    ) -> Result<Self, StoreError> {
        let progress = repo.learning_progress(course, subtopic)?;
        tracing::debug!(
            course,
            subtopic,
            completed = progress.completed_chapters.len(),
            "Loaded reading progress"
        );
        Ok(Self::new(course, subtopic, chapters, progress, autosave_delay))
    }

    pub fn course(&self) -> &str {
        &self.course
    }

    pub fn subtopic(&self) -> &str {
        &self.subtopic
    }

    pub fn chapters(&self) -> &[Chapter] {
        &self.chapters
    }

    pub fn progress(&self) -> &LearningProgress {
        &self.progress
    }

    pub fn current_index(&self) -> usize {
        self.progress.current_chapter
    }

    pub fn current_chapter(&self) -> Option<&Chapter> {
        self.chapters.get(self.progress.current_chapter)
    }

    pub fn is_learning(&self) -> bool {
        self.learning
    }

    pub fn is_completed(&self, index: usize) -> bool {
        self.progress.completed_chapters.contains(&index)
    }

    pub fn is_bookmarked(&self, index: usize) -> bool {
        self.progress.bookmarks.contains(&index)
    }

    /// Whether a debounced save is waiting
    pub fn has_unsaved_changes(&self) -> bool {
        self.autosave.is_pending()
    }


    fn check(&self, index: usize) -> Result<(), ReaderError> {
        if index < self.chapters.len() {
            Ok(())
        } else {
            Err(ReaderError::ChapterOutOfRange { index, count: self.chapters.len() })
        }
    }

    /// Jump to any chapter
    pub fn select_chapter(&mut self, index: usize) -> Result<(), ReaderError> {
        self.check(index)?;
        if self.progress.current_chapter != index {
            self.progress.current_chapter = index;
            self.autosave.schedule();
        }
        Ok(())
    }

    pub fn next_chapter(&mut self) -> Result<(), ReaderError> {
        self.select_chapter(self.progress.current_chapter + 1)
    }

    pub fn previous_chapter(&mut self) -> Result<(), ReaderError> {
        let prev = self.progress.current_chapter.checked_sub(1).ok_or(
            ReaderError::ChapterOutOfRange { index: 0, count: self.chapters.len() },
        )?;
        self.select_chapter(prev)
    }

    /// Mark a chapter completed. Completing the current chapter moves on to
    /// the next one unless it is the last.
    pub fn mark_complete(&mut self, index: usize) -> Result<(), ReaderError> {
        self.check(index)?;
        self.progress.completed_chapters.insert(index);
        if index == self.progress.current_chapter && index + 1 < self.chapters.len() {
            self.progress.current_chapter = index + 1;
        }
        self.autosave.schedule();
        Ok(())
    }

    /// Add or remove a bookmark, returning whether the chapter is now
    /// bookmarked
    pub fn toggle_bookmark(&mut self, index: usize) -> Result<bool, ReaderError> {
        self.check(index)?;
        let bookmarked = if self.progress.bookmarks.remove(&index) {
            false
        } else {
            self.progress.bookmarks.insert(index);
            true
        };
        self.autosave.schedule();
        Ok(bookmarked)
    }

    pub fn update_notes(&mut self, notes: impl Into<String>) {
        let notes = notes.into();
        if notes != self.progress.notes {
            self.progress.notes = notes;
            self.autosave.schedule();
        }
    }

    pub fn start(&mut self) {
        self.learning = true;
    }

    pub fn pause(&mut self) {
        self.learning = false;
    }

    /// Flip between learning and paused, returning the new state
    pub fn toggle_learning(&mut self) -> bool {
        self.learning = !self.learning;
        self.learning
    }

    /// One second of study time, counted only while learning
    pub fn tick(&mut self) -> bool {
        if !self.learning {
            return false;
        }
        self.progress.study_time += 1;
        self.autosave.schedule();
        true
    }

    /// Completed share of this subtopic's chapters in percent
    pub fn progress_percentage(&self) -> f64 {
        crate::progress::percentage(
            self.progress.completed_chapters.len() as u64,
            self.chapters.len() as u64,
        )
    }

    /// Write the progress record now and drop any pending autosave
    pub fn save_now<S: KeyValueStore>(&mut self, repo: &mut Repository<S>) -> Result<(), StoreError> {
        self.progress.last_accessed = Some(Utc::now());
        repo.save_learning_progress(&self.course, &self.subtopic, &self.progress)?;
        self.autosave.cancel();
        tracing::debug!(course = %self.course, subtopic = %self.subtopic, "Saved reading progress");
        Ok(())
    }

    /// Save if the debounce delay has passed, returning whether it did
    pub fn save_if_due<S: KeyValueStore>(
        &mut self,
        repo: &mut Repository<S>,
    ) -> Result<bool, StoreError> {
        if !self.autosave.take_due() {
            return Ok(false);
        }
        self.save_now(repo)?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::{BTreeSet, HashMap};

    use super::*;
    use crate::model::{Roadmap, Roadmaps, Subtopic, Week};
    use crate::progress::learning_stats;
    use crate::reader::chapters::{ChapterContext, template_chapters};
    use crate::store::MemoryStore;
    use pretty_assertions::assert_eq;

    const DELAY: Duration = Duration::from_secs(2);

    fn chapters() -> Vec<Chapter> {
        template_chapters(&ChapterContext { subtopic: "Ownership", time: "1 hour", course: "Rust" })
    }

    fn session() -> ReaderSession {
        ReaderSession::new("Rust", "Ownership", chapters(), LearningProgress::default(), DELAY)
    }

    #[test]
    fn mark_current_complete_advances() {
        let mut s = session();
        s.mark_complete(0).unwrap();
        assert_eq!(s.current_index(), 1);
        assert!(s.is_completed(0));
    }

    #[test]
    fn mark_other_chapter_keeps_position() {
        let mut s = session();
        s.mark_complete(2).unwrap();
        assert_eq!(s.current_index(), 0);
    }

    #[test]
    fn last_chapter_does_not_advance() {
        let mut s = session();
        s.select_chapter(3).unwrap();
        s.mark_complete(3).unwrap();
        assert_eq!(s.current_index(), 3);
    }

    #[test]
    fn out_of_range_is_rejected() {
        let mut s = session();
        assert_eq!(s.select_chapter(4), Err(ReaderError::ChapterOutOfRange { index: 4, count: 4 }));
        assert!(s.mark_complete(9).is_err());
        assert!(s.toggle_bookmark(4).is_err());
        assert!(s.previous_chapter().is_err());
        assert!(s.progress().completed_chapters.is_empty());
    }

    #[test]
    fn bookmark_toggle_round_trip() {
        let mut s = session();
        let before: BTreeSet<usize> = s.progress().bookmarks.clone();
        assert!(s.toggle_bookmark(2).unwrap());
        assert!(s.is_bookmarked(2));
        assert!(!s.toggle_bookmark(2).unwrap());
        assert_eq!(s.progress().bookmarks, before);
    }

    #[test]
    fn tick_counts_only_while_learning() {
        let mut s = session();
        assert!(!s.tick());
        s.start();
        assert!(s.tick());
        assert!(s.tick());
        s.pause();
        assert!(!s.tick());
        assert_eq!(s.progress().study_time, 2);
        assert!(s.toggle_learning());
    }

    #[test]
    fn progress_percentage_of_chapters() {
        let mut s = session();
        assert_eq!(s.progress_percentage(), 0.0);
        s.mark_complete(0).unwrap();
        assert_eq!(s.progress_percentage(), 25.0);

        let empty = ReaderSession::new("a", "b", Vec::new(), LearningProgress::default(), DELAY);
        assert_eq!(empty.progress_percentage(), 0.0);
    }

    #[test]
    fn stored_indices_are_clamped_on_load() {
        let progress = LearningProgress {
            completed_chapters: [0, 5].into_iter().collect(),
            bookmarks: [7].into_iter().collect(),
            current_chapter: 9,
            ..Default::default()
        };
        let s = ReaderSession::new("Rust", "Ownership", chapters(), progress, DELAY);
        assert_eq!(s.progress().completed_chapters, BTreeSet::from([0]));
        assert!(s.progress().bookmarks.is_empty());
        assert_eq!(s.current_index(), 3);
    }

    #[test]
    fn fourth_chapter_completes_subtopic_in_same_snapshot() {
        let mut s = session();
        for i in 0..4 {
            s.mark_complete(i).unwrap();
        }

        let week = Week { topic: String::new(), subtopics: vec![Subtopic::new("Ownership", "", "1 hour")] };
        let mut roadmaps = Roadmaps::new();
        roadmaps.insert("Rust".into(), Roadmap::from_weeks([("Week 1".to_string(), week)]));
        let mut source = HashMap::new();
        source.insert(("Rust".to_string(), "Ownership".to_string()), s.progress().clone());

        let stats = learning_stats(&roadmaps, &source).unwrap();
        assert_eq!(stats["Rust"].completed_subtopics, 1);
        assert_eq!(stats["Rust"].completion_percentage, 100.0);
    }

    #[tokio::test(start_paused = true)]
    async fn autosave_after_quiet_period() {
        let mut repo = Repository::new(MemoryStore::new());
        let mut s = ReaderSession::load(&repo, "Rust", "Ownership", chapters(), DELAY).unwrap();

        s.update_notes("moves!");
        assert!(s.has_unsaved_changes());
        tokio::time::advance(Duration::from_secs(1)).await;
        assert!(!s.save_if_due(&mut repo).unwrap());

        s.mark_complete(0).unwrap();
        tokio::time::advance(Duration::from_secs(1)).await;
        assert!(!s.save_if_due(&mut repo).unwrap());
        assert_eq!(repo.learning_progress("Rust", "Ownership").unwrap(), LearningProgress::default());

        tokio::time::advance(Duration::from_secs(1)).await;
        assert!(s.save_if_due(&mut repo).unwrap());

        let stored = repo.learning_progress("Rust", "Ownership").unwrap();
        assert_eq!(stored.notes, "moves!");
        assert_eq!(stored.current_chapter, 1);
        assert!(stored.last_accessed.is_some());
    }

    #[test]
    fn save_now_clears_pending_save() {
        let mut repo = Repository::new(MemoryStore::new());
        let mut s = session();
        s.toggle_bookmark(1).unwrap();
        s.save_now(&mut repo).unwrap();
        assert!(!s.has_unsaved_changes());
        assert_eq!(repo.learning_progress("Rust", "Ownership").unwrap().bookmarks.len(), 1);

        let resumed = ReaderSession::load(&repo, "Rust", "Ownership", chapters(), DELAY).unwrap();
        assert!(resumed.is_bookmarked(1));
    }
}
