//! Quiz and chapter progress aggregation

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

use crate::model::quiz;
use crate::model::{CHAPTERS_PER_SUBTOPIC, LearningProgress, QuizStats, Roadmaps};
use crate::store::{KeyValueStore, Repository, StoreError};

/// `part / whole` in percent, 0 when `whole` is 0
pub fn percentage(part: u64, whole: u64) -> f64 {
    if whole == 0 { 0.0 } else { part as f64 * 100.0 / whole as f64 }
}

/// Quiz progress of one topic, weighted by subtopic time units
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TopicQuizProgress {
    pub total: u64,
    pub completed: u64,
}

impl TopicQuizProgress {
    pub fn percentage(&self) -> f64 {
        percentage(self.completed, self.total)
    }
}

/// Quiz progress of every topic that has a roadmap.
///
/// A subtopic counts as completed once any quiz for its position has been
/// recorded. Records that point at no subtopic of the roadmap are ignored.
pub fn quiz_progress(
    roadmaps: &Roadmaps,
    quiz_stats: &QuizStats,
) -> BTreeMap<String, TopicQuizProgress> {
    roadmaps
        .iter()
        .map(|(topic, roadmap)| {
            let mut progress = TopicQuizProgress::default();
            for r in roadmap.subtopics() {
                let units = r.subtopic.time_units();
                progress.total += units;
                if quiz::lookup(quiz_stats, topic, r.week, r.number).is_some() {
                    progress.completed += units;
                }
            }
            (topic.clone(), progress)
        })
        .collect()
}

/// Where learning progress records come from
pub trait ProgressSource {
    fn progress(&self, course: &str, subtopic: &str) -> Result<LearningProgress, StoreError>;
}

impl<S: KeyValueStore> ProgressSource for Repository<S> {
    fn progress(&self, course: &str, subtopic: &str) -> Result<LearningProgress, StoreError> {
        self.learning_progress(course, subtopic)
    }
}

/// Records keyed by (course, subtopic)
impl ProgressSource for HashMap<(String, String), LearningProgress> {
    fn progress(&self, course: &str, subtopic: &str) -> Result<LearningProgress, StoreError> {
        Ok(self.get(&(course.to_string(), subtopic.to_string())).cloned().unwrap_or_default())
    }
}

/// Chapter reading statistics of one topic
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LearningStats {
    pub total_subtopics: usize,
    pub completed_subtopics: usize,
    pub total_chapters: usize,
    pub completed_chapters: usize,
    /// Seconds
    pub total_study_time: u64,
    pub total_notes: usize,
    pub total_bookmarks: usize,
    pub completion_percentage: f64,
}

impl LearningStats {
    /// Fold one subtopic's record into the totals
    fn add(&mut self, progress: &LearningProgress) {
        self.total_subtopics += 1;
        self.total_chapters += CHAPTERS_PER_SUBTOPIC;
        self.completed_chapters += progress.counted_chapters();
        if progress.is_subtopic_complete() {
            self.completed_subtopics += 1;
        }
        self.total_study_time += progress.study_time;
        if progress.has_notes() {
            self.total_notes += 1;
        }
        self.total_bookmarks += progress.bookmarks.len();
    }

    fn finish(mut self) -> Self {
        self.completion_percentage =
            percentage(self.completed_chapters as u64, self.total_chapters as u64);
        self
    }
}

/// Chapter statistics of every topic that has a roadmap
pub fn learning_stats(
    roadmaps: &Roadmaps,
    source: &impl ProgressSource,
) -> Result<BTreeMap<String, LearningStats>, StoreError> {
    let mut stats = BTreeMap::new();
    for (topic, roadmap) in roadmaps {
        let mut topic_stats = LearningStats::default();
        for r in roadmap.subtopics() {
            let progress = source.progress(topic, &r.subtopic.subtopic)?;
            topic_stats.add(&progress);
        }
        stats.insert(topic.clone(), topic_stats.finish());
    }
    Ok(stats)
}

/// Totals across every topic
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OverallStats {
    pub total_courses: usize,
    pub total_subtopics: usize,
    pub completed_subtopics: usize,
    pub total_chapters: usize,
    pub completed_chapters: usize,
    pub total_study_time: u64,
    pub total_notes: usize,
    pub total_bookmarks: usize,
    pub overall_completion_percentage: f64,
}

pub fn overall_stats(per_topic: &BTreeMap<String, LearningStats>) -> OverallStats {
    let mut overall = OverallStats { total_courses: per_topic.len(), ..Default::default() };
    for stats in per_topic.values() {
        overall.total_subtopics += stats.total_subtopics;
        overall.completed_subtopics += stats.completed_subtopics;
        overall.total_chapters += stats.total_chapters;
        overall.completed_chapters += stats.completed_chapters;
        overall.total_study_time += stats.total_study_time;
        overall.total_notes += stats.total_notes;
        overall.total_bookmarks += stats.total_bookmarks;
    }
    overall.overall_completion_percentage =
        percentage(overall.completed_chapters as u64, overall.total_chapters as u64);
    overall
}
