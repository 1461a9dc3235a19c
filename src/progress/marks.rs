//! Recorded quiz results as a flat list

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use crate::model::{QuizStats, Roadmaps};

/// Minimum score in percent that counts as a pass
pub const PASS_PERCENTAGE: f64 = 60.0;

/// Time a learner waits before retaking a quiz
pub fn retake_cooldown() -> Duration {
    Duration::hours(1)
}

/// One recorded quiz attempt, resolved against its roadmap
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizMark {
    pub topic: String,
    pub week: u32,
    pub subtopic_number: u32,
    pub subtopic: String,
    pub num_correct: u32,
    pub num_ques: u32,
    pub percentage: f64,
    pub time_taken_secs: u64,
    pub timestamp: Option<DateTime<Utc>>,
}

impl QuizMark {
    pub fn passed(&self) -> bool {
        self.percentage >= PASS_PERCENTAGE
    }

    /// Earliest time the quiz may be taken again (`None` means now)
    pub fn retake_at(&self) -> Option<DateTime<Utc>> {
        self.timestamp.map(|t| t + retake_cooldown())
    }

    pub fn can_retake(&self, now: DateTime<Utc>) -> bool {
        self.retake_at().is_none_or(|at| now >= at)
    }
}

/// Every recorded attempt whose position still exists in its roadmap, in
/// topic then roadmap order
pub fn quiz_marks(roadmaps: &Roadmaps, quiz_stats: &QuizStats) -> Vec<QuizMark> {
    let mut marks = Vec::new();
    for (topic, by_week) in quiz_stats {
        let Some(roadmap) = roadmaps.get(topic) else {
            continue;
        };
        for (&week, by_subtopic) in by_week {
            for (&number, record) in by_subtopic {
                let Some(r) = roadmap.subtopic(week, number) else {
                    continue;
                };
                marks.push(QuizMark {
                    topic: topic.clone(),
                    week,
                    subtopic_number: number,
                    subtopic: r.subtopic.subtopic.clone(),
                    num_correct: record.num_correct,
                    num_ques: record.num_ques,
                    percentage: record.percentage(),
                    time_taken_secs: record.seconds_taken(),
                    timestamp: record.timestamp,
                });
            }
        }
    }
    marks
}
