//! Progress statistics derived from roadmaps, quiz records and reading
//! progress

pub mod achievements;
pub mod aggregate;
pub mod marks;

pub use achievements::{LearningBadge, format_study_time};
pub use aggregate::{
    LearningStats, OverallStats, ProgressSource, TopicQuizProgress, learning_stats, overall_stats,
    percentage, quiz_progress,
};
pub use marks::{PASS_PERCENTAGE, QuizMark, quiz_marks};
