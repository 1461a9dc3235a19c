//! Well-known store keys

pub const USER_LOGGED_IN: &str = "userLoggedIn";
pub const USER_EMAIL: &str = "userEmail";
pub const USER_NAME: &str = "userName";
pub const TOPICS: &str = "topics";
pub const ROADMAPS: &str = "roadmaps";
pub const QUIZZES: &str = "quizzes";
pub const QUIZ_STATS: &str = "quizStats";
pub const HARDNESS_INDEX: &str = "hardnessIndex";
pub const USER_AVATAR_STYLE: &str = "userAvatarStyle";

const LEARNING_PROGRESS_PREFIX: &str = "learning_progress_";

/// Key of the learning progress record for a (course, subtopic) pair
pub fn learning_progress(course: &str, subtopic: &str) -> String {
    format!("{}{}_{}", LEARNING_PROGRESS_PREFIX, course, subtopic)
}

/// Prefix shared by every learning progress key of a course
pub fn learning_progress_prefix(course: &str) -> String {
    format!("{}{}_", LEARNING_PROGRESS_PREFIX, course)
}
