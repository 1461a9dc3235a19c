//! Learner badges and study time formatting

use std::fmt;

use serde::Serialize;

/// Badge shown on the profile, from lowest to highest tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum LearningBadge {
    NewExplorer,
    GettingStarted,
    DedicatedLearner,
    AdvancedStudent,
    MasterLearner,
    LearningChampion,
}

impl LearningBadge {
    /// Badge earned with `courses` enrolled courses and `study_seconds` of
    /// reading time
    pub fn for_learner(courses: usize, study_seconds: u64) -> Self {
        match (courses, study_seconds) {
            (c, s) if c >= 5 && s > 7200 => Self::LearningChampion,
            (c, s) if c >= 3 && s > 3600 => Self::MasterLearner,
            (c, s) if c >= 2 && s > 1800 => Self::AdvancedStudent,
            (c, s) if c >= 1 && s > 600 => Self::DedicatedLearner,
            (_, s) if s > 300 => Self::GettingStarted,
            _ => Self::NewExplorer,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::NewExplorer => "New Explorer",
            Self::GettingStarted => "Getting Started",
            Self::DedicatedLearner => "Dedicated Learner",
            Self::AdvancedStudent => "Advanced Student",
            Self::MasterLearner => "Master Learner",
            Self::LearningChampion => "Learning Champion",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::NewExplorer => "Ready to start your learning journey",
            Self::GettingStarted => "Taking the first steps",
            Self::DedicatedLearner => "Building a study habit",
            Self::AdvancedStudent => "Studying across several courses",
            Self::MasterLearner => "Hours of focused study",
            Self::LearningChampion => "Outstanding dedication to learning",
        }
    }
}

impl fmt::Display for LearningBadge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Compact study time: `45s`, `12m`, `2h`, `2h 5m`
pub fn format_study_time(seconds: u64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    if hours > 0 {
        if minutes > 0 { format!("{}h {}m", hours, minutes) } else { format!("{}h", hours) }
    } else if minutes > 0 {
        format!("{}m", minutes)
    } else {
        format!("{}s", seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn badge_tiers() {
        assert_eq!(LearningBadge::for_learner(0, 0), LearningBadge::NewExplorer);
        assert_eq!(LearningBadge::for_learner(0, 301), LearningBadge::GettingStarted);
        assert_eq!(LearningBadge::for_learner(1, 601), LearningBadge::DedicatedLearner);
        assert_eq!(LearningBadge::for_learner(2, 1801), LearningBadge::AdvancedStudent);
        assert_eq!(LearningBadge::for_learner(3, 3601), LearningBadge::MasterLearner);
        assert_eq!(LearningBadge::for_learner(5, 7201), LearningBadge::LearningChampion);
    }

    #[test]
    fn badge_thresholds_are_exclusive() {
        assert_eq!(LearningBadge::for_learner(5, 7200), LearningBadge::MasterLearner);
        assert_eq!(LearningBadge::for_learner(0, 300), LearningBadge::NewExplorer);
        // Plenty of time but no courses
        assert_eq!(LearningBadge::for_learner(0, 10_000), LearningBadge::GettingStarted);
    }

    #[test]
    fn study_time_formats() {
        assert_eq!(format_study_time(0), "0s");
        assert_eq!(format_study_time(45), "45s");
        assert_eq!(format_study_time(12 * 60 + 30), "12m");
        assert_eq!(format_study_time(7200), "2h");
        assert_eq!(format_study_time(7200 + 5 * 60 + 9), "2h 5m");
    }
}
