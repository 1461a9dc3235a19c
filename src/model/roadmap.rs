//! Week-by-week roadmaps generated by the backend

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::duration;

/// One subtopic in a week of the roadmap
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subtopic {
    /// Subtopic name
    pub subtopic: String,
    /// Short description used for quiz and resource generation
    #[serde(default)]
    pub description: String,
    /// Estimated effort label, e.g. "3 hours"
    #[serde(default)]
    pub time: String,
}

impl Subtopic {
    pub fn new(
        subtopic: impl Into<String>,
        description: impl Into<String>,
        time: impl Into<String>,
    ) -> Self {
        Self { subtopic: subtopic.into(), description: description.into(), time: time.into() }
    }

    /// Integer weight used by quiz progress
    pub fn time_units(&self) -> u64 {
        duration::time_units(&self.time)
    }
}

/// One week of the roadmap
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Week {
    /// Theme of the week
    #[serde(default)]
    pub topic: String,
    /// Subtopics in study order
    #[serde(default)]
    pub subtopics: Vec<Subtopic>,
}

/// A subtopic together with its 1-based position in the roadmap
#[derive(Debug, Clone, Copy)]
pub struct SubtopicRef<'a> {
    /// 1-based week number
    pub week: u32,
    /// 1-based subtopic number within the week
    pub number: u32,
    /// Week label as generated, e.g. "Week 1"
    pub week_label: &'a str,
    /// Theme of the week
    pub week_topic: &'a str,
    pub subtopic: &'a Subtopic,
}

/// A roadmap: week label -> week. Immutable once fetched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Roadmap {
    weeks: BTreeMap<String, Week>,
}

/// All roadmaps, keyed by topic name
pub type Roadmaps = BTreeMap<String, Roadmap>;

impl Roadmap {
    /// Build a roadmap from week labels and weeks
    pub fn from_weeks(weeks: impl IntoIterator<Item = (String, Week)>) -> Self {
        Self { weeks: weeks.into_iter().collect() }
    }

    /// Weeks in study order.
    ///
    /// Ordered by the number in the label so that "Week 10" follows
    /// "Week 9"; labels without a number come last, alphabetically.
    pub fn weeks(&self) -> Vec<(&str, &Week)> {
        let mut weeks: Vec<(&str, &Week)> =
            self.weeks.iter().map(|(label, week)| (label.as_str(), week)).collect();
        weeks.sort_by_key(|(label, _)| (duration::week_number(label).unwrap_or(u32::MAX), *label));
        weeks
    }

    /// Number of weeks
    pub fn week_count(&self) -> usize {
        self.weeks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weeks.is_empty()
    }

    /// Look up a week by its 1-based number
    pub fn week(&self, week: u32) -> Option<(&str, &Week)> {
        let index = usize::try_from(week).ok()?.checked_sub(1)?;
        self.weeks().get(index).copied()
    }

    /// Look up a subtopic by 1-based week and subtopic numbers
    pub fn subtopic(&self, week: u32, number: u32) -> Option<SubtopicRef<'_>> {
        let (week_label, w) = self.week(week)?;
        let index = usize::try_from(number).ok()?.checked_sub(1)?;
        let subtopic = w.subtopics.get(index)?;
        Some(SubtopicRef { week, number, week_label, week_topic: &w.topic, subtopic })
    }

    /// Every subtopic of every week, in study order
    pub fn subtopics(&self) -> Vec<SubtopicRef<'_>> {
        let mut refs = Vec::new();
        for (week_idx, (week_label, week)) in self.weeks().into_iter().enumerate() {
            for (sub_idx, subtopic) in week.subtopics.iter().enumerate() {
                refs.push(SubtopicRef {
                    week: week_idx as u32 + 1,
                    number: sub_idx as u32 + 1,
                    week_label,
                    week_topic: &week.topic,
                    subtopic,
                });
            }
        }
        refs
    }

    /// Find a subtopic by name
    pub fn find_subtopic(&self, name: &str) -> Option<SubtopicRef<'_>> {
        self.subtopics().into_iter().find(|r| r.subtopic.subtopic == name)
    }

    /// Total subtopic count across all weeks
    pub fn subtopic_count(&self) -> usize {
        self.weeks.values().map(|w| w.subtopics.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn week(topic: &str, subtopics: &[(&str, &str)]) -> Week {
        Week {
            topic: topic.into(),
            subtopics: subtopics.iter().map(|(name, time)| Subtopic::new(*name, "", *time)).collect(),
        }
    }

    fn sample() -> Roadmap {
        Roadmap::from_weeks([
            ("Week 10".to_string(), week("Wrap up", &[("Review", "1 hour")])),
            ("Week 2".to_string(), week("Ownership", &[("Borrowing", "2 hours")])),
            (
                "Week 1".to_string(),
                week("Basics", &[("Syntax", "3 hours"), ("Tooling", "1 hour")]),
            ),
        ])
    }

    #[test]
    fn weeks_are_numerically_ordered() {
        let roadmap = sample();
        let labels: Vec<&str> = roadmap.weeks().iter().map(|(l, _)| *l).collect();
        assert_eq!(labels, vec!["Week 1", "Week 2", "Week 10"]);
    }

    #[test]
    fn subtopic_lookup_is_one_based() {
        let roadmap = sample();
        let r = roadmap.subtopic(1, 2).unwrap();
        assert_eq!(r.subtopic.subtopic, "Tooling");
        assert_eq!(r.week_topic, "Basics");
        assert!(roadmap.subtopic(0, 1).is_none());
        assert!(roadmap.subtopic(1, 3).is_none());
        assert!(roadmap.subtopic(4, 1).is_none());
    }

    #[test]
    fn subtopics_enumerates_in_order() {
        let roadmap = sample();
        let positions: Vec<(u32, u32)> =
            roadmap.subtopics().iter().map(|r| (r.week, r.number)).collect();
        assert_eq!(positions, vec![(1, 1), (1, 2), (2, 1), (3, 1)]);
        assert_eq!(roadmap.subtopic_count(), 4);
    }

    #[test]
    fn deserializes_backend_shape() {
        let json = r#"{
            "Week 1": {
                "topic": "Basics",
                "subtopics": [
                    {"subtopic": "Syntax", "description": "Learn the syntax", "time": "3 hours"}
                ]
            }
        }"#;
        let roadmap: Roadmap = serde_json::from_str(json).unwrap();
        assert_eq!(roadmap.week_count(), 1);
        assert_eq!(roadmap.subtopic(1, 1).unwrap().subtopic.time_units(), 3);
    }

    #[test]
    fn find_subtopic_by_name() {
        let roadmap = sample();
        let found = roadmap.find_subtopic("Borrowing").unwrap();
        assert_eq!((found.week, found.number), (2, 1));
        assert!(roadmap.find_subtopic("Async").is_none());
    }
}
