//! Quiz questions and recorded quiz outcomes

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A multiple-choice question as generated by the backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub question: String,
    pub options: Vec<String>,
    /// Index of the correct option
    pub answer_index: usize,
    /// Explanation shown once the question is answered
    #[serde(default)]
    pub reason: String,
}

impl Question {
    pub fn is_correct(&self, option: usize) -> bool {
        option == self.answer_index
    }
}

/// Recorded outcome of one quiz attempt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizRecord {
    pub num_correct: u32,
    pub num_ques: u32,
    /// Time taken in milliseconds
    pub time_taken: u64,
    /// When the attempt was submitted (absent in records written by older
    /// front ends)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
}

impl QuizRecord {
    /// Share of correct answers in percent (0 for an empty quiz)
    pub fn percentage(&self) -> f64 {
        if self.num_ques == 0 {
            0.0
        } else {
            f64::from(self.num_correct) * 100.0 / f64::from(self.num_ques)
        }
    }

    /// Time taken in whole seconds
    pub fn seconds_taken(&self) -> u64 {
        self.time_taken.saturating_add(500) / 1000
    }
}

/// week number -> subtopic number -> value, both 1-based
pub type ByPosition<T> = BTreeMap<u32, BTreeMap<u32, T>>;

/// Quiz records: topic -> week -> subtopic -> record
pub type QuizStats = BTreeMap<String, ByPosition<QuizRecord>>;

/// Cached quiz questions: topic -> week -> subtopic -> questions
pub type QuizCache = BTreeMap<String, ByPosition<Vec<Question>>>;

/// Look up a value by topic and 1-based position
pub fn lookup<'a, T>(
    map: &'a BTreeMap<String, ByPosition<T>>,
    topic: &str,
    week: u32,
    subtopic: u32,
) -> Option<&'a T> {
    map.get(topic)?.get(&week)?.get(&subtopic)
}

/// Insert (or overwrite) a value at a topic and 1-based position
pub fn insert<T>(
    map: &mut BTreeMap<String, ByPosition<T>>,
    topic: &str,
    week: u32,
    subtopic: u32,
    value: T,
) {
    map.entry(topic.to_string()).or_default().entry(week).or_default().insert(subtopic, value);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn question_uses_camel_case() {
        let json = r#"{"question":"2+2?","options":["3","4"],"answerIndex":1,"reason":"math"}"#;
        let q: Question = serde_json::from_str(json).unwrap();
        assert!(q.is_correct(1));
        assert!(!q.is_correct(0));
    }

    #[test]
    fn quiz_stats_keys_are_numeric_strings() {
        let mut stats = QuizStats::new();
        insert(
            &mut stats,
            "Rust",
            1,
            2,
            QuizRecord { num_correct: 3, num_ques: 4, time_taken: 60_000, timestamp: None },
        );
        let json = serde_json::to_string(&stats).unwrap();
        assert_eq!(json, r#"{"Rust":{"1":{"2":{"numCorrect":3,"numQues":4,"timeTaken":60000}}}}"#);

        let back: QuizStats = serde_json::from_str(&json).unwrap();
        assert_eq!(lookup(&back, "Rust", 1, 2).unwrap().num_correct, 3);
        assert!(lookup(&back, "Rust", 2, 1).is_none());
    }

    #[test]
    fn percentage_guards_empty_quiz() {
        let record = QuizRecord { num_correct: 0, num_ques: 0, time_taken: 0, timestamp: None };
        assert_eq!(record.percentage(), 0.0);
        let record = QuizRecord { num_correct: 3, num_ques: 4, time_taken: 1_499, timestamp: None };
        assert_eq!(record.percentage(), 75.0);
        assert_eq!(record.seconds_taken(), 1);

        let stored = QuizRecord { time_taken: u64::MAX, ..record };
        assert_eq!(stored.seconds_taken(), u64::MAX / 1000);
    }

    #[test]
    fn resubmission_overwrites() {
        let mut stats = QuizStats::new();
        let first = QuizRecord { num_correct: 1, num_ques: 4, time_taken: 10, timestamp: None };
        let second = QuizRecord { num_correct: 4, num_ques: 4, time_taken: 20, timestamp: None };
        insert(&mut stats, "Rust", 1, 1, first);
        insert(&mut stats, "Rust", 1, 1, second.clone());
        assert_eq!(lookup(&stats, "Rust", 1, 1), Some(&second));
    }
}
