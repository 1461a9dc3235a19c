//! Enrolled topics and the details chosen when they were created

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::validation::ValidationError;

/// How much the learner already knows about a topic
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum KnowledgeLevel {
    #[default]
    #[serde(rename = "Absolute Beginner")]
    AbsoluteBeginner,
    Beginner,
    Moderate,
    Expert,
}

impl KnowledgeLevel {
    /// Label sent to the backend and shown to the user
    pub fn label(&self) -> &'static str {
        match self {
            Self::AbsoluteBeginner => "Absolute Beginner",
            Self::Beginner => "Beginner",
            Self::Moderate => "Moderate",
            Self::Expert => "Expert",
        }
    }

    /// Parse from a CLI-friendly name
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().replace(['-', '_'], " ").trim() {
            "absolute beginner" | "absolute" | "novice" => Some(Self::AbsoluteBeginner),
            "beginner" => Some(Self::Beginner),
            "moderate" | "intermediate" => Some(Self::Moderate),
            "expert" | "advanced" => Some(Self::Expert),
            _ => None,
        }
    }
}

impl fmt::Display for KnowledgeLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl std::str::FromStr for KnowledgeLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| {
            format!("Unknown knowledge level: {}. Options: absolute, beginner, moderate, expert", s)
        })
    }
}

/// Details stored for an enrolled topic
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Topic {
    /// Duration label chosen at creation, e.g. "4 Weeks"
    pub time: String,
    /// Knowledge level chosen at creation
    pub knowledge_level: KnowledgeLevel,
}

/// All enrolled topics, keyed by topic name
pub type Topics = BTreeMap<String, Topic>;

/// Unit of a study plan length
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PlanUnit {
    #[default]
    Weeks,
    Months,
}

impl PlanUnit {
    fn label(&self) -> &'static str {
        match self {
            Self::Weeks => "Weeks",
            Self::Months => "Months",
        }
    }
}

/// Length of the study plan requested for a new roadmap
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StudyPlanLength {
    pub amount: u32,
    pub unit: PlanUnit,
}

impl StudyPlanLength {
    /// Largest amount the topic form accepts
    pub const MAX_AMOUNT: u32 = 100;

    /// Validate and build a plan length
    pub fn new(amount: u32, unit: PlanUnit) -> Result<Self, ValidationError> {
        if amount == 0 || amount > Self::MAX_AMOUNT {
            return Err(ValidationError::InvalidTimePeriod);
        }
        Ok(Self { amount, unit })
    }

    /// Parse a label such as "4 Weeks" or "2 months"
    pub fn parse(label: &str) -> Result<Self, ValidationError> {
        let mut parts = label.split_whitespace();
        let amount = parts
            .next()
            .and_then(|n| n.parse::<u32>().ok())
            .ok_or(ValidationError::InvalidTimePeriod)?;
        let unit = match parts.next().map(|u| u.to_lowercase()) {
            None => PlanUnit::Weeks,
            Some(u) if u.starts_with("week") => PlanUnit::Weeks,
            Some(u) if u.starts_with("month") => PlanUnit::Months,
            Some(_) => return Err(ValidationError::InvalidTimePeriod),
        };
        Self::new(amount, unit)
    }

    /// Label stored with the topic and sent to the backend
    pub fn label(&self) -> String {
        format!("{} {}", self.amount, self.unit.label())
    }
}

impl Default for StudyPlanLength {
    fn default() -> Self {
        Self { amount: 4, unit: PlanUnit::Weeks }
    }
}
