//! Data model for topics, roadmaps, quizzes and learning progress
//!
//! These types mirror the JSON records the store keeps under its well-known
//! keys, so existing data stays readable.

pub mod duration;
pub mod progress;
pub mod quiz;
pub mod roadmap;
pub mod topic;
pub mod validation;

pub use progress::{CHAPTERS_PER_SUBTOPIC, LearningProgress};
pub use quiz::{Question, QuizCache, QuizRecord, QuizStats};
pub use roadmap::{Roadmap, Roadmaps, Subtopic, SubtopicRef, Week};
pub use topic::{KnowledgeLevel, PlanUnit, StudyPlanLength, Topic, Topics};
pub use validation::{LoginForm, RegistrationForm, ValidationError};
