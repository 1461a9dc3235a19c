//! Request and response bodies of the learning backend

use serde::{Deserialize, Serialize};

use crate::model::{KnowledgeLevel, Question, Roadmap};

/// `{ "error": "..." }` as returned by failing endpoints
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

// Auth

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Learning totals the backend keeps per user
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Profile {
    pub learning_hours: f64,
    pub courses_completed: u32,
    pub achievements: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct User {
    pub email: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub profile: Option<Profile>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthResponse {
    #[serde(default)]
    pub message: Option<String>,
    pub user: User,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProfileResponse {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub profile: Profile,
}

// Roadmaps

#[derive(Debug, Clone, Serialize)]
pub struct RoadmapRequest {
    pub topic: String,
    /// Plan length label, e.g. "4 Weeks"
    pub time: String,
    pub knowledge_level: KnowledgeLevel,
}

/// The roadmap endpoint answers either with the roadmap itself or `{error}`
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RoadmapResponse {
    Failed(ErrorBody),
    Roadmap(Roadmap),
}

// Quizzes

#[derive(Debug, Clone, Serialize)]
pub struct QuizRequest {
    pub course: String,
    /// Theme of the subtopic's week
    pub topic: String,
    pub subtopic: String,
    pub description: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct QuizResponse {
    pub questions: Vec<Question>,
}

// Learning resources

/// Request type sent with every resource request
pub const STRUCTURED_LEARNING: &str = "structured_learning";

#[derive(Debug, Clone, Serialize)]
pub struct ResourceRequest {
    pub subtopic: String,
    pub description: String,
    pub time: String,
    pub course: String,
    pub knowledge_level: KnowledgeLevel,
    #[serde(rename = "requestType")]
    pub request_type: String,
    #[serde(rename = "timeInMinutes")]
    pub time_in_minutes: f64,
}

/// One chapter as supplied by the backend; missing fields come from the
/// local template
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ChapterPayload {
    pub title: Option<String>,
    pub duration: Option<u32>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub content: Option<String>,
}

/// Learning content in any of the shapes the backend produces
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ResourceContent {
    /// `{ "chapters": [...] }`
    Structured { chapters: Vec<ChapterPayload> },
    /// `{ "content": "..." }`
    Document { content: String },
    /// Plain markdown text
    Text(String),
}

impl ResourceContent {
    /// Parse a response body. Bodies that are not JSON are markdown text.
    pub fn from_body(body: &str) -> Self {
        serde_json::from_str(body).unwrap_or_else(|_| Self::Text(body.to_string()))
    }
}

// Admin

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdminSummary {
    pub total_learning_hours: f64,
    pub total_courses_completed: u64,
    pub total_achievements: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdminUser {
    pub email: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub learning_hours: f64,
    #[serde(default)]
    pub courses_completed: u32,
    #[serde(default)]
    pub achievements: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminUsersResponse {
    pub total_users: u64,
    #[serde(default)]
    pub summary: AdminSummary,
    #[serde(default)]
    pub users: Vec<AdminUser>,
}
