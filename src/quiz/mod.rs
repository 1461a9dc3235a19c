//! Quizzes
//!
//! [`QuizSession`] tracks one attempt; [`load_questions`] serves questions
//! from the local cache and only asks the backend on a miss.

pub mod session;

pub use session::{AnswerFeedback, QuizOutcome, QuizSession};

use anyhow::{Context, Result};

use crate::api::ApiClient;
use crate::api::models::QuizRequest;
use crate::model::Question;
use crate::store::{KeyValueStore, Repository};

/// Questions for a roadmap position, fetched and cached on first use
pub async fn load_questions<S: KeyValueStore>(
    repo: &mut Repository<S>,
    client: &ApiClient,
    topic: &str,
    week: u32,
    subtopic: u32,
) -> Result<Vec<Question>> {
    if let Some(questions) = repo.cached_quiz(topic, week, subtopic)? {
        tracing::debug!(topic, week, subtopic, "Quiz served from cache");
        return Ok(questions);
    }

    let roadmap = repo
        .roadmap(topic)?
        .with_context(|| format!("No roadmap stored for '{}'", topic))?;
    let position = roadmap
        .subtopic(week, subtopic)
        .with_context(|| format!("Week {} has no subtopic {}", week, subtopic))?;

    let request = QuizRequest {
        course: topic.to_string(),
        topic: position.week_topic.to_string(),
        subtopic: position.subtopic.subtopic.clone(),
        description: position.subtopic.description.clone(),
    };
    let questions = client
        .quiz(&request)
        .await
        .context("An error occurred while fetching the quiz. Please try again later")?;

    repo.cache_quiz(topic, week, subtopic, questions.clone())?;
    tracing::info!(topic, week, subtopic, count = questions.len(), "Fetched quiz");
    Ok(questions)
}
