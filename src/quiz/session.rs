//! Quiz attempt state
//!
//! One session per attempt: it owns the questions, the start instant and the
//! learner's answers, and produces the record that is stored on submit.

use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::time::Instant;

use crate::model::{Question, QuizRecord};

/// Feedback for one answered question
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnswerFeedback {
    pub correct: bool,
    /// Index of the right option
    pub answer_index: usize,
    /// False when the question had already been answered and this answer
    /// was ignored
    pub counted: bool,
}

/// An attempt at a subtopic's quiz
#[derive(Debug, Clone)]
pub struct QuizSession {
    questions: Vec<Question>,
    answers: Vec<Option<usize>>,
    started: Instant,
    /// Elapsed time when the last unanswered question was answered
    completed_after: Option<Duration>,
    /// Question under the cursor
    selected: usize,
}

impl QuizSession {
    /// Start the clock on a new attempt
    pub fn start(questions: Vec<Question>) -> Self {
        let answers = vec![None; questions.len()];
        Self { questions, answers, started: Instant::now(), completed_after: None, selected: 0 }
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn answer_of(&self, question: usize) -> Option<usize> {
        self.answers.get(question).copied().flatten()
    }

    pub fn answered_count(&self) -> usize {
        self.answers.iter().filter(|a| a.is_some()).count()
    }

    pub fn correct_count(&self) -> usize {
        self.answers
            .iter()
            .zip(&self.questions)
            .filter(|(a, q)| a.is_some_and(|option| q.is_correct(option)))
            .count()
    }

    pub fn is_complete(&self) -> bool {
        self.answered_count() == self.questions.len()
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn select(&mut self, question: usize) {
        if question < self.questions.len() {
            self.selected = question;
        }
    }

    pub fn select_next(&mut self) {
        self.select(self.selected + 1);
    }

    pub fn select_previous(&mut self) {
        self.select(self.selected.saturating_sub(1));
    }

    /// Answer a question. Only the first answer to a question counts; the
    /// clock stops when the last open question is answered.
    pub fn answer(&mut self, question: usize, option: usize) -> Option<AnswerFeedback> {
        let q = self.questions.get(question)?;
        if option >= q.options.len() {
            return None;
        }
        let answer_index = q.answer_index;

        let slot = self.answers.get_mut(question)?;
        if let Some(first) = *slot {
            return Some(AnswerFeedback { correct: first == answer_index, answer_index, counted: false });
        }
        *slot = Some(option);

        if self.is_complete() && self.completed_after.is_none() {
            self.completed_after = Some(self.started.elapsed());
        }
        Some(AnswerFeedback { correct: option == answer_index, answer_index, counted: true })
    }

    /// Time spent so far, frozen once every question is answered
    pub fn elapsed(&self) -> Duration {
        self.completed_after.unwrap_or_else(|| self.started.elapsed())
    }

    /// Close the attempt. Unanswered questions count as wrong.
    pub fn finish(self, submitted_at: DateTime<Utc>) -> QuizOutcome {
        let num_correct = self.correct_count() as u32;
        let num_ques = self.questions.len() as u32;
        let time_taken = u64::try_from(self.elapsed().as_millis()).unwrap_or(u64::MAX);
        QuizOutcome {
            record: QuizRecord { num_correct, num_ques, time_taken, timestamp: Some(submitted_at) },
            unanswered: self.questions.len() - self.answered_count(),
        }
    }
}

/// Result of a finished attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizOutcome {
    pub record: QuizRecord,
    pub unanswered: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(answer_index: usize) -> Question {
        Question {
            question: "Which?".into(),
            options: vec!["a".into(), "b".into(), "c".into()],
            answer_index,
            reason: "because".into(),
        }
    }

    #[test]
    fn first_answer_counts() {
        let mut quiz = QuizSession::start(vec![question(1), question(2)]);
        let feedback = quiz.answer(0, 0).unwrap();
        assert!(!feedback.correct);
        assert!(feedback.counted);

        let again = quiz.answer(0, 1).unwrap();
        assert!(!again.counted);
        assert!(!again.correct);
        assert_eq!(quiz.correct_count(), 0);
        assert_eq!(quiz.answer_of(0), Some(0));
    }

    #[test]
    fn invalid_answers_are_ignored() {
        let mut quiz = QuizSession::start(vec![question(0)]);
        assert_eq!(quiz.answer(5, 0), None);
        assert_eq!(quiz.answer(0, 3), None);
        assert_eq!(quiz.answered_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn clock_stops_at_last_answer() {
        let mut quiz = QuizSession::start(vec![question(0), question(1)]);
        tokio::time::advance(Duration::from_secs(10)).await;
        quiz.answer(0, 0);
        tokio::time::advance(Duration::from_secs(20)).await;
        quiz.answer(1, 1);
        assert!(quiz.is_complete());
        tokio::time::advance(Duration::from_secs(60)).await;

        let outcome = quiz.finish(Utc::now());
        assert_eq!(outcome.record.num_correct, 2);
        assert_eq!(outcome.record.num_ques, 2);
        assert_eq!(outcome.record.time_taken, 30_000);
        assert_eq!(outcome.unanswered, 0);
        assert!(outcome.record.timestamp.is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn early_submit_uses_time_so_far() {
        let mut quiz = QuizSession::start(vec![question(0), question(1), question(2)]);
        quiz.answer(2, 2);
        tokio::time::advance(Duration::from_secs(45)).await;

        let outcome = quiz.finish(Utc::now());
        assert_eq!(outcome.record.num_correct, 1);
        assert_eq!(outcome.record.time_taken, 45_000);
        assert_eq!(outcome.unanswered, 2);
    }

    #[test]
    fn selection_stays_in_bounds() {
        let mut quiz = QuizSession::start(vec![question(0), question(0)]);
        quiz.select_previous();
        assert_eq!(quiz.selected(), 0);
        quiz.select_next();
        quiz.select_next();
        assert_eq!(quiz.selected(), 1);
    }
}
