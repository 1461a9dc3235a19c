//! Typed access to the persisted records
//!
//! Every read goes through an accessor that returns a typed record with
//! defaults applied; raw JSON never leaves this module.

use std::collections::HashSet;

use serde::Serialize;
use serde::de::DeserializeOwned;

use super::error::StoreError;
use super::keys;
use super::kv::KeyValueStore;
use crate::hardness::{HardnessBounds, HardnessIndex};
use crate::model::quiz;
use crate::model::{
    LearningProgress, Question, QuizCache, QuizRecord, QuizStats, Roadmap, Roadmaps, Topic, Topics,
};

/// Number of avatar styles the profile cycles through
pub const AVATAR_STYLES: u8 = 3;

/// The signed-in user as remembered locally
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserIdentity {
    pub email: String,
    pub name: String,
}

/// Typed repository over a key-value store
#[derive(Debug)]
pub struct Repository<S> {
    store: S,
}

impl<S: KeyValueStore> Repository<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Access the underlying store
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Read a JSON record, falling back to its default when absent
    fn read<T: DeserializeOwned + Default>(&self, key: &str) -> Result<T, StoreError> {
        match self.store.get(key)? {
            Some(raw) => serde_json::from_str(&raw).map_err(|e| StoreError::record(key, e)),
            None => Ok(T::default()),
        }
    }

    /// Write a JSON record
    fn write<T: Serialize>(&mut self, key: &str, value: &T) -> Result<(), StoreError> {
        let raw = serde_json::to_string(value).map_err(|e| StoreError::record(key, e))?;
        self.store.set(key, raw)
    }

    // Topics and roadmaps

    pub fn topics(&self) -> Result<Topics, StoreError> {
        self.read(keys::TOPICS)
    }

    pub fn save_topics(&mut self, topics: &Topics) -> Result<(), StoreError> {
        self.write(keys::TOPICS, topics)
    }

    pub fn topic(&self, name: &str) -> Result<Option<Topic>, StoreError> {
        Ok(self.topics()?.remove(name))
    }

    pub fn roadmaps(&self) -> Result<Roadmaps, StoreError> {
        self.read(keys::ROADMAPS)
    }

    pub fn save_roadmaps(&mut self, roadmaps: &Roadmaps) -> Result<(), StoreError> {
        self.write(keys::ROADMAPS, roadmaps)
    }

    pub fn roadmap(&self, topic: &str) -> Result<Option<Roadmap>, StoreError> {
        Ok(self.roadmaps()?.remove(topic))
    }

    /// Whether both the topic details and its roadmap are stored
    pub fn is_enrolled(&self, topic: &str) -> Result<bool, StoreError> {
        Ok(self.topics()?.contains_key(topic) && self.roadmaps()?.contains_key(topic))
    }

    /// Store a newly generated roadmap together with its topic details
    pub fn enroll(&mut self, name: &str, topic: Topic, roadmap: Roadmap) -> Result<(), StoreError> {
        let mut topics = self.topics()?;
        topics.insert(name.to_string(), topic);
        self.save_topics(&topics)?;

        let mut roadmaps = self.roadmaps()?;
        roadmaps.insert(name.to_string(), roadmap);
        self.save_roadmaps(&roadmaps)?;

        tracing::info!(topic = %name, "Enrolled topic");
        Ok(())
    }

    // Quizzes

    pub fn quiz_stats(&self) -> Result<QuizStats, StoreError> {
        self.read(keys::QUIZ_STATS)
    }

    pub fn save_quiz_stats(&mut self, stats: &QuizStats) -> Result<(), StoreError> {
        self.write(keys::QUIZ_STATS, stats)
    }

    pub fn quiz_cache(&self) -> Result<QuizCache, StoreError> {
        self.read(keys::QUIZZES)
    }

    /// Questions cached for a subtopic, if any
    pub fn cached_quiz(
        &self,
        topic: &str,
        week: u32,
        subtopic: u32,
    ) -> Result<Option<Vec<Question>>, StoreError> {
        let cache = self.quiz_cache()?;
        Ok(quiz::lookup(&cache, topic, week, subtopic).cloned())
    }

    /// Cache questions fetched for a subtopic
    pub fn cache_quiz(
        &mut self,
        topic: &str,
        week: u32,
        subtopic: u32,
        questions: Vec<Question>,
    ) -> Result<(), StoreError> {
        let mut cache = self.quiz_cache()?;
        quiz::insert(&mut cache, topic, week, subtopic, questions);
        self.write(keys::QUIZZES, &cache)
    }

    /// Record a submitted quiz and fold its outcome into the hardness index.
    ///
    /// A re-submission for the same position overwrites the earlier record.
    pub fn record_quiz(
        &mut self,
        topic: &str,
        week: u32,
        subtopic: u32,
        record: QuizRecord,
        bounds: &HardnessBounds,
    ) -> Result<HardnessIndex, StoreError> {
        let mut index = self.hardness_index()?;
        let delta =
            index.apply_quiz_outcome(record.num_correct, record.num_ques, record.time_taken, bounds);

        let mut stats = self.quiz_stats()?;
        quiz::insert(&mut stats, topic, week, subtopic, record);

        // The record goes first so a failed write never moves the index alone
        self.save_quiz_stats(&stats)?;
        self.save_hardness_index(index)?;

        tracing::info!(topic = %topic, week, subtopic, delta, index = index.value(), "Recorded quiz");
        Ok(index)
    }

    // Hardness index

    /// Current hardness index. Missing or unreadable values read as neutral.
    pub fn hardness_index(&self) -> Result<HardnessIndex, StoreError> {
        let stored = self.store.get(keys::HARDNESS_INDEX)?;
        Ok(match stored {
            Some(raw) => HardnessIndex::parse(&raw).unwrap_or_else(|| {
                tracing::warn!(value = %raw, "Ignoring unreadable hardness index");
                HardnessIndex::default()
            }),
            None => HardnessIndex::default(),
        })
    }

    pub fn save_hardness_index(&mut self, index: HardnessIndex) -> Result<(), StoreError> {
        self.store.set(keys::HARDNESS_INDEX, index.value().to_string())
    }

    /// Apply a manual difficulty rating (1..=10) and persist the new index
    pub fn rate_hardness(
        &mut self,
        rating: i64,
        bounds: &HardnessBounds,
    ) -> Result<HardnessIndex, StoreError> {
        let mut index = self.hardness_index()?;
        index.apply_manual_rating(rating, bounds)?;
        self.save_hardness_index(index)?;
        tracing::info!(rating, index = index.value(), "Applied hardness rating");
        Ok(index)
    }

    // Learning progress

    pub fn learning_progress(
        &self,
        course: &str,
        subtopic: &str,
    ) -> Result<LearningProgress, StoreError> {
        self.read(&keys::learning_progress(course, subtopic))
    }

    pub fn save_learning_progress(
        &mut self,
        course: &str,
        subtopic: &str,
        progress: &LearningProgress,
    ) -> Result<(), StoreError> {
        self.write(&keys::learning_progress(course, subtopic), progress)
    }

    /// Learning progress keys that belong to `topic`.
    ///
    /// A key like `learning_progress_Rust_Async_x` matches the prefix of
    /// both "Rust" and "Rust_Async". It is attributed to the longest known
    /// topic name, unless it is exactly the key of a subtopic on another
    /// roadmap.
    fn learning_progress_keys_of(&self, topic: &str) -> Result<Vec<String>, StoreError> {
        let prefix = keys::learning_progress_prefix(topic);
        let roadmaps = self.roadmaps()?;
        let mut known: Vec<String> = self.topics()?.into_keys().collect();
        known.extend(roadmaps.keys().cloned());

        let owned_elsewhere: HashSet<String> = roadmaps
            .iter()
            .filter(|(other, _)| other.as_str() != topic)
            .flat_map(|(other, roadmap)| {
                roadmap
                    .subtopics()
                    .into_iter()
                    .map(move |r| keys::learning_progress(other, &r.subtopic.subtopic))
            })
            .collect();

        let longer_prefixes: Vec<String> = known
            .iter()
            .filter(|other| other.as_str() != topic)
            .map(|other| keys::learning_progress_prefix(other))
            .filter(|p| p.len() > prefix.len() && p.starts_with(&prefix))
            .collect();

        Ok(self
            .store
            .keys()?
            .into_iter()
            .filter(|key| key.starts_with(&prefix))
            .filter(|key| !longer_prefixes.iter().any(|p| key.starts_with(p.as_str())))
            .filter(|key| !owned_elsewhere.contains(key))
            .collect())
    }

    /// Delete a topic and everything recorded for it.
    ///
    /// Removes the topic details, roadmap, quiz records, cached quizzes and
    /// every learning progress record of the topic. Returns whether anything
    /// was stored for it.
    pub fn delete_topic(&mut self, topic: &str) -> Result<bool, StoreError> {
        let mut progress_keys = self.learning_progress_keys_of(topic)?;
        if let Some(roadmap) = self.roadmap(topic)? {
            for r in roadmap.subtopics() {
                let key = keys::learning_progress(topic, &r.subtopic.subtopic);
                if !progress_keys.contains(&key) {
                    progress_keys.push(key);
                }
            }
        }

        let mut removed = false;
        for key in &progress_keys {
            removed |= self.store.remove(key)?;
        }

        let mut topics = self.topics()?;
        if topics.remove(topic).is_some() {
            removed = true;
            self.save_topics(&topics)?;
        }

        let mut roadmaps = self.roadmaps()?;
        if roadmaps.remove(topic).is_some() {
            removed = true;
            self.save_roadmaps(&roadmaps)?;
        }

        let mut stats = self.quiz_stats()?;
        if stats.remove(topic).is_some() {
            removed = true;
            self.save_quiz_stats(&stats)?;
        }

        let mut cache = self.quiz_cache()?;
        if cache.remove(topic).is_some() {
            removed = true;
            self.write(keys::QUIZZES, &cache)?;
        }

        tracing::info!(topic = %topic, progress_records = progress_keys.len(), removed, "Deleted topic");
        Ok(removed)
    }

    // User session

    /// Remember the signed-in user
    pub fn login_user(&mut self, user: &UserIdentity) -> Result<(), StoreError> {
        self.store.set(keys::USER_LOGGED_IN, "true".to_string())?;
        self.store.set(keys::USER_EMAIL, user.email.clone())?;
        self.store.set(keys::USER_NAME, user.name.clone())
    }

    /// Forget the signed-in user
    pub fn logout(&mut self) -> Result<(), StoreError> {
        self.store.remove(keys::USER_LOGGED_IN)?;
        self.store.remove(keys::USER_EMAIL)?;
        self.store.remove(keys::USER_NAME)?;
        Ok(())
    }

    /// The signed-in user, if any
    pub fn current_user(&self) -> Result<Option<UserIdentity>, StoreError> {
        if self.store.get(keys::USER_LOGGED_IN)?.as_deref() != Some("true") {
            return Ok(None);
        }
        let email = self.store.get(keys::USER_EMAIL)?.unwrap_or_default();
        let name = self.store.get(keys::USER_NAME)?.unwrap_or_default();
        Ok(Some(UserIdentity { email, name }))
    }

    // Avatar

    pub fn avatar_style(&self) -> Result<u8, StoreError> {
        Ok(self
            .store
            .get(keys::USER_AVATAR_STYLE)?
            .and_then(|raw| raw.trim().parse::<u8>().ok())
            .map_or(0, |style| style % AVATAR_STYLES))
    }

    /// Advance to the next avatar style and persist it
    pub fn cycle_avatar_style(&mut self) -> Result<u8, StoreError> {
        let next = (self.avatar_style()? + 1) % AVATAR_STYLES;
        self.store.set(keys::USER_AVATAR_STYLE, next.to_string())?;
        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{KnowledgeLevel, Subtopic, Week};
    use crate::store::MemoryStore;
    use pretty_assertions::assert_eq;

    fn roadmap(subtopics: &[&str]) -> Roadmap {
        Roadmap::from_weeks([(
            "Week 1".to_string(),
            Week {
                topic: "Basics".into(),
                subtopics: subtopics.iter().map(|s| Subtopic::new(*s, "desc", "1 hour")).collect(),
            },
        )])
    }

    fn topic() -> Topic {
        Topic { time: "4 Weeks".into(), knowledge_level: KnowledgeLevel::Beginner }
    }

    fn record(correct: u32, total: u32) -> QuizRecord {
        QuizRecord { num_correct: correct, num_ques: total, time_taken: 60_000, timestamp: None }
    }

    fn repo() -> Repository<MemoryStore> {
        Repository::new(MemoryStore::new())
    }

    #[test]
    fn empty_store_reads_defaults() {
        let repo = repo();
        assert!(repo.topics().unwrap().is_empty());
        assert!(repo.roadmaps().unwrap().is_empty());
        assert!(repo.quiz_stats().unwrap().is_empty());
        assert_eq!(repo.hardness_index().unwrap().value(), 1.0);
        assert_eq!(repo.learning_progress("Rust", "Syntax").unwrap(), LearningProgress::default());
    }

    #[test]
    fn malformed_record_names_key() {
        let mut store = MemoryStore::new();
        store.set("topics", "[1,2".into()).unwrap();
        let repo = Repository::new(store);
        match repo.topics() {
            Err(StoreError::Record { key, .. }) => assert_eq!(key, "topics"),
            other => panic!("expected record error, got {:?}", other),
        }
    }

    #[test]
    fn enroll_stores_topic_and_roadmap() {
        let mut repo = repo();
        repo.enroll("Rust", topic(), roadmap(&["Syntax"])).unwrap();
        assert!(repo.is_enrolled("Rust").unwrap());
        assert_eq!(repo.topic("Rust").unwrap(), Some(topic()));
        assert!(!repo.is_enrolled("Go").unwrap());
    }

    #[test]
    fn record_quiz_updates_stats_and_hardness() {
        let mut repo = repo();
        let bounds = HardnessBounds::default();

        let index = repo.record_quiz("Rust", 1, 1, record(4, 4), &bounds).unwrap();
        assert_eq!(index.value(), 1.0);

        // 2 of 4 wrong in 20 minutes: +0.25
        let slow = QuizRecord { time_taken: 20 * 60_000, ..record(2, 4) };
        let index = repo.record_quiz("Rust", 1, 1, slow, &bounds).unwrap();
        assert!((index.value() - 1.25).abs() < 1e-9);

        let stats = repo.quiz_stats().unwrap();
        assert_eq!(quiz::lookup(&stats, "Rust", 1, 1).unwrap().num_correct, 2);
        assert!((repo.hardness_index().unwrap().value() - 1.25).abs() < 1e-9);
    }

    /// Memory store whose writes to one key fail
    struct FailingWrites {
        inner: MemoryStore,
        key: &'static str,
    }

    impl KeyValueStore for FailingWrites {
        fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
            self.inner.get(key)
        }

        fn set(&mut self, key: &str, value: String) -> Result<(), StoreError> {
            if key == self.key {
                return Err(StoreError::Io {
                    path: "store.json".into(),
                    source: std::io::Error::other("disk full"),
                });
            }
            self.inner.set(key, value)
        }

        fn remove(&mut self, key: &str) -> Result<bool, StoreError> {
            self.inner.remove(key)
        }

        fn keys(&self) -> Result<Vec<String>, StoreError> {
            self.inner.keys()
        }
    }

    #[test]
    fn failed_quiz_record_leaves_hardness_alone() {
        let store = FailingWrites { inner: MemoryStore::new(), key: keys::QUIZ_STATS };
        let mut repo = Repository::new(store);
        let slow = QuizRecord { time_taken: 20 * 60_000, ..record(2, 4) };

        assert!(repo.record_quiz("Rust", 1, 1, slow, &HardnessBounds::default()).is_err());
        assert_eq!(repo.hardness_index().unwrap().value(), 1.0);
        assert!(repo.store().get(keys::HARDNESS_INDEX).unwrap().is_none());
    }

    #[test]
    fn rate_hardness_persists_and_validates() {
        let mut repo = repo();
        let bounds = HardnessBounds::default();
        let index = repo.rate_hardness(10, &bounds).unwrap();
        assert_eq!(index.value(), 1.5);
        assert!(matches!(repo.rate_hardness(42, &bounds), Err(StoreError::Invalid(_))));
        assert_eq!(repo.hardness_index().unwrap().value(), 1.5);
    }

    #[test]
    fn quiz_cache_round_trip() {
        let mut repo = repo();
        let questions = vec![Question {
            question: "?".into(),
            options: vec!["a".into(), "b".into()],
            answer_index: 0,
            reason: String::new(),
        }];
        assert!(repo.cached_quiz("Rust", 1, 1).unwrap().is_none());
        repo.cache_quiz("Rust", 1, 1, questions.clone()).unwrap();
        assert_eq!(repo.cached_quiz("Rust", 1, 1).unwrap(), Some(questions));
    }

    #[test]
    fn delete_topic_cascades() {
        let mut repo = repo();
        let bounds = HardnessBounds::default();
        repo.enroll("Rust", topic(), roadmap(&["Syntax", "Tooling"])).unwrap();
        repo.enroll("Go", topic(), roadmap(&["Syntax"])).unwrap();
        repo.record_quiz("Rust", 1, 1, record(1, 1), &bounds).unwrap();
        repo.record_quiz("Go", 1, 1, record(1, 1), &bounds).unwrap();

        let progress = LearningProgress { study_time: 30, ..Default::default() };
        repo.save_learning_progress("Rust", "Syntax", &progress).unwrap();
        repo.save_learning_progress("Rust", "Tooling", &progress).unwrap();
        // Left behind by a roadmap that no longer lists this subtopic
        repo.save_learning_progress("Rust", "Macros", &progress).unwrap();
        repo.save_learning_progress("Go", "Syntax", &progress).unwrap();

        assert!(repo.delete_topic("Rust").unwrap());

        assert!(!repo.topics().unwrap().contains_key("Rust"));
        assert!(!repo.roadmaps().unwrap().contains_key("Rust"));
        assert!(!repo.quiz_stats().unwrap().contains_key("Rust"));
        let keys = repo.store().keys().unwrap();
        assert!(!keys.iter().any(|k| k.starts_with("learning_progress_Rust_")));

        assert!(repo.is_enrolled("Go").unwrap());
        assert!(repo.quiz_stats().unwrap().contains_key("Go"));
        assert_eq!(repo.learning_progress("Go", "Syntax").unwrap().study_time, 30);
    }

    #[test]
    fn delete_topic_keeps_records_of_longer_topic_names() {
        let mut repo = repo();
        repo.enroll("Rust", topic(), roadmap(&["Syntax"])).unwrap();
        repo.enroll("Rust_Async", topic(), roadmap(&["Futures"])).unwrap();
        let progress = LearningProgress { study_time: 5, ..Default::default() };
        repo.save_learning_progress("Rust", "Syntax", &progress).unwrap();
        repo.save_learning_progress("Rust_Async", "Futures", &progress).unwrap();

        repo.delete_topic("Rust").unwrap();

        assert_eq!(repo.learning_progress("Rust", "Syntax").unwrap(), LearningProgress::default());
        assert_eq!(repo.learning_progress("Rust_Async", "Futures").unwrap().study_time, 5);
    }

    #[test]
    fn delete_topic_keeps_subtopic_records_of_shorter_topic_names() {
        let mut repo = repo();
        repo.enroll("Rust", topic(), roadmap(&["Async_basics"])).unwrap();
        repo.enroll("Rust_Async", topic(), roadmap(&["Futures"])).unwrap();
        let progress = LearningProgress { study_time: 99, ..Default::default() };
        repo.save_learning_progress("Rust", "Async_basics", &progress).unwrap();
        repo.save_learning_progress("Rust_Async", "Futures", &progress).unwrap();

        repo.delete_topic("Rust_Async").unwrap();

        assert_eq!(repo.learning_progress("Rust", "Async_basics").unwrap().study_time, 99);
        assert_eq!(
            repo.learning_progress("Rust_Async", "Futures").unwrap(),
            LearningProgress::default()
        );
    }

    #[test]
    fn delete_unknown_topic_reports_nothing_removed() {
        let mut repo = repo();
        assert!(!repo.delete_topic("Nope").unwrap());
    }

    #[test]
    fn user_session_round_trip() {
        let mut repo = repo();
        assert!(repo.current_user().unwrap().is_none());

        let user = UserIdentity { email: "ada@example.com".into(), name: "Ada".into() };
        repo.login_user(&user).unwrap();
        assert_eq!(repo.current_user().unwrap(), Some(user));

        repo.logout().unwrap();
        assert!(repo.current_user().unwrap().is_none());
    }

    #[test]
    fn avatar_style_cycles() {
        let mut repo = repo();
        assert_eq!(repo.avatar_style().unwrap(), 0);
        assert_eq!(repo.cycle_avatar_style().unwrap(), 1);
        assert_eq!(repo.cycle_avatar_style().unwrap(), 2);
        assert_eq!(repo.cycle_avatar_style().unwrap(), 0);
    }
}
