//! Hardness index
//!
//! A single multiplier that rescales the displayed duration of every
//! subtopic. Learners nudge it with explicit difficulty ratings, and every
//! submitted quiz pushes it up in proportion to wrong answers and time spent.

use serde::{Deserialize, Serialize};

use crate::model::ValidationError;
use crate::model::duration;

/// Baseline time budget per question in milliseconds (5 minutes)
const BASELINE_MS_PER_QUESTION: f64 = 5.0 * 60_000.0;

/// Allowed range of the hardness index
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HardnessBounds {
    pub min: f64,
    pub max: f64,
}

impl Default for HardnessBounds {
    fn default() -> Self {
        Self { min: 0.1, max: 5.0 }
    }
}

impl HardnessBounds {
    pub fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.min, self.max)
    }
}

/// The persisted difficulty multiplier
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HardnessIndex(f64);

impl Default for HardnessIndex {
    fn default() -> Self {
        Self(Self::NEUTRAL)
    }
}

impl HardnessIndex {
    /// Value of a fresh index
    pub const NEUTRAL: f64 = 1.0;

    pub fn new(value: f64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> f64 {
        self.0
    }

    /// Parse a stored value. Zero, non-finite and unparsable values are
    /// treated as unset.
    pub fn parse(stored: &str) -> Option<Self> {
        let value: f64 = stored.trim().parse().ok()?;
        (value.is_finite() && value != 0.0).then_some(Self(value))
    }

    /// Change caused by a manual rating on the 1..=10 scale (5 is neutral)
    pub fn manual_rating_delta(rating: i64) -> Result<f64, ValidationError> {
        if !(1..=10).contains(&rating) {
            return Err(ValidationError::RatingOutOfRange(rating));
        }
        Ok((rating - 5) as f64 / 10.0)
    }

    /// Change caused by a submitted quiz.
    ///
    /// `((q - c) / 2q) * (t / (5min * q))`: both factors are non-negative, so
    /// a quiz can only make things look harder. An empty quiz changes
    /// nothing.
    pub fn quiz_outcome_delta(num_correct: u32, num_questions: u32, time_taken_ms: u64) -> f64 {
        if num_questions == 0 {
            return 0.0;
        }
        let q = f64::from(num_questions);
        let wrong = f64::from(num_questions.saturating_sub(num_correct));
        (wrong / (q * 2.0)) * (time_taken_ms as f64 / (BASELINE_MS_PER_QUESTION * q))
    }

    /// Apply a manual rating, returning the delta that was added
    pub fn apply_manual_rating(
        &mut self,
        rating: i64,
        bounds: &HardnessBounds,
    ) -> Result<f64, ValidationError> {
        let delta = Self::manual_rating_delta(rating)?;
        self.add(delta, bounds);
        Ok(delta)
    }

    /// Apply a quiz outcome, returning the delta that was added
    pub fn apply_quiz_outcome(
        &mut self,
        num_correct: u32,
        num_questions: u32,
        time_taken_ms: u64,
        bounds: &HardnessBounds,
    ) -> f64 {
        let delta = Self::quiz_outcome_delta(num_correct, num_questions, time_taken_ms);
        self.add(delta, bounds);
        delta
    }

    fn add(&mut self, delta: f64, bounds: &HardnessBounds) {
        if delta != 0.0 {
            self.0 = bounds.clamp(self.0 + delta);
        }
    }

    /// Duration label rescaled by the index, e.g. "3 hours" -> "3.3 hours"
    pub fn displayed_duration(&self, label: &str) -> String {
        let scaled = duration::amount(label) * self.0;
        let unit = duration::unit_suffix(label);
        if unit.is_empty() { format!("{:.1}", scaled) } else { format!("{:.1} {}", scaled, unit) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn neutral_rating_is_noop() {
        let mut index = HardnessIndex::default();
        let delta = index.apply_manual_rating(5, &HardnessBounds::default()).unwrap();
        assert_eq!(delta, 0.0);
        assert_eq!(index.value(), 1.0);
    }

    #[test]
    fn extreme_ratings() {
        let bounds = HardnessBounds::default();

        let mut index = HardnessIndex::default();
        assert_eq!(index.apply_manual_rating(10, &bounds).unwrap(), 0.5);
        assert!(approx(index.value(), 1.5));

        let mut index = HardnessIndex::default();
        assert_eq!(index.apply_manual_rating(1, &bounds).unwrap(), -0.4);
        assert!(approx(index.value(), 0.6));
    }

    #[test]
    fn rating_out_of_range_is_rejected() {
        let mut index = HardnessIndex::default();
        let bounds = HardnessBounds::default();
        assert_eq!(
            index.apply_manual_rating(0, &bounds),
            Err(ValidationError::RatingOutOfRange(0))
        );
        assert_eq!(
            index.apply_manual_rating(11, &bounds),
            Err(ValidationError::RatingOutOfRange(11))
        );
        assert_eq!(index.value(), 1.0);
    }

    #[test]
    fn quiz_outcome_formula() {
        // 2 of 4 wrong, 20 minutes for 4 questions (exactly the baseline)
        let delta = HardnessIndex::quiz_outcome_delta(2, 4, 20 * 60_000);
        assert!(approx(delta, 0.25));
    }

    #[test]
    fn empty_quiz_changes_nothing() {
        assert_eq!(HardnessIndex::quiz_outcome_delta(0, 0, 10_000), 0.0);
    }

    #[test]
    fn index_is_clamped() {
        let bounds = HardnessBounds { min: 0.5, max: 1.2 };
        let mut index = HardnessIndex::default();
        index.apply_manual_rating(10, &bounds).unwrap();
        assert_eq!(index.value(), 1.2);
        index.apply_manual_rating(1, &bounds).unwrap();
        index.apply_manual_rating(1, &bounds).unwrap();
        assert_eq!(index.value(), 0.5);
    }

    #[test]
    fn parse_stored_values() {
        assert_eq!(HardnessIndex::parse("1.25"), Some(HardnessIndex::new(1.25)));
        assert_eq!(HardnessIndex::parse("0"), None);
        assert_eq!(HardnessIndex::parse("NaN"), None);
        assert_eq!(HardnessIndex::parse("abc"), None);
    }

    #[test]
    fn displayed_duration_scales_and_keeps_unit() {
        let index = HardnessIndex::new(1.1);
        assert_eq!(index.displayed_duration("3 hours"), "3.3 hours");
        assert_eq!(HardnessIndex::default().displayed_duration("45 minutes"), "45.0 minutes");
        assert_eq!(HardnessIndex::default().displayed_duration("2"), "2.0");
    }

    proptest! {
        #[test]
        fn all_correct_quiz_never_moves_index(q in 1u32..50, t in 0u64..10_000_000) {
            prop_assert_eq!(HardnessIndex::quiz_outcome_delta(q, q, t), 0.0);
        }

        #[test]
        fn quiz_delta_is_never_negative(q in 1u32..50, c in 0u32..50, t in 0u64..10_000_000) {
            let c = c.min(q);
            prop_assert!(HardnessIndex::quiz_outcome_delta(c, q, t) >= 0.0);
        }
    }
}
