//! Free-form duration labels
//!
//! Roadmap subtopics carry their estimated effort as a label like `"3 hours"`
//! or `"45 minutes"`. Progress weighting, the hardness-adjusted display and
//! chapter budgeting all read the number at the front of that label.

use once_cell::sync::Lazy;
use regex::Regex;

/// Leading number after any non-digit prefix, e.g. "~1.5 hours" -> "1.5"
static LEADING_NUMBER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\D*(\d+(?:\.\d+)?)").unwrap());

/// Any number inside a label (used to strip it and keep the unit)
static NUMBER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+(?:\.\d+)?").unwrap());

/// Integer weight of a duration label.
///
/// Leading non-digits are skipped and the integer prefix is taken, so
/// `"3 hours"` is 3 and `"1.5 hours"` is 1. Labels without a number weigh 0.
pub fn time_units(label: &str) -> u64 {
    let trimmed = label.trim_start_matches(|c: char| !c.is_ascii_digit());
    let digits: String = trimmed.chars().take_while(char::is_ascii_digit).collect();
    digits.parse().unwrap_or(0)
}

/// Decimal amount at the front of a duration label (0.0 when absent)
pub fn amount(label: &str) -> f64 {
    LEADING_NUMBER_RE
        .captures(label)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
        .unwrap_or(0.0)
}

/// The label with its number removed, e.g. `"3 hours"` -> `"hours"`
pub fn unit_suffix(label: &str) -> String {
    NUMBER_RE.replace(label, "").trim().to_string()
}

/// Total minutes a label stands for. Hour labels are converted, everything
/// else is taken as minutes already.
pub fn minutes(label: &str) -> f64 {
    let factor = if label.to_lowercase().contains("hour") { 60.0 } else { 1.0 };
    amount(label) * factor
}

/// Number embedded in a week label ("Week 10" -> 10)
pub fn week_number(label: &str) -> Option<u32> {
    LEADING_NUMBER_RE
        .captures(label)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().split('.').next())
        .and_then(|n| n.parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn time_units_takes_integer_prefix() {
        assert_eq!(time_units("3 hours"), 3);
        assert_eq!(time_units("1 hour"), 1);
        assert_eq!(time_units("1.5 hours"), 1);
        assert_eq!(time_units("about 20 minutes"), 20);
    }

    #[test]
    fn time_units_without_number_is_zero() {
        assert_eq!(time_units("a while"), 0);
        assert_eq!(time_units(""), 0);
    }

    #[test]
    fn amount_reads_decimals() {
        assert_eq!(amount("1.5 hours"), 1.5);
        assert_eq!(amount("45 minutes"), 45.0);
        assert_eq!(amount("soon"), 0.0);
    }

    #[test]
    fn unit_suffix_keeps_unit() {
        assert_eq!(unit_suffix("3 hours"), "hours");
        assert_eq!(unit_suffix("1.5 hours"), "hours");
        assert_eq!(unit_suffix("30min"), "min");
    }

    #[test]
    fn minutes_converts_hours() {
        assert_eq!(minutes("2 hours"), 120.0);
        assert_eq!(minutes("1 Hour"), 60.0);
        assert_eq!(minutes("40 minutes"), 40.0);
    }

    #[test]
    fn week_number_parses_label() {
        assert_eq!(week_number("Week 1"), Some(1));
        assert_eq!(week_number("week 12"), Some(12));
        assert_eq!(week_number("Intro"), None);
    }
}
