// Free-text answer checking against an annotation's `Answer` field.

use std::collections::BTreeSet;

use anyhow::Result;
use regex::Regex;

const NUMERIC_TOLERANCE: f64 = 1e-9;

/// Splits raw answers like `"2, two"`, `"3/three"` or `"A or B"` into the
/// lowercased set of accepted forms.
#[derive(Debug, Clone)]
pub struct AnswerKey {
    split: Regex,
}

impl AnswerKey {
    pub fn new() -> Result<Self> {
        Ok(Self {
            split: Regex::new(r"(?i),|/|\bor\b")?,
        })
    }

    pub fn accepted(&self, raw: &str) -> BTreeSet<String> {
        self.split
            .split(raw.trim())
            .map(|t| t.trim().to_lowercase())
            .filter(|t| !t.is_empty())
            .collect()
    }

    /// Case-insensitive match, or numeric equality within 1e-9.
    pub fn is_correct(&self, user: &str, accepted: &BTreeSet<String>) -> bool {
        let norm = user.trim().to_lowercase();
        if accepted.contains(&norm) {
            return true;
        }
        let Some(n) = as_number(&norm) else {
            return false;
        };
        accepted
            .iter()
            .filter_map(|a| as_number(a))
            .any(|a| (a - n).abs() < NUMERIC_TOLERANCE)
    }

    pub fn check(&self, user: &str, raw_answer: &str) -> bool {
        self.is_correct(user, &self.accepted(raw_answer))
    }
}

fn as_number(s: &str) -> Option<f64> {
    if s.is_empty() {
        return None;
    }
    s.parse::<f64>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn accepted_forms() {
        let key = AnswerKey::new().unwrap();
        assert_eq!(key.accepted("2, two"), set(&["2", "two"]));
        assert_eq!(key.accepted("3/Three"), set(&["3", "three"]));
        assert_eq!(key.accepted("Red OR Blue"), set(&["red", "blue"]));
        assert!(key.accepted("  ").is_empty());
    }

    #[test]
    fn or_only_splits_whole_words() {
        let key = AnswerKey::new().unwrap();
        assert_eq!(key.accepted("Forest"), set(&["forest"]));
        assert_eq!(key.accepted("gold ore"), set(&["gold ore"]));
    }

    #[test]
    fn numeric_tolerance() {
        let key = AnswerKey::new().unwrap();
        let accepted = set(&["2", "two"]);
        assert!(key.is_correct("2.0", &accepted));
        assert!(key.is_correct(" TWO ", &accepted));
        assert!(!key.is_correct("three", &accepted));
        assert!(!key.is_correct("2.001", &accepted));
        assert!(!key.is_correct("", &accepted));
    }

    #[test]
    fn check_from_raw_answer() {
        let key = AnswerKey::new().unwrap();
        assert!(key.check("fifteen", "15 or fifteen"));
        assert!(key.check("15", "15 or fifteen"));
        assert!(!key.check("16", "15 or fifteen"));
    }
}
