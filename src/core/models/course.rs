//! Course record model

use super::GradeLabel;
use serde::{Deserialize, Serialize};

/// Code placeholders a transcript uses for "no value".
const PLACEHOLDERS: [&str; 2] = ["--", "-"];

/// One row of transcript or plan data
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CourseRecord {
    /// Serial number of the row within its semester (1-based on transcripts)
    pub serial: u64,

    /// Catalog code, possibly a `/`-separated list of cross-listed codes
    pub code: Option<String>,

    /// Course title
    pub title: Option<String>,

    /// Credits the student registered for
    pub credits_registered: Option<f64>,

    /// Grade, `None` for ungraded or planned rows
    pub grade: Option<GradeLabel>,

    /// Credits the transcript reports as earned
    pub credits_earned: Option<f64>,

    /// Grade points as reported by the transcript (informational)
    pub grade_points: Option<f64>,
}

impl CourseRecord {
    /// Create a record with code, title, registered credits and grade set.
    #[must_use]
    pub fn new(code: &str, title: &str, credits: f64, grade: Option<GradeLabel>) -> Self {
        Self {
            serial: 0,
            code: normalize_text(code),
            title: normalize_text(title),
            credits_registered: Some(credits),
            grade,
            credits_earned: None,
            grade_points: None,
        }
    }

    /// Identity used to detect retakes.
    ///
    /// The uppercased code when present, else the uppercased title, else `None`.
    #[must_use]
    pub fn identity(&self) -> Option<String> {
        identity_of(self.code.as_deref(), self.title.as_deref())
    }

    /// Credits that carry grade weight: registered if positive, else earned if positive.
    #[must_use]
    pub fn effective_credits(&self) -> f64 {
        [self.credits_registered, self.credits_earned]
            .into_iter()
            .flatten()
            .find(|c| *c > 0.0)
            .unwrap_or(0.0)
    }
}

/// Identity key for a code/title pair (see [`CourseRecord::identity`]).
#[must_use]
pub fn identity_of(code: Option<&str>, title: Option<&str>) -> Option<String> {
    code.and_then(normalize_text)
        .or_else(|| title.and_then(normalize_text))
        .map(|key| key.to_uppercase())
}

/// Trim `raw`, mapping blanks and placeholders to `None`.
#[must_use]
pub fn normalize_text(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || PLACEHOLDERS.contains(&trimmed) {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_creation() {
        let record = CourseRecord::new("CS-1101", "Intro to CS", 4.0, Some(GradeLabel::A));

        assert_eq!(record.code.as_deref(), Some("CS-1101"));
        assert_eq!(record.title.as_deref(), Some("Intro to CS"));
        assert_eq!(record.credits_registered, Some(4.0));
        assert_eq!(record.grade, Some(GradeLabel::A));
        assert!(record.credits_earned.is_none());
    }

    #[test]
    fn test_identity_prefers_code() {
        let record = CourseRecord::new(" cs-1101 ", "Intro", 4.0, None);
        assert_eq!(record.identity().as_deref(), Some("CS-1101"));
    }

    #[test]
    fn test_identity_falls_back_to_title() {
        let record = CourseRecord::new("--", " Great Books ", 4.0, None);
        assert!(record.code.is_none());
        assert_eq!(record.identity().as_deref(), Some("GREAT BOOKS"));
    }

    #[test]
    fn test_identity_missing() {
        let record = CourseRecord::default();
        assert!(record.identity().is_none());
    }

    #[test]
    fn test_effective_credits_fallback() {
        let mut record = CourseRecord::new("ECO-1001", "Micro", 0.0, Some(GradeLabel::B));
        assert!(record.effective_credits().abs() < f64::EPSILON);

        record.credits_earned = Some(4.0);
        assert!((record.effective_credits() - 4.0).abs() < f64::EPSILON);

        record.credits_registered = Some(2.0);
        assert!((record.effective_credits() - 2.0).abs() < f64::EPSILON);
    }
}
