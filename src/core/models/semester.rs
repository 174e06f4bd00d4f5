//! Semester and transcript models

use super::CourseRecord;
use serde::{Deserialize, Serialize};

/// A semester of course rows plus the aggregates the transcript declared.
///
/// Declared values only classify the semester as past or upcoming; the
/// resolution engine never uses them for its own arithmetic.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Semester {
    /// Display name (e.g., "Spring 2023")
    pub name: String,

    /// Course rows in transcript order
    pub courses: Vec<CourseRecord>,

    /// Declared semester GPA
    pub gpa: f64,

    /// Declared credits earned this semester
    pub semester_credits_earned: f64,

    /// Declared cumulative GPA after this semester
    pub cgpa: f64,
}

impl Semester {
    /// Create an empty semester
    #[must_use]
    pub const fn new(name: String) -> Self {
        Self {
            name,
            courses: Vec::new(),
            gpa: 0.0,
            semester_credits_earned: 0.0,
            cgpa: 0.0,
        }
    }

    /// Add a course row
    pub fn add_course(&mut self, course: CourseRecord) {
        self.courses.push(course);
    }

    /// Whether this is the current/upcoming semester (nothing declared yet).
    #[must_use]
    pub fn is_upcoming(&self) -> bool {
        self.semester_credits_earned == 0.0 && self.gpa == 0.0
    }

    /// Sum of registered credits over all rows
    #[must_use]
    pub fn registered_credits(&self) -> f64 {
        self.courses
            .iter()
            .filter_map(|c| c.credits_registered)
            .sum()
    }
}

/// Degree-level figures declared on the transcript
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DegreeSummary {
    /// Degree/Diploma CGPA
    pub degree_cgpa: f64,
    /// CGPA for the major
    pub major_cgpa: f64,
    /// Total counted credits
    pub total_counted_credits: f64,
}

/// Everything extracted from one pasted transcript
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ParsedTranscript {
    /// Semesters in transcript order
    pub semesters: Vec<Semester>,
    /// Declared degree summary, when the transcript has one
    pub summary: Option<DegreeSummary>,
}

impl ParsedTranscript {
    /// True when no semester header was found
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.semesters.is_empty()
    }

    /// Semesters with declared results
    pub fn past_semesters(&self) -> impl Iterator<Item = &Semester> {
        self.semesters.iter().filter(|s| !s.is_upcoming())
    }

    /// The first semester with nothing declared yet
    #[must_use]
    pub fn current_semester(&self) -> Option<&Semester> {
        self.semesters.iter().find(|s| s.is_upcoming())
    }

    /// Total number of course rows across all semesters
    #[must_use]
    pub fn course_count(&self) -> usize {
        self.semesters.iter().map(|s| s.courses.len()).sum()
    }
}
