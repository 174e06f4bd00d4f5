//! Forward trajectory planning
//!
//! A trajectory is a list of planned semesters loaded from TOML. Evaluating it
//! classifies every planned course, totals credits per requirement category
//! and department, and measures progress against degree [`Requirements`].
//! Courses with planned grades are also run through the resolution engine,
//! optionally on top of an existing transcript, to project the CGPA the plan
//! would end with.

use crate::core::classifier::{classify, Category, CreditSize};
use crate::core::models::{CourseRecord, GradeLabel, ParsedTranscript, Semester};
use crate::core::resolution::{resolve, TranscriptAggregate};
use logger::{debug, warn};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Errors raised while loading a trajectory
#[derive(Debug, Error)]
pub enum TrajectoryError {
    /// File could not be read
    #[error("failed to read trajectory: {0}")]
    Io(#[from] std::io::Error),
    /// TOML was malformed or had the wrong shape
    #[error("invalid trajectory TOML: {0}")]
    Parse(#[from] toml::de::Error),
    /// The plan has no semesters
    #[error("trajectory has no semesters")]
    Empty,
    /// A course has zero, negative or non-finite credits
    #[error("course '{course}' in '{semester}' has invalid credits {credits}")]
    InvalidCredits {
        /// Semester name
        semester: String,
        /// Course code or title
        course: String,
        /// Offending value
        credits: f64,
    },
}

/// One planned course
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlannedCourse {
    /// Catalog code
    #[serde(default)]
    pub code: Option<String>,
    /// Course title
    pub title: String,
    /// Credits, snapped to 2/4/8 on evaluation
    pub credits: f64,
    /// Category override; the classifier decides when absent
    #[serde(default)]
    pub category: Option<Category>,
    /// Expected grade, used for the projected CGPA
    #[serde(default)]
    pub grade: Option<GradeLabel>,
}

impl PlannedCourse {
    /// Code if present, else title
    #[must_use]
    pub fn label(&self) -> &str {
        self.code.as_deref().unwrap_or(&self.title)
    }

    fn to_record(&self) -> CourseRecord {
        CourseRecord::new(
            self.code.as_deref().unwrap_or(""),
            &self.title,
            CreditSize::snap(self.credits).credits(),
            self.grade,
        )
    }
}

/// One planned semester
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlannedSemester {
    /// Semester name
    pub name: String,
    /// Courses in plan order
    #[serde(rename = "course", default)]
    pub courses: Vec<PlannedCourse>,
}

impl PlannedSemester {
    fn to_semester(&self) -> Semester {
        let mut semester = Semester::new(self.name.clone());
        for course in &self.courses {
            semester.add_course(course.to_record());
        }
        semester
    }
}

/// A forward plan of semesters
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TrajectoryPlan {
    /// Planned semesters in order
    #[serde(rename = "semester", default)]
    pub semesters: Vec<PlannedSemester>,
}

impl TrajectoryPlan {
    /// Parse a plan from TOML.
    ///
    /// # Errors
    /// Returns an error on malformed TOML, an empty plan or invalid credits.
    pub fn from_toml(content: &str) -> Result<Self, TrajectoryError> {
        let plan: Self = toml::from_str(content)?;
        plan.validate()?;
        Ok(plan)
    }

    /// Read and parse a plan file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or does not parse.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, TrajectoryError> {
        let content = fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    fn validate(&self) -> Result<(), TrajectoryError> {
        if self.semesters.is_empty() {
            return Err(TrajectoryError::Empty);
        }
        for semester in &self.semesters {
            if let Some(course) = semester
                .courses
                .iter()
                .find(|c| !c.credits.is_finite() || c.credits <= 0.0)
            {
                return Err(TrajectoryError::InvalidCredits {
                    semester: semester.name.clone(),
                    course: course.label().to_string(),
                    credits: course.credits,
                });
            }
        }
        Ok(())
    }

    /// Planned semesters as resolution input
    #[must_use]
    pub fn to_semesters(&self) -> Vec<Semester> {
        self.semesters.iter().map(PlannedSemester::to_semester).collect()
    }
}

/// Credit requirements of a degree
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Requirements {
    /// Credits required overall
    pub total_credits: f64,
    /// Foundation credits required
    pub foundation_credits: f64,
    /// Co-curricular credits required
    pub co_curricular_credits: f64,
    /// Major credits required
    pub major_credits: f64,
}

impl Default for Requirements {
    fn default() -> Self {
        Self {
            total_credits: 100.0,
            foundation_credits: 18.0,
            co_curricular_credits: 4.0,
            major_credits: 52.0,
        }
    }
}

/// Progress on one requirement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequirementProgress {
    /// Requirement name
    pub name: String,
    /// Credits required
    pub required: f64,
    /// Credits planned
    pub planned: f64,
    /// Credits still missing, never negative
    pub remaining: f64,
}

impl RequirementProgress {
    fn new(name: &str, required: f64, planned: f64) -> Self {
        Self {
            name: name.to_string(),
            required,
            planned,
            remaining: (required - planned).max(0.0),
        }
    }

    /// Whether the requirement is covered
    #[must_use]
    pub fn is_met(&self) -> bool {
        self.remaining <= 0.0
    }
}

/// Per-semester line of a summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SemesterLoad {
    /// Semester name
    pub name: String,
    /// Courses counted for this semester (duplicates excluded)
    pub courses: usize,
    /// Snapped credits counted for this semester
    pub credits: f64,
}

/// Result of evaluating a plan
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TrajectorySummary {
    /// Load per semester
    pub semesters: Vec<SemesterLoad>,
    /// Credits per category
    pub category_credits: BTreeMap<Category, f64>,
    /// Credits per department; courses without one are not listed
    pub department_credits: BTreeMap<String, f64>,
    /// Total counted credits
    pub total_credits: f64,
    /// Identities planned more than once
    pub duplicates: BTreeSet<String>,
    /// Progress per requirement
    pub progress: Vec<RequirementProgress>,
    /// Projection over graded planned courses (and transcript history, if any)
    pub projection: Option<TranscriptAggregate>,
}

impl TrajectorySummary {
    /// Credits planned in a category
    #[must_use]
    pub fn credits_in(&self, category: Category) -> f64 {
        self.category_credits.get(&category).copied().unwrap_or(0.0)
    }

    /// Projected CGPA, if any planned course carries a grade
    #[must_use]
    pub fn projected_cgpa(&self) -> Option<f64> {
        self.projection
            .as_ref()
            .filter(|agg| agg.has_gpa_credits())
            .map(TranscriptAggregate::cgpa)
    }

    /// Whether every requirement is covered
    #[must_use]
    pub fn all_requirements_met(&self) -> bool {
        self.progress.iter().all(RequirementProgress::is_met)
    }
}

/// Evaluate a plan against requirements.
#[must_use]
pub fn evaluate(plan: &TrajectoryPlan, requirements: &Requirements) -> TrajectorySummary {
    evaluate_with_history(plan, requirements, None)
}

/// Evaluate a plan, projecting its grades on top of a transcript's history.
///
/// Credits from the history do not count toward the plan's totals; only the
/// projection uses them.
#[must_use]
pub fn evaluate_with_history(
    plan: &TrajectoryPlan,
    requirements: &Requirements,
    history: Option<&ParsedTranscript>,
) -> TrajectorySummary {
    let mut summary = TrajectorySummary::default();
    let mut seen = BTreeSet::new();

    for semester in &plan.semesters {
        let mut load = SemesterLoad {
            name: semester.name.clone(),
            courses: 0,
            credits: 0.0,
        };

        for course in &semester.courses {
            let record = course.to_record();
            let Some(identity) = record.identity() else {
                warn!("Skipping planned course without code or title in '{}'", semester.name);
                continue;
            };
            if !seen.insert(identity.clone()) {
                debug!("Duplicate planned course {identity} in '{}'", semester.name);
                summary.duplicates.insert(identity);
                continue;
            }

            let classification = classify(course.code.as_deref(), &course.title);
            let category = course.category.unwrap_or(classification.course_type);
            let credits = CreditSize::snap(course.credits).credits();

            *summary.category_credits.entry(category).or_insert(0.0) += credits;
            if let Some(dept) = classification.dept_code {
                *summary.department_credits.entry(dept).or_insert(0.0) += credits;
            }
            summary.total_credits += credits;
            load.courses += 1;
            load.credits += credits;
        }

        summary.semesters.push(load);
    }

    summary.progress = vec![
        RequirementProgress::new("Total", requirements.total_credits, summary.total_credits),
        RequirementProgress::new(
            "Foundation",
            requirements.foundation_credits,
            summary.credits_in(Category::Foundation),
        ),
        RequirementProgress::new(
            "Co-curricular",
            requirements.co_curricular_credits,
            summary.credits_in(Category::CoCurricular),
        ),
        RequirementProgress::new(
            "Major",
            requirements.major_credits,
            summary.credits_in(Category::Major),
        ),
    ];

    summary.projection = project(plan, history);
    summary
}

/// Resolve graded planned courses, after any transcript history.
///
/// Returns `None` when no planned course carries a grade.
#[must_use]
pub fn project(plan: &TrajectoryPlan, history: Option<&ParsedTranscript>) -> Option<TranscriptAggregate> {
    let has_grades = plan
        .semesters
        .iter()
        .flat_map(|s| &s.courses)
        .any(|c| c.grade.is_some());
    if !has_grades {
        return None;
    }

    let planned = plan.to_semesters();
    let past = history
        .into_iter()
        .flat_map(ParsedTranscript::past_semesters)
        .chain(planned.iter());
    Some(resolve(past, None))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::grade::MAX_GRADE_POINTS;

    const PLAN: &str = r#"
[[semester]]
name = "Monsoon 2024"

[[semester.course]]
code = "FC-0102"
title = "Great Books"
credits = 4
grade = "A"

[[semester.course]]
code = "CS-1101/PHY-1101"
title = "Introduction to Computer Science"
credits = 4
grade = "B"

[[semester.course]]
code = "CPA-0080"
title = "Leadership"
credits = 2

[[semester]]
name = "Spring 2025"

[[semester.course]]
code = "cs-1101/phy-1101"
title = "Introduction to Computer Science"
credits = 4

[[semester.course]]
code = "ECO-1001"
title = "Microeconomics"
credits = 3
category = "Minor"
"#;

    #[test]
    fn test_parse_plan() {
        let plan = TrajectoryPlan::from_toml(PLAN).unwrap();
        assert_eq!(plan.semesters.len(), 2);
        assert_eq!(plan.semesters[0].courses.len(), 3);
        assert_eq!(plan.semesters[0].courses[0].grade, Some(GradeLabel::A));
        assert_eq!(plan.semesters[1].courses[1].category, Some(Category::Minor));
    }

    #[test]
    fn test_empty_plan_rejected() {
        assert!(matches!(
            TrajectoryPlan::from_toml(""),
            Err(TrajectoryError::Empty)
        ));
    }

    #[test]
    fn test_invalid_credits_rejected() {
        let toml = r#"
[[semester]]
name = "S1"
[[semester.course]]
title = "Nothing"
credits = 0
"#;
        match TrajectoryPlan::from_toml(toml) {
            Err(TrajectoryError::InvalidCredits { course, .. }) => assert_eq!(course, "Nothing"),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_unknown_grade_is_parse_error() {
        let toml = r#"
[[semester]]
name = "S1"
[[semester.course]]
title = "Course"
credits = 4
grade = "E"
"#;
        assert!(matches!(
            TrajectoryPlan::from_toml(toml),
            Err(TrajectoryError::Parse(_))
        ));
    }

    #[test]
    fn test_category_and_department_totals() {
        let plan = TrajectoryPlan::from_toml(PLAN).unwrap();
        let summary = evaluate(&plan, &Requirements::default());

        assert!((summary.credits_in(Category::Foundation) - 4.0).abs() < f64::EPSILON);
        assert!((summary.credits_in(Category::CoCurricular) - 2.0).abs() < f64::EPSILON);
        assert!((summary.credits_in(Category::Major) - 4.0).abs() < f64::EPSILON);
        // 3 credits snap to 4, and the override wins over the classifier
        assert!((summary.credits_in(Category::Minor) - 4.0).abs() < f64::EPSILON);
        assert!((summary.total_credits - 14.0).abs() < f64::EPSILON);

        assert_eq!(summary.department_credits.get("CS"), Some(&4.0));
        assert_eq!(summary.department_credits.get("ECO"), Some(&4.0));
        assert!(!summary.department_credits.contains_key("FC"));
    }

    #[test]
    fn test_duplicates_counted_once() {
        let plan = TrajectoryPlan::from_toml(PLAN).unwrap();
        let summary = evaluate(&plan, &Requirements::default());

        assert_eq!(summary.duplicates.len(), 1);
        assert!(summary.duplicates.contains("CS-1101/PHY-1101"));
        assert_eq!(summary.semesters[1].courses, 1);
        assert!((summary.semesters[1].credits - 4.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_progress_remaining() {
        let plan = TrajectoryPlan::from_toml(PLAN).unwrap();
        let requirements = Requirements {
            total_credits: 10.0,
            foundation_credits: 4.0,
            co_curricular_credits: 4.0,
            major_credits: 8.0,
        };
        let summary = evaluate(&plan, &requirements);

        let by_name = |name: &str| {
            summary
                .progress
                .iter()
                .find(|p| p.name == name)
                .unwrap()
                .clone()
        };
        assert!(by_name("Total").is_met());
        assert!(by_name("Foundation").is_met());
        assert!((by_name("Co-curricular").remaining - 2.0).abs() < f64::EPSILON);
        assert!((by_name("Major").remaining - 4.0).abs() < f64::EPSILON);
        assert!(!summary.all_requirements_met());
    }

    #[test]
    fn test_projection_uses_graded_courses() {
        let plan = TrajectoryPlan::from_toml(PLAN).unwrap();
        let summary = evaluate(&plan, &Requirements::default());
        let cgpa = summary.projected_cgpa().unwrap();
        // A (4.0) and B (3.0) over four credits each
        assert!((cgpa - 3.5).abs() < 1e-9);
        assert!(cgpa <= MAX_GRADE_POINTS);
    }

    #[test]
    fn test_no_grades_no_projection() {
        let toml = r#"
[[semester]]
name = "S1"
[[semester.course]]
code = "BIO-1001"
title = "Biology"
credits = 4
"#;
        let plan = TrajectoryPlan::from_toml(toml).unwrap();
        let summary = evaluate(&plan, &Requirements::default());
        assert!(summary.projection.is_none());
        assert!(summary.projected_cgpa().is_none());
    }

    #[test]
    fn test_projection_retakes_history() {
        let mut past = Semester::new("Spring 2024".to_string());
        past.gpa = 2.0;
        past.semester_credits_earned = 4.0;
        past.add_course(CourseRecord::new(
            "BIO-1001",
            "Biology",
            4.0,
            Some(GradeLabel::C),
        ));
        let history = ParsedTranscript {
            semesters: vec![past],
            summary: None,
        };

        let toml = r#"
[[semester]]
name = "Monsoon 2024"
[[semester.course]]
code = "BIO-1001"
title = "Biology"
credits = 4
grade = "A"
"#;
        let plan = TrajectoryPlan::from_toml(toml).unwrap();
        let projection = project(&plan, Some(&history)).unwrap();
        assert!(projection.retake_keys.contains("BIO-1001"));
        assert!((projection.cgpa() - 4.0).abs() < 1e-9);
        assert!((projection.total_gpa_credits - 4.0).abs() < f64::EPSILON);
    }
}
