//! Grade-point resolution with retake handling
//!
//! Every graded row becomes an [`Attempt`]. Attempts are grouped by course
//! identity, the best attempt of each identity is kept, and the winners are
//! summed into a [`TranscriptAggregate`]. Everything here is a pure function
//! of its inputs: grouping uses ordered maps so the summation order, and with
//! it every bit of the result, is fixed for a given input.

use crate::core::models::{
    grade::MIN_TRANSFER_CREDITS, CourseRecord, GradeEffect, GradeLabel, ParsedTranscript, Semester,
};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Tolerance for treating two ratios or point totals as tied
const TIE_EPSILON: f64 = 1e-9;

/// Grade selections for the current semester, keyed by 0-based row index
pub type GradeSelections = BTreeMap<usize, GradeLabel>;

/// Where an attempt came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttemptSource {
    /// A completed semester on the transcript
    Past,
    /// The current/upcoming semester with a hypothetical grade
    Current,
}

/// One graded occurrence of a course identity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attempt {
    /// Course identity (see [`CourseRecord::identity`])
    pub key: String,
    /// Grade of this attempt
    pub grade: GradeLabel,
    /// Grade points contributed
    pub grade_points: f64,
    /// Credits counted in the GPA denominator
    pub gpa_credits: f64,
    /// Credits counted toward degree completion
    pub earned_credits: f64,
    /// Grade points per GPA credit, `None` when there are no GPA credits
    pub ratio: Option<f64>,
    /// Past or current semester
    pub source: AttemptSource,
}

impl Attempt {
    /// Build the attempt for `record` graded `grade`.
    ///
    /// Returns `None` when the record has no identity.
    #[must_use]
    pub fn from_record(record: &CourseRecord, grade: GradeLabel, source: AttemptSource) -> Option<Self> {
        let key = record.identity()?;
        let registered = record.credits_registered.unwrap_or(0.0);
        let declared_earned = record.credits_earned.unwrap_or(0.0);
        let effective = record.effective_credits();

        let (grade_points, gpa_credits, earned_credits) = match grade.effect() {
            GradeEffect::Audit | GradeEffect::TransferWithoutCredits => (0.0, 0.0, 0.0),
            GradeEffect::Pass => (0.0, 0.0, effective),
            GradeEffect::TransferWithCredits => (
                0.0,
                0.0,
                declared_earned.max(registered.max(MIN_TRANSFER_CREDITS)),
            ),
            GradeEffect::Letter(points) => {
                (points * effective, effective, declared_earned.max(effective))
            }
        };

        let ratio = (gpa_credits > 0.0).then(|| grade_points / gpa_credits);

        Some(Self {
            key,
            grade,
            grade_points,
            gpa_credits,
            earned_credits,
            ratio,
            source,
        })
    }
}

/// The current semester together with the caller's hypothetical grades
#[derive(Debug, Clone)]
pub struct CurrentSemester<'a> {
    /// Semester whose rows are being graded
    pub semester: &'a Semester,
    /// Selected grade per row index; rows without a selection are ignored
    pub selected_grades: GradeSelections,
}

impl<'a> CurrentSemester<'a> {
    /// Pair a semester with grade selections
    #[must_use]
    pub const fn new(semester: &'a Semester, selected_grades: GradeSelections) -> Self {
        Self {
            semester,
            selected_grades,
        }
    }
}

/// Totals across the best attempt of every course identity
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TranscriptAggregate {
    /// Sum of grade points
    pub total_grade_points: f64,
    /// Sum of GPA credits
    pub total_gpa_credits: f64,
    /// Sum of earned credits
    pub total_earned_credits: f64,
    /// Identities attempted more than once
    pub retake_keys: BTreeSet<String>,
}

impl TranscriptAggregate {
    /// Cumulative GPA, 0 when nothing counts toward the GPA
    #[must_use]
    pub fn cgpa(&self) -> f64 {
        if self.total_gpa_credits > 0.0 {
            self.total_grade_points / self.total_gpa_credits
        } else {
            0.0
        }
    }

    /// Whether any GPA credits were aggregated
    #[must_use]
    pub fn has_gpa_credits(&self) -> bool {
        self.total_gpa_credits > 0.0
    }
}

/// Winning attempts per identity plus the set of retaken identities
#[derive(Debug, Clone, Default)]
pub struct Resolution {
    /// Best attempt per identity
    pub best: BTreeMap<String, Attempt>,
    /// Identities with more than one attempt
    pub retake_keys: BTreeSet<String>,
}

impl Resolution {
    /// Sum the winning attempts
    #[must_use]
    pub fn aggregate(&self) -> TranscriptAggregate {
        let mut aggregate = TranscriptAggregate {
            retake_keys: self.retake_keys.clone(),
            ..TranscriptAggregate::default()
        };
        for attempt in self.best.values() {
            aggregate.total_grade_points += attempt.grade_points;
            aggregate.total_gpa_credits += attempt.gpa_credits;
            aggregate.total_earned_credits += attempt.earned_credits;
        }
        aggregate
    }
}

/// Pick the better of the incumbent `best` and a `candidate` attempt.
///
/// Ratios decide first (ties broken by grade points, then by fewer GPA
/// credits). A ratio-bearing attempt beats a ratio-less one unless its ratio
/// is not positive. Without ratios, strictly more earned credits wins. Any
/// remaining tie keeps the incumbent.
#[must_use]
pub fn choose_better<'a>(best: &'a Attempt, candidate: &'a Attempt) -> &'a Attempt {
    let candidate_wins = match (best.ratio, candidate.ratio) {
        (Some(held), Some(challenger)) => {
            if (challenger - held).abs() > TIE_EPSILON {
                challenger > held
            } else if (candidate.grade_points - best.grade_points).abs() > TIE_EPSILON {
                candidate.grade_points > best.grade_points
            } else {
                candidate.gpa_credits + TIE_EPSILON < best.gpa_credits
            }
        }
        (Some(held), None) => held <= 0.0,
        (None, Some(challenger)) => challenger > 0.0,
        (None, None) => candidate.earned_credits > best.earned_credits,
    };

    if candidate_wins {
        candidate
    } else {
        best
    }
}

/// Build every attempt from past semesters and the optional current semester.
///
/// Past rows use their transcript grade; current rows use the selected grade
/// for their index. Rows without a recognised grade or without an identity
/// produce no attempt.
pub fn collect_attempts<'a, I>(past: I, current: Option<&CurrentSemester>) -> Vec<Attempt>
where
    I: IntoIterator<Item = &'a Semester>,
{
    let past_attempts = past.into_iter().flat_map(|semester| {
        semester.courses.iter().filter_map(|record| {
            let grade = record.grade?;
            Attempt::from_record(record, grade, AttemptSource::Past)
        })
    });

    let current_attempts = current.into_iter().flat_map(|current| {
        current
            .semester
            .courses
            .iter()
            .enumerate()
            .filter_map(move |(idx, record)| {
                let grade = *current.selected_grades.get(&idx)?;
                Attempt::from_record(record, grade, AttemptSource::Current)
            })
    });

    past_attempts.chain(current_attempts).collect()
}

/// Group attempts by identity and keep the best one of each.
#[must_use]
pub fn best_attempts(attempts: Vec<Attempt>) -> Resolution {
    let mut groups: BTreeMap<String, Vec<Attempt>> = BTreeMap::new();
    for attempt in attempts {
        groups.entry(attempt.key.clone()).or_default().push(attempt);
    }

    let mut resolution = Resolution::default();
    for (key, group) in groups {
        if group.len() > 1 {
            resolution.retake_keys.insert(key.clone());
        }
        let mut attempts = group.into_iter();
        if let Some(first) = attempts.next() {
            let winner = attempts.fold(first, |best, candidate| {
                choose_better(&best, &candidate).clone()
            });
            resolution.best.insert(key, winner);
        }
    }
    resolution
}

/// Resolve past semesters and an optional graded current semester into totals.
pub fn resolve<'a, I>(past: I, current: Option<&CurrentSemester>) -> TranscriptAggregate
where
    I: IntoIterator<Item = &'a Semester>,
{
    best_attempts(collect_attempts(past, current)).aggregate()
}

/// Resolve a parsed transcript: completed semesters as history, the first
/// upcoming semester graded with `selections`.
#[must_use]
pub fn resolve_transcript(
    transcript: &ParsedTranscript,
    selections: &GradeSelections,
) -> TranscriptAggregate {
    resolve_transcript_detailed(transcript, selections).aggregate()
}

/// Same as [`resolve_transcript`] but keeps the winning attempts.
#[must_use]
pub fn resolve_transcript_detailed(
    transcript: &ParsedTranscript,
    selections: &GradeSelections,
) -> Resolution {
    let current = transcript
        .current_semester()
        .map(|semester| CurrentSemester::new(semester, selections.clone()));
    best_attempts(collect_attempts(
        transcript.past_semesters(),
        current.as_ref(),
    ))
}

/// Plain GPA of one semester's own graded rows, without retake resolution.
///
/// Returns `None` when the semester has no GPA credits.
#[must_use]
pub fn semester_gpa(semester: &Semester) -> Option<f64> {
    let (points, credits) = semester
        .courses
        .iter()
        .filter_map(|record| {
            let grade = record.grade?;
            Attempt::from_record(record, grade, AttemptSource::Past)
        })
        .fold((0.0, 0.0), |(points, credits), attempt| {
            (points + attempt.grade_points, credits + attempt.gpa_credits)
        });

    (credits > 0.0).then(|| points / credits)
}
