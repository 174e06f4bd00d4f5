//! Closed-form CGPA calculators
//!
//! Three inverse questions over a [`Baseline`] (current CGPA and the credits
//! it is weighted by):
//! - what semester average reaches a target CGPA,
//! - what CGPA a planned average over planned credits leads to,
//! - how many credits at a maintained average reach a target CGPA.
//!
//! Inputs outside their domain come back as a [`SolverError`]; questions that
//! have no numeric answer come back as a non-value [`Solution`]. Nothing here
//! panics.

use crate::core::models::{grade::MAX_GRADE_POINTS, DegreeSummary, GradeLabel};
use crate::core::resolution::TranscriptAggregate;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Current standing the calculators build on
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Baseline {
    /// Current cumulative GPA
    pub cgpa: f64,
    /// Credits the CGPA is weighted by
    pub credits: f64,
}

impl Baseline {
    /// Create a baseline from explicit values
    #[must_use]
    pub const fn new(cgpa: f64, credits: f64) -> Self {
        Self { cgpa, credits }
    }

    /// Baseline from a computed aggregate.
    ///
    /// Uses the aggregate's CGPA and GPA credits when it has any GPA credits,
    /// otherwise the transcript's declared degree CGPA and total counted
    /// credits, otherwise zero.
    #[must_use]
    pub fn from_aggregate(aggregate: &TranscriptAggregate, declared: Option<&DegreeSummary>) -> Self {
        if aggregate.has_gpa_credits() {
            Self::new(aggregate.cgpa(), aggregate.total_gpa_credits)
        } else {
            declared.map_or_else(Self::default, |summary| {
                Self::new(summary.degree_cgpa, summary.total_counted_credits)
            })
        }
    }

    /// Grade points behind the current CGPA
    #[must_use]
    pub fn grade_points(&self) -> f64 {
        self.cgpa * self.credits
    }

    /// Build a baseline from user-entered values, rejecting out-of-range ones.
    ///
    /// # Errors
    /// `InvalidBaseline` when the CGPA is outside 0 to 4 or the credits are
    /// negative or not finite.
    pub fn checked(cgpa: f64, credits: f64) -> Result<Self, SolverError> {
        let baseline = Self::new(cgpa, credits);
        baseline.validate()?;
        Ok(baseline)
    }

    fn validate(&self) -> Result<(), SolverError> {
        if in_scale(self.cgpa) && self.credits.is_finite() && self.credits >= 0.0 {
            Ok(())
        } else {
            Err(SolverError::InvalidBaseline)
        }
    }

    fn require_data(&self) -> Result<(), SolverError> {
        self.validate()?;
        if self.credits > 0.0 {
            Ok(())
        } else {
            Err(SolverError::NeedCurrentData)
        }
    }
}

/// Inputs the calculators refuse to compute with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum SolverError {
    /// Credits are not a positive finite number
    #[error("Enter a positive number of credits")]
    InvalidCredits,
    /// Target CGPA outside 0 to 4
    #[error("Target CGPA must be between 0 and 4.0")]
    InvalidTarget,
    /// Average outside its allowed range
    #[error("Average must be between 0 and 4.0")]
    InvalidAverage,
    /// The maintained average cannot lift the CGPA to the target
    #[error("Maintained average must be higher than the target CGPA")]
    AverageNotAboveTarget,
    /// Current CGPA or credits outside their allowed range
    #[error("Current CGPA must be between 0 and 4.0 and credits completed must not be negative")]
    InvalidBaseline,
    /// No current CGPA/credits to build on
    #[error("Need current CGPA data first")]
    NeedCurrentData,
}

impl SolverError {
    /// True when the failure is a missing baseline rather than a bad input.
    #[must_use]
    pub const fn is_degenerate(self) -> bool {
        matches!(self, Self::NeedCurrentData)
    }
}

/// Answer to a calculator question
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", content = "value", rename_all = "snake_case")]
pub enum Solution {
    /// A numeric answer, rounded to two decimals
    Value(f64),
    /// The target is already met
    AlreadyAchieved,
    /// The target is met whatever the semester brings
    AlreadyAchievable,
    /// The target cannot be reached on a 4.0 scale
    Unreachable,
}

impl Solution {
    /// Numeric value, if any
    #[must_use]
    pub const fn value(self) -> Option<f64> {
        match self {
            Self::Value(v) => Some(v),
            _ => None,
        }
    }
}

impl fmt::Display for Solution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(v) => write!(f, "{v:.2}"),
            Self::AlreadyAchieved => f.write_str("Already achieved"),
            Self::AlreadyAchievable => f.write_str("Already achievable"),
            Self::Unreachable => f.write_str("Impossible (> 4.0)"),
        }
    }
}

/// Outcome of a calculator call
pub type SolverResult = Result<Solution, SolverError>;

/// Round half-up to two decimals, nudged past binary representation error.
#[must_use]
pub fn round2(value: f64) -> f64 {
    ((value + f64::EPSILON) * 100.0).round() / 100.0
}

/// Letter grade a projected CGPA falls in, for display.
#[must_use]
pub fn letter_for(solution: Solution) -> Option<GradeLabel> {
    solution.value().and_then(GradeLabel::floor_letter)
}

/// Lowest letter that meets a required average, for display.
#[must_use]
pub fn letter_needed(solution: Solution) -> Option<GradeLabel> {
    solution.value().and_then(GradeLabel::ceil_letter)
}

fn in_scale(value: f64) -> bool {
    (0.0..=MAX_GRADE_POINTS).contains(&value)
}

fn positive_credits(credits: f64) -> Result<f64, SolverError> {
    if credits.is_finite() && credits > 0.0 {
        Ok(credits)
    } else {
        Err(SolverError::InvalidCredits)
    }
}

/// Semester average needed over `credits` to bring the CGPA to `target`.
///
/// # Errors
/// `InvalidCredits`, `InvalidTarget`, `InvalidBaseline`, or `NeedCurrentData`
/// when the baseline has no credits.
pub fn required_semester_average(baseline: Baseline, credits: f64, target: f64) -> SolverResult {
    let credits = positive_credits(credits)?;
    if !in_scale(target) {
        return Err(SolverError::InvalidTarget);
    }
    baseline.require_data()?;

    if target <= baseline.cgpa {
        return Ok(Solution::AlreadyAchieved);
    }

    let required =
        (target * (baseline.credits + credits) - baseline.grade_points()) / credits;
    if required > MAX_GRADE_POINTS {
        Ok(Solution::Unreachable)
    } else if required < 0.0 {
        Ok(Solution::AlreadyAchievable)
    } else {
        Ok(Solution::Value(round2(required)))
    }
}

/// CGPA after `credits` more credits at `average`.
///
/// # Errors
/// `InvalidAverage`, `InvalidCredits`, `InvalidBaseline`, or `NeedCurrentData`.
pub fn projected_cgpa(baseline: Baseline, average: f64, credits: f64) -> SolverResult {
    if !in_scale(average) {
        return Err(SolverError::InvalidAverage);
    }
    let credits = positive_credits(credits)?;
    baseline.require_data()?;

    let projected =
        (baseline.grade_points() + average * credits) / (baseline.credits + credits);
    if projected > MAX_GRADE_POINTS {
        Ok(Solution::Unreachable)
    } else {
        Ok(Solution::Value(round2(projected)))
    }
}

/// Credits needed at a `maintained` average to bring the CGPA to `target`.
///
/// # Errors
/// `InvalidTarget`, `InvalidAverage` (must be in (0, 4]), `InvalidBaseline`,
/// `NeedCurrentData`,
/// or `AverageNotAboveTarget` when the average cannot lift the CGPA.
pub fn credits_needed(baseline: Baseline, target: f64, maintained: f64) -> SolverResult {
    if !in_scale(target) {
        return Err(SolverError::InvalidTarget);
    }
    if !(maintained > 0.0 && maintained <= MAX_GRADE_POINTS) {
        return Err(SolverError::InvalidAverage);
    }
    baseline.require_data()?;

    if target <= baseline.cgpa {
        return Ok(Solution::AlreadyAchieved);
    }
    let denominator = maintained - target;
    if denominator <= 0.0 {
        return Err(SolverError::AverageNotAboveTarget);
    }

    let numerator = target * baseline.credits - baseline.grade_points();
    if numerator <= 0.0 {
        return Ok(Solution::AlreadyAchieved);
    }

    let needed = numerator / denominator;
    if !needed.is_finite() || needed <= 0.0 {
        Ok(Solution::Unreachable)
    } else {
        Ok(Solution::Value(round2(needed)))
    }
}
