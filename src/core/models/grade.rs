//! Grade labels and the 4.0-scale grade-point table

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Top of the grade-point scale.
pub const MAX_GRADE_POINTS: f64 = 4.0;

/// Minimum earned credits granted for a transfer grade with credits.
pub const MIN_TRANSFER_CREDITS: f64 = 2.0;

/// Letter grades and their grade-point values, best first.
///
/// This table doubles as the letter-range table used by
/// [`GradeLabel::floor_letter`] and [`GradeLabel::ceil_letter`], so it must
/// stay sorted by descending value.
pub const LETTER_POINTS: [(GradeLabel, f64); 12] = [
    (GradeLabel::A, 4.0),
    (GradeLabel::AMinus, 3.7),
    (GradeLabel::BPlus, 3.3),
    (GradeLabel::B, 3.0),
    (GradeLabel::BMinus, 2.7),
    (GradeLabel::CPlus, 2.3),
    (GradeLabel::C, 2.0),
    (GradeLabel::CMinus, 1.7),
    (GradeLabel::DPlus, 1.3),
    (GradeLabel::D, 1.0),
    (GradeLabel::DMinus, 0.7),
    (GradeLabel::FailNoPassFail, 0.0),
];

/// A transcript grade, one of a closed set of labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum GradeLabel {
    /// `A`
    A,
    /// `A-`
    AMinus,
    /// `B+`
    BPlus,
    /// `B`
    B,
    /// `B-`
    BMinus,
    /// `C+`
    CPlus,
    /// `C`
    C,
    /// `C-`
    CMinus,
    /// `D+`
    DPlus,
    /// `D`
    D,
    /// `D-`
    DMinus,
    /// `F (w P/F)`: a fail taken under pass/fail
    FailPassFail,
    /// `F (w/o P/F)`: a graded fail
    FailNoPassFail,
    /// `P`
    Pass,
    /// `AU`
    Audit,
    /// `TP (w credits)`
    TransferWithCredits,
    /// `TP (w/o credits)`
    TransferWithoutCredits,
}

/// How a grade label affects grade points and credits.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GradeEffect {
    /// Occupies a retake slot, contributes nothing.
    Audit,
    /// Earned credits only, no GPA effect.
    Pass,
    /// Earned credits with a guaranteed minimum, no GPA effect.
    TransferWithCredits,
    /// No effect at all.
    TransferWithoutCredits,
    /// Counts toward the GPA with the given points per credit.
    Letter(f64),
}

impl GradeLabel {
    /// Every label in transcript order.
    pub const ALL: [Self; 17] = [
        Self::A,
        Self::AMinus,
        Self::BPlus,
        Self::B,
        Self::BMinus,
        Self::CPlus,
        Self::C,
        Self::CMinus,
        Self::DPlus,
        Self::D,
        Self::DMinus,
        Self::FailPassFail,
        Self::FailNoPassFail,
        Self::Pass,
        Self::Audit,
        Self::TransferWithCredits,
        Self::TransferWithoutCredits,
    ];

    /// The label as it appears on a transcript.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::A => "A",
            Self::AMinus => "A-",
            Self::BPlus => "B+",
            Self::B => "B",
            Self::BMinus => "B-",
            Self::CPlus => "C+",
            Self::C => "C",
            Self::CMinus => "C-",
            Self::DPlus => "D+",
            Self::D => "D",
            Self::DMinus => "D-",
            Self::FailPassFail => "F (w P/F)",
            Self::FailNoPassFail => "F (w/o P/F)",
            Self::Pass => "P",
            Self::Audit => "AU",
            Self::TransferWithCredits => "TP (w credits)",
            Self::TransferWithoutCredits => "TP (w/o credits)",
        }
    }

    /// Grade-point value on the 4.0 scale, `None` for labels outside the GPA.
    #[must_use]
    pub fn points(self) -> Option<f64> {
        LETTER_POINTS
            .iter()
            .find(|(label, _)| *label == self)
            .map(|&(_, points)| points)
    }

    /// How this label contributes to grade points and credits.
    #[must_use]
    pub fn effect(self) -> GradeEffect {
        match self {
            Self::Audit => GradeEffect::Audit,
            Self::Pass | Self::FailPassFail => GradeEffect::Pass,
            Self::TransferWithCredits => GradeEffect::TransferWithCredits,
            Self::TransferWithoutCredits => GradeEffect::TransferWithoutCredits,
            letter => GradeEffect::Letter(letter.points().unwrap_or(0.0)),
        }
    }

    /// Highest letter whose value does not exceed `points`.
    ///
    /// Values below every letter fall through to `F (w/o P/F)`; non-finite
    /// input yields `None`.
    #[must_use]
    pub fn floor_letter(points: f64) -> Option<Self> {
        if !points.is_finite() {
            return None;
        }
        LETTER_POINTS
            .iter()
            .find(|&&(_, value)| value <= points + 1e-9)
            .map(|&(label, _)| label)
            .or(Some(Self::FailNoPassFail))
    }

    /// Lowest letter whose value is at least `points`.
    ///
    /// `None` above the top of the scale or for non-finite input.
    #[must_use]
    pub fn ceil_letter(points: f64) -> Option<Self> {
        if !points.is_finite() {
            return None;
        }
        LETTER_POINTS
            .iter()
            .rev()
            .find(|&&(_, value)| value + 1e-9 >= points)
            .map(|&(label, _)| label)
    }
}

impl FromStr for GradeLabel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Self::ALL
            .into_iter()
            .find(|label| label.as_str() == trimmed)
            .ok_or_else(|| format!("Unknown grade label: '{trimmed}'"))
    }
}

impl TryFrom<String> for GradeLabel {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<GradeLabel> for String {
    fn from(label: GradeLabel) -> Self {
        label.as_str().to_string()
    }
}

impl fmt::Display for GradeLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
