//! Parser for transcript text pasted from the academic records system
//!
//! The input is tab- and newline-delimited copy/paste output. Parsing is
//! best-effort: any line that does not look like a degree summary, a semester
//! header, a semester summary or a course row is skipped, and the parser never
//! fails. Rows are turned into typed [`CourseRecord`]s field by field.

use crate::core::models::{
    course::normalize_text, CourseRecord, DegreeSummary, GradeLabel, ParsedTranscript, Semester,
};
use logger::debug;
use regex::Regex;
use std::fmt;
use std::sync::LazyLock;
use thiserror::Error;

/// Marker for the degree-level summary line
const DEGREE_MARKER: &str = "Degree/Diploma CGPA";

/// Tokens that open a new semester
const SEMESTER_TOKENS: [&str; 3] = ["Monsoon", "Spring", "Summer"];

/// Substrings that must all appear on a semester summary line
const SUMMARY_MARKERS: [&str; 3] = ["GPA", "Semester Credits Earned", "CGPA"];

/// Footer noise that starts with a number but is not a course row
const FOOTER_NOISE: &str = "systems.support";

static DEGREE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"Degree/Diploma CGPA:\s*(\d+(?:\.\d+)?).*?CGPA for Major:\s*(\d+(?:\.\d+)?).*?Total counted credits:\s*(\d+(?:\.\d+)?)",
    )
    .expect("degree summary pattern is valid")
});
static GPA_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bGPA:\s*(\d+\.\d+)").expect("GPA pattern is valid"));
static CREDITS_EARNED_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Semester Credits Earned:\s*(\d+)").expect("credits pattern is valid")
});
static CGPA_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bCGPA:\s*(\d+\.\d+)").expect("CGPA pattern is valid"));
static SERIAL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+\b").expect("serial pattern is valid"));
static TABS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\t+").expect("tab pattern is valid"));
static LEADING_NUMBER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[+-]?(?:\d+(?:\.\d*)?|\.\d+)").expect("number pattern is valid")
});

/// Positional fields of a course row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowField {
    /// Serial number
    Serial,
    /// Course code
    Code,
    /// Course title
    Title,
    /// Credits registered
    CreditsRegistered,
    /// Grade label
    Grade,
    /// Credits earned
    CreditsEarned,
    /// Grade points
    GradePoints,
}

impl RowField {
    /// Fields in the order they appear on a row
    pub const ORDER: [Self; 7] = [
        Self::Serial,
        Self::Code,
        Self::Title,
        Self::CreditsRegistered,
        Self::Grade,
        Self::CreditsEarned,
        Self::GradePoints,
    ];
}

impl fmt::Display for RowField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Serial => "serial",
            Self::Code => "code",
            Self::Title => "title",
            Self::CreditsRegistered => "credits registered",
            Self::Grade => "grade",
            Self::CreditsEarned => "credits earned",
            Self::GradePoints => "grade points",
        };
        f.write_str(name)
    }
}

/// Reasons a line cannot be read as a course row
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RowError {
    /// The row is missing a required field
    #[error("row has no {0} field")]
    Missing(RowField),
    /// The serial field is not an integer
    #[error("row serial '{0}' is not an integer")]
    InvalidSerial(String),
}

/// Tab-split view of a row, addressed by field name
struct RawRow<'a> {
    fields: Vec<&'a str>,
}

impl<'a> RawRow<'a> {
    fn split(line: &'a str) -> Self {
        Self {
            fields: TABS_RE.split(line).collect(),
        }
    }

    fn get(&self, field: RowField) -> Option<&'a str> {
        RowField::ORDER
            .iter()
            .position(|f| *f == field)
            .and_then(|idx| self.fields.get(idx))
            .copied()
    }
}

/// Parse transcript text into semesters, dropping the degree summary.
#[must_use]
pub fn parse_semesters(raw: &str) -> Vec<Semester> {
    parse_transcript(raw).semesters
}

/// Parse transcript text into semesters and the declared degree summary.
///
/// An input with no semester header yields an empty transcript, which callers
/// treat as "no usable data".
#[must_use]
pub fn parse_transcript(raw: &str) -> ParsedTranscript {
    let mut transcript = ParsedTranscript::default();
    let mut open: Option<Semester> = None;

    for line in raw.lines() {
        if line.contains(DEGREE_MARKER) {
            match parse_degree_summary(line) {
                Some(summary) => transcript.summary = Some(summary),
                None => debug!("Skipping unreadable degree summary line: {line}"),
            }
        } else if is_semester_header(line) {
            if let Some(done) = open.take() {
                transcript.semesters.push(done);
            }
            open = Some(Semester::new(semester_name(line)));
        } else if is_summary_line(line) {
            if let Some(semester) = open.as_mut() {
                apply_semester_summary(semester, line);
            }
        } else if let Some(semester) = open.as_mut() {
            if !is_course_row(line) {
                continue;
            }
            match parse_course_row(line) {
                Ok(record) => semester.add_course(record),
                Err(e) => debug!("Skipping row in {}: {e}", semester.name),
            }
        }
    }

    if let Some(done) = open {
        transcript.semesters.push(done);
    }

    transcript
}

/// Extract degree CGPA, major CGPA and total counted credits.
fn parse_degree_summary(line: &str) -> Option<DegreeSummary> {
    let caps = DEGREE_RE.captures(line)?;
    let number = |idx: usize| caps.get(idx).and_then(|m| m.as_str().parse::<f64>().ok());

    Some(DegreeSummary {
        degree_cgpa: number(1)?,
        major_cgpa: number(2)?,
        total_counted_credits: number(3)?,
    })
}

fn is_semester_header(line: &str) -> bool {
    SEMESTER_TOKENS.iter().any(|token| line.starts_with(token))
}

/// Display name of a semester: the first tab-separated field, trimmed.
fn semester_name(line: &str) -> String {
    line.split('\t').next().unwrap_or(line).trim().to_string()
}

fn is_summary_line(line: &str) -> bool {
    SUMMARY_MARKERS.iter().all(|marker| line.contains(marker))
}

/// Copy declared GPA, credits earned and CGPA onto the semester; misses stay 0.
fn apply_semester_summary(semester: &mut Semester, line: &str) {
    if let Some(gpa) = first_capture(&GPA_RE, line) {
        semester.gpa = gpa;
    }
    if let Some(earned) = first_capture(&CREDITS_EARNED_RE, line) {
        semester.semester_credits_earned = earned;
    }
    if let Some(cgpa) = first_capture(&CGPA_RE, line) {
        semester.cgpa = cgpa;
    }
}

fn first_capture(re: &Regex, line: &str) -> Option<f64> {
    re.captures(line)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse::<f64>().ok())
}

fn is_course_row(line: &str) -> bool {
    SERIAL_RE.is_match(line) && !line.contains(FOOTER_NOISE)
}

/// Parse one tab-delimited course row into a typed record.
///
/// # Errors
/// Returns a [`RowError`] when the serial field is missing or not an integer.
/// Every other field degrades to `None` when absent or unreadable.
pub fn parse_course_row(line: &str) -> Result<CourseRecord, RowError> {
    let row = RawRow::split(line);

    let serial_text = row
        .get(RowField::Serial)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or(RowError::Missing(RowField::Serial))?;
    let serial = serial_text
        .parse::<u64>()
        .map_err(|_| RowError::InvalidSerial(serial_text.to_string()))?;

    Ok(CourseRecord {
        serial,
        code: row.get(RowField::Code).and_then(normalize_text),
        title: row.get(RowField::Title).and_then(normalize_text),
        credits_registered: parse_number(serial, RowField::CreditsRegistered, &row),
        grade: parse_grade(serial, &row),
        credits_earned: parse_number(serial, RowField::CreditsEarned, &row),
        grade_points: parse_number(serial, RowField::GradePoints, &row),
    })
}

/// Lenient float parse: the leading numeric prefix, `None` when absent or non-finite.
fn parse_number(serial: u64, field: RowField, row: &RawRow) -> Option<f64> {
    let raw = row.get(field)?.trim();
    if raw.is_empty() {
        return None;
    }

    let value = raw.parse::<f64>().ok().or_else(|| {
        LEADING_NUMBER_RE
            .find(raw)
            .and_then(|m| m.as_str().parse::<f64>().ok())
    });

    match value {
        Some(v) if v.is_finite() => Some(v),
        _ => {
            debug!("Row {serial}: {field} '{raw}' is not a number");
            None
        }
    }
}

fn parse_grade(serial: u64, row: &RawRow) -> Option<GradeLabel> {
    let raw = normalize_text(row.get(RowField::Grade)?)?;
    match raw.parse::<GradeLabel>() {
        Ok(grade) => Some(grade),
        Err(e) => {
            debug!("Row {serial}: {e}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "Spring 2023\n\
        GPA: 3.50 Semester Credits Earned: 16 CGPA: 3.50\n\
        1\tCS-1101\tIntro to CS\t4\tA\t4\t16\n";

    #[test]
    fn test_single_semester_round_trip() {
        let semesters = parse_semesters(SAMPLE);
        assert_eq!(semesters.len(), 1);

        let semester = &semesters[0];
        assert_eq!(semester.name, "Spring 2023");
        assert!((semester.gpa - 3.5).abs() < f64::EPSILON);
        assert!((semester.semester_credits_earned - 16.0).abs() < f64::EPSILON);
        assert!((semester.cgpa - 3.5).abs() < f64::EPSILON);
        assert_eq!(semester.courses.len(), 1);

        let course = &semester.courses[0];
        assert_eq!(course.serial, 1);
        assert_eq!(course.code.as_deref(), Some("CS-1101"));
        assert_eq!(course.title.as_deref(), Some("Intro to CS"));
        assert_eq!(course.grade, Some(GradeLabel::A));
        assert_eq!(course.credits_registered, Some(4.0));
        assert_eq!(course.credits_earned, Some(4.0));
        assert_eq!(course.grade_points, Some(16.0));
    }

    #[test]
    fn test_no_header_yields_empty() {
        let parsed = parse_transcript("1\tCS-1101\tIntro\t4\tA\t4\t16\nrandom noise");
        assert!(parsed.is_empty());
        assert!(parsed.summary.is_none());
    }

    #[test]
    fn test_degree_summary_line() {
        let parsed = parse_transcript(
            "Degree/Diploma CGPA: 3.42\tCGPA for Major: 3.61\tTotal counted credits: 64\n",
        );
        let summary = parsed.summary.expect("summary parsed");
        assert!((summary.degree_cgpa - 3.42).abs() < f64::EPSILON);
        assert!((summary.major_cgpa - 3.61).abs() < f64::EPSILON);
        assert!((summary.total_counted_credits - 64.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_malformed_degree_summary_is_skipped() {
        let parsed = parse_transcript("Degree/Diploma CGPA: N/A\n");
        assert!(parsed.summary.is_none());
    }

    #[test]
    fn test_semester_name_takes_first_tab_field() {
        let semesters = parse_semesters("Monsoon 2022\t\tUndergraduate\t\n");
        assert_eq!(semesters[0].name, "Monsoon 2022");
    }

    #[test]
    fn test_header_flushes_previous_semester() {
        let text = "Monsoon 2022\n1\tECO-1001\tMicro\t4\tB\t4\t12\nSpring 2023\n1\tCS-1101\tIntro\t4\tA\t4\t16\n";
        let semesters = parse_semesters(text);
        assert_eq!(semesters.len(), 2);
        assert_eq!(semesters[0].courses.len(), 1);
        assert_eq!(semesters[1].courses[0].code.as_deref(), Some("CS-1101"));
    }

    #[test]
    fn test_summary_without_open_semester_is_ignored() {
        let semesters = parse_semesters("GPA: 3.50 Semester Credits Earned: 16 CGPA: 3.50\n");
        assert!(semesters.is_empty());
    }

    #[test]
    fn test_missing_summary_values_stay_zero() {
        let semesters = parse_semesters("Spring 2024\nGPA: -- Semester Credits Earned: CGPA: 3.10\n");
        let semester = &semesters[0];
        assert!(semester.gpa.abs() < f64::EPSILON);
        assert!(semester.semester_credits_earned.abs() < f64::EPSILON);
        assert!((semester.cgpa - 3.1).abs() < f64::EPSILON);
    }

    #[test]
    fn test_footer_noise_is_skipped() {
        let text = "Spring 2023\n2024 systems.support@university.edu\n";
        assert!(parse_semesters(text)[0].courses.is_empty());
    }

    #[test]
    fn test_rows_outside_semester_are_skipped() {
        let text = "1\tCS-1101\tIntro\t4\tA\t4\t16\nSpring 2023\n";
        assert!(parse_semesters(text)[0].courses.is_empty());
    }

    #[test]
    fn test_placeholder_grade_and_numbers() {
        let record = parse_course_row("3\tCS-2201\tAlgorithms\t4\t--\t--\tNaN").unwrap();
        assert_eq!(record.serial, 3);
        assert!(record.grade.is_none());
        assert_eq!(record.credits_registered, Some(4.0));
        assert!(record.credits_earned.is_none());
        assert!(record.grade_points.is_none());
    }

    #[test]
    fn test_short_row_degrades_to_none() {
        let record = parse_course_row("4\tPHI-1001").unwrap();
        assert_eq!(record.code.as_deref(), Some("PHI-1001"));
        assert!(record.title.is_none());
        assert!(record.credits_registered.is_none());
        assert!(record.grade.is_none());
    }

    #[test]
    fn test_lenient_numbers() {
        let record = parse_course_row("1\tCS-1101\tIntro\t4 cr\tB+\t4.0\t13.2").unwrap();
        assert_eq!(record.credits_registered, Some(4.0));
        assert_eq!(record.grade, Some(GradeLabel::BPlus));
        assert_eq!(record.grade_points, Some(13.2));
    }

    #[test]
    fn test_multiple_tabs_collapse() {
        let record = parse_course_row("1\t\tCS-1101\t\t\tIntro\t4\tA-\t4\t14.8").unwrap();
        assert_eq!(record.code.as_deref(), Some("CS-1101"));
        assert_eq!(record.title.as_deref(), Some("Intro"));
        assert_eq!(record.grade, Some(GradeLabel::AMinus));
    }

    #[test]
    fn test_row_errors() {
        assert_eq!(
            parse_course_row("123456789012345678901234\tCS"),
            Err(RowError::InvalidSerial("123456789012345678901234".to_string()))
        );
        assert_eq!(
            parse_course_row(""),
            Err(RowError::Missing(RowField::Serial))
        );
    }

    #[test]
    fn test_long_serial_keeps_row() {
        let record = parse_course_row("4294967296\tCS-1101\tIntro\t4\tA\t4\t16").unwrap();
        assert_eq!(record.serial, 4_294_967_296);
        assert_eq!(record.grade, Some(GradeLabel::A));

        let text = "Spring 2023\n4294967296\tCS-1101\tIntro\t4\tA\t4\t16\n";
        assert_eq!(parse_semesters(text)[0].courses.len(), 1);
    }

    #[test]
    fn test_crlf_input() {
        let text = "Spring 2023\r\nGPA: 3.00 Semester Credits Earned: 4 CGPA: 3.00\r\n1\tCS-1101\tIntro\t4\tB\t4\t12\r\n";
        let semesters = parse_semesters(text);
        assert_eq!(semesters[0].courses[0].grade_points, Some(12.0));
        assert!((semesters[0].gpa - 3.0).abs() < f64::EPSILON);
    }
}
