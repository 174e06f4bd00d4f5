//! Solver tests against a baseline taken from a real transcript

use gpa_planner::core::models::GradeLabel;
use gpa_planner::core::resolution::{resolve_transcript, GradeSelections};
use gpa_planner::core::solver::{
    credits_needed, letter_for, letter_needed, projected_cgpa, required_semester_average,
    Baseline, Solution, SolverError,
};
use gpa_planner::core::transcript::load_transcript;
use std::path::PathBuf;

fn alice_baseline() -> Baseline {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("samples/transcripts/alice.txt");
    let transcript = load_transcript(path).expect("sample loads");
    let aggregate = resolve_transcript(&transcript, &GradeSelections::new());
    Baseline::from_aggregate(&aggregate, transcript.summary.as_ref())
}

#[test]
fn baseline_uses_resolved_gpa_credits() {
    let baseline = alice_baseline();
    assert!((baseline.cgpa - 3.5).abs() < 1e-9);
    assert!((baseline.credits - 16.0).abs() < f64::EPSILON);
}

#[test]
fn required_average_from_transcript() {
    let baseline = alice_baseline();
    let solution = required_semester_average(baseline, 20.0, 3.6).unwrap();
    assert_eq!(solution, Solution::Value(3.68));
    // 3.68 needs an A-; a B+ would fall short
    assert_eq!(letter_needed(solution), Some(GradeLabel::AMinus));

    assert_eq!(
        required_semester_average(baseline, 20.0, 3.4),
        Ok(Solution::AlreadyAchieved)
    );
    assert_eq!(
        required_semester_average(baseline, 4.0, 3.9),
        Ok(Solution::Unreachable)
    );
}

#[test]
fn projection_and_required_agree() {
    let baseline = alice_baseline();
    let average = required_semester_average(baseline, 20.0, 3.6)
        .unwrap()
        .value()
        .unwrap();
    let projected = projected_cgpa(baseline, average, 20.0).unwrap().value().unwrap();
    assert!((projected - 3.6).abs() <= 0.01);
    assert_eq!(letter_for(Solution::Value(projected)), Some(GradeLabel::BPlus));
}

#[test]
fn credits_needed_from_transcript() {
    let baseline = alice_baseline();
    // (3.6 * 16 - 56) / (4.0 - 3.6) = 4
    assert_eq!(credits_needed(baseline, 3.6, 4.0), Ok(Solution::Value(4.0)));
    assert_eq!(
        credits_needed(baseline, 3.6, 3.6),
        Err(SolverError::AverageNotAboveTarget)
    );
}

#[test]
fn required_average_grows_with_target() {
    let baseline = Baseline::new(3.0, 60.0);
    let mut last = f64::MIN;
    for target in [3.05, 3.1, 3.15, 3.2] {
        let value = required_semester_average(baseline, 16.0, target)
            .unwrap()
            .value()
            .unwrap();
        assert!(value > last, "{value} should exceed {last}");
        last = value;
    }
}

#[test]
fn empty_baseline_is_degenerate() {
    let baseline = Baseline::default();
    for result in [
        required_semester_average(baseline, 16.0, 3.0),
        projected_cgpa(baseline, 3.0, 16.0),
        credits_needed(baseline, 3.0, 3.5),
    ] {
        let err = result.unwrap_err();
        assert_eq!(err, SolverError::NeedCurrentData);
        assert!(err.is_degenerate());
    }
}

#[test]
fn out_of_range_baseline_is_not_degenerate() {
    let baseline = Baseline::new(3.0, -10.0);
    let err = required_semester_average(baseline, 16.0, 3.5).unwrap_err();
    assert_eq!(err, SolverError::InvalidBaseline);
    assert!(!err.is_degenerate());
    assert!(Baseline::checked(4.5, 30.0).is_err());
}

#[test]
fn invalid_inputs_are_not_degenerate() {
    let baseline = Baseline::new(3.0, 60.0);
    let err = required_semester_average(baseline, 0.0, 3.2).unwrap_err();
    assert_eq!(err, SolverError::InvalidCredits);
    assert!(!err.is_degenerate());
    assert_eq!(
        projected_cgpa(baseline, 4.5, 16.0),
        Err(SolverError::InvalidAverage)
    );
    assert_eq!(
        credits_needed(baseline, -0.1, 3.5),
        Err(SolverError::InvalidTarget)
    );
}
