//! Trajectory evaluation against a sample plan and transcript

use gpa_planner::config::Config;
use gpa_planner::core::classifier::Category;
use gpa_planner::core::trajectory::{
    evaluate, evaluate_with_history, Requirements, TrajectoryError, TrajectoryPlan,
};
use gpa_planner::core::transcript::load_transcript;
use std::path::PathBuf;

fn samples() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("samples")
}

fn plan() -> TrajectoryPlan {
    TrajectoryPlan::load(samples().join("trajectories/alice_plan.toml")).expect("plan loads")
}

#[test]
fn totals_by_category_and_department() {
    let summary = evaluate(&plan(), &Requirements::default());

    assert!((summary.credits_in(Category::Foundation) - 4.0).abs() < f64::EPSILON);
    assert!((summary.credits_in(Category::CoCurricular) - 2.0).abs() < f64::EPSILON);
    assert!((summary.credits_in(Category::Major) - 20.0).abs() < f64::EPSILON);
    assert!((summary.credits_in(Category::Minor) - 4.0).abs() < f64::EPSILON);
    assert!((summary.total_credits - 30.0).abs() < f64::EPSILON);

    assert_eq!(summary.department_credits.get("CS"), Some(&16.0));
    assert_eq!(summary.department_credits.get("MATH"), Some(&4.0));
    assert_eq!(summary.department_credits.get("ECO"), Some(&4.0));
    assert!(!summary.department_credits.contains_key("FC"));
    assert!(!summary.department_credits.contains_key("CVA"));
}

#[test]
fn duplicate_courses_are_reported_once() {
    let summary = evaluate(&plan(), &Requirements::default());
    assert_eq!(
        summary.duplicates.iter().collect::<Vec<_>>(),
        ["CS-2202"]
    );
    assert_eq!(summary.semesters[0].courses, 4);
    assert_eq!(summary.semesters[1].courses, 3);
    assert!((summary.semesters[1].credits - 16.0).abs() < f64::EPSILON);
}

#[test]
fn progress_against_configured_requirements() {
    let config = Config::from_defaults();
    let summary = evaluate(&plan(), &config.requirements());
    let total = summary
        .progress
        .iter()
        .find(|p| p.name == "Total")
        .expect("total requirement");
    assert!((total.remaining - (config.requirements.total_credits - 30.0)).abs() < f64::EPSILON);
    assert!(!summary.all_requirements_met());
}

#[test]
fn projection_builds_on_transcript_history() {
    let plan = plan();
    let alone = evaluate(&plan, &Requirements::default());
    assert!((alone.projected_cgpa().unwrap() - 3.5).abs() < 1e-9);

    let history = load_transcript(samples().join("transcripts/alice.txt")).unwrap();
    let combined = evaluate_with_history(&plan, &Requirements::default(), Some(&history));
    let projection = combined.projection.as_ref().unwrap();
    assert!((projection.total_gpa_credits - 32.0).abs() < f64::EPSILON);
    assert!((combined.projected_cgpa().unwrap() - 3.5).abs() < 1e-9);
    assert!(projection.retake_keys.contains("CS-1101"));

    // History never inflates the planned credit totals
    assert!((combined.total_credits - alone.total_credits).abs() < f64::EPSILON);
}

#[test]
fn missing_plan_file_is_io_error() {
    assert!(matches!(
        TrajectoryPlan::load(samples().join("trajectories/nope.toml")),
        Err(TrajectoryError::Io(_))
    ));
}
