//! Trajectory command handler

use gpa_planner::config::Config;
use gpa_planner::core::solver::round2;
use gpa_planner::core::trajectory::{evaluate_with_history, TrajectoryPlan, TrajectorySummary};
use gpa_planner::core::transcript::load_transcript;
use logger::{error, info};
use std::path::Path;

/// Run the trajectory command
///
/// # Errors
/// Returns a printable message if the plan or transcript cannot be loaded.
pub fn run(
    input_file: &Path,
    transcript: Option<&Path>,
    json: bool,
    config: &Config,
) -> Result<(), String> {
    let plan = TrajectoryPlan::load(input_file).map_err(|e| {
        error!("Failed to load trajectory {}: {e}", input_file.display());
        format!("✗ Failed to load {}: {e}", input_file.display())
    })?;
    info!(
        "Trajectory loaded: {} ({} semesters)",
        input_file.display(),
        plan.semesters.len()
    );

    let history = transcript
        .map(|path| {
            load_transcript(path).map_err(|e| {
                error!("Failed to load transcript {}: {e}", path.display());
                format!("✗ Failed to load {}: {e}", path.display())
            })
        })
        .transpose()?;

    let summary = evaluate_with_history(&plan, &config.requirements(), history.as_ref());

    if json {
        let out = serde_json::to_string_pretty(&summary)
            .map_err(|e| format!("✗ Failed to serialize summary: {e}"))?;
        println!("{out}");
    } else {
        print_summary(&summary);
    }
    Ok(())
}

fn print_summary(summary: &TrajectorySummary) {
    println!("\n=== Trajectory ===\n");
    println!("{:<24} {:>7} {:>8}", "Semester", "Courses", "Credits");
    for load in &summary.semesters {
        println!("{:<24} {:>7} {:>8.1}", load.name, load.courses, load.credits);
    }

    println!("\nBy category:");
    for (category, credits) in &summary.category_credits {
        println!("  {category:<14} {credits:>6.1}");
    }

    if !summary.department_credits.is_empty() {
        println!("\nBy department:");
        for (dept, credits) in &summary.department_credits {
            println!("  {dept:<14} {credits:>6.1}");
        }
    }

    println!("\nRequirements:");
    for progress in &summary.progress {
        let mark = if progress.is_met() { "✓" } else { "✗" };
        println!(
            "  {mark} {:<14} {:>6.1} / {:<6.1} remaining {:.1}",
            progress.name, progress.planned, progress.required, progress.remaining
        );
    }

    if !summary.duplicates.is_empty() {
        let duplicates: Vec<&str> = summary.duplicates.iter().map(String::as_str).collect();
        println!("\nPlanned more than once: {}", duplicates.join(", "));
    }

    if let Some(cgpa) = summary.projected_cgpa() {
        println!("\nProjected CGPA: {:.2}", round2(cgpa));
    }
}
