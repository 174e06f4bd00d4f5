//! Transcript command handler

use gpa_planner::config::Config;
use gpa_planner::core::export::{export_snapshot_json, TranscriptSnapshot};
use gpa_planner::core::models::{GradeLabel, ParsedTranscript};
use gpa_planner::core::report::{ReportContext, ReportFormat};
use gpa_planner::core::resolution::{resolve_transcript_detailed, semester_gpa, GradeSelections};
use gpa_planner::core::solver::round2;
use gpa_planner::core::transcript::load_transcript;
use logger::{error, info, warn};
use std::path::{Path, PathBuf};

/// What to do with a parsed transcript besides printing it
#[derive(Debug, Default)]
pub struct TranscriptOptions {
    /// Raw `ROW=GRADE` selections for the current semester
    pub grades: Vec<String>,
    /// Print JSON instead of text
    pub json: bool,
    /// Write a snapshot to the exports directory
    pub export: bool,
    /// Report output path
    pub report: Option<PathBuf>,
}

/// Parse `ROW=GRADE` selections into a map keyed by row index.
///
/// # Errors
/// Returns a message naming the first malformed selection.
pub fn parse_grade_selections(raw: &[String]) -> Result<GradeSelections, String> {
    raw.iter()
        .map(|entry| {
            let (row, grade) = entry
                .split_once('=')
                .ok_or_else(|| format!("✗ Expected ROW=GRADE, got '{entry}'"))?;
            let row = row
                .trim()
                .parse::<usize>()
                .map_err(|_| format!("✗ Invalid row index in '{entry}'"))?;
            let grade = grade
                .parse::<GradeLabel>()
                .map_err(|e| format!("✗ {e}"))?;
            Ok((row, grade))
        })
        .collect()
}

/// Run the transcript command
///
/// # Errors
/// Returns a printable message if the file cannot be read, a selection is
/// malformed, or an output file cannot be written.
pub fn run(input_file: &Path, options: &TranscriptOptions, config: &Config, verbose: bool) -> Result<(), String> {
    let selections = parse_grade_selections(&options.grades)?;

    let transcript = load_transcript(input_file).map_err(|e| {
        error!("Failed to load transcript {}: {e}", input_file.display());
        format!("✗ Failed to load {}: {e}", input_file.display())
    })?;

    if transcript.is_empty() {
        warn!("No semesters found in {}", input_file.display());
    }
    if verbose {
        println!(
            "✓ Transcript loaded from: {} ({} semesters, {} course rows)",
            input_file.display(),
            transcript.semesters.len(),
            transcript.course_count()
        );
    } else {
        info!("Transcript loaded: {}", input_file.display());
    }
    check_selections(&transcript, &selections);

    let resolution = resolve_transcript_detailed(&transcript, &selections);
    let stem = input_file
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or("transcript");
    let snapshot = TranscriptSnapshot::new(stem, &transcript, resolution.aggregate());

    if options.json {
        let json = serde_json::to_string_pretty(&snapshot)
            .map_err(|e| format!("✗ Failed to serialize snapshot: {e}"))?;
        println!("{json}");
    } else {
        print_summary(&transcript, &snapshot);
    }

    if options.export {
        let path = export_snapshot_json(&snapshot, &config.paths.exports_dir)
            .map_err(|e| format!("✗ Failed to export snapshot: {e}"))?;
        info!("Snapshot exported: {}", path.display());
        println!("✓ Snapshot written: {}", path.display());
    }

    if let Some(report) = &options.report {
        let path = report_path(report, &config.paths.reports_dir);
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| {
                format!("✗ Failed to create reports directory {}: {e}", parent.display())
            })?;
        }
        let ctx = ReportContext::new(stem, &transcript, &resolution);
        let format = ReportFormat::from_path(&path);
        format
            .generator()
            .generate(&ctx, &path)
            .map_err(|e| format!("✗ Failed to write {format} report: {e}"))?;
        info!("Report generated: {}", path.display());
        println!("✓ Report generated: {}", path.display());
    }

    Ok(())
}

/// A bare file name goes into the configured reports directory
fn report_path(report: &Path, reports_dir: &str) -> PathBuf {
    let bare = report.parent().is_none_or(|p| p.as_os_str().is_empty());
    if bare && !reports_dir.is_empty() {
        Path::new(reports_dir).join(report)
    } else {
        report.to_path_buf()
    }
}

fn check_selections(transcript: &ParsedTranscript, selections: &GradeSelections) {
    if selections.is_empty() {
        return;
    }
    match transcript.current_semester() {
        None => warn!("Grade selections ignored: transcript has no current semester"),
        Some(current) => {
            for row in selections.keys().filter(|row| **row >= current.courses.len()) {
                warn!(
                    "Grade selection for row {row} ignored: '{}' has {} rows",
                    current.name,
                    current.courses.len()
                );
            }
        }
    }
}

fn print_summary(transcript: &ParsedTranscript, snapshot: &TranscriptSnapshot) {
    println!("\n=== {} ===\n", snapshot.source);
    println!("{:<24} {:>7} {:>9} {:>9}", "Semester", "Courses", "GPA", "Declared");
    for semester in &transcript.semesters {
        let computed = semester_gpa(semester)
            .map_or_else(|| "-".to_string(), |gpa| format!("{:.2}", round2(gpa)));
        let declared = if semester.is_upcoming() {
            "upcoming".to_string()
        } else {
            format!("{:.2}", semester.gpa)
        };
        println!(
            "{:<24} {:>7} {:>9} {:>9}",
            semester.name,
            semester.courses.len(),
            computed,
            declared
        );
    }

    println!();
    println!("CGPA:           {:.2}", snapshot.cgpa);
    if let Some(declared) = &snapshot.declared {
        println!("Declared CGPA:  {:.2}", declared.degree_cgpa);
    }
    println!("GPA credits:    {:.1}", snapshot.aggregate.total_gpa_credits);
    println!("Earned credits: {:.1}", snapshot.aggregate.total_earned_credits);
    if !snapshot.aggregate.retake_keys.is_empty() {
        let retakes: Vec<&str> = snapshot
            .aggregate
            .retake_keys
            .iter()
            .map(String::as_str)
            .collect();
        println!("Retaken:        {}", retakes.join(", "));
    }
}
