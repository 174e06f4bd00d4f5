//! Solve command handler

use crate::args::{BaselineArgs, SolveCommand};
use gpa_planner::config::Config;
use gpa_planner::core::export::{export_snapshot_json, TranscriptSnapshot};
use gpa_planner::core::models::ParsedTranscript;
use gpa_planner::core::resolution::{resolve_transcript, TranscriptAggregate};
use gpa_planner::core::solver::{
    credits_needed, letter_for, letter_needed, projected_cgpa, required_semester_average,
    Baseline, Solution, SolverResult,
};
use gpa_planner::core::transcript::load_transcript;
use logger::{debug, error, info};
use std::path::{Path, PathBuf};

fn load_resolved(path: &Path) -> Result<(ParsedTranscript, TranscriptAggregate), String> {
    let transcript = load_transcript(path).map_err(|e| {
        error!("Failed to load transcript {}: {e}", path.display());
        format!("✗ Failed to load {}: {e}", path.display())
    })?;
    let aggregate = resolve_transcript(&transcript, &Default::default());
    Ok((transcript, aggregate))
}

/// Work out the baseline from the command-line arguments.
///
/// A transcript wins over explicit values; with neither the baseline is empty
/// and every calculator answers `NeedCurrentData`.
///
/// # Errors
/// Returns a printable message if the transcript cannot be read or the
/// explicit CGPA/credits are out of range.
pub fn baseline_from_args(args: &BaselineArgs) -> Result<Baseline, String> {
    if let Some(path) = &args.transcript {
        let (transcript, aggregate) = load_resolved(path)?;
        return Ok(Baseline::from_aggregate(&aggregate, transcript.summary.as_ref()));
    }

    match (args.cgpa, args.credits_done) {
        (Some(cgpa), Some(credits)) => {
            Baseline::checked(cgpa, credits).map_err(|e| format!("✗ {e}"))
        }
        _ => Ok(Baseline::default()),
    }
}

/// Answer one solver question against a baseline
#[must_use]
pub fn answer(baseline: Baseline, question: &SolveCommand) -> (&'static str, SolverResult) {
    match *question {
        SolveCommand::Required { credits, target } => (
            "Required semester average",
            required_semester_average(baseline, credits, target),
        ),
        SolveCommand::Project { average, credits } => (
            "Projected CGPA",
            projected_cgpa(baseline, average, credits),
        ),
        SolveCommand::Credits { target, average } => (
            "Credits needed",
            credits_needed(baseline, target, average),
        ),
    }
}

/// Operation name and inputs recorded in a snapshot
fn record_of(question: &SolveCommand) -> (&'static str, [f64; 2]) {
    match *question {
        SolveCommand::Required { credits, target } => ("required", [credits, target]),
        SolveCommand::Project { average, credits } => ("project", [average, credits]),
        SolveCommand::Credits { target, average } => ("credits", [target, average]),
    }
}

/// Run the solve command
///
/// With `export`, the transcript snapshot is written to the exports directory
/// with this answer attached, whether or not the inputs were accepted.
///
/// # Errors
/// Returns a printable message for an unreadable transcript, a rejected
/// input, or a snapshot that cannot be written.
pub fn run(
    args: &BaselineArgs,
    question: &SolveCommand,
    export: bool,
    config: &Config,
    verbose: bool,
) -> Result<(), String> {
    let loaded = match (&args.transcript, export) {
        (Some(path), true) => Some((path, load_resolved(path)?)),
        (None, true) => return Err("✗ --export needs --transcript".to_string()),
        (_, false) => None,
    };
    let baseline = match &loaded {
        Some((_, (transcript, aggregate))) => {
            Baseline::from_aggregate(aggregate, transcript.summary.as_ref())
        }
        None => baseline_from_args(args)?,
    };
    debug!("Solver baseline: cgpa={} credits={}", baseline.cgpa, baseline.credits);
    if verbose {
        println!(
            "✓ Baseline: CGPA {:.2} over {:.1} credits",
            baseline.cgpa, baseline.credits
        );
    }

    let (label, result) = answer(baseline, question);

    if let Some((path, (transcript, aggregate))) = loaded {
        let written = export_answer(
            path,
            &transcript,
            aggregate,
            question,
            result,
            &config.paths.exports_dir,
        )?;
        info!("Snapshot exported: {}", written.display());
        println!("✓ Snapshot written: {}", written.display());
    }

    match result {
        Ok(solution) => {
            println!("{label}: {}", describe(question, solution));
            Ok(())
        }
        Err(e) => {
            error!("{label} rejected: {e}");
            Err(format!("✗ {e}"))
        }
    }
}

fn export_answer(
    path: &Path,
    transcript: &ParsedTranscript,
    aggregate: TranscriptAggregate,
    question: &SolveCommand,
    result: SolverResult,
    exports_dir: &str,
) -> Result<PathBuf, String> {
    let stem = path
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or("transcript");
    let mut snapshot = TranscriptSnapshot::new(stem, transcript, aggregate);
    let (operation, inputs) = record_of(question);
    snapshot.add_solution(operation, &inputs, result);
    export_snapshot_json(&snapshot, exports_dir)
        .map_err(|e| format!("✗ Failed to export snapshot: {e}"))
}

fn describe(question: &SolveCommand, solution: Solution) -> String {
    let letter = match question {
        SolveCommand::Required { .. } => letter_needed(solution),
        SolveCommand::Project { .. } => letter_for(solution),
        SolveCommand::Credits { .. } => None,
    };
    match letter {
        Some(letter) => format!("{solution} ({letter})"),
        None => solution.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gpa_planner::core::export::load_snapshot;
    use gpa_planner::core::solver::SolverError;
    use tempfile::TempDir;

    const REQUIRED: SolveCommand = SolveCommand::Required {
        credits: 16.0,
        target: 3.5,
    };

    fn manual(cgpa: f64, credits: f64) -> BaselineArgs {
        BaselineArgs {
            transcript: None,
            cgpa: Some(cgpa),
            credits_done: Some(credits),
        }
    }

    fn alice() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("samples/transcripts/alice.txt")
    }

    #[test]
    fn test_manual_baseline() {
        let baseline = baseline_from_args(&manual(3.0, 60.0)).unwrap();
        assert_eq!(baseline, Baseline::new(3.0, 60.0));
    }

    #[test]
    fn test_manual_baseline_out_of_range() {
        for args in [manual(3.0, -10.0), manual(4.2, 60.0), manual(f64::NAN, 60.0)] {
            let message = baseline_from_args(&args).unwrap_err();
            assert_eq!(message, format!("✗ {}", SolverError::InvalidBaseline));
        }
    }

    #[test]
    fn test_missing_baseline_is_degenerate() {
        let args = BaselineArgs {
            transcript: None,
            cgpa: None,
            credits_done: None,
        };
        let baseline = baseline_from_args(&args).unwrap();
        let (_, result) = answer(baseline, &REQUIRED);
        assert!(result.unwrap_err().is_degenerate());
    }

    #[test]
    fn test_describe_letters_per_question() {
        // A required average names the lowest letter that still reaches it
        assert_eq!(describe(&REQUIRED, Solution::Value(3.72)), "3.72 (A)");
        assert_eq!(describe(&REQUIRED, Solution::Value(3.68)), "3.68 (A-)");

        let project = SolveCommand::Project {
            average: 3.5,
            credits: 16.0,
        };
        assert_eq!(describe(&project, Solution::Value(3.72)), "3.72 (A-)");
        assert_eq!(
            describe(&project, Solution::AlreadyAchieved),
            "Already achieved"
        );

        let credits = SolveCommand::Credits {
            target: 3.5,
            average: 4.0,
        };
        assert_eq!(describe(&credits, Solution::Value(40.0)), "40.00");
    }

    #[test]
    fn test_export_attaches_answer() {
        let dir = TempDir::new().unwrap();
        let mut config = Config::from_defaults();
        config.paths.exports_dir = dir.path().join("exports").to_string_lossy().into_owned();

        let args = BaselineArgs {
            transcript: Some(alice()),
            cgpa: None,
            credits_done: None,
        };
        let question = SolveCommand::Required {
            credits: 20.0,
            target: 3.6,
        };
        run(&args, &question, true, &config, false).unwrap();

        let snapshot = load_snapshot(dir.path().join("exports/alice_summary.json")).unwrap();
        assert_eq!(snapshot.solutions.len(), 1);
        let record = &snapshot.solutions[0];
        assert_eq!(record.operation, "required");
        assert_eq!(record.inputs, vec![20.0, 3.6]);
        assert_eq!(record.outcome, Ok(Solution::Value(3.68)));
    }

    #[test]
    fn test_export_without_transcript_is_rejected() {
        let config = Config::from_defaults();
        let result = run(&manual(3.0, 60.0), &REQUIRED, true, &config, false);
        assert!(result.is_err());
    }
}
