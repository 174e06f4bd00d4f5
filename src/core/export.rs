//! Export resolved transcripts as JSON snapshots

use crate::core::models::{DegreeSummary, ParsedTranscript};
use crate::core::resolution::{semester_gpa, TranscriptAggregate};
use crate::core::solver::{round2, Baseline, SolverResult};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};

/// Trait for writing snapshots in different formats
pub trait SnapshotExporter {
    /// Write `snapshot` to `output_path`
    ///
    /// # Errors
    /// Returns an error if serialization or file writing fails
    fn export(&self, snapshot: &TranscriptSnapshot, output_path: &Path)
        -> Result<(), Box<dyn Error>>;
}

/// One semester line of a snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SemesterLine {
    /// Semester name
    pub name: String,
    /// Number of course rows
    pub courses: usize,
    /// GPA recomputed from the rows
    pub computed_gpa: Option<f64>,
    /// GPA the transcript declared
    pub declared_gpa: f64,
    /// Whether the semester is the current/upcoming one
    pub upcoming: bool,
}

/// A solver invocation and its outcome
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolverRecord {
    /// Which calculator ran (e.g. "required")
    pub operation: String,
    /// Inputs in the order the calculator takes them
    pub inputs: Vec<f64>,
    /// Outcome
    pub outcome: SolverResult,
}

/// Everything worth keeping from one transcript run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptSnapshot {
    /// Transcript file stem
    pub source: String,
    /// Number of semesters parsed
    pub semester_count: usize,
    /// Number of course rows parsed
    pub course_count: usize,
    /// Resolved totals
    pub aggregate: TranscriptAggregate,
    /// Resolved CGPA, rounded to two decimals
    pub cgpa: f64,
    /// Solver baseline derived from the aggregate
    pub baseline: Baseline,
    /// Declared degree summary
    pub declared: Option<DegreeSummary>,
    /// Per-semester lines
    pub semesters: Vec<SemesterLine>,
    /// Solver runs attached to this snapshot
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub solutions: Vec<SolverRecord>,
}

impl TranscriptSnapshot {
    /// Build a snapshot from a parsed transcript and its resolved totals
    #[must_use]
    pub fn new(source: &str, transcript: &ParsedTranscript, aggregate: TranscriptAggregate) -> Self {
        let baseline = Baseline::from_aggregate(&aggregate, transcript.summary.as_ref());
        let semesters = transcript
            .semesters
            .iter()
            .map(|s| SemesterLine {
                name: s.name.clone(),
                courses: s.courses.len(),
                computed_gpa: semester_gpa(s).map(round2),
                declared_gpa: s.gpa,
                upcoming: s.is_upcoming(),
            })
            .collect();

        Self {
            source: source.to_string(),
            semester_count: transcript.semesters.len(),
            course_count: transcript.course_count(),
            cgpa: round2(aggregate.cgpa()),
            aggregate,
            baseline,
            declared: transcript.summary,
            semesters,
            solutions: Vec::new(),
        }
    }

    /// Attach a solver run
    pub fn add_solution(&mut self, operation: &str, inputs: &[f64], outcome: SolverResult) {
        self.solutions.push(SolverRecord {
            operation: operation.to_string(),
            inputs: inputs.to_vec(),
            outcome,
        });
    }
}

/// Pretty-printed JSON exporter
#[derive(Debug, Default)]
pub struct JsonExporter;

impl SnapshotExporter for JsonExporter {
    fn export(
        &self,
        snapshot: &TranscriptSnapshot,
        output_path: &Path,
    ) -> Result<(), Box<dyn Error>> {
        let json = serde_json::to_string_pretty(snapshot)?;
        fs::write(output_path, json)?;
        Ok(())
    }
}

/// Path a snapshot for `stem` is written to inside `exports_dir`
#[must_use]
pub fn snapshot_path(exports_dir: &Path, stem: &str) -> PathBuf {
    exports_dir.join(format!("{stem}_summary.json"))
}

/// Write `snapshot` as `<exports_dir>/<source>_summary.json`, creating the
/// directory if needed. Returns the written path.
///
/// # Errors
/// Returns an error if the directory cannot be created or the file written
pub fn export_snapshot_json<P: AsRef<Path>>(
    snapshot: &TranscriptSnapshot,
    exports_dir: P,
) -> Result<PathBuf, Box<dyn Error>> {
    let exports_dir = exports_dir.as_ref();
    fs::create_dir_all(exports_dir)?;
    let path = snapshot_path(exports_dir, &snapshot.source);
    JsonExporter.export(snapshot, &path)?;
    logger::debug!("Snapshot for '{}' written to {}", snapshot.source, path.display());
    Ok(path)
}

/// Read a snapshot back
///
/// # Errors
/// Returns an error if the file cannot be read or is not a snapshot
pub fn load_snapshot<P: AsRef<Path>>(path: P) -> Result<TranscriptSnapshot, Box<dyn Error>> {
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}
