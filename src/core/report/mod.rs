//! Report generation for resolved transcripts
//!
//! A [`ReportContext`] gathers a parsed transcript and its resolution so that
//! every format renders from the same data.

pub mod formats;

use crate::core::models::{DegreeSummary, ParsedTranscript};
use crate::core::resolution::{Attempt, Resolution, TranscriptAggregate};
use std::error::Error;
use std::path::Path;

pub use formats::{JsonReporter, MarkdownReporter, ReportFormat};

/// Data context for report generation
#[derive(Debug, Clone)]
pub struct ReportContext<'a> {
    /// Name shown in the report header (usually the transcript file stem)
    pub source: &'a str,
    /// Parsed transcript
    pub transcript: &'a ParsedTranscript,
    /// Winning attempts per identity
    pub resolution: &'a Resolution,
    /// Totals over the winning attempts
    pub aggregate: TranscriptAggregate,
}

impl<'a> ReportContext<'a> {
    /// Create a new report context
    #[must_use]
    pub fn new(source: &'a str, transcript: &'a ParsedTranscript, resolution: &'a Resolution) -> Self {
        Self {
            source,
            transcript,
            resolution,
            aggregate: resolution.aggregate(),
        }
    }

    /// Declared degree summary, if the transcript had one
    #[must_use]
    pub const fn declared(&self) -> Option<&DegreeSummary> {
        self.transcript.summary.as_ref()
    }

    /// Winning attempt of every retaken identity, in identity order
    pub fn retakes(&self) -> impl Iterator<Item = &Attempt> {
        self.resolution
            .retake_keys
            .iter()
            .filter_map(|key| self.resolution.best.get(key))
    }
}

/// Trait for report generators
pub trait ReportGenerator {
    /// Generate a report to a file
    ///
    /// # Errors
    /// Returns an error if report generation or file writing fails
    fn generate(&self, ctx: &ReportContext, output_path: &Path) -> Result<(), Box<dyn Error>>;

    /// Generate report content as a string
    ///
    /// # Errors
    /// Returns an error if report generation fails
    fn render(&self, ctx: &ReportContext) -> Result<String, Box<dyn Error>>;
}
