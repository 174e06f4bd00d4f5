//! Transcript ingestion

pub mod parser;

pub use parser::{parse_course_row, parse_semesters, parse_transcript, RowError, RowField};

use crate::core::models::ParsedTranscript;
use std::error::Error;
use std::fs;
use std::path::Path;

/// Read a transcript dump from disk and parse it
///
/// # Errors
/// Returns an error if the file cannot be read. Unparseable content is not an
/// error; it yields an empty transcript.
pub fn load_transcript<P: AsRef<Path>>(path: P) -> Result<ParsedTranscript, Box<dyn Error>> {
    let content = fs::read_to_string(path)?;
    Ok(parse_transcript(&content))
}
