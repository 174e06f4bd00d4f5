//! JSON report generator
//!
//! Renders the same snapshot the export command writes.

use crate::core::export::TranscriptSnapshot;
use crate::core::report::{ReportContext, ReportGenerator};
use std::error::Error;
use std::fs;
use std::path::Path;

/// JSON report generator
#[derive(Debug, Default)]
pub struct JsonReporter;

impl ReportGenerator for JsonReporter {
    fn generate(&self, ctx: &ReportContext, output_path: &Path) -> Result<(), Box<dyn Error>> {
        fs::write(output_path, self.render(ctx)?)?;
        Ok(())
    }

    fn render(&self, ctx: &ReportContext) -> Result<String, Box<dyn Error>> {
        let snapshot = TranscriptSnapshot::new(ctx.source, ctx.transcript, ctx.aggregate.clone());
        Ok(serde_json::to_string_pretty(&snapshot)?)
    }
}
