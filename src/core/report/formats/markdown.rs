//! Markdown report generator
//!
//! Generates transcript reports as Markdown tables, which render well in
//! GitHub, GitLab, and VS Code.

use crate::core::report::{ReportContext, ReportGenerator};
use crate::core::resolution::semester_gpa;
use crate::core::solver::round2;
use std::error::Error;
use std::fmt::Write;
use std::fs;
use std::path::Path;

/// Embedded Markdown report template
const MARKDOWN_TEMPLATE: &str = include_str!("../templates/report.md");

/// Markdown report generator
pub struct MarkdownReporter;

impl MarkdownReporter {
    /// Create a new Markdown reporter
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Render the report using template substitution
    #[allow(clippy::unused_self)]
    fn render_template(&self, ctx: &ReportContext) -> String {
        let declared = ctx.declared();
        let declared_value = |value: Option<f64>| value.map_or_else(|| "-".to_string(), |v| format!("{v:.2}"));

        let mut output = MARKDOWN_TEMPLATE.to_string();
        output = output.replace("{{source}}", ctx.source);
        output = output.replace("{{cgpa}}", &format!("{:.2}", round2(ctx.aggregate.cgpa())));
        output = output.replace(
            "{{declared_cgpa}}",
            &declared_value(declared.map(|d| d.degree_cgpa)),
        );
        output = output.replace(
            "{{declared_major_cgpa}}",
            &declared_value(declared.map(|d| d.major_cgpa)),
        );
        output = output.replace(
            "{{gpa_credits}}",
            &format!("{:.1}", ctx.aggregate.total_gpa_credits),
        );
        output = output.replace(
            "{{earned_credits}}",
            &format!("{:.1}", ctx.aggregate.total_earned_credits),
        );
        output = output.replace(
            "{{declared_credits}}",
            &declared.map_or_else(|| "-".to_string(), |d| format!("{:.1}", d.total_counted_credits)),
        );
        output = output.replace(
            "{{semester_count}}",
            &ctx.transcript.semesters.len().to_string(),
        );
        output = output.replace(
            "{{course_count}}",
            &ctx.transcript.course_count().to_string(),
        );

        output = output.replace("{{semester_table}}", &Self::generate_semester_table(ctx));
        output = output.replace("{{retake_table}}", &Self::generate_retake_table(ctx));

        output
    }

    /// Generate the per-semester table
    fn generate_semester_table(ctx: &ReportContext) -> String {
        let mut table = String::new();

        table.push_str("| Semester | Courses | Credits | GPA (computed) | GPA (declared) | CGPA (declared) |\n");
        table.push_str("|---|---|---|---|---|---|\n");

        for semester in &ctx.transcript.semesters {
            let computed = semester_gpa(semester)
                .map_or_else(|| "-".to_string(), |gpa| format!("{:.2}", round2(gpa)));
            let (declared_gpa, declared_cgpa) = if semester.is_upcoming() {
                ("upcoming".to_string(), "-".to_string())
            } else {
                (format!("{:.2}", semester.gpa), format!("{:.2}", semester.cgpa))
            };

            let _ = writeln!(
                table,
                "| {} | {} | {:.1} | {computed} | {declared_gpa} | {declared_cgpa} |",
                semester.name,
                semester.courses.len(),
                semester.registered_credits(),
            );
        }

        table
    }

    /// Generate the retaken-course table
    fn generate_retake_table(ctx: &ReportContext) -> String {
        let mut retakes = ctx.retakes().peekable();
        if retakes.peek().is_none() {
            return "No retaken courses.\n".to_string();
        }

        let mut table = String::new();
        table.push_str("| Course | Counted grade | GPA credits | Grade points |\n");
        table.push_str("|---|---|---|---|\n");
        for attempt in retakes {
            let _ = writeln!(
                table,
                "| {} | {} | {:.1} | {:.2} |",
                attempt.key, attempt.grade, attempt.gpa_credits, attempt.grade_points
            );
        }
        table
    }
}

impl Default for MarkdownReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportGenerator for MarkdownReporter {
    fn generate(&self, ctx: &ReportContext, output_path: &Path) -> Result<(), Box<dyn Error>> {
        let report_content = self.render(ctx)?;
        fs::write(output_path, report_content)?;
        Ok(())
    }

    fn render(&self, ctx: &ReportContext) -> Result<String, Box<dyn Error>> {
        Ok(self.render_template(ctx))
    }
}
