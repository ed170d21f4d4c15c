//! Human and JSON rendering of lint results.

use std::fmt::Write as _;
use std::path::PathBuf;

use anyhow::Result;
use colored::Colorize;
use graphql_tag_linter::{Diagnostic, DiagnosticSeverity};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output with colors
    Human,
    /// JSON array of diagnostics for tooling
    Json,
}

/// Diagnostics found in one file.
#[derive(Debug)]
pub struct FileReport {
    pub path: PathBuf,
    pub diagnostics: Vec<Diagnostic>,
}

/// Error and warning totals across a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Totals {
    pub errors: usize,
    pub warnings: usize,
}

impl Totals {
    #[must_use]
    pub fn count(reports: &[FileReport]) -> Self {
        reports
            .iter()
            .flat_map(|report| &report.diagnostics)
            .fold(Self::default(), |mut totals, diag| {
                if diag.severity.is_error() {
                    totals.errors += 1;
                } else {
                    totals.warnings += 1;
                }
                totals
            })
    }

    #[must_use]
    pub const fn problems(self) -> usize {
        self.errors + self.warnings
    }
}

#[derive(Serialize)]
struct JsonDiagnostic<'a> {
    file: String,
    line: usize,
    column: usize,
    severity: String,
    rule: &'a str,
    message: &'a str,
}

pub fn render(format: OutputFormat, reports: &[FileReport]) -> Result<String> {
    match format {
        OutputFormat::Human => Ok(render_human(reports)),
        OutputFormat::Json => render_json(reports),
    }
}

fn render_json(reports: &[FileReport]) -> Result<String> {
    let diagnostics: Vec<JsonDiagnostic<'_>> = reports
        .iter()
        .flat_map(|report| {
            report.diagnostics.iter().map(|diag| JsonDiagnostic {
                file: report.path.display().to_string(),
                line: diag.location.line,
                column: diag.location.column,
                severity: diag.severity.to_string(),
                rule: &diag.rule,
                message: &diag.message,
            })
        })
        .collect();
    Ok(serde_json::to_string_pretty(&diagnostics)?)
}

fn render_human(reports: &[FileReport]) -> String {
    let mut out = String::new();

    for report in reports.iter().filter(|r| !r.diagnostics.is_empty()) {
        let _ = writeln!(out, "\n{}", report.path.display().to_string().underline());
        for diag in &report.diagnostics {
            let severity = match diag.severity {
                DiagnosticSeverity::Error => "error".red().bold(),
                DiagnosticSeverity::Warning => "warning".yellow().bold(),
            };
            let _ = writeln!(
                out,
                "  {:<8} {severity:<7}  {}  {}",
                diag.location.to_string().dimmed(),
                diag.message,
                diag.rule.dimmed()
            );
        }
    }

    let totals = Totals::count(reports);
    if totals.problems() == 0 {
        let _ = writeln!(out, "{}", "✓ No problems found".green().bold());
    } else {
        let summary = format!(
            "\n✗ {} problem(s) ({} error(s), {} warning(s))",
            totals.problems(),
            totals.errors,
            totals.warnings
        );
        let summary = if totals.errors > 0 {
            summary.red().bold()
        } else {
            summary.yellow().bold()
        };
        let _ = writeln!(out, "{summary}");
    }

    out
}
