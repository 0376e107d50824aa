//! Report export functions for JSON and Markdown formats.
//!
//! This module handles saving the coverage report next to the console output
//! so it can be attached to a merge request or archived.

use super::console::{format_branches, format_coverage_listing};
use crate::error::Result;
use crate::types::Report;
use log::info;
use serde_json::json;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Inputs that produced a report, echoed into the exports
#[derive(Debug, Clone, Default)]
pub struct ReportContext {
    pub input: String,
    pub symbol: String,
    pub branch_column: String,
    pub dropped_columns: Vec<String>,
    pub mother_hint: Option<String>,
}

fn report_json(report: &Report, ctx: &ReportContext) -> serde_json::Value {
    let products: Vec<serde_json::Value> = report
        .ranked()
        .map(|(rank, role, step)| {
            json!({
                "rank": rank,
                "role": role.as_str(),
                "product": step.column,
                "branches": step.covered,
            })
        })
        .collect();

    json!({
        "generated_at": chrono::Local::now().to_rfc3339(),
        "input": ctx.input,
        "applicability_symbol": ctx.symbol,
        "branch_column": ctx.branch_column,
        "dropped_columns": ctx.dropped_columns,
        "mother_hint": ctx.mother_hint,
        "summary": {
            "products": report.steps.len(),
            "branches": report.covered_total(),
        },
        "products": products,
    })
}

/// Export the coverage report as pretty-printed JSON.
pub fn export_json_report(report: &Report, ctx: &ReportContext, output_path: &Path) -> Result<()> {
    let file = File::create(output_path)?;
    serde_json::to_writer_pretty(file, &report_json(report, ctx))?;
    info!("JSON report saved to {:?}", output_path);
    Ok(())
}

/// Export the coverage report as Markdown.
///
/// The file holds a header with the run parameters, a table of products and
/// the plain ranked listing in a code block.
pub fn export_markdown_report(report: &Report, ctx: &ReportContext, output_path: &Path) -> Result<()> {
    let mut file = File::create(output_path)?;
    write_markdown(&mut file, report, ctx)?;
    info!("Markdown report saved to {:?}", output_path);
    Ok(())
}

/// Escape text for a Markdown table cell
fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|")
}

fn write_markdown<W: Write>(out: &mut W, report: &Report, ctx: &ReportContext) -> std::io::Result<()> {
    writeln!(out, "# Merge Master Sample: Products to Merge\n")?;
    writeln!(out, "**Generated**: {}", chrono::Local::now().format("%Y-%m-%d %H:%M:%S"))?;
    writeln!(out, "**Input**: {}", ctx.input)?;
    writeln!(out, "**Applicability symbol**: `{}`", ctx.symbol)?;
    writeln!(out, "**Branch column**: {}", ctx.branch_column)?;
    if !ctx.dropped_columns.is_empty() {
        writeln!(out, "**Dropped columns**: {}", ctx.dropped_columns.join(", "))?;
    }
    if let Some(ref hint) = ctx.mother_hint {
        writeln!(out, "**Mother product hint**: {}", hint)?;
    }
    writeln!(out)?;

    writeln!(out, "## Products\n")?;
    if report.is_empty() {
        writeln!(out, "No branches need covering.")?;
        return Ok(());
    }

    writeln!(out, "| # | Role | Product | Branches |")?;
    writeln!(out, "|---|------|---------|----------|")?;
    for (rank, role, step) in report.ranked() {
        writeln!(
            out,
            "| {} | {} | {} | {} |",
            rank,
            role.as_str(),
            escape_cell(&step.column),
            escape_cell(&format_branches(&step.covered))
        )?;
    }
    writeln!(out)?;

    writeln!(out, "```")?;
    write!(out, "{}", format_coverage_listing(report))?;
    writeln!(out, "```")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Cell, CoverageStep};
    use tempfile::TempDir;

    fn sample() -> (Report, ReportContext) {
        let report = Report::new(vec![
            CoverageStep { column: "P1".into(), covered: vec![Cell::text("A"), Cell::Integer(12)] },
            CoverageStep { column: "P3".into(), covered: vec![Cell::Missing] },
        ]);
        let ctx = ReportContext {
            input: "products.csv".into(),
            symbol: "●".into(),
            branch_column: "Branch".into(),
            dropped_columns: vec!["PartNo".into()],
            mother_hint: Some("P1".into()),
        };
        (report, ctx)
    }

    #[test]
    fn test_json_report_shape() {
        let (report, ctx) = sample();
        let value = report_json(&report, &ctx);

        assert_eq!(value["summary"]["products"], 2);
        assert_eq!(value["summary"]["branches"], 3);
        assert_eq!(value["products"][0]["role"], "Mother Product");
        assert_eq!(value["products"][1]["role"], "Additional Product");
        assert_eq!(value["products"][0]["branches"], json!(["A", 12]));
        assert!(value["products"][1]["branches"][0].is_null());
        assert_eq!(value["mother_hint"], "P1");
    }

    #[test]
    fn test_export_json_writes_file() {
        let (report, ctx) = sample();
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("report.json");

        export_json_report(&report, &ctx, &path).unwrap();

        let parsed: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(parsed["products"][0]["product"], "P1");
    }

    #[test]
    fn test_markdown_report() {
        let (report, ctx) = sample();
        let mut out = Vec::new();
        write_markdown(&mut out, &report, &ctx).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.starts_with("# Merge Master Sample: Products to Merge"));
        assert!(text.contains("**Dropped columns**: PartNo"));
        assert!(text.contains("| 1 | Mother Product | P1 | A, 12 |"));
        assert!(text.contains("| 2 | Additional Product | P3 | NaN |"));
        assert!(text.contains("1: Mother Product: P1\n"));
    }

    #[test]
    fn test_markdown_escapes_pipes() {
        let (_, ctx) = sample();
        let report = Report::new(vec![CoverageStep {
            column: "P1|LH".into(),
            covered: vec![Cell::text("A|1"), Cell::text("B")],
        }]);
        let mut out = Vec::new();
        write_markdown(&mut out, &report, &ctx).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.contains("| 1 | Mother Product | P1\\|LH | A\\|1, B |"));
        // The plain listing in the code block stays unescaped
        assert!(text.contains("1: Mother Product: P1|LH\n"));
    }

    #[test]
    fn test_markdown_report_empty() {
        let (_, ctx) = sample();
        let mut out = Vec::new();
        write_markdown(&mut out, &Report::default(), &ctx).unwrap();
        assert!(String::from_utf8(out).unwrap().contains("No branches need covering."));
    }
}
