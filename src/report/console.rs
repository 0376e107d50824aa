//! Console output for both pipelines.
//!
//! Everything here prints to stdout; write errors on the console are ignored
//! the same way `println!` callers ignore them.

use crate::console_format::TableWriter;
use crate::labels::highest_counts;
use crate::table::Table;
use crate::types::{ApplicableCount, Cell, ProductRole, Report};
use std::io::{self, IsTerminal};

/// Join branch identifiers for display
pub fn format_branches(cells: &[Cell]) -> String {
    cells.iter().map(|c| c.to_string()).collect::<Vec<_>>().join(", ")
}

/// Ranked plain-text listing, one product per entry
///
/// ```text
/// 1: Mother Product: 7M0A-1
///    Branches: W-101, W-102
/// 2: Additional Product: 7M0C-1
///    Branches: W-205
/// ```
pub fn format_coverage_listing(report: &Report) -> String {
    let mut out = String::new();
    for (rank, role, step) in report.ranked() {
        out.push_str(&format!("{}: {}: {}\n", rank, role.as_str(), step.column));
        out.push_str(&format!("   Branches: {}\n", format_branches(&step.covered)));
    }
    out
}

fn stdout_writer() -> TableWriter<io::Stdout> {
    let use_colors = io::stdout().is_terminal();
    TableWriter::new(io::stdout(), use_colors)
}

/// Print the per-product symbol counts, highlighting the highest
pub fn print_applicable_counts(counts: &[ApplicableCount]) {
    println!("\nCount of Applicable Parts Per Product");

    let top = highest_counts(counts);
    let rows: Vec<Vec<String>> = counts.iter().map(|c| vec![c.column.clone(), c.count.to_string()]).collect();
    let highlight: Vec<bool> = counts.iter().map(|c| c.count > 0 && top.contains(&c.column.as_str())).collect();

    let _ = stdout_writer().write_grid(
        &["Product", "Count of Applicable Parts"],
        &rows,
        &highlight,
        term::color::BRIGHT_GREEN,
    );
}

/// Print the first `max_rows` rows of a table
pub fn print_table_preview(title: &str, table: &Table, max_rows: usize) {
    println!("\n{}", title);

    let headers: Vec<&str> = table.column_names().collect();
    let shown = table.row_count().min(max_rows);
    let rows: Vec<Vec<String>> =
        (0..shown).map(|r| table.row(r).into_iter().map(Cell::render).collect()).collect();

    let _ = stdout_writer().write_grid(&headers, &rows, &[], term::color::WHITE);

    if table.row_count() > shown {
        println!("... and {} more row(s)", table.row_count() - shown);
    }
}

pub fn print_mother_hint(hint: Option<&str>) {
    match hint {
        Some(column) => println!("\nMother product hint (most applicable parts): {}", column),
        None => println!("\nMother product hint: no product columns left after filtering"),
    }
}

/// Print the ranked products needed to form the merge master sample
pub fn print_coverage_report(report: &Report) {
    println!("\nProducts Needed to Form the Merge Master Sample");

    if report.is_empty() {
        println!("No branches need covering: every row applies to all products.");
        return;
    }

    let rows: Vec<Vec<String>> = report
        .ranked()
        .map(|(rank, role, step)| {
            vec![rank.to_string(), role.as_str().to_string(), step.column.clone(), format_branches(&step.covered)]
        })
        .collect();
    let highlight: Vec<bool> = report.ranked().map(|(_, role, _)| role == ProductRole::Mother).collect();

    let _ = stdout_writer().write_grid(&["#", "Role", "Product", "Branches"], &rows, &highlight, term::color::BRIGHT_CYAN);

    if let Some(mother) = report.mother() {
        println!(
            "Mother product {} plus {} additional product(s) cover {} branch(es)",
            mother.column,
            report.additional().len(),
            report.covered_total()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CoverageStep;

    #[test]
    fn test_format_branches_shows_missing() {
        let cells = vec![Cell::text("W-101"), Cell::Integer(7), Cell::Missing];
        assert_eq!(format_branches(&cells), "W-101, 7, NaN");
    }

    #[test]
    fn test_coverage_listing() {
        let report = Report::new(vec![
            CoverageStep { column: "P1".into(), covered: vec![Cell::text("A"), Cell::text("B")] },
            CoverageStep { column: "P3".into(), covered: vec![Cell::text("D")] },
        ]);

        assert_eq!(
            format_coverage_listing(&report),
            "1: Mother Product: P1\n   Branches: A, B\n2: Additional Product: P3\n   Branches: D\n"
        );
    }

    #[test]
    fn test_coverage_listing_empty() {
        assert_eq!(format_coverage_listing(&Report::default()), "");
    }
}
