//! Product-Coverage Reducer.
//!
//! Given a parts x products matrix where a product column is non-missing for
//! every part it carries, find a small ordered set of products that together
//! cover every branch (part row):
//!
//! 1. rows carrying the applicability symbol in the most columns are the
//!    shared baseline and are removed up front
//! 2. caller-selected identifier columns are dropped
//! 3. the product covering the most remaining rows is selected, its rows are
//!    removed, and the loop repeats until no rows remain
//!
//! Each iteration removes at least one row, so the loop terminates; a
//! remaining row that no product covers is reported as `Error::Unreducible`.

use crate::error::{Error, Result};
use crate::table::Table;
use crate::types::{Cell, CoverageStep, Report};
use log::{debug, warn};

/// Run the full reduction and return the ordered report
pub fn reduce(table: Table, symbol: &str, drop_columns: &[String], branch_column: &str) -> Result<Report> {
    let prepared = prepare(table, symbol, drop_columns, branch_column)?;
    let steps = eliminate(prepared, branch_column)?;
    Ok(Report::new(steps))
}

/// Validate the options, remove baseline rows and drop the requested columns
pub fn prepare(table: Table, symbol: &str, drop_columns: &[String], branch_column: &str) -> Result<Table> {
    table.position(branch_column).map_err(|e| e.for_option("--branch-column"))?;
    for name in drop_columns {
        table.position(name).map_err(|e| e.for_option("--drop-columns"))?;
        if name == branch_column {
            return Err(Error::InvalidSetting {
                option: "--drop-columns",
                reason: format!("'{}' is the branch column and cannot be dropped", name),
            });
        }
    }

    let table = drop_baseline_rows(table, symbol);
    table.drop_columns(drop_columns)
}

/// Remove the rows with the highest symbol count
///
/// These rows apply to every branch and need no product selection. When no
/// row carries the symbol every row ties at zero and all of them are removed.
pub fn drop_baseline_rows(table: Table, symbol: &str) -> Table {
    let counts: Vec<usize> =
        (0..table.row_count()).map(|r| table.row(r).into_iter().filter(|c| c.matches(symbol)).count()).collect();

    let max = counts.iter().copied().max().unwrap_or(0);
    if max == 0 && table.row_count() > 0 {
        warn!("No row carries the symbol '{}'; every row is treated as baseline", symbol);
    }

    let keep: Vec<bool> = counts.iter().map(|&c| c != max).collect();
    let removed = keep.iter().filter(|k| !**k).count();
    debug!("Removing {} baseline row(s) carrying the symbol {} time(s)", removed, max);

    table.retain_rows(&keep)
}

/// Greedy elimination loop over a prepared table
pub fn eliminate(mut table: Table, branch_column: &str) -> Result<Vec<CoverageStep>> {
    let branch_idx = table.position(branch_column).map_err(|e| e.for_option("--branch-column"))?;
    let mut steps = Vec::new();

    while !table.is_empty() {
        let remaining = table.row_count();
        let (selected, count) = match select_product(&table, branch_idx) {
            Some((idx, count)) if count > 0 => (idx, count),
            _ => return Err(Error::Unreducible { remaining_rows: remaining }),
        };

        let columns = table.columns();
        let product = &columns[selected];
        let keep: Vec<bool> = product.cells.iter().map(Cell::is_missing).collect();
        let covered: Vec<Cell> =
            columns[branch_idx].cells.iter().zip(&keep).filter(|(_, k)| !**k).map(|(c, _)| c.clone()).collect();

        debug!("Step {}: '{}' covers {} of {} remaining row(s)", steps.len() + 1, product.name, count, remaining);
        steps.push(CoverageStep { column: product.name.clone(), covered });

        table = table.retain_rows(&keep);
        debug_assert!(table.row_count() < remaining);
    }

    Ok(steps)
}

/// Column (other than the branch column) with the most non-missing cells
///
/// Ties go to the first column in table order. Returns the position and the
/// count, or `None` when there is no candidate column at all.
fn select_product(table: &Table, branch_idx: usize) -> Option<(usize, usize)> {
    let mut best: Option<(usize, usize)> = None;
    let mut tied = false;

    for (idx, column) in table.columns().iter().enumerate() {
        if idx == branch_idx {
            continue;
        }
        let count = column.non_missing_count();
        match best {
            Some((_, best_count)) if count > best_count => {
                best = Some((idx, count));
                tied = false;
            }
            Some((_, best_count)) if count == best_count => tied = true,
            None => best = Some((idx, count)),
            _ => {}
        }
    }

    if let Some((idx, count)) = best.filter(|&(_, count)| tied && count > 0) {
        warn!("Several products cover {} rows; taking '{}' (first in column order)", count, table.columns()[idx].name);
    }

    best
}

/// Column with the highest non-missing count across the whole table
///
/// Diagnostic only; the elimination loop does not use it. Ties go to the
/// first column in table order.
pub fn dominant_column(table: &Table) -> Option<&str> {
    let mut best: Option<(&str, usize)> = None;
    for column in table.columns() {
        let count = column.non_missing_count();
        if best.is_none_or(|(_, best_count)| count > best_count) {
            best = Some((column.name.as_str(), count));
        }
    }
    best.map(|(name, _)| name)
}

/// The mother product hint for a prepared table, ignoring the branch column
pub fn mother_hint(prepared: &Table, branch_column: &str) -> Result<Option<String>> {
    let products = prepared.clone().drop_columns(&[branch_column]).map_err(|e| e.for_option("--branch-column"))?;
    Ok(dominant_column(&products).map(str::to_string))
}

#[cfg(test)]
#[path = "coverage_test.rs"]
mod coverage_test;
