/// Core data structures shared by both pipelines
///
/// This module defines the cell values that flow through a `Table` and the
/// report types produced by the coverage reducer.
use std::fmt;

/// Tokens that the upstream spreadsheet export uses for "no value"
const MISSING_TOKENS: &[&str] = &["", "NaN", "nan", "NA", "N/A", "n/a", "#N/A", "NULL", "null"];

/// A single table value
///
/// `Missing` is distinct from an empty `Text`; the CSV reader only produces
/// `Missing` for blank fields and the usual spreadsheet NA tokens.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
pub enum Cell {
    #[default]
    Missing,
    Integer(i64),
    Float(f64),
    Text(String),
}

impl Cell {
    /// Infer a cell from a raw delimited-text field
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if MISSING_TOKENS.contains(&trimmed) {
            return Cell::Missing;
        }
        if let Ok(i) = trimmed.parse::<i64>() {
            return Cell::Integer(i);
        }
        match trimmed.parse::<f64>() {
            Ok(f) if f.is_finite() => Cell::Float(f),
            _ => Cell::Text(raw.to_string()),
        }
    }

    pub fn text(s: impl Into<String>) -> Self {
        Cell::Text(s.into())
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Cell::Missing)
    }

    /// Render the value the way it appears in a spreadsheet; `Missing` is empty
    pub fn render(&self) -> String {
        match self {
            Cell::Missing => String::new(),
            Cell::Integer(i) => i.to_string(),
            Cell::Float(f) => f.to_string(),
            Cell::Text(s) => s.clone(),
        }
    }

    /// True when the cell is present and renders exactly as `symbol`
    pub fn matches(&self, symbol: &str) -> bool {
        match self {
            Cell::Missing => false,
            Cell::Text(s) => s == symbol,
            other => other.render() == symbol,
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Missing => f.write_str("NaN"),
            other => f.write_str(&other.render()),
        }
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        Cell::Text(s.to_string())
    }
}

impl From<i64> for Cell {
    fn from(i: i64) -> Self {
        Cell::Integer(i)
    }
}

/// Number of applicability symbols found in one product column
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ApplicableCount {
    pub column: String,
    pub count: usize,
}

/// One iteration of the greedy elimination loop
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CoverageStep {
    /// Product column selected in this iteration
    pub column: String,
    /// Branch identifiers of the rows it removed, in table order
    pub covered: Vec<Cell>,
}

/// Role of a product in the merge
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum ProductRole {
    Mother,
    Additional,
}

impl ProductRole {
    pub fn for_rank(rank: usize) -> Self {
        if rank == 1 { ProductRole::Mother } else { ProductRole::Additional }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ProductRole::Mother => "Mother Product",
            ProductRole::Additional => "Additional Product",
        }
    }
}

/// Ordered result of the coverage reducer
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Report {
    pub steps: Vec<CoverageStep>,
}

impl Report {
    pub fn new(steps: Vec<CoverageStep>) -> Self {
        Self { steps }
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// The first selected product, if any rows needed covering
    pub fn mother(&self) -> Option<&CoverageStep> {
        self.steps.first()
    }

    pub fn additional(&self) -> &[CoverageStep] {
        self.steps.get(1..).unwrap_or(&[])
    }

    /// Steps with their 1-based rank and role
    pub fn ranked(&self) -> impl Iterator<Item = (usize, ProductRole, &CoverageStep)> {
        self.steps.iter().enumerate().map(|(i, step)| (i + 1, ProductRole::for_rank(i + 1), step))
    }

    /// Total number of branch identifiers covered across all steps
    pub fn covered_total(&self) -> usize {
        self.steps.iter().map(|s| s.covered.len()).sum()
    }
}

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;
