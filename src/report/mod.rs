//! Report generation module.
//!
//! This module handles:
//! - Console tables for applicable-part counts, table previews and the
//!   coverage report
//! - The plain ranked listing of products to merge
//! - Export of the coverage report to JSON and Markdown
//!
//! Box drawing and widths are handled by the console_format module.
//!
//! # Module Organization
//!
//! - `console` - Console rendering of counts, previews and coverage steps
//! - `export` - JSON and Markdown export

mod console;
mod export;

pub use console::{
    format_coverage_listing, print_applicable_counts, print_coverage_report, print_mother_hint, print_table_preview,
};

pub use export::{ReportContext, export_json_report, export_markdown_report};
