// Copyright 2015 The Rust Project Developers. See the COPYRIGHT
// file at the top-level directory of this distribution and at
// http://rust-lang.org/COPYRIGHT.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

mod cli;
mod config;
mod console_format;
mod coverage;
mod csv_io;
mod error;
mod labels;
mod report;
mod table;
mod types;
mod ui;

use config::{LabelsConfig, MergeConfig, Settings};
use error::Result;
use log::{debug, info};

fn main() {
    let args = cli::CliArgs::parse_args();

    let default_level = if args.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level)).init();

    // Validate arguments
    if let Err(e) = args.validate() {
        ui::print_error(&e);
        std::process::exit(1);
    }

    // Set console width override if specified (for testing)
    if let Some(width) = args.console_width {
        console_format::set_console_width(width);
    }

    debug!("Input: {}", args.input().display());

    let result = load_and_run(&args);
    if let Err(e) = result {
        ui::print_pipeline_error(&e);
        std::process::exit(1);
    }
}

fn load_and_run(args: &cli::CliArgs) -> Result<()> {
    let settings: Settings = config::load_settings(args.settings.as_deref())?;

    match &args.command {
        cli::Command::Labels(labels_args) => run_labels(&config::build_labels_config(args, labels_args, &settings)?),
        cli::Command::Merge(merge_args) => run_merge(&config::build_merge_config(args, merge_args, &settings)?),
    }
}

fn run_labels(config: &LabelsConfig) -> Result<()> {
    let raw = csv_io::read_table(&config.input, config.delimiter)?;
    info!("Read {} rows x {} columns from {:?}", raw.row_count(), raw.column_count(), config.input);

    let counts = labels::count_applicable(&raw, &config.start_column, &config.symbol)?;
    report::print_applicable_counts(&counts);

    let edited = labels::transform(raw, &config.layout, &config.start_column, config.strip_count, &config.symbol)?;
    csv_io::write_table(&config.output, &edited, config.write)?;

    if let Some(rows) = config.preview_rows {
        report::print_table_preview("Edited Data", &edited, rows);
    }

    println!();
    ui::status(&format!("label data saved to {}", config.output.display()));
    Ok(())
}

fn run_merge(config: &MergeConfig) -> Result<()> {
    let table = csv_io::read_table(&config.input, config.delimiter)?;
    info!("Read {} rows x {} columns from {:?}", table.row_count(), table.column_count(), config.input);

    let prepared = coverage::prepare(table.clone(), &config.symbol, &config.drop_columns, &config.branch_column)?;
    let hint = coverage::mother_hint(&prepared, &config.branch_column)?;
    report::print_mother_hint(hint.as_deref());

    let result = coverage::reduce(table, &config.symbol, &config.drop_columns, &config.branch_column)?;
    report::print_coverage_report(&result);

    let context = report::ReportContext {
        input: config.input.display().to_string(),
        symbol: config.symbol.clone(),
        branch_column: config.branch_column.clone(),
        dropped_columns: config.drop_columns.clone(),
        mother_hint: hint,
    };

    if let Some(ref path) = config.json_output {
        report::export_json_report(&result, &context, path)?;
        println!("\nJSON report saved to: {}", path.display());
    }
    if let Some(ref path) = config.markdown_output {
        report::export_markdown_report(&result, &context, path)?;
        println!("\nMarkdown report saved to: {}", path.display());
    }

    println!();
    print!("{}", report::format_coverage_listing(&result));
    Ok(())
}
