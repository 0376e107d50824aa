/// Configuration resolution module
///
/// This module handles:
/// - Loading the optional TOML settings file
/// - Merging settings with CLI arguments (CLI always wins)
/// - Producing immutable, fully resolved run configurations
use crate::cli::{CliArgs, LabelsArgs, MergeArgs, default_settings_path};
use crate::csv_io::{self, WriteOptions};
use crate::error::{Error, Result};
use crate::labels::LabelLayout;
use log::debug;
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Defaults read from a settings file
///
/// ```toml
/// symbol = "●"
/// delimiter = ","
///
/// [labels]
/// start_column = "Attachment Process"
/// characters_to_replace = 2
///
/// [merge]
/// branch_column = "Branch"
/// drop_columns = ["PartNo"]
/// ```
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub symbol: Option<String>,
    pub delimiter: Option<char>,
    pub labels: LabelSettings,
    pub merge: MergeSettings,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LabelSettings {
    pub start_column: Option<String>,
    pub characters_to_replace: Option<usize>,
    pub marker: Option<String>,
    pub pruned_columns: Option<Vec<String>>,
    pub with_index: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MergeSettings {
    pub branch_column: Option<String>,
    pub drop_columns: Option<Vec<String>>,
}

/// Fully resolved options for `mastersample labels`
#[derive(Debug, Clone, PartialEq)]
pub struct LabelsConfig {
    pub input: PathBuf,
    pub output: PathBuf,
    pub delimiter: u8,
    pub start_column: String,
    pub strip_count: usize,
    pub symbol: String,
    pub layout: LabelLayout,
    pub write: WriteOptions,
    pub preview_rows: Option<usize>,
}

/// Fully resolved options for `mastersample merge`
#[derive(Debug, Clone, PartialEq)]
pub struct MergeConfig {
    pub input: PathBuf,
    pub delimiter: u8,
    pub symbol: String,
    pub branch_column: String,
    pub drop_columns: Vec<String>,
    pub json_output: Option<PathBuf>,
    pub markdown_output: Option<PathBuf>,
}

/// Load settings from `--settings`, `$MASTERSAMPLE_SETTINGS`, or the
/// default config location
///
/// An explicitly named file must exist; the default location is optional.
pub fn load_settings(explicit: Option<&Path>) -> Result<Settings> {
    let (path, required) = match explicit {
        Some(p) => (Some(p.to_path_buf()), true),
        None => match env::var("MASTERSAMPLE_SETTINGS") {
            Ok(p) => (Some(PathBuf::from(p)), true),
            Err(_) => (default_settings_path(), false),
        },
    };

    let Some(path) = path else {
        return Ok(Settings::default());
    };
    if !required && !path.exists() {
        debug!("No settings file at {:?}", path);
        return Ok(Settings::default());
    }

    debug!("Loading settings from {:?}", path);
    let text = fs::read_to_string(&path)
        .map_err(|e| Error::Settings { path: path.display().to_string(), reason: e.to_string() })?;
    parse_settings(&text).map_err(|e| match e {
        Error::Settings { reason, .. } => Error::Settings { path: path.display().to_string(), reason },
        other => other,
    })
}

pub fn parse_settings(text: &str) -> Result<Settings> {
    toml::from_str(text).map_err(|e| Error::Settings { path: String::new(), reason: e.to_string() })
}

fn resolve_delimiter(args: &CliArgs, settings: &Settings) -> Result<u8> {
    let d = args.delimiter.or(settings.delimiter).unwrap_or(',');
    if !d.is_ascii() {
        return Err(Error::InvalidSetting { option: "--delimiter", reason: format!("'{}' is not ASCII", d) });
    }
    Ok(d as u8)
}

fn resolve_symbol(cli: &Option<String>, settings: &Settings) -> Result<String> {
    let symbol = cli.clone().or_else(|| settings.symbol.clone()).ok_or(Error::MissingSetting("--symbol"))?;
    if symbol.is_empty() {
        return Err(Error::InvalidSetting { option: "--symbol", reason: "must not be empty".to_string() });
    }
    Ok(symbol)
}

/// Build the labels run configuration from CLI arguments and settings
pub fn build_labels_config(args: &CliArgs, labels: &LabelsArgs, settings: &Settings) -> Result<LabelsConfig> {
    let delimiter = resolve_delimiter(args, settings)?;
    let symbol = resolve_symbol(&labels.symbol, settings)?;

    let start_column = labels
        .start_column
        .clone()
        .or_else(|| settings.labels.start_column.clone())
        .ok_or(Error::MissingSetting("--start-column"))?;
    let strip_count = labels.characters_to_replace.or(settings.labels.characters_to_replace).unwrap_or(0);

    let mut layout = LabelLayout::default();
    if let Some(ref marker) = settings.labels.marker {
        layout.marker = marker.clone();
    }
    if let Some(ref pruned) = settings.labels.pruned_columns {
        layout.pruned_columns = pruned.clone();
    }

    let with_index = !labels.no_index && settings.labels.with_index.unwrap_or(true);
    let output = labels.output.clone().unwrap_or_else(|| csv_io::automated_path(&labels.input));
    if output == labels.input {
        return Err(Error::InvalidSetting {
            option: "--output",
            reason: "output would overwrite the input file".to_string(),
        });
    }

    debug!("Labels: start column '{}', strip {}, symbol '{}'", start_column, strip_count, symbol);

    Ok(LabelsConfig {
        input: labels.input.clone(),
        output,
        delimiter,
        start_column,
        strip_count,
        symbol,
        layout,
        write: WriteOptions { delimiter, with_index },
        preview_rows: labels.preview,
    })
}

/// Build the merge run configuration from CLI arguments and settings
pub fn build_merge_config(args: &CliArgs, merge: &MergeArgs, settings: &Settings) -> Result<MergeConfig> {
    let delimiter = resolve_delimiter(args, settings)?;
    let symbol = resolve_symbol(&merge.symbol, settings)?;

    let branch_column = merge
        .branch_column
        .clone()
        .or_else(|| settings.merge.branch_column.clone())
        .ok_or(Error::MissingSetting("--branch-column"))?;

    let drop_columns = if merge.drop_columns.is_empty() {
        settings.merge.drop_columns.clone().unwrap_or_default()
    } else {
        merge.drop_columns.clone()
    };

    debug!("Merge: branch column '{}', dropping {:?}, symbol '{}'", branch_column, drop_columns, symbol);

    Ok(MergeConfig {
        input: merge.input.clone(),
        delimiter,
        symbol,
        branch_column,
        drop_columns,
        json_output: merge.json.clone(),
        markdown_output: merge.markdown.clone(),
    })
}

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;
