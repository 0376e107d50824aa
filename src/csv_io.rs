//! Delimited-text input and output.
//!
//! Reads a whole export into a `Table` before any transformation runs, and
//! writes a finished table back out. Headers are taken from the first
//! record; blank header cells become `Unnamed: <i>` the way spreadsheet
//! tooling names them.

use crate::error::Result;
use crate::table::Table;
use crate::types::Cell;
use log::{debug, info};
use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

/// Suffix added to the input file stem for the label output
pub const OUTPUT_SUFFIX: &str = "_Automated";

/// How a table is written back out
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteOptions {
    pub delimiter: u8,
    /// Prefix every record with its 0-based row number under an empty header
    pub with_index: bool,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self { delimiter: b',', with_index: true }
    }
}

/// Read a delimited file into a table
pub fn read_table(path: &Path, delimiter: u8) -> Result<Table> {
    debug!("Reading {:?}", path);
    let file = File::open(path)?;
    read_table_from(file, delimiter)
}

pub fn read_table_from<R: Read>(reader: R, delimiter: u8) -> Result<Table> {
    let mut rdr = csv::ReaderBuilder::new().delimiter(delimiter).has_headers(true).from_reader(reader);

    // Exports are not always UTF-8; decode lossily rather than refusing the file
    let headers: Vec<String> = rdr
        .byte_headers()?
        .iter()
        .enumerate()
        .map(|(i, raw)| {
            let name = String::from_utf8_lossy(raw).trim().to_string();
            if name.is_empty() { format!("Unnamed: {}", i) } else { name }
        })
        .collect();

    let mut records = Vec::new();
    for record in rdr.byte_records() {
        let record = record?;
        records.push(record.iter().map(|raw| Cell::parse(&String::from_utf8_lossy(raw))).collect());
    }

    let table = Table::from_rows(headers, records)?;
    debug!("Read {} rows x {} columns", table.row_count(), table.column_count());
    Ok(table)
}

/// Write a table as delimited text
pub fn write_table(path: &Path, table: &Table, options: WriteOptions) -> Result<()> {
    let file = File::create(path)?;
    write_table_to(file, table, options)?;
    info!("Wrote {} rows x {} columns to {:?}", table.row_count(), table.column_count(), path);
    Ok(())
}

pub fn write_table_to<W: Write>(writer: W, table: &Table, options: WriteOptions) -> Result<()> {
    let mut wtr = csv::WriterBuilder::new().delimiter(options.delimiter).from_writer(writer);

    let mut header: Vec<&str> = Vec::with_capacity(table.column_count() + 1);
    if options.with_index {
        header.push("");
    }
    header.extend(table.column_names());
    wtr.write_record(&header)?;

    for r in 0..table.row_count() {
        let mut record: Vec<String> = Vec::with_capacity(header.len());
        if options.with_index {
            record.push(r.to_string());
        }
        record.extend(table.row(r).into_iter().map(Cell::render));
        wtr.write_record(&record)?;
    }

    wtr.flush()?;
    Ok(())
}

/// `<dir>/<stem>_Automated.<ext>` next to the input file
pub fn automated_path(input: &Path) -> PathBuf {
    let stem = input.file_stem().map(|s| s.to_string_lossy().into_owned()).unwrap_or_else(|| "output".to_string());
    let file_name = match input.extension() {
        Some(ext) => format!("{}{}.{}", stem, OUTPUT_SUFFIX, ext.to_string_lossy()),
        None => format!("{}{}", stem, OUTPUT_SUFFIX),
    };
    input.with_file_name(file_name)
}
