/// Label-Merge Transformer
///
/// Reshapes a raw merge master sample export into the transposed label
/// layout. The pipeline is a chain of pure steps, each consuming the table
/// produced by the previous one:
///
/// 1. key concatenation (`Conn` + `AcceNo` + `ExteNo` -> integer `Conn`)
/// 2. suffix renaming of the product columns
/// 3. symbol expansion (presence marker -> column name)
/// 4. length annotation of `PartsName`
/// 5. column pruning
/// 6. transpose + compaction
/// 7. spacer insertion
use crate::error::Result;
use crate::table::{Column, Table};
use crate::types::{ApplicableCount, Cell};
use log::debug;

pub const DEFAULT_MARKER: &str = "**";

pub const DEFAULT_PRUNED_COLUMNS: &[&str] =
    &["PartsClass", "PartsCode", "Length", "Method", "Qty", "Attachment Process"];

/// Fixed column names of the upstream export
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelLayout {
    pub key_column: String,
    pub accessory_column: String,
    pub extension_column: String,
    pub parts_name_column: String,
    pub length_column: String,
    pub pruned_columns: Vec<String>,
    /// Appended to every renamed product column
    pub marker: String,
}

impl Default for LabelLayout {
    fn default() -> Self {
        Self {
            key_column: "Conn".to_string(),
            accessory_column: "AcceNo".to_string(),
            extension_column: "ExteNo".to_string(),
            parts_name_column: "PartsName".to_string(),
            length_column: "Length".to_string(),
            pruned_columns: DEFAULT_PRUNED_COLUMNS.iter().map(|s| s.to_string()).collect(),
            marker: DEFAULT_MARKER.to_string(),
        }
    }
}

/// Run the full pipeline against the given export layout
pub fn transform(
    raw: Table,
    layout: &LabelLayout,
    start_column: &str,
    strip_count: usize,
    symbol: &str,
) -> Result<Table> {
    debug!("Label transform on {} rows x {} columns", raw.row_count(), raw.column_count());

    // Validate the user-facing option before touching the data
    raw.position(start_column).map_err(|e| e.for_option("--start-column"))?;

    let table = concat_key(raw, layout)?;
    let table = rename_suffix(table, start_column, strip_count, &layout.marker)?;
    let table = expand_symbol(table, symbol);
    let table = annotate_length(table, layout)?;
    let table = prune_columns(table, layout)?;
    debug!("Pre-transpose shape: {} rows x {} columns", table.row_count(), table.column_count());

    let table = transpose_compact(table);
    let table = insert_spacers(table)?;
    debug!("Label layout: {} rows x {} columns", table.row_count(), table.column_count());

    Ok(table)
}

/// Strip everything but ASCII digits and parse the remainder as an integer key
///
/// Returns `None` when nothing numeric is left or the key overflows; callers
/// store that as a missing cell.
pub fn try_parse_key(text: &str) -> Option<i64> {
    let digits: String = text.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return None;
    }
    digits.parse().ok()
}

/// Concatenate connector, accessory and extension numbers into the key column
///
/// The accessory and extension columns are dropped afterwards.
pub fn concat_key(table: Table, layout: &LabelLayout) -> Result<Table> {
    let conn = table.column(&layout.key_column)?;
    let accessory = table.column(&layout.accessory_column)?;
    let extension = table.column(&layout.extension_column)?;

    let mut failed = 0;
    let keys: Vec<Cell> = conn
        .cells
        .iter()
        .zip(&accessory.cells)
        .zip(&extension.cells)
        .map(|((c, a), e)| {
            let joined = format!("{}{}{}", c.render(), a.render(), e.render());
            match try_parse_key(&joined) {
                Some(key) => Cell::Integer(key),
                None => {
                    failed += 1;
                    Cell::Missing
                }
            }
        })
        .collect();

    if failed > 0 {
        debug!("{} key(s) could not be coerced to integers and are left missing", failed);
    }

    table
        .with_cells(&layout.key_column, keys)?
        .drop_columns(&[layout.accessory_column.as_str(), layout.extension_column.as_str()])
}

/// Rename every column after `start_column`
///
/// The last `strip_count` characters are removed, surrounding whitespace is
/// trimmed and `marker` is appended. `start_column` keeps its own name.
/// A rename that produces an existing name fails with `DuplicateColumn`.
pub fn rename_suffix(table: Table, start_column: &str, strip_count: usize, marker: &str) -> Result<Table> {
    let start = table.position(start_column).map_err(|e| e.for_option("--start-column"))?;

    let names: Vec<String> = table
        .column_names()
        .enumerate()
        .map(|(i, name)| if i > start { strip_suffix(name, strip_count, marker) } else { name.to_string() })
        .collect();

    table.with_names(names)
}

fn strip_suffix(name: &str, strip_count: usize, marker: &str) -> String {
    let len = name.chars().count();
    let keep = len - strip_count.min(len);
    let stem: String = name.chars().take(keep).collect();
    format!("{}{}", stem.trim(), marker)
}

/// Replace every cell equal to `symbol` with its column's name
pub fn expand_symbol(table: Table, symbol: &str) -> Table {
    table.map_columns(|mut column| {
        for cell in column.cells.iter_mut() {
            if cell.matches(symbol) {
                *cell = Cell::text(column.name.as_str());
            }
        }
        column
    })
}

/// Append `" L=<length>"` to the parts name wherever a length is present
///
/// A table without the length column passes through untouched.
pub fn annotate_length(table: Table, layout: &LabelLayout) -> Result<Table> {
    if !table.contains(&layout.length_column) {
        return Ok(table);
    }
    let length = table.column(&layout.length_column)?;
    let parts = table.column(&layout.parts_name_column)?;

    let annotated: Vec<Cell> = parts
        .cells
        .iter()
        .zip(&length.cells)
        .map(|(name, len)| {
            if len.is_missing() {
                name.clone()
            } else {
                let label = format!("{} L={}", name.render(), len.render());
                Cell::text(label.trim_start())
            }
        })
        .collect();

    table.with_cells(&layout.parts_name_column, annotated)
}

/// Drop the columns the label layout has no use for
///
/// Every listed column must exist, except the length column which the
/// export only carries for cut parts.
pub fn prune_columns(table: Table, layout: &LabelLayout) -> Result<Table> {
    let names: Vec<&str> = layout
        .pruned_columns
        .iter()
        .map(|s| s.as_str())
        .filter(|name| *name != layout.length_column || table.contains(name))
        .collect();
    table.drop_columns(&names)
}

/// Transpose, then float every non-missing value to the top of its column
pub fn transpose_compact(table: Table) -> Table {
    table.transpose().map_columns(compact)
}

/// Move non-missing cells to the top, preserving their order
pub fn compact(column: Column) -> Column {
    let len = column.cells.len();
    let mut cells: Vec<Cell> = column.cells.into_iter().filter(|c| !c.is_missing()).collect();
    cells.resize(len, Cell::Missing);
    Column::new(column.name, cells)
}

/// Insert an all-missing `Blank_<i>` column after every column but the last
///
/// Insertion runs right to left so earlier insertion points don't shift.
pub fn insert_spacers(mut table: Table) -> Result<Table> {
    let rows = table.row_count();
    let width = table.column_count();

    for i in (0..width.saturating_sub(1)).rev() {
        table = table.insert_column(i + 1, Column::missing(format!("Blank_{}", i), rows))?;
    }
    Ok(table)
}

/// Count applicability symbols per column, from `start_column` onward
///
/// Read-only: used for display and never feeds back into `transform`.
pub fn count_applicable(table: &Table, start_column: &str, symbol: &str) -> Result<Vec<ApplicableCount>> {
    let start = table.position(start_column).map_err(|e| e.for_option("--start-column"))?;

    Ok(table.columns()[start..]
        .iter()
        .map(|column| ApplicableCount { column: column.name.clone(), count: column.count_matching(symbol) })
        .collect())
}

/// Columns holding the highest count, in table order
pub fn highest_counts(counts: &[ApplicableCount]) -> Vec<&str> {
    let Some(max) = counts.iter().map(|c| c.count).max() else {
        return Vec::new();
    };
    counts.iter().filter(|c| c.count == max).map(|c| c.column.as_str()).collect()
}

#[cfg(test)]
#[path = "labels_test.rs"]
mod labels_test;
