/// Console formatting module - Pure rendering concerns
///
/// This module handles all boxed-table output:
/// - Column widths sized to content and clamped to the terminal
/// - Color terminal output for highlighted rows
/// - Text truncation and padding that respects wide Unicode glyphs
///
/// It accepts pre-rendered strings from the report module. `TableWriter`
/// writes to any `std::io::Write`, so the same layout serves the console
/// (with colors) and Markdown code blocks (without).
use std::io::{self, Write};
use std::sync::OnceLock;
use term::color::Color;
use terminal_size::{Width, terminal_size};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Narrowest a column may be squeezed to
const MIN_COLUMN_WIDTH: usize = 6;

/// Writer for table output - configurable for color/plain text
pub struct TableWriter<W: Write> {
    writer: W,
    use_colors: bool,
}

impl<W: Write> TableWriter<W> {
    pub fn new(writer: W, use_colors: bool) -> Self {
        Self { writer, use_colors }
    }

    /// Write formatted text, optionally with color
    fn write_colored(&mut self, text: &str, color: Option<Color>) -> io::Result<()> {
        match color {
            Some(color) if self.use_colors => {
                if let Some(ref mut t) = term::stdout() {
                    let _ = t.fg(color);
                    let _ = t.attr(term::Attr::Bold);
                    let _ = t.write_all(text.as_bytes());
                    let _ = t.reset();
                    Ok(())
                } else {
                    write!(self.writer, "{}", text)
                }
            }
            _ => write!(self.writer, "{}", text),
        }
    }

    /// Write a boxed grid
    ///
    /// `highlight` marks rows to draw in `color`; rows past its end are plain.
    pub fn write_grid(
        &mut self,
        headers: &[&str],
        rows: &[Vec<String>],
        highlight: &[bool],
        color: Color,
    ) -> io::Result<()> {
        let widths = fit_widths(headers, rows, console_width());

        self.write_rule('┌', '┬', '┐', &widths)?;
        let header_cells: Vec<String> = headers.iter().map(|h| h.to_string()).collect();
        self.write_cells(&header_cells, &widths, None)?;
        self.write_rule('├', '┼', '┤', &widths)?;

        for (i, row) in rows.iter().enumerate() {
            let row_color = if highlight.get(i).copied().unwrap_or(false) { Some(color) } else { None };
            self.write_cells(row, &widths, row_color)?;
        }

        self.write_rule('└', '┴', '┘', &widths)
    }

    fn write_rule(&mut self, left: char, mid: char, right: char, widths: &[usize]) -> io::Result<()> {
        let segments: Vec<String> = widths.iter().map(|w| "─".repeat(w + 2)).collect();
        writeln!(self.writer, "{}{}{}", left, segments.join(&mid.to_string()), right)
    }

    fn write_cells(&mut self, cells: &[String], widths: &[usize], color: Option<Color>) -> io::Result<()> {
        let displays: Vec<String> = widths
            .iter()
            .enumerate()
            .map(|(i, w)| truncate_with_padding(cells.get(i).map(String::as_str).unwrap_or(""), *w))
            .collect();
        let line = format!("│ {} │", displays.join(" │ "));
        self.write_colored(&line, color)?;
        writeln!(self.writer)
    }
}

/// Size each column to its widest cell, then shrink the widest columns
/// until the table fits in `total` console columns
pub fn fit_widths(headers: &[&str], rows: &[Vec<String>], total: usize) -> Vec<usize> {
    let mut widths: Vec<usize> = headers.iter().map(|h| display_width(h).max(1)).collect();
    for row in rows {
        for (w, cell) in widths.iter_mut().zip(row) {
            *w = (*w).max(display_width(cell));
        }
    }

    // Borders: "│ " before each column, " │" after the last, " │ " between
    let borders = 3 * widths.len() + 1;
    let available = total.saturating_sub(borders);

    while widths.iter().sum::<usize>() > available {
        let Some(widest) = widths.iter_mut().filter(|w| **w > MIN_COLUMN_WIDTH).max_by_key(|w| **w) else {
            break;
        };
        *widest -= 1;
    }

    widths
}

/// Get terminal width or default to 120
fn get_terminal_width() -> usize {
    if let Some((Width(w), _)) = terminal_size() { w as usize } else { 120 }
}

static CONSOLE_WIDTH: OnceLock<usize> = OnceLock::new();

/// Override the detected console width (for tests and piping)
pub fn set_console_width(width: usize) {
    let _ = CONSOLE_WIDTH.set(width); // Ignore error if already initialized
}

pub fn console_width() -> usize {
    *CONSOLE_WIDTH.get_or_init(get_terminal_width)
}

//
// Text Formatting Utilities
//

/// Count the display width of a string, accounting for wide Unicode characters
pub fn display_width(s: &str) -> usize {
    UnicodeWidthStr::width(s)
}

/// Truncate and pad string to exact width
pub fn truncate_with_padding(s: &str, width: usize) -> String {
    let display_w = display_width(s);

    if display_w > width {
        let mut result = String::new();
        let mut current_width = 0;

        // Reserve space for "..."
        let target_width = if width >= 3 { width - 3 } else { width };

        for c in s.chars() {
            let c_width = UnicodeWidthChar::width(c).unwrap_or(1);
            if current_width + c_width > target_width {
                break;
            }
            result.push(c);
            current_width += c_width;
        }

        if width >= 3 {
            result.push_str("...");
            current_width += 3;
        }

        if current_width < width {
            result.push_str(&" ".repeat(width - current_width));
        }

        result
    } else {
        format!("{}{}", s, " ".repeat(width - display_w))
    }
}
