/// User interface and status output utilities
///
/// This module handles:
/// - Colored terminal text
/// - Status and error message formatting
use crate::error::Error;
use std::io::Write;

/// Print the "mastersample: " prefix for status messages
fn print_status_header() {
    print!("mastersample: ");
}

/// Print colored text to terminal, with fallback to plain text
fn print_color(s: &str, fg: term::color::Color) {
    if !really_print_color(s, fg) {
        print!("{}", s);
    }

    fn really_print_color(s: &str, fg: term::color::Color) -> bool {
        if let Some(ref mut t) = term::stdout() {
            if t.fg(fg).is_err() {
                return false;
            }
            let _ = t.attr(term::Attr::Bold);
            if write!(t, "{}", s).is_err() {
                return false;
            }
            let _ = t.reset();
            return true;
        }

        false
    }
}

/// Print a status message with "mastersample: " prefix
pub fn status(s: &str) {
    print_status_header();
    println!("{}", s);
}

/// Print an error message with colored "error" prefix
pub fn print_error(msg: &str) {
    println!();
    print_color("error", term::color::BRIGHT_RED);
    println!(": {}", msg);
    println!();
}

/// Print a pipeline error together with its class
pub fn print_pipeline_error(err: &Error) {
    print_error(&format!("{}: {}", err.kind(), err));
}
