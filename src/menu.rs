//! Numbered model menus.
//!
//! The binary prints [`render_choices`] and feeds the user's answer to
//! [`parse_selection`]; both are free of I/O so they can be tested directly.

use std::fmt::Write;

use crate::error::{Error, Result};

/// Renders one `[i] name` line per model, 1-based, marking `default` with `*`.
pub fn render_choices(models: &[String], default: &str) -> String {
    let mut out = String::new();
    for (index, model) in models.iter().enumerate() {
        let marker = if model == default { " *" } else { "" };
        let _ = writeln!(out, "[{}] {model}{marker}", index + 1);
    }
    out
}

/// Parses a 1-based menu answer into an index into a list of `len` entries.
///
/// Blank input means the user backed out and yields `Ok(None)`.
pub fn parse_selection(input: &str, len: usize) -> Result<Option<usize>> {
    let input = input.trim();
    if input.is_empty() {
        return Ok(None);
    }
    let choice: usize = input
        .parse()
        .map_err(|_| Error::validation(format!("'{input}' is not a number")))?;
    if choice == 0 || choice > len {
        return Err(Error::validation(format!(
            "selection must be between 1 and {len}, got {choice}"
        )));
    }
    Ok(Some(choice - 1))
}
