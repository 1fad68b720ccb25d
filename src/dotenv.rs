//! Parser for the project's `.env` file.
//!
//! The accepted format is a small subset of the usual dotenv conventions:
//! one `KEY=VALUE` per line, full-line `#` comments, and an optional pair of
//! single or double quotes around the value. There are no multiline values,
//! no `${VAR}` interpolation and no escape sequences.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use eyre::{Result, WrapErr};
use owo_colors::OwoColorize;

pub const ENV_FILE_NAME: &str = ".env";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub key: String,
    pub value: String,
}

/// Parses a single line.
///
/// Returns `None` for blank lines, comments, and lines without `=`.
pub fn parse_line(line: &str) -> Option<Entry> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return None;
    }

    let (key, value) = line.split_once('=')?;
    Some(Entry {
        key: key.trim().to_string(),
        value: unquote(value.trim()).to_string(),
    })
}

/// Parses every line of `content`, keeping file order.
///
/// Duplicate keys are all returned; consumers apply them in order so the
/// last one wins.
pub fn parse(content: &str) -> Vec<Entry> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    content.lines().filter_map(parse_line).collect()
}

/// Reads and parses the file at `path`.
///
/// A missing file is not an error and yields `Ok(None)`. Entries with an
/// empty key can't be set in a process environment and are dropped.
pub fn load(path: &Path) -> Result<Option<Vec<Entry>>> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            log::debug!("No environment file at {}", path.display());
            return Ok(None);
        }
        Err(e) => {
            return Err(e)
                .wrap_err_with(|| format!("Failed to read environment file: {:?}", path));
        }
    };

    let mut entries = parse(&content);
    entries.retain(|entry| {
        if entry.key.is_empty() {
            log::warn!("Ignoring entry with an empty key in {}", path.display().yellow());
            return false;
        }
        true
    });

    for entry in &entries {
        // Values are frequently secrets, so only the key is logged.
        log::debug!("  {} (from {})", entry.key.green(), path.display());
    }
    Ok(Some(entries))
}

fn unquote(value: &str) -> &str {
    for quote in ['"', '\''] {
        if value.len() >= 2 && value.starts_with(quote) && value.ends_with(quote) {
            return &value[1..value.len() - 1];
        }
    }
    value
}
