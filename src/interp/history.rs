/// History: the ordered log of literally-entered commands, and its
/// save/load text format (one command per line).
///
/// `save` and `load` lines never enter the log and are skipped on
/// replay, so a loaded script cannot trigger further persistence.
use std::fs;
use std::path::Path;

use super::error::InterpError;

pub struct History {
    entries: Vec<String>,
}

impl History {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Append a verbatim command line.  Callers filter persistence
    /// lines with [`is_persistence_line`] first.
    pub fn record(&mut self, line: &str) {
        self.entries.push(line.to_string());
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    /// Write the log to `dir/name`, one command per line, in order.
    pub fn export(&self, dir: &str, name: &str) -> Result<(), InterpError> {
        let path = Path::new(dir).join(name);
        let mut text = self.entries.join("\n");
        if !text.is_empty() {
            text.push('\n');
        }
        fs::write(&path, text).map_err(|source| InterpError::Io { path, source })
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new()
    }
}

/// Whether a line's keyword is `save` or `load`.
pub fn is_persistence_line(line: &str) -> bool {
    let keyword = line.split_whitespace().next().unwrap_or("");
    keyword.eq_ignore_ascii_case("save") || keyword.eq_ignore_ascii_case("load")
}

/// Read a previously saved script from `dir/name`.
pub fn read_script(dir: &str, name: &str) -> Result<Vec<String>, InterpError> {
    let path = Path::new(dir).join(name);
    if !path.exists() {
        return Err(InterpError::ResourceNotFound(path));
    }
    let text = fs::read_to_string(&path).map_err(|source| InterpError::Io { path, source })?;
    Ok(text.lines().map(str::to_string).collect())
}
