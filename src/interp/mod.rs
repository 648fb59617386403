/// Interpreter for the pen scripting language - public module facade.
pub mod blocks;
pub mod colors;
pub mod error;
pub mod eval;
pub mod history;
pub mod methods;
pub mod parser;
pub mod validator;
pub mod vars;

// --- Re-exports ---
pub use blocks::LineFailure;
pub use error::InterpError;
pub use validator::Diagnostic;

use crate::graphics::Graphical;
use history::History;
use methods::MethodRegistry;
use vars::VarStore;

/// One interpreter instance: variable store, method registry, and
/// command history.  Instances are independent — two interpreters never
/// share state, so tests can run side by side.
///
/// Pen state lives behind the [`Graphical`] passed to each run call; the
/// interpreter reads it per command and never caches it.
pub struct Interpreter {
    pub(crate) vars: VarStore,
    pub(crate) methods: MethodRegistry,
    pub(crate) history: History,
}

impl Interpreter {
    pub fn new() -> Self {
        Self {
            vars: VarStore::new(),
            methods: MethodRegistry::new(),
            history: History::new(),
        }
    }

    /// Execute a single command line.  The first error propagates.
    ///
    /// Block openers need their terminator on a later line of the same
    /// script, so a lone `loop`/`if`/`method` line is a malformed script.
    pub fn run_line(&mut self, line: &str, gfx: &mut dyn Graphical) -> Result<(), InterpError> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(());
        }
        if !history::is_persistence_line(line) {
            self.history.record(line);
        }
        blocks::run_lines(self, &[line], gfx, false).map(|_| ())
    }

    /// Execute a whole script.
    ///
    /// Failing flat lines are collected and execution continues; an
    /// unterminated or mismatched block aborts the script with
    /// [`InterpError::MalformedScript`].
    pub fn run_script(
        &mut self,
        src: &str,
        gfx: &mut dyn Graphical,
    ) -> Result<Vec<LineFailure>, InterpError> {
        // Record the typed lines verbatim, in input order, before any
        // substitution happens.
        for line in src.lines().map(str::trim) {
            if !line.is_empty() && !history::is_persistence_line(line) {
                self.history.record(line);
            }
        }
        let lines: Vec<&str> = src.lines().collect();
        blocks::run_lines(self, &lines, gfx, true)
    }

    /// Classify every line of a script without executing anything.
    pub fn check_syntax(&self, src: &str) -> Vec<Diagnostic> {
        validator::check(src)
    }

    /// The ordered log of literally-entered commands (persistence
    /// commands excluded).
    pub fn history(&self) -> &[String] {
        self.history.entries()
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}
