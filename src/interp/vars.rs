/// Variable store: a flat, case-insensitive map of name → integer.
///
/// Variables are created on first assignment and never explicitly
/// deleted; method calls temporarily shadow parameter names through the
/// snapshot/restore pair below (dynamic scoping).
use std::collections::HashMap;

pub struct VarStore {
    vars: HashMap<String, i32>,
}

/// Pre-call values (or absence) of a method's parameter names.
pub type Frame = Vec<(String, Option<i32>)>;

impl VarStore {
    pub fn new() -> Self {
        Self {
            vars: HashMap::new(),
        }
    }

    /// Set a variable (overwrites any existing value).
    pub fn set(&mut self, name: &str, value: i32) {
        self.vars.insert(name.to_lowercase(), value);
    }

    pub fn get(&self, name: &str) -> Option<i32> {
        self.vars.get(&name.to_lowercase()).copied()
    }

    pub fn is_defined(&self, name: &str) -> bool {
        self.vars.contains_key(&name.to_lowercase())
    }

    /// Capture the current value (or absence) of each name.
    pub fn snapshot(&self, names: &[String]) -> Frame {
        names
            .iter()
            .map(|n| (n.to_lowercase(), self.get(n)))
            .collect()
    }

    /// Put every snapshotted name back exactly as it was, deleting names
    /// that did not exist before.
    pub fn restore(&mut self, frame: Frame) {
        for (name, value) in frame {
            match value {
                Some(v) => {
                    self.vars.insert(name, v);
                }
                None => {
                    self.vars.remove(&name);
                }
            }
        }
    }
}

impl Default for VarStore {
    fn default() -> Self {
        Self::new()
    }
}
