/// Method registry: named procedures with parameter lists and verbatim
/// body lines.
///
/// Calls use dynamic scoping: parameter names shadow any like-named
/// globals for the duration of the body and are restored afterwards —
/// unconditionally, error path included.  A method body can still read
/// and write globals that are not in its parameter list.
use std::collections::HashMap;

use super::error::InterpError;
use super::{blocks, parser, Interpreter};
use crate::graphics::Graphical;

// ─── Registry ─────────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct MethodDef {
    pub params: Vec<String>,
    pub body: Vec<String>,
}

pub struct MethodRegistry {
    methods: HashMap<String, MethodDef>,
}

impl MethodRegistry {
    pub fn new() -> Self {
        Self {
            methods: HashMap::new(),
        }
    }

    /// Store a definition; a later definition with the same name fully
    /// replaces the prior one.
    pub fn define(&mut self, name: &str, def: MethodDef) {
        self.methods.insert(name.to_lowercase(), def);
    }

    pub fn get(&self, name: &str) -> Option<&MethodDef> {
        self.methods.get(&name.to_lowercase())
    }
}

impl Default for MethodRegistry {
    fn default() -> Self {
        Self::new()
    }
}

// ─── Header parsing ───────────────────────────────────────────────────────────

/// Parse a `method <name>` or `method <name> (<params…>)` header line
/// into a name and parameter list.
pub(crate) fn parse_header(line: &str) -> Result<(String, Vec<String>), InterpError> {
    let rest = line
        .split_once(char::is_whitespace)
        .map(|(_, r)| r.trim())
        .unwrap_or("");
    if rest.is_empty() {
        return Err(bad_header("a method needs a name"));
    }

    let (name, params) = match rest.find('(') {
        Some(open) => {
            let name = rest[..open].trim();
            let close = rest
                .rfind(')')
                .ok_or_else(|| bad_header("missing ')' after the parameter list"))?;
            if !rest[close + 1..].trim().is_empty() {
                return Err(bad_header("unexpected text after the parameter list"));
            }
            let params: Vec<String> = rest[open + 1..close]
                .split(|c: char| c.is_whitespace() || c == ',')
                .filter(|p| !p.is_empty())
                .map(str::to_lowercase)
                .collect();
            (name, params)
        }
        None => {
            if rest.split_whitespace().count() > 1 {
                return Err(bad_header("a method name must be a single word"));
            }
            (rest, Vec::new())
        }
    };

    if !parser::is_identifier(name) {
        return Err(bad_header(&format!("'{name}' is not a valid method name")));
    }
    for p in &params {
        if !parser::is_identifier(p) {
            return Err(bad_header(&format!("'{p}' is not a valid parameter name")));
        }
    }
    let mut seen = params.clone();
    seen.sort();
    seen.dedup();
    if seen.len() != params.len() {
        return Err(bad_header("parameter names must be unique"));
    }

    Ok((name.to_lowercase(), params))
}

fn bad_header(why: &str) -> InterpError {
    InterpError::Argument(format!("{why} — usage: method <name> (<params>)"))
}

// ─── Invocation ───────────────────────────────────────────────────────────────

/// Run `def` with `args` bound to its parameters.
///
/// The caller has already looked the definition up; `name` is only used
/// for error messages.
pub(crate) fn call(
    interp: &mut Interpreter,
    name: &str,
    def: &MethodDef,
    args: &[i32],
    gfx: &mut dyn Graphical,
) -> Result<(), InterpError> {
    if args.len() != def.params.len() {
        return Err(InterpError::Argument(format!(
            "method '{name}' expects {} argument(s), got {}",
            def.params.len(),
            args.len()
        )));
    }

    let frame = interp.vars.snapshot(&def.params);
    for (param, value) in def.params.iter().zip(args) {
        interp.vars.set(param, *value);
    }

    let body: Vec<&str> = def.body.iter().map(String::as_str).collect();
    let result = blocks::run_lines(interp, &body, gfx, false).map(|_| ());

    // Pre-call bindings come back even when the body failed.
    interp.vars.restore(frame);
    result
}
