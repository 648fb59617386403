/// Block scanner: streams script lines to the dispatcher and handles
/// `loop…endloop`, `if…endif` and `method…endmethod` regions.
///
/// Region bodies are collected with a nesting-depth counter — a region
/// only closes when the depth returns to zero at a terminator of the
/// matching kind, so same-kind nesting cannot prematurely match an
/// outer terminator.  Bodies re-enter [`run_lines`] recursively, which
/// lets loops contain ifs, method calls, further loops, and so on.
use super::error::InterpError;
use super::{eval, methods, parser, Interpreter};
use crate::graphics::Graphical;

/// A non-fatal failure recorded while executing a script's flat lines.
#[derive(Debug)]
pub struct LineFailure {
    /// 1-based line number within the script that was run.
    pub line: usize,
    pub text: String,
    pub error: InterpError,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum BlockKind {
    Loop,
    If,
}

impl BlockKind {
    fn opener(self) -> &'static str {
        match self {
            BlockKind::Loop => "loop",
            BlockKind::If => "if",
        }
    }

    fn terminator(self) -> &'static str {
        match self {
            BlockKind::Loop => "endloop",
            BlockKind::If => "endif",
        }
    }
}

// ─── Execution engine ─────────────────────────────────────────────────────────

/// Execute a sequence of lines.
///
/// With `isolate` set (top-level script execution), a failing flat line
/// or block is recorded and execution continues after it; without it
/// (block bodies, method bodies, replay) the first error propagates.
/// [`InterpError::MalformedScript`] is fatal either way.
pub(crate) fn run_lines(
    interp: &mut Interpreter,
    lines: &[&str],
    gfx: &mut dyn Graphical,
    isolate: bool,
) -> Result<Vec<LineFailure>, InterpError> {
    let mut failures = Vec::new();
    let mut i = 0;

    while i < lines.len() {
        let line = lines[i].trim();
        if line.is_empty() {
            i += 1;
            continue;
        }

        let keyword = first_word(line).to_lowercase();
        let (next, result) = match keyword.as_str() {
            "loop" => {
                let end = collect_region(lines, i, BlockKind::Loop)?;
                (end + 1, exec_loop(interp, lines, i, end, gfx))
            }
            "if" => {
                let end = collect_region(lines, i, BlockKind::If)?;
                (end + 1, exec_if(interp, lines, i, end, gfx))
            }
            "method" => {
                let end = collect_method_region(lines, i)?;
                (end + 1, define_method(interp, lines, i, end))
            }
            "endloop" | "endif" | "endmethod" => {
                return Err(InterpError::MalformedScript(format!(
                    "'{keyword}' on line {} has no matching opener",
                    i + 1
                )));
            }
            _ => (i + 1, parser::dispatch(interp, line, gfx)),
        };

        match result {
            Ok(()) => {}
            Err(err @ InterpError::MalformedScript(_)) => return Err(err),
            Err(err) if isolate => failures.push(LineFailure {
                line: i + 1,
                text: line.to_string(),
                error: err,
            }),
            Err(err) => return Err(err),
        }
        i = next;
    }

    Ok(failures)
}

// ─── Region collection ────────────────────────────────────────────────────────

/// Find the terminator closing the region opened at `start`.
///
/// Depth increments on every nested `loop`/`if` opener and decrements on
/// every `endloop`/`endif`; the region closes when depth returns to zero
/// — and only if the terminator there matches the opener's kind.
fn collect_region(lines: &[&str], start: usize, kind: BlockKind) -> Result<usize, InterpError> {
    let mut depth = 1usize;

    for (i, raw) in lines.iter().enumerate().skip(start + 1) {
        match first_word(raw.trim()).to_lowercase().as_str() {
            "loop" | "if" => depth += 1,
            term @ ("endloop" | "endif") => {
                depth -= 1;
                if depth == 0 {
                    if term != kind.terminator() {
                        return Err(InterpError::MalformedScript(format!(
                            "'{term}' on line {} closes the '{}' region opened on line {}",
                            i + 1,
                            kind.opener(),
                            start + 1
                        )));
                    }
                    return Ok(i);
                }
            }
            _ => {}
        }
    }

    Err(InterpError::MalformedScript(format!(
        "'{}' region opened on line {} is never terminated by '{}'",
        kind.opener(),
        start + 1,
        kind.terminator()
    )))
}

/// Find the `endmethod` closing the definition opened at `start`.
/// Method definitions cannot nest.
fn collect_method_region(lines: &[&str], start: usize) -> Result<usize, InterpError> {
    for (i, raw) in lines.iter().enumerate().skip(start + 1) {
        let keyword = first_word(raw.trim()).to_lowercase();
        if keyword == "endmethod" {
            return Ok(i);
        }
        if keyword == "method" {
            return Err(InterpError::MalformedScript(format!(
                "method definitions cannot nest (line {})",
                i + 1
            )));
        }
    }
    Err(InterpError::MalformedScript(format!(
        "'method' region opened on line {} is never terminated by 'endmethod'",
        start + 1
    )))
}

// ─── Region execution ─────────────────────────────────────────────────────────

fn exec_loop(
    interp: &mut Interpreter,
    lines: &[&str],
    start: usize,
    end: usize,
    gfx: &mut dyn Graphical,
) -> Result<(), InterpError> {
    let header = lines[start].trim();
    let rest = header[header.find(char::is_whitespace).unwrap_or(header.len())..].trim();
    let count = eval::evaluate(rest, &interp.vars).map_err(|_| {
        InterpError::Argument(format!(
            "loop expects an integer count, got '{rest}' — usage: loop <count>"
        ))
    })?;
    if count < 0 {
        return Err(InterpError::Argument(format!(
            "loop count must not be negative, got {count}"
        )));
    }

    for _ in 0..count {
        run_lines(interp, &lines[start + 1..end], gfx, false)?;
    }
    Ok(())
}

fn exec_if(
    interp: &mut Interpreter,
    lines: &[&str],
    start: usize,
    end: usize,
    gfx: &mut dyn Graphical,
) -> Result<(), InterpError> {
    let header = lines[start].trim();
    let cond = header[header.find(char::is_whitespace).unwrap_or(header.len())..].trim();
    if cond.is_empty() {
        return Err(InterpError::Argument(
            "'if' needs a condition — usage: if <condition>".to_string(),
        ));
    }

    // Any nonzero value is true; a false condition skips the body with
    // zero side effects.
    if eval::evaluate(cond, &interp.vars)? != 0 {
        run_lines(interp, &lines[start + 1..end], gfx, false)?;
    }
    Ok(())
}

fn define_method(
    interp: &mut Interpreter,
    lines: &[&str],
    start: usize,
    end: usize,
) -> Result<(), InterpError> {
    let (name, params) = methods::parse_header(lines[start].trim())?;
    let body: Vec<String> = lines[start + 1..end]
        .iter()
        .map(|l| l.trim().to_string())
        .collect();
    interp.methods.define(&name, methods::MethodDef { params, body });
    Ok(())
}

fn first_word(line: &str) -> &str {
    line.split_whitespace().next().unwrap_or("")
}
