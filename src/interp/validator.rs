/// Syntax validator: a dry pass over a whole script.
///
/// Every line is classified against the same command table the
/// dispatcher uses, but nothing executes — no rendering calls, no
/// variable mutation, no file access.  All problems accumulate into the
/// returned list; integer arguments may be literals or identifiers,
/// since variable existence is an execution-time question.
use std::collections::HashSet;

use super::{colors, eval, methods, parser};

// ─── Diagnostic ───────────────────────────────────────────────────────────────

/// One invalid line found during validation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Diagnostic {
    /// 1-based line number.
    pub line: usize,
    /// The offending line, trimmed.
    pub text: String,
    pub message: String,
}

// ─── Public entry point ───────────────────────────────────────────────────────

/// Validate a script and return all diagnostics.
///
/// An empty result means every line is a known, well-formed command.
pub fn check(src: &str) -> Vec<Diagnostic> {
    let mut diags: Vec<Diagnostic> = Vec::new();

    // Open block regions: (opener keyword, 1-based line number).
    let mut open: Vec<(&'static str, usize)> = Vec::new();
    // Method names defined earlier in this script, for bare-call lines.
    let mut defined_methods: HashSet<String> = HashSet::new();

    for (idx, raw) in src.lines().enumerate() {
        let line_no = idx + 1;
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }

        let keyword = line.split_whitespace().next().unwrap_or("").to_lowercase();

        // Assignment outranks keyword classification, as at run time
        // (`pen = 5` binds a variable).  Block lines are exempt: the
        // block scanner intercepts them before the dispatcher.
        let assignment = if is_block_keyword(&keyword) {
            None
        } else {
            check_assignment(line)
        };

        let problem = if let Some(result) = assignment {
            result
        } else {
            match keyword.as_str() {
                "pen" => check_pen(line),
                "circle" => check_int_args(line, "circle", 1),
                "rectangle" => check_int_args(line, "rectangle", 2),
                "clear" => check_bare(line, "clear"),
                "reset" => check_bare(line, "reset"),
                "fill" => check_fill(line),
                "position" => check_position(line),
                "save" => check_word_args(line, "save", 2),
                "load" => check_word_args(line, "load", 2),
                "loop" => {
                    open.push(("loop", line_no));
                    check_expr_arg(line, "loop")
                }
                "if" => {
                    open.push(("if", line_no));
                    check_expr_arg(line, "if")
                }
                "method" => {
                    let result = match methods::parse_header(line) {
                        Ok((name, _)) => {
                            defined_methods.insert(name);
                            None
                        }
                        Err(err) => Some(err.to_string()),
                    };
                    open.push(("method", line_no));
                    result
                }
                "endloop" | "endif" | "endmethod" => check_terminator(&keyword, &mut open),
                _ => check_free_form(line, &keyword, &defined_methods),
            }
        };

        if let Some(message) = problem {
            diags.push(Diagnostic {
                line: line_no,
                text: line.to_string(),
                message,
            });
        }
    }

    for (opener, line_no) in open {
        diags.push(Diagnostic {
            line: line_no,
            text: opener.to_string(),
            message: format!(
                "'{opener}' region opened on line {line_no} is never terminated"
            ),
        });
    }

    diags
}

// ─── Per-keyword checks ───────────────────────────────────────────────────────

fn is_block_keyword(keyword: &str) -> bool {
    matches!(
        keyword,
        "loop" | "if" | "method" | "endloop" | "endif" | "endmethod"
    )
}

/// `name = expression`, when the left-hand side is a bare identifier.
/// Returns `None` for lines that are not assignment-shaped.
fn check_assignment(line: &str) -> Option<Option<String>> {
    let eq = line.find('=')?;
    let lhs = line[..eq].trim();
    if !parser::is_identifier(lhs) {
        return None;
    }
    Some(if eval::validate_expr(&line[eq + 1..]).is_err() {
        Some(format!(
            "the right-hand side of '{lhs} = …' is not a valid expression"
        ))
    } else {
        None
    })
}

fn check_pen(line: &str) -> Option<String> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    if tokens.len() >= 2 && tokens[1].eq_ignore_ascii_case("draw") {
        if tokens.len() != 4 || !int_like(tokens[2]) || !int_like(tokens[3]) {
            return Some(wrong_args("pen"));
        }
        return None;
    }
    match tokens.as_slice() {
        [_, color] if colors::find(color).is_ok() => None,
        [_, color] => Some(format!(
            "the color '{color}' is not defined — example: {}",
            usage("pen")
        )),
        _ => Some(wrong_args("pen")),
    }
}

fn check_int_args(line: &str, keyword: &str, arity: usize) -> Option<String> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    if tokens.len() != arity + 1 || !tokens[1..].iter().all(|t| int_like(t)) {
        return Some(wrong_args(keyword));
    }
    None
}

fn check_bare(line: &str, keyword: &str) -> Option<String> {
    if line.split_whitespace().count() != 1 {
        return Some(wrong_args(keyword));
    }
    None
}

fn check_fill(line: &str) -> Option<String> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    match tokens.as_slice() {
        [_, state]
            if state.eq_ignore_ascii_case("on") || state.eq_ignore_ascii_case("off") =>
        {
            None
        }
        _ => Some(wrong_args("fill")),
    }
}

fn check_position(line: &str) -> Option<String> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    if tokens.len() != 4
        || !tokens[1].eq_ignore_ascii_case("pen")
        || !int_like(tokens[2])
        || !int_like(tokens[3])
    {
        return Some(wrong_args("position"));
    }
    None
}

fn check_word_args(line: &str, keyword: &str, arity: usize) -> Option<String> {
    if line.split_whitespace().count() != arity + 1 {
        return Some(wrong_args(keyword));
    }
    None
}

/// `loop <count>` / `if <condition>`: the remainder of the header must be
/// a well-formed expression.
fn check_expr_arg(line: &str, keyword: &str) -> Option<String> {
    let rest = line
        .split_once(char::is_whitespace)
        .map(|(_, r)| r.trim())
        .unwrap_or("");
    if eval::validate_expr(rest).is_err() {
        return Some(wrong_args(keyword));
    }
    None
}

fn check_terminator(
    keyword: &str,
    open: &mut Vec<(&'static str, usize)>,
) -> Option<String> {
    let expected_opener = match keyword {
        "endloop" => "loop",
        "endif" => "if",
        _ => "method",
    };
    match open.last() {
        Some((opener, _)) if *opener == expected_opener => {
            open.pop();
            None
        }
        Some((opener, line_no)) => Some(format!(
            "'{keyword}' does not close the '{opener}' region opened on line {line_no}"
        )),
        None => Some(format!("'{keyword}' has no matching opener")),
    }
}

/// Lines with no known keyword: method calls or errors.  Assignments
/// never reach here; [`check_assignment`] claims them first.
fn check_free_form(
    line: &str,
    keyword: &str,
    defined_methods: &HashSet<String>,
) -> Option<String> {
    // `name (<args…>)` — a method call; definedness is checked at run time
    // unless the method was defined earlier in this same script.
    if let Some(open) = line.find('(') {
        let name = line[..open].trim();
        let well_formed = parser::is_identifier(name)
            && line.ends_with(')')
            && line[open + 1..line.len() - 1]
                .split(|c: char| c.is_whitespace() || c == ',')
                .filter(|a| !a.is_empty())
                .all(|a| eval::validate_expr(a).is_ok());
        if well_formed {
            return None;
        }
        return Some(format!("malformed method call '{line}'"));
    }

    // Bare single word: a zero-parameter method call if we saw the
    // definition, otherwise unrecognized.
    if parser::is_identifier(keyword) && defined_methods.contains(keyword) {
        return None;
    }

    Some(format!(
        "unrecognized command '{keyword}' (no example available)"
    ))
}

// ─── Helpers ─────────────────────────────────────────────────────────────────

fn int_like(token: &str) -> bool {
    token.parse::<i32>().is_ok() || parser::is_identifier(token)
}

fn usage<'a>(keyword: &'a str) -> &'a str {
    parser::usage_for(keyword).unwrap_or(keyword)
}

fn wrong_args(keyword: &str) -> String {
    format!("wrong arguments for '{keyword}' — example: {}", usage(keyword))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn misspelled_keyword_yields_one_diagnostic() {
        let diags = check("circl 10");
        assert_eq!(diags.len(), 1);
        assert!(diags[0].text.contains("circl"));
        assert!(diags[0].message.contains("no example available"));
    }

    #[test]
    fn correct_command_yields_none() {
        assert!(check("circle 10").is_empty());
    }

    #[test]
    fn multiple_errors_all_accumulate() {
        let diags = check("ciclse 20\ncircle 20\nrecngle\nrectangle 50 50");
        assert_eq!(diags.len(), 2);
        assert!(diags.iter().any(|d| d.text.contains("ciclse")));
        assert!(diags.iter().any(|d| d.text.contains("recngle")));
    }

    #[test]
    fn known_keyword_with_bad_arity_names_the_usage() {
        let diags = check("rectangle 50");
        assert_eq!(diags.len(), 1);
        assert!(diags[0].message.contains("rectangle <width> <height>"));
    }

    #[test]
    fn variable_arguments_pass_the_dry_check() {
        assert!(check("radius = 10\ncircle radius").is_empty());
        assert!(check("loop count\ncircle size\nendloop").is_empty());
    }

    #[test]
    fn unknown_color_is_flagged() {
        let diags = check("pen rde");
        assert_eq!(diags.len(), 1);
        assert!(diags[0].message.contains("rde"));
    }

    #[test]
    fn unterminated_region_is_flagged() {
        let diags = check("loop 3\ncircle 10");
        assert_eq!(diags.len(), 1);
        assert!(diags[0].message.contains("never terminated"));
        assert_eq!(diags[0].line, 1);
    }

    #[test]
    fn mismatched_terminator_is_flagged() {
        let diags = check("loop 3\ncircle 10\nendif");
        assert!(!diags.is_empty());
    }

    #[test]
    fn balanced_nesting_passes() {
        let src = "loop 2\nif 1 = 1\ncircle 5\nendif\nendloop";
        assert!(check(src).is_empty());
    }

    #[test]
    fn method_definition_and_later_bare_call_pass() {
        let src = "method drawShapes\ncircle 20\nendmethod\ndrawshapes";
        assert!(check(src).is_empty());
    }

    #[test]
    fn method_call_with_arguments_passes() {
        assert!(check("drawshapes2 (20 30)").is_empty());
    }

    #[test]
    fn assignments_validate_their_expression() {
        assert!(check("size = count * 10").is_empty());
        let diags = check("size = *");
        assert_eq!(diags.len(), 1);
    }

    #[test]
    fn keyword_named_assignment_passes_the_dry_check() {
        assert!(check("pen = 5\ncircle pen").is_empty());
    }

    #[test]
    fn nothing_executes_during_validation() {
        // A save line is still just classified, never performed.
        assert!(check("save /nonexistent dir.txt").is_empty());
    }
}
