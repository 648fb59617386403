/// Command tokenizer and dispatcher.
///
/// One trimmed line comes in; it is routed to variable assignment, a
/// built-in command, or a method call.  Each built-in validates its own
/// arity and argument types before touching the rendering capability.
///
/// Block constructs (`loop`, `if`, `method` and their terminators) never
/// reach this module — [`crate::interp::blocks`] intercepts them first.
use super::error::InterpError;
use super::{colors, eval, history, methods, Interpreter};
use crate::graphics::Graphical;

// ─── Usage table ──────────────────────────────────────────────────────────────

/// Correct-usage example for each keyword, shared with the syntax
/// validator's diagnostics.
pub(crate) fn usage_for(keyword: &str) -> Option<&'static str> {
    Some(match keyword {
        "pen" => "pen <color> | pen draw <x> <y>",
        "circle" => "circle <radius>",
        "rectangle" => "rectangle <width> <height>",
        "clear" => "clear",
        "fill" => "fill on|off",
        "position" => "position pen <x> <y>",
        "reset" => "reset",
        "save" => "save <dir> <name>",
        "load" => "load <dir> <name>",
        "method" => "method <name> (<params>)",
        "endmethod" => "endmethod",
        "loop" => "loop <count>",
        "endloop" => "endloop",
        "if" => "if <condition>",
        "endif" => "endif",
        _ => return None,
    })
}

// ─── Dispatch ─────────────────────────────────────────────────────────────────

/// Execute one non-block line against the rendering capability.
pub(crate) fn dispatch(
    interp: &mut Interpreter,
    line: &str,
    gfx: &mut dyn Graphical,
) -> Result<(), InterpError> {
    // Assignment outranks keyword dispatch: a variable may share a
    // command's name (`pen = 5`).
    if let Some(result) = try_assignment(interp, line) {
        return result;
    }

    let tokens: Vec<&str> = line.split_whitespace().collect();
    let keyword = tokens[0].to_lowercase();

    match keyword.as_str() {
        "pen" => exec_pen(interp, &tokens, gfx),
        "circle" => exec_circle(interp, &tokens, gfx),
        "rectangle" => exec_rectangle(interp, &tokens, gfx),
        "clear" => exec_clear(&tokens, gfx),
        "fill" => exec_fill(&tokens, gfx),
        "position" => exec_position(interp, &tokens, gfx),
        "reset" => exec_reset(&tokens, gfx),
        "save" => exec_save(interp, &tokens),
        "load" => exec_load(interp, &tokens, gfx),
        _ => exec_method_call(interp, line, &tokens, gfx),
    }
}

// ─── Built-in commands ────────────────────────────────────────────────────────

fn exec_pen(
    interp: &mut Interpreter,
    tokens: &[&str],
    gfx: &mut dyn Graphical,
) -> Result<(), InterpError> {
    if tokens.len() >= 2 && tokens[1].eq_ignore_ascii_case("draw") {
        if tokens.len() != 4 {
            return Err(bad_args("pen"));
        }
        let x = int_arg(tokens[2], interp, "pen")?;
        let y = int_arg(tokens[3], interp, "pen")?;
        gfx.draw_to(x, y);
        return Ok(());
    }
    if tokens.len() != 2 {
        return Err(bad_args("pen"));
    }
    gfx.set_color(colors::find(tokens[1])?);
    Ok(())
}

fn exec_circle(
    interp: &mut Interpreter,
    tokens: &[&str],
    gfx: &mut dyn Graphical,
) -> Result<(), InterpError> {
    if tokens.len() != 2 {
        return Err(bad_args("circle"));
    }
    let radius = int_arg(tokens[1], interp, "circle")?;
    let (x, y) = gfx.get_coords();
    gfx.circle(x, y, radius);
    Ok(())
}

fn exec_rectangle(
    interp: &mut Interpreter,
    tokens: &[&str],
    gfx: &mut dyn Graphical,
) -> Result<(), InterpError> {
    if tokens.len() != 3 {
        return Err(bad_args("rectangle"));
    }
    let width = int_arg(tokens[1], interp, "rectangle")?;
    let height = int_arg(tokens[2], interp, "rectangle")?;
    let (x, y) = gfx.get_coords();
    gfx.rectangle(x, y, width, height);
    Ok(())
}

fn exec_clear(tokens: &[&str], gfx: &mut dyn Graphical) -> Result<(), InterpError> {
    if tokens.len() != 1 {
        return Err(bad_args("clear"));
    }
    gfx.clear();
    Ok(())
}

fn exec_fill(tokens: &[&str], gfx: &mut dyn Graphical) -> Result<(), InterpError> {
    if tokens.len() != 2 {
        return Err(bad_args("fill"));
    }
    match tokens[1].to_lowercase().as_str() {
        "on" => gfx.set_fill(true),
        "off" => gfx.set_fill(false),
        _ => return Err(bad_args("fill")),
    }
    Ok(())
}

fn exec_position(
    interp: &mut Interpreter,
    tokens: &[&str],
    gfx: &mut dyn Graphical,
) -> Result<(), InterpError> {
    if tokens.len() != 4 || !tokens[1].eq_ignore_ascii_case("pen") {
        return Err(bad_args("position"));
    }
    let x = int_arg(tokens[2], interp, "position")?;
    let y = int_arg(tokens[3], interp, "position")?;
    gfx.set_coords(x, y);
    Ok(())
}

fn exec_reset(tokens: &[&str], gfx: &mut dyn Graphical) -> Result<(), InterpError> {
    if tokens.len() != 1 {
        return Err(bad_args("reset"));
    }
    gfx.set_coords(0, 0);
    Ok(())
}

fn exec_save(interp: &mut Interpreter, tokens: &[&str]) -> Result<(), InterpError> {
    if tokens.len() != 3 {
        return Err(bad_args("save"));
    }
    interp.history.export(tokens[1], tokens[2])
}

fn exec_load(
    interp: &mut Interpreter,
    tokens: &[&str],
    gfx: &mut dyn Graphical,
) -> Result<(), InterpError> {
    if tokens.len() != 3 {
        return Err(bad_args("load"));
    }
    let lines = history::read_script(tokens[1], tokens[2])?;

    // A loaded script may not save or load again.
    let kept: Vec<String> = lines
        .into_iter()
        .filter(|l| !l.trim().is_empty() && !history::is_persistence_line(l))
        .collect();
    for line in &kept {
        interp.history.record(line.trim());
    }
    let refs: Vec<&str> = kept.iter().map(String::as_str).collect();
    super::blocks::run_lines(interp, &refs, gfx, false).map(|_| ())
}

// ─── Assignment and method calls ──────────────────────────────────────────────

/// Route `name = expression` lines to the variable store.
///
/// Returns `None` when the line is not assignment-shaped, so the caller
/// can fall through to the method-call path.
fn try_assignment(interp: &mut Interpreter, line: &str) -> Option<Result<(), InterpError>> {
    let eq = line.find('=')?;
    let lhs = line[..eq].trim();
    if !is_identifier(lhs) {
        return None;
    }
    Some(
        eval::evaluate(&line[eq + 1..], &interp.vars).map(|value| interp.vars.set(lhs, value)),
    )
}

fn exec_method_call(
    interp: &mut Interpreter,
    line: &str,
    tokens: &[&str],
    gfx: &mut dyn Graphical,
) -> Result<(), InterpError> {
    if let Some(open) = line.find('(') {
        let name = line[..open].trim();
        if !is_identifier(name) {
            return Err(InterpError::UnrecognizedCommand(tokens[0].to_string()));
        }
        let close = line
            .rfind(')')
            .ok_or_else(|| InterpError::Argument(format!("missing ')' in call to '{name}'")))?;
        if !line[close + 1..].trim().is_empty() {
            return Err(InterpError::Argument(format!(
                "unexpected text after call to '{name}'"
            )));
        }
        let args: Vec<i32> = line[open + 1..close]
            .split(|c: char| c.is_whitespace() || c == ',')
            .filter(|a| !a.is_empty())
            .map(|a| eval::evaluate(a, &interp.vars))
            .collect::<Result<_, _>>()?;
        let def = interp
            .methods
            .get(name)
            .cloned()
            .ok_or_else(|| InterpError::UndefinedMethod(name.to_string()))?;
        return methods::call(interp, name, &def, &args, gfx);
    }

    // Bare-name call form for zero-parameter methods.
    if tokens.len() == 1 {
        if let Some(def) = interp.methods.get(tokens[0]).cloned() {
            return methods::call(interp, tokens[0], &def, &[], gfx);
        }
    }
    Err(InterpError::UnrecognizedCommand(tokens[0].to_string()))
}

// ─── Helpers ─────────────────────────────────────────────────────────────────

/// Resolve an argument token: a defined variable's value, otherwise an
/// integer literal.
fn int_arg(token: &str, interp: &Interpreter, keyword: &str) -> Result<i32, InterpError> {
    if let Some(value) = interp.vars.get(token) {
        return Ok(value);
    }
    token.parse::<i32>().map_err(|_| {
        InterpError::Argument(format!(
            "expected an integer, got '{token}' — usage: {}",
            usage_for(keyword).unwrap_or(keyword)
        ))
    })
}

fn bad_args(keyword: &str) -> InterpError {
    InterpError::Argument(format!(
        "wrong arguments for '{keyword}' — usage: {}",
        usage_for(keyword).unwrap_or(keyword)
    ))
}

/// A bare identifier: alphabetic or `_` first, alphanumeric or `_` rest.
pub(crate) fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{Scene, Shape};

    fn run(interp: &mut Interpreter, scene: &mut Scene, line: &str) {
        interp.run_line(line, scene).unwrap();
    }

    #[test]
    fn pen_color_sets_the_table_entry() {
        let mut interp = Interpreter::new();
        let mut scene = Scene::new();
        run(&mut interp, &mut scene, "pen red");
        assert_eq!(scene.get_color(), [255, 255, 0, 0]);
    }

    #[test]
    fn undefined_color_is_an_argument_error() {
        let mut interp = Interpreter::new();
        let mut scene = Scene::new();
        let err = interp.run_line("pen purple", &mut scene).unwrap_err();
        assert!(matches!(err, InterpError::Argument(_)));
    }

    #[test]
    fn circle_draws_at_the_cursor() {
        let mut interp = Interpreter::new();
        let mut scene = Scene::new();
        run(&mut interp, &mut scene, "circle 50");
        assert_eq!(scene.shapes().len(), 1);
        assert!(matches!(
            scene.shapes()[0],
            Shape::Circle {
                x: 0,
                y: 0,
                radius: 50,
                ..
            }
        ));
    }

    #[test]
    fn rectangle_draws_at_the_cursor() {
        let mut interp = Interpreter::new();
        let mut scene = Scene::new();
        run(&mut interp, &mut scene, "rectangle 200 100");
        assert!(matches!(
            scene.shapes()[0],
            Shape::Rect {
                x: 0,
                y: 0,
                w: 200,
                h: 100,
                ..
            }
        ));
    }

    #[test]
    fn position_pen_moves_without_drawing() {
        let mut interp = Interpreter::new();
        let mut scene = Scene::new();
        run(&mut interp, &mut scene, "position pen 100 200");
        assert_eq!(scene.get_coords(), (100, 200));
        assert!(scene.shapes().is_empty());
    }

    #[test]
    fn pen_draw_records_a_line_and_moves_the_cursor() {
        let mut interp = Interpreter::new();
        let mut scene = Scene::new();
        run(&mut interp, &mut scene, "pen draw 150 250");
        assert_eq!(scene.get_coords(), (150, 250));
        assert!(matches!(scene.shapes()[0], Shape::Line { .. }));
    }

    #[test]
    fn reset_returns_the_cursor_to_origin() {
        let mut interp = Interpreter::new();
        let mut scene = Scene::new();
        run(&mut interp, &mut scene, "position pen 5 6");
        run(&mut interp, &mut scene, "reset");
        assert_eq!(scene.get_coords(), (0, 0));
    }

    #[test]
    fn fill_toggles() {
        let mut interp = Interpreter::new();
        let mut scene = Scene::new();
        run(&mut interp, &mut scene, "fill on");
        assert!(scene.get_fill());
        run(&mut interp, &mut scene, "FILL OFF");
        assert!(!scene.get_fill());
    }

    #[test]
    fn clear_removes_all_shapes() {
        let mut interp = Interpreter::new();
        let mut scene = Scene::new();
        run(&mut interp, &mut scene, "circle 10");
        run(&mut interp, &mut scene, "clear");
        assert!(scene.shapes().is_empty());
    }

    #[test]
    fn unknown_keyword_names_the_offender() {
        let mut interp = Interpreter::new();
        let mut scene = Scene::new();
        let err = interp.run_line("crcle 50", &mut scene).unwrap_err();
        match err {
            InterpError::UnrecognizedCommand(kw) => assert_eq!(kw, "crcle"),
            other => panic!("expected unrecognized command, got {other}"),
        }
    }

    #[test]
    fn bad_arity_and_types_are_argument_errors() {
        let mut interp = Interpreter::new();
        let mut scene = Scene::new();
        assert!(matches!(
            interp.run_line("circle x", &mut scene),
            Err(InterpError::Argument(_))
        ));
        assert!(matches!(
            interp.run_line("pen draw 100", &mut scene),
            Err(InterpError::Argument(_))
        ));
        assert!(matches!(
            interp.run_line("pen draw 100,100,100", &mut scene),
            Err(InterpError::Argument(_))
        ));
        assert!(matches!(
            interp.run_line("clear now", &mut scene),
            Err(InterpError::Argument(_))
        ));
    }

    #[test]
    fn variables_substitute_into_arguments() {
        let mut interp = Interpreter::new();
        let mut scene = Scene::new();
        run(&mut interp, &mut scene, "radius = 10");
        run(&mut interp, &mut scene, "circle radius");
        assert!(matches!(
            scene.shapes()[0],
            Shape::Circle { radius: 10, .. }
        ));
    }

    #[test]
    fn assignment_outranks_keyword_dispatch() {
        let mut interp = Interpreter::new();
        let mut scene = Scene::new();
        run(&mut interp, &mut scene, "pen = 5");
        run(&mut interp, &mut scene, "circle pen");
        assert!(matches!(scene.shapes()[0], Shape::Circle { radius: 5, .. }));
        // A plain `pen` command still dispatches as usual.
        run(&mut interp, &mut scene, "pen red");
        assert_eq!(scene.get_color(), [255, 255, 0, 0]);
    }

    #[test]
    fn assignment_accepts_expressions_over_variables() {
        let mut interp = Interpreter::new();
        let mut scene = Scene::new();
        run(&mut interp, &mut scene, "count = 5");
        run(&mut interp, &mut scene, "size = count * 10");
        run(&mut interp, &mut scene, "circle size");
        assert!(matches!(
            scene.shapes()[0],
            Shape::Circle { radius: 50, .. }
        ));
    }

    #[test]
    fn keywords_are_case_insensitive() {
        let mut interp = Interpreter::new();
        let mut scene = Scene::new();
        run(&mut interp, &mut scene, "CIRCLE 7");
        run(&mut interp, &mut scene, "Rectangle 1 2");
        assert_eq!(scene.shapes().len(), 2);
    }

    #[test]
    fn identifier_shapes() {
        assert!(is_identifier("x"));
        assert!(is_identifier("draw_shapes2"));
        assert!(!is_identifier("2x"));
        assert!(!is_identifier(""));
        assert!(!is_identifier("a b"));
    }
}
