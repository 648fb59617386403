mod graphics;
mod interp;
mod scene;

use std::fs;
use std::process::ExitCode;

use anyhow::{bail, Context, Result};

use graphics::Graphical;
use interp::Interpreter;
use scene::Scene;

fn main() -> Result<ExitCode> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let (check_only, path) = match args.as_slice() {
        [path] => (false, path.as_str()),
        [flag, path] if flag == "--check" => (true, path.as_str()),
        _ => bail!("usage: penscript [--check] <script>"),
    };

    let src = fs::read_to_string(path).with_context(|| format!("cannot read script '{path}'"))?;
    let mut interp = Interpreter::new();

    if check_only {
        let diags = interp.check_syntax(&src);
        for d in &diags {
            eprintln!("{path}:{}: {} ({})", d.line, d.message, d.text);
        }
        if !diags.is_empty() {
            eprintln!("{} problem(s) found", diags.len());
            return Ok(ExitCode::FAILURE);
        }
        println!("syntax ok");
        return Ok(ExitCode::SUCCESS);
    }

    let mut scene = Scene::new();
    let failures = interp
        .run_script(&src, &mut scene)
        .with_context(|| format!("script '{path}' aborted"))?;
    for f in &failures {
        eprintln!("{path}:{}: {} ({})", f.line, f.error, f.text);
    }

    for shape in scene.shapes() {
        println!("{}", shape.describe());
    }
    let (x, y) = scene.get_coords();
    println!(
        "{} shape(s), cursor at ({x}, {y})",
        scene.shapes().len()
    );

    Ok(if failures.is_empty() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
