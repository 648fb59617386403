/// Integer expression evaluator.
///
/// Reduces arithmetic/comparison expressions (e.g. `count * 10 - 5`,
/// `1 = 2`) against the variable store.  Used for assignments, loop
/// counts, `if` conditions, and method call arguments.
///
/// Supported operators, by precedence (low to high):
/// - `=` — equality test, yields 1 or 0
/// - `+`, `-`
/// - `*`, `/`
/// Parentheses override precedence; atoms are integer literals and
/// variable names.  Identifiers are resolved as whole tokens against
/// [`VarStore`], never by substring replacement.
use std::iter::Peekable;
use std::slice::Iter;

use super::error::InterpError;
use super::vars::VarStore;

// ─── Public entry point ───────────────────────────────────────────────────────

/// Evaluate `expr` and return its integer value.
pub fn evaluate(expr: &str, vars: &VarStore) -> Result<i32, InterpError> {
    let tokens = tokenize(expr)?;
    if tokens.is_empty() {
        return Err(InterpError::Evaluation("empty expression".to_string()));
    }
    let mut it = tokens.iter().peekable();
    let value = parse_equality(&mut it, vars)?;
    if let Some(tok) = it.next() {
        return Err(InterpError::Evaluation(format!(
            "unexpected trailing '{tok}' in '{expr}'"
        )));
    }
    Ok(value)
}

/// Well-formedness check without evaluation, for the syntax validator:
/// operands and operators must alternate and parentheses must balance.
/// Identifiers pass regardless of whether they are defined — variable
/// existence is an execution-time question.
pub fn validate_expr(expr: &str) -> Result<(), InterpError> {
    let tokens = tokenize(expr)?;
    if tokens.is_empty() {
        return Err(InterpError::Evaluation("empty expression".to_string()));
    }

    let mut expect_operand = true;
    let mut depth = 0usize;
    for tok in &tokens {
        match tok {
            Tok::Num(_) | Tok::Ident(_) => {
                if !expect_operand {
                    return Err(InterpError::Evaluation(format!("unexpected '{tok}'")));
                }
                expect_operand = false;
            }
            Tok::Op('-') if expect_operand => {} // unary minus
            Tok::Op(op) => {
                if expect_operand {
                    return Err(InterpError::Evaluation(format!("unexpected '{op}'")));
                }
                expect_operand = true;
            }
            Tok::LParen => {
                if !expect_operand {
                    return Err(InterpError::Evaluation("unexpected '('".to_string()));
                }
                depth += 1;
            }
            Tok::RParen => {
                if expect_operand || depth == 0 {
                    return Err(InterpError::Evaluation("unexpected ')'".to_string()));
                }
                depth -= 1;
            }
        }
    }

    if expect_operand {
        return Err(InterpError::Evaluation(
            "expression ends unexpectedly".to_string(),
        ));
    }
    if depth != 0 {
        return Err(InterpError::Evaluation("missing ')'".to_string()));
    }
    Ok(())
}

// ─── Tokens ───────────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
enum Tok<'a> {
    Num(i32),
    Ident(&'a str),
    Op(char),
    LParen,
    RParen,
}

impl std::fmt::Display for Tok<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Tok::Num(n) => write!(f, "{n}"),
            Tok::Ident(id) => write!(f, "{id}"),
            Tok::Op(c) => write!(f, "{c}"),
            Tok::LParen => write!(f, "("),
            Tok::RParen => write!(f, ")"),
        }
    }
}

fn tokenize(s: &str) -> Result<Vec<Tok<'_>>, InterpError> {
    let mut out = Vec::new();
    let mut it = s.char_indices().peekable();

    while let Some((start, c)) = it.next() {
        if c.is_whitespace() {
            continue;
        }

        match c {
            '(' => out.push(Tok::LParen),
            ')' => out.push(Tok::RParen),
            '+' | '-' | '*' | '/' | '=' => out.push(Tok::Op(c)),
            _ if c.is_ascii_digit() => {
                let mut end = start + c.len_utf8();
                while let Some(&(j, d)) = it.peek() {
                    if !d.is_ascii_digit() {
                        break;
                    }
                    end = j + d.len_utf8();
                    it.next();
                }
                let lit = &s[start..end];
                let v = lit.parse::<i32>().map_err(|_| {
                    InterpError::Evaluation(format!("integer '{lit}' is out of range"))
                })?;
                out.push(Tok::Num(v));
            }
            _ if c.is_ascii_alphabetic() || c == '_' => {
                let mut end = start + c.len_utf8();
                while let Some(&(j, d)) = it.peek() {
                    if !d.is_ascii_alphanumeric() && d != '_' {
                        break;
                    }
                    end = j + d.len_utf8();
                    it.next();
                }
                out.push(Tok::Ident(&s[start..end]));
            }
            _ => {
                return Err(InterpError::Evaluation(format!(
                    "unexpected character '{c}' in '{s}'"
                )));
            }
        }
    }

    Ok(out)
}

// ─── Recursive-descent parser ─────────────────────────────────────────────────

type Toks<'a, 'b> = Peekable<Iter<'b, Tok<'a>>>;

fn parse_equality(it: &mut Toks, vars: &VarStore) -> Result<i32, InterpError> {
    let mut v = parse_addsub(it, vars)?;
    while let Some(Tok::Op('=')) = it.peek() {
        it.next();
        let r = parse_addsub(it, vars)?;
        v = i32::from(v == r);
    }
    Ok(v)
}

fn parse_addsub(it: &mut Toks, vars: &VarStore) -> Result<i32, InterpError> {
    let mut v = parse_muldiv(it, vars)?;
    while let Some(Tok::Op(op @ ('+' | '-'))) = it.peek() {
        let op = *op;
        it.next();
        let r = parse_muldiv(it, vars)?;
        v = if op == '+' {
            v.wrapping_add(r)
        } else {
            v.wrapping_sub(r)
        };
    }
    Ok(v)
}

fn parse_muldiv(it: &mut Toks, vars: &VarStore) -> Result<i32, InterpError> {
    let mut v = parse_primary(it, vars)?;
    while let Some(Tok::Op(op @ ('*' | '/'))) = it.peek() {
        let op = *op;
        it.next();
        let r = parse_primary(it, vars)?;
        if op == '*' {
            v = v.wrapping_mul(r);
        } else {
            if r == 0 {
                return Err(InterpError::Evaluation("division by zero".to_string()));
            }
            v = v.wrapping_div(r);
        }
    }
    Ok(v)
}

fn parse_primary(it: &mut Toks, vars: &VarStore) -> Result<i32, InterpError> {
    match it.next() {
        Some(Tok::Num(n)) => Ok(*n),
        Some(Tok::Ident(id)) => vars
            .get(id)
            .ok_or_else(|| InterpError::Evaluation(format!("unknown variable '{id}'"))),
        Some(Tok::Op('-')) => Ok(parse_primary(it, vars)?.wrapping_neg()),
        Some(Tok::LParen) => {
            let v = parse_equality(it, vars)?;
            match it.next() {
                Some(Tok::RParen) => Ok(v),
                _ => Err(InterpError::Evaluation("missing ')'".to_string())),
            }
        }
        Some(tok) => Err(InterpError::Evaluation(format!("unexpected '{tok}'"))),
        None => Err(InterpError::Evaluation(
            "expression ends unexpectedly".to_string(),
        )),
    }
}
