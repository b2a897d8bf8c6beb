use crate::formula::{Clause, Formula, Literal, Variable};
use std::io::{BufRead, BufReader, Read};

/// Token emitted in the header's variable-count slot. Clause lines carry
/// variable names verbatim, so no integer count exists to put there.
pub const VARIABLE_COUNT_PLACEHOLDER: &str = "$MAX_LITERAL";

/// Renders a formula in the DIMACS-shaped text format: a `p cnf` header
/// followed by one line per clause of space-separated signed variable names,
/// each terminated by `0`.
pub fn render(formula: &Formula) -> String {
    let mut lines = Vec::with_capacity(formula.len() + 1);
    lines.push(format!(
        "p cnf {} {}",
        VARIABLE_COUNT_PLACEHOLDER,
        formula.len()
    ));
    for clause in formula.clauses() {
        let mut tokens: Vec<String> = clause
            .literals()
            .map(|literal| match literal {
                Literal::Positive(v) => v.name().to_string(),
                Literal::Negative(v) => format!("-{}", v.name()),
            })
            .collect();
        tokens.push("0".to_string());
        lines.push(tokens.join(" "));
    }
    lines.join("\n")
}

pub fn parse<R: Read>(reader: R) -> Result<Formula, DimacsParseError> {
    let reader = BufReader::new(reader);

    let mut clauses = vec![];
    let mut num_clauses = None;

    for line in reader.lines() {
        let line = line?;
        let mut line = line.split_whitespace().peekable();

        match line.peek() {
            Some(&"c") | None => continue,
            Some(&"p") => {
                let _ = line.next();

                if line.next() != Some("cnf") {
                    return Err(DimacsParseError::Format("missing 'cnf'".into()));
                }

                // The variable slot may hold a count or the renderer's
                // placeholder; names are read from the clause lines either way.
                let _ = line
                    .next()
                    .ok_or_else(|| DimacsParseError::Format("missing variable count".into()))?;

                num_clauses = Some(
                    line.next()
                        .and_then(|c| c.parse::<usize>().ok())
                        .ok_or_else(|| DimacsParseError::Format("invalid num_clauses".into()))?,
                );
            }
            Some(_) => {
                if num_clauses.is_none() {
                    return Err(DimacsParseError::Format("missing 'p' line before clauses".into()));
                }

                let mut clause = vec![];
                for token in line {
                    match parse_literal(token) {
                        Some(l) => clause.push(l),
                        None => break,
                    }
                }
                if !clause.is_empty() {
                    clauses.push(Clause::new(clause));
                }

                if clauses.len() >= num_clauses.unwrap() {
                    break;
                }
            }
        }
    }

    if num_clauses.is_none() {
        return Err(DimacsParseError::Format("missing 'p' line before clauses".into()));
    }

    let formula = Formula::new(clauses);
    Ok(formula)
}

// `0` ends the clause; a leading `-` negates; anything else is a name.
fn parse_literal(token: &str) -> Option<Literal> {
    if token == "0" {
        return None;
    }
    match token.strip_prefix('-') {
        Some(name) => Some(Literal::Negative(Variable::new(name))),
        None => Some(Literal::Positive(Variable::new(token))),
    }
}

#[derive(Debug)]
pub enum DimacsParseError {
    Io(std::io::Error),
    Format(String),
}

impl From<std::io::Error> for DimacsParseError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}
