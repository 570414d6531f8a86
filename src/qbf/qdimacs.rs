#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Reading and writing the QDIMACS file format.
//!
//! QDIMACS extends DIMACS CNF with quantifier lines. A file consists of
//! optional `c` comment lines, an informational `p cnf <vars> <clauses>`
//! line, one `e`/`a` line per quantifier block (zero-terminated, in prefix
//! order, all before the first clause), and one zero-terminated clause
//! line per clause with negative integers denoting negated literals.
//!
//! The reader builds a [`Preprocessor`] through its well-formed mutators
//! and rejects anything else: malformed tokens, missing terminators,
//! quantifier lines after clauses, and clause variables no block binds.

use crate::qbf::clause::Clause;
use crate::qbf::generate::Instance;
use crate::qbf::literal::Variable;
use crate::qbf::preprocess::Preprocessor;
use crate::qbf::prefix::Quantifier;
use std::io::{self, BufRead, Write};
use std::path::Path;
use thiserror::Error;

/// Everything that can go wrong while reading a QDIMACS file.
#[derive(Debug, Error)]
pub enum ParseError {
    /// A token could not be parsed as a literal or variable.
    #[error("line {line}: cannot parse '{token}' as a literal")]
    InvalidLiteral {
        /// 1-based line number.
        line: usize,
        /// The offending token.
        token: String,
    },
    /// A quantifier or clause line did not end with `0`.
    #[error("line {line}: missing terminating 0")]
    MissingTerminator {
        /// 1-based line number.
        line: usize,
    },
    /// A malformed `p` problem line.
    #[error("line {line}: malformed problem line (expected 'p cnf <vars> <clauses>')")]
    InvalidHeader {
        /// 1-based line number.
        line: usize,
    },
    /// A quantifier line appeared after the first clause.
    #[error("line {line}: quantifier line after the first clause")]
    QuantifierAfterClause {
        /// 1-based line number.
        line: usize,
    },
    /// A quantifier line binding no variables.
    #[error("line {line}: empty quantifier block")]
    EmptyBlock {
        /// 1-based line number.
        line: usize,
    },
    /// A variable bound by more than one quantifier block.
    #[error("line {line}: variable {var} is bound more than once")]
    DuplicateBinding {
        /// 1-based line number.
        line: usize,
        /// The variable bound twice.
        var: Variable,
    },
    /// A clause variable not bound by any quantifier block.
    #[error("line {line}: variable {var} is not bound by any quantifier block")]
    UnboundVariable {
        /// 1-based line number.
        line: usize,
        /// The unbound variable.
        var: Variable,
    },
    /// An underlying I/O failure.
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Parses QDIMACS text into a ready-to-preprocess [`Preprocessor`].
///
/// # Errors
///
/// Returns a [`ParseError`] for malformed input; see the variant list.
pub fn parse_qdimacs_text(text: &str) -> Result<Preprocessor, ParseError> {
    parse_qdimacs(io::Cursor::new(text))
}

/// Parses QDIMACS data from any buffered reader.
///
/// # Errors
///
/// Returns a [`ParseError`] for malformed input or an I/O failure.
pub fn parse_qdimacs<R: BufRead>(reader: R) -> Result<Preprocessor, ParseError> {
    let mut preprocessor = Preprocessor::new();
    let mut seen_clause = false;

    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        let line_no = index + 1;
        let trimmed = line.trim();

        if trimmed.is_empty() || trimmed.starts_with('c') {
            continue;
        }

        let tokens: Vec<&str> = trimmed.split_whitespace().collect();
        match tokens[0] {
            "p" => parse_header(&tokens, line_no)?,
            "e" | "a" => {
                if seen_clause {
                    return Err(ParseError::QuantifierAfterClause { line: line_no });
                }
                let quantifier = if tokens[0] == "e" {
                    Quantifier::Exists
                } else {
                    Quantifier::Forall
                };
                let variables = parse_block_variables(&tokens[1..], line_no, &preprocessor)?;
                preprocessor.add_block(quantifier, variables);
            }
            _ => {
                let clause = parse_clause(&tokens, line_no, &preprocessor)?;
                preprocessor.add_clause(clause);
                seen_clause = true;
            }
        }
    }

    Ok(preprocessor)
}

/// Parses the QDIMACS file at `path`.
///
/// # Errors
///
/// Returns a [`ParseError`] if the file cannot be opened, read, or parsed.
pub fn parse_file(path: &Path) -> Result<Preprocessor, ParseError> {
    let file = std::fs::File::open(path)?;
    parse_qdimacs(io::BufReader::new(file))
}

/// The counts of the `p cnf` line are informational only; the line is
/// validated for shape and otherwise ignored.
fn parse_header(tokens: &[&str], line_no: usize) -> Result<(), ParseError> {
    let valid = tokens.len() == 4
        && tokens[1] == "cnf"
        && tokens[2].parse::<usize>().is_ok()
        && tokens[3].parse::<usize>().is_ok();
    if valid {
        Ok(())
    } else {
        Err(ParseError::InvalidHeader { line: line_no })
    }
}

fn parse_block_variables(
    tokens: &[&str],
    line_no: usize,
    preprocessor: &Preprocessor,
) -> Result<Vec<Variable>, ParseError> {
    let body = strip_terminator(tokens, line_no)?;

    let mut variables = Vec::with_capacity(body.len());
    for token in body {
        let var: Variable = token
            .parse()
            .ok()
            .filter(|&v| v != 0)
            .ok_or_else(|| ParseError::InvalidLiteral {
                line: line_no,
                token: (*token).to_string(),
            })?;
        if preprocessor.prefix().binds(var) || variables.contains(&var) {
            return Err(ParseError::DuplicateBinding { line: line_no, var });
        }
        variables.push(var);
    }

    if variables.is_empty() {
        return Err(ParseError::EmptyBlock { line: line_no });
    }
    Ok(variables)
}

fn parse_clause(
    tokens: &[&str],
    line_no: usize,
    preprocessor: &Preprocessor,
) -> Result<Clause, ParseError> {
    let body = strip_terminator(tokens, line_no)?;

    let mut literals = Vec::with_capacity(body.len());
    for token in body {
        let value: i32 = token
            .parse()
            .ok()
            .filter(|&v| v != 0)
            .ok_or_else(|| ParseError::InvalidLiteral {
                line: line_no,
                token: (*token).to_string(),
            })?;
        let var = value.unsigned_abs();
        if !preprocessor.prefix().binds(var) {
            return Err(ParseError::UnboundVariable { line: line_no, var });
        }
        literals.push(value);
    }

    // a bare `0` line is the empty clause and is kept as such
    Ok(literals.into_iter().collect())
}

fn strip_terminator<'a>(
    tokens: &'a [&'a str],
    line_no: usize,
) -> Result<&'a [&'a str], ParseError> {
    match tokens.split_last() {
        Some((&"0", body)) => Ok(body),
        _ => Err(ParseError::MissingTerminator { line: line_no }),
    }
}

/// Writes a generated instance as QDIMACS: configuration comments, the
/// `p cnf` line, one quantifier line per block, one line per clause.
///
/// # Errors
///
/// Propagates any I/O failure of the writer.
pub fn write_qdimacs<W: Write>(writer: &mut W, instance: &Instance) -> io::Result<()> {
    for comment in &instance.comments {
        writeln!(writer, "c {comment}")?;
    }
    writeln!(
        writer,
        "p cnf {} {}",
        instance.num_vars,
        instance.clauses.len()
    )?;

    for block in &instance.blocks {
        write!(writer, "{}", block.quantifier.letter())?;
        for var in &block.variables {
            write!(writer, " {var}")?;
        }
        writeln!(writer, " 0")?;
    }

    for clause in &instance.clauses {
        for lit in clause {
            write!(writer, "{lit} ")?;
        }
        writeln!(writer, "0")?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_formula() {
        let text = "c example\n\
                    p cnf 4 4\n\
                    e 1 0\n\
                    a 2 0\n\
                    e 3 4 0\n\
                    1 -2 0\n\
                    -1 3 0\n\
                    2 4 0\n\
                    3 4 0\n";
        let pre = parse_qdimacs_text(text).unwrap();

        assert_eq!(pre.prefix().len(), 3);
        assert_eq!(pre.matrix().len(), 4);
        assert_eq!(pre.prefix().quantifier(2), Quantifier::Forall);
        assert_eq!(pre.prefix().block_index(4), 2);

        let first: Vec<i32> = pre
            .matrix()
            .iter()
            .next()
            .unwrap()
            .iter()
            .map(|l| l.to_i32())
            .collect();
        assert_eq!(first, vec![1, -2]);
    }

    #[test]
    fn test_comments_and_blank_lines_ignored() {
        let text = "c one\n\nc two\ne 1 0\n1 0\n";
        let pre = parse_qdimacs_text(text).unwrap();
        assert_eq!(pre.matrix().len(), 1);
    }

    #[test]
    fn test_empty_clause_line_kept() {
        let text = "e 1 0\n0\n";
        let pre = parse_qdimacs_text(text).unwrap();
        assert!(pre.matrix().has_empty_clause());
    }

    #[test]
    fn test_quantifier_after_clause_rejected() {
        let text = "e 1 0\n1 0\na 2 0\n";
        assert!(matches!(
            parse_qdimacs_text(text),
            Err(ParseError::QuantifierAfterClause { line: 3 })
        ));
    }

    #[test]
    fn test_malformed_literal_rejected() {
        let text = "e 1 0\n1 abc 0\n";
        assert!(matches!(
            parse_qdimacs_text(text),
            Err(ParseError::InvalidLiteral { line: 2, .. })
        ));
    }

    #[test]
    fn test_missing_terminator_rejected() {
        let text = "e 1 0\n1 -1\n";
        assert!(matches!(
            parse_qdimacs_text(text),
            Err(ParseError::MissingTerminator { line: 2 })
        ));
    }

    #[test]
    fn test_unbound_variable_rejected() {
        let text = "e 1 0\n1 2 0\n";
        assert!(matches!(
            parse_qdimacs_text(text),
            Err(ParseError::UnboundVariable { line: 2, var: 2 })
        ));
    }

    #[test]
    fn test_duplicate_binding_rejected() {
        let text = "e 1 0\na 1 0\n1 0\n";
        assert!(matches!(
            parse_qdimacs_text(text),
            Err(ParseError::DuplicateBinding { line: 2, var: 1 })
        ));
    }

    #[test]
    fn test_bad_header_rejected() {
        let text = "p cnf x 2\ne 1 0\n1 0\n";
        assert!(matches!(
            parse_qdimacs_text(text),
            Err(ParseError::InvalidHeader { line: 1 })
        ));
    }
}
