#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Clauses: ordered disjunctions of literals.
//!
//! A clause with no literals is the empty clause and denotes falsity; a
//! clause with exactly one literal is a unit clause. Literal order is
//! preserved through every transformation, which keeps the preprocessor
//! and the search engine deterministic for a fixed input.

use crate::qbf::literal::{Literal, Variable};
use itertools::Itertools;
use smallvec::SmallVec;
use std::fmt;

/// A disjunction of literals.
///
/// Literals are stored inline for the common short-clause case. Exact
/// duplicate literals are collapsed at construction; two literals of
/// opposite polarity on the same variable (a tautology) are kept as given.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Clause {
    literals: SmallVec<[Literal; 8]>,
}

impl Clause {
    /// Creates a clause from a slice of literals, collapsing exact
    /// duplicates while preserving first-occurrence order.
    #[must_use]
    pub fn new(literals: &[Literal]) -> Self {
        literals.iter().copied().collect()
    }

    /// The empty clause (falsity).
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// The number of literals in the clause.
    #[must_use]
    pub fn len(&self) -> usize {
        self.literals.len()
    }

    /// Whether this is the empty clause.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.literals.is_empty()
    }

    /// Whether this is a unit clause.
    #[must_use]
    pub fn is_unit(&self) -> bool {
        self.len() == 1
    }

    /// The single literal of a unit clause, if this is one.
    #[must_use]
    pub fn unit_literal(&self) -> Option<Literal> {
        if self.is_unit() {
            Some(self.literals[0])
        } else {
            None
        }
    }

    /// Returns an iterator over the literals in the clause.
    pub fn iter(&self) -> impl Iterator<Item = &Literal> {
        self.literals.iter()
    }

    /// Whether any literal of the clause is on the given variable.
    #[must_use]
    pub fn mentions(&self, var: Variable) -> bool {
        self.literals.iter().any(|l| l.variable() == var)
    }

    /// Whether the clause contains the given literal (variable and
    /// polarity both matching).
    #[must_use]
    pub fn contains(&self, lit: Literal) -> bool {
        self.literals.contains(&lit)
    }

    /// Removes every literal on the given variable, preserving the order
    /// of the rest.
    pub fn remove_variable(&mut self, var: Variable) {
        self.literals.retain(|l| l.variable() != var);
    }
}

impl FromIterator<Literal> for Clause {
    fn from_iter<I: IntoIterator<Item = Literal>>(iter: I) -> Self {
        Self {
            literals: iter.into_iter().unique().collect(),
        }
    }
}

impl FromIterator<i32> for Clause {
    /// Creates a clause from DIMACS-style signed integers.
    fn from_iter<I: IntoIterator<Item = i32>>(iter: I) -> Self {
        iter.into_iter().map(Literal::from_i32).collect()
    }
}

impl From<Vec<i32>> for Clause {
    fn from(literals: Vec<i32>) -> Self {
        literals.into_iter().collect()
    }
}

impl fmt::Display for Clause {
    /// `(x1 ∨ ¬x2)`; the empty clause prints as `⊥`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "⊥");
        }
        write!(f, "({})", self.literals.iter().join(" ∨ "))
    }
}
