#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! The clause matrix and its simplification primitives.
//!
//! The matrix is the conjunction of clauses under the prefix. It owns the
//! two rewriting steps everything else builds on: simplification under a
//! partial assignment (used by pure-literal elimination) and simplification
//! for a single fresh assignment (used by unit propagation and by every
//! search decision). Both maintain the collapse rule: the moment a clause
//! is reduced to nothing, the whole matrix becomes the single empty clause,
//! the canonical falsity marker.

use crate::qbf::assignment::Assignment;
use crate::qbf::clause::Clause;
use crate::qbf::literal::Variable;
use itertools::Itertools;
use std::fmt;

/// A conjunction of clauses.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Matrix {
    clauses: Vec<Clause>,
}

impl Matrix {
    /// Creates an empty matrix (trivially true).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a clause.
    pub fn add_clause(&mut self, clause: Clause) {
        self.clauses.push(clause);
    }

    /// The number of clauses.
    #[must_use]
    pub fn len(&self) -> usize {
        self.clauses.len()
    }

    /// Whether the matrix has no clauses at all. An empty matrix is
    /// trivially satisfied.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    /// Whether the matrix contains the empty clause.
    #[must_use]
    pub fn has_empty_clause(&self) -> bool {
        self.clauses.iter().any(Clause::is_empty)
    }

    /// Returns an iterator over the clauses in matrix order.
    pub fn iter(&self) -> impl Iterator<Item = &Clause> {
        self.clauses.iter()
    }

    /// Replaces the whole clause set with the single empty clause.
    pub fn collapse_to_empty(&mut self) {
        self.clauses.clear();
        self.clauses.push(Clause::empty());
    }

    /// Simplifies for one fresh assignment `var ← value`: clauses satisfied
    /// by the assignment are deleted, the opposite-polarity literals are
    /// removed from the rest, and the matrix collapses if a clause empties.
    pub fn assign_variable(&mut self, var: Variable, value: bool) {
        self.clauses
            .retain(|c| !c.iter().any(|l| l.variable() == var && l.polarity() == value));

        let mut emptied = false;
        for clause in &mut self.clauses {
            clause.remove_variable(var);
            if clause.is_empty() {
                emptied = true;
            }
        }
        if emptied {
            self.collapse_to_empty();
        }
    }

    /// Rebuilds the clause set under a partial assignment: satisfied
    /// clauses are dropped, literals on assigned variables are removed
    /// (they are false in any surviving clause), and an emptied survivor
    /// collapses the matrix.
    pub fn simplify_under(&mut self, assignment: &Assignment) {
        let mut kept = Vec::with_capacity(self.clauses.len());

        for clause in &self.clauses {
            if clause
                .iter()
                .any(|&l| assignment.literal_value(l) == Some(true))
            {
                continue;
            }

            let survivor: Clause = clause
                .iter()
                .filter(|l| !assignment.is_assigned(l.variable()))
                .copied()
                .collect();

            if survivor.is_empty() {
                self.collapse_to_empty();
                return;
            }
            kept.push(survivor);
        }

        self.clauses = kept;
    }

    /// Every clause containing a literal on `var`, in matrix order.
    #[must_use]
    pub fn relevant_clauses(&self, var: Variable) -> Vec<&Clause> {
        self.clauses.iter().filter(|c| c.mentions(var)).collect()
    }
}

impl fmt::Display for Matrix {
    /// The conjunction `(…) ∧ (…)`; an empty matrix prints as `⊤`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "⊤");
        }
        write!(f, "{}", self.clauses.iter().join(" ∧ "))
    }
}
