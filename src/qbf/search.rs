#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! The DPLL search engine for prenex QBF.
//!
//! The search explores the two-player game tree spanned by the quantifier
//! prefix: an existential node is satisfiable if either polarity branch
//! is, a universal node only if both are. Variables are decided strictly
//! in prefix order, so every decision respects the dependency structure.
//!
//! Each decision frame saves the clause matrix by value and restores it
//! together with the assignment after both branches, which makes the
//! engine non-destructive: when `solve` returns, the working state equals
//! the snapshot it received.

use crate::qbf::assignment::Assignment;
use crate::qbf::literal::Variable;
use crate::qbf::matrix::Matrix;
use crate::qbf::preprocess::{Snapshot, Verdict};
use crate::qbf::prefix::{Prefix, Quantifier};
use log::trace;

/// A recursive game-tree solver over a preprocessed formula.
#[derive(Debug, Clone)]
pub struct Search {
    prefix: Prefix,
    matrix: Matrix,
    assignment: Assignment,
    decisions: usize,
}

impl Search {
    /// Creates a search engine owning the given snapshot.
    #[must_use]
    pub fn new(snapshot: Snapshot) -> Self {
        Self {
            prefix: snapshot.prefix,
            matrix: snapshot.matrix,
            assignment: snapshot.assignment,
            decisions: 0,
        }
    }

    /// Decides the formula. Returns [`Verdict::Sat`] or [`Verdict::Unsat`].
    pub fn solve(&mut self) -> Verdict {
        if let Some(verdict) = self.trivial_verdict() {
            return verdict;
        }

        let Some((var, quantifier)) = self.select_variable() else {
            // no decision left; only the trivial verdicts remain
            return self.trivial_verdict().unwrap_or(Verdict::Unsat);
        };

        self.decisions += 1;
        let saved = self.matrix.clone();

        let first = self.branch(var, true, &saved);
        let decided = match quantifier {
            Quantifier::Exists => first == Verdict::Sat,
            Quantifier::Forall => first == Verdict::Unsat,
        };
        if decided {
            return first;
        }

        self.branch(var, false, &saved)
    }

    /// The number of branching decisions taken so far.
    #[must_use]
    pub const fn decisions(&self) -> usize {
        self.decisions
    }

    /// The working matrix. Outside of a `solve` call this equals the
    /// snapshot's matrix.
    #[must_use]
    pub const fn matrix(&self) -> &Matrix {
        &self.matrix
    }

    /// The working assignment. Outside of a `solve` call this equals the
    /// snapshot's assignment.
    #[must_use]
    pub const fn assignment(&self) -> &Assignment {
        &self.assignment
    }

    fn trivial_verdict(&self) -> Option<Verdict> {
        if self.matrix.has_empty_clause() {
            Some(Verdict::Unsat)
        } else if self.matrix.is_empty() {
            Some(Verdict::Sat)
        } else {
            None
        }
    }

    /// The first unassigned variable in prefix order: outermost block
    /// first, declaration order within a block.
    fn select_variable(&self) -> Option<(Variable, Quantifier)> {
        for block in self.prefix.iter() {
            for &var in &block.variables {
                if !self.assignment.is_assigned(var) {
                    return Some((var, block.quantifier));
                }
            }
        }
        None
    }

    /// Assigns `var ← value`, simplifies for that single assignment,
    /// recurses, and restores the matrix and assignment before returning
    /// the branch verdict.
    fn branch(&mut self, var: Variable, value: bool, saved: &Matrix) -> Verdict {
        trace!("decision: x{var} = {value}");
        self.assignment.set(var, value);
        self.matrix.assign_variable(var, value);

        let verdict = self.solve();

        self.matrix = saved.clone();
        self.assignment.unassign(var);
        verdict
    }
}
