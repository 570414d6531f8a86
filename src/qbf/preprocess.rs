#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! The QBF-aware preprocessor.
//!
//! The preprocessor owns the clause matrix, the quantifier prefix and the
//! partial assignment. Formulas are built up through `add_block` and
//! `add_clause`; `preprocess` then simplifies to a fixpoint with two rules,
//! both restricted by the quantifier dependency structure so that no
//! rewrite changes the truth value of the formula:
//!
//! 1. **Unit propagation.** A unit clause forces its literal, but only
//!    when the forced value can still be expressed as a function of the
//!    surrounding quantifiers: an existential unit must not interact with
//!    an unassigned universal from an earlier block, and a universal unit
//!    must not interact with an unassigned existential from a later block.
//!    Inner variables have the fewest dependents, so candidates are tried
//!    innermost first.
//! 2. **Pure-literal elimination.** A variable whose complement polarity
//!    never occurs can be pinned, provided every variable of every earlier
//!    block is already decided.
//!
//! The final state implies a three-valued verdict: an empty clause means
//! UNSAT, an empty matrix means SAT, anything else is handed to the search
//! engine.

use crate::qbf::assignment::Assignment;
use crate::qbf::clause::Clause;
use crate::qbf::literal::{Literal, Variable};
use crate::qbf::matrix::Matrix;
use crate::qbf::prefix::{Prefix, Quantifier};
use log::debug;

/// The outcome of preprocessing or search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// The formula is true.
    Sat,
    /// The formula is false.
    Unsat,
    /// Preprocessing alone could not decide; clauses remain.
    Unknown,
}

/// A by-value copy of the preprocessor's final state, handed to the search
/// engine. The engine owns it outright; no references point back.
#[derive(Debug, Clone)]
pub struct Snapshot {
    /// The quantifier prefix.
    pub prefix: Prefix,
    /// The simplified clause matrix.
    pub matrix: Matrix,
    /// The partial assignment accumulated by preprocessing.
    pub assignment: Assignment,
}

/// Owns a prenex formula and simplifies it in place.
#[derive(Debug, Clone, Default)]
pub struct Preprocessor {
    matrix: Matrix,
    prefix: Prefix,
    assignment: Assignment,
}

impl Preprocessor {
    /// Creates a preprocessor with an empty prefix and matrix.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a quantifier block to the prefix and updates the derived
    /// variable indices.
    pub fn add_block(&mut self, quantifier: Quantifier, variables: Vec<Variable>) {
        self.prefix.push_block(quantifier, variables);
    }

    /// Appends a clause to the matrix.
    pub fn add_clause(&mut self, clause: Clause) {
        self.matrix.add_clause(clause);
    }

    /// The current clause matrix.
    #[must_use]
    pub fn matrix(&self) -> &Matrix {
        &self.matrix
    }

    /// The partial assignment accumulated so far.
    #[must_use]
    pub fn assignment(&self) -> &Assignment {
        &self.assignment
    }

    /// The quantifier prefix.
    #[must_use]
    pub fn prefix(&self) -> &Prefix {
        &self.prefix
    }

    /// Clones the current state into a [`Snapshot`] for the search engine.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            prefix: self.prefix.clone(),
            matrix: self.matrix.clone(),
            assignment: self.assignment.clone(),
        }
    }

    /// Runs both simplification rules to a fixpoint and reports the
    /// verdict implied by the final state.
    pub fn preprocess(&mut self) -> Verdict {
        loop {
            if self.matrix.has_empty_clause() {
                break;
            }

            let mut changed = self.unit_propagate();
            changed |= self.pure_literal_elimination();

            if !changed {
                break;
            }
        }

        self.verdict()
    }

    fn verdict(&self) -> Verdict {
        if self.matrix.has_empty_clause() {
            Verdict::Unsat
        } else if self.matrix.is_empty() {
            Verdict::Sat
        } else {
            Verdict::Unknown
        }
    }

    /// Unit propagation to an inner fixpoint. Candidates are collected
    /// from the current matrix, stable-sorted innermost block first (ties
    /// keep matrix order), and the first admissible one is propagated; the
    /// scan then restarts on the rewritten matrix.
    fn unit_propagate(&mut self) -> bool {
        let mut changed = false;

        loop {
            let mut candidates: Vec<(Literal, usize)> = self
                .matrix
                .iter()
                .filter_map(Clause::unit_literal)
                .map(|lit| (lit, self.prefix.block_index(lit.variable())))
                .collect();
            candidates.sort_by(|a, b| b.1.cmp(&a.1));

            let unit = candidates.into_iter().map(|(lit, _)| lit).find(|lit| {
                !self.assignment.is_assigned(lit.variable())
                    && self.can_propagate(lit.variable())
            });

            let Some(lit) = unit else {
                break;
            };

            let var = lit.variable();
            let value = lit.polarity();
            debug!("unit propagation: x{var} = {value}");
            self.assignment.set(var, value);
            self.matrix.assign_variable(var, value);
            changed = true;
        }

        changed
    }

    /// The propagation admissibility test. An existential unit is blocked
    /// by any unassigned universal from a strictly earlier block occurring
    /// in a clause with the variable; a universal unit is blocked by any
    /// unassigned existential from a strictly later block. Only clauses
    /// currently containing the variable are examined.
    fn can_propagate(&self, var: Variable) -> bool {
        let var_block = self.prefix.block_index(var);

        let blocked = |lit: &Literal| {
            if lit.variable() == var {
                return false;
            }
            let other = lit.variable();
            let other_block = self.prefix.block_index(other);
            let conflicting = match self.prefix.quantifier(var) {
                Quantifier::Exists => {
                    other_block < var_block
                        && self.prefix.quantifier(other) == Quantifier::Forall
                }
                Quantifier::Forall => {
                    other_block > var_block
                        && self.prefix.quantifier(other) == Quantifier::Exists
                }
            };
            conflicting && !self.assignment.is_assigned(other)
        };

        !self
            .matrix
            .relevant_clauses(var)
            .iter()
            .any(|clause| clause.iter().any(|lit| blocked(lit)))
    }

    /// One pure-literal sweep over the blocks, innermost to outermost.
    /// Assignments are scheduled during the sweep against the unmodified
    /// matrix and applied together afterwards, followed by one round of
    /// clause simplification.
    fn pure_literal_elimination(&mut self) -> bool {
        let mut scheduled: Vec<(Variable, bool)> = Vec::new();

        for block_index in (0..self.prefix.len()).rev() {
            let block = self.prefix.block(block_index);

            for &var in &block.variables {
                if self.assignment.is_assigned(var) {
                    continue;
                }
                if !self.all_earlier_assigned(block_index) {
                    continue;
                }

                let (pos_occurs, neg_occurs) = self.polarity_occurrences(var);
                let pos_pure = pos_occurs && !neg_occurs;
                let neg_pure = neg_occurs && !pos_occurs;

                if pos_pure || neg_pure {
                    debug!("pure literal: x{var} = {pos_pure}");
                    scheduled.push((var, pos_pure));
                }
            }
        }

        let changed = !scheduled.is_empty();
        for (var, value) in scheduled {
            self.assignment.set(var, value);
        }

        if changed {
            self.matrix.simplify_under(&self.assignment);
        }

        changed
    }

    /// Whether every variable of every block strictly before `block_index`
    /// is assigned.
    fn all_earlier_assigned(&self, block_index: usize) -> bool {
        (0..block_index).all(|i| {
            self.prefix
                .block(i)
                .variables
                .iter()
                .all(|&var| self.assignment.is_assigned(var))
        })
    }

    /// Scans the matrix for occurrences of `var`: (positive seen,
    /// negative seen).
    fn polarity_occurrences(&self, var: Variable) -> (bool, bool) {
        let mut pos = false;
        let mut neg = false;
        for clause in self.matrix.iter() {
            for lit in clause.iter() {
                if lit.variable() == var {
                    if lit.polarity() {
                        pos = true;
                    } else {
                        neg = true;
                    }
                }
            }
        }
        (pos, neg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clause(lits: &[i32]) -> Clause {
        lits.iter().copied().collect()
    }

    #[test]
    fn test_unit_chain_sat() {
        let mut pre = Preprocessor::new();
        pre.add_block(Quantifier::Exists, vec![1]);
        pre.add_clause(clause(&[1]));

        assert_eq!(pre.preprocess(), Verdict::Sat);
        assert_eq!(pre.assignment().value(1), Some(true));
        assert!(pre.matrix().is_empty());
    }

    #[test]
    fn test_immediate_contradiction_unsat() {
        let mut pre = Preprocessor::new();
        pre.add_block(Quantifier::Exists, vec![1]);
        pre.add_clause(clause(&[1]));
        pre.add_clause(clause(&[-1]));

        assert_eq!(pre.preprocess(), Verdict::Unsat);
        // the empty clause is the only element left
        assert_eq!(pre.matrix().len(), 1);
        assert!(pre.matrix().has_empty_clause());
    }

    #[test]
    fn test_pure_literal_sweep_sat() {
        let mut pre = Preprocessor::new();
        pre.add_block(Quantifier::Exists, vec![1, 2]);
        pre.add_clause(clause(&[1, 2]));
        pre.add_clause(clause(&[1, -2]));

        assert_eq!(pre.preprocess(), Verdict::Sat);
        assert_eq!(pre.assignment().value(1), Some(true));
        assert!(!pre.assignment().is_assigned(2));
        assert!(pre.matrix().is_empty());
    }

    #[test]
    fn test_inadmissible_unit_left_intact() {
        // The unit on x2 interacts with the earlier unassigned universal
        // x1, so no rule fires and the formula goes to search untouched.
        let mut pre = Preprocessor::new();
        pre.add_block(Quantifier::Forall, vec![1]);
        pre.add_block(Quantifier::Exists, vec![2]);
        pre.add_clause(clause(&[2]));
        pre.add_clause(clause(&[1, -2]));
        pre.add_clause(clause(&[-1, 2]));

        assert_eq!(pre.preprocess(), Verdict::Unknown);
        assert_eq!(pre.matrix().len(), 3);
        assert!(pre.assignment().is_empty());
    }

    #[test]
    fn test_universal_unit_blocked_by_later_existential() {
        let mut pre = Preprocessor::new();
        pre.add_block(Quantifier::Forall, vec![1]);
        pre.add_block(Quantifier::Exists, vec![2]);
        pre.add_clause(clause(&[1]));
        pre.add_clause(clause(&[-1, 2]));

        assert_eq!(pre.preprocess(), Verdict::Unknown);
        assert_eq!(pre.matrix().len(), 2);
        assert!(pre.assignment().is_empty());
    }

    #[test]
    fn test_pure_literal_requires_earlier_blocks_assigned() {
        // x3 is positive pure but the outer universal is still open, so
        // the sweep must not touch it.
        let mut pre = Preprocessor::new();
        pre.add_block(Quantifier::Forall, vec![1]);
        pre.add_block(Quantifier::Exists, vec![3]);
        pre.add_clause(clause(&[1, 3]));
        pre.add_clause(clause(&[-1, 3]));

        assert_eq!(pre.preprocess(), Verdict::Unknown);
        assert!(!pre.assignment().is_assigned(3));
        assert_eq!(pre.matrix().len(), 2);
    }

    #[test]
    fn test_negative_pure_assigns_false() {
        let mut pre = Preprocessor::new();
        pre.add_block(Quantifier::Exists, vec![1, 2]);
        pre.add_clause(clause(&[-1, 2]));
        pre.add_clause(clause(&[-1, -2]));

        assert_eq!(pre.preprocess(), Verdict::Sat);
        assert_eq!(pre.assignment().value(1), Some(false));
    }

    #[test]
    fn test_no_assigned_variable_left_in_matrix() {
        let mut pre = Preprocessor::new();
        pre.add_block(Quantifier::Exists, vec![1, 2, 3]);
        pre.add_clause(clause(&[1]));
        pre.add_clause(clause(&[-1, 2, 3]));
        pre.add_clause(clause(&[2, -3]));

        pre.preprocess();

        for clause in pre.matrix().iter() {
            for lit in clause.iter() {
                assert!(!pre.assignment().is_assigned(lit.variable()));
            }
        }
    }

    #[test]
    fn test_determinism() {
        let build = || {
            let mut pre = Preprocessor::new();
            pre.add_block(Quantifier::Exists, vec![1]);
            pre.add_block(Quantifier::Forall, vec![2]);
            pre.add_block(Quantifier::Exists, vec![3, 4]);
            pre.add_clause(clause(&[1, -2]));
            pre.add_clause(clause(&[-1, 3]));
            pre.add_clause(clause(&[2, 4]));
            pre.add_clause(clause(&[3, 4]));
            pre
        };

        let mut first = build();
        let mut second = build();
        assert_eq!(first.preprocess(), second.preprocess());
        assert_eq!(first.assignment(), second.assignment());
        assert_eq!(first.matrix(), second.matrix());
    }

    #[test]
    fn test_input_empty_clause_is_unsat() {
        let mut pre = Preprocessor::new();
        pre.add_block(Quantifier::Exists, vec![1]);
        pre.add_clause(Clause::empty());
        pre.add_clause(clause(&[1]));

        assert_eq!(pre.preprocess(), Verdict::Unsat);
    }

    #[test]
    fn test_empty_matrix_is_sat() {
        let mut pre = Preprocessor::new();
        pre.add_block(Quantifier::Forall, vec![1]);

        assert_eq!(pre.preprocess(), Verdict::Sat);
    }
}
