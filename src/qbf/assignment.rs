#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Partial assignments of truth values to variables.
//!
//! An assignment maps a subset of the prefix variables to booleans; a
//! variable absent from the map is unassigned. The map representation fits
//! the sparse, shifting population of assigned variables the preprocessor
//! and the search engine maintain.

use crate::qbf::literal::{Literal, Variable};
use rustc_hash::FxHashMap;

/// A partial mapping from variables to truth values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Assignment {
    values: FxHashMap<Variable, bool>,
}

impl Assignment {
    /// Creates an empty assignment.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Assigns a truth value to a variable, overwriting any previous value.
    pub fn set(&mut self, var: Variable, value: bool) {
        self.values.insert(var, value);
    }

    /// Removes the variable from the assignment.
    pub fn unassign(&mut self, var: Variable) {
        self.values.remove(&var);
    }

    /// The value of a variable, or `None` if unassigned.
    #[must_use]
    pub fn value(&self, var: Variable) -> Option<bool> {
        self.values.get(&var).copied()
    }

    /// Whether the variable is assigned.
    #[must_use]
    pub fn is_assigned(&self, var: Variable) -> bool {
        self.values.contains_key(&var)
    }

    /// The truth value of a literal under this assignment, or `None` if
    /// its variable is unassigned.
    #[must_use]
    pub fn literal_value(&self, lit: Literal) -> Option<bool> {
        self.value(lit.variable()).map(|b| b == lit.polarity())
    }

    /// The number of assigned variables.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether nothing is assigned.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Returns an iterator over the assigned `(variable, value)` pairs in
    /// unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = (Variable, bool)> + '_ {
        self.values.iter().map(|(&v, &b)| (v, b))
    }
}
