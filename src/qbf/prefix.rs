#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! The quantifier prefix of a prenex formula.
//!
//! A prefix is an ordered sequence of quantifier blocks, indexed from 0 at
//! the outermost level. Each block binds a non-empty run of variables under
//! a single quantifier. Alongside the block sequence the prefix maintains
//! two derived indices — variable to quantifier and variable to block
//! position — which every dependency check of the preprocessor and the
//! variable selection of the search engine go through.

use crate::qbf::literal::Variable;
use itertools::Itertools;
use rustc_hash::FxHashMap;
use std::fmt;

/// The two quantifiers of a QBF prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Quantifier {
    /// The existential player: picks a satisfying value.
    Exists,
    /// The universal player: every value must work out.
    Forall,
}

impl Quantifier {
    /// The QDIMACS line letter: `e` or `a`.
    #[must_use]
    pub const fn letter(self) -> char {
        match self {
            Self::Exists => 'e',
            Self::Forall => 'a',
        }
    }

    /// The other quantifier.
    #[must_use]
    pub const fn flipped(self) -> Self {
        match self {
            Self::Exists => Self::Forall,
            Self::Forall => Self::Exists,
        }
    }
}

impl fmt::Display for Quantifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exists => write!(f, "∃"),
            Self::Forall => write!(f, "∀"),
        }
    }
}

/// A run of variables bound by one quantifier at one nesting level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuantifierBlock {
    /// The quantifier binding every variable of the block.
    pub quantifier: Quantifier,
    /// The variables in declaration order. Never empty.
    pub variables: Vec<Variable>,
}

impl fmt::Display for QuantifierBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}",
            self.quantifier,
            self.variables.iter().map(|v| format!("x{v}")).join(", ")
        )
    }
}

/// An ordered sequence of quantifier blocks with derived variable indices.
///
/// Blocks are appended outermost first. Consecutive blocks of the same
/// quantifier are accepted. A variable belongs to exactly one block; the
/// index maps are total on every bound variable and agree with the block
/// sequence by construction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Prefix {
    blocks: Vec<QuantifierBlock>,
    var_quantifier: FxHashMap<Variable, Quantifier>,
    var_block: FxHashMap<Variable, usize>,
}

impl Prefix {
    /// Creates an empty prefix.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a quantifier block and updates the derived indices.
    pub fn push_block(&mut self, quantifier: Quantifier, variables: Vec<Variable>) {
        let block_index = self.blocks.len();
        for &var in &variables {
            self.var_quantifier.insert(var, quantifier);
            self.var_block.insert(var, block_index);
        }
        self.blocks.push(QuantifierBlock {
            quantifier,
            variables,
        });
    }

    /// The number of blocks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Whether the prefix has no blocks.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Returns an iterator over the blocks, outermost first.
    pub fn iter(&self) -> impl Iterator<Item = &QuantifierBlock> {
        self.blocks.iter()
    }

    /// The block at `index` (0 = outermost).
    #[must_use]
    pub fn block(&self, index: usize) -> &QuantifierBlock {
        &self.blocks[index]
    }

    /// Whether `var` is bound by some block.
    #[must_use]
    pub fn binds(&self, var: Variable) -> bool {
        self.var_block.contains_key(&var)
    }

    /// The quantifier binding `var`.
    ///
    /// # Panics
    ///
    /// Panics if `var` is not bound by the prefix. Every variable of the
    /// matrix is bound; the reader enforces this on input.
    #[must_use]
    pub fn quantifier(&self, var: Variable) -> Quantifier {
        self.var_quantifier[&var]
    }

    /// The 0-based block position of `var`.
    ///
    /// # Panics
    ///
    /// Panics if `var` is not bound by the prefix.
    #[must_use]
    pub fn block_index(&self, var: Variable) -> usize {
        self.var_block[&var]
    }

    /// The total number of bound variables.
    #[must_use]
    pub fn num_variables(&self) -> usize {
        self.var_block.len()
    }
}

impl fmt::Display for Prefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.blocks.iter().join(" "))
    }
}
