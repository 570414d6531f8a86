#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![warn(missing_docs)]
//! This crate decides the truth value of quantified boolean formulas
//! (QBF) given in prenex conjunctive normal form.
//!
//! The core is a QBF-aware preprocessor (dependency-respecting unit
//! propagation and pure-literal elimination), a recursive DPLL search
//! engine over the quantifier game tree, and a random generator for
//! structured benchmark instances. Formulas are read and written in the
//! QDIMACS format.

/// The `qbf` module implements the QBF solver core: formula
/// representation, preprocessing, search, QDIMACS I/O, and the random
/// instance generator.
pub mod qbf;
