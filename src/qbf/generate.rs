#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Random generation of structured QBF instances.
//!
//! Implements the block model of Chen and Interian ("A Model for
//! Generating Random Quantified Boolean Formulas", IJCAI 2005): the
//! prefix is a sequence of blocks of prescribed size with the innermost
//! block existential and quantifiers alternating outward, and every
//! clause draws a fixed number of distinct variables from each block,
//! each negated with probability one half.
//!
//! Generated clauses are kept globally unique through a chained hash
//! table with a position-sensitive polynomial hash. A configurable run of
//! consecutive duplicates aborts generation, yielding the clauses
//! produced so far.

use crate::qbf::literal::Variable;
use crate::qbf::prefix::{Quantifier, QuantifierBlock};
use log::{debug, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;

/// Default bound on consecutive duplicate-clause regenerations.
pub const DEFAULT_DUP_LIMIT: u32 = 100;

/// Primes for hashing clauses.
const PRIMES: [u32; 6] = [1_000_003, 1_000_033, 1_000_037, 1_000_039, 1_000_081, 1_000_099];

/// The model parameters of a generation run.
#[derive(Debug, Clone)]
pub struct Params {
    /// The number of quantifier blocks, outermost first.
    pub num_blocks: usize,
    /// The number of clauses to generate.
    pub num_clauses: usize,
    /// The variable count of each block, outermost first.
    pub block_sizes: Vec<u32>,
    /// How many literals every clause draws from each block, outermost
    /// first. Each entry must lie in `1..=block_sizes[i]`.
    pub block_literals: Vec<u32>,
    /// Seed for the random generator.
    pub seed: u64,
    /// Bound on consecutive duplicate-clause regenerations before the run
    /// is cut short.
    pub dup_limit: u32,
    /// Sort the literals of every clause by variable identifier.
    pub sort_clauses: bool,
}

impl Default for Params {
    /// The default model: 100 clauses over two blocks `∀10 ∃60`, one
    /// universal and two existential literals per clause.
    fn default() -> Self {
        Self {
            num_blocks: 2,
            num_clauses: 100,
            block_sizes: vec![10, 60],
            block_literals: vec![1, 2],
            seed: default_seed(),
            dup_limit: DEFAULT_DUP_LIMIT,
            sort_clauses: false,
        }
    }
}

/// The seed used when none is given: wall-clock seconds times the
/// process id.
#[must_use]
pub fn default_seed() -> u64 {
    let secs = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(1);
    secs.wrapping_mul(u64::from(std::process::id()))
}

/// Rejected model parameters.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParamError {
    /// Fewer than one block.
    #[error("at least one quantifier block is required")]
    NoBlocks,
    /// Fewer than one clause.
    #[error("at least one clause is required")]
    NoClauses,
    /// The number of block sizes does not match the block count.
    #[error("expected {expected} block sizes, got {got}")]
    BlockSizeCount {
        /// The block count.
        expected: usize,
        /// The number of sizes given.
        got: usize,
    },
    /// The number of per-block literal counts does not match the block
    /// count.
    #[error("expected {expected} per-block literal counts, got {got}")]
    BlockLiteralCount {
        /// The block count.
        expected: usize,
        /// The number of counts given.
        got: usize,
    },
    /// A block of size zero.
    #[error("block {index}: size must be at least 1")]
    EmptyBlock {
        /// 0-based block index, outermost first.
        index: usize,
    },
    /// A per-block literal count outside `1..=size`.
    #[error("block {index}: {literals} literals per clause outside 1..={size}")]
    LiteralCountOutOfRange {
        /// 0-based block index, outermost first.
        index: usize,
        /// The offending literal count.
        literals: u32,
        /// The block size.
        size: u32,
    },
}

impl Params {
    /// Checks the parameters against the model's constraints.
    ///
    /// # Errors
    ///
    /// Returns the first violated constraint.
    pub fn validate(&self) -> Result<(), ParamError> {
        if self.num_blocks == 0 {
            return Err(ParamError::NoBlocks);
        }
        if self.num_clauses == 0 {
            return Err(ParamError::NoClauses);
        }
        if self.block_sizes.len() != self.num_blocks {
            return Err(ParamError::BlockSizeCount {
                expected: self.num_blocks,
                got: self.block_sizes.len(),
            });
        }
        if self.block_literals.len() != self.num_blocks {
            return Err(ParamError::BlockLiteralCount {
                expected: self.num_blocks,
                got: self.block_literals.len(),
            });
        }
        for (index, (&size, &literals)) in self
            .block_sizes
            .iter()
            .zip(&self.block_literals)
            .enumerate()
        {
            if size == 0 {
                return Err(ParamError::EmptyBlock { index });
            }
            if literals == 0 || literals > size {
                return Err(ParamError::LiteralCountOutOfRange {
                    index,
                    literals,
                    size,
                });
            }
        }
        Ok(())
    }

    /// The total variable count, `Σ block_sizes`.
    #[must_use]
    pub fn num_vars(&self) -> u32 {
        self.block_sizes.iter().sum()
    }

    /// The length of every generated clause, `Σ block_literals`.
    #[must_use]
    pub fn clause_len(&self) -> u32 {
        self.block_literals.iter().sum()
    }
}

/// A generated instance: prefix blocks, clauses in generation order, and
/// the configuration echo for the QDIMACS header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instance {
    /// The total variable count.
    pub num_vars: u32,
    /// The quantifier blocks, outermost first.
    pub blocks: Vec<QuantifierBlock>,
    /// The clauses as signed variable identifiers.
    pub clauses: Vec<Vec<i32>>,
    /// Header comment lines (without the leading `c `).
    pub comments: Vec<String>,
}

impl Instance {
    /// Serialises the instance as QDIMACS text.
    #[must_use]
    pub fn to_qdimacs(&self) -> String {
        let mut out = Vec::new();
        crate::qbf::qdimacs::write_qdimacs(&mut out, self)
            .expect("writing to a Vec cannot fail");
        String::from_utf8(out).expect("QDIMACS output is ASCII")
    }
}

/// Generates random instances for one fixed parameter set.
#[derive(Debug)]
pub struct Generator {
    params: Params,
    rng: StdRng,
    /// Smallest variable id of each block.
    min_ids: Vec<u32>,
    /// Largest variable id of each block.
    max_ids: Vec<u32>,
}

impl Generator {
    /// Validates the parameters and sets up the variable layout: block `i`
    /// owns the contiguous identifier range following block `i - 1`,
    /// starting at 1.
    ///
    /// # Errors
    ///
    /// Returns a [`ParamError`] for invalid parameters.
    pub fn new(params: Params) -> Result<Self, ParamError> {
        params.validate()?;

        let mut min_ids = Vec::with_capacity(params.num_blocks);
        let mut max_ids = Vec::with_capacity(params.num_blocks);
        let mut next_id = 1;
        for &size in &params.block_sizes {
            min_ids.push(next_id);
            max_ids.push(next_id + size - 1);
            next_id += size;
        }

        let rng = StdRng::seed_from_u64(params.seed);
        Ok(Self {
            params,
            rng,
            min_ids,
            max_ids,
        })
    }

    /// Generates an instance. The clause count falls short of the request
    /// only when `dup_limit` consecutive duplicates force an early stop.
    pub fn generate(&mut self) -> Instance {
        let num_clauses = self.params.num_clauses;
        let mut table = ClauseTable::new(num_clauses);
        let mut clauses: Vec<Vec<i32>> = Vec::with_capacity(num_clauses);
        let mut dup_tries = 0;

        while clauses.len() < num_clauses {
            let clause = self.random_clause();
            debug!("generated clause: {clause:?}");

            if table.insert(&clause) {
                clauses.push(clause);
                dup_tries = 0;
            } else {
                if dup_tries == self.params.dup_limit {
                    warn!("aborting after {dup_tries} tries to resolve a duplicate clause");
                    break;
                }
                debug!("skipping duplicate clause ({dup_tries} tries)");
                dup_tries += 1;
            }
        }

        Instance {
            num_vars: self.params.num_vars(),
            blocks: self.blocks(),
            clauses,
            comments: self.config_comments(),
        }
    }

    /// One random clause: from each block, the prescribed number of
    /// distinct variables (redrawing on in-clause collision), each negated
    /// with probability one half.
    fn random_clause(&mut self) -> Vec<i32> {
        let mut marks = vec![false; self.params.num_vars() as usize];
        let mut literals = Vec::with_capacity(self.params.clause_len() as usize);

        for block in 0..self.params.num_blocks {
            let mut drawn = 0;
            while drawn < self.params.block_literals[block] {
                let var = self
                    .rng
                    .gen_range(self.min_ids[block]..=self.max_ids[block]);
                if marks[(var - 1) as usize] {
                    continue;
                }
                marks[(var - 1) as usize] = true;

                #[allow(clippy::cast_possible_wrap)]
                let mut lit = var as i32;
                if self.rng.gen_bool(0.5) {
                    lit = -lit;
                }
                literals.push(lit);
                drawn += 1;
            }
        }

        if self.params.sort_clauses {
            literals.sort_by_key(|l| l.unsigned_abs());
        }
        literals
    }

    /// The prefix blocks: the innermost block is existential and
    /// quantifiers alternate outward, so the outermost block is
    /// existential exactly when the block count is odd.
    fn blocks(&self) -> Vec<QuantifierBlock> {
        let mut quantifier = if self.params.num_blocks % 2 == 1 {
            Quantifier::Exists
        } else {
            Quantifier::Forall
        };

        let mut blocks = Vec::with_capacity(self.params.num_blocks);
        for i in 0..self.params.num_blocks {
            let variables: Vec<Variable> = (self.min_ids[i]..=self.max_ids[i]).collect();
            blocks.push(QuantifierBlock {
                quantifier,
                variables,
            });
            quantifier = quantifier.flipped();
        }
        blocks
    }

    /// The configuration echo written as header comments.
    fn config_comments(&self) -> Vec<String> {
        let p = &self.params;
        let mut comments = vec![
            format!("seed = {}", p.seed),
            format!(
                "sort clauses = {}",
                if p.sort_clauses { "yes" } else { "no" }
            ),
            format!("dup. resolve limit = {}", p.dup_limit),
            format!("num blocks = {}", p.num_blocks),
            format!("num clauses = {}", p.num_clauses),
        ];
        for (i, size) in p.block_sizes.iter().enumerate() {
            comments.push(format!("block_sizes[{i}] = {size}"));
        }
        comments.push(format!("num vars = {}", p.num_vars()));
        for (i, literals) in p.block_literals.iter().enumerate() {
            comments.push(format!("perblock_nums[{i}] = {literals}"));
        }
        comments.push(format!("clause len = {}", p.clause_len()));
        comments
    }
}

/// A chained hash table of generated clauses.
///
/// The hash is position-sensitive: every literal value is multiplied by a
/// prime drawn from a small rotating table, so permuted clauses hash
/// differently. Bucket collisions fall back to a full literal-sequence
/// comparison.
#[derive(Debug)]
struct ClauseTable {
    buckets: Vec<Vec<Vec<i32>>>,
}

impl ClauseTable {
    fn new(num_buckets: usize) -> Self {
        Self {
            buckets: vec![Vec::new(); num_buckets],
        }
    }

    #[allow(clippy::cast_sign_loss)]
    fn hash(literals: &[i32]) -> u32 {
        let mut result = 0u32;
        for (lit, prime) in literals.iter().zip(PRIMES.iter().cycle()) {
            result = result.wrapping_add((*lit as u32).wrapping_mul(*prime));
        }
        result
    }

    /// Inserts the clause unless an identical literal sequence is already
    /// present. Returns whether the clause was inserted.
    fn insert(&mut self, literals: &[i32]) -> bool {
        let bucket = (Self::hash(literals) as usize) % self.buckets.len();
        if self.buckets[bucket].iter().any(|c| c == literals) {
            return false;
        }
        self.buckets[bucket].push(literals.to_vec());
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(seed: u64) -> Params {
        Params {
            num_blocks: 3,
            num_clauses: 20,
            block_sizes: vec![2, 3, 4],
            block_literals: vec![1, 2, 2],
            seed,
            dup_limit: DEFAULT_DUP_LIMIT,
            sort_clauses: false,
        }
    }

    #[test]
    fn test_validation() {
        assert!(Params::default().validate().is_ok());

        let mut p = params(1);
        p.block_sizes = vec![2, 3];
        assert_eq!(
            p.validate(),
            Err(ParamError::BlockSizeCount {
                expected: 3,
                got: 2
            })
        );

        let mut p = params(1);
        p.block_literals = vec![1, 2, 5];
        assert_eq!(
            p.validate(),
            Err(ParamError::LiteralCountOutOfRange {
                index: 2,
                literals: 5,
                size: 4
            })
        );
    }

    #[test]
    fn test_variable_layout_and_quantifier_pattern() {
        let mut generator = Generator::new(params(7)).unwrap();
        let instance = generator.generate();

        assert_eq!(instance.num_vars, 9);
        assert_eq!(instance.blocks.len(), 3);
        assert_eq!(instance.blocks[0].variables, vec![1, 2]);
        assert_eq!(instance.blocks[1].variables, vec![3, 4, 5]);
        assert_eq!(instance.blocks[2].variables, vec![6, 7, 8, 9]);

        // three blocks: e a e, innermost existential
        assert_eq!(instance.blocks[0].quantifier, Quantifier::Exists);
        assert_eq!(instance.blocks[1].quantifier, Quantifier::Forall);
        assert_eq!(instance.blocks[2].quantifier, Quantifier::Exists);
    }

    #[test]
    fn test_per_block_contribution_and_distinctness() {
        let mut generator = Generator::new(params(11)).unwrap();
        let instance = generator.generate();

        for clause in &instance.clauses {
            assert_eq!(clause.len(), 5);

            let vars: Vec<u32> = clause.iter().map(|l| l.unsigned_abs()).collect();
            let mut unique = vars.clone();
            unique.sort_unstable();
            unique.dedup();
            assert_eq!(unique.len(), vars.len(), "variables repeat in {clause:?}");

            assert_eq!(vars.iter().filter(|&&v| (1..=2).contains(&v)).count(), 1);
            assert_eq!(vars.iter().filter(|&&v| (3..=5).contains(&v)).count(), 2);
            assert_eq!(vars.iter().filter(|&&v| (6..=9).contains(&v)).count(), 2);
        }
    }

    #[test]
    fn test_seed_determinism() {
        let first = Generator::new(params(42)).unwrap().generate();
        let second = Generator::new(params(42)).unwrap().generate();
        assert_eq!(first, second);

        let third = Generator::new(params(43)).unwrap().generate();
        assert_ne!(first.clauses, third.clauses);
    }

    #[test]
    fn test_clauses_are_unique() {
        let mut generator = Generator::new(params(5)).unwrap();
        let instance = generator.generate();

        let mut seen = instance.clauses.clone();
        seen.sort_unstable();
        seen.dedup();
        assert_eq!(seen.len(), instance.clauses.len());
    }

    #[test]
    fn test_duplicate_exhaustion_truncates() {
        // one block of one variable: only two distinct clauses exist
        let p = Params {
            num_blocks: 1,
            num_clauses: 10,
            block_sizes: vec![1],
            block_literals: vec![1],
            seed: 3,
            dup_limit: 5,
            sort_clauses: false,
        };
        let instance = Generator::new(p).unwrap().generate();
        assert!(instance.clauses.len() <= 2);
        assert!(!instance.clauses.is_empty());
    }

    #[test]
    fn test_sorted_clauses() {
        let p = Params {
            sort_clauses: true,
            seed: 9,
            ..params(9)
        };
        let mut generator = Generator::new(p).unwrap();
        let instance = generator.generate();

        for clause in &instance.clauses {
            let vars: Vec<u32> = clause.iter().map(|l| l.unsigned_abs()).collect();
            assert!(vars.windows(2).all(|w| w[0] < w[1]));
        }
    }

    #[test]
    fn test_qdimacs_output_shape() {
        let mut generator = Generator::new(params(13)).unwrap();
        let text = generator.generate().to_qdimacs();

        assert!(text.contains("c seed = 13"));
        assert!(text.contains("p cnf 9 20"));
        assert!(text.contains("e 1 2 0"));
        assert!(text.contains("a 3 4 5 0"));
        assert!(text.contains("e 6 7 8 9 0"));
        // clause lines close the file, each zero-terminated
        assert!(text.trim_end().lines().last().unwrap().ends_with(" 0"));
    }
}
