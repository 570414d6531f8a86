#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! The generator command line: emits a random prenex QBF instance in
//! QDIMACS format on standard output.
//!
//! `--bs` and `--bc` are incremental: the Nth occurrence refers to the
//! Nth block, outermost first, and each must occur exactly once per
//! block.

use clap::Parser;
use qbf_solver::qbf::generate::{self, Generator, Params};
use qbf_solver::qbf::qdimacs::write_qdimacs;
use std::io::{self, Write};
use std::process::ExitCode;

/// Generate random prenex QBF instances in QDIMACS format.
#[derive(Parser, Debug)]
#[command(name = "qbfgen", version, about)]
struct Cli {
    /// Number of clauses.
    #[arg(short = 'c', long = "clauses", value_name = "N", default_value_t = 100)]
    clauses: usize,

    /// Number of quantifier blocks (the innermost block is always
    /// existential).
    #[arg(short = 'b', long = "blocks", value_name = "N", default_value_t = 2)]
    blocks: usize,

    /// Size of each block, outermost first; repeat once per block.
    #[arg(long = "bs", value_name = "N", default_values_t = [10u32, 60])]
    block_sizes: Vec<u32>,

    /// Literals each clause draws from each block, outermost first;
    /// repeat once per block.
    #[arg(long = "bc", value_name = "N", default_values_t = [1u32, 2])]
    block_literals: Vec<u32>,

    /// Random seed (default: wall-clock seconds times process id).
    #[arg(short = 's', long, value_name = "N")]
    seed: Option<u64>,

    /// Limit of consecutive retries before giving up on duplicate
    /// clauses.
    #[arg(short = 'd', long = "dup-limit", value_name = "N", default_value_t = generate::DEFAULT_DUP_LIMIT)]
    dup_limit: u32,

    /// Sort the literals of each clause by variable identifier.
    #[arg(long)]
    sort: bool,

    /// Increase log verbosity by each '-v'.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let params = Params {
        num_blocks: cli.blocks,
        num_clauses: cli.clauses,
        block_sizes: cli.block_sizes,
        block_literals: cli.block_literals,
        seed: cli.seed.unwrap_or_else(generate::default_seed),
        dup_limit: cli.dup_limit,
        sort_clauses: cli.sort,
    };

    let mut generator = match Generator::new(params) {
        Ok(generator) => generator,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };

    let instance = generator.generate();

    let stdout = io::stdout();
    let mut out = stdout.lock();
    if let Err(e) = write_qdimacs(&mut out, &instance).and_then(|()| out.flush()) {
        eprintln!("error: {e}");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
