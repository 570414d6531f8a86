#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! The solver command line: reads a QDIMACS file, preprocesses it, and
//! runs the game-tree search when preprocessing alone cannot decide.
//! Exit status 0 means SAT; 1 means UNSAT or a usage/IO failure.

use clap::Parser;
use log::info;
use qbf_solver::qbf::preprocess::Verdict;
use qbf_solver::qbf::qdimacs::{self, ParseError};
use qbf_solver::qbf::search::Search;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

/// A QBF solver for prenex-CNF formulas in QDIMACS format.
#[derive(Parser, Debug)]
#[command(name = "qbf_solver", version, about)]
struct Cli {
    /// Path to the QDIMACS input file.
    path: PathBuf,

    /// Increase log verbosity by each '-v'.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

fn run(cli: &Cli) -> Result<Verdict, ParseError> {
    let start = Instant::now();
    let mut preprocessor = qdimacs::parse_file(&cli.path)?;
    info!(
        "parsed {} in {:?}: {} blocks, {} variables, {} clauses",
        cli.path.display(),
        start.elapsed(),
        preprocessor.prefix().len(),
        preprocessor.prefix().num_variables(),
        preprocessor.matrix().len()
    );

    let start = Instant::now();
    let verdict = preprocessor.preprocess();
    info!(
        "preprocessing finished in {:?}: {:?}, {} assignments, {} clauses left",
        start.elapsed(),
        verdict,
        preprocessor.assignment().len(),
        preprocessor.matrix().len()
    );

    if verdict != Verdict::Unknown {
        return Ok(verdict);
    }

    let start = Instant::now();
    let mut search = Search::new(preprocessor.snapshot());
    let verdict = search.solve();
    info!(
        "search finished in {:?}: {:?} after {} decisions",
        start.elapsed(),
        verdict,
        search.decisions()
    );
    Ok(verdict)
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(&cli) {
        Ok(Verdict::Sat) => {
            println!("SATISFIABLE");
            ExitCode::SUCCESS
        }
        Ok(_) => {
            println!("UNSATISFIABLE");
            ExitCode::FAILURE
        }
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
