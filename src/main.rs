//! Launcher and benchmarker: loads a Matrix Market file and times
//! `y = A·x` with `x = 1` over the `(+, ×)` semiring.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::{Duration, Instant};

use clap::error::ErrorKind;
use clap::Parser;
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

use grb::parser::{Indexing, MatrixMarket};
use grb::{execute, mxv, plus_times, set_scalar, Descriptor, GrbError, IoMode, Vector, NO_MASK};

const EXIT_ARGS: u8 = 1;
const EXIT_PARSE: u8 = 2;
const EXIT_MISMATCH: u8 = 3;
const EXIT_BUILD: u8 = 4;
const EXIT_EXEC: u8 = 5;
const EXIT_VERIFY: u8 = 6;

/// Relative tolerance when comparing against a truth file.
const TOLERANCE: f64 = 1e-6;

#[derive(Parser, Debug)]
#[command(name = "grb")]
#[command(about = "Sparse matrix-vector multiplication benchmark", long_about = None)]
struct Cli {
    /// Matrix Market file to load
    dataset: PathBuf,

    /// Whether file indices are used as is or renumbered
    indexing: Indexing,

    /// Repetitions timed together
    #[arg(default_value_t = 1)]
    inner_iters: usize,

    /// Number of timed batches
    #[arg(default_value_t = 1)]
    outer_iters: usize,

    /// The literal `verification`, followed by the truth file
    verification: Option<String>,

    /// One expected value of `y` per line
    truth: Option<PathBuf>,
}

impl Cli {
    fn truth_file(&self) -> Result<Option<&Path>, String> {
        match (self.verification.as_deref(), self.truth.as_deref()) {
            (None, _) => Ok(None),
            (Some("verification"), Some(path)) => Ok(Some(path)),
            (Some("verification"), None) => Err("`verification` needs a truth file".into()),
            (Some(other), _) => Err(format!("expected `verification`, got `{}`", other)),
        }
    }
}

struct Timing {
    best: Duration,
    mean: Duration,
}

fn exit_for(err: &GrbError) -> u8 {
    match err {
        GrbError::Mismatch(_) => EXIT_MISMATCH,
        _ => EXIT_EXEC,
    }
}

fn read_truth(path: &Path) -> Result<Vec<f64>, String> {
    let text = fs::read_to_string(path).map_err(|e| format!("{}: {}", path.display(), e))?;
    text.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(|l| l.parse::<f64>().map_err(|_| format!("invalid value `{}`", l)))
        .collect()
}

fn verify(y: &Vector<f64>, truth: &[f64]) -> Result<(), String> {
    for (i, &expected) in truth.iter().enumerate() {
        let got = y.get(i).unwrap_or(0.0);
        let scale = expected.abs().max(f64::MIN_POSITIVE);
        if (got - expected).abs() / scale > TOLERANCE && (got - expected).abs() > TOLERANCE {
            return Err(format!("y[{}] = {} but expected {}", i, got, expected));
        }
    }
    Ok(())
}

fn run(cli: &Cli) -> Result<(), u8> {
    let truth_path = cli.truth_file().map_err(|msg| {
        error!("{}", msg);
        EXIT_ARGS
    })?;
    if cli.inner_iters == 0 || cli.outer_iters == 0 {
        error!("iteration counts must be positive");
        return Err(EXIT_ARGS);
    }

    let parsed = MatrixMarket::from_path(&cli.dataset, cli.indexing).map_err(|e| {
        error!(dataset = %cli.dataset.display(), "{}", e);
        EXIT_PARSE
    })?;
    let truth = match truth_path {
        Some(path) => {
            let values = read_truth(path).map_err(|msg| {
                error!("{}", msg);
                EXIT_PARSE
            })?;
            if values.len() != parsed.m() {
                error!(expected = parsed.m(), got = values.len(), "truth file has the wrong length");
                return Err(EXIT_MISMATCH);
            }
            Some(values)
        }
        None => None,
    };

    let a = parsed.build(IoMode::Parallel).map_err(|e| {
        error!("cannot build matrix: {}", e);
        EXIT_BUILD
    })?;
    info!(m = a.nrows(), n = a.ncols(), nnz = a.nnz(), "matrix ready");

    let ring = plus_times::<f64>();
    let mut x = Vector::<f64>::new(a.ncols());
    let mut y = Vector::<f64>::new(a.nrows());
    let exec_err = |e: GrbError| {
        error!(kind = e.kind_name(), "{}", e);
        exit_for(&e)
    };
    execute(|p| set_scalar(&mut x, NO_MASK, 1.0, Descriptor::NO_OPERATION, p)).map_err(exec_err)?;

    let mut batches = Vec::with_capacity(cli.outer_iters);
    for outer in 0..cli.outer_iters {
        let start = Instant::now();
        for _ in 0..cli.inner_iters {
            execute(|p| mxv(&mut y, NO_MASK, &a, &x, &ring, Descriptor::NO_OPERATION, p))
                .map_err(exec_err)?;
        }
        let per_call = start.elapsed() / cli.inner_iters as u32;
        debug!(outer, ?per_call, "batch done");
        batches.push(per_call);
    }
    let timing = Timing {
        best: batches.iter().copied().min().unwrap_or_default(),
        mean: batches.iter().sum::<Duration>() / batches.len() as u32,
    };
    println!(
        "{}: {}x{} with {} nonzeros, y has {} nonzeros",
        cli.dataset.display(),
        a.nrows(),
        a.ncols(),
        a.nnz(),
        y.nnz()
    );
    println!(
        "mxv over {} x {} runs: best {:?}, mean {:?} per call",
        cli.outer_iters, cli.inner_iters, timing.best, timing.mean
    );

    if let Some(truth) = truth {
        verify(&y, &truth).map_err(|msg| {
            error!("verification failed: {}", msg);
            EXIT_VERIFY
        })?;
        println!("verification passed");
    }
    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => e.exit(),
        Err(e) => {
            let _ = e.print();
            return ExitCode::from(EXIT_ARGS);
        }
    };
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(code) => ExitCode::from(code),
    }
}
