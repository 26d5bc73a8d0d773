//! Solve Binary
//!
//! Reads weight matrices and prints an optimal perfect matching for each.
//! Several files are solved in parallel, one matcher per file.
//!
//! Options: --kind, --min, --json, --one-based, --certify, --log-file

use anyhow::Context;
use clap::Parser;
use lawler::*;
use rayon::prelude::*;
use std::io::Read;

#[derive(Parser, Debug)]
#[command(author, version, about = "Maximum or minimum weight perfect matching", long_about = None)]
struct Args {
    /// Weight matrix files: `n`, then `n` rows of `n` weights. `-` reads stdin.
    #[arg(default_value = "-")]
    paths: Vec<String>,
    /// Matcher implementation, `lawler` or `exhaustive`.
    #[arg(long, default_value_t = MatcherKind::Lawler)]
    kind: MatcherKind,
    /// Minimize total weight instead of maximizing it.
    #[arg(long)]
    min: bool,
    /// Print each assignment as JSON.
    #[arg(long)]
    json: bool,
    /// Number nodes from 1 in plain output.
    #[arg(long)]
    one_based: bool,
    /// Check the dual certificate of every solve.
    #[arg(long)]
    certify: bool,
    /// Also write a debug log under `logs/`.
    #[arg(long)]
    log_file: bool,
}

impl Args {
    fn sense(&self) -> Sense {
        match self.min {
            true => Sense::Min,
            false => Sense::Max,
        }
    }

    fn solve(&self, path: &str) -> anyhow::Result<String> {
        let weights = read(path)?
            .parse::<Weights>()
            .with_context(|| format!("parse {}", path))?;
        let mut engine = self.kind.build(weights.n());
        match self.sense() {
            Sense::Max => engine.compute_max(&weights),
            Sense::Min => engine.compute_min(&weights),
        }
        .with_context(|| format!("solve {}", path))?;
        if self.certify {
            if let Some(certificate) = engine.certify() {
                certificate.with_context(|| format!("certify {}", path))?;
            }
        }
        let assignment = engine.assignment();
        log::info!(
            "{}: {}x{} {} {} matching, weight {}",
            path,
            weights.n(),
            weights.n(),
            self.kind,
            self.sense(),
            assignment.weight
        );
        match self.json {
            true => Ok(serde_json::to_string(&assignment)?),
            false => Ok(self.plain(&assignment)),
        }
    }

    fn plain(&self, assignment: &Assignment) -> String {
        let base = self.one_based as usize;
        assignment
            .pairs()
            .map(|(i, j)| format!("{} {}\n", i + base, j + base))
            .chain(std::iter::once(format!("weight: {}", assignment.weight)))
            .collect()
    }
}

fn read(path: &str) -> anyhow::Result<String> {
    let mut text = String::new();
    match path {
        "-" => std::io::stdin()
            .read_to_string(&mut text)
            .context("read stdin")?,
        _ => std::fs::File::open(path)
            .and_then(|mut f| f.read_to_string(&mut text))
            .with_context(|| format!("read {}", path))?,
    };
    Ok(text)
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    lawler::log(args.log_file)?;
    let results = args
        .paths
        .par_iter()
        .map(|path| (path, args.solve(path)))
        .collect::<Vec<_>>();
    let mut failures = 0;
    for (path, result) in results {
        match result {
            Ok(output) => {
                if args.paths.len() > 1 {
                    println!("# {}", path);
                }
                println!("{}", output);
            }
            Err(e) => {
                failures += 1;
                log::error!("{:#}", e);
            }
        }
    }
    anyhow::ensure!(
        failures == 0,
        "{} of {} problems failed",
        failures,
        args.paths.len()
    );
    Ok(())
}
