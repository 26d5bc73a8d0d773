//! Maximum and minimum weight perfect matchings on complete bipartite graphs.
//!
//! The core is [`LawlerMatcher`], Kuhn's primal-dual method as refined by
//! Lawler, running in O(n³). [`ExhaustiveMatcher`] enumerates permutations
//! and exists as an exact oracle for small instances. Both sit behind the
//! [`Matcher`] capability and are selected through [`MatcherKind`].
pub mod matching;

pub use matching::*;

// ============================================================================
// TYPE ALIASES
// ============================================================================
/// Edge weights, dual variables, slacks, and matching totals.
pub type Weight = f64;

// ============================================================================
// TRAITS
// ============================================================================
/// Random instance generation for testing and benchmarking.
pub trait Arbitrary {
    /// Generate a uniformly random instance.
    fn random() -> Self;
}

// ============================================================================
// SOLVER PARAMETERS
// ============================================================================
/// Margin added below the smallest finite weight so every working weight is
/// at least this large. Lawler's method requires strictly positive weights.
pub const WEIGHT_MARGIN: Weight = 1.0;
/// Relative tolerance for the dual feasibility and strong duality certificate.
pub const OPTIMALITY_TOLERANCE: Weight = 1e-9;
/// Largest problem the exhaustive oracle will enumerate (10! permutations).
pub const EXHAUSTIVE_LIMIT: usize = 10;

// ============================================================================
// RUNTIME UTILITIES
// ============================================================================
/// Initialize logging to the terminal, and optionally to a timestamped file.
/// Terminal gets INFO, the file under `logs/` gets DEBUG.
#[cfg(feature = "cli")]
pub fn log(file: bool) -> anyhow::Result<()> {
    use anyhow::Context;
    let config = simplelog::ConfigBuilder::new()
        .set_location_level(log::LevelFilter::Off)
        .set_target_level(log::LevelFilter::Off)
        .set_thread_level(log::LevelFilter::Off)
        .build();
    let mut loggers: Vec<Box<dyn simplelog::SharedLogger>> = vec![simplelog::TermLogger::new(
        log::LevelFilter::Info,
        config.clone(),
        simplelog::TerminalMode::Stderr,
        simplelog::ColorChoice::Auto,
    )];
    if file {
        std::fs::create_dir_all("logs").context("create logs directory")?;
        let time = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .context("time moves slow")?
            .as_secs();
        let path = format!("logs/{}.log", time);
        loggers.push(simplelog::WriteLogger::new(
            log::LevelFilter::Debug,
            config,
            std::fs::File::create(&path).with_context(|| format!("create {}", path))?,
        ));
    }
    simplelog::CombinedLogger::init(loggers).context("initialize logger")
}
