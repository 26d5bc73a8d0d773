use super::*;
use crate::Weight;
use serde::Deserialize;
use serde::Serialize;

/// A solver for perfect matchings on a complete bipartite graph.
///
/// A matcher is built for one fixed problem size `n` and reused across
/// solves. Each call to [`compute_max`](Matcher::compute_max) or
/// [`compute_min`](Matcher::compute_min) starts from scratch and either
/// leaves a perfect matching behind or fails with nothing behind.
///
/// # Result Contract
///
/// After a successful solve, [`matching_source`](Matcher::matching_source)
/// and [`matching_dest`](Matcher::matching_dest) are mutually inverse
/// permutations of `0..n`. Before any solve, or after a failed one, both are
/// empty and [`matching_weight`](Matcher::matching_weight) is zero.
pub trait Matcher {
    /// Problem size this matcher was built for.
    fn n(&self) -> usize;
    /// Finds a perfect matching of maximum total weight.
    fn compute_max(&mut self, weights: &Weights) -> Result<(), MatchingError>;
    /// Finds a perfect matching of minimum total weight.
    fn compute_min(&mut self, weights: &Weights) -> Result<(), MatchingError>;
    /// `source[i] = j` when S-node `i` is matched to T-node `j`.
    fn matching_source(&self) -> &[usize];
    /// `dest[j] = i` when S-node `i` is matched to T-node `j`.
    fn matching_dest(&self) -> &[usize];
    /// Total weight of the matching under the most recent solve.
    fn matching_weight(&self) -> Weight;

    /// Owned snapshot of the current result.
    fn assignment(&self) -> Assignment {
        Assignment {
            source: self.matching_source().to_vec(),
            dest: self.matching_dest().to_vec(),
            weight: self.matching_weight(),
        }
    }
}

/// Detached copy of a matcher's result, safe to hold across further solves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assignment {
    pub source: Vec<usize>,
    pub dest: Vec<usize>,
    pub weight: Weight,
}

impl Assignment {
    /// Matched `(i, j)` pairs in S order.
    pub fn pairs(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.source.iter().copied().enumerate()
    }
}

impl std::fmt::Display for Assignment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, j) in self.pairs() {
            writeln!(f, "{} {}", i, j)?;
        }
        write!(f, "weight: {}", self.weight)
    }
}

/// Checks that `source` and `dest` are mutually inverse permutations of `0..n`.
pub(crate) fn is_permutation(source: &[usize], dest: &[usize]) -> bool {
    source.len() == dest.len()
        && source
            .iter()
            .enumerate()
            .all(|(i, &j)| dest.get(j).is_some_and(|&back| back == i))
}

/// Direction of optimization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Sense {
    #[default]
    Max,
    Min,
}

impl Sense {
    /// Multiplier that turns this sense into maximization.
    pub const fn sign(&self) -> Weight {
        match self {
            Self::Max => 1.,
            Self::Min => -1.,
        }
    }
}

impl std::fmt::Display for Sense {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Max => write!(f, "max"),
            Self::Min => write!(f, "min"),
        }
    }
}
