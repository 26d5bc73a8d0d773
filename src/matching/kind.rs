use super::*;
use crate::Weight;

/// Which matcher implementation to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatcherKind {
    /// Kuhn-Lawler primal-dual method, O(n³).
    #[default]
    Lawler,
    /// Brute-force enumeration, small problems only.
    Exhaustive,
}

impl MatcherKind {
    /// Builds a matcher of this kind for an `n×n` problem.
    pub fn build(self, n: usize) -> Engine {
        match self {
            Self::Lawler => Engine::Lawler(LawlerMatcher::new(n)),
            Self::Exhaustive => Engine::Exhaustive(ExhaustiveMatcher::new(n)),
        }
    }
}

impl std::str::FromStr for MatcherKind {
    type Err = MatchingError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "lawler" => Ok(Self::Lawler),
            "exhaustive" => Ok(Self::Exhaustive),
            _ => Err(MatchingError::UnknownKind(s.to_string())),
        }
    }
}

impl std::fmt::Display for MatcherKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Lawler => write!(f, "lawler"),
            Self::Exhaustive => write!(f, "exhaustive"),
        }
    }
}

/// One concrete matcher per [`MatcherKind`], dispatched without boxing.
#[derive(Debug, Clone)]
pub enum Engine {
    Lawler(LawlerMatcher),
    Exhaustive(ExhaustiveMatcher),
}

impl Engine {
    pub fn kind(&self) -> MatcherKind {
        match self {
            Self::Lawler(_) => MatcherKind::Lawler,
            Self::Exhaustive(_) => MatcherKind::Exhaustive,
        }
    }
    /// Optimality certificate, where the underlying matcher can produce one.
    pub fn certify(&self) -> Option<Result<(), MatchingError>> {
        match self {
            Self::Lawler(m) => Some(m.certify()),
            Self::Exhaustive(_) => None,
        }
    }
}

impl Matcher for Engine {
    fn n(&self) -> usize {
        match self {
            Self::Lawler(m) => m.n(),
            Self::Exhaustive(m) => m.n(),
        }
    }
    fn compute_max(&mut self, weights: &Weights) -> Result<(), MatchingError> {
        match self {
            Self::Lawler(m) => m.compute_max(weights),
            Self::Exhaustive(m) => m.compute_max(weights),
        }
    }
    fn compute_min(&mut self, weights: &Weights) -> Result<(), MatchingError> {
        match self {
            Self::Lawler(m) => m.compute_min(weights),
            Self::Exhaustive(m) => m.compute_min(weights),
        }
    }
    fn matching_source(&self) -> &[usize] {
        match self {
            Self::Lawler(m) => m.matching_source(),
            Self::Exhaustive(m) => m.matching_source(),
        }
    }
    fn matching_dest(&self) -> &[usize] {
        match self {
            Self::Lawler(m) => m.matching_dest(),
            Self::Exhaustive(m) => m.matching_dest(),
        }
    }
    fn matching_weight(&self) -> Weight {
        match self {
            Self::Lawler(m) => m.matching_weight(),
            Self::Exhaustive(m) => m.matching_weight(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn is_kind_name_reversible() {
        for kind in [MatcherKind::Lawler, MatcherKind::Exhaustive] {
            assert_eq!(kind.to_string().parse::<MatcherKind>(), Ok(kind));
            assert_eq!(kind.build(3).kind(), kind);
            assert_eq!(kind.build(3).n(), 3);
        }
    }
    #[test]
    fn is_unknown_kind_rejected() {
        assert_eq!(
            "lp".parse::<MatcherKind>(),
            Err(MatchingError::UnknownKind("lp".to_string()))
        );
    }
    #[test]
    fn does_dispatch_reach_both_engines() {
        let w = Weights::from_fn(4, |i, j| Some(((i * 7 + j * 3) % 5) as Weight));
        let mut lawler = MatcherKind::Lawler.build(4);
        let mut brute = MatcherKind::Exhaustive.build(4);
        lawler.compute_min(&w).unwrap();
        brute.compute_min(&w).unwrap();
        assert!((lawler.matching_weight() - brute.matching_weight()).abs() < 1e-9);
        assert_eq!(lawler.certify(), Some(Ok(())));
        assert_eq!(brute.certify(), None);
        assert_eq!(lawler.assignment().pairs().count(), 4);
    }
}
