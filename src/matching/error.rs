use crate::Weight;

/// Everything that can stop a solve from producing a perfect matching.
///
/// No variant is ever downgraded to a partial result. A matcher that
/// returns one of these holds no matching until the next successful solve.
#[derive(Debug, Clone, PartialEq)]
pub enum MatchingError {
    /// Weight matrix dimension disagrees with the matcher, or rows are ragged.
    Shape { expected: usize, found: usize },
    /// NaN or positive infinity where a real weight or a forbidden edge belongs.
    NonFinite { row: usize, col: usize },
    /// Every edge is forbidden, so there is no finite minimum to shift by.
    NoFiniteWeight,
    /// Forbidden edges leave no perfect matching.
    Infeasible { matched: usize, n: usize },
    /// Finite weights too far apart to shift into a positive working range.
    OutOfRange { min: Weight, max: Weight },
    /// Label or matching bookkeeping broke. Never caused by caller input.
    Inconsistent(&'static str),
    /// Problem exceeds what the exhaustive enumerator will attempt.
    TooLarge { n: usize, limit: usize },
    /// Matcher name not recognized by the factory.
    UnknownKind(String),
    /// Malformed textual weight matrix.
    Parse(String),
}

impl std::fmt::Display for MatchingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Shape { expected, found } => {
                write!(f, "badly sized weight array: expected {expected}, found {found}")
            }
            Self::NonFinite { row, col } => write!(f, "non-finite weight at ({row}, {col})"),
            Self::NoFiniteWeight => write!(f, "no minimum weight: every edge is forbidden"),
            Self::Infeasible { matched, n } => {
                write!(f, "no perfect matching possible: matched {matched} of {n}")
            }
            Self::OutOfRange { min, max } => {
                write!(f, "weights span [{min}, {max}] cannot be shifted positive")
            }
            Self::Inconsistent(s) => write!(f, "inconsistent matching state: {}", s),
            Self::TooLarge { n, limit } => {
                write!(f, "problem too large to enumerate: {n} > {limit}")
            }
            Self::UnknownKind(s) => write!(f, "unknown matcher type: {}", s),
            Self::Parse(s) => write!(f, "invalid weight matrix: {}", s),
        }
    }
}

impl std::error::Error for MatchingError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn does_display_name_the_cause() {
        let e = MatchingError::Infeasible { matched: 2, n: 3 };
        assert_eq!(e.to_string(), "no perfect matching possible: matched 2 of 3");
        let e = MatchingError::Shape { expected: 4, found: 3 };
        assert!(e.to_string().contains("expected 4"));
    }
}
