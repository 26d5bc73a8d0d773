//! Perfect matchings on complete bipartite graphs.
//!
//! ## Core Types
//!
//! - [`Weights`] - Dense `n×n` edge weights, `None` for a forbidden edge
//! - [`Matcher`] - Solve for max or min weight, then read the matching back
//! - [`Assignment`] - Owned, serializable snapshot of a result
//! - [`MatchingError`] - Shape, degenerate, infeasible, and internal failures
//!
//! ## Algorithms
//!
//! - [`LawlerMatcher`] - Kuhn's Hungarian method after Lawler, O(n³)
//! - [`ExhaustiveMatcher`] - Permutation enumeration, an oracle for small n
//!
//! ## Selection
//!
//! - [`MatcherKind`] - Names a matcher, parses from `"lawler"` or `"exhaustive"`
//! - [`Engine`] - Tagged union of the concrete matchers
mod error;
mod exhaustive;
mod kind;
mod lawler;
mod matcher;
mod weights;

pub use error::*;
pub use exhaustive::*;
pub use kind::*;
pub use lawler::*;
pub use matcher::*;
pub use weights::*;
