use super::*;
use crate::OPTIMALITY_TOLERANCE;
use crate::WEIGHT_MARGIN;
use crate::Weight;

/// Position of an S-node in the current phase's alternating tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Label {
    /// Not reached by any tight alternating path this phase.
    Unvisited,
    /// Unmatched S-node that a search tree grows from.
    Root,
    /// Reached through its matched T-node `j`.
    Parent(usize),
}

/// Maximum/minimum weight perfect matching via Kuhn's Hungarian method,
/// as refined and presented by Lawler (1976).
///
/// The engine keeps dual variables `u` (one per S-node) and `v` (one per
/// T-node) with `u[i] + v[j] >= w[i][j]` on every edge, and grows the
/// matching along augmenting paths made only of tight edges, where that
/// bound holds with equality. When no augmenting path exists at the current
/// duals, it lowers the duals of the labeled S-nodes just enough to make
/// another edge tight. Total running time is O(n³).
///
/// Lawler's method assumes positive weights, so each solve first shifts
/// every finite weight by a constant, leaving the smallest one equal to
/// [`WEIGHT_MARGIN`]. Adding a constant to every edge raises every perfect
/// matching by the same amount, so the optimum is unchanged. Minimization
/// negates the weights before shifting.
///
/// The shifted weights must stay finite and strictly positive. Weights
/// whose span overflows once widened, or whose magnitude swallows the
/// margin, fail with [`MatchingError::OutOfRange`].
///
/// # Forbidden Edges
///
/// Forbidden edges are skipped outright and can never become tight. The
/// method itself finds a maximum weight matching, perfect or not, so when
/// edges are missing the shift is widened until every perfect matching
/// outweighs every imperfect one. If the forbidden edges leave no perfect
/// matching, the dual update eventually finds it cannot make another edge
/// tight without driving some `u[i]` negative, and the solve fails with
/// [`MatchingError::Infeasible`].
///
/// # Determinism
///
/// Both work queues are LIFO stacks and the S stack is always drained before
/// the T stack. Ties between equally heavy matchings are broken by that
/// traversal order, so identical inputs yield identical matchings.
#[derive(Debug, Clone)]
pub struct LawlerMatcher {
    n: usize,
    /// Shifted, signed copy of the caller's weights, row-major.
    weights: Vec<Option<Weight>>,
    offset: Weight,
    sense: Sense,
    s_matches: Vec<Option<usize>>,
    t_matches: Vec<Option<usize>>,
    s_labels: Vec<Label>,
    /// S-node whose edge last lowered `pi[j]`.
    t_labels: Vec<Option<usize>>,
    u: Vec<Weight>,
    v: Vec<Weight>,
    /// Smallest slack into each T-node from a labeled S-node.
    pi: Vec<Weight>,
    eligible_s: Vec<usize>,
    eligible_t: Vec<usize>,
    source: Vec<usize>,
    dest: Vec<usize>,
    total: Weight,
    augmentations: usize,
    updates: usize,
}

impl LawlerMatcher {
    /// Prepares a matcher for an `n×n` graph. No matching exists until a solve.
    pub fn new(n: usize) -> Self {
        Self {
            n,
            weights: vec![Some(WEIGHT_MARGIN); n * n],
            offset: 0.,
            sense: Sense::Max,
            s_matches: vec![None; n],
            t_matches: vec![None; n],
            s_labels: vec![Label::Unvisited; n],
            t_labels: vec![None; n],
            u: vec![0.; n],
            v: vec![0.; n],
            pi: vec![Weight::INFINITY; n],
            eligible_s: Vec::with_capacity(n),
            eligible_t: Vec::with_capacity(n),
            source: Vec::with_capacity(n),
            dest: Vec::with_capacity(n),
            total: 0.,
            augmentations: 0,
            updates: 0,
        }
    }

    /// Dual variables `(u, v)` on the shifted working scale.
    pub fn duals(&self) -> (&[Weight], &[Weight]) {
        (&self.u, &self.v)
    }
    /// The dual bound `Σu + Σv`, mapped back onto the caller's weight scale.
    /// Equals [`matching_weight`](Matcher::matching_weight) at the optimum.
    pub fn dual_objective(&self) -> Weight {
        let bound = self.u.iter().chain(self.v.iter()).sum::<Weight>();
        self.sense.sign() * (bound + self.n as Weight * self.offset)
    }
    /// Number of augmenting paths flipped and dual updates made by the last solve.
    pub fn effort(&self) -> (usize, usize) {
        (self.augmentations, self.updates)
    }

    /// Verifies the last result is an optimal perfect matching: the
    /// matching is a permutation, the duals are feasible and nonnegative,
    /// and the primal and dual objectives agree.
    pub fn certify(&self) -> Result<(), MatchingError> {
        if self.source.len() != self.n || !is_permutation(&self.source, &self.dest) {
            return Err(MatchingError::Inconsistent("matching is not a permutation"));
        }
        let scale = self
            .weights
            .iter()
            .flatten()
            .map(|w| w.abs())
            .fold(1., Weight::max);
        let tolerance = OPTIMALITY_TOLERANCE * scale;
        if self.u.iter().chain(self.v.iter()).any(|&x| x < -tolerance) {
            return Err(MatchingError::Inconsistent("negative dual variable"));
        }
        for i in 0..self.n {
            for j in 0..self.n {
                if let Some(w) = self.weight(i, j) {
                    if self.u[i] + self.v[j] < w - tolerance {
                        return Err(MatchingError::Inconsistent("dual not feasible"));
                    }
                }
            }
        }
        let primal = self
            .source
            .iter()
            .enumerate()
            .filter_map(|(i, &j)| self.weight(i, j))
            .sum::<Weight>();
        let dual = self.u.iter().chain(self.v.iter()).sum::<Weight>();
        if (primal - dual).abs() > tolerance * dual.abs().max(1.) {
            return Err(MatchingError::Inconsistent("primal dual mismatch"));
        }
        Ok(())
    }

    fn weight(&self, i: usize, j: usize) -> Option<Weight> {
        self.weights[i * self.n + j]
    }
    /// Value the lightest working weight is shifted to.
    ///
    /// With every edge present any maximum weight matching is perfect, so
    /// [`WEIGHT_MARGIN`] is enough. With edges missing, an imperfect matching
    /// of n-1 edges must still weigh less than every perfect matching, which
    /// holds once the margin exceeds (n-1) times the weight span.
    fn margin(&self, weights: &Weights, min: Weight, max: Weight) -> Weight {
        match weights.rows().flatten().any(Option::is_none) {
            false => WEIGHT_MARGIN,
            true => (self.n - 1) as Weight * (max - min) + WEIGHT_MARGIN,
        }
    }

    /// Validates, shifts, and solves. Results are published only on success.
    fn compute(&mut self, weights: &Weights, sense: Sense) -> Result<(), MatchingError> {
        if weights.n() != self.n {
            return Err(MatchingError::Shape {
                expected: self.n,
                found: weights.n(),
            });
        }
        self.source.clear();
        self.dest.clear();
        self.total = 0.;
        self.augmentations = 0;
        self.updates = 0;
        if self.n == 0 {
            return Ok(());
        }
        let sign = sense.sign();
        let (min, max) = weights
            .rows()
            .flatten()
            .flatten()
            .map(|w| sign * w)
            .fold(None, |bounds, w| match bounds {
                None => Some((w, w)),
                Some((lo, hi)) => Some((Weight::min(lo, w), Weight::max(hi, w))),
            })
            .ok_or(MatchingError::NoFiniteWeight)?;
        let offset = min - self.margin(weights, min, max);
        // every working weight must be finite and strictly positive
        if !(min - offset > 0. && (max - offset).is_finite()) {
            return Err(MatchingError::OutOfRange {
                min: Weight::min(sign * min, sign * max),
                max: Weight::max(sign * min, sign * max),
            });
        }
        self.sense = sense;
        self.offset = offset;
        for (working, given) in self.weights.iter_mut().zip(weights.rows().flatten()) {
            *working = given.map(|w| sign * w - offset);
        }
        match self.matching() {
            Err(e) => {
                log::warn!("{}x{} {} matching failed: {}", self.n, self.n, sense, e);
                Err(e)
            }
            Ok(()) => {
                self.publish()?;
                debug_assert!(self.certify().is_ok(), "{:?}", self.certify());
                log::debug!(
                    "{}x{} {} matching: {} augmentations, {} dual updates, weight {}",
                    self.n,
                    self.n,
                    sense,
                    self.augmentations,
                    self.updates,
                    self.total,
                );
                Ok(())
            }
        }
    }

    /// Alternates augmentation and dual updates until the matching is perfect.
    fn matching(&mut self) -> Result<(), MatchingError> {
        self.initialize();
        loop {
            // augment until the current duals admit no augmenting path
            while let Some(j) = self.augmenting_path() {
                self.flip(j)?;
                self.augmentations += 1;
                self.relabel();
                if self.eligible_s.is_empty() {
                    return Ok(());
                }
                self.eligible_t.clear();
            }
            let delta1 = (0..self.n)
                .filter(|&i| self.s_labels[i] != Label::Unvisited)
                .map(|i| self.u[i])
                .fold(Weight::INFINITY, Weight::min);
            let delta2 = self
                .pi
                .iter()
                .copied()
                .filter(|&p| p > 0.)
                .fold(Weight::INFINITY, Weight::min);
            // another tight edge would cost a negative u[i]
            if delta1 < delta2 {
                return Err(MatchingError::Infeasible {
                    matched: self.s_matches.iter().flatten().count(),
                    n: self.n,
                });
            }
            self.update(delta2);
            self.updates += 1;
        }
    }

    /// Empty matching, `u[i] = max_j w[i][j]`, `v = 0`, every S-node a root.
    fn initialize(&mut self) {
        self.eligible_s.clear();
        self.eligible_t.clear();
        for i in 0..self.n {
            self.u[i] = self.weights[i * self.n..(i + 1) * self.n]
                .iter()
                .flatten()
                .copied()
                .fold(0., Weight::max);
        }
        self.s_matches.fill(None);
        self.t_matches.fill(None);
        self.v.fill(0.);
        self.pi.fill(Weight::INFINITY);
        self.s_labels.fill(Label::Root);
        self.t_labels.fill(None);
        self.eligible_s.extend(0..self.n);
    }

    /// Grows the alternating trees along tight edges until an unmatched
    /// T-node is reached, returning it, or both queues run dry.
    fn augmenting_path(&mut self) -> Option<usize> {
        loop {
            if let Some(i) = self.eligible_s.pop() {
                for j in 0..self.n {
                    if self.s_matches[i] == Some(j) {
                        continue;
                    }
                    let Some(w) = self.weights[i * self.n + j] else {
                        continue;
                    };
                    let x = self.u[i] + self.v[j] - w;
                    // once pi[j] reaches zero it is never lowered again
                    if self.pi[j] > 0. && x < self.pi[j] {
                        self.t_labels[j] = Some(i);
                        self.pi[j] = x;
                        if x <= 0. {
                            self.eligible_t.push(j);
                        }
                    }
                }
            } else if let Some(j) = self.eligible_t.pop() {
                match self.t_matches[j] {
                    None => return Some(j),
                    Some(i) => {
                        if self.s_labels[i] == Label::Unvisited {
                            self.s_labels[i] = Label::Parent(j);
                            self.eligible_s.push(i);
                        }
                    }
                }
            } else {
                return None;
            }
        }
    }

    /// Flips every edge on the augmenting path ending at T-node `j`.
    ///
    /// Walking back from `j`, each S-node takes the T-node below it and
    /// releases its old partner, which the next step hands to the S-node
    /// above. Only the first T-node may arrive unmatched.
    fn flip(&mut self, mut j: usize) -> Result<(), MatchingError> {
        let mut prev = None;
        for _ in 0..=self.n {
            if self.t_matches[j] != prev {
                return Err(MatchingError::Inconsistent(match prev {
                    None => "augmenting path ends at a matched T-node",
                    Some(_) => "T-node claimed by two S-nodes",
                }));
            }
            let i = self.t_labels[j].ok_or(MatchingError::Inconsistent(
                "augmenting path reaches an unlabeled T-node",
            ))?;
            self.s_matches[i] = Some(j);
            self.t_matches[j] = Some(i);
            log::trace!("flip ({}, {})", i, j);
            match self.s_labels[i] {
                Label::Root => return Ok(()),
                Label::Parent(next) => {
                    prev = Some(i);
                    j = next;
                }
                Label::Unvisited => {
                    return Err(MatchingError::Inconsistent(
                        "augmenting path reaches an unlabeled S-node",
                    ));
                }
            }
        }
        Err(MatchingError::Inconsistent("augmenting path never reaches a root"))
    }

    /// Clears the trees and reseeds them from the still-unmatched S-nodes.
    fn relabel(&mut self) {
        self.pi.fill(Weight::INFINITY);
        self.s_labels.fill(Label::Unvisited);
        self.t_labels.fill(None);
        self.eligible_s.clear();
        for i in 0..self.n {
            if self.s_matches[i].is_none() {
                self.s_labels[i] = Label::Root;
                self.eligible_s.push(i);
            }
        }
    }

    /// Lowers labeled `u` and raises tight `v` by `delta`, tightening the
    /// remaining slacks and queueing any T-node that becomes reachable.
    fn update(&mut self, delta: Weight) {
        log::trace!("dual update by {}", delta);
        for i in 0..self.n {
            if self.s_labels[i] != Label::Unvisited {
                self.u[i] -= delta;
            }
        }
        for j in 0..self.n {
            if self.pi[j] <= 0. {
                self.v[j] += delta;
            } else if self.t_labels[j].is_some() {
                self.pi[j] -= delta;
                if self.pi[j] <= 0. {
                    self.eligible_t.push(j);
                }
            }
        }
    }

    /// Copies the finished matching into the public arrays and totals it
    /// on the caller's scale.
    fn publish(&mut self) -> Result<(), MatchingError> {
        let source = self
            .s_matches
            .iter()
            .map(|m| m.ok_or(MatchingError::Inconsistent("S-node left unmatched")))
            .collect::<Result<Vec<usize>, _>>()?;
        let dest = self
            .t_matches
            .iter()
            .map(|m| m.ok_or(MatchingError::Inconsistent("T-node left unmatched")))
            .collect::<Result<Vec<usize>, _>>()?;
        if !is_permutation(&source, &dest) {
            return Err(MatchingError::Inconsistent(
                "matching arrays are not mutually inverse",
            ));
        }
        let sign = self.sense.sign();
        let total = source
            .iter()
            .enumerate()
            .map(|(i, &j)| self.weight(i, j).map(|w| sign * (w + self.offset)))
            .sum::<Option<Weight>>()
            .ok_or(MatchingError::Inconsistent("matched a forbidden edge"))?;
        self.source = source;
        self.dest = dest;
        self.total = total;
        Ok(())
    }
}

impl Matcher for LawlerMatcher {
    fn n(&self) -> usize {
        self.n
    }
    fn compute_max(&mut self, weights: &Weights) -> Result<(), MatchingError> {
        self.compute(weights, Sense::Max)
    }
    fn compute_min(&mut self, weights: &Weights) -> Result<(), MatchingError> {
        self.compute(weights, Sense::Min)
    }
    fn matching_source(&self) -> &[usize] {
        &self.source
    }
    fn matching_dest(&self) -> &[usize] {
        &self.dest
    }
    fn matching_weight(&self) -> Weight {
        self.total
    }
}

/// Working weight matrix, one row per line.
impl std::fmt::Display for LawlerMatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for i in 0..self.n {
            let line = (0..self.n)
                .map(|j| match self.weight(i, j) {
                    Some(w) => w.to_string(),
                    None => "-inf".to_string(),
                })
                .collect::<Vec<_>>()
                .join(" ");
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}
