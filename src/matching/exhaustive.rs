use super::*;
use crate::EXHAUSTIVE_LIMIT;
use crate::Weight;

/// Exact matcher that scores every permutation of `0..n`.
///
/// O(n · n!), so it refuses anything above [`EXHAUSTIVE_LIMIT`]. It shares
/// nothing with [`LawlerMatcher`] beyond the [`Matcher`] contract, which is
/// what makes it a useful oracle. Ties keep the first permutation in
/// [`Permutations`] order.
#[derive(Debug, Clone)]
pub struct ExhaustiveMatcher {
    n: usize,
    source: Vec<usize>,
    dest: Vec<usize>,
    total: Weight,
}

impl ExhaustiveMatcher {
    pub fn new(n: usize) -> Self {
        Self {
            n,
            source: Vec::new(),
            dest: Vec::new(),
            total: 0.,
        }
    }

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
        if self.n == 0 {
            return Ok(());
        }
        if self.n > EXHAUSTIVE_LIMIT {
            return Err(MatchingError::TooLarge {
                n: self.n,
                limit: EXHAUSTIVE_LIMIT,
            });
        }
        if weights.min().is_none() {
            return Err(MatchingError::NoFiniteWeight);
        }
        let sign = sense.sign();
        let mut best = None::<(Vec<usize>, Weight)>;
        let mut matched = 0usize;
        for perm in Permutations::from(self.n) {
            match weights.total(&perm) {
                Some(total) => match best {
                    Some((_, b)) if sign * total <= sign * b => {}
                    _ => best = Some((perm, total)),
                },
                None => {
                    matched = matched.max(
                        perm.iter()
                            .enumerate()
                            .filter(|&(i, &j)| weights.get(i, j).is_some())
                            .count(),
                    )
                }
            }
        }
        let (source, total) = best.ok_or_else(|| {
            log::warn!("{}x{} {} enumeration found no perfect matching", self.n, self.n, sense);
            MatchingError::Infeasible {
                matched,
                n: self.n,
            }
        })?;
        let mut dest = vec![0; self.n];
        source.iter().enumerate().for_each(|(i, &j)| dest[j] = i);
        log::debug!("{}x{} {} enumeration: weight {}", self.n, self.n, sense, total);
        self.source = source;
        self.dest = dest;
        self.total = total;
        Ok(())
    }
}

impl Matcher for ExhaustiveMatcher {
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

/// Every permutation of `0..n` in Heap's order, starting from the identity.
pub struct Permutations {
    perm: Vec<usize>,
    counters: Vec<usize>,
    cursor: usize,
    fresh: bool,
}

impl From<usize> for Permutations {
    fn from(n: usize) -> Self {
        Self {
            perm: (0..n).collect(),
            counters: vec![0; n],
            cursor: 1,
            fresh: true,
        }
    }
}

impl Iterator for Permutations {
    type Item = Vec<usize>;
    fn next(&mut self) -> Option<Self::Item> {
        if self.fresh {
            self.fresh = false;
            return Some(self.perm.clone());
        }
        while self.cursor < self.perm.len() {
            let k = self.cursor;
            if self.counters[k] < k {
                match k % 2 {
                    0 => self.perm.swap(0, k),
                    _ => self.perm.swap(self.counters[k], k),
                }
                self.counters[k] += 1;
                self.cursor = 1;
                return Some(self.perm.clone());
            }
            self.counters[k] = 0;
            self.cursor += 1;
        }
        None
    }
}
