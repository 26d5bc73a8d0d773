use super::*;
use crate::Arbitrary;
use crate::Weight;
use rand::Rng;

/// Square weight matrix of a complete bipartite graph.
///
/// Row `i` holds the edges leaving S-node `i`, column `j` the edges entering
/// T-node `j`. An entry of `None` is a forbidden edge: the matchers behave as
/// if it were absent from the graph, not merely expensive. Every `Some`
/// entry is finite.
///
/// The checked boundaries (`TryFrom`, `FromStr`) accept only `-inf` as a
/// forbidden-edge marker and reject NaN and `+inf`. [`Weights::from_fn`]
/// and [`Weights::sample`] are infallible and forbid any non-finite entry.
#[derive(Debug, Clone, PartialEq)]
pub struct Weights {
    n: usize,
    data: Vec<Option<Weight>>,
}

impl Weights {
    /// Builds an `n×n` matrix entry by entry. Non-finite values are forbidden edges.
    pub fn from_fn<F>(n: usize, mut f: F) -> Self
    where
        F: FnMut(usize, usize) -> Option<Weight>,
    {
        Self {
            n,
            data: (0..n)
                .flat_map(|i| (0..n).map(move |j| (i, j)))
                .map(|(i, j)| f(i, j).filter(|w| w.is_finite()))
                .collect(),
        }
    }
    /// Uniform weights in `[0, 1)`, each edge forbidden with probability
    /// `forbid`, clamped to `[0, 1]`. NaN forbids nothing.
    pub fn sample<R: Rng>(n: usize, forbid: f64, rng: &mut R) -> Self {
        let forbid = if forbid > 0. { forbid.min(1.) } else { 0. };
        Self::from_fn(n, |_, _| {
            if rng.random_bool(forbid) {
                None
            } else {
                Some(rng.random::<Weight>())
            }
        })
    }

    pub fn n(&self) -> usize {
        self.n
    }
    pub fn get(&self, i: usize, j: usize) -> Option<Weight> {
        self.data[i * self.n + j]
    }
    pub fn row(&self, i: usize) -> &[Option<Weight>] {
        &self.data[i * self.n..(i + 1) * self.n]
    }
    pub fn rows(&self) -> impl Iterator<Item = &[Option<Weight>]> + '_ {
        (0..self.n).map(|i| self.row(i))
    }
    /// Smallest finite entry, if any edge exists at all.
    pub fn min(&self) -> Option<Weight> {
        self.data.iter().flatten().copied().reduce(Weight::min)
    }
    /// Sum of the weights along `matching`, where `matching[i]` is the partner of `i`.
    /// `None` if the matching uses a forbidden edge.
    pub fn total(&self, matching: &[usize]) -> Option<Weight> {
        matching
            .iter()
            .enumerate()
            .map(|(i, &j)| self.get(i, j))
            .sum()
    }

    /// Removes edge `(i, j)` from the graph.
    pub fn forbid(&mut self, i: usize, j: usize) {
        self.data[i * self.n + j] = None;
    }
    /// Every finite weight negated. Forbidden edges stay forbidden.
    pub fn negated(&self) -> Self {
        self.map(|w| -w)
    }
    /// Every finite weight shifted by `c`. Forbidden edges stay forbidden.
    pub fn shifted(&self, c: Weight) -> Self {
        self.map(|w| w + c)
    }
    fn map<F: Fn(Weight) -> Weight>(&self, f: F) -> Self {
        Self {
            n: self.n,
            data: self.data.iter().map(|w| w.map(&f)).collect(),
        }
    }
}

impl TryFrom<Vec<Vec<Option<Weight>>>> for Weights {
    type Error = MatchingError;
    fn try_from(rows: Vec<Vec<Option<Weight>>>) -> Result<Self, Self::Error> {
        let n = rows.len();
        let mut data = Vec::with_capacity(n * n);
        for (i, row) in rows.into_iter().enumerate() {
            if row.len() != n {
                return Err(MatchingError::Shape {
                    expected: n,
                    found: row.len(),
                });
            }
            for (j, w) in row.into_iter().enumerate() {
                match w {
                    Some(w) if !w.is_finite() => {
                        return Err(MatchingError::NonFinite { row: i, col: j });
                    }
                    w => data.push(w),
                }
            }
        }
        Ok(Self { n, data })
    }
}

/// Accepts `f64::NEG_INFINITY` as the forbidden-edge marker.
impl TryFrom<Vec<Vec<Weight>>> for Weights {
    type Error = MatchingError;
    fn try_from(rows: Vec<Vec<Weight>>) -> Result<Self, Self::Error> {
        rows.into_iter()
            .map(|row| {
                row.into_iter()
                    .map(|w| if w == Weight::NEG_INFINITY { None } else { Some(w) })
                    .collect()
            })
            .collect::<Vec<Vec<Option<Weight>>>>()
            .try_into()
    }
}

/// `n` followed by `n` rows of `n` reals. `-inf` or `x` marks a forbidden edge.
impl std::str::FromStr for Weights {
    type Err = MatchingError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut tokens = s.split_whitespace();
        let n = tokens
            .next()
            .ok_or_else(|| MatchingError::Parse("missing dimension".to_string()))?
            .pipe(|t| {
                t.parse::<usize>()
                    .map_err(|_| MatchingError::Parse(format!("bad dimension {:?}", t)))
            })?;
        let len = n
            .checked_mul(n)
            .ok_or_else(|| MatchingError::Parse(format!("dimension {} too large", n)))?;
        let data = tokens
            .by_ref()
            .take(len)
            .map(|t| match t.to_ascii_lowercase().as_str() {
                "x" | "-inf" | "-infinity" => Ok(None),
                _ => t
                    .parse::<Weight>()
                    .ok()
                    .filter(|w| w.is_finite())
                    .map(Some)
                    .ok_or_else(|| MatchingError::Parse(format!("bad weight {:?}", t))),
            })
            .collect::<Result<Vec<_>, _>>()?;
        if data.len() < len {
            return Err(MatchingError::Parse(format!(
                "expected {} weights, found {}",
                len,
                data.len()
            )));
        }
        if let Some(t) = tokens.next() {
            return Err(MatchingError::Parse(format!("trailing token {:?}", t)));
        }
        Ok(Self { n, data })
    }
}

impl std::fmt::Display for Weights {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{}", self.n)?;
        for row in self.rows() {
            let line = row
                .iter()
                .map(|w| match w {
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

impl Arbitrary for Weights {
    fn random() -> Self {
        let ref mut rng = rand::rng();
        let n = rng.random_range(1..=8);
        Self::sample(n, 0., rng)
    }
}

/// Postfix application, so parsing chains read left to right.
trait Pipe: Sized {
    fn pipe<F, R>(self, f: F) -> R
    where
        F: FnOnce(Self) -> R,
    {
        f(self)
    }
}
impl<T> Pipe for T {}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn does_neg_infinity_become_forbidden() {
        let w = Weights::try_from(vec![vec![1., Weight::NEG_INFINITY], vec![2., 3.]]).unwrap();
        assert_eq!(w.get(0, 0), Some(1.));
        assert_eq!(w.get(0, 1), None);
        assert_eq!(w.min(), Some(1.));
    }
    #[test]
    fn is_ragged_input_rejected() {
        let w = Weights::try_from(vec![vec![1f64, 2.], vec![3.]]);
        assert_eq!(
            w,
            Err(MatchingError::Shape {
                expected: 2,
                found: 1
            })
        );
    }
    #[test]
    fn is_nan_rejected() {
        let w = Weights::try_from(vec![vec![1., 2.], vec![3., Weight::NAN]]);
        assert_eq!(w, Err(MatchingError::NonFinite { row: 1, col: 1 }));
        let w = Weights::try_from(vec![vec![Weight::INFINITY]]);
        assert_eq!(w, Err(MatchingError::NonFinite { row: 0, col: 0 }));
    }
    #[test]
    fn is_text_format_reversible() {
        let w = "3\n1 2 -inf\n4 x 6\n7 8 9.5\n".parse::<Weights>().unwrap();
        assert_eq!(w.n(), 3);
        assert_eq!(w.get(0, 2), None);
        assert_eq!(w.get(1, 1), None);
        assert_eq!(w.get(2, 2), Some(9.5));
        assert_eq!(w.to_string().parse::<Weights>().unwrap(), w);
    }
    #[test]
    fn is_short_text_rejected() {
        assert!(matches!("2\n1 2 3".parse::<Weights>(), Err(MatchingError::Parse(_))));
        assert!(matches!("2\n1 2 3 4 5".parse::<Weights>(), Err(MatchingError::Parse(_))));
        assert!(matches!("2\n1 2 nan 4".parse::<Weights>(), Err(MatchingError::Parse(_))));
        assert!(matches!("".parse::<Weights>(), Err(MatchingError::Parse(_))));
    }
    #[test]
    fn is_huge_dimension_rejected() {
        assert_eq!(
            usize::MAX.to_string().parse::<Weights>(),
            Err(MatchingError::Parse(format!("dimension {} too large", usize::MAX)))
        );
        assert!(matches!(
            "4294967296".parse::<Weights>(),
            Err(MatchingError::Parse(_))
        ));
    }
    #[test]
    fn is_generated_non_finite_forbidden() {
        let w = Weights::from_fn(2, |i, j| match (i, j) {
            (0, 0) => Some(Weight::NAN),
            (0, 1) => Some(Weight::INFINITY),
            _ => Some(1.),
        });
        assert_eq!(w.get(0, 0), None);
        assert_eq!(w.get(0, 1), None);
        assert_eq!(w.get(1, 1), Some(1.));
    }
    #[test]
    fn is_forbid_probability_clamped() {
        let ref mut rng = rand::rngs::SmallRng::seed_from_u64(7);
        let all = Weights::sample(3, 1.5, rng);
        assert!(all.rows().flatten().all(Option::is_none));
        let none = Weights::sample(3, -0.5, rng);
        assert!(none.rows().flatten().all(Option::is_some));
        let nan = Weights::sample(3, Weight::NAN, rng);
        assert!(nan.rows().flatten().all(Option::is_some));
    }
    #[test]
    fn does_negation_keep_forbidden_edges() {
        let mut w = Weights::from_fn(2, |i, j| Some((i + j) as Weight));
        w.forbid(1, 0);
        let v = w.negated().shifted(1.);
        assert_eq!(v.get(0, 0), Some(1.));
        assert_eq!(v.get(1, 1), Some(-1.));
        assert_eq!(v.get(1, 0), None);
    }
    #[test]
    fn does_total_refuse_forbidden_edges() {
        let mut w = Weights::from_fn(2, |i, j| Some((1 + i * 2 + j) as Weight));
        assert_eq!(w.total(&[0, 1]), Some(5.));
        w.forbid(0, 0);
        assert_eq!(w.total(&[0, 1]), None);
        assert_eq!(w.total(&[1, 0]), Some(5.));
    }
    #[test]
    fn is_empty_matrix_edgeless() {
        let w = "0".parse::<Weights>().unwrap();
        assert_eq!(w.n(), 0);
        assert_eq!(w.min(), None);
        assert_eq!(w.total(&[]), Some(0.));
    }
}
