use lawler::*;
use rand::SeedableRng;
use rand::rngs::SmallRng;

const TOLERANCE: Weight = 1e-9;

fn solve(kind: MatcherKind, text: &str, sense: Sense) -> Result<Assignment, MatchingError> {
    let weights = text.parse::<Weights>()?;
    let mut engine = kind.build(weights.n());
    match sense {
        Sense::Max => engine.compute_max(&weights)?,
        Sense::Min => engine.compute_min(&weights)?,
    }
    Ok(engine.assignment())
}

#[test]
fn is_diagonal_scenario_solved_by_every_kind() {
    for kind in [MatcherKind::Lawler, MatcherKind::Exhaustive] {
        let a = solve(kind, "3\n3 1 1\n1 3 1\n1 1 3\n", Sense::Max).unwrap();
        assert_eq!(a.source, vec![0, 1, 2]);
        assert_eq!(a.dest, vec![0, 1, 2]);
        assert!((a.weight - 9.).abs() < TOLERANCE);
    }
}

#[test]
fn is_swap_scenario_solved_both_ways() {
    let max = solve(MatcherKind::Lawler, "2\n1 2\n2 1\n", Sense::Max).unwrap();
    assert_eq!(max.source, vec![1, 0]);
    assert!((max.weight - 4.).abs() < TOLERANCE);
    let min = solve(MatcherKind::Lawler, "2\n1 2\n2 1\n", Sense::Min).unwrap();
    assert_eq!(min.source, vec![0, 1]);
    assert!((min.weight - 2.).abs() < TOLERANCE);
}

#[test]
fn is_isolated_row_infeasible() {
    let text = "3\n-inf -inf -inf\n1 2 3\n4 5 6\n";
    for kind in [MatcherKind::Lawler, MatcherKind::Exhaustive] {
        assert!(matches!(
            solve(kind, text, Sense::Max),
            Err(MatchingError::Infeasible { n: 3, .. })
        ));
    }
}

#[test]
fn is_edgeless_text_degenerate() {
    assert_eq!(
        solve(MatcherKind::Lawler, "2\nx x\nx x\n", Sense::Min),
        Err(MatchingError::NoFiniteWeight)
    );
}

#[test]
fn is_assignment_serializable() {
    let a = solve(MatcherKind::Lawler, "2\n1 2\n2 1\n", Sense::Max).unwrap();
    let json = serde_json::to_string(&a).unwrap();
    assert_eq!(json, r#"{"source":[1,0],"dest":[1,0],"weight":4.0}"#);
    assert_eq!(serde_json::from_str::<Assignment>(&json).unwrap(), a);
}

#[test]
fn does_forbidden_edge_stay_unused() {
    let ref mut rng = SmallRng::seed_from_u64(29);
    for _ in 0..64 {
        let weights = Weights::sample(9, 0.4, rng);
        let mut engine = MatcherKind::Lawler.build(9);
        if engine.compute_max(&weights).is_ok() {
            let a = engine.assignment();
            assert!(a.pairs().all(|(i, j)| weights.get(i, j).is_some()));
            assert_eq!(engine.certify(), Some(Ok(())));
        }
    }
}

#[test]
fn is_large_problem_certified() {
    let ref mut rng = SmallRng::seed_from_u64(31);
    let weights = Weights::sample(128, 0., rng).shifted(-0.5);
    let mut m = LawlerMatcher::new(128);
    m.compute_max(&weights).unwrap();
    assert!(m.certify().is_ok());
    let total = weights.total(m.matching_source()).unwrap();
    assert!((total - m.matching_weight()).abs() < 1e-6);
    assert!((m.dual_objective() - m.matching_weight()).abs() < 1e-6);
}
