use approx::assert_abs_diff_eq;
use limno_stats::{rank_with_ties, Alternative, HypothesisEngine, TestConfig, TestResult};
use proptest::prelude::*;

fn sample() -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(-50.0f64..50.0, 1..30)
}

/// Few distinct values, so most observations are tied.
fn tie_heavy() -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec((0u8..4).prop_map(f64::from), 1..40)
}

fn alternative() -> impl Strategy<Value = Alternative> {
    prop_oneof![
        Just(Alternative::TwoSided),
        Just(Alternative::Greater),
        Just(Alternative::Less),
    ]
}

fn well_formed<D>(r: &TestResult<D>) -> bool {
    (0.0..=1.0).contains(&r.p_value) && r.significant == (r.p_value < r.alpha)
}

fn engines() -> [HypothesisEngine; 2] {
    [HypothesisEngine::new(), HypothesisEngine::without_providers()]
}

proptest! {
    #[test]
    fn every_test_returns_a_probability(
        x in sample(),
        y in sample(),
        alt in alternative(),
        alpha in 0.001f64..0.2,
    ) {
        let cfg = TestConfig::new(alpha, alt).unwrap();
        for engine in engines() {
            if x.len() >= 2 && y.len() >= 2 {
                prop_assert!(well_formed(&engine.t_test_one_sample(&x, 1.0, &cfg).unwrap()));
                prop_assert!(well_formed(&engine.t_test_welch(&x, &y, &cfg).unwrap()));
                prop_assert!(well_formed(&engine.t_test_student(&x, &y, &cfg).unwrap()));
                prop_assert!(well_formed(&engine.equivalence_test(&x, -5.0, 5.0, &cfg).unwrap()));
                prop_assert!(well_formed(
                    &engine.equivalence_two_sample(&x, &y, -5.0, 5.0, &cfg).unwrap()
                ));
            }
            prop_assert!(well_formed(&engine.wilcoxon_signed_rank(&x, 0.5, &cfg).unwrap()));
            prop_assert!(well_formed(&engine.sign_test(&x, 0.5, &cfg).unwrap()));
            prop_assert!(well_formed(&engine.mann_whitney_u(&x, &y, &cfg).unwrap()));
            prop_assert!(well_formed(&engine.mood_median_test(&x, &y, &cfg).unwrap()));
        }
    }

    #[test]
    fn tie_heavy_input_is_still_well_formed(x in tie_heavy(), y in tie_heavy()) {
        let cfg = TestConfig::default();
        for engine in engines() {
            prop_assert!(well_formed(&engine.wilcoxon_signed_rank(&x, 1.0, &cfg).unwrap()));
            prop_assert!(well_formed(&engine.sign_test(&x, 1.0, &cfg).unwrap()));
            prop_assert!(well_formed(&engine.mann_whitney_u(&x, &y, &cfg).unwrap()));
            prop_assert!(well_formed(&engine.mood_median_test(&x, &y, &cfg).unwrap()));
        }
    }

    #[test]
    fn tie_groups_partition_the_sample(x in tie_heavy()) {
        let ranking = rank_with_ties(&x);
        prop_assert_eq!(ranking.tie_groups.iter().sum::<usize>(), x.len());
        let rank_total: f64 = ranking.ranks.iter().sum();
        let n = x.len() as f64;
        assert_abs_diff_eq!(rank_total, n * (n + 1.0) / 2.0, epsilon = 1e-9);
    }

    #[test]
    fn mann_whitney_is_symmetric_in_its_groups(x in sample(), y in sample()) {
        let cfg = TestConfig::default();
        for engine in engines() {
            let xy = engine.mann_whitney_u(&x, &y, &cfg).unwrap();
            let yx = engine.mann_whitney_u(&y, &x, &cfg).unwrap();
            assert_abs_diff_eq!(xy.p_value, yx.p_value, epsilon = 1e-9);
            assert_abs_diff_eq!(xy.details.u, yx.details.u, epsilon = 1e-9);
        }
    }

    #[test]
    fn signed_rank_is_symmetric_under_negation(x in sample()) {
        let negated: Vec<f64> = x.iter().map(|v| -v).collect();
        let cfg = TestConfig::default();
        for engine in engines() {
            let a = engine.wilcoxon_signed_rank(&x, 0.0, &cfg).unwrap();
            let b = engine.wilcoxon_signed_rank(&negated, 0.0, &cfg).unwrap();
            assert_abs_diff_eq!(a.p_value, b.p_value, epsilon = 1e-9);
            assert_abs_diff_eq!(a.details.w_plus, b.details.w_minus, epsilon = 1e-9);
        }
    }
}
