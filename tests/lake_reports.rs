use approx::assert_abs_diff_eq;
use limno_stats::{Alternative, HypothesisEngine, PValueMethod, TestConfig};
use pretty_assertions::assert_eq;
use tests::*;

#[test]
fn warmer_july_is_detected_by_every_two_sample_test() {
    let engine = HypothesisEngine::new();
    let less = TestConfig::default().with_alternative(Alternative::Less);

    let welch = engine
        .t_test_welch(&JULY_TEMP_2023, &JULY_TEMP_2024, &less)
        .unwrap();
    assert!(welch.details.statistic < 0.0);
    assert!(welch.significant);

    let mw = engine
        .mann_whitney_u(&JULY_TEMP_2023, &JULY_TEMP_2024, &less)
        .unwrap();
    assert_eq!(mw.method, PValueMethod::NormalApproximation);
    assert_eq!(mw.details.tie_groups, vec![2, 2, 2]);
    assert_abs_diff_eq!(mw.details.u1, 13.5, epsilon = 1e-9);
    assert_abs_diff_eq!(mw.details.variance, 299.6086956522, epsilon = 1e-9);
    assert_abs_diff_eq!(mw.p_value, 0.00040286679, epsilon = 1e-7);
    assert!(mw.significant);
}

#[test]
fn buffer_strip_lowered_phosphorus() {
    let engine = HypothesisEngine::new();
    let cfg = TestConfig::default();

    let w = engine
        .wilcoxon_paired(&PHOSPHORUS_BEFORE, &PHOSPHORUS_AFTER, &cfg)
        .unwrap();
    // One site unchanged, two sites share |d| = 1.1.
    assert_eq!(w.details.n, 8);
    assert_eq!(w.details.n_zero, 1);
    assert_eq!(w.details.tie_groups, vec![2]);
    assert_eq!(w.method, PValueMethod::NormalApproximation);
    assert_abs_diff_eq!(w.details.w_plus, 36.0);
    assert_abs_diff_eq!(w.details.variance, 50.75);
    assert_abs_diff_eq!(w.p_value, 0.0140290609, epsilon = 1e-6);

    let s = engine
        .sign_test(
            &PHOSPHORUS_BEFORE
                .iter()
                .zip(&PHOSPHORUS_AFTER)
                .map(|(b, a)| b - a)
                .collect::<Vec<_>>(),
            0.0,
            &cfg,
        )
        .unwrap();
    assert_eq!(s.details.n_positive, 8);
    assert_eq!(s.details.n_zero, 1);
    assert_abs_diff_eq!(s.p_value, 2.0 / 256.0, epsilon = 1e-12);

    let t = engine
        .t_test_paired(&PHOSPHORUS_BEFORE, &PHOSPHORUS_AFTER, &cfg)
        .unwrap();
    assert!(t.details.statistic > 0.0);
    assert!(t.significant);
}

#[test]
fn bay_is_murkier_than_main_basin() {
    let engine = HypothesisEngine::new();
    let cfg = TestConfig::default();

    let mood = engine
        .mood_median_test(&SECCHI_BAY, &SECCHI_MAIN_BASIN, &cfg)
        .unwrap();
    assert_eq!(mood.details.table, [[10, 0], [0, 10]]);
    assert_abs_diff_eq!(mood.details.chi2, 20.0, epsilon = 1e-12);
    assert_abs_diff_eq!(mood.p_value, 7.744216e-6, epsilon = 1e-8);

    let mw = engine
        .mann_whitney_u(&SECCHI_BAY, &SECCHI_MAIN_BASIN, &cfg)
        .unwrap();
    assert_eq!(mw.details.u, 0.0);
    assert_abs_diff_eq!(mw.details.variance, 173.0263157895, epsilon = 1e-9);
    assert_abs_diff_eq!(mw.p_value, 0.00016780052, epsilon = 1e-7);
}

#[test]
fn sensor_rounding_keeps_equivalence_verdict() {
    let engine = HypothesisEngine::new();
    let raw = [7.012, 6.987, 7.034, 6.951, 7.008, 6.993, 7.021, 6.979];
    let cfg = TestConfig::default();
    let exact = engine.equivalence_test(&raw, 6.9, 7.1, &cfg).unwrap();
    let coarse = engine
        .equivalence_test(&rounded(&raw, 2), 6.9, 7.1, &cfg)
        .unwrap();
    assert!(exact.details.equivalent);
    assert_eq!(exact.details.equivalent, coarse.details.equivalent);
    assert_abs_diff_eq!(exact.details.mean, coarse.details.mean, epsilon = 0.005);
}

#[test]
fn report_rendering() {
    let engine = HypothesisEngine::new();
    let mood = engine
        .mood_median_test(&SECCHI_BAY, &SECCHI_MAIN_BASIN, &TestConfig::default())
        .unwrap();
    assert_eq!(mood.display_p_value(3), "< 0.001");
    assert_eq!(mood.test.to_string(), "Mood's median test");

    let json = serde_json::to_value(&mood).unwrap();
    assert_eq!(json["table"], serde_json::json!([[10, 0], [0, 10]]));
}
