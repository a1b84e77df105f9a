use limno_stats::{
    EngineConfig, HypothesisEngine, InputPolicy, ProviderRegistry, StatsError, TestConfig,
};
use std::sync::Arc;
use tests::*;

fn strict() -> HypothesisEngine {
    HypothesisEngine::with_registry(Arc::new(ProviderRegistry::detect()), EngineConfig::strict())
}

#[test]
fn dashboard_mode_renders_bad_parameters_as_insufficient() {
    let _ = env_logger::builder().is_test(true).try_init();
    let engine = HypothesisEngine::new();
    assert_eq!(engine.config().input_policy, InputPolicy::Lenient);
    let cfg = TestConfig::default();

    let dropout = [f64::NAN, 2.2, 2.4];
    let results = [
        engine.t_test_one_sample(&dropout, 2.0, &cfg).unwrap().p_value,
        engine.wilcoxon_signed_rank(&dropout, 2.0, &cfg).unwrap().p_value,
        engine.sign_test(&dropout, 2.0, &cfg).unwrap().p_value,
        engine
            .mann_whitney_u(&dropout, &SECCHI_BAY, &cfg)
            .unwrap()
            .p_value,
        engine
            .mood_median_test(&SECCHI_BAY, &[], &cfg)
            .unwrap()
            .p_value,
    ];
    assert!(results.iter().all(|p| p.is_nan()));
}

#[test]
fn automated_mode_fails_fast() {
    let cfg = TestConfig::default();
    assert!(matches!(
        strict().mann_whitney_u(&SECCHI_BAY, &[], &cfg),
        Err(StatsError::InsufficientData {
            required: 1,
            actual: 0,
            ..
        })
    ));
    assert!(matches!(
        strict().wilcoxon_paired(&PHOSPHORUS_BEFORE, &PHOSPHORUS_AFTER[..4], &cfg),
        Err(StatsError::LengthMismatch { left: 9, right: 4, .. })
    ));
    assert!(matches!(
        strict().t_test_student(&JULY_TEMP_2023, &[22.0, f64::INFINITY], &cfg),
        Err(StatsError::NonFiniteInput { index: 1, .. })
    ));
}

#[test]
fn degenerate_data_is_not_an_error_in_either_mode() {
    let flat = [4.0; 6];
    let cfg = TestConfig::default();
    for engine in [HypothesisEngine::new(), strict()] {
        let t = engine.t_test_one_sample(&flat, 3.0, &cfg).unwrap();
        assert!(t.degenerate);
        assert_eq!(t.p_value, 1.0);
        let w = engine.wilcoxon_signed_rank(&flat, 4.0, &cfg).unwrap();
        assert!(w.degenerate);
        assert!(!w.significant);
    }
}

#[test]
fn configuration_errors_ignore_policy() {
    for alpha in [0.0, 1.0, f64::NAN] {
        let cfg = TestConfig {
            alpha,
            ..TestConfig::default()
        };
        assert!(HypothesisEngine::new()
            .sign_test(&SECCHI_BAY, 2.0, &cfg)
            .is_err());
    }
    assert_eq!(
        TestConfig::two_sided(1.2).unwrap_err(),
        StatsError::InvalidAlpha(1.2)
    );
}
