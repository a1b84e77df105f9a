#![cfg(feature = "serde")]

use limno_stats::{
    Alternative, EngineConfig, HypothesisEngine, InputPolicy, MannWhitneyMethod, TestConfig,
};
use pretty_assertions::assert_eq;
use serde_json::json;

#[test]
fn alternative_uses_kebab_case() {
    assert_eq!(
        serde_json::to_value(Alternative::TwoSided).unwrap(),
        json!("two-sided")
    );
    let alt: Alternative = serde_json::from_value(json!("less")).unwrap();
    assert_eq!(alt, Alternative::Less);
    assert!(serde_json::from_value::<Alternative>(json!("both")).is_err());
}

#[test]
fn engine_config_loads_from_partial_settings() {
    let cfg: EngineConfig = serde_json::from_value(json!({
        "input_policy": "strict",
        "mann_whitney_method": "asymptotic"
    }))
    .unwrap();
    assert_eq!(cfg.input_policy, InputPolicy::Strict);
    assert_eq!(cfg.mann_whitney_method, MannWhitneyMethod::Asymptotic);
    assert_eq!(cfg.exact_threshold, EngineConfig::default().exact_threshold);
}

#[test]
fn result_flattens_details() {
    let engine = HypothesisEngine::without_providers();
    let r = engine
        .sign_test(&[1.0, 2.0, 3.0, -1.0], 0.0, &TestConfig::default())
        .unwrap();
    let value = serde_json::to_value(&r).unwrap();
    assert_eq!(value["test"], json!("sign-test"));
    assert_eq!(value["method"], json!("exact-binomial"));
    assert_eq!(value["alternative"], json!("two-sided"));
    assert_eq!(value["n_positive"], json!(3));
    assert_eq!(value["n_negative"], json!(1));
    assert_eq!(value["degenerate"], json!(false));
}

#[test]
fn test_config_defaults_missing_fields() {
    let cfg: TestConfig = serde_json::from_value(json!({ "alternative": "greater" })).unwrap();
    assert_eq!(cfg, TestConfig::default().with_alternative(Alternative::Greater));
}

#[test]
fn insufficient_result_serialises_nan_as_null() {
    let r = HypothesisEngine::without_providers()
        .t_test_one_sample(&[4.2], 4.0, &TestConfig::default())
        .unwrap();
    let value = serde_json::to_value(&r).unwrap();
    assert_eq!(value["p_value"], serde_json::Value::Null);
    assert_eq!(value["statistic"], serde_json::Value::Null);
    assert_eq!(value["significant"], json!(false));
    assert_eq!(value["method"], json!("undefined"));
}
