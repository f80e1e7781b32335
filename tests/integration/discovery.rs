//! Registry scans over the fixture catalog.

use estimator_testkit::config::DiscoveryConfig;
use estimator_testkit::estimator::{DiscoveryOptions, RANDOM_STATE};
use estimator_testkit::logging::init_logging;
use estimator_testkit::testing::{assert_in, assert_not_in, assert_raise_message};
use estimator_testkit::{set_random_state, EstimatorDescriptor, ParamValue, Role, TestkitError};

use crate::fixtures;

fn names(list: &[EstimatorDescriptor]) -> Vec<String> {
    list.iter().map(|d| d.name().to_string()).collect()
}

#[test]
fn test_default_discovery() {
    init_logging();
    let found = fixtures::registry().discover(false, false, None).unwrap();
    assert_eq!(
        names(&found),
        vec![
            "DecisionTreeClassifier",
            "KMeans",
            "LinearRegression",
            "LogisticRegression",
            "PCA",
            "RandomForestClassifier",
            "Ridge",
            "StandardScaler",
        ]
    );
}

#[test]
fn test_discovery_is_deterministic() {
    let reg = fixtures::registry();
    for (meta, other) in [(false, false), (true, false), (false, true), (true, true)] {
        let first = names(&reg.discover(meta, other, None).unwrap());
        let second = names(&reg.discover(meta, other, None).unwrap());
        assert_eq!(first, second);

        let mut sorted = first.clone();
        sorted.sort();
        assert_eq!(first, sorted);
    }
}

#[test]
fn test_exclusion_sets_honoured() {
    let reg = fixtures::registry();
    let config = DiscoveryConfig::default();

    let found = names(&reg.discover(false, false, None).unwrap());
    for name in config.meta_estimators.iter().chain(config.other.iter()) {
        assert_not_in(name, &found);
    }

    let with_meta = names(&reg.discover(true, false, None).unwrap());
    assert_in(&"OneVsRestClassifier".to_string(), &with_meta);
    for name in &config.other {
        assert_not_in(name, &with_meta);
    }

    let with_other = names(&reg.discover(false, true, None).unwrap());
    assert_in(&"Pipeline".to_string(), &with_other);
    assert_in(&"GridSearchCV".to_string(), &with_other);
    for name in &config.meta_estimators {
        assert_not_in(name, &with_other);
    }
}

#[test]
fn test_abstract_root_and_test_types_never_returned() {
    let found = fixtures::registry().discover(true, true, None).unwrap();
    let found_names = names(&found);
    for hidden in ["LinearModel", "BaseEnsemble", "BaseEstimator", "FakeEstimator"] {
        assert_not_in(&hidden.to_string(), &found_names);
    }
    assert!(found.iter().all(|d| !d.is_abstract()));
}

#[test]
fn test_every_result_honours_the_contract() {
    let found = fixtures::registry().discover(true, true, None).unwrap();
    for descriptor in &found {
        let mut estimator = descriptor
            .instantiate()
            .unwrap_or_else(|| panic!("{} is not constructible", descriptor.name()));
        let params = estimator.get_params();
        estimator.set_params(params.clone()).unwrap();
        assert_eq!(estimator.get_params(), params, "{}", descriptor.name());
    }
}

#[test]
fn test_role_filters() {
    let reg = fixtures::registry();
    let cases = [
        (
            "classifier",
            vec!["DecisionTreeClassifier", "LogisticRegression", "RandomForestClassifier"],
        ),
        ("regressor", vec!["LinearRegression", "Ridge"]),
        ("transformer", vec!["KMeans", "PCA", "StandardScaler"]),
        ("cluster", vec!["KMeans"]),
    ];

    for (filter, expected) in cases {
        let found = reg.discover(false, false, Some(filter)).unwrap();
        assert_eq!(names(&found), expected, "role filter {filter}");

        let role: Role = filter.parse().unwrap();
        assert!(found.iter().all(|d| d.implements(role)));
    }
}

#[test]
fn test_role_filter_with_meta() {
    let reg = fixtures::registry();
    let found = reg
        .all_estimators(&DiscoveryOptions {
            include_meta: true,
            include_other: false,
            role: Some(Role::Classifier),
        });
    assert_in(&"OneVsRestClassifier".to_string(), &names(&found));
}

#[test]
fn test_invalid_role_filter_names_allowed_values() {
    let reg = fixtures::registry();
    assert_raise_message(
        reg.discover(false, false, Some("outlier_detector")),
        "classifier, regressor, transformer, cluster",
    );
    assert!(matches!(
        reg.discover(false, false, Some("")),
        Err(TestkitError::InvalidArgument { .. })
    ));
}

#[test]
fn test_unloadable_module_is_reported_not_fatal() {
    let report = fixtures::registry().scan(&DiscoveryOptions::default());
    assert_eq!(report.estimators.len(), 8);
    assert_eq!(report.skipped_modules.len(), 1);
    assert_eq!(report.skipped_modules[0].path, "learn::gpu");
    assert!(report.skipped_modules[0].reason.contains("CUDA"));
}

#[test]
fn test_custom_exclusions_from_config() {
    let config = DiscoveryConfig {
        meta_estimators: vec![],
        other: vec!["Ridge".into()],
        ..DiscoveryConfig::default()
    };
    let found = names(&fixtures::registry_with(config).discover(false, false, None).unwrap());
    assert_in(&"OneVsRestClassifier".to_string(), &found);
    assert_in(&"Pipeline".to_string(), &found);
    assert_not_in(&"Ridge".to_string(), &found);
}

#[test]
fn test_set_random_state_across_catalog() {
    let found = fixtures::registry().discover(false, false, None).unwrap();
    for descriptor in &found {
        let mut estimator = descriptor.instantiate().unwrap();
        let before = estimator.get_params();
        set_random_state(estimator.as_mut(), 42);
        let after = estimator.get_params();

        if before.contains_key(RANDOM_STATE) {
            assert_eq!(after[RANDOM_STATE], ParamValue::Int(42), "{}", descriptor.name());
            let mut rest = after.clone();
            rest.insert(RANDOM_STATE.to_string(), before[RANDOM_STATE].clone());
            assert_eq!(rest, before);
        } else {
            assert_eq!(after, before, "{}", descriptor.name());
        }
    }
}
