//! Fixture estimator catalog.
//!
//! Toy estimators with realistic parameter sets, registered under module
//! paths the way an estimator library would export them: re-exports at the
//! crate root, an abstract base, meta-estimators, composites, a test
//! module, and an optional backend that fails to load.

use anyhow::anyhow;

use estimator_testkit::config::DiscoveryConfig;
use estimator_testkit::{
    Estimator, EstimatorDescriptor, EstimatorRegistry, ParamValue, Params, Role, TestkitError,
};

/// Defines a struct whose fields are its parameters, with a `Default`
/// built from the listed initial values.
macro_rules! estimator {
    ($ty:ident { $($field:ident : $default:expr),* $(,)? }) => {
        #[derive(Debug, Clone)]
        pub struct $ty {
            $(pub $field: ParamValue,)*
        }

        impl Default for $ty {
            fn default() -> Self {
                Self { $($field: ParamValue::from($default),)* }
            }
        }

        impl Estimator for $ty {
            fn name(&self) -> &str {
                stringify!($ty)
            }

            #[allow(unused_mut)]
            fn get_params(&self) -> Params {
                let mut params = Params::new();
                $(params.insert(stringify!($field).to_string(), self.$field.clone());)*
                params
            }

            #[allow(unused_mut, unused_variables)]
            fn set_params(&mut self, params: Params) -> Result<(), TestkitError> {
                let mut updated = self.clone();
                for (key, value) in params {
                    match key.as_str() {
                        $(stringify!($field) => updated.$field = value,)*
                        _ => {
                            return Err(TestkitError::UnknownParameter {
                                estimator: stringify!($ty).to_string(),
                                parameter: key,
                            })
                        }
                    }
                }
                *self = updated;
                Ok(())
            }
        }
    };
}

estimator!(LinearRegression { fit_intercept: true, normalize: false });
estimator!(Ridge { alpha: 1.0, solver: "auto", random_state: None::<i64> });
estimator!(LogisticRegression { penalty: "l2", c: 1.0, random_state: None::<i64> });
estimator!(KMeans { n_clusters: 8_i64, n_init: 10_i64, random_state: None::<i64> });
estimator!(StandardScaler { with_mean: true, with_std: true });
estimator!(Pca { n_components: None::<i64>, whiten: false, random_state: None::<i64> });
estimator!(DecisionTreeClassifier { max_depth: None::<i64>, random_state: None::<i64> });
estimator!(Pipeline { steps: "" });
estimator!(GridSearchCV { param_grid: "", cv: 3_i64 });
estimator!(OneVsRestClassifier { estimator: None::<i64> });
estimator!(RandomForestClassifier { n_estimators: 10_i64, random_state: None::<i64> });
estimator!(FakeEstimator { arg: 0_i64 });
estimator!(BaseEstimator {});

/// Declares the capability but has no implementation of its own.
pub struct LinearModel;
/// Abstract ensemble base, listed among the meta-estimators.
pub struct BaseEnsemble;

pub fn registry() -> EstimatorRegistry {
    registry_with(DiscoveryConfig::default())
}

pub fn registry_with(config: DiscoveryConfig) -> EstimatorRegistry {
    let mut reg = EstimatorRegistry::new(config);
    reg.register(
        "learn::base",
        EstimatorDescriptor::concrete::<BaseEstimator>("BaseEstimator", &[]),
    )
    .register_module("learn::linear_model", || {
        Ok(vec![
            EstimatorDescriptor::abstract_type::<LinearModel>("LinearModel", &[Role::Regressor]),
            EstimatorDescriptor::concrete::<LinearRegression>(
                "LinearRegression",
                &[Role::Regressor],
            ),
            EstimatorDescriptor::concrete::<Ridge>("Ridge", &[Role::Regressor]),
            EstimatorDescriptor::concrete::<LogisticRegression>(
                "LogisticRegression",
                &[Role::Classifier],
            ),
        ])
    })
    .register_module("learn::cluster", || {
        Ok(vec![EstimatorDescriptor::concrete::<KMeans>(
            "KMeans",
            &[Role::Cluster, Role::Transformer],
        )])
    })
    .register_module("learn::preprocessing", || {
        Ok(vec![EstimatorDescriptor::concrete::<StandardScaler>(
            "StandardScaler",
            &[Role::Transformer],
        )])
    })
    .register_module("learn::decomposition", || {
        Ok(vec![EstimatorDescriptor::concrete::<Pca>("PCA", &[Role::Transformer])])
    })
    .register_module("learn::tree", || {
        Ok(vec![EstimatorDescriptor::concrete::<DecisionTreeClassifier>(
            "DecisionTreeClassifier",
            &[Role::Classifier],
        )])
    })
    .register_module("learn::ensemble", || {
        Ok(vec![
            EstimatorDescriptor::abstract_type::<BaseEnsemble>("BaseEnsemble", &[]),
            EstimatorDescriptor::concrete::<RandomForestClassifier>(
                "RandomForestClassifier",
                &[Role::Classifier],
            ),
        ])
    })
    .register_module("learn::pipeline", || {
        Ok(vec![EstimatorDescriptor::concrete::<Pipeline>("Pipeline", &[])])
    })
    .register_module("learn::grid_search", || {
        Ok(vec![EstimatorDescriptor::concrete::<GridSearchCV>(
            "GridSearchCV",
            &[],
        )])
    })
    .register_module("learn::multiclass", || {
        Ok(vec![EstimatorDescriptor::concrete::<OneVsRestClassifier>(
            "OneVsRestClassifier",
            &[Role::Classifier],
        )])
    })
    .register_module("learn::tests::test_base", || {
        Ok(vec![EstimatorDescriptor::concrete::<FakeEstimator>(
            "FakeEstimator",
            &[Role::Classifier],
        )])
    })
    .register_module("learn::gpu", || Err(anyhow!("CUDA runtime not available")))
    // crate-root re-exports of types already registered above
    .register_module("learn", || {
        Ok(vec![
            EstimatorDescriptor::concrete::<LinearRegression>(
                "LinearRegression",
                &[Role::Regressor],
            ),
            EstimatorDescriptor::concrete::<KMeans>("KMeans", &[Role::Cluster, Role::Transformer]),
        ])
    });
    reg
}
