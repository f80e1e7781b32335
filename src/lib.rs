//! estimator-testkit — test support for estimator libraries.
//!
//! Provides an estimator registry with discovery scans, parameter reset
//! helpers, assertion and warning-capture helpers, and a mock-injectable
//! dataset loader.

pub mod config;
pub mod types;
pub mod logging;
pub mod estimator;
pub mod testing;
pub mod datasets;

pub use estimator::{set_random_state, Estimator, EstimatorDescriptor, EstimatorRegistry};
pub use types::{ParamValue, Params, Role, RoleSet, TestkitError};
