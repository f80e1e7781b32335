//! Estimator capability contract.
//!
//! Defines the `Estimator` trait (parameter introspection and setting),
//! the `EstimatorDescriptor` that registers a type under a name with its
//! role tags, and the `set_random_state` parameter-reset helper.

pub mod registry;

use std::any::{type_name, TypeId};
use std::fmt;
use tracing::{debug, warn};

use crate::types::{ParamValue, Params, Role, RoleSet, TestkitError};

pub use registry::{DiscoveryOptions, EstimatorRegistry, ScanReport, SkippedModule};

/// Parameter that seeds an estimator's random number generator.
pub const RANDOM_STATE: &str = "random_state";

/// Abstraction over every estimator under test.
///
/// Implementors expose their hyper-parameters by name and accept updates
/// to a subset of them.
pub trait Estimator: fmt::Debug + Send + Sync {
    /// Type name used in error messages.
    fn name(&self) -> &str;

    /// Current hyper-parameters.
    fn get_params(&self) -> Params;

    /// Update the named parameters. Unknown keys are an error and leave
    /// the estimator unchanged.
    fn set_params(&mut self, params: Params) -> Result<(), TestkitError>;

    /// Update a single parameter.
    fn set_param(&mut self, key: &str, value: ParamValue) -> Result<(), TestkitError> {
        let mut params = Params::new();
        params.insert(key.to_string(), value);
        self.set_params(params)
    }
}

/// Builds a fresh, default-configured estimator.
pub type Constructor = fn() -> Box<dyn Estimator>;

fn construct<T: Estimator + Default + 'static>() -> Box<dyn Estimator> {
    Box::new(T::default())
}

// ---------------------------------------------------------------------------
// Descriptor
// ---------------------------------------------------------------------------

/// A registered estimator type: its public name, a handle for
/// instantiation, and the roles it supports.
#[derive(Clone)]
pub struct EstimatorDescriptor {
    name: String,
    type_name: &'static str,
    type_id: TypeId,
    roles: RoleSet,
    constructor: Option<Constructor>,
}

impl EstimatorDescriptor {
    /// Describe a constructible estimator type.
    pub fn concrete<T: Estimator + Default + 'static>(name: &str, roles: &[Role]) -> Self {
        Self {
            name: name.to_string(),
            type_name: type_name::<T>(),
            type_id: TypeId::of::<T>(),
            roles: RoleSet::of(roles),
            constructor: Some(construct::<T>),
        }
    }

    /// Describe an abstract type: it declares the estimator capability but
    /// cannot be instantiated. Scans always drop it.
    pub fn abstract_type<T: 'static>(name: &str, roles: &[Role]) -> Self {
        Self {
            name: name.to_string(),
            type_name: type_name::<T>(),
            type_id: TypeId::of::<T>(),
            roles: RoleSet::of(roles),
            constructor: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Fully qualified Rust type name.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Identity of the underlying type. Two descriptors with the same id
    /// describe the same type, whatever path they were registered under.
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    pub fn roles(&self) -> &RoleSet {
        &self.roles
    }

    pub fn implements(&self, role: Role) -> bool {
        self.roles.contains(role)
    }

    pub fn is_abstract(&self) -> bool {
        self.constructor.is_none()
    }

    /// Build a default-configured instance, or `None` for abstract types.
    pub fn instantiate(&self) -> Option<Box<dyn Estimator>> {
        self.constructor.map(|ctor| ctor())
    }
}

impl fmt::Debug for EstimatorDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EstimatorDescriptor")
            .field("name", &self.name)
            .field("type_name", &self.type_name)
            .field("roles", &self.roles)
            .field("abstract", &self.is_abstract())
            .finish()
    }
}

impl fmt::Display for EstimatorDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]", self.name, self.roles)
    }
}

// ---------------------------------------------------------------------------
// Parameter reset
// ---------------------------------------------------------------------------

/// Set `random_state` to `seed` when the estimator has that parameter.
///
/// Estimators without the parameter are left untouched. Never fails: a
/// rejected update is logged and ignored.
pub fn set_random_state(estimator: &mut dyn Estimator, seed: i64) {
    if !estimator.get_params().contains_key(RANDOM_STATE) {
        return;
    }

    match estimator.set_param(RANDOM_STATE, ParamValue::Int(seed)) {
        Ok(()) => debug!(estimator = estimator.name(), seed, "random_state set"),
        Err(e) => warn!(
            estimator = estimator.name(),
            error = %e,
            "Estimator rejected random_state update"
        ),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
