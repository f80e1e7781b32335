//! Estimator registry and discovery scan.
//!
//! Estimator types are registered per module path, either as static
//! descriptors or through a module loader that builds them on demand.
//! A scan runs every loader, skips test modules and modules whose loader
//! fails or panics, deduplicates re-exports by type identity, applies the
//! exclusion lists and an optional role filter, and returns the survivors
//! sorted by name.
//!
//! Loaders run on every scan. Any side effects they have (lazy statics,
//! logging) happen each time `scan` or `discover` is called.

use anyhow::{anyhow, Result};
use std::any::{Any, TypeId};
use std::collections::HashSet;
use std::panic::{self, AssertUnwindSafe};
use tracing::{debug, warn};

use super::EstimatorDescriptor;
use crate::config::DiscoveryConfig;
use crate::types::{Role, TestkitError};

/// Produces the estimators exported by one module. An `Err` or a panic
/// marks the module as unloadable; the scan skips it and carries on.
pub type ModuleLoader = Box<dyn Fn() -> Result<Vec<EstimatorDescriptor>> + Send + Sync>;

struct ModuleEntry {
    path: String,
    loader: ModuleLoader,
}

/// Filters applied by a scan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DiscoveryOptions {
    /// Keep estimators that wrap another estimator.
    pub include_meta: bool,
    /// Keep estimators with no sensible default construction.
    pub include_other: bool,
    /// Keep only estimators carrying this role.
    pub role: Option<Role>,
}

/// A module the scan could not load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedModule {
    pub path: String,
    pub reason: String,
}

/// Result of a full scan.
#[derive(Debug, Clone)]
pub struct ScanReport {
    /// Discovered estimators, sorted by name.
    pub estimators: Vec<EstimatorDescriptor>,
    /// Modules whose loader failed, in registration order.
    pub skipped_modules: Vec<SkippedModule>,
}

impl ScanReport {
    pub fn names(&self) -> Vec<&str> {
        self.estimators.iter().map(|e| e.name()).collect()
    }
}

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

/// Central table of estimator-exporting modules.
pub struct EstimatorRegistry {
    config: DiscoveryConfig,
    modules: Vec<ModuleEntry>,
}

impl EstimatorRegistry {
    pub fn new(config: DiscoveryConfig) -> Self {
        Self {
            config,
            modules: Vec::new(),
        }
    }

    pub fn config(&self) -> &DiscoveryConfig {
        &self.config
    }

    /// Number of registered modules, test modules included.
    pub fn module_count(&self) -> usize {
        self.modules.len()
    }

    /// Register a module whose estimators are produced by `loader`.
    pub fn register_module<F>(&mut self, path: &str, loader: F) -> &mut Self
    where
        F: Fn() -> Result<Vec<EstimatorDescriptor>> + Send + Sync + 'static,
    {
        self.modules.push(ModuleEntry {
            path: path.to_string(),
            loader: Box::new(loader),
        });
        self
    }

    /// Register a single estimator exported from `path`.
    pub fn register(&mut self, path: &str, descriptor: EstimatorDescriptor) -> &mut Self {
        self.register_module(path, move || Ok(vec![descriptor.clone()]))
    }

    /// Whether `path` names a test module (any `::` or `.` separated
    /// segment equal to the configured test segment).
    pub fn is_test_module(&self, path: &str) -> bool {
        path.split("::")
            .flat_map(|part| part.split('.'))
            .any(|segment| segment == self.config.test_segment)
    }

    /// Discover estimators, parsing the role filter from text.
    ///
    /// Fails with `InvalidArgument` when `role_filter` is not one of
    /// `classifier`, `regressor`, `transformer`, `cluster`.
    pub fn discover(
        &self,
        include_meta: bool,
        include_other: bool,
        role_filter: Option<&str>,
    ) -> Result<Vec<EstimatorDescriptor>, TestkitError> {
        let role = role_filter.map(str::parse::<Role>).transpose()?;
        let options = DiscoveryOptions {
            include_meta,
            include_other,
            role,
        };
        Ok(self.all_estimators(&options))
    }

    /// Discover estimators with a typed role filter.
    pub fn all_estimators(&self, options: &DiscoveryOptions) -> Vec<EstimatorDescriptor> {
        self.scan(options).estimators
    }

    /// Run a full scan and report which modules were skipped.
    pub fn scan(&self, options: &DiscoveryOptions) -> ScanReport {
        let mut seen: HashSet<TypeId> = HashSet::new();
        let mut collected: Vec<EstimatorDescriptor> = Vec::new();
        let mut skipped_modules = Vec::new();

        for module in &self.modules {
            if self.is_test_module(&module.path) {
                debug!(module = %module.path, "Skipping test module");
                continue;
            }

            let outcome = panic::catch_unwind(AssertUnwindSafe(|| (module.loader)()))
                .unwrap_or_else(|payload| {
                    Err(anyhow!("loader panicked: {}", panic_message(&*payload)))
                });
            let exported = match outcome {
                Ok(exported) => exported,
                Err(e) => {
                    warn!(module = %module.path, error = %e, "Module failed to load, skipping");
                    skipped_modules.push(SkippedModule {
                        path: module.path.clone(),
                        reason: format!("{e:#}"),
                    });
                    continue;
                }
            };

            for descriptor in exported {
                if seen.insert(descriptor.type_id()) {
                    collected.push(descriptor);
                }
            }
        }

        let found = collected.len();
        let mut estimators: Vec<EstimatorDescriptor> = collected
            .into_iter()
            .filter(|d| d.name() != self.config.root_name)
            .filter(|d| !d.is_abstract())
            .filter(|d| options.include_other || !self.config.is_other(d.name()))
            .filter(|d| options.include_meta || !self.config.is_meta(d.name()))
            .filter(|d| options.role.map_or(true, |role| d.implements(role)))
            .collect();

        // Stable order keeps downstream test failures reproducible.
        estimators.sort_by(|a, b| {
            a.name()
                .cmp(b.name())
                .then_with(|| a.type_name().cmp(b.type_name()))
        });

        debug!(
            modules = self.modules.len(),
            skipped = skipped_modules.len(),
            found,
            kept = estimators.len(),
            role = ?options.role,
            "Estimator scan complete"
        );

        ScanReport {
            estimators,
            skipped_modules,
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("non-string panic payload")
}

impl Default for EstimatorRegistry {
    fn default() -> Self {
        Self::new(DiscoveryConfig::default())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
