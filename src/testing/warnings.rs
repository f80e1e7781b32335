//! Warning capture.
//!
//! Code under test reports warnings as `tracing` events at WARN level,
//! optionally tagging them with a `category` field:
//!
//! ```ignore
//! tracing::warn!(category = "ConvergenceWarning", "max_iter reached");
//! ```
//!
//! The helpers here install a thread-local capturing subscriber for the
//! duration of a closure and inspect what it recorded. Events without a
//! `category` field are categorised by their target.

use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer};
use tracing_subscriber::prelude::*;

/// A warning recorded while a closure ran.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedWarning {
    pub category: String,
    pub message: String,
    pub target: String,
}

impl fmt::Display for CapturedWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.category, self.message)
    }
}

#[derive(Default)]
struct WarningVisitor {
    category: Option<String>,
    message: Option<String>,
}

impl Visit for WarningVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        match field.name() {
            "category" => self.category = Some(value.to_string()),
            "message" => self.message = Some(value.to_string()),
            _ => {}
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        match field.name() {
            "category" => self.category = Some(format!("{value:?}")),
            "message" => self.message = Some(format!("{value:?}")),
            _ => {}
        }
    }
}

struct CaptureLayer {
    records: Arc<Mutex<Vec<CapturedWarning>>>,
}

impl<S: Subscriber> Layer<S> for CaptureLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let meta = event.metadata();
        if *meta.level() != Level::WARN {
            return;
        }

        let mut visitor = WarningVisitor::default();
        event.record(&mut visitor);

        let warning = CapturedWarning {
            category: visitor.category.unwrap_or_else(|| meta.target().to_string()),
            message: visitor.message.unwrap_or_default(),
            target: meta.target().to_string(),
        };
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(warning);
    }
}

/// Run `f`, recording every warning it emits on the current thread.
pub fn catch_warnings<T, F: FnOnce() -> T>(f: F) -> (T, Vec<CapturedWarning>) {
    let records = Arc::new(Mutex::new(Vec::new()));
    let subscriber = tracing_subscriber::registry().with(CaptureLayer {
        records: records.clone(),
    });

    let result = tracing::subscriber::with_default(subscriber, f);

    let warnings = std::mem::take(&mut *records.lock().unwrap_or_else(PoisonError::into_inner));
    (result, warnings)
}

/// Run `f` and assert that its first warning has category `category`.
///
/// Panics when no warning is emitted or the first one has another category.
#[track_caller]
pub fn assert_warns<T, F: FnOnce() -> T>(category: &str, f: F) -> T {
    let (result, warnings) = catch_warnings(f);

    match warnings.first() {
        None => panic!("No warning raised, expected {category}"),
        Some(first) if first.category != category => {
            panic!("First warning is not a {category} (is {first})")
        }
        Some(_) => result,
    }
}

/// Run `f` and assert that it emits no warnings.
#[track_caller]
pub fn assert_no_warnings<T, F: FnOnce() -> T>(f: F) -> T {
    let (result, warnings) = catch_warnings(f);

    if !warnings.is_empty() {
        let listed: Vec<String> = warnings.iter().map(ToString::to_string).collect();
        panic!("Got warnings: [{}]", listed.join(", "));
    }
    result
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
