//! Assertion helpers.
//!
//! Every helper panics on failure with a message naming both the actual
//! and the expected value, and is `#[track_caller]` so the panic points
//! at the calling test. Array helpers work on any `ndarray` storage and
//! check shapes before values; NaNs in the same position compare equal.

use ndarray::{ArrayBase, Data, Dimension};
use std::fmt::{Debug, Display};

fn with_msg(base: String, msg: Option<&str>) -> String {
    match msg {
        Some(m) => format!("{base}: {m}"),
        None => base,
    }
}

// ---------------------------------------------------------------------------
// Scalars and containers
// ---------------------------------------------------------------------------

/// Assert that `x` is an element of `container`.
#[track_caller]
pub fn assert_in<T: PartialEq + Debug>(x: &T, container: &[T]) {
    assert!(container.contains(x), "{x:?} in {container:?}");
}

/// Assert that `x` is not an element of `container`.
#[track_caller]
pub fn assert_not_in<T: PartialEq + Debug>(x: &T, container: &[T]) {
    assert!(!container.contains(x), "{x:?} not in {container:?}");
}

/// Assert `a < b`.
#[track_caller]
pub fn assert_less<T: PartialOrd + Debug>(a: T, b: T, msg: Option<&str>) {
    if !(a < b) {
        panic!("{}", with_msg(format!("{a:?} is not lower than {b:?}"), msg));
    }
}

/// Assert `a > b`.
#[track_caller]
pub fn assert_greater<T: PartialOrd + Debug>(a: T, b: T, msg: Option<&str>) {
    if !(a > b) {
        panic!("{}", with_msg(format!("{a:?} is not greater than {b:?}"), msg));
    }
}

fn almost_equal(actual: f64, desired: f64, decimal: i32) -> bool {
    if actual.is_nan() || desired.is_nan() {
        return actual.is_nan() && desired.is_nan();
    }
    if actual.is_infinite() || desired.is_infinite() {
        return actual == desired;
    }
    (actual - desired).abs() < 1.5 * 10f64.powi(-decimal)
}

/// Assert `|desired - actual| < 1.5 * 10^-decimal`.
#[track_caller]
pub fn assert_almost_equal(actual: f64, desired: f64, decimal: i32) {
    if !almost_equal(actual, desired, decimal) {
        panic!(
            "Values are not almost equal to {decimal} decimals: actual {actual}, desired {desired}"
        );
    }
}

/// Assert that `result` is an error whose message contains `message`.
#[track_caller]
pub fn assert_raise_message<T: Debug, E: Display>(result: Result<T, E>, message: &str) {
    match result {
        Ok(value) => panic!("Should have raised an error containing {message:?}, got Ok({value:?})"),
        Err(e) => {
            let error_message = e.to_string();
            assert!(
                error_message.contains(message),
                "{message:?} in {error_message:?}"
            );
        }
    }
}

// ---------------------------------------------------------------------------
// Arrays
// ---------------------------------------------------------------------------

#[track_caller]
fn check_shapes<S1, S2, D>(what: &str, actual: &ArrayBase<S1, D>, desired: &ArrayBase<S2, D>)
where
    S1: Data,
    S2: Data,
    D: Dimension,
{
    if actual.shape() != desired.shape() {
        panic!(
            "{what}: shape mismatch: actual {:?}, desired {:?}",
            actual.shape(),
            desired.shape()
        );
    }
}

/// Compare element-wise and panic with the first mismatch and the
/// mismatch count.
#[track_caller]
fn compare_arrays<S1, S2, A, D, F>(
    what: &str,
    actual: &ArrayBase<S1, D>,
    desired: &ArrayBase<S2, D>,
    ok: F,
) where
    S1: Data<Elem = A>,
    S2: Data<Elem = A>,
    A: Debug,
    D: Dimension,
    F: Fn(&A, &A) -> bool,
{
    check_shapes(what, actual, desired);

    let mut mismatches = 0usize;
    let mut first = None;
    for ((idx, a), d) in actual.indexed_iter().zip(desired.iter()) {
        if !ok(a, d) {
            mismatches += 1;
            if first.is_none() {
                first = Some(format!("at {idx:?}: actual {a:?}, desired {d:?}"));
            }
        }
    }

    if let Some(first) = first {
        panic!(
            "{what}: {mismatches} of {} elements differ, first {first}\n actual: {actual:?}\n desired: {desired:?}",
            actual.len()
        );
    }
}

/// Assert that two arrays have the same shape and identical elements.
#[track_caller]
pub fn assert_array_equal<S1, S2, A, D>(actual: &ArrayBase<S1, D>, desired: &ArrayBase<S2, D>)
where
    S1: Data<Elem = A>,
    S2: Data<Elem = A>,
    A: PartialEq + Debug + 'static,
    D: Dimension,
{
    compare_arrays("Arrays are not equal", actual, desired, |a, d| {
        a == d || (is_nan(a) && is_nan(d))
    });
}

fn is_nan<A: 'static>(value: &A) -> bool {
    let any = value as &dyn std::any::Any;
    match (any.downcast_ref::<f64>(), any.downcast_ref::<f32>()) {
        (Some(v), _) => v.is_nan(),
        (_, Some(v)) => v.is_nan(),
        _ => false,
    }
}

/// Assert element-wise `|desired - actual| < 1.5 * 10^-decimal`.
#[track_caller]
pub fn assert_array_almost_equal<S1, S2, D>(
    actual: &ArrayBase<S1, D>,
    desired: &ArrayBase<S2, D>,
    decimal: i32,
) where
    S1: Data<Elem = f64>,
    S2: Data<Elem = f64>,
    D: Dimension,
{
    let what = format!("Arrays are not almost equal to {decimal} decimals");
    compare_arrays(&what, actual, desired, |a, d| almost_equal(*a, *d, decimal));
}

/// Assert element-wise `|actual - desired| <= atol + rtol * |desired|`.
#[track_caller]
pub fn assert_allclose<S1, S2, D>(
    actual: &ArrayBase<S1, D>,
    desired: &ArrayBase<S2, D>,
    rtol: f64,
    atol: f64,
) where
    S1: Data<Elem = f64>,
    S2: Data<Elem = f64>,
    D: Dimension,
{
    let what = format!("Not equal to tolerance rtol={rtol}, atol={atol}");
    compare_arrays(&what, actual, desired, |a, d| {
        if a.is_nan() || d.is_nan() {
            return a.is_nan() && d.is_nan();
        }
        if a.is_infinite() || d.is_infinite() {
            return a == d;
        }
        (a - d).abs() <= atol + rtol * d.abs()
    });
}

/// Assert element-wise `actual < desired`.
#[track_caller]
pub fn assert_array_less<S1, S2, A, D>(actual: &ArrayBase<S1, D>, desired: &ArrayBase<S2, D>)
where
    S1: Data<Elem = A>,
    S2: Data<Elem = A>,
    A: PartialOrd + Debug,
    D: Dimension,
{
    compare_arrays("Arrays are not less-ordered", actual, desired, |a, d| a < d);
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
