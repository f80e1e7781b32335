//! Test helpers: assertions and warning capture.

pub mod assertions;
pub mod warnings;

pub use assertions::{
    assert_allclose, assert_almost_equal, assert_array_almost_equal, assert_array_equal,
    assert_array_less, assert_greater, assert_in, assert_less, assert_not_in,
    assert_raise_message,
};
pub use warnings::{assert_no_warnings, assert_warns, catch_warnings, CapturedWarning};
