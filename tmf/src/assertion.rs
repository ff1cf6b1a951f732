//! Equality assertion with a readable failure.

use std::fmt::Display;

use thiserror::Error;

/// Raised by [assert_equals] when the compared values differ.
///
/// Both values are captured using their [Display] rendering at the moment of the mismatch.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Expected {actual} to equal {expected}")]
pub struct AssertionFailed {
    actual: String,
    expected: String,
}

impl AssertionFailed {
    /// Create a new failure from the two compared values.
    pub fn new<A: Display, E: Display>(actual: A, expected: E) -> Self {
        Self {
            actual: actual.to_string(),
            expected: expected.to_string(),
        }
    }

    /// Rendering of the actual value
    pub fn actual(&self) -> &str {
        &self.actual
    }

    /// Rendering of the expected value
    pub fn expected(&self) -> &str {
        &self.expected
    }
}

/// Check that `actual` equals `expected`.
///
/// Returns `Ok(true)` when they are equal, an [AssertionFailed] carrying both values otherwise.
pub fn assert_equals<A, E>(actual: A, expected: E) -> Result<bool, AssertionFailed>
where
    A: PartialEq<E> + Display,
    E: Display,
{
    if actual == expected {
        Ok(true)
    } else {
        Err(AssertionFailed::new(actual, expected))
    }
}

/// Panic with the [AssertionFailed] message if the two values differ.
///
/// ```
/// tmf::assert_equals!(1 + 1, 2);
/// ```
///
/// ```should_panic
/// tmf::assert_equals!("bar", "baz"); // panics with "Expected bar to equal baz"
/// ```
#[macro_export]
macro_rules! assert_equals {
    ( $actual:expr, $expected:expr ) => {
        if let Err(error) = $crate::assert_equals($actual, $expected) {
            panic!("{error}");
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equal_values_return_true() {
        assert_eq!(Ok(true), assert_equals(42, 42));
        assert_eq!(Ok(true), assert_equals("bar", "bar"));
        assert_eq!(Ok(true), assert_equals("bar".to_string(), "bar"));
    }

    #[test]
    fn different_values_fail_with_both_values() {
        let error = assert_equals(1, 2).unwrap_err();

        assert_eq!("1", error.actual());
        assert_eq!("2", error.expected());
    }

    #[test]
    fn failure_message_uses_display_rendering() {
        let error = assert_equals("bar", "baz").unwrap_err();
        assert_eq!("Expected bar to equal baz", error.to_string());

        let error = assert_equals(1.5, 2.0).unwrap_err();
        assert_eq!("Expected 1.5 to equal 2", error.to_string());
    }

    #[test]
    fn failure_converts_into_std_error() {
        let error: crate::StdError = assert_equals(3, 4).unwrap_err().into();

        assert_eq!(
            Some(&AssertionFailed::new(3, 4)),
            error.downcast_ref::<AssertionFailed>()
        );
    }

    #[test]
    fn macro_does_not_panic_on_equal_values() {
        crate::assert_equals!(vec![1, 2].len(), 2usize);
    }

    #[test]
    #[should_panic(expected = "Expected 1 to equal 2")]
    fn macro_panics_with_failure_message() {
        crate::assert_equals!(1, 2);
    }
}
