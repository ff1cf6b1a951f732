#![warn(missing_docs)]

//! Tiny test helpers.
//!
//! Provide:
//! - An equality check, [assert_equals], failing with a readable [AssertionFailed].
//! - Replaceable per-instance [operations][Operation] that production types expose as fields.
//! - A scoped [stub] that overrides one operation of one target for the duration of an action,
//!   then restores it, optionally checking that the override was invoked (spy).
//!
//! ```
//! use tmf::{Operation, StubOptions, stub};
//!
//! #[derive(Debug)]
//! struct Foo {
//!     bar: Operation<(), &'static str>,
//! }
//!
//! let foo = Foo {
//!     bar: Operation::new("bar", |()| "bar"),
//! };
//!
//! let inside = stub(&foo, |foo| &foo.bar, "baz", StubOptions::default().spy(), |foo| {
//!     Ok(foo.bar.call(())?)
//! })
//! .unwrap();
//!
//! assert_eq!("baz", inside);
//! assert_eq!("bar", foo.bar.call(()).unwrap());
//! ```

mod assertion;
mod operation;
mod stub;

#[cfg(test)]
pub(crate) mod test_utils;

pub use assertion::{AssertionFailed, assert_equals};
pub use operation::{Implementation, Operation, OperationError};
pub use stub::{ExpectationNotMet, StubGuard, StubOptions, stub};

/// Generic error type
pub type StdError = anyhow::Error;

/// Generic result type
pub type StdResult<T> = anyhow::Result<T, StdError>;
