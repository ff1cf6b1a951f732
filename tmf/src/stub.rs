//! # Stub
//!
//! Temporarily override one [Operation] of one target with a fixed return value.
//!
//! The override is installed by a [StubGuard] which restores the previous state when it is
//! restored explicitly or dropped, including while unwinding from a panic. Restoring puts the
//! original implementation back if there was one, or leaves the operation unsupported again.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::Context;
use slog::{Logger, debug, warn};
use thiserror::Error;

use crate::{Implementation, Operation, OperationError, StdResult};

/// Raised by a spying [stub] when the stubbed operation was never invoked.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Expected {target} to receive '{operation}' but it was never invoked")]
pub struct ExpectationNotMet {
    target: String,
    operation: String,
}

impl ExpectationNotMet {
    /// Create a new failure for the given target and operation name.
    pub fn new<T: fmt::Debug + ?Sized>(target: &T, operation: &str) -> Self {
        Self {
            target: format!("{target:?}"),
            operation: operation.to_string(),
        }
    }

    /// Debug rendering of the stubbed target
    pub fn target(&self) -> &str {
        &self.target
    }

    /// Name of the operation that was expected to be invoked
    pub fn operation(&self) -> &str {
        &self.operation
    }
}

/// Options of a [stub] call.
#[derive(Debug, Clone)]
pub struct StubOptions {
    spy: bool,
    logger: Logger,
}

impl StubOptions {
    /// Require the stubbed operation to be invoked at least once.
    pub fn spy(self) -> Self {
        self.with_spy(true)
    }

    /// Set whether the stubbed operation must be invoked at least once.
    pub fn with_spy(mut self, spy: bool) -> Self {
        self.spy = spy;
        self
    }

    /// Log the stub lifecycle with the given logger.
    pub fn with_logger(mut self, logger: Logger) -> Self {
        self.logger = logger;
        self
    }

    /// Is the spy verification enabled
    pub fn is_spy(&self) -> bool {
        self.spy
    }
}

impl Default for StubOptions {
    /// No spy verification and a logger that discards everything.
    fn default() -> Self {
        Self {
            spy: false,
            logger: Logger::root(slog::Discard, slog::o!()),
        }
    }
}

/// Installed override of an [Operation], restored when dropped.
pub struct StubGuard<'a, A, R> {
    operation: &'a Operation<A, R>,
    original: Option<Implementation<A, R>>,
    invoked: Arc<AtomicBool>,
    restored: bool,
    logger: Logger,
}

impl<'a, A, R> StubGuard<'a, A, R>
where
    A: 'static,
    R: Clone + Send + Sync + 'static,
{
    /// Capture the current implementation of `operation` and replace it with one that ignores
    /// its arguments and returns `return_value`.
    pub fn install(
        operation: &'a Operation<A, R>,
        return_value: R,
        logger: Logger,
    ) -> Result<Self, OperationError> {
        let logger = logger.new(slog::o!(
            "src" => "StubGuard",
            "operation" => operation.name().to_string()
        ));
        let invoked = Arc::new(AtomicBool::new(false));
        let override_invoked = invoked.clone();
        let stubbed: Implementation<A, R> = Arc::new(move |_args: A| {
            override_invoked.store(true, Ordering::SeqCst);
            return_value.clone()
        });

        let original = operation.swap(Some(stubbed))?;
        debug!(logger, "Stub installed"; "had_original" => original.is_some());

        Ok(Self {
            operation,
            original,
            invoked,
            restored: false,
            logger,
        })
    }
}

impl<A, R> StubGuard<'_, A, R> {
    /// Check if the override has been invoked at least once.
    pub fn was_invoked(&self) -> bool {
        self.invoked.load(Ordering::SeqCst)
    }

    /// Restore the operation and return whether the override was invoked.
    pub fn restore(mut self) -> Result<bool, OperationError> {
        self.restore_original()?;

        Ok(self.was_invoked())
    }

    fn restore_original(&mut self) -> Result<(), OperationError> {
        if self.restored {
            return Ok(());
        }
        self.restored = true;

        let original = self.original.take();
        let had_original = original.is_some();
        self.operation.swap(original)?;
        debug!(
            self.logger, "Stub restored";
            "had_original" => had_original, "invoked" => self.was_invoked()
        );

        Ok(())
    }
}

impl<A, R> Drop for StubGuard<'_, A, R> {
    fn drop(&mut self) {
        if let Err(error) = self.restore_original() {
            warn!(self.logger, "Failed to restore stubbed operation"; "error" => ?error);
        }
    }
}

/// Stub the operation selected on `target` while running `scoped_action`.
///
/// Inside the action the operation returns `return_value` whatever its arguments. Once the
/// action is over the operation is restored, even if the action failed or panicked.
///
/// If the action fails its error is returned as is and the spy verification is skipped.
/// Otherwise, when [StubOptions::spy] is set and the operation was never invoked, an
/// [ExpectationNotMet] error is returned after the restoration.
pub fn stub<T, A, R, O>(
    target: &T,
    select_operation: impl FnOnce(&T) -> &Operation<A, R>,
    return_value: R,
    options: StubOptions,
    scoped_action: impl FnOnce(&T) -> StdResult<O>,
) -> StdResult<O>
where
    T: fmt::Debug + ?Sized,
    A: 'static,
    R: Clone + Send + Sync + 'static,
{
    let operation = select_operation(target);
    let guard = StubGuard::install(operation, return_value, options.logger.clone())
        .with_context(|| {
            format!(
                "Could not stub operation '{}' on {target:?}",
                operation.name()
            )
        })?;

    let action_result = scoped_action(target);
    let restore_result = guard.restore();

    let value = action_result?;
    let invoked = restore_result.with_context(|| {
        format!(
            "Could not restore operation '{}' on {target:?}",
            operation.name()
        )
    })?;

    if options.spy && !invoked {
        return Err(ExpectationNotMet::new(target, operation.name()).into());
    }

    Ok(value)
}
