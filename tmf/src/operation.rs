//! # Operation
//!
//! A named, replaceable operation owned by one target instance.
//!
//! Types that want to be stubbed expose their behavior through [Operation] fields instead of
//! plain methods. Each instance owns its own slots, so replacing an implementation only affects
//! that instance. An empty slot is the explicit "operation not supported" state.

use std::fmt;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use thiserror::Error;

/// Shared implementation of an [Operation].
pub type Implementation<A, R> = Arc<dyn Fn(A) -> R + Send + Sync>;

/// [Operation] related errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OperationError {
    /// The target does not support the operation
    #[error("Unsupported operation '{0}'")]
    Unsupported(String),

    /// Internal lock is poisoned
    #[error("Poisoned lock on operation '{0}'")]
    PoisonedLock(String),
}

/// Named slot holding the current implementation of an operation, if any.
pub struct Operation<A, R> {
    name: String,
    implementation: RwLock<Option<Implementation<A, R>>>,
}

impl<A, R> Operation<A, R> {
    /// Create a supported operation.
    pub fn new<F>(name: &str, implementation: F) -> Self
    where
        F: Fn(A) -> R + Send + Sync + 'static,
    {
        Self::from_implementation(name, Some(Arc::new(implementation)))
    }

    /// Create an operation that the target does not respond to.
    pub fn unsupported(name: &str) -> Self {
        Self::from_implementation(name, None)
    }

    fn from_implementation(name: &str, implementation: Option<Implementation<A, R>>) -> Self {
        Self {
            name: name.to_string(),
            implementation: RwLock::new(implementation),
        }
    }

    /// Name of the operation
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Check if the target currently responds to this operation.
    pub fn is_supported(&self) -> bool {
        self.snapshot().is_ok_and(|implementation| implementation.is_some())
    }

    /// Invoke the current implementation.
    ///
    /// The slot is not locked while the implementation runs, so an implementation can freely
    /// call or redefine other operations, including this one.
    pub fn call(&self, args: A) -> Result<R, OperationError> {
        let implementation = self
            .snapshot()?
            .ok_or_else(|| OperationError::Unsupported(self.name.clone()))?;

        Ok(implementation(args))
    }

    /// Clone of the current implementation.
    ///
    /// Later redefinitions of the slot do not affect the returned snapshot.
    pub fn snapshot(&self) -> Result<Option<Implementation<A, R>>, OperationError> {
        Ok(self.read()?.clone())
    }

    /// Replace the implementation, making the operation supported.
    pub fn define<F>(&self, implementation: F) -> Result<(), OperationError>
    where
        F: Fn(A) -> R + Send + Sync + 'static,
    {
        self.swap(Some(Arc::new(implementation)))?;

        Ok(())
    }

    /// Remove the implementation, the target no longer responds to the operation.
    pub fn undefine(&self) -> Result<(), OperationError> {
        self.swap(None)?;

        Ok(())
    }

    /// Install `implementation` and return the one it replaced, under a single lock.
    pub(crate) fn swap(
        &self,
        implementation: Option<Implementation<A, R>>,
    ) -> Result<Option<Implementation<A, R>>, OperationError> {
        let mut current = self.write()?;

        Ok(std::mem::replace(&mut *current, implementation))
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Option<Implementation<A, R>>>, OperationError> {
        self.implementation
            .read()
            .map_err(|_| OperationError::PoisonedLock(self.name.clone()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Option<Implementation<A, R>>>, OperationError> {
        self.implementation
            .write()
            .map_err(|_| OperationError::PoisonedLock(self.name.clone()))
    }
}

impl<A, R> fmt::Debug for Operation<A, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Operation")
            .field("name", &self.name)
            .field("supported", &self.is_supported())
            .finish()
    }
}
