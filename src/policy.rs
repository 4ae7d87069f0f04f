//! Handling of referential misses.
//!
//! Table operations report a reference that does not resolve (an unknown
//! column, index, key or table, or a colliding name) as a
//! [`ReferenceError`] and leave the table untouched. The policy decides
//! whether the statement driver absorbs that error or hands it to the caller.

use crate::errors::ReferenceError;

/// What to do with a [`ReferenceError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ReferencePolicy {
    /// Log the miss and carry on with the model unchanged.
    #[default]
    Lenient,
    /// Surface the miss to the caller.
    Strict,
}

impl ReferencePolicy {
    /// Applies the policy to the outcome of a table operation.
    ///
    /// # Errors
    ///
    /// Returns the error unchanged under [`ReferencePolicy::Strict`].
    pub fn absorb(self, result: Result<(), ReferenceError>) -> Result<(), ReferenceError> {
        match (self, result) {
            (_, Ok(())) => Ok(()),
            (Self::Lenient, Err(error)) => {
                tracing::warn!(%error, "ignoring unresolved reference");
                Ok(())
            }
            (Self::Strict, Err(error)) => Err(error),
        }
    }
}
