//! Silent policy: mutators return normally and change nothing.
//!
//! Useful when views are passed to code that calls setters as a side effect
//! and should not be disturbed, while the data stays frozen.

use super::{MutationAttempt, MutationPolicy, Policy};
use crate::error::ViewError;
use tracing::trace;

/// Discards every mutation without signalling it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Silent;

impl MutationPolicy for Silent {
    fn kind(&self) -> Policy {
        Policy::Silent
    }

    fn intercept(&self, attempt: &MutationAttempt) -> Result<(), ViewError> {
        trace!(
            type_name = attempt.type_name,
            mutator = attempt.mutator,
            "discarded mutation on silent view"
        );
        Ok(())
    }
}
