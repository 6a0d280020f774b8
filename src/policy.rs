//! Mutation policies plugged into every generated mutator.
//!
//! A policy decides what happens when a mutator is invoked on a view:
//! - [`Strict`]: the call fails with [`ViewError::ModificationRejected`];
//! - [`Silent`]: the call returns normally and nothing changes.
//!
//! The policy is chosen when a view type is generated and baked into it; a
//! view never branches on the policy at call time. Neither policy ever runs
//! the original type's mutator.

pub mod silent;

pub use silent::Silent;

use crate::error::ViewError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Selector for the mutation policy of a view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub enum Policy {
    /// Mutators fail with [`ViewError::ModificationRejected`].
    #[default]
    Strict,
    /// Mutators are no-ops.
    Silent,
}

impl Policy {
    /// Returns the policy implementation installed into generated view types.
    pub fn install(self) -> Arc<dyn MutationPolicy> {
        match self {
            Policy::Strict => Arc::new(Strict),
            Policy::Silent => Arc::new(Silent),
        }
    }

    /// Stable tag used in view type fingerprints.
    pub fn tag(self) -> &'static str {
        match self {
            Policy::Strict => "strict",
            Policy::Silent => "silent",
        }
    }
}

impl fmt::Display for Policy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// A mutator call routed to the policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MutationAttempt {
    /// Original type of the view.
    pub type_name: &'static str,
    /// Mutator that was invoked.
    pub mutator: &'static str,
    /// Field the mutator is bound to, if any.
    pub field: Option<&'static str>,
}

/// Behaviour of every mutator of a generated view type.
pub trait MutationPolicy: fmt::Debug + Send + Sync {
    /// Which selector this implementation answers to.
    fn kind(&self) -> Policy;

    /// Handles a mutator call. Must not change any view state.
    fn intercept(&self, attempt: &MutationAttempt) -> Result<(), ViewError>;
}

/// Rejects every mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Strict;

impl MutationPolicy for Strict {
    fn kind(&self) -> Policy {
        Policy::Strict
    }

    fn intercept(&self, attempt: &MutationAttempt) -> Result<(), ViewError> {
        Err(ViewError::ModificationRejected {
            type_name: attempt.type_name,
            mutator: attempt.mutator,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attempt() -> MutationAttempt {
        MutationAttempt {
            type_name: "Person",
            mutator: "set_name",
            field: Some("name"),
        }
    }

    #[test]
    fn strict_rejects() {
        let err = Strict.intercept(&attempt()).unwrap_err();
        assert_eq!(
            err,
            ViewError::ModificationRejected {
                type_name: "Person",
                mutator: "set_name",
            }
        );
    }

    #[test]
    fn installed_policies_report_their_kind() {
        assert_eq!(Policy::Strict.install().kind(), Policy::Strict);
        assert_eq!(Policy::Silent.install().kind(), Policy::Silent);
    }

    #[test]
    fn default_policy_is_strict() {
        assert_eq!(Policy::default(), Policy::Strict);
        assert_eq!(Policy::Silent.to_string(), "silent");
    }
}
