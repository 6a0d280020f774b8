//! Error taxonomy for view generation, copying and mutation.
//!
//! Every failure surfaces synchronously to the caller of the failing
//! operation. A Silent-policy mutation is not an error and never appears
//! here.
//!
//! All error types are `Clone`: a type whose view generation failed keeps its
//! failure in the [`ViewTypeCache`](crate::cache::ViewTypeCache) and hands a
//! copy to every later caller.

use std::time::Duration;
use thiserror::Error;

/// Result alias used across the crate.
pub type ViewResult<T> = Result<T, ViewError>;

/// Top-level error returned by view operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ViewError {
    /// A mutator was invoked on a view generated under the Strict policy.
    ///
    /// Recoverable: this is the expected signal, not a defect.
    #[error("cannot modify immutable view of `{type_name}` through `{mutator}`")]
    ModificationRejected {
        /// Original type the view stands in for.
        type_name: &'static str,
        /// Mutator that was invoked.
        mutator: &'static str,
    },

    /// The original type cannot be substituted by a view type.
    ///
    /// Fatal for the type; the cache remembers it and never retries.
    #[error("cannot generate view type for `{type_name}`: {reason}")]
    TypeGeneration {
        /// Original type.
        type_name: &'static str,
        /// Why generation was refused.
        reason: String,
    },

    /// A mutator name was routed to a view type that never declared it.
    ///
    /// Generated view structs only call declared mutators; this surfaces
    /// hand-written calls to [`View::intercept`](crate::View::intercept).
    #[error("`{type_name}` declares no mutator `{mutator}`")]
    UnknownMutator {
        /// Original type the view stands in for.
        type_name: &'static str,
        /// Mutator that was invoked.
        mutator: &'static str,
    },

    /// A field could not be read while copying a source object.
    #[error(transparent)]
    FieldCopy(#[from] FieldCopyError),

    /// The type's field model is inconsistent.
    #[error(transparent)]
    UnsupportedSchema(#[from] SchemaError),
}

impl ViewError {
    /// Returns `true` for [`ViewError::ModificationRejected`].
    pub fn is_modification_rejected(&self) -> bool {
        matches!(self, ViewError::ModificationRejected { .. })
    }
}

/// Failure while copying one source object into a view instance.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldCopyError {
    /// The source object stayed write-locked longer than the configured wait.
    #[error("source `{type_name}` stayed write-locked for {waited:?}")]
    SourceLocked {
        /// Type of the locked source.
        type_name: &'static str,
        /// How long the copier waited.
        waited: Duration,
    },

    /// A fallible field reader refused to produce a value.
    #[error("field `{field}` of `{type_name}` is not readable: {reason}")]
    Unreadable {
        /// Owning type.
        type_name: &'static str,
        /// Field name.
        field: &'static str,
        /// Reader-supplied reason.
        reason: String,
    },

    /// A memo slot holds an object of a different type than the accessor
    /// asked for.
    #[error("field `{field}` of `{type_name}` does not hold a `{expected}`")]
    TypeMismatch {
        /// Owning type.
        type_name: &'static str,
        /// Field name.
        field: &'static str,
        /// Type the accessor expected.
        expected: &'static str,
    },

    /// No complex field with this name exists on the view type.
    #[error("`{type_name}` has no complex field `{field}`")]
    UnknownField {
        /// Owning type.
        type_name: &'static str,
        /// Requested field.
        field: &'static str,
    },
}

/// Inconsistent accessor/field mapping found while extracting a schema.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// An accessor exists but no backing storage can be copied.
    #[error("accessor `{accessor}` of `{type_name}` has no backing field storage")]
    MissingStorage {
        /// Owning type.
        type_name: &'static str,
        /// Accessor without storage.
        accessor: &'static str,
    },

    /// The same field name was declared twice.
    #[error("field `{field}` of `{type_name}` is declared more than once")]
    DuplicateField {
        /// Owning type.
        type_name: &'static str,
        /// Repeated field name.
        field: &'static str,
    },

    /// Two fields share one accessor.
    #[error("accessor `{accessor}` of `{type_name}` is bound to more than one field")]
    DuplicateAccessor {
        /// Owning type.
        type_name: &'static str,
        /// Repeated accessor name.
        accessor: &'static str,
    },
}
