//! Generated substitute types.
//!
//! A [`ViewType<T>`] is what the original type becomes once viewed: the
//! field model, the mutation policy baked in at generation time, a mutator
//! table whose every entry delegates to that policy, and an accessor table
//! mapping complex fields to per-instance memo slots.
//!
//! The wrapper structs emitted by [`immutable_view!`](crate::immutable_view)
//! are thin shells over [`View`](crate::view::View); all behaviour they
//! expose is installed here.

use crate::error::ViewError;
use crate::fingerprint::{view_type_fingerprint, HashValue};
use crate::policy::{MutationAttempt, MutationPolicy, Policy};
use crate::schema::{FieldKind, Schema, Viewable};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// A mutator installed on a view type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InstalledMutator {
    /// Mutator name.
    pub name: &'static str,
    /// Field it was declared for, `None` for standalone mutators.
    pub field: Option<&'static str>,
}

/// Substitute for `T` under one mutation policy.
pub struct ViewType<T> {
    schema: Arc<Schema<T>>,
    policy: Arc<dyn MutationPolicy>,
    mutators: HashMap<&'static str, InstalledMutator>,
    /// Complex field name → memo slot index.
    slots: HashMap<&'static str, usize>,
    /// Accessor name → field name.
    accessors: HashMap<&'static str, &'static str>,
    fingerprint: HashValue,
}

impl<T: Viewable> ViewType<T> {
    /// Generates the view type of `T` under `policy` from its extracted
    /// field model. The schema is shared by the view types of every policy.
    ///
    /// Fails with [`ViewError::TypeGeneration`] if `T` cannot be substituted:
    /// it is sealed, a mutator shares its name with an accessor, or one
    /// mutator name is declared twice.
    pub(crate) fn generate(schema: Arc<Schema<T>>, policy: Policy) -> Result<Self, ViewError> {
        let type_name = schema.type_name();
        let refuse = |reason: String| ViewError::TypeGeneration { type_name, reason };

        if schema.is_sealed() {
            return Err(refuse("type is sealed".to_string()));
        }

        let mut accessors = HashMap::new();
        let mut slots = HashMap::new();
        for field in schema.fields() {
            accessors.insert(field.accessor, field.name);
            if field.kind == FieldKind::Complex {
                let next = slots.len();
                slots.insert(field.name, next);
            }
        }

        let declared = schema
            .fields()
            .filter_map(|field| field.mutator.map(|m| (m, Some(field.name))))
            .chain(schema.standalone_mutators().iter().map(|&m| (m, None)));

        let mut mutators: HashMap<&'static str, InstalledMutator> = HashMap::new();
        for (name, field) in declared {
            if accessors.contains_key(name) {
                return Err(refuse(format!(
                    "mutator `{name}` collides with an accessor and cannot be overridden"
                )));
            }
            if let Some(existing) = mutators.get(name) {
                return Err(refuse(format!(
                    "mutator `{name}` is declared for both `{}` and `{}`",
                    existing.field.unwrap_or("<standalone>"),
                    field.unwrap_or("<standalone>")
                )));
            }
            mutators.insert(name, InstalledMutator { name, field });
        }

        let fingerprint = view_type_fingerprint(&*schema, policy);
        debug!(
            type_name,
            %policy,
            fields = accessors.len(),
            mutators = mutators.len(),
            %fingerprint,
            "generated view type"
        );

        Ok(Self {
            schema,
            policy: policy.install(),
            mutators,
            slots,
            accessors,
            fingerprint,
        })
    }
}

impl<T> ViewType<T> {
    /// Field model of the original type.
    pub fn schema(&self) -> &Schema<T> {
        &self.schema
    }

    /// Name of the original type.
    pub fn type_name(&self) -> &'static str {
        self.schema.type_name()
    }

    /// Policy baked into this view type.
    pub fn policy(&self) -> Policy {
        self.policy.kind()
    }

    /// Fingerprint of this definition.
    pub fn fingerprint(&self) -> HashValue {
        self.fingerprint
    }

    /// Installed mutators, in no particular order.
    pub fn mutators(&self) -> impl Iterator<Item = &InstalledMutator> {
        self.mutators.values()
    }

    /// Field served by `accessor`, if any.
    pub fn field_for_accessor(&self, accessor: &str) -> Option<&'static str> {
        self.accessors.get(accessor).copied()
    }

    /// Number of memo slots every instance carries.
    pub fn memo_slots(&self) -> usize {
        self.slots.len()
    }

    /// Memo slot backing the complex field `field`.
    pub(crate) fn slot_of(&self, field: &str) -> Option<usize> {
        self.slots.get(field).copied()
    }

    /// Runs the installed body of `mutator`: the baked policy, never the
    /// original implementation.
    pub(crate) fn intercept(&self, mutator: &'static str) -> Result<(), ViewError> {
        let installed = self.mutators.get(mutator).ok_or(ViewError::UnknownMutator {
            type_name: self.type_name(),
            mutator,
        })?;
        self.policy.intercept(&MutationAttempt {
            type_name: self.type_name(),
            mutator: installed.name,
            field: installed.field,
        })
    }
}

impl<T> fmt::Debug for ViewType<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViewType")
            .field("type_name", &self.type_name())
            .field("policy", &self.policy())
            .field("memo_slots", &self.memo_slots())
            .field("fingerprint", &self.fingerprint)
            .finish()
    }
}
