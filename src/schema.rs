//! Field model extraction.
//!
//! A [`Schema`] lists the accessor/mutator pairs of a type together with how
//! each backing field is copied into a view:
//! - **terminal** fields (see [`Terminal`]) are copied by value;
//! - **complex** fields hold an `Option<Obj<U>>` and become nested views.
//!
//! Schemas are declared once per type through [`SchemaBuilder`], usually by
//! the [`immutable_view!`](crate::immutable_view) macro, and are owned by the
//! cached [`ViewType`](crate::view_type::ViewType) afterwards. Building a
//! schema is pure.

pub mod terminal;

pub use terminal::Terminal;

use crate::error::SchemaError;
use crate::object::{AnyObject, Obj};
use crate::view::View;
use std::collections::HashSet;
use std::fmt;

/// A type that can be handed out as an immutable view.
///
/// Implementations are normally generated by
/// [`immutable_view!`](crate::immutable_view).
pub trait Viewable: Send + Sync + Sized + 'static {
    /// Generated wrapper exposing the type's accessor contract.
    type View: From<View<Self>> + Clone;

    /// Declares the field model of the type.
    fn schema() -> Result<Schema<Self>, SchemaError>;

    /// Produces a blank value without running any of the type's constructors.
    ///
    /// The copier fills every field afterwards, so the value only has to be
    /// structurally valid.
    fn allocate() -> Self;
}

/// Value kind of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    /// Copied by value, never wrapped.
    Terminal,
    /// Another object, exposed as a nested view.
    Complex,
}

/// Public description of one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldInfo {
    /// Field name.
    pub name: &'static str,
    /// Accessor method name.
    pub accessor: &'static str,
    /// Mutator method name, if the type has one.
    pub mutator: Option<&'static str>,
    /// Value kind.
    pub kind: FieldKind,
}

type CopyFn<T> = Box<dyn Fn(&T, &mut T) -> Result<(), String> + Send + Sync>;
type ExtractFn<T> = Box<dyn Fn(&T) -> Option<AnyObject> + Send + Sync>;

/// How a field's value reaches the view.
pub(crate) enum FieldStorage<T> {
    /// Copies the value from source to the blank allocation.
    Terminal(CopyFn<T>),
    /// Reads the nested object handle, if any.
    Complex(ExtractFn<T>),
}

/// A field together with its copy routine.
pub(crate) struct FieldDescriptor<T> {
    pub(crate) info: FieldInfo,
    pub(crate) storage: FieldStorage<T>,
}

/// Field model of `T`.
pub struct Schema<T> {
    type_name: &'static str,
    fields: Vec<FieldDescriptor<T>>,
    mutators: Vec<&'static str>,
    sealed: bool,
}

impl<T> Schema<T> {
    /// Starts declaring the schema of a type named `type_name`.
    pub fn builder(type_name: &'static str) -> SchemaBuilder<T> {
        SchemaBuilder {
            type_name,
            fields: Vec::new(),
            mutators: Vec::new(),
            sealed: false,
        }
    }

    /// Name of the described type.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Iterates over the declared fields in declaration order.
    pub fn fields(&self) -> impl Iterator<Item = &FieldInfo> {
        self.fields.iter().map(|field| &field.info)
    }

    /// Looks a field up by name.
    pub fn field(&self, name: &str) -> Option<&FieldInfo> {
        self.fields().find(|field| field.name == name)
    }

    /// Mutators not bound to a single field (`increment`, `clear`, ...).
    pub fn standalone_mutators(&self) -> &[&'static str] {
        &self.mutators
    }

    /// Whether the type refuses substitution.
    pub fn is_sealed(&self) -> bool {
        self.sealed
    }

    pub(crate) fn descriptors(&self) -> &[FieldDescriptor<T>] {
        &self.fields
    }
}

impl<T> fmt::Debug for Schema<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Schema")
            .field("type_name", &self.type_name)
            .field("fields", &self.fields().collect::<Vec<_>>())
            .field("mutators", &self.mutators)
            .field("sealed", &self.sealed)
            .finish()
    }
}

struct PendingField<T> {
    info: FieldInfo,
    storage: Option<FieldStorage<T>>,
}

/// Incremental declaration of a [`Schema`].
///
/// Getter and setter arguments are plain function pointers, so non-capturing
/// closures like `|p: &Person| &p.name` are accepted directly.
pub struct SchemaBuilder<T> {
    type_name: &'static str,
    fields: Vec<PendingField<T>>,
    mutators: Vec<&'static str>,
    sealed: bool,
}

impl<T: 'static> SchemaBuilder<T> {
    /// Declares a copy-by-value field.
    pub fn terminal<V: Terminal>(
        mut self,
        name: &'static str,
        accessor: &'static str,
        mutator: Option<&'static str>,
        get: fn(&T) -> &V,
        set: fn(&mut T, V),
    ) -> Self {
        let copy: CopyFn<T> = Box::new(move |src, dst| {
            set(dst, get(src).clone());
            Ok(())
        });
        self.push(name, accessor, mutator, FieldKind::Terminal, Some(FieldStorage::Terminal(copy)));
        self
    }

    /// Declares a copy-by-value field whose reader may refuse.
    ///
    /// A refusal surfaces as
    /// [`FieldCopyError::Unreadable`](crate::error::FieldCopyError::Unreadable)
    /// when a view of the object is built.
    pub fn try_terminal<V: Terminal>(
        mut self,
        name: &'static str,
        accessor: &'static str,
        mutator: Option<&'static str>,
        read: fn(&T) -> Result<V, String>,
        set: fn(&mut T, V),
    ) -> Self {
        let copy: CopyFn<T> = Box::new(move |src, dst| {
            set(dst, read(src)?);
            Ok(())
        });
        self.push(name, accessor, mutator, FieldKind::Terminal, Some(FieldStorage::Terminal(copy)));
        self
    }

    /// Declares a field referencing another viewable object.
    pub fn complex<U: Viewable>(
        mut self,
        name: &'static str,
        accessor: &'static str,
        mutator: Option<&'static str>,
        get: fn(&T) -> Option<&Obj<U>>,
    ) -> Self {
        let extract: ExtractFn<T> = Box::new(move |src| get(src).map(Obj::erase));
        self.push(name, accessor, mutator, FieldKind::Complex, Some(FieldStorage::Complex(extract)));
        self
    }

    /// Declares an accessor computed from other state, with no storage of its
    /// own. Such a field cannot be copied, so [`build`](Self::build) rejects it.
    pub fn derived(mut self, name: &'static str, accessor: &'static str) -> Self {
        self.push(name, accessor, None, FieldKind::Terminal, None);
        self
    }

    /// Declares a mutator that is not bound to one field.
    pub fn mutator(mut self, name: &'static str) -> Self {
        self.mutators.push(name);
        self
    }

    /// Marks the type as not substitutable.
    pub fn sealed(mut self) -> Self {
        self.sealed = true;
        self
    }

    fn push(
        &mut self,
        name: &'static str,
        accessor: &'static str,
        mutator: Option<&'static str>,
        kind: FieldKind,
        storage: Option<FieldStorage<T>>,
    ) {
        self.fields.push(PendingField {
            info: FieldInfo {
                name,
                accessor,
                mutator,
                kind,
            },
            storage,
        });
    }

    /// Validates the declaration and returns the schema.
    pub fn build(self) -> Result<Schema<T>, SchemaError> {
        let type_name = self.type_name;
        let mut names = HashSet::new();
        let mut accessors = HashSet::new();
        let mut fields = Vec::with_capacity(self.fields.len());

        for pending in self.fields {
            let info = pending.info;
            if !names.insert(info.name) {
                return Err(SchemaError::DuplicateField {
                    type_name,
                    field: info.name,
                });
            }
            if !accessors.insert(info.accessor) {
                return Err(SchemaError::DuplicateAccessor {
                    type_name,
                    accessor: info.accessor,
                });
            }
            let storage = pending.storage.ok_or(SchemaError::MissingStorage {
                type_name,
                accessor: info.accessor,
            })?;
            fields.push(FieldDescriptor { info, storage });
        }

        Ok(Schema {
            type_name,
            fields,
            mutators: self.mutators,
            sealed: self.sealed,
        })
    }
}
