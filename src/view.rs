//! View instances.
//!
//! A [`View<T>`] is one allocation of a [`ViewType<T>`]: a private copy of
//! every terminal field, one memo slot per complex field, and the traversal
//! context of the root view it was reached from. Views are cheap to clone;
//! clones share the instance, so identity comparisons go through
//! [`View::ptr_eq`].

use crate::accessor::{self, MemoSlot};
use crate::context::TraversalContext;
use crate::error::ViewError;
use crate::object::ObjectId;
use crate::policy::Policy;
use crate::schema::{Terminal, Viewable};
use crate::view_type::ViewType;
use std::any::Any;
use std::fmt;
use std::sync::Arc;

pub(crate) struct ViewInner<T> {
    pub(crate) view_type: Arc<ViewType<T>>,
    /// Blank allocation with every terminal field filled in. Complex fields
    /// of the snapshot stay empty; their values live in `slots`.
    pub(crate) snapshot: T,
    pub(crate) slots: Box<[MemoSlot]>,
    pub(crate) context: Arc<TraversalContext>,
    pub(crate) origin: ObjectId,
}

/// Read-only view of an object of type `T`.
pub struct View<T>(Arc<ViewInner<T>>);

impl<T> Clone for View<T> {
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

impl<T: Viewable> View<T> {
    pub(crate) fn from_inner(inner: Arc<ViewInner<T>>) -> Self {
        Self(inner)
    }

    pub(crate) fn erase(&self) -> Arc<dyn Any + Send + Sync> {
        self.0.clone()
    }

    /// The view type this instance belongs to.
    pub fn view_type(&self) -> &Arc<ViewType<T>> {
        &self.0.view_type
    }

    /// Policy governing this view's mutators.
    pub fn policy(&self) -> Policy {
        self.0.view_type.policy()
    }

    /// Identity of the original object this view was copied from.
    pub fn origin(&self) -> ObjectId {
        self.0.origin
    }

    /// Traversal context shared by every view reachable from the same root.
    pub fn context(&self) -> &Arc<TraversalContext> {
        &self.0.context
    }

    /// Returns `true` if both handles denote the same view instance.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// Reads a terminal value from the private copy.
    ///
    /// Complex fields are only reachable through [`nested`](Self::nested);
    /// they are not [`Terminal`], so reading them here does not compile:
    ///
    /// ```compile_fail
    /// use immutable_view::{immutable_view, strict_view_of, Obj};
    ///
    /// pub struct Node {
    ///     label: String,
    ///     next: Option<Obj<Node>>,
    /// }
    ///
    /// immutable_view! {
    ///     pub struct NodeView for Node {
    ///         terminal label: String => label;
    ///         complex next: Node => next;
    ///     }
    /// }
    ///
    /// let node = Obj::new(Node { label: "a".into(), next: None });
    /// let view = strict_view_of(&node).unwrap();
    /// let _ = view.read(|n: &Node| &n.next);
    /// ```
    pub fn read<V, F>(&self, get: F) -> &V
    where
        V: Terminal,
        F: FnOnce(&T) -> &V,
    {
        get(&self.0.snapshot)
    }

    /// Returns the view of the complex field `field`, materializing it on
    /// first access.
    ///
    /// Repeated calls return the identical view instance. An empty field
    /// yields `Ok(None)`.
    pub fn nested<U: Viewable>(&self, field: &'static str) -> Result<Option<View<U>>, ViewError> {
        accessor::materialize::<T, U>(&self.0, field)
    }

    /// Routes a call of `mutator` through the baked policy.
    ///
    /// Strict views fail with [`ViewError::ModificationRejected`], Silent
    /// views return `Ok(())`. Nothing is modified either way.
    pub fn intercept(&self, mutator: &'static str) -> Result<(), ViewError> {
        self.0.view_type.intercept(mutator)
    }

    /// Like [`intercept`](Self::intercept) for mutators that return a value.
    ///
    /// Under the Silent policy the current, unchanged value is returned.
    pub fn intercept_returning<V, F>(&self, mutator: &'static str, current: F) -> Result<V, ViewError>
    where
        V: Terminal,
        F: FnOnce(&T) -> &V,
    {
        self.intercept(mutator)?;
        Ok(current(&self.0.snapshot).clone())
    }
}

#[cfg(test)]
impl<T> View<T> {
    pub(crate) fn slots_resolved(&self) -> Vec<bool> {
        self.0.slots.iter().map(MemoSlot::is_resolved).collect()
    }
}

impl<T> fmt::Debug for View<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("View")
            .field("type_name", &self.0.view_type.type_name())
            .field("policy", &self.0.view_type.policy())
            .field("origin", &self.0.origin)
            .finish()
    }
}
