//! Accessor interception for complex fields.
//!
//! Each complex field of a view instance owns a [`MemoSlot`]. The copier
//! leaves it holding the original nested object; the first accessor call
//! turns that into a nested view through the copier, using the traversal
//! context of the root view so that shared and cyclic references keep their
//! identity, and remembers the view in the slot.
//!
//! Slots keep the original strongly and the view weakly. A nested view is
//! returned again for as long as anyone holds it; once every handle is gone
//! the next access copies the original afresh. Views therefore never own each
//! other, and views of cyclic graphs are freed like any other.
//!
//! The slot is guarded by its own lock, so concurrent first accesses converge
//! on one view.

use crate::copier;
use crate::error::{FieldCopyError, ViewError};
use crate::object::{AnyObject, Obj};
use crate::schema::Viewable;
use crate::view::{View, ViewInner};
use parking_lot::Mutex;
use std::any::Any;
use std::sync::{Arc, Weak};
use tracing::debug;

enum SlotState {
    Null,
    Unresolved(AnyObject),
    Resolved {
        original: AnyObject,
        view: Weak<dyn Any + Send + Sync>,
    },
}

/// Per-instance, per-field memo of a nested view.
pub(crate) struct MemoSlot(Mutex<SlotState>);

impl MemoSlot {
    pub(crate) fn null() -> Self {
        Self(Mutex::new(SlotState::Null))
    }

    pub(crate) fn unresolved(original: AnyObject) -> Self {
        Self(Mutex::new(SlotState::Unresolved(original)))
    }

    /// Whether the slot currently remembers a live view.
    #[cfg(test)]
    pub(crate) fn is_resolved(&self) -> bool {
        match &*self.0.lock() {
            SlotState::Resolved { view, .. } => view.strong_count() > 0,
            _ => false,
        }
    }
}

/// Returns the nested view stored under `field` of `owner`.
pub(crate) fn materialize<T: Viewable, U: Viewable>(
    owner: &ViewInner<T>,
    field: &'static str,
) -> Result<Option<View<U>>, ViewError> {
    let type_name = owner.view_type.type_name();
    let index = owner
        .view_type
        .slot_of(field)
        .ok_or(FieldCopyError::UnknownField { type_name, field })?;
    let mismatch = || FieldCopyError::TypeMismatch {
        type_name,
        field,
        expected: std::any::type_name::<U>(),
    };

    let mut state = owner.slots[index].0.lock();
    let original = match &*state {
        SlotState::Null => return Ok(None),
        SlotState::Unresolved(original) => Arc::clone(original),
        SlotState::Resolved { original, view } => match view.upgrade() {
            Some(live) => {
                let inner = live.downcast::<ViewInner<U>>().map_err(|_| mismatch())?;
                return Ok(Some(View::from_inner(inner)));
            }
            None => Arc::clone(original),
        },
    };

    let typed = Obj::<U>::restore(Arc::clone(&original)).ok_or_else(mismatch)?;
    let view = copier::copy_as_view(&typed, &owner.context)?;
    debug!(type_name, field, origin = %view.origin(), "materialized nested view");
    *state = SlotState::Resolved {
        original,
        view: Arc::downgrade(&view.erase()),
    };
    Ok(Some(view))
}
