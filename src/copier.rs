//! Graph copier.
//!
//! Copies one source object into a fresh allocation of its view type:
//!
//! 1. a view already registered in the traversal context for the source's
//!    identity is returned as is;
//! 2. the view type is resolved through the process-wide cache;
//! 3. a blank value is allocated with [`Viewable::allocate`], so no
//!    constructor of the original type runs;
//! 4. terminal fields are copied, complex fields become unresolved memo slots
//!    holding the original nested object (or null slots);
//! 5. the instance is registered in the context and returned.
//!
//! The context stays locked from step 1 to step 5 and the copier never
//! recurses, so registration and filling are atomic with respect to any
//! other copy in the same context.

use crate::accessor::MemoSlot;
use crate::cache::ViewTypeCache;
use crate::context::TraversalContext;
use crate::error::{FieldCopyError, ViewError};
use crate::object::Obj;
use crate::schema::{FieldStorage, Viewable};
use crate::view::{View, ViewInner};
use std::sync::Arc;

/// Returns the view of `source` within `ctx`, copying it if needed.
pub(crate) fn copy_as_view<T: Viewable>(
    source: &Obj<T>,
    ctx: &Arc<TraversalContext>,
) -> Result<View<T>, ViewError> {
    let mut registry = ctx.registry();
    if let Some(inner) = registry.lookup::<T>(source.id()) {
        return Ok(View::from_inner(inner));
    }

    let view_type = ViewTypeCache::global().resolve::<T>(ctx.policy())?;
    let type_name = view_type.type_name();
    let guard = source
        .try_read_for(ctx.lock_timeout())
        .ok_or(FieldCopyError::SourceLocked {
            type_name,
            waited: ctx.lock_timeout(),
        })?;
    let original: &T = &guard;

    let mut snapshot = T::allocate();
    let mut slots = Vec::with_capacity(view_type.memo_slots());
    for field in view_type.schema().descriptors() {
        match &field.storage {
            FieldStorage::Terminal(copy) => {
                copy(original, &mut snapshot).map_err(|reason| FieldCopyError::Unreadable {
                    type_name,
                    field: field.info.name,
                    reason,
                })?;
            }
            FieldStorage::Complex(extract) => slots.push(match extract(original) {
                Some(nested) => MemoSlot::unresolved(nested),
                None => MemoSlot::null(),
            }),
        }
    }
    drop(guard);

    let inner = Arc::new(ViewInner {
        view_type,
        snapshot,
        slots: slots.into_boxed_slice(),
        context: Arc::clone(ctx),
        origin: source.id(),
    });
    registry.register(source.erase(), &inner);
    Ok(View::from_inner(inner))
}
