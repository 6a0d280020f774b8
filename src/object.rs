//! Shared handles for the mutable object graphs that views are taken of.
//!
//! An original object lives behind an [`Obj<T>`]: a cloneable handle to a
//! lock-protected value. Handles are how objects reference each other, which
//! makes sharing and cycles expressible (`a.friend = Some(b.clone())` after
//! construction).
//!
//! # Identity
//! Two handles denote the same object iff they point at the same allocation.
//! [`ObjectId`] captures that address; it is only meaningful while the object
//! is alive, which is why the traversal context pins every original it keys
//! on.

use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::any::Any;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Identity of an original object.
///
/// Wraps the allocation address of the object's handle. Equality and hash
/// are based solely on that address.
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ObjectId(usize);

impl ObjectId {
    /// Returns the raw address.
    #[inline]
    pub const fn as_usize(&self) -> usize {
        self.0
    }

    pub(crate) fn of_erased(object: &AnyObject) -> Self {
        Self(Arc::as_ptr(object) as *const () as usize)
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ObjectId({:#x})", self.0)
    }
}

/// Type-erased original object, as stored in memo slots and traversal
/// contexts.
pub(crate) type AnyObject = Arc<dyn Any + Send + Sync>;

/// Shared, mutable handle to an original object.
///
/// Cloning the handle shares the object; it never copies the value.
pub struct Obj<T>(Arc<RwLock<T>>);

impl<T> Obj<T> {
    /// Wraps `value` in a fresh handle with its own identity.
    pub fn new(value: T) -> Self {
        Self(Arc::new(RwLock::new(value)))
    }

    /// Returns the identity of the referenced object.
    #[inline]
    pub fn id(&self) -> ObjectId {
        ObjectId(Arc::as_ptr(&self.0) as *const () as usize)
    }

    /// Returns `true` if both handles reference the same object.
    #[inline]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// Locks the object for reading.
    pub fn read(&self) -> RwLockReadGuard<'_, T> {
        self.0.read()
    }

    /// Locks the object for writing.
    pub fn write(&self) -> RwLockWriteGuard<'_, T> {
        self.0.write()
    }

    /// Locks the object for reading, giving up after `timeout`.
    pub fn try_read_for(&self, timeout: Duration) -> Option<RwLockReadGuard<'_, T>> {
        self.0.try_read_for(timeout)
    }
}

impl<T: Send + Sync + 'static> Obj<T> {
    pub(crate) fn erase(&self) -> AnyObject {
        self.0.clone()
    }

    pub(crate) fn restore(object: AnyObject) -> Option<Self> {
        object.downcast::<RwLock<T>>().ok().map(Self)
    }
}

impl<T> Clone for Obj<T> {
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

// Never locks: printing a cyclic graph must not recurse or deadlock.
impl<T> fmt::Debug for Obj<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Obj").field(&self.id()).finish()
    }
}
