//! Traversal context of one root view.
//!
//! A context maps original object identity to the view already created for
//! it. Every view reachable from the same root call shares one context, so a
//! nested object reached through two paths, or through a cycle back to an
//! ancestor, resolves to the identical view instance.
//!
//! # Ownership
//! Entries hold a strong handle on the original, which pins its address and
//! keeps [`ObjectId`]s unique for as long as the entry exists, and a weak
//! handle on the view. The views own the context, never the other way round.

use crate::config::ViewConfig;
use crate::object::{AnyObject, ObjectId};
use crate::policy::Policy;
use crate::view::ViewInner;
use parking_lot::{Mutex, MutexGuard};
use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Weak};
use std::time::Duration;
use tracing::trace;

struct ContextEntry {
    _origin: AnyObject,
    view: Weak<dyn Any + Send + Sync>,
}

/// Identity map shared by every view of one root call.
pub struct TraversalContext {
    policy: Policy,
    lock_timeout: Duration,
    entries: Mutex<HashMap<ObjectId, ContextEntry>>,
}

impl TraversalContext {
    pub(crate) fn new(config: &ViewConfig) -> Arc<Self> {
        Arc::new(Self {
            policy: config.policy,
            lock_timeout: config.lock_timeout,
            entries: Mutex::new(HashMap::new()),
        })
    }

    /// Policy every view in this context is generated under.
    pub fn policy(&self) -> Policy {
        self.policy
    }

    /// Longest wait for a source object's read lock.
    pub fn lock_timeout(&self) -> Duration {
        self.lock_timeout
    }

    /// Number of originals registered so far.
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    /// Returns `true` if no view has been registered yet.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Locks the identity map for one lookup-copy-register sequence.
    pub(crate) fn registry(&self) -> Registry<'_> {
        Registry(self.entries.lock())
    }
}

impl fmt::Debug for TraversalContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TraversalContext")
            .field("policy", &self.policy)
            .field("lock_timeout", &self.lock_timeout)
            .field("entries", &self.len())
            .finish()
    }
}

/// Exclusive access to a context's identity map.
pub(crate) struct Registry<'a>(MutexGuard<'a, HashMap<ObjectId, ContextEntry>>);

impl Registry<'_> {
    /// Returns the live view registered for `id`.
    ///
    /// An entry whose view has been dropped is removed; the caller copies the
    /// original again.
    pub(crate) fn lookup<T: Send + Sync + 'static>(&mut self, id: ObjectId) -> Option<Arc<ViewInner<T>>> {
        let entry = self.0.get(&id)?;
        match entry.view.upgrade() {
            Some(view) => {
                trace!(origin = %id, "traversal context hit");
                view.downcast::<ViewInner<T>>().ok()
            }
            None => {
                self.0.remove(&id);
                None
            }
        }
    }

    /// Records `view` as the view of `origin`.
    pub(crate) fn register<T: Send + Sync + 'static>(&mut self, origin: AnyObject, view: &Arc<ViewInner<T>>) {
        let erased: Arc<dyn Any + Send + Sync> = view.clone();
        let id = ObjectId::of_erased(&origin);
        self.0.insert(
            id,
            ContextEntry {
                _origin: origin,
                view: Arc::downgrade(&erased),
            },
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operations::strict_view_of;
    use crate::test_domain::{Address, Person, Street};
    use crate::Obj;

    #[test]
    fn context_carries_config() {
        let config = ViewConfig::default()
            .with_policy(Policy::Silent)
            .with_lock_timeout(Duration::from_millis(5));
        let ctx = TraversalContext::new(&config);
        assert_eq!(ctx.policy(), Policy::Silent);
        assert_eq!(ctx.lock_timeout(), Duration::from_millis(5));
        assert!(ctx.is_empty());
    }

    #[test]
    fn nested_views_join_the_root_context() {
        let person = Obj::new(Person::with_address(
            "John",
            60,
            Address::new(Street::new("Spencer Park", 7), "London"),
        ));
        let view = strict_view_of(&person).unwrap();
        assert_eq!(view.context().len(), 1);
        let address = view.get_address().unwrap().unwrap();
        assert!(Arc::ptr_eq(view.context(), address.context()));
        assert_eq!(view.context().len(), 2);
    }

    #[test]
    fn dropped_view_is_not_returned() {
        let ctx = TraversalContext::new(&ViewConfig::default());
        let person = Obj::new(Person::new("John", 60));
        let first = crate::copier::copy_as_view(&person, &ctx).unwrap();
        drop(first);
        assert!(ctx.registry().lookup::<Person>(person.id()).is_none());
        assert!(ctx.is_empty());
    }
}
