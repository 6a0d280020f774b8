//! Entry points for creating views.
//!
//! Every call creates a fresh traversal context for the root object, copies
//! the root through the graph copier and wraps the result in the type's
//! generated view struct. The context is not retained by the caller; it lives
//! exactly as long as some view of that root call does.
//!
//! # Citations
//! - Defensive copies: Bloch, "Effective Java", Item 50 (3rd ed., 2018)
//! - Lazy copying of object graphs: Baker, "List processing in real time on a serial computer" (1978)

use crate::config::ViewConfig;
use crate::context::TraversalContext;
use crate::copier;
use crate::error::ViewResult;
use crate::object::Obj;
use crate::policy::Policy;
use crate::schema::Viewable;

/// Configured view factory.
///
/// ```
/// use immutable_view::{immutable_view, ImmutableView, Obj};
///
/// pub struct Point {
///     x: i32,
///     y: i32,
/// }
///
/// immutable_view! {
///     pub struct PointView for Point {
///         terminal x: i32 => x, set_x;
///         terminal y: i32 => y, set_y;
///     }
/// }
///
/// let point = Obj::new(Point { x: 1, y: 2 });
/// let view = ImmutableView::silent().of(&point).unwrap();
/// view.set_x(10).unwrap();
/// assert_eq!(*view.x(), 1);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImmutableView {
    config: ViewConfig,
}

impl ImmutableView {
    /// Factory whose views reject every mutation.
    pub fn strict() -> Self {
        Self::with_config(ViewConfig::default().with_policy(Policy::Strict))
    }

    /// Factory whose views ignore every mutation.
    pub fn silent() -> Self {
        Self::with_config(ViewConfig::default().with_policy(Policy::Silent))
    }

    /// Factory using `config`.
    pub fn with_config(config: ViewConfig) -> Self {
        Self { config }
    }

    /// The configuration applied to each root call.
    pub fn config(&self) -> &ViewConfig {
        &self.config
    }

    /// Returns a read-only view of `source`.
    ///
    /// Terminal fields are copied now; nested objects are copied the first
    /// time their accessor is called.
    pub fn of<T: Viewable>(&self, source: &Obj<T>) -> ViewResult<T::View> {
        let ctx = TraversalContext::new(&self.config);
        let view = copier::copy_as_view(source, &ctx)?;
        Ok(T::View::from(view))
    }
}

/// Returns a read-only view of `source` under `policy`.
pub fn view_of<T: Viewable>(source: &Obj<T>, policy: Policy) -> ViewResult<T::View> {
    ImmutableView::with_config(ViewConfig::default().with_policy(policy)).of(source)
}

/// Returns a view whose mutators fail with
/// [`ViewError::ModificationRejected`](crate::ViewError::ModificationRejected).
pub fn strict_view_of<T: Viewable>(source: &Obj<T>) -> ViewResult<T::View> {
    view_of(source, Policy::Strict)
}

/// Returns a view whose mutators do nothing.
pub fn silent_view_of<T: Viewable>(source: &Obj<T>) -> ViewResult<T::View> {
    view_of(source, Policy::Silent)
}
