//! Terminal values: copied once into a view, never re-wrapped.
//!
//! A field whose type implements [`Terminal`] is copied by value when the view
//! is built. Everything else reachable from a view must be an [`Obj`] handle
//! to a [`Viewable`] type and is materialized as a nested view on demand.
//!
//! User types opt in by marking themselves inherently immutable:
//!
//! ```
//! use immutable_view::Terminal;
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
//! enum Colour {
//!     #[default]
//!     Tabby,
//!     Ginger,
//! }
//!
//! impl Terminal for Colour {}
//! ```
//!
//! [`Obj`]: crate::object::Obj
//! [`Viewable`]: crate::schema::Viewable

use std::sync::Arc;
use std::time::Duration;

/// Marker for copy-by-value field types.
pub trait Terminal: Clone + Send + Sync + 'static {}

macro_rules! terminal_types {
    ($($ty:ty),* $(,)?) => {
        $(impl Terminal for $ty {})*
    };
}

terminal_types!(
    (),
    bool,
    char,
    i8,
    i16,
    i32,
    i64,
    i128,
    isize,
    u8,
    u16,
    u32,
    u64,
    u128,
    usize,
    f32,
    f64,
    String,
    &'static str,
    Arc<str>,
    Duration,
);

impl<V: Terminal> Terminal for Option<V> {}
impl<V: Terminal> Terminal for Box<V> {}
// Copied wholesale; element-wise wrapping of collections is out of scope.
impl<V: Terminal> Terminal for Vec<V> {}
impl<A: Terminal, B: Terminal> Terminal for (A, B) {}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_terminal<V: Terminal>() {}

    #[test]
    fn primitives_and_text_are_terminal() {
        assert_terminal::<String>();
        assert_terminal::<&'static str>();
        assert_terminal::<u32>();
        assert_terminal::<f64>();
        assert_terminal::<bool>();
    }

    #[test]
    fn containers_of_terminals_are_terminal() {
        assert_terminal::<Option<String>>();
        assert_terminal::<Vec<u8>>();
        assert_terminal::<(String, u16)>();
    }
}
