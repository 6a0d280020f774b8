//! immutable-view: read-only views of mutable object graphs.
//!
//! A view is a structurally identical copy of an object whose mutators either
//! fail ([`Policy::Strict`]) or do nothing ([`Policy::Silent`]). Terminal
//! fields are copied when the view is created; nested objects become views of
//! their own the first time they are accessed, under the same policy and
//! within the same traversal context, so cycles terminate and shared objects
//! keep sharing one view.
//!
//! # Architecture
//!
//! - [`schema`]: field model of a type (terminal vs complex fields, accessor
//!   and mutator names).
//! - [`view_type`] and [`cache`]: field models extracted once per type and
//!   substitute types generated once per `(type, policy)`, both kept for the
//!   lifetime of the process.
//! - `copier` and [`context`]: copying one object into a view, identity map
//!   of a root call.
//! - `accessor`: per-instance memo slots for nested views.
//! - [`policy`]: what a mutator call on a view does.
//! - [`immutable_view!`]: compile-time generation of the view struct.
//!
//! # Example
//!
//! ```
//! use immutable_view::prelude::*;
//!
//! pub struct Street {
//!     name: String,
//! }
//!
//! pub struct Address {
//!     street: Option<Obj<Street>>,
//!     city: String,
//! }
//!
//! immutable_view! {
//!     pub struct StreetView for Street {
//!         terminal name: String => get_name, set_name;
//!     }
//! }
//!
//! immutable_view! {
//!     pub struct AddressView for Address {
//!         complex street: Street => get_street, set_street;
//!         terminal city: String => get_city, set_city;
//!     }
//! }
//!
//! let street = Obj::new(Street { name: "Spencer Park".into() });
//! let address = Obj::new(Address { street: Some(street), city: "London".into() });
//!
//! let view = strict_view_of(&address).unwrap();
//! let street = view.get_street().unwrap().unwrap();
//! assert_eq!(street.get_name(), "Spencer Park");
//! assert!(view.set_city("Paris".into()).unwrap_err().is_modification_rejected());
//!
//! let quiet = silent_view_of(&address).unwrap();
//! quiet.set_city("Paris".into()).unwrap();
//! assert_eq!(quiet.get_city(), "London");
//! ```
//!
//! # References
//!
//! - Bloch, J. "Effective Java", Item 17 "Minimize mutability" (3rd ed., 2018)
//! - Okasaki, C. "Purely Functional Data Structures" (1999) – sharing in persistent structures

mod accessor;
pub mod cache;
pub mod config;
pub mod context;
mod copier;
pub mod error;
pub mod fingerprint;
pub mod macros;
pub mod object;
pub mod operations;
pub mod policy;
pub mod schema;
pub mod view;
pub mod view_type;

#[cfg(test)]
pub(crate) mod test_domain;

pub use cache::ViewTypeCache;
pub use config::{ConfigError, ViewConfig};
pub use error::{FieldCopyError, SchemaError, ViewError, ViewResult};
pub use object::{Obj, ObjectId};
pub use operations::{silent_view_of, strict_view_of, view_of, ImmutableView};
pub use policy::Policy;
pub use schema::{Schema, SchemaBuilder, Terminal, Viewable};
pub use view::View;
pub use view_type::ViewType;

/// Prelude for convenient usage.
pub mod prelude {
    pub use crate::config::ViewConfig;
    pub use crate::error::{ViewError, ViewResult};
    pub use crate::immutable_view;
    pub use crate::object::Obj;
    pub use crate::operations::{silent_view_of, strict_view_of, view_of, ImmutableView};
    pub use crate::policy::Policy;
    pub use crate::schema::{Terminal, Viewable};
    pub use crate::view::View;
}

#[cfg(test)]
mod tests {
    use super::prelude::*;
    use crate::test_domain::{Address, Person, Street};
    use proptest::prelude::*;

    fn any_policy() -> impl Strategy<Value = Policy> {
        prop_oneof![Just(Policy::Strict), Just(Policy::Silent)]
    }

    fn person(name: &str, age: u32, city: &str, street: &str, number: u32) -> Obj<Person> {
        Obj::new(Person::with_address(
            name,
            age,
            Address::new(Street::new(street, number), city),
        ))
    }

    proptest! {
        /// Every terminal value in the view equals the source at view time.
        #[test]
        fn copy_fidelity(
            name in "[A-Za-z ]{0,16}",
            age in any::<u32>(),
            city in "[A-Za-z]{1,12}",
            street in "[A-Za-z ]{1,20}",
            number in any::<u32>(),
            policy in any_policy(),
        ) {
            let source = person(&name, age, &city, &street, number);
            let view = view_of(&source, policy).unwrap();
            let address = view.get_address().unwrap().unwrap();
            let street_view = address.get_street().unwrap().unwrap();

            prop_assert_eq!(view.get_name(), &name);
            prop_assert_eq!(*view.get_age(), age);
            prop_assert_eq!(address.get_city(), &city);
            prop_assert_eq!(street_view.get_name(), &street);
            prop_assert_eq!(*street_view.get_number(), number);
        }

        /// Repeated access returns the identical nested view.
        #[test]
        fn idempotent_read(policy in any_policy(), reads in 2usize..6) {
            let source = person("John", 60, "London", "Spencer Park", 7);
            let view = view_of(&source, policy).unwrap();
            let first = view.get_address().unwrap().unwrap();
            for _ in 1..reads {
                let again = view.get_address().unwrap().unwrap();
                prop_assert!(again.ptr_eq(&first));
                let street = again.get_street().unwrap().unwrap();
                prop_assert!(street.ptr_eq(&first.get_street().unwrap().unwrap()));
            }
        }

        /// Mutators never change what accessors return.
        #[test]
        fn write_isolation(
            policy in any_policy(),
            new_name in "[A-Za-z]{1,10}",
            new_age in any::<u32>(),
            new_city in "[A-Za-z]{1,10}",
        ) {
            let source = person("John", 60, "London", "Spencer Park", 7);
            let view = view_of(&source, policy).unwrap();
            let address = view.get_address().unwrap().unwrap();

            let outcomes = [
                view.set_name(new_name.clone()),
                view.set_age(new_age),
                view.set_address(None),
                address.set_city(new_city.clone()),
            ];
            for outcome in outcomes {
                match policy {
                    Policy::Strict => {
                        prop_assert!(outcome.unwrap_err().is_modification_rejected());
                    }
                    Policy::Silent => {
                        prop_assert_eq!(outcome, Ok(()));
                    }
                }
            }

            prop_assert_eq!(view.get_name(), "John");
            prop_assert_eq!(*view.get_age(), 60);
            prop_assert!(view.get_address().unwrap().unwrap().ptr_eq(&address));
            prop_assert_eq!(address.get_city(), "London");
            prop_assert!(source.read().name == "John");
        }
    }

    #[test]
    fn nested_views_inherit_policy() {
        for policy in [Policy::Strict, Policy::Silent] {
            let source = person("John", 60, "London", "Spencer Park", 7);
            let view = view_of(&source, policy).unwrap();
            let street = view.get_address().unwrap().unwrap().get_street().unwrap().unwrap();
            assert_eq!(street.policy(), policy);
        }
    }
}
